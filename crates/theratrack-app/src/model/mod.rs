//! Wire types for the clinic backend, each implementing
//! [`Resource`](theratrack_client::Resource) where the backend exposes a collection.

pub mod appointment;
pub mod dashboard;
pub mod patient;
pub mod therapist;

pub use appointment::*;
pub use dashboard::*;
pub use patient::*;
pub use therapist::*;
