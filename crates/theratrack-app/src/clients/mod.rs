//! Per-screen wrappers around [`ResourceController`](theratrack_client::ResourceController)
//! and [`ApiClient`](theratrack_client::ApiClient).

pub mod appointment_client;
pub mod dashboard_client;
pub mod patient_client;
pub mod therapist_client;

pub use appointment_client::*;
pub use dashboard_client::*;
pub use patient_client::*;
pub use therapist_client::*;
