//! # TheraTrack App Library
//!
//! The clinic's screens on top of `theratrack-client`, exposed for
//! integration testing.
//!
//! - **[model]**: wire types ([`Patient`](model::Patient), [`Therapist`](model::Therapist),
//!   [`Appointment`](model::Appointment)) implementing `Resource`.
//! - **[clients]**: one wrapper per screen.
//! - **[lifecycle]**: the [`ClinicShell`](lifecycle::ClinicShell) that wires
//!   and stops everything.

pub mod clients;
pub mod error;
pub mod lifecycle;
pub mod model;

pub use error::ClinicError;
