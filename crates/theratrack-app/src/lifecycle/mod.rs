//! # Application Lifecycle
//!
//! Starts, wires and stops the clinic screens.
//!
//! ## The ClinicShell Pattern
//!
//! [`ClinicShell`] is the conductor:
//!
//! 1. **Controller Creation**: one [`ControllerActor`](theratrack_client::ControllerActor)
//!    per collection, each spawned with the shared client and its own alert slot.
//! 2. **Dependency Injection**: context is handed to `run()` at spawn time, not
//!    at construction, so every controller shares one [`ApiClient`](theratrack_client::ApiClient).
//! 3. **Session Routing**: a watcher task turns
//!    [`SessionEvent`](theratrack_client::SessionEvent)s into navigation to `/login`.
//!    The client itself never navigates.
//! 4. **Graceful Shutdown**: teardown every controller, abort the watcher,
//!    await the controller tasks.
//!
//! ## Navigation
//!
//! [`Navigator`] holds the current [`Route`] in a `tokio::sync::watch`
//! channel. [`ClinicShell::open`] is the route guard: any route other than
//! `/login` needs a session token and otherwise lands on `/login`.
//!
//! ## Observability
//!
//! Logging is installed once by
//! [`setup_tracing`](theratrack_client::tracing::setup_tracing):
//!
//! ```bash
//! RUST_LOG=info cargo run -p theratrack-app
//! RUST_LOG=debug cargo run -p theratrack-app
//! ```

pub mod clinic_shell;
pub mod navigator;

pub use clinic_shell::*;
pub use navigator::*;
