//! # Tracing Setup
//!
//! Controllers and clients log with structured fields: `resource` names the
//! collection, `id` the item, `status` the HTTP status, `size` the collection
//! length after a change.
//!
//! ```bash
//! RUST_LOG=info cargo run -p theratrack-app    # state changes only
//! RUST_LOG=debug cargo run -p theratrack-app   # requests and payloads
//! ```
//!
//! A typical session at `info`:
//!
//! ```text
//! INFO Controller started resource="patients"
//! INFO login: Logged in
//! INFO Loaded resource="patients" page=0 total_pages=1 size=3
//! INFO Removed resource="patients" id=5 size=2
//! ```

/// Installs a compact fmt subscriber filtered by `RUST_LOG`.
///
/// Call once per process; a second call panics inside `tracing-subscriber`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
