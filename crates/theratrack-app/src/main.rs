//! # TheraTrack
//!
//! Connects to the clinic backend and walks through every screen once:
//! dashboard, patients, therapists and the first page of appointments.
//!
//! Configuration comes from the environment (see
//! [`ClientConfig`](theratrack_client::ClientConfig)). Set
//! `THERATRACK_USERNAME` and `THERATRACK_PASSWORD` to sign in first;
//! otherwise the stored session is reused.

use theratrack_app::lifecycle::{ClinicShell, Route};
use theratrack_client::tracing::setup_tracing;
use theratrack_client::ClientConfig;
use tracing::{error, info, warn, Instrument};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = ClientConfig::from_env().map_err(|e| e.to_string())?;
    info!(base_url = %config.base_url, "Starting TheraTrack");

    let shell = ClinicShell::connect(config).map_err(|e| e.to_string())?;

    if let (Ok(username), Ok(password)) = (
        std::env::var("THERATRACK_USERNAME"),
        std::env::var("THERATRACK_PASSWORD"),
    ) {
        let span = tracing::info_span!("login", %username);
        let signed_in = shell.login(&username, &password).instrument(span).await;
        if let Err(e) = signed_in {
            error!(error = %e, "Login failed");
            shell.shutdown().await.map_err(|e| e.to_string())?;
            return Err(e.to_string());
        }
    }

    if shell.open(Route::Dashboard) == Route::Login {
        warn!("No session; set THERATRACK_USERNAME and THERATRACK_PASSWORD");
        shell.shutdown().await.map_err(|e| e.to_string())?;
        return Ok(());
    }

    let summary = shell.dashboard.summary().await;
    info!(
        patients = summary.patients_count,
        therapists = summary.therapists_count,
        appointments = summary.appointments_count,
        "Dashboard"
    );

    shell.open(Route::Patients);
    match shell.patients.load_all().await {
        Ok(patients) => {
            for patient in &patients {
                info!(id = patient.id, name = %patient.full_name(), "Patient");
            }
        }
        Err(e) => warn!(error = %e, "Patients unavailable"),
    }

    shell.open(Route::Therapists);
    match shell.therapists.load_all().await {
        Ok(therapists) => info!(count = therapists.len(), "Therapists loaded"),
        Err(e) => warn!(error = %e, "Therapists unavailable"),
    }

    if shell.open(Route::Appointments) == Route::Appointments {
        match shell.appointments.load_page(0).await {
            Ok(cursor) => info!(
                page = cursor.page_index,
                total_pages = cursor.total_pages,
                "Appointments loaded"
            ),
            Err(e) => warn!(error = %e, "Appointments unavailable"),
        }
    }

    shell.shutdown().await.map_err(|e| e.to_string())?;
    info!("TheraTrack finished");
    Ok(())
}
