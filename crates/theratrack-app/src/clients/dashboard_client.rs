//! # Dashboard Client
use crate::model::DashboardSummary;
use theratrack_client::ApiClient;
use tracing::{info, instrument, warn};

pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone)]
pub struct DashboardClient {
    api: ApiClient,
}

impl DashboardClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetches the summary. Any failure yields the zeroed summary.
    #[instrument(skip(self))]
    pub async fn summary(&self) -> DashboardSummary {
        let fetched = match self.api.get(DASHBOARD_PATH).await {
            Ok(payload) => payload.json::<DashboardSummary>(),
            Err(e) => Err(e),
        };
        match fetched {
            Ok(summary) => {
                info!(
                    patients = summary.patients_count,
                    appointments = summary.appointments_count,
                    therapists = summary.therapists_count,
                    upcoming = summary.upcoming_appointments.len(),
                    "Dashboard loaded"
                );
                summary
            }
            Err(e) => {
                warn!(error = %e, "Dashboard unavailable, showing empty summary");
                DashboardSummary::default()
            }
        }
    }
}
