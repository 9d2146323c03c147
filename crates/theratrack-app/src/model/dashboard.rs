use super::Appointment;
use serde::{Deserialize, Serialize};

/// Counts and upcoming sessions shown on the landing screen.
///
/// `Default` is the all-zero summary shown when the request fails.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardSummary {
    pub patients_count: u64,
    pub appointments_count: u64,
    pub therapists_count: u64,
    pub upcoming_appointments: Vec<Appointment>,
}
