use serde::{Deserialize, Serialize};
use std::fmt;
use theratrack_client::Resource;

/// Lifecycle of an appointment. Serialized in upper snake case (`NO_SHOW`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    #[serde(alias = "Scheduled")]
    Scheduled,
    Confirmed,
    Canceled,
    Completed,
    Rescheduled,
    NoShow,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 7] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Canceled,
        AppointmentStatus::Completed,
        AppointmentStatus::Rescheduled,
        AppointmentStatus::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Canceled => "CANCELED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Rescheduled => "RESCHEDULED",
            AppointmentStatus::NoShow => "NO_SHOW",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patient or therapist as embedded in an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Participant {
    pub id: i64,
    pub name: String,
    pub surname: String,
}

impl Participant {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.name, self.surname).trim().to_string();
        if name.is_empty() {
            format!("#{}", self.id)
        } else {
            name
        }
    }
}

/// A scheduled session between a patient and a therapist.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub date_time: String,
    /// Minutes.
    pub session_duration: u32,
    pub status: AppointmentStatus,
    pub additional_notes: Option<String>,
    pub patient: Option<Participant>,
    pub therapist: Option<Participant>,
}

/// Reference to another resource by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentFields {
    pub date_time: String,
    pub session_duration: u32,
    pub additional_notes: String,
    pub status: AppointmentStatus,
}

/// Body of both create and update:
///
/// ```json
/// { "appointment": { "dateTime": "...", "sessionDuration": 50,
///                    "additionalNotes": "", "status": "PENDING" },
///   "patient": { "id": 3 }, "therapist": { "id": 7 } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub appointment: AppointmentFields,
    pub patient: IdRef,
    pub therapist: IdRef,
}

impl AppointmentRequest {
    pub fn new(
        date_time: impl Into<String>,
        session_duration: u32,
        status: AppointmentStatus,
        patient_id: i64,
        therapist_id: i64,
    ) -> Self {
        Self {
            appointment: AppointmentFields {
                date_time: date_time.into(),
                session_duration,
                additional_notes: String::new(),
                status,
            },
            patient: IdRef { id: patient_id },
            therapist: IdRef { id: therapist_id },
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.appointment.additional_notes = notes.into();
        self
    }

    /// Prefills an edit form from an existing appointment.
    pub fn from_appointment(appointment: &Appointment) -> Self {
        Self {
            appointment: AppointmentFields {
                date_time: appointment.date_time.clone(),
                session_duration: appointment.session_duration,
                additional_notes: appointment.additional_notes.clone().unwrap_or_default(),
                status: appointment.status,
            },
            patient: IdRef {
                id: appointment.patient.as_ref().map_or(0, |p| p.id),
            },
            therapist: IdRef {
                id: appointment.therapist.as_ref().map_or(0, |t| t.id),
            },
        }
    }
}

fn relink(current: &mut Option<Participant>, target: IdRef) {
    if current.as_ref().map(|p| p.id) != Some(target.id) {
        *current = Some(Participant {
            id: target.id,
            ..Default::default()
        });
    }
}

impl Resource for Appointment {
    type Id = i64;
    type Create = AppointmentRequest;
    type Update = AppointmentRequest;
    const ENDPOINT: &'static str = "/appointments";
    const LABEL: &'static str = "appointment";
    const LABEL_PLURAL: &'static str = "appointments";
    const PAGINATED: bool = true;

    fn id(&self) -> i64 {
        self.id
    }

    /// The update body is nested, so the merge maps it field by field.
    fn apply_update(&mut self, update: &AppointmentRequest) -> Result<(), serde_json::Error> {
        let fields = &update.appointment;
        self.date_time = fields.date_time.clone();
        self.session_duration = fields.session_duration;
        self.additional_notes = Some(fields.additional_notes.clone());
        self.status = fields.status;
        relink(&mut self.patient, update.patient);
        relink(&mut self.therapist, update.therapist);
        Ok(())
    }
}
