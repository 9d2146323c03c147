//! # Appointment Client
//!
//! Appointments are the only paginated collection. [`AppointmentClient`]
//! backs the list screen and its pager; [`AppointmentForm`] backs the add and
//! edit screens, which need the therapist and patient lists for their
//! selectors.
use crate::error::ClinicError;
use crate::model::{Appointment, AppointmentRequest, Patient, Therapist};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use theratrack_client::{
    ApiClient, ApiError, ConfirmationGate, ControllerError, ListPayload, NotificationCenter,
    PageCursor, Payload, Resource, ResourceController, ScreenClient,
};
use tracing::{debug, info, instrument, warn};

pub const FORM_OPTIONS_FAILURE: &str = "Failed to load therapists or patients.";
pub const EDIT_FORM_FAILURE: &str = "Failed to load appointment or related data.";

/// Client for the appointments list.
pub struct AppointmentClient {
    inner: ResourceController<Appointment>,
    gate: ConfirmationGate<Appointment>,
    notifications: NotificationCenter,
    page_size: u32,
}

impl AppointmentClient {
    pub fn new(
        inner: ResourceController<Appointment>,
        notifications: NotificationCenter,
        page_size: u32,
    ) -> Self {
        Self {
            inner,
            gate: ConfirmationGate::new(),
            notifications,
            page_size,
        }
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub async fn load_page(&self, page: u32) -> Result<PageCursor, ClinicError> {
        self.load(page, self.page_size).await
    }

    /// Moves one page forward. Stays put, without a request, on the last page.
    pub async fn next_page(&self) -> Result<PageCursor, ClinicError> {
        let cursor = self.cursor().await?;
        if !cursor.has_next() {
            return Ok(cursor);
        }
        self.load_page(cursor.page_index + 1).await
    }

    /// Moves one page back. Stays put on the first page.
    pub async fn previous_page(&self) -> Result<PageCursor, ClinicError> {
        let cursor = self.cursor().await?;
        if !cursor.has_previous() {
            return Ok(cursor);
        }
        self.load_page(cursor.page_index - 1).await
    }

    async fn cursor(&self) -> Result<PageCursor, ClinicError> {
        let snapshot = self.inner.snapshot().await.map_err(Self::map_error)?;
        Ok(snapshot.cursor)
    }

    #[instrument(skip(self, request), fields(patient = request.patient.id, therapist = request.therapist.id))]
    pub async fn schedule(&self, request: AppointmentRequest) -> Result<Appointment, ClinicError> {
        debug!("Sending request");
        self.create(request).await
    }

    #[instrument(skip(self, request))]
    pub async fn reschedule(&self, id: i64, request: AppointmentRequest) -> Result<(), ClinicError> {
        debug!(status = %request.appointment.status, "Sending request");
        self.update(id, request).await
    }
}

#[async_trait]
impl ScreenClient<Appointment> for AppointmentClient {
    type Error = ClinicError;

    fn controller(&self) -> &ResourceController<Appointment> {
        &self.inner
    }

    fn gate(&self) -> &ConfirmationGate<Appointment> {
        &self.gate
    }

    fn gate_mut(&mut self) -> &mut ConfirmationGate<Appointment> {
        &mut self.gate
    }

    fn map_error(e: ControllerError) -> Self::Error {
        ClinicError::Controller(e)
    }
}

/// Selector contents for the appointment form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormOptions {
    pub therapists: Vec<Therapist>,
    pub patients: Vec<Patient>,
}

/// Data loading for the add and edit appointment screens.
#[derive(Debug, Clone)]
pub struct AppointmentForm {
    api: ApiClient,
    notifications: NotificationCenter,
}

fn list<T: DeserializeOwned>(payload: Payload) -> Result<Vec<T>, ApiError> {
    let (items, _) = payload.json::<ListPayload<T>>()?.into_parts(0, 0);
    Ok(items)
}

impl AppointmentForm {
    pub fn new(api: ApiClient, notifications: NotificationCenter) -> Self {
        Self { api, notifications }
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    async fn fetch_options(&self) -> Result<FormOptions, ApiError> {
        let (therapists, patients) = tokio::try_join!(
            self.api.get(Therapist::ENDPOINT),
            self.api.get(Patient::ENDPOINT)
        )?;
        Ok(FormOptions {
            therapists: list(therapists)?,
            patients: list(patients)?,
        })
    }

    /// Loads therapists and patients concurrently.
    #[instrument(skip(self))]
    pub async fn options(&self) -> Result<FormOptions, ClinicError> {
        match self.fetch_options().await {
            Ok(options) => {
                info!(
                    therapists = options.therapists.len(),
                    patients = options.patients.len(),
                    "Form options loaded"
                );
                Ok(options)
            }
            Err(e) => {
                warn!(error = %e, "Form options failed");
                self.notifications.error(FORM_OPTIONS_FAILURE);
                Err(e.into())
            }
        }
    }

    /// Loads the options together with appointment `id`, prefilled as a request.
    #[instrument(skip(self))]
    pub async fn load_for_edit(
        &self,
        id: i64,
    ) -> Result<(FormOptions, AppointmentRequest), ClinicError> {
        let path = format!("{}/{}", Appointment::ENDPOINT, id);
        let fetched = async {
            let (options, appointment) = tokio::try_join!(self.fetch_options(), self.api.get(&path))?;
            let appointment: Appointment = appointment.json()?;
            Ok::<_, ApiError>((options, AppointmentRequest::from_appointment(&appointment)))
        };
        match fetched.await {
            Ok(loaded) => Ok(loaded),
            Err(e) => {
                warn!(error = %e, "Edit form failed to load");
                self.notifications.error(EDIT_FORM_FAILURE);
                Err(e.into())
            }
        }
    }
}
