//! # Therapist Client
use crate::error::ClinicError;
use crate::model::Therapist;
use async_trait::async_trait;
use theratrack_client::{
    ConfirmationGate, ControllerError, NotificationCenter, ResourceController, ScreenClient,
    DEFAULT_PAGE_SIZE,
};

/// Client behind the therapists screen.
pub struct TherapistClient {
    inner: ResourceController<Therapist>,
    gate: ConfirmationGate<Therapist>,
    notifications: NotificationCenter,
}

impl TherapistClient {
    pub fn new(inner: ResourceController<Therapist>, notifications: NotificationCenter) -> Self {
        Self {
            inner,
            gate: ConfirmationGate::new(),
            notifications,
        }
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub async fn load_all(&self) -> Result<Vec<Therapist>, ClinicError> {
        self.load(0, DEFAULT_PAGE_SIZE).await?;
        self.items().await
    }
}

#[async_trait]
impl ScreenClient<Therapist> for TherapistClient {
    type Error = ClinicError;

    fn controller(&self) -> &ResourceController<Therapist> {
        &self.inner
    }

    fn gate(&self) -> &ConfirmationGate<Therapist> {
        &self.gate
    }

    fn gate_mut(&mut self) -> &mut ConfirmationGate<Therapist> {
        &mut self.gate
    }

    fn map_error(e: ControllerError) -> Self::Error {
        ClinicError::Controller(e)
    }
}
