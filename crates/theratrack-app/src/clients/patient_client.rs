//! # Patient Client
//!
//! Backs the patients screen: the list, the add/edit popup and the delete
//! confirmation.
use crate::error::ClinicError;
use crate::model::{Patient, PatientCreate, PatientUpdate};
use async_trait::async_trait;
use theratrack_client::{
    ConfirmationGate, ControllerError, NotificationCenter, ResourceController, ScreenClient,
    DEFAULT_PAGE_SIZE,
};
use tracing::{debug, instrument};

pub struct PatientClient {
    inner: ResourceController<Patient>,
    gate: ConfirmationGate<Patient>,
    notifications: NotificationCenter,
}

impl PatientClient {
    pub fn new(inner: ResourceController<Patient>, notifications: NotificationCenter) -> Self {
        Self {
            inner,
            gate: ConfirmationGate::new(),
            notifications,
        }
    }

    /// The screen's alert slot.
    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Loads every patient. The endpoint is not paginated.
    pub async fn load_all(&self) -> Result<Vec<Patient>, ClinicError> {
        self.load(0, DEFAULT_PAGE_SIZE).await?;
        self.items().await
    }

    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn register(&self, params: PatientCreate) -> Result<Patient, ClinicError> {
        debug!("Sending request");
        self.create(params).await
    }

    #[instrument(skip(self, update))]
    pub async fn edit(&self, id: i64, update: PatientUpdate) -> Result<(), ClinicError> {
        debug!("Sending request");
        self.update(id, update).await
    }
}

#[async_trait]
impl ScreenClient<Patient> for PatientClient {
    type Error = ClinicError;

    fn controller(&self) -> &ResourceController<Patient> {
        &self.inner
    }

    fn gate(&self) -> &ConfirmationGate<Patient> {
        &self.gate
    }

    fn gate_mut(&mut self) -> &mut ConfirmationGate<Patient> {
        &mut self.gate
    }

    fn map_error(e: ControllerError) -> Self::Error {
        ClinicError::Controller(e)
    }
}
