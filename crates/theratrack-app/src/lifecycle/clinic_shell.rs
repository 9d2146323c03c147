use crate::clients::{AppointmentClient, AppointmentForm, DashboardClient, PatientClient, TherapistClient};
use crate::error::ClinicError;
use crate::lifecycle::navigator::{Navigator, Route};
use crate::model::{Appointment, AppointmentRequest};
use std::sync::Arc;
use theratrack_client::{
    ApiClient, ClientConfig, ControllerActor, ControllerContext, NotificationCenter,
    ReqwestTransport, Resource, ResourceController, ScreenClient, SessionEvent, SessionStore,
    StorageArea, Transport,
};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub const LOGIN_FAILURE_MESSAGE: &str = "Invalid username or password. Please try again.";

/// The runtime host of the clinic screens.
///
/// `ClinicShell` is responsible for:
/// - **Wiring**: one [`ApiClient`] shared by a controller per collection, the
///   dashboard and the appointment form.
/// - **Session routing**: a watcher task sends the user to `/login` whenever
///   the session ends, whether by 401 or by logout.
/// - **Guarding**: [`open`](Self::open) refuses protected screens without a
///   session.
/// - **Shutdown**: tearing down every controller and awaiting its task.
///
/// # Example
///
/// ```ignore
/// let mut shell = ClinicShell::connect(ClientConfig::from_env()?)?;
/// shell.login("admin", "secret").await?;
/// shell.open(Route::Patients);
/// let patients = shell.patients.load_all().await?;
/// shell.shutdown().await?;
/// ```
pub struct ClinicShell {
    pub api: ApiClient,
    pub navigator: Navigator,
    /// Alert slot of the login screen.
    pub notifications: NotificationCenter,
    pub patients: PatientClient,
    pub therapists: TherapistClient,
    pub appointments: AppointmentClient,
    pub dashboard: DashboardClient,
    pub form: AppointmentForm,
    handles: Vec<JoinHandle<()>>,
    watcher: JoinHandle<()>,
}

fn start<T: Resource>(
    capacity: usize,
    api: &ApiClient,
) -> (ResourceController<T>, NotificationCenter, JoinHandle<()>) {
    let notifications = NotificationCenter::new();
    let (actor, controller) = ControllerActor::<T>::new(capacity);
    let handle = tokio::spawn(actor.run(ControllerContext {
        api: api.clone(),
        notifications: notifications.clone(),
    }));
    (controller, notifications, handle)
}

impl ClinicShell {
    /// Creates the shell and starts its tasks. Must run inside a Tokio runtime.
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn StorageArea>,
    ) -> Result<Self, ClinicError> {
        Self::with_session(config, transport, SessionStore::new(storage))
    }

    /// Like [`new`](Self::new) with an already opened session store.
    pub fn with_session(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
        session: SessionStore,
    ) -> Result<Self, ClinicError> {
        config.validate()?;
        let api = ApiClient::new(&config.base_url, transport, session)?;
        let capacity = config.channel_capacity;

        // 1. Controllers, each with its own alert slot
        let (patients, patient_alerts, patient_handle) = start(capacity, &api);
        let (therapists, therapist_alerts, therapist_handle) = start(capacity, &api);
        let (appointments, appointment_alerts, appointment_handle) =
            start::<Appointment>(capacity, &api);

        // 2. Session watcher
        let start_route = if api.session().is_authenticated() {
            Route::Dashboard
        } else {
            Route::Login
        };
        let navigator = Navigator::new(start_route);
        let watcher = tokio::spawn(watch_session(api.subscribe(), navigator.clone()));

        info!(base_url = %config.base_url, start = %start_route, "Clinic shell started");

        Ok(Self {
            navigator,
            notifications: NotificationCenter::new(),
            patients: PatientClient::new(patients, patient_alerts),
            therapists: TherapistClient::new(therapists, therapist_alerts),
            appointments: AppointmentClient::new(appointments, appointment_alerts, config.page_size),
            dashboard: DashboardClient::new(api.clone()),
            form: AppointmentForm::new(api.clone(), NotificationCenter::new()),
            api,
            handles: vec![patient_handle, therapist_handle, appointment_handle],
            watcher,
        })
    }

    /// Production wiring: reqwest transport and the configured session store.
    pub fn connect(config: ClientConfig) -> Result<Self, ClinicError> {
        let session = config.session_store()?;
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new());
        Self::with_session(&config, transport, session)
    }

    pub fn current_route(&self) -> Route {
        self.navigator.current()
    }

    /// Signs in and moves to the dashboard; on failure shows the login error.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClinicError> {
        match self.api.login(username, password).await {
            Ok(_) => {
                self.notifications.dismiss();
                self.navigator.navigate(Route::Dashboard);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.notifications.error(LOGIN_FAILURE_MESSAGE);
                Err(e.into())
            }
        }
    }

    pub async fn logout(&self) -> Result<(), ClinicError> {
        self.api.logout().await?;
        self.navigator.navigate(Route::Login);
        Ok(())
    }

    /// Moves to `route`, or to `/login` if it is protected and there is no session.
    pub fn open(&self, route: Route) -> Route {
        let target = if route.is_public() || self.api.session().is_authenticated() {
            route
        } else {
            warn!(%route, "No session, redirecting to login");
            Route::Login
        };
        self.navigator.navigate(target);
        target
    }

    /// Creates an appointment and returns to the list on success.
    pub async fn save_new_appointment(
        &self,
        request: AppointmentRequest,
    ) -> Result<Appointment, ClinicError> {
        let created = self.appointments.schedule(request).await?;
        self.navigator.navigate(Route::Appointments);
        Ok(created)
    }

    /// Updates an appointment and returns to the list on success.
    pub async fn save_appointment(
        &self,
        id: i64,
        request: AppointmentRequest,
    ) -> Result<(), ClinicError> {
        self.appointments.reschedule(id, request).await?;
        self.navigator.navigate(Route::Appointments);
        Ok(())
    }

    /// Tears down every controller and waits for its task.
    ///
    /// Returns an error if any controller task panicked.
    pub async fn shutdown(self) -> Result<(), ClinicError> {
        info!("Shutting down clinic shell...");

        self.patients.controller().teardown().await;
        self.therapists.controller().teardown().await;
        self.appointments.controller().teardown().await;
        self.watcher.abort();

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Controller task failed");
                return Err(ClinicError::Task(e.to_string()));
            }
        }

        info!("Clinic shell shutdown complete.");
        Ok(())
    }
}

async fn watch_session(mut events: broadcast::Receiver<SessionEvent>, navigator: Navigator) {
    loop {
        match events.recv().await {
            Ok(SessionEvent::SessionExpired) => {
                warn!("Session expired");
                navigator.navigate(Route::Login);
            }
            Ok(SessionEvent::LoggedOut | SessionEvent::LoginRejected) => {
                navigator.navigate(Route::Login)
            }
            Err(RecvError::Lagged(missed)) => {
                // Every event leads to the login screen
                warn!(missed, "Session events lagged");
                navigator.navigate(Route::Login);
            }
            Err(RecvError::Closed) => break,
        }
    }
}
