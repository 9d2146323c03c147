use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Screens of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Appointments,
    AddAppointment,
    EditAppointment(i64),
    Patients,
    Therapists,
}

impl Route {
    /// Everything except the login screen requires a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Appointments => "/appointments".to_string(),
            Route::AddAppointment => "/appointments/add".to_string(),
            Route::EditAppointment(id) => format!("/appointments/edit/{id}"),
            Route::Patients => "/patients".to_string(),
            Route::Therapists => "/therapists".to_string(),
        }
    }

    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim_end_matches('/');
        let route = match path {
            "/login" => Route::Login,
            "/dashboard" => Route::Dashboard,
            "/appointments" => Route::Appointments,
            "/appointments/add" => Route::AddAppointment,
            "/patients" => Route::Patients,
            "/therapists" => Route::Therapists,
            _ => {
                let id = path.strip_prefix("/appointments/edit/")?.parse().ok()?;
                Route::EditAppointment(id)
            }
        };
        Some(route)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// The current location. Clones share it; subscribers wake on every move.
#[derive(Clone)]
pub struct Navigator {
    location: Arc<watch::Sender<Route>>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        let (location, _) = watch::channel(start);
        Self {
            location: Arc::new(location),
        }
    }

    pub fn navigate(&self, route: Route) {
        let from = self.location.send_replace(route);
        if from != route {
            info!(%from, to = %route, "Navigated");
        }
    }

    pub fn current(&self) -> Route {
        *self.location.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.location.subscribe()
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Navigator").field(&self.current()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/patients/"), Some(Route::Patients));
        assert_eq!(
            Route::parse("/appointments/edit/42"),
            Some(Route::EditAppointment(42))
        );
        assert_eq!(Route::EditAppointment(42).path(), "/appointments/edit/42");
        assert_eq!(Route::parse("/appointments/edit/x"), None);
        assert_eq!(Route::parse("/nowhere"), None);
    }

    #[test]
    fn only_login_is_public() {
        assert!(Route::Login.is_public());
        assert!(!Route::Dashboard.is_public());
        assert!(!Route::EditAppointment(1).is_public());
    }

    #[tokio::test]
    async fn subscribers_see_moves() {
        let navigator = Navigator::new(Route::Login);
        let mut rx = navigator.subscribe();
        navigator.navigate(Route::Patients);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Route::Patients);
        assert_eq!(navigator.current(), Route::Patients);
    }
}
