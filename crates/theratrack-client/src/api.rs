//! # Authenticated Client
//!
//! [`ApiClient`] wraps the four HTTP verbs against one base address.
//!
//! - **Request stage**: every call except [`LOGIN_PATH`] reads the
//!   [`SessionStore`] and, when a token is present, sends it as
//!   `Authorization: Bearer <token>`. Without a token the request goes out
//!   unauthenticated and the server rejects it.
//! - **Response stage**: a 401 from any call clears the session and emits
//!   [`SessionEvent::SessionExpired`] *before* the caller receives
//!   [`ApiError::Unauthorized`]. A 401 on the login call emits
//!   [`SessionEvent::LoginRejected`] instead. The hosting shell listens for
//!   the events and decides where to navigate; the client never navigates
//!   itself.
//!
//! One attempt per call. There are no retries and no timeout escalation.

use crate::error::ApiError;
use crate::session::SessionStore;
use crate::transport::{HttpRequest, Transport};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

/// Path of the login call. It never carries a bearer credential.
pub const LOGIN_PATH: &str = "/auth/login";

/// Session lifecycle signals emitted by [`ApiClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A call was answered with 401 and the token was cleared.
    SessionExpired,
    /// The login call itself was answered with 401; no session existed.
    LoginRejected,
    /// [`ApiClient::logout`] cleared the token.
    LoggedOut,
}

/// Raw body of a successful response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload(Vec<u8>);

impl Payload {
    pub fn new(body: Vec<u8>) -> Self {
        Self(body)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decodes the body as JSON.
    pub fn json<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        Ok(serde_json::from_slice(&self.0)?)
    }

    /// The session token carried by a login response: a JSON string, an
    /// object with a `token` field, or the raw body text.
    fn token(&self) -> Option<String> {
        let token = match serde_json::from_slice::<Value>(&self.0) {
            Ok(Value::String(s)) => Some(s),
            Ok(Value::Object(map)) => map.get("token").and_then(Value::as_str).map(str::to_string),
            Ok(_) => None,
            Err(_) => Some(String::from_utf8_lossy(&self.0).trim().to_string()),
        };
        token.filter(|t| !t.is_empty())
    }
}

struct Inner {
    base: Url,
    transport: Arc<dyn Transport>,
    session: SessionStore,
    events: broadcast::Sender<SessionEvent>,
}

/// The authenticated request dispatcher. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl ApiClient {
    /// Creates a client for `base_url` (e.g. `http://localhost:8081/api`).
    ///
    /// The session store is injected rather than global so every test can use
    /// an isolated one.
    pub fn new(
        base_url: &str,
        transport: Arc<dyn Transport>,
        session: SessionStore,
    ) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        let (events, _) = broadcast::channel(16);
        Ok(Self {
            inner: Arc::new(Inner {
                base,
                transport,
                session,
                events,
            }),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Receives every [`SessionEvent`] emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    pub async fn get(&self, path: &str) -> Result<Payload, ApiError> {
        self.dispatch(Method::GET, path, &[], None).await
    }

    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Payload, ApiError> {
        self.dispatch(Method::GET, path, query, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Payload, ApiError> {
        let body = serde_json::to_vec(body)?;
        self.dispatch(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Payload, ApiError> {
        let body = serde_json::to_vec(body)?;
        self.dispatch(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Payload, ApiError> {
        self.dispatch(Method::DELETE, path, &[], None).await
    }

    /// Exchanges credentials for a session token and stores it.
    ///
    /// Any previous token is cleared first, so a failed login always leaves
    /// the client unauthenticated.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        self.inner.session.clear()?;
        let credentials = serde_json::json!({ "username": username, "password": password });
        let payload = self.post(LOGIN_PATH, &credentials).await?;
        let token = payload
            .token()
            .ok_or_else(|| ApiError::Decode("login response carried no token".to_string()))?;
        self.inner.session.set(&token)?;
        info!("Logged in");
        Ok(token)
    }

    /// Clears the session and emits [`SessionEvent::LoggedOut`].
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.inner.session.clear()?;
        let _ = self.inner.events.send(SessionEvent::LoggedOut);
        info!("Logged out");
        Ok(())
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.inner.base.as_str().trim_end_matches('/'), path);
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> Result<Payload, ApiError> {
        let mut request = HttpRequest::new(method, self.url(path, query)?);
        request.body = body;

        let mut authenticated = false;
        if path != LOGIN_PATH {
            if let Some(token) = self.inner.session.get() {
                request
                    .headers
                    .push(("Authorization".to_string(), format!("Bearer {token}")));
                authenticated = true;
            }
        }

        let method = request.method.clone();
        debug!(%method, path, authenticated, "Dispatching request");

        let response = self.inner.transport.execute(request).await.map_err(|e| {
            warn!(%method, path, error = %e, "No response");
            ApiError::Network(e.0)
        })?;

        match response.status {
            200..=299 => {
                debug!(%method, path, status = response.status, "Request ok");
                Ok(Payload(response.body))
            }
            401 if path == LOGIN_PATH => {
                debug!(%method, path, "Credentials rejected");
                self.expire_session(SessionEvent::LoginRejected);
                Err(ApiError::Unauthorized)
            }
            401 => {
                warn!(%method, path, "Unauthorized, tearing down session");
                self.expire_session(SessionEvent::SessionExpired);
                Err(ApiError::Unauthorized)
            }
            status => {
                let body = String::from_utf8_lossy(&response.body).into_owned();
                warn!(%method, path, status, "Request failed");
                Err(ApiError::Server { status, body })
            }
        }
    }

    fn expire_session(&self, event: SessionEvent) {
        if let Err(e) = self.inner.session.clear() {
            warn!(error = %e, "Could not clear session token");
        }
        // No subscribers is fine
        let _ = self.inner.events.send(event);
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.inner.base.as_str())
            .field("session", &self.inner.session)
            .finish()
    }
}
