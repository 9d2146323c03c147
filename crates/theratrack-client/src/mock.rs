//! # Mock Transport & Testing Guide
//!
//! [`MockTransport`] implements [`Transport`] entirely in memory. Tests queue
//! expectations, run real [`ApiClient`](crate::ApiClient)s and
//! [`ResourceController`](crate::ResourceController)s against it, and then
//! inspect the requests that were actually sent.
//!
//! ## When to use the mock vs a real server
//!
//! | Feature | MockTransport | Real server |
//! |---------|---------------|-------------|
//! | **Speed** | Instant (in-memory) | Network bound |
//! | **Determinism** | Responses are scripted | Depends on server state |
//! | **Error Injection** | Easy (`respond_status`, `fail_network`) | Hard |
//! | **Ordering** | `hold_until` delays a response on demand | Not controllable |
//!
//! ## Example
//!
//! ```rust
//! use theratrack_client::mock::MockTransport;
//! use theratrack_client::{ApiClient, SessionStore};
//! use reqwest::Method;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockTransport::new();
//!     mock.expect(Method::GET, "/patients")
//!         .respond_json(200, &serde_json::json!([{ "id": 1 }]));
//!
//!     let api = ApiClient::new("http://clinic.test/api", mock.transport(), SessionStore::in_memory())
//!         .unwrap();
//!     let payload = api.get("/patients").await.unwrap();
//!     let items: Vec<serde_json::Value> = payload.json().unwrap();
//!     assert_eq!(items.len(), 1);
//!
//!     mock.verify(); // every expectation was consumed
//! }
//! ```
//!
//! ## Matching
//!
//! An expectation matches the first request with the same method whose path
//! and query *end with* the expected path, so the base path (`/api`) can be
//! left out. Expectations are consumed once. A request with no matching
//! expectation panics.

use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;

enum Reply {
    Respond(HttpResponse),
    NetworkFailure,
}

struct Expectation {
    method: Method,
    path: String,
    reply: Reply,
    hold: Option<oneshot::Receiver<()>>,
}

#[derive(Default)]
struct MockState {
    expectations: Vec<Expectation>,
    requests: Vec<HttpRequest>,
}

/// Scripted in-memory transport. Clones share expectations and history.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

fn lock(state: &Mutex<MockState>) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mock as a shareable transport handle.
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::new(self.clone())
    }

    /// Expects a request with `method` whose path (and query) ends with `path`.
    pub fn expect(&self, method: Method, path: &str) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            path: path.to_string(),
            hold: None,
            state: self.state.clone(),
        }
    }

    /// Every request received so far, in dispatch order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.state).requests.clone()
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let state = lock(&self.state);
        if !state.expectations.is_empty() {
            let pending: Vec<String> = state
                .expectations
                .iter()
                .map(|e| format!("{} {}", e.method, e.path))
                .collect();
            panic!(
                "Not all expectations were met. {} remaining: {:?}",
                pending.len(),
                pending
            );
        }
    }
}

/// Builder returned by [`MockTransport::expect`]. Finish it with one of the
/// `respond_*` methods or [`fail_network`](Self::fail_network).
pub struct ExpectationBuilder {
    method: Method,
    path: String,
    hold: Option<oneshot::Receiver<()>>,
    state: Arc<Mutex<MockState>>,
}

impl ExpectationBuilder {
    /// Delays the response until `release` fires (or its sender is dropped).
    pub fn hold_until(mut self, release: oneshot::Receiver<()>) -> Self {
        self.hold = Some(release);
        self
    }

    /// Responds with `status` and `body` serialized as JSON.
    pub fn respond_json<V: Serialize + ?Sized>(self, status: u16, body: &V) {
        let body = serde_json::to_vec(body).unwrap_or_default();
        self.respond_raw(status, body);
    }

    /// Responds with `status` and a plain text body.
    pub fn respond_status(self, status: u16, body: &str) {
        self.respond_raw(status, body.as_bytes().to_vec());
    }

    pub fn respond_raw(self, status: u16, body: Vec<u8>) {
        self.push(Reply::Respond(HttpResponse { status, body }));
    }

    /// No response at all.
    pub fn fail_network(self) {
        self.push(Reply::NetworkFailure);
    }

    fn push(self, reply: Reply) {
        lock(&self.state).expectations.push(Expectation {
            method: self.method,
            path: self.path,
            reply,
            hold: self.hold,
        });
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let target = request.path_and_query();
        let method = request.method.clone();

        let (reply, hold) = {
            let mut state = lock(&self.state);
            state.requests.push(request);
            let position = state
                .expectations
                .iter()
                .position(|e| e.method == method && target.ends_with(&e.path));
            match position {
                Some(i) => {
                    let e = state.expectations.remove(i);
                    (e.reply, e.hold)
                }
                None => panic!("Unexpected request: {method} {target}"),
            }
        };

        if let Some(release) = hold {
            let _ = release.await;
        }

        match reply {
            Reply::Respond(response) => Ok(response),
            Reply::NetworkFailure => Err(TransportError("connection refused".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Url;

    fn request(method: Method, url: &str) -> HttpRequest {
        HttpRequest::new(method, Url::parse(url).unwrap())
    }

    #[tokio::test]
    async fn matches_by_method_and_path_suffix() {
        let mock = MockTransport::new();
        mock.expect(Method::GET, "/patients/5").respond_status(404, "missing");
        mock.expect(Method::GET, "/patients").respond_json(200, &serde_json::json!([]));

        let list = mock
            .execute(request(Method::GET, "http://h/api/patients"))
            .await
            .unwrap();
        assert_eq!(list.body, b"[]".to_vec());

        let single = mock
            .execute(request(Method::GET, "http://h/api/patients/5"))
            .await
            .unwrap();
        assert_eq!(single.status, 404);

        assert_eq!(mock.requests().len(), 2);
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn verify_panics_on_leftovers() {
        let mock = MockTransport::new();
        mock.expect(Method::DELETE, "/therapists/7").respond_status(204, "");
        mock.verify();
    }

    #[tokio::test]
    async fn network_failure_is_a_transport_error() {
        let mock = MockTransport::new();
        mock.expect(Method::GET, "/dashboard").fail_network();
        let err = mock
            .execute(request(Method::GET, "http://h/api/dashboard"))
            .await
            .unwrap_err();
        assert_eq!(err.0, "connection refused");
    }
}
