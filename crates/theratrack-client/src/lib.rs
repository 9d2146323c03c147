//! # TheraTrack Client
//!
//! Building blocks for a client of the TheraTrack clinic backend: an
//! authenticated HTTP client, a durable session store and one generic
//! controller per remote collection, plus the notification and confirmation
//! primitives the list screens need.
//!
//! ## Architecture Overview
//!
//! 1. **Session Layer** ([`SessionStore`]): the bearer token in durable storage.
//! 2. **Wire Layer** ([`ApiClient`] over a [`Transport`]): attaches the token,
//!    turns a 401 into a cleared session plus a [`SessionEvent`].
//! 3. **Runtime Layer** ([`ControllerActor`]): owns one collection and applies
//!    remote results in arrival order.
//! 4. **Interface Layer** ([`ResourceController`], [`ScreenClient`]): the
//!    type-safe handle pages call.
//!
//! ## Concurrency Model
//!
//! - Each controller runs in its own Tokio task and is the sole owner of its
//!   collection. Nothing is shared, so nothing is locked.
//! - Requests are *dispatched* in order but *completed* in arrival order. Two
//!   overlapping loads resolve to whichever response arrived last.
//! - After [`ResourceController::teardown`] late responses are discarded.
//!
//! ## Example
//!
//! ```rust
//! use theratrack_client::mock::MockTransport;
//! use theratrack_client::{
//!     ApiClient, ControllerActor, ControllerContext, Method, NotificationCenter, Resource,
//!     SessionStore,
//! };
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Room { id: u32, name: String }
//!
//! impl Resource for Room {
//!     type Id = u32;
//!     type Create = Room;
//!     type Update = Room;
//!     const ENDPOINT: &'static str = "/rooms";
//!     const LABEL: &'static str = "room";
//!     const LABEL_PLURAL: &'static str = "rooms";
//!     fn id(&self) -> u32 { self.id }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockTransport::new();
//!     mock.expect(Method::GET, "/rooms")
//!         .respond_json(200, &serde_json::json!([{ "id": 1, "name": "Blue" }]));
//!
//!     let api = ApiClient::new("http://clinic.test/api", mock.transport(), SessionStore::in_memory())
//!         .unwrap();
//!     let notifications = NotificationCenter::new();
//!
//!     let (actor, rooms) = ControllerActor::<Room>::new(8);
//!     tokio::spawn(actor.run(ControllerContext { api, notifications }));
//!
//!     rooms.load(0, 10).await.unwrap();
//!     assert_eq!(rooms.items().await.unwrap()[0].name, "Blue");
//! }
//! ```
//!
//! ## Testing
//!
//! [`mock::MockTransport`] scripts server responses in memory, including
//! network failures and delayed responses. See the [`mock`] module.

pub mod actor;
pub mod api;
pub mod client_trait;
pub mod config;
pub mod controller;
pub mod error;
pub mod gate;
pub mod message;
pub mod mock;
pub mod notification;
pub mod resource;
pub mod session;
pub mod tracing;
pub mod transport;

// Re-export core types for convenience
pub use actor::{ControllerActor, ControllerContext, NETWORK_FAILURE_MESSAGE};
pub use api::{ApiClient, Payload, SessionEvent, LOGIN_PATH};
pub use client_trait::ScreenClient;
pub use config::ClientConfig;
pub use controller::ResourceController;
pub use error::{ApiError, ConfigError, ControllerError, StorageError};
pub use gate::{ConfirmationGate, GateState};
pub use message::{ControllerRequest, Response, Snapshot};
pub use notification::{Notification, NotificationCenter, Severity};
pub use reqwest::Method;
pub use resource::{ListPayload, PageCursor, Resource, DEFAULT_PAGE_SIZE};
pub use session::{InMemoryStorage, JsonFileStorage, SessionStore, StorageArea, TOKEN_KEY};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
