//! # ScreenClient Trait
//!
//! Common interface for the per-resource clients behind each list screen. An
//! implementor provides its controller, its delete gate and an error mapping;
//! loading, CRUD and the two-step delete come for free.
use crate::{ConfirmationGate, ControllerError, PageCursor, Resource, ResourceController};
use async_trait::async_trait;
use tokio::task::JoinHandle;

/// Trait for resource-specific screen clients.
///
/// # Example
///
/// ```rust
/// use theratrack_client::{ConfirmationGate, ControllerError, Resource, ResourceController, ScreenClient};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Room { id: u32, name: String }
///
/// impl Resource for Room {
///     type Id = u32;
///     type Create = Room;
///     type Update = Room;
///     const ENDPOINT: &'static str = "/rooms";
///     const LABEL: &'static str = "room";
///     const LABEL_PLURAL: &'static str = "rooms";
///     fn id(&self) -> u32 { self.id }
/// }
///
/// struct RoomClient {
///     inner: ResourceController<Room>,
///     gate: ConfirmationGate<Room>,
/// }
///
/// impl ScreenClient<Room> for RoomClient {
///     type Error = ControllerError;
///
///     fn controller(&self) -> &ResourceController<Room> { &self.inner }
///     fn gate(&self) -> &ConfirmationGate<Room> { &self.gate }
///     fn gate_mut(&mut self) -> &mut ConfirmationGate<Room> { &mut self.gate }
///     fn map_error(e: ControllerError) -> Self::Error { e }
/// }
///
/// async fn usage(mut rooms: RoomClient) {
///     // load(), request_delete() and confirm_delete() are provided.
///     let _ = rooms.load(0, 10).await;
///     rooms.request_delete(4);
///     if let Some(task) = rooms.confirm_delete() {
///         let _ = task.await;
///     }
/// }
/// ```
#[async_trait]
pub trait ScreenClient<T: Resource>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    fn controller(&self) -> &ResourceController<T>;

    fn gate(&self) -> &ConfirmationGate<T>;

    fn gate_mut(&mut self) -> &mut ConfirmationGate<T>;

    /// Map controller errors to the resource error type.
    fn map_error(e: ControllerError) -> Self::Error;

    #[tracing::instrument(skip(self), fields(resource = T::LABEL_PLURAL))]
    async fn load(&self, page: u32, size: u32) -> Result<PageCursor, Self::Error> {
        tracing::debug!("Sending request");
        self.controller().load(page, size).await.map_err(Self::map_error)
    }

    async fn items(&self) -> Result<Vec<T>, Self::Error> {
        self.controller().items().await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch(&self, id: T::Id) -> Result<T, Self::Error> {
        tracing::debug!("Sending request");
        self.controller().get(id).await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self, params), fields(resource = T::LABEL_PLURAL))]
    async fn create(&self, params: T::Create) -> Result<T, Self::Error> {
        tracing::debug!(?params, "Sending request");
        self.controller().create(params).await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self, update))]
    async fn update(&self, id: T::Id, update: T::Update) -> Result<(), Self::Error> {
        tracing::debug!(?update, "Sending request");
        self.controller()
            .update(id, update)
            .await
            .map_err(Self::map_error)
    }

    /// Opens the delete gate on `id`.
    fn request_delete(&mut self, id: T::Id) {
        self.gate_mut().open(id);
    }

    fn cancel_delete(&mut self) {
        self.gate_mut().close();
    }

    /// Confirms the pending delete. See [`ConfirmationGate::confirm`].
    fn confirm_delete(&mut self) -> Option<JoinHandle<Result<(), ControllerError>>> {
        let controller = self.controller().clone();
        self.gate_mut().confirm(&controller)
    }
}
