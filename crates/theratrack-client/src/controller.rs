//! # Resource Controller
//!
//! The handle half of a controller. Pages hold a [`ResourceController<T>`] and
//! call it; the matching [`ControllerActor`](crate::ControllerActor) does the
//! work.

use crate::error::ControllerError;
use crate::message::{ControllerRequest, Response, Snapshot};
use crate::resource::{PageCursor, Resource};
use tokio::sync::{mpsc, oneshot};

/// ## ResourceController
///
/// Type-safe async API onto one resource collection. It forwards requests over
/// a Tokio mpsc channel and receives results over oneshot channels.
///
/// * **Cloneable**: holds only a sender, so clones are cheap and can be moved
///   into tasks (see [`ConfirmationGate::confirm`](crate::ConfirmationGate::confirm)).
/// * **Fails closed**: once the actor is gone every call returns
///   [`ControllerError::Closed`] or [`ControllerError::Dropped`].
#[derive(Clone)]
pub struct ResourceController<T: Resource> {
    sender: mpsc::Sender<ControllerRequest<T>>,
}

impl<T: Resource> ResourceController<T> {
    pub fn new(sender: mpsc::Sender<ControllerRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ControllerRequest<T>,
    ) -> Result<R, ControllerError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| ControllerError::Closed)?;
        response.await.map_err(|_| ControllerError::Dropped)?
    }

    /// Replaces the collection with page `page` of size `size`.
    ///
    /// Unpaginated resources ignore both and load everything. On failure the
    /// previous collection stays in place. A zero `size` is rejected before
    /// anything is sent.
    pub async fn load(&self, page: u32, size: u32) -> Result<PageCursor, ControllerError> {
        if size == 0 {
            return Err(ControllerError::InvalidPageSize);
        }
        self.request(|respond_to| ControllerRequest::Load {
            page,
            size,
            respond_to,
        })
        .await
    }

    pub async fn get(&self, id: T::Id) -> Result<T, ControllerError> {
        self.request(|respond_to| ControllerRequest::Get { id, respond_to })
            .await
    }

    /// Creates an item remotely and appends the server's copy locally.
    pub async fn create(&self, params: T::Create) -> Result<T, ControllerError> {
        self.request(|respond_to| ControllerRequest::Create { params, respond_to })
            .await
    }

    /// Updates an item remotely, then shallow-merges `update` into the local copy.
    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<(), ControllerError> {
        self.request(|respond_to| ControllerRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    /// Deletes an item remotely and drops it locally.
    pub async fn remove(&self, id: T::Id) -> Result<(), ControllerError> {
        self.request(|respond_to| ControllerRequest::Remove { id, respond_to })
            .await
    }

    pub async fn snapshot(&self) -> Result<Snapshot<T>, ControllerError> {
        self.request(|respond_to| ControllerRequest::Snapshot { respond_to })
            .await
    }

    pub async fn items(&self) -> Result<Vec<T>, ControllerError> {
        Ok(self.snapshot().await?.items)
    }

    /// Stops the actor. Responses still in flight are discarded.
    pub async fn teardown(&self) {
        let _ = self.sender.send(ControllerRequest::Teardown).await;
    }

    /// False once the actor has stopped.
    pub fn is_alive(&self) -> bool {
        !self.sender.is_closed()
    }
}

impl<T: Resource> std::fmt::Debug for ResourceController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceController")
            .field("resource", &T::LABEL_PLURAL)
            .field("alive", &self.is_alive())
            .finish()
    }
}
