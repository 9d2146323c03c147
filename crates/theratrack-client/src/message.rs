//! # Controller Messages
//!
//! Requests travel from a [`ResourceController`](crate::ResourceController)
//! handle to its [`ControllerActor`](crate::ControllerActor). Network results
//! come back to the actor as [`Completion`]s, in the order they *arrive*.

use crate::error::{ApiError, ControllerError};
use crate::resource::{ListPayload, PageCursor, Resource};
use tokio::sync::oneshot;

/// One-shot response channel back to the caller.
pub type Response<T> = oneshot::Sender<Result<T, ControllerError>>;

/// Copy of a controller's collection and cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub items: Vec<T>,
    pub cursor: PageCursor,
    /// False until the first successful load.
    pub loaded: bool,
}

/// Operations a screen can ask of its controller.
///
/// - **Load**: replace the collection with one page.
/// - **Get**: fetch one item without touching the collection.
/// - **Create** / **Update** / **Remove**: remote mutation, then local
///   mutation once the server acknowledged.
/// - **Snapshot**: read the current state.
/// - **Teardown**: stop; responses still in flight are dropped.
#[derive(Debug)]
pub enum ControllerRequest<T: Resource> {
    Load {
        page: u32,
        size: u32,
        respond_to: Response<PageCursor>,
    },
    Get {
        id: T::Id,
        respond_to: Response<T>,
    },
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<()>,
    },
    Remove {
        id: T::Id,
        respond_to: Response<()>,
    },
    Snapshot {
        respond_to: Response<Snapshot<T>>,
    },
    Teardown,
}

/// Outcome of a remote call, fed back into the actor's mailbox.
pub(crate) enum Completion<T: Resource> {
    Loaded {
        page: u32,
        size: u32,
        result: Result<ListPayload<T>, ApiError>,
        respond_to: Response<PageCursor>,
    },
    Fetched {
        id: T::Id,
        result: Result<T, ApiError>,
        respond_to: Response<T>,
    },
    Created {
        result: Result<T, ApiError>,
        respond_to: Response<T>,
    },
    Updated {
        id: T::Id,
        update: T::Update,
        result: Result<(), ApiError>,
        respond_to: Response<()>,
    },
    Removed {
        id: T::Id,
        result: Result<(), ApiError>,
        respond_to: Response<()>,
    },
}
