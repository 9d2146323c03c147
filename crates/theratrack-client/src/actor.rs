//! # Controller Actor
//!
//! [`ControllerActor`] is the server half of a resource controller. It owns the
//! collection and cursor of one screen and is the only code that mutates them,
//! so no locks are involved.
//!
//! Network calls never block the loop. Each request spawns a task that performs
//! the call and posts a completion back to the actor; the actor applies
//! completions in arrival order. Two overlapping loads are therefore applied in
//! the order their responses arrive, and a stale page can overwrite a newer one.
//!
//! Once the actor stops (teardown, or every handle dropped) its completion
//! mailbox is gone and late responses are discarded instead of applied.

use crate::api::ApiClient;
use crate::controller::ResourceController;
use crate::error::{ApiError, ControllerError};
use crate::message::{Completion, ControllerRequest, Snapshot};
use crate::notification::NotificationCenter;
use crate::resource::{title_case, ListPayload, PageCursor, Resource};
use std::ops::ControlFlow;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Shown when a mutation got no response at all.
pub const NETWORK_FAILURE_MESSAGE: &str = "Unable to reach the server. Please try again later.";

/// Dependencies injected into [`ControllerActor::run`].
#[derive(Clone, Debug)]
pub struct ControllerContext {
    pub api: ApiClient,
    pub notifications: NotificationCenter,
}

/// The actor that manages one resource collection.
///
/// # Usage Pattern
///
/// 1. **Create**: [`ControllerActor::new`] returns the actor and its handle.
/// 2. **Wire & Run**: spawn `actor.run(context)` with the client and the
///    page's notification center.
/// 3. **Use**: call the handle from the page.
///
/// ```rust,ignore
/// let (actor, patients) = ControllerActor::<Patient>::new(32);
/// tokio::spawn(actor.run(ControllerContext { api, notifications }));
/// patients.load(0, 10).await?;
/// ```
pub struct ControllerActor<T: Resource> {
    receiver: mpsc::Receiver<ControllerRequest<T>>,
    completion_tx: mpsc::UnboundedSender<Completion<T>>,
    completions: mpsc::UnboundedReceiver<Completion<T>>,
    items: Vec<T>,
    cursor: PageCursor,
    loaded: bool,
}

impl<T: Resource> ControllerActor<T> {
    /// Creates the actor and a handle onto it.
    ///
    /// `buffer_size` bounds the request channel; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceController<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (completion_tx, completions) = mpsc::unbounded_channel();
        let actor = Self {
            receiver,
            completion_tx,
            completions,
            items: Vec::new(),
            cursor: PageCursor::default(),
            loaded: false,
        };
        (actor, ResourceController::new(sender))
    }

    /// Runs the event loop until teardown or until every handle is dropped.
    pub async fn run(mut self, context: ControllerContext) {
        let resource = T::LABEL_PLURAL;
        info!(resource, "Controller started");

        loop {
            tokio::select! {
                request = self.receiver.recv() => {
                    let Some(request) = request else { break };
                    if self.handle(request, &context).is_break() {
                        break;
                    }
                }
                Some(done) = self.completions.recv() => self.complete(done, &context),
            }
        }

        info!(resource, size = self.items.len(), "Controller stopped");
    }

    fn snapshot(&self) -> Snapshot<T> {
        Snapshot {
            items: self.items.clone(),
            cursor: self.cursor,
            loaded: self.loaded,
        }
    }

    fn handle(&mut self, request: ControllerRequest<T>, ctx: &ControllerContext) -> ControlFlow<()> {
        let resource = T::LABEL_PLURAL;
        let api = ctx.api.clone();
        let tx = self.completion_tx.clone();

        match request {
            ControllerRequest::Load {
                page,
                size,
                respond_to,
            } => {
                debug!(resource, page, size, "Load");
                tokio::spawn(async move {
                    let result = fetch_page::<T>(&api, page, size).await;
                    deliver(
                        &tx,
                        Completion::Loaded {
                            page,
                            size,
                            result,
                            respond_to,
                        },
                    );
                });
            }
            ControllerRequest::Get { id, respond_to } => {
                debug!(resource, %id, "Get");
                tokio::spawn(async move {
                    let result = match api.get(&item_path::<T>(id)).await {
                        Ok(payload) => payload.json::<T>(),
                        Err(e) => Err(e),
                    };
                    deliver(&tx, Completion::Fetched { id, result, respond_to });
                });
            }
            ControllerRequest::Create { params, respond_to } => {
                debug!(resource, ?params, "Create");
                tokio::spawn(async move {
                    let result = match api.post(T::ENDPOINT, &params).await {
                        Ok(payload) => payload.json::<T>(),
                        Err(e) => Err(e),
                    };
                    deliver(&tx, Completion::Created { result, respond_to });
                });
            }
            ControllerRequest::Update {
                id,
                update,
                respond_to,
            } => {
                debug!(resource, %id, ?update, "Update");
                tokio::spawn(async move {
                    let result = api.put(&item_path::<T>(id), &update).await.map(|_| ());
                    deliver(
                        &tx,
                        Completion::Updated {
                            id,
                            update,
                            result,
                            respond_to,
                        },
                    );
                });
            }
            ControllerRequest::Remove { id, respond_to } => {
                debug!(resource, %id, "Remove");
                tokio::spawn(async move {
                    let result = api.delete(&item_path::<T>(id)).await.map(|_| ());
                    deliver(&tx, Completion::Removed { id, result, respond_to });
                });
            }
            ControllerRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(Ok(self.snapshot()));
            }
            ControllerRequest::Teardown => {
                debug!(resource, "Teardown");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn complete(&mut self, done: Completion<T>, ctx: &ControllerContext) {
        let resource = T::LABEL_PLURAL;
        let label = title_case(T::LABEL);
        let notifications = &ctx.notifications;

        match done {
            Completion::Loaded {
                page,
                size,
                result,
                respond_to,
            } => match result {
                Ok(list) => {
                    let (items, cursor) = list.into_parts(page, size);
                    if cursor.total_pages > 0 && cursor.page_index >= cursor.total_pages {
                        // Nothing is stored until the last page itself has arrived
                        let last = cursor.total_pages - 1;
                        warn!(resource, page, total_pages = cursor.total_pages, "Page out of range, reloading last page");
                        let api = ctx.api.clone();
                        let tx = self.completion_tx.clone();
                        tokio::spawn(async move {
                            let result = fetch_page::<T>(&api, last, size).await;
                            deliver(
                                &tx,
                                Completion::Loaded {
                                    page: last,
                                    size,
                                    result,
                                    respond_to,
                                },
                            );
                        });
                        return;
                    }
                    self.items = items;
                    self.cursor = cursor;
                    self.loaded = true;
                    info!(
                        resource,
                        page = cursor.page_index,
                        total_pages = cursor.total_pages,
                        size = self.items.len(),
                        "Loaded"
                    );
                    let _ = respond_to.send(Ok(cursor));
                }
                Err(e) => {
                    warn!(resource, page, error = %e, "Load failed");
                    notifications.error(format!(
                        "Failed to load {}. Please try again later.",
                        T::LABEL_PLURAL
                    ));
                    let _ = respond_to.send(Err(e.into()));
                }
            },
            Completion::Fetched {
                id,
                result,
                respond_to,
            } => {
                if let Err(e) = &result {
                    warn!(resource, %id, error = %e, "Get failed");
                    notifications.error(format!("Failed to load {}.", T::LABEL));
                }
                let _ = respond_to.send(result.map_err(ControllerError::from));
            }
            Completion::Created { result, respond_to } => match result {
                Ok(item) => {
                    self.items.push(item.clone());
                    info!(resource, id = %item.id(), size = self.items.len(), "Created");
                    notifications.success(format!("{label} added successfully!"));
                    let _ = respond_to.send(Ok(item));
                }
                Err(e) => {
                    warn!(resource, error = %e, "Create failed");
                    notifications.error(failure_message(&e, "add", T::LABEL));
                    let _ = respond_to.send(Err(e.into()));
                }
            },
            Completion::Updated {
                id,
                update,
                result,
                respond_to,
            } => match result {
                Ok(()) => {
                    let mut merged = Ok(());
                    if let Some(item) = self.items.iter_mut().find(|item| item.id() == id) {
                        if let Err(e) = item.apply_update(&update) {
                            warn!(resource, %id, error = %e, "Local merge failed");
                            merged = Err(ControllerError::Merge(e.to_string()));
                        }
                    }
                    info!(resource, %id, "Updated");
                    notifications.success(format!("{label} updated successfully!"));
                    let _ = respond_to.send(merged);
                }
                Err(e) => {
                    warn!(resource, %id, error = %e, "Update failed");
                    notifications.error(failure_message(&e, "update", T::LABEL));
                    let _ = respond_to.send(Err(e.into()));
                }
            },
            Completion::Removed {
                id,
                result,
                respond_to,
            } => match result {
                Ok(()) => {
                    self.items.retain(|item| item.id() != id);
                    info!(resource, %id, size = self.items.len(), "Removed");
                    notifications.success(format!("{label} deleted successfully!"));
                    let _ = respond_to.send(Ok(()));
                }
                Err(e) => {
                    warn!(resource, %id, error = %e, "Remove failed");
                    notifications.error(failure_message(&e, "delete", T::LABEL));
                    let _ = respond_to.send(Err(e.into()));
                }
            },
        }
    }
}

fn item_path<T: Resource>(id: T::Id) -> String {
    format!("{}/{}", T::ENDPOINT, id)
}

async fn fetch_page<T: Resource>(
    api: &ApiClient,
    page: u32,
    size: u32,
) -> Result<ListPayload<T>, ApiError> {
    let payload = if T::PAGINATED {
        let query = [("page", page.to_string()), ("size", size.to_string())];
        api.get_with_query(T::ENDPOINT, &query).await?
    } else {
        api.get(T::ENDPOINT).await?
    };
    payload.json()
}

fn failure_message(e: &ApiError, verb: &str, label: &str) -> String {
    if e.is_network() {
        NETWORK_FAILURE_MESSAGE.to_string()
    } else {
        format!("Failed to {verb} {label}.")
    }
}

fn deliver<T: Resource>(tx: &mpsc::UnboundedSender<Completion<T>>, done: Completion<T>) {
    if tx.send(done).is_err() {
        debug!(resource = T::LABEL_PLURAL, "Controller gone, dropping late response");
    }
}
