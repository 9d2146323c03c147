//! # Confirmation Gate
//!
//! Two-step deletion: a page opens the gate on a target, the user confirms or
//! cancels. Confirming closes the gate *before* the removal runs, so the gate
//! ends up closed whatever the server answers.

use crate::controller::ResourceController;
use crate::error::ControllerError;
use crate::resource::Resource;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState<Id> {
    Closed,
    Open(Id),
}

#[derive(Debug)]
pub struct ConfirmationGate<T: Resource> {
    state: GateState<T::Id>,
}

impl<T: Resource> Default for ConfirmationGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> ConfirmationGate<T> {
    pub fn new() -> Self {
        Self {
            state: GateState::Closed,
        }
    }

    pub fn state(&self) -> GateState<T::Id> {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, GateState::Open(_))
    }

    /// The id awaiting confirmation.
    pub fn target(&self) -> Option<T::Id> {
        match self.state {
            GateState::Open(id) => Some(id),
            GateState::Closed => None,
        }
    }

    /// Opens the gate on `id`, replacing any previous target.
    pub fn open(&mut self, id: T::Id) {
        debug!(resource = T::LABEL_PLURAL, %id, "Deletion requested");
        self.state = GateState::Open(id);
    }

    pub fn close(&mut self) {
        self.state = GateState::Closed;
    }

    /// Closes the gate and starts removing the target.
    ///
    /// Returns the removal task, or `None` when the gate was already closed.
    pub fn confirm(
        &mut self,
        controller: &ResourceController<T>,
    ) -> Option<JoinHandle<Result<(), ControllerError>>> {
        let GateState::Open(id) = std::mem::replace(&mut self.state, GateState::Closed) else {
            return None;
        };
        debug!(resource = T::LABEL_PLURAL, %id, "Deletion confirmed");
        let controller = controller.clone();
        Some(tokio::spawn(async move { controller.remove(id).await }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ControllerRequest;
    use serde::{Deserialize, Serialize};
    use tokio::sync::mpsc;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Room {
        id: u32,
    }

    impl Resource for Room {
        type Id = u32;
        type Create = Room;
        type Update = Room;
        const ENDPOINT: &'static str = "/rooms";
        const LABEL: &'static str = "room";
        const LABEL_PLURAL: &'static str = "rooms";

        fn id(&self) -> u32 {
            self.id
        }
    }

    #[test]
    fn open_replaces_target_and_cancel_closes() {
        let mut gate = ConfirmationGate::<Room>::new();
        assert_eq!(gate.state(), GateState::Closed);

        gate.open(3);
        gate.open(8);
        assert_eq!(gate.target(), Some(8));

        gate.close();
        assert!(!gate.is_open());
    }

    #[tokio::test]
    async fn confirm_on_closed_gate_sends_nothing() {
        let (tx, mut rx) = mpsc::channel(4);
        let controller = ResourceController::<Room>::new(tx);
        let mut gate = ConfirmationGate::<Room>::new();

        assert!(gate.confirm(&controller).is_none());
        drop(controller);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn confirm_closes_before_removal_finishes() {
        let (tx, mut rx) = mpsc::channel(4);
        let controller = ResourceController::<Room>::new(tx);
        let mut gate = ConfirmationGate::<Room>::new();
        gate.open(5);

        let task = gate.confirm(&controller).unwrap();
        assert_eq!(gate.state(), GateState::Closed);

        match rx.recv().await {
            Some(ControllerRequest::Remove { id, respond_to }) => {
                assert_eq!(id, 5);
                let _ = respond_to.send(Err(ControllerError::Closed));
            }
            other => panic!("expected Remove, got {other:?}"),
        }
        assert_eq!(task.await.unwrap(), Err(ControllerError::Closed));
        assert_eq!(gate.state(), GateState::Closed);
    }
}
