//! # Notification Center
//!
//! A single-slot feedback channel. [`NotificationCenter::show`] overwrites the
//! slot; nothing is queued, so a message that has not been seen yet is lost
//! when another arrives. [`NotificationCenter::dismiss`] hides the slot but
//! keeps its message and severity until the next `show`.
//!
//! The slot is a `tokio::sync::watch` channel, so a renderer can
//! [`subscribe`](NotificationCenter::subscribe) and wake on every change.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

/// Current content of the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub visible: bool,
}

impl Default for Notification {
    fn default() -> Self {
        Self {
            message: String::new(),
            severity: Severity::Info,
            visible: false,
        }
    }
}

/// Handle onto one notification slot. Clones share the slot.
#[derive(Clone)]
pub struct NotificationCenter {
    slot: Arc<watch::Sender<Notification>>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(Notification::default());
        Self {
            slot: Arc::new(slot),
        }
    }

    /// Replaces whatever is shown and makes it visible.
    pub fn show(&self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        debug!(?severity, %message, "Notification");
        self.slot.send_replace(Notification {
            message,
            severity,
            visible: true,
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, Severity::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, Severity::Error);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(message, Severity::Info);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.show(message, Severity::Warning);
    }

    /// Hides the notification, keeping its last message and severity.
    pub fn dismiss(&self) {
        self.slot.send_modify(|n| n.visible = false);
    }

    pub fn current(&self) -> Notification {
        self.slot.borrow().clone()
    }

    /// The visible notification, if any.
    pub fn visible(&self) -> Option<Notification> {
        let current = self.slot.borrow();
        current.visible.then(|| current.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<Notification> {
        self.slot.subscribe()
    }
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("NotificationCenter")
            .field(&*self.slot.borrow())
            .finish()
    }
}
