//! Side channel for user-visible messages ("toasts").
//!
//! Components never return failures into the render path; whatever the user
//! should hear about goes through a [`Notifier`], and the UI subscribes to it.

use crate::domain::social::Rejection;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Which branch of the error taxonomy a message belongs to. The UI may style
/// these differently; only `Transient` invites a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum NotificationKind {
    /// Bad local input, nothing was sent.
    Validation,
    /// A request failed; local state was rolled back.
    Transient,
    /// Refused by local policy: repeated content or an action already running.
    Duplicate,
    /// Positive confirmation of a completed action.
    Confirmation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Notification {
    pub level: NotificationLevel,
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(Notification {
            level: NotificationLevel::Success,
            kind: NotificationKind::Confirmation,
            message: message.into(),
        });
    }

    pub fn error(&self, kind: NotificationKind, message: impl Into<String>) {
        self.publish(Notification {
            level: NotificationLevel::Error,
            kind,
            message: message.into(),
        });
    }

    /// Reports a local rejection. Missing identity is left to the session's
    /// auth callback and produces no message here.
    pub fn rejection(&self, rejection: Rejection) {
        let kind = match rejection {
            Rejection::AuthRequired => return,
            Rejection::EmptyContent => NotificationKind::Validation,
            Rejection::SubmissionInProgress
            | Rejection::DuplicateContent
            | Rejection::DeletionInProgress => NotificationKind::Duplicate,
        };
        self.error(kind, rejection.to_string());
    }

    fn publish(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Transient => {
                tracing::warn!(message = %notification.message, "notify")
            }
            NotificationKind::Validation | NotificationKind::Duplicate => {
                tracing::debug!(kind = ?notification.kind, message = %notification.message, "notify")
            }
            NotificationKind::Confirmation => {
                tracing::debug!(message = %notification.message, "notify")
            }
        }
        // No subscribers is fine: nobody is rendering toasts.
        let _ = self.tx.send(notification);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(100)
    }
}
