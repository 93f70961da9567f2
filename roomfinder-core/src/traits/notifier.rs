//! Toast notifications

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Toast severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A transient user-facing message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Toast {
    pub id: String,
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    #[must_use]
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            level,
            message: message.into(),
        }
    }
}

/// Toast sink
///
/// The front end decides how toasts are shown; services only emit them.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);

    fn success(&self, message: &str) {
        self.notify(Toast::new(ToastLevel::Success, message));
    }

    fn info(&self, message: &str) {
        self.notify(Toast::new(ToastLevel::Info, message));
    }

    fn error(&self, message: &str) {
        self.notify(Toast::new(ToastLevel::Error, message));
    }
}

/// Fan-out notifier over a `tokio` broadcast channel.
///
/// Toasts sent while nobody is subscribed are dropped.
#[derive(Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Toast>,
}

impl BroadcastNotifier {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(32)
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, toast: Toast) {
        log::debug!("Toast [{:?}] {}", toast.level, toast.message);
        // Err only means no subscriber
        let _ = self.tx.send(toast);
    }
}
