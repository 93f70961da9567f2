//! Injected service abstractions: backend routing, session storage, toasts

mod backend_registry;
mod notifier;
mod session_store;

pub use backend_registry::{BackendRegistry, InMemoryBackendRegistry};
pub use notifier::{BroadcastNotifier, Notifier, Toast, ToastLevel};
pub use session_store::{InMemorySessionStore, SessionStore};
