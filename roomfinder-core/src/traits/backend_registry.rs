//! Backend registry abstract Trait

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use roomfinder_backend::{BackendKind, Capability, MarketplaceBackend};

/// Backend Registry Trait
///
/// Holds the registered backends in preference order and routes each
/// [`Capability`] to one of them.
#[async_trait]
pub trait BackendRegistry: Send + Sync {
    /// Register a backend
    ///
    /// Appended after the existing ones; a backend of the same kind is
    /// replaced in place and keeps its position.
    async fn register(&self, backend: Arc<dyn MarketplaceBackend>);

    /// Remove the backend of the given kind
    async fn unregister(&self, kind: BackendKind);

    /// Route `capability` to a specific backend kind instead of the first match
    async fn prefer(&self, capability: Capability, kind: BackendKind);

    /// Backend serving `capability`
    ///
    /// The preferred kind when one is set and it advertises the capability,
    /// otherwise the first registered backend that does.
    async fn resolve(&self, capability: Capability) -> Option<Arc<dyn MarketplaceBackend>>;

    /// All registered backends, in preference order
    async fn all(&self) -> Vec<Arc<dyn MarketplaceBackend>>;
}

#[derive(Default)]
struct Routing {
    backends: Vec<Arc<dyn MarketplaceBackend>>,
    preferred: HashMap<Capability, BackendKind>,
}

/// In-memory backend registry
#[derive(Clone, Default)]
pub struct InMemoryBackendRegistry {
    inner: Arc<RwLock<Routing>>,
}

impl InMemoryBackendRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry already holding `backends`, first one preferred
    #[must_use]
    pub fn with_backends(backends: Vec<Arc<dyn MarketplaceBackend>>) -> Self {
        let mut routing = Routing::default();
        for backend in backends {
            let kind = backend.metadata().kind;
            routing.backends.retain(|b| b.metadata().kind != kind);
            routing.backends.push(backend);
        }
        Self {
            inner: Arc::new(RwLock::new(routing)),
        }
    }
}

#[async_trait]
impl BackendRegistry for InMemoryBackendRegistry {
    async fn register(&self, backend: Arc<dyn MarketplaceBackend>) {
        let kind = backend.metadata().kind;
        let mut routing = self.inner.write().await;
        if let Some(slot) = routing
            .backends
            .iter_mut()
            .find(|b| b.metadata().kind == kind)
        {
            *slot = backend;
        } else {
            routing.backends.push(backend);
        }
        log::debug!("Registered {kind} backend");
    }

    async fn unregister(&self, kind: BackendKind) {
        self.inner
            .write()
            .await
            .backends
            .retain(|b| b.metadata().kind != kind);
    }

    async fn prefer(&self, capability: Capability, kind: BackendKind) {
        self.inner.write().await.preferred.insert(capability, kind);
    }

    async fn resolve(&self, capability: Capability) -> Option<Arc<dyn MarketplaceBackend>> {
        let routing = self.inner.read().await;
        let supports = |b: &&Arc<dyn MarketplaceBackend>| b.metadata().supports(capability);

        if let Some(kind) = routing.preferred.get(&capability) {
            if let Some(backend) = routing
                .backends
                .iter()
                .filter(supports)
                .find(|b| b.metadata().kind == *kind)
            {
                return Some(Arc::clone(backend));
            }
        }
        routing.backends.iter().find(supports).cloned()
    }

    async fn all(&self) -> Vec<Arc<dyn MarketplaceBackend>> {
        self.inner.read().await.backends.clone()
    }
}
