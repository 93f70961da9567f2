//! Platform-agnostic application bootstrap for RoomFinder.
//!
//! Provides `AppConfig` (defaults, config file, environment), `AppState`
//! (service container and lifecycle) and `AppStateBuilder` (adapter injection).

pub mod adapters;
pub mod config;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use roomfinder_core::services::{
    AuthService, BookingService, ContentService, FavoriteService, HostOnboardingService,
    NotificationService, PayoutService, PropertyService, ReviewService, SupportService,
};
use roomfinder_core::{
    AuthSession, BackendRegistry, BookingObserver, BookingSession, BroadcastNotifier, Capability,
    CoreError, CoreResult, InMemoryBackendRegistry, InMemorySessionStore, MarketplaceBackend,
    Notifier, PaymentTask, ServiceContext, SessionStore, create_backend,
};

pub use config::AppConfig;

/// Platform-agnostic application state.
///
/// Holds all services and the `ServiceContext`. Every front end constructs
/// this once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Effective configuration
    pub config: AppConfig,
    /// Service context (backends, session store, notifier)
    pub ctx: Arc<ServiceContext>,
    pub auth_service: AuthService,
    pub property_service: PropertyService,
    pub booking_service: BookingService,
    pub host_onboarding_service: HostOnboardingService,
    pub payout_service: PayoutService,
    pub content_service: ContentService,
    pub support_service: SupportService,
    pub favorite_service: FavoriteService,
    pub review_service: ReviewService,
    pub notification_service: NotificationService,
    /// Parent of every payment polling task started through this state
    root_token: RwLock<CancellationToken>,
    shut_down: AtomicBool,
}

impl AppState {
    /// Restore the stored session, if any.
    ///
    /// Failures are logged and the app starts signed out.
    pub async fn run_startup(&self) -> Option<AuthSession> {
        match self.auth_service.restore().await {
            Ok(Some(session)) => {
                log::info!("Restored session for {}", session.user.id);
                Some(session)
            }
            Ok(None) => {
                log::info!("No stored session");
                None
            }
            Err(e) => {
                log::error!("Failed to restore session: {e}");
                None
            }
        }
    }

    /// Token the current payment tasks hang off.
    pub async fn cancellation_token(&self) -> CancellationToken {
        self.root_token.read().await.clone()
    }

    /// Submit a booking session in the background.
    ///
    /// The task is cancelled by [`sign_out`](Self::sign_out),
    /// [`shutdown`](Self::shutdown) or by dropping the returned handle.
    pub async fn start_booking(
        &self,
        session: BookingSession,
        observer: Arc<dyn BookingObserver>,
    ) -> CoreResult<PaymentTask> {
        if self.is_shut_down() {
            return Err(CoreError::Cancelled);
        }
        let root = self.root_token.read().await;
        Ok(self.booking_service.flow().spawn(session, &root, observer))
    }

    /// Sign out and stop every payment task started for the old session.
    pub async fn sign_out(&self) -> CoreResult<()> {
        {
            let mut root = self.root_token.write().await;
            root.cancel();
            *root = CancellationToken::new();
        }
        self.auth_service.sign_out().await
    }

    /// Stop all background work. Later bookings are refused.
    pub async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.root_token.read().await.cancel();
        log::info!("Application shut down");
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Optional
/// - `config`: defaults to `AppConfig::default()`
/// - `session_store`: defaults to `InMemorySessionStore`
/// - `notifier`: defaults to a `BroadcastNotifier` nobody listens to
/// - `backend_registry`: defaults to `InMemoryBackendRegistry`
/// - `backend`: when at least one is given, the configured backends are
///   not created
pub struct AppStateBuilder {
    config: Option<AppConfig>,
    session_store: Option<Arc<dyn SessionStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    backend_registry: Option<Arc<dyn BackendRegistry>>,
    backends: Vec<Arc<dyn MarketplaceBackend>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: None,
            session_store: None,
            notifier: None,
            backend_registry: None,
            backends: Vec::new(),
        }
    }

    #[must_use]
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    #[must_use]
    pub fn backend_registry(mut self, registry: Arc<dyn BackendRegistry>) -> Self {
        self.backend_registry = Some(registry);
        self
    }

    /// Register a ready-made backend, in preference order.
    #[must_use]
    pub fn backend(mut self, backend: Arc<dyn MarketplaceBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ConfigError` for an invalid configuration and
    /// `CoreError::Backend` when a configured backend cannot be created.
    pub async fn build(self) -> CoreResult<AppState> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let backends = if self.backends.is_empty() {
            config
                .backend_configs()
                .into_iter()
                .map(create_backend)
                .collect::<Result<Vec<_>, _>>()?
        } else {
            self.backends
        };

        let registry = self
            .backend_registry
            .unwrap_or_else(|| Arc::new(InMemoryBackendRegistry::new()));
        for backend in backends {
            registry.register(backend).await;
        }
        if let Some(kind) = config.listings_source {
            registry.prefer(Capability::Listings, kind).await;
            log::info!("Listings served by the {kind} backend");
        }

        let session_store = self
            .session_store
            .unwrap_or_else(|| Arc::new(InMemorySessionStore::new()));
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(BroadcastNotifier::default()));

        let ctx = Arc::new(ServiceContext::new(registry, session_store, notifier));

        Ok(AppState {
            auth_service: AuthService::new(Arc::clone(&ctx)),
            property_service: PropertyService::new(Arc::clone(&ctx)),
            booking_service: BookingService::new(Arc::clone(&ctx), config.polling_policy()),
            host_onboarding_service: HostOnboardingService::new(Arc::clone(&ctx)),
            payout_service: PayoutService::new(Arc::clone(&ctx)),
            content_service: ContentService::new(Arc::clone(&ctx)),
            support_service: SupportService::new(Arc::clone(&ctx)),
            favorite_service: FavoriteService::new(Arc::clone(&ctx)),
            review_service: ReviewService::new(Arc::clone(&ctx)),
            notification_service: NotificationService::new(Arc::clone(&ctx)),
            ctx,
            config,
            root_token: RwLock::new(CancellationToken::new()),
            shut_down: AtomicBool::new(false),
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
