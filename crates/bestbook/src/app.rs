//! `Bestbook` builder and application wiring.
//!
//! Ties the layers together: one session store, one sign-out client and
//! one navigator behind a single [`SignoutCoordinator`]. Views mount
//! against the resulting [`Bestbook`].

use std::sync::Arc;

use bestbook_lifecycle::{
    HttpSignoutClient, LifecycleConfig, Navigator, SignoutClient, SignoutCoordinator,
};
use bestbook_session::{MemorySessionStore, Session, SessionStore};
use tracing::info;

use crate::BestbookError;

/// API root used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Builder for the production wiring: in-memory store plus HTTP client.
///
/// # Example
///
/// ```rust,ignore
/// let app = BestbookBuilder::new()
///     .base_url("https://api.bestbook.example")
///     .config(LifecycleConfig::from_json_file("bestbook.json")?)
///     .build(router)?;
/// ```
pub struct BestbookBuilder {
    base_url: String,
    config: LifecycleConfig,
    restored: Option<Session>,
}

impl BestbookBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            config: LifecycleConfig::default(),
            restored: None,
        }
    }

    /// Sets the API root the sign-out path is joined onto.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Sets the lifecycle configuration.
    pub fn config(mut self, config: LifecycleConfig) -> Self {
        self.config = config;
        self
    }

    /// Starts with a session already in the store, e.g. one restored from
    /// persistent storage at startup.
    pub fn restored_session(mut self, session: Session) -> Self {
        self.restored = Some(session);
        self
    }

    /// Builds the app around `navigator`.
    ///
    /// # Errors
    /// [`BestbookError::Lifecycle`] if the HTTP client cannot be built.
    pub fn build<N: Navigator>(
        self,
        navigator: N,
    ) -> Result<Bestbook<MemorySessionStore, HttpSignoutClient, N>, BestbookError> {
        let config = self.config.validated();
        let client = HttpSignoutClient::new(&self.base_url, &config)?;
        info!(endpoint = client.endpoint(), "bestbook client configured");

        let store = Arc::new(MemorySessionStore::with_session(self.restored));
        Ok(Bestbook::with_parts(store, client, navigator, config))
    }
}

impl Default for BestbookBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A wired-up client: the store and the coordinator every view shares.
pub struct Bestbook<S, C, N> {
    coordinator: SignoutCoordinator<S, C, N>,
}

impl<S, C, N> Bestbook<S, C, N>
where
    S: SessionStore,
    C: SignoutClient,
    N: Navigator,
{
    /// Wires arbitrary parts together. [`BestbookBuilder`] covers the
    /// production case.
    pub fn with_parts(store: Arc<S>, client: C, navigator: N, config: LifecycleConfig) -> Self {
        Self {
            coordinator: SignoutCoordinator::new(store, client, navigator, config),
        }
    }

    /// Hands a freshly authenticated session to the store.
    ///
    /// Stands in for the sign-in flow, which lives outside this crate.
    pub fn sign_in(&self, session: Session) {
        self.coordinator.store().set(session);
    }

    pub fn store(&self) -> &Arc<S> {
        self.coordinator.store()
    }

    pub fn coordinator(&self) -> &SignoutCoordinator<S, C, N> {
        &self.coordinator
    }

    pub fn config(&self) -> &LifecycleConfig {
        self.coordinator.config()
    }
}
