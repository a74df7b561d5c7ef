//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::CustomerStore;
use crate::services::RegistrationService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and gives handlers the
/// configuration, the customer store and the registration service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: Arc<dyn CustomerStore>,
    registration: RegistrationService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `store` - Customer store (`PostgreSQL` or in-memory)
    #[must_use]
    pub fn new(config: ServerConfig, store: Arc<dyn CustomerStore>) -> Self {
        let registration = RegistrationService::from_config(Arc::clone(&store), &config.database);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                registration,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the customer store.
    #[must_use]
    pub fn store(&self) -> &dyn CustomerStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the registration service.
    #[must_use]
    pub fn registration(&self) -> &RegistrationService {
        &self.inner.registration
    }
}
