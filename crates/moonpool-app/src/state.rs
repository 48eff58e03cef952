//! Shared request state.
//!
//! One hoop installs everything a handler needs from the environment: the
//! database pool (as a [`DbProvider`] trait object) and the loaded settings.

use std::sync::Arc;

use salvo::async_trait;

use moonpool_core::config::Settings;
use moonpool_core::error::CoreError;
use moonpool_db::db::DbProvider;

use crate::error::AppResult;

/// Middleware that places the pool and settings into every request depot.
pub struct StateHandler<T: DbProvider + Send + Sync + Clone> {
    provider: T,
    settings: Arc<Settings>,
}

impl<T: DbProvider + Send + Sync + Clone> StateHandler<T> {
    #[must_use]
    pub fn new(provider: T, settings: Settings) -> Self {
        Self {
            provider,
            settings: Arc::new(settings),
        }
    }
}

#[async_trait]
impl<T: DbProvider + Send + Sync + Clone + 'static> salvo::Handler for StateHandler<T> {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        let provider: Arc<dyn DbProvider + Send + Sync> = Arc::new(self.provider.clone());
        depot.inject(provider);
        depot.inject(Arc::clone(&self.settings));
    }
}

/// ## Summary
/// Retrieves the database provider from the depot.
///
/// ## Errors
/// Returns an error if the database provider is not found in the depot.
pub fn get_db_from_depot(
    depot: &salvo::Depot,
) -> AppResult<Arc<dyn DbProvider + Send + Sync + 'static>> {
    depot
        .obtain::<Arc<dyn DbProvider + Send + Sync>>()
        .cloned()
        .map_err(|_err| {
            CoreError::InvariantViolation("Database provider not found in depot").into()
        })
}

/// ## Summary
/// Retrieves the application configuration from the depot.
///
/// ## Errors
/// Returns an error if the configuration is not found in the depot.
pub fn get_config_from_depot(depot: &salvo::Depot) -> AppResult<Arc<Settings>> {
    depot
        .obtain::<Arc<Settings>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Configuration not found in depot").into())
}
