//! Application state shared across requests

use std::sync::Arc;

use crate::{
    config::Config,
    dispatcher::Dispatcher,
    error::{Error, Result},
    listing::ProductCatalog,
    persistence::{PgStore, Store},
    routes,
};

/// Shared state handed to every request
///
/// Cloning is cheap; every member sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: Arc<dyn Store>,
    dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Build state over an existing store
    ///
    /// Registers the API route table; fails only if a route template is
    /// malformed.
    pub fn new(config: Config, store: Arc<dyn Store>) -> Result<Self> {
        let routes = routes::api_routes()?;
        let dispatcher = Dispatcher::new(routes, config.api.prefix.clone());

        tracing::debug!(routes = dispatcher.routes().len(), prefix = %config.api.prefix, "Route table built");

        Ok(Self {
            config: Arc::new(config),
            store,
            dispatcher: Arc::new(dispatcher),
        })
    }

    /// Connect to PostgreSQL using `database` from the configuration
    pub async fn connect(config: Config) -> Result<Self> {
        let Some(database) = config.database.as_ref() else {
            return Err(Error::Config(Box::new(figment::Error::from(
                "missing `database.url`".to_string(),
            ))));
        };

        let store = PgStore::connect(database).await?;
        Self::new(config, Arc::new(store))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Catalog view over the shared store
    pub fn catalog(&self) -> ProductCatalog {
        ProductCatalog::new(Arc::clone(&self.store), self.config.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::recording::RecordingStore;

    #[test]
    fn test_new_registers_routes() {
        let state = AppState::new(Config::default(), Arc::new(RecordingStore::empty())).unwrap();
        assert!(!state.dispatcher().routes().is_empty());
        assert_eq!(state.dispatcher().prefix(), "/api");
    }

    #[tokio::test]
    async fn test_connect_requires_database() {
        let config = Config {
            database: None,
            ..Config::default()
        };
        let err = AppState::connect(config).await.err().unwrap();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("database.url"));
    }
}
