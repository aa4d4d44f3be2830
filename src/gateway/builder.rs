//! Builder for configuring gateway instances

use std::sync::Arc;
use std::time::Duration;

use super::DiagnosticGateway;
use crate::cache::{CacheConfig, CacheStore, MemoryCacheStore};
use crate::catalog::{ProductCatalog, StaticCatalog};
use crate::providers::{
    CompletionClient, Credentials, DEFAULT_ATTEMPT_TIMEOUT, ModelCascade, OpenAiCompatibleClient,
    ProviderProfile, ProviderSelector,
};
use crate::{Result, VetgateError};

/// Main entry point for creating gateway instances.
pub struct Vetgate;

impl Vetgate {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> VetgateBuilder {
        VetgateBuilder::new()
    }
}

/// Builder for configuring gateway instances.
///
/// Credentials are optional at build time: a gateway without any can
/// still serve cache hits, and fails a miss with
/// [`VetgateError::ProviderConfigMissing`].
pub struct VetgateBuilder {
    credentials: Credentials,
    primary: ProviderProfile,
    secondary: ProviderProfile,
    attempt_timeout: Duration,
    cache_config: CacheConfig,
    store: Option<Arc<dyn CacheStore>>,
    catalog: Option<Arc<dyn ProductCatalog>>,
    client: Option<Arc<dyn CompletionClient>>,
}

impl VetgateBuilder {
    pub fn new() -> Self {
        Self {
            credentials: Credentials::default(),
            primary: ProviderProfile::default_primary(),
            secondary: ProviderProfile::default_secondary(),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            cache_config: CacheConfig::default(),
            store: None,
            catalog: None,
            client: None,
        }
    }

    /// API key for the primary (cascading) provider.
    pub fn primary(mut self, api_key: impl Into<String>) -> Self {
        self.credentials.primary = Some(api_key.into());
        self
    }

    /// API key for the secondary (single-model) provider.
    pub fn secondary(mut self, api_key: impl Into<String>) -> Self {
        self.credentials.secondary = Some(api_key.into());
        self
    }

    /// Replace both credentials at once.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Override the primary provider's name, base URL and cascade.
    pub fn primary_profile(mut self, profile: ProviderProfile) -> Self {
        self.primary = profile;
        self
    }

    /// Override the secondary provider's name, base URL and model.
    pub fn secondary_profile(mut self, profile: ProviderProfile) -> Self {
        self.secondary = profile;
        self
    }

    /// Upper bound on each model attempt (default: 45s).
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Sizing for the default in-memory store. Ignored when a custom
    /// store is set.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Use a custom backing store (e.g. a database table).
    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use a custom product catalog.
    pub fn catalog(mut self, catalog: Arc<dyn ProductCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Use a custom completion client (mainly for tests).
    pub fn completion_client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<DiagnosticGateway> {
        if self.attempt_timeout.is_zero() {
            return Err(VetgateError::Configuration(
                "attempt timeout must be non-zero".into(),
            ));
        }
        for profile in [&self.primary, &self.secondary] {
            if profile.models.is_empty() {
                return Err(VetgateError::Configuration(format!(
                    "provider '{}' has no models configured",
                    profile.name
                )));
            }
        }

        let client: Arc<dyn CompletionClient> = match self.client {
            Some(client) => client,
            None => Arc::new(OpenAiCompatibleClient::new()?),
        };
        let store: Arc<dyn CacheStore> = match self.store {
            Some(store) => store,
            None => Arc::new(MemoryCacheStore::new(&self.cache_config)),
        };
        let catalog: Arc<dyn ProductCatalog> = match self.catalog {
            Some(catalog) => catalog,
            None => Arc::new(StaticCatalog::default()),
        };

        Ok(DiagnosticGateway::new(
            store,
            catalog,
            ProviderSelector::new(self.primary, self.secondary),
            self.credentials,
            ModelCascade::new(client).attempt_timeout(self.attempt_timeout),
        ))
    }
}

impl Default for VetgateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
