//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.vetgate/config.toml` (user)
//! 3. `/etc/vetgate/config.toml` (system)
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.vetgate/secrets.toml` (user, must be 0600)
//! 2. `/etc/vetgate/secrets.toml` (system, must be 0600)
//!
//! Each key falls back to an environment variable when the file has none.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::cache::CacheConfig;
use crate::catalog::{DEFAULT_RECOMMENDATION_LIMIT, StaticCatalog, default_products};
use crate::providers::{Credentials, ProviderProfile};
use crate::types::Product;
use crate::{Result, VetgateBuilder, VetgateError};

/// Gateway configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Request handling limits.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Per-model attempt timeout in seconds (default: 45).
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_secs: default_attempt_timeout(),
        }
    }
}

fn default_attempt_timeout() -> u64 {
    45
}

/// In-memory cache sizing.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Maximum cached diagnoses (default: 10,000).
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    /// Optional time-to-live in seconds (default: none).
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            ttl_secs: None,
        }
    }
}

fn default_max_entries() -> u64 {
    10_000
}

impl From<&CacheSection> for CacheConfig {
    fn from(section: &CacheSection) -> Self {
        let config = CacheConfig::new().max_entries(section.max_entries);
        match section.ttl_secs {
            Some(secs) => config.ttl(Duration::from_secs(secs)),
            None => config,
        }
    }
}

/// Provider overrides. Omitted fields keep the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub primary: Option<ProviderOverride>,
    #[serde(default)]
    pub secondary: Option<ProviderOverride>,
}

/// Partial provider profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderOverride {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub models: Option<Vec<String>>,
}

impl ProviderOverride {
    fn apply(&self, mut profile: ProviderProfile) -> ProviderProfile {
        if let Some(ref name) = self.name {
            profile.name = name.clone();
        }
        if let Some(ref base_url) = self.base_url {
            profile.base_url = base_url.clone();
        }
        if let Some(ref models) = self.models {
            profile.models = models.clone();
        }
        profile
    }
}

/// Product catalog configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Products recommended per diagnosis (default: 3).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Replacement product list; empty keeps the built-in list.
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            products: Vec::new(),
        }
    }
}

fn default_limit() -> usize {
    DEFAULT_RECOMMENDATION_LIMIT
}

impl CatalogConfig {
    pub fn to_catalog(&self) -> StaticCatalog {
        let products = if self.products.is_empty() {
            default_products()
        } else {
            self.products.clone()
        };
        StaticCatalog::new(products).limit(self.limit)
    }
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub primary: Option<ApiKeySecret>,
    #[serde(default)]
    pub secondary: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

impl std::fmt::Debug for ApiKeySecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeySecret")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Provider slot → environment variable name mapping.
const PROVIDER_ENV_VARS: &[(&str, &str)] = &[
    ("primary", "VETGATE_PRIMARY_API_KEY"),
    ("secondary", "VETGATE_SECONDARY_API_KEY"),
];

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.vetgate/config.toml`
    /// 3. `/etc/vetgate/config.toml`
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_config_path(explicit_path)?;
        Self::load_from(&path)
    }

    /// Like [`load`](Self::load), but falls back to defaults when no file
    /// exists in the standard locations. An explicit path must exist.
    pub fn load_or_default(explicit_path: Option<&Path>) -> Result<Self> {
        if explicit_path.is_some() {
            return Self::load(explicit_path);
        }
        match Self::standard_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a specific config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            VetgateError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            VetgateError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(VetgateError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        Self::standard_config_path().ok_or_else(|| {
            VetgateError::Configuration(
                "No config file found. Create ~/.vetgate/config.toml or /etc/vetgate/config.toml"
                    .to_string(),
            )
        })
    }

    fn standard_config_path() -> Option<PathBuf> {
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".vetgate").join("config.toml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        let system_config = PathBuf::from("/etc/vetgate/config.toml");
        system_config.exists().then_some(system_config)
    }

    /// Apply this configuration to a gateway builder.
    pub fn apply(&self, builder: VetgateBuilder) -> VetgateBuilder {
        let primary = self
            .providers
            .primary
            .clone()
            .unwrap_or_default()
            .apply(ProviderProfile::default_primary());
        let secondary = self
            .providers
            .secondary
            .clone()
            .unwrap_or_default()
            .apply(ProviderProfile::default_secondary());

        builder
            .primary_profile(primary)
            .secondary_profile(secondary)
            .attempt_timeout(Duration::from_secs(self.gateway.attempt_timeout_secs))
            .cache(CacheConfig::from(&self.cache))
            .catalog(Arc::new(self.catalog.to_catalog()))
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Resolution order:
    /// 1. `~/.vetgate/secrets.toml` (if exists, must be 0600)
    /// 2. `/etc/vetgate/secrets.toml` (if exists, must be 0600)
    ///
    /// Returns empty secrets if no file exists (keys may come from env vars).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".vetgate").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/vetgate/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Parse a specific secrets file after checking its permissions.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            VetgateError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            VetgateError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            VetgateError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(VetgateError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// API key for a provider slot ("primary" | "secondary"), falling back
    /// to the matching environment variable.
    pub fn api_key(&self, slot: &str) -> Option<String> {
        let from_file = match slot {
            "primary" => self.primary.as_ref(),
            "secondary" => self.secondary.as_ref(),
            _ => None,
        }
        .map(|s| s.api_key.clone());

        from_file.or_else(|| {
            PROVIDER_ENV_VARS
                .iter()
                .find(|(name, _)| *name == slot)
                .and_then(|(_, env_var)| std::env::var(env_var).ok())
        })
    }

    /// Credentials for the provider selector.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            primary: self.api_key("primary"),
            secondary: self.api_key("secondary"),
        }
    }
}
