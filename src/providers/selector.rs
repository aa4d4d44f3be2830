//! Static, pre-request provider selection.
//!
//! Exactly one provider is chosen per request, by credential presence:
//! primary if its key is set, else secondary, else
//! [`VetgateError::ProviderConfigMissing`]. There is no mid-request
//! switch: if the chosen provider's cascade is exhausted the request fails.
//!
//! The primary provider carries a multi-model cascade; the secondary a
//! single model. Both are plain data and can be overridden.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Result, VetgateError};

pub const DEFAULT_PRIMARY_NAME: &str = "openrouter";
pub const DEFAULT_PRIMARY_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_PRIMARY_MODELS: &[&str] = &[
    "google/gemini-2.5-flash",
    "google/gemini-2.0-flash-001",
    "openai/gpt-4o-mini",
];

pub const DEFAULT_SECONDARY_NAME: &str = "openai";
pub const DEFAULT_SECONDARY_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_SECONDARY_MODELS: &[&str] = &["gpt-4o-mini"];

/// Credential-free description of a provider: where it lives and which
/// models to try, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub name: String,
    pub base_url: String,
    pub models: Vec<String>,
}

impl ProviderProfile {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            models: Vec::new(),
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.models.push(model.into());
        self
    }

    pub fn models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    /// Built-in primary provider: OpenRouter with a three-model cascade.
    pub fn default_primary() -> Self {
        Self::new(DEFAULT_PRIMARY_NAME, DEFAULT_PRIMARY_BASE_URL)
            .models(DEFAULT_PRIMARY_MODELS.iter().copied())
    }

    /// Built-in secondary provider: OpenAI, single model.
    pub fn default_secondary() -> Self {
        Self::new(DEFAULT_SECONDARY_NAME, DEFAULT_SECONDARY_BASE_URL)
            .models(DEFAULT_SECONDARY_MODELS.iter().copied())
    }

    fn with_credential(&self, credential: &str) -> ProviderConfig {
        ProviderConfig {
            name: self.name.clone(),
            credential: credential.to_owned(),
            base_url: self.base_url.clone(),
            models: self.models.clone(),
        }
    }
}

/// The provider chosen for one request. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub name: String,
    pub credential: String,
    pub base_url: String,
    /// Ordered cascade; a single entry for providers without one.
    pub models: Vec<String>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("credential", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("models", &self.models)
            .finish()
    }
}

/// Credentials available at request time. Blank keys count as absent.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary(mut self, key: impl Into<String>) -> Self {
        self.primary = Some(key.into());
        self
    }

    pub fn secondary(mut self, key: impl Into<String>) -> Self {
        self.secondary = Some(key.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("primary", &self.primary.as_ref().map(|_| "<redacted>"))
            .field("secondary", &self.secondary.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn present(key: &Option<String>) -> Option<&str> {
    key.as_deref().map(str::trim).filter(|k| !k.is_empty())
}

/// Chooses the provider for a request.
#[derive(Debug, Clone)]
pub struct ProviderSelector {
    primary: ProviderProfile,
    secondary: ProviderProfile,
}

impl Default for ProviderSelector {
    fn default() -> Self {
        Self::new(
            ProviderProfile::default_primary(),
            ProviderProfile::default_secondary(),
        )
    }
}

impl ProviderSelector {
    pub fn new(primary: ProviderProfile, secondary: ProviderProfile) -> Self {
        Self { primary, secondary }
    }

    pub fn primary(&self) -> &ProviderProfile {
        &self.primary
    }

    pub fn secondary(&self) -> &ProviderProfile {
        &self.secondary
    }

    /// Pick primary, then secondary, by credential presence.
    pub fn select(&self, credentials: &Credentials) -> Result<ProviderConfig> {
        if let Some(key) = present(&credentials.primary) {
            return Ok(self.primary.with_credential(key));
        }
        if let Some(key) = present(&credentials.secondary) {
            return Ok(self.secondary.with_credential(key));
        }
        Err(VetgateError::ProviderConfigMissing)
    }
}
