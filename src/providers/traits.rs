//! Outbound completion seam.
//!
//! A [`CompletionClient`] performs exactly one completion call against a
//! provider for one model. It does not retry and does not parse: the
//! cascade decides what a failure means and the normalizer decides what
//! the text means.
//!
//! # Example
//!
//! ```ignore
//! async fn complete(&self, provider: &ProviderConfig, model: &str, prompt: &DiagnosticPrompt)
//!     -> Result<String>
//! {
//!     // POST to provider.base_url with provider.credential, return the text
//! }
//! ```

use async_trait::async_trait;

use super::prompt::DiagnosticPrompt;
use super::selector::ProviderConfig;
use crate::Result;

/// One network call: prompt in, completion text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Client name for logging/debugging.
    fn name(&self) -> &str;

    /// Ask `model` at `provider` to complete `prompt`.
    ///
    /// Returns the raw completion text, which may be empty or wrapped in
    /// markdown.
    async fn complete(
        &self,
        provider: &ProviderConfig,
        model: &str,
        prompt: &DiagnosticPrompt,
    ) -> Result<String>;
}
