//! Provider selection, the outbound completion seam, and the model cascade.
//!
//! - [`selector`] picks one provider per request from the credentials.
//! - [`cascade`] tries that provider's models in order.
//! - [`openai_compat`] is the HTTP client both built-in providers use.

pub mod cascade;
pub mod openai_compat;
pub mod prompt;
pub mod selector;
pub mod traits;

pub use cascade::{AttemptRecord, CascadeOutcome, DEFAULT_ATTEMPT_TIMEOUT, ModelCascade};
pub use openai_compat::OpenAiCompatibleClient;
pub use prompt::DiagnosticPrompt;
pub use selector::{Credentials, ProviderConfig, ProviderProfile, ProviderSelector};
pub use traits::CompletionClient;
