//! Vetgate - cached, cascading diagnostic inference gateway
//!
//! Turns a farmer's photos, symptom list and free-text description into a
//! single structured diagnosis from a paid, externally hosted text model,
//! while:
//!
//! - never paying twice for the same question (per-requester cache),
//! - tolerating partial provider failure (ordered model cascade),
//! - returning machine-parseable output even when the model wraps its
//!   JSON in prose or markdown.
//!
//! # Example
//!
//! ```rust,no_run
//! use vetgate::{InferenceRequest, Vetgate};
//!
//! #[tokio::main]
//! async fn main() -> vetgate::Result<()> {
//!     let gateway = Vetgate::builder()
//!         .primary("sk-or-your-key")
//!         .build()?;
//!
//!     let request = InferenceRequest::new("user-1")
//!         .subject("lot-42")
//!         .symptoms(["toux", "diarrhée"])
//!         .description("poules léthargiques");
//!
//!     let response = gateway.diagnose(&request).await?;
//!     println!("{} ({}%)", response.diagnosis, response.confidence);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod normalize;
pub mod providers;
pub mod telemetry;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheEntry, CacheKey, CacheStore, MemoryCacheStore, build_key};
pub use catalog::{ProductCatalog, StaticCatalog};
pub use error::{Result, VetgateError};
pub use gateway::{DiagnosticGateway, Vetgate, VetgateBuilder};
pub use normalize::normalize;
pub use providers::{
    AttemptRecord, CompletionClient, Credentials, ModelCascade, ProviderConfig, ProviderProfile,
    ProviderSelector,
};
pub use types::{Diagnosis, DiagnosisResponse, InferenceRequest, Product};
pub use version::{PKG_VERSION, version_string};
