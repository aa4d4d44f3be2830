//! Ordered model fallback within one provider.
//!
//! The cascade walks the provider's model list strictly in sequence. Each
//! model gets exactly one attempt; the first one whose completion
//! normalizes wins and the rest are never called. Attempts are sequential
//! because each one costs money and quota.
//!
//! # Attempt Failure Triggers
//!
//! The cascade advances to the next model on:
//! - transport or HTTP status errors
//! - an attempt exceeding the per-attempt timeout
//! - an empty completion
//! - a completion the normalizer rejects
//!
//! ```text
//!   models: [m1, m2, m3]
//!
//!   m1 ──► unparsable ──┐
//!                       ▼
//!   m2 ──► normalizes ──► return (m3 never called)
//! ```
//!
//! When every model fails the result is
//! [`VetgateError::CascadeExhausted`], carrying the last failure reason.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::prompt::DiagnosticPrompt;
use super::selector::ProviderConfig;
use super::traits::CompletionClient;
use crate::normalize::normalize;
use crate::telemetry;
use crate::types::{Diagnosis, InferenceRequest};
use crate::{Result, VetgateError};

/// Default upper bound on a single model attempt.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(45);

/// Outcome of one model attempt. Only used to report failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    pub model: String,
    pub succeeded: bool,
    pub error: Option<String>,
}

impl AttemptRecord {
    pub fn succeeded(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            succeeded: true,
            error: None,
        }
    }

    pub fn failed(model: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            succeeded: false,
            error: Some(error.into()),
        }
    }
}

/// A successful cascade: the normalized result and how it was reached.
#[derive(Debug, Clone)]
pub struct CascadeOutcome {
    pub diagnosis: Diagnosis,
    /// Model that produced `diagnosis`.
    pub model: String,
    /// Every attempt made, in order; the last one succeeded.
    pub attempts: Vec<AttemptRecord>,
}

/// Runs a provider's model list until one model yields a usable result.
pub struct ModelCascade {
    client: Arc<dyn CompletionClient>,
    attempt_timeout: Duration,
}

impl ModelCascade {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    /// Set the per-attempt timeout.
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    #[instrument(skip_all, fields(provider = %provider.name, models = provider.models.len()))]
    pub async fn run(
        &self,
        provider: &ProviderConfig,
        request: &InferenceRequest,
    ) -> Result<CascadeOutcome> {
        let prompt = DiagnosticPrompt::from_request(request);
        let mut attempts = Vec::with_capacity(provider.models.len());

        for (index, model) in provider.models.iter().enumerate() {
            let start = Instant::now();
            let result = self.attempt(provider, model, &prompt).await;

            metrics::histogram!(telemetry::ATTEMPT_DURATION_SECONDS,
                "provider" => provider.name.clone(),
                "model" => model.clone(),
            )
            .record(start.elapsed().as_secs_f64());

            let status = if result.is_ok() { "ok" } else { "error" };
            metrics::counter!(telemetry::MODEL_ATTEMPTS_TOTAL,
                "provider" => provider.name.clone(),
                "model" => model.clone(),
                "status" => status,
            )
            .increment(1);

            match result {
                Ok(diagnosis) => {
                    debug!(model = %model, attempt = index + 1, "model attempt succeeded");
                    attempts.push(AttemptRecord::succeeded(model));
                    return Ok(CascadeOutcome {
                        diagnosis,
                        model: model.clone(),
                        attempts,
                    });
                }
                Err(e) => {
                    warn!(
                        provider = %provider.name,
                        model = %model,
                        attempt = index + 1,
                        remaining = provider.models.len() - index - 1,
                        error = %e,
                        "model attempt failed, advancing cascade"
                    );
                    attempts.push(AttemptRecord::failed(model, e.to_string()));
                }
            }
        }

        metrics::counter!(telemetry::CASCADE_EXHAUSTED_TOTAL, "provider" => provider.name.clone())
            .increment(1);

        let last_error = attempts
            .last()
            .and_then(|a| a.error.clone())
            .unwrap_or_else(|| "no models configured".to_string());

        Err(VetgateError::CascadeExhausted {
            provider: provider.name.clone(),
            attempts,
            last_error,
        })
    }

    /// One bounded call to one model, normalized.
    async fn attempt(
        &self,
        provider: &ProviderConfig,
        model: &str,
        prompt: &DiagnosticPrompt,
    ) -> Result<Diagnosis> {
        let text = tokio::time::timeout(
            self.attempt_timeout,
            self.client.complete(provider, model, prompt),
        )
        .await
        .map_err(|_| VetgateError::Timeout(self.attempt_timeout))??;

        if text.trim().is_empty() {
            return Err(VetgateError::EmptyResponse);
        }
        normalize(&text)
    }
}
