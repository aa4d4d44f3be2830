//! DiagnosticGateway - sequences validation, cache, provider and cascade.
//!
//! ```text
//! Validate ─► BuildKey ─► Lookup ─┬─ hit ──► return cached (no network, no write)
//!                                 └─ miss ─► SelectProvider ─► Cascade
//!                                              ─► Persist (best effort) ─► return fresh
//! ```
//!
//! The flow is linear: no step is retried and there is no switch to
//! another provider after the cascade is exhausted. Dropping the future
//! returned by [`DiagnosticGateway::diagnose`] drops the in-flight attempt
//! with it, so an abandoned request stops spending.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::cache::{CacheEntry, CacheKey, CacheStore};
use crate::catalog::ProductCatalog;
use crate::providers::{Credentials, ModelCascade, ProviderConfig, ProviderSelector};
use crate::telemetry;
use crate::types::{DiagnosisResponse, InferenceRequest};

/// The diagnostic inference gateway.
pub struct DiagnosticGateway {
    store: Arc<dyn CacheStore>,
    catalog: Arc<dyn ProductCatalog>,
    selector: ProviderSelector,
    credentials: Credentials,
    cascade: ModelCascade,
}

impl DiagnosticGateway {
    pub(crate) fn new(
        store: Arc<dyn CacheStore>,
        catalog: Arc<dyn ProductCatalog>,
        selector: ProviderSelector,
        credentials: Credentials,
        cascade: ModelCascade,
    ) -> Self {
        Self {
            store,
            catalog,
            selector,
            credentials,
            cascade,
        }
    }

    /// Provider that a cache miss would use right now.
    pub fn select_provider(&self) -> Result<ProviderConfig> {
        self.selector.select(&self.credentials)
    }

    /// Diagnose a request, selecting the provider from the configured
    /// credentials on a cache miss.
    #[instrument(skip_all, fields(requester = %request.requester_id, subject = %request.subject_id))]
    pub async fn diagnose(&self, request: &InferenceRequest) -> Result<DiagnosisResponse> {
        record_outcome(self.handle(request, None).await)
    }

    /// Diagnose a request against an explicitly supplied provider,
    /// bypassing credential-based selection.
    #[instrument(skip_all, fields(
        requester = %request.requester_id,
        subject = %request.subject_id,
        provider = %provider.name,
    ))]
    pub async fn diagnose_with(
        &self,
        request: &InferenceRequest,
        provider: &ProviderConfig,
    ) -> Result<DiagnosisResponse> {
        record_outcome(self.handle(request, Some(provider)).await)
    }

    async fn handle(
        &self,
        request: &InferenceRequest,
        provider: Option<&ProviderConfig>,
    ) -> Result<DiagnosisResponse> {
        request.validate()?;

        let key = CacheKey::from(request);
        if let Some(entry) = self.lookup(&key, &request.requester_id).await {
            return Ok(entry.to_response(true));
        }

        let selected;
        let provider = match provider {
            Some(p) => p,
            None => {
                selected = self.select_provider()?;
                &selected
            }
        };

        let outcome = self.cascade.run(provider, request).await?;
        let products = self
            .catalog
            .recommended_products(&outcome.diagnosis.diagnosis);
        let entry = CacheEntry::new(request, key, outcome.diagnosis, products);
        let response = entry.to_response(false);

        info!(
            provider = %provider.name,
            model = %outcome.model,
            attempts = outcome.attempts.len(),
            confidence = response.confidence,
            "fresh diagnosis"
        );

        self.persist(entry).await;
        Ok(response)
    }

    /// Store lookup; store errors degrade to a miss.
    async fn lookup(&self, key: &CacheKey, requester_id: &str) -> Option<CacheEntry> {
        match self.store.lookup(key, requester_id).await {
            Ok(Some(entry)) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                debug!(store = self.store.name(), entry = %entry.id, "cache hit");
                Some(entry)
            }
            Ok(None) => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                debug!(store = self.store.name(), "cache miss");
                None
            }
            Err(e) => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                warn!(store = self.store.name(), error = %e, "cache lookup failed, treating as miss");
                None
            }
        }
    }

    /// Best-effort write; failure is logged and otherwise ignored.
    async fn persist(&self, entry: CacheEntry) {
        let id = entry.id.clone();
        if let Err(e) = self.store.insert(entry).await {
            metrics::counter!(telemetry::PERSIST_FAILURES_TOTAL).increment(1);
            warn!(store = self.store.name(), entry = %id, error = %e, "failed to persist diagnosis");
        }
    }
}

fn record_outcome(result: Result<DiagnosisResponse>) -> Result<DiagnosisResponse> {
    let outcome = match &result {
        Ok(r) if r.cached => "cached",
        Ok(_) => "fresh",
        Err(_) => "error",
    };
    metrics::counter!(telemetry::REQUESTS_TOTAL, "outcome" => outcome).increment(1);
    result
}
