//! Cache store seam and the default in-memory backing table.
//!
//! # Architecture
//!
//! The gateway talks to persistence only through [`CacheStore`]. A managed
//! database table keyed by `(cache_key, requester_id)` plugs in by
//! implementing the trait and handing it to
//! [`VetgateBuilder::cache_store()`](crate::VetgateBuilder::cache_store).
//! Without one, the builder allocates a [`MemoryCacheStore`].
//!
//! Entries are written once on a fresh diagnosis and never mutated.
//! Two identical concurrent requests may both miss and both write; the
//! second write replaces an equivalent entry, so no locking is needed.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use serde::{Deserialize, Serialize};

use super::key::CacheKey;
use crate::Result;
use crate::types::{Diagnosis, DiagnosisResponse, InferenceRequest, Product};

/// Persisted diagnosis, keyed by `(cache_key, requester_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub id: String,
    pub requester_id: String,
    pub subject_id: String,
    pub images: Vec<String>,
    pub symptoms: Vec<String>,
    pub diagnosis: String,
    pub confidence: u8,
    pub treatment_plan: String,
    pub recommended_products: Vec<Product>,
    pub cache_key: CacheKey,
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Assemble a new entry for a fresh diagnosis, with a random id and the
    /// current time.
    pub fn new(
        request: &InferenceRequest,
        cache_key: CacheKey,
        diagnosis: Diagnosis,
        recommended_products: Vec<Product>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            requester_id: request.requester_id.clone(),
            subject_id: request.subject_id.clone(),
            images: request.images.clone(),
            symptoms: request.symptoms.clone(),
            diagnosis: diagnosis.diagnosis,
            confidence: diagnosis.confidence,
            treatment_plan: diagnosis.treatment_plan,
            recommended_products,
            cache_key,
            created_at: Utc::now(),
        }
    }

    /// Caller-facing view of this entry.
    pub fn to_response(&self, cached: bool) -> DiagnosisResponse {
        DiagnosisResponse {
            id: self.id.clone(),
            diagnosis: self.diagnosis.clone(),
            confidence: self.confidence,
            treatment_plan: self.treatment_plan.clone(),
            recommended_products: self.recommended_products.clone(),
            cached,
        }
    }
}

/// Per-requester keyed lookup/insert against a backing table.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Store name for logging/debugging.
    fn name(&self) -> &str;

    /// Find the entry for exactly `(cache_key, requester_id)`.
    ///
    /// A mismatch on either dimension is `Ok(None)`, not an error.
    async fn lookup(&self, cache_key: &CacheKey, requester_id: &str)
    -> Result<Option<CacheEntry>>;

    /// Persist a new entry. Callers treat failure as non-fatal.
    async fn insert(&self, entry: CacheEntry) -> Result<()>;
}

/// Configuration for [`MemoryCacheStore`].
///
/// ```rust
/// # use vetgate::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(50_000)
///     .ttl(Duration::from_secs(7 * 24 * 3600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries before LRU eviction. Default: 10,000.
    pub max_entries: u64,
    /// Optional time-to-live. Default: none (retention is left to the
    /// operator).
    pub ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: None,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// In-process [`CacheStore`] backed by moka's async LRU cache.
pub struct MemoryCacheStore {
    entries: Cache<(CacheKey, String), CacheEntry>,
}

impl MemoryCacheStore {
    pub fn new(config: &CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_entries);
        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }
        Self {
            entries: builder.build(),
        }
    }

    /// Number of live entries (after flushing moka's pending bookkeeping).
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn lookup(
        &self,
        cache_key: &CacheKey,
        requester_id: &str,
    ) -> Result<Option<CacheEntry>> {
        Ok(self
            .entries
            .get(&(cache_key.clone(), requester_id.to_owned()))
            .await)
    }

    async fn insert(&self, entry: CacheEntry) -> Result<()> {
        let key = (entry.cache_key.clone(), entry.requester_id.clone());
        self.entries.insert(key, entry).await;
        Ok(())
    }
}
