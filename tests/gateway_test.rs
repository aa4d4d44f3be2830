//! End-to-end tests for [`DiagnosticGateway`] with mock clients and stores.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use vetgate::providers::{CompletionClient, DiagnosticPrompt, ProviderConfig, ProviderProfile};
use vetgate::{
    CacheEntry, CacheKey, CacheStore, Credentials, InferenceRequest, MemoryCacheStore, Product,
    ProductCatalog, Result, Vetgate, VetgateError,
};

const COCCIDIOSE: &str =
    r#"{"diagnosis":"Coccidiose","confidence":82,"treatmentPlan":"Amprolium 5 jours"}"#;

// ============================================================================
// Mocks
// ============================================================================

/// Replies per model; records every (provider, model) call.
struct MockClient {
    replies: Vec<(&'static str, &'static str)>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockClient {
    fn new(replies: &[(&'static str, &'static str)]) -> Arc<Self> {
        Arc::new(Self {
            replies: replies.to_vec(),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        provider: &ProviderConfig,
        model: &str,
        _prompt: &DiagnosticPrompt,
    ) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((provider.name.clone(), model.to_string()));
        self.replies
            .iter()
            .find(|(m, _)| *m == model)
            .map(|(_, text)| text.to_string())
            .ok_or_else(|| VetgateError::Http("unreachable".into()))
    }
}

/// Wraps a memory store and counts operations; optionally fails them.
struct CountingStore {
    inner: MemoryCacheStore,
    lookups: AtomicU32,
    inserts: AtomicU32,
    fail_inserts: bool,
    fail_lookups: bool,
}

impl CountingStore {
    fn new() -> Arc<Self> {
        Self::with_failures(false, false)
    }

    fn with_failures(fail_lookups: bool, fail_inserts: bool) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryCacheStore::default(),
            lookups: AtomicU32::new(0),
            inserts: AtomicU32::new(0),
            fail_inserts,
            fail_lookups,
        })
    }

    fn lookups(&self) -> u32 {
        self.lookups.load(Ordering::Relaxed)
    }

    fn inserts(&self) -> u32 {
        self.inserts.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl CacheStore for CountingStore {
    fn name(&self) -> &str {
        "counting"
    }

    async fn lookup(&self, cache_key: &CacheKey, requester_id: &str) -> Result<Option<CacheEntry>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if self.fail_lookups {
            return Err(VetgateError::Persistence("table unavailable".into()));
        }
        self.inner.lookup(cache_key, requester_id).await
    }

    async fn insert(&self, entry: CacheEntry) -> Result<()> {
        self.inserts.fetch_add(1, Ordering::Relaxed);
        if self.fail_inserts {
            return Err(VetgateError::Persistence("write rejected".into()));
        }
        self.inner.insert(entry).await
    }
}

struct OneProduct;

impl ProductCatalog for OneProduct {
    fn recommended_products(&self, _diagnosis: &str) -> Vec<Product> {
        vec![Product::new("amprolium-20", "Amprolium 20%")]
    }
}

fn primary_profile() -> ProviderProfile {
    ProviderProfile::new("primary", "http://primary").models(["m1", "m2", "m3"])
}

fn secondary_profile() -> ProviderProfile {
    ProviderProfile::new("secondary", "http://secondary").model("s1")
}

fn scenario_request(requester: &str) -> InferenceRequest {
    InferenceRequest::new(requester)
        .subject("lot-7")
        .symptoms(["toux", "diarrhée"])
        .description("poules léthargiques")
}

fn gateway(
    client: Arc<MockClient>,
    store: Arc<CountingStore>,
    credentials: Credentials,
) -> vetgate::DiagnosticGateway {
    Vetgate::builder()
        .credentials(credentials)
        .primary_profile(primary_profile())
        .secondary_profile(secondary_profile())
        .completion_client(client)
        .cache_store(store)
        .catalog(Arc::new(OneProduct))
        .build()
        .unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn miss_then_hit_then_other_requester_misses() {
    let client = MockClient::new(&[("m1", "analyse en cours..."), ("m2", COCCIDIOSE)]);
    let store = CountingStore::new();
    let gw = gateway(client.clone(), store.clone(), Credentials::new().primary("pk"));

    // First call: model 1 malformed, model 2 succeeds, entry persisted.
    let first = gw.diagnose(&scenario_request("U1")).await.unwrap();
    assert!(!first.cached);
    assert_eq!(first.diagnosis, "Coccidiose");
    assert_eq!(first.confidence, 82);
    assert_eq!(first.recommended_products.len(), 1);
    assert_eq!(client.call_count(), 2);
    assert_eq!(store.inserts(), 1);

    // Second identical call from U1: cache hit, no network, no write.
    let second = gw.diagnose(&scenario_request("U1")).await.unwrap();
    assert!(second.cached);
    assert_eq!(second.id, first.id);
    assert_eq!(second.diagnosis, first.diagnosis);
    assert_eq!(second.confidence, first.confidence);
    assert_eq!(second.treatment_plan, first.treatment_plan);
    assert_eq!(client.call_count(), 2);
    assert_eq!(store.inserts(), 1);

    // Same inputs from U2: miss, cascade runs again.
    let third = gw.diagnose(&scenario_request("U2")).await.unwrap();
    assert!(!third.cached);
    assert_ne!(third.id, first.id);
    assert_eq!(client.call_count(), 4);
    assert_eq!(store.inserts(), 2);
}

#[tokio::test]
async fn reordered_inputs_hit_the_same_entry() {
    let client = MockClient::new(&[("m1", COCCIDIOSE)]);
    let store = CountingStore::new();
    let gw = gateway(client.clone(), store, Credentials::new().primary("pk"));

    gw.diagnose(&scenario_request("U1")).await.unwrap();

    let reordered = InferenceRequest::new("U1")
        .subject("lot-7")
        .symptoms(["diarrhée", "toux"])
        .description("poules léthargiques");
    let response = gw.diagnose(&reordered).await.unwrap();
    assert!(response.cached);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn empty_request_is_rejected_before_any_io() {
    let client = MockClient::new(&[("m1", COCCIDIOSE)]);
    let store = CountingStore::new();
    let gw = gateway(client.clone(), store.clone(), Credentials::new().primary("pk"));

    let err = gw
        .diagnose(&InferenceRequest::new("U1").subject("lot-7"))
        .await
        .unwrap_err();

    assert!(matches!(err, VetgateError::InvalidInput(_)));
    assert_eq!(store.lookups(), 0);
    assert_eq!(store.inserts(), 0);
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn missing_credentials_fail_a_miss_without_network() {
    let client = MockClient::new(&[("m1", COCCIDIOSE)]);
    let store = CountingStore::new();
    let gw = gateway(client.clone(), store.clone(), Credentials::new());

    let err = gw.diagnose(&scenario_request("U1")).await.unwrap_err();
    assert!(matches!(err, VetgateError::ProviderConfigMissing));
    assert_eq!(store.lookups(), 1);
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn missing_credentials_still_serve_cache_hits() {
    let client = MockClient::new(&[("m1", COCCIDIOSE)]);
    let store = CountingStore::new();

    let warm = gateway(client.clone(), store.clone(), Credentials::new().primary("pk"));
    warm.diagnose(&scenario_request("U1")).await.unwrap();

    let cold = gateway(client.clone(), store.clone(), Credentials::new());
    let response = cold.diagnose(&scenario_request("U1")).await.unwrap();
    assert!(response.cached);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn secondary_is_used_only_without_primary_key() {
    let client = MockClient::new(&[("m1", COCCIDIOSE), ("s1", COCCIDIOSE)]);
    let store = CountingStore::new();
    let gw = gateway(client.clone(), store, Credentials::new().secondary("sk"));

    gw.diagnose(&scenario_request("U1")).await.unwrap();
    assert_eq!(
        client.calls(),
        vec![("secondary".to_string(), "s1".to_string())]
    );
}

#[tokio::test]
async fn exhausted_primary_does_not_fall_over_to_secondary() {
    let client = MockClient::new(&[("m1", "?"), ("m2", "??"), ("m3", "???"), ("s1", COCCIDIOSE)]);
    let store = CountingStore::new();
    let gw = gateway(
        client.clone(),
        store.clone(),
        Credentials::new().primary("pk").secondary("sk"),
    );

    let err = gw.diagnose(&scenario_request("U1")).await.unwrap_err();
    assert!(matches!(err, VetgateError::CascadeExhausted { .. }));
    assert!(err.is_caller_visible());
    assert_eq!(client.call_count(), 3);
    assert!(client.calls().iter().all(|(p, _)| p == "primary"));
    assert_eq!(store.inserts(), 0);
}

#[tokio::test]
async fn persistence_failure_still_returns_fresh_result() {
    let client = MockClient::new(&[("m1", COCCIDIOSE)]);
    let store = CountingStore::with_failures(false, true);
    let gw = gateway(client.clone(), store.clone(), Credentials::new().primary("pk"));

    let response = gw.diagnose(&scenario_request("U1")).await.unwrap();
    assert!(!response.cached);
    assert_eq!(response.diagnosis, "Coccidiose");
    assert_eq!(store.inserts(), 1);

    // Nothing was stored, so the next call pays again.
    let again = gw.diagnose(&scenario_request("U1")).await.unwrap();
    assert!(!again.cached);
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn lookup_failure_is_treated_as_miss() {
    let client = MockClient::new(&[("m1", COCCIDIOSE)]);
    let store = CountingStore::with_failures(true, false);
    let gw = gateway(client.clone(), store.clone(), Credentials::new().primary("pk"));

    let response = gw.diagnose(&scenario_request("U1")).await.unwrap();
    assert!(!response.cached);
    assert_eq!(client.call_count(), 1);
    assert_eq!(store.inserts(), 1);
}

#[tokio::test]
async fn explicit_provider_bypasses_selection() {
    let client = MockClient::new(&[("x1", COCCIDIOSE)]);
    let store = CountingStore::new();
    let gw = gateway(client.clone(), store, Credentials::new());

    let provider = ProviderConfig {
        name: "explicit".into(),
        credential: "ek".into(),
        base_url: "http://explicit".into(),
        models: vec!["x1".into()],
    };
    let response = gw
        .diagnose_with(&scenario_request("U1"), &provider)
        .await
        .unwrap();
    assert!(!response.cached);
    assert_eq!(
        client.calls(),
        vec![("explicit".to_string(), "x1".to_string())]
    );
}

#[test]
fn build_rejects_empty_model_list() {
    let result = Vetgate::builder()
        .primary_profile(ProviderProfile::new("primary", "http://primary"))
        .completion_client(MockClient::new(&[]))
        .build();
    assert!(matches!(result, Err(VetgateError::Configuration(_))));
}

#[test]
fn build_rejects_zero_timeout() {
    let result = Vetgate::builder()
        .attempt_timeout(std::time::Duration::ZERO)
        .completion_client(MockClient::new(&[]))
        .build();
    assert!(matches!(result, Err(VetgateError::Configuration(_))));
}

#[test]
fn select_provider_reflects_credentials() {
    let gw = gateway(
        MockClient::new(&[]),
        CountingStore::new(),
        Credentials::new().primary("pk"),
    );
    let provider = gw.select_provider().unwrap();
    assert_eq!(provider.name, "primary");
    assert_eq!(provider.models, vec!["m1", "m2", "m3"]);
}
