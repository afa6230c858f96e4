//! JSON fetcher with response caching and bounded retry.
//!
//! GET responses are cached for a fixed TTL (60 s by default). A failed
//! attempt is retried up to `retries` more times, sleeping
//! `attempt × retry_base_delay` between attempts. Errors that cannot
//! succeed on retry (most 4xx) are surfaced immediately.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, trace, warn};

use super::cache::{CacheConfig, CacheKey, ResponseCache};
use super::error::FetchError;
use super::transport::{HttpTransport, OutboundRequest, Transport};

/// Default base URL: the MBTA v3 API.
pub const DEFAULT_BASE_URL: &str = "https://api-v3.mbta.com";

/// Default retries for GET requests (three attempts in total).
pub const DEFAULT_GET_RETRIES: u32 = 2;

/// Default retries for POST requests.
pub const DEFAULT_POST_RETRIES: u32 = 1;

/// Configuration for the fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Base URL that request paths are joined onto
    pub base_url: String,
    /// API key sent as `x-api-key`, if any
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Response cache settings
    pub cache: CacheConfig,
    /// Delay unit between attempts; attempt `n` waits `n` units
    pub retry_base_delay: Duration,
}

impl FetcherConfig {
    /// Create a config with defaults for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout_secs: 10,
            cache: CacheConfig::default(),
            retry_base_delay: Duration::from_millis(500),
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache.ttl = ttl;
        self
    }

    /// Set the maximum number of cached responses.
    pub fn with_max_capacity(mut self, n: u64) -> Self {
        self.cache.max_capacity = n;
        self
    }

    /// Set the retry delay unit.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Remote JSON fetcher.
///
/// Generic over the [`Transport`] so tests can script failures; production
/// code uses [`HttpTransport`].
pub struct RemoteFetcher<T = HttpTransport> {
    transport: T,
    base_url: String,
    cache: ResponseCache,
    retry_base_delay: Duration,
}

impl RemoteFetcher<HttpTransport> {
    /// Create a fetcher that talks HTTP.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let transport = HttpTransport::new(
            config.api_key.as_deref(),
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self::with_transport(transport, &config))
    }
}

impl<T: Transport> RemoteFetcher<T> {
    /// Create a fetcher over a custom transport.
    pub fn with_transport(transport: T, config: &FetcherConfig) -> Self {
        Self {
            transport,
            base_url: config.base_url.clone(),
            cache: ResponseCache::new(&config.cache),
            retry_base_delay: config.retry_base_delay,
        }
    }

    /// Join a path onto the base URL with exactly one slash.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// GET a JSON document.
    ///
    /// With `use_cache`, a fresh cached response is returned without any
    /// network call. Concurrent misses on the same request share one fetch,
    /// and its result is stored only if it succeeded.
    pub async fn get(
        &self,
        path: &str,
        params: &BTreeMap<String, String>,
        use_cache: bool,
        retries: u32,
    ) -> Result<Arc<Value>, FetchError> {
        let url = self.url_for(path);
        let query = params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let request = OutboundRequest::get(url, query);

        if !use_cache {
            return self.send_with_retry(&request, retries).await.map(Arc::new);
        }

        let key = CacheKey::new(&request.url, params);
        let label = key.as_str().to_string();
        let fill = async { self.send_with_retry(&request, retries).await.map(Arc::new) };
        match self.cache.get_or_try_insert_with(key, fill).await {
            Ok((value, true)) => {
                debug!(key = %label, "Cache miss");
                Ok(value)
            }
            Ok((value, false)) => {
                trace!(key = %label, "Cache hit");
                Ok(value)
            }
            Err(shared) => Err(FetchError::from_shared(shared)),
        }
    }

    /// POST a JSON payload and decode the JSON response. Never cached.
    pub async fn post(
        &self,
        path: &str,
        payload: &Value,
        retries: u32,
    ) -> Result<Value, FetchError> {
        let request = OutboundRequest::post(self.url_for(path), payload.clone());
        self.send_with_retry(&request, retries).await
    }

    /// Drop every cached response.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn send_with_retry(
        &self,
        request: &OutboundRequest,
        retries: u32,
    ) -> Result<Value, FetchError> {
        let attempts = retries.saturating_add(1);
        let mut attempt = 1;

        loop {
            match self.transport.send(request).await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => {
                    debug!(url = %request.url, error = %e, "Request failed, not retrying");
                    return Err(e);
                }
                Err(e) if attempt >= attempts => {
                    warn!(url = %request.url, attempts, error = %e, "Request failed, giving up");
                    return Err(FetchError::RetriesExhausted {
                        url: request.url.clone(),
                        attempts,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    let delay = self.retry_base_delay * attempt;
                    warn!(
                        url = %request.url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde_json::json;

    use crate::remote::transport::Method;

    /// Transport that replays scripted outcomes and records requests.
    struct ScriptedTransport {
        outcomes: Mutex<VecDeque<Result<Value, FetchError>>>,
        requests: Mutex<Vec<OutboundRequest>>,
        latency: Duration,
    }

    impl ScriptedTransport {
        fn new(outcomes: Vec<Result<Value, FetchError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                requests: Mutex::new(Vec::new()),
                latency: Duration::ZERO,
            }
        }

        fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        fn always_ok(value: Value) -> Self {
            Self::new((0..10).map(|_| Ok(value.clone())).collect())
        }

        fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl Transport for ScriptedTransport {
        async fn send(&self, request: &OutboundRequest) -> Result<Value, FetchError> {
            self.requests.lock().unwrap().push(request.clone());
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Config("script exhausted".into())))
        }
    }

    fn unavailable() -> Result<Value, FetchError> {
        Err(FetchError::Status {
            status: 503,
            message: "Service Unavailable".into(),
        })
    }

    fn config() -> FetcherConfig {
        FetcherConfig::new("https://api.test/")
            .with_retry_delay(Duration::from_millis(1))
            .with_cache_ttl(Duration::from_millis(200))
    }

    fn fetcher(transport: ScriptedTransport) -> RemoteFetcher<ScriptedTransport> {
        RemoteFetcher::with_transport(transport, &config())
    }

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn config_builder() {
        let config = FetcherConfig::default()
            .with_base_url("http://localhost:8080")
            .with_api_key("key")
            .with_timeout(5)
            .with_cache_ttl(Duration::from_secs(30))
            .with_max_capacity(10)
            .with_retry_delay(Duration::from_millis(100));

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.cache.ttl, Duration::from_secs(30));
        assert_eq!(config.cache.max_capacity, 10);
        assert_eq!(config.retry_base_delay, Duration::from_millis(100));
    }

    #[test]
    fn config_defaults() {
        let config = FetcherConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_key, None);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
        assert_eq!(config.retry_base_delay, Duration::from_millis(500));
    }

    #[test]
    fn http_fetcher_creation() {
        assert!(RemoteFetcher::new(FetcherConfig::default()).is_ok());
    }

    #[test]
    fn url_joining() {
        let f = fetcher(ScriptedTransport::new(vec![]));
        assert_eq!(f.url_for("/alerts"), "https://api.test/alerts");
        assert_eq!(f.url_for("routes"), "https://api.test/routes");
    }

    #[tokio::test]
    async fn cached_get_makes_one_call_within_ttl() {
        let f = fetcher(ScriptedTransport::always_ok(json!({"data": [1]})));
        let p = params(&[("filter[route]", "Red")]);

        let first = f.get("/alerts", &p, true, 2).await.unwrap();
        let second = f.get("/alerts", &p, true, 2).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(f.transport.call_count(), 1);
    }

    #[tokio::test]
    async fn cached_get_refetches_after_ttl() {
        let f = fetcher(ScriptedTransport::always_ok(json!({"data": []})));
        let p = params(&[]);

        f.get("/alerts", &p, true, 2).await.unwrap();
        f.get("/alerts", &p, true, 2).await.unwrap();
        assert_eq!(f.transport.call_count(), 1);

        tokio::time::sleep(Duration::from_millis(300)).await;

        f.get("/alerts", &p, true, 2).await.unwrap();
        assert_eq!(f.transport.call_count(), 2);
    }

    #[tokio::test]
    async fn different_params_are_cached_separately() {
        let f = fetcher(ScriptedTransport::always_ok(json!({})));

        f.get("/alerts", &params(&[("filter[route]", "Red")]), true, 0)
            .await
            .unwrap();
        f.get("/alerts", &params(&[("filter[route]", "Blue")]), true, 0)
            .await
            .unwrap();

        assert_eq!(f.transport.call_count(), 2);
    }

    #[tokio::test]
    async fn uncached_get_always_fetches() {
        let f = fetcher(ScriptedTransport::always_ok(json!({})));
        let p = params(&[]);

        f.get("/routes", &p, false, 0).await.unwrap();
        f.get("/routes", &p, false, 0).await.unwrap();
        assert_eq!(f.transport.call_count(), 2);
    }

    #[tokio::test]
    async fn clear_cache_forces_refetch() {
        let f = fetcher(ScriptedTransport::always_ok(json!({})));
        let p = params(&[]);

        f.get("/routes", &p, true, 0).await.unwrap();
        f.clear_cache();
        f.get("/routes", &p, true, 0).await.unwrap();
        assert_eq!(f.transport.call_count(), 2);
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_fetch() {
        let f = fetcher(
            ScriptedTransport::always_ok(json!({"data": [1]}))
                .with_latency(Duration::from_millis(50)),
        );
        let p = params(&[("filter[route]", "Red")]);

        let (a, b) = tokio::join!(
            f.get("/alerts", &p, true, 0),
            f.get("/alerts", &p, true, 0)
        );

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(f.transport.call_count(), 1);
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_failure() {
        let f = fetcher(
            ScriptedTransport::new(vec![unavailable(), Ok(json!({"data": []}))])
                .with_latency(Duration::from_millis(50)),
        );
        let p = params(&[]);

        let (a, b) = tokio::join!(
            f.get("/alerts", &p, true, 0),
            f.get("/alerts", &p, true, 0)
        );

        for err in [a.unwrap_err(), b.unwrap_err()] {
            assert_eq!(err.status(), Some(503));
            assert!(matches!(
                err.root(),
                FetchError::RetriesExhausted { attempts: 1, .. }
            ));
        }
        assert_eq!(f.transport.call_count(), 1);

        // Nothing was stored, so the next call fetches again
        assert!(f.get("/alerts", &p, true, 0).await.is_ok());
        assert_eq!(f.transport.call_count(), 2);
    }

    #[tokio::test]
    async fn succeeds_on_last_retry() {
        let f = fetcher(ScriptedTransport::new(vec![
            unavailable(),
            unavailable(),
            Ok(json!({"data": "third time"})),
        ]));

        let value = f.get("/alerts", &params(&[]), true, 2).await.unwrap();
        assert_eq!(*value, json!({"data": "third time"}));
        assert_eq!(f.transport.call_count(), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_error() {
        let f = fetcher(ScriptedTransport::new(vec![
            unavailable(),
            unavailable(),
            unavailable(),
            Ok(json!("never reached")),
        ]));

        let err = f.get("/alerts", &params(&[]), true, 2).await.unwrap_err();
        match err.root() {
            FetchError::RetriesExhausted { url, attempts, .. } => {
                assert_eq!(url, "https://api.test/alerts");
                assert_eq!(*attempts, 3);
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
        assert_eq!(f.transport.call_count(), 3);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let f = fetcher(ScriptedTransport::new(vec![
            unavailable(),
            Ok(json!({"data": []})),
        ]));
        let p = params(&[]);

        assert!(f.get("/alerts", &p, true, 0).await.is_err());
        assert!(f.get("/alerts", &p, true, 0).await.is_ok());
        assert_eq!(f.transport.call_count(), 2);
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        let f = fetcher(ScriptedTransport::new(vec![
            Err(FetchError::Status {
                status: 400,
                message: "Bad Request".into(),
            }),
            Ok(json!({})),
        ]));

        let err = f.get("/alerts", &params(&[]), true, 2).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(matches!(err.root(), FetchError::Status { .. }));
        assert_eq!(f.transport.call_count(), 1);
    }

    #[tokio::test]
    async fn rate_limit_is_retried() {
        let f = fetcher(ScriptedTransport::new(vec![
            Err(FetchError::Status {
                status: 429,
                message: String::new(),
            }),
            Ok(json!({"ok": true})),
        ]));

        let value = f.get("/alerts", &params(&[]), false, 1).await.unwrap();
        assert_eq!(*value, json!({"ok": true}));
    }

    #[tokio::test]
    async fn get_sends_params_as_query() {
        let f = fetcher(ScriptedTransport::always_ok(json!({})));
        let p = params(&[("sort", "-updated_at"), ("filter[route]", "Red")]);

        f.get("alerts", &p, false, 0).await.unwrap();

        let requests = f.transport.requests.lock().unwrap();
        assert_eq!(requests[0].method, Method::Get);
        assert_eq!(requests[0].url, "https://api.test/alerts");
        assert_eq!(
            requests[0].query,
            vec![
                ("filter[route]".to_string(), "Red".to_string()),
                ("sort".to_string(), "-updated_at".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn post_retries_then_succeeds() {
        let f = fetcher(ScriptedTransport::new(vec![
            unavailable(),
            Ok(json!({"id": 7})),
        ]));

        let value = f
            .post("/plans", &json!({"origin": "Harvard"}), DEFAULT_POST_RETRIES)
            .await
            .unwrap();
        assert_eq!(value, json!({"id": 7}));

        let requests = f.transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].method, Method::Post);
        assert_eq!(requests[1].body, Some(json!({"origin": "Harvard"})));
    }

    #[tokio::test]
    async fn post_exhausts_retries() {
        let f = fetcher(ScriptedTransport::new(vec![unavailable(), unavailable()]));

        let err = f
            .post("/plans", &json!({}), DEFAULT_POST_RETRIES)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::RetriesExhausted { attempts: 2, .. }));
    }
}
