//! Typed queries against the MBTA v3 API.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::network::AliasMap;
use crate::remote::{
    DEFAULT_GET_RETRIES, FetchError, FetcherConfig, HttpTransport, RemoteFetcher, Transport,
};

/// Maximum alerts requested per call.
const ALERT_PAGE_LIMIT: &str = "25";

/// Light rail and heavy rail (subway) route types.
const SUBWAY_ROUTE_TYPES: &str = "0,1";

/// MBTA API client.
///
/// Every query goes through the fetcher's cache and retry policy and
/// yields the JSON:API `data` array.
pub struct MbtaClient<T = HttpTransport> {
    fetcher: RemoteFetcher<T>,
    aliases: AliasMap,
}

impl MbtaClient<HttpTransport> {
    /// Create an HTTP-backed client.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        Ok(Self::from_fetcher(RemoteFetcher::new(config)?))
    }
}

impl<T: Transport> MbtaClient<T> {
    pub fn from_fetcher(fetcher: RemoteFetcher<T>) -> Self {
        Self {
            fetcher,
            aliases: AliasMap::new(),
        }
    }

    /// Normalise stop names through `aliases` before searching.
    pub fn with_aliases(mut self, aliases: AliasMap) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn fetcher(&self) -> &RemoteFetcher<T> {
        &self.fetcher
    }

    /// Service alerts that affect boarding, exiting or riding.
    ///
    /// With `active_only`, upcoming alerts are excluded.
    pub async fn alerts(
        &self,
        route: Option<&str>,
        active_only: bool,
    ) -> Result<Vec<Value>, FetchError> {
        let lifecycle = if active_only {
            "NEW,ONGOING,UPDATE"
        } else {
            "NEW,ONGOING,UPDATE,UPCOMING"
        };

        let mut params = params(&[
            ("sort", "-updated_at"),
            ("page[limit]", ALERT_PAGE_LIMIT),
            ("filter[activity]", "BOARD,EXIT,RIDE"),
            ("filter[lifecycle]", lifecycle),
        ]);
        if let Some(route) = route.filter(|r| !r.is_empty()) {
            params.insert("filter[route]".to_string(), route.to_string());
        }

        self.data("/alerts", &params).await
    }

    /// Subway routes.
    pub async fn routes(&self) -> Result<Vec<Value>, FetchError> {
        let params = params(&[("filter[type]", SUBWAY_ROUTE_TYPES)]);
        self.data("/routes", &params).await
    }

    /// Subway stops matching a free-text name.
    pub async fn find_stops(&self, query: &str) -> Result<Vec<Value>, FetchError> {
        let name = self.aliases.normalize(query);
        let params = params(&[
            ("filter[route_type]", SUBWAY_ROUTE_TYPES),
            ("filter[name]", name.as_str()),
        ]);
        self.data("/stops", &params).await
    }

    /// Upcoming arrivals at a stop, soonest first.
    pub async fn predictions(
        &self,
        stop_id: &str,
        route: Option<&str>,
    ) -> Result<Vec<Value>, FetchError> {
        let mut params = params(&[("filter[stop]", stop_id), ("sort", "arrival_time")]);
        if let Some(route) = route.filter(|r| !r.is_empty()) {
            params.insert("filter[route]".to_string(), route.to_string());
        }
        self.data("/predictions", &params).await
    }

    async fn data(
        &self,
        path: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<Vec<Value>, FetchError> {
        let document = self
            .fetcher
            .get(path, params, true, DEFAULT_GET_RETRIES)
            .await?;

        match document.get("data") {
            Some(Value::Array(items)) => Ok(items.clone()),
            _ => {
                debug!(path, "Response has no data array");
                Ok(Vec::new())
            }
        }
    }
}

fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
