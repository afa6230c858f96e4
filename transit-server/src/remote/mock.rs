//! In-memory transport for development and tests.
//!
//! Serves canned JSON documents keyed by URL path and records every
//! request it receives. When several registered paths are suffixes of a
//! URL, the longest one answers.

use std::sync::Mutex;

use serde_json::Value;

use super::error::FetchError;
use super::transport::{OutboundRequest, Transport};

enum Canned {
    Body(Value),
    Status(u16),
}

/// Transport that answers from a fixed table instead of the network.
#[derive(Default)]
pub struct MockTransport {
    responses: Vec<(String, Canned)>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests whose URL ends with `path` with `body`.
    pub fn with_response(self, path: impl Into<String>, body: Value) -> Self {
        self.register(path.into(), Canned::Body(body))
    }

    /// Answer requests whose URL ends with `path` with an error status.
    pub fn with_status(self, path: impl Into<String>, status: u16) -> Self {
        self.register(path.into(), Canned::Status(status))
    }

    /// Registering a path again replaces its answer.
    fn register(mut self, path: String, canned: Canned) -> Self {
        match self.responses.iter_mut().find(|(p, _)| *p == path) {
            Some(slot) => slot.1 = canned,
            None => self.responses.push((path, canned)),
        }
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.lock_requests().clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock_requests().len()
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<OutboundRequest>> {
        // A poisoned log is still a valid log
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn answer(&self, url: &str) -> Result<Value, FetchError> {
        let canned = self
            .responses
            .iter()
            .filter(|(path, _)| url.ends_with(path.as_str()))
            .max_by_key(|(path, _)| path.len())
            .map(|(_, canned)| canned);

        match canned {
            Some(Canned::Body(body)) => Ok(body.clone()),
            Some(Canned::Status(status)) => Err(FetchError::Status {
                status: *status,
                message: "mock failure".to_string(),
            }),
            None => Err(FetchError::Status {
                status: 404,
                message: format!("no mock response for {url}"),
            }),
        }
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<Value, FetchError> {
        self.lock_requests().push(request.clone());
        self.answer(&request.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn serves_canned_bodies_by_path() {
        let mock = MockTransport::new()
            .with_response("/routes", json!({"data": []}))
            .with_status("/alerts", 503);

        let ok = mock
            .send(&OutboundRequest::get("http://x/routes", vec![]))
            .await
            .unwrap();
        assert_eq!(ok, json!({"data": []}));

        let err = mock
            .send(&OutboundRequest::get("http://x/alerts", vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(503));

        let err = mock
            .send(&OutboundRequest::get("http://x/stops", vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));

        assert_eq!(mock.call_count(), 3);
        assert_eq!(mock.requests()[2].url, "http://x/stops");
    }

    #[tokio::test]
    async fn longest_matching_path_wins() {
        let mock = MockTransport::new()
            .with_response("/stops", json!({"data": "stops"}))
            .with_response("/routes/stops", json!({"data": "route stops"}))
            .with_status("s", 500);

        for _ in 0..5 {
            let body = mock
                .send(&OutboundRequest::get("http://x/routes/stops", vec![]))
                .await
                .unwrap();
            assert_eq!(body, json!({"data": "route stops"}));

            let body = mock
                .send(&OutboundRequest::get("http://x/stops", vec![]))
                .await
                .unwrap();
            assert_eq!(body, json!({"data": "stops"}));
        }

        let err = mock
            .send(&OutboundRequest::get("http://x/alerts", vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn registering_a_path_again_replaces_it() {
        let mock = MockTransport::new()
            .with_status("/routes", 503)
            .with_response("/routes", json!({"data": []}));

        let body = mock
            .send(&OutboundRequest::get("http://x/routes", vec![]))
            .await
            .unwrap();
        assert_eq!(body, json!({"data": []}));
    }
}
