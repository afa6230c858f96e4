//! Single-attempt HTTP exchange.
//!
//! The fetcher owns caching and retry; a [`Transport`] only performs one
//! request. Tests substitute a scripted transport.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde_json::Value;

use super::error::FetchError;

const CLIENT_USER_AGENT: &str = concat!("transit-server/", env!("CARGO_PKG_VERSION"));

/// HTTP method of an outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A fully resolved request.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl OutboundRequest {
    pub fn get(url: impl Into<String>, query: Vec<(String, String)>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            query,
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }
}

/// Performs one HTTP exchange and decodes the JSON body.
///
/// Non-2xx responses must be reported as [`FetchError::Status`].
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &OutboundRequest,
    ) -> impl Future<Output = Result<Value, FetchError>> + Send;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a per-request timeout.
    ///
    /// When an API key is given it is sent as the `x-api-key` header.
    pub fn new(api_key: Option<&str>, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(key)
                .map_err(|_| FetchError::Config("invalid API key format".to_string()))?;
            headers.insert(HeaderName::from_static("x-api-key"), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<Value, FetchError> {
        let builder = match request.method {
            Method::Get => self.http.get(&request.url).query(&request.query),
            Method::Post => {
                let builder = self.http.post(&request.url);
                match &request.body {
                    Some(body) => builder.json(body),
                    None => builder,
                }
            }
        };

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Json {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_creation() {
        assert!(HttpTransport::new(None, Duration::from_secs(10)).is_ok());
        assert!(HttpTransport::new(Some("abc123"), Duration::from_secs(10)).is_ok());
        // Empty key is ignored rather than sent
        assert!(HttpTransport::new(Some(""), Duration::from_secs(10)).is_ok());
    }

    #[test]
    fn invalid_api_key_is_rejected() {
        let result = HttpTransport::new(Some("bad\nkey"), Duration::from_secs(10));
        assert!(matches!(result, Err(FetchError::Config(_))));
    }

    #[test]
    fn request_constructors() {
        let get = OutboundRequest::get("http://x/a", vec![("k".into(), "v".into())]);
        assert_eq!(get.method, Method::Get);
        assert!(get.body.is_none());

        let post = OutboundRequest::post("http://x/b", serde_json::json!({"a": 1}));
        assert_eq!(post.method, Method::Post);
        assert!(post.query.is_empty());
        assert_eq!(post.body, Some(serde_json::json!({"a": 1})));
    }
}
