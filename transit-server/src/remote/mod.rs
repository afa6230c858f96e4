//! Remote JSON fetching.
//!
//! A [`RemoteFetcher`] wraps a [`Transport`] with a TTL response cache for
//! GET requests and bounded retry with linear backoff for both GET and
//! POST.

mod cache;
mod client;
mod error;
mod mock;
mod transport;

pub use cache::{CacheConfig, CacheKey, ResponseCache};
pub use client::{
    DEFAULT_BASE_URL, DEFAULT_GET_RETRIES, DEFAULT_POST_RETRIES, FetcherConfig, RemoteFetcher,
};
pub use error::FetchError;
pub use mock::MockTransport;
pub use transport::{HttpTransport, Method, OutboundRequest, Transport};
