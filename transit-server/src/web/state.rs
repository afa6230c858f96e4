//! Application state for the web layer.

use std::sync::Arc;

use crate::mbta::MbtaClient;
use crate::planner::RoutePlanner;
use crate::remote::HttpTransport;

/// Shared application state.
///
/// Generic over the MBTA transport so handlers can be exercised against an
/// in-memory API.
pub struct AppState<T = HttpTransport> {
    /// Static route planner
    pub planner: Arc<RoutePlanner>,

    /// MBTA API client
    pub mbta: Arc<MbtaClient<T>>,
}

impl<T> AppState<T> {
    /// Create a new app state.
    pub fn new(planner: RoutePlanner, mbta: MbtaClient<T>) -> Self {
        Self {
            planner: Arc::new(planner),
            mbta: Arc::new(mbta),
        }
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            planner: Arc::clone(&self.planner),
            mbta: Arc::clone(&self.mbta),
        }
    }
}
