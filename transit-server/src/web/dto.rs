//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mbta::AlertSummary;
use crate::planner::{Leg, TripPlan};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Request to normalise a stop name.
#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    /// Free-text stop name
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub ok: bool,
    /// The name as given
    pub input: String,
    /// Canonical stop name
    pub normalized: String,
}

/// Request to plan between two named stops.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub origin: String,
    pub destination: String,
}

/// Legs between two stops, without rendered text.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub ok: bool,
    pub origin: String,
    pub destination: String,
    pub legs: Vec<Leg>,
}

impl From<TripPlan> for RouteResponse {
    fn from(plan: TripPlan) -> Self {
        Self {
            ok: plan.ok,
            origin: plan.origin,
            destination: plan.destination,
            legs: plan.legs,
        }
    }
}

/// Request for a direct walk between two coordinates.
///
/// Coordinates arrive as raw strings so that malformed values produce a
/// structured error instead of a query rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PlanDirectRequest {
    pub origin_lat: Option<String>,
    pub origin_lng: Option<String>,
    pub dest_lat: Option<String>,
    pub dest_lng: Option<String>,

    /// Search radius in metres (default 600)
    pub radius_m: Option<u32>,
}

/// Parse a raw coordinate.
///
/// Absent stays absent; present but unparseable becomes NaN, which the
/// estimator reports as "not a number".
pub fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    raw.map(|s| s.trim().parse().unwrap_or(f64::NAN))
}

/// Request for service alerts.
#[derive(Debug, Deserialize)]
pub struct AlertsRequest {
    /// Route id filter, e.g. `Red`
    pub route: Option<String>,

    /// Exclude upcoming alerts (default true)
    pub active_only: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub ok: bool,
    pub route: Option<String>,
    /// Alerts received, before the summary cap
    pub count: usize,
    /// Rider-facing summary of the top alerts
    pub text: String,
    /// Raw JSON:API alert resources
    pub alerts: Vec<Value>,
}

impl AlertsResponse {
    pub fn new(route: Option<String>, summary: AlertSummary, alerts: Vec<Value>) -> Self {
        Self {
            ok: true,
            route,
            count: summary.count,
            text: summary.text,
            alerts,
        }
    }
}

/// Request to search stops by name.
#[derive(Debug, Deserialize)]
pub struct StopSearchRequest {
    pub name: String,
}

/// Request for predictions at a stop.
#[derive(Debug, Deserialize)]
pub struct PredictionsRequest {
    /// MBTA stop id, e.g. `place-pktrm`
    pub stop: String,
    pub route: Option<String>,
}

/// A JSON:API `data` array passed through.
#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub ok: bool,
    pub data: Vec<Value>,
}

/// Upcoming arrivals at a stop, as text and raw predictions.
#[derive(Debug, Serialize)]
pub struct PredictionsResponse {
    pub ok: bool,
    pub stop: String,
    /// e.g. `Red in 3 min, Red in 9 min`
    pub text: String,
    pub data: Vec<Value>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always false
    pub ok: bool,
    /// Error message
    pub error: String,
}
