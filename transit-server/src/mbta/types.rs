//! MBTA v3 API alert and prediction resources.
//!
//! Only the attributes used for ranking and summaries are modelled. The
//! API sends `null` for absent fields, so everything is optional.

use serde::Deserialize;
use serde_json::Value;

/// A JSON:API alert resource.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Alert {
    pub id: Option<String>,

    #[serde(default)]
    pub attributes: AlertAttributes,
}

impl Alert {
    /// Decode one element of an alerts `data` array.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Alert::deserialize(value)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertAttributes {
    /// 0 (informational) to 10 (most severe).
    pub severity: Option<i64>,

    /// e.g. `DELAY`, `SHUTTLE`, `SUSPENSION`.
    pub effect: Option<String>,

    pub short_header: Option<String>,
    pub header: Option<String>,
    pub description: Option<String>,

    /// e.g. `NEW`, `ONGOING`, `UPCOMING`.
    pub lifecycle: Option<String>,

    pub active_period: Option<Vec<ActivePeriod>>,
}

/// ISO 8601 bounds of an alert's active window.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivePeriod {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// A JSON:API prediction resource.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Prediction {
    pub id: Option<String>,

    #[serde(default)]
    pub attributes: PredictionAttributes,

    #[serde(default)]
    pub relationships: PredictionRelationships,
}

impl Prediction {
    /// Decode one element of a predictions `data` array.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Prediction::deserialize(value)
    }

    /// Id of the route this prediction is for.
    pub fn route_id(&self) -> Option<&str> {
        self.relationships
            .route
            .as_ref()
            .and_then(|r| r.data.as_ref())
            .and_then(|d| d.id.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionAttributes {
    /// ISO 8601; `null` at the first stop of a trip.
    pub arrival_time: Option<String>,
    pub departure_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionRelationships {
    pub route: Option<Relationship>,
}

/// `{"data": {"type": ..., "id": ...}}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Relationship {
    pub data: Option<ResourceRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceRef {
    pub id: Option<String>,
}
