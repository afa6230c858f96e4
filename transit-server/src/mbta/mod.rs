//! MBTA v3 API client.
//!
//! Queries go through [`crate::remote::RemoteFetcher`], so responses are
//! cached for a minute and transient failures are retried. Results are the
//! raw JSON:API `data` arrays; alerts and predictions are decoded only to
//! build rider-facing summaries.

mod alerts;
mod client;
mod predictions;
mod types;

pub use alerts::{AlertSummary, SUMMARY_LIMIT, describe_alert, rank_alerts, summarize_alerts};
pub use client::MbtaClient;
pub use predictions::{PREDICTION_LIMIT, summarize_predictions};
pub use types::{
    ActivePeriod, Alert, AlertAttributes, Prediction, PredictionAttributes,
    PredictionRelationships, Relationship, ResourceRef,
};
