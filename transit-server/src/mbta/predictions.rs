//! Rider-facing text for upcoming arrivals.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use super::types::Prediction;

/// Predictions considered for a departures line.
pub const PREDICTION_LIMIT: usize = 8;

/// Summarise a predictions `data` array as e.g. `Red in 3 min, Red in 9 min`.
///
/// Only the first [`PREDICTION_LIMIT`] entries are read. Entries without a
/// parseable arrival time are skipped; arrivals already due show as 0 min.
pub fn summarize_predictions(data: &[Value], stop_name: &str, now: DateTime<Utc>) -> String {
    if data.is_empty() {
        return if stop_name.is_empty() {
            "No upcoming departures.".to_string()
        } else {
            format!("No upcoming departures for {stop_name}.")
        };
    }

    let times: Vec<String> = data
        .iter()
        .take(PREDICTION_LIMIT)
        .filter_map(|value| departure(value, now))
        .collect();

    if times.is_empty() {
        "No upcoming departures.".to_string()
    } else {
        times.join(", ")
    }
}

fn departure(value: &Value, now: DateTime<Utc>) -> Option<String> {
    let prediction = Prediction::from_value(value)
        .inspect_err(|e| debug!(error = %e, "Skipping malformed prediction"))
        .ok()?;
    let raw = prediction
        .attributes
        .arrival_time
        .as_deref()
        .filter(|t| !t.is_empty())?;
    let arrival = DateTime::parse_from_rfc3339(raw)
        .inspect_err(|e| debug!(arrival = raw, error = %e, "Skipping unparseable arrival"))
        .ok()?;

    let minutes = (arrival.with_timezone(&Utc) - now)
        .num_seconds()
        .div_euclid(60)
        .max(0);
    let route = prediction.route_id().unwrap_or("?");
    Some(format!("{route} in {minutes} min"))
}
