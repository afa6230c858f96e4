//! Ranking and rider-facing summaries of service alerts.

use chrono::DateTime;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::types::Alert;

/// Alerts shown in a summary.
pub const SUMMARY_LIMIT: usize = 5;

/// Text summary of an alerts response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertSummary {
    /// Up to [`SUMMARY_LIMIT`] alerts, blank-line separated.
    pub text: String,
    /// Total alerts received, before the cap.
    pub count: usize,
}

/// Current alerts first, then upcoming, then anything else.
fn lifecycle_rank(lifecycle: Option<&str>) -> u8 {
    match lifecycle {
        Some("NEW" | "ONGOING" | "ACTIVE") => 0,
        Some("UPCOMING") => 1,
        _ => 2,
    }
}

/// Sort key: lifecycle rank, then severity descending.
fn rank(alert: &Alert) -> (u8, i64) {
    let attrs = &alert.attributes;
    (
        lifecycle_rank(attrs.lifecycle.as_deref()),
        -attrs.severity.unwrap_or(0),
    )
}

/// Order alerts for display. Stable for equal ranks.
pub fn rank_alerts(mut alerts: Vec<Alert>) -> Vec<Alert> {
    alerts.sort_by_key(rank);
    alerts
}

fn severity_icon(severity: i64) -> &'static str {
    match severity {
        2..=4 => "⚠️",
        5..=10 => "⛔",
        _ => "ℹ️",
    }
}

/// `STOP_MOVED` -> `Stop Moved`.
fn title_case(raw: &str) -> String {
    raw.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn effect_label(effect: Option<&str>) -> String {
    match effect {
        Some("DELAY") => "Delay".to_string(),
        Some("SHUTTLE") => "Shuttle bus".to_string(),
        Some("DETOUR") => "Detour".to_string(),
        Some("SUSPENSION") => "Suspension".to_string(),
        Some("STOP_MOVED") => "Stop moved".to_string(),
        Some(other) if !other.is_empty() => title_case(other),
        _ => "Notice".to_string(),
    }
}

/// Format an ISO 8601 timestamp as e.g. `Oct 16, 5:00 AM`.
///
/// Unparseable input is returned as-is.
fn format_time(ts: Option<&str>) -> String {
    match ts {
        None | Some("") => String::new(),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.format("%b %-d, %-I:%M %p").to_string())
            .unwrap_or_else(|_| raw.to_string()),
    }
}

/// One alert as rider-facing text.
pub fn describe_alert(alert: &Alert) -> String {
    let attrs = &alert.attributes;

    let icon = severity_icon(attrs.severity.unwrap_or(0));
    let effect = effect_label(attrs.effect.as_deref());
    let header = [attrs.short_header.as_deref(), attrs.header.as_deref()]
        .into_iter()
        .flatten()
        .find(|h| !h.is_empty())
        .unwrap_or("Service advisory");

    let period = attrs
        .active_period
        .as_deref()
        .and_then(|p| p.first())
        .cloned()
        .unwrap_or_default();
    let start = format_time(period.start.as_deref());
    let end = format_time(period.end.as_deref());
    let life = title_case(attrs.lifecycle.as_deref().unwrap_or(""));

    let mut text = format!("{icon} {effect}: {header}");
    if !(start.is_empty() && end.is_empty() && life.is_empty()) {
        text.push_str(&format!(" ({life} • {start}–{end})"));
    }
    if let Some(desc) = attrs.description.as_deref().filter(|d| !d.is_empty()) {
        text.push('\n');
        text.push_str(desc);
    }
    text
}

/// Summarise an alerts `data` array.
///
/// Elements that are not alert objects still count towards the total but
/// are left out of the text.
pub fn summarize_alerts(data: &[Value]) -> AlertSummary {
    if data.is_empty() {
        return AlertSummary {
            text: "No current alerts.".to_string(),
            count: 0,
        };
    }

    let alerts: Vec<Alert> = data
        .iter()
        .filter_map(|value| match Alert::from_value(value) {
            Ok(alert) => Some(alert),
            Err(e) => {
                debug!(error = %e, "Skipping malformed alert");
                None
            }
        })
        .collect();

    let text = rank_alerts(alerts)
        .iter()
        .take(SUMMARY_LIMIT)
        .map(describe_alert)
        .collect::<Vec<_>>()
        .join("\n\n");

    AlertSummary {
        text,
        count: data.len(),
    }
}
