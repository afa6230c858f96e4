//! Direct walking estimate between two raw coordinates.
//!
//! Independent of the stop graph: used when a rider supplies positions
//! rather than stop names.

use chrono::Utc;
use serde::Serialize;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Walking pace: 12 minutes per kilometre (about 5 km/h).
pub const WALK_MINUTES_PER_KM: f64 = 12.0;

/// Search radius reported in route metrics.
pub const DEFAULT_RADIUS_M: u32 = 600;

/// A coordinate was missing or not a finite number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid input: {message}")]
pub struct InvalidInput {
    message: String,
}

impl InvalidInput {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Walking distance and time between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkEstimate {
    /// Great-circle distance in kilometres, unrounded.
    pub distance_km: f64,
    /// At least one minute.
    pub estimated_minutes: u32,
}

impl WalkEstimate {
    /// Distance for display: metres under 1 km, else km to one decimal.
    pub fn distance_label(&self) -> String {
        format_distance(self.distance_km)
    }
}

/// The single walking leg of a direct route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkLeg {
    pub mode: &'static str,
    pub from_point: String,
    pub to_point: String,
    pub distance: String,
    pub est_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMetrics {
    /// Rounded to metres.
    pub distance_km: f64,
    /// Unix seconds.
    pub computed_at: i64,
    pub radius_m: u32,
}

/// A walk-only route between two coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectRoute {
    pub ok: bool,
    pub summary: String,
    pub legs: Vec<WalkLeg>,
    pub metrics: RouteMetrics,
}

/// Great-circle distance between two points, in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Walking minutes for a distance, never less than one.
pub fn walk_minutes(distance_km: f64) -> u32 {
    (distance_km * WALK_MINUTES_PER_KM).round().max(1.0) as u32
}

/// Format a distance for riders.
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{} m", (distance_km * 1000.0) as u64)
    } else {
        format!("{distance_km:.1} km")
    }
}

fn require(value: Option<f64>, name: &str) -> Result<f64, InvalidInput> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(InvalidInput::new(format!("{name} is not a number"))),
        None => Err(InvalidInput::new(format!("{name} is missing"))),
    }
}

/// Estimate a walk between two coordinates.
///
/// Every coordinate must be present and finite.
pub fn estimate_walk(
    lat1: Option<f64>,
    lon1: Option<f64>,
    lat2: Option<f64>,
    lon2: Option<f64>,
) -> Result<WalkEstimate, InvalidInput> {
    let lat1 = require(lat1, "origin latitude")?;
    let lon1 = require(lon1, "origin longitude")?;
    let lat2 = require(lat2, "destination latitude")?;
    let lon2 = require(lon2, "destination longitude")?;

    let distance_km = haversine_km(lat1, lon1, lat2, lon2);
    Ok(WalkEstimate {
        distance_km,
        estimated_minutes: walk_minutes(distance_km),
    })
}

/// Build the rider-facing direct route between two coordinates.
pub fn plan_direct_route(
    origin_lat: Option<f64>,
    origin_lng: Option<f64>,
    dest_lat: Option<f64>,
    dest_lng: Option<f64>,
    radius_m: u32,
) -> Result<DirectRoute, InvalidInput> {
    let estimate = estimate_walk(origin_lat, origin_lng, dest_lat, dest_lng)?;

    // Validated above
    let point = |lat: Option<f64>, lng: Option<f64>| {
        format!("{:.5},{:.5}", lat.unwrap_or_default(), lng.unwrap_or_default())
    };

    let leg = WalkLeg {
        mode: "walk",
        from_point: point(origin_lat, origin_lng),
        to_point: point(dest_lat, dest_lng),
        distance: estimate.distance_label(),
        est_minutes: estimate.estimated_minutes,
    };

    Ok(DirectRoute {
        ok: true,
        summary: format!("Walk {} (~{} min).", leg.distance, leg.est_minutes),
        legs: vec![leg],
        metrics: RouteMetrics {
            distance_km: (estimate.distance_km * 1000.0).round() / 1000.0,
            computed_at: Utc::now().timestamp(),
            radius_m,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARK_STREET: (f64, f64) = (42.3601, -71.0589);

    #[test]
    fn same_point_is_zero_distance_one_minute() {
        let (lat, lon) = PARK_STREET;
        let est = estimate_walk(Some(lat), Some(lon), Some(lat), Some(lon)).unwrap();

        assert_eq!(est.distance_km, 0.0);
        assert_eq!(est.estimated_minutes, 1);
        assert_eq!(est.distance_label(), "0 m");
    }

    #[test]
    fn one_kilometre_is_about_twelve_minutes() {
        // 1 km due north: 1 / 6371 radians of latitude
        let (lat, lon) = PARK_STREET;
        let north = lat + (1.0 / EARTH_RADIUS_KM).to_degrees();
        let est = estimate_walk(Some(lat), Some(lon), Some(north), Some(lon)).unwrap();

        assert!((est.distance_km - 1.0).abs() < 1e-6);
        assert_eq!(est.estimated_minutes, 12);

        let further = lat + (1.5 / EARTH_RADIUS_KM).to_degrees();
        let est = estimate_walk(Some(lat), Some(lon), Some(further), Some(lon)).unwrap();
        assert_eq!(est.distance_label(), "1.5 km");
        assert_eq!(est.estimated_minutes, 18);
    }

    #[test]
    fn known_distance_boston_to_cambridge() {
        // Park Street to Harvard Square, roughly 5 km
        let d = haversine_km(42.3564, -71.0624, 42.3734, -71.1189);
        assert!((4.9..5.1).contains(&d), "got {d}");
    }

    #[test]
    fn minutes_rounding() {
        assert_eq!(walk_minutes(0.0), 1);
        assert_eq!(walk_minutes(0.05), 1);
        assert_eq!(walk_minutes(0.125), 2);
        assert_eq!(walk_minutes(2.5), 30);
    }

    #[test]
    fn distance_formatting() {
        assert_eq!(format_distance(0.4567), "456 m");
        assert_eq!(format_distance(0.9995), "999 m");
        assert_eq!(format_distance(1.0), "1.0 km");
        assert_eq!(format_distance(3.26), "3.3 km");
    }

    #[test]
    fn missing_coordinate_is_invalid() {
        let err = estimate_walk(Some(42.0), None, Some(42.0), Some(-71.0)).unwrap_err();
        assert_eq!(err.message(), "origin longitude is missing");
        assert_eq!(err.to_string(), "invalid input: origin longitude is missing");
    }

    #[test]
    fn non_finite_coordinate_is_invalid() {
        let err =
            estimate_walk(Some(42.0), Some(-71.0), Some(f64::NAN), Some(-71.0)).unwrap_err();
        assert_eq!(err.message(), "destination latitude is not a number");

        assert!(estimate_walk(Some(f64::INFINITY), Some(0.0), Some(0.0), Some(0.0)).is_err());
    }

    #[test]
    fn direct_route_shape() {
        let route = plan_direct_route(
            Some(42.3601),
            Some(-71.0589),
            Some(42.3601),
            Some(-71.0589),
            DEFAULT_RADIUS_M,
        )
        .unwrap();

        assert!(route.ok);
        assert_eq!(route.summary, "Walk 0 m (~1 min).");
        assert_eq!(route.legs.len(), 1);
        assert_eq!(route.legs[0].mode, "walk");
        assert_eq!(route.legs[0].from_point, "42.36010,-71.05890");
        assert_eq!(route.legs[0].to_point, "42.36010,-71.05890");
        assert_eq!(route.metrics.distance_km, 0.0);
        assert_eq!(route.metrics.radius_m, 600);
        assert!(route.metrics.computed_at > 0);
    }

    #[test]
    fn direct_route_rejects_missing_input() {
        let result = plan_direct_route(None, None, None, None, DEFAULT_RADIUS_M);
        assert!(result.is_err());
    }
}
