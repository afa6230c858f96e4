//! Plain-text rendering of legs for riders.

use crate::network::WALK_ROUTE;

use super::legs::Leg;

/// Render legs one per line.
///
/// Walk legs use the network's default transfer time; ride legs show the
/// route and hop count.
pub fn render_legs(legs: &[Leg], walk_minutes: u32) -> String {
    legs.iter()
        .map(|leg| render_leg(leg, walk_minutes))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_leg(leg: &Leg, walk_minutes: u32) -> String {
    if leg.route_id() == WALK_ROUTE {
        format!("Walk: {} → {} (~{walk_minutes} min)", leg.from(), leg.to())
    } else {
        format!(
            "Take **{}**: {} → {} (~{} stops)",
            leg.route_id(),
            leg.from(),
            leg.to(),
            leg.stops_count()
        )
    }
}
