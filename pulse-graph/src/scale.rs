//! Visual scales: agent count to radius, trust tier to gravity

use pulse_core::Trust;

pub const MIN_RADIUS: f64 = 8.0;
pub const MAX_RADIUS: f64 = 40.0;

/// Agent count that maps onto [`MAX_RADIUS`]
const RADIUS_CEILING_AGENTS: f64 = 546_000.0;

/// Node radius for an agent count
///
/// `ln(agents + 1)` is mapped linearly from `[ln 1, ln 546001]` onto
/// `[8, 40]` and capped at 40. Unknown and zero counts get the minimum.
pub fn get_node_radius(agents: Option<u64>) -> f64 {
    match agents {
        None | Some(0) => MIN_RADIUS,
        Some(count) => {
            let t = (count as f64 + 1.0).ln() / (RADIUS_CEILING_AGENTS + 1.0).ln();
            (MIN_RADIUS + t * (MAX_RADIUS - MIN_RADIUS)).min(MAX_RADIUS)
        }
    }
}

/// Pull toward the center for a trust tier; trusted spaces sit in the middle
pub const fn get_trust_gravity(trust: Trust) -> f64 {
    match trust {
        Trust::High => 1.0,
        Trust::MediumHigh => 0.8,
        Trust::Medium => 0.5,
        Trust::Low => 0.2,
        Trust::Critical => 0.1,
        Trust::Avoid => 0.0,
    }
}
