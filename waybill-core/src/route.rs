//! Normalized route-provider results.
//!
//! A [`RouteResult`] is the neutral shape every provider response is
//! reduced to before it touches the rest of the engine: the optimized
//! visiting order over the reorderable waypoints plus per-leg metrics. It
//! is ephemeral — consumed to reorder the manifest, derive a summary, and
//! drive the visualizer, never stored.

use std::time::Duration;

use geo::Coord;

/// One driving leg of an optimized route.
///
/// Legs run in driving order: origin to the first visited stop, then stop
/// to stop through the pinned destination. The end address and position
/// exist for marker placement by the rendering collaborator; the engine
/// itself only aggregates the metrics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteLeg {
    /// Driving distance in metres.
    pub distance_meters: u64,
    /// Driving time.
    pub duration: Duration,
    /// Resolved address of the leg's end point.
    pub end_address: String,
    /// End position in WGS84 (`x = longitude`, `y = latitude`).
    pub end_location: Coord<f64>,
}

/// Normalized response from a route-optimization provider.
///
/// `waypoint_order` is the provider's permutation of the reorderable
/// waypoints — every active stop except the pinned destination — expressed
/// as indices into the active subset the request was built from.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use geo::Coord;
/// use waybill_core::{RouteLeg, RouteResult};
///
/// let leg = RouteLeg {
///     distance_meters: 1_200,
///     duration: Duration::from_secs(300),
///     end_address: "1596 Johnston St".to_owned(),
///     end_location: Coord { x: -123.13, y: 49.27 },
/// };
/// let route = RouteResult::new(vec![0], vec![leg.clone(), leg]);
/// assert_eq!(route.total_distance_meters(), 2_400);
/// assert_eq!(route.total_duration(), Duration::from_secs(600));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteResult {
    /// Optimized visiting order over the waypoints, destination excluded.
    pub waypoint_order: Vec<usize>,
    /// Per-leg metrics in driving order.
    pub legs: Vec<RouteLeg>,
}

impl RouteResult {
    /// Construct a result from a permutation and its legs.
    #[must_use]
    pub const fn new(waypoint_order: Vec<usize>, legs: Vec<RouteLeg>) -> Self {
        Self {
            waypoint_order,
            legs,
        }
    }

    /// Total driving distance in metres across all legs.
    #[must_use]
    pub fn total_distance_meters(&self) -> u64 {
        self.legs.iter().map(|leg| leg.distance_meters).sum()
    }

    /// Total driving time across all legs.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.legs.iter().map(|leg| leg.duration).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn leg(distance_meters: u64, secs: u64) -> RouteLeg {
        RouteLeg {
            distance_meters,
            duration: Duration::from_secs(secs),
            end_address: "550 W Broadway".to_owned(),
            end_location: Coord { x: 0.0, y: 0.0 },
        }
    }

    #[rstest]
    fn totals_sum_over_legs() {
        let route = RouteResult::new(vec![1, 0], vec![leg(500, 60), leg(1_500, 240)]);
        assert_eq!(route.total_distance_meters(), 2_000);
        assert_eq!(route.total_duration(), Duration::from_secs(300));
    }

    #[rstest]
    fn empty_route_has_zero_totals() {
        let route = RouteResult::new(Vec::new(), Vec::new());
        assert_eq!(route.total_distance_meters(), 0);
        assert_eq!(route.total_duration(), Duration::ZERO);
    }
}
