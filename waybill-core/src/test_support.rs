//! Test-only doubles for the engine's trait seams, used by unit and
//! behaviour tests.

use std::time::Duration;

use geo::Coord;

use crate::origin::{LocateError, Locator};
use crate::provider::{RouteError, RouteProvider, RouteRequest};
use crate::route::{RouteLeg, RouteResult};
use crate::visualize::RouteVisualizer;

/// Deterministic provider returning the identity visiting order.
///
/// Every leg is one kilometre and one minute long, ending at the
/// corresponding stop's address. Requests are validated the way a real
/// provider would.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityRouteProvider;

impl RouteProvider for IdentityRouteProvider {
    fn optimize(&self, request: &RouteRequest) -> Result<RouteResult, RouteError> {
        request.validate()?;
        let legs = request
            .stops
            .iter()
            .map(|stop| RouteLeg {
                distance_meters: 1_000,
                duration: Duration::from_secs(60),
                end_address: stop.address.clone(),
                end_location: Coord { x: 0.0, y: 0.0 },
            })
            .collect();
        let order = (0..request.waypoints().len()).collect();
        Ok(RouteResult::new(order, legs))
    }
}

/// Visualizer that counts how it was driven.
#[derive(Debug, Default)]
pub struct RecordingVisualizer {
    /// Number of `show_route` calls observed.
    pub shown: usize,
    /// Number of `clear` calls observed.
    pub cleared: usize,
    /// Permutation from the most recent `show_route` call.
    pub last_order: Option<Vec<usize>>,
}

impl RouteVisualizer for RecordingVisualizer {
    fn show_route(&mut self, route: &RouteResult) {
        self.shown += 1;
        self.last_order = Some(route.waypoint_order.clone());
    }

    fn clear(&mut self) {
        self.cleared += 1;
        self.last_order = None;
    }
}

/// Locator pinned to a fixed position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator {
    position: Coord<f64>,
}

impl FixedLocator {
    /// Pin the locator to the given WGS84 position.
    #[must_use]
    pub const fn at(position: Coord<f64>) -> Self {
        Self { position }
    }
}

impl Locator for FixedLocator {
    fn locate(&self) -> Result<Coord<f64>, LocateError> {
        Ok(self.position)
    }
}

/// Locator that always fails with the given reason.
#[derive(Debug, Clone)]
pub struct UnavailableLocator {
    reason: String,
}

impl UnavailableLocator {
    /// Construct a locator failing with `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Locator for UnavailableLocator {
    fn locate(&self) -> Result<Coord<f64>, LocateError> {
        Err(LocateError::Unavailable {
            reason: self.reason.clone(),
        })
    }
}
