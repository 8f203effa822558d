//! Trip-level metrics derived from a route result.
//!
//! Aggregates leg distances and durations into the figures the trip header
//! shows. Before the first optimization completes, a coarse per-stop
//! estimate stands in; it is tagged as such so callers can present it
//! differently, and it is replaced the moment a real provider result
//! arrives.

use std::time::Duration;

use crate::route::RouteResult;

/// Assumed driving distance per stop for the placeholder estimate.
const ESTIMATE_METERS_PER_STOP: u64 = 3_000;

/// Assumed driving time per stop for the placeholder estimate.
const ESTIMATE_SECS_PER_STOP: u64 = 9 * 60;

/// Where a [`TripSummary`]'s figures came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum SummarySource {
    /// Derived from a provider-confirmed route.
    Provider,
    /// Derived from the stop count alone; no guarantee attached.
    Estimate,
}

/// Aggregate distance and duration for the current trip.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use geo::Coord;
/// use waybill_core::{RouteLeg, RouteResult, TripSummary};
///
/// let leg = |meters, secs| RouteLeg {
///     distance_meters: meters,
///     duration: Duration::from_secs(secs),
///     end_address: String::new(),
///     end_location: Coord { x: 0.0, y: 0.0 },
/// };
/// let route = RouteResult::new(vec![0], vec![leg(8_240, 1_800), leg(4_010, 2_100)]);
/// let summary = TripSummary::from_route(&route);
/// assert_eq!(summary.distance_km(), 12.3);
/// assert_eq!(summary.duration_label(), "1h 5min");
/// assert!(!summary.is_estimate());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripSummary {
    /// Total driving distance in metres.
    pub total_distance_meters: u64,
    /// Total driving time.
    pub total_duration: Duration,
    /// Provenance of the figures.
    pub source: SummarySource,
}

impl TripSummary {
    /// Aggregate a provider-confirmed route.
    #[must_use]
    pub fn from_route(route: &RouteResult) -> Self {
        Self {
            total_distance_meters: route.total_distance_meters(),
            total_duration: route.total_duration(),
            source: SummarySource::Provider,
        }
    }

    /// Placeholder figures derived from the stop count alone.
    ///
    /// Assumes three kilometres and nine minutes of driving per stop — a
    /// coarse heuristic, not a promise. Replaced as soon as a provider
    /// result is available.
    #[must_use]
    pub fn estimate(stop_count: usize) -> Self {
        let stops = stop_count as u64;
        Self {
            total_distance_meters: stops * ESTIMATE_METERS_PER_STOP,
            total_duration: Duration::from_secs(stops * ESTIMATE_SECS_PER_STOP),
            source: SummarySource::Estimate,
        }
    }

    /// Whether these figures are the placeholder estimate.
    #[must_use]
    pub const fn is_estimate(&self) -> bool {
        matches!(self.source, SummarySource::Estimate)
    }

    /// Total distance in kilometres, rounded to one decimal.
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "display rounding to one decimal is the summary contract"
    )]
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        ((self.total_distance_meters as f64) / 100.0).round() / 10.0
    }

    /// Total duration formatted as `"{h}h {m}min"` by floor division.
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "floor division is the documented display contract"
    )]
    #[must_use]
    pub fn duration_label(&self) -> String {
        let secs = self.total_duration.as_secs();
        let hours = secs / 3_600;
        let minutes = (secs % 3_600) / 60;
        format!("{hours}h {minutes}min")
    }
}
