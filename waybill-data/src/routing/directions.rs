//! Wire types for the directions service.
//!
//! The service accepts one optimization request per call: an origin, a
//! pinned destination, and the reorderable waypoints in their current
//! order. The response carries the optimized visiting order over the
//! waypoints plus per-leg metrics, wrapped in a `code`/`message` envelope
//! for service-level failures.

use serde::{Deserialize, Serialize};
use waybill_core::RouteRequest;

/// Directions request body.
///
/// The waypoint list excludes the pinned destination; the service is free
/// to reorder waypoints but must end the route at `destination`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionsRequest {
    /// Trip origin: `"lat,lng"` or a free-text address.
    pub origin: String,
    /// Pinned destination address.
    pub destination: String,
    /// Reorderable waypoint addresses in current manifest order.
    pub waypoints: Vec<String>,
    /// Ask the service to reorder the waypoints.
    pub optimize: bool,
    /// Travel mode; always `"driving"` for courier trips.
    pub mode: String,
}

impl DirectionsRequest {
    /// Build the wire request from a validated domain request.
    #[must_use]
    pub fn from_domain(request: &RouteRequest) -> Self {
        Self {
            origin: request.origin.to_string(),
            destination: request
                .destination()
                .map(|stop| stop.address.clone())
                .unwrap_or_default(),
            waypoints: request
                .waypoints()
                .iter()
                .map(|stop| stop.address.clone())
                .collect(),
            optimize: true,
            mode: "driving".to_owned(),
        }
    }
}

/// Directions service response.
///
/// The response contains either the optimized order and legs on success or
/// an error message on failure. The `code` field indicates the status.
#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    /// Status code from the service.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route connects the requested stops
    /// - `"InvalidQuery"` - Malformed request parameters
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Optimized visiting order over the waypoints, destination excluded.
    pub order: Option<Vec<usize>>,

    /// Per-leg metrics in driving order.
    pub legs: Option<Vec<DirectionsLeg>>,
}

impl DirectionsResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

/// One leg of the returned route.
#[derive(Debug, Deserialize)]
pub struct DirectionsLeg {
    /// Driving distance in metres.
    pub distance_meters: u64,
    /// Driving time in seconds.
    pub duration_seconds: f64,
    /// Resolved address of the leg's end point.
    pub end_address: String,
    /// End position of the leg.
    pub end_location: WirePosition,
}

/// `{lat, lng}` position as the service reports it.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WirePosition {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}
