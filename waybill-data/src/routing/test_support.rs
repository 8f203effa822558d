//! Test utilities for route providers.
//!
//! This module provides [`StubRouteProvider`], a deterministic test double
//! for [`RouteProvider`] that returns pre-configured responses without
//! making actual HTTP requests.

use std::time::Duration;

use waybill_core::{RouteError, RouteLeg, RouteProvider, RouteRequest, RouteResult};

/// Stub `RouteProvider` for testing.
///
/// The provider validates requests the way a real provider would, then
/// returns its pre-configured response, allowing behaviour tests to run
/// without a directions service.
///
/// # Example
///
/// ```
/// use waybill_core::{Origin, RouteProvider, RouteRequest, RouteResult, Stop};
/// use waybill_data::routing::test_support::StubRouteProvider;
///
/// let provider = StubRouteProvider::with_result(RouteResult::new(vec![0], Vec::new()));
/// let request = RouteRequest {
///     origin: Origin::address("800 Robson St")?,
///     stops: vec![
///         Stop::new("1596 Johnston St", "59", 1),
///         Stop::new("550 W Broadway", "62", 2),
///     ],
/// };
/// assert!(provider.optimize(&request).is_ok());
/// # Ok::<(), waybill_core::OriginError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StubRouteProvider {
    response: StubResponse,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Result(RouteResult),
    Error(RouteError),
}

impl StubRouteProvider {
    /// Create a provider that returns the given result.
    ///
    /// The result is returned for any request that passes validation.
    #[must_use]
    pub fn with_result(result: RouteResult) -> Self {
        Self {
            response: StubResponse::Result(result),
        }
    }

    /// Create a provider that returns the given error.
    ///
    /// The error is returned for any request that passes validation;
    /// invalid requests still fail validation first.
    #[must_use]
    pub fn with_error(error: RouteError) -> Self {
        Self {
            response: StubResponse::Error(error),
        }
    }

    /// Create a provider that keeps the request's visiting order.
    ///
    /// Builds an identity permutation over `stop_count - 1` waypoints with
    /// one-kilometre, five-minute legs.
    #[must_use]
    pub fn with_identity_route(stop_count: usize) -> Self {
        let waypoints = stop_count.saturating_sub(1);
        let legs = (0..stop_count).map(|_| unit_leg()).collect();
        Self::with_result(RouteResult::new((0..waypoints).collect(), legs))
    }
}

/// One-kilometre, five-minute leg used by the identity stub.
fn unit_leg() -> RouteLeg {
    RouteLeg {
        distance_meters: 1_000,
        duration: Duration::from_secs(300),
        end_address: String::new(),
        end_location: geo::Coord { x: 0.0, y: 0.0 },
    }
}

impl RouteProvider for StubRouteProvider {
    fn optimize(&self, request: &RouteRequest) -> Result<RouteResult, RouteError> {
        request.validate()?;

        match &self.response {
            StubResponse::Result(result) => Ok(result.clone()),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}
