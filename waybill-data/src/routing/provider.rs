//! HTTP-based `RouteProvider` speaking the directions wire protocol.
//!
//! This module provides [`HttpRouteProvider`], an implementation of the
//! [`RouteProvider`] trait that fetches optimized multi-stop routes from a
//! directions service via HTTP.
//!
//! # Architecture
//!
//! The [`RouteProvider`] trait is synchronous to keep the core library
//! embeddable in synchronous contexts. This provider bridges the async
//! HTTP calls to the sync interface by blocking on a Tokio runtime
//! internally.

use std::time::Duration;

use reqwest::Client;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use waybill_core::{RouteError, RouteLeg, RouteProvider, RouteRequest, RouteResult};

use super::directions::{DirectionsRequest, DirectionsResponse};

/// Error type for [`HttpRouteProvider`] construction failures.
#[derive(Debug)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
    /// Failed to build the Tokio runtime.
    Runtime(std::io::Error),
}

impl std::fmt::Display for ProviderBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::Runtime(err) => write!(f, "failed to build Tokio runtime: {err}"),
        }
    }
}

impl std::error::Error for ProviderBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(err) => Some(err),
            Self::Runtime(err) => Some(err),
        }
    }
}

/// Default user agent for directions requests.
pub const DEFAULT_USER_AGENT: &str = "waybill-routing/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpRouteProvider`].
#[derive(Debug, Clone)]
pub struct HttpRouteProviderConfig {
    /// Base URL for the directions service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpRouteProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpRouteProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP-based route provider for a directions service.
///
/// This provider implements the synchronous [`RouteProvider`] trait by
/// internally blocking on asynchronous HTTP requests. It owns a Tokio
/// runtime that is reused across calls, avoiding the overhead of creating
/// a new runtime per request.
///
/// # Runtime behaviour
///
/// When called from outside any Tokio runtime, the provider uses its own
/// stored runtime. When called from within an existing multi-threaded
/// Tokio runtime (detected via [`Handle::try_current()`] and
/// [`RuntimeFlavor::MultiThread`]), it uses that runtime's handle with
/// [`tokio::task::block_in_place`] to avoid nested runtime panics.
///
/// When called from within a `current_thread` Tokio runtime, the provider
/// falls back to using its own internal runtime. This avoids the panic
/// that `block_in_place` would cause, but may lead to deadlocks if the
/// caller's runtime is driving IO or timers that this request depends on.
pub struct HttpRouteProvider {
    client: Client,
    config: HttpRouteProviderConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpRouteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRouteProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpRouteProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL for the directions service
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpRouteProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpRouteProviderConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Build the directions endpoint URL.
    ///
    /// The URL format is `{base_url}/route`; the travel mode and the
    /// optimization flag travel in the request body.
    fn build_route_url(&self) -> String {
        format!("{}/route", self.config.base_url.trim_end_matches('/'))
    }

    /// Fetch the optimized route asynchronously.
    async fn fetch_route_async(&self, request: &RouteRequest) -> Result<RouteResult, RouteError> {
        let url = self.build_route_url();
        let body = DirectionsRequest::from_domain(request);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let directions: DirectionsResponse =
            response.json().await.map_err(|err| RouteError::Parse {
                message: err.to_string(),
            })?;

        self.convert_response(directions)
    }

    /// Convert a reqwest error to a `RouteError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RouteError {
        if error.is_timeout() {
            return RouteError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return RouteError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        RouteError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    /// Convert a directions response to a `RouteResult`.
    fn convert_response(&self, response: DirectionsResponse) -> Result<RouteResult, RouteError> {
        if !response.is_ok() {
            return Err(RouteError::Service {
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }

        let order = response.order.ok_or_else(|| RouteError::Parse {
            message: "directions response missing visiting order".to_owned(),
        })?;
        let wire_legs = response.legs.ok_or_else(|| RouteError::Parse {
            message: "directions response missing legs".to_owned(),
        })?;

        // Reject invalid durations (negative, NaN, infinite) rather than
        // panicking in Duration::from_secs_f64.
        let mut legs = Vec::with_capacity(wire_legs.len());
        for leg in wire_legs {
            if !(leg.duration_seconds.is_finite() && leg.duration_seconds >= 0.0) {
                return Err(RouteError::Parse {
                    message: format!("invalid leg duration: {}", leg.duration_seconds),
                });
            }
            legs.push(RouteLeg {
                distance_meters: leg.distance_meters,
                duration: Duration::from_secs_f64(leg.duration_seconds),
                end_address: leg.end_address,
                end_location: geo::Coord {
                    x: leg.end_location.lng,
                    y: leg.end_location.lat,
                },
            });
        }

        Ok(RouteResult::new(order, legs))
    }
}

impl RouteProvider for HttpRouteProvider {
    /// Request an optimized route for the given active stops.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime must
    /// be multi-threaded (`flavor = "multi_thread"`). If called from within
    /// a `current_thread` runtime, the method falls back to using its own
    /// internal runtime, which may block the caller's runtime and cause
    /// deadlocks if the caller's runtime is driving IO or timers needed by
    /// this request.
    fn optimize(&self, request: &RouteRequest) -> Result<RouteResult, RouteError> {
        request.validate()?;

        // If we're already inside a Tokio runtime, check the runtime
        // flavour. block_in_place requires a multi-threaded runtime; for
        // current_thread runtimes we fall back to our own stored runtime.
        let future = self.fetch_route_async(request);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            // No runtime detected, or current_thread runtime: use our own.
            _ => self.runtime.block_on(future),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use waybill_core::{Origin, Stop};

    use crate::routing::directions::{DirectionsLeg, WirePosition};

    #[fixture]
    fn provider() -> HttpRouteProvider {
        HttpRouteProvider::new("http://directions.example.com").expect("provider should build")
    }

    fn wire_leg(distance_meters: u64, duration_seconds: f64) -> DirectionsLeg {
        DirectionsLeg {
            distance_meters,
            duration_seconds,
            end_address: "1081 Burrard St".to_owned(),
            end_location: WirePosition {
                lat: 49.28,
                lng: -123.13,
            },
        }
    }

    #[rstest]
    fn build_route_url_appends_the_endpoint(provider: HttpRouteProvider) {
        assert_eq!(
            provider.build_route_url(),
            "http://directions.example.com/route"
        );
    }

    #[rstest]
    fn build_route_url_strips_trailing_slash() {
        let provider =
            HttpRouteProvider::new("http://directions.example.com/").expect("provider should build");

        let url = provider.build_route_url();

        assert_eq!(url, "http://directions.example.com/route");
    }

    #[rstest]
    fn convert_response_handles_success(provider: HttpRouteProvider) {
        let response = DirectionsResponse {
            code: "Ok".to_owned(),
            message: None,
            order: Some(vec![1, 0]),
            legs: Some(vec![wire_leg(1_200, 300.0), wire_leg(800, 120.5)]),
        };

        let route = provider.convert_response(response).expect("should parse");

        assert_eq!(route.waypoint_order, vec![1, 0]);
        assert_eq!(route.legs.len(), 2);
        assert_eq!(route.total_distance_meters(), 2_000);
        assert_eq!(route.legs[1].duration, Duration::from_secs_f64(120.5));
        assert_eq!(route.legs[0].end_location.x, -123.13);
        assert_eq!(route.legs[0].end_location.y, 49.28);
    }

    #[rstest]
    fn convert_response_handles_service_error(provider: HttpRouteProvider) {
        let response = DirectionsResponse {
            code: "NoRoute".to_owned(),
            message: Some("550 W Broadway could not be resolved".to_owned()),
            order: None,
            legs: None,
        };

        let err = provider.convert_response(response).expect_err("should fail");

        match err {
            RouteError::Service { code, message } => {
                assert_eq!(code, "NoRoute");
                assert_eq!(message, "550 W Broadway could not be resolved");
            }
            _ => panic!("expected Service error, got {err:?}"),
        }
    }

    #[rstest]
    fn convert_response_handles_missing_order(provider: HttpRouteProvider) {
        let response = DirectionsResponse {
            code: "Ok".to_owned(),
            message: None,
            order: None,
            legs: Some(vec![wire_leg(1_200, 300.0)]),
        };

        let err = provider.convert_response(response).expect_err("should fail");

        assert!(matches!(err, RouteError::Parse { .. }));
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn convert_response_rejects_invalid_durations(
        provider: HttpRouteProvider,
        #[case] duration_seconds: f64,
    ) {
        let response = DirectionsResponse {
            code: "Ok".to_owned(),
            message: None,
            order: Some(vec![0]),
            legs: Some(vec![wire_leg(500, duration_seconds)]),
        };

        let err = provider.convert_response(response).expect_err("should fail");

        assert!(matches!(err, RouteError::Parse { .. }));
    }

    #[rstest]
    fn requests_are_validated_before_any_network_call(provider: HttpRouteProvider) {
        let request = RouteRequest {
            origin: Origin::address("800 Robson St").unwrap(),
            stops: Vec::new(),
        };

        let err = provider.optimize(&request).expect_err("should fail");

        assert_eq!(err, RouteError::NoStops);
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpRouteProviderConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    #[rstest]
    fn single_stop_requests_serialise_without_waypoints() {
        let request = RouteRequest {
            origin: Origin::address("800 Robson St").unwrap(),
            stops: vec![Stop::new("1596 Johnston St", "59", 1)],
        };

        let wire = DirectionsRequest::from_domain(&request);

        assert!(wire.waypoints.is_empty());
        assert_eq!(wire.destination, "1596 Johnston St");
    }
}
