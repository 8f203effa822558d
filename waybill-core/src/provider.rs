//! The route-optimization provider seam.
//!
//! [`RouteProvider`] abstracts the external service that turns an origin
//! and an ordered list of active stops into an optimized driving order.
//! The last stop of the request is the pinned destination; every other
//! stop is a reorderable waypoint. Providers must be `Send + Sync` so a
//! single instance can be shared across hosts.

use thiserror::Error;

use crate::origin::Origin;
use crate::route::RouteResult;
use crate::stop::Stop;

/// Parameters for an optimization request.
///
/// `stops` is the active subset of the manifest in its current order, never
/// empty; the final element is the pinned destination and is excluded from
/// reordering.
///
/// # Examples
/// ```
/// use waybill_core::{Origin, RouteRequest, Stop};
///
/// let request = RouteRequest {
///     origin: Origin::address("800 Robson St")?,
///     stops: vec![
///         Stop::new("1596 Johnston St", "59", 1),
///         Stop::new("550 W Broadway", "62", 2),
///     ],
/// };
/// assert!(request.validate().is_ok());
/// assert_eq!(request.waypoints().len(), 1);
/// # Ok::<(), waybill_core::OriginError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    /// Where the trip starts.
    pub origin: Origin,
    /// Active stops in current order; the last one is the destination.
    pub stops: Vec<Stop>,
}

impl RouteRequest {
    /// Check the request preconditions.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::NoStops`] for an empty stop list and
    /// [`RouteError::EmptyOrigin`] for an origin that renders empty.
    pub fn validate(&self) -> Result<(), RouteError> {
        if self.stops.is_empty() {
            return Err(RouteError::NoStops);
        }
        if self.origin.is_empty() {
            return Err(RouteError::EmptyOrigin);
        }
        Ok(())
    }

    /// The pinned destination: the last stop of the request.
    #[must_use]
    pub fn destination(&self) -> Option<&Stop> {
        self.stops.last()
    }

    /// The reorderable waypoints: every stop except the destination.
    #[must_use]
    pub fn waypoints(&self) -> &[Stop] {
        self.stops.split_last().map_or(&[], |(_, rest)| rest)
    }
}

/// Errors returned by [`RouteProvider::optimize`].
///
/// Any of these leaves the manifest untouched: no partial reorder is ever
/// applied on failure, and the previous summary is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The request carried no stops; the caller should not have invoked
    /// the provider at all.
    #[error("at least one active stop is required")]
    NoStops,
    /// The origin renders as an empty string.
    #[error("request origin must not be empty")]
    EmptyOrigin,
    /// The provider could not be reached.
    #[error("network error requesting {url}: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Transport-level failure description.
        message: String,
    },
    /// The provider did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The provider answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response description.
        message: String,
    },
    /// The provider's response body could not be understood.
    #[error("failed to parse provider response: {message}")]
    Parse {
        /// Parse failure description.
        message: String,
    },
    /// The provider rejected the request at the service level, e.g. an
    /// unresolvable address or an exhausted quota.
    #[error("provider rejected request ({code}): {message}")]
    Service {
        /// Provider-specific rejection code.
        code: String,
        /// Provider-supplied message.
        message: String,
    },
}

/// Compute an optimized visiting order for a set of active stops.
///
/// Implementations should validate the request via
/// [`RouteRequest::validate`] and return the error rather than panicking.
///
/// # Examples
/// ```
/// use waybill_core::{Origin, RouteError, RouteProvider, RouteRequest, RouteResult};
///
/// struct EchoProvider;
///
/// impl RouteProvider for EchoProvider {
///     fn optimize(&self, request: &RouteRequest) -> Result<RouteResult, RouteError> {
///         request.validate()?;
///         let order = (0..request.waypoints().len()).collect();
///         Ok(RouteResult::new(order, Vec::new()))
///     }
/// }
///
/// let request = RouteRequest {
///     origin: Origin::address("depot")?,
///     stops: Vec::new(),
/// };
/// assert_eq!(EchoProvider.optimize(&request), Err(RouteError::NoStops));
/// # Ok::<(), waybill_core::OriginError>(())
/// ```
pub trait RouteProvider: Send + Sync {
    /// Optimize a request, producing a normalized route or an error.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] describing the validation or provider
    /// failure; see the variant documentation.
    fn optimize(&self, request: &RouteRequest) -> Result<RouteResult, RouteError>;
}
