//! HTTP-based route provider for directions services.
//!
//! This module provides [`HttpRouteProvider`], an implementation of
//! [`waybill_core::RouteProvider`] that requests optimized multi-stop
//! driving routes from an external directions service.
//!
//! # Architecture
//!
//! The provider POSTs the active stop set — origin, pinned destination,
//! and reorderable waypoints — and normalizes the returned visiting order
//! and legs into a [`waybill_core::RouteResult`]. The synchronous
//! [`RouteProvider`](waybill_core::RouteProvider) trait is implemented by
//! blocking on async HTTP calls internally, keeping the core library
//! embeddable in synchronous contexts.
//!
//! # Example
//!
//! ```no_run
//! use waybill_data::routing::{HttpRouteProvider, HttpRouteProviderConfig};
//! use waybill_core::{Origin, RouteProvider, RouteRequest, Stop};
//! use std::time::Duration;
//!
//! // Create a provider with custom configuration
//! let config = HttpRouteProviderConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(60))
//!     .with_user_agent("my-app/1.0");
//! let provider = HttpRouteProvider::with_config(config)?;
//!
//! let request = RouteRequest {
//!     origin: Origin::address("800 Robson St")?,
//!     stops: vec![
//!         Stop::new("1596 Johnston St", "59", 1),
//!         Stop::new("550 W Broadway", "62", 2),
//!     ],
//! };
//!
//! let route = provider.optimize(&request)?;
//! println!("visiting order: {:?}", route.waypoint_order);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod directions;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use provider::{DEFAULT_USER_AGENT, HttpRouteProvider, HttpRouteProviderConfig, ProviderBuildError};
