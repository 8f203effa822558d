//! Rendering capability seam.
//!
//! The engine never references map primitives. The rendering collaborator
//! implements [`RouteVisualizer`] and receives the normalized
//! [`RouteResult`] to draw markers and polylines from; headless hosts use
//! [`NullVisualizer`].

use crate::route::RouteResult;

/// Narrow capability interface for the map surface.
pub trait RouteVisualizer {
    /// Present the given optimized route.
    fn show_route(&mut self, route: &RouteResult);

    /// Remove any previously presented route.
    fn clear(&mut self);
}

/// Visualizer that ignores every call, for hosts with no map surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullVisualizer;

impl RouteVisualizer for NullVisualizer {
    fn show_route(&mut self, _route: &RouteResult) {}

    fn clear(&mut self) {}
}
