//! Core domain types for the Waybill delivery-route engine.
//!
//! The engine owns the canonical ordered set of delivery stops, drives an
//! external route-optimization provider, reconciles the provider's visiting
//! order back onto the stops by identifier, and derives trip-level metrics
//! — keeping all of it consistent as stops are completed, removed, or
//! reset.
//!
//! Boundaries are trait seams: [`RouteProvider`] for the optimization
//! service, [`ManifestRecognizer`] for the OCR service, [`RouteVisualizer`]
//! for the map surface, and [`Locator`] for device geolocation. This crate
//! performs no I/O of its own; adapter crates implement the seams.

pub mod ingest;
pub mod manifest;
pub mod origin;
pub mod planner;
pub mod provider;
pub mod route;
pub mod stop;
pub mod summary;
#[doc(hidden)]
pub mod test_support;
pub mod visualize;

pub use ingest::{
    ImageData, ImageDataError, IngestOptions, IngestReport, ManifestRecognizer,
    RecognitionError, RecognizedStop, map_recognized,
};
pub use manifest::Manifest;
pub use origin::{LocateError, Locator, Origin, OriginError};
pub use planner::{RefreshOutcome, RouteSnapshot, TripPlanner};
pub use provider::{RouteError, RouteProvider, RouteRequest};
pub use route::{RouteLeg, RouteResult};
pub use stop::{Stop, StopId};
pub use summary::{SummarySource, TripSummary};
pub use visualize::{NullVisualizer, RouteVisualizer};
