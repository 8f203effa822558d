//! Facade crate for the Waybill delivery-route engine.
//!
//! This crate re-exports the core domain types and exposes the optional
//! HTTP boundary adapters behind feature flags.

#![forbid(unsafe_code)]

pub use waybill_core::{
    ImageData, ImageDataError, IngestOptions, IngestReport, LocateError, Locator, Manifest,
    ManifestRecognizer, NullVisualizer, Origin, OriginError, RecognitionError, RecognizedStop,
    RefreshOutcome, RouteError, RouteLeg, RouteProvider, RouteRequest, RouteResult, RouteSnapshot,
    RouteVisualizer, Stop, StopId, SummarySource, TripPlanner, TripSummary, map_recognized,
};

#[cfg(feature = "provider-http")]
pub use waybill_data::routing::{HttpRouteProvider, HttpRouteProviderConfig};

#[cfg(feature = "recognition-http")]
pub use waybill_data::recognition::{
    HttpManifestRecognizer, HttpManifestRecognizerConfig, encode_image,
};

#[cfg(any(feature = "provider-http", feature = "recognition-http"))]
pub use waybill_data::export::{ExportError, navigation_url};
