//! Boundary adapters for the Waybill engine.
//!
//! Responsibilities:
//! - Implement the engine's recognition and route-provider seams over HTTP.
//! - Encapsulate the wire formats of both external services.
//! - Build navigation deep links for the export boundary.
//!
//! Boundaries:
//! - Do not encode domain rules (they live in `waybill-core`).
//! - Keep blocking I/O off async executors; the async HTTP clients are
//!   bridged to the synchronous core traits internally.

pub mod export;
pub mod recognition;
pub mod routing;

pub use export::{ExportError, navigation_url};
pub use recognition::{HttpManifestRecognizer, HttpManifestRecognizerConfig, encode_image};
pub use routing::{HttpRouteProvider, HttpRouteProviderConfig};
