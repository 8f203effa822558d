//! Error types emitted by the Waybill CLI.
//!
//! Keep this error type reasonably small, as most CLI helpers return
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use waybill_core::{ImageDataError, OriginError, RecognitionError, RouteError};
use waybill_data::export::ExportError;
use waybill_data::recognition::RecognizerBuildError;
use waybill_data::routing::ProviderBuildError;

/// Errors emitted by the Waybill CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// Both a manual origin and device coordinates were supplied, or only
    /// one half of the coordinate pair.
    #[error("set either --origin, or both --origin-lat and --origin-lng")]
    AmbiguousOrigin,
    /// The manual origin failed validation.
    #[error("invalid origin: {0}")]
    InvalidOrigin(#[from] OriginError),
    /// Reading an input file failed.
    #[error("failed to read {path:?}: {source}")]
    ReadInput {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A stops file could not be decoded.
    #[error("failed to parse stops JSON at {path:?}: {source}")]
    ParseStops {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The image payload could not be encoded for the recognition service.
    #[error("failed to encode image: {0}")]
    EncodeImage(#[from] ImageDataError),
    /// Constructing the recognition client failed.
    #[error("failed to build recognition client for {base_url:?}: {source}")]
    BuildRecognizer {
        base_url: String,
        #[source]
        source: RecognizerBuildError,
    },
    /// Constructing the route provider failed.
    #[error("failed to build route provider for {base_url:?}: {source}")]
    BuildRouteProvider {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The recognition service rejected or failed the request.
    ///
    /// Recoverable: retry the capture, or hand-edit a stops file and run
    /// `waybill plan` directly.
    #[error("manifest recognition failed: {0}")]
    Recognition(#[from] RecognitionError),
    /// The route provider rejected or failed the request.
    #[error("route optimization failed: {0}")]
    Route(#[from] RouteError),
    /// The stops file contained no stops with addresses.
    #[error("the stops file contains no stops with addresses")]
    EmptyManifest,
    /// Building the navigation link failed.
    #[error(transparent)]
    Export(#[from] ExportError),
    /// Serializing an output document failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing an output document failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
