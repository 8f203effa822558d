//! Command-line front end for the Waybill engine.
//!
//! Two subcommands cover the trip workflow: `recognize` posts a
//! photographed manifest to the recognition service and writes the raw
//! stops as JSON; `plan` feeds a stops file through the engine and writes
//! the optimized itinerary. Paths and service URLs can come from CLI
//! flags, configuration files, or `WAYBILL_*` environment variables.
#![forbid(unsafe_code)]

mod error;
mod plan;
mod recognize;

pub use error::CliError;

use std::io::Write as _;

use camino::Utf8Path;
use clap::{Parser, Subcommand};

pub(crate) const ARG_OCR_BASE_URL: &str = "ocr-base-url";
pub(crate) const ARG_ROUTE_BASE_URL: &str = "route-base-url";
pub(crate) const ARG_ORIGIN: &str = "origin";
pub(crate) const ARG_ORIGIN_LAT: &str = "origin-lat";
pub(crate) const ARG_ORIGIN_LNG: &str = "origin-lng";
pub(crate) const ARG_RECOGNIZE_IMAGE: &str = "image";
pub(crate) const ARG_PLAN_STOPS: &str = "stops";
pub(crate) const ENV_RECOGNIZE_IMAGE: &str = "WAYBILL_CMDS_RECOGNIZE_IMAGE";
pub(crate) const ENV_PLAN_STOPS: &str = "WAYBILL_CMDS_PLAN_STOPS";
pub(crate) const ENV_PLAN_ORIGIN: &str = "WAYBILL_CMDS_PLAN_ORIGIN";

/// Run the Waybill CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] describing the first failure: argument parsing,
/// configuration merging, file access, or a boundary call.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Recognize(args) => recognize::run(args),
        Command::Plan(args) => plan::run(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waybill",
    about = "Manifest recognition and route planning for delivery trips",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Turn a photographed manifest into a stops JSON file.
    Recognize(recognize::RecognizeArgs),
    /// Optimize a stops JSON file into a driving itinerary.
    Plan(plan::PlanArgs),
}

/// Write a pretty-printed JSON document to `out`, or stdout without one.
pub(crate) fn write_json<T: serde::Serialize>(
    value: &T,
    out: Option<&Utf8Path>,
) -> Result<(), CliError> {
    let mut doc = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    doc.push('\n');
    match out {
        Some(path) => std::fs::write(path.as_std_path(), doc).map_err(CliError::WriteOutput),
        None => std::io::stdout()
            .write_all(doc.as_bytes())
            .map_err(CliError::WriteOutput),
    }
}
