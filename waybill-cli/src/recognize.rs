//! Recognize command implementation for the Waybill CLI.

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waybill_core::ManifestRecognizer;
use waybill_data::recognition::{
    HttpManifestRecognizer, HttpManifestRecognizerConfig, encode_image,
};

use crate::{ARG_OCR_BASE_URL, ARG_RECOGNIZE_IMAGE, CliError, ENV_RECOGNIZE_IMAGE, write_json};

/// CLI arguments for the `recognize` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Post a photographed delivery manifest to the recognition \
                 service and write the raw stops it found as JSON, ready \
                 for `waybill plan`. A failed recognition is reported as an \
                 error; rerun with a better photo or hand-edit a stops \
                 file.",
    about = "Turn a manifest photo into stops JSON"
)]
#[ortho_config(prefix = "WAYBILL")]
pub(crate) struct RecognizeArgs {
    /// Path to the manifest photo (JPEG or PNG).
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) image: Option<Utf8PathBuf>,
    /// Base URL of the recognition service.
    #[arg(long = ARG_OCR_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) ocr_base_url: Option<String>,
    /// Write the stops JSON here instead of stdout.
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) out: Option<Utf8PathBuf>,
}

impl RecognizeArgs {
    pub(crate) fn into_config(self) -> Result<RecognizeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RecognizeConfig::try_from(merged)
    }
}

/// Resolved `recognize` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecognizeConfig {
    /// Path to the manifest photo.
    pub(crate) image: Utf8PathBuf,
    /// Base URL of the recognition service.
    pub(crate) ocr_base_url: String,
    /// Optional output path.
    pub(crate) out: Option<Utf8PathBuf>,
}

impl TryFrom<RecognizeArgs> for RecognizeConfig {
    type Error = CliError;

    fn try_from(args: RecognizeArgs) -> Result<Self, Self::Error> {
        let image = args.image.ok_or(CliError::MissingArgument {
            field: ARG_RECOGNIZE_IMAGE,
            env: ENV_RECOGNIZE_IMAGE,
        })?;
        let default_base_url = HttpManifestRecognizerConfig::default().base_url;
        let ocr_base_url = args.ocr_base_url.unwrap_or(default_base_url);
        Ok(Self {
            image,
            ocr_base_url,
            out: args.out,
        })
    }
}

pub(crate) fn run(args: RecognizeArgs) -> Result<(), CliError> {
    let config = args.into_config()?;

    let bytes =
        std::fs::read(config.image.as_std_path()).map_err(|source| CliError::ReadInput {
            path: config.image.clone(),
            source,
        })?;
    let content_type = mime_guess::from_path(config.image.as_std_path()).first_or_octet_stream();
    let image = encode_image(content_type.essence_str(), &bytes)?;

    let recognizer = HttpManifestRecognizer::with_config(HttpManifestRecognizerConfig::new(
        config.ocr_base_url.clone(),
    ))
    .map_err(|source| CliError::BuildRecognizer {
        base_url: config.ocr_base_url.clone(),
        source,
    })?;
    let stops = recognizer.recognize(&image)?;

    write_json(&stops, config.out.as_deref())
}
