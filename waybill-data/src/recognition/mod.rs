//! HTTP client for the manifest-recognition (OCR) service.
//!
//! This module provides [`HttpManifestRecognizer`], an implementation of
//! [`waybill_core::ManifestRecognizer`] that posts a photographed manifest
//! to the recognition service and returns the raw stop lines it found.
//!
//! # Example
//!
//! ```no_run
//! use waybill_data::recognition::{HttpManifestRecognizer, encode_image};
//! use waybill_core::ManifestRecognizer;
//!
//! let recognizer = HttpManifestRecognizer::new("http://localhost:5001")?;
//! let image = encode_image("image/jpeg", &std::fs::read("manifest.jpg")?)?;
//!
//! let stops = recognizer.recognize(&image)?;
//! println!("recognized {} stops", stops.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod client;
mod ocr;

pub use client::{
    DEFAULT_USER_AGENT, HttpManifestRecognizer, HttpManifestRecognizerConfig,
    RecognizerBuildError, encode_image,
};
