//! Manifest recognition boundary and the ingestion mapper.
//!
//! [`ManifestRecognizer`] abstracts the OCR service that turns a manifest
//! photo into raw `{delivery_number, address}` pairs. [`map_recognized`]
//! turns those pairs into validated [`Stop`]s with fresh identities and a
//! dense 1-based default order, ready for
//! [`Manifest::replace_all`](crate::Manifest::replace_all).

use log::warn;
use thiserror::Error;

use crate::stop::Stop;

/// Raw stop line produced by the recognition service.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecognizedStop {
    /// Label read from the manifest, if the service could extract one.
    pub delivery_number: Option<String>,
    /// Free-text address line.
    pub address: String,
}

/// A manifest photo encoded as a base64 `data:` URI.
///
/// The engine never decodes the payload; it only carries it to the
/// recognition boundary. Adapter crates provide helpers for encoding raw
/// image bytes; any producer of standard data URIs works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData(String);

/// Errors returned by [`ImageData::from_data_uri`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageDataError {
    /// The payload is not a `data:` URI.
    #[error("image payload must be a data: URI")]
    NotADataUri,
}

impl ImageData {
    /// Wrap an already-encoded `data:` URI.
    ///
    /// # Errors
    ///
    /// Returns [`ImageDataError::NotADataUri`] when the payload does not
    /// carry the `data:` scheme.
    pub fn from_data_uri(uri: impl Into<String>) -> Result<Self, ImageDataError> {
        let uri = uri.into();
        if !uri.starts_with("data:") {
            return Err(ImageDataError::NotADataUri);
        }
        Ok(Self(uri))
    }

    /// The encoded payload.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Errors returned by [`ManifestRecognizer::recognize`].
///
/// All of these are recoverable: the caller retries the capture or falls
/// back to manual entry. A failed recognition never substitutes
/// placeholder stops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    /// The recognition service could not be reached.
    #[error("network error requesting {url}: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Transport-level failure description.
        message: String,
    },
    /// The recognition service did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The recognition service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response description.
        message: String,
    },
    /// The response body could not be understood.
    #[error("failed to parse recognition response: {message}")]
    Parse {
        /// Parse failure description.
        message: String,
    },
    /// The service answered but found no stops in the image.
    #[error("no delivery stops were recognized in the image")]
    NoStops,
}

/// Turn a manifest photo into raw stop lines.
pub trait ManifestRecognizer {
    /// Recognize the stops printed on the photographed manifest.
    ///
    /// # Errors
    ///
    /// Returns a [`RecognitionError`]; see the variant documentation. All
    /// failures are recoverable by retrying or entering stops manually.
    fn recognize(&self, image: &ImageData) -> Result<Vec<RecognizedStop>, RecognitionError>;
}

/// Policy knobs for [`map_recognized`].
///
/// The synthesized-number offset is a per-deployment business decision:
/// manifests are numbered from a route-specific base, and a missing label
/// is filled with `offset + entry index` so it lines up with its
/// neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    /// Base value for synthesized delivery numbers.
    pub synthesized_number_offset: u32,
}

impl Default for IngestOptions {
    /// Offset 59, matching the manifests the recognizer was tuned on.
    fn default() -> Self {
        Self {
            synthesized_number_offset: 59,
        }
    }
}

/// Outcome of mapping one recognition response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Stops ready for the manifest, orders `1..=N`.
    pub stops: Vec<Stop>,
    /// Entries dropped for carrying a blank address.
    pub skipped_blank: usize,
}

/// Map raw recognition output into stops with fresh identities.
///
/// Each accepted entry receives a new [`StopId`](crate::StopId), a dense
/// 1-based `order`, and `completed = false`. A missing or blank delivery
/// number is synthesized from [`IngestOptions::synthesized_number_offset`]
/// plus the entry's 0-based position. Entries without an address are
/// skipped and counted.
///
/// # Examples
/// ```
/// use waybill_core::{map_recognized, IngestOptions, RecognizedStop};
///
/// let report = map_recognized(
///     vec![
///         RecognizedStop {
///             delivery_number: Some("59".to_owned()),
///             address: "1596 Johnston St".to_owned(),
///         },
///         RecognizedStop {
///             delivery_number: None,
///             address: "1081 Burrard St".to_owned(),
///         },
///     ],
///     &IngestOptions::default(),
/// );
/// assert_eq!(report.stops.len(), 2);
/// assert_eq!(report.stops[1].delivery_number, "60");
/// assert_eq!(report.stops[1].order, 2);
/// ```
#[must_use]
pub fn map_recognized(entries: Vec<RecognizedStop>, options: &IngestOptions) -> IngestReport {
    let mut stops: Vec<Stop> = Vec::with_capacity(entries.len());
    let mut skipped_blank = 0_usize;

    for entry in entries {
        if entry.address.trim().is_empty() {
            skipped_blank += 1;
            warn!("Skipped recognized stop without an address");
            continue;
        }
        let position = stops.len() as u32;
        let delivery_number = entry
            .delivery_number
            .filter(|number| !number.trim().is_empty())
            .unwrap_or_else(|| {
                options
                    .synthesized_number_offset
                    .saturating_add(position)
                    .to_string()
            });
        stops.push(Stop::new(entry.address, delivery_number, position + 1));
    }

    IngestReport {
        stops,
        skipped_blank,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    fn entry(number: Option<&str>, address: &str) -> RecognizedStop {
        RecognizedStop {
            delivery_number: number.map(str::to_owned),
            address: address.to_owned(),
        }
    }

    #[rstest]
    fn maps_the_documented_scenario() {
        let report = map_recognized(
            vec![
                entry(Some("59"), "1596 Johnston St"),
                entry(None, "1081 Burrard St"),
            ],
            &IngestOptions::default(),
        );

        assert_eq!(report.stops.len(), 2);
        assert_eq!(report.skipped_blank, 0);
        assert_eq!(report.stops[0].delivery_number, "59");
        assert_eq!(report.stops[1].delivery_number, "60");
        assert_eq!(report.stops[0].order, 1);
        assert_eq!(report.stops[1].order, 2);
        assert!(report.stops.iter().all(|stop| !stop.completed));
    }

    #[rstest]
    fn ids_are_unique_and_orders_dense() {
        let report = map_recognized(
            (0..10).map(|i| entry(None, &format!("{i} Main St"))).collect(),
            &IngestOptions::default(),
        );

        let ids: HashSet<_> = report.stops.iter().map(|stop| stop.id).collect();
        assert_eq!(ids.len(), 10);
        let orders: Vec<u32> = report.stops.iter().map(|stop| stop.order).collect();
        assert_eq!(orders, (1..=10).collect::<Vec<u32>>());
    }

    #[rstest]
    fn blank_addresses_are_skipped_without_order_gaps() {
        let report = map_recognized(
            vec![
                entry(Some("59"), "1596 Johnston St"),
                entry(Some("60"), "   "),
                entry(None, "900 Burrard St"),
            ],
            &IngestOptions::default(),
        );

        assert_eq!(report.skipped_blank, 1);
        assert_eq!(report.stops.len(), 2);
        assert_eq!(report.stops[1].order, 2);
        // Synthesized from the accepted position, keeping the sequence dense.
        assert_eq!(report.stops[1].delivery_number, "60");
    }

    #[rstest]
    fn blank_delivery_numbers_are_synthesized() {
        let options = IngestOptions {
            synthesized_number_offset: 100,
        };
        let report = map_recognized(vec![entry(Some("  "), "550 W Broadway")], &options);
        assert_eq!(report.stops[0].delivery_number, "100");
    }

    #[rstest]
    fn image_data_requires_the_data_scheme() {
        assert!(ImageData::from_data_uri("data:image/png;base64,AAAA").is_ok());
        assert_eq!(
            ImageData::from_data_uri("https://example.com/a.png"),
            Err(ImageDataError::NotADataUri)
        );
    }
}
