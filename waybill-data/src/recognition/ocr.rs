//! Wire types for the manifest-recognition service.
//!
//! The service accepts a base64 `data:` URI and answers with the stop
//! lines it could read off the manifest. Delivery numbers arrive as text
//! or as integers depending on the deployment; the wire type accepts both
//! and normalizes to text.

use serde::{Deserialize, Serialize};
use waybill_core::RecognizedStop;

/// Recognition request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OcrRequest {
    /// Manifest photo as a base64 `data:` URI.
    pub image: String,
}

/// Recognition response.
#[derive(Debug, Deserialize)]
pub struct OcrResponse {
    /// Raw stop lines in manifest order.
    pub stops: Vec<OcrStop>,
}

/// One recognized stop line.
#[derive(Debug, Deserialize)]
pub struct OcrStop {
    /// Label read from the manifest, if any.
    #[serde(default)]
    pub delivery_number: Option<DeliveryNumber>,
    /// Free-text address line.
    pub address: String,
}

impl OcrStop {
    /// Normalize into the engine's neutral recognition shape.
    #[must_use]
    pub fn into_domain(self) -> RecognizedStop {
        RecognizedStop {
            delivery_number: self.delivery_number.map(DeliveryNumber::into_text),
            address: self.address,
        }
    }
}

/// Delivery number as the service emits it: text or integer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DeliveryNumber {
    /// Text label, passed through verbatim.
    Text(String),
    /// Integer label, rendered in decimal.
    Number(i64),
}

impl DeliveryNumber {
    /// Render the label as text.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_response_with_integer_numbers() {
        let json = r#"{
            "stops": [
                {"delivery_number": 59, "address": "1596 Johnston St"},
                {"delivery_number": "60A", "address": "1081 Burrard St"},
                {"address": "900 Burrard St"}
            ]
        }"#;

        let response: OcrResponse = serde_json::from_str(json).expect("should deserialise");
        let stops: Vec<RecognizedStop> =
            response.stops.into_iter().map(OcrStop::into_domain).collect();

        assert_eq!(stops.len(), 3);
        assert_eq!(stops[0].delivery_number.as_deref(), Some("59"));
        assert_eq!(stops[1].delivery_number.as_deref(), Some("60A"));
        assert_eq!(stops[2].delivery_number, None);
        assert_eq!(stops[2].address, "900 Burrard St");
    }

    #[test]
    fn serialise_request_carries_the_data_uri() {
        let request = OcrRequest {
            image: "data:image/png;base64,AAAA".to_owned(),
        };
        let value = serde_json::to_value(&request).expect("should serialise");
        assert_eq!(
            value,
            serde_json::json!({"image": "data:image/png;base64,AAAA"})
        );
    }
}
