//! HTTP client for the recognition service.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use log::warn;
use reqwest::Client;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use waybill_core::{ImageData, ImageDataError, ManifestRecognizer, RecognitionError, RecognizedStop};

use super::ocr::{OcrRequest, OcrResponse, OcrStop};

/// Error type for [`HttpManifestRecognizer`] construction failures.
#[derive(Debug)]
pub enum RecognizerBuildError {
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
    /// Failed to build the Tokio runtime.
    Runtime(std::io::Error),
}

impl std::fmt::Display for RecognizerBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::Runtime(err) => write!(f, "failed to build Tokio runtime: {err}"),
        }
    }
}

impl std::error::Error for RecognizerBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(err) => Some(err),
            Self::Runtime(err) => Some(err),
        }
    }
}

/// Default user agent for recognition requests.
pub const DEFAULT_USER_AGENT: &str = "waybill-recognition/0.1";

/// Default request timeout in seconds.
///
/// Recognition is slower than routing: the service runs OCR over a full
/// photo before answering.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Encode raw image bytes as a base64 `data:` URI for the recognition
/// boundary.
///
/// # Errors
///
/// Returns [`ImageDataError`] if the assembled payload is rejected; with a
/// well-formed content type this does not happen.
pub fn encode_image(content_type: &str, bytes: &[u8]) -> Result<ImageData, ImageDataError> {
    let uri = format!("data:{content_type};base64,{}", STANDARD.encode(bytes));
    ImageData::from_data_uri(uri)
}

/// Configuration for [`HttpManifestRecognizer`].
#[derive(Debug, Clone)]
pub struct HttpManifestRecognizerConfig {
    /// Base URL for the recognition service (e.g., `"http://localhost:5001"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpManifestRecognizerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpManifestRecognizerConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP-based manifest recognizer.
///
/// Implements the synchronous [`ManifestRecognizer`] trait by blocking on
/// asynchronous HTTP requests, with the same runtime-bridging behaviour as
/// the routing provider: an owned current-thread runtime, or
/// `block_in_place` when called from inside a multi-threaded Tokio
/// runtime.
pub struct HttpManifestRecognizer {
    client: Client,
    config: HttpManifestRecognizerConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpManifestRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpManifestRecognizer")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpManifestRecognizer {
    /// Create a new recognizer with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, RecognizerBuildError> {
        Self::with_config(HttpManifestRecognizerConfig::new(base_url))
    }

    /// Create a new recognizer with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(
        config: HttpManifestRecognizerConfig,
    ) -> Result<Self, RecognizerBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(RecognizerBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(RecognizerBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Build the recognition endpoint URL: `{base_url}/ocr`.
    fn build_ocr_url(&self) -> String {
        format!("{}/ocr", self.config.base_url.trim_end_matches('/'))
    }

    /// Post the image and collect the recognized stops asynchronously.
    async fn recognize_async(
        &self,
        image: &ImageData,
    ) -> Result<Vec<RecognizedStop>, RecognitionError> {
        let url = self.build_ocr_url();
        let body = OcrRequest {
            image: image.as_str().to_owned(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let ocr: OcrResponse = response
            .json()
            .await
            .map_err(|err| RecognitionError::Parse {
                message: err.to_string(),
            })?;

        if ocr.stops.is_empty() {
            warn!("Recognition service answered without any stops");
            return Err(RecognitionError::NoStops);
        }
        Ok(ocr.stops.into_iter().map(OcrStop::into_domain).collect())
    }

    /// Convert a reqwest error to a `RecognitionError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RecognitionError {
        if error.is_timeout() {
            return RecognitionError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return RecognitionError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        RecognitionError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

impl ManifestRecognizer for HttpManifestRecognizer {
    fn recognize(&self, image: &ImageData) -> Result<Vec<RecognizedStop>, RecognitionError> {
        let future = self.recognize_async(image);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}
