//! Client for the third-party vision annotation API.
//!
//! One call per uploaded image: the image bytes are base64-encoded and sent
//! to the vendor's annotate endpoint with the production feature list; the
//! structured JSON response is mapped into
//! [`picdesc_models::VisionAnnotations`]. No retries, no batching.

mod wire;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

use picdesc_models::VisionAnnotations;

use crate::wire::{AnnotateRequest, AnnotateResponse, ImageRequest};

/// Default vendor endpoint; override with `VISION_API_URL`.
const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com";

pub type VisionResult<T> = Result<T, VisionError>;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("VISION_API_KEY is not configured")]
    MissingApiKey,

    #[error("vision API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("vision API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("vision API error {code}: {message}")]
    Vendor { code: i32, message: String },

    #[error("vision API returned no response for the image")]
    EmptyResponse,
}

/// Vision annotation API client.
#[derive(Clone)]
pub struct VisionClient {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl VisionClient {
    /// Create a client against an explicit endpoint.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    /// Create a client from `VISION_API_URL` / `VISION_API_KEY`.
    ///
    /// A missing key is a construction error so the server fails at startup
    /// rather than on the first upload.
    pub fn from_env() -> VisionResult<Self> {
        let endpoint =
            std::env::var("VISION_API_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let api_key = std::env::var("VISION_API_KEY").map_err(|_| VisionError::MissingApiKey)?;
        Ok(Self::new(endpoint, api_key))
    }

    /// The configured endpoint (without credentials).
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Reachability probe for readiness checks. Any HTTP response counts;
    /// only transport failures are errors.
    pub async fn check_connectivity(&self) -> VisionResult<()> {
        self.client.get(&self.endpoint).send().await?;
        Ok(())
    }

    /// Annotate one image and map the vendor response into model types.
    pub async fn annotate(&self, image_bytes: &[u8]) -> VisionResult<VisionAnnotations> {
        let url = format!(
            "{}/v1/images:annotate?key={}",
            self.endpoint.trim_end_matches('/'),
            self.api_key
        );

        let request = AnnotateRequest {
            requests: vec![ImageRequest::new(BASE64.encode(image_bytes))],
        };

        debug!(bytes = image_bytes.len(), "Sending image for annotation");

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Vision API rejected the request");
            return Err(VisionError::Status { status, body });
        }

        let annotate_response: AnnotateResponse = response.json().await?;

        let image_response = annotate_response
            .responses
            .into_iter()
            .next()
            .ok_or(VisionError::EmptyResponse)?;

        if let Some(error) = image_response.error {
            warn!(code = error.code, message = %error.message, "Vision API returned an error for the image");
            return Err(VisionError::Vendor {
                code: error.code,
                message: error.message,
            });
        }

        let annotations = image_response.into_annotations();
        debug!(
            labels = annotations.labels.len(),
            objects = annotations.objects.len(),
            faces = annotations.faces.len(),
            "Annotation response mapped"
        );
        Ok(annotations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_server_with(body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/images:annotate"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_annotate_success() {
        let server = mock_server_with(json!({
            "responses": [{
                "labelAnnotations": [{"description": "cat", "score": 0.9}]
            }]
        }))
        .await;

        let client = VisionClient::new(server.uri(), "test-key");
        let annotations = client.annotate(b"fake image bytes").await.unwrap();
        assert_eq!(annotations.labels.len(), 1);
        assert_eq!(annotations.labels[0].description, "cat");
    }

    #[tokio::test]
    async fn test_annotate_sends_base64_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/images:annotate"))
            .and(body_partial_json(json!({
                "requests": [{"image": {"content": BASE64.encode(b"fake image bytes")}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"responses": [{}]})))
            .expect(1)
            .mount(&server)
            .await;

        let client = VisionClient::new(server.uri(), "test-key");
        let annotations = client.annotate(b"fake image bytes").await.unwrap();
        assert!(annotations.is_empty());
    }

    #[tokio::test]
    async fn test_annotate_vendor_error() {
        let server = mock_server_with(json!({
            "responses": [{
                "error": {"code": 3, "message": "Bad image data"}
            }]
        }))
        .await;

        let client = VisionClient::new(server.uri(), "test-key");
        let error = client.annotate(b"not an image").await.unwrap_err();
        match error {
            VisionError::Vendor { code, message } => {
                assert_eq!(code, 3);
                assert_eq!(message, "Bad image data");
            }
            other => panic!("expected vendor error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_annotate_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = VisionClient::new(server.uri(), "test-key");
        let error = client.annotate(b"bytes").await.unwrap_err();
        match error {
            VisionError::Status { status, body } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(body, "forbidden");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_annotate_empty_response_list() {
        let server = mock_server_with(json!({"responses": []})).await;

        let client = VisionClient::new(server.uri(), "test-key");
        let error = client.annotate(b"bytes").await.unwrap_err();
        assert!(matches!(error, VisionError::EmptyResponse));
    }
}
