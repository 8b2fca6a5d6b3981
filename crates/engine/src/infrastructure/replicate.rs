//! Replicate avatar client
//!
//! Implements the AvatarPort trait with a synchronous (`Prefer: wait`)
//! prediction on a Replicate-hosted image model.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::infrastructure::ports::{AvatarError, AvatarPort, AvatarRequest};

/// Default image model
pub const DEFAULT_AVATAR_MODEL: &str = "minimax/image-01";

const REPLICATE_BASE_URL: &str = "https://api.replicate.com";

/// Client for the Replicate predictions API
#[derive(Clone)]
pub struct ReplicateAvatarClient {
    client: Client,
    base_url: String,
    model: String,
    api_token: Option<String>,
}

impl ReplicateAvatarClient {
    pub fn new(api_token: Option<String>) -> Self {
        Self::with_base_url(REPLICATE_BASE_URL, DEFAULT_AVATAR_MODEL, api_token)
    }

    pub fn with_base_url(base_url: &str, model: &str, api_token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(300)) // 5 minute timeout for generation
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_token: api_token.filter(|token| !token.is_empty()),
        }
    }
}

#[async_trait]
impl AvatarPort for ReplicateAvatarClient {
    async fn generate(&self, request: AvatarRequest) -> Result<String, AvatarError> {
        let token = self.api_token.as_ref().ok_or(AvatarError::Unavailable)?;

        let body = PredictionRequest {
            input: PredictionInput {
                prompt: request.prompt,
                aspect_ratio: request.aspect_ratio,
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/v1/models/{}/predictions",
                self.base_url, self.model
            ))
            .header("Authorization", format!("Token {}", token))
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await
            .map_err(|e| AvatarError::GenerationFailed(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AvatarError::GenerationFailed(error_text));
        }

        let prediction: PredictionResponse = response
            .json()
            .await
            .map_err(|e| AvatarError::GenerationFailed(e.to_string()))?;

        extract_image_url(prediction)
    }
}

/// Replicate returns either a single URL or a list of URLs as `output`.
fn extract_image_url(prediction: PredictionResponse) -> Result<String, AvatarError> {
    if let Some(error) = prediction.error.filter(|e| !e.is_empty()) {
        return Err(AvatarError::GenerationFailed(error));
    }

    let url = match prediction.output {
        Some(serde_json::Value::String(url)) => Some(url),
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .find_map(|item| item.as_str().map(str::to_string)),
        _ => None,
    };

    url.ok_or_else(|| {
        AvatarError::GenerationFailed(format!(
            "No image in prediction output (status: {})",
            prediction.status.unwrap_or_else(|| "unknown".to_string())
        ))
    })
}

// =============================================================================
// Replicate API types
// =============================================================================

#[derive(Debug, Serialize)]
struct PredictionRequest {
    input: PredictionInput,
}

#[derive(Debug, Serialize)]
struct PredictionInput {
    prompt: String,
    aspect_ratio: String,
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    status: Option<String>,
    output: Option<serde_json::Value>,
    error: Option<String>,
}
