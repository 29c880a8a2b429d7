//! OpenAI images client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ImageError, ImageGenerator};

pub const OPENAI_IMAGES_URL: &str = "https://api.openai.com/v1/images/generations";

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'static str,
    response_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct OpenAiImages {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiImages {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ImageError> {
        Ok(Self {
            http: reqwest::Client::builder().timeout(timeout).build()?,
            endpoint: OPENAI_IMAGES_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

fn image_ref(response: GenerationResponse) -> Result<String, ImageError> {
    let image = response.data.into_iter().next().ok_or(ImageError::Empty)?;
    match (image.b64_json, image.url) {
        (Some(b64), _) => Ok(format!("data:image/png;base64,{}", b64)),
        (None, Some(url)) => Ok(url),
        (None, None) => Err(ImageError::Empty),
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImages {
    async fn generate(&self, prompt: &str) -> Result<String, ImageError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&GenerationRequest {
                model: &self.model,
                prompt,
                size: "1024x1024",
                response_format: "b64_json",
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let envelope: ErrorEnvelope = response.json().await.unwrap_or_default();
            return Err(ImageError::Api {
                status: status.as_u16(),
                message: envelope
                    .error
                    .map(|e| e.message)
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        image_ref(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_ref_prefers_inline_data() {
        let response: GenerationResponse =
            serde_json::from_str(r#"{"data":[{"b64_json":"QUJD","url":"https://x"}]}"#).unwrap();
        assert_eq!(image_ref(response).unwrap(), "data:image/png;base64,QUJD");
    }

    #[test]
    fn test_image_ref_falls_back_to_url() {
        let response: GenerationResponse =
            serde_json::from_str(r#"{"data":[{"url":"https://img.test/a.png"}]}"#).unwrap();
        assert_eq!(image_ref(response).unwrap(), "https://img.test/a.png");
    }

    #[test]
    fn test_image_ref_empty() {
        let response: GenerationResponse = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(matches!(image_ref(response), Err(ImageError::Empty)));
    }
}
