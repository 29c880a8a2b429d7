//! Imaging Module
//!
//! Poster image generation for Wrapped reports. Returns either a data URL
//! or a remote image URL.

mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use openai::{OpenAiImages, OPENAI_IMAGES_URL};

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("image request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("image API response had no image")]
    Empty,
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ImageError>;
}

/// Deterministic placeholder artwork, used when no image API key is set and
/// as the fallback when generation fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderImages;

impl PlaceholderImages {
    pub fn url_for(prompt: &str) -> String {
        let seed: String = prompt
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
            .take(48)
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        let seed = if seed.is_empty() { "wrapped".to_string() } else { seed };
        format!("https://picsum.photos/seed/{}/1024/1024", seed.to_lowercase())
    }
}

#[async_trait]
impl ImageGenerator for PlaceholderImages {
    async fn generate(&self, prompt: &str) -> Result<String, ImageError> {
        Ok(Self::url_for(prompt))
    }
}
