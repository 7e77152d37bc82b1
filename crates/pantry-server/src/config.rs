use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use pantry_core::genai::{GenerationClient, GenerationConfig, OpenAiProvider};

pub struct AppConfig {
    pub db_path: PathBuf,
    pub generation: GenerationConfig,
    /// Reword expiry notifications with the generation client.
    pub ai_notifications: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            db_path: env::var("PANTRY_DB_PATH")
                .unwrap_or_else(|_| "pantry.db".into())
                .into(),
            generation: GenerationConfig::from_env(),
            ai_notifications: env::var("PANTRY_AI_NOTIFICATIONS")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }

    /// `None` when no API key is configured; generation-backed features then
    /// fall back to their deterministic behavior.
    pub fn generation_client(&self) -> Option<GenerationClient> {
        if !self.generation.is_configured() {
            info!("PANTRY_AI_API_KEY not set, text generation disabled");
            return None;
        }
        match OpenAiProvider::new(&self.generation) {
            Ok(provider) => {
                info!(
                    "Text generation via {} ({})",
                    self.generation.base_url, self.generation.model
                );
                Some(GenerationClient::new(
                    Arc::new(provider),
                    self.generation.retry.clone(),
                ))
            }
            Err(e) => {
                warn!("Text generation disabled: {}", e);
                None
            }
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
