//! Text generators for the editor's AI drafting.

#[cfg(feature = "remote")]
mod openai;
mod template;

use std::env;
use std::sync::Arc;

use sparkblog_core::ports::TextGenerator;

#[cfg(feature = "remote")]
pub use openai::OpenAiGenerator;
pub use template::TemplateGenerator;

const DEFAULT_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Base URL of an OpenAI-compatible API.
    pub api_url: String,
    /// Without a key the offline template generator is used.
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl GenerationConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("GENERATION_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_key: env::var("GENERATION_API_KEY").ok().filter(|k| !k.is_empty()),
            model: env::var("GENERATION_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        }
    }
}

/// Pick the generator matching the configuration.
pub fn build_generator(config: &GenerationConfig) -> Arc<dyn TextGenerator> {
    #[cfg(feature = "remote")]
    if let Some(api_key) = &config.api_key {
        tracing::info!(model = %config.model, "Using remote text generation");
        return Arc::new(OpenAiGenerator::new(
            config.api_url.clone(),
            api_key.clone(),
            config.model.clone(),
        ));
    }

    if config.api_key.is_some() {
        tracing::warn!("GENERATION_API_KEY set but the remote feature is disabled");
    }
    tracing::info!("Using offline template generator");
    Arc::new(TemplateGenerator)
}
