//! Offline generator producing a placeholder article around the prompt.

use async_trait::async_trait;

use sparkblog_core::ports::{GenerateError, TextGenerator};

/// Deterministic stand-in for a language model. Useful for demos and for
/// running without an API key.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

#[async_trait]
impl TextGenerator for TemplateGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let prompt = prompt.trim();
        Ok(format!(
            "# {prompt}\n\
             \n\
             This is AI-generated content based on your prompt: \"{prompt}\"\n\
             \n\
             Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed do eiusmod tempor \
             incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud \
             exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.\n\
             \n\
             ## Key Points\n\
             \n\
             - Point one about {prompt}\n\
             - Another important aspect\n\
             - Detailed analysis and insights\n\
             - Conclusion and recommendations\n\
             \n\
             Duis aute irure dolor in reprehenderit in voluptate velit esse cillum dolore eu \
             fugiat nulla pariatur. Excepteur sint occaecat cupidatat non proident, sunt in culpa \
             qui officia deserunt mollit anim id est laborum."
        ))
    }
}
