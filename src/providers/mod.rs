//! AI provider integrations

mod gemini;
mod ollama;

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use crate::config::LlmSettings;
use crate::conversation::Message;

pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Parameters sent with every completion request
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: Option<f32>,
}

pub enum Provider {
    Gemini(GeminiProvider),
    Ollama(OllamaProvider),
}

impl Provider {
    /// Build the provider named in `settings`. A missing API key is not an
    /// error here; it surfaces as [`ProviderError::NotConfigured`] on the first call.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        let generation = GenerationSettings {
            model: settings.model.clone(),
            temperature: settings.temperature,
        };

        match settings.provider.to_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini(GeminiProvider::new(
                client,
                settings.api_key.clone(),
                generation,
            ))),
            "ollama" => {
                let url = settings
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| "http://localhost:11434".into());
                Ok(Provider::Ollama(OllamaProvider::new(client, url, generation)))
            }
            _ => Err(ProviderError::UnknownProvider(settings.provider.clone())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini(_) => "gemini",
            Provider::Ollama(_) => "ollama",
        }
    }

    /// Whether the provider has everything it needs to make a call
    pub fn is_configured(&self) -> bool {
        match self {
            Provider::Gemini(p) => p.has_api_key(),
            Provider::Ollama(_) => true,
        }
    }

    pub async fn chat(&self, messages: &[Message]) -> Result<Message, ProviderError> {
        match self {
            Provider::Gemini(p) => p.chat(messages).await,
            Provider::Ollama(p) => p.chat(messages).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(provider: &str) -> LlmSettings {
        LlmSettings {
            provider: provider.to_string(),
            model: "m".to_string(),
            api_key: None,
            endpoint: None,
            temperature: None,
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_from_settings() {
        let gemini = Provider::from_settings(&settings("Gemini")).unwrap();
        assert_eq!(gemini.name(), "gemini");
        assert!(!gemini.is_configured());

        let ollama = Provider::from_settings(&settings("ollama")).unwrap();
        assert_eq!(ollama.name(), "ollama");
        assert!(ollama.is_configured());
    }

    #[test]
    fn test_unknown_provider() {
        let result = Provider::from_settings(&settings("skynet"));
        assert!(matches!(result, Err(ProviderError::UnknownProvider(name)) if name == "skynet"));
    }

    #[tokio::test]
    async fn test_gemini_without_key_fails_on_call() {
        let provider = Provider::from_settings(&settings("gemini")).unwrap();
        let result = provider.chat(&[Message::user("oi")]).await;
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }
}
