//! Application configuration
//!
//! Settings come from an optional TOML file (see [`file`]) with environment
//! variables layered on top, so a `.env` file is enough for most setups.

pub mod file;
pub mod prompts;

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use file::{ConfigError, FileConfig};

/// Environment variable pointing at the optional TOML config file
pub const CONFIG_PATH_ENV: &str = "JARVIS_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub llm: LlmSettings,
    pub memory_path: PathBuf,
    pub actions: ActionSettings,
}

/// Remote model selection and generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// "gemini" or "ollama"
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_secs: u64,
}

/// Guards for actions with real consequences on the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSettings {
    /// Power actions are only simulated unless this is set
    pub allow_power_actions: bool,
    /// Delay applied to every real shutdown/restart so it can be cancelled
    pub power_delay_minutes: u32,
}

impl Config {
    /// Load the TOML file named by `JARVIS_CONFIG` (if any), then apply env overrides
    pub fn load() -> Result<Self, ConfigError> {
        let file = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => FileConfig::from_file(&PathBuf::from(path))?,
            Err(_) => FileConfig::default(),
        };
        Self::from_file_and_env(file, |key| env::var(key).ok())
    }

    /// Merge a parsed file with overrides from `lookup` (normally `std::env::var`)
    pub fn from_file_and_env(
        file: FileConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| ConfigError::Validation(format!("PORT is not a valid port: {}", p)))?,
            None => file.server.port,
        };

        let api_key_env = file
            .llm
            .api_key_env
            .clone()
            .unwrap_or_else(|| "GEMINI_API_KEY".to_string());

        let allow_power_actions = match lookup("JARVIS_ALLOW_POWER_ACTIONS") {
            Some(v) => matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"),
            None => file.actions.allow_power_actions,
        };

        let config = Self {
            host: lookup("HOST").unwrap_or(file.server.host),
            port,
            llm: LlmSettings {
                provider: lookup("JARVIS_PROVIDER").unwrap_or(file.llm.provider),
                model: lookup("JARVIS_MODEL").unwrap_or(file.llm.model),
                api_key: lookup(&api_key_env).filter(|k| !k.trim().is_empty()),
                endpoint: lookup("OLLAMA_URL").or(file.llm.endpoint),
                temperature: file.llm.temperature,
                timeout_secs: file.llm.timeout_secs,
            },
            memory_path: lookup("JARVIS_MEMORY_PATH")
                .map(PathBuf::from)
                .unwrap_or(file.memory.path),
            actions: ActionSettings {
                allow_power_actions,
                power_delay_minutes: file.actions.power_delay_minutes,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Validation("llm.model must not be empty".into()));
        }
        if self.actions.allow_power_actions && self.actions.power_delay_minutes == 0 {
            return Err(ConfigError::Validation(
                "actions.power_delay_minutes must be at least 1 when power actions are enabled"
                    .into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = Config::from_file_and_env(FileConfig::default(), lookup_from(&[])).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert!(config.llm.api_key.is_none());
        assert_eq!(config.memory_path, PathBuf::from("./memoria.json"));
        assert!(!config.actions.allow_power_actions);
    }

    #[test]
    fn test_env_overrides_file() {
        let config = Config::from_file_and_env(
            FileConfig::default(),
            lookup_from(&[
                ("PORT", "9000"),
                ("GEMINI_API_KEY", "secret"),
                ("JARVIS_PROVIDER", "ollama"),
                ("JARVIS_ALLOW_POWER_ACTIONS", "true"),
            ]),
        )
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.llm.api_key.as_deref(), Some("secret"));
        assert_eq!(config.llm.provider, "ollama");
        assert!(config.actions.allow_power_actions);
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let config =
            Config::from_file_and_env(FileConfig::default(), lookup_from(&[("GEMINI_API_KEY", "  ")]))
                .unwrap();
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result =
            Config::from_file_and_env(FileConfig::default(), lookup_from(&[("PORT", "http")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_power_actions_need_delay() {
        let mut file = FileConfig::default();
        file.actions.allow_power_actions = true;
        file.actions.power_delay_minutes = 0;

        let result = Config::from_file_and_env(file, lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
