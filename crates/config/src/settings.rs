//! Settings tree with file and environment layering

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Root settings for the advisor pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub retrieval: RetrievalSettings,
    pub session: SessionSettings,
    pub context: ContextSettings,
    pub gateway: GatewaySettings,
}

/// Catalog retrieval knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Hard cap on candidates returned per query
    pub max_candidates: usize,
    /// Below this many filtered matches the engine pads the result set
    pub min_results: usize,
    /// Tokens taken from the query when building the catalog filter
    pub max_filter_tokens: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            max_candidates: 30,
            min_results: 10,
            max_filter_tokens: 8,
        }
    }
}

/// Conversation history limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Turns retained per session; oldest are discarded first
    pub max_turns: usize,
    /// Trailing turns rendered into the model prompt
    pub history_window: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_turns: 16,
            history_window: 12,
        }
    }
}

/// Context assembly limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
    /// Candidate lines rendered into the context block
    pub max_entries: usize,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self { max_entries: 20 }
    }
}

/// Language-model gateway settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Model name/ID
    pub model: String,
    /// API endpoint
    pub endpoint: String,
    /// Bearer token, if the endpoint requires one
    pub api_key: Option<String>,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    /// Request timeout; generation may legitimately take tens of seconds
    pub timeout_secs: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            model: "qwen2.5:7b-instruct".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            api_key: None,
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            max_output_tokens: 1024,
            timeout_secs: 30,
        }
    }
}

/// Load settings from an optional file plus `CAR_ADVISOR_*` environment
/// variables. Nested keys use `__`, e.g. `CAR_ADVISOR_SESSION__MAX_TURNS=4`.
pub fn load_settings(path: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();
    builder = match path {
        Some(path) => builder.add_source(File::with_name(path)),
        None => builder.add_source(File::with_name("car-advisor").required(false)),
    };
    let cfg = builder
        .add_source(
            Environment::with_prefix("CAR_ADVISOR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings: Settings = cfg.try_deserialize()?;
    tracing::debug!(
        max_candidates = settings.retrieval.max_candidates,
        max_turns = settings.session.max_turns,
        model = %settings.gateway.model,
        "settings loaded"
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.retrieval.max_candidates, 30);
        assert_eq!(settings.retrieval.min_results, 10);
        assert_eq!(settings.session.max_turns, 16);
        assert_eq!(settings.context.max_entries, 20);
        assert_eq!(settings.gateway.timeout_secs, 30);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[session]\nmax_turns = 6\n\n[retrieval]\nmin_results = 4").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.session.max_turns, 6);
        assert_eq!(settings.retrieval.min_results, 4);
        // Untouched sections keep their defaults.
        assert_eq!(settings.retrieval.max_candidates, 30);
    }

    #[test]
    fn test_env_override() {
        std::env::set_var("CAR_ADVISOR_SESSION__MAX_TURNS", "4");
        let settings = load_settings(None).unwrap();
        std::env::remove_var("CAR_ADVISOR_SESSION__MAX_TURNS");
        assert_eq!(settings.session.max_turns, 4);
    }
}
