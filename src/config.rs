//! Configuration for the advisory pipeline

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Web search configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Pipeline behavior configuration
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl AdvisorConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let mut config: Self =
            toml::from_str(&raw).map_err(|e| Error::config(e.to_string()))?;
        config.apply_env();
        Ok(config)
    }

    /// Build a default configuration with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Pull API credentials from the environment when present
    ///
    /// `GEMINI_API_KEY` and `SERPER_API_KEY` always win over file values so
    /// that secrets never have to live in the config file.
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                self.llm.api_key = Some(key);
            }
        }
        if let Ok(key) = std::env::var("SERPER_API_KEY") {
            if !key.is_empty() {
                self.search.api_key = Some(key);
            }
        }
    }
}

/// LLM (Gemini) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Generative Language API base URL
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// API key (usually injected from GEMINI_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum output tokens per response
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
            temperature: 0.3,
            max_output_tokens: 4096,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Web search (Serper) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Serper API endpoint
    pub base_url: String,
    /// API key (usually injected from SERPER_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Maximum organic results to feed into a stage prompt
    pub max_results: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://google.serper.dev".to_string(),
            api_key: None,
            max_results: 5,
            timeout_secs: 30,
        }
    }
}

/// Pipeline behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Document analyzed when the caller does not supply a path
    pub default_document: PathBuf,
    /// Stop the run after Verification when the verifier rejects the document
    ///
    /// Off by default: rejection is advisory text and later stages still run.
    #[serde(default)]
    pub halt_on_rejection: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_document: PathBuf::from("data/sample.pdf"),
            halt_on_rejection: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AdvisorConfig::default();
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.pipeline.default_document, PathBuf::from("data/sample.pdf"));
        assert!(!config.pipeline.halt_on_rejection);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AdvisorConfig = toml::from_str(
            r#"
            [llm]
            base_url = "http://localhost:9999"
            model = "gemini-2.5-pro"
            temperature = 0.1
            max_output_tokens = 2048
            timeout_secs = 60
            max_retries = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.llm.model, "gemini-2.5-pro");
        assert_eq!(config.search.max_results, 5);
        assert!(!config.pipeline.halt_on_rejection);
    }
}
