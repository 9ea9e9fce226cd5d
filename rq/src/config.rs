//! Configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Analysis loop limits
    pub analysis: AnalysisConfig,

    /// Document store location
    pub storage: StorageConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.max_attempts_per_item == 0 {
            return Err(eyre::eyre!("analysis.max-attempts-per-item must be at least 1"));
        }
        if self.analysis.refine_max_passes == 0 || self.analysis.execute_max_passes == 0 {
            return Err(eyre::eyre!("bounded loop passes must be at least 1"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .reqmind.yml
        let local_config = PathBuf::from(".reqmind.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/reqmind/reqmind.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("reqmind").join("reqmind.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "openai" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key (optional for local endpoints)
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-oss:20b".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "http://localhost:11434".to_string(),
            max_tokens: 8192,
            timeout_ms: 300_000,
        }
    }
}

/// Analysis loop limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Capability invocations per checklist item before the run aborts
    #[serde(rename = "max-attempts-per-item")]
    pub max_attempts_per_item: u32,

    /// Full passes of the critique/refine loop during planning
    #[serde(rename = "refine-max-passes")]
    pub refine_max_passes: u32,

    /// Full passes of the work/judge/verify loop during checklist execution
    #[serde(rename = "execute-max-passes")]
    pub execute_max_passes: u32,

    /// LLM turns within one capability invocation
    #[serde(rename = "max-turns-per-invocation")]
    pub max_turns_per_invocation: u32,

    /// Results returned by ranked document search
    #[serde(rename = "search-top-n")]
    pub search_top_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_attempts_per_item: 3,
            refine_max_passes: 3,
            execute_max_passes: 10,
            max_turns_per_invocation: 8,
            search_top_n: 10,
        }
    }
}

/// Document store location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the document store database
    #[serde(rename = "db-path")]
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("reqmind")
                .join("documents.db3"),
        }
    }
}
