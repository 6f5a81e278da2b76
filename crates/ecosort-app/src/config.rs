//! Configuration management for ecosort
//!
//! Config stored at: ~/.config/ecosort/config.json
//!
//! The API key is deliberately not required here: it is looked up when a
//! classification runs, so history, stats and tips work without one.

use ecosort_store::DEFAULT_LIMIT;
use ecosort_types::{ConfigError, OutputFormat, Result};
use ecosort_vision::{CredentialSource, EnvCredential, StaticCredential, DEFAULT_API_BASE, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Vision model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the Gemini API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// API key stored in the config file (takes precedence over the env var)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request schema-constrained JSON from the model
    #[serde(default)]
    pub structured_output: bool,

    /// Number of scans kept in history
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// History directory override
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_api_key_env() -> String {
    "API_KEY".to_string()
}

fn default_history_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            api_key: None,
            api_key_env: default_api_key_env(),
            structured_output: false,
            history_limit: default_history_limit(),
            data_dir: None,
            output_format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("ecosort");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Directory holding history.json
    pub fn store_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("ecosort");
        Ok(data_dir)
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Credential source honouring the inline key first, then the env var
    pub fn credential(&self) -> ConfiguredCredential {
        ConfiguredCredential {
            inline: StaticCredential(self.api_key.clone()),
            env: EnvCredential::new(self.api_key_env.clone()),
        }
    }
}

/// API key lookup performed on every classification call
#[derive(Debug, Clone)]
pub struct ConfiguredCredential {
    inline: StaticCredential,
    env: EnvCredential,
}

impl CredentialSource for ConfiguredCredential {
    fn api_key(&self) -> Option<String> {
        self.inline.api_key().or_else(|| self.env.api_key())
    }

    fn describe(&self) -> String {
        format!("config api_key and {}", self.env.describe())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "EcoSort Configuration")?;
        writeln!(f, "=====================")?;
        writeln!(f)?;
        writeln!(f, "Model:             {}", self.model)?;
        writeln!(f, "API base:          {}", self.api_base)?;
        writeln!(
            f,
            "API key:           {}",
            if self.api_key.is_some() {
                "(set in config)".to_string()
            } else {
                format!("${}", self.api_key_env)
            }
        )?;
        writeln!(f, "Structured output: {}", self.structured_output)?;
        writeln!(f, "History limit:     {}", self.history_limit)?;
        writeln!(
            f,
            "History dir:       {}",
            self.store_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:     {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:       {}", path.display())?;
        }

        Ok(())
    }
}
