//! Layered runtime configuration: defaults, then an optional JSON file, then
//! `HARVEST_*` environment variables. CLI flags are applied by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::extract::NameStrategy;
use crate::patterns::{Dictionaries, PatternLibrary};

pub const DEFAULT_NER_COMMAND: &str = "harvest-ner";
pub const DEFAULT_LLM_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_KEY_ENV: &str = "HARVEST_LLM_API_KEY";
const DEFAULT_EXTRACT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid LLM endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// How records are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Pattern, dictionary and NER extractors.
    #[default]
    Rules,
    /// Chat-completions model, falling back to `Rules` on any failure.
    Llm,
}

impl Strategy {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rules => "rules",
            Self::Llm => "llm",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Strategy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rules" | "rule" => Ok(Self::Rules),
            "llm" => Ok(Self::Llm),
            _ => Err(crate::Error::InvalidStrategy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NerConfig {
    /// Program name on `PATH` or a path to it.
    pub command: String,
    pub args: Vec<String>,
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_NER_COMMAND.to_string(),
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key. The key itself
    /// is never read from or written to a config file.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
        }
    }
}

impl LlmConfig {
    pub fn endpoint_url(&self) -> ConfigResult<Url> {
        Ok(Url::parse(&self.endpoint)?)
    }

    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        self.api_key_from(|key| std::env::var(key).ok())
    }

    pub fn api_key_from(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        lookup(&self.api_key_env).filter(|key| !key.trim().is_empty())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub name_strategy: NameStrategy,
    pub strategy: Strategy,
    pub ner: NerConfig,
    pub llm: LlmConfig,
    pub extract_timeout_secs: u64,
    pub dictionaries: Dictionaries,
    /// Fixed "today" for relative posting dates; local date when unset.
    pub reference_date: Option<NaiveDate>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            name_strategy: NameStrategy::default(),
            strategy: Strategy::default(),
            ner: NerConfig::default(),
            llm: LlmConfig::default(),
            extract_timeout_secs: DEFAULT_EXTRACT_TIMEOUT_SECS,
            dictionaries: Dictionaries::default(),
            reference_date: None,
        }
    }
}

impl HarvestConfig {
    /// `<config dir>/harvest/config.json`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("harvest").join("config.json"))
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` if given, else the default file when it exists, then
    /// applies the process environment.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => {
                    tracing::debug!("Loading config from {}", path.display());
                    Self::from_file(&path)?
                }
                None => Self::default(),
            },
        };

        config.apply_env_from(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(value) = lookup("HARVEST_NAME_STRATEGY") {
            self.name_strategy = value
                .parse()
                .map_err(|_| invalid("HARVEST_NAME_STRATEGY", &value))?;
        }
        if let Some(value) = lookup("HARVEST_NER_COMMAND") {
            self.ner.command = value;
        }
        if let Some(value) = lookup("HARVEST_STRATEGY") {
            self.strategy = value
                .parse()
                .map_err(|_| invalid("HARVEST_STRATEGY", &value))?;
        }
        if let Some(value) = lookup("HARVEST_LLM_ENDPOINT") {
            self.llm.endpoint = value;
        }
        if let Some(value) = lookup("HARVEST_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = lookup("HARVEST_EXTRACT_TIMEOUT") {
            self.extract_timeout_secs = value
                .trim()
                .parse()
                .map_err(|_| invalid("HARVEST_EXTRACT_TIMEOUT", &value))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.llm.endpoint_url()?;

        if self.extract_timeout_secs == 0 {
            return Err(invalid("extract_timeout_secs", "0"));
        }
        if self.ner.command.trim().is_empty() {
            return Err(invalid("ner.command", &self.ner.command));
        }
        Ok(())
    }

    #[must_use]
    pub fn extract_timeout(&self) -> Duration {
        Duration::from_secs(self.extract_timeout_secs)
    }

    #[must_use]
    pub fn pattern_library(&self) -> PatternLibrary {
        PatternLibrary::new(self.dictionaries.clone())
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
