//! Library configuration.
//!
//! Loaded from an optional TOML file, then overridden by environment
//! variables:
//!
//! | Variable | Overrides |
//! |---|---|
//! | `TCG_BINDER_API_KEY` | `catalog.api_key` |
//! | `TCG_BINDER_CATALOG_URL` | `catalog.base_url` |
//! | `TCG_BINDER_LOG` | `logging.filter` |
//!
//! ```toml
//! [catalog]
//! base_url = "https://api.pokemontcg.io/v2"
//! page_size = 250
//!
//! [names]
//! max_len = 30
//! profanity_filter = true
//! blocked_words = ["heck"]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const ENV_API_KEY: &str = "TCG_BINDER_API_KEY";
pub const ENV_CATALOG_URL: &str = "TCG_BINDER_CATALOG_URL";
pub const ENV_LOG: &str = "TCG_BINDER_LOG";

pub const DEFAULT_CATALOG_URL: &str = "https://api.pokemontcg.io/v2";
pub const DEFAULT_PAGE_SIZE: u32 = 250;
pub const DEFAULT_NAME_MAX_LEN: usize = 30;
pub const DEFAULT_LOG_FILTER: &str = "tcg_binder=info";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub names: NameRules,
    pub logging: LoggingConfig,
}

/// Where and how the public card catalog is queried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    /// Sent as `X-Api-Key` when present.
    pub api_key: Option<String>,
    pub page_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            api_key: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Rules for user-chosen collection and deck names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameRules {
    pub max_len: usize,
    /// Run the built-in profanity filter.
    pub profanity_filter: bool,
    /// Extra whole words to reject on top of the profanity filter.
    pub blocked_words: Vec<String>,
}

impl Default for NameRules {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_NAME_MAX_LEN,
            profanity_filter: true,
            blocked_words: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` wins when set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Defaults, overlaid by the TOML file at `path` (if given), overlaid by
    /// the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply overrides from `lookup` (normally the process environment).
    /// Blank values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let value = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        if let Some(key) = value(ENV_API_KEY) {
            self.catalog.api_key = Some(key);
        }
        if let Some(url) = value(ENV_CATALOG_URL) {
            self.catalog.base_url = url;
        }
        if let Some(filter) = value(ENV_LOG) {
            self.logging.filter = filter;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.page_size == 0 {
            return Err(ConfigError::Invalid("catalog.page_size must be positive".into()));
        }
        if self.catalog.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("catalog.base_url must not be empty".into()));
        }
        if self.names.max_len == 0 {
            return Err(ConfigError::Invalid("names.max_len must be positive".into()));
        }
        Ok(())
    }
}
