use kanban_markdown_engine::DialectOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "KANBAN_MARKDOWN_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid {name} {prefix:?}: {reason}")]
    InvalidPrefix {
        name: &'static str,
        prefix: char,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dialect: DialectOptions,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;
        config.validate()?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        self.validate()?;
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        if let Ok(custom) = std::env::var(CONFIG_ENV)
            && let Some(path) = Self::expand_path(Path::new(&custom))
        {
            return path;
        }
        let config_dir = shellexpand::tilde("~/.config/kanban-markdown");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn dialect_options(&self) -> DialectOptions {
        self.dialect.clone()
    }

    /// Prefixes must be distinct punctuation, or tags would swallow text.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefixes = [
            ("tag_prefix", self.dialect.tag_prefix),
            ("person_prefix", self.dialect.person_prefix),
            ("temporal_prefix", self.dialect.temporal_prefix),
        ];
        for (i, &(name, prefix)) in prefixes.iter().enumerate() {
            if prefix.is_alphanumeric() || prefix.is_whitespace() {
                return Err(ConfigError::InvalidPrefix {
                    name,
                    prefix,
                    reason: "must be punctuation",
                });
            }
            if prefixes[..i].iter().any(|&(_, other)| other == prefix) {
                return Err(ConfigError::InvalidPrefix {
                    name,
                    prefix,
                    reason: "already used by another prefix",
                });
            }
        }
        Ok(())
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
