use anyhow::{Context, bail};
use mortgage_calculator::RateTable;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "mortgage.toml";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8282, request_timeout_seconds: 10 }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_body_size_kb: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self { max_body_size_kb: 64 }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence when set
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "mortgage_api=info,mortgage_calculator=info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults { missing: PathBuf },
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!(path = %path.display(), "Configuration loaded"),
            ConfigSource::Defaults { missing } => warn!(
                "Configuration file '{}' not found. Using default configuration.",
                missing.display()
            ),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct MortgageConfig {
    pub server: ServerConfig,
    pub limits: LimitsConfig,
    pub rates: RateTable,
    pub logging: LoggingConfig,
}

impl MortgageConfig {
    /// Reads the TOML file at `path`.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error. Nothing is logged here since the subscriber is configured
    /// from the result; call [`ConfigSource::log`] once it is installed.
    pub fn load(path: &Path) -> anyhow::Result<(Self, ConfigSource)> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config = Self::from_toml(&contents)
                    .with_context(|| format!("invalid configuration file '{}'", path.display()))?;
                Ok((config, ConfigSource::File(path.to_path_buf())))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Ok((Self::default(), ConfigSource::Defaults { missing: path.to_path_buf() }))
            }
            Err(err) => Err(err)
                .with_context(|| format!("failed to read configuration file '{}'", path.display())),
        }
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `MORTGAGE_*` environment variable overrides.
    pub fn apply_env_overrides(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    /// Unparseable values are ignored with a warning.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = lookup("MORTGAGE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("MORTGAGE_PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!(value = %port, "Ignoring invalid MORTGAGE_PORT"),
            }
        }
        if let Some(format) = lookup("MORTGAGE_LOG_FORMAT") {
            match format.to_ascii_lowercase().as_str() {
                "json" => self.logging.format = LogFormat::Json,
                "compact" => self.logging.format = LogFormat::Compact,
                _ => warn!(value = %format, "Ignoring invalid MORTGAGE_LOG_FORMAT"),
            }
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.server.request_timeout_seconds == 0 {
            bail!("server.request_timeout_seconds must be positive");
        }
        if self.limits.max_body_size_kb == 0 {
            bail!("limits.max_body_size_kb must be positive");
        }
        self.rates.validate().context("invalid [rates] section")?;

        info!(
            host = %self.server.host,
            port = self.server.port,
            salary_rate = self.rates.salary,
            military_rate = self.rates.military,
            base_rate = self.rates.base,
            "Configuration validated"
        );
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn max_body_size_bytes(&self) -> usize {
        self.limits.max_body_size_kb.saturating_mul(1024)
    }
}
