//! Configuration management.
//!
//! Configuration comes from a TOML file, then environment overrides, then
//! built-in defaults. See [`UniguideConfig::load`] for the lookup order.
// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use crate::models::MAX_RECOMMENDATIONS;
use crate::observability::LogFormat;
use crate::ranking::{DEFAULT_THRESHOLD, RankingProfile};
use crate::{Error, Result};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "UNIGUIDE_CONFIG_PATH";

/// `${NAME}` references inside config values.
static ENV_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static regex: env reference")
});

/// Main configuration for uniguide.
#[derive(Debug, Clone)]
pub struct UniguideConfig {
    /// Path to the catalogue JSON file.
    pub catalogue_path: PathBuf,
    /// Fuzzy ranking settings.
    pub ranking: RankingConfig,
    /// Language model settings.
    pub llm: LlmConfig,
    /// Log output settings.
    pub logging: LoggingSettings,
    /// Prometheus exporter settings.
    pub metrics: MetricsSettings,
}

/// Fuzzy ranking settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingConfig {
    /// Highest normalized error score accepted as a match.
    pub threshold: f64,
    /// Maximum recommendations per turn.
    pub max_results: usize,
    /// Field weighting preset.
    pub profile: RankingProfile,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_results: MAX_RECOMMENDATIONS,
            profile: RankingProfile::Standard,
        }
    }
}

/// Language model settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which backend generates replies.
    pub provider: LlmBackend,
    /// Model name.
    pub model: Option<String>,
    /// API key, after `${VAR}` expansion.
    pub api_key: Option<SecretString>,
    /// Base URL for OpenAI-compatible endpoints.
    pub base_url: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Number of catalogue records summarized in the system prompt.
    pub prompt_sample: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmBackend::OpenAi,
            model: None,
            api_key: None,
            base_url: None,
            timeout_ms: 30_000,
            connect_timeout_ms: 3_000,
            prompt_sample: 30,
        }
    }
}

impl LlmConfig {
    /// Returns `true` if a model can be called.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.provider != LlmBackend::None
            && self
                .api_key
                .as_ref()
                .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }
}

/// Available reply backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmBackend {
    /// `OpenAI` chat completions, or any compatible endpoint.
    #[default]
    OpenAi,
    /// No model; replies are composed heuristically.
    None,
}

impl LlmBackend {
    /// Parses a provider string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "open_ai" | "open-ai" => Some(Self::OpenAi),
            "none" | "off" | "heuristic" => Some(Self::None),
            _ => None,
        }
    }

    /// Returns the string representation used in configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::None => "none",
        }
    }
}

/// Prometheus exporter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSettings {
    /// Whether to install the exporter.
    pub enabled: bool,
    /// Port for the `/metrics` HTTP listener.
    pub port: u16,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 9090,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Default)]
pub struct LoggingSettings {
    /// Output format.
    pub format: LogFormat,
    /// Append to this file instead of stderr.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Catalogue path.
    pub catalogue_path: Option<String>,
    /// Ranking section.
    pub ranking: Option<ConfigFileRanking>,
    /// LLM section.
    pub llm: Option<ConfigFileLlm>,
    /// Logging section.
    pub logging: Option<ConfigFileLogging>,
    /// Metrics section.
    pub metrics: Option<ConfigFileMetrics>,
}

/// Ranking section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileRanking {
    /// Match threshold.
    pub threshold: Option<f64>,
    /// Result limit.
    pub max_results: Option<usize>,
    /// Weighting preset name.
    pub profile: Option<String>,
}

/// LLM section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileLlm {
    /// Provider name.
    pub provider: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// API key, possibly a `${VAR}` reference.
    pub api_key: Option<String>,
    /// Base URL.
    pub base_url: Option<String>,
    /// Request timeout.
    pub timeout_ms: Option<u64>,
    /// Connect timeout.
    pub connect_timeout_ms: Option<u64>,
    /// Prompt sample size.
    pub prompt_sample: Option<usize>,
}

/// Metrics section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileMetrics {
    /// Install the Prometheus exporter.
    pub enabled: Option<bool>,
    /// Listener port.
    pub port: Option<u16>,
}

/// Logging section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileLogging {
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Log file path.
    pub file: Option<String>,
}

impl Default for UniguideConfig {
    fn default() -> Self {
        Self {
            catalogue_path: PathBuf::from("data/universities.json"),
            ranking: RankingConfig::default(),
            llm: LlmConfig::default(),
            logging: LoggingSettings::default(),
            metrics: MetricsSettings::default(),
        }
    }
}

impl UniguideConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the effective configuration.
    ///
    /// Checks the following sources in order:
    /// 1. `explicit` (the `--config` flag)
    /// 2. The file named by `UNIGUIDE_CONFIG_PATH`
    /// 3. Platform-specific config dir, then `~/.config/uniguide/config.toml`
    ///
    /// Environment overrides are applied on top and the result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be read or parsed,
    /// or if the final values are out of range.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let config = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::load_default(),
        };

        let config = config.with_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file path.
    ///
    /// `${VAR}` references are expanded from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        Self::from_toml(&contents, |key| std::env::var(key).ok())
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for malformed TOML or unknown values.
    pub fn from_toml<F>(contents: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: ConfigFile = toml::from_str(contents)
            .map_err(|e| Error::InvalidInput(format!("malformed config file: {e}")))?;
        Self::from_config_file(file, &lookup)
    }

    /// Loads configuration from the default location.
    ///
    /// Returns default configuration if no config file is found. A file that
    /// exists but fails to load is logged and skipped.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("uniguide").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("uniguide")
                .join("config.toml"),
        ];

        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping config file");
                },
            }
        }

        Self::default()
    }

    /// Applies environment overrides using `lookup` to read variables.
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get("UNIGUIDE_CATALOGUE") {
            self.catalogue_path = PathBuf::from(path);
        }
        if let Some(format) = get("UNIGUIDE_LOG_FORMAT") {
            self.logging.format = LogFormat::parse(&format);
        }
        if let Some(provider) = get("UNIGUIDE_LLM_PROVIDER").and_then(|p| LlmBackend::parse(&p)) {
            self.llm.provider = provider;
        }
        if let Some(timeout) = get("UNIGUIDE_LLM_TIMEOUT_MS").and_then(|t| t.trim().parse().ok()) {
            self.llm.timeout_ms = timeout;
        }
        if self.llm.api_key.is_none() {
            self.llm.api_key = get("OPENAI_API_KEY").map(SecretString::from);
        }
        if let Some(enabled) = get("UNIGUIDE_METRICS_ENABLED") {
            let enabled = enabled.trim().to_lowercase();
            self.metrics.enabled = matches!(enabled.as_str(), "true" | "1" | "yes");
        }
        if let Some(port) = get("UNIGUIDE_METRICS_PORT").and_then(|p| p.trim().parse().ok()) {
            self.metrics.port = port;
        }

        self
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.ranking.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::InvalidInput(format!(
                "ranking.threshold must be between 0.0 and 1.0, got {threshold}"
            )));
        }
        let max_results = self.ranking.max_results;
        if !(1..=MAX_RECOMMENDATIONS).contains(&max_results) {
            return Err(Error::InvalidInput(format!(
                "ranking.max_results must be between 1 and {MAX_RECOMMENDATIONS}, got {max_results}"
            )));
        }
        if self.llm.timeout_ms == 0 {
            return Err(Error::InvalidInput(
                "llm.timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Sets the catalogue path.
    #[must_use]
    pub fn with_catalogue_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalogue_path = path.into();
        self
    }

    /// Converts a `ConfigFile` to `UniguideConfig`.
    fn from_config_file<F>(file: ConfigFile, lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = file.catalogue_path {
            config.catalogue_path = PathBuf::from(path);
        }
        if let Some(ranking) = file.ranking {
            if let Some(v) = ranking.threshold {
                config.ranking.threshold = v;
            }
            if let Some(v) = ranking.max_results {
                config.ranking.max_results = v;
            }
            if let Some(profile) = ranking.profile {
                config.ranking.profile = RankingProfile::parse(&profile).ok_or_else(|| {
                    Error::InvalidInput(format!("unknown ranking profile '{profile}'"))
                })?;
            }
        }
        if let Some(llm) = file.llm {
            if let Some(provider) = llm.provider {
                config.llm.provider = LlmBackend::parse(&provider).ok_or_else(|| {
                    Error::InvalidInput(format!("unknown llm provider '{provider}'"))
                })?;
            }
            config.llm.model = llm.model;
            config.llm.api_key = llm
                .api_key
                .map(|key| expand_env_vars(&key, lookup))
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::from);
            config.llm.base_url = llm.base_url;
            if let Some(v) = llm.timeout_ms {
                config.llm.timeout_ms = v;
            }
            if let Some(v) = llm.connect_timeout_ms {
                config.llm.connect_timeout_ms = v;
            }
            if let Some(v) = llm.prompt_sample {
                config.llm.prompt_sample = v;
            }
        }
        if let Some(logging) = file.logging {
            if let Some(format) = logging.format {
                config.logging.format = LogFormat::parse(&format);
            }
            config.logging.file = logging.file.map(PathBuf::from);
        }
        if let Some(metrics) = file.metrics {
            if let Some(v) = metrics.enabled {
                config.metrics.enabled = v;
            }
            if let Some(v) = metrics.port {
                config.metrics.port = v;
            }
        }

        Ok(config)
    }
}

impl std::fmt::Display for UniguideConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let api_key = if self.llm.api_key.is_some() {
            "[REDACTED]"
        } else {
            "(unset)"
        };
        writeln!(f, "catalogue_path = {}", self.catalogue_path.display())?;
        writeln!(f, "[ranking]")?;
        writeln!(f, "threshold = {}", self.ranking.threshold)?;
        writeln!(f, "max_results = {}", self.ranking.max_results)?;
        writeln!(f, "profile = {}", self.ranking.profile)?;
        writeln!(f, "[llm]")?;
        writeln!(f, "provider = {}", self.llm.provider.as_str())?;
        writeln!(f, "model = {}", self.llm.model.as_deref().unwrap_or("(default)"))?;
        writeln!(f, "api_key = {api_key}")?;
        writeln!(
            f,
            "base_url = {}",
            self.llm.base_url.as_deref().unwrap_or("(default)")
        )?;
        writeln!(f, "timeout_ms = {}", self.llm.timeout_ms)?;
        writeln!(f, "connect_timeout_ms = {}", self.llm.connect_timeout_ms)?;
        writeln!(f, "prompt_sample = {}", self.llm.prompt_sample)?;
        writeln!(f, "[logging]")?;
        writeln!(f, "format = {}", self.logging.format.as_str())?;
        writeln!(
            f,
            "file = {}",
            self.logging
                .file
                .as_ref()
                .map_or_else(|| "(stderr)".to_string(), |p| p.display().to_string())
        )?;
        writeln!(f, "[metrics]")?;
        writeln!(f, "enabled = {}", self.metrics.enabled)?;
        write!(f, "port = {}", self.metrics.port)
    }
}

/// Replaces `${NAME}` references with values from `lookup`.
///
/// Unset variables expand to the empty string.
#[must_use]
pub fn expand_env_vars<F>(value: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_REFERENCE
        .replace_all(value, |caps: &regex::Captures<'_>| {
            lookup(&caps[1]).unwrap_or_default()
        })
        .into_owned()
}
