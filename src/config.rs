//! Configuration loading helpers.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::sampler::SamplerConfig;
use crate::source::{BuddyinfoSource, SysctlCompactionTrigger};

/// Errors returned by configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error while reading config files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Invalid value for a key.
    #[error("invalid value for {key}: {value}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Raw value string.
        value: String,
    },
    /// Unknown configuration key.
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Top-level configuration schema.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FragwatchConfig {
    /// Sampling configuration.
    pub sampling: Option<SamplingConfig>,
    /// External source configuration.
    pub source: Option<SourceConfigSpec>,
}

impl FragwatchConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load configuration from the `FRAGWATCH_CONFIG` env var (if set),
    /// then apply `FRAGWATCH__section__field` overrides.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let config_path = env::var("FRAGWATCH_CONFIG").ok();
        let mut config = match config_path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment overrides in-place.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        for (key, value) in env::vars() {
            if !key.starts_with("FRAGWATCH__") {
                continue;
            }
            let path = key["FRAGWATCH__".len()..].to_ascii_lowercase();
            let parts: Vec<&str> = path.split("__").collect();
            let value = value.trim().to_string();

            match parts.as_slice() {
                ["sampling", "rate"] => {
                    self.sampling_mut().rate = Some(parse_value(&key, &value)?);
                }
                ["sampling", "zone"] => {
                    self.sampling_mut().zone = Some(value.to_string());
                }
                ["source", "buddyinfo_path"] => {
                    self.source_mut().buddyinfo_path = Some(PathBuf::from(value));
                }
                ["source", "compact_path"] => {
                    self.source_mut().compact_path = Some(PathBuf::from(value));
                }
                _ => return Err(ConfigError::UnknownKey(key)),
            }
        }

        Ok(())
    }

    /// Build a validated `SamplerConfig` using defaults plus overrides.
    ///
    /// A sampling rate of zero seconds is a fatal configuration error.
    pub fn to_sampler_config(&self) -> Result<SamplerConfig, ConfigError> {
        let mut config = SamplerConfig::default();
        if let Some(sampling) = &self.sampling {
            if let Some(rate) = sampling.rate {
                if rate == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "sampling.rate".into(),
                        value: rate.to_string(),
                    });
                }
                config.interval = Duration::from_secs(rate);
            }
            config.zone = sampling.zone.clone();
        }
        Ok(config)
    }

    /// Build the buddyinfo-backed histogram source.
    pub fn histogram_source(&self) -> BuddyinfoSource {
        match self.source.as_ref().and_then(|s| s.buddyinfo_path.clone()) {
            Some(path) => BuddyinfoSource::new(path),
            None => BuddyinfoSource::default(),
        }
    }

    /// Build the sysctl-backed compaction trigger.
    pub fn compaction_trigger(&self) -> SysctlCompactionTrigger {
        match self.source.as_ref().and_then(|s| s.compact_path.clone()) {
            Some(path) => SysctlCompactionTrigger::new(path),
            None => SysctlCompactionTrigger::default(),
        }
    }

    fn sampling_mut(&mut self) -> &mut SamplingConfig {
        if self.sampling.is_none() {
            self.sampling = Some(SamplingConfig::default());
        }
        self.sampling.as_mut().expect("sampling config")
    }

    fn source_mut(&mut self) -> &mut SourceConfigSpec {
        if self.source.is_none() {
            self.source = Some(SourceConfigSpec::default());
        }
        self.source.as_mut().expect("source config")
    }
}

/// Sampling configuration overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SamplingConfig {
    /// Sampling interval in whole seconds; must be at least 1.
    pub rate: Option<u64>,
    /// Restrict samples to the named zone (e.g. "Normal").
    pub zone: Option<String>,
}

/// External source configuration overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceConfigSpec {
    /// Path to a buddyinfo-format file.
    pub buddyinfo_path: Option<PathBuf>,
    /// Path to the compaction sysctl file.
    pub compact_path: Option<PathBuf>,
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
