//! Server configuration

use isgpt_detector::{DetectorConfig, ModelConfig, ModelSource};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub host: String,

    /// Listen port
    pub port: u16,

    /// Model and tokenizer locations
    pub model: ModelConfig,

    /// Scoring and classification settings
    pub detector: DetectorConfig,
}

/// Values given on the command line or through the legacy environment
/// variables; each one replaces whatever the file and `ISGPT__*` layers set.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub model_path: Option<PathBuf>,
    pub tokenizer_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration.
    ///
    /// Layers, later ones winning: built-in defaults, the YAML file at
    /// `config_path` if it exists, `ISGPT__*` environment variables
    /// (`ISGPT__DETECTOR__STRIDE=256`), then `overrides`.
    pub fn load(config_path: impl AsRef<Path>, overrides: &Overrides) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(config_path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("ISGPT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Self = settings.try_deserialize()?;
        config.apply(overrides);
        config.detector.validate()?;

        Ok(config)
    }

    /// Apply command-line overrides
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(host) = &overrides.host {
            self.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(path) = &overrides.model_path {
            self.model.model = ModelSource::local(path);
        }
        if let Some(path) = &overrides.tokenizer_path {
            self.model.tokenizer = ModelSource::local(path);
        }
    }

    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9081,
            model: ModelConfig::default(),
            detector: DetectorConfig::default(),
        }
    }
}
