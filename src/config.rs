use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use statsd::Protocol;
use thiserror::Error;

use crate::flatten::{FlattenOptions, TagMethod};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path:?} failed, {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse yaml config failed, {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("parse json config failed, {0}")]
    Json(#[from] serde_json::Error),
    #[error("host is required")]
    EmptyHost,
    #[error("port must be in range 1..=65535")]
    InvalidPort,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AddTags {
    #[serde(default)]
    pub method: TagMethod,
}

#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Config {
    /// Address of the StatsD daemon.
    pub host: String,

    pub port: u16,

    #[serde(default)]
    pub protocol: Protocol,

    #[serde(default)]
    pub add_tags: AddTags,

    #[serde(default)]
    pub convert_booleans_to_metrics: bool,

    /// Write the flattened metrics of the latest event to this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<PathBuf>,
}

impl Config {
    pub fn generate_config() -> String {
        format!(
            r#"
# The StatsD daemon metrics are sent to.
host: 127.0.0.1
port: {}

# Transport protocol
#
# Avaiable values:
#   udp: one datagram per metric -- default
#   tcp: newline delimited metrics over a single connection
protocol: udp

addTags:
  # How tags are attached to metrics
  #
  # Avaiable values:
  #   none:    no tags -- default
  #   sibling: string fields next to the metric become its tags
  method: none

# Send boolean fields as 1/0 instead of dropping them.
convertBooleansToMetrics: false

# Dump the metrics of the latest event, with their tags, to this file.
# trace: /var/log/f5-statsd/trace.json
"#,
            statsd::DEFAULT_PORT
        )
    }

    /// Load and validate the config, `.json` files are parsed as JSON, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str::<Config>(&text)?,
            _ => serde_yaml::from_str::<Config>(&text)?,
        };
        config.validate()?;

        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config = serde_yaml::from_str::<Config>(text)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        Ok(())
    }

    pub fn flatten_options(&self) -> FlattenOptions {
        FlattenOptions {
            tag_method: self.add_tags.method,
            convert_booleans: self.convert_booleans_to_metrics,
        }
    }
}
