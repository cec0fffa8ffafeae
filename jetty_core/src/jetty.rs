//! Jetty Module
//!
//! Project configuration (`jetty_config.yaml`) and connector credentials.
use std::fs;
use std::path::{Path, PathBuf};
use std::{collections::HashMap, fmt::Display};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use yaml_peg::serde as yaml;

use crate::logging::debug;

/// The user-defined namespace corresponding to the connector.
#[derive(Clone, Deserialize, Debug, Hash, PartialEq, Eq, Default, PartialOrd, Ord, Serialize)]
pub struct ConnectorNamespace(pub String);

impl Display for ConnectorNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Struct representing the jetty_config.yaml file.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct JettyConfig {
    #[serde(default)]
    version: String,
    #[serde(default)]
    name: String,
    /// All connector configs defined.
    pub connectors: HashMap<ConnectorNamespace, ConnectorConfig>,
}

impl JettyConfig {
    /// Read the Jetty config from `path`.
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<JettyConfig> {
        let config_raw = fs::read_to_string(&path).context("Reading file")?;
        Self::from_yaml(&config_raw)
    }

    /// Parse a Jetty config from a yaml string.
    pub fn from_yaml(config_raw: &str) -> Result<JettyConfig> {
        let mut config =
            yaml::from_str::<JettyConfig>(config_raw).context("Deserializing config")?;
        config.pop().ok_or_else(|| anyhow!["empty config"])
    }

    /// Get the name
    pub fn get_name(&self) -> String {
        self.name.to_owned()
    }

    /// Look up the config for a connector namespace.
    pub fn connector(&self, namespace: &ConnectorNamespace) -> Result<&ConnectorConfig> {
        self.connectors
            .get(namespace)
            .ok_or_else(|| anyhow!["no connector named {namespace} in the jetty config"])
    }
}

/// Config for all connectors in this project.
#[derive(Clone, Deserialize, Serialize, Default, Debug)]
pub struct ConnectorConfig {
    /// The connector type
    #[serde(rename = "type")]
    pub connector_type: String,
    /// Additional configuration, specific to the connector
    #[serde(flatten)]
    pub config: HashMap<String, String>,
}

impl ConnectorConfig {
    /// Basic constructor
    pub fn new(connector_type: String, config: HashMap<String, String>) -> Self {
        Self {
            connector_type,
            config,
        }
    }
}

/// Alias for HashMap to hold credentials information.
pub type CredentialsMap = HashMap<String, String>;

/// Default location of the connector credentials file.
pub fn default_credentials_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".jetty")
        .join("connectors.yaml")
}

/// Fetch the credentials from the Jetty connectors config.
pub fn fetch_credentials<P: AsRef<Path>>(path: P) -> Result<HashMap<String, CredentialsMap>> {
    debug!("Trying to read credentials from {:?}", path.as_ref());
    let credentials_raw = fs::read_to_string(path).context("reading credentials file")?;
    let mut config = yaml::from_str::<HashMap<String, CredentialsMap>>(&credentials_raw)
        .context("deserializing credentials")?;

    config
        .pop()
        .ok_or_else(|| anyhow!["failed to generate credentials"])
}
