//! Connector traits and the types connectors hand back to Jetty.
//!

pub mod nodes;

use anyhow::Result;
use async_trait::async_trait;

use crate::jetty::{ConnectorConfig, CredentialsMap};

/// Client using the connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorClient {
    /// Tests
    Test,
    /// Jetty Core
    Core,
    /// Other
    Other,
}

/// Descriptive information a connector reports about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorMetadata {
    /// Human-readable connector name
    pub display_name: String,
    /// What the connector syncs
    pub description: String,
}

/// The trait all connectors are expected to implement.
#[async_trait]
pub trait Connector {
    /// Instantiate a Connector from configuration.
    ///
    /// Connectors are expected to establish (and authenticate) their
    /// connection here, failing fast on bad configuration.
    async fn new(
        config: &ConnectorConfig,
        credentials: &CredentialsMap,
        client: Option<ConnectorClient>,
    ) -> Result<Box<Self>>;
    /// Check that the Connector is properly set up. The returned error
    /// should tell the user what to fix.
    async fn check(&self) -> Result<()>;
    /// Get all of the data from the connector.
    async fn get_data(&mut self) -> Result<nodes::ConnectorData>;
    /// Describe the connector.
    fn metadata(&self) -> ConnectorMetadata;
}
