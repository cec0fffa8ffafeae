//! JD Edwards Connector
//!
//! Everything needed for connection and interaction with a JD Edwards
//! EnterpriseOne AIS server: version probing, login, token validation, and
//! paginated table browsing over both the v1 and v2 AIS protocols.
//!
//! ```no_run
//! use jetty_core::connectors::{Connector, ConnectorClient};
//! use jetty_core::jetty::{ConnectorConfig, CredentialsMap};
//! use jetty_jde::JdeConnector;
//!
//! # async fn connect() -> anyhow::Result<()> {
//! let config = ConnectorConfig::new("jde".to_owned(), Default::default());
//! let credentials = CredentialsMap::from([
//!     ("ais_url".to_owned(), "https://ais.example.com:9300".to_owned()),
//!     ("username".to_owned(), "JDE".to_owned()),
//!     ("password".to_owned(), "secret".to_owned()),
//! ]);
//! let mut jde = JdeConnector::new(&config, &credentials, Some(ConnectorClient::Core)).await?;
//! jde.check().await?;
//! let data = jde.get_data().await?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod browse;
mod capabilities;
mod config;
mod consts;
mod creds;
mod error;
mod nodes;
mod protocol;
mod rest;

pub use auth::Session;
pub use browse::*;
pub use capabilities::ServerCapabilities;
pub use error::{JdeError, JdeResult};
pub use protocol::ProtocolVersion;
pub use rest::JdeRestClient;

use anyhow::{Context, Result};
use async_trait::async_trait;
use jetty_core::{
    connectors::{nodes::ConnectorData, ConnectorClient, ConnectorMetadata},
    jetty::{ConnectorConfig, CredentialsMap},
    log_runtime,
    logging::{debug, info},
    Connector,
};

use config::JdeConfig;
use creds::JdeCredentials;
use nodes::RoleMembers;

/// The main JD Edwards Connector struct.
///
/// Use this connector to read users and roles out of EnterpriseOne.
pub struct JdeConnector {
    client: JdeRestClient,
    capabilities: ServerCapabilities,
    config: JdeConfig,
    #[allow(dead_code)]
    connector_client: ConnectorClient,
}

#[async_trait]
impl Connector for JdeConnector {
    /// Validates the configs and bootstraps an AIS session.
    ///
    /// Checks that the fields needed to log in are present, probes the
    /// server for its protocol version and capabilities, and logs in.
    async fn new(
        config: &ConnectorConfig,
        credentials: &CredentialsMap,
        connector_client: Option<ConnectorClient>,
    ) -> Result<Box<Self>> {
        let creds = JdeCredentials::from_map(credentials);
        creds.validate()?;
        let config = JdeConfig::from_connector_config(config)?;
        let http_client = config.http_client()?;

        let (capabilities, protocol) = capabilities::probe(&http_client, &creds.ais_url)
            .await
            .with_context(|| format!("probing AIS server at {}", creds.ais_url))?;
        info!(
            "AIS server at {} speaks {protocol} (version {:?})",
            creds.ais_url,
            capabilities.ais_version()
        );

        let session = auth::authenticate(&http_client, &creds, protocol)
            .await
            .with_context(|| format!("logging into AIS as {}", creds.username))?;

        Ok(Box::new(JdeConnector {
            client: JdeRestClient::new(http_client, creds.ais_url, session),
            capabilities,
            config,
            connector_client: connector_client.unwrap_or(ConnectorClient::Core),
        }))
    }

    async fn check(&self) -> Result<()> {
        let (capabilities, protocol) = self
            .client
            .probe()
            .await
            .context("re-reading AIS server config")?;
        if protocol != self.client.protocol() {
            debug!(
                "server now answers {protocol}, session was opened with {}",
                self.client.protocol()
            );
        }
        self.client
            .validate_token(&capabilities)
            .await
            .context("validating AIS session")
    }

    async fn get_data(&mut self) -> Result<ConnectorData> {
        let page_size = self.config.page_size;

        let users = log_runtime!(
            "fetching JDE users",
            self.client
                .fetch_all(&UsersTable, page_size)
                .await
                .context("failed to get users")?
        );
        let roles = log_runtime!(
            "fetching JDE roles",
            self.client
                .fetch_all(&RolesTable, page_size)
                .await
                .context("failed to get roles")?
        );

        let mut role_members = Vec::with_capacity(roles.len());
        for role in roles {
            let members = self
                .client
                .fetch_all(&RoleUsersTable::new(&role.role_id), page_size)
                .await
                .with_context(|| format!("failed to get users of role {}", role.role_id))?;
            role_members.push(RoleMembers { role, members });
        }
        info!(
            "fetched {} users and {} roles from JD Edwards",
            users.len(),
            role_members.len()
        );

        Ok(nodes::connector_data(&users, &role_members))
    }

    fn metadata(&self) -> ConnectorMetadata {
        ConnectorMetadata {
            display_name: "JD Edwards Connector".to_owned(),
            description: "Connector syncing users and roles from JD Edwards EnterpriseOne."
                .to_owned(),
        }
    }
}

impl JdeConnector {
    /// The authenticated AIS client, for browsing tables directly.
    pub fn client(&self) -> &JdeRestClient {
        &self.client
    }

    /// Capabilities reported when the connector started.
    pub fn capabilities(&self) -> &ServerCapabilities {
        &self.capabilities
    }
}
