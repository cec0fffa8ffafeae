//! Server capability and protocol version probing.

use std::collections::BTreeSet;

use jetty_core::logging::{debug, warn};

use crate::consts;
use crate::error::{JdeError, JdeResult};
use crate::protocol::ProtocolVersion;
use crate::rest::models::ConfigResponse;
use crate::rest::{self, FetchJson};

/// What the AIS server says it can do.
///
/// Only built from a config response that reports every required
/// capability; a server missing some yields [`JdeError::CapabilityMissing`]
/// instead. `required_capabilities_present` is therefore always true on a
/// probed value and false only on `ServerCapabilities::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerCapabilities {
    available: BTreeSet<String>,
    required_capabilities_present: bool,
    ais_version: String,
    default_environment: String,
}

impl ServerCapabilities {
    /// Whether the server lists the named capability.
    pub fn has(&self, capability: &str) -> bool {
        self.available.contains(capability)
    }

    /// Whether the dedicated token validation endpoint can be used.
    pub fn can_validate_token(&self) -> bool {
        self.has(consts::VALIDATE_CAPABILITY)
    }

    /// Whether everything the connector needs is configured. Always true
    /// once probing succeeded.
    pub fn required_capabilities_present(&self) -> bool {
        self.required_capabilities_present
    }

    /// AIS version reported by the server, if any.
    pub fn ais_version(&self) -> &str {
        &self.ais_version
    }

    /// The environment logins land in when none is requested.
    pub fn default_environment(&self) -> &str {
        &self.default_environment
    }

    #[cfg(test)]
    pub(crate) fn with_capabilities(names: &[&str]) -> Self {
        ServerCapabilities {
            available: names.iter().map(|n| n.to_string()).collect(),
            required_capabilities_present: true,
            ..Default::default()
        }
    }

    fn from_config(config: ConfigResponse) -> JdeResult<Self> {
        if config.required_capability_missing {
            return Err(JdeError::CapabilityMissing);
        }
        Ok(ServerCapabilities {
            available: config
                .capability_list
                .into_iter()
                .map(|c| c.name)
                .collect(),
            required_capabilities_present: true,
            ais_version: config.ais_version,
            default_environment: config.default_environment,
        })
    }
}

/// Figure out which protocol version the server speaks and what it can do.
///
/// v2 is always tried first. v1 is only tried when the v2 call fails at
/// the transport level (unreachable, error status, or garbage body). A v2
/// server reporting missing capabilities is a configuration problem and
/// is returned as-is.
pub(crate) async fn probe(
    http_client: &reqwest::Client,
    ais_url: &str,
) -> JdeResult<(ServerCapabilities, ProtocolVersion)> {
    let protocol = match fetch_config(http_client, ais_url, ProtocolVersion::V2).await {
        Ok(config) => {
            return ServerCapabilities::from_config(config).map(|c| (c, ProtocolVersion::V2))
        }
        Err(e) if e.is_retryable() => {
            warn!("v2 default config unavailable, falling back to v1: {e}");
            ProtocolVersion::V1
        }
        Err(e) => return Err(e),
    };

    let config = fetch_config(http_client, ais_url, protocol).await?;
    ServerCapabilities::from_config(config).map(|c| (c, protocol))
}

async fn fetch_config(
    http_client: &reqwest::Client,
    ais_url: &str,
    protocol: ProtocolVersion,
) -> JdeResult<ConfigResponse> {
    let config: ConfigResponse =
        rest::unauthenticated(http_client, protocol.endpoint(ais_url, consts::DEFAULT_CONFIG))
            .query(&protocol.config_query())
            .fetch_json()
            .await?;
    debug!(
        "AIS {protocol} config: version {:?}, default environment {:?}, {} capabilities",
        config.ais_version,
        config.default_environment,
        config.capability_list.len()
    );
    Ok(config)
}
