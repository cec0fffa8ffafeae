use std::time::Duration;

use jetty_core::jetty::ConnectorConfig;

use crate::consts;
use crate::error::{JdeError, JdeResult};

/// Connector settings from the project's `jetty_config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JdeConfig {
    /// Page size hint for v2 listings
    pub(crate) page_size: u32,
    /// Upper bound on any single request
    pub(crate) request_timeout: Option<Duration>,
}

impl Default for JdeConfig {
    fn default() -> Self {
        Self {
            page_size: consts::DEFAULT_PAGE_SIZE,
            request_timeout: None,
        }
    }
}

impl JdeConfig {
    pub(crate) fn from_connector_config(config: &ConnectorConfig) -> JdeResult<Self> {
        let mut jde_config = JdeConfig::default();
        if let Some(page_size) = config.config.get("page_size") {
            jde_config.page_size = match page_size.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(JdeError::Config(format!(
                        "page_size must be a positive integer, got {page_size:?}"
                    )))
                }
            };
        }
        if let Some(timeout) = config.config.get("request_timeout_secs") {
            let secs = timeout.parse::<u64>().map_err(|_| {
                JdeError::Config(format!(
                    "request_timeout_secs must be a number of seconds, got {timeout:?}"
                ))
            })?;
            jde_config.request_timeout = Some(Duration::from_secs(secs));
        }
        Ok(jde_config)
    }

    /// The http client shared by every request the connector makes.
    pub(crate) fn http_client(&self) -> JdeResult<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| JdeError::Config(format!("unable to build http client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn connector_config(pairs: &[(&str, &str)]) -> ConnectorConfig {
        ConnectorConfig::new(
            "jde".to_owned(),
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn defaults_to_pages_of_100() {
        let config = JdeConfig::from_connector_config(&connector_config(&[])).unwrap();
        assert_eq!(config, JdeConfig::default());
        assert_eq!(config.page_size, 100);
    }

    #[test]
    fn reads_page_size_and_timeout() {
        let config = JdeConfig::from_connector_config(&connector_config(&[
            ("page_size", "25"),
            ("request_timeout_secs", "30"),
        ]))
        .unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let res = JdeConfig::from_connector_config(&connector_config(&[("page_size", "0")]));
        assert!(matches!(res, Err(JdeError::Config(_))));
    }
}
