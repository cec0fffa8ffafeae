use jetty_core::jetty::CredentialsMap;
use url::Url;

use crate::error::{JdeError, JdeResult};

/// Credentials for authenticating to a JD Edwards AIS server.
///
/// The user sets these up by following Jetty documentation
/// and pasting their login into their connector config.
#[derive(Debug, Default, Clone)]
pub(crate) struct JdeCredentials {
    /// AIS server root, including the port (e.g. `https://ais:9300`)
    pub(crate) ais_url: String,
    pub(crate) username: String,
    pub(crate) password: String,
    /// Login environment. Empty means the server default.
    pub(crate) environment: String,
}

impl JdeCredentials {
    /// Pull the known fields out of a credentials map.
    pub(crate) fn from_map(credentials: &CredentialsMap) -> Self {
        let mut creds = JdeCredentials::default();
        for (k, v) in credentials.iter() {
            match k.as_ref() {
                "ais_url" => creds.ais_url = v.trim_end_matches('/').to_owned(),
                "username" => creds.username = v.to_owned(),
                "password" => creds.password = v.to_owned(),
                "env" => creds.environment = v.to_owned(),
                _ => (),
            }
        }
        creds
    }

    /// Perform simple field validation to catch bad input.
    pub(crate) fn validate(&self) -> JdeResult<()> {
        let mut missing = vec![];
        if self.ais_url.is_empty() {
            missing.push("ais_url");
        }
        if self.username.is_empty() {
            missing.push("username");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        if !missing.is_empty() {
            return Err(JdeError::Config(format!(
                "JD Edwards credentials missing required fields: {}. Please make sure your connectors.yaml file is correct.",
                missing.join(", ")
            )));
        }

        let url = Url::parse(&self.ais_url)
            .map_err(|e| JdeError::Config(format!("invalid ais_url {:?}: {e}", self.ais_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(JdeError::Config(format!(
                "ais_url must be an http(s) url, got {:?}",
                self.ais_url
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds_map(pairs: &[(&str, &str)]) -> CredentialsMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_creds_fail_validation() {
        let err = JdeCredentials::default().validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ais_url"));
        assert!(msg.contains("username"));
        assert!(msg.contains("password"));
    }

    #[test]
    fn env_is_optional() {
        let creds = JdeCredentials::from_map(&creds_map(&[
            ("ais_url", "https://ais.example.com:9300/"),
            ("username", "JDE"),
            ("password", "pw"),
        ]));
        creds.validate().unwrap();
        assert_eq!(creds.ais_url, "https://ais.example.com:9300");
        assert_eq!(creds.environment, "");
    }

    #[test]
    fn non_http_url_is_rejected() {
        let creds = JdeCredentials::from_map(&creds_map(&[
            ("ais_url", "ftp://ais.example.com"),
            ("username", "JDE"),
            ("password", "pw"),
            ("env", "JDV920"),
        ]));
        assert!(matches!(creds.validate(), Err(JdeError::Config(_))));
    }
}
