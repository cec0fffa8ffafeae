//! Login against the AIS token endpoint.

use jetty_core::logging::{info, warn};
use reqwest::StatusCode;

use crate::consts;
use crate::creds::JdeCredentials;
use crate::error::{JdeError, JdeResult};
use crate::protocol::ProtocolVersion;
use crate::rest::models::{AuthRequest, AuthResponse};
use crate::rest::{self, DecodeJson};

/// An authenticated AIS session. Created once at startup and never
/// modified afterward.
#[derive(Clone)]
pub struct Session {
    pub(crate) token: String,
    pub(crate) environment: String,
    pub(crate) protocol: ProtocolVersion,
}

impl Session {
    /// The environment the session is logged into. Empty if the server
    /// didn't say and none was requested.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// The protocol version the session speaks.
    pub fn protocol(&self) -> ProtocolVersion {
        self.protocol
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("environment", &self.environment)
            .field("protocol", &self.protocol)
            .finish()
    }
}

/// Exchange the user's login for a session token.
///
/// A 401/403, or a 200 response without a token, means the server refused
/// the credentials or environment, and is reported as
/// [`JdeError::AuthFailure`].
pub(crate) async fn authenticate(
    http_client: &reqwest::Client,
    credentials: &JdeCredentials,
    protocol: ProtocolVersion,
) -> JdeResult<Session> {
    let body = AuthRequest {
        username: &credentials.username,
        password: &credentials.password,
        environment: (!credentials.environment.is_empty())
            .then_some(credentials.environment.as_str()),
    };

    let resp = rest::unauthenticated(
        http_client,
        protocol.endpoint(&credentials.ais_url, consts::TOKEN_REQUEST),
    )
    .json(&body)
    .send()
    .await?;

    // AIS refuses bad logins with 401/403 and a JSON message
    if matches!(
        resp.status(),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
    ) {
        warn!(
            "AIS refused login for {} ({})",
            credentials.username,
            resp.status()
        );
        return Err(JdeError::AuthFailure);
    }
    let res: AuthResponse = resp.error_for_status()?.decode_json().await?;

    if res.user_info.token.is_empty() {
        return Err(JdeError::AuthFailure);
    }

    let environment = if res.environment.is_empty() {
        credentials.environment.to_owned()
    } else {
        res.environment
    };
    info!(
        "logged into AIS ({protocol}) as {} in environment {:?}, apps release {:?}",
        credentials.username, environment, res.user_info.apps_release
    );

    Ok(Session {
        token: res.user_info.token,
        environment,
        protocol,
    })
}
