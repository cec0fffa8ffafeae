//! JdeRestClient and generic utilities to help with AIS API requests

pub(crate) mod models;

use async_trait::async_trait;
use jetty_core::logging::{debug, error};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::Session;
use crate::browse::{Cursor, UsersTable};
use crate::capabilities::{self, ServerCapabilities};
use crate::consts;
use crate::error::{JdeError, JdeResult};
use crate::protocol::ProtocolVersion;
use models::{ValidateRequest, ValidateResponse};

/// Wrapper struct for http functionality against an authenticated session.
///
/// The session and the underlying connection pool are shared by every
/// call; nothing here changes after construction.
pub struct JdeRestClient {
    http_client: reqwest::Client,
    /// AIS server root, without a trailing slash
    ais_url: String,
    session: Session,
}

impl JdeRestClient {
    pub(crate) fn new(http_client: reqwest::Client, ais_url: String, session: Session) -> Self {
        Self {
            http_client,
            ais_url,
            session,
        }
    }

    /// The session this client authenticates with.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The protocol version picked at startup.
    pub fn protocol(&self) -> ProtocolVersion {
        self.session.protocol
    }

    /// Re-read the server's capabilities.
    pub async fn probe(&self) -> JdeResult<(ServerCapabilities, ProtocolVersion)> {
        capabilities::probe(&self.http_client, &self.ais_url).await
    }

    /// Builds an authenticated POST to an AIS endpoint
    pub(crate) fn build_request<B: Serialize>(&self, endpoint: &str, body: &B) -> RequestBuilder {
        let request_url = self.session.protocol.endpoint(&self.ais_url, endpoint);
        self.add_auth(self.http_client.post(request_url)).json(body)
    }

    /// Builds an authenticated POST to a server-issued continuation link.
    /// The link is used exactly as given.
    pub(crate) fn build_follow_request(&self, cursor: &Cursor) -> JdeResult<RequestBuilder> {
        let request_url = reqwest::Url::parse(cursor.as_str()).map_err(|e| {
            JdeError::ProtocolViolation(format!("invalid continuation link {cursor}: {e}"))
        })?;
        Ok(self.add_auth(self.http_client.post(request_url)))
    }

    /// Add authentication header to requests
    fn add_auth(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(consts::AUTH_HEADER, self.session.token.as_str())
            .header(consts::ACCEPT_HEADER, consts::APPLICATION_JSON)
    }

    /// Make sure the session token is still good.
    ///
    /// v2 servers with the validate capability have a dedicated endpoint.
    /// It answers 200 even for bad tokens, so the body's `message` is what
    /// decides. Everyone else gets a one-row users browse instead.
    pub async fn validate_token(&self, capabilities: &ServerCapabilities) -> JdeResult<()> {
        if self.protocol().supports_token_validation() && capabilities.can_validate_token() {
            let res: ValidateResponse = self
                .build_request(
                    consts::TOKEN_VALIDATE,
                    &ValidateRequest {
                        token: &self.session.token,
                    },
                )
                .fetch_json()
                .await?;

            if !res.message.is_empty() {
                return Err(JdeError::ValidationFailure(res.message));
            }
            debug!("token validated, valid session: {}", res.is_valid_session);
            return Ok(());
        }

        debug!("validating token with a users browse");
        self.browse_page(&UsersTable, 1, false)
            .await
            .map(|_| ())
            .map_err(|e| JdeError::ValidationFailure(e.to_string()))
    }
}

/// Builds a request that doesn't need a session (login and config).
pub(crate) fn unauthenticated(http_client: &reqwest::Client, request_url: String) -> RequestBuilder {
    http_client
        .post(request_url)
        .header(consts::ACCEPT_HEADER, consts::APPLICATION_JSON)
        .header(consts::CONTENT_TYPE_HEADER, consts::APPLICATION_JSON)
}

#[async_trait]
pub(crate) trait FetchJson {
    /// Send the request and decode the JSON body.
    ///
    /// Connection failures and error statuses come back as
    /// [`JdeError::Transport`], bodies that aren't the expected JSON as
    /// [`JdeError::Decode`].
    async fn fetch_json<T: DeserializeOwned + Send>(self) -> JdeResult<T>;
}

#[async_trait]
impl FetchJson for RequestBuilder {
    async fn fetch_json<T: DeserializeOwned + Send>(self) -> JdeResult<T> {
        // Build a copy of the request so that we can describe it in the case of an error
        let request = match self.try_clone().map(|r| r.build()) {
            Some(Ok(built_req)) => format!("({} {})", built_req.method(), built_req.url()),
            _ => "".to_owned(),
        };

        let resp = self
            .send()
            .await
            .map_err(|e| {
                error!("error with request {request}: {e}");
                e
            })?
            .error_for_status()
            .map_err(|e| {
                error!("error with request - bad response {request}: {e}");
                e
            })?;

        resp.decode_json().await
    }
}

#[async_trait]
pub(crate) trait DecodeJson {
    /// Read the body and decode it as JSON. A body that isn't the expected
    /// JSON is a [`JdeError::Decode`].
    async fn decode_json<T: DeserializeOwned + Send>(self) -> JdeResult<T>;
}

#[async_trait]
impl DecodeJson for reqwest::Response {
    async fn decode_json<T: DeserializeOwned + Send>(self) -> JdeResult<T> {
        let url = self.url().to_owned();
        let body = self.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            error!("error parsing json response from {url}: {e}");
            JdeError::decode("parsing json response", e)
        })
    }
}
