use std::collections::HashMap;

use jetty_core::{
    connectors::{nodes::RawGrant, nodes::ResourceId, ConnectorClient},
    jetty::{ConnectorConfig, CredentialsMap},
    Connector,
};
use jetty_jde::{JdeConnector, JdeError, ProtocolVersion};

use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A mock AIS server. Mounts the config and login endpoints for one
/// protocol version; table responses are mounted per test.
/// Logins are answered with `token`.
struct MockAis {
    server: MockServer,
    root: &'static str,
}

impl MockAis {
    async fn start(protocol: ProtocolVersion, capabilities: &[&str], token: &str) -> Self {
        let server = MockServer::start().await;
        let root = match protocol {
            ProtocolVersion::V1 => "/jderest",
            ProtocolVersion::V2 => "/jderest/v2",
        };
        if protocol == ProtocolVersion::V1 {
            Mock::given(method("POST"))
                .and(path("/jderest/v2/defaultconfig"))
                .respond_with(ResponseTemplate::new(404))
                .named("missing v2 config")
                .mount(&server)
                .await;
        }
        Mock::given(method("POST"))
            .and(path(format!("{root}/defaultconfig")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "aisVersion": "9.2.6.3",
                "defaultEnvironment": "JDV920",
                "capabilityList": capabilities
                    .iter()
                    .map(|c| json!({"name": c}))
                    .collect::<Vec<_>>(),
                "requiredCapabilityMissing": false,
            })))
            .named("default config")
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("{root}/tokenrequest")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "environment": "JDV920",
                "userInfo": {"token": token}
            })))
            .named("login")
            .mount(&server)
            .await;

        MockAis { server, root }
    }

    /// Serve `pages` of `table` in order, chaining them with next links.
    async fn mount_table(&self, table: &str, filter: Option<&str>, pages: Vec<Vec<Value>>) {
        let page_count = pages.len();
        for (i, rows) in pages.into_iter().enumerate() {
            let more = i + 1 < page_count;
            let links = if more {
                vec![json!({
                    "rel": "next",
                    "href": format!(
                        "{}/jderest/v2/dataservice/next/{table}?page={}",
                        self.server.uri(),
                        i + 1
                    )
                })]
            } else {
                vec![]
            };
            let body = json!({
                format!("fs_DATABROWSE_{table}"): {
                    "data": {"gridData": {
                        "rowset": rows,
                        "summary": {"records": rows.len(), "moreRecords": more}
                    }}
                },
                "links": links,
            });

            let mock = if i == 0 {
                let mock = Mock::given(method("POST"))
                    .and(path(format!("{}/dataservice", self.root)))
                    .and(body_string_contains(format!("\"targetName\":\"{table}\"")));
                match filter {
                    Some(value) => {
                        mock.and(body_string_contains(format!("\"content\":\"{value}\"")))
                    }
                    None => mock,
                }
            } else {
                Mock::given(method("POST"))
                    .and(path(format!("/jderest/v2/dataservice/next/{table}")))
                    .and(query_param("page", i.to_string()))
            };
            mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
                .expect(1)
                .named(format!("{table} page {i}"))
                .mount(&self.server)
                .await;
        }
    }

    fn credentials(&self) -> CredentialsMap {
        HashMap::from([
            ("ais_url".to_owned(), self.server.uri()),
            ("username".to_owned(), "JDE".to_owned()),
            ("password".to_owned(), "secret".to_owned()),
        ])
    }
}

fn config(page_size: Option<&str>) -> ConnectorConfig {
    let mut config = HashMap::new();
    if let Some(size) = page_size {
        config.insert("page_size".to_owned(), size.to_owned());
    }
    ConnectorConfig::new("jde".to_owned(), config)
}

fn user(id: &str) -> Value {
    json!({"F0092_USER": id, "F0092_UGRP": ""})
}

fn jde_error(err: &anyhow::Error) -> &JdeError {
    err.downcast_ref::<JdeError>()
        .unwrap_or_else(|| panic!("not a JdeError: {err:?}"))
}

#[tokio::test]
async fn v2_connector_syncs_users_and_roles() -> anyhow::Result<()> {
    let ais = MockAis::start(ProtocolVersion::V2, &["dataservice", "validate"], "session-token").await;
    ais.mount_table(
        "F0092",
        None,
        vec![vec![user("JDOE"), user("ASMITH")], vec![user("BLEE")]],
    )
    .await;
    ais.mount_table(
        "F00926",
        None,
        vec![vec![json!({"F00926_USER": "ADMIN", "F00926_ROLEDESC": "Administrators"})]],
    )
    .await;
    ais.mount_table(
        "F95921",
        Some("ADMIN"),
        vec![
            vec![json!({"F95921_FRROLE": "ADMIN", "F95921_TOROLE": "JDOE"})],
            vec![json!({"F95921_FRROLE": "ADMIN", "F95921_TOROLE": "BLEE"})],
        ],
    )
    .await;

    let mut connector =
        JdeConnector::new(&config(Some("2")), &ais.credentials(), Some(ConnectorClient::Test))
            .await?;
    assert_eq!(connector.client().protocol(), ProtocolVersion::V2);
    assert_eq!(connector.client().session().environment(), "JDV920");
    assert_eq!(connector.metadata().display_name, "JD Edwards Connector");

    let data = connector.get_data().await?;

    let mut users: Vec<_> = data
        .resources_of_type("user")
        .map(|r| r.display_name.as_str())
        .collect();
    users.sort();
    assert_eq!(users, vec!["ASMITH", "BLEE", "JDOE"]);
    assert_eq!(data.resources_of_type("role").count(), 1);
    assert_eq!(data.entitlements[0].id(), "role:ADMIN:member");
    assert_eq!(
        data.grants,
        vec![
            RawGrant::new(
                &ResourceId::new("role", "ADMIN"),
                "member",
                ResourceId::new("user", "JDOE")
            ),
            RawGrant::new(
                &ResourceId::new("role", "ADMIN"),
                "member",
                ResourceId::new("user", "BLEE")
            ),
        ]
    );

    let requests = ais.server.received_requests().await.unwrap();
    let first_browse = requests
        .iter()
        .find(|r| r.url.path() == "/jderest/v2/dataservice")
        .unwrap();
    let body: Value = serde_json::from_slice(&first_browse.body)?;
    assert_eq!(body["maxPageSize"], "2");
    assert_eq!(body["enableNextPageProcessing"], "true");
    Ok(())
}

#[tokio::test]
async fn v1_connector_reads_everything_in_one_page() -> anyhow::Result<()> {
    let ais = MockAis::start(ProtocolVersion::V1, &["dataservice"], "session-token").await;
    ais.mount_table("F0092", None, vec![vec![user("JDOE")]]).await;
    ais.mount_table("F00926", None, vec![vec![]]).await;

    let mut connector =
        JdeConnector::new(&config(None), &ais.credentials(), Some(ConnectorClient::Test)).await?;
    assert_eq!(connector.client().protocol(), ProtocolVersion::V1);

    let data = connector.get_data().await?;
    assert_eq!(data.resources_of_type("user").count(), 1);
    assert!(data.grants.is_empty());

    let requests = ais.server.received_requests().await.unwrap();
    for browse in requests
        .iter()
        .filter(|r| r.url.path() == "/jderest/dataservice")
    {
        let body: Value = serde_json::from_slice(&browse.body)?;
        assert_eq!(body["maxPageSize"], "No Max");
        assert_eq!(body["enableNextPageProcessing"], "false");
    }
    Ok(())
}

#[tokio::test]
async fn check_validates_the_session() -> anyhow::Result<()> {
    let ais = MockAis::start(ProtocolVersion::V2, &["dataservice", "validate"], "session-token").await;
    Mock::given(method("POST"))
        .and(path("/jderest/v2/tokenrequest/validate"))
        .and(body_string_contains("session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"isValidSession": true})))
        .expect(1)
        .mount(&ais.server)
        .await;

    let connector =
        JdeConnector::new(&config(None), &ais.credentials(), Some(ConnectorClient::Test)).await?;
    connector.check().await
}

#[tokio::test]
async fn check_reports_an_expired_session() -> anyhow::Result<()> {
    let ais = MockAis::start(ProtocolVersion::V2, &["dataservice", "validate"], "session-token").await;
    Mock::given(method("POST"))
        .and(path("/jderest/v2/tokenrequest/validate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"isValidSession": false, "message": "Session expired"})),
        )
        .mount(&ais.server)
        .await;

    let connector =
        JdeConnector::new(&config(None), &ais.credentials(), Some(ConnectorClient::Test)).await?;
    let err = connector.check().await.unwrap_err();

    assert!(matches!(jde_error(&err), JdeError::ValidationFailure(_)));
    Ok(())
}

#[tokio::test]
async fn missing_capabilities_stop_startup() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jderest/v2/defaultconfig"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"requiredCapabilityMissing": true})),
        )
        .mount(&server)
        .await;
    let credentials = HashMap::from([
        ("ais_url".to_owned(), server.uri()),
        ("username".to_owned(), "JDE".to_owned()),
        ("password".to_owned(), "secret".to_owned()),
    ]);

    let err = JdeConnector::new(&config(None), &credentials, Some(ConnectorClient::Test))
        .await
        .err()
        .unwrap();

    assert!(matches!(jde_error(&err), JdeError::CapabilityMissing));
    assert!(format!("{err:#}").contains("capabilities missing"));
}

#[tokio::test]
async fn bad_credentials_stop_startup() {
    // AIS answers a refused login with a 200 and an empty token
    let ais = MockAis::start(ProtocolVersion::V2, &["dataservice"], "").await;

    let err = JdeConnector::new(&config(None), &ais.credentials(), Some(ConnectorClient::Test))
        .await
        .err()
        .unwrap();

    assert!(matches!(jde_error(&err), JdeError::AuthFailure));
}

#[tokio::test]
async fn forbidden_login_stops_startup_as_bad_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jderest/v2/defaultconfig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "capabilityList": [{"name": "dataservice"}],
            "requiredCapabilityMissing": false,
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/jderest/v2/tokenrequest"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "Authorization Failure: invalid user name or password"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let credentials = HashMap::from([
        ("ais_url".to_owned(), server.uri()),
        ("username".to_owned(), "JDE".to_owned()),
        ("password".to_owned(), "wrong".to_owned()),
    ]);

    let err = JdeConnector::new(&config(None), &credentials, Some(ConnectorClient::Test))
        .await
        .err()
        .unwrap();

    let jde_err = jde_error(&err);
    assert!(matches!(jde_err, JdeError::AuthFailure));
    assert!(!jde_err.is_retryable());
    assert!(format!("{err:#}").contains("credentials"));
    assert!(!format!("{err:#}").contains("unable to reach"));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);
    let credentials = HashMap::from([
        ("ais_url".to_owned(), uri),
        ("username".to_owned(), "JDE".to_owned()),
        ("password".to_owned(), "secret".to_owned()),
    ]);

    let err = JdeConnector::new(&config(None), &credentials, Some(ConnectorClient::Test))
        .await
        .err()
        .unwrap();

    assert!(matches!(jde_error(&err), JdeError::Transport(_)));
}

#[tokio::test]
async fn missing_credentials_are_reported_before_any_request() {
    let credentials = HashMap::from([("username".to_owned(), "JDE".to_owned())]);

    let err = JdeConnector::new(&config(None), &credentials, Some(ConnectorClient::Test))
        .await
        .err()
        .unwrap();

    let JdeError::Config(msg) = jde_error(&err) else {
        panic!("expected a config error, got {err:?}");
    };
    assert!(msg.contains("ais_url"));
    assert!(msg.contains("password"));
}
