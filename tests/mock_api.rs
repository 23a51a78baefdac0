#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};
use zbx_api::error::{AuthError, Error, ProtocolError, TransportError};
use zbx_api::host::Host;
use zbx_api::{Result, ZbxClient};

/// Responder that echoes the request id back, the way a real server
/// does, so id-echo enforcement holds across sequential calls.
struct EchoRpc {
    body: Value,
}

impl Respond for EchoRpc {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let decoded: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let id = decoded.get("id").cloned().unwrap_or(Value::Null);
        let mut body = self.body.clone();
        body["jsonrpc"] = json!("2.0");
        body["id"] = id;
        ResponseTemplate::new(200).set_body_json(body)
    }
}

fn rpc_result(result: Value) -> EchoRpc {
    EchoRpc {
        body: json!({ "result": result }),
    }
}

fn rpc_error(code: i64, message: &str) -> EchoRpc {
    EchoRpc {
        body: json!({ "error": { "code": code, "message": message, "data": "params" } }),
    }
}

fn client(server: &MockServer) -> ZbxClient {
    ZbxClient::builder(Url::parse(&server.uri()).expect("valid mock url"))
        .timeout(Duration::from_secs(2))
        .connect_timeout(Duration::from_secs(1))
        .insecure_http(true)
        .build()
        .expect("client")
}

fn authed_client(server: &MockServer) -> ZbxClient {
    ZbxClient::builder(Url::parse(&server.uri()).expect("valid mock url"))
        .timeout(Duration::from_secs(2))
        .connect_timeout(Duration::from_secs(1))
        .insecure_http(true)
        .token(SecretString::from("token"))
        .build()
        .expect("client")
}

async fn request_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .expect("requests")
        .iter()
        .map(|request| serde_json::from_slice(&request.body).expect("json body"))
        .collect()
}

#[tokio::test]
async fn login_attaches_the_token_to_subsequent_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("user.login"))
        .respond_with(rpc_result(json!("0424bd59b807674191e7d77572075f33")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([])))
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(!client.is_authenticated());

    let token = client.login("Admin", "zabbix").await.expect("login");
    assert_eq!(token.expose_secret(), "0424bd59b807674191e7d77572075f33");
    assert!(client.is_authenticated());

    client.hosts(json!({})).await.expect("hosts");

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 2);

    assert_eq!(bodies[0]["method"], "user.login");
    assert_eq!(bodies[0]["id"], 1);
    assert_eq!(bodies[0]["params"]["user"], "Admin");
    assert!(bodies[0].get("auth").is_none(), "login must not carry auth");

    assert_eq!(bodies[1]["method"], "host.get");
    assert_eq!(bodies[1]["id"], 2);
    assert_eq!(bodies[1]["auth"], "0424bd59b807674191e7d77572075f33");
    assert_eq!(bodies[1]["params"]["output"], "extend");
}

#[tokio::test]
async fn request_ids_strictly_increase_across_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_error(-32602, "Invalid params."))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([])))
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let err = client.hosts(json!({})).await.expect_err("should fail");
    assert_eq!(err.api_code(), Some(-32602));
    client.hosts(json!({})).await.expect("hosts");

    let bodies = request_bodies(&server).await;
    let ids: Vec<Value> = bodies.iter().map(|body| body["id"].clone()).collect();
    assert_eq!(ids, vec![json!(1), json!(2)], "no id reuse after errors");
}

#[tokio::test]
async fn login_rejection_surfaces_as_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_error(-32602, "Login name or password is incorrect."))
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client.login("Admin", "wrong").await.expect_err("should fail");
    match err {
        Error::Auth(AuthError::Rejected { source }) => {
            assert_eq!(source.code, -32602);
            assert!(source.message.contains("incorrect"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn api_error_details_surface_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_error(-32500, "Application error."))
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let err = client.hosts(json!({})).await.expect_err("should fail");
    match err {
        Error::Api(api) => {
            assert_eq!(api.code, -32500);
            assert_eq!(api.message, "Application error.");
            assert_eq!(api.data.as_deref(), Some("params"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn get_by_id_round_trips_a_single_record() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([
            { "triggerid": "123", "description": "d", "expression": "e" }
        ])))
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let trigger = client.trigger_by_id("123").await.expect("trigger");
    assert_eq!(trigger.trigger_id, "123");
    assert_eq!(trigger.description, "d");
    assert_eq!(trigger.expression, "e");

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies[0]["method"], "trigger.get");
    assert_eq!(bodies[0]["params"]["triggerids"], "123");
    assert_eq!(bodies[0]["params"]["output"], "extend");
    assert_eq!(bodies[0]["params"]["selectHosts"], "extend");
}

#[tokio::test]
async fn get_by_id_rejects_zero_and_multiple_matches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([
            { "triggerid": "1", "description": "a", "expression": "x" },
            { "triggerid": "2", "description": "b", "expression": "y" }
        ])))
        .mount(&server)
        .await;

    let client = authed_client(&server);

    let err = client.trigger_by_id("123").await.expect_err("empty result");
    assert!(matches!(err, Error::ExpectedOneResult { got: 0 }));

    let err = client.trigger_by_id("123").await.expect_err("ambiguous result");
    assert!(matches!(err, Error::ExpectedOneResult { got: 2 }));
}

#[tokio::test]
async fn create_assigns_generated_ids_positionally() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("host.create"))
        .respond_with(rpc_result(json!({ "hostids": ["10", "11", "12"] })))
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let mut hosts = vec![
        Host { host: "a".to_string(), ..Host::default() },
        Host { host: "b".to_string(), ..Host::default() },
        Host { host: "c".to_string(), ..Host::default() },
    ];
    client.create_hosts(&mut hosts).await.expect("create");
    assert_eq!(hosts[0].host_id, "10");
    assert_eq!(hosts[1].host_id, "11");
    assert_eq!(hosts[2].host_id, "12");

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies[0]["params"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn create_fails_on_short_id_array() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!({ "hostids": ["10", "11"] })))
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let mut hosts = vec![Host::default(), Host::default(), Host::default()];
    let err = client.create_hosts(&mut hosts).await.expect_err("should fail");
    match err {
        Error::CountMismatch { expected, got } => assert_eq!((expected, got), (3, 2)),
        other => panic!("unexpected error: {other}"),
    }
    assert!(hosts.iter().all(|host| host.host_id.is_empty()));
}

#[tokio::test]
async fn delete_clears_ids_on_the_submitted_records() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!({ "hostids": ["10", "11"] })))
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let mut hosts = vec![
        Host { host_id: "10".to_string(), ..Host::default() },
        Host { host_id: "11".to_string(), ..Host::default() },
    ];
    client.delete_hosts(&mut hosts).await.expect("delete");
    assert!(hosts.iter().all(|host| host.host_id.is_empty()));
}

#[tokio::test]
async fn legacy_delete_shape_falls_back_on_server_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_error(-32500, "Application error."))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!({ "hostids": ["10"] })))
        .mount(&server)
        .await;

    let client = authed_client(&server);
    client
        .delete_hosts_by_ids(&["10".to_string()])
        .await
        .expect("delete with fallback");

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 2, "exactly one re-issue, no retry loop");
    assert_eq!(bodies[0]["params"], json!([{ "hostid": "10" }]));
    assert_eq!(bodies[1]["params"], json!(["10"]));
    assert_eq!(bodies[0]["id"], 1);
    assert_eq!(bodies[1]["id"], 2);
}

#[tokio::test]
async fn timeouts_surface_as_transport_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "jsonrpc": "2.0", "result": [], "id": 1 }))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let client = ZbxClient::builder(Url::parse(&server.uri()).expect("valid mock url"))
        .timeout(Duration::from_millis(300))
        .connect_timeout(Duration::from_millis(200))
        .insecure_http(true)
        .build()
        .expect("client");

    let err = client.hosts(json!({})).await.expect_err("should time out");
    assert!(matches!(
        err,
        Error::Transport(TransportError::Timeout { .. })
    ));
}

#[tokio::test]
async fn http_status_failures_surface_as_transport_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let err = client.hosts(json!({})).await.expect_err("should fail");
    match err {
        Error::Transport(TransportError::HttpStatus { status }) => {
            assert_eq!(status.as_u16(), 503);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_envelope_is_a_protocol_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": 1 })),
        )
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let err = client.hosts(json!({})).await.expect_err("should fail");
    assert!(matches!(
        err,
        Error::Protocol(ProtocolError::EmptyEnvelope)
    ));
}

#[tokio::test]
async fn id_echo_mismatch_is_a_protocol_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "jsonrpc": "2.0", "result": [], "id": 999 })),
        )
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let err = client.hosts(json!({})).await.expect_err("should fail");
    match err {
        Error::Protocol(ProtocolError::IdMismatch { sent, got }) => {
            assert_eq!(sent, 1);
            assert_eq!(got, "999");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn logout_clears_the_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("user.logout"))
        .respond_with(rpc_result(json!(true)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([])))
        .mount(&server)
        .await;

    let client = authed_client(&server);
    assert!(client.is_authenticated());
    client.logout().await.expect("logout");
    assert!(!client.is_authenticated());

    client.hosts(json!({})).await.expect("hosts");
    let bodies = request_bodies(&server).await;
    assert_eq!(bodies[0]["auth"], "token");
    assert!(
        bodies[1].get("auth").is_none(),
        "calls after logout must omit auth"
    );
}

#[tokio::test]
async fn api_version_is_unauthenticated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!("7.0.0")))
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let version = client.api_version().await.expect("version");
    assert_eq!(version, "7.0.0");

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies[0]["method"], "apiinfo.version");
    assert!(
        bodies[0].get("auth").is_none(),
        "apiinfo.version must not carry auth"
    );
}

#[tokio::test]
async fn untyped_calls_expose_the_raw_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!({ "itemids": ["42"] })))
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let result: Result<_> = client.call("item.create", json!([{ "name": "i" }])).await;
    let value = result.expect("call").into_value();
    assert_eq!(value, json!({ "itemids": ["42"] }));
}
