//! Integration tests for the GraphQL client against a mocked node

use serde_json::json;
use shirokuma_client::{ClientConfig, ClientError, EntryArgs, GraphQlClient, GQL_NEXT_ARGS};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PUBLIC_KEY: &str = "2f8e50c2ede6d936ecc3144187ff1c273808185cfbc5ff3d3748d1ff7353fc96";
const VIEW_ID: &str = "0020b177ec1bf26dfb3b7010d473e6d44713b29b765b99c6e60ecbfae742de496543";

fn client_for(server: &MockServer) -> GraphQlClient {
    GraphQlClient::new(ClientConfig::for_endpoint(format!("{}/graphql", server.uri()))).unwrap()
}

#[tokio::test]
async fn test_next_args_sends_query_and_variables() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "query": GQL_NEXT_ARGS,
            "variables": { "publicKey": PUBLIC_KEY, "viewId": VIEW_ID },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "nextArgs": {
                    "logId": "0",
                    "seqNum": "2",
                    "backlink": VIEW_ID,
                    "skiplink": null,
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let args = client_for(&server)
        .next_args(PUBLIC_KEY, Some(VIEW_ID))
        .await
        .unwrap();

    assert_eq!(
        args,
        EntryArgs {
            log_id: 0,
            seq_num: 2,
            backlink: Some(VIEW_ID.to_string()),
            skiplink: None,
        }
    );
}

#[tokio::test]
async fn test_next_args_without_view_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "variables": { "publicKey": PUBLIC_KEY },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "nextArgs": { "logId": "1", "seqNum": "1" } }
        })))
        .mount(&server)
        .await;

    let args = client_for(&server).next_args(PUBLIC_KEY, None).await.unwrap();
    assert_eq!(args, EntryArgs::first(1));
}

#[tokio::test]
async fn test_publish_returns_next_args() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "variables": { "entry": "00aa", "operation": "84bb" },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "publish": { "logId": "0", "seqNum": "6", "backlink": VIEW_ID, "skiplink": VIEW_ID } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let args = client_for(&server).publish("00aa", "84bb").await.unwrap();
    assert_eq!(args.seq_num, 6);
    assert_eq!(args.skiplink.as_deref(), Some(VIEW_ID));
}

#[tokio::test]
async fn test_publish_missing_field_is_an_error() {
    let server = MockServer::start().await;

    // Older nodes answered under a different field name
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "nextArgs": { "logId": "0", "seqNum": "6" } }
        })))
        .mount(&server)
        .await;

    let result = client_for(&server).publish("00aa", "84bb").await;
    assert!(matches!(result, Err(ClientError::MissingField("publish"))));
}

#[tokio::test]
async fn test_graphql_errors_are_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "Could not find document view" }]
        })))
        .mount(&server)
        .await;

    let result = client_for(&server).next_args(PUBLIC_KEY, Some(VIEW_ID)).await;
    match result {
        Err(ClientError::GraphQl(message)) => assert!(message.contains("Could not find")),
        other => panic!("expected GraphQL error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("node is syncing"))
        .mount(&server)
        .await;

    let result = client_for(&server).next_args(PUBLIC_KEY, None).await;
    match result {
        Err(ClientError::Server { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "node is syncing");
        }
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_api_key_is_sent_as_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "nextArgs": { "logId": "0", "seqNum": "1" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GraphQlClient::new(ClientConfig {
        endpoint: format!("{}/graphql", server.uri()),
        api_key: Some("secret".into()),
        ..Default::default()
    })
    .unwrap();

    client.next_args(PUBLIC_KEY, None).await.unwrap();
}
