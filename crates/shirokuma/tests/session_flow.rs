//! End-to-end publishing against the in-memory node

use std::sync::Arc;

use shirokuma::{
    DocumentViewId, Ed25519KeyPair, Fields, KeyPair, MockEncoder, MockNode, Options, PublicKey,
    SdkError, Session,
};
use tracing_subscriber::EnvFilter;

const SCHEMA: &str = "chat_0020c65567ae37efea293e34a9c7d13f8f2bf23dbdc3b5c7b9ab46293111c48fc78b";
const PRIVATE_KEY: &str = "4c21b14f8b0a2e4fbd6b4f1b7b53a4a6a1c8b9b2f2c5a1c0e2d3f4a5b6c7d8e9";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn chat_session(node: Arc<MockNode>) -> Session {
    let key_pair = Ed25519KeyPair::from_private_key_hex(PRIVATE_KEY).unwrap();
    Session::with_node(node, Arc::new(MockEncoder::new()))
        .with_key_pair(Arc::new(key_pair))
        .with_schema_id(SCHEMA)
}

#[tokio::test]
async fn test_chat_message_lifecycle() {
    init_tracing();
    let node = Arc::new(MockNode::new());
    let session = chat_session(node.clone());
    let options = Options::new();

    let v1 = session
        .create(Fields::new().with("message", "1"), &options)
        .await
        .unwrap();
    let v2 = session
        .update(Fields::new().with("message", "2"), &v1, &options)
        .await
        .unwrap();
    let v3 = session
        .update(Fields::new().with("message", "3"), &v2, &options)
        .await
        .unwrap();

    assert_ne!(v1, v2);
    assert_ne!(v2, v3);

    let published = node.published();
    let seq_nums: Vec<u64> = published.iter().map(|e| e.seq_num).collect();
    assert_eq!(seq_nums, vec![1, 2, 3]);
    assert!(published.iter().all(|e| e.log_id == published[0].log_id));

    // only the create asked the node; updates used cached arguments
    assert_eq!(node.next_args_calls(), 1);
    assert_eq!(node.publish_calls(), 3);

    let v4 = session.delete(&v3, &options).await.unwrap();
    assert_ne!(v3, v4);
    assert_eq!(node.published().last().map(|e| e.seq_num), Some(4));
}

#[tokio::test]
async fn test_cached_arguments_consumed_once() {
    let node = Arc::new(MockNode::new());
    let session = chat_session(node.clone());
    let public_key = session.key_pair().unwrap().public_key();

    let v1 = session
        .create(Fields::new().with("message", "1"), &Options::new())
        .await
        .unwrap();
    node.reset_call_counts();

    session.next_args(&public_key, Some(&v1)).await.unwrap();
    assert_eq!(node.next_args_calls(), 0);

    // cache entry is gone, the node answers the same position
    let args = session.next_args(&public_key, Some(&v1)).await.unwrap();
    assert_eq!(node.next_args_calls(), 1);
    assert_eq!(args.seq_num, 2);

    let stats = session.cache_stats().await;
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn test_update_from_stale_view_uses_node() {
    let node = Arc::new(MockNode::new());
    let session = chat_session(node.clone());
    let options = Options::new();

    let v1 = session
        .create(Fields::new().with("message", "1"), &options)
        .await
        .unwrap();
    let _v2 = session
        .update(Fields::new().with("message", "2"), &v1, &options)
        .await
        .unwrap();
    node.reset_call_counts();

    // v1's cached arguments were consumed by the first update
    session
        .update(Fields::new().with("message", "2b"), &v1, &options)
        .await
        .unwrap();
    assert_eq!(node.next_args_calls(), 1);
    assert_eq!(node.published().last().map(|e| e.seq_num), Some(3));
}

#[tokio::test]
async fn test_two_authors_edit_one_document() {
    let node = Arc::new(MockNode::new());
    let session = chat_session(node.clone());
    let other: Arc<dyn KeyPair> = Arc::new(Ed25519KeyPair::new());

    let v1 = session
        .create(Fields::new().with("message", "1"), &Options::new())
        .await
        .unwrap();
    let v2 = session
        .update(
            Fields::new().with("message", "reply"),
            &v1,
            &Options::new().with_key_pair(other.clone()),
        )
        .await
        .unwrap();

    let last = node.published().pop().unwrap();
    assert_eq!(last.public_key, other.public_key());
    // the other author starts their own log
    assert_eq!(last.seq_num, 1);
    assert_ne!(v1, v2);
}

#[tokio::test]
async fn test_invalid_arguments_never_reach_node() {
    let node = Arc::new(MockNode::new());
    let session = chat_session(node.clone());

    let errors = vec![
        session.create(Fields::new(), &Options::new()).await.unwrap_err(),
        session
            .update(Fields::new().with("message", "1"), &DocumentViewId::default(), &Options::new())
            .await
            .unwrap_err(),
        session
            .delete(&DocumentViewId::default(), &Options::new())
            .await
            .unwrap_err(),
        session
            .next_args(&PublicKey::from(""), None)
            .await
            .unwrap_err(),
        session.publish("", "").await.unwrap_err(),
    ];

    for err in errors {
        assert!(matches!(err, SdkError::InvalidArgument(_)), "unexpected {err:?}");
    }
    assert_eq!(node.next_args_calls(), 0);
    assert_eq!(node.publish_calls(), 0);
}

#[tokio::test]
async fn test_missing_defaults() {
    let node = Arc::new(MockNode::new());
    let session = Session::with_node(node.clone(), Arc::new(MockEncoder::new()));

    let err = session
        .create(Fields::new().with("message", "1"), &Options::new().with_schema_id(SCHEMA))
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Configuration(_)));

    let err = session
        .create(
            Fields::new().with("message", "1"),
            &Options::new().with_key_pair(Arc::new(Ed25519KeyPair::new())),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Configuration(_)));
    assert_eq!(node.next_args_calls(), 0);
}

#[tokio::test]
async fn test_schema_document_flow() {
    let node = Arc::new(MockNode::new());
    let session = Arc::new(chat_session(node.clone()));

    let mut message = session
        .add_schema(SCHEMA)
        .create(Fields::new().with("message", "ahoy"))
        .await
        .unwrap();
    let created = message.view_id().clone();

    message.update(Fields::new().with("message", "ahoy!")).await.unwrap();
    assert_eq!(message.get("message").unwrap().as_str(), Some("ahoy!"));
    assert_ne!(message.view_id(), &created);

    message.delete().await.unwrap();
    assert!(message.is_deleted());
    assert!(matches!(
        message.get("colour"),
        Err(SdkError::FieldNotFound(_))
    ));
    assert_eq!(node.publish_calls(), 3);
}

#[test]
fn test_blocking_caller() {
    let node = Arc::new(MockNode::new());
    let session = chat_session(node.clone());

    let v1 = tokio_test::block_on(session.create(Fields::new().with("message", "1"), &Options::new()))
        .unwrap();
    assert_eq!(v1.len(), 1);
    assert_eq!(node.publish_calls(), 1);
}
