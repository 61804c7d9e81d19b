//! GraphQL documents sent to the node
//!
//! The text is part of the node's compatibility contract and is sent
//! verbatim.

/// Query the arguments for the next entry of an author's log.
///
/// `viewId` is optional; without it the node answers for a new log.
pub const GQL_NEXT_ARGS: &str = r#"
  query NextArgs($publicKey: String!, $viewId: String) {
    nextArgs(publicKey: $publicKey, viewId: $viewId) {
      logId
      seqNum
      backlink
      skiplink
    }
  }
"#;

/// Publish an encoded entry and operation and receive the arguments for the
/// following entry on the same log.
pub const GQL_PUBLISH: &str = r#"
  mutation Publish($entry: String!, $operation: String!) {
    publish(entry: $entry, operation: $operation) {
      logId
      seqNum
      backlink
      skiplink
    }
  }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_args_document_shape() {
        assert!(GQL_NEXT_ARGS.contains("query NextArgs($publicKey: String!, $viewId: String)"));
        assert!(GQL_NEXT_ARGS.contains("nextArgs(publicKey: $publicKey, viewId: $viewId)"));
        for field in ["logId", "seqNum", "backlink", "skiplink"] {
            assert!(GQL_NEXT_ARGS.contains(field));
        }
    }

    #[test]
    fn test_publish_document_shape() {
        assert!(GQL_PUBLISH.contains("mutation Publish($entry: String!, $operation: String!)"));
        assert!(GQL_PUBLISH.contains("publish(entry: $entry, operation: $operation)"));
    }
}
