//! Node API seam

use crate::types::{DocumentViewId, PublicKey};
use async_trait::async_trait;
use shirokuma_client::{ClientError, EntryArgs, GraphQlClient};

/// Queries and mutations the SDK sends to a node.
///
/// Errors are transport errors and are handed to the caller unchanged.
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Address of the node, for display
    fn endpoint(&self) -> &str;

    /// Arguments for the next entry of `public_key`'s log, optionally for
    /// the log of the document at `view_id`
    async fn next_args(
        &self,
        public_key: &PublicKey,
        view_id: Option<&DocumentViewId>,
    ) -> Result<EntryArgs, ClientError>;

    /// Publish a hex-encoded entry and operation, returning the arguments for
    /// the following entry on the same log
    async fn publish(&self, entry: &str, operation: &str) -> Result<EntryArgs, ClientError>;
}

#[async_trait]
impl NodeApi for GraphQlClient {
    fn endpoint(&self) -> &str {
        GraphQlClient::endpoint(self)
    }

    async fn next_args(
        &self,
        public_key: &PublicKey,
        view_id: Option<&DocumentViewId>,
    ) -> Result<EntryArgs, ClientError> {
        let view_id = view_id.map(|v| v.to_string());
        GraphQlClient::next_args(self, public_key.as_str(), view_id.as_deref()).await
    }

    async fn publish(&self, entry: &str, operation: &str) -> Result<EntryArgs, ClientError> {
        GraphQlClient::publish(self, entry, operation).await
    }
}
