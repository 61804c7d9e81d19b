//! Session: the entry point for publishing operations to a node
//!
//! A session wraps a node connection, the encoding capability and a cache of
//! entry arguments. It can hold a default key pair and schema; per-call
//! [`Options`] override them.
//!
//! Every mutating call runs the same pipeline:
//! 1. Resolve entry arguments (cache first, then the node)
//! 2. Encode the operation and sign the entry
//! 3. Publish, then cache the node's next arguments under the new view id
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use shirokuma::{Ed25519KeyPair, Fields, MockEncoder, Options, Session};
//!
//! # async fn example() -> shirokuma::Result<()> {
//! let session = Session::new("http://localhost:2020/graphql", Arc::new(MockEncoder::new()))?
//!     .with_key_pair(Arc::new(Ed25519KeyPair::new()))
//!     .with_schema_id("chat_0020c65567ae37efea293e34a9c7d13f8f2bf23dbdc3b5c7b9ab46293111c48fc78b");
//!
//! let v1 = session.create(Fields::new().with("message", "hi"), &Options::new()).await?;
//! let v2 = session.update(Fields::new().with("message", "hello"), &v1, &Options::new()).await?;
//! session.delete(&v2, &Options::new()).await?;
//! # Ok(())
//! # }
//! ```

mod options;

pub use options::{Options, SessionConfig};

use options::{resolve, MISSING_KEY_PAIR, MISSING_SCHEMA_ID};
use shirokuma_client::{ClientError, EntryArgs, GraphQlClient};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::{ArgumentCache, CacheKey, CacheStatsSnapshot};
use crate::error::{Result, SdkError};
use crate::operation::{require_fields, require_previous, Operation, OperationBuilder, PublishPayload};
use crate::schema::Schema;
use crate::traits::{Encoder, KeyPair, NodeApi};
use crate::types::{DocumentViewId, Fields, OperationId, PublicKey, SchemaId};

/// Connection to a node plus the defaults used when publishing.
pub struct Session {
    node: Arc<dyn NodeApi>,
    builder: OperationBuilder,
    key_pair: Option<Arc<dyn KeyPair>>,
    schema_id: Option<SchemaId>,
    cache: Mutex<ArgumentCache>,
}

impl Session {
    /// Open a session against the GraphQL endpoint of a node.
    pub fn new(endpoint: &str, encoder: Arc<dyn Encoder>) -> Result<Self> {
        if endpoint.is_empty() {
            return Err(SdkError::Configuration(
                "Missing `endpoint` parameter for creating a session".to_string(),
            ));
        }
        Self::from_config(SessionConfig::for_endpoint(endpoint), encoder)
    }

    pub fn from_config(config: SessionConfig, encoder: Arc<dyn Encoder>) -> Result<Self> {
        if config.client.endpoint.is_empty() {
            return Err(SdkError::Configuration(
                "Missing `endpoint` parameter for creating a session".to_string(),
            ));
        }

        let client = GraphQlClient::new(config.client).map_err(|e| match e {
            ClientError::Config(message) => SdkError::Configuration(message),
            other => SdkError::Transport(other),
        })?;

        let mut session = Self::with_node(Arc::new(client), encoder);
        session.key_pair = config.key_pair;
        session.schema_id = config.schema_id;
        Ok(session)
    }

    /// Use any node implementation, e.g. an in-memory one in tests.
    pub fn with_node(node: Arc<dyn NodeApi>, encoder: Arc<dyn Encoder>) -> Self {
        Self {
            node,
            builder: OperationBuilder::new(encoder),
            key_pair: None,
            schema_id: None,
            cache: Mutex::new(ArgumentCache::new()),
        }
    }

    pub fn with_key_pair(mut self, key_pair: Arc<dyn KeyPair>) -> Self {
        self.key_pair = Some(key_pair);
        self
    }

    pub fn with_schema_id(mut self, schema_id: impl Into<SchemaId>) -> Self {
        self.schema_id = Some(schema_id.into());
        self
    }

    pub fn set_key_pair(&mut self, key_pair: Arc<dyn KeyPair>) -> &mut Self {
        self.key_pair = Some(key_pair);
        self
    }

    pub fn set_schema_id(&mut self, schema_id: impl Into<SchemaId>) -> &mut Self {
        self.schema_id = Some(schema_id.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        self.node.endpoint()
    }

    pub fn key_pair(&self) -> Option<&Arc<dyn KeyPair>> {
        self.key_pair.as_ref()
    }

    pub fn schema_id(&self) -> Option<&SchemaId> {
        self.schema_id.as_ref()
    }

    /// Handle for publishing documents of one schema through this session.
    pub fn add_schema(self: &Arc<Self>, schema_id: impl Into<SchemaId>) -> Schema {
        Schema::new(schema_id.into(), Arc::clone(self))
    }

    // =========================================================================
    // Entry arguments
    // =========================================================================

    /// Arguments for the next entry of `public_key`.
    ///
    /// With a view id, arguments cached by an earlier publish are consumed
    /// first; the node is asked only on a miss. Without one, or with an
    /// empty one, the node is always asked. Answers from the node are never
    /// cached.
    pub async fn next_args(
        &self,
        public_key: &PublicKey,
        view_id: Option<&DocumentViewId>,
    ) -> Result<EntryArgs> {
        let (args, _) = self.resolve_args(public_key, view_id).await?;
        Ok(args)
    }

    /// Like [`Session::next_args`], also telling whether the cache answered.
    async fn resolve_args(
        &self,
        public_key: &PublicKey,
        view_id: Option<&DocumentViewId>,
    ) -> Result<(EntryArgs, bool)> {
        if public_key.is_empty() {
            return Err(SdkError::InvalidArgument(
                "Author's public key must be provided".to_string(),
            ));
        }

        let view_id = view_id.filter(|v| !v.is_empty());

        if let Some(view_id) = view_id {
            let key = CacheKey::new(public_key.clone(), view_id.clone());
            let cached = self.cache.lock().await.take(&key);
            if let Some(args) = cached {
                debug!(public_key = %public_key, view_id = %view_id, cached = true, "resolved next args");
                return Ok((args, true));
            }
        }

        let args = self.node.next_args(public_key, view_id).await.map_err(|e| {
            debug!(public_key = %public_key, error = %e, "failed to fetch next args");
            e
        })?;

        debug!(
            public_key = %public_key,
            view_id = ?view_id.map(ToString::to_string),
            cached = false,
            log_id = args.log_id,
            seq_num = args.seq_num,
            "resolved next args"
        );
        Ok((args, false))
    }

    /// Store arguments for the next operation on `view_id` by `public_key`.
    pub async fn set_next_args(&self, public_key: PublicKey, view_id: DocumentViewId, args: EntryArgs) {
        self.cache
            .lock()
            .await
            .insert(CacheKey::new(public_key, view_id), args);
    }

    pub async fn cache_stats(&self) -> CacheStatsSnapshot {
        self.cache.lock().await.stats()
    }

    // =========================================================================
    // Publishing
    // =========================================================================

    /// Publish a hex-encoded signed entry and operation, signed with the
    /// session's key pair.
    ///
    /// Returns the view id the entry produced. The node's arguments for the
    /// following entry are cached under it.
    pub async fn publish(&self, entry: &str, operation: &str) -> Result<DocumentViewId> {
        check_payload(entry, operation)?;
        let key_pair = resolve(None, self.key_pair.as_ref(), MISSING_KEY_PAIR)?;
        let id = self.publish_entry(entry, operation, &key_pair.public_key()).await?;
        Ok(DocumentViewId::from(id))
    }

    /// Publish a payload signed with `key_pair`.
    pub async fn publish_with(
        &self,
        payload: &PublishPayload,
        key_pair: &dyn KeyPair,
    ) -> Result<DocumentViewId> {
        check_payload(&payload.entry, &payload.operation)?;
        let id = self
            .publish_entry(&payload.entry, &payload.operation, &key_pair.public_key())
            .await?;
        Ok(DocumentViewId::from(id))
    }

    async fn publish_entry(
        &self,
        entry: &str,
        operation: &str,
        public_key: &PublicKey,
    ) -> Result<OperationId> {
        // hash before publishing so a bad entry never reaches the node
        let operation_id = self.builder.hash_entry(entry)?;
        self.submit(entry, operation, operation_id, public_key).await
    }

    async fn submit(
        &self,
        entry: &str,
        operation: &str,
        operation_id: OperationId,
        public_key: &PublicKey,
    ) -> Result<OperationId> {
        let next = self.node.publish(entry, operation).await.map_err(|e| {
            debug!(operation_id = %operation_id, error = %e, "failed to publish entry");
            e
        })?;

        let view_id = DocumentViewId::from(operation_id.clone());
        debug!(
            public_key = %public_key,
            view_id = %view_id,
            next_seq_num = next.seq_num,
            "published entry"
        );
        self.set_next_args(public_key.clone(), view_id, next).await;

        Ok(operation_id)
    }

    async fn sign_and_publish(
        &self,
        operation: &Operation,
        previous: Option<&DocumentViewId>,
        key_pair: &dyn KeyPair,
    ) -> Result<OperationId> {
        let public_key = key_pair.public_key();
        let (args, cached) = self.resolve_args(&public_key, previous).await?;

        let prepared = self
            .builder
            .build(operation, &args, key_pair)
            .and_then(|payload| Ok((self.builder.hash_entry(&payload.entry)?, payload)));

        let (operation_id, payload) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                // nothing left the process, so cached arguments go back
                if let (true, Some(view_id)) = (cached, previous) {
                    self.cache
                        .lock()
                        .await
                        .restore(CacheKey::new(public_key, view_id.clone()), args);
                }
                return Err(e);
            }
        };

        // a failed publish leaves cached arguments consumed, the node may
        // have stored the entry
        self.submit(&payload.entry, &payload.operation, operation_id, &public_key)
            .await
    }

    // =========================================================================
    // Document operations
    // =========================================================================

    /// Create a document, returning the view id of its first version.
    pub async fn create(&self, fields: Fields, options: &Options) -> Result<DocumentViewId> {
        let id = self.create_operation(fields, options).await?;
        Ok(DocumentViewId::from(id))
    }

    /// Update the document at `previous`, returning the new view id.
    pub async fn update(
        &self,
        fields: Fields,
        previous: &DocumentViewId,
        options: &Options,
    ) -> Result<DocumentViewId> {
        let id = self.update_operation(fields, previous, options).await?;
        Ok(DocumentViewId::from(id))
    }

    /// Delete the document at `previous`, returning the view id of the
    /// deletion.
    pub async fn delete(&self, previous: &DocumentViewId, options: &Options) -> Result<DocumentViewId> {
        let id = self.delete_operation(previous, options).await?;
        Ok(DocumentViewId::from(id))
    }

    pub(crate) async fn create_operation(&self, fields: Fields, options: &Options) -> Result<OperationId> {
        require_fields(&fields)?;
        let (key_pair, schema_id) = self.resolve_options(options)?;

        debug!(schema_id = %schema_id, fields = fields.len(), "create document");
        let operation = Operation::create(schema_id, fields)?;
        self.sign_and_publish(&operation, None, key_pair.as_ref()).await
    }

    pub(crate) async fn update_operation(
        &self,
        fields: Fields,
        previous: &DocumentViewId,
        options: &Options,
    ) -> Result<OperationId> {
        require_previous(previous)?;
        require_fields(&fields)?;
        let (key_pair, schema_id) = self.resolve_options(options)?;

        debug!(schema_id = %schema_id, previous = %previous, fields = fields.len(), "update document");
        let operation = Operation::update(schema_id, previous.clone(), fields)?;
        self.sign_and_publish(&operation, Some(previous), key_pair.as_ref())
            .await
    }

    pub(crate) async fn delete_operation(
        &self,
        previous: &DocumentViewId,
        options: &Options,
    ) -> Result<OperationId> {
        require_previous(previous)?;
        let (key_pair, schema_id) = self.resolve_options(options)?;

        debug!(schema_id = %schema_id, previous = %previous, "delete document");
        let operation = Operation::delete(schema_id, previous.clone())?;
        self.sign_and_publish(&operation, Some(previous), key_pair.as_ref())
            .await
    }

    fn resolve_options(&self, options: &Options) -> Result<(Arc<dyn KeyPair>, SchemaId)> {
        let key_pair = resolve(options.key_pair.as_ref(), self.key_pair.as_ref(), MISSING_KEY_PAIR)?;
        let schema_id = resolve(options.schema_id.as_ref(), self.schema_id.as_ref(), MISSING_SCHEMA_ID)?;
        Ok((key_pair, schema_id))
    }
}

fn check_payload(entry: &str, operation: &str) -> Result<()> {
    if entry.is_empty() || operation.is_empty() {
        return Err(SdkError::InvalidArgument(
            "Encoded entry and operation must be provided".to_string(),
        ));
    }
    Ok(())
}

/// Last eight characters, or the whole string if shorter
fn tail(value: &str) -> &str {
    value
        .char_indices()
        .rev()
        .nth(7)
        .map(|(i, _)| &value[i..])
        .unwrap_or(value)
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Session {}", self.endpoint())?;
        if let Some(key_pair) = &self.key_pair {
            write!(f, " key pair {}", tail(key_pair.public_key().as_str()))?;
        }
        if let Some(schema_id) = &self.schema_id {
            write!(f, " schema {}", tail(schema_id.as_str()))?;
        }
        write!(f, ">")
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.endpoint())
            .field("key_pair", &self.key_pair.as_ref().map(|k| k.public_key()))
            .field("schema_id", &self.schema_id)
            .finish_non_exhaustive()
    }
}
