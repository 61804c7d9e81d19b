//! Shirokuma - client SDK for append-only-log nodes
//!
//! Create, update and delete documents on a p2panda-style node. Each change
//! is an operation carried by a signed entry in the author's log; the node
//! tells the client where the next entry goes (`nextArgs`) and accepts
//! signed entries (`publish`).
//!
//! # Architecture
//!
//! - [`Session`]: holds defaults, resolves entry arguments and publishes
//! - [`ArgumentCache`]: single-use arguments returned by the last publish,
//!   so chained operations skip a round trip
//! - [`OperationBuilder`]: encodes operations and signs entries through the
//!   [`Encoder`] and [`KeyPair`] capabilities
//! - [`Schema`] / [`Document`]: convenience handles over a shared session
//!
//! Signing and binary encoding are not implemented here. Callers supply an
//! [`Encoder`]; [`MockEncoder`] is a deterministic stand-in for tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use shirokuma::{Ed25519KeyPair, Fields, MockEncoder, Session};
//!
//! # async fn example() -> shirokuma::Result<()> {
//! let session = Arc::new(
//!     Session::new("http://localhost:2020/graphql", Arc::new(MockEncoder::new()))?
//!         .with_key_pair(Arc::new(Ed25519KeyPair::new())),
//! );
//!
//! let chat = session.add_schema("chat_0020c65567ae37efea293e34a9c7d13f8f2bf23dbdc3b5c7b9ab46293111c48fc78b");
//! let mut message = chat.create(Fields::new().with("message", "ahoy")).await?;
//! message.update(Fields::new().with("message", "ahoy!")).await?;
//! message.delete().await?;
//! # Ok(())
//! # }
//! ```

// Capability traits (signing, encoding, node API)
pub mod traits;

// Entry argument cache
pub mod cache;

// Identifiers and field values
pub mod types;

// Operations and payload building
pub mod operation;

// Session facade
pub mod session;

// Schema and document handles
pub mod document;
pub mod schema;

// Ed25519 identity
pub mod identity;

// In-memory encoder and node
pub mod mock;

// Error types
pub mod error;

// Re-export core types
pub use cache::{ArgumentCache, CacheKey, CacheStatsSnapshot};
pub use document::Document;
pub use identity::Ed25519KeyPair;
pub use mock::{MockEncoder, MockEntry, MockNode};
pub use operation::{Action, Operation, OperationBuilder, PublishPayload};
pub use schema::Schema;
pub use session::{Options, Session, SessionConfig};
pub use traits::{Encoder, KeyPair, NodeApi};
pub use types::{DocumentId, DocumentViewId, FieldValue, Fields, OperationId, PublicKey, SchemaId};

// Re-export error types
pub use error::{Result, SdkError};

// Re-export from the transport crate
pub use shirokuma_client::{ClientConfig, ClientError, EntryArgs, GraphQlClient};
