//! GraphQL client for the entry-arguments API of an append-only-log node
//!
//! Exposes the two operations a publishing client needs:
//! - `nextArgs`: ask the node where the next entry of an author's log goes
//! - `publish`: submit a signed entry with its operation
//!
//! # Example
//!
//! ```rust,no_run
//! use shirokuma_client::{ClientConfig, GraphQlClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GraphQlClient::new(ClientConfig {
//!     endpoint: "http://localhost:2020/graphql".into(),
//!     ..Default::default()
//! })?;
//!
//! // Arguments for the first entry of a (possibly new) log
//! let args = client.next_args("2f8e50c2ede6d936ecc3144187ff1c273808185cfbc5ff3d3748d1ff7353fc96", None).await?;
//! println!("log {} seq {}", args.log_id, args.seq_num);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod queries;
pub mod types;

// Re-export main types
pub use client::GraphQlClient;
pub use error::{ClientError, Result};
pub use queries::{GQL_NEXT_ARGS, GQL_PUBLISH};
pub use types::*;
