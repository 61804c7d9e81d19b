//! Capability seams
//!
//! The SDK does not sign, hash or encode anything itself, and it does not
//! know how requests reach the node. These traits describe what it needs
//! from the outside:
//! - [`KeyPair`] and [`Encoder`]: the signing and encoding engine
//! - [`NodeApi`]: the node's `nextArgs` query and `publish` mutation

mod encoder;
mod node;

pub use encoder::{Encoder, KeyPair};
pub use node::NodeApi;
