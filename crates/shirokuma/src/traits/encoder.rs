//! Signing and encoding capabilities

use crate::error::Result;
use crate::operation::Operation;
use crate::types::{OperationId, PublicKey};
use shirokuma_client::EntryArgs;

/// An author's signing identity.
///
/// Implementations must return the same public key for their whole lifetime.
pub trait KeyPair: Send + Sync {
    /// Public key identifying the author
    fn public_key(&self) -> PublicKey;

    /// Sign arbitrary bytes
    fn sign(&self, bytes: &[u8]) -> Vec<u8>;
}

/// Encoding engine for operations and entries.
///
/// The SDK treats the produced bytes as opaque; it only hex-encodes them for
/// transport and hashes signed entries to learn their operation id.
pub trait Encoder: Send + Sync {
    /// Encode an operation payload
    fn encode_operation(&self, operation: &Operation) -> Result<Vec<u8>>;

    /// Build, sign and encode an entry carrying `operation` at the position
    /// described by `args`
    fn sign_and_encode_entry(
        &self,
        args: &EntryArgs,
        operation: &[u8],
        key_pair: &dyn KeyPair,
    ) -> Result<Vec<u8>>;

    /// Hash an encoded entry
    fn generate_hash(&self, entry: &[u8]) -> Result<OperationId>;
}
