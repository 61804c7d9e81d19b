//! Ed25519 author identities

use ed25519_dalek::{Signer, SigningKey, SECRET_KEY_LENGTH};
use rand::rngs::OsRng;
use std::fmt;

use crate::error::{Result, SdkError};
use crate::traits::KeyPair;
use crate::types::PublicKey;

/// Ed25519 key pair; the public key is the hex-encoded verifying key.
#[derive(Clone)]
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    /// Generate a fresh key pair from the OS random source.
    pub fn new() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Restore a key pair from its hex-encoded 32 byte private key.
    pub fn from_private_key_hex(private_key: &str) -> Result<Self> {
        let bytes = hex::decode(private_key)?;
        let bytes: [u8; SECRET_KEY_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
            SdkError::Encoding(format!(
                "Private key must be {} bytes, got {}",
                SECRET_KEY_LENGTH,
                bytes.len()
            ))
        })?;

        Ok(Self {
            signing_key: SigningKey::from_bytes(&bytes),
        })
    }

    pub fn private_key_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }
}

impl Default for Ed25519KeyPair {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyPair for Ed25519KeyPair {
    fn public_key(&self) -> PublicKey {
        PublicKey::new(hex::encode(self.signing_key.verifying_key().to_bytes()))
    }

    fn sign(&self, bytes: &[u8]) -> Vec<u8> {
        self.signing_key.sign(bytes).to_bytes().to_vec()
    }
}

// Private key stays out of logs
impl fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("public_key", &self.public_key().as_str())
            .finish_non_exhaustive()
    }
}
