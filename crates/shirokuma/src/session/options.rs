//! Per-call options and session configuration

use shirokuma_client::ClientConfig;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, SdkError};
use crate::traits::KeyPair;
use crate::types::SchemaId;

/// Overrides for a single create, update or delete.
///
/// Anything left unset falls back to the session's defaults.
#[derive(Clone, Default)]
pub struct Options {
    pub key_pair: Option<Arc<dyn KeyPair>>,
    pub schema_id: Option<SchemaId>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key_pair(mut self, key_pair: Arc<dyn KeyPair>) -> Self {
        self.key_pair = Some(key_pair);
        self
    }

    pub fn with_schema_id(mut self, schema_id: impl Into<SchemaId>) -> Self {
        self.schema_id = Some(schema_id.into());
        self
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("key_pair", &self.key_pair.as_ref().map(|k| k.public_key()))
            .field("schema_id", &self.schema_id)
            .finish()
    }
}

/// Everything needed to open a [`Session`](super::Session) against a
/// GraphQL node.
#[derive(Clone, Default)]
pub struct SessionConfig {
    pub client: ClientConfig,
    pub key_pair: Option<Arc<dyn KeyPair>>,
    pub schema_id: Option<SchemaId>,
}

impl SessionConfig {
    pub fn for_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: ClientConfig::for_endpoint(endpoint),
            ..Default::default()
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("client", &self.client)
            .field("key_pair", &self.key_pair.as_ref().map(|k| k.public_key()))
            .field("schema_id", &self.schema_id)
            .finish()
    }
}

/// Pick the explicit value, else the default, else fail with `missing`.
pub(crate) fn resolve<T: Clone>(explicit: Option<&T>, default: Option<&T>, missing: &str) -> Result<T> {
    explicit
        .or(default)
        .cloned()
        .ok_or_else(|| SdkError::Configuration(missing.to_string()))
}

pub(crate) const MISSING_KEY_PAIR: &str =
    "Configure a key pair with `Session::set_key_pair` or with the `key_pair` option";
pub(crate) const MISSING_SCHEMA_ID: &str =
    "Configure a schema with `Session::set_schema_id` or with the `schema_id` option";
