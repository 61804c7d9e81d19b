//! In-memory stand-ins for the encoder and the node.
//!
//! `MockEncoder` produces deterministic, human-readable bytes instead of a
//! real binary entry format. `MockNode` keeps author logs in memory and
//! answers `nextArgs` and `publish` the way a node would, so sessions can be
//! exercised end to end without a network.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shirokuma_client::{ClientError, EntryArgs};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use crate::error::{Result, SdkError};
use crate::operation::{Action, Operation};
use crate::traits::{Encoder, KeyPair, NodeApi};
use crate::types::{DocumentId, DocumentViewId, OperationId, PublicKey};

/// Prefix of a sha256 multihash
const HASH_PREFIX: &str = "0020";

fn hash_bytes(bytes: &[u8]) -> String {
    format!("{}{}", HASH_PREFIX, hex::encode(Sha256::digest(bytes)))
}

// =============================================================================
// Encoder
// =============================================================================

/// Entry as written by [`MockEncoder`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockEntry {
    pub public_key: PublicKey,
    pub log_id: u64,
    pub seq_num: u64,
    pub backlink: Option<String>,
    pub skiplink: Option<String>,
    pub payload_hash: String,
    pub payload_size: u64,
    /// Hex signature over the entry with this field left empty
    pub signature: String,
}

impl MockEntry {
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Deterministic encoder: JSON operations, JSON entries, sha256 hashes.
#[derive(Debug, Clone, Default)]
pub struct MockEncoder;

impl MockEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder for MockEncoder {
    fn encode_operation(&self, operation: &Operation) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(operation)?)
    }

    fn sign_and_encode_entry(
        &self,
        args: &EntryArgs,
        operation: &[u8],
        key_pair: &dyn KeyPair,
    ) -> Result<Vec<u8>> {
        let mut entry = MockEntry {
            public_key: key_pair.public_key(),
            log_id: args.log_id,
            seq_num: args.seq_num,
            backlink: args.backlink.clone(),
            skiplink: args.skiplink.clone(),
            payload_hash: hash_bytes(operation),
            payload_size: operation.len() as u64,
            signature: String::new(),
        };
        let unsigned = serde_json::to_vec(&entry)?;
        entry.signature = hex::encode(key_pair.sign(&unsigned));

        Ok(serde_json::to_vec(&entry)?)
    }

    fn generate_hash(&self, entry: &[u8]) -> Result<OperationId> {
        if entry.is_empty() {
            return Err(SdkError::Encoding("Cannot hash an empty entry".to_string()));
        }
        Ok(OperationId::new(hash_bytes(entry)))
    }
}

// =============================================================================
// Node
// =============================================================================

#[derive(Debug, Clone)]
struct LogState {
    log_id: u64,
    seq_num: u64,
    last_hash: String,
}

#[derive(Debug, Default)]
struct NodeState {
    /// Log per author and document
    logs: HashMap<(PublicKey, DocumentId), LogState>,
    /// Number of logs opened per author
    log_counts: HashMap<PublicKey, u64>,
    /// Document each published operation belongs to
    documents: HashMap<OperationId, DocumentId>,
    /// Entries in publish order
    published: Vec<MockEntry>,
}

impl NodeState {
    fn document_of(&self, view_id: &DocumentViewId) -> std::result::Result<DocumentId, ClientError> {
        view_id
            .iter()
            .find_map(|id| self.documents.get(id).cloned())
            .ok_or_else(|| ClientError::GraphQl(format!("Document view {} not found", view_id)))
    }

    fn next_on(&self, public_key: &PublicKey, document_id: &DocumentId) -> EntryArgs {
        match self.logs.get(&(public_key.clone(), document_id.clone())) {
            Some(log) => EntryArgs {
                log_id: log.log_id,
                seq_num: log.seq_num + 1,
                backlink: Some(log.last_hash.clone()),
                skiplink: None,
            },
            None => self.fresh_log(public_key),
        }
    }

    fn fresh_log(&self, public_key: &PublicKey) -> EntryArgs {
        EntryArgs::first(self.log_counts.get(public_key).copied().unwrap_or(0))
    }
}

/// Scripted node keeping author logs in memory.
///
/// Every document gets its own log per author. Call counters let tests
/// check whether a request reached the node at all.
#[derive(Debug)]
pub struct MockNode {
    endpoint: String,
    available: AtomicBool,
    state: Mutex<NodeState>,
    next_args_calls: AtomicU32,
    publish_calls: AtomicU32,
}

impl MockNode {
    pub fn new() -> Self {
        Self {
            endpoint: "mock://node".to_string(),
            available: AtomicBool::new(true),
            state: Mutex::new(NodeState::default()),
            next_args_calls: AtomicU32::new(0),
            publish_calls: AtomicU32::new(0),
        }
    }

    /// When unavailable every request fails with a 503.
    pub fn with_available(self, available: bool) -> Self {
        self.set_available(available);
        self
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn next_args_calls(&self) -> u32 {
        self.next_args_calls.load(Ordering::SeqCst)
    }

    pub fn publish_calls(&self) -> u32 {
        self.publish_calls.load(Ordering::SeqCst)
    }

    pub fn reset_call_counts(&self) {
        self.next_args_calls.store(0, Ordering::SeqCst);
        self.publish_calls.store(0, Ordering::SeqCst);
    }

    /// Entries accepted so far, in publish order
    pub fn published(&self) -> Vec<MockEntry> {
        self.lock_state()
            .map(|state| state.published.clone())
            .unwrap_or_default()
    }

    fn check_available(&self) -> std::result::Result<(), ClientError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ClientError::Server {
                status: 503,
                message: "Mock node disabled".to_string(),
            })
        }
    }

    fn lock_state(&self) -> std::result::Result<std::sync::MutexGuard<'_, NodeState>, ClientError> {
        self.state
            .lock()
            .map_err(|_| ClientError::GraphQl("Mock node state poisoned".to_string()))
    }
}

impl Default for MockNode {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(message: String) -> ClientError {
    ClientError::GraphQl(message)
}

#[async_trait]
impl NodeApi for MockNode {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn next_args(
        &self,
        public_key: &PublicKey,
        view_id: Option<&DocumentViewId>,
    ) -> std::result::Result<EntryArgs, ClientError> {
        self.next_args_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let state = self.lock_state()?;
        match view_id {
            None => Ok(state.fresh_log(public_key)),
            Some(view_id) => {
                let document_id = state.document_of(view_id)?;
                Ok(state.next_on(public_key, &document_id))
            }
        }
    }

    async fn publish(
        &self,
        entry: &str,
        operation: &str,
    ) -> std::result::Result<EntryArgs, ClientError> {
        self.publish_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let entry_bytes = hex::decode(entry).map_err(|e| invalid(format!("Invalid entry hex: {}", e)))?;
        let operation_bytes =
            hex::decode(operation).map_err(|e| invalid(format!("Invalid operation hex: {}", e)))?;
        let decoded: MockEntry = serde_json::from_slice(&entry_bytes)?;
        let decoded_operation: Operation = serde_json::from_slice(&operation_bytes)?;

        if decoded.payload_hash != hash_bytes(&operation_bytes) {
            return Err(invalid("Operation does not match entry payload".to_string()));
        }

        let entry_hash = hash_bytes(&entry_bytes);
        let mut state = self.lock_state()?;

        let document_id = match (decoded_operation.action(), decoded_operation.previous()) {
            (Action::Create, _) => DocumentId::new(entry_hash.clone()),
            (_, Some(previous)) => state.document_of(previous)?,
            (_, None) => return Err(invalid("Operation is missing `previous`".to_string())),
        };

        let expected = if decoded_operation.action() == Action::Create {
            state.fresh_log(&decoded.public_key)
        } else {
            state.next_on(&decoded.public_key, &document_id)
        };
        if decoded.log_id != expected.log_id || decoded.seq_num != expected.seq_num {
            return Err(invalid(format!(
                "Expected log {} seq {}, got log {} seq {}",
                expected.log_id, expected.seq_num, decoded.log_id, decoded.seq_num
            )));
        }

        if expected.is_first() {
            *state.log_counts.entry(decoded.public_key.clone()).or_insert(0) += 1;
        }
        state.logs.insert(
            (decoded.public_key.clone(), document_id.clone()),
            LogState {
                log_id: decoded.log_id,
                seq_num: decoded.seq_num,
                last_hash: entry_hash.clone(),
            },
        );
        state
            .documents
            .insert(OperationId::new(entry_hash.clone()), document_id);
        state.published.push(decoded.clone());

        Ok(EntryArgs {
            log_id: decoded.log_id,
            seq_num: decoded.seq_num + 1,
            backlink: Some(entry_hash),
            skiplink: None,
        })
    }
}
