//! Operations and the builder that turns them into publishable payloads

use serde::{Deserialize, Serialize};
use shirokuma_client::EntryArgs;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

use crate::error::{Result, SdkError};
use crate::traits::{Encoder, KeyPair};
use crate::types::{DocumentViewId, Fields, OperationId, SchemaId};

/// Operation format version understood by the node
pub const OPERATION_VERSION: u8 = 1;

/// What an operation does to its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A create, update or delete against a document following `schema_id`.
///
/// Constructed only through [`Operation::create`], [`Operation::update`] and
/// [`Operation::delete`], which reject a missing `fields` or `previous`.
/// Creates never carry `previous`; updates and deletes always do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    version: u8,
    action: Action,
    schema_id: SchemaId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    previous: Option<DocumentViewId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    fields: Option<Fields>,
}

impl Operation {
    pub fn create(schema_id: SchemaId, fields: Fields) -> Result<Self> {
        require_fields(&fields)?;
        Ok(Self {
            version: OPERATION_VERSION,
            action: Action::Create,
            schema_id,
            previous: None,
            fields: Some(fields),
        })
    }

    pub fn update(schema_id: SchemaId, previous: DocumentViewId, fields: Fields) -> Result<Self> {
        require_previous(&previous)?;
        require_fields(&fields)?;
        Ok(Self {
            version: OPERATION_VERSION,
            action: Action::Update,
            schema_id,
            previous: Some(previous),
            fields: Some(fields),
        })
    }

    pub fn delete(schema_id: SchemaId, previous: DocumentViewId) -> Result<Self> {
        require_previous(&previous)?;
        Ok(Self {
            version: OPERATION_VERSION,
            action: Action::Delete,
            schema_id,
            previous: Some(previous),
            fields: None,
        })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn schema_id(&self) -> &SchemaId {
        &self.schema_id
    }

    pub fn previous(&self) -> Option<&DocumentViewId> {
        self.previous.as_ref()
    }

    pub fn fields(&self) -> Option<&Fields> {
        self.fields.as_ref()
    }
}

pub(crate) fn require_fields(fields: &Fields) -> Result<()> {
    if fields.is_empty() {
        return Err(SdkError::InvalidArgument(
            "Operation fields must be provided".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn require_previous(previous: &DocumentViewId) -> Result<()> {
    if previous.is_empty() {
        return Err(SdkError::InvalidArgument(
            "Previous view id must be provided".to_string(),
        ));
    }
    Ok(())
}

/// Hex-encoded signed entry and operation, ready for the `publish` mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishPayload {
    pub entry: String,
    pub operation: String,
}

/// Encodes operations and signs the entries that carry them.
///
/// Holds no state besides the encoder; the same inputs give the same payload.
#[derive(Clone)]
pub struct OperationBuilder {
    encoder: Arc<dyn Encoder>,
}

impl OperationBuilder {
    pub fn new(encoder: Arc<dyn Encoder>) -> Self {
        Self { encoder }
    }

    /// Encode `operation` and sign an entry for it at the position `args`
    /// describes.
    pub fn build(
        &self,
        operation: &Operation,
        args: &EntryArgs,
        key_pair: &dyn KeyPair,
    ) -> Result<PublishPayload> {
        let operation_bytes = self.encoder.encode_operation(operation)?;
        let entry_bytes = self
            .encoder
            .sign_and_encode_entry(args, &operation_bytes, key_pair)?;

        trace!(
            action = %operation.action(),
            log_id = args.log_id,
            seq_num = args.seq_num,
            "signed entry"
        );

        Ok(PublishPayload {
            entry: hex::encode(entry_bytes),
            operation: hex::encode(operation_bytes),
        })
    }

    /// Operation id of a hex-encoded signed entry
    pub fn hash_entry(&self, entry: &str) -> Result<OperationId> {
        let bytes = hex::decode(entry)?;
        self.encoder.generate_hash(&bytes)
    }
}

impl fmt::Debug for OperationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationBuilder").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Ed25519KeyPair;
    use crate::mock::MockEncoder;

    fn schema() -> SchemaId {
        SchemaId::from("chat_0020c65567ae37efea293e34a9c7d13f8f2bf23dbdc3b5c7b9ab46293111c48fc78b")
    }

    #[test]
    fn test_create_requires_fields() {
        let err = Operation::create(schema(), Fields::new()).unwrap_err();
        assert!(matches!(err, SdkError::InvalidArgument(_)));
    }

    #[test]
    fn test_update_and_delete_require_previous() {
        let fields = Fields::new().with("message", "hi");

        let err = Operation::update(schema(), DocumentViewId::default(), fields).unwrap_err();
        assert!(matches!(err, SdkError::InvalidArgument(_)));

        let err = Operation::delete(schema(), DocumentViewId::default()).unwrap_err();
        assert!(matches!(err, SdkError::InvalidArgument(_)));
    }

    #[test]
    fn test_operation_shape() {
        let create = Operation::create(schema(), Fields::new().with("message", "hi")).unwrap();
        assert_eq!(create.action(), Action::Create);
        assert!(create.previous().is_none());

        let delete = Operation::delete(schema(), DocumentViewId::from("0020aa")).unwrap();
        assert!(delete.fields().is_none());

        let json = serde_json::to_value(&delete).unwrap();
        assert_eq!(json["action"], "delete");
        assert_eq!(json["schemaId"], schema().as_str());
        assert_eq!(json["previous"], "0020aa");
        assert!(json.get("fields").is_none());
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = OperationBuilder::new(Arc::new(MockEncoder::new()));
        let key_pair = Ed25519KeyPair::from_private_key_hex(
            "4c21b14f8b0a2e4fbd6b4f1b7b53a4a6a1c8b9b2f2c5a1c0e2d3f4a5b6c7d8e9",
        )
        .unwrap();
        let operation = Operation::create(schema(), Fields::new().with("message", "1")).unwrap();
        let args = EntryArgs::first(0);

        let first = builder.build(&operation, &args, &key_pair).unwrap();
        let second = builder.build(&operation, &args, &key_pair).unwrap();

        assert_eq!(first, second);
        assert!(hex::decode(&first.entry).is_ok());
        assert_eq!(
            builder.hash_entry(&first.entry).unwrap(),
            builder.hash_entry(&second.entry).unwrap()
        );
    }

    #[test]
    fn test_hash_entry_rejects_bad_hex() {
        let builder = OperationBuilder::new(Arc::new(MockEncoder::new()));
        let err = builder.hash_entry("not hex").unwrap_err();
        assert!(matches!(err, SdkError::Encoding(_)));
    }
}
