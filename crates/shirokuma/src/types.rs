//! Identifiers and field values shared across the SDK

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Public key of an author, hex-encoded
    PublicKey
);

string_id!(
    /// Identifier of the schema a document follows
    SchemaId
);

string_id!(
    /// Hash of a signed entry, identifying the operation it carries
    OperationId
);

/// A document is identified by the id of its `create` operation
pub type DocumentId = OperationId;

impl SchemaId {
    /// System schema describing application schemas
    pub const SCHEMA_DEFINITION_V1: &'static str = "schema_definition_v1";
    /// System schema describing a single schema field
    pub const SCHEMA_FIELD_DEFINITION_V1: &'static str = "schema_field_definition_v1";

    /// Whether this is one of the fixed system schemas
    pub fn is_system(&self) -> bool {
        matches!(
            self.as_str(),
            Self::SCHEMA_DEFINITION_V1 | Self::SCHEMA_FIELD_DEFINITION_V1
        )
    }
}

/// Separator between operation ids in the serialized view id
const VIEW_ID_SEPARATOR: char = '_';

/// Identifies one (possibly merged) state of a document.
///
/// Holds one operation id for a linear history and several when concurrent
/// branches are merged. Ids are kept sorted and unique, so the serialized
/// form is canonical and can be used as a cache key or query variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DocumentViewId(Vec<OperationId>);

impl DocumentViewId {
    pub fn new(ids: impl IntoIterator<Item = OperationId>) -> Self {
        let mut ids: Vec<OperationId> = ids.into_iter().collect();
        ids.sort();
        ids.dedup();
        Self(ids)
    }

    /// Parse the underscore-joined form
    pub fn parse(value: &str) -> Self {
        Self::new(
            value
                .split(VIEW_ID_SEPARATOR)
                .filter(|id| !id.is_empty())
                .map(OperationId::from),
        )
    }

    pub fn operation_ids(&self) -> &[OperationId] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperationId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this view points at a merge of concurrent branches
    pub fn is_merge(&self) -> bool {
        self.0.len() > 1
    }
}

impl fmt::Display for DocumentViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", VIEW_ID_SEPARATOR)?;
            }
            f.write_str(id.as_str())?;
        }
        Ok(())
    }
}

impl From<OperationId> for DocumentViewId {
    fn from(id: OperationId) -> Self {
        Self(vec![id])
    }
}

impl From<&str> for DocumentViewId {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl FromIterator<OperationId> for DocumentViewId {
    fn from_iter<I: IntoIterator<Item = OperationId>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl Serialize for DocumentViewId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentViewId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// Value of a single operation field.
///
/// Values are typed but not checked against the schema; that is the
/// node's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Relation(DocumentId),
    PinnedRelation(DocumentViewId),
    RelationList(Vec<DocumentId>),
    PinnedRelationList(Vec<DocumentViewId>),
}

impl FieldValue {
    /// Type name as used by the node
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "str",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Relation(_) => "relation",
            Self::PinnedRelation(_) => "pinned_relation",
            Self::RelationList(_) => "relation_list",
            Self::PinnedRelationList(_) => "pinned_relation_list",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Operation fields keyed by name, kept in name order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, FieldValue>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overwrite fields present in `other`, keep the rest
    pub fn merge(&mut self, other: Fields) {
        self.0.extend(other.0);
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
