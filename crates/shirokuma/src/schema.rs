//! Schema handle bound to a session

use std::fmt;
use std::sync::Arc;

use crate::document::Document;
use crate::error::Result;
use crate::session::{Options, Session};
use crate::traits::KeyPair;
use crate::types::{DocumentViewId, Fields, SchemaId};

/// Publishes documents of one schema through a shared session.
#[derive(Clone)]
pub struct Schema {
    schema_id: SchemaId,
    session: Arc<Session>,
    key_pair: Option<Arc<dyn KeyPair>>,
}

impl Schema {
    pub fn new(schema_id: SchemaId, session: Arc<Session>) -> Self {
        Self {
            schema_id,
            session,
            key_pair: None,
        }
    }

    /// Sign with `key_pair` instead of the session default.
    pub fn with_key_pair(mut self, key_pair: Arc<dyn KeyPair>) -> Self {
        self.key_pair = Some(key_pair);
        self
    }

    pub fn schema_id(&self) -> &SchemaId {
        &self.schema_id
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub(crate) fn options(&self) -> Options {
        Options {
            key_pair: self.key_pair.clone(),
            schema_id: Some(self.schema_id.clone()),
        }
    }

    /// Create a document; its id and first view id are the create operation's id.
    pub async fn create(&self, fields: Fields) -> Result<Document> {
        let document_id = self
            .session
            .create_operation(fields.clone(), &self.options())
            .await?;

        Ok(Document::new(
            self.clone(),
            document_id.clone(),
            DocumentViewId::from(document_id),
            fields,
        ))
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("schema_id", &self.schema_id)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
