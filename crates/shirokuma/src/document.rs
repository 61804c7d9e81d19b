//! Local handle on a published document

use std::fmt;

use crate::error::{Result, SdkError};
use crate::schema::Schema;
use crate::types::{DocumentId, DocumentViewId, FieldValue, Fields, SchemaId};

/// A document as this client last published it.
///
/// Keeps a local copy of the fields and the latest view id. Updates merge
/// into the copy; after [`Document::delete`] the handle refuses further
/// changes. Nothing here is re-read from the node.
pub struct Document {
    schema: Schema,
    document_id: DocumentId,
    view_id: DocumentViewId,
    fields: Fields,
    deleted: bool,
}

impl Document {
    pub(crate) fn new(
        schema: Schema,
        document_id: DocumentId,
        view_id: DocumentViewId,
        fields: Fields,
    ) -> Self {
        Self {
            schema,
            document_id,
            view_id,
            fields,
            deleted: false,
        }
    }

    pub fn schema_id(&self) -> &SchemaId {
        self.schema.schema_id()
    }

    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    pub fn view_id(&self) -> &DocumentViewId {
        &self.view_id
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Value of a field in the local copy
    pub fn get(&self, name: &str) -> Result<&FieldValue> {
        self.fields
            .get(name)
            .ok_or_else(|| SdkError::FieldNotFound(name.to_string()))
    }

    /// Publish an update on top of the current view and advance to it.
    pub async fn update(&mut self, fields: Fields) -> Result<&DocumentViewId> {
        self.ensure_live()?;

        let id = self
            .schema
            .session()
            .update_operation(fields.clone(), &self.view_id, &self.schema.options())
            .await?;

        self.fields.merge(fields);
        self.view_id = DocumentViewId::from(id);
        Ok(&self.view_id)
    }

    /// Publish a deletion of the current view.
    pub async fn delete(&mut self) -> Result<&DocumentViewId> {
        self.ensure_live()?;

        let id = self
            .schema
            .session()
            .delete_operation(&self.view_id, &self.schema.options())
            .await?;

        self.deleted = true;
        self.view_id = DocumentViewId::from(id);
        Ok(&self.view_id)
    }

    fn ensure_live(&self) -> Result<()> {
        if self.deleted {
            return Err(SdkError::InvalidArgument(format!(
                "Document {} has been deleted",
                self.document_id
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("schema_id", self.schema_id())
            .field("document_id", &self.document_id)
            .field("view_id", &self.view_id)
            .field("fields", &self.fields)
            .field("deleted", &self.deleted)
            .finish()
    }
}
