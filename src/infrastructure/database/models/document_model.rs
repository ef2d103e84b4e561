use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Document as DomainDocument;
use crate::domain::value_objects::{DocumentKind, DocumentMetadata, FileHash, ProcessingStatus};
use crate::infrastructure::database::schema::documents;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentModel {
    pub id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub kind: String,
    pub file_hash: String,
    pub metadata: serde_json::Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocumentModel {
    pub id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub kind: String,
    pub file_hash: String,
    pub metadata: serde_json::Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&DomainDocument> for NewDocumentModel {
    fn from(document: &DomainDocument) -> Self {
        Self {
            id: document.id(),
            file_name: document.file_name().to_string(),
            file_path: document.file_path().to_string(),
            file_size: document.file_size(),
            kind: document.kind().as_str().to_string(),
            file_hash: document.file_hash().as_str().to_string(),
            metadata: document.metadata().to_json(),
            status: document.processing_status().as_str().to_string(),
            created_at: document.created_at(),
            updated_at: document.updated_at(),
        }
    }
}

impl TryFrom<DocumentModel> for DomainDocument {
    type Error = String;

    fn try_from(model: DocumentModel) -> Result<Self, Self::Error> {
        Ok(DomainDocument::restore(
            model.id,
            model.file_name,
            model.file_path,
            model.file_size,
            DocumentKind::parse(&model.kind)?,
            FileHash::parse(&model.file_hash)?,
            DocumentMetadata::from_json(model.metadata)?,
            ProcessingStatus::parse(&model.status)?,
            model.created_at,
            model.updated_at,
        ))
    }
}
