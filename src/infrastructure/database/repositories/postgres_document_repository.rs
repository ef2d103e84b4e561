use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Document;
use crate::domain::repositories::{DocumentRepository, document_repository::DocumentRepositoryError};
use crate::infrastructure::database::models::{DocumentModel, NewDocumentModel};
use crate::infrastructure::database::schema::documents::dsl::*;
use crate::infrastructure::database::{DatabaseError, DbPool, with_connection};

pub struct PostgresDocumentRepository {
    pool: DbPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn database_error(error: DatabaseError) -> DocumentRepositoryError {
    DocumentRepositoryError::DatabaseError(error.to_string())
}

fn to_domain(model: DocumentModel) -> Result<Document, DocumentRepositoryError> {
    Document::try_from(model).map_err(DocumentRepositoryError::ValidationError)
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn save(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        let new_document = NewDocumentModel::from(document);

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(documents)
                .values(&new_document)
                .execute(conn)
        })
        .await
        .map_err(database_error)?;

        Ok(())
    }

    async fn find_by_id(&self, document_id: Uuid) -> Result<Option<Document>, DocumentRepositoryError> {
        let result = with_connection(&self.pool, move |conn| {
            documents
                .find(document_id)
                .select(DocumentModel::as_select())
                .first(conn)
                .optional()
        })
        .await
        .map_err(database_error)?;

        result.map(to_domain).transpose()
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<Document>, DocumentRepositoryError> {
        let hash = hash.to_string();

        let result = with_connection(&self.pool, move |conn| {
            documents
                .filter(file_hash.eq(hash))
                .select(DocumentModel::as_select())
                .first(conn)
                .optional()
        })
        .await
        .map_err(database_error)?;

        result.map(to_domain).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Document>, DocumentRepositoryError> {
        let name = name.to_string();

        let result = with_connection(&self.pool, move |conn| {
            documents
                .filter(file_name.eq(name))
                .select(DocumentModel::as_select())
                .first(conn)
                .optional()
        })
        .await
        .map_err(database_error)?;

        result.map(to_domain).transpose()
    }

    async fn find_all(&self, skip: i64, limit: i64) -> Result<Vec<Document>, DocumentRepositoryError> {
        let models = with_connection(&self.pool, move |conn| {
            documents
                .order(created_at.asc())
                .offset(skip)
                .limit(limit)
                .select(DocumentModel::as_select())
                .load(conn)
        })
        .await
        .map_err(database_error)?;

        models.into_iter().map(to_domain).collect()
    }

    async fn update(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        let document_id = document.id();
        let changes = NewDocumentModel::from(document);

        let updated = with_connection(&self.pool, move |conn| {
            diesel::update(documents.find(document_id))
                .set(&changes)
                .execute(conn)
        })
        .await
        .map_err(database_error)?;

        if updated == 0 {
            return Err(DocumentRepositoryError::NotFound(document_id));
        }

        Ok(())
    }

    async fn delete(&self, document_id: Uuid) -> Result<bool, DocumentRepositoryError> {
        let deleted = with_connection(&self.pool, move |conn| {
            diesel::delete(documents.find(document_id)).execute(conn)
        })
        .await
        .map_err(database_error)?;

        Ok(deleted > 0)
    }

    async fn delete_all(&self) -> Result<i64, DocumentRepositoryError> {
        let deleted = with_connection(&self.pool, |conn| diesel::delete(documents).execute(conn))
            .await
            .map_err(database_error)?;

        Ok(deleted as i64)
    }

    async fn count(&self) -> Result<i64, DocumentRepositoryError> {
        with_connection(&self.pool, |conn| documents.count().get_result(conn))
            .await
            .map_err(database_error)
    }
}
