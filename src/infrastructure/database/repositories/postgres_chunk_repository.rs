use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::ContentChunk;
use crate::domain::repositories::{ChunkRepository, chunk_repository::ChunkRepositoryError};
use crate::infrastructure::database::models::{ContentChunkModel, NewContentChunkModel};
use crate::infrastructure::database::schema::content_chunks::dsl::*;
use crate::infrastructure::database::{DatabaseError, DbPool, with_connection};

pub struct PostgresChunkRepository {
    pool: DbPool,
}

impl PostgresChunkRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn database_error(error: DatabaseError) -> ChunkRepositoryError {
    ChunkRepositoryError::DatabaseError(error.to_string())
}

#[async_trait]
impl ChunkRepository for PostgresChunkRepository {
    async fn save_batch(&self, chunks: &[ContentChunk]) -> Result<(), ChunkRepositoryError> {
        if chunks.is_empty() {
            return Ok(());
        }

        let new_chunks: Vec<NewContentChunkModel> =
            chunks.iter().map(NewContentChunkModel::from).collect();

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(content_chunks)
                .values(&new_chunks)
                .execute(conn)
        })
        .await
        .map_err(database_error)?;

        Ok(())
    }

    async fn find_by_document_id(
        &self,
        doc_id: Uuid,
    ) -> Result<Vec<ContentChunk>, ChunkRepositoryError> {
        let models = with_connection(&self.pool, move |conn| {
            content_chunks
                .filter(document_id.eq(doc_id))
                .order(chunk_index.asc())
                .select(ContentChunkModel::as_select())
                .load(conn)
        })
        .await
        .map_err(database_error)?;

        Ok(models.into_iter().map(ContentChunk::from).collect())
    }

    async fn count(&self) -> Result<i64, ChunkRepositoryError> {
        with_connection(&self.pool, |conn| content_chunks.count().get_result(conn))
            .await
            .map_err(database_error)
    }

    async fn delete_all(&self) -> Result<i64, ChunkRepositoryError> {
        let deleted = with_connection(&self.pool, |conn| {
            diesel::delete(content_chunks).execute(conn)
        })
        .await
        .map_err(database_error)?;

        Ok(deleted as i64)
    }
}
