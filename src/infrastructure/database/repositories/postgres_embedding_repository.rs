use async_trait::async_trait;
use diesel::prelude::*;
use pgvector::{Vector, VectorExpressionMethods};

use crate::domain::entities::embedding::cosine_similarity;
use crate::domain::entities::{ContentChunk, Embedding};
use crate::domain::repositories::EmbeddingRepository;
use crate::domain::repositories::embedding_repository::{
    EmbeddingRepositoryError, SimilaritySearchResult,
};
use crate::infrastructure::database::models::{ContentChunkModel, NewEmbeddingModel};
use crate::infrastructure::database::schema::{content_chunks, embeddings};
use crate::infrastructure::database::{DatabaseError, DbPool, with_connection};

pub struct PostgresEmbeddingRepository {
    pool: DbPool,
}

impl PostgresEmbeddingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn database_error(error: DatabaseError) -> EmbeddingRepositoryError {
    EmbeddingRepositoryError::DatabaseError(error.to_string())
}

#[async_trait]
impl EmbeddingRepository for PostgresEmbeddingRepository {
    async fn save_batch(&self, batch: &[Embedding]) -> Result<(), EmbeddingRepositoryError> {
        if batch.is_empty() {
            return Ok(());
        }

        let new_embeddings: Vec<NewEmbeddingModel> =
            batch.iter().map(NewEmbeddingModel::from).collect();

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(embeddings::table)
                .values(&new_embeddings)
                .execute(conn)
        })
        .await
        .map_err(database_error)?;

        Ok(())
    }

    async fn similarity_search(
        &self,
        query_vector: &Vector,
        limit: i64,
    ) -> Result<Vec<SimilaritySearchResult>, EmbeddingRepositoryError> {
        if query_vector.as_slice().is_empty() {
            return Err(EmbeddingRepositoryError::VectorError(
                "Query vector is empty".to_string(),
            ));
        }

        let query = query_vector.clone();

        // `<=>` is pgvector's cosine distance.
        let rows: Vec<(ContentChunkModel, Vector)> = with_connection(&self.pool, move |conn| {
            embeddings::table
                .inner_join(content_chunks::table)
                .order(embeddings::embedding.cosine_distance(query))
                .limit(limit)
                .select((ContentChunkModel::as_select(), embeddings::embedding))
                .load(conn)
        })
        .await
        .map_err(database_error)?;

        Ok(rows
            .into_iter()
            .map(|(chunk, vector)| SimilaritySearchResult {
                similarity_score: cosine_similarity(query_vector.as_slice(), vector.as_slice()),
                chunk: ContentChunk::from(chunk),
                embedding: vector,
            })
            .collect())
    }

    async fn count(&self) -> Result<i64, EmbeddingRepositoryError> {
        with_connection(&self.pool, |conn| embeddings::table.count().get_result(conn))
            .await
            .map_err(database_error)
    }

    async fn delete_all(&self) -> Result<i64, EmbeddingRepositoryError> {
        let deleted = with_connection(&self.pool, |conn| {
            diesel::delete(embeddings::table).execute(conn)
        })
        .await
        .map_err(database_error)?;

        Ok(deleted as i64)
    }
}
