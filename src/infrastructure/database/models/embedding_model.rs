use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::entities::Embedding as DomainEmbedding;
use crate::infrastructure::database::schema::embeddings;

#[derive(Debug, Insertable)]
#[diesel(table_name = embeddings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewEmbeddingModel {
    pub id: Uuid,
    pub content_chunk_id: Uuid,
    pub model_name: String,
    pub generated_at: DateTime<Utc>,
    pub embedding: Vector,
}

impl From<&DomainEmbedding> for NewEmbeddingModel {
    fn from(embedding: &DomainEmbedding) -> Self {
        Self {
            id: embedding.id(),
            content_chunk_id: embedding.content_chunk_id(),
            model_name: embedding.model_name().to_string(),
            generated_at: embedding.generated_at(),
            embedding: embedding.embedding().clone(),
        }
    }
}
