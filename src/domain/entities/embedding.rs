use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    id: Uuid,
    content_chunk_id: Uuid,
    model_name: String,
    generated_at: DateTime<Utc>,
    embedding: Vector,
}

impl Embedding {
    pub fn new(content_chunk_id: Uuid, model_name: String, embedding: Vector) -> Self {
        Self {
            id: Uuid::new_v4(),
            content_chunk_id,
            model_name,
            generated_at: Utc::now(),
            embedding,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn content_chunk_id(&self) -> Uuid {
        self.content_chunk_id
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn embedding(&self) -> &Vector {
        &self.embedding
    }

    pub fn dimension(&self) -> usize {
        self.embedding.as_slice().len()
    }
}

/// Cosine similarity of two vectors; 0.0 when either is zero or the widths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_creation() {
        let chunk_id = Uuid::new_v4();
        let embedding = Embedding::new(
            chunk_id,
            "text-embedding-ada-002".to_string(),
            Vector::from(vec![0.1, 0.2, 0.3]),
        );

        assert_eq!(embedding.content_chunk_id(), chunk_id);
        assert_eq!(embedding.model_name(), "text-embedding-ada-002");
        assert_eq!(embedding.dimension(), 3);
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }
}
