use std::sync::Arc;

use crate::application::ports::EmbeddingProvider;
use crate::config::RetrievalConfig;
use crate::domain::entities::ContentChunk;
use crate::domain::entities::embedding::cosine_similarity;
use crate::domain::repositories::EmbeddingRepository;

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("Embedding error: {0}")]
    EmbeddingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

#[derive(Debug, Clone)]
pub struct RetrievedPassage {
    pub chunk: ContentChunk,
    pub similarity_score: f32,
}

pub struct RetrievalService {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    embedding_repository: Arc<dyn EmbeddingRepository>,
    config: RetrievalConfig,
}

impl RetrievalService {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        embedding_repository: Arc<dyn EmbeddingRepository>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            embedding_provider,
            embedding_repository,
            config,
        }
    }

    /// Fetches `fetch_k` nearest chunks and keeps `k` of them by MMR, in selection order.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedPassage>, RetrievalError> {
        let query_embedding = self
            .embedding_provider
            .generate_embedding(query)
            .await
            .map_err(|e| RetrievalError::EmbeddingError(e.to_string()))?;

        let candidates = self
            .embedding_repository
            .similarity_search(&query_embedding.embedding, self.config.fetch_k as i64)
            .await
            .map_err(|e| RetrievalError::RepositoryError(e.to_string()))?;

        let vectors: Vec<&[f32]> = candidates
            .iter()
            .map(|candidate| candidate.embedding.as_slice())
            .collect();

        let selected = maximal_marginal_relevance(
            query_embedding.embedding.as_slice(),
            &vectors,
            self.config.k,
            self.config.lambda,
        );

        tracing::debug!(
            candidates = candidates.len(),
            selected = selected.len(),
            "MMR re-ranking complete"
        );

        Ok(selected
            .into_iter()
            .map(|i| RetrievedPassage {
                chunk: candidates[i].chunk.clone(),
                similarity_score: candidates[i].similarity_score,
            })
            .collect())
    }
}

/// Indices of up to `k` candidates chosen by maximal marginal relevance.
///
/// The candidate closest to the query comes first; each next pick maximizes
/// `lambda * sim(query, c) - (1 - lambda) * max(sim(c, s) for s already picked)`.
/// Ties go to the earlier candidate.
pub fn maximal_marginal_relevance(
    query: &[f32],
    candidates: &[&[f32]],
    k: usize,
    lambda: f32,
) -> Vec<usize> {
    let target = k.min(candidates.len());
    if target == 0 {
        return Vec::new();
    }

    let query_similarity: Vec<f32> = candidates
        .iter()
        .map(|candidate| cosine_similarity(query, candidate))
        .collect();

    let mut first = 0;
    for (i, score) in query_similarity.iter().enumerate() {
        if *score > query_similarity[first] {
            first = i;
        }
    }

    let mut selected = vec![first];

    while selected.len() < target {
        let mut best: Option<(usize, f32)> = None;

        for (i, relevance) in query_similarity.iter().enumerate() {
            if selected.contains(&i) {
                continue;
            }

            let redundancy = selected
                .iter()
                .map(|&s| cosine_similarity(candidates[i], candidates[s]))
                .fold(f32::NEG_INFINITY, f32::max);

            let score = lambda * relevance - (1.0 - lambda) * redundancy;
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((i, score));
            }
        }

        match best {
            Some((i, _)) => selected.push(i),
            None => break,
        }
    }

    selected
}
