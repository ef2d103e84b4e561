use std::sync::Arc;

use crate::domain::entities::Document;
use crate::domain::repositories::{DocumentRepository, document_repository::DocumentRepositoryError};

#[derive(Debug, thiserror::Error)]
pub enum ListDocumentsError {
    #[error("Repository error: {0}")]
    RepositoryError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<DocumentRepositoryError> for ListDocumentsError {
    fn from(error: DocumentRepositoryError) -> Self {
        ListDocumentsError::RepositoryError(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ListDocumentsRequest {
    pub skip: i64,
    pub limit: i64,
}

#[derive(Debug, Clone)]
pub struct ListDocumentsResponse {
    pub documents: Vec<Document>,
    pub total_count: i64,
    pub skip: i64,
    pub limit: i64,
}

pub struct ListDocumentsUseCase {
    document_repository: Arc<dyn DocumentRepository>,
}

impl ListDocumentsUseCase {
    pub fn new(document_repository: Arc<dyn DocumentRepository>) -> Self {
        Self {
            document_repository,
        }
    }

    pub async fn execute(
        &self,
        request: ListDocumentsRequest,
    ) -> Result<ListDocumentsResponse, ListDocumentsError> {
        if request.skip < 0 {
            return Err(ListDocumentsError::ValidationError(
                "Skip cannot be negative".to_string(),
            ));
        }

        if request.limit <= 0 || request.limit > 1000 {
            return Err(ListDocumentsError::ValidationError(
                "Limit must be between 1 and 1000".to_string(),
            ));
        }

        let documents = self
            .document_repository
            .find_all(request.skip, request.limit)
            .await?;
        let total_count = self.document_repository.count().await?;

        Ok(ListDocumentsResponse {
            documents,
            total_count,
            skip: request.skip,
            limit: request.limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestHarness;

    #[tokio::test]
    async fn test_pagination() {
        let harness = TestHarness::new();
        harness
            .index_texts(&[("a.txt", "Alpha."), ("b.txt", "Beta."), ("c.txt", "Gamma.")])
            .await;

        let page = harness
            .list_documents
            .execute(ListDocumentsRequest { skip: 1, limit: 1 })
            .await
            .unwrap();

        assert_eq!(page.total_count, 3);
        assert_eq!(page.documents.len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_bad_paging() {
        let harness = TestHarness::new();

        for (skip, limit) in [(-1, 10), (0, 0), (0, 1001)] {
            assert!(matches!(
                harness
                    .list_documents
                    .execute(ListDocumentsRequest { skip, limit })
                    .await,
                Err(ListDocumentsError::ValidationError(_))
            ));
        }
    }
}
