use async_trait::async_trait;

use crate::domain::value_objects::{DocumentKind, DocumentMetadata};

#[derive(Debug, thiserror::Error)]
pub enum DocumentExtractionError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Corrupted file: {0}")]
    CorruptedFile(String),
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),
}

/// Text of one page (PDF) or of the whole file (plain text).
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPage {
    pub page_number: Option<i32>,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ExtractedContent {
    pub pages: Vec<ExtractedPage>,
    pub metadata: DocumentMetadata,
}

impl ExtractedContent {
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|page| page.text.trim().is_empty())
    }
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(
        &self,
        data: &[u8],
        kind: DocumentKind,
    ) -> Result<ExtractedContent, DocumentExtractionError>;

    fn can_extract(&self, kind: DocumentKind) -> bool;
}
