use async_trait::async_trait;
use std::sync::Arc;

use super::{PdfExtractor, PlainTextExtractor};
use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedContent,
};
use crate::domain::value_objects::DocumentKind;

pub struct CompositeDocumentExtractor {
    pdf_extractor: Arc<PdfExtractor>,
    text_extractor: Arc<PlainTextExtractor>,
}

impl CompositeDocumentExtractor {
    pub fn new() -> Self {
        Self {
            pdf_extractor: Arc::new(PdfExtractor::new()),
            text_extractor: Arc::new(PlainTextExtractor::new()),
        }
    }

    fn get_extractor_for_kind(&self, kind: DocumentKind) -> Option<Arc<dyn DocumentExtractor>> {
        if self.pdf_extractor.can_extract(kind) {
            Some(self.pdf_extractor.clone())
        } else if self.text_extractor.can_extract(kind) {
            Some(self.text_extractor.clone())
        } else {
            None
        }
    }
}

impl Default for CompositeDocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for CompositeDocumentExtractor {
    async fn extract(
        &self,
        data: &[u8],
        kind: DocumentKind,
    ) -> Result<ExtractedContent, DocumentExtractionError> {
        let extractor = self.get_extractor_for_kind(kind).ok_or_else(|| {
            DocumentExtractionError::UnsupportedFormat(kind.content_type().to_string())
        })?;

        extractor.extract(data, kind).await
    }

    fn can_extract(&self, kind: DocumentKind) -> bool {
        self.get_extractor_for_kind(kind).is_some()
    }
}
