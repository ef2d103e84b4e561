use async_trait::async_trait;

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedContent, ExtractedPage,
};
use crate::domain::value_objects::{DocumentKind, DocumentMetadata};

/// Reads the whole file as one page of UTF-8 text; invalid bytes are replaced.
#[derive(Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentExtractor for PlainTextExtractor {
    async fn extract(
        &self,
        data: &[u8],
        kind: DocumentKind,
    ) -> Result<ExtractedContent, DocumentExtractionError> {
        if !self.can_extract(kind) {
            return Err(DocumentExtractionError::UnsupportedFormat(
                kind.content_type().to_string(),
            ));
        }

        let text = String::from_utf8_lossy(data);
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text).to_string();

        Ok(ExtractedContent {
            pages: vec![ExtractedPage {
                page_number: None,
                text,
            }],
            metadata: DocumentMetadata::new(),
        })
    }

    fn can_extract(&self, kind: DocumentKind) -> bool {
        kind == DocumentKind::PlainText
    }
}
