use async_trait::async_trait;
use lopdf::{Dictionary, Document, Object};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedContent, ExtractedPage,
};
use crate::domain::value_objects::{DocumentKind, DocumentMetadata};

/// Extracts text page by page; page numbers are 1-based.
pub struct PdfExtractor {
    password: String,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self {
            password: String::new(),
        }
    }

    fn extract_from_bytes(&self, data: &[u8]) -> Result<ExtractedContent, DocumentExtractionError> {
        let mut doc = Document::load_mem(data)
            .map_err(|e| DocumentExtractionError::CorruptedFile(e.to_string()))?;

        if doc.is_encrypted() {
            doc.decrypt(&self.password).map_err(|_e| {
                DocumentExtractionError::ExtractionFailed(
                    "Failed to decrypt PDF - invalid password".to_string(),
                )
            })?;
        }

        let page_numbers: Vec<u32> = doc.get_pages().into_keys().collect();
        if page_numbers.is_empty() {
            return Err(DocumentExtractionError::CorruptedFile(
                "PDF has no pages".to_string(),
            ));
        }

        let extracted: Vec<Result<ExtractedPage, String>> = page_numbers
            .into_par_iter()
            .map(|page_num| {
                let text = doc.extract_text(&[page_num]).map_err(|e| {
                    format!("Failed to extract text from page {}: {}", page_num, e)
                })?;

                let lines: Vec<&str> = text
                    .split('\n')
                    .map(str::trim_end)
                    .filter(|line| !line.is_empty())
                    .collect();

                Ok(ExtractedPage {
                    page_number: Some(page_num as i32),
                    text: lines.join("\n"),
                })
            })
            .collect();

        let mut metadata = Self::read_info(&doc);
        metadata.page_count = Some(extracted.len() as i32);

        let mut pages = Vec::with_capacity(extracted.len());
        for result in extracted {
            match result {
                Ok(page) => pages.push(page),
                Err(e) => metadata.extraction_errors.push(e),
            }
        }

        if pages.is_empty() {
            return Err(DocumentExtractionError::ExtractionFailed(format!(
                "No page could be read: {}",
                metadata.extraction_errors.join("; ")
            )));
        }

        Ok(ExtractedContent { pages, metadata })
    }

    fn read_info(doc: &Document) -> DocumentMetadata {
        let mut metadata = DocumentMetadata::new();

        let Some(info) = Self::info_dictionary(doc) else {
            return metadata;
        };

        metadata.title = Self::text_entry(info, b"Title");
        metadata.author = Self::text_entry(info, b"Author");
        metadata
    }

    fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
        match doc.trailer.get(b"Info").ok()? {
            Object::Reference(id) => doc.get_dictionary(*id).ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    fn text_entry(dict: &Dictionary, key: &[u8]) -> Option<String> {
        let bytes = dict.get(key).ok()?.as_str().ok()?;
        let text = decode_pdf_string(bytes);
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// PDF text strings are UTF-16BE when they start with a BOM, otherwise byte text.
fn decode_pdf_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
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

        let bytes = data.to_vec();
        let extractor = PdfExtractor {
            password: self.password.clone(),
        };

        tokio::task::spawn_blocking(move || extractor.extract_from_bytes(&bytes))
            .await
            .map_err(|e| DocumentExtractionError::ExtractionFailed(e.to_string()))?
    }

    fn can_extract(&self, kind: DocumentKind) -> bool {
        kind == DocumentKind::Pdf
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Stream, dictionary};

    /// Builds a PDF with one page per entry of `pages`.
    pub(crate) fn sample_pdf(pages: &[&str], title: Option<&str>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if let Some(title) = title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(title),
            });
            doc.trailer.set("Info", info_id);
        }

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[tokio::test]
    async fn test_pages_are_numbered_from_one() {
        let data = sample_pdf(&["Declarations page", "Exclusions apply"], None);

        let content = PdfExtractor::new()
            .extract(&data, DocumentKind::Pdf)
            .await
            .unwrap();

        assert_eq!(content.pages.len(), 2);
        assert_eq!(content.pages[0].page_number, Some(1));
        assert_eq!(content.pages[1].page_number, Some(2));
        assert!(content.pages[0].text.contains("Declarations"));
        assert!(content.pages[1].text.contains("Exclusions"));
        assert_eq!(content.metadata.page_count, Some(2));
    }

    #[tokio::test]
    async fn test_reads_title() {
        let data = sample_pdf(&["Coverage"], Some("Homeowners Policy"));

        let content = PdfExtractor::new()
            .extract(&data, DocumentKind::Pdf)
            .await
            .unwrap();

        assert_eq!(content.metadata.title.as_deref(), Some("Homeowners Policy"));
    }

    #[tokio::test]
    async fn test_garbage_is_corrupted() {
        let result = PdfExtractor::new()
            .extract(b"definitely not a pdf", DocumentKind::Pdf)
            .await;

        assert!(matches!(result, Err(DocumentExtractionError::CorruptedFile(_))));
    }

    #[tokio::test]
    async fn test_rejects_other_kinds() {
        let result = PdfExtractor::new()
            .extract(b"text", DocumentKind::PlainText)
            .await;

        assert!(matches!(
            result,
            Err(DocumentExtractionError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_decode_utf16_string() {
        let bytes = [0xFE, 0xFF, 0x00, 0x41, 0x00, 0x75, 0x00, 0x74, 0x00, 0x6F];
        assert_eq!(decode_pdf_string(&bytes), "Auto");
        assert_eq!(decode_pdf_string(b"Plain"), "Plain");
    }
}
