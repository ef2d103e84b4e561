use serde::{Deserialize, Serialize};

/// Where a retrieved passage came from, as cited under an answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceReference {
    pub document_name: String,
    pub page_number: Option<i32>,
}

impl SourceReference {
    pub fn new(document_name: impl Into<String>, page_number: Option<i32>) -> Self {
        Self {
            document_name: document_name.into(),
            page_number,
        }
    }
}

impl std::fmt::Display for SourceReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = if self.document_name.is_empty() {
            "Unknown"
        } else {
            &self.document_name
        };

        match self.page_number {
            Some(page) => write!(f, "{} (Page {})", name, page),
            None => f.write_str(name),
        }
    }
}

/// Renders citations the way they are shown under an answer: `a.pdf (Page 2); b.txt`.
///
/// Page numbers are the 1-based numbers a PDF viewer shows, not 0-based page
/// indices. Entries are rendered as given; answers pass their sources through
/// `unique_sources` first, so a page cited by several passages appears once.
pub fn format_sources(sources: &[SourceReference]) -> String {
    sources
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
