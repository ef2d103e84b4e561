use serde::{Deserialize, Serialize};

/// What the loader learned about a document besides its text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extraction_errors: Vec<String>,
}

impl DocumentMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_count(mut self, count: i32) -> Self {
        self.page_count = Some(count);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.page_count.is_none()
            && self.extraction_errors.is_empty()
    }

    pub fn has_extraction_errors(&self) -> bool {
        !self.extraction_errors.is_empty()
    }

    /// Fills in fields that are still unknown from `other`; errors are appended.
    pub fn merge(&mut self, other: DocumentMetadata) {
        if self.title.is_none() {
            self.title = other.title;
        }
        if self.author.is_none() {
            self.author = other.author;
        }
        if self.page_count.is_none() {
            self.page_count = other.page_count;
        }
        self.extraction_errors.extend(other.extraction_errors);
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, String> {
        serde_json::from_value(value).map_err(|e| format!("Invalid document metadata: {}", e))
    }
}
