use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::SourceReference;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentChunk {
    id: Uuid,
    document_id: Uuid,
    source: String,
    chunk_text: String,
    chunk_index: i32,
    page_number: Option<i32>,
    created_at: DateTime<Utc>,
}

impl ContentChunk {
    pub fn new(
        document_id: Uuid,
        source: String,
        chunk_text: String,
        chunk_index: i32,
        page_number: Option<i32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            source,
            chunk_text,
            chunk_index,
            page_number,
            created_at: Utc::now(),
        }
    }

    pub fn restore(
        id: Uuid,
        document_id: Uuid,
        source: String,
        chunk_text: String,
        chunk_index: i32,
        page_number: Option<i32>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            document_id,
            source,
            chunk_text,
            chunk_index,
            page_number,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn chunk_text(&self) -> &str {
        &self.chunk_text
    }

    pub fn chunk_index(&self) -> i32 {
        self.chunk_index
    }

    pub fn page_number(&self) -> Option<i32> {
        self.page_number
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_empty(&self) -> bool {
        self.chunk_text.trim().is_empty()
    }

    pub fn character_count(&self) -> usize {
        self.chunk_text.chars().count()
    }

    pub fn source_reference(&self) -> SourceReference {
        SourceReference::new(self.source.clone(), self.page_number)
    }
}
