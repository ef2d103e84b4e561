use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{ChatMessage, MessageRole};
use crate::domain::value_objects::SourceReference;

/// One question and the answer it got, as remembered by the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    id: Uuid,
    messages: Vec<ChatMessage>,
    #[serde(default)]
    generation: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            generation: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Bumped every time the history is cleared.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn record_exchange(
        &mut self,
        question: impl Into<String>,
        answer: impl Into<String>,
        sources: Vec<SourceReference>,
    ) {
        self.messages.push(ChatMessage::user(question));
        self.messages.push(ChatMessage::assistant(answer, sources));
        self.updated_at = Utc::now();
    }

    /// The last `window` completed exchanges, oldest first.
    pub fn recent_exchanges(&self, window: usize) -> Vec<Exchange> {
        let mut exchanges = Vec::new();
        let mut pending_question: Option<&str> = None;

        for message in &self.messages {
            match message.role() {
                MessageRole::User => pending_question = Some(message.content()),
                MessageRole::Assistant => {
                    if let Some(question) = pending_question.take() {
                        exchanges.push(Exchange {
                            question: question.to_string(),
                            answer: message.content().to_string(),
                        });
                    }
                }
            }
        }

        let skip = exchanges.len().saturating_sub(window);
        exchanges.split_off(skip)
    }

    pub fn has_history(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        if !self.messages.is_empty() {
            self.messages.clear();
            self.updated_at = Utc::now();
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
