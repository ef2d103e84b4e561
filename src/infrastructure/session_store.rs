use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::domain::entities::ChatSession;
use crate::domain::repositories::ChatSessionRepository;
use crate::domain::repositories::chat_session_repository::ChatSessionRepositoryError;
use crate::domain::value_objects::SourceReference;

/// Conversation memory lives for the lifetime of the process.
///
/// Sessions idle for longer than `idle_ttl` are dropped, and once
/// `max_sessions` is reached the least recently used session makes room.
pub struct InMemoryChatSessionRepository {
    sessions: RwLock<HashMap<Uuid, ChatSession>>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl InMemoryChatSessionRepository {
    pub fn new() -> Self {
        Self::with_limits(&SessionConfig::default())
    }

    pub fn with_limits(config: &SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl: Duration::minutes(config.idle_ttl_minutes),
            max_sessions: config.max_sessions.max(1),
        }
    }

    fn is_expired(&self, session: &ChatSession, now: DateTime<Utc>) -> bool {
        now - session.updated_at() > self.idle_ttl
    }

    /// Drops idle sessions, then the least recently used ones until `room` more fit.
    fn evict(
        &self,
        sessions: &mut HashMap<Uuid, ChatSession>,
        now: DateTime<Utc>,
        room: usize,
    ) -> usize {
        let before = sessions.len();
        sessions.retain(|_, session| !self.is_expired(session, now));

        let limit = self.max_sessions.saturating_sub(room);
        if sessions.len() > limit {
            let mut by_age: Vec<(DateTime<Utc>, Uuid)> = sessions
                .values()
                .map(|session| (session.updated_at(), session.id()))
                .collect();
            by_age.sort();

            let excess = sessions.len() - limit;
            for (_, id) in by_age.into_iter().take(excess) {
                sessions.remove(&id);
            }
        }

        before - sessions.len()
    }
}

impl Default for InMemoryChatSessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatSessionRepository for InMemoryChatSessionRepository {
    async fn save(&self, session: &ChatSession) -> Result<(), ChatSessionRepositoryError> {
        let mut sessions = self.sessions.write().await;

        if !sessions.contains_key(&session.id()) {
            let evicted = self.evict(&mut sessions, Utc::now(), 1);
            if evicted > 0 {
                tracing::debug!(evicted, "Evicted chat sessions");
            }
        }

        sessions.insert(session.id(), session.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<ChatSession>, ChatSessionRepositoryError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(&id)
            .filter(|session| !self.is_expired(session, Utc::now()))
            .cloned())
    }

    async fn append_exchange(
        &self,
        id: Uuid,
        generation: u64,
        question: &str,
        answer: &str,
        sources: Vec<SourceReference>,
    ) -> Result<bool, ChatSessionRepositoryError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or(ChatSessionRepositoryError::NotFound(id))?;

        if session.generation() != generation {
            return Ok(false);
        }

        session.record_exchange(question, answer, sources);
        Ok(true)
    }

    async fn clear_all_history(&self) -> Result<usize, ChatSessionRepositoryError> {
        let mut sessions = self.sessions.write().await;
        let mut cleared = 0;

        for session in sessions.values_mut() {
            if session.has_history() {
                cleared += 1;
            }
            session.clear();
        }

        Ok(cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(max_sessions: usize, idle_ttl_minutes: i64) -> SessionConfig {
        SessionConfig {
            max_sessions,
            idle_ttl_minutes,
        }
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repository = InMemoryChatSessionRepository::new();
        let mut session = ChatSession::new();
        repository.save(&session).await.unwrap();

        session.record_exchange("Is flood covered?", "No.", Vec::new());
        repository.save(&session).await.unwrap();

        let found = repository.find_by_id(session.id()).await.unwrap().unwrap();
        assert_eq!(found.messages().len(), 2);
        assert!(repository.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_all_history_keeps_sessions() {
        let repository = InMemoryChatSessionRepository::new();

        let mut talked = ChatSession::new();
        talked.record_exchange("q", "a", Vec::new());
        let idle = ChatSession::new();
        repository.save(&talked).await.unwrap();
        repository.save(&idle).await.unwrap();

        assert_eq!(repository.clear_all_history().await.unwrap(), 1);

        let found = repository.find_by_id(talked.id()).await.unwrap().unwrap();
        assert!(!found.has_history());
        assert!(repository.find_by_id(idle.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_append_exchange_in_place() {
        let repository = InMemoryChatSessionRepository::new();
        let session = ChatSession::new();
        repository.save(&session).await.unwrap();

        let generation = session.generation();
        for (question, answer) in [("q1", "a1"), ("q2", "a2")] {
            let appended = repository
                .append_exchange(session.id(), generation, question, answer, Vec::new())
                .await
                .unwrap();
            assert!(appended);
        }

        let found = repository.find_by_id(session.id()).await.unwrap().unwrap();
        assert_eq!(found.messages().len(), 4);
    }

    #[tokio::test]
    async fn test_append_after_clear_is_dropped() {
        let repository = InMemoryChatSessionRepository::new();
        let session = ChatSession::new();
        repository.save(&session).await.unwrap();

        let generation = session.generation();
        repository.clear_all_history().await.unwrap();

        let appended = repository
            .append_exchange(session.id(), generation, "q", "a", Vec::new())
            .await
            .unwrap();
        assert!(!appended);

        let found = repository.find_by_id(session.id()).await.unwrap().unwrap();
        assert!(!found.has_history());

        let missing = repository
            .append_exchange(Uuid::new_v4(), 0, "q", "a", Vec::new())
            .await;
        assert!(matches!(missing, Err(ChatSessionRepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_least_recently_used_session_is_evicted() {
        let repository = InMemoryChatSessionRepository::with_limits(&limits(2, 60));

        let oldest = ChatSession::new();
        repository.save(&oldest).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let middle = ChatSession::new();
        repository.save(&middle).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let newest = ChatSession::new();
        repository.save(&newest).await.unwrap();

        assert!(repository.find_by_id(oldest.id()).await.unwrap().is_none());
        assert!(repository.find_by_id(middle.id()).await.unwrap().is_some());
        assert!(repository.find_by_id(newest.id()).await.unwrap().is_some());
        assert_eq!(repository.sessions.read().await.len(), 2);
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let repository = InMemoryChatSessionRepository::with_limits(&limits(100, 30));
        let idle = ChatSession::new();
        repository.save(&idle).await.unwrap();

        let later = Utc::now() + Duration::minutes(31);
        let mut sessions = repository.sessions.write().await;
        assert!(repository.is_expired(&sessions[&idle.id()], later));
        assert_eq!(repository.evict(&mut sessions, later, 0), 1);
        assert!(sessions.is_empty());
    }
}
