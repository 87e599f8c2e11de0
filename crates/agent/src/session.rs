//! In-memory conversation session store
//!
//! Process-lifetime store keyed by an opaque session id. Sessions are
//! created on first touch and never destroyed. Concurrent appends to the
//! same id are last-writer-wins, acceptable for best-effort chat context.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use car_advisor_core::{Result, SessionStore, Turn};

pub struct InMemorySessionStore {
    max_turns: usize,
    sessions: RwLock<HashMap<String, VecDeque<Turn>>>,
}

impl InMemorySessionStore {
    pub fn new(max_turns: usize) -> Self {
        Self {
            max_turns,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn append(&self, session_id: &str, turns: Vec<Turn>) -> Result<()> {
        let mut sessions = self.sessions.write();
        let history = sessions.entry(session_id.to_string()).or_default();
        for turn in turns {
            history.push_back(turn);
        }
        while history.len() > self.max_turns {
            history.pop_front();
        }
        debug!(session_id, turns = history.len(), "session updated");
        Ok(())
    }

    async fn read(&self, session_id: &str) -> Result<Vec<Turn>> {
        Ok(self
            .sessions
            .read()
            .get(session_id)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_session_reads_empty() {
        let store = InMemorySessionStore::new(4);
        assert!(store.read("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_then_read() {
        let store = InMemorySessionStore::new(4);
        store
            .append(
                "s1",
                vec![Turn::user("hello"), Turn::assistant("hi there")],
            )
            .await
            .unwrap();

        let turns = store.read("s1").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].content, "hello");
        assert_eq!(turns[1].content, "hi there");
    }

    #[tokio::test]
    async fn test_truncates_oldest_first() {
        let store = InMemorySessionStore::new(3);
        for i in 0..5 {
            store
                .append("s1", vec![Turn::user(format!("turn {i}"))])
                .await
                .unwrap();
        }

        let turns = store.read("s1").await.unwrap();
        assert_eq!(turns.len(), 3);
        let contents: Vec<&str> = turns.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["turn 2", "turn 3", "turn 4"]);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = InMemorySessionStore::new(4);
        store.append("a", vec![Turn::user("for a")]).await.unwrap();
        store.append("b", vec![Turn::user("for b")]).await.unwrap();

        assert_eq!(store.session_count(), 2);
        assert_eq!(store.read("a").await.unwrap()[0].content, "for a");
        assert_eq!(store.read("b").await.unwrap()[0].content, "for b");
    }
}
