//! Session store trait

use async_trait::async_trait;

use crate::{Result, Turn};

/// Keyed conversation-history store.
///
/// Sessions are created on first reference to an unseen id and live for the
/// process lifetime. Implementations enforce a maximum retained turn count,
/// discarding from the oldest end. Concurrent appends to the same id are
/// last-writer-wins; chat history is best-effort context, not a ledger.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Append turns to a session, creating it if needed
    async fn append(&self, session_id: &str, turns: Vec<Turn>) -> Result<()>;

    /// Read a session's turns in chronological order; unknown ids yield empty
    async fn read(&self, session_id: &str) -> Result<Vec<Turn>>;
}
