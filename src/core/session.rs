//! In-memory chat sessions
//!
//! Nothing here outlives the process. Sessions the page never closes are
//! evicted once they sit idle past the configured timeout.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use crate::conversation::Conversation;

/// One browser chat session
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub conversation: Conversation,
    /// A model call is in flight; further submissions are refused
    pub pending: bool,
    /// Last time the session was created or written to
    pub last_active: Instant,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation: Conversation::new(),
            pending: false,
            last_active: Instant::now(),
        }
    }

    pub fn accepting_input(&self) -> bool {
        !self.pending
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// All live sessions, keyed by id
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session holding only the greeting
    pub async fn create(&self) -> Session {
        let session = Session::new();
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        session
    }

    /// Snapshot of a session
    pub async fn get(&self, id: Uuid) -> Option<Session> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Discard a session. Returns false if it did not exist.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Run `f` with exclusive access to one session.
    ///
    /// The lock is released when `f` returns, so `f` must not await.
    pub async fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Option<T> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(&id).map(|session| {
            session.last_active = Instant::now();
            f(session)
        })
    }

    /// Drop sessions idle for at least `idle`. Sessions waiting on the model
    /// are kept. Returns how many were dropped.
    pub async fn evict_idle(&self, idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| {
            session.pending || now.saturating_duration_since(session.last_active) < idle
        });
        before - sessions.len()
    }

    /// Periodically evict idle sessions for the life of the process.
    pub fn spawn_sweeper(self: Arc<Self>, idle: Duration) -> JoinHandle<()> {
        let every = (idle / 4).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = self.evict_idle(idle).await;
                if evicted > 0 {
                    tracing::info!(evicted, "Evicted idle sessions");
                }
            }
        })
    }
}
