use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::session::DocumentSession;

pub type SharedSession = Arc<Mutex<DocumentSession>>;

/// Shortest gap between two idle sweeps.
const MIN_SWEEP_PERIOD: Duration = Duration::from_secs(1);

struct Entry {
    session: SharedSession,
    last_seen: Instant,
}

/// In-memory table of open documents. Documents share nothing with each other;
/// each sits behind its own lock.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Entry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: DocumentSession) -> SharedSession {
        let id = session.id;
        let shared = Arc::new(Mutex::new(session));
        let entry = Entry {
            session: Arc::clone(&shared),
            last_seen: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
        shared
    }

    /// Looks up a document and marks it as in use.
    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(Arc::clone(&entry.session))
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every document untouched for at least `ttl`. Requests already
    /// holding one keep their handle until they finish.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < ttl);
        before - sessions.len()
    }
}

/// Background sweep that reclaims abandoned documents.
pub fn spawn_reaper(store: Arc<SessionStore>, ttl: Duration) -> JoinHandle<()> {
    let period = (ttl / 4).max(MIN_SWEEP_PERIOD);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let evicted = store.evict_idle(ttl).await;
            if evicted > 0 {
                let remaining = store.len().await;
                info!(evicted, remaining, "idle documents reclaimed");
            }
        }
    })
}
