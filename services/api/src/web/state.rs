//! services/api/src/web/state.rs
//!
//! Defines the application's shared and session-specific states.

use crate::config::Config;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;
use wellness_core::{ports::ConversationService, ChatBridge, SessionStore};

//=========================================================================================
// AppState (Shared Across All Sessions)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when no API credential is configured.
    pub chat_service: Option<Arc<dyn ConversationService>>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(config: Arc<Config>, chat_service: Option<Arc<dyn ConversationService>>) -> Self {
        Self {
            chat_service,
            sessions: SessionRegistry::new(config.session_idle_timeout),
            config,
        }
    }

    pub fn chat_configured(&self) -> bool {
        self.chat_service.is_some()
    }

    /// Creates a session with an empty store and its own remote dialogue.
    pub async fn open_session(&self) -> (Uuid, SharedSession) {
        let bridge = ChatBridge::connect(
            self.chat_service.as_deref(),
            self.config.fragment_fallback,
        )
        .await;
        let session = WellnessSession::new(bridge);
        self.sessions.insert(session).await
    }
}

//=========================================================================================
// WellnessSession (Specific to One Browser Session)
//=========================================================================================

/// Everything that belongs to one user session.
pub struct WellnessSession {
    pub store: SessionStore,
    pub bridge: ChatBridge,
}

impl WellnessSession {
    pub fn new(bridge: ChatBridge) -> Self {
        Self {
            store: SessionStore::new(),
            bridge,
        }
    }
}

/// A session handle; the lock serializes interactions within the session.
pub type SharedSession = Arc<Mutex<WellnessSession>>;

/// The ID of the session a request was resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

/// All live sessions, keyed by session ID.
///
/// A session ends when it is deleted or when it has been idle longer than
/// `idle_timeout`. Idle sessions are swept whenever a new one is opened.
pub struct SessionRegistry {
    idle_timeout: Duration,
    sessions: Mutex<HashMap<Uuid, RegistryEntry>>,
}

struct RegistryEntry {
    session: SharedSession,
    last_access: Instant,
}

impl SessionRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            idle_timeout,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, session: WellnessSession) -> (Uuid, SharedSession) {
        let session_id = Uuid::new_v4();
        let shared = Arc::new(Mutex::new(session));
        let now = Instant::now();

        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_access) < self.idle_timeout);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {} idle session(s).", evicted);
        }

        sessions.insert(
            session_id,
            RegistryEntry {
                session: shared.clone(),
                last_access: now,
            },
        );
        info!("Opened session {} ({} live).", session_id, sessions.len());
        (session_id, shared)
    }

    /// Looks up a session and marks it as used.
    pub async fn get(&self, session_id: Uuid) -> Option<SharedSession> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions.get_mut(&session_id)?;
        entry.last_access = Instant::now();
        Some(entry.session.clone())
    }

    /// Ends a session. Returns `false` if it was not live.
    pub async fn remove(&self, session_id: Uuid) -> bool {
        let mut sessions = self.sessions.lock().await;
        let removed = sessions.remove(&session_id).is_some();
        if removed {
            info!("Closed session {} ({} live).", session_id, sessions.len());
        }
        removed
    }

    pub async fn live_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
