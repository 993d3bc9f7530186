use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::wizard::ApplicationWizard;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How long an untouched wizard is kept before the next `open` evicts it.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Debug)]
struct SessionEntry {
    wizard: Arc<Mutex<ApplicationWizard>>,
    touched: Instant,
}

/// Live wizards keyed by session. Each wizard sits behind its own async mutex so a submit
/// never interleaves with another edit of the same session. Sessions idle for longer than
/// the timeout are evicted when a new one opens.
#[derive(Debug)]
pub struct WizardSessions {
    sessions: RwLock<HashMap<SessionId, SessionEntry>>,
    sequence: AtomicU64,
    idle_timeout: Duration,
}

impl Default for WizardSessions {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl WizardSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            sequence: AtomicU64::new(0),
            idle_timeout,
        }
    }

    pub async fn open(&self, wizard: ApplicationWizard) -> SessionId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let session_id = SessionId(format!("wiz-{id:06}"));
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, entry| entry.touched.elapsed() < self.idle_timeout);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, "evicted idle wizard sessions");
        }

        sessions.insert(
            session_id.clone(),
            SessionEntry {
                wizard: Arc::new(Mutex::new(wizard)),
                touched: Instant::now(),
            },
        );
        session_id
    }

    /// Look up a session and mark it as touched.
    pub async fn get(&self, session_id: &SessionId) -> Option<Arc<Mutex<ApplicationWizard>>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(session_id)?;
        entry.touched = Instant::now();
        Some(Arc::clone(&entry.wizard))
    }

    pub async fn close(&self, session_id: &SessionId) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

