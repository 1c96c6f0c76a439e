use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

/// Name of the slot holding the current session, identical to the key the
/// web console uses in its local storage so the two stay interchangeable.
pub const SESSION_SLOT: &str = "@acc_token";

/// An authenticated session: the current access token plus the refresh token
/// when the login response carried one.
///
/// The refresh credential normally rides in an HTTP-only cookie and never
/// appears here; the field exists for backends that return it in the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer credential attached to ordinary API calls
    #[serde(rename = "accessToken")]
    pub access_token: String,

    /// Longer-lived credential used solely to mint a new access token
    #[serde(rename = "refreshToken", skip_serializing_if = "Option::is_none", default)]
    pub refresh_token: Option<String>,
}

impl Session {
    /// Create a session holding only an access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Session {
            access_token: access_token.into(),
            refresh_token: None,
        }
    }
}

/// Single-slot store for the current session.
///
/// Writing a new session replaces the old one atomically from the caller's
/// perspective; `clear` wipes the whole store, matching the full local-storage
/// wipe performed on terminal auth failure.
pub trait SessionStore: Send + Sync {
    /// Read the current session, if any
    fn get(&self) -> Option<Session>;

    /// Replace the current session
    fn set(&self, session: Session);

    /// Remove the session and anything else the store holds
    fn clear(&self);
}

/// In-memory session store, the default for a fresh client
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<Session> {
        self.slot.read().ok()?.as_ref().cloned()
    }

    fn set(&self, session: Session) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = Some(session);
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = None;
        }
    }
}

/// Durable session store backed by a small JSON file, the library-side
/// equivalent of the web console's local storage.
///
/// I/O failures are logged and treated as an absent session rather than
/// surfaced to the request path.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store persisting to the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSessionStore { path: path.into() }
    }

    fn load(&self) -> HashMap<String, Session> {
        match std::fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(path = %self.path.display(), error = %e, "session file unreadable");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        }
    }

    fn save(&self, slots: &HashMap<String, Session>) {
        let result = serde_json::to_vec_pretty(slots)
            .map_err(std::io::Error::other)
            .and_then(|bytes| std::fs::write(&self.path, bytes));

        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist session");
        }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<Session> {
        self.load().get(SESSION_SLOT).cloned()
    }

    fn set(&self, session: Session) {
        let mut slots = self.load();
        slots.insert(SESSION_SLOT.to_string(), session);
        self.save(&slots);
    }

    fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to clear session");
            }
        }
    }
}
