use std::{ops::Deref, sync::Arc};

use parking_lot::Mutex;

/// The slice of a session this crate needs.
///
/// Implemented by the host's session store. Only the synchronizer pattern
/// writes, and only to the `csrf_token` slot. Writes go through `&self`, so
/// implementations handle their own synchronization. Two concurrent requests
/// for one session can both find the slot empty and both generate a token;
/// the last write wins unless the store serializes writes per session.
pub trait Session: Send + Sync {
    /// A stable identifier for the session.
    fn id(&self) -> &str;

    fn csrf_token(&self) -> Option<String>;

    fn set_csrf_token(&self, token: String);
}

impl<T: Session + ?Sized> Session for Arc<T> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn csrf_token(&self) -> Option<String> {
        (**self).csrf_token()
    }

    fn set_csrf_token(&self, token: String) {
        (**self).set_csrf_token(token)
    }
}

/// The request extension a session layer inserts so `CsrfGuard` can find the
/// session.
#[derive(Clone)]
pub struct ActiveSession(Arc<dyn Session>);

impl ActiveSession {
    pub fn new(session: impl Session + 'static) -> Self {
        Self(Arc::new(session))
    }
}

impl From<Arc<dyn Session>> for ActiveSession {
    fn from(session: Arc<dyn Session>) -> Self {
        Self(session)
    }
}

impl Deref for ActiveSession {
    type Target = dyn Session;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

/// A single session held in memory.
#[derive(Debug)]
pub struct MemorySession {
    id: String,
    csrf_token: Mutex<Option<String>>,
}

impl MemorySession {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            csrf_token: Mutex::new(None),
        }
    }
}

impl Session for MemorySession {
    fn id(&self) -> &str {
        &self.id
    }

    fn csrf_token(&self) -> Option<String> {
        self.csrf_token.lock().clone()
    }

    fn set_csrf_token(&self, token: String) {
        *self.csrf_token.lock() = Some(token);
    }
}
