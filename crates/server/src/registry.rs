//! Live session bookkeeping.
//!
//! Sessions never share game state; the registry only knows who is connected
//! so the accept loop can enforce `max_sessions` and log counts. Entries are
//! tied to a [`SessionGuard`] and vanish when it drops, including when the
//! session task panics.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

pub type SessionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInfo {
    pub id: SessionId,
    pub peer: SocketAddr,
    pub connected_at: Instant,
}

#[derive(Debug, Default)]
struct Inner {
    sessions: Mutex<HashMap<SessionId, SessionInfo>>,
    next_id: AtomicU64,
}

/// Concurrency-safe map of open sessions with a capacity limit.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    inner: Arc<Inner>,
    capacity: usize,
}

impl SessionRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner::default()),
            capacity,
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<SessionId, SessionInfo>> {
        // A panic while holding this lock cannot leave the map half-updated.
        self.inner
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a new session, or `None` if the registry is full.
    pub fn register(&self, peer: SocketAddr) -> Option<SessionGuard> {
        let mut sessions = self.sessions();
        if sessions.len() >= self.capacity {
            return None;
        }
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        sessions.insert(
            id,
            SessionInfo {
                id,
                peer,
                connected_at: Instant::now(),
            },
        );
        Some(SessionGuard {
            registry: self.clone(),
            id,
        })
    }

    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, id: SessionId) -> Option<SessionInfo> {
        self.sessions().get(&id).copied()
    }
}

/// Removes its session from the registry on drop.
#[derive(Debug)]
pub struct SessionGuard {
    registry: SessionRegistry,
    id: SessionId,
}

impl SessionGuard {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn info(&self) -> Option<SessionInfo> {
        self.registry.get(self.id)
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.registry.sessions().remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn guard_drop_unregisters() {
        let reg = SessionRegistry::new(4);
        let a = reg.register(peer(1)).unwrap();
        let b = reg.register(peer(2)).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(reg.len(), 2);
        assert_eq!(a.info().map(|i| i.peer), Some(peer(1)));

        drop(a);
        assert_eq!(reg.len(), 1);
        drop(b);
        assert!(reg.is_empty());
    }

    #[test]
    fn refuses_past_capacity() {
        let reg = SessionRegistry::new(1);
        let first = reg.register(peer(1));
        assert!(first.is_some());
        assert!(reg.register(peer(2)).is_none());
        drop(first);
        assert!(reg.register(peer(3)).is_some());
    }

    #[test]
    fn ids_are_not_reused() {
        let reg = SessionRegistry::new(2);
        let a = reg.register(peer(1)).unwrap().id();
        let b = reg.register(peer(1)).unwrap().id();
        assert!(b > a);
    }
}
