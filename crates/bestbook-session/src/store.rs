//! The session store: one observable slot shared across the client.
//!
//! Everything that cares about "who is signed in" reads from here: the
//! lifecycle monitor on every tick, the header view, the cart badge.
//!
//! # Who may write
//!
//! Two writers, by convention:
//! - the sign-in flow calls [`SessionStore::set`]
//! - the sign-out coordinator calls [`SessionStore::clear`]
//!
//! Nothing else should touch it. There is no lock guarding this rule;
//! the lifecycle crate only calls `clear` from one place.

use tokio::sync::watch;

use crate::Session;

/// Read/subscribe/write access to the current session.
///
/// # Trait bounds
///
/// - `Send + Sync` → the store is shared between the monitor task, the
///   sign-out coordinator and whatever renders the view.
/// - `'static` → it lives as long as the application.
pub trait SessionStore: Send + Sync + 'static {
    /// The session as it is *right now*.
    ///
    /// Callers must not cache the result across ticks; ask again.
    fn snapshot(&self) -> Option<Session>;

    /// Installs a freshly signed-in session, replacing any previous one.
    fn set(&self, session: Session);

    /// Removes the session and returns what was there.
    ///
    /// Token and session id disappear together. Subscribers are notified
    /// even when the store was already empty, so a second observer never
    /// misses a sign-out.
    fn clear(&self) -> Option<Session>;

    /// A receiver that wakes on every `set`/`clear`.
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;
}

// ---------------------------------------------------------------------------
// MemorySessionStore
// ---------------------------------------------------------------------------

/// An in-process [`SessionStore`] backed by a `tokio::sync::watch` channel.
///
/// Cheap to clone: clones share the same slot.
#[derive(Clone)]
pub struct MemorySessionStore {
    tx: std::sync::Arc<watch::Sender<Option<Session>>>,
}

impl MemorySessionStore {
    /// Creates an empty (signed-out) store.
    pub fn new() -> Self {
        Self::with_session(None)
    }

    /// Creates a store that starts with the given session, as if sign-in
    /// had already happened.
    pub fn with_session(session: Option<Session>) -> Self {
        let (tx, _rx) = watch::channel(session);
        Self {
            tx: std::sync::Arc::new(tx),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    fn snapshot(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    fn set(&self, session: Session) {
        tracing::info!(
            session_id = session.session_id(),
            username = %session.profile().username,
            "session stored"
        );
        self.tx.send_replace(Some(session));
    }

    fn clear(&self) -> Option<Session> {
        let previous = self.tx.send_replace(None);
        if let Some(prev) = &previous {
            tracing::info!(session_id = prev.session_id(), "session cleared");
        }
        previous
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Profile;

    fn session(id: &str) -> Session {
        Session::new(
            format!("token-{id}"),
            id,
            Profile {
                username: "ada".into(),
                email: "ada@example.com".into(),
                avatar: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_new_store_is_signed_out() {
        let store = MemorySessionStore::new();
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn test_set_then_snapshot_returns_session() {
        let store = MemorySessionStore::new();
        store.set(session("s-1"));

        let current = store.snapshot().expect("should be signed in");
        assert_eq!(current.session_id(), "s-1");
    }

    #[test]
    fn test_clear_removes_token_and_id_together() {
        let store = MemorySessionStore::with_session(Some(session("s-1")));

        let previous = store.clear();

        assert_eq!(previous.map(|s| s.session_id().to_owned()), Some("s-1".into()));
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn test_clear_on_empty_store_returns_none() {
        let store = MemorySessionStore::new();
        assert!(store.clear().is_none());
    }

    #[test]
    fn test_clones_share_the_same_slot() {
        let a = MemorySessionStore::new();
        let b = a.clone();

        a.set(session("s-1"));

        assert!(b.snapshot().is_some());
    }

    #[tokio::test]
    async fn test_subscribers_see_clear() {
        let store = MemorySessionStore::with_session(Some(session("s-1")));
        let mut rx = store.subscribe();

        store.clear();

        rx.changed().await.expect("sender alive");
        assert!(rx.borrow().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_new_sign_in() {
        let store = MemorySessionStore::new();
        let mut rx = store.subscribe();

        store.set(session("s-9"));

        rx.changed().await.unwrap();
        let seen = rx.borrow().clone().unwrap();
        assert_eq!(seen.session_id(), "s-9");
    }
}
