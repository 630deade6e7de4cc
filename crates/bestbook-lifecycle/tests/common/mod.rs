//! Shared test doubles for the lifecycle integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use bestbook_lifecycle::{
    Clock, LifecycleConfig, Navigator, SignoutClient, SignoutCoordinator, SignoutError,
};
use bestbook_session::{MemorySessionStore, Profile, Session, SessionStore};
use bestbook_token::unix_now;
use tokio::sync::watch;

// =========================================================================
// Tokens and sessions
// =========================================================================

/// An unsigned JWT-shaped token. The signature segment is junk; nothing
/// on the client verifies it.
pub fn token(exp: u64, claimed_session_id: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(
        r#"{{"exp":{exp},"sessionId":"{claimed_session_id}"}}"#
    ));
    format!("{header}.{payload}.c2ln")
}

pub fn profile() -> Profile {
    Profile {
        username: "ada".into(),
        email: "ada@example.com".into(),
        avatar: Some("https://img.example.com/ada.png".into()),
    }
}

/// A session whose token claims `session_id` and expires at `exp`.
pub fn session(session_id: &str, exp: u64) -> Session {
    Session::new(token(exp, session_id), session_id, profile()).unwrap()
}

/// Valid for an hour from now.
pub fn fresh_session(session_id: &str) -> Session {
    session(session_id, unix_now() + 3600)
}

/// Expired one second ago.
pub fn expired_session(session_id: &str) -> Session {
    session(session_id, unix_now() - 1)
}

/// Token claims `claimed`, but the store pairs it with `stored`.
pub fn mismatched_session(claimed: &str, stored: &str) -> Session {
    Session::new(token(unix_now() + 3600, claimed), stored, profile()).unwrap()
}

/// Epoch-seconds clock that follows tokio's (pausable) clock.
pub fn tokio_clock(base: u64) -> Clock {
    let start = tokio::time::Instant::now();
    Arc::new(move || base + start.elapsed().as_secs())
}

// =========================================================================
// Store that counts clears
// =========================================================================

#[derive(Clone, Default)]
pub struct CountingStore {
    inner: MemorySessionStore,
    clears: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn with_session(session: Option<Session>) -> Self {
        Self {
            inner: MemorySessionStore::with_session(session),
            clears: Arc::default(),
        }
    }

    /// Clears that actually removed a session.
    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl SessionStore for CountingStore {
    fn snapshot(&self) -> Option<Session> {
        self.inner.snapshot()
    }

    fn set(&self, session: Session) {
        self.inner.set(session);
    }

    fn clear(&self) -> Option<Session> {
        let previous = self.inner.clear();
        if previous.is_some() {
            self.clears.fetch_add(1, Ordering::SeqCst);
        }
        previous
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.inner.subscribe()
    }
}

// =========================================================================
// Navigator that records routes
// =========================================================================

#[derive(Clone, Default)]
pub struct RecordingNavigator {
    routes: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_owned());
    }
}

// =========================================================================
// Sign-out client with configurable latency and failure
// =========================================================================

#[derive(Clone, Default)]
pub struct FakeClient {
    calls: Arc<Mutex<Vec<(String, String)>>>,
    latency: Duration,
    fail: bool,
}

impl FakeClient {
    pub fn slow(latency: Duration) -> Self {
        Self {
            latency,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// `(token, session_id)` pairs, in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl SignoutClient for FakeClient {
    async fn sign_out(&self, token: &str, session_id: &str) -> Result<(), SignoutError> {
        self.calls
            .lock()
            .unwrap()
            .push((token.to_owned(), session_id.to_owned()));
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.fail {
            return Err(SignoutError::Status {
                status: 503,
                message: "upstream unavailable".into(),
            });
        }
        Ok(())
    }
}

// =========================================================================
// Wiring
// =========================================================================

pub type TestCoordinator = SignoutCoordinator<CountingStore, FakeClient, RecordingNavigator>;

pub struct Harness {
    pub store: CountingStore,
    pub client: FakeClient,
    pub nav: RecordingNavigator,
    pub coordinator: TestCoordinator,
}

pub fn harness(session: Option<Session>, client: FakeClient) -> Harness {
    let store = CountingStore::with_session(session);
    let nav = RecordingNavigator::default();
    let coordinator = SignoutCoordinator::new(
        Arc::new(store.clone()),
        client.clone(),
        nav.clone(),
        LifecycleConfig::default(),
    );
    Harness {
        store,
        client,
        nav,
        coordinator,
    }
}
