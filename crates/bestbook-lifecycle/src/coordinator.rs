//! The sign-out coordinator: many triggers, one sign-out.
//!
//! Three things can decide the user should be signed out, and they can
//! fire in the same instant:
//! - the periodic check finds the token expired or revoked
//! - the user clicks "Sign out"
//! - a check that was already scheduled wakes up mid-sign-out
//!
//! Whatever wins, the outside world sees exactly one sequence: at most
//! one server notification, one store clear, one navigation.
//!
//! # The guard
//!
//! A small state machine behind a `std::sync::Mutex`, checked and set
//! before the first `.await` of either entry point:
//!
//! ```text
//!   Idle ──(trigger)──→ InFlight ──(navigated)──→ Done
//!                          ↑                        │
//!                          └──(trigger after a new sign-in)
//! ```
//!
//! The lock is never held across an await, so it never blocks the runtime.
//! `Done` re-arms on its own once a new sign-in lands in the store, which
//! is what "one sequence per session instance" means.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use bestbook_session::{Session, SessionStore};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{LifecycleConfig, MonitorState, MonitorStatus, Navigator, SignoutClient};

/// What a trigger call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignoutOutcome {
    /// This call won the guard and ran (or, for the automatic entry
    /// point, started) the sign-out sequence.
    Started,
    /// Another sequence is still running. Nothing was done.
    AlreadyInFlight,
    /// The session this trigger was about has already been signed out.
    /// Nothing was done.
    AlreadySignedOut,
}

impl SignoutOutcome {
    /// Returns `true` if this call is the one doing the work.
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guard {
    Idle,
    InFlight,
    /// The last sequence finished and the store has been empty since.
    Done,
}

#[derive(Debug, Clone, Copy)]
enum Trigger {
    User,
    Automatic,
}

impl Trigger {
    fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Automatic => "automatic",
        }
    }
}

struct Inner<S, C, N> {
    store: Arc<S>,
    client: Arc<C>,
    navigator: N,
    status: MonitorStatus,
    config: LifecycleConfig,
    guard: Mutex<Guard>,
    sequences: AtomicU64,
    /// Bumped each time a sequence ends.
    finished: watch::Sender<u64>,
}

/// Single-flight sign-out.
///
/// Cheap to clone: clones share one guard, so the view and the monitor
/// can each hold a copy.
pub struct SignoutCoordinator<S, C, N> {
    inner: Arc<Inner<S, C, N>>,
}

impl<S, C, N> Clone for SignoutCoordinator<S, C, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, C, N> SignoutCoordinator<S, C, N>
where
    S: SessionStore,
    C: SignoutClient,
    N: Navigator,
{
    /// Creates a coordinator. This is the only component that clears `store`.
    pub fn new(store: Arc<S>, client: C, navigator: N, config: LifecycleConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                client: Arc::new(client),
                navigator,
                status: MonitorStatus::new(),
                config,
                guard: Mutex::new(Guard::Idle),
                sequences: AtomicU64::new(0),
                finished: watch::Sender::new(0),
            }),
        }
    }

    /// User-initiated sign-out.
    ///
    /// Waits for the server notification (success or failure), then
    /// clears the store, resets the view state and navigates to the
    /// sign-in route immediately.
    pub async fn trigger_user(&self) -> SignoutOutcome {
        if let Err(outcome) = self.begin(Trigger::User) {
            return outcome;
        }

        if let Some(session) = self.inner.store.snapshot() {
            notify_server(self.inner.client.as_ref(), &session).await;
        }

        self.inner.store.clear();
        self.inner.status.set(MonitorState::Anonymous);
        self.navigate_and_finish();
        SignoutOutcome::Started
    }

    /// Automatic sign-out after a failed check.
    ///
    /// Synchronous: the store is cleared before this returns. The server
    /// notification runs detached, and navigation happens after
    /// `navigation_delay` so the expired state is visible first. The view
    /// state returns to `Anonymous` once navigation has happened.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn trigger_automatic(&self) -> SignoutOutcome {
        if let Err(outcome) = self.begin(Trigger::Automatic) {
            return outcome;
        }

        if let Some(session) = self.inner.store.clear() {
            let client = Arc::clone(&self.inner.client);
            tokio::spawn(async move {
                notify_server(client.as_ref(), &session).await;
            });
        }

        let this = self.clone();
        let delay = self.inner.config.navigation_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.inner
                .status
                .transition(MonitorState::Expired, MonitorState::Anonymous);
            this.navigate_and_finish();
        });

        SignoutOutcome::Started
    }

    /// Returns `true` while a sequence is running.
    pub fn in_flight(&self) -> bool {
        *self.lock_guard() == Guard::InFlight
    }

    /// Number of sequences started since creation.
    pub fn sequences_started(&self) -> u64 {
        self.inner.sequences.load(Ordering::Relaxed)
    }

    /// Receiver that wakes each time a sequence ends, after navigation.
    ///
    /// Store changes seen while a sequence was running went unchecked;
    /// the monitor re-checks when this fires.
    pub fn finished(&self) -> watch::Receiver<u64> {
        self.inner.finished.subscribe()
    }

    /// The shared view state this coordinator resets.
    pub fn status(&self) -> &MonitorStatus {
        &self.inner.status
    }

    pub fn store(&self) -> &Arc<S> {
        &self.inner.store
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.inner.config
    }

    /// Checks and sets the guard in one synchronous step.
    fn begin(&self, trigger: Trigger) -> Result<(), SignoutOutcome> {
        let mut guard = self.lock_guard();
        match &*guard {
            Guard::InFlight => {
                debug!(trigger = trigger.as_str(), "sign-out already in flight, ignoring");
                return Err(SignoutOutcome::AlreadyInFlight);
            }
            Guard::Done => {
                // Our sequence emptied the store, so anything in it now
                // came from a later sign-in.
                if self.inner.store.snapshot().is_none() {
                    debug!(trigger = trigger.as_str(), "session already signed out, ignoring");
                    return Err(SignoutOutcome::AlreadySignedOut);
                }
            }
            Guard::Idle => {}
        }
        *guard = Guard::InFlight;
        drop(guard);

        let n = self.inner.sequences.fetch_add(1, Ordering::Relaxed) + 1;
        info!(trigger = trigger.as_str(), sequence = n, "sign-out started");
        Ok(())
    }

    fn navigate_and_finish(&self) {
        let route = &self.inner.config.sign_in_route;
        self.inner.navigator.navigate(route);
        info!(%route, "sign-out complete");

        // A sign-in that landed mid-sequence has not been signed out;
        // leave the guard armed for it.
        let signed_in_meanwhile = self.inner.store.snapshot().is_some();
        *self.lock_guard() = if signed_in_meanwhile {
            Guard::Idle
        } else {
            Guard::Done
        };
        self.inner.finished.send_modify(|n| *n += 1);
    }

    fn lock_guard(&self) -> std::sync::MutexGuard<'_, Guard> {
        self.inner.guard.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Best-effort server notification. Failures are logged and dropped.
async fn notify_server<C: SignoutClient>(client: &C, session: &Session) {
    if let Err(e) = client.sign_out(session.token(), session.session_id()).await {
        warn!(
            session_id = session.session_id(),
            error = %e,
            "server sign-out failed, continuing with local sign-out"
        );
    }
}
