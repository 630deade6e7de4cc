//! The session monitor: a recurring check tied to a view's lifetime.
//!
//! Mounting a session-aware view calls [`SessionMonitor::start`]; the view
//! keeps the returned [`MonitorHandle`] and drops it on unmount. While the
//! handle is alive the monitor:
//!
//! 1. checks the stored session immediately,
//! 2. re-checks it every `poll_interval`,
//! 3. re-checks immediately whenever the store changes (sign-in/sign-out),
//! 4. re-checks when a sign-out sequence finishes, since store changes
//!    during the sequence were skipped,
//! 5. on a failed check, flags `Expired` and starts an automatic sign-out.
//!
//! # Cancellation
//!
//! [`MonitorHandle::cancel`] (or dropping the handle) flips a shared
//! `active` flag and aborts the loop task, both synchronously. Every check
//! reads the flag before touching anything, so a tick that was already on
//! its way is a no-op.
//!
//! A sign-out that was already started is *not* cancelled: once the store
//! has been cleared, navigation has to follow.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bestbook_session::{Session, SessionStore};
use bestbook_tick::{MissedTickPolicy, TickConfig, TickScheduler};
use bestbook_token::{Validity, decode_claims, unix_now, validate};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::{MonitorState, MonitorStatus, Navigator, SignoutClient, SignoutCoordinator};

/// Wall-clock source in epoch seconds. Swappable for tests.
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

/// Entry point for starting a monitor.
pub struct SessionMonitor;

impl SessionMonitor {
    /// Activates monitoring against the coordinator's store, using the
    /// system clock.
    ///
    /// The first check runs before this returns. Must be called from
    /// within a Tokio runtime.
    pub fn start<S, C, N>(coordinator: SignoutCoordinator<S, C, N>) -> MonitorHandle
    where
        S: SessionStore,
        C: SignoutClient,
        N: Navigator,
    {
        let clock: Clock = Arc::new(unix_now);
        Self::start_with_clock(coordinator, clock)
    }

    /// Like [`start`](Self::start) but reads time from `clock`.
    pub fn start_with_clock<S, C, N>(
        coordinator: SignoutCoordinator<S, C, N>,
        clock: Clock,
    ) -> MonitorHandle
    where
        S: SessionStore,
        C: SignoutClient,
        N: Navigator,
    {
        let active = Arc::new(AtomicBool::new(true));
        let status = coordinator.status().clone();
        let mut sessions = coordinator.store().subscribe();
        let mut finished = coordinator.finished();
        // The activation check below covers the current values; only later
        // changes should wake the loop.
        sessions.borrow_and_update();
        finished.borrow_and_update();
        let period = coordinator.config().poll_interval;

        let core = Arc::new(MonitorCore {
            coordinator,
            active: Arc::clone(&active),
            clock,
        });

        debug!(poll_ms = period.as_millis() as u64, "session monitor started");
        core.check();

        let task = tokio::spawn(run(Arc::clone(&core), sessions, finished, period));

        MonitorHandle {
            active,
            task,
            status,
            checker: core,
        }
    }
}

// ---------------------------------------------------------------------------
// MonitorHandle
// ---------------------------------------------------------------------------

/// Keeps a monitor alive. Dropping it deactivates the monitor.
pub struct MonitorHandle {
    active: Arc<AtomicBool>,
    task: JoinHandle<()>,
    status: MonitorStatus,
    checker: Arc<dyn Check>,
}

impl MonitorHandle {
    /// Stops the monitor. Synchronous and idempotent.
    ///
    /// After this returns no check will run, including one whose timer
    /// has already fired.
    pub fn cancel(&self) {
        if self.active.swap(false, Ordering::AcqRel) {
            debug!("session monitor stopped");
        }
        self.task.abort();
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// The state views should render from.
    pub fn status(&self) -> &MonitorStatus {
        &self.status
    }

    pub fn state(&self) -> MonitorState {
        self.status.get()
    }

    /// Runs one check right now, outside the schedule. No-op once cancelled.
    pub fn check_now(&self) {
        self.checker.check();
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ---------------------------------------------------------------------------
// Check loop
// ---------------------------------------------------------------------------

trait Check: Send + Sync {
    fn check(&self);
}

struct MonitorCore<S, C, N> {
    coordinator: SignoutCoordinator<S, C, N>,
    active: Arc<AtomicBool>,
    clock: Clock,
}

impl<S, C, N> Check for MonitorCore<S, C, N>
where
    S: SessionStore,
    C: SignoutClient,
    N: Navigator,
{
    fn check(&self) {
        if !self.active.load(Ordering::Acquire) {
            trace!("check after deactivation, ignoring");
            return;
        }
        if self.coordinator.in_flight() {
            debug!("sign-out in flight, skipping check");
            return;
        }

        let status = self.coordinator.status();

        // Always the store's current value, never a copy from an earlier tick.
        let Some(session) = self.coordinator.store().snapshot() else {
            if status.transition(MonitorState::Valid, MonitorState::Anonymous) {
                info!("session gone, now anonymous");
            }
            return;
        };

        if status.transition(MonitorState::Anonymous, MonitorState::Valid) {
            info!(session_id = session.session_id(), "session present, monitoring");
        }

        let validity = validate(session.token(), session.session_id(), (self.clock)());
        match validity {
            Validity::Valid => {
                trace!(session_id = session.session_id(), "session still valid");
            }
            Validity::Malformed => {
                let cause = decode_claims(session.token())
                    .err()
                    .map(|e| e.to_string())
                    .unwrap_or_default();
                warn!(
                    session_id = session.session_id(),
                    %cause,
                    "session token undecodable, signing out"
                );
                self.expire(&session);
            }
            Validity::Expired | Validity::SessionMismatch => {
                info!(
                    session_id = session.session_id(),
                    %validity,
                    "session no longer valid, signing out"
                );
                self.expire(&session);
            }
        }
    }
}

impl<S, C, N> MonitorCore<S, C, N>
where
    S: SessionStore,
    C: SignoutClient,
    N: Navigator,
{
    /// Flags `Expired` and starts the automatic sign-out in one step.
    fn expire(&self, session: &Session) {
        self.coordinator
            .status()
            .transition(MonitorState::Valid, MonitorState::Expired);
        let outcome = self.coordinator.trigger_automatic();
        debug!(session_id = session.session_id(), ?outcome, "automatic sign-out requested");
    }
}

/// Re-checks every `period`, and immediately on every store change or
/// finished sign-out.
async fn run<K: Check + ?Sized>(
    core: Arc<K>,
    mut sessions: watch::Receiver<Option<Session>>,
    mut finished: watch::Receiver<u64>,
    period: std::time::Duration,
) {
    loop {
        let signed_in = sessions.borrow().is_some();

        if signed_in {
            // The activation check (or the change handler below) already
            // ran this period's check.
            let mut ticks = TickScheduler::new(TickConfig {
                period,
                immediate_first_tick: false,
                policy: MissedTickPolicy::Skip,
                metrics_enabled: false,
            });
            loop {
                tokio::select! {
                    changed = sessions.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        break;
                    }
                    done = finished.changed() => {
                        if done.is_err() {
                            return;
                        }
                        break;
                    }
                    _ = ticks.wait_for_tick() => core.check(),
                }
            }
        } else {
            let woke = tokio::select! {
                changed = sessions.changed() => changed,
                done = finished.changed() => done,
            };
            if woke.is_err() {
                return;
            }
        }

        core.check();
    }
}
