//! What the session-aware view should show.

use std::fmt;

use tokio::sync::watch;

// ---------------------------------------------------------------------------
// MonitorState
// ---------------------------------------------------------------------------

/// The monitor's verdict on the current session.
///
/// ```text
///   Anonymous ──(session stored)──→ Valid ──(check fails)──→ Expired
///       ↑                             │                         │
///       └────────(user sign-out)──────┘                         │
///       └──────────────(navigation after the delay)─────────────┘
/// ```
///
/// `Expired` is only ever entered from `Valid`, and always in the same
/// step that starts an automatic sign-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorState {
    /// No session in the store.
    #[default]
    Anonymous,
    /// A session is stored and its last check passed.
    Valid,
    /// The last check failed; sign-out is underway.
    Expired,
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "Anonymous"),
            Self::Valid => write!(f, "Valid"),
            Self::Expired => write!(f, "Expired"),
        }
    }
}

// ---------------------------------------------------------------------------
// MonitorStatus
// ---------------------------------------------------------------------------

/// Shared, observable [`MonitorState`].
///
/// The monitor moves it forward, the sign-out coordinator resets it, and
/// views subscribe to it. Clones share the same cell.
#[derive(Debug, Clone)]
pub struct MonitorStatus {
    tx: std::sync::Arc<watch::Sender<MonitorState>>,
}

impl MonitorStatus {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(MonitorState::Anonymous);
        Self {
            tx: std::sync::Arc::new(tx),
        }
    }

    pub fn get(&self) -> MonitorState {
        *self.tx.borrow()
    }

    /// Receiver that wakes whenever the state actually changes.
    pub fn subscribe(&self) -> watch::Receiver<MonitorState> {
        self.tx.subscribe()
    }

    /// Sets the state. Returns `true` if it changed. Subscribers are only
    /// woken on a change.
    pub(crate) fn set(&self, next: MonitorState) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        })
    }

    /// Moves `from` to `to`, leaving any other state alone.
    pub(crate) fn transition(&self, from: MonitorState, to: MonitorState) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == from {
                *current = to;
                true
            } else {
                false
            }
        })
    }
}

impl Default for MonitorStatus {
    fn default() -> Self {
        Self::new()
    }
}
