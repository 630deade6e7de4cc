//! The session-aware header.
//!
//! [`HeaderView`] is what the storefront header renders from. Mounting it
//! starts the session monitor; dropping it stops the monitor. Rendering
//! is a pure read of the current [`MonitorState`] and store snapshot.

use std::fmt;

use bestbook_lifecycle::{
    MonitorHandle, MonitorState, Navigator, SessionMonitor, SignoutClient, SignoutCoordinator,
    SignoutOutcome,
};
use bestbook_session::SessionStore;
use tokio::sync::watch;

use crate::Bestbook;

/// What the header shows right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    /// Nobody is signed in.
    SignIn,
    /// Signed in: identity plus a sign-out control.
    Identity {
        username: String,
        email: String,
        avatar: Option<String>,
    },
    /// The session just failed a check and is being signed out.
    SessionExpired,
}

impl fmt::Display for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignIn => write!(f, "[ Sign In ]"),
            Self::Identity {
                username,
                email,
                avatar,
            } => {
                write!(f, "{username} <{email}>")?;
                if let Some(url) = avatar {
                    write!(f, " ({url})")?;
                }
                write!(f, " [ Sign Out ]")
            }
            Self::SessionExpired => write!(f, "Session Expired / Click to Sign In"),
        }
    }
}

/// A mounted header.
///
/// The monitor runs for exactly as long as this value lives.
pub struct HeaderView<S, C, N> {
    coordinator: SignoutCoordinator<S, C, N>,
    monitor: MonitorHandle,
}

impl<S, C, N> HeaderView<S, C, N>
where
    S: SessionStore,
    C: SignoutClient,
    N: Navigator,
{
    /// Mounts the header and starts monitoring.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount(app: &Bestbook<S, C, N>) -> Self {
        let coordinator = app.coordinator().clone();
        let monitor = SessionMonitor::start(coordinator.clone());
        Self {
            coordinator,
            monitor,
        }
    }

    /// Mounts against an explicit monitor, for callers that need their
    /// own clock.
    pub fn with_monitor(coordinator: SignoutCoordinator<S, C, N>, monitor: MonitorHandle) -> Self {
        Self {
            coordinator,
            monitor,
        }
    }

    pub fn render(&self) -> Presentation {
        match self.monitor.state() {
            MonitorState::Anonymous => Presentation::SignIn,
            MonitorState::Expired => Presentation::SessionExpired,
            // A cleared store can briefly coexist with `Valid`.
            MonitorState::Valid => match self.coordinator.store().snapshot() {
                Some(session) => {
                    let profile = session.profile();
                    Presentation::Identity {
                        username: profile.username.clone(),
                        email: profile.email.clone(),
                        avatar: profile.avatar.clone(),
                    }
                }
                None => Presentation::SignIn,
            },
        }
    }

    /// The sign-out button.
    pub async fn sign_out(&self) -> SignoutOutcome {
        self.coordinator.trigger_user().await
    }

    /// Route the cart button leads to.
    pub fn cart_target(&self) -> &str {
        let config = self.coordinator.config();
        if self.signed_in() {
            &config.cart_route
        } else {
            &config.sign_in_route
        }
    }

    /// Badge count on the cart button, hidden for guests and empty carts.
    pub fn cart_badge(&self, item_count: usize) -> Option<usize> {
        (self.signed_in() && item_count > 0).then_some(item_count)
    }

    /// Subscribes to state changes. Hosts re-render when it fires.
    pub fn state_changes(&self) -> watch::Receiver<MonitorState> {
        self.monitor.status().subscribe()
    }

    /// Stops monitoring without dropping the view.
    pub fn unmount(&self) {
        self.monitor.cancel();
    }

    pub fn is_mounted(&self) -> bool {
        self.monitor.is_active()
    }

    fn signed_in(&self) -> bool {
        matches!(self.render(), Presentation::Identity { .. })
    }
}
