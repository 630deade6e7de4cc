//! Lifecycle configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::LifecycleError;

/// Timing and routing knobs for the session lifecycle.
///
/// Every field has a default, and a JSON override file only needs the
/// fields it changes:
///
/// ```json
/// { "poll_interval": { "secs": 10, "nanos": 0 }, "sign_in_route": "/login" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Time between session checks. The first check runs immediately.
    pub poll_interval: Duration,

    /// How long the "session expired" state stays on screen before an
    /// automatic sign-out navigates away.
    pub navigation_delay: Duration,

    /// Path of the server's sign-out endpoint, appended to the base URL.
    pub signout_path: String,

    /// Where every sign-out lands.
    pub sign_in_route: String,

    /// Where the cart button goes when signed in.
    pub cart_route: String,

    /// Overall timeout for the sign-out request. `None` uses the HTTP
    /// client's defaults.
    pub request_timeout: Option<Duration>,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            navigation_delay: Duration::from_millis(1500),
            signout_path: "/api/user/signout".to_string(),
            sign_in_route: "/sign-in".to_string(),
            cart_route: "/cart".to_string(),
            request_timeout: None,
        }
    }
}

impl LifecycleConfig {
    /// Shortest accepted polling interval.
    pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

    /// Parses a JSON override. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, LifecycleError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    /// Reads a JSON override from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LifecycleError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Clamp and fix out-of-range values so the config is safe to use.
    ///
    /// Rules:
    /// - `poll_interval` is at least [`Self::MIN_POLL_INTERVAL`].
    /// - Empty routes or paths fall back to their defaults.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if self.poll_interval < Self::MIN_POLL_INTERVAL {
            warn!(
                poll_interval_ms = self.poll_interval.as_millis() as u64,
                "poll_interval below minimum, clamping"
            );
            self.poll_interval = Self::MIN_POLL_INTERVAL;
        }
        if self.signout_path.is_empty() {
            warn!("signout_path empty, using default");
            self.signout_path = defaults.signout_path;
        }
        if self.sign_in_route.is_empty() {
            warn!("sign_in_route empty, using default");
            self.sign_in_route = defaults.sign_in_route;
        }
        if self.cart_route.is_empty() {
            self.cart_route = defaults.cart_route;
        }
        self
    }
}
