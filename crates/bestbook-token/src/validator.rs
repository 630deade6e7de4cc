//! The validity check itself.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::decode_claims;

/// Outcome of checking a stored token against its session id and the clock.
///
/// Only `Valid` lets a session live on. The monitor treats the other three
/// the same way (sign out); they are kept apart for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    /// Decodes, not expired, session id matches.
    Valid,
    /// `exp` is in the past.
    Expired,
    /// The token could not be decoded, or required claims are missing.
    Malformed,
    /// The token names a different session than the one stored with it.
    SessionMismatch,
}

impl Validity {
    /// Returns `true` only for [`Validity::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Short label for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Expired => "expired",
            Self::Malformed => "malformed",
            Self::SessionMismatch => "session_mismatch",
        }
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks a token without verifying its signature.
///
/// Precedence when several things are wrong: `Malformed`, then `Expired`,
/// then `SessionMismatch`. A token whose `exp` equals `now` is still valid.
///
/// Pure: the caller supplies the clock, so the result depends only on the
/// arguments.
pub fn validate(token: &str, expected_session_id: &str, now_epoch_secs: u64) -> Validity {
    let Ok(claims) = decode_claims(token) else {
        return Validity::Malformed;
    };

    if claims.exp < now_epoch_secs as f64 {
        Validity::Expired
    } else if claims.session_id != expected_session_id {
        Validity::SessionMismatch
    } else {
        Validity::Valid
    }
}

/// Current wall-clock time in whole seconds since the Unix epoch.
///
/// A clock set before 1970 reads as 0, which makes every token look fresh
/// rather than panicking.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
