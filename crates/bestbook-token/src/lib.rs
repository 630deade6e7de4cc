//! Offline token validation for Bestbook.
//!
//! The storefront keeps a signed bearer token on the client. This crate
//! answers one question about it without touching the network: "should
//! the client keep presenting this token?"
//!
//! - **Claims** ([`DecodedClaims`]): the fields we read out of the token
//!   payload (expiry and the server-assigned session id).
//! - **Validation** ([`validate`], [`Validity`]): a pure function of the
//!   token, the session id we expect, and the current time.
//! - **Errors** ([`TokenError`]): why a token could not be decoded.
//!
//! # Not a security boundary
//!
//! The signature is never verified here. The server stays authoritative;
//! this check only lets the UI notice an expired or revoked session
//! before the next API call fails.
//!
//! ```text
//! token ──decode_claims()──→ DecodedClaims ──validate()──→ Validity
//! ```

mod claims;
mod error;
mod validator;

pub use claims::{DecodedClaims, decode_claims};
pub use error::TokenError;
pub use validator::{Validity, unix_now, validate};
