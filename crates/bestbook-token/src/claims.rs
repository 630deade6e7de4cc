//! Claim decoding: the unverified middle segment of a JWT.

use base64::Engine;
use base64::engine::general_purpose::GeneralPurpose;
use base64::engine::{DecodePaddingMode, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};

use crate::TokenError;

/// base64url that tolerates both padded and unpadded payloads.
///
/// Issuers are supposed to strip padding, but some libraries leave it in.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &base64::alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// The claims the session lifecycle cares about.
///
/// Only `exp` and `sessionId` are required. `sub` and `iat` ride along
/// when the issuer sets them so they can show up in diagnostics; nothing
/// validates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedClaims {
    /// Expiry, in seconds since the Unix epoch.
    ///
    /// A JWT NumericDate may carry a fractional part, so this is not an
    /// integer.
    pub exp: f64,

    /// Server-assigned session correlation id.
    ///
    /// Must match the id stored next to the token. A mismatch means the
    /// server rotated the session (e.g. a password change on another
    /// device) and this token is dead even though it has not expired.
    #[serde(rename = "sessionId")]
    pub session_id: String,

    /// Subject (user id), if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issued-at, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<f64>,
}

/// Decodes a token's claims without checking its signature.
///
/// # Errors
/// - [`TokenError::Format`] if the token is not `header.payload.signature`
/// - [`TokenError::Base64`] if the payload is not base64url
/// - [`TokenError::Json`] if the payload is not JSON or lacks `exp`/`sessionId`
pub fn decode_claims(token: &str) -> Result<DecodedClaims, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::Format(segments.len()));
    }

    let payload = PAYLOAD_ENGINE.decode(segments[1])?;
    let claims = serde_json::from_slice(&payload)?;
    Ok(claims)
}
