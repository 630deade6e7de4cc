//! Error types for token decoding.

/// Why a bearer token could not be turned into [`DecodedClaims`](crate::DecodedClaims).
///
/// All three variants collapse into [`Validity::Malformed`](crate::Validity::Malformed)
/// during validation. They stay distinct here so the cause can be logged.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The token is not three `.`-separated segments.
    #[error("token must have 3 segments, found {0}")]
    Format(usize),

    /// The payload segment is not valid base64url.
    #[error("payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The payload is not JSON, or a required claim is missing or mistyped.
    #[error("payload claims are invalid: {0}")]
    Json(#[from] serde_json::Error),
}
