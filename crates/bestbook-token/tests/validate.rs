//! Integration tests for token validation, driven through the public API.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use bestbook_token::{Validity, validate};
use rand::Rng;

// =========================================================================
// Helpers
// =========================================================================

const NOW: u64 = 1_750_000_000;

/// Builds an unsigned JWT-shaped token carrying the given claims.
fn token(exp: u64, session_id: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(
        r#"{{"exp":{exp},"sessionId":"{session_id}","sub":"u1"}}"#
    ));
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

fn random_session_id(rng: &mut impl Rng) -> String {
    format!("sess-{:016x}", rng.random::<u64>())
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn test_unexpired_matching_token_is_valid() {
    let t = token(NOW + 3600, "sess-1");
    assert_eq!(validate(&t, "sess-1", NOW), Validity::Valid);
}

#[test]
fn test_expiry_equal_to_now_is_still_valid() {
    let t = token(NOW, "sess-1");
    assert_eq!(validate(&t, "sess-1", NOW), Validity::Valid);
}

#[test]
fn test_expired_one_second_ago() {
    let t = token(NOW - 1, "sess-1");
    assert_eq!(validate(&t, "sess-1", NOW), Validity::Expired);
}

/// Same shape as [`token`], but with the expiry written as a raw JSON number.
fn token_with_raw_exp(exp: &str, session_id: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload =
        URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp},"sessionId":"{session_id}"}}"#));
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

#[test]
fn test_fractional_expiry_in_future_is_valid() {
    let t = token_with_raw_exp("2000000000.5", "s-1");
    assert_eq!(validate(&t, "s-1", 1_700_000_000), Validity::Valid);
}

#[test]
fn test_fractional_expiry_compares_exactly() {
    let t = token_with_raw_exp(&format!("{}.5", NOW - 1), "s-1");
    assert_eq!(validate(&t, "s-1", NOW), Validity::Expired);

    let t = token_with_raw_exp(&format!("{}.5", NOW), "s-1");
    assert_eq!(validate(&t, "s-1", NOW), Validity::Valid);
}

#[test]
fn test_mismatch_reported_when_not_expired() {
    let t = token(NOW + 60, "sess-new");
    assert_eq!(validate(&t, "sess-old", NOW), Validity::SessionMismatch);
}

#[test]
fn test_expired_takes_precedence_over_mismatch() {
    let t = token(NOW - 60, "sess-new");
    assert_eq!(validate(&t, "sess-old", NOW), Validity::Expired);
}

#[test]
fn test_missing_claims_are_malformed() {
    let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"u1"}"#);
    let t = format!("h.{payload}.s");
    assert_eq!(validate(&t, "sess-1", NOW), Validity::Malformed);
}

#[test]
fn test_two_segment_token_is_malformed() {
    let t = token(NOW + 60, "sess-1");
    let truncated = t.rsplit_once('.').map(|(head, _)| head).unwrap();
    assert_eq!(validate(truncated, "sess-1", NOW), Validity::Malformed);
}

// =========================================================================
// Randomized properties
// =========================================================================

#[test]
fn test_past_expiry_is_never_valid() {
    let mut rng = rand::rng();
    for _ in 0..500 {
        let now = rng.random_range(1..u64::from(u32::MAX));
        let exp = rng.random_range(0..now);
        let sid = random_session_id(&mut rng);

        let result = validate(&token(exp, &sid), &sid, now);

        assert_eq!(result, Validity::Expired, "exp={exp} now={now}");
    }
}

#[test]
fn test_foreign_session_id_is_always_mismatch_when_fresh() {
    let mut rng = rand::rng();
    for _ in 0..500 {
        let now = rng.random_range(0..u64::from(u32::MAX));
        let exp = now + rng.random_range(0..86_400);
        let claimed = random_session_id(&mut rng);
        let stored = format!("{claimed}-rotated");

        let result = validate(&token(exp, &claimed), &stored, now);

        assert_eq!(result, Validity::SessionMismatch);
    }
}
