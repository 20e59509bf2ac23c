use std::time::Duration;

use anyhow::Result;
use tower_csrf_guard::{
    hmac_based, synchronizer, Error, MemorySession, Mode, Pattern, Secret, Session,
};

const SECRET: &str = "secret_key";
const SID: &str = "session_id";

fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase())
}

#[tokio::test]
async fn generates_hex_of_twice_the_length() -> Result<()> {
    for length in [0, 1, 8, 16, 32, 64] {
        let token = synchronizer::generate_token(length).await?;
        assert_eq!(token.len(), length * 2);
        assert!(is_hex(&token));
    }

    Ok(())
}

#[tokio::test]
async fn signs_to_sha256_length() -> Result<()> {
    let token = synchronizer::generate_token(synchronizer::DEFAULT_TOKEN_LENGTH).await?;
    let signed = synchronizer::sign_token(&token, SECRET)?;

    assert_eq!(signed.len(), 32 * 2);
    assert!(is_hex(&signed));

    Ok(())
}

#[tokio::test]
async fn get_token_pairs_server_and_client() -> Result<()> {
    let issued = synchronizer::get_token(SECRET, 8).await?;

    assert_eq!(issued.server_token.len(), 8 * 2);
    assert_eq!(issued.client_token.len(), 32 * 2);
    assert_eq!(
        issued.client_token,
        synchronizer::sign_token(&issued.server_token, SECRET)?
    );

    Ok(())
}

#[tokio::test]
async fn synchronizer_verifies_own_signature() -> Result<()> {
    let issued = synchronizer::get_token(SECRET, 8).await?;

    assert!(synchronizer::verify_token(
        &issued.server_token,
        &issued.client_token,
        SECRET
    ));

    Ok(())
}

#[tokio::test]
async fn synchronizer_rejects_wrong_secret() -> Result<()> {
    let issued = synchronizer::get_token(SECRET, 8).await?;

    assert!(!synchronizer::verify_token(
        &issued.server_token,
        &issued.client_token,
        "wrong_secret"
    ));

    Ok(())
}

#[tokio::test]
async fn synchronizer_rejects_wrong_signed_token() -> Result<()> {
    let token = synchronizer::generate_token(16).await?;
    let other = synchronizer::get_token(SECRET, 16).await?;

    assert!(!synchronizer::verify_token(&token, "wrong_token", SECRET));
    assert!(!synchronizer::verify_token(&token, "", SECRET));
    assert!(!synchronizer::verify_token(&token, &other.client_token, SECRET));

    Ok(())
}

#[test]
fn hmac_token_shape() -> Result<()> {
    let before = now_millis();
    let token = hmac_based::generate_token(SID, SECRET)?;

    let (timestamp, hash) = token.split_once(':').expect("token has no colon");
    assert_eq!(hash.len(), 32 * 2);
    assert!(is_hex(timestamp) && is_hex(hash));

    let timestamp = u64::from_str_radix(timestamp, 16)?;
    assert!(timestamp >= before && timestamp <= now_millis());

    Ok(())
}

#[test]
fn hmac_verifies_without_expiry() -> Result<()> {
    let token = hmac_based::generate_token(SID, SECRET)?;

    assert!(hmac_based::verify_token(&token, SID, SECRET, None));

    Ok(())
}

#[test]
fn hmac_rejects_other_session_or_secret() -> Result<()> {
    let token = hmac_based::generate_token(SID, SECRET)?;

    assert!(!hmac_based::verify_token(&token, "wrong_session_id", SECRET, None));
    assert!(!hmac_based::verify_token(&token, SID, "wrong_secret", None));

    Ok(())
}

#[test]
fn hmac_rejects_tampered_timestamp() -> Result<()> {
    let t0 = 1_700_000_000_000;
    let token = hmac_based::generate_token_at(SID, SECRET, t0)?;
    let (_, hash) = token.split_once(':').expect("token has no colon");
    let forged = format!("{:x}:{hash}", t0 + 1);

    assert!(!hmac_based::verify_token_at(&forged, SID, SECRET, None, t0));

    Ok(())
}

#[test]
fn hmac_expiry_window() -> Result<()> {
    let t0 = 1_700_000_000_000;
    let token = hmac_based::generate_token_at(SID, SECRET, t0)?;
    let later = t0 + 2000;

    assert!(!hmac_based::verify_token_at(
        &token,
        SID,
        SECRET,
        Some(Duration::from_millis(1000)),
        later
    ));
    assert!(hmac_based::verify_token_at(
        &token,
        SID,
        SECRET,
        Some(Duration::from_millis(5000)),
        later
    ));
    // The window is exclusive.
    assert!(!hmac_based::verify_token_at(
        &token,
        SID,
        SECRET,
        Some(Duration::from_millis(2000)),
        later
    ));
    assert!(hmac_based::verify_token_at(&token, SID, SECRET, None, later));

    Ok(())
}

#[test]
fn hmac_expired_token_is_rejected_even_with_valid_hash() -> Result<()> {
    let t0 = 1_700_000_000_000;
    let token = hmac_based::generate_token_at(SID, SECRET, t0)?;

    assert!(hmac_based::verify_token_at(&token, SID, SECRET, None, t0 + 60_000));
    assert!(!hmac_based::verify_token_at(
        &token,
        SID,
        SECRET,
        Some(Duration::from_secs(30)),
        t0 + 60_000
    ));

    Ok(())
}

#[test]
fn hmac_fails_closed_on_malformed_tokens() -> Result<()> {
    let token = hmac_based::generate_token(SID, SECRET)?;
    let (timestamp, hash) = token.split_once(':').expect("token has no colon");

    let malformed = [
        String::new(),
        ":".into(),
        token.replace(':', ""),
        format!("{timestamp}:"),
        format!(":{hash}"),
        format!("not-hex:{hash}"),
        format!("0x{timestamp}:{hash}"),
        format!("0:{hash}"),
        format!("{timestamp}:{hash}:extra"),
        "💥:💥".into(),
    ];

    for token in &malformed {
        assert!(
            !hmac_based::verify_token(token, SID, SECRET, None),
            "{token:?} should be rejected"
        );
        assert!(!hmac_based::verify_token(
            token,
            SID,
            SECRET,
            Some(Duration::from_secs(60))
        ));
    }

    Ok(())
}

#[tokio::test]
async fn synchronizer_pattern_reuses_stored_token() -> Result<()> {
    let secret = Secret::new(SECRET)?;
    let pattern = synchronizer::Synchronizer::new(8)?;
    let session = MemorySession::new(SID);

    let first = pattern.issue(&session, &secret, false).await?;
    let server_token = session.csrf_token().expect("server token stored");
    assert_eq!(server_token.len(), 16);

    let second = pattern.issue(&session, &secret, false).await?;
    assert_eq!(first, second);
    assert_eq!(session.csrf_token().as_deref(), Some(server_token.as_str()));
    assert!(pattern.check(&session, &secret, &second));

    let rotated = pattern.issue(&session, &secret, true).await?;
    assert_ne!(rotated, first);
    assert_ne!(session.csrf_token().as_deref(), Some(server_token.as_str()));
    assert!(pattern.check(&session, &secret, &rotated));
    assert!(!pattern.check(&session, &secret, &first));

    Ok(())
}

#[test]
fn synchronizer_pattern_rejects_zero_length() {
    assert_eq!(
        synchronizer::Synchronizer::new(0).unwrap_err(),
        Error::InvalidTokenLength(0)
    );
    assert_eq!(
        synchronizer::Synchronizer::default().token_length(),
        synchronizer::DEFAULT_TOKEN_LENGTH
    );
}

#[tokio::test]
async fn synchronizer_pattern_treats_empty_slot_as_missing() -> Result<()> {
    let secret = Secret::new(SECRET)?;
    let pattern = synchronizer::Synchronizer::default();
    let session = MemorySession::new(SID);

    session.set_csrf_token(String::new());
    assert!(!pattern.check(&session, &secret, &synchronizer::sign_token("", SECRET)?));

    pattern.issue(&session, &secret, false).await?;
    assert_eq!(
        session.csrf_token().map(|token| token.len()),
        Some(synchronizer::DEFAULT_TOKEN_LENGTH * 2)
    );

    Ok(())
}

#[tokio::test]
async fn hmac_pattern_ignores_forced_and_session_slot() -> Result<()> {
    let secret = Secret::new(SECRET)?;
    let pattern = hmac_based::HmacBased::new(Some(Duration::from_secs(60)));
    let session = MemorySession::new(SID);

    assert_eq!(pattern.mode(), Mode::Hmac);

    let token = pattern.issue(&session, &secret, true).await?;
    assert!(pattern.check(&session, &secret, &token));
    assert!(!pattern.check(&MemorySession::new("other"), &secret, &token));
    assert_eq!(session.csrf_token(), None);

    Ok(())
}

#[test]
fn empty_secret_is_rejected() {
    assert_eq!(Secret::new("").unwrap_err(), Error::MissingSecret);
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_millis() as u64
}
