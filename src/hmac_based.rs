//! HMAC-Based Token Pattern.
//!
//! Tokens are `timestamp:signature`, where the timestamp is Unix time in
//! milliseconds as lowercase hex and the signature is the HMAC-SHA256 of the
//! timestamp followed by the session id. Nothing is stored server-side.
//!
//! Without an expiry a token stays valid for as long as the session id and the
//! secret do, so a leaked token can be replayed until the session rotates.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use crate::{
    pattern::{Mode, Pattern},
    session::Session,
    sign::{constant_time_eq, sign},
    Error, Secret,
};

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

pub fn generate_token(session_id: &str, secret: impl AsRef<[u8]>) -> Result<String, Error> {
    generate_token_at(session_id, secret, now_millis())
}

/// Same as [`generate_token`], stamped with `timestamp` instead of the clock.
pub fn generate_token_at(
    session_id: &str,
    secret: impl AsRef<[u8]>,
    timestamp: u64,
) -> Result<String, Error> {
    let hash = hash(timestamp, session_id, secret)?;

    Ok(format!("{timestamp:x}:{hash}"))
}

fn hash(timestamp: u64, session_id: &str, secret: impl AsRef<[u8]>) -> Result<String, Error> {
    sign(format!("{timestamp:x}{session_id}"), secret)
}

pub fn verify_token(
    token: &str,
    session_id: &str,
    secret: impl AsRef<[u8]>,
    expiry: Option<Duration>,
) -> bool {
    verify_token_at(token, session_id, secret, expiry, now_millis())
}

/// Same as [`verify_token`], measuring age against `now` instead of the clock.
pub fn verify_token_at(
    token: &str,
    session_id: &str,
    secret: impl AsRef<[u8]>,
    expiry: Option<Duration>,
    now: u64,
) -> bool {
    let Some((timestamp, hash)) = parse(token) else {
        tracing::debug!("rejected malformed token");
        return false;
    };

    let hash_valid = match self::hash(timestamp, session_id, secret) {
        Ok(expected) => constant_time_eq(&expected, hash),
        Err(_) => return false,
    };

    let fresh = match expiry {
        Some(expiry) => u128::from(now.saturating_sub(timestamp)) < expiry.as_millis(),
        None => true,
    };

    hash_valid && fresh
}

fn parse(token: &str) -> Option<(u64, &str)> {
    let (timestamp, hash) = token.split_once(':')?;

    if timestamp.is_empty() || hash.is_empty() {
        return None;
    }
    if !timestamp.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    match u64::from_str_radix(timestamp, 16) {
        Ok(0) | Err(_) => None,
        Ok(timestamp) => Some((timestamp, hash)),
    }
}

#[derive(Debug, Clone, Default)]
pub struct HmacBased {
    expiry: Option<Duration>,
}

impl HmacBased {
    pub fn new(expiry: Option<Duration>) -> Self {
        Self { expiry }
    }
}

#[async_trait]
impl Pattern for HmacBased {
    fn mode(&self) -> Mode {
        Mode::Hmac
    }

    /// `forced` has no effect: every call already yields a fresh token.
    async fn issue(
        &self,
        session: &dyn Session,
        secret: &Secret,
        _forced: bool,
    ) -> Result<String, Error> {
        generate_token(session.id(), secret)
    }

    fn check(&self, session: &dyn Session, secret: &Secret, submitted: &str) -> bool {
        verify_token(submitted, session.id(), secret, self.expiry)
    }
}
