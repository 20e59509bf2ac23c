//! Synchronizer Token Pattern.
//!
//! A random **server token** lives in the session and never leaves the server.
//! The client receives its HMAC signature, the **client token**, and echoes it
//! back on state-changing requests.

use async_trait::async_trait;

use crate::{
    pattern::{Mode, Pattern},
    random,
    session::Session,
    sign::{constant_time_eq, sign},
    Error, Secret,
};

/// Server token size in bytes when none is configured.
pub const DEFAULT_TOKEN_LENGTH: usize = 16;

/// A freshly generated server token and the client token signed from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub server_token: String,
    pub client_token: String,
}

/// `length` random bytes, hex-encoded. Needs a Tokio runtime, see
/// [`random::generate`].
pub async fn generate_token(length: usize) -> Result<String, Error> {
    random::generate(length).await.map(hex::encode)
}

pub fn sign_token(server_token: &str, secret: impl AsRef<[u8]>) -> Result<String, Error> {
    sign(server_token, secret)
}

/// Checks that `client_token` was signed from `server_token` under `secret`.
pub fn verify_token(server_token: &str, client_token: &str, secret: impl AsRef<[u8]>) -> bool {
    match sign_token(server_token, secret) {
        Ok(expected) => constant_time_eq(&expected, client_token),
        Err(_) => false,
    }
}

pub async fn get_token(secret: impl AsRef<[u8]>, length: usize) -> Result<IssuedToken, Error> {
    let server_token = generate_token(length).await?;
    let client_token = sign_token(&server_token, secret)?;

    Ok(IssuedToken {
        server_token,
        client_token,
    })
}

#[derive(Debug, Clone)]
pub struct Synchronizer {
    token_length: usize,
}

impl Synchronizer {
    /// Fails with [`Error::InvalidTokenLength`] for a zero length: an empty
    /// server token reads as "no token" and nothing issued would ever verify.
    pub fn new(token_length: usize) -> Result<Self, Error> {
        if token_length == 0 {
            return Err(Error::InvalidTokenLength(token_length));
        }

        Ok(Self { token_length })
    }

    pub fn token_length(&self) -> usize {
        self.token_length
    }
}

impl Default for Synchronizer {
    fn default() -> Self {
        Self {
            token_length: DEFAULT_TOKEN_LENGTH,
        }
    }
}

fn stored_token(session: &dyn Session) -> Option<String> {
    session.csrf_token().filter(|token| !token.is_empty())
}

#[async_trait]
impl Pattern for Synchronizer {
    fn mode(&self) -> Mode {
        Mode::Synchronizer
    }

    async fn issue(
        &self,
        session: &dyn Session,
        secret: &Secret,
        forced: bool,
    ) -> Result<String, Error> {
        if !forced {
            if let Some(server_token) = stored_token(session) {
                return sign_token(&server_token, secret);
            }
        }

        let IssuedToken {
            server_token,
            client_token,
        } = get_token(secret, self.token_length).await?;

        tracing::debug!(session = session.id(), forced, "generated server token");
        session.set_csrf_token(server_token);

        Ok(client_token)
    }

    fn check(&self, session: &dyn Session, secret: &Secret, submitted: &str) -> bool {
        match stored_token(session) {
            Some(server_token) => verify_token(&server_token, submitted, secret),
            None => {
                tracing::debug!(session = session.id(), "no server token in session");
                false
            }
        }
    }
}
