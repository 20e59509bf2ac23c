use std::sync::Arc;

use http::{HeaderMap, Request};

use crate::{guard::Config, session::ActiveSession, Error, Mode, Pattern};

/// Headers a token is read from, in order of precedence.
pub const TOKEN_HEADERS: [&str; 4] = ["csrf-token", "xsrf-token", "x-csrf-token", "x-xsrf-token"];

/// Token candidates captured from the request when it entered the guard.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Submitted {
    query: Option<String>,
    header: Option<String>,
}

impl Submitted {
    pub(crate) fn from_request<Q>(request: &Request<Q>, field_name: &str) -> Self {
        Self {
            query: request
                .uri()
                .query()
                .and_then(|query| query_param(query, field_name)),
            header: header_token(request.headers()),
        }
    }

    /// Body first, then query, then headers. Empty values are skipped.
    fn candidate<'a>(&'a self, body: Option<&'a str>) -> Option<&'a str> {
        body.filter(|token| !token.is_empty())
            .or(self.query.as_deref())
            .or(self.header.as_deref())
    }
}

fn query_param(query: &str, name: &str) -> Option<String> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .ok()?
        .into_iter()
        .find(|(key, value)| key == name && !value.is_empty())
        .map(|(_, value)| value)
}

fn header_token(headers: &HeaderMap) -> Option<String> {
    TOKEN_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
    })
}

/// Per-request CSRF operations, inserted into the request extensions by
/// [`CsrfGuard`](crate::CsrfGuard).
#[derive(Clone)]
pub struct Csrf {
    pub(crate) config: Arc<Config>,
    pub(crate) pattern: Arc<dyn Pattern>,
    pub(crate) session: Option<ActiveSession>,
    pub(crate) submitted: Submitted,
}

impl Csrf {
    pub fn mode(&self) -> Mode {
        self.pattern.mode()
    }

    /// Returns a token for the client to send back.
    ///
    /// In synchronizer mode the session's server token is reused unless
    /// `forced` is set or there is none yet. In HMAC mode every call returns a
    /// fresh token and `forced` does nothing.
    pub async fn issue_token(&self, forced: bool) -> Result<String, Error> {
        let session = self.session()?;

        self.pattern
            .issue(&**session, &self.config.secret, forced)
            .await
    }

    /// Checks the token submitted in the query string or headers.
    ///
    /// The request body is never read here, so a token posted as a form or
    /// JSON field is ignored. Parse the body in the handler and pass the field
    /// to [`check_token_with`](Self::check_token_with) instead.
    ///
    /// `Ok(false)` means the request failed the check. `Err` only means there
    /// was no session to check against.
    pub fn check_token(&self) -> Result<bool, Error> {
        self.check_token_with(None)
    }

    /// Like [`check_token`](Self::check_token), with the body field the
    /// handler parsed itself. A non-empty `body_token` takes precedence.
    pub fn check_token_with(&self, body_token: Option<&str>) -> Result<bool, Error> {
        let session = self.session()?;

        let Some(submitted) = self.submitted.candidate(body_token) else {
            tracing::debug!(session = session.id(), "no token submitted");
            return Ok(false);
        };

        let valid = self
            .pattern
            .check(&**session, &self.config.secret, submitted);
        if !valid {
            tracing::debug!(session = session.id(), mode = %self.mode(), "token rejected");
        }

        Ok(valid)
    }

    fn session(&self) -> Result<&ActiveSession, Error> {
        self.session.as_ref().ok_or_else(|| {
            tracing::warn!(err = %Error::SessionUnavailable);
            Error::SessionUnavailable
        })
    }
}
