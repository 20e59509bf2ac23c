#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The guard was configured without a secret, or with an empty one.
    #[error("a non-empty secret key must be provided")]
    MissingSecret,
    /// A mode name that is neither `synchronizer` nor `hmac`.
    #[error("unknown mode `{0}`. expected `synchronizer` or `hmac`")]
    UnknownMode(String),
    /// A synchronizer server token length of zero bytes.
    #[error("server token length must be at least one byte, got {0}")]
    InvalidTokenLength(usize),
    /// A token operation was called on a request with no session attached.
    #[error("session is not available. is a session layer running before `CsrfGuard`?")]
    SessionUnavailable,
    /// The OS random source failed while generating a server token.
    #[error("couldn't read from the entropy source: {0}")]
    EntropyUnavailable(String),
    /// Maps the [`hmac::digest::InvalidLength`] error.
    #[error(transparent)]
    InvalidLength(#[from] hmac::digest::InvalidLength),
    /// An expected extension was missing.
    #[error("couldn't extract `{0}`. is `CsrfGuard` layered onto this route?")]
    ExtensionNotFound(String),
}
