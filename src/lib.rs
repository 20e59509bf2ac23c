//! ## Overview
//!
//! CSRF protection for [`tower`][crate-tower] services, with two interchangeable token patterns.
//!
//! ### How it works
//!
//! - **Secret key**: You provide a **secret key** used to sign every token (See: [OWASP's Cryptographic Storage Cheat Sheet][owasp-cryptographic-storage]).
//! - **Per request**: [`CsrfGuard`] inserts a [`Csrf`] handle into the request extensions. It picks up the request's
//!   [`ActiveSession`], which your session layer must insert first, and any token the client submitted.
//! - **Issuing**: [`Csrf::issue_token`] returns a token for your form or your JavaScript to send back.
//! - **Checking**: [`Csrf::check_token`] looks for a submitted token in the query parameter, then the `csrf-token`,
//!   `xsrf-token`, `x-csrf-token` and `x-xsrf-token` headers. It does not read the request body: for a token posted in
//!   a form or JSON body, parse it in your handler and call [`Csrf::check_token_with`], where the body field takes
//!   precedence over both. A bad token is `Ok(false)`; an `Err` means the request had no session.
//!
//! The guard never rejects a request on its own. Your handler decides.
//!
//! ### Patterns
//!
//! - [**Synchronizer**][owasp-synchronizer] (default): a random **server token** is stored in the session. The client
//!   receives its HMAC-SHA256 signature and must echo it back. The server token is reused across page loads until you
//!   force a new one.
//! - **HMAC based**: the token is `timestamp:signature`, signed over the timestamp and the session id. Nothing is
//!   stored. Tokens can be given an expiry; without one they stay valid until the session id changes.
//!
//! Signatures are compared in constant time.
//!
//! ## Usage
//!
//! ### With [`axum`][crate-axum]
//!
//! ```rust, no_run
//! use std::{net::SocketAddr, sync::Arc};
//!
//! use axum::{routing::{get, post}, Extension, Router};
//! use http::StatusCode;
//! use tower_csrf_guard::{ActiveSession, Csrf, CsrfGuard, MemorySession};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Stands in for a real session layer.
//!     let session = ActiveSession::new(Arc::new(MemorySession::new("unique-session-id")));
//!
//!     let app = Router::new()
//!         .route("/form", get(form))
//!         .route("/submit", post(submit))
//!         .layer(CsrfGuard::new("secret-key").unwrap())
//!         .layer(Extension(session));
//!
//!     let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
//!     let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
//!
//!     axum::serve(listener, app.into_make_service())
//!         .await
//!         .unwrap();
//! }
//!
//! async fn form(csrf: Csrf) -> Result<String, StatusCode> {
//!     csrf.issue_token(false).await.map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
//! }
//!
//! async fn submit(csrf: Csrf) -> StatusCode {
//!     match csrf.check_token() {
//!         Ok(true) => StatusCode::OK,
//!         Ok(false) => StatusCode::FORBIDDEN,
//!         Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
//!     }
//! }
//! ```
//!
//! ### Without a framework
//!
//! The patterns are plain functions too. Generating a server token reads the OS
//! random source on Tokio's blocking pool, so the async ones need a Tokio runtime:
//!
//! ```rust
//! use tower_csrf_guard::{hmac_based, synchronizer};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), tower_csrf_guard::Error> {
//! let issued = synchronizer::get_token("secret-key", 16).await?;
//! assert!(synchronizer::verify_token(&issued.server_token, &issued.client_token, "secret-key"));
//!
//! let token = hmac_based::generate_token("session-id", "secret-key")?;
//! assert!(hmac_based::verify_token(&token, "session-id", "secret-key", None));
//! # Ok(())
//! # }
//! ```
//!
//! [crate-axum]: https://github.com/tokio-rs/axum
//! [crate-tower]: https://github.com/tower-rs/tower
//! [owasp-cryptographic-storage]: https://cheatsheetseries.owasp.org/cheatsheets/Cryptographic_Storage_Cheat_Sheet.html
//! [owasp-synchronizer]: https://cheatsheetseries.owasp.org/cheatsheets/Cross-Site_Request_Forgery_Prevention_Cheat_Sheet.html#synchronizer-token-pattern

use hmac::Hmac;
use sha2::Sha256;

pub(crate) type HmacSha256 = Hmac<Sha256>;

pub use csrf::{Csrf, TOKEN_HEADERS};
pub use error::Error;
pub use guard::{CsrfGuard, CsrfGuardService};
pub use pattern::{Mode, Pattern};
pub use session::{ActiveSession, MemorySession, Session};
pub use sign::{sign, Secret};

pub mod hmac_based;
pub mod random;
pub mod synchronizer;

mod csrf;
mod error;
mod guard;
mod pattern;
mod session;
mod sign;

#[cfg(feature = "axum")]
mod extract;
