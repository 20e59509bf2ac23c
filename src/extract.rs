use async_trait::async_trait;
use axum_core::{
    extract::FromRequestParts,
    response::{IntoResponse, Response},
};
use http::{request::Parts, StatusCode};

use crate::{Csrf, Error};

#[async_trait]
impl<S> FromRequestParts<S> for Csrf
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Csrf>()
            .cloned()
            .ok_or_else(|| Error::ExtensionNotFound("Csrf".into()))
    }
}

/// Every variant is a server-side fault, so each one answers 500 with its
/// message. A failed check is `Ok(false)` and never gets here.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!(err = %self);

        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
