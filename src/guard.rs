use http::Request;
use std::{
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};
use tower_layer::Layer;
use tower_service::Service;

use crate::{
    csrf::Submitted, pattern::Mode, session::ActiveSession, synchronizer::Synchronizer, Csrf,
    Error, Pattern, Secret,
};

#[derive(Clone, Debug)]
pub(crate) struct Config {
    pub(crate) secret: Secret,
    pub(crate) mode: Mode,
    pub(crate) expiry: Option<Duration>,
    pub(crate) synchronizer: Synchronizer,
    pub(crate) field_name: String,
}

/// Layer that attaches a [`Csrf`] handle to every request.
///
/// It never rejects a request itself. Handlers decide what to do with the
/// result of [`Csrf::check_token`].
#[derive(Clone, Debug)]
pub struct CsrfGuard {
    pub(crate) config: Config,
}

impl CsrfGuard {
    /// Fails with [`Error::MissingSecret`] if `secret` is empty.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, Error> {
        Ok(Self {
            config: Config {
                secret: Secret::new(secret)?,
                mode: Mode::default(),
                expiry: None,
                synchronizer: Synchronizer::default(),
                field_name: "csrf_token".into(),
            },
        })
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.config.mode = mode;

        self
    }

    /// Maximum token age. Only used in [`Mode::Hmac`]; zero disables expiry.
    pub fn expiry(mut self, expiry: Duration) -> Self {
        self.config.expiry = Some(expiry).filter(|expiry| !expiry.is_zero());

        self
    }

    /// Size in bytes of newly generated server tokens in [`Mode::Synchronizer`].
    ///
    /// Fails with [`Error::InvalidTokenLength`] if `token_length` is zero.
    pub fn token_length(mut self, token_length: usize) -> Result<Self, Error> {
        self.config.synchronizer = Synchronizer::new(token_length)?;

        Ok(self)
    }

    /// Name of the body field and query parameter a token is read from.
    pub fn field_name(mut self, field_name: impl Into<String>) -> Self {
        self.config.field_name = field_name.into();

        self
    }
}

impl<S> Layer<S> for CsrfGuard {
    type Service = CsrfGuardService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        let pattern = self
            .config
            .mode
            .pattern(&self.config.synchronizer, self.config.expiry);

        CsrfGuardService {
            config: Arc::new(self.config.clone()),
            pattern,
            inner,
        }
    }
}

#[derive(Clone)]
pub struct CsrfGuardService<S> {
    config: Arc<Config>,
    pattern: Arc<dyn Pattern>,
    inner: S,
}

impl<S, Q> Service<Request<Q>> for CsrfGuardService<S>
where
    S: Service<Request<Q>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Q>) -> Self::Future {
        let session = request.extensions().get::<ActiveSession>().cloned();
        let submitted = Submitted::from_request(&request, &self.config.field_name);

        let csrf = Csrf {
            config: self.config.clone(),
            pattern: self.pattern.clone(),
            session,
            submitted,
        };
        request.extensions_mut().insert(csrf);

        self.inner.call(request)
    }
}
