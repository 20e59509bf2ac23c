use std::{fmt, str::FromStr, sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{
    hmac_based::HmacBased, session::Session, synchronizer::Synchronizer, Error, Secret,
};

/// Which token pattern a guard runs. Fixed for the lifetime of the guard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Synchronizer,
    Hmac,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Synchronizer => "synchronizer",
            Mode::Hmac => "hmac",
        }
    }

    pub(crate) fn pattern(
        self,
        synchronizer: &Synchronizer,
        expiry: Option<Duration>,
    ) -> Arc<dyn Pattern> {
        match self {
            Mode::Synchronizer => Arc::new(synchronizer.clone()),
            Mode::Hmac => Arc::new(HmacBased::new(expiry)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "synchronizer" => Ok(Mode::Synchronizer),
            "hmac" => Ok(Mode::Hmac),
            _ => Err(Error::UnknownMode(s.to_owned())),
        }
    }
}

/// A token strategy: how tokens are issued for a session and how submitted
/// ones are checked.
///
/// `check` must fail closed. Anything it can't verify is `false`, never an
/// error.
#[async_trait]
pub trait Pattern: Send + Sync {
    fn mode(&self) -> Mode;

    async fn issue(&self, session: &dyn Session, secret: &Secret, forced: bool)
        -> Result<String, Error>;

    fn check(&self, session: &dyn Session, secret: &Secret, submitted: &str) -> bool;
}
