use std::{fmt, sync::Arc};

use hmac::Mac;
use subtle::ConstantTimeEq;

use crate::{Error, HmacSha256};

/// The key every token is signed with.
///
/// Cheap to clone. The bytes never show up in `Debug` output.
#[derive(Clone)]
pub struct Secret(Arc<[u8]>);

impl Secret {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, Error> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(Error::MissingSecret);
        }

        Ok(Self(Arc::from(secret)))
    }
}

impl AsRef<[u8]> for Secret {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// HMAC-SHA256 of `message` under `secret`, hex-encoded.
pub fn sign(message: impl AsRef<[u8]>, secret: impl AsRef<[u8]>) -> Result<String, Error> {
    let mut mac = HmacSha256::new_from_slice(secret.as_ref())?;
    mac.update(message.as_ref());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Compares two strings without returning early on the first differing byte.
pub(crate) fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
