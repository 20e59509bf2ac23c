use rand::{rngs::OsRng, RngCore};

use crate::Error;

/// Fills `length` bytes from the OS random source.
///
/// The read runs on tokio's blocking pool, so a starved entropy source
/// suspends the calling task instead of the executor thread.
///
/// # Panics
///
/// Must be awaited inside a Tokio runtime; [`tokio::task::spawn_blocking`]
/// panics otherwise.
pub async fn generate(length: usize) -> Result<Vec<u8>, Error> {
    tokio::task::spawn_blocking(move || {
        let mut bytes = vec![0u8; length];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map(|_| bytes)
            .map_err(|err| Error::EntropyUnavailable(err.to_string()))
    })
    .await
    .map_err(|err| Error::EntropyUnavailable(err.to_string()))
    .and_then(|bytes| bytes)
    .inspect_err(|err| tracing::error!(err = %err))
}
