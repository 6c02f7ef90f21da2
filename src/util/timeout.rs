//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::error::BridgeError;

/// Wrap a fallible future with a timeout.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, BridgeError>>,
) -> Result<T, BridgeError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(BridgeError::Timeout(duration.as_millis() as u64)),
    }
}
