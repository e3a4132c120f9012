use std::future::Future;
use std::time::Duration;

use log::{debug, warn};

/// Polls `check` until it yields a value or `max_wait` elapses.
///
/// # Arguments
/// * `check` - Closure that returns `Ok(Some(value))` when done, `Ok(None)` to keep polling
/// * `max_wait` - Maximum time to wait before giving up
/// * `poll_interval` - Time to sleep between polls
/// * `operation_name` - Name of the operation for logging
///
/// # Returns
/// * `Ok(Some(value))` - The condition was met within `max_wait`
/// * `Ok(None)` - Timed out
/// * `Err(e)` - `check` failed; polling stops at the first error
pub async fn poll_until<T, E, F, Fut>(
    check: F,
    max_wait: Duration,
    poll_interval: Duration,
    operation_name: &str,
) -> Result<Option<T>, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let start = std::time::Instant::now();

    loop {
        if let Some(value) = check().await? {
            debug!("{} completed after {:?}", operation_name, start.elapsed());
            return Ok(Some(value));
        }

        if start.elapsed() >= max_wait {
            warn!("Timed out waiting for {} after {:?}", operation_name, max_wait);
            return Ok(None);
        }

        tokio::time::sleep(poll_interval).await;
    }
}
