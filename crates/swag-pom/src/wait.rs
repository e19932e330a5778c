//! Auto-wait polling shared by the drivers.
//!
//! Page objects never retry. Waiting for an element to reach a state is a
//! driver capability, bounded by the driver's configured timeout.

use crate::config::{DEFAULT_ELEMENT_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS};
use crate::result::SwagResult;
use std::future::Future;
use std::time::{Duration, Instant};

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_ELEMENT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Evaluate `condition` until it holds or the timeout elapses.
///
/// Returns `Ok(true)` once the condition holds, `Ok(false)` on timeout. The
/// condition is always evaluated at least once. Errors from the condition
/// abort the wait.
pub async fn poll_until<F, Fut>(options: WaitOptions, mut condition: F) -> SwagResult<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = SwagResult<bool>>,
{
    let start = Instant::now();
    loop {
        if condition().await? {
            return Ok(true);
        }
        if start.elapsed() >= options.timeout() {
            return Ok(false);
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::result::SwagError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_options_builder() {
        let options = WaitOptions::new().with_timeout(250).with_poll_interval(5);
        assert_eq!(options.timeout(), Duration::from_millis(250));
        assert_eq!(options.poll_interval(), Duration::from_millis(5));
    }

    #[tokio::test]
    async fn test_condition_met_after_polls() {
        let calls = AtomicU32::new(0);
        let met = poll_until(WaitOptions::new().with_poll_interval(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(n >= 2) }
        })
        .await
        .unwrap();

        assert!(met);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_timeout_returns_false() {
        let options = WaitOptions::new().with_timeout(20).with_poll_interval(5);
        let met = poll_until(options, || async { Ok(false) }).await.unwrap();
        assert!(!met);
    }

    #[tokio::test]
    async fn test_zero_timeout_checks_once() {
        let calls = AtomicU32::new(0);
        let options = WaitOptions::new().with_timeout(0);
        let met = poll_until(options, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(true) }
        })
        .await
        .unwrap();
        assert!(met);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_error_aborts_wait() {
        let err = poll_until(WaitOptions::new(), || async {
            Err::<bool, _>(SwagError::browser("target closed"))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, SwagError::Browser { .. }));
    }
}
