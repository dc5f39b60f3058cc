//! Bounded exponential-backoff probe used to validate reachability.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::ClientError;

/// Configuration for the connection probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Wait after the first failed attempt; doubles after every wait.
    pub initial_delay: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(2),
        }
    }
}

impl ProbeConfig {
    /// Attempt budget, never less than one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Returns the wait after the `attempt`-th failure (1-based).
    /// Returns `None` after the final attempt.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt >= self.attempts() {
            return None;
        }
        let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
        Some(self.initial_delay.saturating_mul(factor))
    }
}

/// Run `op` until it succeeds or the attempt budget is spent.
///
/// Waits between attempts are cut short by `cancel`, in which case
/// [`ClientError::Cancelled`] is returned instead of the last failure.
pub async fn probe<F, Fut, T>(
    config: ProbeConfig,
    cancel: &CancellationToken,
    mut op: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let max = config.attempts();
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let err = match op().await {
            Ok(value) => return Ok(value),
            Err(ClientError::Cancelled) => return Err(ClientError::Cancelled),
            Err(e) => e,
        };

        tracing::warn!(attempt, max_attempts = max, error = %err, "connection attempt failed");

        match config.next_delay(attempt) {
            Some(delay) => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            None => {
                return Err(ClientError::ConnectFailed {
                    attempts: attempt,
                    source: Box::new(err),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parking_lot::Mutex;
    use tokio::time::Instant;

    fn assert_near(actual: Duration, expected: Duration) {
        assert!(
            actual >= expected && actual < expected + Duration::from_millis(10),
            "expected ~{expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn delays_double() {
        let config = ProbeConfig::default();
        assert_eq!(config.next_delay(1), Some(Duration::from_secs(2)));
        assert_eq!(config.next_delay(2), Some(Duration::from_secs(4)));
        assert_eq!(config.next_delay(3), None);
    }

    #[test]
    fn zero_attempts_means_one() {
        let config = ProbeConfig {
            max_attempts: 0,
            ..Default::default()
        };
        assert_eq!(config.attempts(), 1);
        assert_eq!(config.next_delay(1), None);
    }

    #[test]
    fn huge_attempt_numbers_saturate() {
        let config = ProbeConfig {
            max_attempts: 100,
            initial_delay: Duration::from_secs(1),
        };
        assert!(config.next_delay(64).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn waits_two_then_four_seconds_and_reports_attempts() {
        let start = Instant::now();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();

        let err = probe(ProbeConfig::default(), &CancellationToken::new(), || {
            log.lock().push(start.elapsed());
            async { Err::<(), _>(ClientError::Transport("connection refused".into())) }
        })
        .await
        .unwrap_err();

        let seen = seen.lock().clone();
        assert_eq!(seen.len(), 3);
        assert_near(seen[0], Duration::ZERO);
        assert_near(seen[1], Duration::from_secs(2));
        assert_near(seen[2], Duration::from_secs(6));
        // No wait after the final attempt.
        assert_near(start.elapsed(), Duration::from_secs(6));
        assert!(matches!(err, ClientError::ConnectFailed { attempts: 3, .. }));
        assert!(err.to_string().contains("3 attempts"));
    }

    #[tokio::test(start_paused = true)]
    async fn success_stops_retrying() {
        let calls = Arc::new(Mutex::new(0u32));
        let counter = calls.clone();

        let value = probe(ProbeConfig::default(), &CancellationToken::new(), || {
            let n = {
                let mut c = counter.lock();
                *c += 1;
                *c
            };
            async move {
                if n < 2 {
                    Err(ClientError::Transport("reset".into()))
                } else {
                    Ok("1.18.22")
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(value, "1.18.22");
        assert_eq!(*calls.lock(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_during_backoff_returns_promptly() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            trigger.cancel();
        });

        let start = Instant::now();
        let err = probe(ProbeConfig::default(), &cancel, || async {
            Err::<(), _>(ClientError::Transport("connection refused".into()))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, ClientError::Cancelled));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_kinds_still_consume_attempts() {
        let calls = Arc::new(Mutex::new(0u32));
        let counter = calls.clone();
        let err = probe(ProbeConfig::default(), &CancellationToken::new(), || {
            *counter.lock() += 1;
            async {
                let decode = serde_json::from_str::<u64>("<html>").unwrap_err();
                Err::<(), _>(ClientError::Decode(decode))
            }
        })
        .await
        .unwrap_err();

        assert_eq!(*calls.lock(), 3);
        match err {
            ClientError::ConnectFailed { source, .. } => {
                assert!(source.is_unintelligible());
                assert!(!source.is_retryable());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn last_error_is_wrapped() {
        let calls = Arc::new(Mutex::new(0u32));
        let counter = calls.clone();
        let err = probe(
            ProbeConfig {
                max_attempts: 2,
                initial_delay: Duration::from_millis(10),
            },
            &CancellationToken::new(),
            || {
                let n = {
                    let mut c = counter.lock();
                    *c += 1;
                    *c
                };
                async move { Err::<(), _>(ClientError::Transport(format!("failure {n}"))) }
            },
        )
        .await
        .unwrap_err();

        match err {
            ClientError::ConnectFailed { attempts, source } => {
                assert_eq!(attempts, 2);
                assert!(matches!(*source, ClientError::Transport(ref m) if m == "failure 2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
