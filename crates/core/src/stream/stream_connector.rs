use std::time::Duration;

use thiserror::Error;

use crate::shared::validation_error::ValidationError;

use super::domain::stream_opener::StreamOpener;
use super::stream_handle::StreamHandle;

/// The stream could not be opened within the retry budget.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectionError {
    #[error("could not open {uri} after {attempts} attempt(s): {last_error}")]
    Exhausted {
        uri: String,
        attempts: u32,
        last_error: String,
    },
}

/// How the wait between attempts evolves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Backoff {
    Fixed,
    /// Multiplies the delay by `factor` after every failure, capped at `max_delay`.
    Exponential { factor: f64, max_delay: Duration },
}

/// Bounded retry budget for opening a stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
    backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration, backoff: Backoff) -> Result<Self, ValidationError> {
        if max_attempts == 0 {
            return Err(ValidationError::NoConnectAttempts);
        }
        if let Backoff::Exponential { factor, .. } = backoff {
            if !factor.is_finite() || factor < 1.0 {
                return Err(ValidationError::InvalidBackoffFactor(factor));
            }
        }
        Ok(Self {
            max_attempts,
            delay,
            backoff,
        })
    }

    pub fn fixed(max_attempts: u32, delay: Duration) -> Result<Self, ValidationError> {
        Self::new(max_attempts, delay, Backoff::Fixed)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential { factor, max_delay } => {
                let exp = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
                let secs = self.delay.as_secs_f64() * factor.powi(exp);
                Duration::try_from_secs_f64(secs).map_or(max_delay, |d| d.min(max_delay))
            }
        }
    }
}

/// Opens streams with bounded retries.
///
/// Blocking: the caller is suspended for the sum of the waits between
/// attempts in the worst case. There is no wait after the final attempt.
pub struct StreamConnector {
    opener: Box<dyn StreamOpener>,
    policy: RetryPolicy,
}

impl StreamConnector {
    pub fn new(opener: Box<dyn StreamOpener>, policy: RetryPolicy) -> Self {
        Self { opener, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn connect(&mut self, source: &str) -> Result<StreamHandle, ConnectionError> {
        log::info!("Connecting to {source}");
        let max_attempts = self.policy.max_attempts();
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            match self.opener.open(source) {
                Ok(stream) if stream.is_opened() => {
                    let handle = StreamHandle::new(stream);
                    let meta = handle.metadata();
                    log::info!(
                        "Connected to {source} on attempt {attempt} ({}x{}, {:.2} fps, {})",
                        meta.width,
                        meta.height,
                        meta.fps,
                        meta.codec
                    );
                    return Ok(handle);
                }
                Ok(mut stream) => {
                    stream.close();
                    last_error = "stream reported not opened".to_string();
                }
                Err(e) => last_error = e.to_string(),
            }

            if attempt < max_attempts {
                let wait = self.policy.delay_after(attempt);
                log::warn!(
                    "Attempt {attempt}/{max_attempts} to open {source} failed ({last_error}); retrying in {:.1}s",
                    wait.as_secs_f64()
                );
                std::thread::sleep(wait);
            } else {
                log::warn!("Attempt {attempt}/{max_attempts} to open {source} failed ({last_error})");
            }
        }

        log::error!("Could not connect to {source} after {max_attempts} attempt(s)");
        Err(ConnectionError::Exhausted {
            uri: source.to_string(),
            attempts: max_attempts,
            last_error,
        })
    }
}
