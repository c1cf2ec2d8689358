use crate::domain::model::StatusReport;
use crate::domain::ports::EventSink;
use crate::utils::error::{Result, WireError};
use std::future::Future;
use std::time::Duration;

pub const ONEWIRE_COMPONENT: &str = "OneWire";

/// Bounded attempt count plus inter-attempt delay. Attempts are consumed
/// on failure only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        RetryPolicy {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

/// Run `op` until it succeeds or the policy is spent. Each failure surfaces
/// a warning, a structured error-log entry and an unavailable status before
/// the next attempt; the final failure returns immediately with no extra
/// delay, wrapped as `RetryExhausted`.
pub async fn run_with_retries<T, F, Fut>(
    policy: &RetryPolicy,
    events: &dyn EventSink,
    address: &str,
    context: &str,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                events.warn(&format!("{context} error[{address}]: {e}"));
                events.log_error(ONEWIRE_COMPONENT, address, &e.to_string());
                events.status(&StatusReport::unavailable(address));
                if attempt >= policy.max_attempts {
                    return Err(WireError::RetryExhausted {
                        attempts: policy.max_attempts,
                        source: Box::new(e),
                    });
                }
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}
