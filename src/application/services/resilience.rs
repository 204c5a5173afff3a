use std::future::Future;
use std::time::Duration;

use crate::application::ports::CapabilityError;

const MAX_ATTEMPTS: u32 = 2;

/// Deadline for one external call, scaled by document size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallTimeout {
    pub floor: Duration,
    pub ceiling: Duration,
    pub per_100_kib: Duration,
}

impl Default for CallTimeout {
    fn default() -> Self {
        Self {
            floor: Duration::from_secs(10),
            ceiling: Duration::from_secs(120),
            per_100_kib: Duration::from_secs(2),
        }
    }
}

impl CallTimeout {
    pub fn for_size(&self, size_bytes: u64) -> Duration {
        let blocks = u32::try_from(size_bytes.div_ceil(100 * 1024)).unwrap_or(u32::MAX);
        let scaled = self.floor.saturating_add(self.per_100_kib.saturating_mul(blocks));
        scaled.clamp(self.floor, self.ceiling.max(self.floor))
    }
}

/// Timeout and backoff applied to every capability call of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallPolicy {
    pub timeout: Duration,
    pub backoff: Duration,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            timeout: CallTimeout::default().floor,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Runs `call` under the policy's deadline, retrying once after a fixed
/// backoff when the failure is transient. Permanent failures return at once.
pub async fn call_with_retry<T, E, F, Fut>(
    operation: &'static str,
    policy: CallPolicy,
    mut call: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: CapabilityError,
{
    let mut attempt = 1;
    loop {
        let outcome = match tokio::time::timeout(policy.timeout, call()).await {
            Ok(result) => result,
            Err(_) => Err(E::timed_out()),
        };

        match outcome {
            Err(e) if e.is_transient() && attempt < MAX_ATTEMPTS => {
                tracing::warn!(
                    operation,
                    attempt,
                    error = %e,
                    backoff_ms = policy.backoff.as_millis() as u64,
                    "Transient capability failure, retrying"
                );
                tokio::time::sleep(policy.backoff).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}
