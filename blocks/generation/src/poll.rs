use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::GenerateError;
use crate::provider::GenerationProvider;
use crate::types::JobStatus;

/// Timing of the status-polling loop. The timeout is a hard wall-clock bound
/// on the whole wait, not a per-poll budget.
#[derive(Debug, Clone)]
pub struct PollSchedule {
    pub initial_delay: Duration,
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(10),
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Wait for a submitted job to reach a terminal state.
///
/// Polls at the schedule's cadence until the provider reports `Complete`
/// (returns the result reference) or `Failed` (raises `JobFailed`). The
/// deadline is checked before every poll, so once it passes no further
/// provider calls are made. A poll transport error is not a job failure; it
/// is logged and retried within the deadline. Cancellation is honored during
/// every wait.
pub async fn await_completion(
    provider: &dyn GenerationProvider,
    job_id: &str,
    schedule: &PollSchedule,
    cancel: &CancellationToken,
) -> Result<String, GenerateError> {
    let deadline = Instant::now() + schedule.timeout;
    let mut wait = schedule.initial_delay;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return Err(GenerateError::Cancelled),
            _ = tokio::time::sleep(wait) => {}
        }

        if Instant::now() >= deadline {
            tracing::warn!(
                provider = provider.name(),
                job_id,
                "generation polling exceeded {:?}",
                schedule.timeout
            );
            return Err(GenerateError::PollingTimeout(schedule.timeout));
        }

        match provider.poll(job_id).await {
            Ok(JobStatus::Complete { result_url }) => return Ok(result_url),
            Ok(JobStatus::Failed { reason }) => return Err(GenerateError::JobFailed(reason)),
            Ok(JobStatus::Pending) => {
                tracing::debug!(provider = provider.name(), job_id, "generation pending");
            }
            Err(e) => {
                // Transient transport errors are retried until the deadline
                tracing::warn!(provider = provider.name(), job_id, "poll error: {}", e);
            }
        }

        wait = schedule.interval;
    }
}
