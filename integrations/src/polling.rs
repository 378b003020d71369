//! Fixed-interval polling for long-running upstream jobs
//!
//! Submission is never retried here; only the status check repeats until the
//! job reports a terminal state or the attempt ceiling is reached.
// Copyright 2025 Francisco F. Pinochet
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use promptgate_config::PollingConfig;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{IntegrationError, IntegrationResult};

/// Status of an upstream job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
}

impl JobStatus {
    /// Map a provider-specific status label onto a `JobStatus`
    ///
    /// Labels are compared case-insensitively; anything that is neither a
    /// success nor a failure label is still pending.
    pub fn from_label(label: &str, success: &[&str], failure: &[&str]) -> Self {
        let label = label.trim();
        if success.iter().any(|s| s.eq_ignore_ascii_case(label)) {
            JobStatus::Completed
        } else if failure.iter().any(|s| s.eq_ignore_ascii_case(label)) {
            JobStatus::Failed
        } else {
            JobStatus::Pending
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

/// Snapshot of a job as reported by one status check
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollableJob<T = serde_json::Value> {
    pub id: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_url: Option<String>,
    /// Raw status payload from the provider
    pub payload: T,
}

impl<T> PollableJob<T> {
    pub fn is_completed(&self) -> bool {
        self.status == JobStatus::Completed
    }

    pub fn is_failed(&self) -> bool {
        self.status == JobStatus::Failed
    }
}

/// Poll loop configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between two status checks
    pub interval: Duration,
    /// Maximum number of status checks before giving up
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_attempts: 30,
        }
    }
}

impl PollConfig {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// 10s interval, for jobs that usually finish within minutes
    pub fn fast() -> Self {
        Self::new(Duration::from_secs(10), 30)
    }

    /// Worst-case time spent waiting between checks
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }
}

impl From<&PollingConfig> for PollConfig {
    fn from(config: &PollingConfig) -> Self {
        Self::new(Duration::from_secs(config.interval_secs), config.max_attempts)
    }
}

/// Poll `check` until the returned state is terminal
///
/// Returns the first state for which `is_success` holds, `JobFailed` for the
/// first state for which `is_failure` holds, and `Timeout` once
/// `max_attempts` checks have passed without either. Errors from `check`
/// are logged and count as a pending attempt.
pub async fn poll_until_terminal<S, F, Fut, P, Q>(
    config: &PollConfig,
    job_id: &str,
    mut check: F,
    is_success: P,
    is_failure: Q,
) -> IntegrationResult<S>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = IntegrationResult<S>>,
    P: Fn(&S) -> bool,
    Q: Fn(&S) -> bool,
    S: Serialize,
{
    let max_attempts = config.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        match check().await {
            Ok(state) if is_success(&state) => {
                info!(job_id = job_id, attempt = attempt, "Job completed");
                return Ok(state);
            }
            Ok(state) if is_failure(&state) => {
                warn!(job_id = job_id, attempt = attempt, "Job reported failure");
                return Err(IntegrationError::JobFailed {
                    job_id: job_id.to_string(),
                    details: serde_json::to_value(&state).ok(),
                });
            }
            Ok(_) => {
                debug!(
                    job_id = job_id,
                    attempt = attempt,
                    max_attempts = max_attempts,
                    "Job still pending"
                );
            }
            Err(e) => {
                warn!(
                    job_id = job_id,
                    attempt = attempt,
                    max_attempts = max_attempts,
                    error = %e,
                    "Status check failed, treating job as pending"
                );
            }
        }

        if attempt < max_attempts {
            sleep(config.interval).await;
        }
    }

    Err(IntegrationError::Timeout(format!(
        "job {} did not finish after {} status checks",
        job_id, max_attempts
    )))
}

/// `poll_until_terminal` specialised to `PollableJob`
pub async fn poll_job<T, F, Fut>(
    config: &PollConfig,
    job_id: &str,
    check: F,
) -> IntegrationResult<PollableJob<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = IntegrationResult<PollableJob<T>>>,
    T: Serialize,
{
    poll_until_terminal(config, job_id, check, PollableJob::is_completed, PollableJob::is_failed)
        .await
}
