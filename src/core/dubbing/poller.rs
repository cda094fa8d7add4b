//! Status polling for submitted dubbing jobs.
//!
//! A job moves through `Submitted → Polling → {Succeeded, Failed, TimedOut}`.
//! Each poll produces a [`JobStatusSnapshot`]; the pure [`transition`] function
//! decides what happens next, and [`StatusPoller`] drives the loop: one status
//! request at a time, a fixed interval between requests, and a deadline counted
//! from job submission.

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use tokio::time::{Instant, sleep, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::base::{DubbedVideo, DubbingProvider, JobHandle};
use super::normalize::{
    extract_message, extract_result_url, extract_run_id, extract_status, is_failure_status,
    is_success_status, with_result_url,
};
use crate::core::error::{MediaError, MediaResult};

/// Time between two status requests.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Total time allowed for a job, measured from submission.
pub const DEFAULT_POLL_DEADLINE: Duration = Duration::from_secs(120);

/// Message used when a failed job carries no message of its own.
const DEFAULT_FAILURE_MESSAGE: &str = "Dubbing failed";

/// Cadence and deadline of the polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub deadline: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            deadline: DEFAULT_POLL_DEADLINE,
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration, deadline: Duration) -> Self {
        Self { interval, deadline }
    }

    /// Number of status requests a job that never finishes will see.
    pub fn expected_polls(&self) -> u128 {
        let interval = self.interval.as_millis().max(1);
        self.deadline.as_millis().div_ceil(interval)
    }
}

/// Lifecycle state of a dubbing job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Submitted,
    Polling,
    Succeeded,
    Failed,
    TimedOut,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Succeeded | JobState::Failed | JobState::TimedOut
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Submitted => "SUBMITTED",
            JobState::Polling => "POLLING",
            JobState::Succeeded => "SUCCEEDED",
            JobState::Failed => "FAILED",
            JobState::TimedOut => "TIMED_OUT",
        };
        f.write_str(name)
    }
}

/// Fields derived from one status document.
#[derive(Debug, Clone)]
pub struct JobStatusSnapshot {
    pub raw_status: Option<String>,
    pub result_url: Option<String>,
    pub run_id: Option<String>,
    pub message: Option<String>,
    document: Value,
}

impl JobStatusSnapshot {
    pub fn from_document(document: Value) -> Self {
        Self {
            raw_status: extract_status(&document),
            result_url: extract_result_url(&document),
            run_id: extract_run_id(&document),
            message: extract_message(&document),
            document,
        }
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn into_document(self) -> Value {
        self.document
    }
}

/// What the poller does after reading a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Not finished yet; poll again after the interval
    Continue,
    /// Snapshot carries the result URL itself
    Succeeded { url: String },
    /// Job finished but the URL lives behind the run result resource
    FetchResult { run_id: String },
    /// Job failed or was cancelled upstream
    Failed { message: String },
}

impl Transition {
    pub fn state(&self) -> JobState {
        match self {
            Transition::Continue | Transition::FetchResult { .. } => JobState::Polling,
            Transition::Succeeded { .. } => JobState::Succeeded,
            Transition::Failed { .. } => JobState::Failed,
        }
    }
}

/// Decide the next step from a single snapshot.
///
/// A direct URL wins over everything. A success status only counts when a run
/// id is present. A success status without run id or URL keeps polling.
pub fn transition(snapshot: &JobStatusSnapshot) -> Transition {
    if let Some(url) = &snapshot.result_url {
        return Transition::Succeeded { url: url.clone() };
    }

    let status = snapshot.raw_status.as_deref().unwrap_or_default();

    if is_success_status(status) {
        if let Some(run_id) = &snapshot.run_id {
            return Transition::FetchResult {
                run_id: run_id.clone(),
            };
        }
    }

    if is_failure_status(status) {
        return Transition::Failed {
            message: snapshot
                .message
                .clone()
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
        };
    }

    Transition::Continue
}

/// Drives a submitted job to a terminal state.
pub struct StatusPoller<'a> {
    provider: &'a dyn DubbingProvider,
    policy: PollPolicy,
}

impl<'a> StatusPoller<'a> {
    pub fn new(provider: &'a dyn DubbingProvider, policy: PollPolicy) -> Self {
        Self { provider, policy }
    }

    /// Poll until the job succeeds, fails, the deadline passes or `cancel` fires.
    ///
    /// Any error from the provider ends the loop immediately; only "still
    /// running" snapshots lead to another request.
    pub async fn run(
        &self,
        handle: &JobHandle,
        cancel: &CancellationToken,
    ) -> MediaResult<DubbedVideo> {
        let deadline = handle.submitted_at + self.policy.deadline;
        let mut polls: u32 = 0;

        debug!(
            task_id = %handle.task_id,
            state = %JobState::Submitted,
            interval_ms = self.policy.interval.as_millis() as u64,
            deadline_ms = self.policy.deadline.as_millis() as u64,
            "Polling dubbing job"
        );

        while Instant::now() < deadline {
            let document = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(MediaError::Cancelled),
                status = self.provider.job_status(handle) => status?,
                _ = sleep_until(deadline) => break,
            };
            polls += 1;

            let snapshot = JobStatusSnapshot::from_document(document);
            let next = transition(&snapshot);
            let state = next.state();

            match next {
                Transition::Succeeded { url } => {
                    info!(
                        task_id = %handle.task_id,
                        polls,
                        state = %JobState::Succeeded,
                        "Video dubbing successful (direct url)"
                    );
                    let payload = with_result_url(snapshot.into_document(), &url);
                    return Ok(DubbedVideo {
                        dubbed_video_url: url,
                        payload,
                    });
                }
                Transition::FetchResult { run_id } => {
                    return self
                        .fetch_result(handle, &run_id, polls, deadline, cancel)
                        .await;
                }
                Transition::Failed { message } => {
                    warn!(
                        task_id = %handle.task_id,
                        polls,
                        state = %JobState::Failed,
                        status = ?snapshot.raw_status,
                        "Dubbing job failed: {}",
                        message
                    );
                    return Err(MediaError::JobFailed(message));
                }
                Transition::Continue => {
                    debug!(
                        task_id = %handle.task_id,
                        polls,
                        state = %state,
                        status = ?snapshot.raw_status,
                        "Dubbing job still running"
                    );
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(MediaError::Cancelled),
                _ = sleep(self.policy.interval.min(remaining)) => {}
            }
        }

        Err(timed_out(handle, polls))
    }

    /// Single follow-up request for jobs whose status points at a run result.
    ///
    /// Bound by the same deadline as the status loop.
    async fn fetch_result(
        &self,
        handle: &JobHandle,
        run_id: &str,
        polls: u32,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> MediaResult<DubbedVideo> {
        debug!(task_id = %handle.task_id, run_id, "Fetching dubbing result");

        let document = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(MediaError::Cancelled),
            result = self.provider.job_result(run_id) => result?,
            _ = sleep_until(deadline) => return Err(timed_out(handle, polls)),
        };

        match extract_result_url(&document) {
            Some(url) => {
                info!(
                    task_id = %handle.task_id,
                    run_id,
                    polls,
                    state = %JobState::Succeeded,
                    "Video dubbing successful (dub-result url)"
                );
                let payload = with_result_url(document, &url);
                Ok(DubbedVideo {
                    dubbed_video_url: url,
                    payload,
                })
            }
            None => {
                warn!(
                    task_id = %handle.task_id,
                    run_id,
                    "Dubbing result carried no video url: {}",
                    document
                );
                Err(MediaError::ProviderContract(
                    "Dubbing provider reported success without a dubbed video URL".to_string(),
                ))
            }
        }
    }
}

fn timed_out(handle: &JobHandle, polls: u32) -> MediaError {
    warn!(
        task_id = %handle.task_id,
        polls,
        state = %JobState::TimedOut,
        "Dubbing job did not finish before the deadline"
    );
    MediaError::TimedOut
}
