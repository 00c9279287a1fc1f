//! Polling of asynchronous Cloud Manager jobs.
//!
//! Long-running operations (cloud archive generation, batch target creation,
//! WTO and heatmap generation) answer with a `Location` header that points at
//! a job status resource, and optionally a JSON body with an
//! `estimatedLatency` in milliseconds. The poller waits that long (or the
//! configured poll interval), then fetches the status resource until its
//! `status` is `COMPLETED`.
//!
//! Polling is unbounded unless a timeout is configured through
//! [`ManagerClientBuilder::poll_timeout`](crate::client::ManagerClientBuilder::poll_timeout)
//! or [`PollOptions::with_timeout`]. Dropping the returned future or
//! triggering the [`CancellationToken`] of [`PollOptions`] stops it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use wikitude_manager_core::client::{ManagerClient, NO_PAYLOAD};
//! use wikitude_manager_core::endpoint::{Endpoint, PathParams};
//!
//! # async fn example(client: &ManagerClient) -> wikitude_manager_core::error::ManagerResult<()> {
//! let params = PathParams::new().collection("tc_123");
//! let status = client
//!     .execute_job(Endpoint::GenerateTargetCollection, &params, NO_PAYLOAD)
//!     .await?;
//! assert!(status.is_completed());
//! # Ok(())
//! # }
//! ```

use crate::client::{ManagerClient, ManagerResponse, NO_PAYLOAD};
use crate::endpoint::{Endpoint, PathParams};
use crate::error::{ManagerError, ManagerResult};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Terminal value of a job's `status` field.
pub const STATUS_COMPLETED: &str = "COMPLETED";

/// A job status document.
///
/// Only `status` is required. Every other field the service reports (job id,
/// target collection id, generated file URLs, ...) is kept in `details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    /// Current status, `COMPLETED` once the job is finished.
    pub status: String,

    /// Estimated remaining time in milliseconds, as reported (any JSON number).
    #[serde(
        rename = "estimatedLatency",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub estimated_latency: Option<f64>,

    /// All remaining fields of the document.
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl JobStatus {
    /// Returns `true` if the job reached its terminal status.
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }

    /// The job id, if the document carries one.
    pub fn id(&self) -> Option<&str> {
        self.details.get("id").and_then(|v| v.as_str())
    }

    /// The estimated remaining time as a wait, clamped at zero.
    pub fn estimated_wait(&self) -> Option<Duration> {
        self.estimated_latency.map(latency_to_duration)
    }

    /// Look up an arbitrary field of the document.
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.details.get(field)
    }
}

/// The part of an accepted response the poller reads.
#[derive(Debug, Deserialize)]
struct AcceptedBody {
    #[serde(rename = "estimatedLatency")]
    estimated_latency: Option<f64>,
}

/// Convert a latency in (possibly fractional) milliseconds into a wait.
///
/// Negative and non-finite values become zero.
fn latency_to_duration(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        // float-to-int `as` saturates at u64::MAX
        Duration::from_micros((ms * 1000.0).round() as u64)
    } else {
        Duration::ZERO
    }
}

/// Settings for polling a single job.
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Wait between status checks, and before the first one when the service
    /// gives no `estimatedLatency`.
    pub interval: Duration,

    /// Upper bound on the total time spent polling.
    pub timeout: Option<Duration>,

    /// Token that stops polling when cancelled.
    pub cancellation: Option<CancellationToken>,
}

impl PollOptions {
    /// Poll every `interval`, without timeout or cancellation.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            timeout: None,
            cancellation: None,
        }
    }

    /// Give up with [`ManagerError::PollTimeout`] after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Stop with [`ManagerError::Cancelled`] once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// State of the poll loop.
#[derive(Debug)]
enum PollState {
    /// The triggering request was accepted; the initial wait is pending.
    Dispatched { initial_delay: Duration },
    /// Waiting for a terminal status.
    Polling,
    /// The terminal status document was observed.
    Done(JobStatus),
}

impl ManagerClient {
    /// The poll options derived from the client configuration.
    pub fn poll_options(&self) -> PollOptions {
        PollOptions {
            interval: self.poll_interval,
            timeout: self.poll_timeout,
            cancellation: None,
        }
    }

    /// Dispatch the request of an asynchronous endpoint and poll the job it
    /// starts until completion, using the client's poll settings.
    pub async fn execute_job<T: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        params: &PathParams<'_>,
        payload: Option<&T>,
    ) -> ManagerResult<JobStatus> {
        self.execute_job_with(endpoint, params, payload, &self.poll_options())
            .await
    }

    /// Like [`execute_job`](Self::execute_job) with explicit poll options.
    pub async fn execute_job_with<T: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        params: &PathParams<'_>,
        payload: Option<&T>,
        options: &PollOptions,
    ) -> ManagerResult<JobStatus> {
        let response = self.execute(endpoint, params, payload).await?;
        self.poll_job_with(&response, options).await
    }

    /// Poll the job started by `response` until it reports `COMPLETED`.
    pub async fn poll_job(&self, response: &ManagerResponse) -> ManagerResult<JobStatus> {
        self.poll_job_with(response, &self.poll_options()).await
    }

    /// Like [`poll_job`](Self::poll_job) with explicit poll options.
    pub async fn poll_job_with(
        &self,
        response: &ManagerResponse,
        options: &PollOptions,
    ) -> ManagerResult<JobStatus> {
        self.poll_job_using(response, options, tokio::time::sleep)
            .await
    }

    /// The poll loop, with the wait primitive injected.
    #[tracing::instrument(
        name = "wikitude::job::poll",
        skip_all,
        fields(path = %response.path())
    )]
    pub(crate) async fn poll_job_using<S, F>(
        &self,
        response: &ManagerResponse,
        options: &PollOptions,
        mut sleep: S,
    ) -> ManagerResult<JobStatus>
    where
        S: FnMut(Duration) -> F,
        F: Future<Output = ()>,
    {
        let location = response
            .location()
            .ok_or_else(|| ManagerError::MissingLocation {
                path: response.path().to_string(),
            })?
            .to_string();

        let initial_delay = match response.json_opt::<AcceptedBody>()? {
            Some(AcceptedBody {
                estimated_latency: Some(ms),
            }) => latency_to_duration(ms),
            _ => options.interval,
        };

        tracing::debug!(
            location = %location,
            initial_delay = ?initial_delay,
            "job accepted, polling for completion"
        );

        let started = Instant::now();
        let mut attempts = 0u32;
        let mut state = PollState::Dispatched { initial_delay };

        loop {
            state = match state {
                PollState::Dispatched { initial_delay } => {
                    Self::pause(&location, options, started, initial_delay, &mut sleep).await?;
                    PollState::Polling
                }
                PollState::Polling => {
                    attempts += 1;
                    let status = self.read_status(&location).await?;
                    if status.is_completed() {
                        PollState::Done(status)
                    } else {
                        tracing::trace!(
                            status = %status.status,
                            attempt = attempts,
                            "job still in progress, waiting"
                        );
                        Self::pause(&location, options, started, options.interval, &mut sleep)
                            .await?;
                        PollState::Polling
                    }
                }
                PollState::Done(status) => {
                    tracing::debug!(attempts, "job completed");
                    return Ok(status);
                }
            };
        }
    }

    /// Fetch and parse the status document at `location`.
    async fn read_status(&self, location: &str) -> ManagerResult<JobStatus> {
        let response = self.dispatch(Method::GET, location, NO_PAYLOAD).await?;
        Ok(serde_json::from_slice(response.body())?)
    }

    /// Wait `delay`, honouring the timeout and cancellation of `options`.
    async fn pause<S, F>(
        location: &str,
        options: &PollOptions,
        started: Instant,
        delay: Duration,
        sleep: &mut S,
    ) -> ManagerResult<()>
    where
        S: FnMut(Duration) -> F,
        F: Future<Output = ()>,
    {
        let delay = match options.timeout {
            Some(timeout) => {
                let elapsed = started.elapsed();
                if elapsed >= timeout {
                    return Err(ManagerError::PollTimeout {
                        location: location.to_string(),
                        timeout,
                    });
                }
                delay.min(timeout - elapsed)
            }
            None => delay,
        };

        match &options.cancellation {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(ManagerError::Cancelled {
                        location: location.to_string(),
                    }),
                    _ = sleep(delay) => Ok(()),
                }
            }
            None => {
                sleep(delay).await;
                Ok(())
            }
        }
    }
}
