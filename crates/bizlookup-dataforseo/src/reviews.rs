//! Asynchronous reviews retrieval.
//!
//! DataForSEO only serves Google reviews through its task protocol:
//!
//! 1. `task_post` queues the work and returns an opaque task id.
//! 2. After an unconditional initial wait, `tasks_ready` is polled until the
//!    id shows up. The loop is bounded by wall-clock time, not attempts, and
//!    a poll still in flight when the budget runs out is abandoned.
//! 3. `task_get/{id}` fetches the result, which must carry the success
//!    sentinel before it is normalized.
//!
//! Every business-level failure (no task id, failing status, empty result,
//! timeout, cancellation) comes back as `TaskOutcome { results: None, meta }`.
//! Only transport failures are returned as errors, and none are retried.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::client::{DataForSeoClient, PollConfig};
use crate::error::DataForSeoError;
use crate::location::classify_location;
use crate::normalize::{normalize_reviews, ReviewsResult};
use crate::outcome::{TaskMeta, TaskOutcome};
use crate::types::{ApiResponse, ReadyTask, ReviewsTaskPost, ReviewsTaskResult};

pub const TASK_POST_ENDPOINT: &str = "v3/business_data/google/reviews/task_post";
pub const TASKS_READY_ENDPOINT: &str = "v3/business_data/google/reviews/tasks_ready";
pub const TASK_GET_ENDPOINT: &str = "v3/business_data/google/reviews/task_get";

/// Review ordering requested from the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReviewSort {
    #[default]
    Newest,
    HighestRating,
    LowestRating,
    Relevant,
}

impl ReviewSort {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewSort::Newest => "newest",
            ReviewSort::HighestRating => "highest_rating",
            ReviewSort::LowestRating => "lowest_rating",
            ReviewSort::Relevant => "relevant",
        }
    }
}

impl fmt::Display for ReviewSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(ReviewSort::Newest),
            "highest_rating" => Ok(ReviewSort::HighestRating),
            "lowest_rating" => Ok(ReviewSort::LowestRating),
            "relevant" => Ok(ReviewSort::Relevant),
            other => Err(format!(
                "unknown sort '{other}' (expected newest, highest_rating, lowest_rating or relevant)"
            )),
        }
    }
}

/// Outcome of `task_post`.
#[derive(Debug)]
enum Submission {
    Accepted(String),
    Rejected(TaskMeta),
}

/// How the readiness loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Readiness {
    Ready { attempts: u32 },
    TimedOut { attempts: u32 },
    Cancelled { attempts: u32 },
}

impl DataForSeoClient {
    /// Retrieves up to `depth` reviews for the place identified by `cid`.
    ///
    /// `location` is free text (e.g. `"Hamilton, ON"`) and only selects the
    /// provider region. Polling runs until the task is ready or the
    /// configured budget elapses.
    ///
    /// # Errors
    ///
    /// Only transport failures: [`DataForSeoError::Status`],
    /// [`DataForSeoError::Http`], or [`DataForSeoError::Deserialize`].
    pub async fn fetch_reviews(
        &self,
        cid: &str,
        location: &str,
        depth: u32,
        sort: ReviewSort,
    ) -> Result<TaskOutcome<ReviewsResult>, DataForSeoError> {
        self.fetch_reviews_with_cancel(cid, location, depth, sort, &CancellationToken::new())
            .await
    }

    /// Like [`fetch_reviews`](Self::fetch_reviews), but stops waiting as
    /// soon as `cancel` fires and returns a [`crate::STATUS_CANCELLED`]
    /// outcome.
    ///
    /// # Errors
    ///
    /// Only transport failures, as for `fetch_reviews`.
    pub async fn fetch_reviews_with_cancel(
        &self,
        cid: &str,
        location: &str,
        depth: u32,
        sort: ReviewSort,
        cancel: &CancellationToken,
    ) -> Result<TaskOutcome<ReviewsResult>, DataForSeoError> {
        let task_id = match self.submit_reviews_task(cid, location, depth, sort).await? {
            Submission::Accepted(id) => id,
            Submission::Rejected(meta) => {
                tracing::warn!(
                    cid,
                    status_code = ?meta.status_code,
                    status_message = ?meta.status_message,
                    "reviews task was not accepted"
                );
                return Ok(TaskOutcome::failure(meta));
            }
        };
        tracing::info!(cid, %task_id, "reviews task submitted");

        let PollConfig { timeout, .. } = self.poll;
        match self.wait_until_ready(&task_id, cancel).await? {
            Readiness::Ready { attempts } => {
                tracing::info!(%task_id, attempts, "reviews task ready");
            }
            Readiness::TimedOut { attempts } => {
                tracing::warn!(%task_id, attempts, ?timeout, "reviews task timed out");
                return Ok(TaskOutcome::failure(TaskMeta::timed_out(format!(
                    "reviews task {task_id} not ready after {attempts} polls ({timeout:?} budget)"
                ))));
            }
            Readiness::Cancelled { attempts } => {
                tracing::warn!(%task_id, attempts, "reviews task cancelled by caller");
                return Ok(TaskOutcome::failure(TaskMeta::cancelled(format!(
                    "reviews task {task_id} cancelled after {attempts} polls"
                ))));
            }
        }

        self.fetch_reviews_result(&task_id).await
    }

    async fn submit_reviews_task(
        &self,
        cid: &str,
        location: &str,
        depth: u32,
        sort: ReviewSort,
    ) -> Result<Submission, DataForSeoError> {
        let target = classify_location(location);
        let payload = [ReviewsTaskPost {
            cid,
            location_name: target.country,
            language_name: &self.language_name,
            depth,
            sort_by: sort.as_str(),
        }];

        let envelope: ApiResponse<serde_json::Value> =
            self.post(TASK_POST_ENDPOINT, &payload).await?;

        let envelope_meta = TaskMeta::new(envelope.status_code, envelope.status_message.clone());
        let Some(task) = envelope.into_first_task() else {
            return Ok(Submission::Rejected(envelope_meta));
        };

        let meta = TaskMeta::new(task.status_code, task.status_message);
        Ok(match accepted_task_id(task.id, meta.status_code) {
            Some(id) => Submission::Accepted(id),
            None => Submission::Rejected(meta),
        })
    }

    /// Polls `tasks_ready` until `task_id` appears, the budget elapses, or
    /// the caller cancels. Polls never overlap.
    async fn wait_until_ready(
        &self,
        task_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Readiness, DataForSeoError> {
        let PollConfig {
            initial_wait,
            poll_interval,
            timeout,
        } = self.poll;

        if !sleep_or_cancel(initial_wait, cancel).await {
            return Ok(Readiness::Cancelled { attempts: 0 });
        }

        let deadline = Instant::now() + timeout;
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let poll = tokio::time::timeout_at(deadline, self.is_task_ready(task_id));
            let polled = tokio::select! {
                biased;
                () = cancel.cancelled() => return Ok(Readiness::Cancelled { attempts }),
                polled = poll => polled,
            };

            let ready = match polled {
                Ok(ready) => ready?,
                // The budget ran out while this poll was still in flight.
                Err(_) => return Ok(Readiness::TimedOut { attempts }),
            };
            if ready {
                return Ok(Readiness::Ready { attempts });
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(Readiness::TimedOut { attempts });
            }

            let remaining = deadline - now;
            tracing::debug!(task_id, attempts, ?remaining, "reviews task not ready yet");

            if remaining <= poll_interval {
                // No further poll fits in the budget.
                return Ok(if sleep_or_cancel(remaining, cancel).await {
                    Readiness::TimedOut { attempts }
                } else {
                    Readiness::Cancelled { attempts }
                });
            }
            if !sleep_or_cancel(poll_interval, cancel).await {
                return Ok(Readiness::Cancelled { attempts });
            }
        }
    }

    async fn is_task_ready(&self, task_id: &str) -> Result<bool, DataForSeoError> {
        let envelope: ApiResponse<ReadyTask> = self.get(TASKS_READY_ENDPOINT).await?;
        Ok(envelope
            .tasks
            .unwrap_or_default()
            .into_iter()
            .flat_map(|task| task.result.unwrap_or_default())
            .any(|ready| ready.id.as_deref() == Some(task_id)))
    }

    async fn fetch_reviews_result(
        &self,
        task_id: &str,
    ) -> Result<TaskOutcome<ReviewsResult>, DataForSeoError> {
        let endpoint = format!("{TASK_GET_ENDPOINT}/{task_id}");
        let envelope: ApiResponse<ReviewsTaskResult> = self.get(&endpoint).await?;

        let envelope_meta = TaskMeta::new(envelope.status_code, envelope.status_message.clone());
        let Some(task) = envelope.into_first_task() else {
            tracing::warn!(task_id, "task_get response contained no tasks");
            return Ok(TaskOutcome::failure(envelope_meta));
        };

        let meta = TaskMeta::new(task.status_code, task.status_message.clone());
        if !meta.is_success() {
            tracing::warn!(
                task_id,
                status_code = ?meta.status_code,
                status_message = ?meta.status_message,
                "reviews task finished with a failing status"
            );
            return Ok(TaskOutcome::failure(meta));
        }

        match task.into_first_result() {
            Some(result) => {
                let reviews = normalize_reviews(result);
                tracing::info!(task_id, reviews = reviews.reviews.len(), "reviews fetched");
                Ok(TaskOutcome::success(reviews, meta))
            }
            None => {
                tracing::warn!(task_id, "reviews task succeeded with an empty result");
                Ok(TaskOutcome::failure(meta))
            }
        }
    }
}

/// A task id is usable only when present and the task status is in the
/// provider's `2xxxx` success family (`20100` = task created).
fn accepted_task_id(id: Option<String>, status_code: Option<i64>) -> Option<String> {
    let id = id.filter(|id| !id.trim().is_empty())?;
    let accepted = status_code.is_none_or(|code| (20_000..30_000).contains(&code));
    accepted.then_some(id)
}

/// Sleeps for `duration` unless `cancel` fires first. Returns `false` when
/// cancelled.
async fn sleep_or_cancel(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        () = cancel.cancelled() => false,
        () = tokio::time::sleep(duration) => true,
    }
}
