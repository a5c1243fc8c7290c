//! Result envelope shared by every orchestration call.

use serde::Serialize;

/// Provider status code meaning the call fully succeeded.
pub const STATUS_OK: i64 = 20_000;

/// Local status code used when a task never showed up in the ready list
/// within the polling budget.
pub const STATUS_TIMEOUT: i64 = 40_800;

/// Local status code used when the caller cancelled a pending task.
pub const STATUS_CANCELLED: i64 = 49_900;

/// Diagnostic status pair returned alongside every orchestration result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskMeta {
    pub status_code: Option<i64>,
    pub status_message: Option<String>,
}

impl TaskMeta {
    #[must_use]
    pub fn new(status_code: Option<i64>, status_message: Option<String>) -> Self {
        Self {
            status_code,
            status_message,
        }
    }

    #[must_use]
    pub fn timed_out(message: String) -> Self {
        Self::new(Some(STATUS_TIMEOUT), Some(message))
    }

    #[must_use]
    pub fn cancelled(message: String) -> Self {
        Self::new(Some(STATUS_CANCELLED), Some(message))
    }

    /// `true` only when the provider reported the success sentinel.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_code == Some(STATUS_OK)
    }
}

/// `results` is `None` on every failure path; `meta` explains why.
///
/// A successful call can still carry `None` when the provider returned an
/// empty result set. Check [`TaskMeta::is_success`] to tell the two apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskOutcome<T> {
    pub results: Option<T>,
    pub meta: TaskMeta,
}

impl<T> TaskOutcome<T> {
    #[must_use]
    pub fn success(results: T, meta: TaskMeta) -> Self {
        Self {
            results: Some(results),
            meta,
        }
    }

    #[must_use]
    pub fn failure(meta: TaskMeta) -> Self {
        Self {
            results: None,
            meta,
        }
    }
}
