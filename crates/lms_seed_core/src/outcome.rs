//! crates/lms_seed_core/src/outcome.rs
//!
//! Per-step result type. Seeding is best-effort: a step may fully succeed,
//! succeed for some of its items, or produce nothing at all. Callers branch on
//! the outcome instead of on printed text.

use std::fmt;

/// Why one unit of work inside a step did not happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub context: String,
    pub reason: String,
}

impl StepFailure {
    pub fn new(context: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            context: context.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Success,
    Partial,
    Failure,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome<T> {
    /// Everything the step attempted went through.
    Success(T),
    /// The step produced a value but some of its items failed.
    Partial { value: T, failures: Vec<StepFailure> },
    /// The step produced nothing usable.
    Failure(StepFailure),
}

impl<T> StepOutcome<T> {
    /// `Success` when `failures` is empty, `Partial` otherwise.
    pub fn from_parts(value: T, failures: Vec<StepFailure>) -> Self {
        if failures.is_empty() {
            StepOutcome::Success(value)
        } else {
            StepOutcome::Partial { value, failures }
        }
    }

    pub fn status(&self) -> StepStatus {
        match self {
            StepOutcome::Success(_) => StepStatus::Success,
            StepOutcome::Partial { .. } => StepStatus::Partial,
            StepOutcome::Failure(_) => StepStatus::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failure(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            StepOutcome::Success(value) | StepOutcome::Partial { value, .. } => Some(value),
            StepOutcome::Failure(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            StepOutcome::Success(value) | StepOutcome::Partial { value, .. } => Some(value),
            StepOutcome::Failure(_) => None,
        }
    }

    pub fn failures(&self) -> &[StepFailure] {
        match self {
            StepOutcome::Success(_) => &[],
            StepOutcome::Partial { failures, .. } => failures,
            StepOutcome::Failure(failure) => std::slice::from_ref(failure),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> StepOutcome<U> {
        match self {
            StepOutcome::Success(value) => StepOutcome::Success(f(value)),
            StepOutcome::Partial { value, failures } => StepOutcome::Partial {
                value: f(value),
                failures,
            },
            StepOutcome::Failure(failure) => StepOutcome::Failure(failure),
        }
    }
}
