//! Error types for grading and the attempt lifecycle.
//!
//! Grading and state errors are fatal to a submission and reach the caller
//! unmodified. Analytics never fail; thin history is reported as an explicit
//! "unavailable" value instead (see [`crate::prediction::Prediction`]).

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the scoring engine before any computation happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradingError {
    /// Some questions have no answer, or an empty one.
    #[error("{missing} question(s) left unanswered")]
    MissingAnswers { missing: usize },
}

/// Errors reported by the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An attempt with this id already exists.
    #[error("attempt {0} already exists")]
    DuplicateAttempt(Uuid),

    /// The backing store failed.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Errors from submitting an attempt for grading.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The attempt was graded before; its score is never overwritten.
    #[error("attempt {attempt_id} was already graded at {completed_at}")]
    AlreadyGraded {
        attempt_id: Uuid,
        completed_at: DateTime<Utc>,
    },

    /// No attempt with this id exists in the store.
    #[error("attempt {0} not found")]
    UnknownAttempt(Uuid),

    /// A question handed to `submit` belongs to a different test.
    #[error("question {question_id} does not belong to test {test_id}")]
    ForeignQuestion { question_id: Uuid, test_id: Uuid },

    #[error(transparent)]
    Grading(#[from] GradingError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LifecycleError {
    /// Returns `true` if the attempt is already graded and must not be re-submitted.
    pub fn is_conflict(&self) -> bool {
        matches!(self, LifecycleError::AlreadyGraded { .. })
    }

    /// Returns `true` if the answer set was rejected before any write.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LifecycleError::Grading(_) | LifecycleError::ForeignQuestion { .. }
        )
    }
}

/// Errors from attaching feedback to an attempt.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("attempt {0} not found")]
    UnknownAttempt(Uuid),

    /// Feedback is only accepted once the attempt is graded.
    #[error("attempt {0} has not been graded yet")]
    NotGraded(Uuid),

    #[error("feedback message is empty")]
    EmptyMessage,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        let graded = LifecycleError::AlreadyGraded {
            attempt_id: Uuid::nil(),
            completed_at: Utc::now(),
        };
        assert!(graded.is_conflict());
        assert!(!graded.is_validation());

        let missing: LifecycleError = GradingError::MissingAnswers { missing: 2 }.into();
        assert!(missing.is_validation());
        assert!(!missing.is_conflict());
    }

    #[test]
    fn grading_error_passes_through_unmodified() {
        let err: LifecycleError = GradingError::MissingAnswers { missing: 3 }.into();
        assert_eq!(err.to_string(), "3 question(s) left unanswered");
    }
}
