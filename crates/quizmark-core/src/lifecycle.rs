//! Attempt lifecycle: creation, at-most-once grading, and feedback.
//!
//! An attempt is `Open` until its answers are submitted and `Graded` after.
//! `Graded` is terminal. Time limits are not enforced: `duration_minutes` is
//! stored on the test but there is no expired state.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{FeedbackError, LifecycleError, StoreError};
use crate::model::{Attempt, AttemptState, Feedback, Question};
use crate::scoring::{grade, Answers, GradingResult};
use crate::store::{AttemptStore, Completion, CompletionOutcome};

/// Canned feedback messages offered to teachers.
pub const PRESET_FEEDBACK: [&str; 5] = [
    "Excellent work!",
    "Good job!",
    "Keep improving!",
    "Needs more practice",
    "Well done!",
];

/// Drives attempts through their lifecycle against a store.
#[derive(Clone)]
pub struct AttemptLifecycle {
    store: Arc<dyn AttemptStore>,
}

impl AttemptLifecycle {
    pub fn new(store: Arc<dyn AttemptStore>) -> Self {
        Self { store }
    }

    /// Open a new attempt. Every call is a new take; retakes never reuse
    /// an earlier attempt's state.
    pub async fn start_attempt(
        &self,
        student_id: Uuid,
        test_id: Uuid,
    ) -> Result<Attempt, StoreError> {
        let attempt = Attempt::open(student_id, test_id, Utc::now());
        self.store.insert_attempt(attempt.clone()).await?;
        tracing::info!(attempt = %attempt.id, student = %student_id, test = %test_id, "attempt started");
        Ok(attempt)
    }

    /// Grade `answers` and record the result, at most once per attempt.
    ///
    /// Rejects an attempt that is already graded without grading it again.
    /// The store write is conditional on the attempt still being open, so of
    /// two concurrent submissions for the same attempt exactly one succeeds.
    pub async fn submit_attempt(
        &self,
        attempt: &Attempt,
        questions: &[Question],
        answers: &Answers,
    ) -> Result<GradingResult, LifecycleError> {
        if let Some(completed_at) = attempt.completed_at {
            tracing::warn!(attempt = %attempt.id, "rejected re-submission of graded attempt");
            return Err(LifecycleError::AlreadyGraded {
                attempt_id: attempt.id,
                completed_at,
            });
        }

        if let Some(q) = questions.iter().find(|q| q.test_id != attempt.test_id) {
            return Err(LifecycleError::ForeignQuestion {
                question_id: q.id,
                test_id: attempt.test_id,
            });
        }

        let result = grade(questions, answers)?;

        let completion = Completion {
            attempt_id: attempt.id,
            completed_at: Utc::now(),
            score: result.score,
            earned_points: result.earned_points,
            total_points: result.total_points,
            responses: result.to_responses(attempt.id),
        };

        match self.store.complete_attempt(completion).await? {
            CompletionOutcome::Applied => {
                tracing::info!(
                    attempt = %attempt.id,
                    score = result.score,
                    earned = result.earned_points,
                    total = result.total_points,
                    "attempt graded"
                );
                Ok(result)
            }
            CompletionOutcome::AlreadyCompleted { completed_at } => {
                tracing::warn!(attempt = %attempt.id, "lost submission race, attempt already graded");
                Err(LifecycleError::AlreadyGraded {
                    attempt_id: attempt.id,
                    completed_at,
                })
            }
            CompletionOutcome::NotFound => Err(LifecycleError::UnknownAttempt(attempt.id)),
        }
    }

    /// Attach feedback to a graded attempt. Does not touch the score.
    pub async fn add_feedback(
        &self,
        attempt_id: Uuid,
        author_id: Uuid,
        message: &str,
    ) -> Result<Feedback, FeedbackError> {
        let attempt = self
            .store
            .get_attempt(attempt_id)
            .await?
            .ok_or(FeedbackError::UnknownAttempt(attempt_id))?;

        if attempt.state() != AttemptState::Graded {
            return Err(FeedbackError::NotGraded(attempt_id));
        }

        let message = message.trim();
        if message.is_empty() {
            return Err(FeedbackError::EmptyMessage);
        }

        let feedback = Feedback {
            id: Uuid::new_v4(),
            attempt_id,
            author_id,
            message: message.to_string(),
            is_preset: PRESET_FEEDBACK.contains(&message),
            created_at: Utc::now(),
        };
        self.store.insert_feedback(feedback.clone()).await?;
        Ok(feedback)
    }
}
