//! The persistence collaborator seam.
//!
//! The core never performs I/O of its own. Whatever stores attempts must
//! implement [`AttemptStore`], and in particular must make
//! [`AttemptStore::complete_attempt`] a conditional write: the responses and
//! result fields land only if the attempt's `completed_at` is still unset.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{Attempt, Feedback, Response};
use crate::snapshot::Snapshot;

/// Everything written when an attempt is graded, as one unit.
#[derive(Debug, Clone)]
pub struct Completion {
    pub attempt_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub score: f64,
    pub earned_points: u64,
    pub total_points: u64,
    pub responses: Vec<Response>,
}

/// Result of a conditional completion write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The write was applied; the attempt is now graded.
    Applied,
    /// Someone completed the attempt first. Nothing was written.
    AlreadyCompleted { completed_at: DateTime<Utc> },
    /// No such attempt.
    NotFound,
}

/// Storage backend for attempts and feedback.
#[async_trait]
pub trait AttemptStore: Send + Sync {
    /// Persist a new open attempt.
    async fn insert_attempt(&self, attempt: Attempt) -> Result<(), StoreError>;

    /// Fetch one attempt by id.
    async fn get_attempt(&self, id: Uuid) -> Result<Option<Attempt>, StoreError>;

    /// Write responses and result fields and mark the attempt graded, only
    /// if it is still open. Must be atomic with respect to other calls for
    /// the same attempt id.
    async fn complete_attempt(&self, completion: Completion)
        -> Result<CompletionOutcome, StoreError>;

    /// Append feedback to an attempt.
    async fn insert_feedback(&self, feedback: Feedback) -> Result<(), StoreError>;
}

/// In-process store over a [`Snapshot`].
///
/// A single lock guards every write, so `complete_attempt` checks and sets
/// `completed_at` without interleaving.
pub struct MemoryStore {
    inner: Mutex<Snapshot>,
    /// Number of completion writes actually applied.
    completions: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::from_snapshot(Snapshot::default())
    }

    /// Wrap an existing snapshot, e.g. one loaded from disk.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            inner: Mutex::new(snapshot),
            completions: AtomicU32::new(0),
        }
    }

    /// A copy of the current rows.
    pub async fn snapshot(&self) -> Snapshot {
        self.inner.lock().await.clone()
    }

    pub fn into_snapshot(self) -> Snapshot {
        self.inner.into_inner()
    }

    /// Number of completion writes applied since creation.
    pub fn completion_count(&self) -> u32 {
        self.completions.load(Ordering::Relaxed)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttemptStore for MemoryStore {
    async fn insert_attempt(&self, attempt: Attempt) -> Result<(), StoreError> {
        let mut rows = self.inner.lock().await;
        if rows.attempts.iter().any(|a| a.id == attempt.id) {
            return Err(StoreError::DuplicateAttempt(attempt.id));
        }
        rows.attempts.push(attempt);
        Ok(())
    }

    async fn get_attempt(&self, id: Uuid) -> Result<Option<Attempt>, StoreError> {
        let rows = self.inner.lock().await;
        Ok(rows.attempts.iter().find(|a| a.id == id).cloned())
    }

    async fn complete_attempt(
        &self,
        completion: Completion,
    ) -> Result<CompletionOutcome, StoreError> {
        let mut rows = self.inner.lock().await;
        let Some(attempt) = rows
            .attempts
            .iter_mut()
            .find(|a| a.id == completion.attempt_id)
        else {
            return Ok(CompletionOutcome::NotFound);
        };

        if let Some(completed_at) = attempt.completed_at {
            return Ok(CompletionOutcome::AlreadyCompleted { completed_at });
        }

        attempt.completed_at = Some(completion.completed_at);
        attempt.score = Some(completion.score);
        attempt.earned_points = Some(completion.earned_points);
        attempt.total_points = Some(completion.total_points);
        rows.responses.extend(completion.responses);

        self.completions.fetch_add(1, Ordering::Relaxed);
        Ok(CompletionOutcome::Applied)
    }

    async fn insert_feedback(&self, feedback: Feedback) -> Result<(), StoreError> {
        self.inner.lock().await.feedback.push(feedback);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(attempt_id: Uuid, score: f64) -> Completion {
        Completion {
            attempt_id,
            completed_at: Utc::now(),
            score,
            earned_points: 1,
            total_points: 2,
            responses: vec![Response {
                id: Uuid::new_v4(),
                attempt_id,
                question_id: Uuid::new_v4(),
                selected_answer: "A".into(),
                is_correct: true,
            }],
        }
    }

    #[tokio::test]
    async fn complete_applies_once() {
        let store = MemoryStore::new();
        let attempt = Attempt::open(Uuid::new_v4(), Uuid::new_v4(), Utc::now());
        let id = attempt.id;
        store.insert_attempt(attempt).await.unwrap();

        let first = store.complete_attempt(completion(id, 50.0)).await.unwrap();
        assert_eq!(first, CompletionOutcome::Applied);

        let second = store.complete_attempt(completion(id, 100.0)).await.unwrap();
        assert!(matches!(second, CompletionOutcome::AlreadyCompleted { .. }));

        let stored = store.get_attempt(id).await.unwrap().unwrap();
        assert_eq!(stored.score, Some(50.0));
        assert_eq!(store.completion_count(), 1);
        assert_eq!(store.snapshot().await.responses.len(), 1);
    }

    #[tokio::test]
    async fn complete_unknown_attempt() {
        let store = MemoryStore::new();
        let outcome = store
            .complete_attempt(completion(Uuid::new_v4(), 10.0))
            .await
            .unwrap();
        assert_eq!(outcome, CompletionOutcome::NotFound);
    }

    #[tokio::test]
    async fn duplicate_insert_rejected() {
        let store = MemoryStore::new();
        let attempt = Attempt::open(Uuid::new_v4(), Uuid::new_v4(), Utc::now());
        store.insert_attempt(attempt.clone()).await.unwrap();
        let err = store.insert_attempt(attempt).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateAttempt(_)));
    }
}
