//! Deterministic grading of one attempt's answers against the answer key.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GradingError;
use crate::model::{Question, Response};

/// Selected answer text keyed by question id.
pub type Answers = HashMap<Uuid, String>;

/// The graded answer to a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradedAnswer {
    pub question_id: Uuid,
    pub selected_answer: String,
    pub is_correct: bool,
    /// Points awarded: the question's points if correct, else 0.
    pub points_awarded: u32,
    /// The question's full point value.
    pub max_points: u32,
}

/// Outcome of grading an answer set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    /// One entry per question, in question order.
    pub responses: Vec<GradedAnswer>,
    /// Sums are `u64` so many large per-question values cannot overflow.
    pub earned_points: u64,
    pub total_points: u64,
    /// Rounded percentage in `[0, 100]`. Zero when the test has no points.
    pub score: f64,
}

impl GradingResult {
    /// Materialize the graded answers as response rows for `attempt_id`.
    pub fn to_responses(&self, attempt_id: Uuid) -> Vec<Response> {
        self.responses
            .iter()
            .map(|r| Response {
                id: Uuid::new_v4(),
                attempt_id,
                question_id: r.question_id,
                selected_answer: r.selected_answer.clone(),
                is_correct: r.is_correct,
            })
            .collect()
    }

    pub fn correct_count(&self) -> usize {
        self.responses.iter().filter(|r| r.is_correct).count()
    }
}

/// Number of questions with no answer or an empty one.
pub fn count_missing(questions: &[Question], answers: &Answers) -> usize {
    questions
        .iter()
        .filter(|q| !matches!(answers.get(&q.id), Some(a) if !a.is_empty()))
        .count()
}

/// Grade `answers` against the key of `questions`.
///
/// Every question must have a non-empty answer; otherwise nothing is graded
/// and [`GradingError::MissingAnswers`] reports how many are missing.
/// Correctness is exact, case-sensitive string equality with no trimming.
pub fn grade(questions: &[Question], answers: &Answers) -> Result<GradingResult, GradingError> {
    let missing = count_missing(questions, answers);
    if missing > 0 {
        return Err(GradingError::MissingAnswers { missing });
    }

    let mut earned_points: u64 = 0;
    let mut total_points: u64 = 0;
    let mut responses = Vec::with_capacity(questions.len());

    for q in questions {
        let selected = answers.get(&q.id).cloned().unwrap_or_default();
        let is_correct = selected == q.correct_answer;
        let points_awarded = if is_correct { q.points } else { 0 };

        earned_points += u64::from(points_awarded);
        total_points += u64::from(q.points);
        responses.push(GradedAnswer {
            question_id: q.id,
            selected_answer: selected,
            is_correct,
            points_awarded,
            max_points: q.points,
        });
    }

    Ok(GradingResult {
        responses,
        earned_points,
        total_points,
        score: percentage(earned_points, total_points),
    })
}

/// `round(earned / total * 100)` clamped to `[0, 100]`, or 0 for an empty test.
pub fn percentage(earned: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (earned as f64 / total as f64 * 100.0).round().clamp(0.0, 100.0)
}
