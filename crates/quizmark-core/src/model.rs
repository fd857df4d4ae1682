//! Core data model types for quizmark.
//!
//! These are the persisted rows the whole system reads: tests and their
//! questions, attempts with their responses, feedback, and profiles. The
//! core never writes them directly; it receives them as snapshots and hands
//! completed attempts back through an [`AttemptStore`](crate::store::AttemptStore).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Options every true/false question carries.
pub const TRUE_FALSE_OPTIONS: [&str; 2] = ["True", "False"];

/// A test authored and owned by one teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Test {
    /// Unique identifier.
    pub id: Uuid,
    /// The owning teacher's profile id.
    pub owner_id: Uuid,
    /// Human-readable title.
    pub title: String,
    /// Optional description shown to students.
    #[serde(default)]
    pub description: String,
    /// Advisory time limit. Stored, never enforced.
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Whether students can see and take the test.
    #[serde(default)]
    pub is_published: bool,
}

/// Question format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Mcq,
    TrueFalse,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Mcq => write!(f, "mcq"),
            QuestionKind::TrueFalse => write!(f, "true_false"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mcq" | "multiple_choice" => Ok(QuestionKind::Mcq),
            "true_false" | "truefalse" | "bool" => Ok(QuestionKind::TrueFalse),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A single question of a test together with its answer key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub test_id: Uuid,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Ordered answer options. Fixed to `["True", "False"]` for true/false.
    pub options: Vec<String>,
    /// The option text that counts as correct, compared byte-for-byte.
    pub correct_answer: String,
    /// Points awarded for a correct answer. Always positive.
    pub points: u32,
    /// Position within the test.
    #[serde(default)]
    pub sort_order: i32,
}

/// Lifecycle state of an attempt, derived from `completed_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    /// Created, answers not yet submitted.
    Open,
    /// Graded and read-only. Terminal.
    Graded,
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptState::Open => write!(f, "open"),
            AttemptState::Graded => write!(f, "graded"),
        }
    }
}

/// One take of a test by a student. Retakes are separate rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub id: Uuid,
    pub student_id: Uuid,
    pub test_id: Uuid,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Percentage in `[0, 100]`, set once at grading.
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub earned_points: Option<u64>,
    #[serde(default)]
    pub total_points: Option<u64>,
}

impl Attempt {
    /// A fresh, ungraded attempt.
    pub fn open(student_id: Uuid, test_id: Uuid, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id,
            test_id,
            started_at,
            completed_at: None,
            score: None,
            earned_points: None,
            total_points: None,
        }
    }

    pub fn state(&self) -> AttemptState {
        if self.completed_at.is_some() {
            AttemptState::Graded
        } else {
            AttemptState::Open
        }
    }

    /// Graded and carrying a score, i.e. usable by analytics.
    pub fn is_scored(&self) -> bool {
        self.completed_at.is_some() && self.score.is_some()
    }

    /// Wall-clock minutes between start and completion, if completed.
    pub fn duration_minutes(&self) -> Option<f64> {
        let completed = self.completed_at?;
        let millis = (completed - self.started_at).num_milliseconds();
        Some(millis as f64 / 60_000.0)
    }
}

/// One question's submitted answer within an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub id: Uuid,
    pub attempt_id: Uuid,
    pub question_id: Uuid,
    pub selected_answer: String,
    pub is_correct: bool,
}

/// Teacher feedback attached to a graded attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub attempt_id: Uuid,
    pub author_id: Uuid,
    pub message: String,
    #[serde(default)]
    pub is_preset: bool,
    pub created_at: DateTime<Utc>,
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Teacher => write!(f, "teacher"),
        }
    }
}

/// Name shown for a student with no usable profile name or e-mail.
pub const UNNAMED_STUDENT: &str = "Student";

/// Identity information, consumed for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
}

impl Profile {
    /// Full name, else the local part of the e-mail, else [`UNNAMED_STUDENT`].
    pub fn display_name(&self) -> String {
        if let Some(name) = self.full_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        self.email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .filter(|local| !local.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| UNNAMED_STUDENT.to_string())
    }
}
