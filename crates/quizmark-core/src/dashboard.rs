//! Composite dashboard computations.
//!
//! Each entry point takes the rows a view already fetched and returns every
//! metric that view shows. Nothing is persisted; the caller recomputes on
//! each load and may discard a stale result freely.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::{
    self, ClassComparison, CompletionTime, FirstVsLatest, PassFail, QuestionDifficulty,
    QuestionPace, RankingEntry, ScoreBucket, StudentSummary, TestFailureRate, TopicAccuracy,
    TrendPoint,
};
use crate::config::AnalyticsConfig;
use crate::model::{Attempt, Profile, Question, Response, Test};
use crate::prediction::{self, Prediction};

/// Rows needed for one student's dashboard.
#[derive(Debug, Clone, Default)]
pub struct StudentInputs {
    /// The student's own attempts.
    pub attempts: Vec<Attempt>,
    /// Responses belonging to those attempts.
    pub responses: Vec<Response>,
    /// Everyone's attempts on the tests the student took.
    pub class_attempts: Vec<Attempt>,
    /// Tests the student took, for titles.
    pub tests: Vec<Test>,
    /// Questions of those tests.
    pub questions: Vec<Question>,
    /// Feedback entries left on the student's attempts.
    pub feedback_count: usize,
}

/// Everything a student's dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAnalytics {
    pub summary: StudentSummary,
    pub trend: Vec<TrendPoint>,
    pub topic_accuracy: Vec<TopicAccuracy>,
    pub strengths: Vec<TopicAccuracy>,
    pub weaknesses: Vec<TopicAccuracy>,
    pub time_per_question: Vec<QuestionPace>,
    /// One entry per test taken, against the student's latest attempt.
    pub class_comparison: Vec<ClassComparison>,
    pub first_vs_latest: Vec<FirstVsLatest>,
    pub prediction: Prediction,
}

pub fn compute_student_analytics(inputs: &StudentInputs) -> StudentAnalytics {
    compute_student_analytics_with(inputs, &AnalyticsConfig::default())
}

pub fn compute_student_analytics_with(
    inputs: &StudentInputs,
    config: &AnalyticsConfig,
) -> StudentAnalytics {
    let trend = analytics::trend(&inputs.attempts);
    let topic_accuracy =
        analytics::topic_accuracy(&inputs.responses, &inputs.questions, &inputs.tests);
    let split = analytics::strengths_and_weaknesses(
        &topic_accuracy,
        config.strength_threshold,
        config.highlight_count,
    );
    let counts = analytics::question_counts(&inputs.questions);

    // Latest graded attempt per test, in order of first completion.
    let by_id: HashMap<Uuid, &Attempt> = inputs.attempts.iter().map(|a| (a.id, a)).collect();
    let mut order: Vec<Uuid> = Vec::new();
    let mut latest: HashMap<Uuid, Uuid> = HashMap::new();
    for point in &trend {
        if latest.insert(point.test_id, point.attempt_id).is_none() {
            order.push(point.test_id);
        }
    }
    let class_comparison = order
        .into_iter()
        .filter_map(|test_id| {
            let mine = latest.get(&test_id).and_then(|id| by_id.get(id)).copied();
            analytics::class_comparison(test_id, &inputs.class_attempts, mine)
        })
        .collect();

    StudentAnalytics {
        summary: analytics::student_summary(&inputs.attempts, inputs.feedback_count),
        time_per_question: analytics::time_per_question(&inputs.attempts, &counts),
        first_vs_latest: analytics::first_vs_latest(&inputs.attempts, &inputs.tests),
        prediction: prediction::predict_with(&trend, &config.prediction),
        class_comparison,
        strengths: split.strengths,
        weaknesses: split.weaknesses,
        topic_accuracy,
        trend,
    }
}

/// Rows needed for one teacher's dashboard.
#[derive(Debug, Clone, Default)]
pub struct TeacherInputs {
    /// Tests the teacher owns.
    pub tests: Vec<Test>,
    pub questions: Vec<Question>,
    /// Attempts on those tests.
    pub attempts: Vec<Attempt>,
    pub responses: Vec<Response>,
    /// Profiles of the students involved, for display names.
    pub profiles: Vec<Profile>,
    /// Feedback entries the teacher wrote.
    pub feedback_count: usize,
}

/// Headline numbers for a teacher's dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeacherSummary {
    pub tests: usize,
    pub published: usize,
    pub drafts: usize,
    pub students: usize,
    /// Graded attempts only.
    pub attempts: usize,
    pub avg_score: u32,
    pub pass_rate: u32,
    pub feedback_count: usize,
}

/// Everything a teacher's dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherAnalytics {
    pub summary: TeacherSummary,
    pub difficulty_index: Vec<QuestionDifficulty>,
    pub failure_rate: Vec<TestFailureRate>,
    pub score_distribution: Vec<ScoreBucket>,
    pub completion_time: Vec<CompletionTime>,
    pub pass_fail: PassFail,
    pub ranking: Vec<RankingEntry>,
}

pub fn compute_teacher_analytics(inputs: &TeacherInputs) -> TeacherAnalytics {
    compute_teacher_analytics_with(inputs, &AnalyticsConfig::default())
}

pub fn compute_teacher_analytics_with(
    inputs: &TeacherInputs,
    config: &AnalyticsConfig,
) -> TeacherAnalytics {
    let graded: Vec<Attempt> = inputs
        .attempts
        .iter()
        .filter(|a| a.is_scored())
        .cloned()
        .collect();
    let pass_fail = analytics::pass_fail(&graded, config.pass_mark);

    let published = inputs.tests.iter().filter(|t| t.is_published).count();
    let students: HashSet<Uuid> = graded.iter().map(|a| a.student_id).collect();
    let scores: Vec<f64> = graded.iter().filter_map(|a| a.score).collect();

    let summary = TeacherSummary {
        tests: inputs.tests.len(),
        published,
        drafts: inputs.tests.len() - published,
        students: students.len(),
        attempts: graded.len(),
        avg_score: analytics::mean(&scores).round() as u32,
        pass_rate: pass_fail.pass_rate,
        feedback_count: inputs.feedback_count,
    };

    tracing::debug!(
        tests = summary.tests,
        attempts = summary.attempts,
        "teacher analytics computed"
    );

    TeacherAnalytics {
        summary,
        difficulty_index: analytics::difficulty_index(&inputs.responses, &inputs.questions),
        failure_rate: analytics::failure_rate(&graded, &inputs.tests, config.pass_mark),
        score_distribution: analytics::score_distribution(&graded),
        completion_time: analytics::completion_time(&graded, &inputs.tests),
        ranking: analytics::ranking(&graded, &inputs.profiles),
        pass_fail,
    }
}

/// Global ranking over every graded attempt.
pub fn compute_leaderboard(attempts: &[Attempt], profiles: &[Profile]) -> Vec<RankingEntry> {
    analytics::ranking(attempts, profiles)
}
