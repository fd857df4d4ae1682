//! Dashboard metrics derived from attempt and response history.
//!
//! Every function here is a pure transform over read-only slices. Grouping
//! indexes are built inside each call and dropped when it returns; nothing
//! is cached between calls. A "topic" is the owning test: there is no
//! separate topic taxonomy.
//!
//! Percentages that are ratios of counts are rounded to whole numbers, and a
//! zero denominator always yields 0 rather than NaN.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Attempt, Profile, Question, QuestionKind, Response, Test, UNNAMED_STUDENT};

/// Title shown for a test missing from the supplied test list.
const UNKNOWN: &str = "Unknown";

/// `round(100 * part / whole)`, or 0 when `whole` is 0.
pub fn rate(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

/// Arithmetic mean, or 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Graded attempts with their scores, preserving input order.
fn scored(attempts: &[Attempt]) -> impl Iterator<Item = (&Attempt, f64)> {
    attempts
        .iter()
        .filter(|a| a.is_scored())
        .map(|a| (a, a.score.unwrap_or(0.0)))
}

fn title_index(tests: &[Test]) -> HashMap<Uuid, &str> {
    tests.iter().map(|t| (t.id, t.title.as_str())).collect()
}

fn title_of(titles: &HashMap<Uuid, &str>, test_id: Uuid) -> String {
    titles.get(&test_id).copied().unwrap_or(UNKNOWN).to_string()
}

/// Number of questions per test.
pub fn question_counts(questions: &[Question]) -> HashMap<Uuid, usize> {
    let mut counts = HashMap::new();
    for q in questions {
        *counts.entry(q.test_id).or_insert(0) += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

/// One graded attempt on the score timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// 1-based position on the timeline.
    pub index: usize,
    pub attempt_id: Uuid,
    pub test_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub score: f64,
    /// Mean of this and every earlier score.
    pub running_avg: f64,
}

/// Graded attempts ordered by completion time, with a running average.
pub fn trend(attempts: &[Attempt]) -> Vec<TrendPoint> {
    let mut graded: Vec<(&Attempt, f64)> = scored(attempts).collect();
    graded.sort_by_key(|(a, _)| a.completed_at);

    let mut sum = 0.0;
    graded
        .into_iter()
        .enumerate()
        .filter_map(|(i, (attempt, score))| {
            sum += score;
            Some(TrendPoint {
                index: i + 1,
                attempt_id: attempt.id,
                test_id: attempt.test_id,
                completed_at: attempt.completed_at?,
                score,
                running_avg: sum / (i + 1) as f64,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Topic accuracy, strengths and weaknesses
// ---------------------------------------------------------------------------

/// Share of correct responses within one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAccuracy {
    pub test_id: Uuid,
    pub title: String,
    pub correct: usize,
    pub total: usize,
    /// `round(100 * correct / total)`.
    pub accuracy: u32,
}

/// Response accuracy grouped by the test each question belongs to, lowest
/// accuracy first. Responses to questions not in `questions` are skipped.
pub fn topic_accuracy(
    responses: &[Response],
    questions: &[Question],
    tests: &[Test],
) -> Vec<TopicAccuracy> {
    let question_test: HashMap<Uuid, Uuid> = questions.iter().map(|q| (q.id, q.test_id)).collect();
    let titles = title_index(tests);

    let mut order: Vec<Uuid> = Vec::new();
    let mut tallies: HashMap<Uuid, (usize, usize)> = HashMap::new();
    for r in responses {
        let Some(&test_id) = question_test.get(&r.question_id) else {
            tracing::debug!(question = %r.question_id, "response for unknown question skipped");
            continue;
        };
        let tally = tallies.entry(test_id).or_insert_with(|| {
            order.push(test_id);
            (0, 0)
        });
        tally.1 += 1;
        if r.is_correct {
            tally.0 += 1;
        }
    }

    let mut topics: Vec<TopicAccuracy> = order
        .into_iter()
        .map(|test_id| {
            let (correct, total) = tallies[&test_id];
            TopicAccuracy {
                test_id,
                title: title_of(&titles, test_id),
                correct,
                total,
                accuracy: rate(correct, total),
            }
        })
        .collect();
    topics.sort_by_key(|t| t.accuracy);
    topics
}

/// Best and worst topics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrengthsWeaknesses {
    /// Accuracy at or above the threshold, best first.
    pub strengths: Vec<TopicAccuracy>,
    /// Accuracy below the threshold, worst first.
    pub weaknesses: Vec<TopicAccuracy>,
}

/// Split topics at `threshold` and keep the top `count` of each side.
pub fn strengths_and_weaknesses(
    topics: &[TopicAccuracy],
    threshold: u32,
    count: usize,
) -> StrengthsWeaknesses {
    let mut strengths: Vec<TopicAccuracy> = topics
        .iter()
        .filter(|t| t.accuracy >= threshold)
        .cloned()
        .collect();
    strengths.sort_by(|a, b| b.accuracy.cmp(&a.accuracy));
    strengths.truncate(count);

    let mut weaknesses: Vec<TopicAccuracy> = topics
        .iter()
        .filter(|t| t.accuracy < threshold)
        .cloned()
        .collect();
    weaknesses.sort_by_key(|t| t.accuracy);
    weaknesses.truncate(count);

    StrengthsWeaknesses {
        strengths,
        weaknesses,
    }
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Average minutes spent per question in one attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionPace {
    pub attempt_id: Uuid,
    pub test_id: Uuid,
    pub minutes_per_question: f64,
    pub score: f64,
}

/// Minutes per question for every completed attempt. A test with no known
/// questions counts as one question.
pub fn time_per_question(
    attempts: &[Attempt],
    question_counts: &HashMap<Uuid, usize>,
) -> Vec<QuestionPace> {
    attempts
        .iter()
        .filter_map(|a| {
            let minutes = a.duration_minutes()?;
            let count = question_counts.get(&a.test_id).copied().unwrap_or(0).max(1);
            Some(QuestionPace {
                attempt_id: a.id,
                test_id: a.test_id,
                minutes_per_question: minutes / count as f64,
                score: a.score.unwrap_or(0.0),
            })
        })
        .collect()
}

/// Average, fastest and slowest completion time for one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionTime {
    pub test_id: Uuid,
    pub title: String,
    pub attempts: usize,
    pub avg_minutes: f64,
    pub min_minutes: f64,
    pub max_minutes: f64,
}

/// Completion time per test, minutes rounded to one decimal.
pub fn completion_time(attempts: &[Attempt], tests: &[Test]) -> Vec<CompletionTime> {
    let titles = title_index(tests);

    let mut order: Vec<Uuid> = Vec::new();
    let mut times: HashMap<Uuid, Vec<f64>> = HashMap::new();
    for a in attempts {
        let Some(minutes) = a.duration_minutes() else {
            continue;
        };
        times
            .entry(a.test_id)
            .or_insert_with(|| {
                order.push(a.test_id);
                Vec::new()
            })
            .push(minutes);
    }

    order
        .into_iter()
        .map(|test_id| {
            let t = &times[&test_id];
            let min = t.iter().copied().fold(f64::INFINITY, f64::min);
            let max = t.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            CompletionTime {
                test_id,
                title: title_of(&titles, test_id),
                attempts: t.len(),
                avg_minutes: round1(mean(t)),
                min_minutes: round1(min),
                max_minutes: round1(max),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Class comparison
// ---------------------------------------------------------------------------

/// A student's score against the class on one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassComparison {
    pub test_id: Uuid,
    pub class_avg: f64,
    pub class_max: f64,
    pub my_score: f64,
    /// Number of graded attempts the class figures are drawn from.
    pub class_attempts: usize,
}

/// Compare `my_attempt` with every graded attempt on `test_id`.
///
/// `None` when the student has no graded attempt on the test.
pub fn class_comparison(
    test_id: Uuid,
    class_attempts: &[Attempt],
    my_attempt: Option<&Attempt>,
) -> Option<ClassComparison> {
    let mine = my_attempt.filter(|a| a.is_scored() && a.test_id == test_id)?;
    let my_score = mine.score.unwrap_or(0.0);

    let mut scores: Vec<f64> = scored(class_attempts)
        .filter(|(a, _)| a.test_id == test_id)
        .map(|(_, s)| s)
        .collect();
    if scores.is_empty() {
        scores.push(my_score);
    }

    Some(ClassComparison {
        test_id,
        class_avg: mean(&scores),
        class_max: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        my_score,
        class_attempts: scores.len(),
    })
}

// ---------------------------------------------------------------------------
// Question difficulty
// ---------------------------------------------------------------------------

/// How hard a question turned out to be across all students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDifficulty {
    pub question_id: Uuid,
    pub text: String,
    pub kind: Option<QuestionKind>,
    pub responses: usize,
    /// `round(100 * correct / responses)`.
    pub success_rate: u32,
    /// `100 - success_rate`.
    pub difficulty: u32,
}

/// Per-question difficulty, hardest first.
pub fn difficulty_index(responses: &[Response], questions: &[Question]) -> Vec<QuestionDifficulty> {
    let by_id: HashMap<Uuid, &Question> = questions.iter().map(|q| (q.id, q)).collect();

    let mut order: Vec<Uuid> = Vec::new();
    let mut tallies: HashMap<Uuid, (usize, usize)> = HashMap::new();
    for r in responses {
        let tally = tallies.entry(r.question_id).or_insert_with(|| {
            order.push(r.question_id);
            (0, 0)
        });
        tally.1 += 1;
        if r.is_correct {
            tally.0 += 1;
        }
    }

    let mut index: Vec<QuestionDifficulty> = order
        .into_iter()
        .map(|question_id| {
            let (correct, total) = tallies[&question_id];
            let question = by_id.get(&question_id);
            let success_rate = rate(correct, total);
            QuestionDifficulty {
                question_id,
                text: question
                    .map(|q| q.text.clone())
                    .unwrap_or_else(|| "Q".to_string()),
                kind: question.map(|q| q.kind),
                responses: total,
                success_rate,
                difficulty: 100 - success_rate,
            }
        })
        .collect();
    index.sort_by(|a, b| b.difficulty.cmp(&a.difficulty));
    index
}

// ---------------------------------------------------------------------------
// Pass / fail
// ---------------------------------------------------------------------------

/// Pass and fail counts for one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestFailureRate {
    pub test_id: Uuid,
    pub title: String,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: u32,
    pub fail_rate: u32,
}

/// Pass/fail split per test. Every test in `tests` appears, with zero rates
/// when it has no graded attempts; graded attempts on other tests follow.
pub fn failure_rate(attempts: &[Attempt], tests: &[Test], pass_mark: f64) -> Vec<TestFailureRate> {
    let titles = title_index(tests);

    let mut order: Vec<Uuid> = tests.iter().map(|t| t.id).collect();
    let mut tallies: HashMap<Uuid, (usize, usize)> =
        tests.iter().map(|t| (t.id, (0, 0))).collect();
    for (a, score) in scored(attempts) {
        let tally = tallies.entry(a.test_id).or_insert_with(|| {
            order.push(a.test_id);
            (0, 0)
        });
        if score >= pass_mark {
            tally.0 += 1;
        } else {
            tally.1 += 1;
        }
    }

    order
        .into_iter()
        .map(|test_id| {
            let (passed, failed) = tallies[&test_id];
            TestFailureRate {
                test_id,
                title: title_of(&titles, test_id),
                passed,
                failed,
                pass_rate: rate(passed, passed + failed),
                fail_rate: rate(failed, passed + failed),
            }
        })
        .collect()
}

/// Overall pass/fail counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassFail {
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: u32,
}

pub fn pass_fail(attempts: &[Attempt], pass_mark: f64) -> PassFail {
    let (passed, failed) = scored(attempts).fold((0, 0), |(p, f), (_, score)| {
        if score >= pass_mark {
            (p + 1, f)
        } else {
            (p, f + 1)
        }
    });
    PassFail {
        passed,
        failed,
        pass_rate: rate(passed, passed + failed),
    }
}

// ---------------------------------------------------------------------------
// Score distribution
// ---------------------------------------------------------------------------

/// Count of scores inside one range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBucket {
    pub range: String,
    pub count: usize,
}

const BUCKETS: [(&str, f64); 5] = [
    ("0-20", 20.0),
    ("21-40", 40.0),
    ("41-60", 60.0),
    ("61-80", 80.0),
    ("81-100", f64::INFINITY),
];

/// Histogram of graded scores in five 20-point buckets.
pub fn score_distribution(attempts: &[Attempt]) -> Vec<ScoreBucket> {
    let mut counts = [0usize; BUCKETS.len()];
    for (_, score) in scored(attempts) {
        let slot = BUCKETS
            .iter()
            .position(|(_, upper)| score <= *upper)
            .unwrap_or(BUCKETS.len() - 1);
        counts[slot] += 1;
    }
    BUCKETS
        .iter()
        .zip(counts)
        .map(|((range, _), count)| ScoreBucket {
            range: range.to_string(),
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// One student's standing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1-based position.
    pub rank: usize,
    pub student_id: Uuid,
    pub name: String,
    /// Rounded mean score.
    pub avg_score: u32,
    pub tests_taken: usize,
    pub total_points: u64,
}

/// Rank students by average score, ties broken by total points earned.
pub fn ranking(attempts: &[Attempt], profiles: &[Profile]) -> Vec<RankingEntry> {
    let names: HashMap<Uuid, &Profile> = profiles.iter().map(|p| (p.id, p)).collect();

    let mut order: Vec<Uuid> = Vec::new();
    let mut per_student: HashMap<Uuid, (Vec<f64>, u64)> = HashMap::new();
    for (a, score) in scored(attempts) {
        let entry = per_student.entry(a.student_id).or_insert_with(|| {
            order.push(a.student_id);
            (Vec::new(), 0)
        });
        entry.0.push(score);
        entry.1 += a.earned_points.unwrap_or(0);
    }

    let mut entries: Vec<RankingEntry> = order
        .into_iter()
        .map(|student_id| {
            let (scores, points) = &per_student[&student_id];
            RankingEntry {
                rank: 0,
                student_id,
                name: names
                    .get(&student_id)
                    .map(|p| p.display_name())
                    .unwrap_or_else(|| UNNAMED_STUDENT.to_string()),
                avg_score: mean(scores).round() as u32,
                tests_taken: scores.len(),
                total_points: *points,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.avg_score
            .cmp(&a.avg_score)
            .then(b.total_points.cmp(&a.total_points))
    });
    for (i, e) in entries.iter_mut().enumerate() {
        e.rank = i + 1;
    }
    entries
}

// ---------------------------------------------------------------------------
// Student history summaries
// ---------------------------------------------------------------------------

/// Headline numbers for a student's dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub tests_completed: usize,
    pub avg_score: u32,
    pub best_score: u32,
    pub feedback_count: usize,
}

pub fn student_summary(attempts: &[Attempt], feedback_count: usize) -> StudentSummary {
    let scores: Vec<f64> = scored(attempts).map(|(_, s)| s).collect();
    let best = scores.iter().copied().fold(0.0, f64::max);
    StudentSummary {
        tests_completed: scores.len(),
        avg_score: mean(&scores).round() as u32,
        best_score: best.round() as u32,
        feedback_count,
    }
}

/// First and most recent score on a test taken more than once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstVsLatest {
    pub test_id: Uuid,
    pub title: String,
    pub attempts: usize,
    pub first: f64,
    pub latest: f64,
}

pub fn first_vs_latest(attempts: &[Attempt], tests: &[Test]) -> Vec<FirstVsLatest> {
    let titles = title_index(tests);
    let timeline = trend(attempts);

    let mut order: Vec<Uuid> = Vec::new();
    let mut per_test: HashMap<Uuid, Vec<f64>> = HashMap::new();
    for point in &timeline {
        per_test
            .entry(point.test_id)
            .or_insert_with(|| {
                order.push(point.test_id);
                Vec::new()
            })
            .push(point.score);
    }

    order
        .into_iter()
        .filter_map(|test_id| {
            let scores = &per_test[&test_id];
            if scores.len() < 2 {
                return None;
            }
            Some(FirstVsLatest {
                test_id,
                title: title_of(&titles, test_id),
                attempts: scores.len(),
                first: scores[0],
                latest: scores[scores.len() - 1],
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use chrono::{Duration, TimeZone};

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn graded(student: Uuid, test: Uuid, score: f64, started: i64, completed: i64) -> Attempt {
        Attempt {
            id: Uuid::new_v4(),
            student_id: student,
            test_id: test,
            started_at: at(started),
            completed_at: Some(at(completed)),
            score: Some(score),
            earned_points: Some(score as u64 / 10),
            total_points: Some(10),
        }
    }

    fn test_row(title: &str) -> Test {
        Test {
            id: Uuid::new_v4(),
            owner_id: Uuid::nil(),
            title: title.into(),
            description: String::new(),
            duration_minutes: None,
            is_published: true,
        }
    }

    fn question(test_id: Uuid, text: &str) -> Question {
        Question {
            id: Uuid::new_v4(),
            test_id,
            text: text.into(),
            kind: QuestionKind::Mcq,
            options: vec!["A".into(), "B".into()],
            correct_answer: "A".into(),
            points: 1,
            sort_order: 0,
        }
    }

    fn response(question_id: Uuid, is_correct: bool) -> Response {
        Response {
            id: Uuid::new_v4(),
            attempt_id: Uuid::nil(),
            question_id,
            selected_answer: if is_correct { "A" } else { "B" }.into(),
            is_correct,
        }
    }

    #[test]
    fn rate_handles_zero() {
        assert_eq!(rate(0, 0), 0);
        assert_eq!(rate(1, 3), 33);
        assert_eq!(rate(2, 3), 67);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn trend_orders_by_completion_and_averages() {
        let s = Uuid::new_v4();
        let t = Uuid::new_v4();
        let attempts = vec![
            graded(s, t, 80.0, 20, 30),
            graded(s, t, 60.0, 0, 10),
            Attempt::open(s, t, at(40)),
        ];

        let points = trend(&attempts);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].index, 1);
        assert_eq!(points[0].score, 60.0);
        assert_eq!(points[0].running_avg, 60.0);
        assert_eq!(points[1].score, 80.0);
        assert_eq!(points[1].running_avg, 70.0);
    }

    #[test]
    fn trend_of_nothing_is_empty() {
        assert!(trend(&[]).is_empty());
    }

    #[test]
    fn topic_accuracy_groups_by_test() {
        let algebra = test_row("Algebra");
        let history = test_row("History");
        let qa = question(algebra.id, "x + 1 = 2");
        let qh = question(history.id, "1066?");
        let responses = vec![
            response(qa.id, true),
            response(qa.id, false),
            response(qa.id, false),
            response(qh.id, true),
            response(qh.id, true),
            response(Uuid::new_v4(), true),
        ];

        let topics = topic_accuracy(
            &responses,
            &[qa, qh],
            &[algebra.clone(), history.clone()],
        );
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].title, "Algebra");
        assert_eq!(topics[0].accuracy, 33);
        assert_eq!(topics[0].total, 3);
        assert_eq!(topics[1].title, "History");
        assert_eq!(topics[1].accuracy, 100);
    }

    fn topic(title: &str, accuracy: u32) -> TopicAccuracy {
        TopicAccuracy {
            test_id: Uuid::new_v4(),
            title: title.into(),
            correct: accuracy as usize,
            total: 100,
            accuracy,
        }
    }

    #[test]
    fn strengths_and_weaknesses_split_at_threshold() {
        let topics = vec![
            topic("a", 20),
            topic("b", 40),
            topic("c", 60),
            topic("d", 69),
            topic("e", 70),
            topic("f", 85),
            topic("g", 90),
            topic("h", 100),
        ];

        let sw = strengths_and_weaknesses(&topics, 70, 3);
        let strong: Vec<&str> = sw.strengths.iter().map(|t| t.title.as_str()).collect();
        let weak: Vec<&str> = sw.weaknesses.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(strong, vec!["h", "g", "f"]);
        assert_eq!(weak, vec!["a", "b", "c"]);
    }

    #[test]
    fn time_per_question_divides_by_question_count() {
        let s = Uuid::new_v4();
        let t = Uuid::new_v4();
        let counts: HashMap<Uuid, usize> = [(t, 4)].into();
        let other = Uuid::new_v4();
        let attempts = vec![
            graded(s, t, 75.0, 0, 10),
            graded(s, other, 50.0, 0, 3),
            Attempt::open(s, t, at(0)),
        ];

        let pace = time_per_question(&attempts, &counts);
        assert_eq!(pace.len(), 2);
        assert!((pace[0].minutes_per_question - 2.5).abs() < 1e-9);
        assert_eq!(pace[0].score, 75.0);
        // Unknown question count falls back to one question.
        assert!((pace[1].minutes_per_question - 3.0).abs() < 1e-9);
    }

    #[test]
    fn class_comparison_needs_my_attempt() {
        let t = Uuid::new_v4();
        let me = Uuid::new_v4();
        let mine = graded(me, t, 70.0, 0, 10);
        let class = vec![
            mine.clone(),
            graded(Uuid::new_v4(), t, 90.0, 0, 10),
            graded(Uuid::new_v4(), t, 50.0, 0, 10),
            graded(Uuid::new_v4(), Uuid::new_v4(), 10.0, 0, 10),
        ];

        let cmp = class_comparison(t, &class, Some(&mine)).unwrap();
        assert_eq!(cmp.class_avg, 70.0);
        assert_eq!(cmp.class_max, 90.0);
        assert_eq!(cmp.my_score, 70.0);
        assert_eq!(cmp.class_attempts, 3);

        assert!(class_comparison(t, &class, None).is_none());
    }

    #[test]
    fn difficulty_hardest_first() {
        let t = Uuid::new_v4();
        let easy = question(t, "easy");
        let hard = question(t, "hard");
        let responses = vec![
            response(easy.id, true),
            response(easy.id, true),
            response(easy.id, true),
            response(easy.id, false),
            response(hard.id, false),
            response(hard.id, false),
            response(hard.id, true),
        ];

        let index = difficulty_index(&responses, &[easy, hard]);
        assert_eq!(index[0].text, "hard");
        assert_eq!(index[0].success_rate, 33);
        assert_eq!(index[0].difficulty, 67);
        assert_eq!(index[1].text, "easy");
        assert_eq!(index[1].success_rate, 75);
        assert_eq!(index[1].difficulty, 25);
    }

    #[test]
    fn failure_rate_per_test() {
        let quiz = test_row("Quiz");
        let empty = test_row("Untaken");
        let s = Uuid::new_v4();
        let attempts: Vec<Attempt> = [40.0, 55.0, 70.0, 90.0]
            .into_iter()
            .map(|score| graded(s, quiz.id, score, 0, 5))
            .collect();

        let rates = failure_rate(&attempts, &[quiz.clone(), empty.clone()], 50.0);
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].passed, 3);
        assert_eq!(rates[0].failed, 1);
        assert_eq!(rates[0].pass_rate, 75);
        assert_eq!(rates[0].fail_rate, 25);
        assert_eq!(rates[1].title, "Untaken");
        assert_eq!(rates[1].fail_rate, 0);
        assert_eq!(rates[1].pass_rate, 0);
    }

    #[test]
    fn pass_fail_overall() {
        let s = Uuid::new_v4();
        let t = Uuid::new_v4();
        let attempts = vec![
            graded(s, t, 50.0, 0, 1),
            graded(s, t, 49.0, 0, 1),
            graded(s, t, 100.0, 0, 1),
        ];
        let pf = pass_fail(&attempts, 50.0);
        assert_eq!(pf.passed, 2);
        assert_eq!(pf.failed, 1);
        assert_eq!(pf.pass_rate, 67);

        assert_eq!(pass_fail(&[], 50.0), PassFail::default());
    }

    #[test]
    fn score_distribution_buckets() {
        let s = Uuid::new_v4();
        let t = Uuid::new_v4();
        let attempts: Vec<Attempt> = [0.0, 20.0, 20.5, 40.0, 60.0, 61.0, 80.0, 81.0, 100.0]
            .into_iter()
            .map(|score| graded(s, t, score, 0, 1))
            .collect();

        let counts: Vec<usize> = score_distribution(&attempts)
            .into_iter()
            .map(|b| b.count)
            .collect();
        assert_eq!(counts, vec![2, 2, 1, 2, 2]);
    }

    #[test]
    fn completion_time_rounds_to_tenths() {
        let quiz = test_row("Quiz");
        let s = Uuid::new_v4();
        let mut a = graded(s, quiz.id, 50.0, 0, 10);
        a.completed_at = Some(at(10) + Duration::seconds(20));
        let attempts = vec![a, graded(s, quiz.id, 70.0, 0, 5)];

        let times = completion_time(&attempts, &[quiz]);
        assert_eq!(times.len(), 1);
        assert_eq!(times[0].attempts, 2);
        assert_eq!(times[0].max_minutes, 10.3);
        assert_eq!(times[0].min_minutes, 5.0);
        assert_eq!(times[0].avg_minutes, 7.7);
    }

    #[test]
    fn ranking_breaks_ties_on_points() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let t = Uuid::new_v4();
        let mut first = graded(a, t, 90.0, 0, 1);
        first.earned_points = Some(50);
        let mut second = graded(b, t, 90.0, 0, 1);
        second.earned_points = Some(80);

        let profiles = vec![Profile {
            id: b,
            full_name: Some("Bea".into()),
            email: None,
            role: Role::Student,
        }];
        let ranked = ranking(&[first, second], &profiles);
        assert_eq!(ranked[0].student_id, b);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].name, "Bea");
        assert_eq!(ranked[1].student_id, a);
        assert_eq!(ranked[1].name, UNNAMED_STUDENT);
        assert_eq!(ranked[1].name, "Student");
    }

    #[test]
    fn ranking_averages_per_student() {
        let a = Uuid::new_v4();
        let t = Uuid::new_v4();
        let attempts = vec![
            graded(a, t, 70.0, 0, 1),
            graded(a, t, 85.0, 0, 1),
            Attempt::open(a, t, at(0)),
        ];
        let ranked = ranking(&attempts, &[]);
        assert_eq!(ranked.len(), 1);
        // 77.5 rounds half away from zero
        assert_eq!(ranked[0].avg_score, 78);
        assert_eq!(ranked[0].tests_taken, 2);
        assert_eq!(ranked[0].total_points, 15);
    }

    #[test]
    fn student_summary_and_first_vs_latest() {
        let quiz = test_row("Quiz");
        let once = test_row("Once");
        let s = Uuid::new_v4();
        let attempts = vec![
            graded(s, quiz.id, 40.0, 0, 1),
            graded(s, once.id, 100.0, 2, 3),
            graded(s, quiz.id, 75.0, 4, 5),
        ];

        let summary = student_summary(&attempts, 2);
        assert_eq!(summary.tests_completed, 3);
        assert_eq!(summary.avg_score, 72);
        assert_eq!(summary.best_score, 100);
        assert_eq!(summary.feedback_count, 2);

        let cmp = first_vs_latest(&attempts, &[quiz, once]);
        assert_eq!(cmp.len(), 1);
        assert_eq!(cmp[0].title, "Quiz");
        assert_eq!(cmp[0].first, 40.0);
        assert_eq!(cmp[0].latest, 75.0);
    }
}
