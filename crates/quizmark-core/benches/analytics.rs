use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizmark_core::analytics::{ranking, trend};
use quizmark_core::dashboard::{compute_teacher_analytics, TeacherInputs};
use quizmark_core::model::{Attempt, Profile, Question, QuestionKind, Response, Test};
use quizmark_core::prediction::predict;
use uuid::Uuid;

/// `students` students each taking every one of `tests` tests once.
fn make_history(students: usize, tests: usize) -> TeacherInputs {
    let start = Utc.with_ymd_and_hms(2025, 1, 6, 8, 0, 0).unwrap();
    let tests: Vec<Test> = (0..tests)
        .map(|i| Test {
            id: Uuid::new_v4(),
            owner_id: Uuid::nil(),
            title: format!("Test {i}"),
            description: String::new(),
            duration_minutes: Some(30),
            is_published: true,
        })
        .collect();
    let questions: Vec<Question> = tests
        .iter()
        .flat_map(|t| {
            (0..10).map(move |i| Question {
                id: Uuid::new_v4(),
                test_id: t.id,
                text: format!("Q{i}"),
                kind: QuestionKind::TrueFalse,
                options: vec!["True".into(), "False".into()],
                correct_answer: "True".into(),
                points: 1,
                sort_order: i,
            })
        })
        .collect();

    let mut attempts = Vec::new();
    let mut responses = Vec::new();
    for s in 0..students {
        let student = Uuid::new_v4();
        for (t, test) in tests.iter().enumerate() {
            let earned = ((s * 7 + t * 3) % 11) as u32;
            let mut attempt = Attempt::open(student, test.id, start + Duration::hours(t as i64));
            attempt.completed_at = Some(attempt.started_at + Duration::minutes(12 + t as i64));
            attempt.score = Some(f64::from(earned.min(10)) * 10.0);
            attempt.earned_points = Some(u64::from(earned.min(10)));
            attempt.total_points = Some(10);
            for (i, q) in questions.iter().filter(|q| q.test_id == test.id).enumerate() {
                responses.push(Response {
                    id: Uuid::new_v4(),
                    attempt_id: attempt.id,
                    question_id: q.id,
                    selected_answer: "True".into(),
                    is_correct: (i as u32) < earned,
                });
            }
            attempts.push(attempt);
        }
    }

    TeacherInputs {
        tests,
        questions,
        attempts,
        responses,
        ..Default::default()
    }
}

fn bench_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("analytics");
    let history = make_history(200, 10);

    group.bench_function("trend+predict", |b| {
        b.iter(|| predict(&trend(black_box(&history.attempts))))
    });

    let profiles: Vec<Profile> = Vec::new();
    group.bench_function("ranking", |b| {
        b.iter(|| ranking(black_box(&history.attempts), black_box(&profiles)))
    });

    group.bench_function("teacher_dashboard", |b| {
        b.iter(|| compute_teacher_analytics(black_box(&history)))
    });

    group.finish();
}

criterion_group!(benches, bench_transforms);
criterion_main!(benches);
