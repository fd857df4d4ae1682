use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizmark_core::model::{Question, QuestionKind};
use quizmark_core::scoring::{grade, Answers};
use uuid::Uuid;

fn make_test(n: usize) -> (Vec<Question>, Answers) {
    let test_id = Uuid::new_v4();
    let questions: Vec<Question> = (0..n)
        .map(|i| Question {
            id: Uuid::new_v4(),
            test_id,
            text: format!("Question {i}"),
            kind: QuestionKind::Mcq,
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_answer: "B".into(),
            points: (i % 3 + 1) as u32,
            sort_order: i as i32,
        })
        .collect();
    let answers = questions
        .iter()
        .enumerate()
        .map(|(i, q)| (q.id, if i % 2 == 0 { "B" } else { "C" }.to_string()))
        .collect();
    (questions, answers)
}

fn bench_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade");

    for n in [10, 100, 1000] {
        let (questions, answers) = make_test(n);
        group.bench_function(format!("questions={n}"), |b| {
            b.iter(|| grade(black_box(&questions), black_box(&answers)))
        });
    }

    group.bench_function("missing_answers", |b| {
        let (questions, _) = make_test(100);
        let empty = Answers::new();
        b.iter(|| grade(black_box(&questions), black_box(&empty)))
    });

    group.finish();
}

criterion_group!(benches, bench_grade);
criterion_main!(benches);
