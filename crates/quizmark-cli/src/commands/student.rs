//! The `quizmark student` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use uuid::Uuid;

use quizmark_core::config::load_config_from;
use quizmark_core::dashboard::{compute_student_analytics_with, StudentAnalytics};
use quizmark_core::model::Test;
use quizmark_core::prediction::Prediction;
use quizmark_core::snapshot::Snapshot;

use super::pct;

pub fn execute(
    snapshot_path: PathBuf,
    student: Uuid,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let snapshot = Snapshot::load_json(&snapshot_path)?;
    let inputs = snapshot.student_inputs(student);
    let analytics = compute_student_analytics_with(&inputs, &config);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&analytics)?),
        _ => print_text(&analytics, &inputs.tests),
    }

    Ok(())
}

fn title(tests: &[Test], id: Uuid) -> String {
    tests
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.title.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn print_text(a: &StudentAnalytics, tests: &[Test]) {
    let s = &a.summary;
    println!(
        "Tests completed: {}  Average: {}%  Best: {}%  Feedback: {}",
        s.tests_completed, s.avg_score, s.best_score, s.feedback_count
    );

    if a.trend.is_empty() {
        println!("\nComplete some tests to see your analytics here.");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["#", "Test", "Completed", "Score", "Running avg"]);
        for p in &a.trend {
            table.add_row(vec![
                Cell::new(p.index),
                Cell::new(title(tests, p.test_id)),
                Cell::new(p.completed_at.format("%Y-%m-%d %H:%M")),
                Cell::new(pct(p.score)),
                Cell::new(format!("{:.1}%", p.running_avg)),
            ]);
        }
        println!("\nTrend:\n{table}");
    }

    if !a.topic_accuracy.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Topic", "Correct", "Accuracy"]);
        for t in &a.topic_accuracy {
            table.add_row(vec![
                Cell::new(&t.title),
                Cell::new(format!("{}/{}", t.correct, t.total)),
                Cell::new(format!("{}%", t.accuracy)),
            ]);
        }
        println!("\nTopic accuracy:\n{table}");
    }

    let names = |topics: &[quizmark_core::analytics::TopicAccuracy]| {
        topics
            .iter()
            .map(|t| format!("{} ({}%)", t.title, t.accuracy))
            .collect::<Vec<_>>()
            .join(", ")
    };
    if !a.strengths.is_empty() {
        println!("\nStrengths: {}", names(&a.strengths));
    }
    if !a.weaknesses.is_empty() {
        println!("Weaknesses: {}", names(&a.weaknesses));
    }

    if !a.class_comparison.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Test", "You", "Class avg", "Class best", "Attempts"]);
        for c in &a.class_comparison {
            table.add_row(vec![
                Cell::new(title(tests, c.test_id)),
                Cell::new(pct(c.my_score)),
                Cell::new(format!("{:.1}%", c.class_avg)),
                Cell::new(pct(c.class_max)),
                Cell::new(c.class_attempts),
            ]);
        }
        println!("\nClass comparison:\n{table}");
    }

    if !a.time_per_question.is_empty() {
        let avg = a
            .time_per_question
            .iter()
            .map(|p| p.minutes_per_question)
            .sum::<f64>()
            / a.time_per_question.len() as f64;
        println!("\nAverage time per question: {avg:.1} min");
    }

    for f in &a.first_vs_latest {
        println!(
            "{}: first {} -> latest {} over {} attempts",
            f.title,
            pct(f.first),
            pct(f.latest),
            f.attempts
        );
    }

    match &a.prediction {
        Prediction::Available {
            predicted,
            slope,
            trend,
            consistency,
        } => println!(
            "\nPrediction: next score ~{predicted:.0}% ({trend}, {slope:+.1}/attempt), consistency {consistency}"
        ),
        Prediction::Unavailable { needed, have } => println!(
            "\nPrediction: unavailable (needs {needed} completed attempts, have {have})"
        ),
    }
}
