//! The `quizmark teacher` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use uuid::Uuid;

use quizmark_core::config::load_config_from;
use quizmark_core::dashboard::{compute_teacher_analytics_with, TeacherAnalytics};
use quizmark_core::snapshot::Snapshot;

pub fn execute(
    snapshot_path: PathBuf,
    teacher: Uuid,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let snapshot = Snapshot::load_json(&snapshot_path)?;
    let analytics = compute_teacher_analytics_with(&snapshot.teacher_inputs(teacher), &config);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&analytics)?),
        _ => print_text(&analytics),
    }

    Ok(())
}

fn print_text(a: &TeacherAnalytics) {
    let s = &a.summary;
    println!(
        "Tests: {} ({} published, {} drafts)  Students: {}  Attempts: {}",
        s.tests, s.published, s.drafts, s.students, s.attempts
    );
    println!(
        "Average score: {}%  Pass rate: {}% ({} passed, {} failed)  Feedback given: {}",
        s.avg_score, s.pass_rate, a.pass_fail.passed, a.pass_fail.failed, s.feedback_count
    );

    if !a.failure_rate.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Test", "Passed", "Failed", "Pass rate", "Fail rate"]);
        for f in &a.failure_rate {
            table.add_row(vec![
                Cell::new(&f.title),
                Cell::new(f.passed),
                Cell::new(f.failed),
                Cell::new(format!("{}%", f.pass_rate)),
                Cell::new(format!("{}%", f.fail_rate)),
            ]);
        }
        println!("\nPass/fail by test:\n{table}");
    }

    if !a.difficulty_index.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Question", "Type", "Responses", "Success", "Difficulty"]);
        for d in &a.difficulty_index {
            table.add_row(vec![
                Cell::new(&d.text),
                Cell::new(d.kind.map(|k| k.to_string()).unwrap_or_default()),
                Cell::new(d.responses),
                Cell::new(format!("{}%", d.success_rate)),
                Cell::new(d.difficulty),
            ]);
        }
        println!("\nQuestion difficulty (hardest first):\n{table}");
    }

    if s.attempts > 0 {
        let buckets: Vec<String> = a
            .score_distribution
            .iter()
            .map(|b| format!("{}: {}", b.range, b.count))
            .collect();
        println!("\nScore distribution: {}", buckets.join("  "));
    }

    if !a.completion_time.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Test", "Attempts", "Avg min", "Fastest", "Slowest"]);
        for c in &a.completion_time {
            table.add_row(vec![
                Cell::new(&c.title),
                Cell::new(c.attempts),
                Cell::new(c.avg_minutes),
                Cell::new(c.min_minutes),
                Cell::new(c.max_minutes),
            ]);
        }
        println!("\nCompletion time:\n{table}");
    }

    if !a.ranking.is_empty() {
        println!("\nStudent ranking:");
        super::leaderboard::print_table(&a.ranking);
    }
}
