//! The `quizmark leaderboard` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizmark_core::analytics::RankingEntry;
use quizmark_core::dashboard::compute_leaderboard;
use quizmark_core::snapshot::Snapshot;

pub fn execute(snapshot_path: PathBuf, limit: Option<usize>, format: String) -> Result<()> {
    let snapshot = Snapshot::load_json(&snapshot_path)?;
    let mut board = compute_leaderboard(&snapshot.attempts, &snapshot.profiles);
    if let Some(limit) = limit {
        board.truncate(limit);
    }

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&board)?),
        _ => {
            if board.is_empty() {
                println!("No completed attempts yet.");
            } else {
                print_table(&board);
            }
        }
    }

    Ok(())
}

pub fn print_table(entries: &[RankingEntry]) {
    let mut table = Table::new();
    table.set_header(vec!["Rank", "Student", "Avg score", "Tests", "Points"]);
    for e in entries {
        table.add_row(vec![
            Cell::new(e.rank),
            Cell::new(&e.name),
            Cell::new(format!("{}%", e.avg_score)),
            Cell::new(e.tests_taken),
            Cell::new(e.total_points),
        ]);
    }
    println!("{table}");
}
