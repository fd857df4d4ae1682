//! The `quizmark grade` command.

use std::path::PathBuf;

use anyhow::Result;

use quizmark_core::model::Question;
use quizmark_core::parser;
use quizmark_core::scoring::{self, GradingResult};

pub fn execute(test_path: PathBuf, answers_path: PathBuf, format: String) -> Result<()> {
    let def = parser::parse_test(&test_path)?;
    let answers = parser::load_answer_sheet(&answers_path, &def.questions)?;
    let result = scoring::grade(&def.questions, &answers)?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => {
            println!("Test: {}", def.test.title);
            print_result(&result, &def.questions);
        }
    }

    Ok(())
}

/// Score line followed by a per-question table.
pub fn print_result(result: &GradingResult, questions: &[Question]) {
    use comfy_table::{Cell, Table};

    println!(
        "Score: {} ({}/{} points, {}/{} correct)",
        super::pct(result.score),
        result.earned_points,
        result.total_points,
        result.correct_count(),
        result.responses.len()
    );

    if result.responses.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Answer", "Expected", "Points"]);
    for (i, (r, q)) in result.responses.iter().zip(questions).enumerate() {
        let mark = if r.is_correct { "ok" } else { "x" };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&q.text),
            Cell::new(format!("{} {mark}", r.selected_answer)),
            Cell::new(&q.correct_answer),
            Cell::new(format!("{}/{}", r.points_awarded, r.max_points)),
        ]);
    }
    println!("{table}");
}
