//! The `quizmark validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(test_path: PathBuf) -> Result<()> {
    let tests = super::load_tests(&test_path)?;

    let mut total_warnings = 0;

    for def in &tests {
        let points: u64 = def.questions.iter().map(|q| u64::from(q.points)).sum();
        println!(
            "Test: {} ({} questions, {} points)",
            def.test.title,
            def.questions.len(),
            points
        );

        let warnings = quizmark_core::parser::validate_test(def);
        for w in &warnings {
            let prefix = w
                .question
                .map(|n| format!("  [Q{n}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All tests valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
