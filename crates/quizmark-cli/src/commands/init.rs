//! The `quizmark init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create quizmark.toml
    if std::path::Path::new("quizmark.toml").exists() {
        println!("quizmark.toml already exists, skipping.");
    } else {
        std::fs::write("quizmark.toml", SAMPLE_CONFIG)?;
        println!("Created quizmark.toml");
    }

    // Create example test
    std::fs::create_dir_all("assessments")?;
    let example_path = std::path::Path::new("assessments/example.toml");
    if example_path.exists() {
        println!("assessments/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_TEST)?;
        println!("Created assessments/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizmark validate --test assessments/example.toml");
    println!("  2. Run: quizmark import --test assessments --snapshot quizmark.json");
    println!("  3. Run: quizmark start --snapshot quizmark.json --student <id> --test <id>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizmark configuration

[analytics]
pass_mark = 50.0
strength_threshold = 70
highlight_count = 3

[analytics.prediction]
min_history = 3
window = 5
horizon = 2
stable_band = 1.0
"#;

const EXAMPLE_TEST: &str = r#"[test]
title = "Example Quiz"
description = "A short quiz to get started"
duration_minutes = 10
published = true

[[questions]]
text = "Which planet is closest to the sun?"
type = "mcq"
options = ["Venus", "Mercury", "Mars"]
correct_answer = "Mercury"
points = 2

[[questions]]
text = "Water boils at 100 degrees Celsius at sea level."
type = "true_false"
correct_answer = "True"

[[questions]]
text = "What is 7 x 8?"
type = "mcq"
options = ["54", "56", "64"]
correct_answer = "56"
"#;
