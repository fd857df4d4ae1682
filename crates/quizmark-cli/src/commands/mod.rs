pub mod attempt;
pub mod grade;
pub mod import;
pub mod init;
pub mod leaderboard;
pub mod student;
pub mod teacher;
pub mod validate;

use std::path::Path;

use anyhow::Result;
use quizmark_core::parser::{self, TestDefinition};

/// Load one test file, or every test below a directory.
pub fn load_tests(path: &Path) -> Result<Vec<TestDefinition>> {
    if path.is_dir() {
        parser::load_test_directory(path)
    } else {
        Ok(vec![parser::parse_test(path)?])
    }
}

/// `42` -> `"42%"`, one decimal when the value is fractional.
pub fn pct(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}%")
    } else {
        format!("{value:.1}%")
    }
}
