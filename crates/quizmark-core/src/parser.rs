//! TOML test-definition parser and answer-sheet loader.
//!
//! Loads tests from TOML files and directories, validates them, and resolves
//! JSON answer sheets against a test's questions.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use uuid::Uuid;

use crate::model::{Question, QuestionKind, Test, TRUE_FALSE_OPTIONS};
use crate::scoring::Answers;

/// A test together with its questions, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct TestDefinition {
    pub test: Test,
    pub questions: Vec<Question>,
}

/// Intermediate TOML structure for parsing test files.
#[derive(Debug, Deserialize)]
struct TomlTestFile {
    test: TomlTestHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlTestHeader {
    #[serde(default)]
    id: Option<Uuid>,
    #[serde(default)]
    owner_id: Option<Uuid>,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    duration_minutes: Option<u32>,
    #[serde(default)]
    published: bool,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    #[serde(default)]
    id: Option<Uuid>,
    text: String,
    #[serde(rename = "type", default = "default_kind")]
    kind: String,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: String,
    #[serde(default = "default_points")]
    points: u32,
}

fn default_kind() -> String {
    "mcq".to_string()
}

fn default_points() -> u32 {
    1
}

/// Parse a single TOML file into a `TestDefinition`.
pub fn parse_test(path: &Path) -> Result<TestDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test file: {}", path.display()))?;

    parse_test_str(&content, path)
}

/// Parse a TOML string into a `TestDefinition`.
pub fn parse_test_str(content: &str, source_path: &Path) -> Result<TestDefinition> {
    let parsed: TomlTestFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let test = Test {
        id: parsed.test.id.unwrap_or_else(Uuid::new_v4),
        owner_id: parsed.test.owner_id.unwrap_or_else(Uuid::nil),
        title: parsed.test.title,
        description: parsed.test.description,
        duration_minutes: parsed.test.duration_minutes,
        is_published: parsed.test.published,
    };

    let questions = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| {
            let kind: QuestionKind = q.kind.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?;
            if q.points == 0 {
                anyhow::bail!("question {} has zero points", i + 1);
            }
            let options = match kind {
                QuestionKind::TrueFalse => TRUE_FALSE_OPTIONS.iter().map(|s| s.to_string()).collect(),
                QuestionKind::Mcq => q.options,
            };
            Ok(Question {
                id: q.id.unwrap_or_else(Uuid::new_v4),
                test_id: test.id,
                text: q.text,
                kind,
                options,
                correct_answer: q.correct_answer,
                points: q.points,
                sort_order: i as i32,
            })
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("invalid question in {}", source_path.display()))?;

    Ok(TestDefinition { test, questions })
}

/// Recursively load all `.toml` test files from a directory.
pub fn load_test_directory(dir: &Path) -> Result<Vec<TestDefinition>> {
    let mut tests = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            tests.extend(load_test_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_test(&path) {
                Ok(def) => tests.push(def),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(tests)
}

/// A warning from test validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question concerned, if any.
    pub question: Option<usize>,
    pub message: String,
}

/// Validate a test definition for common authoring mistakes.
pub fn validate_test(def: &TestDefinition) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if def.questions.is_empty() {
        warnings.push(ValidationWarning {
            question: None,
            message: "test has no questions".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for (i, q) in def.questions.iter().enumerate() {
        let n = i + 1;
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                question: Some(n),
                message,
            })
        };

        if !seen_ids.insert(q.id) {
            warn(format!("duplicate question ID: {}", q.id));
        }
        if q.text.trim().is_empty() {
            warn("question text is empty".into());
        }
        if q.kind == QuestionKind::Mcq && q.options.len() < 2 {
            warn(format!("mcq has {} option(s), expected at least 2", q.options.len()));
        }
        let mut seen_options = HashSet::new();
        for option in &q.options {
            if !seen_options.insert(option.as_str()) {
                warn(format!("duplicate option: {option}"));
            }
        }
        if !q.options.contains(&q.correct_answer) {
            warn(format!(
                "correct answer {:?} is not one of the options",
                q.correct_answer
            ));
        }
    }

    warnings
}

/// Load a JSON answer sheet and resolve it against `questions`.
pub fn load_answer_sheet(path: &Path, questions: &[Question]) -> Result<Answers> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answer sheet: {}", path.display()))?;
    parse_answer_sheet_str(&content, questions)
        .with_context(|| format!("invalid answer sheet: {}", path.display()))
}

/// Resolve a JSON answer sheet into the map `grade` consumes.
///
/// Keys are question ids or 1-based positions in `sort_order`. Questions
/// left out of the sheet stay unanswered; grading reports them.
pub fn parse_answer_sheet_str(content: &str, questions: &[Question]) -> Result<Answers> {
    let raw: BTreeMap<String, String> =
        serde_json::from_str(content).context("answer sheet must be a JSON object of strings")?;

    let mut ordered: Vec<&Question> = questions.iter().collect();
    ordered.sort_by_key(|q| q.sort_order);
    let known: HashSet<Uuid> = questions.iter().map(|q| q.id).collect();

    let mut answers = Answers::new();
    for (key, answer) in raw {
        let id = if let Ok(id) = key.parse::<Uuid>() {
            anyhow::ensure!(known.contains(&id), "no question with id {id}");
            id
        } else if let Ok(position) = key.parse::<usize>() {
            ordered
                .get(position.wrapping_sub(1))
                .map(|q| q.id)
                .with_context(|| {
                    format!("question {position} out of range 1..={}", ordered.len())
                })?
        } else {
            anyhow::bail!("answer key {key:?} is neither a question id nor a position");
        };
        if answers.insert(id, answer).is_some() {
            anyhow::bail!("question {key} answered twice");
        }
    }
    Ok(answers)
}
