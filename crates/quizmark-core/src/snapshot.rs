//! A full copy of the persisted rows, with JSON persistence.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dashboard::{StudentInputs, TeacherInputs};
use crate::model::{Attempt, Feedback, Profile, Question, Response, Test};

/// Every row the analytics read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub tests: Vec<Test>,
    pub questions: Vec<Question>,
    pub attempts: Vec<Attempt>,
    pub responses: Vec<Response>,
    pub feedback: Vec<Feedback>,
    pub profiles: Vec<Profile>,
}

impl Snapshot {
    /// Save the snapshot as JSON to a file.
    ///
    /// The JSON goes to a temporary file in the same directory, which then
    /// replaces `path` in one rename. Readers see the old or the new file,
    /// never a partial one.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize snapshot")?;
        let dir = parent_dir(path);
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
        tmp.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("failed to replace snapshot at {}", path.display()))?;
        Ok(())
    }

    /// Open the lock file that serializes updates to the snapshot at `path`.
    ///
    /// Writers hold its write guard from `load_json` until `save_json`
    /// returns. The lock lives in a sidecar `<path>.lock` file because
    /// `save_json` swaps out the snapshot file itself.
    pub fn lock_file(path: &Path) -> Result<fd_lock::RwLock<File>> {
        let lock_path = lock_path(path);
        std::fs::create_dir_all(parent_dir(path))?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("failed to open lock file {}", lock_path.display()))?;
        Ok(fd_lock::RwLock::new(file))
    }

    /// Load a snapshot from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot from {}", path.display()))?;
        let snapshot: Snapshot =
            serde_json::from_str(&content).context("failed to parse snapshot JSON")?;
        Ok(snapshot)
    }

    pub fn test(&self, id: Uuid) -> Option<&Test> {
        self.tests.iter().find(|t| t.id == id)
    }

    pub fn attempt(&self, id: Uuid) -> Option<&Attempt> {
        self.attempts.iter().find(|a| a.id == id)
    }

    /// Questions of one test in `sort_order`.
    pub fn questions_for(&self, test_id: Uuid) -> Vec<Question> {
        let mut questions: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| q.test_id == test_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| q.sort_order);
        questions
    }

    /// Add a test with its questions, replacing any earlier copy of it.
    pub fn upsert_test(&mut self, test: Test, questions: Vec<Question>) {
        self.tests.retain(|t| t.id != test.id);
        self.questions.retain(|q| q.test_id != test.id);
        self.tests.push(test);
        self.questions.extend(questions);
    }

    /// Rows for one student's dashboard.
    pub fn student_inputs(&self, student_id: Uuid) -> StudentInputs {
        let attempts: Vec<Attempt> = self
            .attempts
            .iter()
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect();
        let attempt_ids: HashSet<Uuid> = attempts.iter().map(|a| a.id).collect();
        let test_ids: HashSet<Uuid> = attempts.iter().map(|a| a.test_id).collect();

        StudentInputs {
            responses: self
                .responses
                .iter()
                .filter(|r| attempt_ids.contains(&r.attempt_id))
                .cloned()
                .collect(),
            class_attempts: self
                .attempts
                .iter()
                .filter(|a| test_ids.contains(&a.test_id))
                .cloned()
                .collect(),
            tests: self
                .tests
                .iter()
                .filter(|t| test_ids.contains(&t.id))
                .cloned()
                .collect(),
            questions: self
                .questions
                .iter()
                .filter(|q| test_ids.contains(&q.test_id))
                .cloned()
                .collect(),
            feedback_count: self
                .feedback
                .iter()
                .filter(|f| attempt_ids.contains(&f.attempt_id))
                .count(),
            attempts,
        }
    }

    /// Rows for one teacher's dashboard.
    pub fn teacher_inputs(&self, teacher_id: Uuid) -> TeacherInputs {
        let tests: Vec<Test> = self
            .tests
            .iter()
            .filter(|t| t.owner_id == teacher_id)
            .cloned()
            .collect();
        let test_ids: HashSet<Uuid> = tests.iter().map(|t| t.id).collect();
        let attempts: Vec<Attempt> = self
            .attempts
            .iter()
            .filter(|a| test_ids.contains(&a.test_id))
            .cloned()
            .collect();
        let attempt_ids: HashSet<Uuid> = attempts.iter().map(|a| a.id).collect();
        let student_ids: HashSet<Uuid> = attempts.iter().map(|a| a.student_id).collect();

        TeacherInputs {
            questions: self
                .questions
                .iter()
                .filter(|q| test_ids.contains(&q.test_id))
                .cloned()
                .collect(),
            responses: self
                .responses
                .iter()
                .filter(|r| attempt_ids.contains(&r.attempt_id))
                .cloned()
                .collect(),
            profiles: self
                .profiles
                .iter()
                .filter(|p| student_ids.contains(&p.id))
                .cloned()
                .collect(),
            feedback_count: self
                .feedback
                .iter()
                .filter(|f| f.author_id == teacher_id)
                .count(),
            tests,
            attempts,
        }
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionKind, Role};
    use chrono::Utc;

    fn question(test_id: Uuid, sort_order: i32) -> Question {
        Question {
            id: Uuid::new_v4(),
            test_id,
            text: format!("Q{sort_order}"),
            kind: QuestionKind::TrueFalse,
            options: vec!["True".into(), "False".into()],
            correct_answer: "True".into(),
            points: 1,
            sort_order,
        }
    }

    fn sample() -> (Snapshot, Uuid, Uuid) {
        let teacher = Uuid::new_v4();
        let student = Uuid::new_v4();
        let mine = Test {
            id: Uuid::new_v4(),
            owner_id: teacher,
            title: "Mine".into(),
            description: String::new(),
            duration_minutes: None,
            is_published: true,
        };
        let other = Test {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Other".into(),
            ..mine.clone()
        };

        let mut attempt = Attempt::open(student, mine.id, Utc::now());
        attempt.completed_at = Some(Utc::now());
        attempt.score = Some(100.0);
        let stranger = Attempt::open(Uuid::new_v4(), other.id, Utc::now());

        let snapshot = Snapshot {
            questions: vec![question(mine.id, 2), question(mine.id, 1), question(other.id, 1)],
            feedback: vec![Feedback {
                id: Uuid::new_v4(),
                attempt_id: attempt.id,
                author_id: teacher,
                message: "Well done!".into(),
                is_preset: true,
                created_at: Utc::now(),
            }],
            profiles: vec![Profile {
                id: student,
                full_name: Some("Sam".into()),
                email: None,
                role: Role::Student,
            }],
            tests: vec![mine, other],
            attempts: vec![attempt, stranger],
            responses: Vec::new(),
        };
        (snapshot, teacher, student)
    }

    #[test]
    fn questions_sorted_by_order() {
        let (snapshot, _, _) = sample();
        let test_id = snapshot.tests[0].id;
        let questions = snapshot.questions_for(test_id);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text, "Q1");
        assert_eq!(questions[1].text, "Q2");
    }

    #[test]
    fn student_inputs_filter_by_student() {
        let (snapshot, _, student) = sample();
        let inputs = snapshot.student_inputs(student);
        assert_eq!(inputs.attempts.len(), 1);
        assert_eq!(inputs.tests.len(), 1);
        assert_eq!(inputs.questions.len(), 2);
        assert_eq!(inputs.feedback_count, 1);
    }

    #[test]
    fn teacher_inputs_filter_by_owner() {
        let (snapshot, teacher, _) = sample();
        let inputs = snapshot.teacher_inputs(teacher);
        assert_eq!(inputs.tests.len(), 1);
        assert_eq!(inputs.attempts.len(), 1);
        assert_eq!(inputs.profiles.len(), 1);
        assert_eq!(inputs.feedback_count, 1);
    }

    #[test]
    fn upsert_replaces_questions() {
        let (mut snapshot, _, _) = sample();
        let test = snapshot.tests[0].clone();
        snapshot.upsert_test(test.clone(), vec![question(test.id, 0)]);
        assert_eq!(snapshot.tests.len(), 2);
        assert_eq!(snapshot.questions_for(test.id).len(), 1);
    }

    #[test]
    fn json_roundtrip() {
        let (snapshot, _, _) = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("snapshot.json");
        snapshot.save_json(&path).unwrap();
        let loaded = Snapshot::load_json(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn save_replaces_without_leftovers() {
        let (mut snapshot, _, _) = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, "{\"tests\": [], \"attempts\": [], \"junk\": ").unwrap();

        snapshot.save_json(&path).unwrap();
        snapshot.attempts.clear();
        snapshot.save_json(&path).unwrap();

        let loaded = Snapshot::load_json(&path).unwrap();
        assert!(loaded.attempts.is_empty());
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![OsString::from("snapshot.json")]);
    }

    #[test]
    fn lock_is_exclusive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let mut held = Snapshot::lock_file(&path).unwrap();
        let guard = held.write().unwrap();
        assert!(dir.path().join("snapshot.json.lock").exists());

        let mut other = Snapshot::lock_file(&path).unwrap();
        assert!(other.try_write().is_err());

        drop(guard);
        assert!(other.try_write().is_ok());
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"tests": []}"#).unwrap();
        assert!(snapshot.attempts.is_empty());
        assert!(snapshot.profiles.is_empty());
    }
}
