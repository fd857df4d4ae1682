//! The `quizmark start`, `submit` and `feedback` commands.
//!
//! Each locks the snapshot, loads it into a [`MemoryStore`], drives the
//! lifecycle, and writes the snapshot back only when something changed. The
//! lock is held until the write finishes, so concurrent commands on the same
//! snapshot run one after another and the loser of a double submit sees the
//! graded attempt.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use uuid::Uuid;

use quizmark_core::lifecycle::AttemptLifecycle;
use quizmark_core::parser;
use quizmark_core::snapshot::Snapshot;
use quizmark_core::store::MemoryStore;

fn open(snapshot_path: &Path) -> Result<(Arc<MemoryStore>, AttemptLifecycle)> {
    let snapshot = Snapshot::load_json(snapshot_path)?;
    let store = Arc::new(MemoryStore::from_snapshot(snapshot));
    let lifecycle = AttemptLifecycle::new(store.clone());
    Ok((store, lifecycle))
}

pub async fn start(snapshot_path: PathBuf, student: Uuid, test: Uuid) -> Result<()> {
    let mut lock = Snapshot::lock_file(&snapshot_path)?;
    let _guard = lock.write().context("failed to lock snapshot")?;
    let (store, lifecycle) = open(&snapshot_path)?;

    let known = store.snapshot().await.test(test).is_some();
    if !known {
        anyhow::bail!("test {test} not found in {}", snapshot_path.display());
    }

    let attempt = lifecycle.start_attempt(student, test).await?;
    store.snapshot().await.save_json(&snapshot_path)?;

    println!("{}", attempt.id);
    Ok(())
}

pub async fn submit(
    snapshot_path: PathBuf,
    attempt_id: Uuid,
    answers_path: PathBuf,
    format: String,
) -> Result<()> {
    let mut lock = Snapshot::lock_file(&snapshot_path)?;
    let _guard = lock.write().context("failed to lock snapshot")?;
    let (store, lifecycle) = open(&snapshot_path)?;

    let rows = store.snapshot().await;
    let attempt = rows
        .attempt(attempt_id)
        .cloned()
        .with_context(|| format!("attempt {attempt_id} not found"))?;
    let questions = rows.questions_for(attempt.test_id);

    let answers = parser::load_answer_sheet(&answers_path, &questions)?;
    let result = lifecycle
        .submit_attempt(&attempt, &questions, &answers)
        .await?;
    store.snapshot().await.save_json(&snapshot_path)?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => super::grade::print_result(&result, &questions),
    }

    Ok(())
}

pub async fn feedback(
    snapshot_path: PathBuf,
    attempt_id: Uuid,
    author: Uuid,
    message: String,
) -> Result<()> {
    let mut lock = Snapshot::lock_file(&snapshot_path)?;
    let _guard = lock.write().context("failed to lock snapshot")?;
    let (store, lifecycle) = open(&snapshot_path)?;

    let feedback = lifecycle.add_feedback(attempt_id, author, &message).await?;
    store.snapshot().await.save_json(&snapshot_path)?;

    let kind = if feedback.is_preset { "preset" } else { "custom" };
    println!("Added {kind} feedback {} to attempt {attempt_id}", feedback.id);
    Ok(())
}
