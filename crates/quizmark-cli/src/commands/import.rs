//! The `quizmark import` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use uuid::Uuid;

use quizmark_core::snapshot::Snapshot;

pub fn execute(test_path: PathBuf, snapshot_path: PathBuf, owner: Option<Uuid>) -> Result<()> {
    let tests = super::load_tests(&test_path)?;
    if tests.is_empty() {
        anyhow::bail!("no test definitions found in {}", test_path.display());
    }

    let mut lock = Snapshot::lock_file(&snapshot_path)?;
    let _guard = lock.write().context("failed to lock snapshot")?;
    let mut snapshot = if snapshot_path.exists() {
        Snapshot::load_json(&snapshot_path)?
    } else {
        Snapshot::default()
    };

    for mut def in tests {
        if let Some(owner) = owner {
            def.test.owner_id = owner;
        }
        println!(
            "Imported {} ({} questions): {}",
            def.test.title,
            def.questions.len(),
            def.test.id
        );
        snapshot.upsert_test(def.test, def.questions);
    }

    snapshot.save_json(&snapshot_path)?;
    tracing::info!(path = %snapshot_path.display(), tests = snapshot.tests.len(), "snapshot saved");

    Ok(())
}
