use std::collections::HashSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::core::artifact::header;
use crate::engine::core::artifact::name::ArtifactName;
use crate::engine::core::entry::Entry;
use crate::engine::core::planner::{AppendStep, MergePlan, NewArtifactBatch};
use crate::engine::core::store::EntryStore;
use crate::engine::errors::{ExecutorError, StoreError};
use crate::shared::datetime::DateCodec;

/// What happens to a source entry once it has been folded into an artifact.
/// Applied strictly after the artifact write/rename of the same step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisposalPolicy {
    /// Copy byte-for-byte into the backup directory, then delete.
    Backup,
    /// Delete directly, no copy.
    Delete,
}

/// Step kind, for failure reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Append,
    NewArtifact,
}

/// One failed plan step, with enough context for a safe manual or automatic
/// re-run: the step kind, the entries it covered, and the error.
#[derive(Debug, Serialize)]
pub struct StepFailure {
    pub step: StepKind,
    pub entries: Vec<String>,
    pub error: String,
}

/// Outcome of executing one merge plan. Counts cover completed steps only;
/// failed steps are listed in `failures` with their effects untouched on
/// disk (their entries remain in the source directory).
#[derive(Debug, Default, Serialize)]
pub struct ExecutionReport {
    pub entries_merged: usize,
    pub entries_skipped_duplicate: usize,
    pub artifacts_created: usize,
    pub artifacts_extended: usize,
    pub failures: Vec<StepFailure>,
}

impl ExecutionReport {
    /// Entries removed from the source directory by this run.
    pub fn entries_processed(&self) -> usize {
        self.entries_merged + self.entries_skipped_duplicate
    }
}

/// Carries out a merge plan step by step. Each step mutates its artifact
/// first and disposes of the consumed entries only once that mutation has
/// durably succeeded, so a crash mid-step never loses entry content.
pub struct MergeExecutor {
    pub output_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub codec: DateCodec,
}

impl MergeExecutor {
    pub fn new(output_dir: PathBuf, backup_dir: PathBuf, codec: DateCodec) -> Self {
        Self {
            output_dir,
            backup_dir,
            codec,
        }
    }

    /// Runs every step of the plan. Step failures are isolated: an I/O
    /// error aborts only its own step, while a create conflict (a planning
    /// or state inconsistency) also cancels the remaining new-artifact
    /// steps. Effects of steps that already completed always stand.
    pub async fn execute(
        &self,
        store: &dyn EntryStore,
        plan: MergePlan,
        policy: DisposalPolicy,
    ) -> ExecutionReport {
        let mut report = ExecutionReport::default();

        if let Some(step) = plan.append {
            if let Err(e) = self.run_append(store, &step, policy, &mut report).await {
                warn!(target: "executor::append", error = %e, "Append step failed");
                report.failures.push(StepFailure {
                    step: StepKind::Append,
                    entries: step.entries.iter().map(|e| e.stem.clone()).collect(),
                    error: e.to_string(),
                });
            }
        }

        for batch in &plan.batches {
            match self.run_new_artifact(store, batch, policy, &mut report).await {
                Ok(()) => {}
                Err(e) => {
                    let conflict = matches!(e, ExecutorError::Conflict(_));
                    warn!(target: "executor::new_artifact", error = %e, "New-artifact step failed");
                    report.failures.push(StepFailure {
                        step: StepKind::NewArtifact,
                        entries: batch.entries.iter().map(|e| e.stem.clone()).collect(),
                        error: e.to_string(),
                    });
                    if conflict {
                        // state disagrees with the plan; stop creating
                        break;
                    }
                }
            }
        }

        report
    }

    async fn run_append(
        &self,
        store: &dyn EntryStore,
        step: &AppendStep,
        policy: DisposalPolicy,
        report: &mut ExecutionReport,
    ) -> Result<(), ExecutorError> {
        let mut content = store.read(&step.artifact.path).await?;
        let existing: HashSet<NaiveDate> =
            header::header_dates(&content, &self.codec).into_iter().collect();

        let mut appended: Vec<&Entry> = Vec::new();
        let mut already_present: Vec<&Entry> = Vec::new();
        for entry in &step.entries {
            if existing.contains(&entry.date) {
                // left over from a run that mutated the artifact but was
                // interrupted before disposal; finish the disposal only
                warn!(
                    target: "executor::append",
                    entry = %entry.stem,
                    artifact = %step.artifact.file_name,
                    "Entry already present in artifact, completing disposal"
                );
                already_present.push(entry);
                continue;
            }
            let body = store.read(&entry.path).await?;
            content.push_str("\n\n");
            content.push_str(&header::render_block(&entry.stem, &body));
            appended.push(entry);
        }

        let mut artifact_path = step.artifact.path.clone();
        if let Some(last) = appended.last() {
            store.write(&artifact_path, &content).await?;

            // rename-on-extend: the encoded start date never moves here,
            // only the end advances
            let current = step.artifact.name;
            let end = current.end.max(last.date);
            if end != current.end {
                let renamed = ArtifactName::new(current.start, end);
                let new_path = self.output_dir.join(renamed.file_name(&self.codec));
                store.rename(&artifact_path, &new_path).await?;
                info!(
                    target: "executor::append",
                    from = %step.artifact.file_name,
                    to = %renamed.file_name(&self.codec),
                    "Renamed artifact to cover extended range"
                );
                artifact_path = new_path;
            }
        }

        for entry in appended.iter().chain(already_present.iter()) {
            self.dispose(store, entry, policy).await?;
        }

        if !appended.is_empty() {
            report.artifacts_extended += 1;
        }
        report.entries_merged += appended.len();
        report.entries_skipped_duplicate += already_present.len();
        info!(
            target: "executor::append",
            artifact = %artifact_path.display(),
            appended = appended.len(),
            skipped = already_present.len(),
            "Append step complete"
        );
        Ok(())
    }

    async fn run_new_artifact(
        &self,
        store: &dyn EntryStore,
        batch: &NewArtifactBatch,
        policy: DisposalPolicy,
        report: &mut ExecutionReport,
    ) -> Result<(), ExecutorError> {
        let (first, last) = match (batch.entries.first(), batch.entries.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(ExecutorError::EmptyBatch),
        };

        // entries arrive in ascending date order, so first/last are min/max
        let name = ArtifactName::new(first.date, last.date);
        let path = self.output_dir.join(name.file_name(&self.codec));

        let mut blocks = Vec::with_capacity(batch.entries.len());
        for entry in &batch.entries {
            let body = store.read(&entry.path).await?;
            blocks.push(header::render_block(&entry.stem, &body));
        }
        let content = blocks.join("\n\n") + "\n";

        store.create_dir_all(&self.output_dir).await?;
        match store.create(&path, &content).await {
            Ok(()) => {}
            Err(StoreError::AlreadyExists(p)) => return Err(ExecutorError::Conflict(p)),
            Err(e) => return Err(e.into()),
        }

        for entry in &batch.entries {
            self.dispose(store, entry, policy).await?;
        }

        report.artifacts_created += 1;
        report.entries_merged += batch.entries.len();
        info!(
            target: "executor::new_artifact",
            artifact = %path.display(),
            entries = batch.entries.len(),
            "Created artifact"
        );
        Ok(())
    }

    async fn dispose(
        &self,
        store: &dyn EntryStore,
        entry: &Entry,
        policy: DisposalPolicy,
    ) -> Result<(), ExecutorError> {
        if policy == DisposalPolicy::Backup {
            store.create_dir_all(&self.backup_dir).await?;
            let dest = self.backup_dir.join(entry.file_name());
            store.copy(&entry.path, &dest).await?;
        }
        store.delete(&entry.path).await?;
        Ok(())
    }
}
