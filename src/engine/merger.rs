use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, error, info, warn};

use crate::engine::core::artifact::catalog;
use crate::engine::core::executor::{ExecutionReport, MergeExecutor};
use crate::engine::core::planner::MergePlanner;
use crate::engine::core::repair::NameRepairer;
use crate::engine::core::selector::EntrySelector;
use crate::engine::core::store::EntryStore;
use crate::engine::errors::SelectorError;
use crate::engine::guard::MergeGuard;
use crate::engine::trigger::{self, TriggerAction};
use crate::shared::config::model::MergeConfig;
use crate::shared::datetime::DateCodec;

/// Result of one guarded invocation.
#[derive(Debug)]
pub enum MergeOutcome {
    /// A run was already in progress; nothing was touched.
    Skipped,
    /// The eligible set was empty, below the automatic threshold, or the
    /// source directory was missing.
    NothingToMerge,
    Completed(ExecutionReport),
}

/// Orchestrates one merge run: repair pass, selection, catalog scan,
/// planning, execution, all inside the re-entrancy guard. Stateless across
/// invocations apart from what is on disk.
pub struct Merger {
    pub cfg: MergeConfig,
    pub codec: DateCodec,
    pub store: Arc<dyn EntryStore>,
    pub guard: MergeGuard,
}

impl Merger {
    pub fn new(cfg: MergeConfig, store: Arc<dyn EntryStore>) -> Self {
        let codec = DateCodec::new(cfg.date_format.clone());
        Self {
            cfg,
            codec,
            store,
            guard: MergeGuard::new(),
        }
    }

    /// Explicit user-requested run.
    pub async fn run(&self) -> MergeOutcome {
        self.run_at(Local::now().date_naive()).await
    }

    /// Like `run`, with the reference date injected.
    pub async fn run_at(&self, reference_date: NaiveDate) -> MergeOutcome {
        let Some(_token) = self.guard.try_acquire() else {
            debug!(target: "merger::run", "Merge already in progress, skipping");
            return MergeOutcome::Skipped;
        };
        self.pipeline(reference_date, None).await
    }

    /// Event-driven run: proceeds only once the eligible set has reached
    /// the configured threshold.
    pub async fn auto_run(&self) -> MergeOutcome {
        self.auto_run_at(Local::now().date_naive()).await
    }

    pub async fn auto_run_at(&self, reference_date: NaiveDate) -> MergeOutcome {
        let Some(_token) = self.guard.try_acquire() else {
            debug!(target: "merger::auto_run", "Merge already in progress, skipping");
            return MergeOutcome::Skipped;
        };
        self.pipeline(reference_date, Some(self.cfg.auto_merge_threshold))
            .await
    }

    /// Pure decision for a "new entry created" notification; the host calls
    /// `auto_run` when this returns `ConsiderMerge`.
    pub fn on_entry_created(&self, stem: &str, today: NaiveDate) -> TriggerAction {
        trigger::on_entry_created(self.cfg.auto_merge, &self.codec, stem, today)
    }

    async fn pipeline(
        &self,
        reference_date: NaiveDate,
        threshold: Option<usize>,
    ) -> MergeOutcome {
        let store = self.store.as_ref();
        let output_dir = PathBuf::from(&self.cfg.output_dir);

        // reconcile any artifact name left stale by an interrupted run, so
        // the catalog scan below sees true ranges
        let repairer = NameRepairer::new(output_dir.clone(), self.codec.clone());
        match repairer.repair(store).await {
            Ok(0) => {}
            Ok(n) => info!(target: "merger::run", repaired = n, "Repaired artifact names"),
            Err(e) => warn!(target: "merger::run", error = %e, "Name repair pass failed"),
        }

        let selector = EntrySelector::new(PathBuf::from(&self.cfg.source_dir), self.codec.clone());
        let entries = match selector.select(store, reference_date).await {
            Ok(entries) => entries,
            Err(SelectorError::SourceDirMissing(path)) => {
                warn!(
                    target: "merger::run",
                    path = %path.display(),
                    "Source directory missing, nothing to merge"
                );
                return MergeOutcome::NothingToMerge;
            }
            Err(e) => {
                error!(target: "merger::run", error = %e, "Entry selection failed");
                return MergeOutcome::NothingToMerge;
            }
        };

        if let Some(min) = threshold {
            if entries.len() < min {
                debug!(
                    target: "merger::auto_run",
                    eligible = entries.len(),
                    threshold = min,
                    "Below automatic merge threshold"
                );
                return MergeOutcome::NothingToMerge;
            }
        }
        if entries.is_empty() {
            info!(target: "merger::run", "Nothing to merge");
            return MergeOutcome::NothingToMerge;
        }

        let latest = match catalog::latest_artifact(store, &output_dir, &self.codec).await {
            Ok(latest) => latest,
            Err(e) => {
                error!(target: "merger::run", error = %e, "Artifact catalog scan failed");
                return MergeOutcome::NothingToMerge;
            }
        };

        let planner = MergePlanner::new(self.cfg.max_entries_per_file);
        let plan = planner.plan(entries, latest);

        let executor = MergeExecutor::new(
            output_dir,
            PathBuf::from(&self.cfg.backup_dir),
            self.codec.clone(),
        );
        let report = executor.execute(store, plan, self.cfg.disposal).await;

        info!(
            target: "merger::run",
            entries_merged = report.entries_merged,
            artifacts_created = report.artifacts_created,
            artifacts_extended = report.artifacts_extended,
            failures = report.failures.len(),
            "Merge run complete"
        );
        MergeOutcome::Completed(report)
    }
}
