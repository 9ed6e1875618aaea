use tracing::debug;

use crate::engine::core::artifact::catalog::ArtifactState;
use crate::engine::core::entry::Entry;

/// Execution plan for one merge run: an optional append to the latest open
/// artifact, then zero or more new-artifact batches. Ephemeral; recomputed
/// from directory state on every run.
#[derive(Debug, Clone)]
pub struct MergePlan {
    pub append: Option<AppendStep>,
    pub batches: Vec<NewArtifactBatch>,
}

impl MergePlan {
    pub fn is_empty(&self) -> bool {
        self.append.is_none() && self.batches.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        let appended = self.append.as_ref().map_or(0, |s| s.entries.len());
        appended + self.batches.iter().map(|b| b.entries.len()).sum::<usize>()
    }
}

/// Entries to fold into an existing artifact, bounded by its remaining
/// capacity.
#[derive(Debug, Clone)]
pub struct AppendStep {
    pub artifact: ArtifactState,
    pub entries: Vec<Entry>,
}

/// Entries forming one brand-new artifact, at most `capacity` of them.
#[derive(Debug, Clone)]
pub struct NewArtifactBatch {
    pub entries: Vec<Entry>,
}

/// Pure planning: no I/O, no randomness. Given identical inputs the plan is
/// identical.
pub struct MergePlanner {
    pub capacity: usize,
}

impl MergePlanner {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// `entries` must already be in ascending date order (the selector's
    /// contract). The append step takes from the front, oldest first; the
    /// remainder is chunked in order into batches of `capacity`.
    pub fn plan(&self, entries: Vec<Entry>, latest: Option<ArtifactState>) -> MergePlan {
        let mut remaining = entries;
        let mut append = None;

        if let Some(artifact) = latest {
            let open_slots = self.capacity.saturating_sub(artifact.entry_count);
            let take = open_slots.min(remaining.len());
            if take > 0 {
                let overflow = remaining.split_off(take);
                debug!(
                    target: "planner::plan",
                    artifact = %artifact.file_name,
                    take,
                    open_slots,
                    "Planned append to latest artifact"
                );
                append = Some(AppendStep {
                    artifact,
                    entries: remaining,
                });
                remaining = overflow;
            }
        }

        let batches: Vec<NewArtifactBatch> = remaining
            .chunks(self.capacity)
            .map(|chunk| NewArtifactBatch {
                entries: chunk.to_vec(),
            })
            .collect();

        debug!(
            target: "planner::plan",
            append = append.is_some(),
            batch_count = batches.len(),
            "Planned merge run"
        );
        MergePlan { append, batches }
    }
}
