use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::debug;

use crate::engine::core::artifact::name::ArtifactName;
use crate::engine::core::entry::{ENTRY_EXT, Entry};
use crate::engine::core::store::EntryStore;
use crate::engine::errors::SelectorError;
use crate::shared::datetime::DateCodec;

/// Scans the source directory for entries eligible to merge. Read-only; the
/// eligible set is recomputed from directory state on every run.
pub struct EntrySelector {
    pub source_dir: PathBuf,
    pub codec: DateCodec,
}

impl EntrySelector {
    pub fn new(source_dir: PathBuf, codec: DateCodec) -> Self {
        Self { source_dir, codec }
    }

    /// Returns the eligible set in ascending stem order. An entry is
    /// eligible when it carries the entry extension, is not named like a
    /// merge artifact, its stem strict-parses under the date format, and
    /// its date is strictly before `reference_date` (today's entry is
    /// presumed still being written).
    ///
    /// Ascending stem order equals ascending date order only under the
    /// fixed-width format precondition documented on `DateCodec`.
    pub async fn select(
        &self,
        store: &dyn EntryStore,
        reference_date: NaiveDate,
    ) -> Result<Vec<Entry>, SelectorError> {
        if !store.is_dir(&self.source_dir).await {
            return Err(SelectorError::SourceDirMissing(self.source_dir.clone()));
        }

        let mut entries = Vec::new();
        for path in store.list_children(&self.source_dir).await? {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXT) {
                continue;
            }
            if ArtifactName::matches_prefix(file_name) {
                continue;
            }
            let Some(entry) = Entry::from_path(path.clone(), &self.codec) else {
                debug!(
                    target: "selector::select",
                    file = file_name,
                    "Skipping file whose stem is not a valid date"
                );
                continue;
            };
            if entry.date >= reference_date {
                debug!(
                    target: "selector::select",
                    file = file_name,
                    "Skipping entry dated today or later"
                );
                continue;
            }
            entries.push(entry);
        }

        entries.sort_by(|a, b| a.stem.cmp(&b.stem));
        debug!(
            target: "selector::select",
            count = entries.len(),
            "Selected eligible entries"
        );
        Ok(entries)
    }
}
