use std::path::PathBuf;

use tracing::{info, warn};

use crate::engine::core::artifact::header;
use crate::engine::core::artifact::name::ArtifactName;
use crate::engine::core::store::EntryStore;
use crate::engine::errors::StoreError;
use crate::shared::datetime::DateCodec;

/// Reconciles artifact names with their content before planning. A run
/// interrupted between content write and rename leaves an artifact whose
/// encoded range lags its headers; this pass renames it to the actual
/// min/max header dates so planning never works from a stale range.
pub struct NameRepairer {
    pub output_dir: PathBuf,
    pub codec: DateCodec,
}

impl NameRepairer {
    pub fn new(output_dir: PathBuf, codec: DateCodec) -> Self {
        Self { output_dir, codec }
    }

    /// Returns the number of artifacts renamed. Artifacts with unparseable
    /// names or no headers are logged and left alone.
    pub async fn repair(&self, store: &dyn EntryStore) -> Result<usize, StoreError> {
        if !store.is_dir(&self.output_dir).await {
            return Ok(0);
        }

        let mut repaired = 0;
        for path in store.list_children(&self.output_dir).await? {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !ArtifactName::matches_prefix(file_name) {
                continue;
            }
            let Some(name) = ArtifactName::parse(file_name, &self.codec) else {
                warn!(
                    target: "repair::scan",
                    file = file_name,
                    "Artifact name does not round-trip, leaving untouched"
                );
                continue;
            };

            let content = store.read(&path).await?;
            let Some((min, max)) = header::date_range(&content, &self.codec) else {
                warn!(
                    target: "repair::scan",
                    file = file_name,
                    "Artifact holds no entry headers, leaving untouched"
                );
                continue;
            };
            if min == name.start && max == name.end {
                continue;
            }

            let fixed = ArtifactName::new(min, max);
            let new_path = self.output_dir.join(fixed.file_name(&self.codec));
            store.rename(&path, &new_path).await?;
            info!(
                target: "repair::scan",
                from = file_name,
                to = %fixed.file_name(&self.codec),
                "Repaired artifact name to match content range"
            );
            repaired += 1;
        }
        Ok(repaired)
    }
}
