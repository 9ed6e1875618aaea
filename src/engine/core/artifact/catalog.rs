use std::path::{Path, PathBuf};

use tracing::debug;

use super::header;
use super::name::ArtifactName;
use crate::engine::core::store::EntryStore;
use crate::engine::errors::StoreError;
use crate::shared::datetime::DateCodec;

/// On-disk state of one merge artifact at scan time. `entry_count` is
/// recomputed from the content's header lines on every scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactState {
    pub path: PathBuf,
    pub file_name: String,
    pub name: ArtifactName,
    pub entry_count: usize,
}

/// Finds the most recent merge artifact in `output_dir`: descending order of
/// file name, which under the naming scheme is the most recently started or
/// extended range. Returns None when the directory is missing or holds no
/// parseable artifact.
pub async fn latest_artifact(
    store: &dyn EntryStore,
    output_dir: &Path,
    codec: &DateCodec,
) -> Result<Option<ArtifactState>, StoreError> {
    if !store.is_dir(output_dir).await {
        return Ok(None);
    }

    let mut named: Vec<(String, PathBuf, ArtifactName)> = Vec::new();
    for path in store.list_children(output_dir).await? {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        match ArtifactName::parse(file_name, codec) {
            Some(name) => named.push((file_name.to_string(), path.clone(), name)),
            None if ArtifactName::matches_prefix(file_name) => {
                debug!(
                    target: "artifact::catalog",
                    file = file_name,
                    "Skipping artifact-prefixed file with unparseable name"
                );
            }
            None => {}
        }
    }

    named.sort_by(|a, b| b.0.cmp(&a.0));
    let Some((file_name, path, name)) = named.into_iter().next() else {
        return Ok(None);
    };

    let content = store.read(&path).await?;
    let entry_count = header::entry_count(&content, codec);
    debug!(
        target: "artifact::catalog",
        file = %file_name,
        entry_count,
        "Latest artifact"
    );

    Ok(Some(ArtifactState {
        path,
        file_name,
        name,
        entry_count,
    }))
}
