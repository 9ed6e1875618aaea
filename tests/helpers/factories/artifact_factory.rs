use std::path::{Path, PathBuf};

/// Writes merge-artifact files with one header block per (stem, body) pair.
pub struct ArtifactFactory {
    dir: PathBuf,
}

impl ArtifactFactory {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn create(&self, file_name: &str, entries: &[(&str, &str)]) -> PathBuf {
        let blocks: Vec<String> = entries
            .iter()
            .map(|(stem, body)| format!("# {stem}\n\n{body}"))
            .collect();
        let content = blocks.join("\n\n") + "\n";
        let path = self.dir.join(file_name);
        std::fs::write(&path, content).unwrap();
        path
    }
}
