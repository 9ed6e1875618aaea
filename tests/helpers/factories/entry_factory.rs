use std::path::{Path, PathBuf};

/// Writes dated entry files (`<stem>.md`) into a directory under test.
pub struct EntryFactory {
    dir: PathBuf,
    body: Option<String>,
}

impl EntryFactory {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    /// Default bodies mention the stem so every file's content is distinct.
    pub fn create(&self, stem: &str) -> PathBuf {
        let path = self.dir.join(format!("{stem}.md"));
        let body = self
            .body
            .clone()
            .unwrap_or_else(|| format!("Diary for {stem}.\n"));
        std::fs::write(&path, body).unwrap();
        path
    }

    pub fn create_many(&self, stems: &[&str]) -> Vec<PathBuf> {
        stems.iter().map(|stem| self.create(stem)).collect()
    }
}
