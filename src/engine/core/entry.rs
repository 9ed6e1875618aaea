use std::path::PathBuf;

use chrono::NaiveDate;

use crate::shared::datetime::DateCodec;

/// File extension carried by diary entries and merge artifacts.
pub const ENTRY_EXT: &str = "md";

/// A single dated source record, identified by its base name.
///
/// `stem` is the rendered date exactly as it appears on disk; `date` is the
/// parsed value. Both are kept so headers and backups can reuse the original
/// spelling without re-rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub date: NaiveDate,
    pub stem: String,
    pub path: PathBuf,
}

impl Entry {
    /// Builds an entry from a path whose file stem strict-parses under the
    /// configured date format. Returns None otherwise.
    pub fn from_path(path: PathBuf, codec: &DateCodec) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?.to_string();
        let date = codec.parse(&stem)?;
        Some(Self { date, stem, path })
    }

    /// File name including the entry extension, e.g. `2024-03-15.md`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.stem, ENTRY_EXT)
    }
}
