use std::path::PathBuf;

use chrono::NaiveDate;

use crate::engine::core::Entry;
use crate::shared::datetime::DateCodec;

fn iso() -> DateCodec {
    DateCodec::new("%Y-%m-%d")
}

#[test]
fn parses_dated_stem() {
    let entry = Entry::from_path(PathBuf::from("/diary/2024-03-15.md"), &iso()).unwrap();
    assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    assert_eq!(entry.stem, "2024-03-15");
    assert_eq!(entry.file_name(), "2024-03-15.md");
}

#[test]
fn rejects_non_date_stem() {
    assert!(Entry::from_path(PathBuf::from("/diary/notes.md"), &iso()).is_none());
}

#[test]
fn rejects_stem_with_suffix() {
    assert!(Entry::from_path(PathBuf::from("/diary/2024-03-15 draft.md"), &iso()).is_none());
}
