use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::engine::core::entry::ENTRY_EXT;
use crate::shared::datetime::DateCodec;

/// Prefix shared by every merge artifact file name. The selector uses it to
/// keep artifacts out of the eligible set even when their dates no longer
/// parse.
pub const ARTIFACT_PREFIX: &str = "merged-";

/// Shape of an artifact file name. Date fields are validated separately by
/// the codec, so the capture groups stay format-agnostic; the lazy middle
/// group keeps `_to_` from being swallowed.
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^merged-(.+?)_to_(.+)\.md$").expect("artifact name regex"));

/// Inclusive date range encoded in a merge artifact's file name,
/// `merged-<start>_to_<end>.md`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactName {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ArtifactName {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Renders the file name under the configured date format.
    pub fn file_name(&self, codec: &DateCodec) -> String {
        format!(
            "{}{}_to_{}.{}",
            ARTIFACT_PREFIX,
            codec.render(self.start),
            codec.render(self.end),
            ENTRY_EXT
        )
    }

    /// Round-trip parse of an artifact file name. Returns None when the
    /// shape or either date does not match the configured format.
    pub fn parse(file_name: &str, codec: &DateCodec) -> Option<Self> {
        let caps = NAME_RE.captures(file_name)?;
        let start = codec.parse(caps.get(1)?.as_str())?;
        let end = codec.parse(caps.get(2)?.as_str())?;
        Some(Self { start, end })
    }

    /// Whether a file name is claimed by the artifact naming scheme,
    /// regardless of date validity.
    pub fn matches_prefix(file_name: &str) -> bool {
        file_name.starts_with(ARTIFACT_PREFIX)
    }
}
