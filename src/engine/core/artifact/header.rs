use chrono::NaiveDate;

use crate::shared::datetime::DateCodec;

/// Entry header grammar inside a merge artifact:
///
/// ```text
/// artifact    = block (blank-line block)*
/// block       = header-line blank-line body
/// header-line = "# " date
/// ```
///
/// where `date` strict-parses under the configured format. Header lines are
/// the only marker used to count entries and to recover the covered date
/// range; there is deliberately no side-channel count to diverge from.
///
/// A body line that itself matches the grammar is indistinguishable from a
/// real header. Plain `#` headings are fine; headings that are exactly a
/// date under the configured format are not supported inside entry bodies.
pub const HEADER_PREFIX: &str = "# ";

/// Parses one line as an entry header. Returns the header date, or None for
/// body lines.
pub fn parse_header_line(line: &str, codec: &DateCodec) -> Option<NaiveDate> {
    codec.parse(line.strip_prefix(HEADER_PREFIX)?)
}

/// All header dates in the artifact, in document order.
pub fn header_dates(content: &str, codec: &DateCodec) -> Vec<NaiveDate> {
    content
        .lines()
        .filter_map(|line| parse_header_line(line, codec))
        .collect()
}

/// Number of entries currently held by the artifact.
pub fn entry_count(content: &str, codec: &DateCodec) -> usize {
    header_dates(content, codec).len()
}

/// Min/max header date actually present in the artifact, or None when it
/// holds no entries.
pub fn date_range(content: &str, codec: &DateCodec) -> Option<(NaiveDate, NaiveDate)> {
    let dates = header_dates(content, codec);
    let min = dates.iter().min()?;
    let max = dates.iter().max()?;
    Some((*min, *max))
}

/// Renders one entry as an artifact block: header line, blank line, body.
/// Trailing whitespace on the body is dropped so blocks join uniformly.
pub fn render_block(stem: &str, body: &str) -> String {
    format!("{HEADER_PREFIX}{stem}\n\n{}", body.trim_end())
}
