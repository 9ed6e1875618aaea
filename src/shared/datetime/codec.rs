use chrono::NaiveDate;

/// Strict date codec around a chrono format string.
///
/// Precondition on the format: entry ordering is done on rendered names, so
/// name order only equals date order when the format is fixed-width,
/// zero-padded and most-significant-first (e.g. `%Y-%m-%d`). Formats like
/// `%d-%m-%Y` break that equivalence and are not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCodec {
    format: String,
}

impl DateCodec {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    /// Strict parse: the whole input must be consumed by the format.
    /// Returns None for trailing garbage or impossible dates.
    pub fn parse(&self, s: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(s, &self.format).ok()
    }

    pub fn render(&self, date: NaiveDate) -> String {
        date.format(&self.format).to_string()
    }
}
