//! Inclusive date-range filter for the cart list.

use chrono::NaiveDate;

/// Query-parameter date format (`yyyy-MM-dd`).
const PARAM_FORMAT: &str = "%Y-%m-%d";

/// An optional inclusive date range constraining a cart list query.
///
/// Invariant: `end >= start` whenever both are present. Construction goes
/// through [`DateRange::normalized`], which drops an end date that a newly
/// chosen start would invalidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Build a range, clearing the end date if it precedes the start.
    #[must_use]
    pub fn normalized(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (Some(s), Some(e)) if e < s => Self { start, end: None },
            _ => Self { start, end },
        }
    }

    /// Parse query-string values leniently: unparsable input counts as
    /// absent rather than failing the request.
    #[must_use]
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Self {
        Self::normalized(parse_param(start), parse_param(end))
    }

    /// Whether no constraint is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// `startdate` query parameter value, if set.
    #[must_use]
    pub fn start_param(&self) -> Option<String> {
        self.start.map(|d| d.format(PARAM_FORMAT).to_string())
    }

    /// `enddate` query parameter value, if set.
    #[must_use]
    pub fn end_param(&self) -> Option<String> {
        self.end.map(|d| d.format(PARAM_FORMAT).to_string())
    }
}

fn parse_param(value: Option<&str>) -> Option<NaiveDate> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, PARAM_FORMAT).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_normalized_keeps_ordered_range() {
        let range = DateRange::normalized(Some(day("2024-06-01")), Some(day("2024-06-10")));
        assert_eq!(range.start, Some(day("2024-06-01")));
        assert_eq!(range.end, Some(day("2024-06-10")));
    }

    #[test]
    fn test_start_after_end_clears_end() {
        let range = DateRange::normalized(Some(day("2024-06-15")), Some(day("2024-06-10")));
        assert_eq!(range.start, Some(day("2024-06-15")));
        assert_eq!(range.end, None);
    }

    #[test]
    fn test_equal_start_and_end_is_valid() {
        let range = DateRange::normalized(Some(day("2024-06-10")), Some(day("2024-06-10")));
        assert_eq!(range.end, Some(day("2024-06-10")));
    }

    #[test]
    fn test_end_without_start_is_kept() {
        let range = DateRange::normalized(None, Some(day("2024-06-10")));
        assert_eq!(range.start, None);
        assert_eq!(range.end, Some(day("2024-06-10")));
    }

    #[test]
    fn test_parse_lenient() {
        let range = DateRange::parse(Some("2024-06-01"), Some("not-a-date"));
        assert_eq!(range.start, Some(day("2024-06-01")));
        assert_eq!(range.end, None);

        let range = DateRange::parse(Some(""), None);
        assert!(range.is_empty());
    }

    #[test]
    fn test_query_params() {
        let range = DateRange::normalized(Some(day("2024-06-01")), None);
        assert_eq!(range.start_param().as_deref(), Some("2024-06-01"));
        assert_eq!(range.end_param(), None);
    }
}
