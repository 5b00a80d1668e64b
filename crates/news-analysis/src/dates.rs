use chrono::NaiveDate;

/// What to do with publish dates the provider reports in a shape we can't
/// parse. `SortFirst` keeps the item and collapses its sort key to the
/// earliest representable date; `Exclude` drops the item from the digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedDates {
    #[default]
    SortFirst,
    Exclude,
}

/// Parse a provider date in day-month-name-year form, e.g. "04 Mar 2024".
pub fn try_parse_published(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%d %b %Y").ok()
}

/// Sort key for digest ordering. Unparseable dates collapse to
/// `NaiveDate::MIN` so they sort before everything else rather than
/// crashing the sort.
pub fn sort_key(date_str: &str) -> NaiveDate {
    try_parse_published(date_str).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_date() {
        assert_eq!(
            try_parse_published("04 Mar 2024"),
            NaiveDate::from_ymd_opt(2024, 3, 4)
        );
        assert_eq!(
            try_parse_published(" 1 Jan 2023 "),
            NaiveDate::from_ymd_opt(2023, 1, 1)
        );
    }

    #[test]
    fn test_parse_invalid_date() {
        assert_eq!(try_parse_published("3 days ago"), None);
        assert_eq!(try_parse_published(""), None);
        assert_eq!(try_parse_published("2024-03-04"), None);
    }

    #[test]
    fn test_sort_key_fallback_is_minimum() {
        assert_eq!(sort_key("yesterday"), NaiveDate::MIN);
        assert!(sort_key("yesterday") < sort_key("01 Jan 1970"));
    }
}
