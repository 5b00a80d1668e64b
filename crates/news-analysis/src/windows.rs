use brief_core::{BriefError, TimeWindow};
use chrono::{Duration, NaiveDate};

/// Split the lookback horizon into 30-day windows.
///
/// Window `m` covers `[today - 30*(m+1) days, today - 30*m days)` for
/// `m = start_offset, start_offset + month_step, ... <= months_back`.
/// The fixed 30-day month is a documented simplification, not
/// calendar-accurate.
pub fn partition(
    months_back: u32,
    month_step: u32,
    start_offset: u32,
    today: NaiveDate,
) -> Result<Vec<TimeWindow>, BriefError> {
    if month_step == 0 {
        return Err(BriefError::InvalidRange(
            "month_step must be at least 1".to_string(),
        ));
    }

    let mut windows = Vec::new();
    let mut m = start_offset;
    while m <= months_back {
        let end = today - Duration::days(30 * m as i64);
        let start = today - Duration::days(30 * (m as i64 + 1));
        windows.push(TimeWindow { index: m, start, end });
        m += month_step;
    }

    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_zero_step_is_invalid() {
        let err = partition(12, 0, 0, today()).unwrap_err();
        assert!(matches!(err, BriefError::InvalidRange(_)));
    }

    #[test]
    fn test_window_count_formula() {
        // ceil((months_back - start_offset + 1) / month_step)
        assert_eq!(partition(12, 1, 0, today()).unwrap().len(), 13);
        assert_eq!(partition(5, 2, 0, today()).unwrap().len(), 3); // m = 0, 2, 4
        assert_eq!(partition(2, 1, 0, today()).unwrap().len(), 3);
        assert_eq!(partition(10, 3, 2, today()).unwrap().len(), 3); // m = 2, 5, 8
        assert_eq!(partition(0, 1, 0, today()).unwrap().len(), 1);
    }

    #[test]
    fn test_offset_past_horizon_yields_no_windows() {
        assert!(partition(2, 1, 5, today()).unwrap().is_empty());
    }

    #[test]
    fn test_windows_are_ordered_and_nonempty() {
        for w in partition(6, 2, 1, today()).unwrap() {
            assert!(w.start < w.end, "window {} has start >= end", w.index);
        }
    }

    #[test]
    fn test_consecutive_windows_are_contiguous() {
        let windows = partition(4, 1, 0, today()).unwrap();
        for pair in windows.windows(2) {
            assert_eq!(pair[1].end, pair[0].start);
        }
    }

    #[test]
    fn test_most_recent_window_ends_today() {
        let windows = partition(3, 1, 0, today()).unwrap();
        assert_eq!(windows[0].index, 0);
        assert_eq!(windows[0].end, today());
        assert_eq!(windows[0].start, today() - Duration::days(30));
    }
}
