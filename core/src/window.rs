use chrono::{Duration, NaiveDate, Utc};

pub const WINDOW_DAYS: i64 = 30;

/// Calendar-date range queried for every term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeWindow {
    pub fn ending_on(end: NaiveDate) -> Self {
        Self { start: end - Duration::days(WINDOW_DAYS), end }
    }

    /// Window ending on the current UTC date.
    pub fn last_30_days() -> Self {
        Self::ending_on(Utc::now().date_naive())
    }

    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn spans_exactly_thirty_days() {
        let window = TimeWindow::ending_on(date(2024, 3, 28));
        assert_eq!(window.end - window.start, Duration::days(30));
        assert_eq!(window.start, date(2024, 2, 27));
    }

    #[test]
    fn crosses_year_and_leap_boundaries() {
        assert_eq!(TimeWindow::ending_on(date(2024, 1, 15)).start, date(2023, 12, 16));
        assert_eq!(TimeWindow::ending_on(date(2024, 3, 1)).start, date(2024, 1, 31));
        assert_eq!(TimeWindow::ending_on(date(2023, 3, 1)).start, date(2023, 1, 30));
    }

    #[test]
    fn params_are_zero_padded_dates() {
        let window = TimeWindow::ending_on(date(2024, 2, 5));
        assert_eq!(window.start_param(), "2024-01-06");
        assert_eq!(window.end_param(), "2024-02-05");
    }

    #[test]
    fn current_window_has_fixed_length() {
        let window = TimeWindow::last_30_days();
        assert_eq!(window.end - window.start, Duration::days(WINDOW_DAYS));
    }
}
