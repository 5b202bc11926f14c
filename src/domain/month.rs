use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::PlannerError;

/// Number of months offered for target planning, current month included.
pub const WINDOW_MONTHS: usize = 24;

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (0..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn add_months(&self, n: u32) -> Self {
        let index = self.year as i64 * 12 + (self.month as i64 - 1) + n as i64;
        Self {
            year: (index / 12) as i32,
            month: (index % 12) as u32 + 1,
        }
    }

    /// Month name and year, e.g. `March 2025`.
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| self.to_string())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PlannerError::ValidationError {
            message: format!("'{}' is not a month in YYYY-MM form", s),
        };

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        MonthKey::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = PlannerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

/// A selectable entry of the month picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOption {
    pub value: String,
    pub label: String,
}

/// The rolling enumeration of months a target may be planned for.
///
/// Positions are what the freeze rule counts in: "the next N months" after a
/// row means the next N entries of this window, never beyond its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    start: MonthKey,
}

impl MonthWindow {
    /// Latest start whose last month is still a four-digit year.
    const LATEST_START: MonthKey = MonthKey {
        year: 9999 - (WINDOW_MONTHS as i32 - 1) / 12,
        month: 12 - (WINDOW_MONTHS as u32 - 1) % 12,
    };

    /// Starts later than 9998-01 are pulled back so `last()` stays within 9999-12.
    pub fn starting_at(start: MonthKey) -> Self {
        Self {
            start: start.min(Self::LATEST_START),
        }
    }

    /// Window beginning at the current local month.
    pub fn current() -> Self {
        Self::starting_at(MonthKey::from_date(chrono::Local::now().date_naive()))
    }

    pub fn first(&self) -> MonthKey {
        self.start
    }

    pub fn last(&self) -> MonthKey {
        self.start.add_months(WINDOW_MONTHS as u32 - 1)
    }

    pub fn len(&self) -> usize {
        WINDOW_MONTHS
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, index: usize) -> Option<MonthKey> {
        (index < WINDOW_MONTHS).then(|| self.start.add_months(index as u32))
    }

    pub fn position(&self, month: &MonthKey) -> Option<usize> {
        if *month < self.start {
            return None;
        }
        let offset = (month.year - self.start.year) as i64 * 12
            + (month.month as i64 - self.start.month as i64);
        usize::try_from(offset).ok().filter(|o| *o < WINDOW_MONTHS)
    }

    pub fn contains(&self, month: &MonthKey) -> bool {
        self.position(month).is_some()
    }

    pub fn months(&self) -> impl Iterator<Item = MonthKey> + '_ {
        (0..WINDOW_MONTHS).filter_map(move |i| self.get(i))
    }

    pub fn options(&self) -> Vec<MonthOption> {
        self.months()
            .map(|m| MonthOption {
                value: m.to_string(),
                label: m.label(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let m = month("2025-03");
        assert_eq!(m.year(), 2025);
        assert_eq!(m.month(), 3);
        assert_eq!(m.to_string(), "2025-03");
        assert_eq!(m.label(), "March 2025");
    }

    #[test]
    fn test_parse_rejects_malformed_months() {
        for bad in ["", "2025", "2025-13", "2025-00", "25-01", "2025-1", "2025/01", "abcd-ef"] {
            assert!(bad.parse::<MonthKey>().is_err(), "{} should not parse", bad);
        }
    }

    #[test]
    fn test_add_months_crosses_year() {
        assert_eq!(month("2025-11").add_months(2), month("2026-01"));
        assert_eq!(month("2025-12").add_months(13), month("2027-01"));
        assert_eq!(month("2025-05").add_months(0), month("2025-05"));
    }

    #[test]
    fn test_window_bounds() {
        let window = MonthWindow::starting_at(month("2025-11"));
        assert_eq!(window.first(), month("2025-11"));
        assert_eq!(window.last(), month("2027-10"));
        assert_eq!(window.months().count(), 24);
        assert_eq!(window.position(&month("2025-11")), Some(0));
        assert_eq!(window.position(&month("2026-02")), Some(3));
        assert_eq!(window.position(&month("2025-10")), None);
        assert_eq!(window.position(&month("2027-11")), None);
        assert_eq!(window.get(24), None);
    }

    #[test]
    fn test_late_window_stays_parseable() {
        let window = MonthWindow::starting_at(month("9999-06"));
        assert_eq!(window.first(), month("9998-01"));
        assert_eq!(window.last(), month("9999-12"));
        for m in window.months() {
            assert_eq!(m.to_string().parse::<MonthKey>().unwrap(), m);
        }

        let window = MonthWindow::starting_at(month("9997-12"));
        assert_eq!(window.first(), month("9997-12"));
    }

    #[test]
    fn test_window_options() {
        let window = MonthWindow::starting_at(month("2025-01"));
        let options = window.options();
        assert_eq!(options.len(), 24);
        assert_eq!(options[0].value, "2025-01");
        assert_eq!(options[0].label, "January 2025");
        assert_eq!(options[23].value, "2026-12");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&month("2025-07")).unwrap();
        assert_eq!(json, "\"2025-07\"");
        let back: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, month("2025-07"));
        assert!(serde_json::from_str::<MonthKey>("\"July\"").is_err());
    }
}
