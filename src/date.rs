use std::sync::LazyLock;

use regex::Regex;

/// Earliest accepted birth year.
pub const MIN_YEAR: i32 = 1900;

/// Latest accepted birth year.
pub const MAX_YEAR: i32 = 2100;

// Static variables that are initialised at runtime the first time they are accessed.

static RE_COMPACT_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<year>[0-9]{4})(?P<month>[0-9]{2})(?P<day>[0-9]{2})$")
        .expect("Failed to create regex pattern for yyyymmdd")
});

/// Calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Date {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl Date {
    /// Check that date is plausible: year within [`MIN_YEAR`, `MAX_YEAR`]
    /// and the day exists in the given month.
    #[must_use]
    pub fn try_from(year: i32, month: u32, day: u32) -> Option<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) || day == 0 {
            return None;
        }
        if day > days_in_month(year, month) {
            return None;
        }
        Some(Self { year, month, day })
    }

    /// Parse a compact `YYYYMMDD` date.
    ///
    /// ```rust
    /// use card_sort::date::Date;
    ///
    /// let date = Date::parse_compact("19900101").unwrap();
    /// assert_eq!(date.dash_format(), "1990-01-01");
    /// assert!(Date::parse_compact("19900230").is_none());
    /// ```
    #[must_use]
    pub fn parse_compact(value: &str) -> Option<Self> {
        let captures = RE_COMPACT_DATE.captures(value)?;
        let year = captures.name("year")?.as_str().parse::<i32>().ok()?;
        let month = captures.name("month")?.as_str().parse::<u32>().ok()?;
        let day = captures.name("day")?.as_str().parse::<u32>().ok()?;
        Self::try_from(year, month, day)
    }

    #[must_use]
    pub fn dash_format(&self) -> String {
        format!("{}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{:02}{:02}", self.year, self.month, self.day)
    }
}

/// Gregorian leap year rule.
#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in the given month, or 0 for an invalid month.
#[must_use]
pub const fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}
