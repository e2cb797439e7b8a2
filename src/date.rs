//! Julian-day based calendar date.
//!
//! Dates are stored as a serial day number so comparison and day
//! arithmetic are integer operations. A serial number of 0 is the
//! "invalid/unset" state, used pervasively for open-ended date ranges.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use chrono::Datelike;

/// Supported parse/format layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// yyyy-mm-dd (also the file format)
    Iso,
    /// yyyymmdd
    Compact,
    /// mm/dd/yyyy
    SlashMdy,
    /// mm-dd-yyyy
    DashMdy,
    /// yyyy/mm/dd
    SlashYmd,
    /// dd/mm/yyyy
    SlashDmy,
    /// dd-mm-yyyy
    DashDmy,
    /// "Month day, year"
    Verbose,
}

impl DateFormat {
    pub const ALL: [DateFormat; 7] = [
        DateFormat::Iso,
        DateFormat::Compact,
        DateFormat::SlashMdy,
        DateFormat::DashMdy,
        DateFormat::SlashYmd,
        DateFormat::SlashDmy,
        DateFormat::DashDmy,
    ];
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar date, or the invalid sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ArbDate {
    julian: i64,
}

// Gregorian <-> serial-day-number conversion.
fn ymd_to_sdn(year: i32, month: u32, day: u32) -> i64 {
    let a = (14 - month as i64) / 12;
    let y = year as i64 + 4800 - a;
    let m = month as i64 + 12 * a - 3;
    day as i64 + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045
}

fn sdn_to_ymd(sdn: i64) -> (i32, u32, u32) {
    let a = sdn + 32044;
    let b = (4 * a + 3) / 146097;
    let c = a - 146097 * b / 4;
    let d = (4 * c + 3) / 1461;
    let e = c - 1461 * d / 4;
    let m = (5 * e + 2) / 153;
    let day = (e - (153 * m + 2) / 5 + 1) as u32;
    let month = (m + 3 - 12 * (m / 10)) as u32;
    let year = (100 * b + d - 4800 + m / 10) as i32;
    (year, month, day)
}

impl ArbDate {
    /// The invalid/unset date.
    pub const fn invalid() -> Self {
        Self { julian: 0 }
    }

    /// Construct from year/month/day. Out-of-range components produce
    /// the invalid date rather than a nearby real one.
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Self::invalid();
        }
        let d = Self {
            julian: ymd_to_sdn(year, month, day),
        };
        // Reject things like Feb 30 that normalize to a different day.
        if d.ymd() == (year, month, day) {
            d
        } else {
            Self::invalid()
        }
    }

    pub fn today() -> Self {
        let now = chrono::Local::now().date_naive();
        Self::new(now.year(), now.month(), now.day())
    }

    pub fn is_valid(&self) -> bool {
        self.julian > 0
    }

    pub fn clear(&mut self) {
        self.julian = 0;
    }

    pub fn julian_day(&self) -> i64 {
        self.julian
    }

    fn ymd(&self) -> (i32, u32, u32) {
        sdn_to_ymd(self.julian)
    }

    pub fn year(&self) -> i32 {
        self.ymd().0
    }

    pub fn month(&self) -> u32 {
        self.ymd().1
    }

    pub fn day(&self) -> u32 {
        self.ymd().2
    }

    /// Day of week, 0 = Sunday.
    pub fn day_of_week(&self) -> u32 {
        ((self.julian + 1).rem_euclid(7)) as u32
    }

    pub fn day_of_year(&self) -> u32 {
        let (y, _, _) = self.ymd();
        (self.julian - ymd_to_sdn(y, 1, 1) + 1) as u32
    }

    /// True when this date falls inside [from, to]; an invalid bound is
    /// open on that side.
    pub fn is_between(&self, from: ArbDate, to: ArbDate) -> bool {
        if !self.is_valid() {
            return false;
        }
        if from.is_valid() && *self < from {
            return false;
        }
        if to.is_valid() && *self > to {
            return false;
        }
        true
    }

    pub fn format(&self, fmt: DateFormat) -> String {
        if !self.is_valid() {
            return String::new();
        }
        let (y, m, d) = self.ymd();
        match fmt {
            DateFormat::Iso => format!("{y:04}-{m:02}-{d:02}"),
            DateFormat::Compact => format!("{y:04}{m:02}{d:02}"),
            DateFormat::SlashMdy => format!("{m:02}/{d:02}/{y:04}"),
            DateFormat::DashMdy => format!("{m:02}-{d:02}-{y:04}"),
            DateFormat::SlashYmd => format!("{y:04}/{m:02}/{d:02}"),
            DateFormat::SlashDmy => format!("{d:02}/{m:02}/{y:04}"),
            DateFormat::DashDmy => format!("{d:02}-{m:02}-{y:04}"),
            DateFormat::Verbose => {
                format!("{} {}, {}", MONTH_NAMES[(m - 1) as usize], d, y)
            }
        }
    }

    /// ISO yyyy-mm-dd, the form stored in files.
    pub fn iso(&self) -> String {
        self.format(DateFormat::Iso)
    }

    /// Parse a date in the given layout. Returns the invalid date when
    /// the string does not match or names an impossible day.
    pub fn parse(s: &str, fmt: DateFormat) -> Self {
        let s = s.trim();
        let parts: Option<(i32, u32, u32)> = match fmt {
            DateFormat::Iso => split3(s, '-').map(|(a, b, c)| (a, b as u32, c as u32)),
            DateFormat::Compact => {
                if s.len() == 8 && s.chars().all(|c| c.is_ascii_digit()) {
                    let y = s[0..4].parse().ok();
                    let m = s[4..6].parse().ok();
                    let d = s[6..8].parse().ok();
                    match (y, m, d) {
                        (Some(y), Some(m), Some(d)) => Some((y, m, d)),
                        _ => None,
                    }
                } else {
                    None
                }
            }
            DateFormat::SlashMdy => split3(s, '/').map(|(m, d, y)| (y, m as u32, d as u32)),
            DateFormat::DashMdy => split3(s, '-').map(|(m, d, y)| (y, m as u32, d as u32)),
            DateFormat::SlashYmd => split3(s, '/').map(|(y, m, d)| (y, m as u32, d as u32)),
            DateFormat::SlashDmy => split3(s, '/').map(|(d, m, y)| (y, m as u32, d as u32)),
            DateFormat::DashDmy => split3(s, '-').map(|(d, m, y)| (y, m as u32, d as u32)),
            DateFormat::Verbose => return Self::invalid(),
        };
        match parts {
            Some((y, m, d)) => Self::new(y, m, d),
            None => Self::invalid(),
        }
    }

    /// Parse ISO, the file-format layout.
    pub fn parse_iso(s: &str) -> Self {
        Self::parse(s, DateFormat::Iso)
    }

    /// "[from-to]" display for validity ranges; empty when both are open.
    pub fn valid_date_string(from: ArbDate, to: ArbDate) -> String {
        if !from.is_valid() && !to.is_valid() {
            return String::new();
        }
        let fmt = |d: ArbDate| {
            if d.is_valid() {
                d.format(DateFormat::SlashMdy)
            } else {
                "*".to_string()
            }
        };
        format!("[{}-{}]", fmt(from), fmt(to))
    }
}

fn split3(s: &str, sep: char) -> Option<(i32, i32, i32)> {
    let mut it = s.split(sep);
    let a = it.next()?.trim().parse().ok()?;
    let b = it.next()?.trim().parse().ok()?;
    let c = it.next()?.trim().parse().ok()?;
    if it.next().is_some() {
        return None;
    }
    Some((a, b, c))
}

impl Add<i64> for ArbDate {
    type Output = ArbDate;
    fn add(self, days: i64) -> ArbDate {
        ArbDate {
            julian: self.julian + days,
        }
    }
}

impl AddAssign<i64> for ArbDate {
    fn add_assign(&mut self, days: i64) {
        self.julian += days;
    }
}

impl Sub<i64> for ArbDate {
    type Output = ArbDate;
    fn sub(self, days: i64) -> ArbDate {
        ArbDate {
            julian: self.julian - days,
        }
    }
}

impl SubAssign<i64> for ArbDate {
    fn sub_assign(&mut self, days: i64) {
        self.julian -= days;
    }
}

impl Sub for ArbDate {
    type Output = i64;
    fn sub(self, rhs: ArbDate) -> i64 {
        self.julian - rhs.julian
    }
}

impl fmt::Display for ArbDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iso())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_impossible_days() {
        assert!(!ArbDate::new(2023, 2, 30).is_valid());
        assert!(!ArbDate::new(2023, 13, 1).is_valid());
        assert!(ArbDate::new(2024, 2, 29).is_valid());
        assert!(!ArbDate::new(2023, 2, 29).is_valid());
    }

    #[test]
    fn arithmetic_crosses_month_and_year_bounds() {
        let d = ArbDate::new(2023, 12, 31);
        assert_eq!(d + 1, ArbDate::new(2024, 1, 1));
        assert_eq!(ArbDate::new(2024, 3, 1) - 1, ArbDate::new(2024, 2, 29));
        assert_eq!(ArbDate::new(2024, 1, 1) - ArbDate::new(2023, 1, 1), 365);
    }

    #[test]
    fn day_of_week_is_anchored() {
        // 2023-01-01 was a Sunday.
        assert_eq!(ArbDate::new(2023, 1, 1).day_of_week(), 0);
        assert_eq!(ArbDate::new(2023, 1, 2).day_of_week(), 1);
    }

    #[test]
    fn between_treats_invalid_bounds_as_open() {
        let d = ArbDate::new(2020, 6, 15);
        assert!(d.is_between(ArbDate::invalid(), ArbDate::invalid()));
        assert!(d.is_between(ArbDate::new(2020, 1, 1), ArbDate::invalid()));
        assert!(!d.is_between(ArbDate::new(2020, 7, 1), ArbDate::invalid()));
    }
}
