//! Scalar types shared across the record book: document versions,
//! qualifying results, tri-state attribute lookup, and double formatting.

use std::fmt;
use std::str::FromStr;

/// Dotted document version ("major.minor"), totally ordered.
///
/// Gates every schema-migration branch in the entity loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ArbVersion {
    major: u16,
    minor: u16,
}

impl ArbVersion {
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    pub fn major(&self) -> u16 {
        self.major
    }

    pub fn minor(&self) -> u16 {
        self.minor
    }
}

impl fmt::Display for ArbVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ArbVersion {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = match s.split_once('.') {
            Some((maj, min)) => (maj, min),
            None => (s, "0"),
        };
        let major = major.trim().parse::<u16>().map_err(|_| ())?;
        let minor = minor.trim().parse::<u16>().map_err(|_| ())?;
        Ok(Self { major, minor })
    }
}

/// Result of a typed attribute lookup.
///
/// `Invalid` means the attribute existed but did not parse as the
/// requested type. Callers treat that as a hard error, while `NotFound`
/// is usually "optional, keep the default".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    Invalid,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Lookup::Invalid)
    }

    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            _ => None,
        }
    }

    /// Assign into `dest` when found, leaving it untouched otherwise.
    /// Mirrors the common "optional attribute, keep default" load pattern.
    pub fn assign(self, dest: &mut T) -> bool {
        match self {
            Lookup::Found(v) => {
                *dest = v;
                true
            }
            _ => false,
        }
    }
}

/// Qualifying result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Q {
    /// Unknown/not entered.
    #[default]
    Unk,
    /// Not applicable (the event's scoring has no titling points).
    Na,
    /// Did not run.
    Dnr,
    /// Eliminated.
    Elim,
    /// Not qualified.
    Nq,
    /// Qualified.
    Q,
    /// Super Q (USDAA Snooker placement qualification).
    SuperQ,
}

impl Q {
    /// All file strings, in load precedence order.
    const STRINGS: [(Q, &'static str); 7] = [
        (Q::SuperQ, "SQ"),
        (Q::Q, "Q"),
        (Q::Nq, "NQ"),
        (Q::Elim, "E"),
        (Q::Dnr, "DNR"),
        (Q::Na, "NA"),
        (Q::Unk, ""),
    ];

    pub fn qualified(&self) -> bool {
        matches!(self, Q::Q | Q::SuperQ)
    }

    /// True for Q kinds that are allowed on runs whose scoring method
    /// awards no titling points.
    pub fn allow_for_non_titling(&self) -> bool {
        matches!(self, Q::Unk | Q::Na | Q::Dnr | Q::Elim)
    }

    pub fn as_str(&self) -> &'static str {
        Self::STRINGS
            .iter()
            .find(|(q, _)| q == self)
            .map(|(_, s)| *s)
            .unwrap_or("")
    }

    pub fn parse(s: &str) -> Option<Q> {
        Self::STRINGS.iter().find(|(_, v)| *v == s).map(|(q, _)| *q)
    }
}

impl fmt::Display for Q {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Double formatting/comparison helpers matching the record book's
/// file format: fixed precision with trailing zeros trimmed.
pub mod arb_double {
    /// Format with `precision` decimals, trimming trailing zeros.
    /// `precision` 0 formats with no decimal point at all.
    pub fn to_string(value: f64, precision: usize) -> String {
        if precision == 0 {
            return format!("{}", value.round() as i64);
        }
        let s = format!("{value:.precision$}");
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Equality within 2-decimal display tolerance.
    pub fn equal(a: f64, b: f64) -> bool {
        equal_prec(a, b, 2)
    }

    pub fn equal_prec(a: f64, b: f64, precision: u32) -> bool {
        let tolerance = 0.5 / 10f64.powi(precision as i32);
        (a - b).abs() < tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_parses_with_and_without_minor() {
        assert_eq!("15.3".parse::<ArbVersion>().unwrap(), ArbVersion::new(15, 3));
        assert_eq!("12".parse::<ArbVersion>().unwrap(), ArbVersion::new(12, 0));
        assert!("twelve".parse::<ArbVersion>().is_err());
    }

    #[test]
    fn version_orders_major_then_minor() {
        assert!(ArbVersion::new(2, 0) > ArbVersion::new(1, 9));
        assert!(ArbVersion::new(8, 6) > ArbVersion::new(8, 5));
    }

    #[test]
    fn q_round_trips_file_strings() {
        for q in [Q::Unk, Q::Na, Q::Dnr, Q::Elim, Q::Nq, Q::Q, Q::SuperQ] {
            assert_eq!(Q::parse(q.as_str()), Some(q));
        }
        assert_eq!(Q::parse("bogus"), None);
    }

    #[test]
    fn double_formatting_trims_trailing_zeros() {
        assert_eq!(arb_double::to_string(25.50, 2), "25.5");
        assert_eq!(arb_double::to_string(25.0, 2), "25");
        assert_eq!(arb_double::to_string(5.0, 0), "5");
        assert_eq!(arb_double::to_string(0.0, 3), "0");
    }

    #[test]
    fn double_equality_uses_display_tolerance() {
        assert!(arb_double::equal(1.0, 1.001));
        assert!(!arb_double::equal(1.0, 1.01));
    }
}
