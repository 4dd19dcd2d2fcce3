use anyhow::{bail, Context};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A calendar month, e.g. `2024-01`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a `YearMonth`. `month` is 1-based.
    pub fn new(year: i32, month: u32) -> crate::Result<Self> {
        if !(1..=12).contains(&month) {
            bail!("Month must be between 1 and 12, got {month}");
        }
        // Rejects years outside of what chrono can represent.
        NaiveDate::from_ymd_opt(year, month, 1)
            .with_context(|| format!("{year}-{month:02} is not a valid month"))?;
        let this = Self { year, month };
        // The month after must also exist for the month's end to be known.
        let next = this.next();
        NaiveDate::from_ymd_opt(next.year, next.month, 1)
            .with_context(|| format!("{this} is outside the supported range of dates"))?;
        Ok(this)
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month containing today's date in the local timezone.
    pub fn current() -> Self {
        Self::of(chrono::Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// The number of days in the month.
    pub fn days(&self) -> u32 {
        match self.month {
            4 | 6 | 9 | 11 => 30,
            2 if self.is_leap_year() => 29,
            2 => 28,
            _ => 31,
        }
    }

    fn is_leap_year(&self) -> bool {
        let y = self.year;
        (y % 4 == 0 && y % 100 != 0) || y % 400 == 0
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .with_context(|| format!("Expected a month like 2024-01, got '{s}'"))?;
        let year = year
            .parse::<i32>()
            .with_context(|| format!("Invalid year in '{s}'"))?;
        let month = month
            .parse::<u32>()
            .with_context(|| format!("Invalid month in '{s}'"))?;
        YearMonth::new(year, month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        YearMonth::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(s: &str) -> YearMonth {
        YearMonth::from_str(s).unwrap()
    }

    #[test]
    fn test_days() {
        assert_eq!(ym("2024-01").days(), 31);
        assert_eq!(ym("2024-02").days(), 29);
        assert_eq!(ym("2023-02").days(), 28);
        assert_eq!(ym("2024-04").days(), 30);
        assert_eq!(ym("2024-12").days(), 31);
    }

    #[test]
    fn test_century_leap_years() {
        assert_eq!(ym("1900-02").days(), 28);
        assert_eq!(ym("2000-02").days(), 29);
    }

    #[test]
    fn test_last_representable_month_is_rejected() {
        let last_year = NaiveDate::MAX.year();
        assert!(YearMonth::new(last_year, 12).is_err());
        assert!(YearMonth::from_str(&format!("{last_year}-12")).is_err());

        let month = YearMonth::new(last_year, 11).unwrap();
        assert_eq!(month.days(), 30);
        assert_eq!(month.next().days(), 31);
    }

    #[test]
    fn test_navigation_wraps_years() {
        assert_eq!(ym("2024-12").next(), ym("2025-01"));
        assert_eq!(ym("2025-01").prev(), ym("2024-12"));
        assert_eq!(ym("2024-06").next().prev(), ym("2024-06"));
    }

    #[test]
    fn test_contains() {
        let jan = ym("2024-01");
        assert!(jan.contains(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
        assert!(!jan.contains(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
        assert!(!jan.contains(NaiveDate::from_ymd_opt(2023, 1, 15).unwrap()));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(ym("2024-3").to_string(), "2024-03");
        assert!(YearMonth::from_str("2024-13").is_err());
        assert!(YearMonth::from_str("2024").is_err());
        assert!(YearMonth::from_str("abcd-01").is_err());
    }
}
