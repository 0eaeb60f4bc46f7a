//! Bucket width mini-language: `<integer><unit>`.
//!
//! Accepted units (case-insensitive except where noted):
//!
//! | unit   | spellings                                      |
//! |--------|------------------------------------------------|
//! | minute | `T`, `m`, `min`, `mins`, `minute`, `minutes`   |
//! | hour   | `h`, `hr`, `hour`, `hours`                     |
//! | day    | `d`, `day`, `days`                             |
//! | week   | `w`, `week`, `weeks`                           |
//!
//! Upper-case `M` is rejected because resampling syntax uses it for months.
//! An omitted magnitude means 1, so `"H"` is one hour.

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Week,
}

impl TimeUnit {
    fn micros(self) -> i64 {
        const MINUTE: i64 = 60 * 1_000_000;
        match self {
            TimeUnit::Minute => MINUTE,
            TimeUnit::Hour => 60 * MINUTE,
            TimeUnit::Day => 24 * 60 * MINUTE,
            TimeUnit::Week => 7 * 24 * 60 * MINUTE,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Minute => "min",
            TimeUnit::Hour => "h",
            TimeUnit::Day => "d",
            TimeUnit::Week => "w",
        }
    }

    fn parse(unit: &str) -> Option<Self> {
        if unit == "M" {
            return None;
        }
        match unit.to_ascii_lowercase().as_str() {
            "t" | "m" | "min" | "mins" | "minute" | "minutes" => Some(TimeUnit::Minute),
            "h" | "hr" | "hour" | "hours" => Some(TimeUnit::Hour),
            "d" | "day" | "days" => Some(TimeUnit::Day),
            "w" | "week" | "weeks" => Some(TimeUnit::Week),
            _ => None,
        }
    }
}

/// Width of an aggregation bucket.
///
/// ```
/// use timeshape_core::aggregate::BucketWidth;
///
/// let width: BucketWidth = "30min".parse().unwrap();
/// assert_eq!(width.duration().num_minutes(), 30);
/// assert_eq!(width.to_string(), "30min");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BucketWidth {
    magnitude: u32,
    unit: TimeUnit,
    micros: i64,
}

impl BucketWidth {
    pub fn new(magnitude: u32, unit: TimeUnit) -> Result<Self, ConfigError> {
        let micros = unit
            .micros()
            .checked_mul(magnitude as i64)
            .filter(|&us| us > 0)
            .ok_or_else(|| {
                ConfigError::MalformedBucketWidth(format!("{}{}", magnitude, unit.suffix()))
            })?;
        Ok(Self {
            magnitude,
            unit,
            micros,
        })
    }

    pub fn hours(n: u32) -> Result<Self, ConfigError> {
        Self::new(n, TimeUnit::Hour)
    }

    pub fn days(n: u32) -> Result<Self, ConfigError> {
        Self::new(n, TimeUnit::Day)
    }

    pub fn magnitude(&self) -> u32 {
        self.magnitude
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn duration(&self) -> TimeDelta {
        TimeDelta::microseconds(self.micros)
    }

    /// Width in microseconds (always > 0)
    pub fn as_micros(&self) -> i64 {
        self.micros
    }
}

impl Default for BucketWidth {
    fn default() -> Self {
        Self {
            magnitude: 1,
            unit: TimeUnit::Hour,
            micros: TimeUnit::Hour.micros(),
        }
    }
}

impl FromStr for BucketWidth {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ConfigError::MalformedBucketWidth(s.to_string());

        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (digits, unit) = trimmed.split_at(split);

        let magnitude = if digits.is_empty() {
            1
        } else {
            digits.parse::<u32>().map_err(|_| malformed())?
        };
        if magnitude == 0 {
            return Err(malformed());
        }
        let unit = TimeUnit::parse(unit.trim()).ok_or_else(malformed)?;

        Self::new(magnitude, unit).map_err(|_| malformed())
    }
}

impl TryFrom<String> for BucketWidth {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BucketWidth> for String {
    fn from(width: BucketWidth) -> Self {
        width.to_string()
    }
}

impl fmt::Display for BucketWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resampling_aliases() {
        assert_eq!("1H".parse::<BucketWidth>().unwrap(), BucketWidth::hours(1).unwrap());
        assert_eq!("15T".parse::<BucketWidth>().unwrap().duration().num_minutes(), 15);
        assert_eq!("2D".parse::<BucketWidth>().unwrap(), BucketWidth::days(2).unwrap());
        assert_eq!("1W".parse::<BucketWidth>().unwrap().duration().num_days(), 7);
    }

    #[test]
    fn test_parse_long_units_and_spacing() {
        let width: BucketWidth = " 3 hours ".parse().unwrap();
        assert_eq!(width.magnitude(), 3);
        assert_eq!(width.unit(), TimeUnit::Hour);
    }

    #[test]
    fn test_missing_magnitude_means_one() {
        assert_eq!("day".parse::<BucketWidth>().unwrap(), BucketWidth::days(1).unwrap());
    }

    #[test]
    fn test_rejects_bad_specifiers() {
        for bad in ["", "0h", "h2", "5M", "5 fortnights", "-1h", "1.5h", "99999999999h"] {
            assert_eq!(
                bad.parse::<BucketWidth>(),
                Err(ConfigError::MalformedBucketWidth(bad.to_string())),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!("1H".parse::<BucketWidth>().unwrap().to_string(), "1h");
        assert_eq!("2 weeks".parse::<BucketWidth>().unwrap().to_string(), "2w");
    }

    #[test]
    fn test_serde_uses_string_form() {
        let width: BucketWidth = serde_json::from_str("\"6h\"").unwrap();
        assert_eq!(width, BucketWidth::hours(6).unwrap());
        assert_eq!(serde_json::to_string(&width).unwrap(), "\"6h\"");
        assert!(serde_json::from_str::<BucketWidth>("\"6y\"").is_err());
    }
}
