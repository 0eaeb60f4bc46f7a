//! Day-of-week × hour-of-day counts for heatmaps.

use std::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::distribution::{DAYS_PER_WEEK, HOURS_PER_DAY};

pub const DAY_NAMES: [&str; DAYS_PER_WEEK] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Event counts with Monday as row 0 and midnight as column 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHourGrid {
    counts: [[u64; HOURS_PER_DAY]; DAYS_PER_WEEK],
}

impl DayHourGrid {
    pub fn from_timestamps<I>(timestamps: I) -> Self
    where
        I: IntoIterator<Item = NaiveDateTime>,
    {
        let mut grid = Self::default();
        for t in timestamps {
            let day = t.weekday().num_days_from_monday() as usize;
            grid.counts[day][t.hour() as usize] += 1;
        }
        grid
    }

    /// Count for one cell, 0 when out of range
    pub fn count(&self, day: usize, hour: usize) -> u64 {
        self.counts
            .get(day)
            .and_then(|row| row.get(hour))
            .copied()
            .unwrap_or(0)
    }

    pub fn rows(&self) -> &[[u64; HOURS_PER_DAY]; DAYS_PER_WEEK] {
        &self.counts
    }

    pub fn row_totals(&self) -> [u64; DAYS_PER_WEEK] {
        self.counts.map(|row| row.iter().sum::<u64>())
    }

    pub fn column_totals(&self) -> [u64; HOURS_PER_DAY] {
        let mut totals = [0; HOURS_PER_DAY];
        for row in &self.counts {
            for (total, count) in totals.iter_mut().zip(row) {
                *total += count;
            }
        }
        totals
    }

    pub fn total(&self) -> u64 {
        self.row_totals().iter().sum()
    }

    /// First (day, hour) cell holding the maximum, scanning row-major.
    /// `None` for an empty grid.
    pub fn busiest(&self) -> Option<(usize, usize)> {
        let mut best: Option<((usize, usize), u64)> = None;
        for (day, row) in self.counts.iter().enumerate() {
            for (hour, &count) in row.iter().enumerate() {
                if count > 0 && best.map_or(true, |(_, c)| count > c) {
                    best = Some(((day, hour), count));
                }
            }
        }
        best.map(|(cell, _)| cell)
    }

    pub fn day_name(day: usize) -> Option<&'static str> {
        DAY_NAMES.get(day).copied()
    }
}

impl fmt::Display for DayHourGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .counts
            .iter()
            .flatten()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1)
            .max(2);

        write!(f, "{:<10}", "")?;
        for hour in 0..HOURS_PER_DAY {
            write!(f, " {:>width$}", format!("{:02}", hour), width = width)?;
        }
        writeln!(f)?;

        for (name, row) in DAY_NAMES.iter().zip(&self.counts) {
            write!(f, "{:<10}", name)?;
            for count in row {
                write!(f, " {:>width$}", count, width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        // 2023-01-02 is a Monday
        NaiveDate::from_ymd_opt(2023, 1, day)
            .unwrap()
            .and_hms_opt(hour, 15, 0)
            .unwrap()
    }

    #[test]
    fn test_cells_counted() {
        let grid = DayHourGrid::from_timestamps(vec![at(2, 9), at(2, 9), at(4, 15), at(8, 23)]);
        assert_eq!(grid.count(0, 9), 2);
        assert_eq!(grid.count(2, 15), 1);
        assert_eq!(grid.count(6, 23), 1);
        assert_eq!(grid.count(7, 0), 0);
        assert_eq!(grid.total(), 4);
    }

    #[test]
    fn test_totals() {
        let grid = DayHourGrid::from_timestamps(vec![at(2, 9), at(3, 9), at(3, 10)]);
        assert_eq!(grid.row_totals()[0], 1);
        assert_eq!(grid.row_totals()[1], 2);
        assert_eq!(grid.column_totals()[9], 2);
        assert_eq!(grid.column_totals()[10], 1);
    }

    #[test]
    fn test_busiest() {
        assert_eq!(DayHourGrid::default().busiest(), None);
        let grid = DayHourGrid::from_timestamps(vec![at(3, 10), at(4, 14), at(4, 14)]);
        assert_eq!(grid.busiest(), Some((2, 14)));
    }

    #[test]
    fn test_display_has_header_and_seven_rows() {
        let text = DayHourGrid::default().to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines[1].starts_with("Monday"));
        assert!(lines[7].starts_with("Sunday"));
    }
}
