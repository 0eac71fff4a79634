//! Record Module
//! One (year, population) data point of the chart input.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single chart data point.
///
/// `year` is stored as January 1st of the calendar year so the time axis can
/// interpolate on real dates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub year: NaiveDate,
    pub population: f64,
}

impl Record {
    /// Build a record from a calendar year. Returns `None` for years chrono
    /// cannot represent.
    pub fn new(year: i32, population: f64) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, 1, 1).map(|year| Self { year, population })
    }

    /// Calendar year of this record.
    pub fn calendar_year(&self) -> i32 {
        self.year.year()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_year() {
        let record = Record::new(1990, 5.5).unwrap();
        assert_eq!(record.calendar_year(), 1990);
        assert_eq!(record.year.month(), 1);
        assert_eq!(record.year.day(), 1);
    }

    #[test]
    fn test_record_out_of_range_year() {
        assert!(Record::new(i32::MAX, 1.0).is_none());
    }
}
