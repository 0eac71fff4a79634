//! Scale Module
//! Maps data domains (calendar dates, linear values) onto pixel ranges and
//! produces "nice" axis ticks.

use crate::data::Record;
use chrono::{Datelike, NaiveDate};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("No records to scale against")]
    EmptyDataset,
}

/// Pick a 1/2/5 x 10^k step that splits `range` into about `target_steps` parts.
pub fn nice_step(range: f64, target_steps: usize) -> f64 {
    let raw_step = range.abs() / target_steps.max(1) as f64;
    if raw_step == 0.0 || !raw_step.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;

    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice * magnitude
}

/// Affine map from a numeric domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a domain value to pixels. Values outside the domain are not clamped.
    /// A collapsed domain maps everything to the middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        d0 + (pixel - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Tick values inside the domain, on multiples of a nice step.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        if lo == hi {
            return vec![lo];
        }

        let step = nice_step(hi - lo, count);
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        // Multiplying the index avoids accumulated float drift
        (first..=last).map(|i| i as f64 * step).collect()
    }

    /// Step used by [`LinearScale::ticks`], for label formatting.
    pub fn tick_step(&self, count: usize) -> f64 {
        nice_step(self.domain.1 - self.domain.0, count)
    }
}

/// Map from calendar dates onto a pixel range, interpolating on day numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: (NaiveDate, NaiveDate),
    inner: LinearScale,
}

impl TimeScale {
    pub fn new(domain: (NaiveDate, NaiveDate), range: (f64, f64)) -> Self {
        let days = (day_number(domain.0), day_number(domain.1));
        Self {
            domain,
            inner: LinearScale::new(days, range),
        }
    }

    pub fn domain(&self) -> (NaiveDate, NaiveDate) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.inner.range()
    }

    pub fn map(&self, date: NaiveDate) -> f64 {
        self.inner.map(day_number(date))
    }

    pub fn invert(&self, pixel: f64) -> Option<NaiveDate> {
        let days = self.inner.invert(pixel).round();
        NaiveDate::from_num_days_from_ce_opt(days as i32)
    }

    /// January 1st of evenly spaced years within the domain (step of at least one year).
    pub fn ticks(&self, count: usize) -> Vec<NaiveDate> {
        let (start, end) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };

        let first_year = if start.ordinal() == 1 {
            start.year()
        } else {
            start.year() + 1
        };
        let last_year = end.year();
        if first_year > last_year {
            return Vec::new();
        }

        let step = nice_step((last_year - first_year) as f64, count).max(1.0) as i32;
        let aligned = first_year.div_euclid(step) * step;
        let aligned = if aligned < first_year {
            aligned + step
        } else {
            aligned
        };

        (aligned..=last_year)
            .step_by(step as usize)
            .filter_map(|year| NaiveDate::from_ymd_opt(year, 1, 1))
            .collect()
    }
}

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// The x (time) and y (population) scales of a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartScales {
    pub x: TimeScale,
    pub y: LinearScale,
}

impl ChartScales {
    /// x domain spans the record years and maps onto `[0, width]`. y domain is
    /// `[0, max population]` and maps onto `[height, 0]`.
    pub fn compute(records: &[Record], width: f64, height: f64) -> Result<Self, RenderError> {
        let first = records.first().ok_or(RenderError::EmptyDataset)?;

        let (min_year, max_year) = records.iter().fold((first.year, first.year), |(lo, hi), r| {
            (lo.min(r.year), hi.max(r.year))
        });
        let max_population = records
            .iter()
            .map(|r| r.population)
            .fold(0.0_f64, f64::max);

        Ok(Self {
            x: TimeScale::new((min_year, max_year), (0.0, width)),
            y: LinearScale::new((0.0, max_population), (height, 0.0)),
        })
    }

    /// Pixel position of a record.
    pub fn position(&self, record: &Record) -> (f64, f64) {
        (self.x.map(record.year), self.y.map(record.population))
    }
}

/// Format a linear tick value with thousands separators and just enough decimals for `step`.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 || step <= 0.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    let text = format!("{:.*}", decimals, value);
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
