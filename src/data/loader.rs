//! CSV Data Loader Module
//! Reads the `year` / `population` table with Polars and parses it into records.

use crate::data::Record;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const YEAR_FIELD: &str = "year";
pub const POPULATION_FIELD: &str = "population";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    DataSource {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("Missing field `{0}`")]
    MissingField(&'static str),
    #[error("Row {row}: invalid {field} value {value:?}")]
    InvalidValue {
        row: usize,
        field: &'static str,
        value: String,
    },
    #[error("Load task did not complete: {0}")]
    Interrupted(String),
}

impl LoaderError {
    /// True for errors caused by the table contents rather than the resource.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            LoaderError::MissingField(_) | LoaderError::InvalidValue { .. }
        )
    }
}

/// A tabular resource holding the chart records.
#[derive(Debug, Clone)]
pub struct DataSource {
    path: PathBuf,
}

impl DataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole table.
    pub fn load(&self) -> Result<Vec<Record>, LoaderError> {
        debug!(path = %self.path.display(), "reading chart data");

        let source_err = |source| LoaderError::DataSource {
            path: self.path.clone(),
            source,
        };

        // Every column is read as a string so parsing stays under our control
        let path_str = self.path.to_string_lossy().to_string();
        let df = LazyCsvReader::new(&path_str)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(source_err)?;

        let years = Self::string_column(&df, YEAR_FIELD)?;
        let populations = Self::string_column(&df, POPULATION_FIELD)?;

        let records = years
            .iter()
            .zip(populations.iter())
            .enumerate()
            .map(|(row, (year, population))| Self::parse_row(row, year, population))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            path = %self.path.display(),
            records = records.len(),
            "chart data loaded"
        );
        Ok(records)
    }

    /// Run [`DataSource::load`] on the blocking pool. This is the only point
    /// where the chart pipeline suspends.
    pub async fn load_async(self) -> Result<Vec<Record>, LoaderError> {
        tokio::task::spawn_blocking(move || self.load())
            .await
            .map_err(|e| LoaderError::Interrupted(e.to_string()))?
    }

    fn string_column(df: &DataFrame, field: &'static str) -> Result<Vec<Option<String>>, LoaderError> {
        let column = df
            .column(field)
            .map_err(|_| LoaderError::MissingField(field))?;
        let series = column
            .as_materialized_series()
            .cast(&DataType::String)
            .map_err(|_| LoaderError::MissingField(field))?;
        let values = series
            .str()
            .map_err(|_| LoaderError::MissingField(field))?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect();
        Ok(values)
    }

    fn parse_row(
        row: usize,
        year: &Option<String>,
        population: &Option<String>,
    ) -> Result<Record, LoaderError> {
        let invalid = |field: &'static str, value: &Option<String>| LoaderError::InvalidValue {
            row,
            field,
            value: value.clone().unwrap_or_default(),
        };

        let year_num: i32 = year
            .as_deref()
            .map(str::trim)
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| invalid(YEAR_FIELD, year))?;

        let population_num: f64 = population
            .as_deref()
            .map(str::trim)
            .and_then(|s| s.parse().ok())
            .filter(|v: &f64| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| invalid(POPULATION_FIELD, population))?;

        Record::new(year_num, population_num).ok_or_else(|| invalid(YEAR_FIELD, year))
    }
}
