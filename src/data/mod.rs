//! Data module - CSV loading into chart records

mod loader;
mod record;

pub use loader::{DataSource, LoaderError, POPULATION_FIELD, YEAR_FIELD};
pub use record::Record;
