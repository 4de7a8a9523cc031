//! Concrete [`crate::domain::data_source::DataSource`] implementations.

pub mod csv_source;

pub use csv_source::CsvDataSource;
