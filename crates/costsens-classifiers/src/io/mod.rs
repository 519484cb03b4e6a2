//! Reading labelled tables and writing run summaries.

pub mod csv_reader;
pub mod results;

pub use csv_reader::{read_csv, read_csv_with_config, CsvReaderConfig};
pub use results::write_results_tsv;
