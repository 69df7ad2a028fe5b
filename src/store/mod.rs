// src/store/mod.rs

pub mod load;
pub mod write;

pub use load::{load_dataset, ChartRecord, DatasetSummary};
pub use write::{default_filename, save_dataset, write_csv, HEADERS};
