// src/process/mod.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{config::LeadingRows, error::Result, fetch::RawTable};

pub mod assemble;
pub mod date_parser;
pub mod normalize;
pub mod sentinel;
pub mod utils;

pub use assemble::{assemble, Dataset};
pub use normalize::{normalize_row, normalize_table};
pub use sentinel::{resolve_years, ResolvedTable, YearedRow};

/// One top-ten single as written to and read from the output CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEntry {
    #[serde(rename = "Top Ten Entry Date")]
    pub entry_date: Option<NaiveDate>,
    #[serde(rename = "Single Name")]
    pub single_name: Option<String>,
    #[serde(rename = "Artist(s)")]
    pub artists: String,
    #[serde(rename = "Peak")]
    pub peak: u32,
    #[serde(rename = "Peak Date")]
    pub peak_date: Option<NaiveDate>,
    #[serde(rename = "Weeks in Top Ten")]
    pub weeks_in_top_ten: u32,
    #[serde(rename = "Ref")]
    pub reference: Option<String>,
    #[serde(rename = "Year")]
    pub year: i32,
}

/// Resolve marker rows, then normalize: raw table in, typed entries out.
#[instrument(level = "info", skip(table, leading), fields(url = %table.page.url, year = table.page.year))]
pub fn process_table(table: RawTable, leading: LeadingRows) -> Result<Vec<NormalizedEntry>> {
    let raw_rows = table.rows.len();
    let resolved = resolve_years(table, leading)?;
    let markers = resolved.markers;
    let entries = normalize_table(resolved)?;
    info!(raw_rows, markers, entries = entries.len(), "page processed");
    Ok(entries)
}
