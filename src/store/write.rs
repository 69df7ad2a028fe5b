// src/store/write.rs

use chrono::Datelike;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::{error::Result, process::Dataset};

/// Output columns, in order.
pub const HEADERS: [&str; 8] = [
    "Top Ten Entry Date",
    "Single Name",
    "Artist(s)",
    "Peak",
    "Peak Date",
    "Weeks in Top Ten",
    "Ref",
    "Year",
];

/// `billboard_data_YYYY_MM.csv` for the month containing `today`.
pub fn default_filename<D: Datelike>(today: &D) -> String {
    format!(
        "billboard_data_{:04}_{:02}.csv",
        today.year(),
        today.month()
    )
}

/// Write the header and every entry as UTF-8 CSV. Empty fields stand for nulls.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(HEADERS)?;
    for entry in dataset.iter() {
        wtr.serialize(entry)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save `dataset` under `dir`, creating it if needed.
///
/// Returns the written path, or `None` without touching the filesystem when the
/// dataset is empty. Without an explicit `filename` the name comes from
/// [`default_filename`], so runs in the same month overwrite each other.
pub fn save_dataset<D: Datelike>(
    dataset: &Dataset,
    dir: &Path,
    filename: Option<&str>,
    today: &D,
) -> Result<Option<PathBuf>> {
    if dataset.is_empty() {
        debug!("empty dataset; nothing written");
        return Ok(None);
    }

    fs::create_dir_all(dir)?;
    let name = filename
        .map(str::to_owned)
        .unwrap_or_else(|| default_filename(today));
    let path = dir.join(name);

    let file = File::create(&path)?;
    write_csv(dataset, BufWriter::new(file))?;
    info!(path = %path.display(), rows = dataset.len(), "dataset written");
    Ok(Some(path))
}
