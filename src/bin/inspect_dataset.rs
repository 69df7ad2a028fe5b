//! inspect_dataset.rs
//!
//! Load a scraped CSV through the consumer interface and log a short summary.
//!
//!     cargo run --bin inspect_dataset -- data/billboard_data_2026_10.csv

use anyhow::{Context, Result};
use billboard_topten::store::{load_dataset, DatasetSummary};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();

    let path = env::args()
        .nth(1)
        .context("usage: inspect_dataset <dataset.csv>")?;
    let records = load_dataset(&path).with_context(|| format!("loading {path}"))?;
    let summary = DatasetSummary::from_records(&records);

    info!(rows = summary.rows, "loaded {}", path);
    match (summary.first_year, summary.last_year) {
        (Some(first), Some(last)) => info!("years {first}–{last}"),
        _ => warn!("no usable Year values"),
    }
    for (decade, count) in &summary.per_decade {
        info!("{decade}s: {count} entries");
    }
    info!(number_ones = summary.number_ones, "peaked at #1");
    if let Some(w) = summary.mean_weeks {
        info!("mean weeks in top ten: {w:.2}");
    }
    if let Some(lag) = summary.mean_lag_to_peak {
        info!("mean lag to peak: {lag:.1} days");
    }

    let undated = records.iter().filter(|r| r.entry_date.is_none()).count();
    if undated > 0 {
        warn!(undated, "rows without a parsable entry date");
    }
    Ok(())
}
