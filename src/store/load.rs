// src/store/load.rs

use chrono::NaiveDate;
use serde::Deserialize;
use std::{collections::BTreeMap, path::Path};
use tracing::{debug, instrument};

use crate::{error::Result, process::date_parser::parse_iso_date};

/// Loose view of one CSV line: every field may be missing or malformed.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Top Ten Entry Date")]
    entry_date: Option<String>,
    #[serde(rename = "Single Name")]
    single_name: Option<String>,
    #[serde(rename = "Artist(s)")]
    artists: Option<String>,
    #[serde(rename = "Peak")]
    peak: Option<String>,
    #[serde(rename = "Peak Date")]
    peak_date: Option<String>,
    #[serde(rename = "Weeks in Top Ten")]
    weeks_in_top_ten: Option<String>,
    #[serde(rename = "Ref")]
    reference: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
}

/// A dataset row as handed to analysis code, with derived columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRecord {
    pub entry_date: Option<NaiveDate>,
    pub single_name: Option<String>,
    /// Never null on write, so an empty field reads back as `""`.
    pub artists: String,
    pub peak: Option<u32>,
    pub peak_date: Option<NaiveDate>,
    pub weeks_in_top_ten: Option<u32>,
    pub reference: Option<String>,
    pub year: Option<i32>,
    /// `year` floored to its decade, e.g. 1987 -> 1980.
    pub decade: Option<i32>,
    /// Days from entering the top ten to peaking.
    pub lag_to_peak: Option<i64>,
}

/// Integer coercion that accepts `"5"` and `"5.0"` and turns anything else into `None`.
fn coerce_int(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim();
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

impl From<CsvRow> for ChartRecord {
    fn from(row: CsvRow) -> Self {
        let entry_date = row.entry_date.as_deref().and_then(parse_iso_date);
        let peak_date = row.peak_date.as_deref().and_then(parse_iso_date);
        let year = coerce_int(row.year.as_deref()).and_then(|y| i32::try_from(y).ok());

        Self {
            entry_date,
            single_name: non_empty(row.single_name),
            artists: row.artists.unwrap_or_default(),
            peak: coerce_int(row.peak.as_deref()).and_then(|n| u32::try_from(n).ok()),
            peak_date,
            weeks_in_top_ten: coerce_int(row.weeks_in_top_ten.as_deref())
                .and_then(|n| u32::try_from(n).ok()),
            reference: non_empty(row.reference),
            year,
            decade: year.map(|y| y.div_euclid(10) * 10),
            lag_to_peak: entry_date
                .zip(peak_date)
                .map(|(entry, peak)| (peak - entry).num_days()),
        }
    }
}

/// Read a dataset CSV back with typed columns plus `decade` and `lag_to_peak`.
///
/// Field-level problems become `None`; only an unreadable file or broken CSV
/// framing is an error.
#[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<ChartRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path.as_ref())?;

    let records = rdr
        .deserialize::<CsvRow>()
        .map(|row| row.map(ChartRecord::from))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    debug!(rows = records.len(), "dataset loaded");
    Ok(records)
}

/// Headline numbers over a loaded dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSummary {
    pub rows: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub per_decade: BTreeMap<i32, usize>,
    pub number_ones: usize,
    pub mean_weeks: Option<f64>,
    pub mean_lag_to_peak: Option<f64>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

impl DatasetSummary {
    pub fn from_records(records: &[ChartRecord]) -> Self {
        let mut per_decade = BTreeMap::new();
        for decade in records.iter().filter_map(|r| r.decade) {
            *per_decade.entry(decade).or_insert(0) += 1;
        }

        Self {
            rows: records.len(),
            first_year: records.iter().filter_map(|r| r.year).min(),
            last_year: records.iter().filter_map(|r| r.year).max(),
            per_decade,
            number_ones: records.iter().filter(|r| r.peak == Some(1)).count(),
            mean_weeks: mean(
                records
                    .iter()
                    .filter_map(|r| r.weeks_in_top_ten)
                    .map(f64::from),
            ),
            mean_lag_to_peak: mean(records.iter().filter_map(|r| r.lag_to_peak).map(|d| d as f64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        process::{Dataset, NormalizedEntry},
        store::write::save_dataset,
    };
    use std::{collections::HashSet, fs};
    use tempfile::tempdir;

    fn d(y: i32, m: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, day)
    }

    fn entry(title: Option<&str>, peak: u32, weeks: u32, year: i32) -> NormalizedEntry {
        NormalizedEntry {
            entry_date: d(year, 2, 1),
            single_name: title.map(Into::into),
            artists: format!("Artist {peak}"),
            peak,
            peak_date: d(year, 2, 15),
            weeks_in_top_ten: weeks,
            reference: None,
            year,
        }
    }

    #[test]
    fn test_round_trip_preserves_tuples_and_dates() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let dataset = Dataset::new(vec![
            entry(Some("One"), 1, 10, 1987),
            entry(None, 4, 3, 1990),
            entry(Some("Three, with comma"), 9, 1, 2024),
            NormalizedEntry {
                artists: String::new(),
                ..entry(Some("Nobody credited"), 6, 2, 2001)
            },
        ]);
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let path = save_dataset(&dataset, tmp.path(), None, &today)?.expect("written");

        let loaded = load_dataset(&path)?;
        let key = |name: Option<String>, artists: String, peak, weeks, year| {
            (name, artists, peak, weeks, year)
        };
        let expected: HashSet<_> = dataset
            .iter()
            .map(|e| {
                key(
                    e.single_name.clone(),
                    e.artists.clone(),
                    Some(e.peak),
                    Some(e.weeks_in_top_ten),
                    Some(e.year),
                )
            })
            .collect();
        let got: HashSet<_> = loaded
            .iter()
            .map(|r| {
                key(
                    r.single_name.clone(),
                    r.artists.clone(),
                    r.peak,
                    r.weeks_in_top_ten,
                    r.year,
                )
            })
            .collect();
        assert_eq!(got, expected);
        assert_eq!(loaded[3].artists, "");

        for (orig, back) in dataset.iter().zip(&loaded) {
            assert_eq!(orig.entry_date, back.entry_date);
            assert_eq!(orig.peak_date, back.peak_date);
        }
        assert_eq!(loaded[0].decade, Some(1980));
        assert_eq!(loaded[0].lag_to_peak, Some(14));
        Ok(())
    }

    #[test]
    fn test_lenient_coercion() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("legacy.csv");
        fs::write(
            &path,
            "Top Ten Entry Date,Single Name,Artist(s),Peak,Peak Date,Weeks in Top Ten,Ref,Year\n\
             1958-08-04 00:00:00,Poor Little Fool,Ricky Nelson,1,1958-08-04 00:00:00,8,[2],1958\n\
             garbage,,Someone,x,,5.0,,\n",
        )?;

        let loaded = load_dataset(&path)?;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].entry_date, d(1958, 8, 4));
        assert_eq!(loaded[0].lag_to_peak, Some(0));
        assert_eq!(loaded[0].reference.as_deref(), Some("[2]"));
        assert_eq!(loaded[1].entry_date, None);
        assert_eq!(loaded[1].single_name, None);
        assert_eq!(loaded[1].peak, None);
        assert_eq!(loaded[1].weeks_in_top_ten, Some(5));
        assert_eq!(loaded[1].year, None);
        assert_eq!(loaded[1].decade, None);
        assert_eq!(loaded[1].lag_to_peak, None);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let tmp = tempdir().unwrap();
        assert!(load_dataset(tmp.path().join("nope.csv")).is_err());
    }

    #[test]
    fn test_summary() {
        let records: Vec<ChartRecord> = [
            entry(Some("a"), 1, 10, 1987),
            entry(Some("b"), 2, 4, 1989),
            entry(Some("c"), 1, 7, 1991),
        ]
        .into_iter()
        .map(|e| ChartRecord {
            entry_date: e.entry_date,
            single_name: e.single_name,
            artists: e.artists,
            peak: Some(e.peak),
            peak_date: e.peak_date,
            weeks_in_top_ten: Some(e.weeks_in_top_ten),
            reference: e.reference,
            year: Some(e.year),
            decade: Some(e.year.div_euclid(10) * 10),
            lag_to_peak: Some(14),
        })
        .collect();

        let s = DatasetSummary::from_records(&records);
        assert_eq!(s.rows, 3);
        assert_eq!(s.first_year, Some(1987));
        assert_eq!(s.last_year, Some(1991));
        assert_eq!(s.per_decade, BTreeMap::from([(1980, 2), (1990, 1)]));
        assert_eq!(s.number_ones, 2);
        assert_eq!(s.mean_weeks, Some(7.0));
        assert_eq!(s.mean_lag_to_peak, Some(14.0));
        assert_eq!(DatasetSummary::from_records(&[]), DatasetSummary::default());
    }
}
