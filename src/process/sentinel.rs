// src/process/sentinel.rs
//
// Some listing pages keep several years in one table, separated by
// "Singles from YYYY" rows. Those rows carry no song; they set the year of the
// rows that follow them.

use regex::Regex;
use tracing::{debug, warn};

use crate::{
    config::LeadingRows,
    error::{Error, Result},
    fetch::{table::WIDTH_WITH_REF, ListingPage, RawRow, RawTable},
};

/// A data row with the year it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearedRow {
    /// Position of the row in the table body, markers included.
    pub position: usize,
    pub year: i32,
    pub row: RawRow,
}

/// A table whose marker rows have been folded into per-row years.
#[derive(Debug, Clone)]
pub struct ResolvedTable {
    pub page: ListingPage,
    pub has_ref: bool,
    pub markers: usize,
    pub rows: Vec<YearedRow>,
}

fn marker_pattern() -> &'static Regex {
    regex!(r"Singles from (\d{4})")
}

fn capture_year(text: &str) -> Option<i32> {
    marker_pattern()
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// The year announced by a marker row, or `None` for a data row.
///
/// Each cell is tried on its own first, then the cells joined by spaces, so a
/// marker split across cells is still recognised.
pub fn marker_year(row: &RawRow) -> Option<i32> {
    row.cells()
        .iter()
        .find_map(|c| capture_year(c))
        .or_else(|| capture_year(&row.joined()))
}

/// Attach a year to every data row and drop the marker rows.
///
/// Without markers every row takes the page year. With markers each row takes
/// the year of the nearest marker above it; rows above the first marker follow
/// `leading`.
pub fn resolve_years(table: RawTable, leading: LeadingRows) -> Result<ResolvedTable> {
    let has_ref = table.width() == WIDTH_WITH_REF;
    let RawTable { page, rows, .. } = table;

    let years: Vec<Option<i32>> = rows.iter().map(marker_year).collect();
    let markers = years.iter().flatten().count();

    if let Some(first) = years.iter().position(Option::is_some) {
        if first > 0 {
            match leading {
                LeadingRows::Reject => {
                    return Err(Error::LeadingRows {
                        url: page.url,
                        count: first,
                    })
                }
                LeadingRows::PageYear => warn!(
                    url = %page.url,
                    count = first,
                    year = page.year,
                    "rows before first year marker take the page year"
                ),
            }
        }
    }

    let mut current = page.year;
    let mut resolved = Vec::with_capacity(rows.len() - markers);
    for (position, (row, marker)) in rows.into_iter().zip(years).enumerate() {
        match marker {
            Some(year) => {
                debug!(position, year, "year marker");
                current = year;
            }
            None => resolved.push(YearedRow {
                position,
                year: current,
                row,
            }),
        }
    }

    Ok(ResolvedTable {
        page,
        has_ref,
        markers,
        rows: resolved,
    })
}
