// src/process/normalize.rs

use tracing::{debug, instrument};

use super::{
    date_parser::parse_chart_date,
    sentinel::{ResolvedTable, YearedRow},
    utils::{first_digits, is_blank, normalize_ws},
    NormalizedEntry,
};
use crate::error::{CoercionError, CoercionReason, Error, Result};

pub const ENTRY_DATE: usize = 0;
pub const SINGLE: usize = 1;
pub const ARTISTS: usize = 2;
pub const PEAK: usize = 3;
pub const PEAK_DATE: usize = 4;
pub const WEEKS: usize = 5;
pub const REF: usize = 6;

const QUOTES: &[char] = &['"', '\u{201C}', '\u{201D}'];

/// The title between the first and second quote character.
///
/// Straight and typographic double quotes both count. Fewer than two quotes, or
/// nothing but whitespace between them, gives `None`.
pub fn extract_single_name(raw: &str) -> Option<String> {
    let mut parts = raw.split(QUOTES);
    parts.next()?;
    let title = parts.next()?;
    parts.next()?;
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// First run of digits in a required numeric cell.
pub fn extract_count(raw: &str, column: &'static str) -> std::result::Result<u32, CoercionError> {
    let fail = |reason| CoercionError {
        column,
        raw: raw.to_string(),
        reason,
    };
    let digits = first_digits(raw).ok_or_else(|| fail(CoercionReason::NoDigits))?;
    digits.parse().map_err(|_| fail(CoercionReason::Overflow))
}

/// Turn one year-tagged row into a typed entry.
///
/// Dates and the title degrade to `None`; Peak and Weeks in Top Ten are required.
pub fn normalize_row(
    row: &YearedRow,
    page_year: i32,
    has_ref: bool,
) -> std::result::Result<NormalizedEntry, CoercionError> {
    let cells = &row.row;
    let peak = extract_count(cells.cell(PEAK), "Peak")?;
    let weeks_in_top_ten = extract_count(cells.cell(WEEKS), "Weeks in Top Ten")?;

    let reference = if has_ref && !is_blank(cells.cell(REF)) {
        Some(cells.cell(REF).to_string())
    } else {
        None
    };

    Ok(NormalizedEntry {
        entry_date: parse_chart_date(cells.cell(ENTRY_DATE), row.year),
        single_name: extract_single_name(cells.cell(SINGLE)),
        artists: normalize_ws(cells.cell(ARTISTS)),
        peak,
        peak_date: parse_chart_date(cells.cell(PEAK_DATE), page_year),
        weeks_in_top_ten,
        reference,
        year: row.year,
    })
}

/// Normalize every row of a page. The first row whose Peak or Weeks cell does
/// not yield a count aborts the whole page.
#[instrument(level = "debug", skip(table), fields(url = %table.page.url))]
pub fn normalize_table(table: ResolvedTable) -> Result<Vec<NormalizedEntry>> {
    let ResolvedTable {
        page, has_ref, rows, ..
    } = table;

    let entries = rows
        .iter()
        .map(|row| {
            normalize_row(row, page.year, has_ref).map_err(|source| Error::FieldCoercion {
                url: page.url.clone(),
                row: row.position,
                source,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(entries = entries.len(), "normalized");
    Ok(entries)
}
