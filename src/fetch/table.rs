// src/fetch/table.rs

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use super::{Fetch, ListingPage};
use crate::{
    config::Config,
    error::{Error, Result},
    process::utils::normalize_ws,
};

/// Logical width of a table with a Ref column.
pub const WIDTH_WITH_REF: usize = 7;
/// Logical width of a table without one.
pub const WIDTH_WITHOUT_REF: usize = 6;

const MAX_SPAN: usize = 1000;

/// One table row as whitespace-normalized cell text, after span expansion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow(pub Vec<String>);

impl RawRow {
    pub fn new<S: Into<String>>(cells: impl IntoIterator<Item = S>) -> Self {
        Self(cells.into_iter().map(Into::into).collect())
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }

    /// Cell at `idx`, or `""` when the row is shorter than that.
    pub fn cell(&self, idx: usize) -> &str {
        self.0.get(idx).map(String::as_str).unwrap_or("")
    }

    pub fn joined(&self) -> String {
        self.0.join(" ")
    }
}

/// The data table of one listing page.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub page: ListingPage,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn has_ref(&self) -> bool {
        self.width() == WIDTH_WITH_REF
    }
}

struct Carry {
    text: String,
    rows_left: usize,
}

fn take_carry(carries: &mut [Option<Carry>], col: usize) -> Option<String> {
    let slot = carries.get_mut(col)?;
    let carry = slot.as_mut()?;
    let text = carry.text.clone();
    carry.rows_left -= 1;
    if carry.rows_left == 0 {
        *slot = None;
    }
    Some(text)
}

fn span_attr(cell: ElementRef, name: &str) -> usize {
    cell.value()
        .attr(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
        .min(MAX_SPAN)
}

fn cell_text(cell: ElementRef) -> String {
    normalize_ws(&cell.text().collect::<String>())
}

/// Lay the `<tr>` elements out on a grid: `colspan` repeats a cell to the right,
/// `rowspan` repeats it downward into the same column.
fn expand_rows<'a>(rows: impl Iterator<Item = ElementRef<'a>>) -> Vec<Vec<String>> {
    let mut carries: Vec<Option<Carry>> = Vec::new();
    let mut grid = Vec::new();

    for tr in rows {
        let tds: Vec<ElementRef> = tr
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|e| matches!(e.value().name(), "td" | "th"))
            .collect();
        // A row without cells of its own leaves pending rowspans for the next one.
        if tds.is_empty() {
            continue;
        }

        let mut cells = Vec::new();
        let mut col = 0;
        for td in tds {
            while let Some(text) = take_carry(&mut carries, col) {
                cells.push(text);
                col += 1;
            }
            let text = cell_text(td);
            let rowspan = span_attr(td, "rowspan");
            for _ in 0..span_attr(td, "colspan") {
                if rowspan > 1 {
                    if carries.len() <= col {
                        carries.resize_with(col + 1, || None);
                    }
                    carries[col] = Some(Carry {
                        text: text.clone(),
                        rows_left: rowspan - 1,
                    });
                }
                cells.push(text.clone());
                col += 1;
            }
        }
        while col < carries.len() {
            cells.push(take_carry(&mut carries, col).unwrap_or_default());
            col += 1;
        }

        grid.push(cells);
    }

    grid
}

/// Locate the first table matching `table_selector` and split it into header and rows.
pub fn parse_table(html: &str, page: &ListingPage, table_selector: &Selector) -> Result<RawTable> {
    let structure = |reason: String| Error::Structure {
        url: page.url.clone(),
        reason,
    };

    let doc = Html::parse_document(html);
    let table = doc
        .select(table_selector)
        .next()
        .ok_or_else(|| structure("no data table on page".into()))?;

    // Rows of nested tables belong to those tables.
    let rows = table.select(selector!("tr")).filter(|tr| {
        tr.ancestors()
            .find(|n| n.value().as_element().is_some_and(|e| e.name() == "table"))
            .is_some_and(|owner| owner == *table)
    });

    let mut grid = expand_rows(rows).into_iter();
    let headers = grid
        .next()
        .ok_or_else(|| structure("data table has no rows".into()))?;
    if headers.len() != WIDTH_WITH_REF && headers.len() != WIDTH_WITHOUT_REF {
        return Err(structure(format!(
            "expected {WIDTH_WITHOUT_REF} or {WIDTH_WITH_REF} columns, found {}: {headers:?}",
            headers.len()
        )));
    }

    let rows: Vec<RawRow> = grid.map(RawRow).collect();
    debug!(url = %page.url, width = headers.len(), rows = rows.len(), "parsed table");
    Ok(RawTable {
        page: page.clone(),
        headers,
        rows,
    })
}

#[instrument(level = "debug", skip(fetcher, config), fields(url = %page.url))]
pub fn fetch_table<F: Fetch>(fetcher: &F, page: &ListingPage, config: &Config) -> Result<RawTable> {
    let table_selector = Selector::parse(&config.table_selector).map_err(|e| {
        Error::Config(format!(
            "table_selector {:?} does not parse: {e:?}",
            config.table_selector
        ))
    })?;
    let html = fetcher.fetch(&page.url)?;
    parse_table(&html, page, &table_selector)
}
