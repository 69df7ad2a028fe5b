// src/fetch/urls.rs

use scraper::Html;
use std::collections::HashSet;
use tracing::{info, instrument, trace, warn};
use url::Url;

use super::Fetch;
use crate::{config::Config, error::Result};

/// A per-year listing page and the year encoded in the last four characters of its path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingPage {
    pub url: Url,
    pub year: i32,
}

impl ListingPage {
    /// `None` when the URL path does not end in four digits.
    pub fn from_url(url: Url) -> Option<Self> {
        let year = year_from_path(url.path())?;
        Some(Self { url, year })
    }
}

fn year_from_path(path: &str) -> Option<i32> {
    let path = path.trim_end_matches('/');
    let tail = path.get(path.len().checked_sub(4)?..)?;
    if tail.bytes().all(|b| b.is_ascii_digit()) {
        tail.parse().ok()
    } else {
        None
    }
}

/// Collect listing-page links from an index document.
///
/// Only hrefs starting with `prefix` are kept. They are resolved against `base`,
/// stripped of fragment and query, and deduplicated keeping the first occurrence.
pub fn parse_listing_links(html: &str, base: &Url, prefix: &str) -> Vec<ListingPage> {
    let doc = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut pages = Vec::new();

    for href in doc
        .select(selector!("a[href]"))
        .filter_map(|a| a.value().attr("href"))
    {
        if !href.starts_with(prefix) {
            continue;
        }
        let mut url = match base.join(href) {
            Ok(u) => u,
            Err(e) => {
                warn!(href, error = %e, "unresolvable listing link");
                continue;
            }
        };
        url.set_fragment(None);
        url.set_query(None);

        if !seen.insert(url.clone()) {
            continue;
        }
        match ListingPage::from_url(url.clone()) {
            Some(page) => {
                trace!(url = %page.url, year = page.year, "listing page");
                pages.push(page);
            }
            None => warn!(%url, "listing link has no trailing year; skipped"),
        }
    }

    pages
}

/// Fetch the index page and return its listing pages in document order.
#[instrument(level = "info", skip(fetcher, config), fields(index = %config.index_url))]
pub fn discover_listing_pages<F: Fetch>(fetcher: &F, config: &Config) -> Result<Vec<ListingPage>> {
    let html = fetcher.fetch(&config.index_url)?;
    let pages = parse_listing_links(&html, &config.index_url, &config.link_prefix);
    info!(count = pages.len(), "discovered listing pages");
    Ok(pages)
}
