// src/pipeline.rs

use tracing::{info, instrument};

use crate::{
    config::Config,
    error::Result,
    fetch::{discover_listing_pages, fetch_table, Fetch, HttpFetcher},
    process::{assemble, process_table, Dataset},
    throttle::Throttle,
};

/// Discover → per page {fetch table → resolve years → normalize} → assemble.
///
/// Pages are handled one at a time in discovery order, with a throttle pause
/// between consecutive pages. The first error of any page ends the run.
pub struct Pipeline<F: Fetch> {
    config: Config,
    fetcher: F,
    throttle: Throttle,
}

impl<F: Fetch> Pipeline<F> {
    pub fn new(config: Config, fetcher: F, throttle: Throttle) -> Self {
        Self {
            config,
            fetcher,
            throttle,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    #[instrument(level = "info", skip(self), fields(index = %self.config.index_url))]
    pub fn run(&mut self) -> Result<Dataset> {
        let pages = discover_listing_pages(&self.fetcher, &self.config)?;
        let total = pages.len();

        let mut per_page = Vec::with_capacity(total);
        for (i, page) in pages.iter().enumerate() {
            if i > 0 {
                self.throttle.pause();
            }
            info!(url = %page.url, year = page.year, "scraping page {}/{}", i + 1, total);
            let table = fetch_table(&self.fetcher, page, &self.config)?;
            per_page.push(process_table(table, self.config.leading_rows)?);
        }

        let dataset = assemble(per_page);
        info!(pages = total, entries = dataset.len(), "scrape finished");
        Ok(dataset)
    }
}

/// Run against the live site described by `config`.
pub fn scrape(config: &Config) -> Result<Dataset> {
    config.validate()?;
    let fetcher = HttpFetcher::new(config)?;
    let throttle = Throttle::from_config(&config.delay)?;
    Pipeline::new(config.clone(), fetcher, throttle).run()
}
