// src/fetch/mod.rs

use reqwest::{blocking::Client, StatusCode};
use std::{cell::RefCell, collections::HashMap};
use tracing::{debug, trace};
use url::Url;

use crate::{
    config::Config,
    error::{Error, Result},
};

pub mod table;
pub mod urls;

pub use table::{fetch_table, parse_table, RawRow, RawTable};
pub use urls::{discover_listing_pages, parse_listing_links, ListingPage};

/// Anything that can turn a URL into an HTML document.
pub trait Fetch {
    fn fetch(&self, url: &Url) -> Result<String>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, url: &Url) -> Result<String> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP fetcher. No retries: the first failure is returned.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()
            .map_err(Error::HttpClient)?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<String> {
        debug!(%url, "GET");
        let resp = self
            .client
            .get(url.clone())
            .send()
            .map_err(|source| Error::Network {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.clone(),
                status,
            });
        }

        let body = resp.text().map_err(|source| Error::Network {
            url: url.clone(),
            source,
        })?;
        trace!(%url, bytes = body.len(), "body read");
        Ok(body)
    }
}

/// In-memory documents keyed by URL, for running the pipeline against fixtures.
/// Unknown URLs answer 404. Every request is remembered in order.
#[derive(Debug, Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, String>,
    requests: RefCell<Vec<Url>>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.borrow().clone()
    }
}

impl Fetch for FixtureFetcher {
    fn fetch(&self, url: &Url) -> Result<String> {
        self.requests.borrow_mut().push(url.clone());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| Error::HttpStatus {
                url: url.clone(),
                status: StatusCode::NOT_FOUND,
            })
    }
}
