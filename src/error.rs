// src/error.rs

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

pub type Result<T> = std::result::Result<T, Error>;

/// Why a required numeric cell could not become a count.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CoercionReason {
    #[error("has no digits")]
    NoDigits,
    #[error("holds a number too large for a count")]
    Overflow,
}

/// A required numeric cell that did not yield a count.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("column `{column}` {reason}: {raw:?}")]
pub struct CoercionError {
    pub column: &'static str,
    pub raw: String,
    pub reason: CoercionReason,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("GET {url} failed")]
    Network {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("building HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("GET {url} returned {status}")]
    HttpStatus { url: Url, status: StatusCode },

    #[error("unexpected page structure at {url}: {reason}")]
    Structure { url: Url, reason: String },

    #[error("row {row} of {url}")]
    FieldCoercion {
        url: Url,
        row: usize,
        #[source]
        source: CoercionError,
    },

    #[error("{count} row(s) precede the first year marker on {url}")]
    LeadingRows { url: Url, count: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("reading config {path:?}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    /// True for the fail-fast transport class (connection failures and non-2xx answers).
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network { .. } | Error::HttpStatus { .. })
    }
}
