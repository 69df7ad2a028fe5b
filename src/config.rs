// src/config.rs

use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info};
use url::Url;

use crate::error::{Error, Result};

/// Environment variable naming an optional YAML config file.
pub const CONFIG_ENV: &str = "BILLBOARD_CONFIG";

pub const DEFAULT_INDEX_URL: &str =
    "https://en.wikipedia.org/wiki/Lists_of_Billboard_Hot_100_top-ten_singles";

/// Largest accepted politeness delay, in seconds.
pub const MAX_DELAY_SECS: f64 = 3600.0;

/// What to do with data rows that appear above the first "Singles from" marker
/// on a page that has markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadingRows {
    /// Give them the year taken from the page URL.
    #[default]
    PageYear,
    /// Abort the page.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            min_secs: 1.0,
            max_secs: 3.0,
        }
    }
}

impl DelayConfig {
    pub fn bounds(&self) -> Result<(Duration, Duration)> {
        let secs = |v: f64| {
            Duration::try_from_secs_f64(v)
                .map_err(|e| Error::Config(format!("delay of {v} seconds is not a duration: {e}")))
        };
        Ok((secs(self.min_secs)?, secs(self.max_secs)?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index_url: Url,
    pub user_agent: String,
    /// Href prefix identifying per-year listing pages on the index page.
    pub link_prefix: String,
    pub table_selector: String,
    pub output_dir: PathBuf,
    pub output_file: Option<String>,
    pub delay: DelayConfig,
    /// `None` leaves requests without a timeout.
    pub request_timeout_secs: Option<u64>,
    pub leading_rows: LeadingRows,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_url: Url::parse(DEFAULT_INDEX_URL).expect("default index url should parse"),
            user_agent: "Mozilla/5.0".into(),
            link_prefix: "/wiki/List_of_Billboard_Hot_100_top-ten_singles_in".into(),
            table_selector: "table.wikitable".into(),
            output_dir: PathBuf::from("data"),
            output_file: None,
            delay: DelayConfig::default(),
            request_timeout_secs: None,
            leading_rows: LeadingRows::default(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(text: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text).map_err(|source| Error::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load from the file named by `BILLBOARD_CONFIG`, or fall back to defaults.
    pub fn from_env() -> Result<Self> {
        match env::var_os(CONFIG_ENV) {
            Some(path) => {
                info!(path = ?path, "using config file");
                Self::from_yaml_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let DelayConfig { min_secs, max_secs } = self.delay;
        if !(min_secs.is_finite() && max_secs.is_finite()) || min_secs < 0.0 {
            return Err(Error::Config(format!(
                "delay bounds must be finite and non-negative, got {min_secs}..{max_secs}"
            )));
        }
        if max_secs > MAX_DELAY_SECS {
            return Err(Error::Config(format!(
                "delay.max_secs ({max_secs}) exceeds the {MAX_DELAY_SECS} second limit"
            )));
        }
        if min_secs > max_secs {
            return Err(Error::Config(format!(
                "delay.min_secs ({min_secs}) exceeds delay.max_secs ({max_secs})"
            )));
        }
        if Selector::parse(&self.table_selector).is_err() {
            return Err(Error::Config(format!(
                "table_selector {:?} is not a valid CSS selector",
                self.table_selector
            )));
        }
        if self.link_prefix.is_empty() {
            return Err(Error::Config("link_prefix must not be empty".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_the_wikipedia_source() {
        let c = Config::default();
        assert_eq!(c.index_url.as_str(), DEFAULT_INDEX_URL);
        assert_eq!(c.user_agent, "Mozilla/5.0");
        assert_eq!(c.output_dir, PathBuf::from("data"));
        assert_eq!(c.request_timeout(), None);
        assert_eq!(c.leading_rows, LeadingRows::PageYear);
        c.validate().unwrap();
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let c = Config::from_yaml_str(
            "index_url: http://localhost:8080/index\n\
             delay:\n  min_secs: 0.0\n  max_secs: 0.5\n\
             leading_rows: reject\n",
        )
        .unwrap();
        assert_eq!(c.index_url.as_str(), "http://localhost:8080/index");
        assert_eq!(c.delay.bounds().unwrap().1, Duration::from_millis(500));
        assert_eq!(c.leading_rows, LeadingRows::Reject);
        assert_eq!(c.table_selector, "table.wikitable");
    }

    #[test]
    fn test_inverted_delay_is_rejected() {
        let mut c = Config::default();
        c.delay = DelayConfig {
            min_secs: 3.0,
            max_secs: 1.0,
        };
        assert!(matches!(c.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_huge_delay_is_rejected() {
        let c = Config::from_yaml_str("delay:\n  min_secs: 1.0\n  max_secs: 1e300\n").unwrap();
        assert!(matches!(c.validate(), Err(Error::Config(_))));
        assert!(matches!(c.delay.bounds(), Err(Error::Config(_))));

        let c = Config::from_yaml_str("delay:\n  min_secs: 0.0\n  max_secs: 3600.0\n").unwrap();
        c.validate().unwrap();
        assert_eq!(c.delay.bounds().unwrap().1, Duration::from_secs(3600));
    }

    #[test]
    fn test_bad_selector_is_rejected() {
        let mut c = Config::default();
        c.table_selector = "table[".into();
        assert!(matches!(c.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_loads_from_file() -> anyhow::Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "output_dir: out\noutput_file: fixed.csv")?;
        let c = Config::from_yaml_file(tmp.path())?;
        assert_eq!(c.output_dir, PathBuf::from("out"));
        assert_eq!(c.output_file.as_deref(), Some("fixed.csv"));
        Ok(())
    }
}
