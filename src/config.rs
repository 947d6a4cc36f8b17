use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::{
    CLICK_TIMEOUT, DEFAULT_CELL_SELECTOR, DEFAULT_DOWNLOAD_SELECTOR, DEFAULT_HEADER_SELECTOR,
    DEFAULT_LINK_ATTR, DEFAULT_ROW_SELECTOR, INDICATOR_WAIT, INITIAL_ROW_WAIT, NEXT_ROW_WAIT,
    POLL_ATTEMPTS, POLL_INTERVAL,
};

/// Everything a single scraping run needs.
#[derive(Debug, Clone)]
pub struct Config {
    pub url: Url,
    pub output: PathBuf,
    pub selectors: SelectorConfig,
    pub timing: Timing,
}

impl Config {
    pub fn new(url: Url, output: impl Into<PathBuf>) -> Self {
        Self {
            url,
            output: output.into(),
            selectors: SelectorConfig::default(),
            timing: Timing::default(),
        }
    }
}

/// CSS selectors describing the listing table. They are compiled once per run,
/// see [`crate::rows::Selectors`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorConfig {
    pub rows: String,
    pub row_header: String,
    pub cells: String,
    pub download: String,
    pub link_attr: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROW_SELECTOR.to_string(),
            row_header: DEFAULT_HEADER_SELECTOR.to_string(),
            cells: DEFAULT_CELL_SELECTOR.to_string(),
            download: DEFAULT_DOWNLOAD_SELECTOR.to_string(),
            link_attr: DEFAULT_LINK_ATTR.to_string(),
        }
    }
}

/// Bounded waits used while loading and paging through the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Wait for the first listing row after the initial load. Timing out is fatal.
    pub initial_rows: Duration,
    /// Wait for the "Showing" indicator after the initial load. Timing out is fatal.
    pub indicator: Duration,
    /// Wait for a row after a successful page advance. Timing out ends collection.
    pub next_rows: Duration,
    /// Bound on scrolling to and clicking the next control.
    pub click: Duration,
    /// Delay between two reads of the pagination state.
    pub poll_interval: Duration,
    /// How many times the pagination state is read after a click.
    pub poll_attempts: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            initial_rows: INITIAL_ROW_WAIT,
            indicator: INDICATOR_WAIT,
            next_rows: NEXT_ROW_WAIT,
            click: CLICK_TIMEOUT,
            poll_interval: POLL_INTERVAL,
            poll_attempts: POLL_ATTEMPTS,
        }
    }
}

impl Timing {
    /// Total time spent polling for a page change after a click.
    pub fn poll_budget(&self) -> Duration {
        self.poll_interval * self.poll_attempts
    }
}
