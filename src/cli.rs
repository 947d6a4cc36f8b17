//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::{
    Config, SelectorConfig, Timing, DEFAULT_CELL_SELECTOR, DEFAULT_DOWNLOAD_SELECTOR,
    DEFAULT_HEADER_SELECTOR, DEFAULT_LINK_ATTR, DEFAULT_OUTPUT, DEFAULT_ROW_SELECTOR, DEFAULT_URL,
};

/// Scrape a paginated document listing into a CSV file.
#[derive(Parser, Debug)]
#[command(name = "doclist")]
#[command(author, version, about)]
pub struct Args {
    /// Listing page to start from
    #[arg(short, long, default_value = DEFAULT_URL)]
    pub url: Url,

    /// CSV file to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Selector for the rows of the listing table
    #[arg(long, default_value = DEFAULT_ROW_SELECTOR)]
    pub row_selector: String,

    /// Selector for the cell holding a row's name
    #[arg(long, default_value = DEFAULT_HEADER_SELECTOR)]
    pub header_selector: String,

    /// Selector for a row's data cells (type, then upload date)
    #[arg(long, default_value = DEFAULT_CELL_SELECTOR)]
    pub cell_selector: String,

    /// Selector for a row's download control
    #[arg(long, default_value = DEFAULT_DOWNLOAD_SELECTOR)]
    pub download_selector: String,

    /// Attribute of the download control holding the link
    #[arg(long, default_value = DEFAULT_LINK_ATTR)]
    pub link_attr: String,

    /// Seconds to wait for the first page to show its rows and counter
    #[arg(long, default_value_t = 60)]
    pub load_timeout_secs: u64,

    /// Seconds to wait for rows after moving to the next page
    #[arg(long, default_value_t = 30)]
    pub row_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Render the listing in headless Chromium instead of fetching it over HTTP
    #[cfg(feature = "browser")]
    #[arg(long)]
    pub browser: bool,

    /// Show the browser window (with --browser)
    #[cfg(feature = "browser")]
    #[arg(long, requires = "browser")]
    pub headed: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn config(&self) -> Config {
        let load = Duration::from_secs(self.load_timeout_secs);
        Config {
            url: self.url.clone(),
            output: self.output.clone(),
            selectors: SelectorConfig {
                rows: self.row_selector.clone(),
                row_header: self.header_selector.clone(),
                cells: self.cell_selector.clone(),
                download: self.download_selector.clone(),
                link_attr: self.link_attr.clone(),
            },
            timing: Timing {
                initial_rows: load,
                indicator: load,
                next_rows: Duration::from_secs(self.row_timeout_secs),
                ..Timing::default()
            },
        }
    }

    /// Log level used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
