//! DOCUMENT LISTING SCRAPER
//! Walks a paginated download listing page by page and collects every unique row.

use std::time::Duration;

mod error;
mod macros;

#[cfg(feature = "browser")]
pub mod browser;
pub mod cli;
pub mod config;
pub mod pager;
pub mod parse;
pub mod process;
pub mod request;
pub mod rows;
pub mod view;

pub use config::{Config, SelectorConfig, Timing};
pub use error::{Error, Result};
pub use pager::{advance, next_page, Advance, Stop};
pub use parse::{clean, PaginationState};
pub use process::{collect, run, scrape, write_csv, Harvest};
pub use request::Fetch;
pub use rows::{Record, Selectors};
pub use view::{Control, HttpView, PageView};

const DEFAULT_URL: &str = "https://public.cyber.mil/stigs/downloads/";
const DEFAULT_OUTPUT: &str = "stigs_downloads.csv";

const DEFAULT_ROW_SELECTOR: &str = "table tbody tr";
const DEFAULT_HEADER_SELECTOR: &str = r#"th[scope="row"]"#;
const DEFAULT_CELL_SELECTOR: &str = "td";
const DEFAULT_DOWNLOAD_SELECTOR: &str = "button.downloadButton, button[data-link], a[data-link]";
const DEFAULT_LINK_ATTR: &str = "data-link";

const CSV_HEADER: [&str; 4] = ["Name", "Download Type", "Upload Date", "Link"];

const INITIAL_ROW_WAIT: Duration = Duration::from_secs(60);
const INDICATOR_WAIT: Duration = Duration::from_secs(60);
const NEXT_ROW_WAIT: Duration = Duration::from_secs(30);
const CLICK_TIMEOUT: Duration = Duration::from_secs(5);
/// 240 * 250ms = 60s
const POLL_INTERVAL: Duration = Duration::from_millis(250);
const POLL_ATTEMPTS: u32 = 240;
