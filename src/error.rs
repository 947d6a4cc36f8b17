use std::time::Duration;

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The selector you are trying to scrape with is invalid. Selector: {0}")]
    InvalidSelector(String),

    #[error("Timed out after {after:?} waiting for {what}")]
    LoadTimeout { what: &'static str, after: Duration },

    #[error("Control can't be followed, it has no usable href. Control: {0}")]
    NotNavigable(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Csv Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Url Error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[cfg(feature = "browser")]
    #[error("Browser Error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    #[cfg(feature = "browser")]
    #[error("Browser config Error: {0}")]
    BrowserConfig(String),
}
