use scraper::{html::Select, ElementRef, Html, Selector};
use tracing::debug;

use crate::parse::{clean, create_selector, element_text};
use crate::{Result, SelectorConfig};

/// One downloadable document of the listing.
/// Two records are the same document only if all four fields match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub name: String,
    pub download_type: String,
    pub upload_date: String,
    pub link: String,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        download_type: impl Into<String>,
        upload_date: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            download_type: download_type.into(),
            upload_date: upload_date.into(),
            link: link.into(),
        }
    }

    pub fn fields(&self) -> [&str; 4] {
        [&self.name, &self.download_type, &self.upload_date, &self.link]
    }
}

/// Compiled selectors for the listing table.
#[derive(Debug, Clone)]
pub struct Selectors {
    pub rows: Selector,
    pub row_header: Selector,
    pub cells: Selector,
    pub download: Selector,
    pub link_attr: String,
}

impl Selectors {
    pub fn new(config: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            rows: create_selector(&config.rows)?,
            row_header: create_selector(&config.row_header)?,
            cells: create_selector(&config.cells)?,
            download: create_selector(&config.download)?,
            link_attr: config.link_attr.clone(),
        })
    }

    /// Returns `true` if the document has at least one listing row.
    pub fn has_rows(&self, doc: &Html) -> bool {
        doc.select(&self.rows).next().is_some()
    }

    /// Iterates over the records of the rows currently in `doc`.
    pub fn records<'a>(&'a self, doc: &'a Html) -> Rows<'a> {
        Rows {
            rows: doc.select(&self.rows),
            selectors: self,
        }
    }

    /// Maps a single row to a record, `None` for header, spacer and nameless rows.
    fn record(&self, row: ElementRef) -> Option<Record> {
        let Some(header) = row.select(&self.row_header).next() else {
            debug!("skipping row without a row header");
            return None;
        };
        let name = element_text(&header);

        let mut cells = row.select(&self.cells);
        let (Some(download_type), Some(upload_date)) = (cells.next(), cells.next()) else {
            debug!(%name, "skipping row with less than two data cells");
            return None;
        };

        let link = row
            .select(&self.download)
            .next()
            .and_then(|btn| btn.value().attr(&self.link_attr))
            .map(clean)
            .unwrap_or_default();

        if name.is_empty() {
            debug!("skipping row with an empty name");
            return None;
        }

        Some(Record {
            name,
            download_type: element_text(&download_type),
            upload_date: element_text(&upload_date),
            link,
        })
    }
}

/// Lazy iterator over the data rows of one rendered page.
pub struct Rows<'a> {
    rows: Select<'a, 'a>,
    selectors: &'a Selectors,
}

impl<'a> Iterator for Rows<'a> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        let selectors = self.selectors;
        self.rows.by_ref().find_map(|row| selectors.record(row))
    }
}
