use std::collections::HashSet;
use std::path::Path;

use chrono::Local;
use scraper::Html;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::{info, warn};

use crate::pager::advance;
use crate::parse::find_indicator;
use crate::request::Fetch;
use crate::rows::{Record, Selectors};
use crate::view::{wait_for, HttpView, PageView};
use crate::{info_time, Config, Error, Result, Timing, CSV_HEADER};

/// Everything collected from one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Harvest {
    /// Unique records in the order they were first seen.
    pub records: Vec<Record>,
    /// Pages read, including the first one.
    pub pages: usize,
}

/// Unique records in first-seen order.
#[derive(Debug, Default)]
struct Accumulator {
    records: Vec<Record>,
    seen: HashSet<Record>,
}

impl Accumulator {
    /// Appends the records not seen yet and returns how many were new.
    fn extend(&mut self, records: impl IntoIterator<Item = Record>) -> usize {
        let before = self.records.len();
        for record in records {
            if !self.seen.contains(&record) {
                self.seen.insert(record.clone());
                self.records.push(record);
            }
        }
        self.records.len() - before
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// Opens the listing over HTTP, collects every page and writes the CSV file.
pub async fn run<F: Fetch>(config: &Config, fetcher: F) -> Result<Harvest> {
    let selectors = Selectors::new(&config.selectors)?;
    let mut view = HttpView::open(fetcher, config.url.clone()).await?;
    scrape(config, &selectors, &mut view).await
}

/// Like [`run`], but renders the listing in a headless browser.
#[cfg(feature = "browser")]
pub async fn run_in_browser(config: &Config, headless: bool) -> Result<Harvest> {
    let selectors = Selectors::new(&config.selectors)?;
    let mut view = crate::browser::BrowserView::launch(&config.url, headless).await?;
    let harvest = scrape(config, &selectors, &mut view).await;
    if let Err(err) = view.close().await {
        warn!(%err, "closing the browser failed");
    }
    harvest
}

/// Collects every page of an opened view and writes the CSV file.
pub async fn scrape<V: PageView>(
    config: &Config,
    selectors: &Selectors,
    view: &mut V,
) -> Result<Harvest> {
    let start_time = Local::now();
    let harvest = collect(view, selectors, &config.timing).await?;

    let written = write_csv(&config.output, &harvest.records).await?;
    info_time!(
        start_time,
        "Rows written: {} to {}",
        written,
        config.output.display()
    );

    Ok(harvest)
}

/// Reads the listing page after page until the pager stops moving.
///
/// Fails only if the first page never shows its rows or its "Showing" counter.
/// Anything going wrong later ends collection and keeps what was gathered.
pub async fn collect<V: PageView>(
    view: &mut V,
    selectors: &Selectors,
    timing: &Timing,
) -> Result<Harvest> {
    let start_time = Local::now();
    wait_for_listing(view, selectors, timing).await?;

    let mut acc = Accumulator::default();
    let mut pages = 0;
    loop {
        pages += 1;
        let html = view.content().await?;
        let added = acc.extend(selectors.records(&Html::parse_document(&html)));
        info!(page = pages, added, total = acc.len(), "collected page");

        if !advance(view, timing).await {
            break;
        }

        let has_rows = |doc: &Html| selectors.has_rows(doc);
        if !wait_for(view, timing.next_rows, timing.poll_interval, has_rows).await? {
            warn!(page = pages + 1, "next page showed no rows, stopping");
            break;
        }
    }

    info_time!(
        start_time,
        "DONE: {} unique records from {} pages",
        acc.len(),
        pages
    );
    Ok(Harvest {
        records: acc.into_records(),
        pages,
    })
}

async fn wait_for_listing<V: PageView>(
    view: &mut V,
    selectors: &Selectors,
    timing: &Timing,
) -> Result<()> {
    let has_rows = |doc: &Html| selectors.has_rows(doc);
    if !wait_for(view, timing.initial_rows, timing.poll_interval, has_rows).await? {
        return Err(Error::LoadTimeout {
            what: "listing rows",
            after: timing.initial_rows,
        });
    }

    let has_indicator = |doc: &Html| find_indicator(doc).is_some();
    if !wait_for(view, timing.indicator, timing.poll_interval, has_indicator).await? {
        return Err(Error::LoadTimeout {
            what: "pagination indicator",
            after: timing.indicator,
        });
    }
    Ok(())
}

/// Serializes the records with a header row.
pub fn to_csv(records: &[Record]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;
    for record in records {
        wtr.write_record(record.fields())?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(bytes)
}

/// Writes the records to `path` as CSV and returns how many rows were written.
pub async fn write_csv(path: &Path, records: &[Record]) -> Result<usize> {
    let bytes = to_csv(records)?;
    let mut file = File::create(path).await?;
    file.write_all(&bytes).await?;
    file.flush().await?;
    Ok(records.len())
}
