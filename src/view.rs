use std::time::Duration;

use scraper::{ElementRef, Html};
use tokio::time::{sleep, timeout};
use tracing::{debug, info};
use url::Url;

use crate::parse::element_text;
use crate::request::Fetch;
use crate::{Error, Result};

/// An interactive element of the rendered page, detached from the document it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    /// CSS path from the document root, e.g. `html > body:nth-child(2) > a:nth-child(1)`.
    pub path: String,
    pub href: Option<String>,
    pub label: String,
}

impl Control {
    pub(crate) fn from_element(el: &ElementRef) -> Self {
        Self {
            path: css_path(el),
            href: el.value().attr("href").map(str::to_string),
            label: element_text(el),
        }
    }

    /// The href, if following it would load another document.
    pub fn target(&self) -> Option<&str> {
        let href = self.href.as_deref()?.trim();
        let scripted = href
            .get(..11)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("javascript:"));
        (!href.is_empty() && !href.starts_with('#') && !scripted).then_some(href)
    }
}

fn css_path(el: &ElementRef) -> String {
    let mut segments: Vec<String> = std::iter::once(*el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .map(|node| {
            let name = node.value().name();
            if node.parent().and_then(ElementRef::wrap).is_none() {
                return name.to_string();
            }
            let index = node
                .prev_siblings()
                .filter(|sib| sib.value().is_element())
                .count()
                + 1;
            format!("{name}:nth-child({index})")
        })
        .collect();
    segments.reverse();
    segments.join(" > ")
}

/// Handle into the live document that the scraper reads from and clicks through.
///
/// Every component gets the view passed explicitly; the view owns whatever session
/// sits behind it.
#[allow(async_fn_in_trait)]
pub trait PageView {
    /// The current document as HTML.
    async fn content(&mut self) -> Result<String>;

    async fn scroll_into_view(&mut self, control: &Control) -> Result<()>;

    async fn click(&mut self, control: &Control) -> Result<()>;
}

/// A view over plain HTTP: the document is whatever was fetched last and clicking
/// a control follows its href.
///
/// Clicking only queues the navigation. The next read of the content loads it, so a
/// slow page counts against the caller's polling budget rather than the click.
#[derive(Debug)]
pub struct HttpView<F> {
    fetcher: F,
    url: Url,
    html: String,
    pending: Option<Url>,
}

impl<F: Fetch> HttpView<F> {
    pub async fn open(fetcher: F, url: Url) -> Result<Self> {
        info!(%url, "opening listing");
        let html = fetcher.fetch(&url).await?;
        Ok(Self {
            fetcher,
            url,
            html,
            pending: None,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl<F: Fetch> PageView for HttpView<F> {
    async fn content(&mut self) -> Result<String> {
        // A failed load is dropped, the previous document stays current.
        if let Some(next) = self.pending.take() {
            self.html = self.fetcher.fetch(&next).await?;
            self.url = next;
        }
        Ok(self.html.clone())
    }

    // Nothing to scroll in a fetched document.
    async fn scroll_into_view(&mut self, _control: &Control) -> Result<()> {
        Ok(())
    }

    async fn click(&mut self, control: &Control) -> Result<()> {
        let href = control
            .target()
            .ok_or_else(|| Error::NotNavigable(control.path.clone()))?;
        let next = self.url.join(href)?;
        debug!(from = %self.url, to = %next, "following control");

        self.pending = Some(next);
        Ok(())
    }
}

/// Polls the view every `interval` until `ready` holds for the rendered document.
/// Returns `Ok(false)` if `budget` runs out first.
pub async fn wait_for<V, P>(
    view: &mut V,
    budget: Duration,
    interval: Duration,
    ready: P,
) -> Result<bool>
where
    V: PageView,
    P: Fn(&Html) -> bool,
{
    let poll = async {
        loop {
            let html = view.content().await?;
            if ready(&Html::parse_document(&html)) {
                return Ok::<(), Error>(());
            }
            sleep(interval).await;
        }
    };

    match timeout(budget, poll).await {
        Ok(res) => res.map(|_| true),
        Err(_) => Ok(false),
    }
}
