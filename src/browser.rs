//! Headless Chromium view for listings that page with scripts instead of links.

use chromiumoxide::{Browser, BrowserConfig, Handler, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::view::{Control, PageView};
use crate::{Error, Result};

/// A page in a browser launched for this run. Controls are found again through
/// their CSS path in the live DOM.
pub struct BrowserView {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl BrowserView {
    pub async fn launch(url: &Url, headless: bool) -> Result<Self> {
        let mut builder = BrowserConfig::builder();
        if !headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(Error::BrowserConfig)?;

        let (browser, handler) = Browser::launch(config).await?;
        let handler = spawn_handler(handler);

        info!(%url, headless, "opening listing in browser");
        let page = browser.new_page(url.as_str()).await?;
        page.wait_for_navigation().await?;

        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await?;
        self.browser.wait().await?;
        self.handler.abort();
        Ok(())
    }
}

fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(err) = event {
                warn!(%err, "browser handler event error");
            }
        }
        debug!("browser handler finished");
    })
}

impl PageView for BrowserView {
    async fn content(&mut self) -> Result<String> {
        Ok(self.page.content().await?)
    }

    async fn scroll_into_view(&mut self, control: &Control) -> Result<()> {
        let element = self.page.find_element(control.path.clone()).await?;
        element.scroll_into_view().await?;
        Ok(())
    }

    async fn click(&mut self, control: &Control) -> Result<()> {
        let element = self.page.find_element(control.path.clone()).await?;
        element.click().await?;
        Ok(())
    }
}
