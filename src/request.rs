use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::Result;

/// Something that can turn a URL into an HTML document.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn fetch(&self, url: &Url) -> Result<String>;
}

impl Fetch for Client {
    /// Requests a page and returns a `Result<String>` containing the HTML.
    /// Non-success statuses are errors.
    async fn fetch(&self, url: &Url) -> Result<String> {
        debug!(%url, "requesting page");
        let res = self.get(url.clone()).send().await?.error_for_status()?;
        let html = res.text().await?;
        Ok(html)
    }
}

/// Builds the client used for every request of a run.
pub fn build_client(user_agent: Option<&str>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(agent) = user_agent {
        builder = builder.user_agent(agent.to_string());
    }
    Ok(builder.build()?)
}
