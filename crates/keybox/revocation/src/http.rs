//! Status list retrieval over HTTP.

use std::time::Duration;

use color_eyre::eyre::WrapErr as _;

use crate::{RevocationList, StatusSource};

/// Google's attestation status list.
pub const DEFAULT_STATUS_URL: &str = "https://android.googleapis.com/attestation/status";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches the status list with an uncached GET.
pub struct HttpStatusSource {
    client: reqwest::Client,
    url: String,
}

impl HttpStatusSource {
    /// Create a source for `url` with the given request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> color_eyre::eyre::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .wrap_err("failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Source for the public status list.
    pub fn google() -> color_eyre::eyre::Result<Self> {
        Self::new(DEFAULT_STATUS_URL, DEFAULT_TIMEOUT)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl StatusSource for HttpStatusSource {
    async fn fetch(&self) -> color_eyre::eyre::Result<RevocationList> {
        tracing::debug!(url = %self.url, "fetching status list");

        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .header(reqwest::header::PRAGMA, "no-cache")
            .send()
            .await
            .wrap_err_with(|| format!("failed to fetch {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            color_eyre::eyre::bail!("status list request to {} failed: {}", self.url, status);
        }

        let body = response
            .bytes()
            .await
            .wrap_err("failed to read status list body")?;

        let list = RevocationList::from_json(&body)?;
        tracing::info!(url = %self.url, entries = list.len(), "status list loaded");
        Ok(list)
    }
}
