//! HTTP client for the holdings source's HTML pages.
//!
//! Each investor page is addressed by a URL template parameterized with the
//! investor's source code. There is no retry policy: a failed fetch is
//! returned to the caller, which treats it as terminal for that investor.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::ScraperError;

/// The pages the pipeline reads from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourcePage {
    /// Multi-quarter portfolio value and top-holdings trend table.
    History,
    /// Per-quarter buy/sell activity log.
    Activity,
    /// Latest reported holdings.
    Holdings,
    /// Cross-investor real-time activity feed.
    Realtime,
}

impl SourcePage {
    fn path(self) -> &'static str {
        match self {
            SourcePage::History => "m/hist/p_hist.php",
            SourcePage::Activity => "m/m_activity.php",
            SourcePage::Holdings => "m/holdings.php",
            SourcePage::Realtime => "m/home.php",
        }
    }

    fn query(self, source_code: &str) -> Vec<(&'static str, String)> {
        match self {
            SourcePage::History => vec![("f", source_code.to_owned())],
            SourcePage::Activity => vec![("m", source_code.to_owned()), ("typ", "a".to_owned())],
            SourcePage::Holdings => vec![("m", source_code.to_owned())],
            SourcePage::Realtime => Vec::new(),
        }
    }
}

impl std::fmt::Display for SourcePage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourcePage::History => write!(f, "history"),
            SourcePage::Activity => write!(f, "activity"),
            SourcePage::Holdings => write!(f, "holdings"),
            SourcePage::Realtime => write!(f, "realtime"),
        }
    }
}

/// Fetches raw HTML pages from the holdings source.
pub struct SourceClient {
    client: Client,
    base_url: Url,
}

impl SourceClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScraperError::InvalidUrl`] if `base_url`
    /// does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // A trailing slash keeps `Url::join` from replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ScraperError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Builds the URL of `page` for the investor with `source_code`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if the page path cannot be joined
    /// onto the base URL.
    pub fn page_url(&self, page: SourcePage, source_code: &str) -> Result<Url, ScraperError> {
        let mut url = self
            .base_url
            .join(page.path())
            .map_err(|e| ScraperError::InvalidUrl {
                url: format!("{}{}", self.base_url, page.path()),
                reason: e.to_string(),
            })?;

        let query = page.query(source_code);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Fetches `page` for `source_code` and returns the response body.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NotFound`]: HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network, TLS, or body decoding failure.
    pub async fn fetch_page(
        &self,
        page: SourcePage,
        source_code: &str,
    ) -> Result<String, ScraperError> {
        let url = self.page_url(page, source_code)?;
        tracing::debug!(%page, url = %url, "fetching source page");

        let response = self
            .client
            .get(url.clone())
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        tracing::debug!(%page, bytes = body.len(), "source page loaded");
        Ok(body)
    }

    /// Fetches the multi-quarter trend page.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_page`].
    pub async fn fetch_history(&self, source_code: &str) -> Result<String, ScraperError> {
        self.fetch_page(SourcePage::History, source_code).await
    }

    /// Fetches the activity log page.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_page`].
    pub async fn fetch_activity(&self, source_code: &str) -> Result<String, ScraperError> {
        self.fetch_page(SourcePage::Activity, source_code).await
    }

    /// Fetches the current holdings page.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_page`].
    pub async fn fetch_holdings(&self, source_code: &str) -> Result<String, ScraperError> {
        self.fetch_page(SourcePage::Holdings, source_code).await
    }

    /// Fetches the real-time activity feed page.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_page`].
    pub async fn fetch_realtime(&self) -> Result<String, ScraperError> {
        self.fetch_page(SourcePage::Realtime, "").await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
