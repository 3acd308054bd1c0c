//! Content fetcher: retrieves cleaned HTML for a target URL via a remote
//! content-cleaning proxy.
//!
//! The proxy does all the cleaning; this crate only builds the proxied
//! request and returns the response body as text. The target URL is appended
//! to the proxy base by plain string concatenation, with no parsing or
//! re-encoding, so malformed URLs pass through and fail at the network layer.

use reqwest::Client;
use tracing::{debug, instrument};

use pagemark_shared::{PagemarkError, Result};

/// User-Agent string for proxy requests.
const USER_AGENT: &str = concat!("pagemark/", env!("CARGO_PKG_VERSION"));

/// Fetches cleaned page content through a content proxy such as `r.jina.ai`.
pub struct ProxyFetcher {
    base: String,
    client: Client,
}

impl ProxyFetcher {
    /// Create a fetcher for the given proxy base address
    /// (e.g. `https://r.jina.ai`). A trailing slash on the base is tolerated.
    ///
    /// No request timeout is set; the transport's own defaults apply.
    pub fn new(proxy_base: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| PagemarkError::Fetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base: proxy_base.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Build the proxied request target: `<base>/<url>`, verbatim.
    pub fn proxied_url(&self, url: &str) -> String {
        format!("{}/{url}", self.base)
    }

    /// Fetch the cleaned content for `url` through the proxy.
    ///
    /// Fails with [`PagemarkError::Fetch`] on any non-200 status or when the
    /// request cannot be completed.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_cleaned_html(&self, url: &str) -> Result<String> {
        let target = self.proxied_url(url);
        debug!(%target, "fetching via content proxy");

        let response = self
            .client
            .get(&target)
            .send()
            .await
            .map_err(|e| PagemarkError::Fetch(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PagemarkError::Fetch(format!(
                "Failed to fetch URL: {}",
                status.as_u16()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| PagemarkError::Fetch(format!("{url}: body read failed: {e}")))
    }
}
