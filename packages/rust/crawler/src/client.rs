//! HTTP access to the upstream site.

use std::time::Duration;

use reqwest::{Client, Response};
use tracing::debug;

use cims_shared::{CimsError, Result, SiteConfig};

/// Maximum number of redirects followed per request.
const MAX_REDIRECTS: usize = 5;

/// Shared HTTP client plus the endpoints it talks to.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct SiteClient {
    client: Client,
    site: SiteConfig,
}

impl SiteClient {
    /// Build a client from the site configuration.
    pub fn new(site: SiteConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(site.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(site.request_timeout_secs))
            .build()
            .map_err(|e| CimsError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, site })
    }

    /// Endpoints and HTTP settings in use.
    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// GET `url` and return the body text.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        debug!(url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CimsError::Network(format!("{url}: {e}")))?;

        read_body(url, response).await
    }

    /// POST a url-encoded form to `url` and return the body text.
    pub async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String> {
        debug!(url, "POST");

        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| CimsError::Network(format!("{url}: {e}")))?;

        read_body(url, response).await
    }
}

/// Reject non-success statuses, then read the body as text.
async fn read_body(url: &str, response: Response) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        return Err(CimsError::Network(format!("{url}: HTTP {status}")));
    }

    response
        .text()
        .await
        .map_err(|e| CimsError::Network(format!("{url}: body read failed: {e}")))
}
