use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::HttpConfig;
use crate::error::{Result, ScraperError};

/// Fetches a page body as text. Sources depend on this seam rather than on
/// reqwest directly so they can be driven from fixtures in tests.
#[async_trait]
pub trait FetchPage: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// reqwest-backed fetcher that presents itself as a desktop browser. Both
/// Wikipedia and Box Office Mojo reject the default client user agent.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&config.user_agent)?);
        headers.insert(ACCEPT_LANGUAGE, header_value(&config.accept_language)?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client })
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| ScraperError::Config(format!("Invalid header value '{}': {}", value, e)))
}

#[async_trait]
impl FetchPage for PageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        info!(%url, "Fetching page");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        debug!(%url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
