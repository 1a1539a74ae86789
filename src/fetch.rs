use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use thiserror::Error;

use crate::settings::Settings;

/// A failed fetch. This is a value the pipeline routes around, not
/// something it unwinds on: a listing failure truncates traversal, a detail
/// failure skips that one resume.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: StatusCode },
}

/// Document fetcher seam. Listing traversal and detail scraping only ever
/// see this trait, so the transport (and its scheduling) stays swappable
/// and tests can serve canned documents.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP fetcher with a fixed inter-request delay.
pub struct HttpFetcher {
    client: Client,
    delay: Duration,
}

impl HttpFetcher {
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(HttpFetcher {
            client,
            delay: Duration::from_millis(settings.delay_ms),
        })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        // Fixed politeness delay before every request.
        thread::sleep(self.delay);
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.text()?)
    }
}
