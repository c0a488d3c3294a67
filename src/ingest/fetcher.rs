//! HTTP fetcher for the notice-board page
//!
//! A thin leaf I/O boundary: one GET, no retries. Reliability comes from the
//! scheduler's next tick, not from in-process retry, so a failed fetch simply
//! surfaces as a [`FetchError`] for the pipeline to degrade on.

use std::time::Duration;

use reqwest::Client;

use crate::error::FetchError;

/// Notice-board page fetcher
pub struct PageFetcher {
    /// HTTP client with configured timeout and compression
    client: Client,
}

impl PageFetcher {
    /// Create a new fetcher
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch the raw markup of the given page
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` on transport failure and
    /// `FetchError::Status` on a non-success response.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        let fetcher = PageFetcher::new(Duration::from_secs(10), "suchna-test/0.1");
        assert!(fetcher.is_ok());
    }
}
