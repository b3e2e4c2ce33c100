//! HTTP fetcher implementation
//!
//! Builds the shared HTTP client and fetches page bodies. All requests
//! carry the configured user agent and a bounded timeout; a slow or
//! broken site costs one fetch, never the run.

use crate::DredgeError;
use reqwest::Client;
use std::time::Duration;

/// Timeout applied to every page fetch
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the HTTP client used for all crawler requests
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(FETCH_TIMEOUT)
        .connect_timeout(FETCH_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body
///
/// Non-2xx statuses, timeouts and transport failures all surface as an
/// error; the caller decides what a failed fetch costs (for the main
/// loop: a log line and dropping the URL from this pass).
pub async fn fetch_page(client: &Client, url: &str) -> crate::Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|e| DredgeError::Http {
            url: url.to_string(),
            source: e,
        })?;

    response.text().await.map_err(|e| DredgeError::Http {
        url: url.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client("TestBot/1.0");
        assert!(client.is_ok());
    }
}
