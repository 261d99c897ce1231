//! HTTP fetcher implementation
//!
//! This module handles the plain HTTP requests made outside the browser:
//! - Building HTTP clients with the configured user agent
//! - GET requests for link extraction, with Content-Type checking
//! - Text fetches for sitemap and robots.txt discovery
//! - Reachability checks before a run starts
//! - Error classification

use crate::{FrameError, Result};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Maximum redirect hops followed by plain HTTP requests
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Non-success HTTP status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the request timed out
        timed_out: bool,
    },
}

impl FetchResult {
    /// Converts the fetch into the HTML body or a typed error for `url`
    pub fn into_html(self, url: &str) -> Result<String> {
        match self {
            Self::Success { body, .. } => Ok(body),
            Self::ContentMismatch { content_type } => Err(FrameError::ContentMismatch {
                url: url.to_string(),
                content_type,
            }),
            Self::HttpError { status_code } => Err(FrameError::HttpStatus {
                url: url.to_string(),
                status: status_code,
            }),
            Self::NetworkError { timed_out: true, .. } => Err(FrameError::Timeout {
                url: url.to_string(),
            }),
            Self::NetworkError { error, .. } => Err(FrameError::Unreachable {
                url: url.to_string(),
                reason: error,
            }),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - User agent sent with every request
/// * `timeout` - Whole-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sumi_frame::crawler::build_http_client;
///
/// let client = build_http_client("Mozilla/5.0", Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL expecting an HTML document
///
/// # Request Flow
///
/// 1. Send GET request, following up to 10 redirects
/// 2. Non-2xx status → HttpError
/// 3. Content-Type without `text/html` → ContentMismatch
/// 4. Read body → Success
///
/// No retries are made; a failure is reported once and left to the caller.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.to_ascii_lowercase().contains("text/html") {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        },
        Err(e) => classify_error(e),
    }
}

/// Fetches a URL as text, accepting only a 200 response
///
/// Used for sitemap and robots.txt documents, whose Content-Type varies.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await.map_err(|source| FrameError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(FrameError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| FrameError::Http {
        url: url.to_string(),
        source,
    })
}

/// Checks that a URL answers with a 2xx or 3xx status
///
/// # Returns
///
/// * `Ok(u16)` - The status code received
/// * `Err(FrameError::Unreachable)` - Network failure or an error status
pub async fn check_reachable(client: &Client, url: &str) -> Result<u16> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FrameError::Unreachable {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if status.is_success() || status.is_redirection() {
        Ok(status.as_u16())
    } else {
        Err(FrameError::Unreachable {
            url: url.to_string(),
            reason: format!("HTTP {}", status.as_u16()),
        })
    }
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            timed_out: true,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: "Connection refused".to_string(),
            timed_out: false,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            timed_out: false,
        }
    }
}
