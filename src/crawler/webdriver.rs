//! W3C WebDriver page renderer
//!
//! Captures go through chromedriver. Full-page screenshots use its Chrome
//! DevTools bridge, since the W3C screenshot command stops at the viewport. Every
//! capture opens its own browser session and always closes it, so concurrent
//! captures share no browser state. Link extraction and the target half of
//! the connection test use plain HTTP.

use crate::config::RendererConfig;
use crate::crawler::fetcher::{build_http_client, check_reachable, fetch_url};
use crate::crawler::parser::extract_links;
use crate::crawler::renderer::{CaptureResponse, PageRenderer};
use crate::url::derive_filename;
use crate::{FrameError, Result};
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Chrome switches for unattended headless capture
const CHROME_ARGS: &[&str] = &[
    "--headless=new",
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--no-first-run",
    "--disable-extensions",
    "--hide-scrollbars",
];

/// Timeout for individual WebDriver commands
const COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Renderer backed by a WebDriver endpoint
#[derive(Debug, Clone)]
pub struct WebDriverRenderer {
    /// Talks to the WebDriver endpoint
    driver: Client,
    /// Fetches pages directly for link extraction
    http: Client,
    endpoint: String,
    config: RendererConfig,
    output_dir: PathBuf,
}

impl WebDriverRenderer {
    /// Creates a renderer writing captures into `output_dir`
    pub fn new(config: &RendererConfig, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let driver = Client::builder().timeout(COMMAND_TIMEOUT).build()?;
        let http = build_http_client(&config.user_agent, Duration::from_millis(config.page_timeout))?;

        Ok(Self {
            driver,
            http,
            endpoint: config.webdriver_url.trim_end_matches('/').to_string(),
            config: config.clone(),
            output_dir: output_dir.into(),
        })
    }

    /// New-session capabilities for headless Chrome
    fn capabilities(&self) -> Value {
        let mut args: Vec<String> = CHROME_ARGS.iter().map(|arg| arg.to_string()).collect();
        args.push(format!(
            "--window-size={},{}",
            self.config.viewport_width, self.config.viewport_height
        ));
        args.push(format!("--user-agent={}", self.config.user_agent));

        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "acceptInsecureCerts": true,
                    "goog:chromeOptions": { "args": args }
                }
            }
        })
    }

    /// Sends a WebDriver command and returns its `value` member
    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let endpoint = format!("{}{}", self.endpoint, path);
        let mut request = self.driver.request(method, &endpoint);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FrameError::WebDriver(format!("{} request failed: {}", path, e)))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FrameError::WebDriver(format!("{} response read failed: {}", path, e)))?;

        let value: Value = serde_json::from_str(&text).unwrap_or_default();
        if let Some(err) = value.pointer("/value/error").and_then(|v| v.as_str()) {
            let message = value
                .pointer("/value/message")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown webdriver error");
            return Err(FrameError::WebDriver(format!("{}: {}", err, message)));
        }
        if !status.is_success() {
            return Err(FrameError::WebDriver(format!(
                "{} HTTP {}",
                path,
                status.as_u16()
            )));
        }

        Ok(value.get("value").cloned().unwrap_or(Value::Null))
    }

    async fn create_session(&self) -> Result<String> {
        let value = self
            .command(Method::POST, "/session", Some(self.capabilities()))
            .await?;

        value
            .get("sessionId")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| FrameError::WebDriver("session id missing in response".to_string()))
    }

    async fn delete_session(&self, session_id: &str) {
        let path = format!("/session/{}", session_id);
        if let Err(e) = self.command(Method::DELETE, &path, None).await {
            tracing::warn!("Failed to close browser session {}: {}", session_id, e);
        }
    }

    /// Runs a Chrome DevTools command through chromedriver's CDP bridge
    async fn cdp(&self, session_id: &str, cmd: &str, params: Value) -> Result<Value> {
        self.command(
            Method::POST,
            &format!("/session/{}/goog/cdp/execute", session_id),
            Some(json!({ "cmd": cmd, "params": params })),
        )
        .await
    }

    /// Clip covering the whole rendered document, not just the viewport
    async fn full_page_clip(&self, session_id: &str) -> Result<Value> {
        let metrics = self.cdp(session_id, "Page.getLayoutMetrics", json!({})).await?;
        let size = metrics
            .get("cssContentSize")
            .or_else(|| metrics.get("contentSize"));
        let dimension = |key: &str, fallback: u32| {
            size.and_then(|s| s.get(key))
                .and_then(Value::as_f64)
                .map(|v| v.ceil() as u64)
                .filter(|v| *v > 0)
                .unwrap_or(u64::from(fallback))
        };

        Ok(json!({
            "x": 0,
            "y": 0,
            "width": dimension("width", self.config.viewport_width),
            "height": dimension("height", self.config.viewport_height),
            "scale": 1
        }))
    }

    /// Sizes the window, navigates, waits for the page to settle and captures the full page
    async fn screenshot(&self, session_id: &str, url: &str) -> Result<Vec<u8>> {
        self.command(
            Method::POST,
            &format!("/session/{}/window/rect", session_id),
            Some(json!({
                "width": self.config.viewport_width,
                "height": self.config.viewport_height
            })),
        )
        .await?;

        self.command(
            Method::POST,
            &format!("/session/{}/url", session_id),
            Some(json!({ "url": url })),
        )
        .await?;

        tokio::time::sleep(Duration::from_millis(self.config.settle_delay)).await;

        let clip = self.full_page_clip(session_id).await?;
        let captured = self
            .cdp(
                session_id,
                "Page.captureScreenshot",
                json!({ "format": "png", "captureBeyondViewport": true, "clip": clip }),
            )
            .await?;
        let encoded = captured
            .get("data")
            .and_then(Value::as_str)
            .ok_or_else(|| FrameError::WebDriver("screenshot data missing in response".to_string()))?;

        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| FrameError::WebDriver(format!("screenshot decode failed: {}", e)))
    }

    /// Runs one browser session against the deadline; the session is always closed
    ///
    /// Session creation runs in its own task. If the deadline passes first,
    /// that task is left to finish and closes whatever session it opened.
    async fn capture_bytes(&self, url: &str, deadline: Instant) -> std::result::Result<Vec<u8>, String> {
        let mut creating = tokio::spawn({
            let renderer = self.clone();
            async move { renderer.create_session().await }
        });

        let created = tokio::time::timeout_at(deadline, &mut creating).await;
        let session_id = match created {
            Err(_) => {
                let renderer = self.clone();
                tokio::spawn(async move {
                    if let Ok(Ok(session_id)) = creating.await {
                        tracing::warn!("Closing session {} opened after its capture timed out", session_id);
                        renderer.delete_session(&session_id).await;
                    }
                });
                return Err("timeout".to_string());
            }
            Ok(Err(e)) => return Err(format!("session task failed: {}", e)),
            Ok(Ok(Err(e))) => return Err(e.to_string()),
            Ok(Ok(Ok(id))) => id,
        };

        let result = tokio::time::timeout_at(deadline, self.screenshot(&session_id, url)).await;
        self.delete_session(&session_id).await;

        match result {
            Err(_) => Err("timeout".to_string()),
            Ok(Err(e)) => Err(e.to_string()),
            Ok(Ok(bytes)) => Ok(bytes),
        }
    }
}

async fn write_capture(path: &Path, bytes: &[u8]) -> std::io::Result<u64> {
    tokio::fs::write(path, bytes).await?;
    Ok(tokio::fs::metadata(path).await?.len())
}

#[async_trait]
impl PageRenderer for WebDriverRenderer {
    async fn capture(&self, url: &str) -> CaptureResponse {
        let started = Instant::now();
        let filename = derive_filename(url);
        let deadline = started + Duration::from_millis(self.config.page_timeout);
        tracing::debug!("Capturing screenshot: {}", url);

        let bytes = match self.capture_bytes(url, deadline).await {
            Ok(bytes) => bytes,
            Err(error) => {
                let elapsed = started.elapsed().as_millis() as u64;
                return CaptureResponse::failed(filename, error, elapsed);
            }
        };

        let path = self.output_dir.join(&filename);
        let result = write_capture(&path, &bytes).await;
        let elapsed = started.elapsed().as_millis() as u64;

        match result {
            Ok(size) => CaptureResponse::succeeded(filename, size, elapsed),
            Err(e) => CaptureResponse::failed(filename, format!("File write error: {}", e), elapsed),
        }
    }

    async fn extract_links(&self, url: &str) -> Result<Vec<String>> {
        let page_url = Url::parse(url)?;
        let body = fetch_url(&self.http, url).await.into_html(url)?;
        let links = extract_links(&body, &page_url);
        tracing::debug!("Extracted {} links from {}", links.len(), url);
        Ok(links)
    }

    async fn test_connection(&self, url: &str) -> Result<()> {
        let status = self.command(Method::GET, "/status", None).await.map_err(|e| {
            FrameError::Unreachable {
                url: self.endpoint.clone(),
                reason: e.to_string(),
            }
        })?;
        if status.get("ready").and_then(|v| v.as_bool()) == Some(false) {
            return Err(FrameError::Unreachable {
                url: self.endpoint.clone(),
                reason: "WebDriver reports not ready".to_string(),
            });
        }

        let code = check_reachable(&self.http, url).await?;
        tracing::debug!("Target {} answered HTTP {}", url, code);
        Ok(())
    }
}
