//! HTTP client with per-request timeouts and a courtesy rate limiter
//!
//! Provides the single HTTP client shared by listing fetches, detail page
//! fetches and streamed PDF downloads. Every call makes exactly one attempt.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};
use tracing::debug;

use crate::error::{MaturaError, Result};
use crate::url::BASE_URL;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Write buffer size for streamed downloads
pub const DOWNLOAD_CHUNK_SIZE: usize = 8 * 1024;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Archive host listing URLs are built on (default: "https://arkusze.pl")
    pub base_url: String,
    /// Listing page request timeout in seconds (default: 10)
    pub listing_timeout_secs: u64,
    /// Detail page request timeout in seconds (default: 15)
    pub detail_timeout_secs: u64,
    /// Download timeout in seconds, applied to connect and to each body read (default: 20)
    pub download_timeout_secs: u64,
    /// Pause between consecutive item downloads in milliseconds (default: 300)
    pub item_delay_ms: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            listing_timeout_secs: 10,
            detail_timeout_secs: 15,
            download_timeout_secs: 20,
            item_delay_ms: 300,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Rate limiter to control request frequency
///
/// Ensures calls to [`acquire`](Self::acquire) are spaced at least
/// `min_interval` apart. The first call never waits.
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// Create a rate limiter from a fixed minimum interval
    pub fn with_interval(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Acquire permission to make a request
    ///
    /// If called before the minimum interval has passed since the last request,
    /// this method will sleep until the interval has elapsed.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// HTTP client wrapper for the exam archive
///
/// Handles all HTTP communication, including:
/// - Separate timeouts for listing pages, detail pages and downloads
/// - Treating non-2xx responses as failures
/// - Streaming PDF bodies to disk through a fixed-size buffer
pub struct MaturaClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl MaturaClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.download_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT_LANGUAGE,
                    reqwest::header::HeaderValue::from_static("pl-PL,pl;q=0.9,en;q=0.8"),
                );
                headers
            })
            .build()
            .map_err(MaturaError::HttpError)?;

        Ok(Self { client, config })
    }

    /// Configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch a listing page with the listing timeout
    ///
    /// # Errors
    /// - `HttpError` - Network errors or timeout
    /// - `HttpStatus` - Server returned a non-success status
    pub async fn fetch_listing_page(&self, url: &str) -> Result<String> {
        self.fetch_html(url, Duration::from_secs(self.config.listing_timeout_secs))
            .await
    }

    /// Fetch a detail page with the (longer) detail timeout
    ///
    /// # Errors
    /// - `HttpError` - Network errors or timeout
    /// - `HttpStatus` - Server returned a non-success status
    pub async fn fetch_detail_page(&self, url: &str) -> Result<String> {
        self.fetch_html(url, Duration::from_secs(self.config.detail_timeout_secs))
            .await
    }

    async fn fetch_html(&self, url: &str, request_timeout: Duration) -> Result<String> {
        debug!(url, timeout_secs = request_timeout.as_secs(), "fetching page");

        let response = self
            .client
            .get(url)
            .timeout(request_timeout)
            .send()
            .await
            .map_err(MaturaError::HttpError)?;

        let response = Self::check_status(url, response)?;
        response.text().await.map_err(MaturaError::HttpError)
    }

    /// Stream a file to `path`, overwriting any existing file
    ///
    /// The parent directory must exist. Each body read is bounded by the
    /// download timeout. A failure mid-stream leaves whatever was written
    /// so far at `path`.
    ///
    /// # Returns
    /// Number of bytes written
    ///
    /// # Errors
    /// - `HttpError` - Network errors or timeout
    /// - `HttpStatus` - Server returned a non-success status
    /// - `Io` - Creating or writing the file failed
    pub async fn download_to_file(&self, url: &str, path: &Path) -> Result<u64> {
        let read_timeout = Duration::from_secs(self.config.download_timeout_secs);
        debug!(url, path = %path.display(), "starting download");

        // Bounds the response head and each chunk, not the whole transfer
        let response = timeout(read_timeout, self.client.get(url).send())
            .await
            .map_err(|_| Self::stalled(path))?
            .map_err(MaturaError::HttpError)?;
        let response = Self::check_status(url, response)?;

        let file = File::create(path)
            .await
            .map_err(|e| MaturaError::io(path, e))?;
        let mut writer = BufWriter::with_capacity(DOWNLOAD_CHUNK_SIZE, file);
        let mut stream = response.bytes_stream();
        let mut bytes_written: u64 = 0;

        loop {
            let next = timeout(read_timeout, stream.next())
                .await
                .map_err(|_| Self::stalled(path))?;
            let Some(chunk) = next else {
                break;
            };
            let chunk = chunk.map_err(MaturaError::HttpError)?;

            writer
                .write_all(&chunk)
                .await
                .map_err(|e| MaturaError::io(path, e))?;
            bytes_written += chunk.len() as u64;
        }

        writer.flush().await.map_err(|e| MaturaError::io(path, e))?;

        debug!(path = %path.display(), bytes = bytes_written, "download finished");
        Ok(bytes_written)
    }

    fn stalled(path: &Path) -> MaturaError {
        MaturaError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::TimedOut, "download timed out"),
        )
    }

    fn check_status(url: &str, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(MaturaError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
    }
}
