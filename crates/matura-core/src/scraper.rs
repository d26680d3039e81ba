//! Main scraper API for arkusze.pl
//!
//! Provides the listing fetcher and detail downloader on top of the HTTP
//! client and parsers.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::client::{ClientConfig, MaturaClient};
use crate::error::{MaturaError, Result};
use crate::filter::available_years;
use crate::parser::{first_pdf_link, parse_listing};
use crate::paths::sanitize_component;
use crate::types::{DownloadTarget, ExamSitting, Level};
use crate::url::build_listing_url;

/// Main scraper API for arkusze.pl
///
/// Combines the HTTP client with the listing and detail parsers to provide
/// a simple interface for discovering sittings and downloading their papers.
pub struct MaturaScraper {
    client: MaturaClient,
}

impl MaturaScraper {
    /// Create a new scraper with default configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new() -> Result<Self> {
        let client = MaturaClient::new()?;
        Ok(Self { client })
    }

    /// Create a new scraper with custom client configuration
    ///
    /// # Arguments
    /// * `config` - Custom client configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = MaturaClient::with_config(config)?;
        Ok(Self { client })
    }

    /// Configuration of the underlying client
    pub fn config(&self) -> &ClientConfig {
        self.client.config()
    }

    /// Listing page URL for a subject and level on the configured host
    pub fn listing_url(&self, subject_slug: &str, level: Level) -> String {
        build_listing_url(&self.client.config().base_url, subject_slug, level)
    }

    /// Fetch and parse the listing page for a subject and level
    ///
    /// # Arguments
    /// * `subject_slug` - Subject slug (e.g., "matematyka")
    /// * `level` - Exam level
    ///
    /// # Returns
    /// All qualifying rows in page order, including rows without a detail link
    ///
    /// # Errors
    /// - `HttpError` / `HttpStatus` if the request fails
    /// - `ParseError` if HTML parsing fails
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> matura_core::Result<()> {
    /// use matura_core::{Level, MaturaScraper};
    /// let scraper = MaturaScraper::new()?;
    /// let sittings = scraper.fetch_listing("matematyka", Level::Basic).await?;
    /// for sitting in sittings {
    ///     println!("{} {}", sitting.date, sitting.exam_type);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_listing(
        &self,
        subject_slug: &str,
        level: Level,
    ) -> Result<Vec<ExamSitting>> {
        let url = self.listing_url(subject_slug, level);
        let html = self.client.fetch_listing_page(&url).await?;
        let sittings = parse_listing(&html, &url)?;
        debug!(subject = subject_slug, %level, rows = sittings.len(), "parsed listing");
        Ok(sittings)
    }

    /// Years present on a listing page, newest first
    ///
    /// # Errors
    /// Same as [`fetch_listing`](Self::fetch_listing)
    pub async fn available_years(&self, subject_slug: &str, level: Level) -> Result<Vec<String>> {
        let sittings = self.fetch_listing(subject_slug, level).await?;
        Ok(available_years(&sittings))
    }

    /// Fetch a detail page and pick the PDF to download
    ///
    /// # Arguments
    /// * `detail_url` - Absolute detail page URL
    /// * `destination_folder` - Folder the file will be written to
    ///
    /// # Errors
    /// - `HttpError` / `HttpStatus` if the detail page cannot be fetched
    /// - `PdfNotFound` if the page carries no PDF link
    pub async fn resolve_target(
        &self,
        detail_url: &str,
        destination_folder: &Path,
    ) -> Result<DownloadTarget> {
        let html = self.client.fetch_detail_page(detail_url).await?;
        let link = first_pdf_link(&html, detail_url)?;

        Ok(DownloadTarget {
            pdf_url: link.url,
            suggested_name: sanitize_component(&link.name),
            destination_folder: destination_folder.to_path_buf(),
        })
    }

    /// Download the first PDF linked from a detail page
    ///
    /// Creates `destination_folder` if needed and writes `<name>.pdf` into it,
    /// overwriting an existing file of the same name. Nothing is created
    /// when the detail page has no PDF link.
    ///
    /// # Returns
    /// Path of the written file
    ///
    /// # Errors
    /// - `HttpError` / `HttpStatus` for network failures
    /// - `PdfNotFound` if the page carries no PDF link
    /// - `Io` if the folder or file cannot be written
    pub async fn download_sitting(
        &self,
        detail_url: &str,
        destination_folder: &Path,
    ) -> Result<PathBuf> {
        let target = self.resolve_target(detail_url, destination_folder).await?;
        self.download_target(&target).await
    }

    /// Stream a resolved target to disk
    ///
    /// # Errors
    /// - `HttpError` / `HttpStatus` for network failures
    /// - `Io` if the folder or file cannot be written
    pub async fn download_target(&self, target: &DownloadTarget) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&target.destination_folder)
            .await
            .map_err(|e| MaturaError::io(&target.destination_folder, e))?;

        let path = target.file_path();
        info!(name = %target.suggested_name, url = %target.pdf_url, "downloading paper");

        let bytes = self.client.download_to_file(&target.pdf_url, &path).await?;
        info!(path = %path.display(), bytes, "saved paper");

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn scraper_for(server: &MockServer) -> MaturaScraper {
        MaturaScraper::with_config(ClientConfig {
            base_url: server.uri(),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_scraper_creation() {
        let scraper = MaturaScraper::new();
        assert!(scraper.is_ok());
    }

    #[test]
    fn test_listing_url_uses_configured_host() {
        let scraper = MaturaScraper::with_config(ClientConfig {
            base_url: "http://localhost:9000".to_string(),
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(
            scraper.listing_url("biologia", Level::Extended),
            "http://localhost:9000/biologia-matura-poziom-rozszerzony/"
        );
    }

    #[tokio::test]
    async fn test_fetch_listing_resolves_relative_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fizyka-matura-poziom-podstawowy/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<table>
                    <tr><td>8 maja 2023</td><td>Formuła 2023</td><td>CKE</td><td><a href="maj-2023/">Zobacz</a></td></tr>
                    <tr><td>5 maja 2022</td><td>Formuła 2015</td><td>CKE</td><td>-</td></tr>
                </table>"#,
            ))
            .mount(&server)
            .await;

        let scraper = scraper_for(&server);
        let sittings = scraper.fetch_listing("fizyka", Level::Basic).await.unwrap();

        assert_eq!(sittings.len(), 2);
        assert_eq!(
            sittings[0].detail_url,
            Some(format!("{}/fizyka-matura-poziom-podstawowy/maj-2023/", server.uri()))
        );
        assert_eq!(sittings[1].detail_url, None);

        let years = scraper.available_years("fizyka", Level::Basic).await.unwrap();
        assert_eq!(years, vec!["2023", "2022"]);
    }

    #[tokio::test]
    async fn test_fetch_listing_network_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let scraper = scraper_for(&server);
        let result = scraper.fetch_listing("chemia", Level::Basic).await;
        assert!(matches!(result, Err(MaturaError::HttpStatus { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_download_sitting_writes_named_pdf() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/matura-2023/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<a href="/pliki/pp-2023.pdf">Arkusz: poziom podstawowy</a>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/pliki/pp-2023.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7 test".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("matematyka-podstawowy/2023/8 maja 2023 Formuła 2023 CKE");

        let scraper = scraper_for(&server);
        let saved = scraper
            .download_sitting(&format!("{}/matura-2023/", server.uri()), &folder)
            .await
            .unwrap();

        assert_eq!(saved, folder.join("Arkusz_ poziom podstawowy.pdf"));
        assert_eq!(std::fs::read(&saved).unwrap(), b"%PDF-1.7 test");
    }

    #[tokio::test]
    async fn test_download_sitting_without_pdf_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/matura-2023/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"<a href="/inne/">Inne</a>"#),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("out");

        let scraper = scraper_for(&server);
        let result = scraper
            .download_sitting(&format!("{}/matura-2023/", server.uri()), &folder)
            .await;

        assert!(matches!(result, Err(MaturaError::PdfNotFound(_))));
        assert!(!folder.exists());
    }

    #[tokio::test]
    async fn test_download_sitting_takes_first_pdf_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/matura-2022/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<a href="/arkusz.pdf">Arkusz</a><a href="/klucz.pdf">Klucz</a>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/arkusz.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"arkusz".to_vec()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/klucz.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"klucz".to_vec()))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let scraper = scraper_for(&server);
        scraper
            .download_sitting(&format!("{}/matura-2022/", server.uri()), dir.path())
            .await
            .unwrap();

        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
        assert!(dir.path().join("Arkusz.pdf").exists());
    }
}
