//! URL helper functions for arkusze.pl
//!
//! Provides functions for building listing URLs and resolving links
//! found on listing and detail pages.

use url::Url;

use crate::error::{MaturaError, Result};
use crate::types::Level;

/// Default exam archive host
pub const BASE_URL: &str = "https://arkusze.pl";

/// Builds the listing page URL for a subject and level
///
/// # Arguments
/// * `base_url` - Archive host, e.g. "https://arkusze.pl" (trailing slash optional)
/// * `subject_slug` - Subject slug (e.g., "matematyka")
/// * `level` - Exam level
///
/// # Returns
/// Full URL to the listing page
///
/// # Example
/// ```
/// use matura_core::Level;
/// use matura_core::url::build_listing_url;
/// let url = build_listing_url("https://arkusze.pl", "matematyka", Level::Basic);
/// assert_eq!(url, "https://arkusze.pl/matematyka-matura-poziom-podstawowy/");
/// ```
pub fn build_listing_url(base_url: &str, subject_slug: &str, level: Level) -> String {
    format!(
        "{}/{}-matura-poziom-{}/",
        base_url.trim_end_matches('/'),
        subject_slug,
        level.slug()
    )
}

/// Resolves a possibly relative link against the page it was found on
///
/// # Arguments
/// * `page_url` - Absolute URL of the page containing the link
/// * `href` - Raw `href` attribute value
///
/// # Returns
/// Absolute URL string
///
/// # Errors
/// Returns `InvalidUrl` if the page URL is not absolute or the link cannot be joined
///
/// # Example
/// ```
/// use matura_core::url::resolve_link;
/// let url = resolve_link("https://arkusze.pl/matematyka-matura-poziom-podstawowy/", "../matura-2023/").unwrap();
/// assert_eq!(url, "https://arkusze.pl/matura-2023/");
/// ```
pub fn resolve_link(page_url: &str, href: &str) -> Result<String> {
    let base = Url::parse(page_url).map_err(|_| MaturaError::InvalidUrl(page_url.to_string()))?;
    base.join(href.trim())
        .map(String::from)
        .map_err(|_| MaturaError::InvalidUrl(href.to_string()))
}

/// Derives a file stem from the last path segment of a URL
///
/// The segment is percent-decoded and a trailing `.pdf` (any case) is
/// removed. Returns `None` when the URL has no usable segment.
///
/// # Example
/// ```
/// use matura_core::url::file_stem_from_url;
/// let stem = file_stem_from_url("https://arkusze.pl/pliki/matura%20maj.PDF?v=2");
/// assert_eq!(stem.as_deref(), Some("matura maj"));
/// ```
pub fn file_stem_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).next_back()?;
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());

    let stem = strip_pdf_extension(&decoded).trim();
    if stem.is_empty() {
        return None;
    }
    Some(stem.to_string())
}

/// Drops a trailing `.pdf`, ignoring case
pub(crate) fn strip_pdf_extension(name: &str) -> &str {
    let split = name.len().saturating_sub(4);
    if name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(".pdf") {
        &name[..split]
    } else {
        name
    }
}

/// Checks whether a link target ends in the PDF extension, ignoring case
pub fn is_pdf_link(href: &str) -> bool {
    href.trim().to_lowercase().ends_with(".pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_listing_url_basic() {
        let url = build_listing_url(BASE_URL, "matematyka", Level::Basic);
        assert_eq!(url, "https://arkusze.pl/matematyka-matura-poziom-podstawowy/");
    }

    #[test]
    fn test_build_listing_url_extended_trailing_slash_base() {
        let url = build_listing_url("http://127.0.0.1:8080/", "jezyk-polski", Level::Extended);
        assert_eq!(
            url,
            "http://127.0.0.1:8080/jezyk-polski-matura-poziom-rozszerzony/"
        );
    }

    #[test]
    fn test_resolve_relative_link() {
        let url = resolve_link(
            "https://arkusze.pl/matematyka-matura-poziom-podstawowy/",
            "matura-2023-maj/",
        )
        .unwrap();
        assert_eq!(
            url,
            "https://arkusze.pl/matematyka-matura-poziom-podstawowy/matura-2023-maj/"
        );
    }

    #[test]
    fn test_resolve_root_relative_link() {
        let url = resolve_link("https://arkusze.pl/a/b/", "/pliki/x.pdf").unwrap();
        assert_eq!(url, "https://arkusze.pl/pliki/x.pdf");
    }

    #[test]
    fn test_resolve_absolute_link_unchanged() {
        let url = resolve_link("https://arkusze.pl/a/", "https://cdn.example.com/x.pdf").unwrap();
        assert_eq!(url, "https://cdn.example.com/x.pdf");
    }

    #[test]
    fn test_resolve_link_invalid_base() {
        let result = resolve_link("not a url", "x.pdf");
        assert!(matches!(result, Err(MaturaError::InvalidUrl(_))));
    }

    #[test]
    fn test_file_stem_from_url_strips_extension() {
        assert_eq!(
            file_stem_from_url("https://arkusze.pl/pliki/arkusz-2023.pdf").as_deref(),
            Some("arkusz-2023")
        );
    }

    #[test]
    fn test_file_stem_from_url_without_pdf_extension() {
        assert_eq!(
            file_stem_from_url("https://arkusze.pl/download/12345").as_deref(),
            Some("12345")
        );
    }

    #[test]
    fn test_file_stem_from_url_empty_segment() {
        assert_eq!(file_stem_from_url("https://arkusze.pl/.pdf"), None);
        assert_eq!(file_stem_from_url("https://arkusze.pl/"), None);
    }

    #[test]
    fn test_is_pdf_link_case_insensitive() {
        assert!(is_pdf_link("/pliki/a.pdf"));
        assert!(is_pdf_link("/pliki/A.PDF"));
        assert!(is_pdf_link(" x.Pdf "));
        assert!(!is_pdf_link("/pliki/a.pdf?download=1"));
        assert!(!is_pdf_link("/pliki/a.docx"));
    }
}
