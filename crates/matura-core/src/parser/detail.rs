//! Detail page parser for arkusze.pl
//!
//! Extracts PDF links from the page a listing row points to.

use scraper::{Html, Selector};

use crate::error::{MaturaError, Result};
use crate::types::PdfLink;
use crate::url::{file_stem_from_url, is_pdf_link, resolve_link, strip_pdf_extension};

/// Stem used when neither the anchor text nor the URL yield a name
const FALLBACK_NAME: &str = "arkusz";

/// Parses a detail page and returns all PDF links in document order
///
/// An anchor qualifies when its `href` ends in `.pdf` (case-insensitive).
/// The name is the anchor's trimmed text; an empty anchor falls back to
/// the file stem of the URL.
///
/// # Arguments
/// * `html` - Raw HTML string from the detail page
/// * `page_url` - Absolute URL the detail page was fetched from
///
/// # Returns
/// Vector of [`PdfLink`], empty if the page has no PDF anchors
///
/// # Errors
/// Returns `ParseError` if the selector cannot be built
pub fn parse_pdf_links(html: &str, page_url: &str) -> Result<Vec<PdfLink>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]")
        .map_err(|e| MaturaError::ParseError(format!("Invalid selector: {:?}", e)))?;

    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !is_pdf_link(href) {
            continue;
        }
        let Ok(url) = resolve_link(page_url, href) else {
            continue;
        };

        let text = element.text().collect::<String>();
        let text = strip_pdf_extension(text.trim()).trim();
        let name = if text.is_empty() {
            file_stem_from_url(&url).unwrap_or_else(|| FALLBACK_NAME.to_string())
        } else {
            text.to_string()
        };

        links.push(PdfLink { url, name });
    }

    Ok(links)
}

/// Returns the first PDF link on a detail page
///
/// Only one paper is taken per sitting; later PDF anchors are ignored.
///
/// # Errors
/// - `PdfNotFound` if the page has no PDF anchor
/// - `ParseError` if the selector cannot be built
pub fn first_pdf_link(html: &str, page_url: &str) -> Result<PdfLink> {
    parse_pdf_links(html, page_url)?
        .into_iter()
        .next()
        .ok_or_else(|| MaturaError::PdfNotFound(page_url.to_string()))
}
