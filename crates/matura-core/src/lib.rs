//! Matura Exam Paper Scraper Core Library
//!
//! Provides an async API for discovering past matura exam sittings on
//! arkusze.pl and downloading their PDF papers into a folder tree.
//!
//! # Overview
//!
//! This crate provides a complete crawl-and-download pipeline with:
//! - An HTTP client with per-page timeouts and a courtesy delay between downloads
//! - HTML parsers for listing tables and detail pages
//! - A year filter and deterministic destination paths
//! - A sequential pipeline driver reporting through [`ProgressSink`]
//!
//! # Example
//!
//! ```no_run
//! use matura_core::{
//!     Level, LevelChoice, MaturaScraper, NoProgress, Pipeline, Result, Selection,
//!     SubjectChoice, subject_by_slug,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scraper = MaturaScraper::new()?;
//!     let pipeline = Pipeline::new(scraper, "matura_arkusze");
//!
//!     let selection = Selection {
//!         subjects: SubjectChoice::One(subject_by_slug("matematyka").unwrap()),
//!         level: LevelChoice::Single(Level::Basic),
//!         year: Some("2023".to_string()),
//!     };
//!
//!     let summary = pipeline.run(&selection, &NoProgress).await;
//!     println!("{}/{}", summary.downloaded, summary.total);
//!     Ok(())
//! }
//! ```
//!
//! # Destination layout
//!
//! Papers are written to
//! `<root>/<subject>-<level>/<year>/<date> <type> <organizer>/<name>.pdf`.
//! Re-running the same selection targets the same paths and overwrites
//! existing files.

mod client;
mod error;
mod filter;
pub mod parser;
mod paths;
mod pipeline;
mod scraper;
mod types;
pub mod url;

// Re-export client types
pub use client::{ClientConfig, DOWNLOAD_CHUNK_SIZE, MaturaClient, RateLimiter};

// Re-export error types
pub use error::{MaturaError, Result};

// Re-export filtering and path helpers
pub use filter::{available_years, filter_by_year};
pub use paths::{sanitize_component, sitting_folder};

// Re-export parser functions
pub use parser::{first_pdf_link, parse_listing, parse_pdf_links};

// Re-export pipeline API
pub use pipeline::{
    DownloadPlan, ItemOutcome, ListingBatch, ListingOutcome, NoProgress, Pipeline, ProgressSink,
    RunSummary, classify_listing,
};

// Re-export main scraper API
pub use scraper::MaturaScraper;

// Re-export data types
pub use types::{
    DownloadTarget, ExamSitting, Level, LevelChoice, PdfLink, SUBJECTS, Selection, Subject,
    SubjectChoice, subject_by_slug,
};

// Re-export URL helper functions for convenience
pub use crate::url::{BASE_URL, build_listing_url, resolve_link};
