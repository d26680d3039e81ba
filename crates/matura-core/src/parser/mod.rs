//! HTML parsers for arkusze.pl
//!
//! Contains modules for parsing the two page types the archive serves.

pub mod detail;
pub mod listing;

pub use detail::{first_pdf_link, parse_pdf_links};
pub use listing::parse_listing;
