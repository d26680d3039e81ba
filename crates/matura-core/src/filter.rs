//! Year filtering over parsed sittings

use std::collections::BTreeSet;

use crate::types::ExamSitting;

/// Keeps sittings whose date text contains `year`
///
/// `None` or a blank year passes everything through. Matching is substring
/// containment on the free-text date, not equality on [`ExamSitting::year`].
///
/// # Example
/// ```
/// use matura_core::{ExamSitting, filter_by_year};
/// let s = |d: &str| ExamSitting {
///     date: d.to_string(),
///     exam_type: String::new(),
///     organizer: String::new(),
///     detail_url: None,
/// };
/// let kept = filter_by_year(vec![s("8 maja 2023"), s("5 maja 2022")], Some("2023"));
/// assert_eq!(kept.len(), 1);
/// ```
pub fn filter_by_year(sittings: Vec<ExamSitting>, year: Option<&str>) -> Vec<ExamSitting> {
    match year.map(str::trim).filter(|y| !y.is_empty()) {
        None => sittings,
        Some(year) => sittings
            .into_iter()
            .filter(|s| s.date.contains(year))
            .collect(),
    }
}

/// Distinct year suffixes of all sittings, newest first
pub fn available_years(sittings: &[ExamSitting]) -> Vec<String> {
    let years: BTreeSet<&str> = sittings.iter().map(ExamSitting::year).collect();
    years.into_iter().rev().map(String::from).collect()
}
