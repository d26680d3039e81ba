//! Destination path derivation for downloaded papers
//!
//! Paths are built only from listing content so the same sitting always
//! lands in the same folder.

use std::path::{Path, PathBuf};

use crate::types::{ExamSitting, Level};

/// Folder for one sitting: `<root>/<subject>-<level>/<year>/<date> <type> <organizer>`
///
/// # Example
/// ```
/// use std::path::Path;
/// use matura_core::{ExamSitting, Level, sitting_folder};
/// let sitting = ExamSitting {
///     date: "8 maja 2023".to_string(),
///     exam_type: "Formuła 2023".to_string(),
///     organizer: "CKE".to_string(),
///     detail_url: None,
/// };
/// let folder = sitting_folder(Path::new("/out"), "matematyka", Level::Basic, &sitting);
/// assert_eq!(
///     folder,
///     Path::new("/out/matematyka-podstawowy/2023/8 maja 2023 Formuła 2023 CKE")
/// );
/// ```
pub fn sitting_folder(
    root: &Path,
    subject_slug: &str,
    level: Level,
    sitting: &ExamSitting,
) -> PathBuf {
    root.join(sanitize_component(&format!("{}-{}", subject_slug, level.slug())))
        .join(sanitize_component(sitting.year()))
        .join(sanitize_component(&sitting.label()))
}

/// Makes a single path component safe to create on any common filesystem
///
/// Separators, reserved characters and control characters become `_`.
/// Names that would escape the parent (`.`, `..`) or are empty become `_`.
pub fn sanitize_component(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = sanitized.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        return "_".to_string();
    }
    trimmed.to_string()
}
