//! Core data types for the matura paper scraper
//!
//! Contains the subject/level tables, the user's selection and the records
//! extracted from listing and detail pages.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A school subject as published on the exam archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Subject {
    /// Human-readable Polish name (e.g., "język polski")
    pub name: &'static str,

    /// URL slug used in listing URLs (e.g., "jezyk-polski")
    pub slug: &'static str,
}

/// All subjects in the order they are offered and processed
pub static SUBJECTS: [Subject; 12] = [
    Subject {
        name: "matematyka",
        slug: "matematyka",
    },
    Subject {
        name: "język polski",
        slug: "jezyk-polski",
    },
    Subject {
        name: "język angielski",
        slug: "jezyk-angielski",
    },
    Subject {
        name: "język niemiecki",
        slug: "jezyk-niemiecki",
    },
    Subject {
        name: "języki obce",
        slug: "jezyki-obce",
    },
    Subject {
        name: "geografia",
        slug: "geografia",
    },
    Subject {
        name: "biologia",
        slug: "biologia",
    },
    Subject {
        name: "chemia",
        slug: "chemia",
    },
    Subject {
        name: "fizyka",
        slug: "fizyka",
    },
    Subject {
        name: "informatyka",
        slug: "informatyka",
    },
    Subject {
        name: "historia",
        slug: "historia",
    },
    Subject {
        name: "wos",
        slug: "wos",
    },
];

/// Looks up a subject by its slug
///
/// # Example
/// ```
/// use matura_core::subject_by_slug;
/// assert_eq!(subject_by_slug("jezyk-polski").map(|s| s.name), Some("język polski"));
/// assert!(subject_by_slug("astrologia").is_none());
/// ```
pub fn subject_by_slug(slug: &str) -> Option<&'static Subject> {
    SUBJECTS.iter().find(|s| s.slug == slug)
}

/// Exam level of a single listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// "poziom podstawowy"
    Basic,
    /// "poziom rozszerzony"
    Extended,
}

impl Level {
    /// URL slug used in listing URLs and folder names
    pub fn slug(self) -> &'static str {
        match self {
            Level::Basic => "podstawowy",
            Level::Extended => "rozszerzony",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Level as chosen by the user; `Both` expands to basic then extended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChoice {
    Single(Level),
    Both,
}

impl LevelChoice {
    /// Concrete levels in processing order
    pub fn levels(self) -> Vec<Level> {
        match self {
            LevelChoice::Single(level) => vec![level],
            LevelChoice::Both => vec![Level::Basic, Level::Extended],
        }
    }
}

/// Subject scope as chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectChoice {
    One(&'static Subject),
    All,
}

impl SubjectChoice {
    /// Concrete subjects in processing order
    pub fn subjects(self) -> Vec<&'static Subject> {
        match self {
            SubjectChoice::One(subject) => vec![subject],
            SubjectChoice::All => SUBJECTS.iter().collect(),
        }
    }
}

/// Complete download request: which listings to visit and which year to keep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub subjects: SubjectChoice,
    pub level: LevelChoice,
    /// `None` means every year
    pub year: Option<String>,
}

impl Selection {
    /// Expands the selection into (subject, level) pairs
    ///
    /// Subjects come in table order and levels within a subject in
    /// basic-then-extended order.
    pub fn pairs(&self) -> Vec<(&'static Subject, Level)> {
        let levels = self.level.levels();
        self.subjects
            .subjects()
            .into_iter()
            .flat_map(|subject| levels.iter().map(move |&level| (subject, level)))
            .collect()
    }

    /// Requested year with empty strings treated as "all years"
    pub fn year_filter(&self) -> Option<&str> {
        self.year.as_deref().map(str::trim).filter(|y| !y.is_empty())
    }
}

/// One exam sitting parsed from a listing-page table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSitting {
    /// Free-text date, e.g. "8 maja 2023"; the last four characters are the year
    pub date: String,

    /// Exam variant label (e.g., "Formuła 2023")
    pub exam_type: String,

    /// Organizer name (e.g., "CKE")
    pub organizer: String,

    /// Absolute URL of the detail page, if the row links to one
    pub detail_url: Option<String>,
}

impl ExamSitting {
    /// Year suffix of the date text
    ///
    /// # Example
    /// ```
    /// use matura_core::ExamSitting;
    /// let sitting = ExamSitting {
    ///     date: "8 maja 2023".to_string(),
    ///     exam_type: "Formuła 2023".to_string(),
    ///     organizer: "CKE".to_string(),
    ///     detail_url: None,
    /// };
    /// assert_eq!(sitting.year(), "2023");
    /// ```
    pub fn year(&self) -> &str {
        let start = self
            .date
            .char_indices()
            .rev()
            .nth(3)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        &self.date[start..]
    }

    /// Label used for the sitting's folder: `<date> <type> <organizer>`
    pub fn label(&self) -> String {
        format!("{} {} {}", self.date, self.exam_type, self.organizer)
    }
}

/// A PDF link found on a detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfLink {
    /// Absolute PDF URL
    pub url: String,

    /// File stem derived from the anchor text, or the URL when the anchor is empty
    pub name: String,
}

/// Where a single PDF is fetched from and where it is written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub pdf_url: String,
    pub suggested_name: String,
    pub destination_folder: PathBuf,
}

impl DownloadTarget {
    /// Full path of the file written for this target: `<folder>/<name>.pdf`
    pub fn file_path(&self) -> PathBuf {
        self.destination_folder
            .join(format!("{}.pdf", self.suggested_name))
    }
}
