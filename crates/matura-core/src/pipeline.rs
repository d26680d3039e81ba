//! Crawl-and-download pipeline
//!
//! Drives the listing fetcher, year filter and detail downloader across every
//! (subject, level) pair of a [`Selection`]. Runs in two phases:
//!
//! 1. [`Pipeline::plan`] fetches each listing once, applies the year filter
//!    and counts the downloadable sittings so a progress bar can be sized.
//! 2. [`Pipeline::execute`] downloads the planned sittings one at a time,
//!    pausing between items, and tallies the results.
//!
//! Failures never abort the run: a listing that cannot be fetched contributes
//! nothing, and a sitting that cannot be downloaded counts as failed.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::client::RateLimiter;
use crate::filter::{available_years, filter_by_year};
use crate::paths::sitting_folder;
use crate::scraper::MaturaScraper;
use crate::types::{ExamSitting, Level, Selection, Subject};

/// What one listing contributes to a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingOutcome {
    /// Sittings that matched the year and link to a detail page
    Ready(Vec<ExamSitting>),
    /// The listing exists but nothing in it is downloadable
    NoSittings,
    /// A specific year was requested and the listing has no sitting from it
    YearUnavailable { year: String, available: Vec<String> },
    /// The listing could not be fetched or parsed
    Failed(String),
}

impl ListingOutcome {
    /// Number of sittings this listing will download
    pub fn item_count(&self) -> usize {
        match self {
            ListingOutcome::Ready(sittings) => sittings.len(),
            _ => 0,
        }
    }
}

/// Result of downloading a single sitting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Downloaded(PathBuf),
    Failed(String),
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Downloaded(_))
    }
}

/// Planned work for one (subject, level) pair
#[derive(Debug, Clone)]
pub struct ListingBatch {
    pub subject: &'static Subject,
    pub level: Level,
    pub outcome: ListingOutcome,
}

/// Counting-pass result, consumed by [`Pipeline::execute`]
#[derive(Debug, Clone, Default)]
pub struct DownloadPlan {
    pub batches: Vec<ListingBatch>,
}

impl DownloadPlan {
    /// Total number of sittings the plan will attempt
    pub fn total(&self) -> usize {
        self.batches.iter().map(|b| b.outcome.item_count()).sum()
    }

    /// Planned sittings with their subject and level, in processing order
    pub fn items(&self) -> impl Iterator<Item = (&'static Subject, Level, &ExamSitting)> + '_ {
        self.batches.iter().flat_map(|batch| {
            let sittings: &[ExamSitting] = match &batch.outcome {
                ListingOutcome::Ready(sittings) => sittings,
                _ => &[],
            };
            sittings.iter().map(move |s| (batch.subject, batch.level, s))
        })
    }
}

/// Totals reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Sittings saved to disk
    pub downloaded: usize,
    /// Sittings attempted but not saved
    pub failed: usize,
    /// Sittings counted by the planning pass
    pub total: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &ItemOutcome) {
        if outcome.is_success() {
            self.downloaded += 1;
        } else {
            self.failed += 1;
        }
    }
}

impl std::ops::Add for RunSummary {
    type Output = RunSummary;

    fn add(self, other: RunSummary) -> RunSummary {
        RunSummary {
            downloaded: self.downloaded + other.downloaded,
            failed: self.failed + other.failed,
            total: self.total + other.total,
        }
    }
}

/// Receives pipeline events, e.g. to drive a progress bar
///
/// All methods default to no-ops.
pub trait ProgressSink {
    /// A listing has been fetched and classified
    fn on_listing(&self, _subject: &Subject, _level: Level, _outcome: &ListingOutcome) {}

    /// The counting pass is done; `total` items will be attempted
    fn on_plan_ready(&self, _total: usize) {}

    /// A sitting is about to be downloaded
    fn on_item_start(&self, _sitting: &ExamSitting) {}

    /// A sitting has been processed
    fn on_item_finished(&self, _sitting: &ExamSitting, _outcome: &ItemOutcome) {}
}

/// Sink that ignores every event
pub struct NoProgress;

impl ProgressSink for NoProgress {}

/// Classifies a fetched listing against the requested year
///
/// If `year` is given and no sitting's year suffix equals it, the listing is
/// reported as [`ListingOutcome::YearUnavailable`]. Otherwise sittings are
/// filtered by date substring and those without a detail link are dropped.
pub fn classify_listing(sittings: Vec<ExamSitting>, year: Option<&str>) -> ListingOutcome {
    let year = year.map(str::trim).filter(|y| !y.is_empty());

    if let Some(year) = year {
        let available = available_years(&sittings);
        if !available.iter().any(|y| y == year) {
            return ListingOutcome::YearUnavailable {
                year: year.to_string(),
                available,
            };
        }
    }

    let ready: Vec<ExamSitting> = filter_by_year(sittings, year)
        .into_iter()
        .filter(|s| s.detail_url.is_some())
        .collect();

    if ready.is_empty() {
        ListingOutcome::NoSittings
    } else {
        ListingOutcome::Ready(ready)
    }
}

/// Sequential crawl-and-download driver
pub struct Pipeline {
    scraper: MaturaScraper,
    output_root: PathBuf,
    rate_limiter: RateLimiter,
}

impl Pipeline {
    /// Create a pipeline writing under `output_root`
    ///
    /// The pause between item downloads comes from the scraper's
    /// `item_delay_ms` setting.
    pub fn new(scraper: MaturaScraper, output_root: impl Into<PathBuf>) -> Self {
        let delay = Duration::from_millis(scraper.config().item_delay_ms);
        Self {
            scraper,
            output_root: output_root.into(),
            rate_limiter: RateLimiter::with_interval(delay),
        }
    }

    /// Counting pass: fetch every selected listing once and classify it
    ///
    /// Fetch errors are recorded as [`ListingOutcome::Failed`] and count as
    /// zero items.
    pub async fn plan(&self, selection: &Selection, sink: &dyn ProgressSink) -> DownloadPlan {
        let year = selection.year_filter();
        let mut batches = Vec::new();

        for (subject, level) in selection.pairs() {
            let outcome = match self.scraper.fetch_listing(subject.slug, level).await {
                Ok(sittings) => classify_listing(sittings, year),
                Err(e) => {
                    warn!(subject = subject.slug, %level, error = %e, "listing fetch failed");
                    ListingOutcome::Failed(e.to_string())
                }
            };

            info!(
                subject = subject.slug,
                %level,
                items = outcome.item_count(),
                "listing classified"
            );
            sink.on_listing(subject, level, &outcome);
            batches.push(ListingBatch {
                subject,
                level,
                outcome,
            });
        }

        let plan = DownloadPlan { batches };
        sink.on_plan_ready(plan.total());
        plan
    }

    /// Main pass: download every planned sitting in order
    pub async fn execute(&self, plan: &DownloadPlan, sink: &dyn ProgressSink) -> RunSummary {
        let mut summary = RunSummary {
            total: plan.total(),
            ..RunSummary::default()
        };

        for (subject, level, sitting) in plan.items() {
            let outcome = self.download_one(subject, level, sitting, sink).await;
            summary.record(&outcome);
        }

        info!(
            downloaded = summary.downloaded,
            failed = summary.failed,
            total = summary.total,
            "run finished"
        );
        summary
    }

    /// Plan and execute a selection in one call
    pub async fn run(&self, selection: &Selection, sink: &dyn ProgressSink) -> RunSummary {
        let plan = self.plan(selection, sink).await;
        self.execute(&plan, sink).await
    }

    async fn download_one(
        &self,
        subject: &Subject,
        level: Level,
        sitting: &ExamSitting,
        sink: &dyn ProgressSink,
    ) -> ItemOutcome {
        self.rate_limiter.acquire().await;
        sink.on_item_start(sitting);

        let outcome = match sitting.detail_url.as_deref() {
            Some(detail_url) => {
                let folder = sitting_folder(&self.output_root, subject.slug, level, sitting);
                match self.scraper.download_sitting(detail_url, &folder).await {
                    Ok(path) => ItemOutcome::Downloaded(path),
                    Err(e) => {
                        warn!(url = detail_url, error = %e, "sitting download failed");
                        ItemOutcome::Failed(e.to_string())
                    }
                }
            }
            None => ItemOutcome::Failed("sitting has no detail link".to_string()),
        };

        sink.on_item_finished(sitting, &outcome);
        outcome
    }
}
