//! Categorized console output and the download progress bar.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use matura_core::{ExamSitting, ItemOutcome, Level, ListingOutcome, ProgressSink, Subject};

/// Category of a user-facing log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Info,
    Success,
    Error,
}

impl LogKind {
    fn tag(self) -> String {
        match self {
            LogKind::Info => style("[INFO]").blue().to_string(),
            LogKind::Success => style("[SUKCES]").green().to_string(),
            LogKind::Error => style("[BŁĄD]").red().to_string(),
        }
    }
}

/// Formats a log line as `[TAG] message`
pub fn format_line(kind: LogKind, message: &str) -> String {
    format!("{} {}", kind.tag(), message)
}

/// Console printer that keeps log lines from tearing the progress bar
///
/// The bar stays hidden until the counting pass reports a total.
pub struct Console {
    bar: ProgressBar,
}

impl Console {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::hidden());
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_message("Postęp ogólny");
        Self { bar }
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogKind::Info, message.as_ref());
    }

    pub fn success(&self, message: impl AsRef<str>) {
        self.log(LogKind::Success, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogKind::Error, message.as_ref());
    }

    pub fn log(&self, kind: LogKind, message: &str) {
        let line = format_line(kind, message);
        self.bar.suspend(|| println!("{}", line));
    }

    /// Show the bar sized for `total` items
    pub fn start_progress(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
        self.bar.enable_steady_tick(Duration::from_millis(200));
    }

    pub fn finish_progress(&self) {
        self.bar.finish();
    }

    /// Stop the bar where it is, e.g. before reporting a fatal error
    pub fn abandon_progress(&self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

/// Reports pipeline events on the console while downloading
pub struct ConsoleProgress<'a> {
    console: &'a Console,
}

impl<'a> ConsoleProgress<'a> {
    pub fn new(console: &'a Console) -> Self {
        Self { console }
    }
}

impl ProgressSink for ConsoleProgress<'_> {
    fn on_listing(&self, subject: &Subject, level: Level, outcome: &ListingOutcome) {
        let scope = format!("{} {}", subject.name, level);
        match outcome {
            ListingOutcome::Ready(items) => {
                self.console
                    .info(format!("Przetwarzam: {} ({} arkuszy)", scope, items.len()));
            }
            ListingOutcome::NoSittings => {
                self.console.info(format!("Brak arkuszy do pobrania: {}", scope));
            }
            ListingOutcome::YearUnavailable { year, .. } => {
                self.console
                    .error(format!("Brak danych dla roku {} w {}", year, scope));
            }
            ListingOutcome::Failed(reason) => {
                self.console.error(format!("Błąd przy {}: {}", scope, reason));
            }
        }
    }

    fn on_plan_ready(&self, total: usize) {
        self.console.start_progress(total);
    }

    fn on_item_start(&self, sitting: &ExamSitting) {
        self.console.info(format!(
            "  Przetwarzam: {} {}",
            sitting.date, sitting.exam_type
        ));
    }

    fn on_item_finished(&self, sitting: &ExamSitting, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Downloaded(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.console.success(format!("    Zapisano: {}", name));
            }
            ItemOutcome::Failed(reason) => {
                self.console
                    .error(format!("    Błąd przy {}: {}", sitting.label(), reason));
            }
        }
        self.console.bar.inc(1);
    }
}
