//! CLI entry point for the matura paper downloader.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use matura_core::{
    LevelChoice, MaturaScraper, NoProgress, Pipeline, Selection, SubjectChoice, sitting_folder,
};
use serde_json::json;
use tracing::{debug, info};

mod cli;
mod menu;
mod output;

use cli::Args;
use menu::Menu;
use output::{Console, ConsoleProgress};

/// Folder created next to the executable when `--output` is not given
const OUTPUT_DIR_NAME: &str = "matura_arkusze";

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let console = Console::new();
    let output_dir = resolve_output_dir(args.output.clone());

    if !args.list {
        println!("\n=== MATURALNY POBIERACZ ARKUSZY ===");
        println!("=== Wszystkie przedmioty i poziomy ===\n");
    }

    let result = run(&args, &output_dir, &console).await;

    let code = match &result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            console.abandon_progress();
            console.error(format!("Krytyczny błąd: {:#}", e));
            ExitCode::FAILURE
        }
    };

    // Keeps the JSON on stdout clean
    if let Ok(flow) = &result
        && !flow.reports_output_dir()
    {
        return code;
    }

    console.success(format!(
        "Zakończono! Pobrane arkusze znajdują się w:\n{}",
        display_dir(&output_dir)
    ));
    code
}

/// How a run ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Quit,
    Listed,
    Downloaded,
}

impl Flow {
    /// Whether the run ends by pointing the user at the output directory
    fn reports_output_dir(self) -> bool {
        !matches!(self, Flow::Listed)
    }
}

async fn run(args: &Args, output_dir: &Path, console: &Console) -> Result<Flow> {
    let scraper = MaturaScraper::new().context("failed to initialise HTTP client")?;

    let Some(selection) = build_selection(args, &scraper, console).await? else {
        return Ok(Flow::Quit);
    };
    info!(?selection, output = %output_dir.display(), "selection complete");

    let pipeline = Pipeline::new(scraper, output_dir);

    if args.list {
        let plan = pipeline.plan(&selection, &NoProgress).await;
        let items: Vec<_> = plan
            .items()
            .map(|(subject, level, sitting)| {
                json!({
                    "subject": subject.slug,
                    "level": level,
                    "sitting": sitting,
                    "folder": sitting_folder(output_dir, subject.slug, level, sitting),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(Flow::Listed);
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    console.info("Przygotowywanie listy pobierania...");
    let progress = ConsoleProgress::new(console);
    let plan = pipeline.plan(&selection, &progress).await;
    let summary = pipeline.execute(&plan, &progress).await;
    console.finish_progress();

    console.success(format!(
        "Pobrano łącznie {}/{} arkuszy",
        summary.downloaded, summary.total
    ));
    if summary.failed > 0 {
        console.error(format!("Nie udało się pobrać {} arkuszy", summary.failed));
    }
    Ok(Flow::Downloaded)
}

/// Builds the selection from flags, asking through menus for anything missing
///
/// Returns `None` if the user quits at a menu.
async fn build_selection(
    args: &Args,
    scraper: &MaturaScraper,
    console: &Console,
) -> Result<Option<Selection>> {
    let menu = Menu::new();

    if args.subject.is_none() {
        println!("\n=== WYBÓR ZAKRESU POBRANIA ===");
    }
    let subjects = match args.subject {
        Some(choice) => choice,
        None => match menu.choose_subject()? {
            Some(choice) => choice,
            None => return Ok(None),
        },
    };

    let level = match args.level {
        Some(arg) => LevelChoice::from(arg),
        None => match menu.choose_level()? {
            Some(choice) => choice,
            None => return Ok(None),
        },
    };

    let year = match (&args.year, subjects) {
        (Some(year), _) => Some(year.clone()),
        // Flags-only runs never block on a prompt
        (None, _) if args.subject.is_some() && args.level.is_some() => None,
        (None, SubjectChoice::All) => None,
        (None, SubjectChoice::One(subject)) => {
            let first_level = level.levels()[0];
            match scraper.available_years(subject.slug, first_level).await {
                Ok(years) => match menu.choose_year(&years)? {
                    Some(year) => year,
                    None => return Ok(None),
                },
                Err(e) => {
                    console.error(format!(
                        "Nie udało się pobrać listy lat ({}), pobieram wszystkie lata",
                        e
                    ));
                    None
                }
            }
        }
    };

    Ok(Some(Selection {
        subjects,
        level,
        year,
    }))
}

fn resolve_output_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(OUTPUT_DIR_NAME)
}

fn display_dir(dir: &Path) -> String {
    std::fs::canonicalize(dir)
        .unwrap_or_else(|_| dir.to_path_buf())
        .display()
        .to_string()
}
