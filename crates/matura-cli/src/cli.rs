//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use matura_core::{Level, LevelChoice, SubjectChoice, subject_by_slug};

/// Download past matura exam papers from arkusze.pl.
///
/// Without selection flags the program asks for subject, level and year
/// through numbered menus. Type `q` at any menu to quit.
#[derive(Parser, Debug)]
#[command(name = "matura")]
#[command(author, version, about)]
pub struct Args {
    /// Subject slug (e.g. "matematyka", "jezyk-polski") or "all"
    #[arg(short, long, value_parser = parse_subject)]
    pub subject: Option<SubjectChoice>,

    /// Exam level
    #[arg(short, long, value_enum)]
    pub level: Option<LevelArg>,

    /// Year to download (e.g. 2023); omit for every year
    #[arg(short, long, value_parser = parse_year)]
    pub year: Option<String>,

    /// Output directory (default: `matura_arkusze` next to the executable)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the sittings that would be downloaded as JSON and exit
    #[arg(long)]
    pub list: bool,

    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Default `tracing` filter directive for the chosen verbosity
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Level as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LevelArg {
    #[value(alias = "podstawowy")]
    Basic,
    #[value(alias = "rozszerzony")]
    Extended,
    #[value(alias = "oba")]
    Both,
}

impl From<LevelArg> for LevelChoice {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Basic => LevelChoice::Single(Level::Basic),
            LevelArg::Extended => LevelChoice::Single(Level::Extended),
            LevelArg::Both => LevelChoice::Both,
        }
    }
}

fn parse_subject(value: &str) -> Result<SubjectChoice, String> {
    let value = value.trim().to_lowercase();
    if value == "all" || value == "wszystkie" {
        return Ok(SubjectChoice::All);
    }
    subject_by_slug(&value)
        .map(SubjectChoice::One)
        .ok_or_else(|| format!("unknown subject '{}'", value))
}

fn parse_year(value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.len() == 4 && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(value.to_string())
    } else {
        Err(format!("'{}' is not a four-digit year", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["matura"]).unwrap();
        assert!(args.subject.is_none());
        assert!(args.level.is_none());
        assert!(args.year.is_none());
        assert!(!args.list);
        assert_eq!(args.log_level(), "warn");
    }

    #[test]
    fn test_cli_full_selection() {
        let args = Args::try_parse_from([
            "matura",
            "--subject",
            "jezyk-polski",
            "--level",
            "both",
            "--year",
            "2023",
        ])
        .unwrap();

        match args.subject {
            Some(SubjectChoice::One(subject)) => assert_eq!(subject.slug, "jezyk-polski"),
            other => panic!("Expected single subject, got {:?}", other),
        }
        assert_eq!(args.level, Some(LevelArg::Both));
        assert_eq!(args.year.as_deref(), Some("2023"));
    }

    #[test]
    fn test_cli_polish_level_alias() {
        let args = Args::try_parse_from(["matura", "-l", "rozszerzony"]).unwrap();
        assert_eq!(
            args.level.map(LevelChoice::from),
            Some(LevelChoice::Single(Level::Extended))
        );
    }

    #[test]
    fn test_cli_all_subjects() {
        let args = Args::try_parse_from(["matura", "-s", "all"]).unwrap();
        assert_eq!(args.subject, Some(SubjectChoice::All));
    }

    #[test]
    fn test_cli_rejects_unknown_subject() {
        assert!(Args::try_parse_from(["matura", "-s", "astrologia"]).is_err());
    }

    #[test]
    fn test_cli_rejects_malformed_year() {
        assert!(Args::try_parse_from(["matura", "-y", "23"]).is_err());
        assert!(Args::try_parse_from(["matura", "-y", "20x3"]).is_err());
    }

    #[test]
    fn test_cli_verbosity_levels() {
        let args = Args::try_parse_from(["matura", "-vv"]).unwrap();
        assert_eq!(args.log_level(), "debug");

        let args = Args::try_parse_from(["matura", "-q", "-v"]).unwrap();
        assert_eq!(args.log_level(), "error");
    }
}
