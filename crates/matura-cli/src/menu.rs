//! Numbered selection menus read from the terminal.

use anyhow::Result;
use console::{Term, style};
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;
use matura_core::{Level, LevelChoice, SUBJECTS, SubjectChoice};

/// Parsed answer to a menu prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Zero-based index of the chosen option
    Pick(usize),
    Quit,
    Invalid(String),
}

/// Interprets one line of input for a menu with `len` options
pub fn parse_answer(input: &str, len: usize) -> Answer {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return Answer::Quit;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Answer::Pick(n - 1),
        Ok(_) => Answer::Invalid(format!(
            "Nieprawidłowy wybór. Wpisz liczbę 1-{} lub 'q' aby wyjść.",
            len
        )),
        Err(_) => Answer::Invalid("To nie jest liczba. Spróbuj ponownie.".to_string()),
    }
}

/// Accepts a number in range or `q`; the message is shown before re-prompting
fn validate_answer(input: &str, len: usize) -> std::result::Result<(), String> {
    match parse_answer(input, len) {
        Answer::Invalid(message) => Err(message),
        Answer::Pick(_) | Answer::Quit => Ok(()),
    }
}

/// Numbered menus prompted on the terminal
pub struct Menu {
    theme: ColorfulTheme,
}

impl Menu {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Shows `options` as a numbered list and returns the chosen value
    ///
    /// Re-prompts until the answer is valid. Returns `None` when the user
    /// types `q` or there is no terminal to prompt on.
    pub fn choose<T: Clone>(&self, title: &str, options: &[(String, T)]) -> Result<Option<T>> {
        // Non-interactive runs pass the selection as flags
        if !Term::stderr().is_term() {
            return Ok(None);
        }

        println!("\n{}", style(format!("Dostępne {}:", title)).bold());
        for (i, (label, _)) in options.iter().enumerate() {
            println!("{} {}", style(format!("{}.", i + 1)).cyan(), capitalize(label));
        }

        let len = options.len();
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(format!("Wybierz {} (liczba lub 'q')", title))
            .validate_with(move |input: &String| validate_answer(input, len))
            .interact_text()?;

        Ok(match parse_answer(&answer, len) {
            Answer::Pick(i) => Some(options[i].1.clone()),
            Answer::Quit | Answer::Invalid(_) => None,
        })
    }

    pub fn choose_subject(&self) -> Result<Option<SubjectChoice>> {
        let mut options: Vec<(String, SubjectChoice)> = SUBJECTS
            .iter()
            .map(|s| (s.name.to_string(), SubjectChoice::One(s)))
            .collect();
        options.push(("wszystkie przedmioty".to_string(), SubjectChoice::All));
        self.choose("przedmioty", &options)
    }

    pub fn choose_level(&self) -> Result<Option<LevelChoice>> {
        let options = [
            ("podstawowy".to_string(), LevelChoice::Single(Level::Basic)),
            ("rozszerzony".to_string(), LevelChoice::Single(Level::Extended)),
            ("oba poziomy".to_string(), LevelChoice::Both),
        ];
        self.choose("poziomy", &options)
    }

    /// Year menu; the last option means every year and yields `Some(None)`
    pub fn choose_year(&self, years: &[String]) -> Result<Option<Option<String>>> {
        let mut options: Vec<(String, Option<String>)> =
            years.iter().map(|y| (y.clone(), Some(y.clone()))).collect();
        options.push(("wszystkie lata".to_string(), None));
        self.choose("lata", &options)
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
