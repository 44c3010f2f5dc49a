//! # Confirmation Module
//!
//! Domande interattive della CLI: risposte Y/N, directory e lunghezza massima.
//!
//! ## Responsabilità:
//! - Parsing delle risposte Y/N (inglese e sloveno, case-insensitive)
//! - Loop esplicito di ri-domanda finché la risposta non è riconosciuta
//! - Astrazione `Prompt` per testare le domande senza un terminale
//!
//! ## Risposte riconosciute:
//! - **Sì**: `y`, `ye`, `yes`, `d`, `da`
//! - **No**: `n`, `no`, `ne`
//! - Qualsiasi altra risposta → `UnrecognizedConfirmation`, la domanda viene ripetuta

use crate::config::Config;
use crate::error::NormalizeError;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

const YES_ANSWERS: &[&str] = &["y", "ye", "yes", "d", "da"];
const NO_ANSWERS: &[&str] = &["n", "no", "ne"];

/// A recognized yes/no answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl FromStr for Answer {
    type Err = NormalizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let answer = s.trim().to_lowercase();
        if YES_ANSWERS.contains(&answer.as_str()) {
            Ok(Self::Yes)
        } else if NO_ANSWERS.contains(&answer.as_str()) {
            Ok(Self::No)
        } else {
            Err(NormalizeError::UnrecognizedConfirmation(s.trim().to_string()))
        }
    }
}

/// Source of answers for interactive questions
pub trait Prompt {
    /// Ask `question` and return the raw answer
    fn ask(&mut self, question: &str) -> io::Result<String>;

    /// Show a message to the user (rejected answers, notices)
    fn tell(&mut self, message: &str) -> io::Result<()>;
}

/// Line-based prompt over any reader/writer pair
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt for ConsolePrompt<R, W> {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{}\n>> ", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("No answer given to: {}", question),
            ));
        }
        Ok(line.trim().to_string())
    }

    fn tell(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }
}

/// Ask a yes/no question until a recognized answer comes back
pub fn request_answer<P: Prompt>(prompt: &mut P, question: &str) -> io::Result<Answer> {
    loop {
        let raw = prompt.ask(question)?;
        match raw.parse::<Answer>() {
            Ok(answer) => return Ok(answer),
            Err(e) => {
                warn!("{}", e);
                prompt.tell("Unknown answer. Only Y/N are valid.")?;
            }
        }
    }
}

/// Ask whether to back up the images before normalizing
pub fn request_backup_decision<P: Prompt>(prompt: &mut P) -> io::Result<bool> {
    let answer = request_answer(prompt, "Create a backup copy of the images? [Y/N]")?;
    if !answer.is_yes() {
        prompt.tell("No backup will be made. Continuing without a copy...")?;
    }
    Ok(answer.is_yes())
}

/// Ask for the image directory
pub fn request_directory<P: Prompt>(prompt: &mut P) -> io::Result<PathBuf> {
    loop {
        let raw = prompt.ask("Directory with images:")?;
        let path = PathBuf::from(raw.trim());
        if path.is_dir() {
            return Ok(path);
        }
        prompt.tell(&format!("Not a directory: {}", path.display()))?;
    }
}

/// Ask for the maximum longer edge, double-checking unusual values
pub fn request_max_length<P: Prompt>(prompt: &mut P) -> io::Result<u32> {
    loop {
        let raw = prompt.ask("Enter the maximum length of the image (in pixels):")?;
        let max_length = match raw.trim().parse::<u32>() {
            Ok(value) if value > 0 => value,
            _ => {
                prompt.tell("The length must be a positive whole number.")?;
                continue;
            }
        };

        if !Config::is_suspicious_length(max_length) {
            return Ok(max_length);
        }

        let question = format!("Are you sure you meant {}px? [Y/N]", max_length);
        if request_answer(prompt, &question)?.is_yes() {
            return Ok(max_length);
        }
    }
}
