//! CLI implementations of the engine's operator capabilities

pub mod auth;
pub mod context;
pub mod list;
pub mod merge;
pub mod style;

use anstream::{eprintln, println};
use dialoguer::Confirm;
use linmerge::error::{Error, Result};
use linmerge::merge::{Prompter, Reporter};
use style::Stylize;

/// Reporter printing to the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct CliReporter;

impl Reporter for CliReporter {
    fn on_step(&self, message: &str) {
        println!("| {message}");
    }

    fn on_highlight(&self, message: &str) {
        println!("| {}", message.accent());
    }

    fn on_success(&self, message: &str) {
        println!("| {}", message.success());
    }

    fn on_warning(&self, message: &str) {
        eprintln!("{}", format!("Warning: {message}").warn());
    }

    fn on_error(&self, message: &str) {
        eprintln!("{}", format!("Error: {message}").error());
    }

    fn on_fatal(&self, message: &str) {
        eprintln!("{}", format!("Fatal: {message}").fatal());
    }

    fn on_preview(&self, lines: &[String]) {
        println!("| Confirm merge:");
        for line in lines {
            println!("  {}", line.muted());
        }
    }
}

/// Prompter reading y/n answers from the terminal, defaulting to no
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, question: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(question)
            .default(false)
            .wait_for_newline(true)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))
    }
}
