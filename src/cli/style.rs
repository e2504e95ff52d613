//! Terminal styling helpers

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream};
use std::fmt::Display;

/// Check mark used in summaries
pub const CHECK: &str = "✓";

/// Semantic colors for CLI output
pub trait Stylize {
    /// De-emphasised text
    fn muted(&self) -> String;
    /// Bold text
    fn emphasis(&self) -> String;
    /// Branch names, PR numbers
    fn accent(&self) -> String;
    /// Success
    fn success(&self) -> String;
    /// Warnings
    fn warn(&self) -> String;
    /// Errors
    fn error(&self) -> String;
    /// Unrecoverable errors
    fn fatal(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn muted(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.dimmed()).to_string()
    }

    fn emphasis(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.bold()).to_string()
    }

    fn accent(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.cyan()).to_string()
    }

    fn success(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.green()).to_string()
    }

    fn warn(&self) -> String {
        self.if_supports_color(Stream::Stderr, |t| t.yellow()).to_string()
    }

    fn error(&self) -> String {
        self.if_supports_color(Stream::Stderr, |t| t.red()).to_string()
    }

    fn fatal(&self) -> String {
        self.if_supports_color(Stream::Stderr, |t| t.bold().red().to_string())
            .to_string()
    }
}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Spinner used while waiting on GitHub
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}

/// Render a URL as a terminal hyperlink when supported
pub fn hyperlink(text: &str, url: &str) -> String {
    if url.is_empty() || !supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        return text.to_string();
    }
    terminal_link::Link::new(text, url).to_string()
}
