//! Operator-facing capabilities injected into the merge engine
//!
//! The engine never prints or reads stdin directly. The CLI supplies
//! terminal-backed implementations; tests supply recording ones.

use crate::error::Result;

/// Receives user-facing progress output
pub trait Reporter {
    /// Normal progress step (e.g. "Checking out feature-x")
    fn on_step(&self, message: &str);

    /// Highlighted milestone (e.g. "Rebasing feature-x onto main")
    fn on_highlight(&self, message: &str) {
        self.on_step(message);
    }

    /// Successful completion
    fn on_success(&self, message: &str) {
        self.on_step(message);
    }

    /// Something worth the operator's attention that doesn't stop the run
    fn on_warning(&self, message: &str);

    /// A failure
    fn on_error(&self, message: &str);

    /// A failure that leaves the repository needing manual repair
    fn on_fatal(&self, message: &str) {
        self.on_error(message);
    }

    /// Preview of the commits about to be pushed
    fn on_preview(&self, lines: &[String]);
}

/// Asks the operator yes/no questions
pub trait Prompter {
    /// Ask a question. Anything other than an explicit yes is `false`.
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Reporter that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn on_step(&self, _message: &str) {}
    fn on_warning(&self, _message: &str) {}
    fn on_error(&self, _message: &str) {}
    fn on_preview(&self, _lines: &[String]) {}
}
