//! Terminal output utilities.

use std::io;

use console::{Style, Term};

/// Terminal output formatter.
///
/// Messages go to stderr; command results go to stdout so they can be piped.
pub(crate) struct Output {
    stdout: Term,
    stderr: Term,
    dim: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            stdout: Term::stdout(),
            stderr: Term::stderr(),
            dim: Style::new().dim(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Write a line of command output to stdout.
    pub(crate) fn print(&self, line: &str) -> io::Result<()> {
        self.stdout.write_line(line)
    }

    /// Write a highlighted heading to stdout.
    pub(crate) fn heading(&self, line: &str) -> io::Result<()> {
        self.stdout
            .write_line(&self.cyan_bold.apply_to(line).to_string())
    }

    /// Write a de-emphasized line to stdout.
    pub(crate) fn detail(&self, line: &str) -> io::Result<()> {
        self.stdout.write_line(&self.dim.apply_to(line).to_string())
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.stderr.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.stderr.write_line(&self.red.apply_to(msg).to_string());
    }
}
