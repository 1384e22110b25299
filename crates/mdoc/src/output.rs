//! Terminal output for the CLI.
//!
//! Status lines go to stderr so stdout carries only command results, such as
//! the YAML printed by `mdoc meta example`.

use console::{Style, Term};

pub(crate) struct Output {
    status: Term,
    result: Term,
    ok: Style,
    failure: Style,
    emphasis: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            status: Term::stderr(),
            result: Term::stdout(),
            ok: Style::new().green(),
            failure: Style::new().red().bold(),
            emphasis: Style::new().cyan().bold(),
        }
    }

    fn status_line(&self, line: &str, style: Option<&Style>) {
        let _ = match style {
            Some(style) => self.status.write_line(&style.apply_to(line).to_string()),
            None => self.status.write_line(line),
        };
    }

    /// Plain status line.
    pub(crate) fn info(&self, msg: &str) {
        self.status_line(msg, None);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.status_line(msg, Some(&self.ok));
    }

    pub(crate) fn error(&self, msg: &str) {
        self.status_line(msg, Some(&self.failure));
    }

    /// Line the user is expected to act on, e.g. the URL to open.
    pub(crate) fn highlight(&self, msg: &str) {
        self.status_line(msg, Some(&self.emphasis));
    }

    /// Command result on stdout, unstyled.
    pub(crate) fn data(&self, text: &str) {
        let _ = self.result.write_str(text);
    }
}
