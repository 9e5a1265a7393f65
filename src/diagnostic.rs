use std::fmt;

use crate::parse::SyntaxError;

/// A syntax problem attributed to the line its statement started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    pub error: SyntaxError,
}

impl Diagnostic {
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.line, self.error)
    }
}

/// Receives diagnostics as the parser discovers them.
pub trait Report {
    fn report(&mut self, diagnostic: &Diagnostic);
}

/// Streams each diagnostic to stderr as `line: message`.
#[derive(Default)]
pub struct StderrReport;

impl Report for StderrReport {
    fn report(&mut self, diagnostic: &Diagnostic) {
        eprintln!("{diagnostic}");
    }
}

#[derive(Debug, Default)]
pub struct CollectReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectReport {
    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl Report for CollectReport {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }
}
