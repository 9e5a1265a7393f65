pub mod diagnostic;
pub mod error;
pub mod ir;
pub mod lex;
pub mod parse;

pub mod cli;

use std::fs;
use std::path::Path;

use diagnostic::{CollectReport, Diagnostic, Report};
use error::FrontEndError;
use ir::Ir;
use lex::Token;
use parse::ParseReport;

/// Result of checking a source text: the IR of every accepted line plus one
/// diagnostic per rejected line.
#[derive(Debug)]
pub struct Validation {
    pub ir: Ir,
    pub diagnostics: Vec<Diagnostic>,
}

impl Validation {
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

pub fn scan_only(source: &str) -> Vec<Token> {
    lex::scan(source)
}

pub fn validate(source: &str) -> Validation {
    let mut sink = CollectReport::default();
    let report = parse::parse(source, &mut sink);

    Validation {
        ir: report.ir,
        diagnostics: sink.into_inner(),
    }
}

pub fn validate_with<R: Report>(source: &str, reporter: &mut R) -> ParseReport {
    parse::parse(source, reporter)
}

pub fn read_source(path: &Path) -> Result<String, FrontEndError> {
    fs::read_to_string(path).map_err(|source| FrontEndError::Io {
        path: path.to_owned(),
        source,
    })
}
