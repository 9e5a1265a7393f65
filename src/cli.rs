use log::warn;
use tabled::{settings::Style, Table, Tabled};

use crate::diagnostic::StderrReport;
use crate::ir::{self, Ir};
use crate::lex::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// List the scanner's tokens.
    Scan,
    /// Parse and report success or every error.
    Parse,
    /// Parse and print the IR.
    Dump,
}

impl Mode {
    /// Picks the mode from the command-line flags. When several are given the
    /// most thorough one wins; with none, `Parse` is assumed.
    pub fn from_flags(scan: bool, parse: bool, dump: bool) -> Self {
        if [scan, parse, dump].iter().filter(|f| **f).count() > 1 {
            warn!("Please use only one command argument at a time");
        }

        if dump {
            Mode::Dump
        } else if parse {
            Mode::Parse
        } else if scan {
            Mode::Scan
        } else {
            Mode::Parse
        }
    }
}

#[derive(Tabled)]
struct IrRow {
    index: usize,
    opcode: &'static str,
    operand1: String,
    operand2: String,
    destination: String,
}

pub fn render_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| format!("{t}\n"))
        .collect()
}

pub fn render_ir_plain(ir: &Ir) -> String {
    ir.records().map(|rec| format!("{rec}\n")).collect()
}

pub fn render_ir_table(ir: &Ir) -> String {
    let rows: Vec<IrRow> = ir
        .records()
        .enumerate()
        .map(|(index, rec)| IrRow {
            index,
            opcode: rec.opcode.mnemonic(),
            operand1: ir::slot(rec.operand1),
            operand2: ir::slot(rec.operand2),
            destination: ir::slot(rec.destination),
        })
        .collect();

    Table::new(rows).with(Style::sharp()).to_string()
}

/// Runs one mode over `source`. Diagnostics go to stderr, everything else to
/// stdout. Returns whether the source was accepted.
pub fn run(mode: Mode, source: &str, plain: bool) -> bool {
    if mode == Mode::Scan {
        print!("{}", render_tokens(&crate::scan_only(source)));
        return true;
    }

    let report = crate::validate_with(source, &mut StderrReport);
    println!("{report}");

    if mode == Mode::Dump && report.is_success() {
        if plain {
            print!("{}", render_ir_plain(&report.ir));
        } else {
            println!("{}", render_ir_table(&report.ir));
        }
    }

    report.is_success()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mode_priority() {
        assert_eq!(Mode::from_flags(false, false, false), Mode::Parse);
        assert_eq!(Mode::from_flags(true, false, false), Mode::Scan);
        assert_eq!(Mode::from_flags(true, true, false), Mode::Parse);
        assert_eq!(Mode::from_flags(true, true, true), Mode::Dump);
        assert_eq!(Mode::from_flags(false, false, true), Mode::Dump);
    }

    #[test]
    fn plain_dump() {
        let ir = crate::validate("loadI 5 => r1\nload r1 => r2\noutput 5").ir;

        assert_eq!(
            render_ir_plain(&ir),
            "loadI 5 - 1\nload 1 - 2\noutput 5 - -\n"
        );
    }

    #[test]
    fn table_dump_has_every_record() {
        let ir = crate::validate("add r1, r2 => r3\nnop").ir;
        let table = render_ir_table(&ir);

        assert!(table.contains("opcode"));
        assert!(table.contains("destination"));
        assert!(table.contains("add"));
        assert!(table.contains("nop"));
        assert_eq!(table.lines().filter(|l| l.contains("│ add")).count(), 1);
    }

    #[test]
    fn token_dump() {
        let tokens = crate::scan_only("nop\n");

        assert_eq!(render_tokens(&tokens), "4 NOP, 9\n11 NEWLINE, -\n9 EOF, -\n");
    }
}
