use std::fmt;

use log::{debug, info};
use thiserror::Error;

use crate::diagnostic::{Diagnostic, Report};
use crate::ir::{ArithOp, Instruction, Ir, MemOp};
use crate::lex::{Scanner, TokenKind};

/// Statement classes, one fixed grammar each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    MemOp,
    LoadI,
    ArithOp,
    Output,
    Nop,
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Class::MemOp => "MEMOP",
            Class::LoadI => "LOADI",
            Class::ArithOp => "ARITHOP",
            Class::Output => "OUTPUT",
            Class::Nop => "NOP",
        };
        f.write_str(name)
    }
}

/// A grammar position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Register,
    Constant,
    Comma,
    Into,
    EndOfLine,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Expected::Register => "REG",
            Expected::Constant => "CONST",
            Expected::Comma => "COMMA",
            Expected::Into => "INTO",
            Expected::EndOfLine => "end of line",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("Incorrect {class} syntax: expected {expected}, found {found}")]
    Incorrect {
        class: Class,
        expected: Expected,
        found: TokenKind,
    },
    #[error("Statement must start with an Opcode, found {found}")]
    NotAnOpcode { found: TokenKind },
}

impl SyntaxError {
    /// The token that broke the statement; it has already been consumed.
    pub fn found(&self) -> TokenKind {
        match self {
            SyntaxError::Incorrect { found, .. } | SyntaxError::NotAnOpcode { found } => *found,
        }
    }
}

/// Line bookkeeping shared by every grammar check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserState {
    pub line: u32,
    /// Set while the rest of a broken line still has to be discarded.
    pub pending_resync: bool,
}

impl Default for ParserState {
    fn default() -> Self {
        Self {
            line: 1,
            pending_resync: false,
        }
    }
}

/// Outcome of one parse: the IR and how many lines were rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReport {
    pub ir: Ir,
    pub error_count: usize,
}

impl ParseReport {
    pub fn is_success(&self) -> bool {
        self.error_count == 0
    }

    pub fn instruction_count(&self) -> usize {
        self.ir.len()
    }
}

impl fmt::Display for ParseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            write!(
                f,
                "Parse succeeded: {} operations parsed successfully",
                self.ir.len()
            )
        } else {
            write!(f, "Parse found errors on {} lines", self.error_count)
        }
    }
}

struct Parser<'a, R: Report> {
    scanner: Scanner<'a>,
    state: ParserState,
    ir: Ir,
    reporter: &'a mut R,
    error_count: usize,
    last_reported: Option<u32>,
}

impl<'a, R: Report> Parser<'a, R> {
    fn new(source: &'a str, reporter: &'a mut R) -> Self {
        Self {
            scanner: Scanner::new(source),
            state: ParserState::default(),
            ir: Ir::new(),
            reporter,
            error_count: 0,
            last_reported: None,
        }
    }

    fn make_instructions(mut self) -> ParseReport {
        loop {
            let token = self.scanner.next_token();

            let res = match token.kind {
                TokenKind::NewLine | TokenKind::Comment => {
                    self.end_line(token.kind);
                    continue;
                }
                TokenKind::Eof => break,
                TokenKind::MemOp(op) => self.memop(op),
                TokenKind::LoadI => self.loadi(),
                TokenKind::ArithOp(op) => self.arithop(op),
                TokenKind::Output => self.output(),
                TokenKind::Nop => self.nop(),
                found => Err(SyntaxError::NotAnOpcode { found }),
            };

            match res {
                Ok(ins) => {
                    debug!("line {}: {ins}", self.state.line);
                    self.ir.push(ins);
                }
                Err(e) => {
                    let found = e.found();
                    self.report(e);

                    if found.is_line_end() {
                        self.end_line(found);
                    } else {
                        self.state.pending_resync = true;
                        self.sync();
                    }
                }
            }
        }

        info!(
            "parsed {} instructions, {} lines rejected",
            self.ir.len(),
            self.error_count
        );

        ParseReport {
            ir: self.ir,
            error_count: self.error_count,
        }
    }

    fn report(&mut self, error: SyntaxError) {
        let line = self.state.line;
        if self.last_reported == Some(line) {
            return;
        }

        self.last_reported = Some(line);
        self.error_count += 1;
        self.reporter.report(&Diagnostic { line, error });
    }

    /// Discards the rest of a broken line, terminator included.
    fn sync(&mut self) {
        while self.state.pending_resync {
            let token = self.scanner.next_token();
            if token.kind.is_line_end() {
                self.state.pending_resync = false;
                self.end_line(token.kind);
            } else {
                debug!("line {}: skipping {}", self.state.line, token.kind);
            }
        }
    }

    // Eof ends the last line without starting a new one.
    fn end_line(&mut self, terminator: TokenKind) {
        if matches!(terminator, TokenKind::NewLine | TokenKind::Comment) {
            self.state.line += 1;
        }
    }

    fn register(&mut self, class: Class) -> Result<u32, SyntaxError> {
        match self.scanner.next_token().kind {
            TokenKind::Register(n) => Ok(n),
            found => Err(SyntaxError::Incorrect {
                class,
                expected: Expected::Register,
                found,
            }),
        }
    }

    fn constant(&mut self, class: Class) -> Result<u32, SyntaxError> {
        match self.scanner.next_token().kind {
            TokenKind::Constant(n) => Ok(n),
            found => Err(SyntaxError::Incorrect {
                class,
                expected: Expected::Constant,
                found,
            }),
        }
    }

    fn expect(&mut self, class: Class, expected: Expected) -> Result<(), SyntaxError> {
        let found = self.scanner.next_token().kind;
        let ok = match expected {
            Expected::Comma => found == TokenKind::Comma,
            Expected::Into => found == TokenKind::Into,
            Expected::EndOfLine => found.is_line_end(),
            Expected::Register | Expected::Constant => unreachable!(),
        };

        if !ok {
            return Err(SyntaxError::Incorrect {
                class,
                expected,
                found,
            });
        }

        if expected == Expected::EndOfLine {
            self.end_line(found);
        }

        Ok(())
    }

    fn memop(&mut self, op: MemOp) -> Result<Instruction, SyntaxError> {
        let class = Class::MemOp;

        let src = self.register(class)?;
        self.expect(class, Expected::Into)?;
        let dst = self.register(class)?;
        self.expect(class, Expected::EndOfLine)?;

        Ok(Instruction::Mem { op, src, dst })
    }

    fn loadi(&mut self) -> Result<Instruction, SyntaxError> {
        let class = Class::LoadI;

        let constant = self.constant(class)?;
        self.expect(class, Expected::Into)?;
        let dst = self.register(class)?;
        self.expect(class, Expected::EndOfLine)?;

        Ok(Instruction::LoadI { constant, dst })
    }

    fn arithop(&mut self, op: ArithOp) -> Result<Instruction, SyntaxError> {
        let class = Class::ArithOp;

        let lhs = self.register(class)?;
        self.expect(class, Expected::Comma)?;
        let rhs = self.register(class)?;
        self.expect(class, Expected::Into)?;
        let dst = self.register(class)?;
        self.expect(class, Expected::EndOfLine)?;

        Ok(Instruction::Arith { op, lhs, rhs, dst })
    }

    fn output(&mut self) -> Result<Instruction, SyntaxError> {
        let constant = self.constant(Class::Output)?;
        self.expect(Class::Output, Expected::EndOfLine)?;

        Ok(Instruction::Output { constant })
    }

    fn nop(&mut self) -> Result<Instruction, SyntaxError> {
        self.expect(Class::Nop, Expected::EndOfLine)?;

        Ok(Instruction::Nop)
    }
}

/// Parses a whole source text, streaming diagnostics to `reporter`. Every
/// line is checked; a broken line never stops the parse.
pub fn parse<R: Report>(source: &str, reporter: &mut R) -> ParseReport {
    let parser = Parser::new(source, reporter);
    parser.make_instructions()
}
