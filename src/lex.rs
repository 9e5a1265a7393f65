use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use log::trace;
use thiserror::Error;

use crate::ir::{ArithOp, MemOp, Opcode};

/// Reasons a lexeme could not be classified. These travel inside
/// [`TokenKind::Error`]; the scanner never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unknown word")]
    UnknownWord,
    #[error("malformed register")]
    MalformedRegister,
    #[error("expected '>' after '='")]
    IncompleteArrow,
    #[error("expected '/' after '/'")]
    LoneSlash,
    #[error("literal too large")]
    Overflow,
}

impl LexError {
    pub fn code(&self) -> u32 {
        match self {
            LexError::UnexpectedChar(_) => 0,
            LexError::UnknownWord => 1,
            LexError::MalformedRegister => 2,
            LexError::IncompleteArrow => 3,
            LexError::LoneSlash => 4,
            LexError::Overflow => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    MemOp(MemOp),
    LoadI,
    ArithOp(ArithOp),
    Output,
    Nop,
    Constant(u32),
    Register(u32),
    Comma,
    Into,
    Eof,
    Comment,
    NewLine,
    Error(LexError),
}

impl TokenKind {
    pub const CATEGORY_NAMES: [&'static str; 13] = [
        "MEMOP", "LOADI", "ARITHOP", "OUTPUT", "NOP", "CONST", "REG", "COMMA", "INTO", "EOF",
        "COMMENT", "NEWLINE", "ERROR",
    ];

    pub fn category(&self) -> usize {
        match self {
            TokenKind::MemOp(_) => 0,
            TokenKind::LoadI => 1,
            TokenKind::ArithOp(_) => 2,
            TokenKind::Output => 3,
            TokenKind::Nop => 4,
            TokenKind::Constant(_) => 5,
            TokenKind::Register(_) => 6,
            TokenKind::Comma => 7,
            TokenKind::Into => 8,
            TokenKind::Eof => 9,
            TokenKind::Comment => 10,
            TokenKind::NewLine => 11,
            TokenKind::Error(_) => 12,
        }
    }

    pub fn category_name(&self) -> &'static str {
        Self::CATEGORY_NAMES[self.category()]
    }

    pub fn opcode(&self) -> Option<Opcode> {
        match *self {
            TokenKind::MemOp(op) => Some(op.into()),
            TokenKind::LoadI => Some(Opcode::LoadI),
            TokenKind::ArithOp(op) => Some(op.into()),
            TokenKind::Output => Some(Opcode::Output),
            TokenKind::Nop => Some(Opcode::Nop),
            _ => None,
        }
    }

    /// Opcode-table index, literal value or error code; `None` for punctuation
    /// and line structure tokens.
    pub fn value(&self) -> Option<u32> {
        match *self {
            TokenKind::Constant(n) | TokenKind::Register(n) => Some(n),
            TokenKind::Error(e) => Some(e.code()),
            _ => self.opcode().map(|op| op.index() as u32),
        }
    }

    /// `true` for the three tokens that may end a statement.
    pub fn is_line_end(&self) -> bool {
        matches!(self, TokenKind::NewLine | TokenKind::Comment | TokenKind::Eof)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Constant(n) => write!(f, "CONST {n}"),
            TokenKind::Register(n) => write!(f, "REG r{n}"),
            TokenKind::Error(e) => write!(f, "ERROR ({e})"),
            kind => match kind.opcode() {
                Some(op) => write!(f, "{} {op}", kind.category_name()),
                None => f.write_str(kind.category_name()),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Line the lexeme starts on, counting from 1.
    pub line: u32,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self.kind.value() {
            Some(v) => v.to_string(),
            None => "-".to_owned(),
        };
        write!(
            f,
            "{} {}, {}",
            self.kind.category(),
            self.kind.category_name(),
            value
        )
    }
}

/// Pull scanner over ILOC source. Each call to [`Scanner::next_token`] classifies
/// one lexeme; once the input is exhausted every call returns `Eof`.
pub struct Scanner<'a> {
    source: &'a str,
    it: Peekable<Chars<'a>>,
    start: usize,
    pos: usize,
    line: u32,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            it: source.chars().peekable(),
            start: 0,
            pos: 0,
            line: 1,
        }
    }

    /// Current line of the cursor.
    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn next_token(&mut self) -> Token {
        self.consume_while(|ch| ch.is_whitespace() && *ch != '\n');

        self.start = self.pos;
        let line = self.line;

        let kind = match self.consume() {
            None => TokenKind::Eof,
            Some('\n') => {
                self.line += 1;
                TokenKind::NewLine
            }
            Some(',') => TokenKind::Comma,
            Some('=') => self.arrow(),
            Some('/') => self.comment(),
            Some(ch) if ch.is_ascii_digit() => self.constant(),
            Some(ch) if ch.is_ascii_alphabetic() => self.word(),
            Some(ch) => TokenKind::Error(LexError::UnexpectedChar(ch)),
        };

        trace!("line {line}: {kind}");

        Token { kind, line }
    }

    fn consume(&mut self) -> Option<char> {
        let ch = self.it.next()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn peek(&mut self) -> Option<&char> {
        self.it.peek()
    }

    fn lexeme(&self) -> &'a str {
        &self.source[self.start..self.pos]
    }

    fn consume_while<F>(&mut self, condition: F)
    where
        F: Fn(&char) -> bool,
    {
        while let Some(ch) = self.peek() {
            if condition(ch) {
                self.consume();
            } else {
                break;
            }
        }
    }

    fn arrow(&mut self) -> TokenKind {
        if matches!(self.peek(), Some('>')) {
            self.consume();
            TokenKind::Into
        } else {
            TokenKind::Error(LexError::IncompleteArrow)
        }
    }

    // The comment swallows its newline, so a comment token also ends the line.
    fn comment(&mut self) -> TokenKind {
        if !matches!(self.peek(), Some('/')) {
            return TokenKind::Error(LexError::LoneSlash);
        }

        self.consume_while(|ch| *ch != '\n');
        if self.consume().is_some() {
            self.line += 1;
        }

        TokenKind::Comment
    }

    fn constant(&mut self) -> TokenKind {
        self.consume_while(|ch| ch.is_ascii_digit());

        match self.lexeme().parse::<u32>() {
            Ok(n) => TokenKind::Constant(n),
            Err(_) => TokenKind::Error(LexError::Overflow),
        }
    }

    fn word(&mut self) -> TokenKind {
        self.consume_while(|ch| ch.is_ascii_alphanumeric());

        let lexeme = self.lexeme();

        if let Some(kind) = map_kw(lexeme) {
            return kind;
        }

        register(lexeme)
    }
}

fn map_kw(word: &str) -> Option<TokenKind> {
    match word {
        "load" => Some(TokenKind::MemOp(MemOp::Load)),
        "store" => Some(TokenKind::MemOp(MemOp::Store)),
        "loadI" => Some(TokenKind::LoadI),
        "add" => Some(TokenKind::ArithOp(ArithOp::Add)),
        "sub" => Some(TokenKind::ArithOp(ArithOp::Sub)),
        "mult" => Some(TokenKind::ArithOp(ArithOp::Mult)),
        "lshift" => Some(TokenKind::ArithOp(ArithOp::LShift)),
        "rshift" => Some(TokenKind::ArithOp(ArithOp::RShift)),
        "output" => Some(TokenKind::Output),
        "nop" => Some(TokenKind::Nop),
        _ => None,
    }
}

fn register(word: &str) -> TokenKind {
    let Some(digits) = word.strip_prefix('r') else {
        return TokenKind::Error(LexError::UnknownWord);
    };

    if digits.is_empty() || !digits.starts_with(|ch: char| ch.is_ascii_digit()) {
        return TokenKind::Error(LexError::UnknownWord);
    }

    if !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return TokenKind::Error(LexError::MalformedRegister);
    }

    match digits.parse::<u32>() {
        Ok(n) => TokenKind::Register(n),
        Err(_) => TokenKind::Error(LexError::Overflow),
    }
}

/// Scans the whole source, up to and including the first `Eof`.
pub fn scan(source: &str) -> Vec<Token> {
    let mut scanner = Scanner::new(source);
    let mut tokens = vec![];

    loop {
        let token = scanner.next_token();
        tokens.push(token);
        if token.kind == TokenKind::Eof {
            break;
        }
    }

    tokens
}
