use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::{
    literals::{scan_quoted, ScannedLiteral},
    tokens::{Token, TokenKind, TokenStream, Trivia, TriviaKind, RESERVED_LOOKUP},
};

/// Handler invoked with the byte length of the pattern's match.
pub type RegexHandler = fn(&mut Lexer, usize);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    /// Tried in order; the first pattern matching at the current position wins,
    /// so longer operators come before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r"^\s+").unwrap(), handler: whitespace_handler },
        RegexPattern { regex: Regex::new(r"^//[^\n]*").unwrap(), handler: line_comment_handler },
        RegexPattern { regex: Regex::new(r"^/\*[a-zA-Z ]+\*/").unwrap(), handler: block_comment_handler },
        RegexPattern { regex: Regex::new(r"^[_\p{XID_Start}][_\p{XID_Continue}]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new(r"^[0-9]+").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new("^\"").unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new("^'").unwrap(), handler: char_handler },
        RegexPattern { regex: Regex::new(r"^::").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ColonColon, "::") },
        RegexPattern { regex: Regex::new(r"^:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":") },
        RegexPattern { regex: Regex::new(r"^=>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::FatArrow, "=>") },
        RegexPattern { regex: Regex::new(r"^==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==") },
        RegexPattern { regex: Regex::new(r"^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=") },
        RegexPattern { regex: Regex::new(r"^!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
        RegexPattern { regex: Regex::new(r"^<<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ShiftLeft, "<<") },
        RegexPattern { regex: Regex::new(r"^<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
        RegexPattern { regex: Regex::new(r"^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        RegexPattern { regex: Regex::new(r"^>>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ShiftRight, ">>") },
        RegexPattern { regex: Regex::new(r"^>=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=") },
        RegexPattern { regex: Regex::new(r"^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
        RegexPattern { regex: Regex::new(r"^\|\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Or, "||") },
        RegexPattern { regex: Regex::new(r"^\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Pipe, "|") },
        RegexPattern { regex: Regex::new(r"^&&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::And, "&&") },
        RegexPattern { regex: Regex::new(r"^&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Ampersand, "&") },
        RegexPattern { regex: Regex::new(r"^\^").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Caret, "^") },
        RegexPattern { regex: Regex::new(r"^\.\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::DotDot, "..") },
        RegexPattern { regex: Regex::new(r"^\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dot, ".") },
        RegexPattern { regex: Regex::new(r"^\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[") },
        RegexPattern { regex: Regex::new(r"^\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]") },
        RegexPattern { regex: Regex::new(r"^\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
        RegexPattern { regex: Regex::new(r"^\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
        RegexPattern { regex: Regex::new(r"^\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: Regex::new(r"^\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: Regex::new(r"^;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        RegexPattern { regex: Regex::new(r"^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: Regex::new(r"^\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new(r"^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
        RegexPattern { regex: Regex::new(r"^\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
        RegexPattern { regex: Regex::new(r"^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        RegexPattern { regex: Regex::new(r"^%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Percent, "%") },
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    trivia: Vec<Trivia>,
    errors: Vec<Error>,
    source: String,
    pos: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer {
            tokens: vec![],
            trivia: vec![],
            errors: vec![],
            source: source.to_string(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Moves forward `n` bytes, keeping line and column in step.
    pub fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());
        for ch in self.source[self.pos..end].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos = end;
    }

    pub fn position(&self) -> Position {
        Position {
            offset: self.pos as u32,
            line: self.line,
            column: self.column,
        }
    }

    /// Position `n` bytes ahead of the current one, without moving.
    pub fn position_ahead(&self, n: usize) -> Position {
        let end = (self.pos + n).min(self.source.len());
        let (mut line, mut column) = (self.line, self.column);
        for ch in self.source[self.pos..end].chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Position {
            offset: end as u32,
            line,
            column,
        }
    }

    /// Consumes `len` bytes as a token of `kind`.
    pub fn emit(&mut self, kind: TokenKind, len: usize) {
        let start = self.position();
        let value = self.source[self.pos..self.pos + len].to_string();
        self.advance_n(len);
        let span = Span::new(start, self.position());
        self.tokens.push(MK_TOKEN!(kind, value, span));
    }

    /// Consumes `len` bytes as trivia of `kind`.
    pub fn emit_trivia(&mut self, kind: TriviaKind, len: usize) {
        let start = self.position();
        let value = self.source[self.pos..self.pos + len].to_string();
        self.advance_n(len);
        self.trivia.push(Trivia {
            kind,
            value,
            span: Span::new(start, self.position()),
        });
    }

    pub fn error(&mut self, error: ErrorImpl, span: Span) {
        self.errors.push(Error::new(error, span));
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }
}

fn whitespace_handler(lexer: &mut Lexer, matched: usize) {
    lexer.emit_trivia(TriviaKind::Whitespace, matched);
}

fn line_comment_handler(lexer: &mut Lexer, matched: usize) {
    // A third slash right after `//` marks a doc comment
    let kind = if lexer.remainder()[2..].starts_with('/') {
        TriviaKind::DocComment
    } else {
        TriviaKind::LineComment
    };
    lexer.emit_trivia(kind, matched);
}

fn block_comment_handler(lexer: &mut Lexer, matched: usize) {
    lexer.emit_trivia(TriviaKind::BlockComment, matched);
}

fn number_handler(lexer: &mut Lexer, matched: usize) {
    lexer.emit(TokenKind::Number, matched);
}

fn symbol_handler(lexer: &mut Lexer, matched: usize) {
    let value = &lexer.remainder()[..matched];

    let kind = match RESERVED_LOOKUP.get(value) {
        Some(kind) => *kind,
        None => TokenKind::Identifier,
    };

    lexer.emit(kind, matched);
}

fn scan_literal(lexer: &mut Lexer, quote: char) -> ScannedLiteral {
    let scanned = scan_quoted(lexer.remainder(), quote);

    for (problem, range) in &scanned.problems {
        let span = Span::new(lexer.position_ahead(range.start), lexer.position_ahead(range.end));
        lexer.error(problem.clone(), span);
    }

    scanned
}

fn string_handler(lexer: &mut Lexer, _matched: usize) {
    let scanned = scan_literal(lexer, '"');
    lexer.emit(TokenKind::String, scanned.len);
}

fn char_handler(lexer: &mut Lexer, _matched: usize) {
    let scanned = scan_literal(lexer, '\'');
    let len = scanned.len;

    if scanned.terminated {
        let span = Span::new(lexer.position(), lexer.position_ahead(len));
        match scanned.unit_count() {
            0 => lexer.error(ErrorImpl::EmptyCharLiteral, span),
            1 => {}
            _ => {
                let literal = lexer.remainder()[..len].to_string();
                lexer.error(ErrorImpl::OverlongCharLiteral { literal }, span);
            }
        }
    }

    lexer.emit(TokenKind::Char, len);
}

/// Splits `source` into semantic tokens and trivia.
///
/// Lexical errors are collected rather than returned early: an unrecognised
/// character is reported and kept as skipped trivia, and malformed literals
/// are still emitted as tokens.
pub fn tokenize(source: &str) -> (TokenStream, Vec<Error>) {
    let mut lex = Lexer::new(source);

    while !lex.at_eof() {
        let matched = PATTERNS
            .iter()
            .find_map(|pattern| pattern.regex.find(lex.remainder()).map(|m| (pattern.handler, m.end())));

        match matched {
            Some((handler, len)) => handler(&mut lex, len),
            None => {
                let len = lex.at().map(char::len_utf8).unwrap_or(1);
                let token = lex.remainder()[..len].to_string();
                let span = Span::new(lex.position(), lex.position_ahead(len));
                lex.error(ErrorImpl::UnrecognisedToken { token }, span);
                lex.emit_trivia(TriviaKind::Skipped, len);
            }
        }
    }

    lex.emit(TokenKind::EOF, 0);

    let stream = TokenStream {
        tokens: lex.tokens,
        trivia: lex.trivia,
    };
    (stream, lex.errors)
}
