use std::fmt::Display;

use thiserror::Error;

use crate::{lexer::tokens::TokenKind, Position, Span};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    span: Span,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, span: Span) -> Self {
        Error {
            internal_error: error_impl,
            span,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.span.start
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn category(&self) -> ErrorCategory {
        self.internal_error.category()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnterminatedChar => "UnterminatedChar",
            ErrorImpl::InvalidEscapeSequence { .. } => "InvalidEscapeSequence",
            ErrorImpl::EmptyCharLiteral => "EmptyCharLiteral",
            ErrorImpl::OverlongCharLiteral { .. } => "OverlongCharLiteral",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::MissingToken { .. } => "MissingToken",
            ErrorImpl::MalformedGeneric { .. } => "MalformedGeneric",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedString => ErrorTip::Suggestion(String::from(
                "String literal is missing its closing `\"` before the end of the line",
            )),
            ErrorImpl::UnterminatedChar => ErrorTip::Suggestion(String::from(
                "Char literal is missing its closing `'` before the end of the line",
            )),
            ErrorImpl::InvalidEscapeSequence { sequence } => ErrorTip::Suggestion(format!(
                "Invalid escape `{}`, expected `\\x` with two or more hex digits, `\\u{{...}}`, two or three decimal digits or a single character",
                sequence
            )),
            ErrorImpl::EmptyCharLiteral => {
                ErrorTip::Suggestion(String::from("Char literal must contain one character"))
            }
            ErrorImpl::OverlongCharLiteral { literal } => ErrorTip::Suggestion(format!(
                "Char literal {} holds more than one character, use a string literal instead",
                literal
            )),
            ErrorImpl::UnexpectedToken {
                production,
                expected,
                found,
            } => ErrorTip::Suggestion(format!(
                "Unexpected `{}` in {}, expected {}",
                found,
                production,
                format_expected(expected)
            )),
            ErrorImpl::MissingToken {
                production,
                expected,
                found,
            } => ErrorTip::Suggestion(format!(
                "Expected {} in {}, found `{}`, did you miss it?",
                expected, production, found
            )),
            ErrorImpl::MalformedGeneric { found } => ErrorTip::Suggestion(format!(
                "Generic argument `{}` must be a primitive, `string`, a name or an array type",
                found
            )),
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.span.start.line, self.span.start.column, self.internal_error
        )
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lexical,
    Syntax,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated char literal")]
    UnterminatedChar,
    #[error("invalid escape sequence: {sequence:?}")]
    InvalidEscapeSequence { sequence: String },
    #[error("empty char literal")]
    EmptyCharLiteral,
    #[error("char literal with more than one character: {literal}")]
    OverlongCharLiteral { literal: String },

    // Syntax
    #[error("unexpected token in {production}: expected {}, found {found:?}", format_expected(.expected))]
    UnexpectedToken {
        production: &'static str,
        expected: Vec<TokenKind>,
        found: String,
    },
    #[error("missing {expected} in {production}, found {found:?}")]
    MissingToken {
        production: &'static str,
        expected: TokenKind,
        found: String,
    },
    #[error("malformed generic clause: {found:?} is not a plain type")]
    MalformedGeneric { found: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
}

impl ErrorImpl {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnterminatedString
            | ErrorImpl::UnterminatedChar
            | ErrorImpl::InvalidEscapeSequence { .. }
            | ErrorImpl::EmptyCharLiteral
            | ErrorImpl::OverlongCharLiteral { .. } => ErrorCategory::Lexical,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::MissingToken { .. }
            | ErrorImpl::MalformedGeneric { .. }
            | ErrorImpl::NumberParseError { .. } => ErrorCategory::Syntax,
        }
    }
}

/// Renders an expected-token set as "`a`, `b` or `c`".
pub fn format_expected(expected: &[TokenKind]) -> String {
    match expected {
        [] => String::from("nothing"),
        [only] => only.to_string(),
        [init @ .., last] => format!(
            "{} or {}",
            init.iter().map(|kind| kind.to_string()).collect::<Vec<_>>().join(", "),
            last
        ),
    }
}

/// Collects the errors of a single lex/parse run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    errors: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics { errors: vec![] }
    }

    pub fn push(&mut self, error: Error) {
        self.errors.push(error);
    }

    pub fn extend<I: IntoIterator<Item = Error>>(&mut self, errors: I) {
        self.errors.extend(errors);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.errors.iter()
    }

    pub fn has_lexical(&self) -> bool {
        self.errors.iter().any(|e| e.category() == ErrorCategory::Lexical)
    }

    pub fn has_syntax(&self) -> bool {
        self.errors.iter().any(|e| e.category() == ErrorCategory::Syntax)
    }

    pub fn into_vec(self) -> Vec<Error> {
        self.errors
    }

    /// Errors ordered by source offset; errors at the same offset keep the
    /// order they were reported in.
    pub fn into_sorted(mut self) -> Vec<Error> {
        self.errors.sort_by_key(|e| e.span.start.offset);
        self.errors
    }
}
