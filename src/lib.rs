#![allow(clippy::module_inception)]

use crate::{
    ast::definitions::SourceFile,
    errors::errors::{Diagnostics, Error, ErrorTip},
    lexer::{lexer::tokenize, tokens::TokenStream},
    parser::parser::parse,
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

/// A location in the source buffer.
///
/// `offset` is a byte offset, `line` and `column` are 1-based, and the column
/// counts characters rather than bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn start() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// A zero-width span at `position`.
    pub fn empty(position: Position) -> Self {
        Span {
            start: position,
            end: position,
        }
    }

    pub fn len(&self) -> usize {
        (self.end.offset - self.start.offset) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start.offset <= other.start.offset && other.end.offset <= self.end.offset
    }

    /// The source text covered by this span.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start.offset as usize..self.end.offset as usize]
    }
}

/// Everything a single parse call produces.
#[derive(Debug)]
pub struct ParsedFile {
    pub source_file: SourceFile,
    pub tokens: TokenStream,
    /// Lexical and syntax errors ordered by source offset.
    pub diagnostics: Vec<Error>,
}

impl ParsedFile {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Tokenizes and parses one compilation unit.
///
/// Never fails outright: the returned tree may contain error nodes, and every
/// problem found along the way is listed in `diagnostics`.
pub fn parse_source(source: &str) -> ParsedFile {
    let (tokens, lex_errors) = tokenize(source);
    let (source_file, syntax_errors) = parse(&tokens);

    let mut diagnostics = Diagnostics::new();
    diagnostics.extend(lex_errors);
    diagnostics.extend(syntax_errors);

    ParsedFile {
        source_file,
        tokens,
        diagnostics: diagnostics.into_sorted(),
    }
}

/// Returns the 1-based line number, the text of that line and the byte offset
/// of `position` within the line.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return Some((line_number, line.to_string(), line_pos));
        }

        start = end;
        line_number += 1;
    }

    // End of input, just past the last character
    Some((line_number, String::new(), 0))
}

/// Formats a diagnostic with the offending source line and a caret under the
/// error position.
pub fn render_error(error: &Error, source: &str, file: &str) -> String {
    /*
        error: message
        -> main.zeus
           |
        20 | let a = #;
           | --------^
    */

    let mut out = String::new();
    let position = error.get_position();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!(
            "error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    out.push_str(&format!("-> {}:{}:{}\n", file, position.line, position.column));

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.offset) else {
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let column = line_text[..line_pos.min(line_text.len())].chars().count();
    let arrows = column.saturating_sub(removed_whitespace) + 1;

    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (string.chars().skip(start).collect(), start)
}
