//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the `parse` entry point.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and specialized functions for statement and
//! definition parsing.
//!
//! It maintains lookup tables for:
//! - Definition handlers
//! - Statement handlers
//! - NUD (null denotation) handlers for primary expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence
//! - Type parsing handlers
//!
//! Productions return `Result`; errors are turned into diagnostics and error
//! nodes at block and definition boundaries, so a parse always yields a tree.

use std::collections::HashMap;

use crate::{
    ast::{
        definitions::{Comment, CommentKind, Definition, ErrorNode, SourceFile},
        statements::Stmt,
    },
    errors::errors::{Diagnostics, Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind, TokenStream, Trivia, TriviaKind},
    Position, Span,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, DefinitionHandler, DefinitionLookup,
        LEDHandler, LEDLookup, NUDHandler, NUDLookup, StmtHandler, StmtLookup,
    },
    types::{create_token_type_lookups, TypeNUDHandler, TypeNUDLookup},
};

/// Saved cursor state for speculative parsing.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    pos: usize,
    depth: usize,
    comment_cursor: u32,
}

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// Semantic tokens, always ending with `EOF`
    tokens: Vec<Token>,
    /// Whitespace and comments, in source order
    trivia: Vec<Trivia>,
    /// Current position in the token stream
    pos: usize,
    /// Number of `{` consumed and not yet closed
    depth: usize,
    /// Byte offset up to which comments have been turned into nodes
    comment_cursor: u32,
    diagnostics: Diagnostics,
    definition_lookup: DefinitionLookup,
    stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
    binding_power_lookup: BPLookup,
    type_nud_lookup: TypeNUDLookup,
}

impl Parser {
    pub fn new(stream: &TokenStream) -> Self {
        let mut tokens = stream.tokens.clone();
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EOF) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or_else(Position::start);
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::new(),
                span: Span::empty(end),
            });
        }

        Parser {
            tokens,
            trivia: stream.trivia.clone(),
            pos: 0,
            depth: 0,
            comment_cursor: 0,
            diagnostics: Diagnostics::new(),
            definition_lookup: HashMap::new(),
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        self.peek(0)
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the token `n` places ahead; `EOF` past the end.
    pub fn peek(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    pub fn peek_kind(&self, n: usize) -> TokenKind {
        self.peek(n).kind
    }

    /// Advances to the next token and returns the consumed one.
    /// Never moves past `EOF`.
    pub fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        match token.kind {
            TokenKind::EOF => return token,
            TokenKind::OpenCurly => self.depth += 1,
            TokenKind::CloseCurly => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
        self.pos += 1;
        token
    }

    /// Consumes a token of `expected_kind` or fails with an error naming the
    /// production being parsed.
    pub fn expect(
        &mut self,
        expected_kind: TokenKind,
        production: &'static str,
    ) -> Result<Token, Error> {
        if self.current_token_kind() == expected_kind {
            return Ok(self.advance());
        }

        let token = self.current_token();
        let found = token.to_string();
        let error = match expected_kind {
            TokenKind::Semicolon
            | TokenKind::Colon
            | TokenKind::Comma
            | TokenKind::FatArrow
            | TokenKind::CloseParen
            | TokenKind::CloseBracket
            | TokenKind::CloseCurly
            | TokenKind::Greater => ErrorImpl::MissingToken {
                production,
                expected: expected_kind,
                found,
            },
            _ => ErrorImpl::UnexpectedToken {
                production,
                expected: vec![expected_kind],
                found,
            },
        };

        Err(Error::new(error, token.span))
    }

    /// An `UnexpectedToken` error at the current token.
    pub fn unexpected(&self, production: &'static str, expected: &[TokenKind]) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedToken {
                production,
                expected: expected.to_vec(),
                found: token.to_string(),
            },
            token.span,
        )
    }

    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Start of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start
    }

    /// End of the last consumed token.
    pub fn previous_end(&self) -> Position {
        match self.pos {
            0 => self.tokens[0].span.start,
            pos => self.tokens[pos - 1].span.end,
        }
    }

    /// Span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        let end = self.previous_end();
        if end.offset < start.offset {
            return Span::empty(start);
        }
        Span::new(start, end)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            depth: self.depth,
            comment_cursor: self.comment_cursor,
        }
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.depth = checkpoint.depth;
        self.comment_cursor = checkpoint.comment_cursor;
    }

    pub fn get_depth(&self) -> usize {
        self.depth
    }

    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    pub fn get_pos(&self) -> usize {
        self.pos
    }

    pub fn record(&mut self, error: Error) {
        self.diagnostics.push(error);
    }

    /// Comments between the previous token and the current one, as nodes.
    /// Each comment is handed out at most once.
    pub fn take_comments(&mut self) -> Vec<Comment> {
        let from = match self.pos {
            0 => 0,
            _ => self.previous_end().offset,
        }
        .max(self.comment_cursor);
        let to = self.get_position().offset;
        if from >= to {
            return vec![];
        }

        let first = self.trivia.partition_point(|t| t.span.start.offset < from);
        let last = self.trivia.partition_point(|t| t.span.start.offset < to);
        self.comment_cursor = to;

        self.trivia[first..last.max(first)]
            .iter()
            .filter_map(|trivia| {
                let kind = match trivia.kind {
                    TriviaKind::LineComment => CommentKind::Line,
                    TriviaKind::DocComment => CommentKind::Doc,
                    TriviaKind::BlockComment => CommentKind::Block,
                    _ => return None,
                };
                Some(Comment {
                    kind,
                    text: trivia.value.clone(),
                    span: trivia.span,
                })
            })
            .collect()
    }

    /// Skips past a broken statement inside the block opened at `block_depth`.
    ///
    /// Stops after a `;`, before the block's `}`, or before a token that
    /// starts a statement or definition (unless nothing was skipped yet).
    pub fn synchronize_in_block(&mut self, block_depth: usize, start: usize) {
        loop {
            let kind = self.current_token_kind();
            if kind == TokenKind::EOF || self.depth < block_depth {
                break;
            }

            if self.depth == block_depth {
                match kind {
                    TokenKind::Semicolon => {
                        self.advance();
                        break;
                    }
                    TokenKind::CloseCurly => break,
                    kind if (starts_statement(kind) || kind.starts_definition())
                        && self.pos > start =>
                    {
                        break
                    }
                    _ => {}
                }
            }

            self.advance();
        }

        if self.pos == start && self.has_tokens() && self.current_token_kind() != TokenKind::CloseCurly {
            self.advance();
        }
    }

    /// Skips past a broken top-level definition.
    ///
    /// Stops after a `;` or a `}` at depth zero, or before the next
    /// definition keyword at depth zero.
    pub fn synchronize_definition(&mut self, start: usize) {
        loop {
            match self.current_token_kind() {
                TokenKind::EOF => break,
                TokenKind::Semicolon if self.depth == 0 => {
                    self.advance();
                    break;
                }
                TokenKind::CloseCurly => {
                    self.advance();
                    if self.depth == 0 {
                        break;
                    }
                }
                kind if kind.starts_definition() && self.depth == 0 && self.pos > start => break,
                _ => {
                    self.advance();
                }
            }
        }

        if self.pos == start {
            self.advance();
        }
    }

    /// Returns a reference to the definition lookup table.
    pub fn get_definition_lookup(&self) -> &DefinitionLookup {
        &self.definition_lookup
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Returns a reference to the type NUD lookup table.
    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Binding power of the current token; `Default` for anything that is
    /// not an infix operator.
    pub fn current_bp(&self) -> BindingPower {
        *self
            .binding_power_lookup
            .get(&self.current_token_kind())
            .unwrap_or(&BindingPower::Default)
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (primary) handler for a token.
    ///
    /// Primaries get no binding power, so a primary directly after another
    /// one ends the expression instead of being read as an operator.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a top-level definition handler for a token.
    pub fn definition(&mut self, kind: TokenKind, definition_fn: DefinitionHandler) {
        self.definition_lookup.insert(kind, definition_fn);
    }

    /// Registers a type null denotation handler.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }
}

/// Keywords that begin a statement.
pub fn starts_statement(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Let
            | TokenKind::Return
            | TokenKind::If
            | TokenKind::While
            | TokenKind::For
            | TokenKind::Break
            | TokenKind::Continue
            | TokenKind::Match
    )
}

/// Any token a statement can start with, identifiers included.
fn begins_statement(kind: TokenKind) -> bool {
    starts_statement(kind) || kind == TokenKind::Identifier
}

fn parse_definition(parser: &mut Parser) -> Result<Definition, Error> {
    let kind = parser.current_token_kind();
    let Some(handler) = parser.get_definition_lookup().get(&kind).copied() else {
        return Err(parser.unexpected(
            "source_file",
            &[TokenKind::Use, TokenKind::Fn, TokenKind::Extern, TokenKind::Struct],
        ));
    };

    handler(parser)
}

/// Parses a token stream into a `SourceFile`.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses definitions until EOF. Syntax
/// errors are returned alongside the tree rather than instead of it.
pub fn parse(stream: &TokenStream) -> (SourceFile, Vec<Error>) {
    let mut parser = Parser::new(stream);
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    let mut definitions = vec![];

    loop {
        for comment in parser.take_comments() {
            definitions.push(Definition::Comment(comment));
        }

        if !parser.has_tokens() {
            break;
        }

        parser.set_depth(0);
        let start = parser.get_pos();
        let start_position = parser.get_position();

        match parse_definition(&mut parser) {
            Ok(definition) => definitions.push(definition),
            Err(error) => {
                parser.record(error);
                parser.synchronize_definition(start);
                definitions.push(Definition::Error(ErrorNode {
                    span: parser.span_from(start_position),
                }));
            }
        }
    }

    let end = parser.current_token().span.end;
    let source_file = SourceFile {
        definitions,
        span: Span::new(Position::start(), end),
    };

    (source_file, parser.diagnostics.into_vec())
}

/// Wraps a block-level error the same way `parse` wraps a top-level one.
pub fn recover_statement(
    parser: &mut Parser,
    error: Error,
    block_depth: usize,
    start: usize,
    start_position: Position,
) -> Stmt {
    // A missing `;` before the next statement closes the broken one in place
    let closed = matches!(
        error.get_impl(),
        ErrorImpl::MissingToken {
            expected: TokenKind::Semicolon,
            ..
        }
    ) && parser.get_pos() > start
        && parser.get_depth() == block_depth
        && begins_statement(parser.current_token_kind());

    parser.record(error);
    if !closed {
        parser.synchronize_in_block(block_depth, start);
    }
    Stmt::Error(ErrorNode {
        span: parser.span_from(start_position),
    })
}
