//! Lexical analysis for Zeus source text.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using an ordered regex pattern table
//! - Recognition of keywords, identifiers, literals, and operators
//! - Escape-aware string and char literal scanning
//! - Whitespace and comments, kept aside as trivia
//! - Token position tracking (byte offset, line, column) for error reporting

pub mod lexer;
pub mod literals;
pub mod tokens;

#[cfg(test)]
mod tests;
