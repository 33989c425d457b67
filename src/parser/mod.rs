//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a token stream into a
//! `SourceFile` tree. It uses a Pratt parser for expressions with proper
//! operator precedence and handles:
//!
//! - Definition parsing (use, functions, extern functions, structs)
//! - Statement parsing (declarations, assignments, control flow)
//! - Expression parsing (binary ops, calls, field/array access, match)
//! - Type parsing for type annotations
//! - Error recovery and reporting
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
