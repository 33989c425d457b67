//! Error types and diagnostics collection for the front-end.
//!
//! This module defines the errors produced while lexing and parsing. It
//! includes:
//!
//! - Error structures with source span information
//! - Lexical and syntax error variants
//! - Error names and suggestions for display
//! - The diagnostics collector threaded through a parse

pub mod errors;
