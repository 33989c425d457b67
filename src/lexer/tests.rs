//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Integer literals
//! - String and char literals with escape sequences
//! - Operators and punctuation
//! - Comments and other trivia
//! - Error cases

use rstest::rstest;

use crate::errors::errors::ErrorImpl;

use super::{
    lexer::tokenize,
    tokens::{TokenKind, TriviaKind},
};

fn kinds(source: &str) -> Vec<TokenKind> {
    let (stream, errors) = tokenize(source);
    assert!(errors.is_empty(), "unexpected lexical errors: {:?}", errors);
    stream.tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn test_tokenize_keywords() {
    let source = "use struct extern fn let mut return if else while for in break continue match as null true false";

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Use,
            TokenKind::Struct,
            TokenKind::Extern,
            TokenKind::Fn,
            TokenKind::Let,
            TokenKind::Mut,
            TokenKind::Return,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::For,
            TokenKind::In,
            TokenKind::Break,
            TokenKind::Continue,
            TokenKind::Match,
            TokenKind::As,
            TokenKind::Null,
            TokenKind::True,
            TokenKind::False,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_type_keywords() {
    let source = "string bool i32 i64 u32 u64 u8 double float void";

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::StringType,
            TokenKind::Bool,
            TokenKind::I32,
            TokenKind::I64,
            TokenKind::U32,
            TokenKind::U64,
            TokenKind::U8,
            TokenKind::Double,
            TokenKind::Float,
            TokenKind::Void,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let (stream, errors) = tokenize("foo baz_123 _underscore CamelCase größe lets");
    assert!(errors.is_empty());

    let values: Vec<&str> = stream.tokens.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, vec!["foo", "baz_123", "_underscore", "CamelCase", "größe", "lets", ""]);
    assert!(stream.tokens[..6].iter().all(|t| t.kind == TokenKind::Identifier));
}

#[test]
fn test_tokenize_numbers_have_no_fraction() {
    // `1.5` is two integers around a dot; there is no float literal
    assert_eq!(
        kinds("42 1.5"),
        vec![
            TokenKind::Number,
            TokenKind::Number,
            TokenKind::Dot,
            TokenKind::Number,
            TokenKind::EOF,
        ]
    );
}

#[rstest]
#[case("==", TokenKind::Equals)]
#[case("=>", TokenKind::FatArrow)]
#[case("=", TokenKind::Assignment)]
#[case("!=", TokenKind::NotEquals)]
#[case("<<", TokenKind::ShiftLeft)]
#[case("<=", TokenKind::LessEquals)]
#[case("<", TokenKind::Less)]
#[case(">>", TokenKind::ShiftRight)]
#[case(">=", TokenKind::GreaterEquals)]
#[case(">", TokenKind::Greater)]
#[case("||", TokenKind::Or)]
#[case("|", TokenKind::Pipe)]
#[case("&&", TokenKind::And)]
#[case("&", TokenKind::Ampersand)]
#[case("^", TokenKind::Caret)]
#[case("..", TokenKind::DotDot)]
#[case("::", TokenKind::ColonColon)]
#[case("%", TokenKind::Percent)]
fn test_tokenize_operator(#[case] source: &str, #[case] expected: TokenKind) {
    assert_eq!(kinds(source), vec![expected, TokenKind::EOF]);
}

#[test]
fn test_tokenize_inclusive_range() {
    assert_eq!(
        kinds("0..=9"),
        vec![
            TokenKind::Number,
            TokenKind::DotDot,
            TokenKind::Assignment,
            TokenKind::Number,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_token_positions() {
    let (stream, _) = tokenize("fn main() {\n    return 1;\n}");

    let ret = &stream.tokens[5];
    assert_eq!(ret.kind, TokenKind::Return);
    assert_eq!(ret.span.start.line, 2);
    assert_eq!(ret.span.start.column, 5);
    assert_eq!(ret.span.start.offset, 16);
    assert_eq!(ret.span.end.offset, 22);
}

#[test]
fn test_string_literal_keeps_raw_text() {
    let (stream, errors) = tokenize(r#""a\n\x41""#);
    assert!(errors.is_empty());
    assert_eq!(stream.tokens[0].kind, TokenKind::String);
    assert_eq!(stream.tokens[0].value, r#""a\n\x41""#);
}

#[test]
fn test_unterminated_string() {
    let (stream, errors) = tokenize("\"abc\nlet");

    assert_eq!(errors.len(), 1);
    assert_eq!(*errors[0].get_impl(), ErrorImpl::UnterminatedString);
    assert_eq!(stream.tokens[0].value, "\"abc");
    // Scanning resumes on the next line
    assert_eq!(stream.tokens[1].kind, TokenKind::Let);
}

#[test]
fn test_invalid_escape_is_reported_and_literal_kept() {
    let (stream, errors) = tokenize(r#""a\Ub" x"#);

    assert_eq!(errors.len(), 1);
    assert_eq!(
        *errors[0].get_impl(),
        ErrorImpl::InvalidEscapeSequence {
            sequence: String::from("\\U")
        }
    );
    assert_eq!(errors[0].get_span().start.column, 3);
    assert_eq!(stream.tokens[0].kind, TokenKind::String);
    assert_eq!(stream.tokens[1].kind, TokenKind::Identifier);
}

#[rstest]
#[case("'a'")]
#[case(r"'\n'")]
#[case(r"'\x41'")]
#[case(r"'\u{1F600}'")]
#[case("'ß'")]
fn test_char_literal(#[case] source: &str) {
    assert_eq!(kinds(source), vec![TokenKind::Char, TokenKind::EOF]);
}

#[test]
fn test_char_literal_errors() {
    let (_, errors) = tokenize("'ab'");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "OverlongCharLiteral");

    let (_, errors) = tokenize("''");
    assert_eq!(errors.len(), 1);
    assert_eq!(*errors[0].get_impl(), ErrorImpl::EmptyCharLiteral);

    let (_, errors) = tokenize("'a");
    assert_eq!(errors.len(), 1);
    assert_eq!(*errors[0].get_impl(), ErrorImpl::UnterminatedChar);
}

#[test]
fn test_comments_are_trivia() {
    let (stream, errors) = tokenize("// line\n/// doc\n/* block comment */ x");
    assert!(errors.is_empty());

    assert_eq!(stream.tokens.len(), 2);
    let comments: Vec<TriviaKind> = stream.comments().map(|t| t.kind).collect();
    assert_eq!(
        comments,
        vec![TriviaKind::LineComment, TriviaKind::DocComment, TriviaKind::BlockComment]
    );
}

#[test]
fn test_block_comment_only_letters_and_spaces() {
    // Digits are not allowed, so this is `/`, `*`, ... instead of a comment
    let (stream, _) = tokenize("/* 42 */");
    assert_eq!(stream.tokens[0].kind, TokenKind::Slash);
    assert_eq!(stream.tokens[1].kind, TokenKind::Star);
    assert_eq!(stream.comments().count(), 0);
}

#[test]
fn test_unrecognised_character() {
    let (stream, errors) = tokenize("let # x");

    assert_eq!(errors.len(), 1);
    assert_eq!(
        *errors[0].get_impl(),
        ErrorImpl::UnrecognisedToken {
            token: String::from("#")
        }
    );
    assert_eq!(stream.tokens[1].kind, TokenKind::Identifier);
    assert!(stream.trivia.iter().any(|t| t.kind == TriviaKind::Skipped && t.value == "#"));
}

#[rstest]
#[case("fn main() {\n    let x: i32 = 1;\n}\n")]
#[case("  // lead\n\tstruct S { a: i32, }   /* tail */")]
#[case("let s: string = \"unterminated\nnext $ 'q")]
#[case("")]
fn test_reconstruct_is_lossless(#[case] source: &str) {
    let (stream, _) = tokenize(source);
    assert_eq!(stream.reconstruct(), source);
}

#[test]
fn test_trivia_before_token() {
    let (stream, _) = tokenize("a // note\n  b");

    let between = stream.trivia_before(1);
    let values: Vec<&str> = between.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, vec![" ", "// note", "\n  "]);
    assert!(stream.trivia_before(0).is_empty());
}

#[test]
fn test_token_debug_output() {
    let (stream, _) = tokenize("x ;");
    assert_eq!(stream.tokens[0].debug(), "1:1 Identifier (x)");
    assert_eq!(stream.tokens[1].debug(), "1:3 Semicolon");
}
