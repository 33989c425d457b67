use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("use", TokenKind::Use);
        map.insert("struct", TokenKind::Struct);
        map.insert("extern", TokenKind::Extern);
        map.insert("fn", TokenKind::Fn);
        map.insert("let", TokenKind::Let);
        map.insert("mut", TokenKind::Mut);
        map.insert("return", TokenKind::Return);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("for", TokenKind::For);
        map.insert("in", TokenKind::In);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("match", TokenKind::Match);
        map.insert("as", TokenKind::As);
        map.insert("null", TokenKind::Null);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("string", TokenKind::StringType);
        map.insert("bool", TokenKind::Bool);
        map.insert("i32", TokenKind::I32);
        map.insert("i64", TokenKind::I64);
        map.insert("u32", TokenKind::U32);
        map.insert("u64", TokenKind::U64);
        map.insert("u8", TokenKind::U8);
        map.insert("double", TokenKind::Double);
        map.insert("float", TokenKind::Float);
        map.insert("void", TokenKind::Void);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    String,
    Char,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    NotEquals,  // !=
    FatArrow,   // =>

    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    ShiftLeft,
    ShiftRight,

    Or,
    And,
    Pipe,
    Ampersand,
    Caret,

    Dot,
    DotDot,
    Semicolon,
    Colon,
    ColonColon,
    Comma,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    Use,
    Struct,
    Extern,
    Fn,
    Let,
    Mut,
    Return,
    If,
    Else,
    While,
    For,
    In,
    Break,
    Continue,
    Match,
    As,
    Null,
    True,
    False,

    // Type keywords
    StringType,
    Bool,
    I32,
    I64,
    U32,
    U64,
    U8,
    Double,
    Float,
    Void,
}

impl TokenKind {
    /// How the token reads in an error message.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::EOF => "end of input",
            TokenKind::Number => "integer literal",
            TokenKind::String => "string literal",
            TokenKind::Char => "char literal",
            TokenKind::Identifier => "identifier",
            TokenKind::OpenBracket => "`[`",
            TokenKind::CloseBracket => "`]`",
            TokenKind::OpenCurly => "`{`",
            TokenKind::CloseCurly => "`}`",
            TokenKind::OpenParen => "`(`",
            TokenKind::CloseParen => "`)`",
            TokenKind::Assignment => "`=`",
            TokenKind::Equals => "`==`",
            TokenKind::NotEquals => "`!=`",
            TokenKind::FatArrow => "`=>`",
            TokenKind::Less => "`<`",
            TokenKind::LessEquals => "`<=`",
            TokenKind::Greater => "`>`",
            TokenKind::GreaterEquals => "`>=`",
            TokenKind::ShiftLeft => "`<<`",
            TokenKind::ShiftRight => "`>>`",
            TokenKind::Or => "`||`",
            TokenKind::And => "`&&`",
            TokenKind::Pipe => "`|`",
            TokenKind::Ampersand => "`&`",
            TokenKind::Caret => "`^`",
            TokenKind::Dot => "`.`",
            TokenKind::DotDot => "`..`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Colon => "`:`",
            TokenKind::ColonColon => "`::`",
            TokenKind::Comma => "`,`",
            TokenKind::Plus => "`+`",
            TokenKind::Dash => "`-`",
            TokenKind::Slash => "`/`",
            TokenKind::Star => "`*`",
            TokenKind::Percent => "`%`",
            TokenKind::Use => "`use`",
            TokenKind::Struct => "`struct`",
            TokenKind::Extern => "`extern`",
            TokenKind::Fn => "`fn`",
            TokenKind::Let => "`let`",
            TokenKind::Mut => "`mut`",
            TokenKind::Return => "`return`",
            TokenKind::If => "`if`",
            TokenKind::Else => "`else`",
            TokenKind::While => "`while`",
            TokenKind::For => "`for`",
            TokenKind::In => "`in`",
            TokenKind::Break => "`break`",
            TokenKind::Continue => "`continue`",
            TokenKind::Match => "`match`",
            TokenKind::As => "`as`",
            TokenKind::Null => "`null`",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::StringType => "`string`",
            TokenKind::Bool => "`bool`",
            TokenKind::I32 => "`i32`",
            TokenKind::I64 => "`i64`",
            TokenKind::U32 => "`u32`",
            TokenKind::U64 => "`u64`",
            TokenKind::U8 => "`u8`",
            TokenKind::Double => "`double`",
            TokenKind::Float => "`float`",
            TokenKind::Void => "`void`",
        }
    }

    /// Tokens that can only begin a top-level definition.
    pub fn starts_definition(&self) -> bool {
        matches!(
            self,
            TokenKind::Use | TokenKind::Fn | TokenKind::Extern | TokenKind::Struct
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact source text of the token.
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::EOF => write!(f, "end of input"),
            _ => write!(f, "{}", self.value),
        }
    }
}

impl Token {
    fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }

    /// One-line debug rendering used by the `--tokens` dump.
    pub fn debug(&self) -> String {
        let position = self.span.start;
        if self.is_one_of_many(&[
            TokenKind::String,
            TokenKind::Char,
            TokenKind::Identifier,
            TokenKind::Number,
        ]) {
            format!(
                "{}:{} {:?} ({})",
                position.line, position.column, self.kind, self.value
            )
        } else {
            format!("{}:{} {:?}", position.line, position.column, self.kind)
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TriviaKind {
    Whitespace,
    /// `// ...`
    LineComment,
    /// `/// ...`
    DocComment,
    /// `/* ... */`, letters and spaces only
    BlockComment,
    /// Characters the lexer could not classify.
    Skipped,
}

impl TriviaKind {
    pub fn is_comment(&self) -> bool {
        matches!(
            self,
            TriviaKind::LineComment | TriviaKind::DocComment | TriviaKind::BlockComment
        )
    }
}

/// Source text between semantic tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Trivia {
    pub kind: TriviaKind,
    pub value: String,
    pub span: Span,
}

/// The lexer's output: semantic tokens (ending with `EOF`) plus the trivia
/// that sits between them, both in source order.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    pub tokens: Vec<Token>,
    pub trivia: Vec<Trivia>,
}

impl TokenStream {
    /// Trivia lying between the end of token `index - 1` (or the start of the
    /// file) and the start of token `index`.
    pub fn trivia_before(&self, index: usize) -> &[Trivia] {
        let Some(token) = self.tokens.get(index) else {
            return &[];
        };
        let from = match index {
            0 => 0,
            _ => self.tokens[index - 1].span.end.offset,
        };
        self.trivia_in(from, token.span.start.offset)
    }

    /// Trivia whose spans start within `from..to` (byte offsets).
    pub fn trivia_in(&self, from: u32, to: u32) -> &[Trivia] {
        let first = self.trivia.partition_point(|t| t.span.start.offset < from);
        let last = self.trivia.partition_point(|t| t.span.start.offset < to);
        &self.trivia[first..last.max(first)]
    }

    /// Comments only, in source order.
    pub fn comments(&self) -> impl Iterator<Item = &Trivia> {
        self.trivia.iter().filter(|t| t.kind.is_comment())
    }

    /// Rebuilds the source text from tokens and trivia.
    pub fn reconstruct(&self) -> String {
        let mut pieces: Vec<(u32, &str)> = self
            .tokens
            .iter()
            .map(|t| (t.span.start.offset, t.value.as_str()))
            .chain(self.trivia.iter().map(|t| (t.span.start.offset, t.value.as_str())))
            .collect();
        pieces.sort_by_key(|(offset, _)| *offset);

        pieces.into_iter().map(|(_, text)| text).collect()
    }
}
