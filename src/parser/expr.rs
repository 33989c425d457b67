use crate::{
    ast::{
        ast::Identifier,
        expressions::{
            ArrayAccessExpr, BinaryExpr, BinaryOperator, BoolExpr, CallExpr, CharExpr,
            ConstantList, Expr, FieldAccessExpr, FieldInit, MatchArm, MatchExpr, MatchKey,
            NullExpr, NumberExpr, Operator, RangeExpr, StringExpr, StringPart, StructInitExpr,
            TypecastExpr,
        },
        types::{NamedType, Type},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{
        literals::scan_quoted,
        tokens::{Token, TokenKind},
    },
    Position, Span,
};

use super::{
    lookups::BindingPower,
    parser::Parser,
    types::{parse_generic_clause, parse_type},
};

const EXPRESSION_START: [TokenKind; 8] = [
    TokenKind::Identifier,
    TokenKind::Number,
    TokenKind::String,
    TokenKind::Char,
    TokenKind::Null,
    TokenKind::True,
    TokenKind::False,
    TokenKind::Match,
];

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let mut left = parse_primary_expr(parser)?;

    // While the current token binds tighter than `bp`, keep extending lhs
    while parser.current_bp() > bp {
        let token_kind = parser.current_token_kind();
        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected("expression", &[]));
        };

        let bp = parser.current_bp();
        left = led(parser, left, bp)?;
    }

    Ok(left)
}

/// A single primary expression, with no binary operator or cast applied.
pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected("primary_expression", &EXPRESSION_START));
    };

    nud(parser)
}

/// An expression in initializer position, where a struct literal is also allowed.
pub fn parse_initializer_expr(parser: &mut Parser) -> Result<Expr, Error> {
    if struct_init_ahead(parser) {
        return parse_struct_init_expr(parser).map(Expr::StructInit);
    }

    parse_expr(parser, BindingPower::Default)
}

fn struct_init_ahead(parser: &mut Parser) -> bool {
    if parser.current_token_kind() != TokenKind::Identifier {
        return false;
    }

    match parser.peek_kind(1) {
        TokenKind::OpenCurly => true,
        TokenKind::Less => {
            let checkpoint = parser.checkpoint();
            parser.advance();
            let found = parse_generic_clause(parser).is_ok()
                && parser.current_token_kind() == TokenKind::OpenCurly;
            parser.restore(checkpoint);
            found
        }
        _ => false,
    }
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: Expr,
    bp: BindingPower,
) -> Result<Expr, Error> {
    let Some(op) = BinaryOperator::from_token_kind(parser.current_token_kind()) else {
        return Err(parser.unexpected("binary_expression", &[]));
    };
    let operator_token = parser.advance();

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: Span::new(left.get_span().start, right.get_span().end),
        left: Box::new(left),
        operator: Operator {
            op,
            span: operator_token.span,
        },
        right: Box::new(right),
    }))
}

/// `value as T`
pub fn parse_typecast_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parser.expect(TokenKind::As, "typecast")?;
    let target = parse_cast_target(parser)?;

    Ok(Expr::Typecast(TypecastExpr {
        span: parser.span_from(left.get_span().start),
        value: Box::new(left),
        target,
    }))
}

/// A cast target. `Name<T>` is a generic only when the clause closes;
/// otherwise the target is `Name` and the `<` is left for a comparison.
fn parse_cast_target(parser: &mut Parser) -> Result<Type, Error> {
    if parser.current_token_kind() != TokenKind::Identifier || parser.peek_kind(1) != TokenKind::Less {
        return parse_type(parser);
    }

    let checkpoint = parser.checkpoint();
    match parse_type(parser) {
        Err(error) if !matches!(error.get_impl(), ErrorImpl::MalformedGeneric { .. }) => {
            parser.restore(checkpoint);
            let name = parse_identifier(parser, "type")?;
            Ok(Type::Named(NamedType { name }))
        }
        result => result,
    }
}

// LITERALS

pub fn parse_number_literal(
    parser: &mut Parser,
    production: &'static str,
) -> Result<NumberExpr, Error> {
    let token = parser.expect(TokenKind::Number, production)?;

    match token.value.parse::<u64>() {
        Ok(value) => Ok(NumberExpr {
            value,
            span: token.span,
        }),
        Err(_) => Err(Error::new(
            ErrorImpl::NumberParseError { token: token.value },
            token.span,
        )),
    }
}

pub fn parse_number_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parse_number_literal(parser, "number").map(Expr::Number)
}

/// Splits a quoted literal token into text and escape parts with their own spans.
///
/// The lexer has already reported any problem with the literal; invalid
/// escapes are kept as parts so the tree still covers every character.
fn literal_parts(token: &Token, quote: char) -> Vec<StringPart> {
    let scanned = scan_quoted(&token.value, quote);

    let mut position = Position {
        offset: token.span.start.offset + quote.len_utf8() as u32,
        line: token.span.start.line,
        column: token.span.start.column + 1,
    };

    scanned
        .segments
        .into_iter()
        .map(|segment| {
            let raw = segment.raw();
            let end = Position {
                offset: position.offset + raw.len() as u32,
                line: position.line,
                column: position.column + raw.chars().count() as u32,
            };
            let part = StringPart {
                span: Span::new(position, end),
                segment,
            };
            position = end;
            part
        })
        .collect()
}

pub fn parse_string_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.expect(TokenKind::String, "string_literal")?;

    Ok(Expr::String(StringExpr {
        parts: literal_parts(&token, '"'),
        span: token.span,
    }))
}

pub fn parse_char_literal(parser: &mut Parser) -> Result<CharExpr, Error> {
    let token = parser.expect(TokenKind::Char, "char_literal")?;

    Ok(CharExpr {
        parts: literal_parts(&token, '\''),
        span: token.span,
    })
}

pub fn parse_char_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parse_char_literal(parser).map(Expr::Char)
}

/// `null`, `true` and `false`
pub fn parse_keyword_literal_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance();

    match token.kind {
        TokenKind::Null => Ok(Expr::Null(NullExpr { span: token.span })),
        TokenKind::True => Ok(Expr::Bool(BoolExpr {
            value: true,
            span: token.span,
        })),
        TokenKind::False => Ok(Expr::Bool(BoolExpr {
            value: false,
            span: token.span,
        })),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken {
                production: "primary_expression",
                expected: vec![TokenKind::Null, TokenKind::True, TokenKind::False],
                found: token.value,
            },
            token.span,
        )),
    }
}

// IDENTIFIERS

pub fn parse_identifier(parser: &mut Parser, production: &'static str) -> Result<Identifier, Error> {
    let token = parser.expect(TokenKind::Identifier, production)?;
    Ok(Identifier {
        name: token.value,
        span: token.span,
    })
}

/// Everything that starts with an identifier, told apart by the next token:
/// `(` call, `<` generic call (if it really is one), `.` field access,
/// `[` array access, anything else a bare identifier.
pub fn parse_identifier_expr(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.peek_kind(1) {
        TokenKind::OpenParen => parse_call_expr(parser, false),
        TokenKind::Less => {
            let checkpoint = parser.checkpoint();
            parser.advance();
            let is_call = speculate_call_generic(parser).is_some();
            parser.restore(checkpoint);

            if is_call {
                parse_call_expr(parser, true)
            } else {
                parse_identifier(parser, "identifier").map(Expr::Identifier)
            }
        }
        TokenKind::Dot => parse_field_access_expr(parser),
        TokenKind::OpenBracket => parse_array_access_expr(parser),
        _ => parse_identifier(parser, "identifier").map(Expr::Identifier),
    }
}

/// Tries `<T>(` after a callee name. Succeeds only for a non-generic `T`
/// closed by `>` and directly followed by `(`; otherwise the `<` is a
/// comparison.
fn speculate_call_generic(parser: &mut Parser) -> Option<Type> {
    parser.expect(TokenKind::Less, "generic").ok()?;
    let generic = parse_type(parser).ok()?;
    if !generic.is_non_generic() {
        return None;
    }
    parser.expect(TokenKind::Greater, "generic").ok()?;

    match parser.current_token_kind() {
        TokenKind::OpenParen => Some(generic),
        _ => None,
    }
}

/// `name(args)` or `name<T>(args)`
fn parse_call_expr(parser: &mut Parser, has_generic: bool) -> Result<Expr, Error> {
    let function = parse_identifier(parser, "call_expression")?;
    let start = function.span.start;

    let generic = match has_generic {
        true => Some(parse_generic_clause(parser)?),
        false => None,
    };

    let arguments = parse_arguments(parser)?;

    Ok(Expr::Call(CallExpr {
        function,
        generic,
        arguments,
        span: parser.span_from(start),
    }))
}

/// `(a, b, c)`; commas separate, no trailing comma.
fn parse_arguments(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    parser.expect(TokenKind::OpenParen, "arglist")?;

    let mut arguments = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_expr(parser, BindingPower::Default)?);

        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            arguments.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    parser.expect(TokenKind::CloseParen, "arglist")?;
    Ok(arguments)
}

pub fn parse_field_access_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let object = parse_identifier(parser, "field_access")?;
    let start = object.span.start;
    parser.expect(TokenKind::Dot, "field_access")?;
    let member = parse_primary_expr(parser)?;

    Ok(Expr::FieldAccess(FieldAccessExpr {
        object,
        member: Box::new(member),
        span: parser.span_from(start),
    }))
}

pub fn parse_array_access_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let base = parse_identifier(parser, "array_access")?;
    let start = base.span.start;
    parser.expect(TokenKind::OpenBracket, "array_access")?;
    let index = parse_primary_expr(parser)?;
    parser.expect(TokenKind::CloseBracket, "array_access")?;

    Ok(Expr::ArrayAccess(ArrayAccessExpr {
        base,
        index: Box::new(index),
        span: parser.span_from(start),
    }))
}

// MATCH

pub fn parse_match_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parse_match(parser).map(Expr::Match)
}

/// `match value { key => expr, ... }`; every arm ends with a comma.
pub fn parse_match(parser: &mut Parser) -> Result<MatchExpr, Error> {
    let start = parser.expect(TokenKind::Match, "match_expression")?.span.start;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::OpenCurly, "match_block")?;

    let mut arms = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly && parser.has_tokens() {
        let arm_start = parser.get_position();
        let key = parse_match_key(parser)?;
        parser.expect(TokenKind::FatArrow, "match_arm")?;
        let value = parse_expr(parser, BindingPower::Default)?;
        parser.expect(TokenKind::Comma, "match_arm")?;

        arms.push(MatchArm {
            key,
            value,
            span: parser.span_from(arm_start),
        });
    }

    parser.expect(TokenKind::CloseCurly, "match_block")?;

    Ok(MatchExpr {
        value: Box::new(value),
        arms,
        span: parser.span_from(start),
    })
}

fn parse_match_key(parser: &mut Parser) -> Result<MatchKey, Error> {
    match (parser.current_token_kind(), parser.peek_kind(1)) {
        (TokenKind::Identifier, TokenKind::FatArrow) => {
            parse_identifier(parser, "match_key").map(MatchKey::Identifier)
        }
        (TokenKind::Number, TokenKind::Pipe) => parse_constant_list(parser).map(MatchKey::Constants),
        (TokenKind::Number, TokenKind::FatArrow) => {
            parse_number_literal(parser, "match_key").map(MatchKey::Number)
        }
        (TokenKind::Char, TokenKind::FatArrow) => parse_char_literal(parser).map(MatchKey::Char),
        _ => parse_range(parser).map(MatchKey::Range),
    }
}

/// `1 | 2 | 3`, a trailing `|` being allowed.
fn parse_constant_list(parser: &mut Parser) -> Result<ConstantList, Error> {
    let start = parser.get_position();
    let mut values = vec![parse_number_literal(parser, "constant_list")?];
    parser.expect(TokenKind::Pipe, "constant_list")?;

    while parser.current_token_kind() == TokenKind::Number {
        values.push(parse_number_literal(parser, "constant_list")?);
        if parser.current_token_kind() == TokenKind::Pipe {
            parser.advance();
        }
    }

    Ok(ConstantList {
        values,
        span: parser.span_from(start),
    })
}

/// `start..end` or `start..=end`
pub fn parse_range(parser: &mut Parser) -> Result<RangeExpr, Error> {
    let start = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::DotDot, "range")?;

    let inclusive = parser.current_token_kind() == TokenKind::Assignment;
    if inclusive {
        parser.advance();
    }

    let end = parse_expr(parser, BindingPower::Default)?;

    Ok(RangeExpr {
        span: Span::new(start.get_span().start, end.get_span().end),
        start: Box::new(start),
        inclusive,
        end: Box::new(end),
    })
}

// STRUCTS

/// `Name<T> { field: value; ... }`
pub fn parse_struct_init_expr(parser: &mut Parser) -> Result<StructInitExpr, Error> {
    let name = parse_identifier(parser, "struct_initialization")?;
    let start = name.span.start;

    let generic = match parser.current_token_kind() {
        TokenKind::Less => Some(parse_generic_clause(parser)?),
        _ => None,
    };

    parser.expect(TokenKind::OpenCurly, "struct_initialization")?;

    let mut fields = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly && parser.has_tokens() {
        fields.push(parse_field_init(parser)?);
    }

    parser.expect(TokenKind::CloseCurly, "struct_initialization")?;

    Ok(StructInitExpr {
        name,
        generic,
        fields,
        span: parser.span_from(start),
    })
}

/// `name: value`, optionally followed by `;`
fn parse_field_init(parser: &mut Parser) -> Result<FieldInit, Error> {
    let name = parse_identifier(parser, "field_init")?;
    let start = name.span.start;
    parser.expect(TokenKind::Colon, "field_init")?;
    let value = parse_expr(parser, BindingPower::Default)?;

    if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
    }

    Ok(FieldInit {
        name,
        value,
        span: parser.span_from(start),
    })
}
