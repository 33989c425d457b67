//! Type parsing implementation.
//!
//! This module handles parsing of type annotations. Dispatch is on the
//! first token alone:
//!
//! - `*` pointer, `&` reference (`&&` is two references)
//! - `[T; N]` arrays
//! - primitive keywords and `string`
//! - identifiers, generic when directly followed by `<`
//!
//! Type parsing never records diagnostics itself; it only returns errors,
//! which keeps it safe to call while speculating.

use std::collections::HashMap;

use crate::{
    ast::{
        ast::{Identifier, Node},
        types::{
            ArrayType, GenericType, NamedType, PointerType, Primitive, PrimitiveType,
            ReferenceType, StringType, Type,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{expr::parse_number_literal, parser::Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<Type, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

const TYPE_START: [TokenKind; 15] = [
    TokenKind::Star,
    TokenKind::Ampersand,
    TokenKind::OpenBracket,
    TokenKind::Identifier,
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
    TokenKind::And,
];

/// Initializes the type parsing lookup table.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Star, parse_pointer_type);
    parser.type_nud(TokenKind::Ampersand, parse_reference_type);
    parser.type_nud(TokenKind::And, parse_double_reference_type);
    parser.type_nud(TokenKind::OpenBracket, parse_array_type);
    parser.type_nud(TokenKind::StringType, parse_string_type);
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);

    for kind in [
        TokenKind::Bool,
        TokenKind::I32,
        TokenKind::I64,
        TokenKind::U32,
        TokenKind::U64,
        TokenKind::U8,
        TokenKind::Double,
        TokenKind::Float,
        TokenKind::Void,
    ] {
        parser.type_nud(kind, parse_primitive_type);
    }
}

pub fn parse_type(parser: &mut Parser) -> Result<Type, Error> {
    let token_kind = parser.current_token_kind();
    let Some(handler) = parser.get_type_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected("type", &TYPE_START));
    };

    handler(parser)
}

pub fn parse_primitive_type(parser: &mut Parser) -> Result<Type, Error> {
    let token = parser.advance();
    match Primitive::from_token_kind(token.kind) {
        Some(primitive) => Ok(Type::Primitive(PrimitiveType {
            primitive,
            span: token.span,
        })),
        None => Err(Error::new(
            ErrorImpl::UnexpectedToken {
                production: "primitive_type",
                expected: TYPE_START[5..14].to_vec(),
                found: token.value,
            },
            token.span,
        )),
    }
}

pub fn parse_string_type(parser: &mut Parser) -> Result<Type, Error> {
    let token = parser.expect(TokenKind::StringType, "type")?;
    Ok(Type::String(StringType { span: token.span }))
}

/// `Name` or `Name<T>`
pub fn parse_symbol_type(parser: &mut Parser) -> Result<Type, Error> {
    let token = parser.expect(TokenKind::Identifier, "type")?;
    let name = Identifier {
        name: token.value,
        span: token.span,
    };

    if parser.current_token_kind() != TokenKind::Less {
        return Ok(Type::Named(NamedType { name }));
    }

    let argument = parse_generic_clause(parser)?;
    Ok(Type::Generic(GenericType {
        span: parser.span_from(name.span.start),
        name,
        argument: Box::new(argument),
    }))
}

pub fn parse_pointer_type(parser: &mut Parser) -> Result<Type, Error> {
    let start = parser.expect(TokenKind::Star, "pointer_type")?.span.start;
    let pointee = parse_type(parser)?;

    Ok(Type::Pointer(PointerType {
        pointee: Box::new(pointee),
        span: parser.span_from(start),
    }))
}

pub fn parse_reference_type(parser: &mut Parser) -> Result<Type, Error> {
    let start = parser.expect(TokenKind::Ampersand, "ref_type")?.span.start;
    let referent = parse_type(parser)?;

    Ok(Type::Reference(ReferenceType {
        referent: Box::new(referent),
        span: parser.span_from(start),
    }))
}

/// `&&T`, lexed as a single token, is a reference to a reference.
pub fn parse_double_reference_type(parser: &mut Parser) -> Result<Type, Error> {
    let token = parser.expect(TokenKind::And, "ref_type")?;
    let referent = parse_type(parser)?;

    let mut inner_start = token.span.start;
    inner_start.offset += 1;
    inner_start.column += 1;

    let inner = Type::Reference(ReferenceType {
        referent: Box::new(referent),
        span: parser.span_from(inner_start),
    });

    Ok(Type::Reference(ReferenceType {
        referent: Box::new(inner),
        span: parser.span_from(token.span.start),
    }))
}

/// `[T; N]`
pub fn parse_array_type(parser: &mut Parser) -> Result<Type, Error> {
    let start = parser.expect(TokenKind::OpenBracket, "array_type")?.span.start;
    let element = parse_type(parser)?;
    parser.expect(TokenKind::Semicolon, "array_type")?;
    let length = parse_number_literal(parser, "array_type")?;
    parser.expect(TokenKind::CloseBracket, "array_type")?;

    Ok(Type::Array(ArrayType {
        element: Box::new(element),
        length,
        span: parser.span_from(start),
    }))
}

/// Parses `<T>` and returns `T`.
///
/// `T` must be a primitive, `string`, a plain name or an array type;
/// generics do not nest.
pub fn parse_generic_clause(parser: &mut Parser) -> Result<Type, Error> {
    parser.expect(TokenKind::Less, "generic")?;
    let argument = parse_type(parser)?;

    if !argument.is_non_generic() {
        return Err(Error::new(
            ErrorImpl::MalformedGeneric {
                found: argument.kind().to_string(),
            },
            argument.span(),
        ));
    }

    parser.expect(TokenKind::Greater, "generic")?;
    Ok(argument)
}
