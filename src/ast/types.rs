//! Type annotations in the AST.
//!
//! This module defines the shapes a type annotation can take:
//!
//! - Primitive types (`bool`, the integer types, `double`, `float`, `void`)
//! - `string`
//! - Named types (a bare identifier)
//! - Fixed-length arrays, pointers and references
//! - Generic types with a single, non-generic argument
//!
//! The parser performs no resolution: a named type is only a name.

use crate::{lexer::tokens::TokenKind, Span};

use super::{
    ast::{child, Child, Identifier, Node, NodeKind},
    expressions::NumberExpr,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
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

impl Primitive {
    pub fn from_token_kind(kind: TokenKind) -> Option<Primitive> {
        Some(match kind {
            TokenKind::Bool => Primitive::Bool,
            TokenKind::I32 => Primitive::I32,
            TokenKind::I64 => Primitive::I64,
            TokenKind::U32 => Primitive::U32,
            TokenKind::U64 => Primitive::U64,
            TokenKind::U8 => Primitive::U8,
            TokenKind::Double => Primitive::Double,
            TokenKind::Float => Primitive::Float,
            TokenKind::Void => Primitive::Void,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::I32 => "i32",
            Primitive::I64 => "i64",
            Primitive::U32 => "u32",
            Primitive::U64 => "u64",
            Primitive::U8 => "u8",
            Primitive::Double => "double",
            Primitive::Float => "float",
            Primitive::Void => "void",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(PrimitiveType),
    String(StringType),
    Named(NamedType),
    Array(ArrayType),
    Pointer(PointerType),
    Reference(ReferenceType),
    Generic(GenericType),
}

impl Type {
    fn as_node(&self) -> &dyn Node {
        match self {
            Type::Primitive(ty) => ty,
            Type::String(ty) => ty,
            Type::Named(ty) => ty,
            Type::Array(ty) => ty,
            Type::Pointer(ty) => ty,
            Type::Reference(ty) => ty,
            Type::Generic(ty) => ty,
        }
    }

    /// Whether the type may appear as a generic argument.
    pub fn is_non_generic(&self) -> bool {
        matches!(
            self,
            Type::Primitive(_) | Type::String(_) | Type::Named(_) | Type::Array(_)
        )
    }
}

impl Node for Type {
    fn kind(&self) -> NodeKind {
        self.as_node().kind()
    }
    fn span(&self) -> Span {
        self.as_node().span()
    }
    fn children(&self) -> Vec<Child<'_>> {
        self.as_node().children()
    }
    fn text(&self) -> Option<String> {
        self.as_node().text()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveType {
    pub primitive: Primitive,
    pub span: Span,
}

impl Node for PrimitiveType {
    fn kind(&self) -> NodeKind {
        NodeKind::PrimitiveType
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![]
    }
    fn text(&self) -> Option<String> {
        Some(self.primitive.as_str().to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringType {
    pub span: Span,
}

impl Node for StringType {
    fn kind(&self) -> NodeKind {
        NodeKind::StringType
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![]
    }
}

/// A type referred to by name, resolved later (if ever).
#[derive(Debug, Clone, PartialEq)]
pub struct NamedType {
    pub name: Identifier,
}

impl Node for NamedType {
    fn kind(&self) -> NodeKind {
        NodeKind::TypeIdentifier
    }
    fn span(&self) -> Span {
        self.name.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![]
    }
    fn text(&self) -> Option<String> {
        Some(self.name.name.clone())
    }
}

/// `[T; N]`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub element: Box<Type>,
    pub length: NumberExpr,
    pub span: Span,
}

impl Node for ArrayType {
    fn kind(&self) -> NodeKind {
        NodeKind::ArrayType
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![child(self.element.as_ref()), child(&self.length)]
    }
}

/// `*T`
#[derive(Debug, Clone, PartialEq)]
pub struct PointerType {
    pub pointee: Box<Type>,
    pub span: Span,
}

impl Node for PointerType {
    fn kind(&self) -> NodeKind {
        NodeKind::PointerType
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![child(self.pointee.as_ref())]
    }
}

/// `&T`
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceType {
    pub referent: Box<Type>,
    pub span: Span,
}

impl Node for ReferenceType {
    fn kind(&self) -> NodeKind {
        NodeKind::RefType
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![child(self.referent.as_ref())]
    }
}

/// `Name<T>`, where `T` is never itself generic.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericType {
    pub name: Identifier,
    pub argument: Box<Type>,
    pub span: Span,
}

impl Node for GenericType {
    fn kind(&self) -> NodeKind {
        NodeKind::GenericType
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![child(&self.name), child(self.argument.as_ref())]
    }
}
