use crate::{
    lexer::{literals::StringSegment, tokens::TokenKind},
    Span,
};

use super::{
    ast::{child, field, Child, FieldName, Identifier, Node, NodeKind},
    types::Type,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary(BinaryExpr),
    Number(NumberExpr),
    Char(CharExpr),
    String(StringExpr),
    Null(NullExpr),
    Bool(BoolExpr),
    Call(CallExpr),
    FieldAccess(FieldAccessExpr),
    Identifier(Identifier),
    Match(MatchExpr),
    Typecast(TypecastExpr),
    ArrayAccess(ArrayAccessExpr),
    StructInit(StructInitExpr),
    Range(RangeExpr),
}

impl Expr {
    fn as_node(&self) -> &dyn Node {
        match self {
            Expr::Binary(expr) => expr,
            Expr::Number(expr) => expr,
            Expr::Char(expr) => expr,
            Expr::String(expr) => expr,
            Expr::Null(expr) => expr,
            Expr::Bool(expr) => expr,
            Expr::Call(expr) => expr,
            Expr::FieldAccess(expr) => expr,
            Expr::Identifier(expr) => expr,
            Expr::Match(expr) => expr,
            Expr::Typecast(expr) => expr,
            Expr::ArrayAccess(expr) => expr,
            Expr::StructInit(expr) => expr,
            Expr::Range(expr) => expr,
        }
    }

    pub fn get_span(&self) -> Span {
        self.as_node().span()
    }
}

impl Node for Expr {
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Or,
    And,
    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    BitOr,
    BitXor,
    BitAnd,
    ShiftLeft,
    ShiftRight,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOperator {
    pub fn from_token_kind(kind: TokenKind) -> Option<BinaryOperator> {
        Some(match kind {
            TokenKind::Or => BinaryOperator::Or,
            TokenKind::And => BinaryOperator::And,
            TokenKind::Equals => BinaryOperator::Equals,
            TokenKind::NotEquals => BinaryOperator::NotEquals,
            TokenKind::Less => BinaryOperator::Less,
            TokenKind::LessEquals => BinaryOperator::LessEquals,
            TokenKind::Greater => BinaryOperator::Greater,
            TokenKind::GreaterEquals => BinaryOperator::GreaterEquals,
            TokenKind::Pipe => BinaryOperator::BitOr,
            TokenKind::Caret => BinaryOperator::BitXor,
            TokenKind::Ampersand => BinaryOperator::BitAnd,
            TokenKind::ShiftLeft => BinaryOperator::ShiftLeft,
            TokenKind::ShiftRight => BinaryOperator::ShiftRight,
            TokenKind::Plus => BinaryOperator::Add,
            TokenKind::Dash => BinaryOperator::Subtract,
            TokenKind::Star => BinaryOperator::Multiply,
            TokenKind::Slash => BinaryOperator::Divide,
            TokenKind::Percent => BinaryOperator::Modulo,
            _ => return None,
        })
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Or => "||",
            BinaryOperator::And => "&&",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEquals => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEquals => ">=",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
        }
    }
}

/// The operator token of a binary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    pub op: BinaryOperator,
    pub span: Span,
}

impl Node for Operator {
    fn kind(&self) -> NodeKind {
        NodeKind::Operator
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![]
    }
    fn text(&self) -> Option<String> {
        Some(self.op.symbol().to_string())
    }
}

/// Binary Expression
/// Precedence is resolved by the tree shape alone.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: Operator,
    pub right: Box<Expr>,
    pub span: Span,
}

impl Node for BinaryExpr {
    fn kind(&self) -> NodeKind {
        NodeKind::BinaryExpression
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![
            field(FieldName::Left, self.left.as_ref()),
            field(FieldName::Operator, &self.operator),
            field(FieldName::Right, self.right.as_ref()),
        ]
    }
}

// LITERALS

/// Number Expression
/// An unsigned integer literal; there is no float literal form.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberExpr {
    pub value: u64,
    pub span: Span,
}

impl Node for NumberExpr {
    fn kind(&self) -> NodeKind {
        NodeKind::Number
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![]
    }
    fn text(&self) -> Option<String> {
        Some(self.value.to_string())
    }
}

/// A run of plain text or a single escape inside a quoted literal.
#[derive(Debug, Clone, PartialEq)]
pub struct StringPart {
    pub segment: StringSegment,
    pub span: Span,
}

impl Node for StringPart {
    fn kind(&self) -> NodeKind {
        match self.segment {
            StringSegment::Text(_) => NodeKind::StringContent,
            _ => NodeKind::EscapeSequence,
        }
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![]
    }
    fn text(&self) -> Option<String> {
        Some(format!("{:?}", self.segment.raw()))
    }
}

fn decode(parts: &[StringPart]) -> String {
    let mut value = String::new();
    for part in parts {
        match &part.segment {
            StringSegment::Text(text) => value.push_str(text),
            StringSegment::Escape { value: ch, .. } => value.push(*ch),
            StringSegment::Invalid(_) => {}
        }
    }
    value
}

/// String Expression
#[derive(Debug, Clone, PartialEq)]
pub struct StringExpr {
    pub parts: Vec<StringPart>,
    pub span: Span,
}

impl StringExpr {
    /// The decoded contents, with escapes replaced by the characters they stand for.
    pub fn value(&self) -> String {
        decode(&self.parts)
    }
}

impl Node for StringExpr {
    fn kind(&self) -> NodeKind {
        NodeKind::StringLiteral
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        self.parts.iter().map(|part| child(part)).collect()
    }
}

/// Char Expression
#[derive(Debug, Clone, PartialEq)]
pub struct CharExpr {
    pub parts: Vec<StringPart>,
    pub span: Span,
}

impl CharExpr {
    /// The decoded character; `None` for a malformed literal.
    pub fn value(&self) -> Option<char> {
        let value = decode(&self.parts);
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }
}

impl Node for CharExpr {
    fn kind(&self) -> NodeKind {
        NodeKind::CharLiteral
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        self.parts.iter().map(|part| child(part)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NullExpr {
    pub span: Span,
}

impl Node for NullExpr {
    fn kind(&self) -> NodeKind {
        NodeKind::Null
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![]
    }
}

/// `true` or `false`
#[derive(Debug, Clone, PartialEq)]
pub struct BoolExpr {
    pub value: bool,
    pub span: Span,
}

impl Node for BoolExpr {
    fn kind(&self) -> NodeKind {
        if self.value {
            NodeKind::True
        } else {
            NodeKind::False
        }
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![]
    }
}

// ACCESS

/// Call Expression
/// `name<T>(a, b)`, the generic argument being optional.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub function: Identifier,
    pub generic: Option<Type>,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

impl Node for CallExpr {
    fn kind(&self) -> NodeKind {
        NodeKind::CallExpression
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        let mut children = vec![field(FieldName::Function, &self.function)];
        if let Some(generic) = &self.generic {
            children.push(child(generic));
        }
        children.extend(self.arguments.iter().map(|arg| child(arg)));
        children
    }
}

/// Field Access
/// `object.member`, where the member is itself a primary expression, so
/// `a.b.c()` nests to the right.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAccessExpr {
    pub object: Identifier,
    pub member: Box<Expr>,
    pub span: Span,
}

impl Node for FieldAccessExpr {
    fn kind(&self) -> NodeKind {
        NodeKind::FieldAccess
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![field(FieldName::Object, &self.object), child(self.member.as_ref())]
    }
}

/// `base[index]`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayAccessExpr {
    pub base: Identifier,
    pub index: Box<Expr>,
    pub span: Span,
}

impl Node for ArrayAccessExpr {
    fn kind(&self) -> NodeKind {
        NodeKind::ArrayAccess
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![child(&self.base), child(self.index.as_ref())]
    }
}

/// `value as T`
#[derive(Debug, Clone, PartialEq)]
pub struct TypecastExpr {
    pub value: Box<Expr>,
    pub target: Type,
    pub span: Span,
}

impl Node for TypecastExpr {
    fn kind(&self) -> NodeKind {
        NodeKind::Typecast
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![
            field(FieldName::Value, self.value.as_ref()),
            field(FieldName::Type, &self.target),
        ]
    }
}

// MATCH

#[derive(Debug, Clone, PartialEq)]
pub struct MatchExpr {
    pub value: Box<Expr>,
    pub arms: Vec<MatchArm>,
    pub span: Span,
}

impl Node for MatchExpr {
    fn kind(&self) -> NodeKind {
        NodeKind::MatchExpression
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        let mut children = vec![field(FieldName::Value, self.value.as_ref())];
        children.extend(self.arms.iter().map(|arm| child(arm)));
        children
    }
}

/// `key => value,`
#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    pub key: MatchKey,
    pub value: Expr,
    pub span: Span,
}

impl Node for MatchArm {
    fn kind(&self) -> NodeKind {
        NodeKind::MatchArm
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![child(&self.key), field(FieldName::Value, &self.value)]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchKey {
    /// Binds the matched value; also serves as the catch-all arm.
    Identifier(Identifier),
    Constants(ConstantList),
    Number(NumberExpr),
    Char(CharExpr),
    Range(RangeExpr),
}

impl MatchKey {
    fn as_node(&self) -> &dyn Node {
        match self {
            MatchKey::Identifier(key) => key,
            MatchKey::Constants(key) => key,
            MatchKey::Number(key) => key,
            MatchKey::Char(key) => key,
            MatchKey::Range(key) => key,
        }
    }
}

impl Node for MatchKey {
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

/// `1 | 2 | 3`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantList {
    pub values: Vec<NumberExpr>,
    pub span: Span,
}

impl Node for ConstantList {
    fn kind(&self) -> NodeKind {
        NodeKind::ConstantList
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        self.values.iter().map(|value| child(value)).collect()
    }
}

/// `start..end` or `start..=end`
#[derive(Debug, Clone, PartialEq)]
pub struct RangeExpr {
    pub start: Box<Expr>,
    pub inclusive: bool,
    pub end: Box<Expr>,
    pub span: Span,
}

impl Node for RangeExpr {
    fn kind(&self) -> NodeKind {
        NodeKind::Range
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![child(self.start.as_ref()), child(self.end.as_ref())]
    }
    fn text(&self) -> Option<String> {
        Some(String::from(if self.inclusive { "..=" } else { ".." }))
    }
}

// STRUCTS

/// Struct Initialization
/// `Name<T> { field: value; ... }`, only valid where an initializer is expected.
#[derive(Debug, Clone, PartialEq)]
pub struct StructInitExpr {
    pub name: Identifier,
    pub generic: Option<Type>,
    pub fields: Vec<FieldInit>,
    pub span: Span,
}

impl Node for StructInitExpr {
    fn kind(&self) -> NodeKind {
        NodeKind::StructInitialization
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        let mut children = vec![field(FieldName::Name, &self.name)];
        if let Some(generic) = &self.generic {
            children.push(child(generic));
        }
        children.extend(self.fields.iter().map(|init| child(init)));
        children
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInit {
    pub name: Identifier,
    pub value: Expr,
    pub span: Span,
}

impl Node for FieldInit {
    fn kind(&self) -> NodeKind {
        NodeKind::FieldInit
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![field(FieldName::Name, &self.name), field(FieldName::Value, &self.value)]
    }
}
