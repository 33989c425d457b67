use std::fmt::{Debug, Display};

use crate::Span;

/// Node kinds, named after the grammar rules they come from.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum NodeKind {
    SourceFile,
    UseStatement,
    StructDefinition,
    FunctionDefinition,
    ExternFunctionDefinition,
    Parameter,
    Mut,
    Comment,
    Error,

    // Types
    PrimitiveType,
    StringType,
    TypeIdentifier,
    ArrayType,
    PointerType,
    RefType,
    GenericType,

    // Statements
    Block,
    ReturnStatement,
    VariableDeclaration,
    VariableAssignment,
    FieldAssignment,
    ArrayAssignment,
    IfStatement,
    WhileStatement,
    ForStatement,
    Break,
    Continue,
    CallStatement,
    MatchStatement,

    // Expressions
    BinaryExpression,
    Operator,
    Number,
    CharLiteral,
    StringLiteral,
    StringContent,
    EscapeSequence,
    Null,
    True,
    False,
    CallExpression,
    FieldAccess,
    Identifier,
    MatchExpression,
    MatchArm,
    ConstantList,
    Typecast,
    ArrayAccess,
    StructInitialization,
    FieldInit,
    Range,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::SourceFile => "source_file",
            NodeKind::UseStatement => "use_statement",
            NodeKind::StructDefinition => "struct_definition",
            NodeKind::FunctionDefinition => "function_definition",
            NodeKind::ExternFunctionDefinition => "extern_function_definition",
            NodeKind::Parameter => "parameter",
            NodeKind::Mut => "mut",
            NodeKind::Comment => "comment",
            NodeKind::Error => "ERROR",
            NodeKind::PrimitiveType => "primitive_type",
            NodeKind::StringType => "string_type",
            NodeKind::TypeIdentifier => "type_identifier",
            NodeKind::ArrayType => "array_type",
            NodeKind::PointerType => "pointer_type",
            NodeKind::RefType => "ref_type",
            NodeKind::GenericType => "generic_type",
            NodeKind::Block => "block",
            NodeKind::ReturnStatement => "return_statement",
            NodeKind::VariableDeclaration => "variable_declaration",
            NodeKind::VariableAssignment => "variable_assignment",
            NodeKind::FieldAssignment => "field_assignment",
            NodeKind::ArrayAssignment => "array_assignment",
            NodeKind::IfStatement => "if_statement",
            NodeKind::WhileStatement => "while_statement",
            NodeKind::ForStatement => "for_statement",
            NodeKind::Break => "break",
            NodeKind::Continue => "continue",
            NodeKind::CallStatement => "call_statement",
            NodeKind::MatchStatement => "match_statement",
            NodeKind::BinaryExpression => "binary_expression",
            NodeKind::Operator => "operator",
            NodeKind::Number => "number",
            NodeKind::CharLiteral => "char_literal",
            NodeKind::StringLiteral => "string_literal",
            NodeKind::StringContent => "string_content",
            NodeKind::EscapeSequence => "escape_sequence",
            NodeKind::Null => "null",
            NodeKind::True => "true",
            NodeKind::False => "false",
            NodeKind::CallExpression => "call_expression",
            NodeKind::FieldAccess => "field_access",
            NodeKind::Identifier => "identifier",
            NodeKind::MatchExpression => "match_expression",
            NodeKind::MatchArm => "match_arm",
            NodeKind::ConstantList => "constant_list",
            NodeKind::Typecast => "typecast",
            NodeKind::ArrayAccess => "array_access",
            NodeKind::StructInitialization => "struct_initialization",
            NodeKind::FieldInit => "field_init",
            NodeKind::Range => "range",
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Field labels downstream tools use to pick out specific children.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum FieldName {
    Name,
    Type,
    Mut,
    Value,
    Object,
    Function,
    Left,
    Operator,
    Right,
    IfBlock,
    ElseBlock,
    FuncBlock,
    ReturnType,
}

impl FieldName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Name => "name",
            FieldName::Type => "type",
            FieldName::Mut => "mut",
            FieldName::Value => "value",
            FieldName::Object => "object",
            FieldName::Function => "function",
            FieldName::Left => "left",
            FieldName::Operator => "operator",
            FieldName::Right => "right",
            FieldName::IfBlock => "if_block",
            FieldName::ElseBlock => "else_block",
            FieldName::FuncBlock => "func_block",
            FieldName::ReturnType => "return_type",
        }
    }
}

impl Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A child node together with its field label, if the grammar gives it one.
pub type Child<'a> = (Option<FieldName>, &'a dyn Node);

/// An unlabeled child.
pub fn child(node: &dyn Node) -> Child<'_> {
    (None, node)
}

/// A child under the field label `name`.
pub fn field(name: FieldName, node: &dyn Node) -> Child<'_> {
    (Some(name), node)
}

/// Node Trait
///
/// Uniform read-only access to every node in the tree.
pub trait Node: Debug {
    /// Returns the grammar kind of the node.
    fn kind(&self) -> NodeKind;
    /// Returns the span of the node.
    fn span(&self) -> Span;
    /// Returns the named children in source order.
    fn children(&self) -> Vec<Child<'_>>;
    /// Leaf text for identifiers, literals and operators.
    fn text(&self) -> Option<String> {
        None
    }
    /// Returns the first child carrying `field`.
    fn child_by_field(&self, field: FieldName) -> Option<&dyn Node> {
        self.children()
            .into_iter()
            .find(|(name, _)| *name == Some(field))
            .map(|(_, node)| node)
    }
}

/// A name as written in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Node for Identifier {
    fn kind(&self) -> NodeKind {
        NodeKind::Identifier
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![]
    }
    fn text(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

/// The `mut` marker on parameters and declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct MutMarker {
    pub span: Span,
}

impl Node for MutMarker {
    fn kind(&self) -> NodeKind {
        NodeKind::Mut
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![]
    }
}

/// Renders `node` as an S-expression, e.g.
/// `(binary_expression left: (number 1) operator: (operator +) right: (number 2))`.
pub fn to_sexp(node: &dyn Node) -> String {
    let mut out = String::new();
    write_sexp(node, &mut out);
    out
}

fn write_sexp(node: &dyn Node, out: &mut String) {
    out.push('(');
    out.push_str(node.kind().as_str());

    if let Some(text) = node.text() {
        out.push(' ');
        out.push_str(&text);
    }

    for (field, child) in node.children() {
        out.push(' ');
        if let Some(field) = field {
            out.push_str(field.as_str());
            out.push_str(": ");
        }
        write_sexp(child, out);
    }

    out.push(')');
}

/// Calls `visit` on `node` and every descendant, parents first.
pub fn walk<'a>(node: &'a dyn Node, visit: &mut dyn FnMut(&'a dyn Node)) {
    visit(node);
    for (_, child) in node.children() {
        walk(child, visit);
    }
}
