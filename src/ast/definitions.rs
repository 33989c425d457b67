//! Top-level definitions and the nodes shared across levels
//! (parameters, comments, error nodes).

use crate::Span;

use super::{
    ast::{child, field, Child, FieldName, Identifier, MutMarker, Node, NodeKind},
    statements::Block,
    types::Type,
};

/// The root of every parse.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub definitions: Vec<Definition>,
    pub span: Span,
}

impl Node for SourceFile {
    fn kind(&self) -> NodeKind {
        NodeKind::SourceFile
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        self.definitions.iter().map(|def| child(def)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Function(FunctionDef),
    Extern(ExternFunctionDef),
    Struct(StructDef),
    Use(UseStatement),
    Comment(Comment),
    /// Tokens skipped while recovering from a syntax error.
    Error(ErrorNode),
}

impl Definition {
    fn as_node(&self) -> &dyn Node {
        match self {
            Definition::Function(def) => def,
            Definition::Extern(def) => def,
            Definition::Struct(def) => def,
            Definition::Use(def) => def,
            Definition::Comment(def) => def,
            Definition::Error(def) => def,
        }
    }

    /// The defined name, for definitions that have one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Definition::Function(def) => Some(&def.name.name),
            Definition::Extern(def) => Some(&def.name.name),
            Definition::Struct(def) => Some(&def.name.name),
            _ => None,
        }
    }
}

impl Node for Definition {
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

/// `name: [mut] T`, used both for function parameters and struct fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Identifier,
    pub mutable: Option<MutMarker>,
    pub ty: Type,
    pub span: Span,
}

impl Node for Parameter {
    fn kind(&self) -> NodeKind {
        NodeKind::Parameter
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        let mut children = vec![field(FieldName::Name, &self.name)];
        if let Some(mutable) = &self.mutable {
            children.push(field(FieldName::Mut, mutable));
        }
        children.push(field(FieldName::Type, &self.ty));
        children
    }
}

/// Function Definition
/// `fn name<T>(params): R { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: Identifier,
    pub generic: Option<Type>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<Type>,
    pub body: Block,
    pub span: Span,
}

impl Node for FunctionDef {
    fn kind(&self) -> NodeKind {
        NodeKind::FunctionDefinition
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        let mut children = vec![field(FieldName::Name, &self.name)];
        if let Some(generic) = &self.generic {
            children.push(child(generic));
        }
        children.extend(self.parameters.iter().map(|param| child(param)));
        if let Some(return_type) = &self.return_type {
            children.push(field(FieldName::ReturnType, return_type));
        }
        children.push(field(FieldName::FuncBlock, &self.body));
        children
    }
}

/// `extern fn name(params): R;`
#[derive(Debug, Clone, PartialEq)]
pub struct ExternFunctionDef {
    pub name: Identifier,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<Type>,
    pub span: Span,
}

impl Node for ExternFunctionDef {
    fn kind(&self) -> NodeKind {
        NodeKind::ExternFunctionDefinition
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        let mut children = vec![field(FieldName::Name, &self.name)];
        children.extend(self.parameters.iter().map(|param| child(param)));
        if let Some(return_type) = &self.return_type {
            children.push(field(FieldName::ReturnType, return_type));
        }
        children
    }
}

/// Struct Definition
/// Fields come first; methods and comments may follow in any order.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    pub name: Identifier,
    pub generic: Option<Type>,
    pub fields: Vec<Parameter>,
    pub methods: Vec<FunctionDef>,
    pub comments: Vec<Comment>,
    pub span: Span,
}

impl Node for StructDef {
    fn kind(&self) -> NodeKind {
        NodeKind::StructDefinition
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        let mut members: Vec<Child<'_>> = vec![];
        members.extend(self.fields.iter().map(|f| child(f)));
        members.extend(self.methods.iter().map(|m| child(m)));
        members.extend(self.comments.iter().map(|c| child(c)));
        members.sort_by_key(|(_, node)| node.span().start.offset);

        let mut children = vec![field(FieldName::Name, &self.name)];
        if let Some(generic) = &self.generic {
            children.push(child(generic));
        }
        children.extend(members);
        children
    }
}

/// `use a::b.c;`
#[derive(Debug, Clone, PartialEq)]
pub struct UseStatement {
    pub path: Vec<Identifier>,
    pub span: Span,
}

impl UseStatement {
    /// The path joined with `::`.
    pub fn path_string(&self) -> String {
        self.path
            .iter()
            .map(|segment| segment.name.as_str())
            .collect::<Vec<_>>()
            .join("::")
    }
}

impl Node for UseStatement {
    fn kind(&self) -> NodeKind {
        NodeKind::UseStatement
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        self.path.iter().map(|segment| child(segment)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Doc,
    Block,
}

/// A comment standing in definition, statement or struct member position.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub kind: CommentKind,
    /// The full comment text, delimiters included.
    pub text: String,
    pub span: Span,
}

impl Node for Comment {
    fn kind(&self) -> NodeKind {
        NodeKind::Comment
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![]
    }
    fn text(&self) -> Option<String> {
        Some(format!("{:?}", self.text))
    }
}

/// Covers the tokens skipped after a syntax error.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorNode {
    pub span: Span,
}

impl Node for ErrorNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Error
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![]
    }
}
