use crate::Span;

use super::{
    ast::{child, field, Child, FieldName, Identifier, MutMarker, Node, NodeKind},
    definitions::{Comment, ErrorNode},
    expressions::{CallExpr, Expr, MatchExpr},
    types::Type,
};

/// Block Statement
/// A `{ ... }` body. Delimits scope, though nothing here resolves names.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

impl Node for Block {
    fn kind(&self) -> NodeKind {
        NodeKind::Block
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        self.statements.iter().map(|stmt| child(stmt)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Return(ReturnStmt),
    VarDecl(VarDeclStmt),
    VarAssign(VarAssignStmt),
    FieldAssign(FieldAssignStmt),
    ArrayAssign(ArrayAssignStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Comment(Comment),
    Call(CallStmt),
    Match(MatchStmt),
    /// Tokens skipped while recovering from a syntax error.
    Error(ErrorNode),
}

impl Stmt {
    fn as_node(&self) -> &dyn Node {
        match self {
            Stmt::Return(stmt) => stmt,
            Stmt::VarDecl(stmt) => stmt,
            Stmt::VarAssign(stmt) => stmt,
            Stmt::FieldAssign(stmt) => stmt,
            Stmt::ArrayAssign(stmt) => stmt,
            Stmt::If(stmt) => stmt,
            Stmt::While(stmt) => stmt,
            Stmt::For(stmt) => stmt,
            Stmt::Break(stmt) => stmt,
            Stmt::Continue(stmt) => stmt,
            Stmt::Comment(stmt) => stmt,
            Stmt::Call(stmt) => stmt,
            Stmt::Match(stmt) => stmt,
            Stmt::Error(stmt) => stmt,
        }
    }

    pub fn get_span(&self) -> Span {
        self.as_node().span()
    }
}

impl Node for Stmt {
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
pub struct ReturnStmt {
    pub value: Expr,
    pub span: Span,
}

impl Node for ReturnStmt {
    fn kind(&self) -> NodeKind {
        NodeKind::ReturnStatement
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![child(&self.value)]
    }
}

/// Variable Declaration
/// `let [mut] name: T [= value];`, the type annotation is mandatory.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub mutable: Option<MutMarker>,
    pub name: Identifier,
    pub ty: Type,
    pub value: Option<Expr>,
    pub span: Span,
}

impl VarDeclStmt {
    pub fn is_mutable(&self) -> bool {
        self.mutable.is_some()
    }
}

impl Node for VarDeclStmt {
    fn kind(&self) -> NodeKind {
        NodeKind::VariableDeclaration
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        let mut children = vec![];
        if let Some(mutable) = &self.mutable {
            children.push(child(mutable));
        }
        children.push(field(FieldName::Name, &self.name));
        children.push(field(FieldName::Type, &self.ty));
        if let Some(value) = &self.value {
            children.push(field(FieldName::Value, value));
        }
        children
    }
}

/// `name = value;`
#[derive(Debug, Clone, PartialEq)]
pub struct VarAssignStmt {
    pub name: Identifier,
    pub value: Expr,
    pub span: Span,
}

impl Node for VarAssignStmt {
    fn kind(&self) -> NodeKind {
        NodeKind::VariableAssignment
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![field(FieldName::Name, &self.name), field(FieldName::Value, &self.value)]
    }
}

/// `object.name = value;`, where `name` is an identifier or an array access.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAssignStmt {
    pub object: Identifier,
    pub name: Expr,
    pub value: Expr,
    pub span: Span,
}

impl Node for FieldAssignStmt {
    fn kind(&self) -> NodeKind {
        NodeKind::FieldAssignment
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![
            field(FieldName::Object, &self.object),
            field(FieldName::Name, &self.name),
            field(FieldName::Value, &self.value),
        ]
    }
}

/// `name[index] = value;`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayAssignStmt {
    pub name: Expr,
    pub index: Expr,
    pub value: Expr,
    pub span: Span,
}

impl Node for ArrayAssignStmt {
    fn kind(&self) -> NodeKind {
        NodeKind::ArrayAssignment
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![
            field(FieldName::Name, &self.name),
            child(&self.index),
            field(FieldName::Value, &self.value),
        ]
    }
}

/// If Statement
/// There is no `else if`; the else branch is always a block.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub if_block: Block,
    pub else_block: Option<Block>,
    pub span: Span,
}

impl Node for IfStmt {
    fn kind(&self) -> NodeKind {
        NodeKind::IfStatement
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        let mut children = vec![
            child(&self.condition),
            field(FieldName::IfBlock, &self.if_block),
        ];
        if let Some(else_block) = &self.else_block {
            children.push(field(FieldName::ElseBlock, else_block));
        }
        children
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Block,
    pub span: Span,
}

impl Node for WhileStmt {
    fn kind(&self) -> NodeKind {
        NodeKind::WhileStatement
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![child(&self.condition), child(&self.body)]
    }
}

/// `for [let] name in iterable { ... }`, the iterable being an identifier or a range.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub has_let: bool,
    pub binding: Identifier,
    pub iterable: Expr,
    pub body: Block,
    pub span: Span,
}

impl Node for ForStmt {
    fn kind(&self) -> NodeKind {
        NodeKind::ForStatement
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![child(&self.binding), child(&self.iterable), child(&self.body)]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakStmt {
    pub span: Span,
}

impl Node for BreakStmt {
    fn kind(&self) -> NodeKind {
        NodeKind::Break
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContinueStmt {
    pub span: Span,
}

impl Node for ContinueStmt {
    fn kind(&self) -> NodeKind {
        NodeKind::Continue
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![]
    }
}

/// A call used as a statement: `f(x);`
#[derive(Debug, Clone, PartialEq)]
pub struct CallStmt {
    pub call: CallExpr,
    pub span: Span,
}

impl Node for CallStmt {
    fn kind(&self) -> NodeKind {
        NodeKind::CallStatement
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![child(&self.call)]
    }
}

/// A match used as a statement: `match x { ... };`
#[derive(Debug, Clone, PartialEq)]
pub struct MatchStmt {
    pub expr: MatchExpr,
    pub span: Span,
}

impl Node for MatchStmt {
    fn kind(&self) -> NodeKind {
        NodeKind::MatchStatement
    }
    fn span(&self) -> Span {
        self.span
    }
    fn children(&self) -> Vec<Child<'_>> {
        vec![child(&self.expr)]
    }
}
