use crate::{
    ast::{
        ast::{MutMarker, Node},
        definitions::{Definition, ExternFunctionDef, FunctionDef, Parameter, StructDef, UseStatement},
        expressions::Expr,
        types::Type,
        statements::{
            ArrayAssignStmt, Block, BreakStmt, CallStmt, ContinueStmt, FieldAssignStmt, ForStmt,
            IfStmt, MatchStmt, ReturnStmt, Stmt, VarAssignStmt, VarDeclStmt, WhileStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    Position,
};

use super::{
    expr::{parse_identifier, parse_initializer_expr, parse_match, parse_primary_expr, parse_range},
    parser::{recover_statement, Parser},
    types::{parse_generic_clause, parse_type},
};

const STATEMENT_START: [TokenKind; 9] = [
    TokenKind::Let,
    TokenKind::Return,
    TokenKind::If,
    TokenKind::While,
    TokenKind::For,
    TokenKind::Break,
    TokenKind::Continue,
    TokenKind::Match,
    TokenKind::Identifier,
];

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token_kind = parser.current_token_kind();
    let Some(handler) = parser.get_stmt_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected("statement", &STATEMENT_START));
    };

    handler(parser)
}

/// `{ statement* }`
///
/// A broken statement becomes an error node and parsing resumes at the next
/// synchronization point. A missing `}` is reported but does not fail the
/// block, so the enclosing definition is kept.
pub fn parse_block(parser: &mut Parser) -> Result<Block, Error> {
    let start = parser.expect(TokenKind::OpenCurly, "block")?.span.start;
    let block_depth = parser.get_depth();

    let mut statements = vec![];
    loop {
        for comment in parser.take_comments() {
            statements.push(Stmt::Comment(comment));
        }

        let token_kind = parser.current_token_kind();
        if token_kind == TokenKind::CloseCurly
            || token_kind == TokenKind::EOF
            || token_kind.starts_definition()
        {
            break;
        }

        let stmt_start = parser.get_pos();
        let stmt_position = parser.get_position();
        match parse_stmt(parser) {
            Ok(stmt) => statements.push(stmt),
            Err(error) => {
                let node = recover_statement(parser, error, block_depth, stmt_start, stmt_position);
                statements.push(node);
            }
        }
    }

    if let Err(error) = parser.expect(TokenKind::CloseCurly, "block") {
        parser.record(error);
        parser.set_depth(block_depth.saturating_sub(1));
    }

    Ok(Block {
        statements,
        span: parser.span_from(start),
    })
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::Return, "return_statement")?.span.start;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon, "return_statement")?;

    Ok(Stmt::Return(ReturnStmt {
        value,
        span: parser.span_from(start),
    }))
}

/// `let [mut] name: T [= value];`
pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::Let, "variable_declaration")?.span.start;

    let mutable = match parser.current_token_kind() {
        TokenKind::Mut => Some(MutMarker {
            span: parser.advance().span,
        }),
        _ => None,
    };

    let name = parse_identifier(parser, "variable_declaration")?;
    parser.expect(TokenKind::Colon, "variable_declaration")?;
    let ty = parse_type(parser)?;

    let value = match parser.current_token_kind() {
        TokenKind::Assignment => {
            parser.advance();
            Some(parse_initializer_expr(parser)?)
        }
        _ => None,
    };

    parser.expect(TokenKind::Semicolon, "variable_declaration")?;

    Ok(Stmt::VarDecl(VarDeclStmt {
        mutable,
        name,
        ty,
        value,
        span: parser.span_from(start),
    }))
}

/// Statements that start with an identifier: assignments and call statements.
///
/// The target is parsed as a primary expression first; the token after it
/// decides which statement this is.
pub fn parse_identifier_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let target = parse_primary_expr(parser)?;

    match parser.current_token_kind() {
        TokenKind::Assignment => {
            parser.advance();
            let value = parse_expr(parser, BindingPower::Default)?;
            parse_assignment(parser, target, value, start)
        }
        TokenKind::OpenBracket => {
            parser.advance();
            let index = parse_primary_expr(parser)?;
            parser.expect(TokenKind::CloseBracket, "array_assignment")?;
            parser.expect(TokenKind::Assignment, "array_assignment")?;
            let value = parse_expr(parser, BindingPower::Default)?;
            parser.expect(TokenKind::Semicolon, "array_assignment")?;

            Ok(Stmt::ArrayAssign(ArrayAssignStmt {
                name: target,
                index,
                value,
                span: parser.span_from(start),
            }))
        }
        _ => match target {
            Expr::Call(call) => {
                parser.expect(TokenKind::Semicolon, "call_statement")?;
                Ok(Stmt::Call(CallStmt {
                    call,
                    span: parser.span_from(start),
                }))
            }
            _ => Err(parser.unexpected(
                "statement",
                &[TokenKind::Assignment, TokenKind::OpenBracket, TokenKind::OpenParen],
            )),
        },
    }
}

fn parse_assignment(
    parser: &mut Parser,
    target: Expr,
    value: Expr,
    start: Position,
) -> Result<Stmt, Error> {
    let production = match target {
        Expr::FieldAccess(_) => "field_assignment",
        Expr::ArrayAccess(_) => "array_assignment",
        _ => "variable_assignment",
    };
    parser.expect(TokenKind::Semicolon, production)?;
    let span = parser.span_from(start);

    match target {
        Expr::Identifier(name) => Ok(Stmt::VarAssign(VarAssignStmt { name, value, span })),
        Expr::FieldAccess(access) => match *access.member {
            member @ (Expr::Identifier(_) | Expr::ArrayAccess(_)) => {
                Ok(Stmt::FieldAssign(FieldAssignStmt {
                    object: access.object,
                    name: member,
                    value,
                    span,
                }))
            }
            member => Err(invalid_target(member, "field_assignment")),
        },
        Expr::ArrayAccess(access) => Ok(Stmt::ArrayAssign(ArrayAssignStmt {
            name: Expr::Identifier(access.base),
            index: *access.index,
            value,
            span,
        })),
        other => Err(invalid_target(other, "variable_assignment")),
    }
}

fn invalid_target(target: Expr, production: &'static str) -> Error {
    let span = target.get_span();
    Error::new(
        ErrorImpl::UnexpectedToken {
            production,
            expected: vec![TokenKind::Identifier],
            found: target_text(&target),
        },
        span,
    )
}

fn target_text(target: &Expr) -> String {
    match target {
        Expr::Call(call) => format!("{}(...)", call.function.name),
        Expr::FieldAccess(access) => format!("{}.", access.object.name),
        other => other.kind().to_string(),
    }
}

/// `if cond { ... } [else { ... }]`
pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::If, "if_statement")?.span.start;
    let condition = parse_expr(parser, BindingPower::Default)?;
    let if_block = parse_block(parser)?;

    let else_block = match parser.current_token_kind() {
        TokenKind::Else => {
            parser.advance();
            Some(parse_block(parser)?)
        }
        _ => None,
    };

    Ok(Stmt::If(IfStmt {
        condition,
        if_block,
        else_block,
        span: parser.span_from(start),
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::While, "while_statement")?.span.start;
    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_block(parser)?;

    Ok(Stmt::While(WhileStmt {
        condition,
        body,
        span: parser.span_from(start),
    }))
}

/// `for [let] name in (ident | range) { ... }`
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::For, "for_statement")?.span.start;

    let has_let = parser.current_token_kind() == TokenKind::Let;
    if has_let {
        parser.advance();
    }

    let binding = parse_identifier(parser, "for_statement")?;
    parser.expect(TokenKind::In, "for_statement")?;

    let iterable = match (parser.current_token_kind(), parser.peek_kind(1)) {
        (TokenKind::Identifier, TokenKind::OpenCurly) => {
            Expr::Identifier(parse_identifier(parser, "for_statement")?)
        }
        _ => Expr::Range(parse_range(parser)?),
    };

    let body = parse_block(parser)?;

    Ok(Stmt::For(ForStmt {
        has_let,
        binding,
        iterable,
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::Break, "break")?.span.start;
    parser.expect(TokenKind::Semicolon, "break")?;

    Ok(Stmt::Break(BreakStmt {
        span: parser.span_from(start),
    }))
}

pub fn parse_continue_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::Continue, "continue")?.span.start;
    parser.expect(TokenKind::Semicolon, "continue")?;

    Ok(Stmt::Continue(ContinueStmt {
        span: parser.span_from(start),
    }))
}

/// `match x { ... };`
pub fn parse_match_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let expr = parse_match(parser)?;
    parser.expect(TokenKind::Semicolon, "match_statement")?;

    Ok(Stmt::Match(MatchStmt {
        expr,
        span: parser.span_from(start),
    }))
}

// DEFINITIONS

/// `name: [mut] T [,]`
///
/// The comma is an optional terminator of each parameter, not a separator.
pub fn parse_parameter(parser: &mut Parser) -> Result<Parameter, Error> {
    let name = parse_identifier(parser, "parameter")?;
    let start = name.span.start;
    parser.expect(TokenKind::Colon, "parameter")?;

    let mutable = match parser.current_token_kind() {
        TokenKind::Mut => Some(MutMarker {
            span: parser.advance().span,
        }),
        _ => None,
    };

    let ty = parse_type(parser)?;
    let span = parser.span_from(start);

    if parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
    }

    Ok(Parameter {
        name,
        mutable,
        ty,
        span,
    })
}

pub fn parse_parameter_list(parser: &mut Parser) -> Result<Vec<Parameter>, Error> {
    parser.expect(TokenKind::OpenParen, "parameter_list")?;

    let mut parameters = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen && parser.has_tokens() {
        parameters.push(parse_parameter(parser)?);
    }

    parser.expect(TokenKind::CloseParen, "parameter_list")?;
    Ok(parameters)
}

fn parse_return_type(parser: &mut Parser) -> Result<Option<Type>, Error> {
    match parser.current_token_kind() {
        TokenKind::Colon => {
            parser.advance();
            Ok(Some(parse_type(parser)?))
        }
        _ => Ok(None),
    }
}

/// `use a::b.c;`
pub fn parse_use_definition(parser: &mut Parser) -> Result<Definition, Error> {
    let start = parser.expect(TokenKind::Use, "use_statement")?.span.start;

    let mut path = vec![];
    while parser.current_token_kind() == TokenKind::Identifier {
        path.push(parse_identifier(parser, "use_statement")?);

        if matches!(
            parser.current_token_kind(),
            TokenKind::ColonColon | TokenKind::Dot
        ) {
            parser.advance();
        }
    }

    parser.expect(TokenKind::Semicolon, "use_statement")?;

    Ok(Definition::Use(UseStatement {
        path,
        span: parser.span_from(start),
    }))
}

pub fn parse_function(parser: &mut Parser) -> Result<FunctionDef, Error> {
    let start = parser.expect(TokenKind::Fn, "function_definition")?.span.start;
    let name = parse_identifier(parser, "function_definition")?;

    let generic = match parser.current_token_kind() {
        TokenKind::Less => Some(parse_generic_clause(parser)?),
        _ => None,
    };

    let parameters = parse_parameter_list(parser)?;
    let return_type = parse_return_type(parser)?;
    let body = parse_block(parser)?;

    Ok(FunctionDef {
        name,
        generic,
        parameters,
        return_type,
        body,
        span: parser.span_from(start),
    })
}

pub fn parse_fn_definition(parser: &mut Parser) -> Result<Definition, Error> {
    parse_function(parser).map(Definition::Function)
}

/// `extern fn name(params): T;`
pub fn parse_extern_fn_definition(parser: &mut Parser) -> Result<Definition, Error> {
    let start = parser
        .expect(TokenKind::Extern, "extern_function_definition")?
        .span
        .start;
    parser.expect(TokenKind::Fn, "extern_function_definition")?;
    let name = parse_identifier(parser, "extern_function_definition")?;
    let parameters = parse_parameter_list(parser)?;
    let return_type = parse_return_type(parser)?;
    parser.expect(TokenKind::Semicolon, "extern_function_definition")?;

    Ok(Definition::Extern(ExternFunctionDef {
        name,
        parameters,
        return_type,
        span: parser.span_from(start),
    }))
}

/// `struct Name<T> { fields* (fn | comment)* }`
pub fn parse_struct_definition(parser: &mut Parser) -> Result<Definition, Error> {
    let start = parser.expect(TokenKind::Struct, "struct_definition")?.span.start;
    let name = parse_identifier(parser, "struct_definition")?;

    let generic = match parser.current_token_kind() {
        TokenKind::Less => Some(parse_generic_clause(parser)?),
        _ => None,
    };

    parser.expect(TokenKind::OpenCurly, "struct_definition")?;

    let mut fields = vec![];
    let mut methods = vec![];
    let mut comments = vec![];

    loop {
        comments.extend(parser.take_comments());
        if parser.current_token_kind() != TokenKind::Identifier {
            break;
        }
        fields.push(parse_parameter(parser)?);
    }

    loop {
        comments.extend(parser.take_comments());
        match parser.current_token_kind() {
            TokenKind::Fn => methods.push(parse_function(parser)?),
            TokenKind::CloseCurly => break,
            _ => {
                return Err(parser.unexpected(
                    "struct_definition",
                    &[TokenKind::Fn, TokenKind::CloseCurly],
                ))
            }
        }
    }

    parser.expect(TokenKind::CloseCurly, "struct_definition")?;

    Ok(Definition::Struct(StructDef {
        name,
        generic,
        fields,
        methods,
        comments,
        span: parser.span_from(start),
    }))
}
