//! Unit tests for the parser module.
//!
//! This module contains tests for parsing including:
//! - Operator precedence and associativity
//! - Identifier disambiguation (calls, generics, comparisons)
//! - Statements and definitions
//! - Type annotations
//! - Comments in the tree
//! - Error recovery

use rstest::rstest;

use crate::{
    ast::{
        ast::{to_sexp, walk, FieldName, Node, NodeKind},
        definitions::{CommentKind, Definition, SourceFile},
        expressions::Expr,
        statements::{Block, Stmt},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{lexer::tokenize, tokens::TokenKind},
};

use super::parser::{parse, Parser};

fn parse_with_errors(source: &str) -> (SourceFile, Vec<Error>) {
    let (stream, lex_errors) = tokenize(source);
    assert!(lex_errors.is_empty(), "unexpected lexical errors: {:?}", lex_errors);
    parse(&stream)
}

fn parse_ok(source: &str) -> SourceFile {
    let (file, errors) = parse_with_errors(source);
    assert!(errors.is_empty(), "unexpected syntax errors: {:?}", errors);
    file
}

fn body(file: &SourceFile, index: usize) -> &Block {
    match &file.definitions[index] {
        Definition::Function(function) => &function.body,
        other => panic!("expected a function, got {:?}", other),
    }
}

/// Parses `source` as the value of a `return` and renders it.
fn expr_sexp(source: &str) -> String {
    let file = parse_ok(&format!("fn main() {{ return {}; }}", source));
    match &body(&file, 0).statements[0] {
        Stmt::Return(ret) => to_sexp(&ret.value),
        other => panic!("expected a return statement, got {:?}", other),
    }
}

/// Parses `source` as the body of `main` and renders its first statement.
fn stmt_sexp(source: &str) -> String {
    let file = parse_ok(&format!("fn main() {{ {} }}", source));
    to_sexp(&body(&file, 0).statements[0])
}

fn type_sexp(source: &str) -> String {
    let file = parse_ok(&format!("fn main() {{ let v: {} = null; }}", source));
    match &body(&file, 0).statements[0] {
        Stmt::VarDecl(decl) => to_sexp(&decl.ty),
        other => panic!("expected a declaration, got {:?}", other),
    }
}

// EXPRESSIONS

#[rstest]
#[case(
    "1 + 2 * 3",
    "(binary_expression left: (number 1) operator: (operator +) right: (binary_expression left: (number 2) operator: (operator *) right: (number 3)))"
)]
#[case(
    "1 - 2 - 3",
    "(binary_expression left: (binary_expression left: (number 1) operator: (operator -) right: (number 2)) operator: (operator -) right: (number 3))"
)]
#[case(
    "a || b && c",
    "(binary_expression left: (identifier a) operator: (operator ||) right: (binary_expression left: (identifier b) operator: (operator &&) right: (identifier c)))"
)]
#[case(
    "a == b | c",
    "(binary_expression left: (identifier a) operator: (operator ==) right: (binary_expression left: (identifier b) operator: (operator |) right: (identifier c)))"
)]
#[case(
    "1 << 2 + 3",
    "(binary_expression left: (number 1) operator: (operator <<) right: (binary_expression left: (number 2) operator: (operator +) right: (number 3)))"
)]
#[case(
    "a ^ b & c",
    "(binary_expression left: (identifier a) operator: (operator ^) right: (binary_expression left: (identifier b) operator: (operator &) right: (identifier c)))"
)]
#[case(
    "8 % 3 / 2",
    "(binary_expression left: (binary_expression left: (number 8) operator: (operator %) right: (number 3)) operator: (operator /) right: (number 2))"
)]
fn test_binary_precedence(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(expr_sexp(source), expected);
}

#[test]
fn test_typecast_binds_tighter_than_arithmetic() {
    assert_eq!(
        expr_sexp("x as i32 + 1"),
        "(binary_expression left: (typecast value: (identifier x) type: (primitive_type i32)) operator: (operator +) right: (number 1))"
    );
}

#[rstest]
#[case(
    "x as Foo < y",
    "(binary_expression left: (typecast value: (identifier x) type: (type_identifier Foo)) operator: (operator <) right: (identifier y))"
)]
#[case(
    "x as Foo < 3",
    "(binary_expression left: (typecast value: (identifier x) type: (type_identifier Foo)) operator: (operator <) right: (number 3))"
)]
#[case(
    "x as Foo<i32>",
    "(typecast value: (identifier x) type: (generic_type (identifier Foo) (primitive_type i32)))"
)]
fn test_typecast_to_named_type_before_less(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(expr_sexp(source), expected);
}

#[test]
fn test_typecast_comparison_as_condition() {
    let file = parse_ok("fn a() { if x as Foo < y { break; } }");
    assert!(matches!(&body(&file, 0).statements[..], [Stmt::If(_)]));
}

#[test]
fn test_typecast_rejects_nested_generic() {
    let (_, errors) = parse_with_errors("fn a() { return x as Foo<*u8>; }");
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0].get_impl(),
        ErrorImpl::MalformedGeneric { .. }
    ));
}

#[rstest]
#[case("a(1, 2)", "(call_expression function: (identifier a) (number 1) (number 2))")]
#[case("a()", "(call_expression function: (identifier a))")]
#[case("a<i32>(1)", "(call_expression function: (identifier a) (primitive_type i32) (number 1))")]
#[case(
    "a < b",
    "(binary_expression left: (identifier a) operator: (operator <) right: (identifier b))"
)]
#[case("a.b", "(field_access object: (identifier a) (identifier b))")]
#[case(
    "a.b.c()",
    "(field_access object: (identifier a) (field_access object: (identifier b) (call_expression function: (identifier c))))"
)]
#[case("arr[i]", "(array_access (identifier arr) (identifier i))")]
fn test_identifier_forms(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(expr_sexp(source), expected);
}

#[test]
fn test_generic_call_needs_paren() {
    // `a < b > c` is two comparisons, not a generic call
    assert_eq!(
        expr_sexp("a < b > c"),
        "(binary_expression left: (binary_expression left: (identifier a) operator: (operator <) right: (identifier b)) operator: (operator >) right: (identifier c))"
    );
}

#[test]
fn test_literals() {
    assert_eq!(expr_sexp("null"), "(null)");
    assert_eq!(expr_sexp("true"), "(true)");
    assert_eq!(expr_sexp("false"), "(false)");
    assert_eq!(expr_sexp("'a'"), "(char_literal (string_content \"a\"))");
    assert_eq!(
        expr_sexp(r#""hi\n""#),
        r#"(string_literal (string_content "hi") (escape_sequence "\\n"))"#
    );
}

#[test]
fn test_string_value_decodes_escapes() {
    let file = parse_ok(r#"fn main() { return "a\x41"; }"#);
    let Stmt::Return(ret) = &body(&file, 0).statements[0] else {
        panic!("expected a return statement");
    };
    let Expr::String(string) = &ret.value else {
        panic!("expected a string literal");
    };

    assert_eq!(string.value(), "aA");
    assert_eq!(string.parts.len(), 2);
    // The escape part starts right after `"a`
    assert_eq!(string.parts[1].span.start.column, 22);
}

#[test]
fn test_char_value() {
    let file = parse_ok(r"fn main() { return '\u{41}'; }");
    let Stmt::Return(ret) = &body(&file, 0).statements[0] else {
        panic!("expected a return statement");
    };
    let Expr::Char(ch) = &ret.value else {
        panic!("expected a char literal");
    };
    assert_eq!(ch.value(), Some('A'));
}

#[test]
fn test_number_overflow() {
    let (_, errors) = parse_with_errors("fn main() { return 99999999999999999999; }");

    assert_eq!(errors.len(), 1);
    assert_eq!(
        *errors[0].get_impl(),
        ErrorImpl::NumberParseError {
            token: String::from("99999999999999999999")
        }
    );
}

#[test]
fn test_match_expression() {
    let sexp = stmt_sexp("let y: i32 = match x { 1 | 2 => 10, 'c' => 20, 3..=9 => 30, other => 40, };");

    assert_eq!(
        sexp,
        "(variable_declaration name: (identifier y) type: (primitive_type i32) value: (match_expression value: (identifier x) \
         (match_arm (constant_list (number 1) (number 2)) value: (number 10)) \
         (match_arm (char_literal (string_content \"c\")) value: (number 20)) \
         (match_arm (range ..= (number 3) (number 9)) value: (number 30)) \
         (match_arm (identifier other) value: (number 40))))"
    );
}

#[test]
fn test_match_arm_requires_trailing_comma() {
    let (file, errors) = parse_with_errors("fn main() { let x: i32 = match y { 1 => 2 }; }");

    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0].get_impl(),
        ErrorImpl::MissingToken {
            production: "match_arm",
            expected: TokenKind::Comma,
            ..
        }
    ));
    assert!(matches!(&body(&file, 0).statements[..], [Stmt::Error(_)]));
}

#[test]
fn test_struct_initialization() {
    assert_eq!(
        stmt_sexp("let p: Point = Point { x: 1; y: 2 };"),
        "(variable_declaration name: (identifier p) type: (type_identifier Point) value: (struct_initialization name: (identifier Point) \
         (field_init name: (identifier x) value: (number 1)) (field_init name: (identifier y) value: (number 2))))"
    );
    assert_eq!(
        stmt_sexp("let b: Box<i32> = Box<i32> { value: 1 };"),
        "(variable_declaration name: (identifier b) type: (generic_type (identifier Box) (primitive_type i32)) value: (struct_initialization name: (identifier Box) \
         (primitive_type i32) (field_init name: (identifier value) value: (number 1))))"
    );
}

#[test]
fn test_struct_initialization_only_in_initializers() {
    let (_, errors) = parse_with_errors("fn main() { return Point { x: 1 }; }");
    assert!(!errors.is_empty());
    assert_eq!(errors[0].get_error_name(), "MissingToken");
}

// STATEMENTS

#[rstest]
#[case("x = 1;", "(variable_assignment name: (identifier x) value: (number 1))")]
#[case(
    "p.x = 3;",
    "(field_assignment object: (identifier p) name: (identifier x) value: (number 3))"
)]
#[case(
    "p.items[1] = 2;",
    "(field_assignment object: (identifier p) name: (array_access (identifier items) (number 1)) value: (number 2))"
)]
#[case(
    "arr[0] = 5;",
    "(array_assignment name: (identifier arr) (number 0) value: (number 5))"
)]
#[case(
    "print(\"hi\");",
    "(call_statement (call_expression function: (identifier print) (string_literal (string_content \"hi\"))))"
)]
#[case("break;", "(break)")]
#[case("continue;", "(continue)")]
fn test_simple_statements(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(stmt_sexp(source), expected);
}

#[test]
fn test_var_decl() {
    let file = parse_ok("fn main() { let mut count: u32; let s: string = \"x\"; }");
    let statements = &body(&file, 0).statements;

    let Stmt::VarDecl(first) = &statements[0] else {
        panic!("expected a declaration");
    };
    assert!(first.is_mutable());
    assert!(first.value.is_none());
    assert_eq!(first.name.name, "count");

    let Stmt::VarDecl(second) = &statements[1] else {
        panic!("expected a declaration");
    };
    assert!(!second.is_mutable());
    assert!(matches!(second.ty, Type::String(_)));
}

#[test]
fn test_var_decl_requires_type() {
    let (_, errors) = parse_with_errors("fn main() { let x = 1; }");
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0].get_impl(),
        ErrorImpl::MissingToken {
            expected: TokenKind::Colon,
            ..
        }
    ));
}

#[test]
fn test_if_else() {
    assert_eq!(
        stmt_sexp("if a == 1 { return 1; } else { return 2; }"),
        "(if_statement (binary_expression left: (identifier a) operator: (operator ==) right: (number 1)) \
         if_block: (block (return_statement (number 1))) else_block: (block (return_statement (number 2))))"
    );
}

#[test]
fn test_while_loop() {
    assert_eq!(
        stmt_sexp("while i < 10 { i = i + 1; }"),
        "(while_statement (binary_expression left: (identifier i) operator: (operator <) right: (number 10)) \
         (block (variable_assignment name: (identifier i) value: (binary_expression left: (identifier i) operator: (operator +) right: (number 1)))))"
    );
}

#[test]
fn test_for_loops() {
    let file = parse_ok("fn main() { for let i in 0..=10 { break; } for x in items { continue; } }");
    let statements = &body(&file, 0).statements;

    let Stmt::For(range_loop) = &statements[0] else {
        panic!("expected a for loop");
    };
    assert!(range_loop.has_let);
    assert!(matches!(&range_loop.iterable, Expr::Range(range) if range.inclusive));

    let Stmt::For(each_loop) = &statements[1] else {
        panic!("expected a for loop");
    };
    assert!(!each_loop.has_let);
    assert_eq!(each_loop.binding.name, "x");
    assert!(matches!(&each_loop.iterable, Expr::Identifier(name) if name.name == "items"));
}

#[test]
fn test_match_statement() {
    assert_eq!(
        stmt_sexp("match x { 0 => f(), };"),
        "(match_statement (match_expression value: (identifier x) (match_arm (number 0) value: (call_expression function: (identifier f)))))"
    );
}

#[rstest]
#[case("1 + 2;")]
#[case("x;")]
#[case("f() + 1;")]
fn test_expression_is_not_a_statement(#[case] source: &str) {
    let (file, errors) = parse_with_errors(&format!("fn main() {{ {} }}", source));

    assert_eq!(errors.len(), 1);
    assert!(matches!(&body(&file, 0).statements[..], [Stmt::Error(_)]));
}

// DEFINITIONS

#[test]
fn test_function_definition() {
    let file = parse_ok("fn id<T>(x: T): T { return x; }");
    let Definition::Function(function) = &file.definitions[0] else {
        panic!("expected a function");
    };

    assert_eq!(function.name.name, "id");
    assert!(matches!(&function.generic, Some(Type::Named(name)) if name.name.name == "T"));
    assert_eq!(function.parameters.len(), 1);
    assert!(function.return_type.is_some());

    let block = function
        .child_by_field(FieldName::FuncBlock)
        .map(|node| node.kind());
    assert_eq!(block, Some(NodeKind::Block));
}

#[rstest]
#[case("f(1, 2,)", "UnexpectedToken")]
#[case("f(1 2)", "MissingToken")]
fn test_argument_commas_are_separators(#[case] call: &str, #[case] error_name: &str) {
    let (file, errors) = parse_with_errors(&format!("fn main() {{ {}; }}", call));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), error_name);
    assert!(matches!(&body(&file, 0).statements[..], [Stmt::Error(_)]));
}

#[rstest]
#[case("fn f(a: i32, b: mut u8,) {}")]
#[case("fn f(a: i32, b: mut u8) {}")]
#[case("fn f(a: i32 b: mut u8) {}")]
fn test_parameter_comma_is_optional_terminator(#[case] source: &str) {
    let file = parse_ok(source);
    let Definition::Function(function) = &file.definitions[0] else {
        panic!("expected a function");
    };

    assert_eq!(function.parameters.len(), 2);
    assert_eq!(
        to_sexp(&function.parameters[1]),
        "(parameter name: (identifier b) mut: (mut) type: (primitive_type u8))"
    );
}

#[test]
fn test_extern_function() {
    let file = parse_ok("extern fn puts(s: string): i32;");
    assert_eq!(
        to_sexp(&file.definitions[0]),
        "(extern_function_definition name: (identifier puts) (parameter name: (identifier s) type: (string_type)) return_type: (primitive_type i32))"
    );
}

#[test]
fn test_use_statement() {
    let file = parse_ok("use std::io.print;");
    let Definition::Use(use_stmt) = &file.definitions[0] else {
        panic!("expected a use statement");
    };
    assert_eq!(use_stmt.path_string(), "std::io::print");
}

#[test]
fn test_struct_definition() {
    let source = "struct Point<T> {\n    x: i32,\n    y: T,\n    // helpers\n    fn len(self: &Point): i32 { return 1; }\n}";
    let file = parse_ok(source);
    let Definition::Struct(def) = &file.definitions[0] else {
        panic!("expected a struct");
    };

    assert_eq!(def.fields.len(), 2);
    assert_eq!(def.methods.len(), 1);
    assert_eq!(def.comments.len(), 1);

    let kinds: Vec<NodeKind> = def.children().iter().map(|(_, node)| node.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Identifier,
            NodeKind::TypeIdentifier,
            NodeKind::Parameter,
            NodeKind::Parameter,
            NodeKind::Comment,
            NodeKind::FunctionDefinition,
        ]
    );
}

#[test]
fn test_struct_rejects_field_after_method() {
    let (file, errors) = parse_with_errors("struct S { fn f() {} x: i32, }\nfn main() {}");

    assert!(!errors.is_empty());
    assert_eq!(errors[0].get_error_name(), "UnexpectedToken");
    assert_eq!(file.definitions.last().and_then(|def| def.name()), Some("main"));
}

// TYPES

#[rstest]
#[case("i32", "(primitive_type i32)")]
#[case("string", "(string_type)")]
#[case("Point", "(type_identifier Point)")]
#[case("[u8; 4]", "(array_type (primitive_type u8) (number 4))")]
#[case("**u8", "(pointer_type (pointer_type (primitive_type u8)))")]
#[case("&&i32", "(ref_type (ref_type (primitive_type i32)))")]
#[case("Vec<[u8; 2]>", "(generic_type (identifier Vec) (array_type (primitive_type u8) (number 2)))")]
fn test_types(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(type_sexp(source), expected);
}

#[test]
fn test_double_reference_spans() {
    let file = parse_ok("fn main() { let v: &&i32 = null; }");
    let Stmt::VarDecl(decl) = &body(&file, 0).statements[0] else {
        panic!("expected a declaration");
    };
    let Type::Reference(outer) = &decl.ty else {
        panic!("expected a reference");
    };

    assert_eq!(outer.span.start.column, 20);
    assert_eq!(outer.referent.span().start.column, 21);
}

#[rstest]
#[case("Vec<Vec<i32> >")]
#[case("Vec<*u8>")]
fn test_nested_generic_is_malformed(#[case] source: &str) {
    let (_, errors) = parse_with_errors(&format!("fn main() {{ let v: {} = null; }}", source));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "MalformedGeneric");
}

// COMMENTS

#[test]
fn test_comments_become_nodes() {
    let source = "// line\nfn main() {\n    /// doc\n    return 1;\n}\n/* end */";
    let file = parse_ok(source);

    assert!(matches!(
        &file.definitions[..],
        [Definition::Comment(_), Definition::Function(_), Definition::Comment(_)]
    ));
    let Definition::Comment(first) = &file.definitions[0] else {
        unreachable!()
    };
    assert_eq!(first.kind, CommentKind::Line);
    assert_eq!(to_sexp(first), "(comment \"// line\")");

    let Definition::Comment(last) = &file.definitions[2] else {
        unreachable!()
    };
    assert_eq!(last.kind, CommentKind::Block);

    match &body(&file, 1).statements[0] {
        Stmt::Comment(comment) => assert_eq!(comment.kind, CommentKind::Doc),
        other => panic!("expected a doc comment, got {:?}", other),
    }
}

#[test]
fn test_each_comment_appears_once() {
    let source = "fn main() {\n    // a\n    if x { // b\n        break;\n    }\n}\n";
    let file = parse_ok(source);

    let mut comments = 0;
    walk(&file, &mut |node: &dyn Node| {
        if node.kind() == NodeKind::Comment {
            comments += 1;
        }
    });
    assert_eq!(comments, 2);
}

// RECOVERY

#[test]
fn test_recover_missing_semicolon() {
    let source = "fn a() { let x: i32 = 1 let y: i32 = 2; }\nfn b() { return 1; }";
    let (file, errors) = parse_with_errors(source);

    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0].get_impl(),
        ErrorImpl::MissingToken {
            expected: TokenKind::Semicolon,
            ..
        }
    ));
    assert!(matches!(
        &body(&file, 0).statements[..],
        [Stmt::Error(_), Stmt::VarDecl(_)]
    ));
    assert_eq!(file.definitions[1].name(), Some("b"));
}

#[rstest]
#[case("x = 1 y = 2; z = 3;", "x = 1")]
#[case("foo(1) bar(2); baz(3);", "foo(1)")]
#[case("p.x = 1 q[0] = 2; z = 3;", "p.x = 1")]
fn test_recover_missing_semicolon_before_identifier(#[case] statements: &str, #[case] broken: &str) {
    let source = format!("fn a() {{ {} }}\nfn b() {{}}", statements);
    let (file, errors) = parse_with_errors(&source);

    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0].get_impl(),
        ErrorImpl::MissingToken {
            expected: TokenKind::Semicolon,
            ..
        }
    ));

    let block = body(&file, 0);
    assert_eq!(block.statements.len(), 3);
    let Stmt::Error(node) = &block.statements[0] else {
        panic!("expected an error node, got {:?}", block.statements[0]);
    };
    assert_eq!(node.span.slice(&source), broken);
    assert!(!matches!(block.statements[1], Stmt::Error(_)));
    assert!(!matches!(block.statements[2], Stmt::Error(_)));
    assert_eq!(file.definitions[1].name(), Some("b"));
}

#[test]
fn test_recover_missing_close_curly() {
    let source = "fn a() {\n    return 1;\nfn b() { return 2; }";
    let (file, errors) = parse_with_errors(source);

    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0].get_impl(),
        ErrorImpl::MissingToken {
            expected: TokenKind::CloseCurly,
            ..
        }
    ));
    let names: Vec<Option<&str>> = file.definitions.iter().map(|def| def.name()).collect();
    assert_eq!(names, vec![Some("a"), Some("b")]);
}

#[test]
fn test_recover_top_level_garbage() {
    let (file, errors) = parse_with_errors("42; fn main() {}");

    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &file.definitions[..],
        [Definition::Error(_), Definition::Function(_)]
    ));
    assert_eq!(file.definitions[0].span().len(), 3);
}

#[test]
fn test_error_node_covers_skipped_tokens() {
    let source = "fn main() { x = ; return 1; }";
    let (file, errors) = parse_with_errors(source);

    assert_eq!(errors.len(), 1);
    let Stmt::Error(node) = &body(&file, 0).statements[0] else {
        panic!("expected an error node");
    };
    assert_eq!(node.span.slice(source), "x = ;");
    assert!(matches!(body(&file, 0).statements[1], Stmt::Return(_)));
}

#[test]
fn test_empty_source() {
    let (file, errors) = parse_with_errors("");
    assert!(errors.is_empty());
    assert!(file.definitions.is_empty());
    assert_eq!(to_sexp(&file), "(source_file)");
}

#[test]
fn test_checkpoint_restore() {
    let (stream, _) = tokenize("fn main() { }");
    let mut parser = Parser::new(&stream);

    let checkpoint = parser.checkpoint();
    parser.advance();
    parser.advance();
    parser.advance();
    parser.advance();
    parser.advance();
    assert_eq!(parser.get_depth(), 1);

    parser.restore(checkpoint);
    assert_eq!(parser.get_pos(), 0);
    assert_eq!(parser.get_depth(), 0);
    assert_eq!(parser.current_token_kind(), TokenKind::Fn);
}

#[test]
fn test_advance_stops_at_eof() {
    let (stream, _) = tokenize("x");
    let mut parser = Parser::new(&stream);

    parser.advance();
    parser.advance();
    assert!(!parser.has_tokens());
    assert_eq!(parser.peek_kind(5), TokenKind::EOF);
}
