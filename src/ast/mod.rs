/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The `Node` trait, node kinds and field labels
/// - definitions: Top-level definitions, parameters and comments
/// - expressions: Definitions for various expression types
/// - statements: Blocks and the statement types
/// - types: Definitions for type annotations in the AST
pub mod ast;
pub mod definitions;
pub mod expressions;
pub mod statements;
pub mod types;
