//! Flat AST node types.
//!
//! Nodes are `Copy` and reference their children by id, so a node can be
//! copied out of the arena before matching on it.

mod expr;
mod operators;
mod stmt;

pub use expr::{Expr, ExprKind, Literal};
pub use operators::{BinaryOp, LogicalOp, UnaryOp};
pub use stmt::{FunctionDecl, FunctionKind, Param, Stmt, StmtKind};
