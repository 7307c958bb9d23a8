//! Syntax tree types for the Lox evaluator.
//!
//! This crate is the contract between the (external) parser and the
//! evaluation core:
//! - **Interning**: identifiers and string literals become [`Name`]s
//! - **Flat AST**: expressions and statements live in an [`ExprArena`] and
//!   are addressed by [`ExprId`] / [`StmtId`]
//! - **Programs**: a [`Program`] is one top-level batch of statements
//!
//! Node ids double as the stable node identity the resolver keys its
//! distance table on.

mod arena;
pub mod ast;
mod ids;
mod interner;
mod name;
mod program;
mod span;

pub use arena::{ExprArena, SharedArena};
pub use ast::{
    BinaryOp, Expr, ExprKind, FunctionDecl, FunctionKind, Literal, LogicalOp, Param, Stmt, StmtKind,
    UnaryOp,
};
pub use ids::{ExprId, ExprRange, FunctionId, ParamRange, StmtId, StmtRange};
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use program::Program;
pub use span::Span;
