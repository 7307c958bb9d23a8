//! Struct-of-arrays storage for the flat AST.
//!
//! # Index Spaces
//!
//! - `expr_kinds`/`expr_spans`: parallel arrays indexed by [`ExprId`]
//! - `stmts`: indexed by [`StmtId`]
//! - `functions`: indexed by [`FunctionId`]
//! - `expr_lists`: flat `Vec<ExprId>` indexed by [`ExprRange`]
//! - `stmt_lists`: flat `Vec<StmtId>` indexed by [`StmtRange`]
//! - `params`: indexed by [`ParamRange`]

use std::ops::Deref;
use std::sync::Arc;

use crate::{
    Expr, ExprId, ExprKind, ExprRange, FunctionDecl, FunctionId, Param, ParamRange, Span, Stmt,
    StmtId, StmtKind, StmtRange,
};

#[cold]
#[inline(never)]
fn capacity_exceeded(what: &str) -> ! {
    panic!("{what} arena exceeded u32::MAX entries")
}

#[inline]
fn to_u32(n: usize, what: &str) -> u32 {
    match u32::try_from(n) {
        Ok(n) => n,
        Err(_) => capacity_exceeded(what),
    }
}

/// Append-only arena holding every node of a program.
///
/// Nodes are immutable once allocated; ids stay valid for the arena's
/// lifetime.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    expr_kinds: Vec<ExprKind>,
    expr_spans: Vec<Span>,
    stmts: Vec<Stmt>,
    functions: Vec<FunctionDecl>,
    expr_lists: Vec<ExprId>,
    stmt_lists: Vec<StmtId>,
    params: Vec<Param>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    // Expressions

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(to_u32(self.expr_kinds.len(), "expression"));
        self.expr_kinds.push(expr.kind);
        self.expr_spans.push(expr.span);
        id
    }

    #[inline]
    pub fn get_expr(&self, id: ExprId) -> Expr {
        Expr::new(self.expr_kinds[id.index()], self.expr_spans[id.index()])
    }

    #[inline]
    pub fn expr_kind(&self, id: ExprId) -> ExprKind {
        self.expr_kinds[id.index()]
    }

    #[inline]
    pub fn expr_span(&self, id: ExprId) -> Span {
        self.expr_spans[id.index()]
    }

    pub fn expr_count(&self) -> usize {
        self.expr_kinds.len()
    }

    pub fn alloc_expr_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = to_u32(self.expr_lists.len(), "expression list");
        self.expr_lists.extend(ids);
        let len = to_u32(self.expr_lists.len(), "expression list") - start;
        ExprRange::new(start, len)
    }

    #[inline]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        let (start, end) = range.bounds();
        &self.expr_lists[start..end]
    }

    // Statements

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(to_u32(self.stmts.len(), "statement"));
        self.stmts.push(stmt);
        id
    }

    #[inline]
    pub fn get_stmt(&self, id: StmtId) -> Stmt {
        self.stmts[id.index()]
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    pub fn alloc_stmt_list(&mut self, ids: impl IntoIterator<Item = StmtId>) -> StmtRange {
        let start = to_u32(self.stmt_lists.len(), "statement list");
        self.stmt_lists.extend(ids);
        let len = to_u32(self.stmt_lists.len(), "statement list") - start;
        StmtRange::new(start, len)
    }

    #[inline]
    pub fn get_stmt_list(&self, range: StmtRange) -> &[StmtId] {
        let (start, end) = range.bounds();
        &self.stmt_lists[start..end]
    }

    // Functions

    pub fn alloc_params(&mut self, params: impl IntoIterator<Item = Param>) -> ParamRange {
        let start = to_u32(self.params.len(), "parameter");
        self.params.extend(params);
        let len = to_u32(self.params.len(), "parameter") - start;
        ParamRange::new(start, len)
    }

    #[inline]
    pub fn get_params(&self, range: ParamRange) -> &[Param] {
        let (start, end) = range.bounds();
        &self.params[start..end]
    }

    pub fn alloc_function(&mut self, decl: FunctionDecl) -> FunctionId {
        let id = FunctionId::new(to_u32(self.functions.len(), "function"));
        self.functions.push(decl);
        id
    }

    #[inline]
    pub fn get_function(&self, id: FunctionId) -> FunctionDecl {
        self.functions[id.index()]
    }

    /// Convenience for building statements without a separate `Stmt::new`.
    pub fn alloc_stmt_kind(&mut self, kind: StmtKind, span: Span) -> StmtId {
        self.alloc_stmt(Stmt::new(kind, span))
    }

    /// Convenience for building expressions without a separate `Expr::new`.
    pub fn alloc_expr_kind(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.alloc_expr(Expr::new(kind, span))
    }
}

/// Immutable, reference-counted arena shared between a program and the
/// function values declared in it.
#[derive(Clone, Debug, Default)]
pub struct SharedArena(Arc<ExprArena>);

impl SharedArena {
    pub fn new(arena: ExprArena) -> Self {
        SharedArena(Arc::new(arena))
    }

    /// Whether two handles point at the same arena.
    pub fn ptr_eq(&self, other: &SharedArena) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for SharedArena {
    type Target = ExprArena;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
