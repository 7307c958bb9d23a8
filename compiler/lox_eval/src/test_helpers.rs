//! Test-only builder for flat ASTs.
//!
//! Stands in for the external parser: each method allocates one node and
//! returns its id. The current line is stamped onto every node's span so
//! tests can assert on reported lines.

use lox_ir::{
    BinaryOp, ExprArena, ExprId, ExprKind, FunctionDecl, FunctionKind, Literal, LogicalOp, Param,
    Program, Span, StmtId, StmtKind, StringInterner, UnaryOp,
};

pub(crate) struct ProgramBuilder<'i> {
    interner: &'i StringInterner,
    arena: ExprArena,
    statements: Vec<StmtId>,
    line: u32,
}

impl<'i> ProgramBuilder<'i> {
    pub(crate) fn new(interner: &'i StringInterner) -> Self {
        ProgramBuilder {
            interner,
            arena: ExprArena::new(),
            statements: Vec::new(),
            line: 1,
        }
    }

    /// Set the source line for subsequently built nodes.
    pub(crate) fn line(&mut self, line: u32) -> &mut Self {
        self.line = line;
        self
    }

    fn span(&self) -> Span {
        Span::at_line(self.line)
    }

    fn expr(&mut self, kind: ExprKind) -> ExprId {
        let span = self.span();
        self.arena.alloc_expr_kind(kind, span)
    }

    fn stmt(&mut self, kind: StmtKind) -> StmtId {
        let span = self.span();
        self.arena.alloc_stmt_kind(kind, span)
    }

    // Expressions

    pub(crate) fn nil(&mut self) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Nil))
    }

    pub(crate) fn bool(&mut self, b: bool) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Bool(b)))
    }

    pub(crate) fn num(&mut self, n: f64) -> ExprId {
        self.expr(ExprKind::Literal(Literal::number(n)))
    }

    pub(crate) fn str(&mut self, s: &str) -> ExprId {
        let name = self.interner.intern(s);
        self.expr(ExprKind::Literal(Literal::String(name)))
    }

    pub(crate) fn group(&mut self, inner: ExprId) -> ExprId {
        self.expr(ExprKind::Grouping(inner))
    }

    pub(crate) fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.expr(ExprKind::Unary { op, operand })
    }

    pub(crate) fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.expr(ExprKind::Binary { op, left, right })
    }

    pub(crate) fn logical(&mut self, op: LogicalOp, left: ExprId, right: ExprId) -> ExprId {
        self.expr(ExprKind::Logical { op, left, right })
    }

    pub(crate) fn var(&mut self, name: &str) -> ExprId {
        let name = self.interner.intern(name);
        self.expr(ExprKind::Variable(name))
    }

    pub(crate) fn assign(&mut self, name: &str, value: ExprId) -> ExprId {
        let name = self.interner.intern(name);
        self.expr(ExprKind::Assign { name, value })
    }

    pub(crate) fn call(&mut self, callee: ExprId, args: &[ExprId]) -> ExprId {
        let args = self.arena.alloc_expr_list(args.iter().copied());
        self.expr(ExprKind::Call { callee, args })
    }

    /// `name(args...)` with a variable callee.
    pub(crate) fn call_named(&mut self, name: &str, args: &[ExprId]) -> ExprId {
        let callee = self.var(name);
        self.call(callee, args)
    }

    // Statements

    pub(crate) fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.stmt(StmtKind::Expression(expr))
    }

    pub(crate) fn print(&mut self, expr: ExprId) -> StmtId {
        self.stmt(StmtKind::Print(expr))
    }

    pub(crate) fn var_decl(&mut self, name: &str, initializer: Option<ExprId>) -> StmtId {
        let name = self.interner.intern(name);
        self.stmt(StmtKind::Var { name, initializer })
    }

    pub(crate) fn block(&mut self, stmts: &[StmtId]) -> StmtId {
        let range = self.arena.alloc_stmt_list(stmts.iter().copied());
        self.stmt(StmtKind::Block(range))
    }

    pub(crate) fn if_stmt(
        &mut self,
        condition: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    ) -> StmtId {
        self.stmt(StmtKind::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    pub(crate) fn while_stmt(&mut self, condition: ExprId, body: StmtId) -> StmtId {
        self.stmt(StmtKind::While { condition, body })
    }

    pub(crate) fn function(&mut self, name: &str, params: &[&str], body: &[StmtId]) -> StmtId {
        self.declare(FunctionKind::Function, name, params, body)
    }

    /// A declaration that is only called once bound to a receiver.
    pub(crate) fn method(&mut self, name: &str, params: &[&str], body: &[StmtId]) -> StmtId {
        self.declare(FunctionKind::Method, name, params, body)
    }

    pub(crate) fn initializer(&mut self, params: &[&str], body: &[StmtId]) -> StmtId {
        self.declare(FunctionKind::Initializer, "init", params, body)
    }

    fn declare(
        &mut self,
        kind: FunctionKind,
        name: &str,
        params: &[&str],
        body: &[StmtId],
    ) -> StmtId {
        let span = self.span();
        let params: Vec<Param> = params
            .iter()
            .map(|p| Param {
                name: self.interner.intern(p),
                span,
            })
            .collect();
        let params = self.arena.alloc_params(params);
        let body = self.arena.alloc_stmt_list(body.iter().copied());
        let decl = FunctionDecl {
            name: self.interner.intern(name),
            params,
            body,
            kind,
            span,
        };
        let id = self.arena.alloc_function(decl);
        self.stmt(StmtKind::Function(id))
    }

    pub(crate) fn ret(&mut self, value: Option<ExprId>) -> StmtId {
        self.stmt(StmtKind::Return { value })
    }

    // Program

    /// Append statements to the top level.
    pub(crate) fn push(&mut self, stmts: &[StmtId]) -> &mut Self {
        self.statements.extend_from_slice(stmts);
        self
    }

    /// Shorthand for a top-level `print expr;`.
    pub(crate) fn push_print(&mut self, expr: ExprId) -> &mut Self {
        let stmt = self.print(expr);
        self.push(&[stmt])
    }

    pub(crate) fn finish(self) -> Program {
        Program::new(self.arena, self.statements)
    }
}
