//! Static resolution of local variable references.
//!
//! One pass over a parsed [`Program`] before any evaluation. The resolver
//! keeps a stack of lexical scopes mirroring the frames the interpreter will
//! create (one per block, one per function call holding parameters and
//! body) and records, for every variable reference and assignment target,
//! how many scopes outward its declaration lives.
//!
//! Names not found in any tracked scope are left out of the table: the
//! interpreter resolves those dynamically against the globals, which keeps
//! forward references between top-level declarations working.
//!
//! Declarations of kind [`FunctionKind::Method`] or
//! [`FunctionKind::Initializer`] get one extra scope holding `this` around
//! their parameters, matching the frame [`UserFunction::bind`](crate::UserFunction::bind)
//! inserts between the call frame and the closure.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use lox_ir::{
    ExprArena, ExprId, ExprKind, FunctionDecl, FunctionKind, Name, Program, SharedArena, Span,
    StmtId, StmtKind, StringInterner,
};

use crate::stack::ensure_sufficient_stack;

/// Resolution-time error category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveErrorKind {
    #[error("Can't read local variable in its own initializer.")]
    SelfReferencingInitializer,
    #[error("Can't return from top-level code.")]
    ReturnOutsideFunction,
    #[error("Can't return a value from an initializer.")]
    ReturnValueFromInitializer,
    #[error("Can't use 'this' outside of a class.")]
    ThisOutsideMethod,
}

/// An error found during resolution, with the offending token's span.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    pub span: Span,
}

/// Scope distance of every resolved local reference, keyed by node id.
#[derive(Clone, Debug, Default)]
pub struct Resolutions(FxHashMap<ExprId, usize>);

impl Resolutions {
    /// Distance for `id`, or `None` for a global (dynamic) reference.
    #[inline]
    pub fn get(&self, id: ExprId) -> Option<usize> {
        self.0.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A program together with its resolution table.
///
/// Cheap to clone. User functions keep the `ResolvedProgram` they were
/// declared in, so they stay callable from later batches.
#[derive(Clone, Debug, Default)]
pub struct ResolvedProgram {
    pub(crate) arena: SharedArena,
    pub(crate) statements: Arc<[StmtId]>,
    pub(crate) locals: Arc<Resolutions>,
}

impl ResolvedProgram {
    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    pub fn statements(&self) -> &[StmtId] {
        &self.statements
    }

    pub fn locals(&self) -> &Resolutions {
        &self.locals
    }

    #[inline]
    pub fn distance(&self, id: ExprId) -> Option<usize> {
        self.locals.get(id)
    }
}

/// Scope-distance resolver.
pub struct Resolver<'a> {
    arena: &'a ExprArena,
    /// Innermost scope last; `false` marks declared-but-uninitialized.
    scopes: Vec<FxHashMap<Name, bool>>,
    locals: FxHashMap<ExprId, usize>,
    errors: Vec<ResolveError>,
    /// Innermost function being resolved; `None` at top level.
    current_function: Option<FunctionKind>,
    /// Number of enclosing scopes that hold `this`.
    this_scopes: usize,
    this: Name,
}

impl<'a> Resolver<'a> {
    pub fn new(arena: &'a ExprArena, interner: &StringInterner) -> Self {
        Resolver {
            arena,
            scopes: Vec::new(),
            locals: FxHashMap::default(),
            errors: Vec::new(),
            current_function: None,
            this_scopes: 0,
            this: interner.intern("this"),
        }
    }

    /// Resolve a whole program.
    ///
    /// All errors are collected; a program with any error is not runnable.
    pub fn resolve(
        program: &Program,
        interner: &StringInterner,
    ) -> Result<ResolvedProgram, Vec<ResolveError>> {
        let mut resolver = Resolver::new(&program.arena, interner);
        resolver.resolve_stmts(&program.statements);
        let Resolver { locals, errors, .. } = resolver;

        tracing::debug!(
            statements = program.statements.len(),
            locals = locals.len(),
            errors = errors.len(),
            "resolved program"
        );

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ResolvedProgram {
            arena: program.arena.clone(),
            statements: program.statements.as_slice().into(),
            locals: Arc::new(Resolutions(locals)),
        })
    }

    fn resolve_stmts(&mut self, stmts: &[StmtId]) {
        for &stmt in stmts {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, id: StmtId) {
        ensure_sufficient_stack(|| self.resolve_stmt_inner(id));
    }

    fn resolve_stmt_inner(&mut self, id: StmtId) {
        let arena = self.arena;
        let stmt = arena.get_stmt(id);
        match stmt.kind {
            StmtKind::Expression(expr) | StmtKind::Print(expr) => self.resolve_expr(expr),
            StmtKind::Var { name, initializer } => {
                self.declare(name);
                if let Some(init) = initializer {
                    self.resolve_expr(init);
                }
                self.define(name);
            }
            StmtKind::Block(range) => {
                self.begin_scope();
                self.resolve_stmts(arena.get_stmt_list(range));
                self.end_scope();
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            StmtKind::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }
            StmtKind::Function(function) => {
                let decl = arena.get_function(function);
                // Defined before the body so the function can refer to itself.
                self.declare(decl.name);
                self.define(decl.name);
                self.resolve_function(decl);
            }
            StmtKind::Return { value } => {
                match self.current_function {
                    None => self.error(ResolveErrorKind::ReturnOutsideFunction, stmt.span),
                    Some(FunctionKind::Initializer) if value.is_some() => {
                        self.error(ResolveErrorKind::ReturnValueFromInitializer, stmt.span);
                    }
                    Some(_) => {}
                }
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            }
        }
    }

    fn resolve_function(&mut self, decl: FunctionDecl) {
        let enclosing = self.current_function.replace(decl.kind);
        let arena = self.arena;

        let binds_this = decl.kind.binds_this();
        if binds_this {
            self.begin_scope();
            self.define(self.this);
            self.this_scopes += 1;
        }

        self.begin_scope();
        for param in arena.get_params(decl.params) {
            self.declare(param.name);
            self.define(param.name);
        }
        // Parameters and body share one scope, matching the call frame.
        self.resolve_stmts(arena.get_stmt_list(decl.body));
        self.end_scope();

        if binds_this {
            self.this_scopes -= 1;
            self.end_scope();
        }
        self.current_function = enclosing;
    }

    fn resolve_expr(&mut self, id: ExprId) {
        ensure_sufficient_stack(|| self.resolve_expr_inner(id));
    }

    fn resolve_expr_inner(&mut self, id: ExprId) {
        let arena = self.arena;
        let expr = arena.get_expr(id);
        match expr.kind {
            ExprKind::Literal(_) => {}
            ExprKind::Grouping(inner) => self.resolve_expr(inner),
            ExprKind::Unary { operand, .. } => self.resolve_expr(operand),
            ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            ExprKind::Variable(name) => {
                if name == self.this && self.this_scopes == 0 {
                    self.error(ResolveErrorKind::ThisOutsideMethod, expr.span);
                }
                let uninitialized = self
                    .scopes
                    .last()
                    .is_some_and(|scope| scope.get(&name) == Some(&false));
                if uninitialized {
                    self.error(ResolveErrorKind::SelfReferencingInitializer, expr.span);
                }
                self.resolve_local(id, name);
            }
            ExprKind::Assign { name, value } => {
                self.resolve_expr(value);
                self.resolve_local(id, name);
            }
            ExprKind::Call { callee, args } => {
                self.resolve_expr(callee);
                for &arg in arena.get_expr_list(args) {
                    self.resolve_expr(arg);
                }
            }
        }
    }

    fn resolve_local(&mut self, id: ExprId, name: Name) {
        let found = self
            .scopes
            .iter()
            .rev()
            .position(|scope| scope.contains_key(&name));
        if let Some(distance) = found {
            self.locals.insert(id, distance);
        }
    }

    fn begin_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Redeclaring a name in the same scope is allowed; the later
    /// declaration simply replaces the earlier one at run time.
    fn declare(&mut self, name: Name) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, false);
        }
    }

    fn define(&mut self, name: Name) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, true);
        }
    }

    #[cold]
    fn error(&mut self, kind: ResolveErrorKind, span: Span) {
        self.errors.push(ResolveError { kind, span });
    }
}
