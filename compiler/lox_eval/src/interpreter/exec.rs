//! Statement execution.

use smallvec::SmallVec;

use lox_ir::{FunctionKind, StmtId, StmtKind};

use super::Interpreter;
use crate::errors::{ControlAction, ExecResult};
use crate::stack::ensure_sufficient_stack;
use crate::{Callable, UserFunction, Value};

impl Interpreter<'_> {
    /// Execute a statement for its side effects.
    #[inline]
    pub(crate) fn exec(&mut self, id: StmtId) -> ExecResult {
        ensure_sufficient_stack(|| self.exec_inner(id))
    }

    /// Execute statements in order, stopping at the first error or `return`.
    pub(crate) fn exec_all(&mut self, stmts: &[StmtId]) -> ExecResult {
        for &stmt in stmts {
            self.exec(stmt)?;
        }
        Ok(())
    }

    fn exec_inner(&mut self, id: StmtId) -> ExecResult {
        // Copy the node out so the arena is not borrowed across evaluation.
        let stmt = self.program.arena.get_stmt(id);
        match stmt.kind {
            StmtKind::Expression(expr) => {
                self.eval(expr)?;
                Ok(())
            }
            StmtKind::Print(expr) => {
                let value = self.eval(expr)?;
                self.print_handler.println(&value.to_string());
                Ok(())
            }
            StmtKind::Var { name, initializer } => {
                let value = match initializer {
                    Some(init) => self.eval(init)?,
                    None => Value::Nil,
                };
                self.env.define(name, value);
                Ok(())
            }
            StmtKind::Block(range) => {
                let stmts: SmallVec<[StmtId; 8]> =
                    SmallVec::from_slice(self.program.arena.get_stmt_list(range));
                self.with_env_scope(|scoped| scoped.exec_all(&stmts))
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval(condition)?.is_truthy() {
                    self.exec(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec(else_branch)
                } else {
                    Ok(())
                }
            }
            StmtKind::While { condition, body } => {
                while self.eval(condition)?.is_truthy() {
                    self.exec(body)?;
                }
                Ok(())
            }
            StmtKind::Function(function) => {
                let decl = self.program.arena.get_function(function);
                let closure = self.env.capture();
                let mut value = UserFunction::new(
                    decl,
                    self.interner.lookup(decl.name),
                    self.program.clone(),
                    closure,
                );
                if decl.kind == FunctionKind::Initializer {
                    value = value.into_initializer();
                }
                self.env.define(decl.name, Value::Callable(Callable::user(value)));
                Ok(())
            }
            StmtKind::Return { value } => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Nil,
                };
                Err(ControlAction::Return(value))
            }
        }
    }
}
