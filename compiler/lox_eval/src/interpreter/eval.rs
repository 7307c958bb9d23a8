//! Expression evaluation.

use std::rc::Rc;

use smallvec::SmallVec;

use lox_ir::{ExprId, ExprKind, Literal, LogicalOp, Name, Span};

use super::Interpreter;
use crate::errors::{undefined_variable, unresolved_local, EvalError, EvalResult};
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::stack::ensure_sufficient_stack;
use crate::Value;

impl Interpreter<'_> {
    /// Evaluate an expression of the current program to a value.
    #[inline]
    pub(crate) fn eval(&mut self, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(id))
    }

    fn eval_inner(&mut self, id: ExprId) -> EvalResult {
        let expr = self.program.arena.get_expr(id);
        match expr.kind {
            ExprKind::Literal(literal) => Ok(self.eval_literal(literal)),
            ExprKind::Grouping(inner) => self.eval(inner),
            ExprKind::Unary { op, operand } => {
                let operand = self.eval(operand)?;
                evaluate_unary(&operand, op).map_err(|err| err.with_span(expr.span))
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                evaluate_binary(&left, &right, op).map_err(|err| err.with_span(expr.span))
            }
            ExprKind::Logical { op, left, right } => {
                let left = self.eval(left)?;
                // The deciding operand itself is the result, never a coerced bool.
                let short_circuits = match op {
                    LogicalOp::Or => left.is_truthy(),
                    LogicalOp::And => !left.is_truthy(),
                };
                if short_circuits {
                    Ok(left)
                } else {
                    self.eval(right)
                }
            }
            ExprKind::Variable(name) => self.lookup_variable(id, name, expr.span),
            ExprKind::Assign { name, value } => {
                let value = self.eval(value)?;
                self.assign_variable(id, name, value.clone(), expr.span)?;
                Ok(value)
            }
            ExprKind::Call { callee, args } => {
                let callee = self.eval(callee)?;
                let arg_ids: SmallVec<[ExprId; 8]> =
                    SmallVec::from_slice(self.program.arena.get_expr_list(args));
                let mut arg_values: SmallVec<[Value; 8]> = SmallVec::with_capacity(arg_ids.len());
                for arg in arg_ids {
                    arg_values.push(self.eval(arg)?);
                }
                self.call_value(&callee, &arg_values, expr.span)
            }
        }
    }

    fn eval_literal(&self, literal: Literal) -> Value {
        match literal {
            Literal::Nil => Value::Nil,
            Literal::Bool(b) => Value::Bool(b),
            Literal::Number(bits) => Value::Number(f64::from_bits(bits)),
            Literal::String(name) => Value::Str(Rc::from(self.interner.lookup(name))),
        }
    }

    fn lookup_variable(&self, id: ExprId, name: Name, span: Span) -> EvalResult {
        match self.program.distance(id) {
            Some(distance) => self
                .env
                .get_at(distance, name)
                .ok_or_else(|| self.resolution_defect(name, distance, span)),
            None => self
                .env
                .get_global(name)
                .ok_or_else(|| undefined_variable(self.interner.lookup(name)).with_span(span)),
        }
    }

    fn assign_variable(
        &self,
        id: ExprId,
        name: Name,
        value: Value,
        span: Span,
    ) -> Result<(), EvalError> {
        match self.program.distance(id) {
            Some(distance) => self
                .env
                .assign_at(distance, name, value)
                .map_err(|_| self.resolution_defect(name, distance, span)),
            None => self
                .env
                .assign_global(name, value)
                .map_err(|_| undefined_variable(self.interner.lookup(name)).with_span(span)),
        }
    }

    #[cold]
    fn resolution_defect(&self, name: Name, distance: usize, span: Span) -> EvalError {
        let text = self.interner.lookup(name);
        tracing::error!(
            name = text,
            distance,
            line = span.line,
            "resolved local has no binding at its recorded distance"
        );
        unresolved_local(text, distance).with_span(span)
    }
}
