//! Function call evaluation methods for the Interpreter.

use smallvec::SmallVec;

use lox_ir::{Span, StmtId};

use super::Interpreter;
use crate::diagnostics::CallFrame;
use crate::errors::{arity_mismatch, not_callable, unresolved_local, ControlAction, EvalResult};
use crate::{UserFunction, Value};

impl Interpreter<'_> {
    /// Call `callee` with already-evaluated arguments.
    ///
    /// Fails with "Can only call functions and classes." for non-callables
    /// and with an arity error before any argument is bound.
    pub fn call_value(&mut self, callee: &Value, args: &[Value], span: Span) -> EvalResult {
        let Some(callable) = callee.as_callable() else {
            return Err(not_callable(callee.type_name()).with_span(span));
        };
        if args.len() != callable.arity() {
            return Err(arity_mismatch(callable.arity(), args.len()).with_span(span));
        }
        callable.call(self, args, span)
    }

    /// Run a user function's body in a fresh frame under its closure.
    #[tracing::instrument(level = "debug", skip_all, fields(function = func.name()))]
    pub(crate) fn call_function(
        &mut self,
        func: &UserFunction,
        args: &[Value],
        call_span: Span,
    ) -> EvalResult {
        self.call_stack
            .push(CallFrame {
                name: func.decl.name,
                call_span: Some(call_span),
            })
            .map_err(|err| err.with_span(call_span))?;

        let result = self
            .invoke(func, args)
            .map_err(|err| self.call_stack.attach_backtrace(err, self.interner));
        self.call_stack.pop();
        result
    }

    fn invoke(&mut self, func: &UserFunction, args: &[Value]) -> EvalResult {
        let frame = func.closure.child();
        let body: SmallVec<[StmtId; 8]> = {
            let arena = &func.program.arena;
            let mut bindings = frame.borrow_mut();
            for (param, arg) in arena.get_params(func.decl.params).iter().zip(args) {
                bindings.define(param.name, arg.clone());
            }
            SmallVec::from_slice(arena.get_stmt_list(func.decl.body))
        };

        let outcome = self
            .scoped_call(frame, func.program.clone())
            .exec_all(&body);

        let value = match outcome {
            Ok(()) => Value::Nil,
            Err(ControlAction::Return(value)) => value,
            Err(ControlAction::Error(err)) => return Err(*err),
        };

        if func.is_initializer {
            let this = self.names.this;
            return func
                .closure
                .get_at(0, this)
                .ok_or_else(|| unresolved_local("this", 0).with_span(func.span()));
        }
        Ok(value)
    }
}
