//! Callable values: native functions and user-defined closures.

use std::fmt;
use std::rc::Rc;

use lox_ir::{FunctionDecl, Name, Span};

use crate::environment::FrameRef;
use crate::errors::EvalResult;
use crate::interpreter::Interpreter;
use crate::resolver::ResolvedProgram;
use crate::Value;

/// Signature of a host-supplied function.
pub type NativeFn = fn(&[Value]) -> EvalResult;

/// A function implemented by the host.
#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// A function declared in Lox source, paired with the frame it closes over.
///
/// The declaration is never mutated; every call gets a fresh frame whose
/// parent is `closure`, not the caller's frame.
#[derive(Clone)]
pub struct UserFunction {
    pub(crate) decl: FunctionDecl,
    pub(crate) name: &'static str,
    /// Arena and resolution table of the batch the declaration came from.
    pub(crate) program: ResolvedProgram,
    pub(crate) closure: FrameRef,
    pub(crate) is_initializer: bool,
}

impl UserFunction {
    pub(crate) fn new(
        decl: FunctionDecl,
        name: &'static str,
        program: ResolvedProgram,
        closure: FrameRef,
    ) -> Self {
        UserFunction {
            decl,
            name,
            program,
            closure,
            is_initializer: false,
        }
    }

    /// Mark this function as a class initializer.
    ///
    /// A call to an initializer always evaluates to the receiver bound as
    /// `this` in its closure.
    #[must_use]
    pub fn into_initializer(mut self) -> Self {
        self.is_initializer = true;
        self
    }

    /// Rebind this function to a receiver.
    ///
    /// The result shares the declaration but closes over a fresh child of
    /// the original closure holding `this`. Only declarations of a kind
    /// that [binds `this`](lox_ir::FunctionKind::binds_this) are resolved
    /// with that extra frame in mind.
    #[must_use]
    pub fn bind(&self, this: Name, receiver: Value) -> UserFunction {
        let frame = self.closure.child();
        frame.borrow_mut().define(this, receiver);
        UserFunction {
            closure: frame,
            ..self.clone()
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn arity(&self) -> usize {
        self.decl.params.len()
    }

    pub fn is_initializer(&self) -> bool {
        self.is_initializer
    }

    pub fn closure(&self) -> &FrameRef {
        &self.closure
    }

    pub fn span(&self) -> Span {
        self.decl.span
    }
}

/// Anything that can appear in callee position.
///
/// Cloning shares the underlying function, so identity (and equality)
/// survives being copied between bindings.
#[derive(Clone)]
pub enum Callable {
    Native(Rc<NativeFunction>),
    User(Rc<UserFunction>),
}

impl Callable {
    pub fn native(function: NativeFunction) -> Self {
        Callable::Native(Rc::new(function))
    }

    pub fn user(function: UserFunction) -> Self {
        Callable::User(Rc::new(function))
    }

    pub fn arity(&self) -> usize {
        match self {
            Callable::Native(f) => f.arity,
            Callable::User(f) => f.arity(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Callable::Native(f) => f.name,
            Callable::User(f) => f.name,
        }
    }

    /// Invoke with already-evaluated arguments.
    ///
    /// Arity must have been checked by the caller.
    pub fn call(
        &self,
        interpreter: &mut Interpreter<'_>,
        args: &[Value],
        span: Span,
    ) -> EvalResult {
        match self {
            Callable::Native(f) => (f.func)(args).map_err(|err| err.with_span(span)),
            Callable::User(f) => interpreter.call_function(f, args, span),
        }
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Native(a), Callable::Native(b)) => Rc::ptr_eq(a, b),
            (Callable::User(a), Callable::User(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(_) => f.write_str("<native fn>"),
            Callable::User(func) => write!(f, "<fn {}>", func.name),
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
