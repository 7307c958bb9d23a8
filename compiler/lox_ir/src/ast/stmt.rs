//! Statement nodes and function declarations.

use crate::{ExprId, FunctionId, Name, ParamRange, Span, StmtId, StmtRange};

/// Statement node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    #[inline]
    pub const fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

/// Statement variants.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    Expression(ExprId),
    Print(ExprId),
    Var {
        name: Name,
        initializer: Option<ExprId>,
    },
    Block(StmtRange),
    If {
        condition: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    While {
        condition: ExprId,
        body: StmtId,
    },
    Function(FunctionId),
    Return {
        value: Option<ExprId>,
    },
}

/// A function parameter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: Name,
    pub span: Span,
}

/// How a declared function is reached at call time.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum FunctionKind {
    /// Called directly through its closure.
    #[default]
    Function,
    /// Called only after being bound to a receiver; the body sees `this`
    /// one scope outside its parameters.
    Method,
    /// A method whose call always evaluates to the receiver.
    Initializer,
}

impl FunctionKind {
    /// Whether the body is resolved inside a scope holding `this`.
    #[inline]
    pub const fn binds_this(self) -> bool {
        matches!(self, Self::Method | Self::Initializer)
    }
}

/// A function declaration: name, parameters, and body statements.
///
/// The body is a statement list, not a `Block` statement: a call executes
/// it directly in the frame holding the parameters.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FunctionDecl {
    pub name: Name,
    pub params: ParamRange,
    pub body: StmtRange,
    pub kind: FunctionKind,
    pub span: Span,
}
