//! Expression nodes.

use crate::{BinaryOp, ExprId, ExprRange, LogicalOp, Name, Span, UnaryOp};

/// Literal constant embedded in the tree.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Literal {
    Nil,
    Bool(bool),
    /// Stored as raw bits so the node stays `Eq` and `Hash`.
    Number(u64),
    /// Interned string contents.
    String(Name),
}

impl Literal {
    #[inline]
    pub fn number(n: f64) -> Self {
        Literal::Number(n.to_bits())
    }
}

/// Expression node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    /// Location of the token errors are reported against: the operator for
    /// unary/binary nodes, the identifier for variables, the closing paren
    /// for calls.
    pub span: Span,
}

impl Expr {
    #[inline]
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Expression variants.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    Literal(Literal),
    Grouping(ExprId),
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Logical {
        op: LogicalOp,
        left: ExprId,
        right: ExprId,
    },
    /// Variable reference. Resolution distance is keyed on this node's id.
    Variable(Name),
    /// Assignment `name = value`. Resolution distance is keyed on this node's id.
    Assign {
        name: Name,
        value: ExprId,
    },
    Call {
        callee: ExprId,
        args: ExprRange,
    },
}
