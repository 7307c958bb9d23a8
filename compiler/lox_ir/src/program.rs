//! A top-level batch of statements.

use crate::{ExprArena, SharedArena, StmtId};

/// One unit of top-level statements handed to the evaluator.
///
/// A REPL produces one `Program` per input line; a script produces a
/// single `Program` for the whole file.
#[derive(Clone, Debug, Default)]
pub struct Program {
    pub arena: SharedArena,
    pub statements: Vec<StmtId>,
}

impl Program {
    pub fn new(arena: ExprArena, statements: Vec<StmtId>) -> Self {
        Program {
            arena: SharedArena::new(arena),
            statements,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
