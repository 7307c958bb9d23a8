//! Arena indices and ranges for the flat AST.
//!
//! Nodes refer to their children by `u32` index instead of `Box`, so a node
//! is `Copy`, ids compare in O(1), and an id is a stable identity the
//! resolver can key on.

use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Invalid id (sentinel value).
            pub const INVALID: $name = $name(u32::MAX);

            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            /// Get the index into the arena.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!(stringify!($name), "({})"), self.0)
                } else {
                    write!(f, concat!(stringify!($name), "::INVALID"))
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    };
}

macro_rules! arena_range {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
        pub struct $name {
            pub start: u32,
            pub len: u32,
        }

        impl $name {
            pub const EMPTY: $name = $name { start: 0, len: 0 };

            #[inline]
            pub const fn new(start: u32, len: u32) -> Self {
                $name { start, len }
            }

            #[inline]
            pub const fn is_empty(&self) -> bool {
                self.len == 0
            }

            #[inline]
            pub const fn len(&self) -> usize {
                self.len as usize
            }

            /// Slice bounds into the backing list.
            #[inline]
            pub const fn bounds(&self) -> (usize, usize) {
                let start = self.start as usize;
                (start, start + self.len as usize)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    concat!(stringify!($name), "({}..{})"),
                    self.start,
                    self.start + self.len
                )
            }
        }
    };
}

arena_id!(
    /// Index into the expression store of an [`ExprArena`](crate::ExprArena).
    ExprId
);
arena_id!(
    /// Index into the statement store of an [`ExprArena`](crate::ExprArena).
    StmtId
);
arena_id!(
    /// Index into the function declaration store.
    FunctionId
);

arena_range!(
    /// Range of expression ids in the flattened expression list (call arguments).
    ExprRange
);
arena_range!(
    /// Range of statement ids in the flattened statement list (block bodies).
    StmtRange
);
arena_range!(
    /// Range of parameters in the flattened parameter list.
    ParamRange
);
