//! String interner for identifiers and string literals.
//!
//! Strings are leaked into `'static` storage on first intern. The set of
//! distinct identifiers in a program is small and lives as long as the
//! interpreter session, so nothing is ever freed.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::ops::Deref;
use std::sync::Arc;

#[derive(Default)]
struct InternTable {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

/// String interner with O(1) interning and lookup.
///
/// Uses an `RwLock` so a shared interner can be read concurrently by tooling
/// while the parser keeps interning.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned as [`Name::EMPTY`].
    pub fn new() -> Self {
        let mut table = InternTable::default();
        table.map.insert("", 0);
        table.strings.push("");
        StringInterner {
            table: RwLock::new(table),
        }
    }

    /// Intern a string, returning its `Name`.
    ///
    /// Interning the same text twice yields the same `Name`.
    pub fn intern(&self, s: &str) -> Name {
        if let Some(&idx) = self.table.read().map.get(s) {
            return Name::from_raw(idx);
        }

        let mut table = self.table.write();
        // Another writer may have won the race between the two locks.
        if let Some(&idx) = table.map.get(s) {
            return Name::from_raw(idx);
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let idx = u32::try_from(table.strings.len()).unwrap_or(u32::MAX);
        table.strings.push(leaked);
        table.map.insert(leaked, idx);
        Name::from_raw(idx)
    }

    /// Look up the text of an interned `Name`.
    ///
    /// Returns `""` for names that did not come from this interner.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Whether only the pre-interned empty string is present.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Cheaply clonable handle to a shared [`StringInterner`].
#[derive(Clone, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new(interner: StringInterner) -> Self {
        SharedInterner(Arc::new(interner))
    }
}

impl Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
