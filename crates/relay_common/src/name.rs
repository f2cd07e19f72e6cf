//! Interned signal and function names.
//!
//! Circuit descriptions refer to the same handful of names over and over:
//! every update, trace, and expression leaf mentions a signal by name.
//! Interning turns each distinct string into a [`Name`] — a `u32` key with
//! O(1) equality, hashing, and copying — and the [`NameTable`] resolves keys
//! back to text when rendering traces or error messages.

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

/// An interned signal or function name.
///
/// Names are case-sensitive and unique within a table: interning the same
/// string twice yields the same key. A `Name` is meaningless without the
/// [`NameTable`] that produced it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Name(u32);

impl Name {
    /// Creates a `Name` from a raw `u32` key.
    ///
    /// Intended for deserialization and tests; normal code obtains names
    /// through [`NameTable::intern`].
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` key of this name.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: `Name` wraps a `u32`, which always fits in a `usize` on the
// platforms we support. `try_from_usize` rejects values wider than `u32`.
unsafe impl lasso::Key for Name {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Name)
    }
}

/// The string table behind every [`Name`] in a simulation session.
///
/// Backed by [`lasso::ThreadedRodeo`]; interning is idempotent and resolving
/// never allocates. One table is created by the driver that loads a circuit
/// and is shared, immutably after loading, with the simulation engine for
/// error messages and output rendering.
pub struct NameTable {
    rodeo: ThreadedRodeo<Name>,
}

impl NameTable {
    /// Creates a new empty table.
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Interns a string, returning its [`Name`].
    ///
    /// Interning an already-known string returns the existing key without
    /// allocating.
    pub fn intern(&self, s: &str) -> Name {
        self.rodeo.get_or_intern(s)
    }

    /// Resolves a [`Name`] back to its string.
    ///
    /// # Panics
    ///
    /// Panics if the name was not produced by this table.
    pub fn resolve(&self, name: Name) -> &str {
        self.rodeo.resolve(&name)
    }

    /// Resolves a [`Name`] if it belongs to this table.
    pub fn try_resolve(&self, name: Name) -> Option<&str> {
        self.rodeo.try_resolve(&name)
    }

    /// Returns the key for a string if it has already been interned.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.rodeo.get(s)
    }

    /// Returns the number of distinct names in the table.
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Returns `true` if no names have been interned.
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_resolve_roundtrip() {
        let names = NameTable::new();
        let clk = names.intern("clk");
        assert_eq!(names.resolve(clk), "clk");
    }

    #[test]
    fn intern_is_idempotent() {
        let names = NameTable::new();
        let a = names.intern("reset");
        let b = names.intern("reset");
        assert_eq!(a, b);
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn distinct_strings_distinct_names() {
        let names = NameTable::new();
        assert_ne!(names.intern("A"), names.intern("B"));
    }

    #[test]
    fn names_are_case_sensitive() {
        let names = NameTable::new();
        assert_ne!(names.intern("Q"), names.intern("q"));
    }

    #[test]
    fn get_only_finds_interned() {
        let names = NameTable::new();
        assert!(names.get("enable").is_none());
        let en = names.intern("enable");
        assert_eq!(names.get("enable"), Some(en));
    }

    #[test]
    fn try_resolve_unknown_key() {
        let names = NameTable::new();
        names.intern("A");
        assert!(names.try_resolve(Name::from_raw(99)).is_none());
    }

    #[test]
    fn empty_table() {
        let names = NameTable::new();
        assert!(names.is_empty());
        names.intern("x");
        assert!(!names.is_empty());
    }

    #[test]
    fn name_serde_roundtrip() {
        let name = Name::from_raw(17);
        let json = serde_json::to_string(&name).unwrap();
        let back: Name = serde_json::from_str(&json).unwrap();
        assert_eq!(name, back);
    }
}
