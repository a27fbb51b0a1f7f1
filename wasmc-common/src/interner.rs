//! String interning for identifier and member-name deduplication.
//!
//! Member names, class names, and identifier text are interned once and
//! referred to everywhere else by a small `Copy` `Atom`, avoiding repeated
//! heap allocation across the thousands of member lookups a typical build
//! performs.

use rustc_hash::FxHashMap;
use std::sync::Arc;

/// An interned string. Cheap to copy and compare; the backing text lives in
/// the `Interner` that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Atom(u32);

/// Owns the backing storage for every `Atom` handed out.
#[derive(Default)]
pub struct Interner {
    strings: Vec<Arc<str>>,
    lookup: FxHashMap<Arc<str>, Atom>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `text`, returning the existing `Atom` if already interned.
    pub fn intern(&mut self, text: &str) -> Atom {
        if let Some(atom) = self.lookup.get(text) {
            return *atom;
        }
        let arc: Arc<str> = Arc::from(text);
        let atom = Atom(self.strings.len() as u32);
        self.strings.push(arc.clone());
        self.lookup.insert(arc, atom);
        atom
    }

    /// Resolve an `Atom` back to its text. Panics if the atom did not come
    /// from this interner.
    pub fn resolve(&self, atom: Atom) -> &str {
        &self.strings[atom.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/interner.rs"]
mod tests;
