//! String interning for symbols

use std::sync::Arc;

pub use lasso::Spur as Symbol;
use lasso::ThreadedRodeo;

/// Thread-safe string interner
///
/// Cloning is cheap: all clones share the same underlying table.
#[derive(Clone, Debug)]
pub struct Interner {
    inner: Arc<ThreadedRodeo>,
}

impl Interner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ThreadedRodeo::new()),
        }
    }

    /// Interns `text`, returning the existing symbol if it was seen before.
    pub fn intern(&self, text: &str) -> Symbol {
        self.inner.get_or_intern(text)
    }

    /// Returns the symbol for `text` without interning it.
    pub fn get(&self, text: &str) -> Option<Symbol> {
        self.inner.get(text)
    }

    /// Resolves a symbol to its text.
    ///
    /// Symbols from a different interner resolve to an empty string.
    pub fn resolve(&self, sym: &Symbol) -> String {
        self.try_resolve(sym).unwrap_or_default()
    }

    /// Resolves a symbol to its text, if it belongs to this interner.
    pub fn try_resolve(&self, sym: &Symbol) -> Option<String> {
        self.inner.try_resolve(sym).map(ToString::to_string)
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
