//! Region scopes for the Raven compiler.
//!
//! This crate computes the lexical scope facts that THIR construction
//! consults: which scope every expression, block, statement and match arm
//! opens, where values are destroyed, and how long temporaries live.
//!
//! # Architecture
//!
//! - [`Scope`]: a lexical region keyed by the HIR node that opens it
//! - [`ScopeTree`]: parent links between scopes, plus destruction scopes
//! - [`RvalueScopes`]: temporary lifetimes, with explicit overrides for
//!   temporaries that `let` extends
//! - [`resolve_body_scopes`]: builds both from a [`rv_hir::Body`]
//!
//! # Limitations
//!
//! This is a lexical model only:
//! - No region inference or borrow regions
//! - Variable scopes are not tracked separately from remainder scopes
//! - Temporary extension only looks through `&`, aggregates, blocks and
//!   tuple constructor calls

mod error;
mod resolve;
mod rvalue;
mod scope;

pub use error::{ScopeError, ScopeResult};
pub use resolve::resolve_body_scopes;
pub use rvalue::RvalueScopes;
pub use scope::{DesugarPart, FirstStatementIndex, HirNode, Scope, ScopeData, ScopeTree};

/// Scope tree and temporary lifetimes of one body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionScopes {
    /// Scope parents and destruction scopes
    pub tree: ScopeTree,
    /// Temporary lifetime overrides
    pub rvalue_scopes: RvalueScopes,
}

impl RegionScopes {
    /// Temporary lifetime of `node`, see [`RvalueScopes::temporary_scope`]
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::MissingNode`] if `node` has no scope in the tree.
    pub fn temporary_scope(&self, node: HirNode) -> ScopeResult<Option<Scope>> {
        self.rvalue_scopes.temporary_scope(&self.tree, node)
    }

    /// Destruction scope opened by `node`, if any
    #[must_use]
    pub fn destruction_scope(&self, node: HirNode) -> Option<Scope> {
        self.tree.opt_destruction_scope(node)
    }
}
