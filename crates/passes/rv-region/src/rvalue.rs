//! Temporary lifetimes.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{HirNode, Scope, ScopeData, ScopeError, ScopeResult, ScopeTree};

/// Temporary lifetimes that differ from the default rule
///
/// By default a temporary lives until the innermost enclosing destruction
/// scope. `let` initializers can extend borrowed temporaries to the
/// enclosing block; those extensions are recorded here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RvalueScopes {
    map: FxHashMap<HirNode, Option<Scope>>,
}

impl RvalueScopes {
    /// Creates an empty override table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the temporary lifetime of `node`; `None` means the temporary
    /// lives for the whole body.
    pub fn record_rvalue_scope(&mut self, node: HirNode, lifetime: Option<Scope>) {
        trace!(%node, ?lifetime, "record rvalue scope");
        self.map.insert(node, lifetime);
    }

    /// Scope until which temporaries created by `node` live.
    ///
    /// An explicit override wins. Otherwise the parents of `Node(node)` are
    /// walked up to the first destruction scope, and the scope directly
    /// inside it is the answer. `None` means the temporary outlives every
    /// scope in the body.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::MissingNode`] if `Node(node)` is not in the tree.
    pub fn temporary_scope(&self, tree: &ScopeTree, node: HirNode) -> ScopeResult<Option<Scope>> {
        if let Some(lifetime) = self.map.get(&node) {
            return Ok(*lifetime);
        }

        let mut current = Scope::node(node);
        if !tree.contains(current) {
            return Err(ScopeError::MissingNode { node });
        }
        while let Some(parent) = tree.parent(current) {
            if parent.data == ScopeData::Destruction {
                return Ok(Some(current));
            }
            current = parent;
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use la_arena::{Idx, RawIdx};
    use rv_hir::ExprId;

    use super::*;

    fn expr(raw_id: u32) -> HirNode {
        let id: ExprId = Idx::from_raw(RawIdx::from(raw_id));
        HirNode::Expr(id)
    }

    fn chain() -> ScopeTree {
        // Destruction(0) > Node(0) > Node(1) > Node(2)
        let mut tree = ScopeTree::new();
        tree.record_scope_parent(Scope::destruction(expr(0)), None);
        tree.record_scope_parent(Scope::node(expr(0)), Some(Scope::destruction(expr(0))));
        tree.record_scope_parent(Scope::node(expr(1)), Some(Scope::node(expr(0))));
        tree.record_scope_parent(Scope::node(expr(2)), Some(Scope::node(expr(1))));
        tree
    }

    #[test]
    fn test_temporary_scope_is_child_of_destruction_scope() {
        let tree = chain();
        let scopes = RvalueScopes::new();
        assert_eq!(
            scopes.temporary_scope(&tree, expr(2)),
            Ok(Some(Scope::node(expr(0))))
        );
    }

    #[test]
    fn test_explicit_override_wins() {
        let tree = chain();
        let mut scopes = RvalueScopes::new();
        scopes.record_rvalue_scope(expr(2), None);
        assert_eq!(scopes.temporary_scope(&tree, expr(2)), Ok(None));
    }

    #[test]
    fn test_missing_node_is_an_error() {
        let tree = chain();
        let scopes = RvalueScopes::new();
        assert_eq!(
            scopes.temporary_scope(&tree, expr(9)),
            Err(ScopeError::MissingNode { node: expr(9) })
        );
    }

    #[test]
    fn test_no_destruction_scope_means_no_lifetime() {
        let mut tree = ScopeTree::new();
        tree.record_scope_parent(Scope::node(expr(0)), None);
        let scopes = RvalueScopes::new();
        assert_eq!(scopes.temporary_scope(&tree, expr(0)), Ok(None));
    }
}
