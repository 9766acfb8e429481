//! Scope error types.

use thiserror::Error;

use crate::HirNode;

/// Result type for scope queries.
pub type ScopeResult<T> = Result<T, ScopeError>;

/// Errors raised by scope queries.
///
/// These indicate an incomplete scope tree, never a problem in user code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// The node was never recorded in the scope tree.
    #[error("no scope recorded for {node}")]
    MissingNode {
        /// Node that was looked up
        node: HirNode,
    },
}

#[cfg(test)]
mod tests {
    use la_arena::{Idx, RawIdx};

    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScopeError::MissingNode {
            node: HirNode::Expr(Idx::from_raw(RawIdx::from(7u32))),
        };
        assert_eq!(err.to_string(), "no scope recorded for expr#7");
    }
}
