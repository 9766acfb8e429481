//! Lowering error types.
//!
//! Two disjoint classes: [`InternalError`] means an upstream table (types,
//! scopes, resolutions, known items) is inconsistent with the HIR and
//! lowering cannot continue; [`Unsupported`] means the construct is valid
//! but THIR construction does not handle it yet.

use rv_hir::{BinaryOp, KnownItem};
use rv_region::ScopeError;
use rv_span::FileSpan;
use rv_ty::Adjust;
use thiserror::Error;

/// Result type for lowering operations.
pub type LowerResult<T> = Result<T, LowerError>;

/// Errors that can occur while building THIR.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LowerError {
    /// Inconsistent input; a bug in an earlier pass
    #[error("internal error: {0}")]
    Internal(#[from] InternalError),
    /// Construct not handled yet
    #[error("not implemented: {0}")]
    NotImplemented(#[from] Unsupported),
}

impl LowerError {
    /// Whether this is an [`InternalError`].
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }

    /// Whether this is an [`Unsupported`] construct.
    #[must_use]
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented(_))
    }

    /// Source location of the offending construct, if known.
    #[must_use]
    pub fn span(&self) -> Option<FileSpan> {
        match self {
            Self::Internal(err) => err.span(),
            Self::NotImplemented(err) => Some(err.span()),
        }
    }
}

impl From<ScopeError> for LowerError {
    fn from(err: ScopeError) -> Self {
        Self::Internal(InternalError::MissingScope(err))
    }
}

/// Inconsistencies between the HIR and the tables computed for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    /// Type checking recorded no type for an expression.
    #[error("no type recorded for expression at {span}")]
    MissingExprType {
        /// Expression location
        span: FileSpan,
    },

    /// Type checking recorded no type for a pattern.
    #[error("no type recorded for pattern at {span}")]
    MissingPatType {
        /// Pattern location
        span: FileSpan,
    },

    /// The scope tree does not cover a lowered node.
    #[error("scope tree is incomplete: {0}")]
    MissingScope(ScopeError),

    /// A desugaring needs a known item the host did not register.
    #[error("known item `{item}` is not registered")]
    MissingKnownItem {
        /// Missing item
        item: KnownItem,
    },

    /// A known item is registered with the wrong kind of definition.
    #[error("known item `{item}` is registered with the wrong kind of definition")]
    KnownItemKind {
        /// Misregistered item
        item: KnownItem,
    },

    /// A path has no resolution.
    #[error("path at {span} is not resolved")]
    UnresolvedPath {
        /// Path location
        span: FileSpan,
    },

    /// A resolution points at an item missing from the item tree.
    #[error("path at {span} resolves to an unknown item")]
    UnknownItem {
        /// Path location
        span: FileSpan,
    },

    /// A struct literal or pattern on an enum does not name a variant.
    #[error("no enum variant selected at {span}")]
    UnresolvedVariant {
        /// Literal or pattern location
        span: FileSpan,
    },

    /// A field does not exist in the selected variant.
    #[error("unknown field at {span}")]
    UnknownField {
        /// Field location
        span: FileSpan,
    },

    /// A struct literal is typed as something other than a struct or enum.
    #[error("expected a struct or enum type at {span}")]
    ExpectedAdt {
        /// Literal location
        span: FileSpan,
    },

    /// `break` or `continue` with no loop to target.
    #[error("no enclosing loop for the jump at {span}")]
    MissingLoopTarget {
        /// Jump location
        span: FileSpan,
    },

    /// A shorthand field does not refer to a local binding.
    #[error("shorthand field at {span} does not refer to a local binding")]
    ShorthandNotLocal {
        /// Field location
        span: FileSpan,
    },

    /// A binding pattern has no local.
    #[error("binding at {span} has no local")]
    UnboundPattern {
        /// Binding location
        span: FileSpan,
    },

    /// An empty block without a destruction scope is typed as non-unit.
    #[error("empty block at {span} must have unit type")]
    NonUnitEmptyBlock {
        /// Block location
        span: FileSpan,
    },

    /// A compound assignment uses `&&=` or `||=`.
    #[error("`{op}=` at {span} is not a compound assignment operator")]
    InvalidAssignOp {
        /// Operator
        op: BinaryOp,
        /// Assignment location
        span: FileSpan,
    },

    /// A range expression with `..=` and no end.
    #[error("inclusive range at {span} has no end")]
    MalformedRange {
        /// Range location
        span: FileSpan,
    },

    /// A pattern is inconsistent with its type or with itself.
    #[error("malformed pattern at {span}: {reason}")]
    MalformedPattern {
        /// Pattern location
        span: FileSpan,
        /// What is wrong
        reason: &'static str,
    },

    /// Expression nesting exceeded the configured recursion limit.
    #[error("recursion limit of {limit} reached at {span}")]
    RecursionLimit {
        /// Expression location
        span: FileSpan,
        /// Configured limit
        limit: usize,
    },
}

impl InternalError {
    /// Returns the primary source location for this error.
    #[must_use]
    pub fn span(&self) -> Option<FileSpan> {
        match self {
            Self::MissingScope(_) | Self::MissingKnownItem { .. } | Self::KnownItemKind { .. } => {
                None
            }
            Self::MissingExprType { span }
            | Self::MissingPatType { span }
            | Self::UnresolvedPath { span }
            | Self::UnknownItem { span }
            | Self::UnresolvedVariant { span }
            | Self::UnknownField { span }
            | Self::ExpectedAdt { span }
            | Self::MissingLoopTarget { span }
            | Self::ShorthandNotLocal { span }
            | Self::UnboundPattern { span }
            | Self::NonUnitEmptyBlock { span }
            | Self::InvalidAssignOp { span, .. }
            | Self::MalformedRange { span }
            | Self::MalformedPattern { span, .. }
            | Self::RecursionLimit { span, .. } => Some(*span),
        }
    }
}

/// Constructs THIR construction does not handle yet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unsupported {
    /// `receiver.method(args)`
    #[error("method calls ({span})")]
    MethodCall {
        /// Call location
        span: FileSpan,
    },

    /// `Foo { ..base }`
    #[error("functional record update ({span})")]
    StructUpdate {
        /// Base expression location
        span: FileSpan,
    },

    /// `pat if guard => ..`
    #[error("match guards ({span})")]
    MatchGuard {
        /// Guard location
        span: FileSpan,
    },

    /// `let pat = expr else { .. };`
    #[error("let-else ({span})")]
    LetElse {
        /// Else block location
        span: FileSpan,
    },

    /// Item declared inside a block
    #[error("item statements ({span})")]
    ItemStatement {
        /// Item location
        span: FileSpan,
    },

    /// Adjustment kinds beyond never-to-any, built-in deref and reference borrows
    #[error("adjustment {kind:?} ({span})")]
    Adjustment {
        /// Adjustment
        kind: Adjust,
        /// Adjusted expression location
        span: FileSpan,
    },

    /// Expression kinds with no lowering
    #[error("{kind} expressions ({span})")]
    Expression {
        /// Kind name, e.g. `closure`
        kind: &'static str,
        /// Expression location
        span: FileSpan,
    },

    /// Paths resolving to something that is not a value here
    #[error("paths to {what} ({span})")]
    PathTarget {
        /// Kind of definition
        what: &'static str,
        /// Path location
        span: FileSpan,
    },
}

impl Unsupported {
    /// Returns the source location of the construct.
    #[must_use]
    pub fn span(&self) -> FileSpan {
        match self {
            Self::MethodCall { span }
            | Self::StructUpdate { span }
            | Self::MatchGuard { span }
            | Self::LetElse { span }
            | Self::ItemStatement { span }
            | Self::Adjustment { span, .. }
            | Self::Expression { span, .. }
            | Self::PathTarget { span, .. } => *span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes_are_disjoint() {
        let internal = LowerError::from(InternalError::MissingKnownItem {
            item: KnownItem::RangeInclusiveNew,
        });
        let unsupported = LowerError::from(Unsupported::MethodCall {
            span: FileSpan::dummy(),
        });

        assert!(internal.is_internal() && !internal.is_not_implemented());
        assert!(unsupported.is_not_implemented() && !unsupported.is_internal());
        assert_eq!(internal.span(), None);
        assert_eq!(unsupported.span(), Some(FileSpan::dummy()));
    }

    #[test]
    fn test_error_messages() {
        let err = LowerError::from(InternalError::MissingKnownItem {
            item: KnownItem::RangeInclusiveNew,
        });
        assert_eq!(
            err.to_string(),
            "internal error: known item `RangeInclusiveNew` is not registered"
        );

        let err = LowerError::from(Unsupported::MatchGuard {
            span: FileSpan::dummy(),
        });
        assert_eq!(err.to_string(), "not implemented: match guards (file#0:0..0)");
    }
}
