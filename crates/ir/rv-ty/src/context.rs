//! Type-check results for one body.

use rustc_hash::FxHashMap;
use rv_hir::{ExprId, PatternId};

use crate::{Adjustment, TyArena, TyId};

/// Types and adjustments computed for a body
///
/// This is the single source of truth for "what type does this node have"
/// once type checking is done.
#[derive(Debug, Clone, Default)]
pub struct TyContext {
    /// Type arena
    pub types: TyArena,
    /// Expression types, before adjustments
    pub expr_types: FxHashMap<ExprId, TyId>,
    /// Pattern types
    pub pat_types: FxHashMap<PatternId, TyId>,
    /// Adjustments per expression, applied in order
    pub adjustments: FxHashMap<ExprId, Vec<Adjustment>>,
}

impl TyContext {
    /// Create a new type context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Type of an expression before adjustments
    #[must_use]
    pub fn get_expr_type(&self, expr: ExprId) -> Option<TyId> {
        self.expr_types.get(&expr).copied()
    }

    /// Type of a pattern
    #[must_use]
    pub fn get_pat_type(&self, pat: PatternId) -> Option<TyId> {
        self.pat_types.get(&pat).copied()
    }

    /// Adjustments of an expression; empty when none were recorded
    #[must_use]
    pub fn expr_adjustments(&self, expr: ExprId) -> &[Adjustment] {
        self.adjustments.get(&expr).map_or(&[], Vec::as_slice)
    }

    /// Records the type of an expression
    pub fn record_expr_type(&mut self, expr: ExprId, ty: TyId) {
        self.expr_types.insert(expr, ty);
    }

    /// Records the type of a pattern
    pub fn record_pat_type(&mut self, pat: PatternId, ty: TyId) {
        self.pat_types.insert(pat, ty);
    }

    /// Appends an adjustment to an expression
    pub fn push_adjustment(&mut self, expr: ExprId, adjustment: Adjustment) {
        self.adjustments.entry(expr).or_default().push(adjustment);
    }
}

#[cfg(test)]
mod tests {
    use la_arena::{Idx, RawIdx};

    use super::*;
    use crate::Adjust;

    #[test]
    fn test_adjustments_default_to_empty() {
        let mut ctx = TyContext::new();
        let expr: ExprId = Idx::from_raw(RawIdx::from(0u32));
        assert!(ctx.expr_adjustments(expr).is_empty());

        let never = ctx.types.never();
        ctx.push_adjustment(expr, Adjustment { kind: Adjust::NeverToAny, target: never });
        assert_eq!(ctx.expr_adjustments(expr).len(), 1);
        assert_eq!(ctx.get_expr_type(expr), None);
    }
}
