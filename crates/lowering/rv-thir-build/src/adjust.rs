//! Type-checker adjustments as explicit THIR nodes.

use rv_hir::{ExprId, Mutability};
use rv_thir::{BorrowKind, Expr, ExprKind};
use rv_ty::{Adjust, Adjustment, AutoBorrow};
use tracing::trace;

use crate::{LowerResult, LoweringContext, Unsupported};

impl LoweringContext<'_> {
    /// Wraps `expr` in the node for one adjustment; the result has the
    /// adjustment's target type and keeps the temporary lifetime of `expr`.
    pub(crate) fn apply_adjustment(
        &self,
        hir_id: ExprId,
        expr: Expr,
        adjustment: &Adjustment,
    ) -> LowerResult<Expr> {
        trace!(expr = ?hir_id, kind = ?adjustment.kind, "applying adjustment");
        let target = adjustment.target;
        let adjusted = match adjustment.kind {
            Adjust::NeverToAny => expr.wrap(target, |source| ExprKind::NeverToAny { source }),
            Adjust::Deref(None) => expr.wrap(target, |arg| ExprKind::Deref { arg }),
            Adjust::Borrow(AutoBorrow::Ref(mutability)) => {
                let borrow_kind = match mutability {
                    Mutability::Mut => BorrowKind::Mut,
                    Mutability::Not => BorrowKind::Shared,
                };
                expr.wrap(target, |arg| ExprKind::Borrow { borrow_kind, arg })
            }
            kind @ (Adjust::Deref(Some(_))
            | Adjust::Borrow(AutoBorrow::RawPtr(_))
            | Adjust::Pointer(_)) => {
                return Err(Unsupported::Adjustment {
                    kind,
                    span: self.span_of(hir_id),
                }
                .into());
            }
        };
        Ok(adjusted)
    }
}
