//! Typed High-level Intermediate Representation (THIR)
//!
//! THIR is a fully typed, desugared tree built from one HIR body. Unlike
//! the HIR it owns its children directly, every node carries its type,
//! implicit conversions are explicit nodes, and every expression records
//! the lexical [`Scope`](rv_region::Scope) its temporaries live in.
//!
//! Expressions are built in two steps: the kind-specific construction
//! yields a [`PendingExpr`], and [`PendingExpr::finish`] attaches the
//! temporary lifetime. A finished [`Expr`] is never mutated afterwards.

mod block;
mod expr;
mod pat;
pub mod pretty;

pub use block::{Block, BlockSafety, Stmt, StmtKind};
pub use expr::{AdtExpr, Arm, BorrowKind, Expr, ExprKind, FieldExpr, LogicalOp, PendingExpr, UnOp};
pub use pat::{BindingMode, Constant, FieldPat, Pat, PatKind, PatRange, PatRangeBoundary, RangeEnd};

use rv_ty::TyId;

/// Lowered function or constant body
#[derive(Debug, Clone, PartialEq)]
pub struct ThirBody {
    /// Parameters, in order
    pub params: Vec<Param>,
    /// Body expression
    pub value: Expr,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter pattern
    pub pat: Box<Pat>,
    /// Parameter type
    pub ty: TyId,
}
