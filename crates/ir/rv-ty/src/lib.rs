//! Types and type-check results for Raven bodies.
//!
//! Types are interned in a [`TyArena`]: two structurally equal kinds
//! always map to the same [`TyId`], so ids can be compared directly.
//! [`TyContext`] carries the results of type checking one body: the
//! type of every expression and pattern, plus the implicit
//! [`Adjustment`]s applied to expressions.

mod adjustment;
mod context;
mod ty;

pub use adjustment::{Adjust, Adjustment, AutoBorrow, OverloadedDeref, PointerCoercion};
pub use context::TyContext;
pub use ty::{ArrayLen, CommonTypes, FloatTy, IntTy, Ty, TyArena, TyDisplay, TyId, TyKind, UintTy};
