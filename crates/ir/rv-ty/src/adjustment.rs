//! Implicit conversions recorded by type checking.

use rv_hir::Mutability;

use crate::TyId;

/// One implicit conversion applied to an expression, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Adjustment {
    /// Conversion
    pub kind: Adjust,
    /// Type of the expression after this conversion
    pub target: TyId,
}

/// Kind of implicit conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Adjust {
    /// `!` coerced to any type
    NeverToAny,
    /// Auto-deref, built-in when `None`
    Deref(Option<OverloadedDeref>),
    /// Auto-borrow
    Borrow(AutoBorrow),
    /// Pointer coercion
    Pointer(PointerCoercion),
}

/// Deref through a `Deref`/`DerefMut` impl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverloadedDeref {
    /// Whether `deref_mut` is called
    pub mutability: Mutability,
}

/// Auto-borrow flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutoBorrow {
    /// `&expr` / `&mut expr`
    Ref(Mutability),
    /// `&raw const expr` / `&raw mut expr`
    RawPtr(Mutability),
}

/// Pointer coercions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerCoercion {
    /// Function item to function pointer
    ReifyFnPointer,
    /// Safe function pointer to unsafe function pointer
    UnsafeFnPointer,
    /// Non-capturing closure to function pointer
    ClosureFnPointer,
    /// `*mut T` to `*const T`
    MutToConstPointer,
    /// Sized to unsized pointee, e.g. `&[T; N]` to `&[T]`
    Unsize,
}
