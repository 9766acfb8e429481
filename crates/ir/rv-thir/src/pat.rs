//! THIR patterns.

use rv_hir::{FieldIdx, LiteralKind, LocalId, Mutability, TypeDefId, VariantIdx};
use rv_intern::Symbol;
use rv_span::FileSpan;
use rv_ty::TyId;

/// Lowered pattern
#[derive(Debug, Clone, PartialEq)]
pub struct Pat {
    /// Type of the matched value
    pub ty: TyId,
    /// Source location
    pub span: FileSpan,
    /// Pattern kind
    pub kind: PatKind,
}

/// How a binding captures the matched value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingMode {
    /// Move or copy
    ByValue,
    /// `ref` / `ref mut`
    ByRef(Mutability),
}

/// Literal constant in a pattern
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    /// Literal
    pub lit: LiteralKind,
    /// Negated
    pub neg: bool,
}

/// One end of a range pattern
#[derive(Debug, Clone, PartialEq)]
pub enum PatRangeBoundary {
    /// Literal bound
    Finite(Constant),
    /// Missing lower bound
    NegInfinity,
    /// Missing upper bound
    PosInfinity,
}

/// Whether a range includes its upper bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeEnd {
    /// `..=`
    Included,
    /// `..`
    Excluded,
}

/// Range pattern
#[derive(Debug, Clone, PartialEq)]
pub struct PatRange {
    /// Lower bound
    pub lo: PatRangeBoundary,
    /// Upper bound
    pub hi: PatRangeBoundary,
    /// Inclusivity
    pub end: RangeEnd,
}

/// Sub-pattern of a struct, tuple or variant pattern
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPat {
    /// Declaration-order field index
    pub field: FieldIdx,
    /// Pattern for the field
    pub pattern: Pat,
}

/// Kind of pattern
#[derive(Debug, Clone, PartialEq)]
pub enum PatKind {
    /// `_`
    Wild,
    /// `ref mut name @ subpattern`
    Binding {
        /// Mutability of the binding itself
        mutability: Mutability,
        /// Bound name
        name: Symbol,
        /// Capture mode
        mode: BindingMode,
        /// Local the binding introduces
        var: LocalId,
        /// Type of the local
        ty: TyId,
        /// Pattern after `@`
        subpattern: Option<Box<Pat>>,
    },
    /// Enum variant
    Variant {
        /// Enum
        adt_def: TypeDefId,
        /// Generic arguments of the enum type
        args: Vec<TyId>,
        /// Variant
        variant_index: VariantIdx,
        /// Field patterns; fields not mentioned are not listed
        subpatterns: Vec<FieldPat>,
    },
    /// Struct or tuple
    Leaf {
        /// Field patterns; fields not mentioned are not listed
        subpatterns: Vec<FieldPat>,
    },
    /// `&pattern`
    Deref {
        /// Pointee pattern
        subpattern: Box<Pat>,
    },
    /// Literal
    Constant {
        /// Value
        value: Constant,
    },
    /// Range
    Range(Box<PatRange>),
    /// Slice pattern on a slice type
    Slice {
        /// Elements before `..`
        prefix: Vec<Pat>,
        /// The `..` itself
        slice: Option<Box<Pat>>,
        /// Elements after `..`
        suffix: Vec<Pat>,
    },
    /// Slice pattern on an array type
    Array {
        /// Elements before `..`
        prefix: Vec<Pat>,
        /// The `..` itself
        slice: Option<Box<Pat>>,
        /// Elements after `..`
        suffix: Vec<Pat>,
    },
    /// `a | b`
    Or {
        /// Alternatives
        pats: Vec<Pat>,
    },
}
