//! High-level Intermediate Representation (HIR)
//!
//! The HIR is the expanded, name-resolved surface tree of a single body.
//! Expressions, statements, patterns, blocks and match arms live in
//! per-body arenas and refer to each other by index. Name resolution
//! results are stored beside the tree in [`BodyResolution`] rather than
//! inside the nodes.

mod body;
mod item;
mod known_items;

pub use body::{
    Block, Body, BodyOwner, BodyResolution, Expr, FieldInit, FieldName, FieldPattern, Label,
    MatchArm, Path, Pattern, PatternBound, Stmt,
};
pub use item::{
    AdtRef, ConstDef, EnumDef, FieldDef, Function, ItemTree, StructDef, VariantDef,
    VariantFields,
};
pub use known_items::{KnownItem, KnownItems};

use derive_more::Display;
use la_arena::Idx;
use serde::{Deserialize, Serialize};

/// HIR node IDs
pub type ExprId = Idx<Expr>;
/// Statement ID
pub type StmtId = Idx<Stmt>;
/// Pattern ID
pub type PatternId = Idx<Pattern>;
/// Block ID
pub type BlockId = Idx<Block>;
/// Match arm ID
pub type ArmId = Idx<MatchArm>;

/// Definition IDs for cross-referencing
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum DefId {
    /// Function definition
    Function(FunctionId),
    /// Struct or enum definition
    Adt(TypeDefId),
    /// One variant of an enum, or the single variant of a struct
    Variant(VariantId),
    /// A field of a struct or variant
    Field(FieldId),
    /// Variable/local binding
    Local(LocalId),
    /// Named constant
    Const(ConstId),
}

/// Unique ID for a function
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[display("fn#{_0}")]
pub struct FunctionId(pub u32);

/// Unique ID for a type definition
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[display("adt#{_0}")]
pub struct TypeDefId(pub u32);

/// Unique ID for a local variable
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[display("local#{_0}")]
pub struct LocalId(pub u32);

/// Unique ID for a constant
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[display("const#{_0}")]
pub struct ConstId(pub u32);

/// Position of a variant inside its ADT (always 0 for structs)
#[derive(
    Copy, Clone, Debug, Display, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct VariantIdx(pub u32);

impl VariantIdx {
    /// The only variant of a struct.
    pub const FIRST: Self = Self(0);
}

/// Position of a field in its variant, in declaration order
#[derive(
    Copy, Clone, Debug, Display, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct FieldIdx(pub u32);

/// A variant of a specific ADT
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct VariantId {
    /// Owning struct or enum
    pub adt: TypeDefId,
    /// Variant position
    pub index: VariantIdx,
}

/// A field of a specific variant
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct FieldId {
    /// Variant declaring the field
    pub parent: VariantId,
    /// Field position
    pub index: FieldIdx,
}

/// Mutability of a place, reference or binding
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Mutability {
    /// Shared
    #[display("")]
    Not,
    /// Mutable
    #[display("mut ")]
    Mut,
}

impl Mutability {
    /// Whether this is `Mut`.
    #[must_use]
    pub fn is_mut(self) -> bool {
        matches!(self, Self::Mut)
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq, Display)]
pub enum LiteralKind {
    /// Integer literal, always unsigned; negation is a separate operator
    Integer(u128),
    /// Float literal
    Float(f64),
    /// String literal
    #[display("{_0:?}")]
    String(String),
    /// Character literal
    #[display("{_0:?}")]
    Char(char),
    /// Boolean literal
    Bool(bool),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum BinaryOp {
    /// Addition (+)
    #[display("+")]
    Add,
    /// Subtraction (-)
    #[display("-")]
    Sub,
    /// Multiplication (*)
    #[display("*")]
    Mul,
    /// Division (/)
    #[display("/")]
    Div,
    /// Modulo (%)
    #[display("%")]
    Mod,
    /// Equality (==)
    #[display("==")]
    Eq,
    /// Inequality (!=)
    #[display("!=")]
    Ne,
    /// Less than (<)
    #[display("<")]
    Lt,
    /// Less than or equal (<=)
    #[display("<=")]
    Le,
    /// Greater than (>)
    #[display(">")]
    Gt,
    /// Greater than or equal (>=)
    #[display(">=")]
    Ge,
    /// Logical AND (&&)
    #[display("&&")]
    And,
    /// Logical OR (||)
    #[display("||")]
    Or,
    /// Bitwise AND (&)
    #[display("&")]
    BitAnd,
    /// Bitwise OR (|)
    #[display("|")]
    BitOr,
    /// Bitwise XOR (^)
    #[display("^")]
    BitXor,
    /// Left shift (<<)
    #[display("<<")]
    Shl,
    /// Right shift (>>)
    #[display(">>")]
    Shr,
}

impl BinaryOp {
    /// Short-circuiting operators (`&&`, `||`).
    #[must_use]
    pub fn is_lazy(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum UnaryOp {
    /// Negation (-)
    #[display("-")]
    Neg,
    /// Logical or bitwise NOT (!)
    #[display("!")]
    Not,
    /// Dereference (*)
    #[display("*")]
    Deref,
    /// Shared borrow (&)
    #[display("&")]
    Ref,
    /// Mutable borrow (&mut)
    #[display("&mut")]
    RefMut,
}
