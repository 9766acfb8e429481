//! Type representation

use core::fmt;

use derive_more::Display;
use la_arena::{Arena, Idx};
use rustc_hash::FxHashMap;
use rv_hir::{FunctionId, Mutability, TypeDefId};
use rv_intern::Symbol;

/// Type ID for arena allocation
pub type TyId = Idx<Ty>;

/// A type in the type system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ty {
    /// Type kind
    pub kind: TyKind,
}

/// Signed integer types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum IntTy {
    /// `i8`
    #[display("i8")]
    I8,
    /// `i16`
    #[display("i16")]
    I16,
    /// `i32`
    #[display("i32")]
    I32,
    /// `i64`
    #[display("i64")]
    I64,
    /// `i128`
    #[display("i128")]
    I128,
    /// `isize`
    #[display("isize")]
    Isize,
}

/// Unsigned integer types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum UintTy {
    /// `u8`
    #[display("u8")]
    U8,
    /// `u16`
    #[display("u16")]
    U16,
    /// `u32`
    #[display("u32")]
    U32,
    /// `u64`
    #[display("u64")]
    U64,
    /// `u128`
    #[display("u128")]
    U128,
    /// `usize`
    #[display("usize")]
    Usize,
}

/// Floating point types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FloatTy {
    /// `f32`
    #[display("f32")]
    F32,
    /// `f64`
    #[display("f64")]
    F64,
}

/// Length of an array type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ArrayLen {
    /// Evaluated length
    Known(u64),
    /// Length not evaluated yet
    #[display("_")]
    Unknown,
}

/// Kind of type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TyKind {
    /// `bool`
    Bool,
    /// `char`
    Char,
    /// Signed integer
    Int(IntTy),
    /// Unsigned integer
    Uint(UintTy),
    /// Floating point
    Float(FloatTy),
    /// `str`
    Str,
    /// Never type (bottom type)
    Never,
    /// Tuple type; the empty tuple is unit
    Tuple(Vec<TyId>),
    /// Struct or enum
    Adt {
        /// Definition
        def: TypeDefId,
        /// Generic arguments
        args: Vec<TyId>,
    },
    /// `&T` / `&mut T`
    Ref {
        /// Mutability
        mutability: Mutability,
        /// Referenced type
        inner: TyId,
    },
    /// `*const T` / `*mut T`
    RawPtr {
        /// Mutability
        mutability: Mutability,
        /// Pointee type
        inner: TyId,
    },
    /// `[T; N]`
    Array {
        /// Element type
        element: TyId,
        /// Length
        len: ArrayLen,
    },
    /// `[T]`
    Slice {
        /// Element type
        element: TyId,
    },
    /// Zero-sized type of a specific function item
    FnDef {
        /// Function
        def: FunctionId,
        /// Generic arguments
        args: Vec<TyId>,
    },
    /// `fn(A) -> R`
    FnPtr {
        /// Parameter types
        params: Vec<TyId>,
        /// Return type
        ret: TyId,
    },
    /// Generic parameter
    Param {
        /// Position in the owner's generics
        index: u32,
        /// Parameter name
        name: Symbol,
    },
    /// Type of an expression that failed to type-check
    Error,
}

impl TyKind {
    /// Whether this is `()`.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Tuple(elements) if elements.is_empty())
    }

    /// Whether this is `!`.
    #[must_use]
    pub fn is_never(&self) -> bool {
        matches!(self, Self::Never)
    }

    /// Definition of an ADT type.
    #[must_use]
    pub fn adt_def(&self) -> Option<TypeDefId> {
        match self {
            Self::Adt { def, .. } => Some(*def),
            _ => None,
        }
    }
}

/// Types every body needs, interned up front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonTypes {
    /// `()`
    pub unit: TyId,
    /// `!`
    pub never: TyId,
    /// `bool`
    pub bool: TyId,
    /// `usize`
    pub usize: TyId,
}

/// Interning type arena
#[derive(Debug, Clone)]
pub struct TyArena {
    arena: Arena<Ty>,
    interned: FxHashMap<TyKind, TyId>,
    common: CommonTypes,
}

impl TyArena {
    /// Create a new type arena with the common types already interned
    #[must_use]
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let mut interned = FxHashMap::default();
        let mut intern = |kind: TyKind| {
            let id = arena.alloc(Ty { kind: kind.clone() });
            interned.insert(kind, id);
            id
        };
        let common = CommonTypes {
            unit: intern(TyKind::Tuple(Vec::new())),
            never: intern(TyKind::Never),
            bool: intern(TyKind::Bool),
            usize: intern(TyKind::Uint(UintTy::Usize)),
        };
        Self {
            arena,
            interned,
            common,
        }
    }

    /// Interns a type, returning the existing id for an equal kind
    pub fn intern(&mut self, kind: TyKind) -> TyId {
        if let Some(&id) = self.interned.get(&kind) {
            return id;
        }
        let id = self.arena.alloc(Ty { kind: kind.clone() });
        self.interned.insert(kind, id);
        id
    }

    /// Looks up an already interned type without interning it
    #[must_use]
    pub fn lookup(&self, kind: &TyKind) -> Option<TyId> {
        self.interned.get(kind).copied()
    }

    /// Get a type by ID
    #[must_use]
    pub fn get(&self, id: TyId) -> &Ty {
        &self.arena[id]
    }

    /// Get the kind of a type
    #[must_use]
    pub fn kind(&self, id: TyId) -> &TyKind {
        &self.arena[id].kind
    }

    /// Pre-interned types
    #[must_use]
    pub fn common(&self) -> CommonTypes {
        self.common
    }

    /// `()`
    #[must_use]
    pub fn unit(&self) -> TyId {
        self.common.unit
    }

    /// `!`
    #[must_use]
    pub fn never(&self) -> TyId {
        self.common.never
    }

    /// `bool`
    #[must_use]
    pub fn bool(&self) -> TyId {
        self.common.bool
    }

    /// `&T` / `&mut T`
    pub fn reference(&mut self, mutability: Mutability, inner: TyId) -> TyId {
        self.intern(TyKind::Ref { mutability, inner })
    }

    /// Formats a type for dumps and error messages
    #[must_use]
    pub fn display(&self, id: TyId) -> TyDisplay<'_> {
        TyDisplay { arena: self, id }
    }

    /// Number of distinct types
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Whether no types are interned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}

impl Default for TyArena {
    fn default() -> Self {
        Self::new()
    }
}

/// [`fmt::Display`] adapter returned by [`TyArena::display`]
#[derive(Clone, Copy)]
pub struct TyDisplay<'arena> {
    arena: &'arena TyArena,
    id: TyId,
}

impl TyDisplay<'_> {
    fn nested(&self, id: TyId) -> Self {
        Self {
            arena: self.arena,
            id,
        }
    }

    fn list(&self, f: &mut fmt::Formatter<'_>, ids: &[TyId]) -> fmt::Result {
        for (position, id) in ids.iter().enumerate() {
            if position > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", self.nested(*id))?;
        }
        Ok(())
    }
}

impl fmt::Display for TyDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arena.kind(self.id) {
            TyKind::Bool => write!(f, "bool"),
            TyKind::Char => write!(f, "char"),
            TyKind::Int(int) => write!(f, "{int}"),
            TyKind::Uint(uint) => write!(f, "{uint}"),
            TyKind::Float(float) => write!(f, "{float}"),
            TyKind::Str => write!(f, "str"),
            TyKind::Never => write!(f, "!"),
            TyKind::Tuple(elements) => {
                write!(f, "(")?;
                self.list(f, elements)?;
                if elements.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            TyKind::Adt { def, args } if args.is_empty() => write!(f, "{def}"),
            TyKind::Adt { def, args } => {
                write!(f, "{def}<")?;
                self.list(f, args)?;
                write!(f, ">")
            }
            TyKind::FnDef { def, args } if args.is_empty() => write!(f, "{def}"),
            TyKind::FnDef { def, args } => {
                write!(f, "{def}<")?;
                self.list(f, args)?;
                write!(f, ">")
            }
            TyKind::Ref { mutability, inner } => {
                write!(f, "&{mutability}{}", self.nested(*inner))
            }
            TyKind::RawPtr { mutability, inner } => {
                let qualifier = if mutability.is_mut() { "mut" } else { "const" };
                write!(f, "*{qualifier} {}", self.nested(*inner))
            }
            TyKind::Array { element, len } => write!(f, "[{}; {len}]", self.nested(*element)),
            TyKind::Slice { element } => write!(f, "[{}]", self.nested(*element)),
            TyKind::FnPtr { params, ret } => {
                write!(f, "fn(")?;
                self.list(f, params)?;
                write!(f, ") -> {}", self.nested(*ret))
            }
            TyKind::Param { index, .. } => write!(f, "param#{index}"),
            TyKind::Error => write!(f, "{{error}}"),
        }
    }
}
