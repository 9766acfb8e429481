//! THIR expressions.

use derive_more::Display;
use rv_hir::{BinaryOp, FieldIdx, LiteralKind, LocalId, TypeDefId, VariantIdx};
use rv_region::Scope;
use rv_span::FileSpan;
use rv_ty::{ArrayLen, TyId};

use crate::{Block, Pat};

/// A typed expression with its temporary lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// Expression kind
    pub kind: ExprKind,
    /// Type of the expression, after any adjustment node it represents
    pub ty: TyId,
    /// Source location
    pub span: FileSpan,
    /// Scope until which temporaries created by this expression live;
    /// `None` means they outlive the body
    pub temp_lifetime: Option<Scope>,
}

/// An expression whose temporary lifetime has not been decided yet
#[derive(Debug, Clone, PartialEq)]
pub struct PendingExpr {
    /// Expression kind
    pub kind: ExprKind,
    /// Type
    pub ty: TyId,
    /// Source location
    pub span: FileSpan,
}

impl PendingExpr {
    /// Starts an expression.
    #[must_use]
    pub fn new(kind: ExprKind, ty: TyId, span: FileSpan) -> Self {
        Self { kind, ty, span }
    }

    /// Attaches the temporary lifetime, completing the expression.
    #[must_use]
    pub fn finish(self, temp_lifetime: Option<Scope>) -> Expr {
        Expr {
            kind: self.kind,
            ty: self.ty,
            span: self.span,
            temp_lifetime,
        }
    }
}

impl Expr {
    /// Wraps `self` in a new node of type `ty` that keeps the temporary lifetime.
    #[must_use]
    pub fn wrap(self, ty: TyId, make: impl FnOnce(Box<Self>) -> ExprKind) -> Self {
        let span = self.span;
        let temp_lifetime = self.temp_lifetime;
        PendingExpr::new(make(Box::new(self)), ty, span).finish(temp_lifetime)
    }

    /// Strips `Scope` wrappers.
    #[must_use]
    pub fn skip_scopes(&self) -> &Self {
        let mut expr = self;
        while let ExprKind::Scope { value, .. } = &expr.kind {
            expr = value;
        }
        expr
    }
}

/// Built-in unary operators; negation of a literal is folded into the literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum UnOp {
    /// `-`
    #[display("-")]
    Neg,
    /// `!`
    #[display("!")]
    Not,
}

/// Short-circuiting operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum LogicalOp {
    /// `&&`
    #[display("&&")]
    And,
    /// `||`
    #[display("||")]
    Or,
}

/// Kind of borrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum BorrowKind {
    /// `&`
    Shared,
    /// `&mut`; two-phase borrows are not distinguished
    Mut,
}

/// Struct or enum variant construction
#[derive(Debug, Clone, PartialEq)]
pub struct AdtExpr {
    /// Constructed ADT
    pub adt_def: TypeDefId,
    /// Constructed variant, 0 for structs
    pub variant_index: VariantIdx,
    /// Generic arguments of the ADT type
    pub args: Vec<TyId>,
    /// Field values, in declaration order
    pub fields: Vec<FieldExpr>,
}

/// One field of an [`AdtExpr`]
#[derive(Debug, Clone, PartialEq)]
pub struct FieldExpr {
    /// Declaration-order field index
    pub name: FieldIdx,
    /// Field value
    pub expr: Expr,
}

/// Match arm
#[derive(Debug, Clone, PartialEq)]
pub struct Arm {
    /// Pattern
    pub pattern: Box<Pat>,
    /// Guard
    pub guard: Option<Box<Expr>>,
    /// Body
    pub body: Box<Expr>,
    /// `Node` scope of the arm
    pub scope: Scope,
    /// Source location
    pub span: FileSpan,
}

/// Kind of THIR expression
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Lexical scope around `value`
    Scope {
        /// The scope
        region_scope: Scope,
        /// Scoped expression
        value: Box<Expr>,
    },
    /// Literal, with negation folded in
    Literal {
        /// Literal
        lit: LiteralKind,
        /// Negated
        neg: bool,
    },
    /// Built-in unary operation
    Unary {
        /// Operator
        op: UnOp,
        /// Operand
        arg: Box<Expr>,
    },
    /// Built-in binary operation; never `&&` or `||`
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        lhs: Box<Expr>,
        /// Right operand
        rhs: Box<Expr>,
    },
    /// `&&` / `||`
    LogicalOp {
        /// Operator
        op: LogicalOp,
        /// Left operand
        lhs: Box<Expr>,
        /// Right operand
        rhs: Box<Expr>,
    },
    /// `lhs = rhs`
    Assign {
        /// Place
        lhs: Box<Expr>,
        /// Value
        rhs: Box<Expr>,
    },
    /// `lhs op= rhs`
    AssignOp {
        /// Operator without the `=`
        op: BinaryOp,
        /// Place
        lhs: Box<Expr>,
        /// Value
        rhs: Box<Expr>,
    },
    /// Block expression
    Block {
        /// Block
        block: Box<Block>,
    },
    /// If expression
    If {
        /// Scope of the condition and then-branch
        if_then_scope: Scope,
        /// Condition
        cond: Box<Expr>,
        /// Then branch
        then: Box<Expr>,
        /// Else branch
        else_opt: Option<Box<Expr>>,
    },
    /// `loop`
    Loop {
        /// Unit-typed block expression
        body: Box<Expr>,
    },
    /// `break`
    Break {
        /// `Node` scope of the targeted loop
        label: Scope,
        /// Value
        value: Option<Box<Expr>>,
    },
    /// `continue`
    Continue {
        /// `Node` scope of the targeted loop
        label: Scope,
    },
    /// `return`
    Return {
        /// Value
        value: Option<Box<Expr>>,
    },
    /// Function call
    Call {
        /// Type of the callee
        ty: TyId,
        /// Callee
        fun: Box<Expr>,
        /// Arguments
        args: Vec<Expr>,
        /// Written as a call in the source, rather than produced by desugaring
        from_hir_call: bool,
    },
    /// Field access
    Field {
        /// Base expression
        lhs: Box<Expr>,
        /// Variant holding the field, 0 for structs and tuples
        variant_index: VariantIdx,
        /// Declaration-order field index
        name: FieldIdx,
    },
    /// `*arg`
    Deref {
        /// Operand
        arg: Box<Expr>,
    },
    /// `&arg` / `&mut arg`
    Borrow {
        /// Kind of borrow
        borrow_kind: BorrowKind,
        /// Borrowed place
        arg: Box<Expr>,
    },
    /// Built-in indexing
    Index {
        /// Indexed place
        lhs: Box<Expr>,
        /// Index
        index: Box<Expr>,
    },
    /// Tuple, unit when empty
    Tuple {
        /// Elements
        fields: Vec<Expr>,
    },
    /// Array literal
    Array {
        /// Elements
        fields: Vec<Expr>,
    },
    /// `[value; count]`
    Repeat {
        /// Repeated value
        value: Box<Expr>,
        /// Array length
        count: ArrayLen,
    },
    /// Struct or variant construction
    Adt(Box<AdtExpr>),
    /// Match expression
    Match {
        /// Scrutinee
        scrutinee: Box<Expr>,
        /// Arms
        arms: Vec<Arm>,
    },
    /// Use of a local variable
    VarRef {
        /// Variable
        id: LocalId,
    },
    /// Value of a zero-sized type, identified by the expression's type
    ZstLiteral,
    /// Identity, giving `source` its own temporary scope
    Use {
        /// Operand
        source: Box<Expr>,
    },
    /// `!` coerced to the expression's type
    NeverToAny {
        /// Diverging operand
        source: Box<Expr>,
    },
}

#[cfg(test)]
mod tests {
    use la_arena::{Idx, RawIdx};
    use rv_hir::ExprId;
    use rv_ty::TyArena;

    use super::*;

    #[test]
    fn test_wrap_keeps_temp_lifetime() {
        let types = TyArena::new();
        let id: ExprId = Idx::from_raw(RawIdx::from(3u32));
        let inner = PendingExpr::new(ExprKind::ZstLiteral, types.never(), FileSpan::dummy())
            .finish(Some(Scope::node(id)));
        let wrapped = inner.wrap(types.unit(), |source| ExprKind::NeverToAny { source });

        assert_eq!(wrapped.temp_lifetime, Some(Scope::node(id)));
        assert_eq!(wrapped.ty, types.unit());
        assert!(matches!(wrapped.kind, ExprKind::NeverToAny { .. }));
    }

    #[test]
    fn test_skip_scopes() {
        let types = TyArena::new();
        let id: ExprId = Idx::from_raw(RawIdx::from(0u32));
        let inner = PendingExpr::new(ExprKind::ZstLiteral, types.unit(), FileSpan::dummy()).finish(None);
        let scoped = inner.clone().wrap(types.unit(), |value| ExprKind::Scope {
            region_scope: Scope::node(id),
            value,
        });
        assert_eq!(scoped.skip_scopes(), &inner);
    }
}
