//! Function and constant bodies.

use la_arena::Arena;
use rustc_hash::FxHashMap;
use rv_intern::Symbol;
use rv_span::FileSpan;

use crate::{
    ArmId, BinaryOp, BlockId, ConstId, DefId, ExprId, FunctionId, LiteralKind, LocalId,
    Mutability, PatternId, StmtId, UnaryOp,
};

/// Item that owns a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyOwner {
    /// Function body
    Function(FunctionId),
    /// Constant initializer
    Const(ConstId),
}

/// Function or constant body
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Owning item
    pub owner: BodyOwner,
    /// Expression arena
    pub exprs: Arena<Expr>,
    /// Statement arena
    pub stmts: Arena<Stmt>,
    /// Pattern arena
    pub patterns: Arena<Pattern>,
    /// Block arena
    pub blocks: Arena<Block>,
    /// Match arm arena
    pub arms: Arena<MatchArm>,
    /// Parameter patterns, in order
    pub params: Vec<PatternId>,
    /// Root expression
    pub root_expr: ExprId,
    /// Name resolution results
    pub resolution: BodyResolution,
}

/// Name resolution results for a body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyResolution {
    /// Path expressions, struct literal paths and named field accesses
    pub expr_resolutions: FxHashMap<ExprId, DefId>,
    /// Paths inside patterns, and bindings that name a unit struct or variant
    pub pattern_resolutions: FxHashMap<PatternId, DefId>,
    /// Mapping from pattern bindings to local IDs
    pub pattern_locals: FxHashMap<PatternId, LocalId>,
    /// Labelled `break`/`continue` expressions to the loop they target
    pub label_targets: FxHashMap<ExprId, ExprId>,
}

impl Body {
    /// Creates a new empty body
    #[must_use]
    pub fn new(owner: BodyOwner) -> Self {
        let mut exprs = Arena::new();
        // Placeholder root until the real one is allocated
        let root_expr = exprs.alloc(Expr::Tuple {
            elements: Vec::new(),
            span: FileSpan::dummy(),
        });

        Self {
            owner,
            exprs,
            stmts: Arena::new(),
            patterns: Arena::new(),
            blocks: Arena::new(),
            arms: Arena::new(),
            params: Vec::new(),
            root_expr,
            resolution: BodyResolution::default(),
        }
    }

    /// Source location of an expression
    #[must_use]
    pub fn expr_span(&self, expr: ExprId) -> FileSpan {
        self.exprs[expr].span()
    }
}

/// Path as written, already resolved through [`BodyResolution`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    /// Path segments
    pub segments: Vec<Symbol>,
}

impl Path {
    /// Single-segment path.
    #[must_use]
    pub fn ident(name: Symbol) -> Self {
        Self {
            segments: vec![name],
        }
    }
}

/// Loop label (`'outer:`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    /// Label name, without the leading quote
    pub name: Symbol,
    /// Source location
    pub span: FileSpan,
}

/// Field accessed by `base.field`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldName {
    /// `base.name`
    Named(Symbol),
    /// `base.0`
    Index(u32),
}

/// One `name: value` entry of a struct literal
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInit {
    /// Field name
    pub name: Symbol,
    /// Value expression; for shorthand fields, a path to the binding of the same name
    pub value: ExprId,
    /// Written as `Foo { name }`
    pub shorthand: bool,
    /// Source location
    pub span: FileSpan,
}

/// HIR expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal {
        /// Literal kind
        kind: LiteralKind,
        /// Source location
        span: FileSpan,
    },
    /// Path to a local, item, constructor or constant
    Path {
        /// Path as written
        path: Path,
        /// Source location
        span: FileSpan,
    },
    /// `(inner)`
    Paren {
        /// Parenthesized expression
        inner: ExprId,
        /// Source location
        span: FileSpan,
    },
    /// Function or constructor call
    Call {
        /// Callee expression
        callee: ExprId,
        /// Arguments
        args: Vec<ExprId>,
        /// Source location
        span: FileSpan,
    },
    /// Method call
    MethodCall {
        /// Receiver expression
        receiver: ExprId,
        /// Method name
        method: Symbol,
        /// Arguments
        args: Vec<ExprId>,
        /// Source location
        span: FileSpan,
    },
    /// Unary operation
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: ExprId,
        /// Source location
        span: FileSpan,
    },
    /// Binary operation, including `&&` and `||`
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        lhs: ExprId,
        /// Right operand
        rhs: ExprId,
        /// Source location
        span: FileSpan,
    },
    /// `lhs = rhs` or `lhs op= rhs`
    Assign {
        /// Compound operator, `None` for plain assignment
        op: Option<BinaryOp>,
        /// Assigned place
        lhs: ExprId,
        /// Assigned value
        rhs: ExprId,
        /// Source location
        span: FileSpan,
    },
    /// Block expression
    Block {
        /// Block
        block: BlockId,
        /// Source location
        span: FileSpan,
    },
    /// If expression
    If {
        /// Condition
        condition: ExprId,
        /// Then branch, always a block expression
        then_branch: ExprId,
        /// Else branch
        else_branch: Option<ExprId>,
        /// Source location
        span: FileSpan,
    },
    /// Tuple, `()` when empty
    Tuple {
        /// Elements
        elements: Vec<ExprId>,
        /// Source location
        span: FileSpan,
    },
    /// `[a, b, c]`
    Array {
        /// Elements
        elements: Vec<ExprId>,
        /// Source location
        span: FileSpan,
    },
    /// `[value; count]`
    Repeat {
        /// Repeated value
        initializer: ExprId,
        /// Count expression
        count: ExprId,
        /// Source location
        span: FileSpan,
    },
    /// Field access
    Field {
        /// Base expression
        base: ExprId,
        /// Field name or position
        field: FieldName,
        /// Source location
        span: FileSpan,
    },
    /// `loop { .. }`
    Loop {
        /// Loop body
        body: BlockId,
        /// Optional label
        label: Option<Label>,
        /// Source location
        span: FileSpan,
    },
    /// `while cond { .. }`
    While {
        /// Condition
        condition: ExprId,
        /// Loop body
        body: BlockId,
        /// Optional label
        label: Option<Label>,
        /// Source location
        span: FileSpan,
    },
    /// `for pat in iter { .. }`
    For {
        /// Binding pattern
        pattern: PatternId,
        /// Iterated expression
        iterable: ExprId,
        /// Loop body
        body: BlockId,
        /// Optional label
        label: Option<Label>,
        /// Source location
        span: FileSpan,
    },
    /// `break 'label value`
    Break {
        /// Optional label
        label: Option<Label>,
        /// Optional value
        value: Option<ExprId>,
        /// Source location
        span: FileSpan,
    },
    /// `continue 'label`
    Continue {
        /// Optional label
        label: Option<Label>,
        /// Source location
        span: FileSpan,
    },
    /// `return value`
    Return {
        /// Optional value
        value: Option<ExprId>,
        /// Source location
        span: FileSpan,
    },
    /// `start..end`, `start..=end` and the open-ended forms
    Range {
        /// Lower bound
        start: Option<ExprId>,
        /// Upper bound
        end: Option<ExprId>,
        /// Written with `..=`
        inclusive: bool,
        /// Source location
        span: FileSpan,
    },
    /// `Path { field: value, ..base }`
    StructLiteral {
        /// Struct or variant path
        path: Path,
        /// Field initializers, as written
        fields: Vec<FieldInit>,
        /// Functional update base
        base: Option<ExprId>,
        /// Source location
        span: FileSpan,
    },
    /// `base[index]`
    Index {
        /// Indexed expression
        base: ExprId,
        /// Index expression
        index: ExprId,
        /// Source location
        span: FileSpan,
    },
    /// Match expression
    Match {
        /// Scrutinee
        scrutinee: ExprId,
        /// Arms, in order
        arms: Vec<ArmId>,
        /// Source location
        span: FileSpan,
    },
    /// Closure
    Closure {
        /// Parameter patterns
        params: Vec<PatternId>,
        /// Body expression
        body: ExprId,
        /// Source location
        span: FileSpan,
    },
    /// `expr as Ty`; the target type is the expression's type
    Cast {
        /// Cast operand
        expr: ExprId,
        /// Source location
        span: FileSpan,
    },
    /// `let pat = expr` in condition position
    Let {
        /// Pattern
        pattern: PatternId,
        /// Matched expression
        scrutinee: ExprId,
        /// Source location
        span: FileSpan,
    },
}

impl Expr {
    /// Source location
    #[must_use]
    pub fn span(&self) -> FileSpan {
        match self {
            Self::Literal { span, .. }
            | Self::Path { span, .. }
            | Self::Paren { span, .. }
            | Self::Call { span, .. }
            | Self::MethodCall { span, .. }
            | Self::Unary { span, .. }
            | Self::Binary { span, .. }
            | Self::Assign { span, .. }
            | Self::Block { span, .. }
            | Self::If { span, .. }
            | Self::Tuple { span, .. }
            | Self::Array { span, .. }
            | Self::Repeat { span, .. }
            | Self::Field { span, .. }
            | Self::Loop { span, .. }
            | Self::While { span, .. }
            | Self::For { span, .. }
            | Self::Break { span, .. }
            | Self::Continue { span, .. }
            | Self::Return { span, .. }
            | Self::Range { span, .. }
            | Self::StructLiteral { span, .. }
            | Self::Index { span, .. }
            | Self::Match { span, .. }
            | Self::Closure { span, .. }
            | Self::Cast { span, .. }
            | Self::Let { span, .. } => *span,
        }
    }

    /// Whether the expression is `loop`, `while` or `for`.
    #[must_use]
    pub fn is_loop(&self) -> bool {
        matches!(self, Self::Loop { .. } | Self::While { .. } | Self::For { .. })
    }

    /// Label of a loop expression.
    #[must_use]
    pub fn loop_label(&self) -> Option<Label> {
        match self {
            Self::Loop { label, .. } | Self::While { label, .. } | Self::For { label, .. } => {
                *label
            }
            _ => None,
        }
    }
}

/// `{ stmts; tail }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Statements
    pub statements: Vec<StmtId>,
    /// Trailing expression
    pub tail: Option<ExprId>,
    /// Written as `unsafe { .. }`
    pub is_unsafe: bool,
    /// Source location
    pub span: FileSpan,
}

/// HIR statements
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Let binding
    Let {
        /// Pattern
        pattern: PatternId,
        /// Initializer
        initializer: Option<ExprId>,
        /// `else { .. }` of a let-else
        else_branch: Option<BlockId>,
        /// Source location
        span: FileSpan,
    },
    /// Expression statement
    Expr {
        /// Expression
        expr: ExprId,
        /// Followed by `;`
        has_semicolon: bool,
        /// Source location
        span: FileSpan,
    },
    /// Nested item declaration
    Item {
        /// Source location
        span: FileSpan,
    },
}

impl Stmt {
    /// Source location
    #[must_use]
    pub fn span(&self) -> FileSpan {
        match self {
            Self::Let { span, .. } | Self::Expr { span, .. } | Self::Item { span } => *span,
        }
    }
}

/// Match arm
#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    /// Pattern
    pub pattern: PatternId,
    /// Optional guard
    pub guard: Option<ExprId>,
    /// Arm body
    pub body: ExprId,
    /// Source location
    pub span: FileSpan,
}

/// One end of a range pattern
#[derive(Debug, Clone, PartialEq)]
pub struct PatternBound {
    /// Literal
    pub kind: LiteralKind,
    /// Written with a leading `-`
    pub negated: bool,
}

/// `name: pattern` inside a struct pattern
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPattern {
    /// Field name
    pub name: Symbol,
    /// Field pattern
    pub pattern: PatternId,
    /// Source location
    pub span: FileSpan,
}

/// HIR patterns
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `_`
    Wildcard {
        /// Source location
        span: FileSpan,
    },
    /// `ref mut name @ sub`
    Binding {
        /// Bound name
        name: Symbol,
        /// `ref` / `ref mut`
        by_ref: Option<Mutability>,
        /// Written with `mut`
        mutable: bool,
        /// Pattern after `@`
        sub_pattern: Option<PatternId>,
        /// Source location
        span: FileSpan,
    },
    /// Literal pattern
    Literal {
        /// Literal
        kind: LiteralKind,
        /// Written with a leading `-`
        negated: bool,
        /// Source location
        span: FileSpan,
    },
    /// `a..=b`, `a..b`, `a..`, `..=b`
    Range {
        /// Lower bound
        start: Option<PatternBound>,
        /// Upper bound
        end: Option<PatternBound>,
        /// Written with `..=`
        inclusive: bool,
        /// Source location
        span: FileSpan,
    },
    /// `(a, b)`
    Tuple {
        /// Element patterns, `..` included
        patterns: Vec<PatternId>,
        /// Source location
        span: FileSpan,
    },
    /// `Name(a, b)`
    TupleStruct {
        /// Struct or variant path
        path: Path,
        /// Field patterns, `..` included
        patterns: Vec<PatternId>,
        /// Source location
        span: FileSpan,
    },
    /// `Name { a, b: c, .. }`
    Struct {
        /// Struct or variant path
        path: Path,
        /// Field patterns
        fields: Vec<FieldPattern>,
        /// Ends with `..`
        has_rest: bool,
        /// Source location
        span: FileSpan,
    },
    /// Path to a unit struct, unit variant or constant
    Path {
        /// Path
        path: Path,
        /// Source location
        span: FileSpan,
    },
    /// `a | b`
    Or {
        /// Alternatives
        patterns: Vec<PatternId>,
        /// Source location
        span: FileSpan,
    },
    /// `&p` / `&mut p`
    Ref {
        /// Inner pattern
        inner: PatternId,
        /// Written with `mut`
        mutable: bool,
        /// Source location
        span: FileSpan,
    },
    /// `[a, .., z]`
    Slice {
        /// Element patterns, `..` included
        patterns: Vec<PatternId>,
        /// Source location
        span: FileSpan,
    },
    /// `..` inside a tuple or slice pattern
    Rest {
        /// Source location
        span: FileSpan,
    },
}

impl Pattern {
    /// Source location
    #[must_use]
    pub fn span(&self) -> FileSpan {
        match self {
            Self::Wildcard { span }
            | Self::Binding { span, .. }
            | Self::Literal { span, .. }
            | Self::Range { span, .. }
            | Self::Tuple { span, .. }
            | Self::TupleStruct { span, .. }
            | Self::Struct { span, .. }
            | Self::Path { span, .. }
            | Self::Or { span, .. }
            | Self::Ref { span, .. }
            | Self::Slice { span, .. }
            | Self::Rest { span } => *span,
        }
    }

    /// Whether this is `..`.
    #[must_use]
    pub fn is_rest(&self) -> bool {
        matches!(self, Self::Rest { .. })
    }
}
