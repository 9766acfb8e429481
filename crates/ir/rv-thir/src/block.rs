//! THIR blocks and statements.

use rv_region::Scope;
use rv_span::FileSpan;

use crate::{Expr, Pat};

/// Whether a block was written `unsafe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockSafety {
    /// Ordinary block
    Safe,
    /// `unsafe { .. }`
    ExplicitUnsafe,
}

/// Lowered block
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// `Node` scope of the block
    pub region_scope: Scope,
    /// Destruction scope of the block, if it is terminating
    pub opt_destruction_scope: Option<Scope>,
    /// Source location
    pub span: FileSpan,
    /// Statements
    pub stmts: Vec<Stmt>,
    /// Tail expression
    pub expr: Option<Box<Expr>>,
    /// Safety
    pub safety_mode: BlockSafety,
}

/// Lowered statement
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    /// Statement kind
    pub kind: StmtKind,
    /// Destruction scope of the statement
    pub opt_destruction_scope: Option<Scope>,
}

/// Kind of statement
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Expression statement
    Expr {
        /// `Node` scope of the statement
        scope: Scope,
        /// Expression
        expr: Box<Expr>,
    },
    /// `let` statement
    Let {
        /// Rest of the block, starting at this statement
        remainder_scope: Scope,
        /// `Node` scope of the statement, covering the initializer
        init_scope: Scope,
        /// Bound pattern
        pattern: Box<Pat>,
        /// Initializer
        initializer: Option<Box<Expr>>,
        /// `else` block of a let-else
        else_block: Option<Box<Block>>,
        /// Source location
        span: FileSpan,
    },
}
