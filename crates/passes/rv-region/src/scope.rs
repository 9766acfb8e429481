//! Scope identifiers and the scope tree.

use core::fmt;

use derive_more::Display;
use la_arena::Idx;
use rustc_hash::FxHashMap;
use rv_hir::{ArmId, BlockId, ExprId, StmtId};

/// HIR node that can open a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HirNode {
    /// Expression
    Expr(ExprId),
    /// Block
    Block(BlockId),
    /// Statement
    Stmt(StmtId),
    /// Match arm
    Arm(ArmId),
    /// Node synthesized while desugaring the expression
    Desugared(ExprId, DesugarPart),
}

impl HirNode {
    /// Node `part` synthesized for `expr`.
    #[must_use]
    pub fn desugared(expr: ExprId, part: DesugarPart) -> Self {
        Self::Desugared(expr, part)
    }
}

/// Part of a `while` loop's `loop { if cond { body } else { break } }` form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DesugarPart {
    /// Block of the synthesized `loop`
    #[display("body")]
    LoopBody,
    /// The `if` in tail position of the loop block
    #[display("if")]
    If,
    /// Block expression holding the user's loop body
    #[display("then")]
    Then,
    /// Block expression of the `else` branch
    #[display("else")]
    Else,
    /// Block of the `else` branch
    #[display("else-block")]
    ElseBlock,
    /// Statement holding the `break`
    #[display("exit-stmt")]
    ExitStmt,
    /// The `break` leaving the loop
    #[display("exit")]
    Exit,
}

fn raw<T>(idx: Idx<T>) -> u32 {
    u32::from(idx.into_raw())
}

impl fmt::Display for HirNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expr(id) => write!(f, "expr#{}", raw(*id)),
            Self::Block(id) => write!(f, "block#{}", raw(*id)),
            Self::Stmt(id) => write!(f, "stmt#{}", raw(*id)),
            Self::Arm(id) => write!(f, "arm#{}", raw(*id)),
            Self::Desugared(id, part) => write!(f, "expr#{}.{part}", raw(*id)),
        }
    }
}

impl From<ExprId> for HirNode {
    fn from(id: ExprId) -> Self {
        Self::Expr(id)
    }
}

impl From<BlockId> for HirNode {
    fn from(id: BlockId) -> Self {
        Self::Block(id)
    }
}

impl From<StmtId> for HirNode {
    fn from(id: StmtId) -> Self {
        Self::Stmt(id)
    }
}

impl From<ArmId> for HirNode {
    fn from(id: ArmId) -> Self {
        Self::Arm(id)
    }
}

/// Index of the first statement covered by a remainder scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub struct FirstStatementIndex(pub u32);

/// What kind of region a [`Scope`] is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeData {
    /// The extent of the node itself
    Node,
    /// The whole call of a body, including parameter drops
    CallSite,
    /// Parameters of a body
    Arguments,
    /// Where values created inside the node are dropped
    Destruction,
    /// Condition and then-branch of an `if`
    IfThen,
    /// Statements of a block from the given one to the end
    Remainder(FirstStatementIndex),
}

/// A lexical region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scope {
    /// Node that opens the scope
    pub id: HirNode,
    /// Kind of scope
    pub data: ScopeData,
}

impl Scope {
    /// `Node` scope of `id`.
    pub fn node(id: impl Into<HirNode>) -> Self {
        Self {
            id: id.into(),
            data: ScopeData::Node,
        }
    }

    /// `Destruction` scope of `id`.
    pub fn destruction(id: impl Into<HirNode>) -> Self {
        Self {
            id: id.into(),
            data: ScopeData::Destruction,
        }
    }

    /// `IfThen` scope of an `if` expression.
    pub fn if_then(id: impl Into<HirNode>) -> Self {
        Self {
            id: id.into(),
            data: ScopeData::IfThen,
        }
    }

    /// Remainder of `block` starting at statement `first`.
    #[must_use]
    pub fn remainder(block: BlockId, first: usize) -> Self {
        Self {
            id: HirNode::Block(block),
            data: ScopeData::Remainder(FirstStatementIndex(first as u32)),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data {
            ScopeData::Node => write!(f, "Node({})", self.id),
            ScopeData::CallSite => write!(f, "CallSite({})", self.id),
            ScopeData::Arguments => write!(f, "Arguments({})", self.id),
            ScopeData::Destruction => write!(f, "Destruction({})", self.id),
            ScopeData::IfThen => write!(f, "IfThen({})", self.id),
            ScopeData::Remainder(first) => write!(f, "Remainder({}, {first})", self.id),
        }
    }
}

/// Parent links between scopes of one body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeTree {
    /// Every recorded scope and its enclosing scope; roots map to `None`
    parent_map: FxHashMap<Scope, Option<Scope>>,
    /// Destruction scope opened by each terminating node
    destruction_scopes: FxHashMap<HirNode, Scope>,
}

impl ScopeTree {
    /// Creates an empty tree
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `child` with its enclosing scope.
    pub fn record_scope_parent(&mut self, child: Scope, parent: Option<Scope>) {
        self.parent_map.insert(child, parent);
        if child.data == ScopeData::Destruction {
            self.destruction_scopes.insert(child.id, child);
        }
    }

    /// Enclosing scope of `scope`.
    #[must_use]
    pub fn parent(&self, scope: Scope) -> Option<Scope> {
        self.parent_map.get(&scope).copied().flatten()
    }

    /// Whether `scope` was recorded.
    #[must_use]
    pub fn contains(&self, scope: Scope) -> bool {
        self.parent_map.contains_key(&scope)
    }

    /// Destruction scope opened by `node`, if the node is terminating.
    #[must_use]
    pub fn opt_destruction_scope(&self, node: HirNode) -> Option<Scope> {
        self.destruction_scopes.get(&node).copied()
    }

    /// Number of recorded scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent_map.len()
    }

    /// Whether no scope was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent_map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use la_arena::RawIdx;

    use super::*;

    fn expr(raw_id: u32) -> ExprId {
        Idx::from_raw(RawIdx::from(raw_id))
    }

    #[test]
    fn test_destruction_scopes_are_indexed() {
        let mut tree = ScopeTree::new();
        let root = Scope::node(expr(0));
        tree.record_scope_parent(Scope::destruction(expr(1)), Some(root));
        tree.record_scope_parent(Scope::node(expr(1)), Some(Scope::destruction(expr(1))));

        assert_eq!(
            tree.opt_destruction_scope(HirNode::Expr(expr(1))),
            Some(Scope::destruction(expr(1)))
        );
        assert_eq!(tree.opt_destruction_scope(HirNode::Expr(expr(0))), None);
        assert_eq!(
            tree.parent(Scope::node(expr(1))),
            Some(Scope::destruction(expr(1)))
        );
        assert_eq!(tree.parent(Scope::destruction(expr(1))), Some(root));
    }

    #[test]
    fn test_scope_display() {
        let block: BlockId = Idx::from_raw(RawIdx::from(2u32));
        assert_eq!(Scope::node(expr(3)).to_string(), "Node(expr#3)");
        assert_eq!(Scope::remainder(block, 1).to_string(), "Remainder(block#2, 1)");
        assert_eq!(
            Scope::if_then(HirNode::desugared(expr(4), DesugarPart::If)).to_string(),
            "IfThen(expr#4.if)"
        );
    }
}
