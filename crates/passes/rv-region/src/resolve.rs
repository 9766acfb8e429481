//! Builds the scope tree of a body from its HIR.

use rustc_hash::FxHashSet;
use rv_hir::{ArmId, BlockId, Body, DefId, Expr, ExprId, Pattern, PatternId, Stmt, StmtId, UnaryOp};
use tracing::debug;

use crate::{DesugarPart, HirNode, RegionScopes, RvalueScopes, Scope, ScopeData, ScopeTree};

/// Computes the scope tree and temporary lifetimes of `body`.
///
/// The root expression sits inside `Arguments(root)`, which sits inside
/// `CallSite(root)`. Terminating nodes (the root, statements, `if`
/// branches, loop bodies, `while` conditions, match arm bodies and guards,
/// operands of `&&`/`||`) get a destruction scope around their node scope.
#[must_use]
pub fn resolve_body_scopes(body: &Body) -> RegionScopes {
    let mut visitor = RegionResolutionVisitor {
        body,
        tree: ScopeTree::new(),
        rvalue_scopes: RvalueScopes::new(),
        parent: None,
        var_parent: None,
        terminating: FxHashSet::default(),
    };

    let root = body.root_expr;
    visitor.enter_scope(Scope {
        id: HirNode::Expr(root),
        data: ScopeData::CallSite,
    });
    visitor.enter_scope(Scope {
        id: HirNode::Expr(root),
        data: ScopeData::Arguments,
    });
    visitor.var_parent = visitor.parent;
    visitor.terminating.insert(HirNode::Expr(root));
    visitor.resolve_expr(root);

    debug!(scopes = visitor.tree.len(), "resolved body scopes");
    RegionScopes {
        tree: visitor.tree,
        rvalue_scopes: visitor.rvalue_scopes,
    }
}

struct RegionResolutionVisitor<'body> {
    body: &'body Body,
    tree: ScopeTree,
    rvalue_scopes: RvalueScopes,
    /// Innermost enclosing scope
    parent: Option<Scope>,
    /// Scope that `let` bindings and extended temporaries belong to
    var_parent: Option<Scope>,
    terminating: FxHashSet<HirNode>,
}

impl RegionResolutionVisitor<'_> {
    fn enter_scope(&mut self, child: Scope) {
        self.tree.record_scope_parent(child, self.parent);
        self.parent = Some(child);
    }

    fn enter_node_scope_with_dtor(&mut self, node: HirNode) {
        if self.terminating.contains(&node) {
            self.enter_scope(Scope::destruction(node));
        }
        self.enter_scope(Scope::node(node));
    }

    fn terminate(&mut self, node: impl Into<HirNode>) {
        self.terminating.insert(node.into());
    }

    fn resolve_expr(&mut self, expr: ExprId) {
        let body = self.body;
        let prev_parent = self.parent;
        self.enter_node_scope_with_dtor(HirNode::Expr(expr));

        match &body.exprs[expr] {
            Expr::Literal { .. } | Expr::Path { .. } | Expr::Continue { .. } => {}
            Expr::Paren { inner, .. } => self.resolve_expr(*inner),
            Expr::Call { callee, args, .. } => {
                self.resolve_expr(*callee);
                self.resolve_exprs(args);
            }
            Expr::MethodCall { receiver, args, .. } => {
                self.resolve_expr(*receiver);
                self.resolve_exprs(args);
            }
            Expr::Unary { operand, .. } | Expr::Cast { expr: operand, .. } => {
                self.resolve_expr(*operand);
            }
            Expr::Binary { op, lhs, rhs, .. } if op.is_lazy() => {
                // `a && b && c` only terminates the outermost chain's operands
                let chained = matches!(
                    &body.exprs[*lhs],
                    Expr::Binary { op: lhs_op, .. } if lhs_op == op
                );
                if !chained {
                    self.terminate(*lhs);
                }
                self.terminate(*rhs);
                self.resolve_expr(*lhs);
                self.resolve_expr(*rhs);
            }
            Expr::Binary { lhs, rhs, .. } | Expr::Assign { lhs, rhs, .. } => {
                self.resolve_expr(*lhs);
                self.resolve_expr(*rhs);
            }
            Expr::Index { base, index, .. } => {
                self.resolve_expr(*base);
                self.resolve_expr(*index);
            }
            Expr::Block { block, .. } => self.resolve_block(*block),
            Expr::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let expr_parent = self.parent;
                self.enter_scope(Scope::if_then(expr));
                self.terminate(*then_branch);
                self.resolve_expr(*condition);
                self.resolve_expr(*then_branch);
                self.parent = expr_parent;
                if let Some(else_branch) = else_branch {
                    self.terminate(*else_branch);
                    self.resolve_expr(*else_branch);
                }
            }
            Expr::Tuple { elements, .. } | Expr::Array { elements, .. } => {
                self.resolve_exprs(elements);
            }
            Expr::Repeat {
                initializer, count, ..
            } => {
                self.resolve_expr(*initializer);
                self.resolve_expr(*count);
            }
            Expr::Field { base, .. } => self.resolve_expr(*base),
            Expr::Loop { body: block, .. } => {
                self.terminate(*block);
                self.resolve_block(*block);
            }
            Expr::While {
                condition,
                body: block,
                ..
            } => self.resolve_while(expr, *condition, *block),
            Expr::For {
                iterable,
                body: block,
                ..
            } => {
                self.resolve_expr(*iterable);
                self.terminate(*block);
                self.resolve_block(*block);
            }
            Expr::Break { value, .. } | Expr::Return { value, .. } => {
                if let Some(value) = value {
                    self.resolve_expr(*value);
                }
            }
            Expr::Range { start, end, .. } => {
                for bound in [start, end].into_iter().flatten() {
                    self.resolve_expr(*bound);
                }
            }
            Expr::StructLiteral { fields, base, .. } => {
                for field in fields {
                    self.resolve_expr(field.value);
                }
                if let Some(base) = base {
                    self.resolve_expr(*base);
                }
            }
            Expr::Match {
                scrutinee, arms, ..
            } => {
                self.resolve_expr(*scrutinee);
                for arm in arms {
                    self.resolve_arm(*arm);
                }
            }
            Expr::Closure { body: closure_body, .. } => {
                self.terminate(*closure_body);
                self.resolve_expr(*closure_body);
            }
            Expr::Let { scrutinee, .. } => self.resolve_expr(*scrutinee),
        }

        self.parent = prev_parent;
    }

    /// Records the scopes of `loop { if cond { body } else { break } }`,
    /// keyed by the parts synthesized for `expr`.
    fn resolve_while(&mut self, expr: ExprId, condition: ExprId, block: BlockId) {
        let part = |part| HirNode::desugared(expr, part);
        let prev_parent = self.parent;

        self.terminate(part(DesugarPart::LoopBody));
        self.enter_node_scope_with_dtor(part(DesugarPart::LoopBody));
        self.enter_node_scope_with_dtor(part(DesugarPart::If));

        let if_parent = self.parent;
        self.enter_scope(Scope::if_then(part(DesugarPart::If)));
        self.terminate(condition);
        self.terminate(part(DesugarPart::Then));
        self.resolve_expr(condition);
        self.enter_node_scope_with_dtor(part(DesugarPart::Then));
        self.resolve_block(block);
        self.parent = if_parent;

        self.terminate(part(DesugarPart::Else));
        self.enter_node_scope_with_dtor(part(DesugarPart::Else));
        self.enter_node_scope_with_dtor(part(DesugarPart::ElseBlock));
        self.terminate(part(DesugarPart::ExitStmt));
        self.enter_node_scope_with_dtor(part(DesugarPart::ExitStmt));
        self.enter_node_scope_with_dtor(part(DesugarPart::Exit));

        self.parent = prev_parent;
    }

    fn resolve_exprs(&mut self, exprs: &[ExprId]) {
        for expr in exprs {
            self.resolve_expr(*expr);
        }
    }

    fn resolve_block(&mut self, block: BlockId) {
        let body = self.body;
        let prev = (self.parent, self.var_parent);
        self.enter_node_scope_with_dtor(HirNode::Block(block));
        self.var_parent = self.parent;

        let data = &body.blocks[block];
        for (index, stmt) in data.statements.iter().enumerate() {
            if matches!(body.stmts[*stmt], Stmt::Let { .. }) {
                // Bindings of this `let` are visible in the rest of the block
                self.enter_scope(Scope::remainder(block, index));
                self.var_parent = self.parent;
            }
            self.resolve_stmt(*stmt);
        }
        if let Some(tail) = data.tail {
            self.resolve_expr(tail);
        }

        (self.parent, self.var_parent) = prev;
    }

    fn resolve_stmt(&mut self, stmt: StmtId) {
        let body = self.body;
        self.terminate(stmt);
        let prev_parent = self.parent;
        self.enter_node_scope_with_dtor(HirNode::Stmt(stmt));

        match &body.stmts[stmt] {
            Stmt::Let {
                pattern,
                initializer,
                else_branch,
                ..
            } => {
                if let Some(init) = initializer {
                    self.resolve_local(*pattern, *init);
                }
                if let Some(else_branch) = else_branch {
                    self.resolve_block(*else_branch);
                }
            }
            Stmt::Expr { expr, .. } => self.resolve_expr(*expr),
            Stmt::Item { .. } => {}
        }

        self.parent = prev_parent;
    }

    fn resolve_arm(&mut self, arm: ArmId) {
        let body = self.body;
        let data = &body.arms[arm];
        let prev_parent = self.parent;
        self.enter_node_scope_with_dtor(HirNode::Arm(arm));

        self.terminate(data.body);
        if let Some(guard) = data.guard {
            self.terminate(guard);
            self.resolve_expr(guard);
        }
        self.resolve_expr(data.body);

        self.parent = prev_parent;
    }

    fn resolve_local(&mut self, pattern: PatternId, init: ExprId) {
        let blk_scope = self.var_parent;
        self.record_rvalue_scope_if_borrow_expr(init, blk_scope);
        if self.is_binding_pat(pattern) {
            self.record_rvalue_scope(init, blk_scope);
        }
        self.resolve_expr(init);
    }

    /// `let x = &temp();` and friends: the borrowed temporary lives as long
    /// as the binding.
    fn record_rvalue_scope_if_borrow_expr(&mut self, expr: ExprId, blk_scope: Option<Scope>) {
        let body = self.body;
        match &body.exprs[expr] {
            Expr::Unary {
                op: UnaryOp::Ref | UnaryOp::RefMut,
                operand,
                ..
            } => {
                self.record_rvalue_scope_if_borrow_expr(*operand, blk_scope);
                self.record_rvalue_scope(*operand, blk_scope);
            }
            Expr::StructLiteral { fields, .. } => {
                for field in fields {
                    self.record_rvalue_scope_if_borrow_expr(field.value, blk_scope);
                }
            }
            Expr::Tuple { elements, .. } | Expr::Array { elements, .. } => {
                for element in elements {
                    self.record_rvalue_scope_if_borrow_expr(*element, blk_scope);
                }
            }
            Expr::Call { callee, args, .. } if self.is_constructor(*callee) => {
                for arg in args {
                    self.record_rvalue_scope_if_borrow_expr(*arg, blk_scope);
                }
            }
            Expr::Paren { inner, .. } | Expr::Cast { expr: inner, .. } => {
                self.record_rvalue_scope_if_borrow_expr(*inner, blk_scope);
            }
            Expr::Block { block, .. } => {
                if let Some(tail) = body.blocks[*block].tail {
                    self.record_rvalue_scope_if_borrow_expr(tail, blk_scope);
                }
            }
            _ => {}
        }
    }

    /// Extends `expr` and the places it projects from.
    fn record_rvalue_scope(&mut self, expr: ExprId, lifetime: Option<Scope>) {
        let body = self.body;
        let mut current = expr;
        loop {
            self.rvalue_scopes
                .record_rvalue_scope(HirNode::Expr(current), lifetime);
            match &body.exprs[current] {
                Expr::Unary {
                    op: UnaryOp::Ref | UnaryOp::RefMut | UnaryOp::Deref,
                    operand: inner,
                    ..
                }
                | Expr::Field { base: inner, .. }
                | Expr::Index { base: inner, .. }
                | Expr::Paren { inner, .. } => current = *inner,
                _ => return,
            }
        }
    }

    fn is_constructor(&self, callee: ExprId) -> bool {
        matches!(
            self.body.resolution.expr_resolutions.get(&callee),
            Some(DefId::Adt(_) | DefId::Variant(_))
        )
    }

    /// Whether the pattern contains a `ref` binding.
    fn is_binding_pat(&self, pattern: PatternId) -> bool {
        match &self.body.patterns[pattern] {
            Pattern::Binding {
                by_ref: Some(_), ..
            } => true,
            Pattern::Binding {
                sub_pattern: Some(sub),
                ..
            } => self.is_binding_pat(*sub),
            Pattern::Tuple { patterns, .. }
            | Pattern::TupleStruct { patterns, .. }
            | Pattern::Slice { patterns, .. } => {
                patterns.iter().any(|pat| self.is_binding_pat(*pat))
            }
            Pattern::Struct { fields, .. } => {
                fields.iter().any(|field| self.is_binding_pat(field.pattern))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use rv_hir::{Block, BodyOwner, FunctionId, LiteralKind};
    use rv_span::FileSpan;

    use super::*;

    fn lit(body: &mut Body, value: u128) -> ExprId {
        body.exprs.alloc(Expr::Literal {
            kind: LiteralKind::Integer(value),
            span: FileSpan::dummy(),
        })
    }

    #[test]
    fn test_root_is_terminating_inside_arguments() {
        let mut body = Body::new(BodyOwner::Function(FunctionId(0)));
        body.root_expr = lit(&mut body, 1);
        let scopes = resolve_body_scopes(&body);
        let root = HirNode::Expr(body.root_expr);

        assert_eq!(scopes.destruction_scope(root), Some(Scope::destruction(root)));
        assert_eq!(scopes.temporary_scope(root), Ok(Some(Scope::node(root))));
        assert_eq!(
            scopes.tree.parent(Scope::destruction(root)),
            Some(Scope {
                id: root,
                data: ScopeData::Arguments
            })
        );
    }

    #[test]
    fn test_let_remainder_and_borrow_extension() {
        // { let x = &1; x_use }
        let mut body = Body::new(BodyOwner::Function(FunctionId(0)));
        let one = lit(&mut body, 1);
        let borrow = body.exprs.alloc(Expr::Unary {
            op: UnaryOp::Ref,
            operand: one,
            span: FileSpan::dummy(),
        });
        let pattern = body.patterns.alloc(Pattern::Wildcard {
            span: FileSpan::dummy(),
        });
        let stmt = body.stmts.alloc(Stmt::Let {
            pattern,
            initializer: Some(borrow),
            else_branch: None,
            span: FileSpan::dummy(),
        });
        let tail = lit(&mut body, 2);
        let block = body.blocks.alloc(Block {
            statements: vec![stmt],
            tail: Some(tail),
            is_unsafe: false,
            span: FileSpan::dummy(),
        });
        body.root_expr = body.exprs.alloc(Expr::Block {
            block,
            span: FileSpan::dummy(),
        });

        let scopes = resolve_body_scopes(&body);
        let remainder = Scope::remainder(block, 0);

        assert_eq!(scopes.tree.parent(Scope::node(stmt)), Some(Scope::destruction(stmt)));
        assert_eq!(scopes.tree.parent(Scope::destruction(stmt)), Some(remainder));
        // The borrowed literal lives until the end of the block.
        assert_eq!(scopes.temporary_scope(HirNode::Expr(one)), Ok(Some(remainder)));
        // The borrow itself dies with the statement.
        assert_eq!(
            scopes.temporary_scope(HirNode::Expr(borrow)),
            Ok(Some(Scope::node(stmt)))
        );
        assert_eq!(scopes.tree.parent(Scope::node(tail)), Some(remainder));
    }

    #[test]
    fn test_while_parts_nest_like_written_loop() {
        // while 1 { }
        let mut body = Body::new(BodyOwner::Function(FunctionId(0)));
        let condition = lit(&mut body, 1);
        let block = body.blocks.alloc(Block {
            statements: Vec::new(),
            tail: None,
            is_unsafe: false,
            span: FileSpan::dummy(),
        });
        let root = body.exprs.alloc(Expr::While {
            condition,
            body: block,
            label: None,
            span: FileSpan::dummy(),
        });
        body.root_expr = root;

        let scopes = resolve_body_scopes(&body);
        let tree = &scopes.tree;
        let part = |part| HirNode::desugared(root, part);

        assert_eq!(
            tree.parent(Scope::destruction(part(DesugarPart::LoopBody))),
            Some(Scope::node(root))
        );
        assert_eq!(
            tree.parent(Scope::node(part(DesugarPart::If))),
            Some(Scope::node(part(DesugarPart::LoopBody)))
        );
        assert_eq!(
            tree.parent(Scope::destruction(condition)),
            Some(Scope::if_then(part(DesugarPart::If)))
        );
        assert_eq!(
            tree.parent(Scope::node(block)),
            Some(Scope::node(part(DesugarPart::Then)))
        );
        assert_eq!(scopes.destruction_scope(HirNode::Block(block)), None);
        assert_eq!(
            tree.parent(Scope::destruction(part(DesugarPart::Else))),
            Some(Scope::node(part(DesugarPart::If)))
        );
        assert_eq!(
            scopes.temporary_scope(part(DesugarPart::Exit)),
            Ok(Some(Scope::node(part(DesugarPart::ExitStmt))))
        );
        assert_eq!(
            scopes.temporary_scope(part(DesugarPart::If)),
            Ok(Some(Scope::node(part(DesugarPart::LoopBody))))
        );
    }

    #[test]
    fn test_unvisited_node_is_missing() {
        let mut body = Body::new(BodyOwner::Function(FunctionId(0)));
        let orphan = lit(&mut body, 3);
        body.root_expr = lit(&mut body, 4);
        let scopes = resolve_body_scopes(&body);
        assert!(scopes.temporary_scope(HirNode::Expr(orphan)).is_err());
    }
}
