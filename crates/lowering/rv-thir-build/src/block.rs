//! Block and statement lowering.

use rv_hir::BlockId;
use rv_region::{HirNode, Scope};
use rv_thir::{Block, BlockSafety, Expr, ExprKind, PendingExpr, Stmt, StmtKind};
use rv_ty::TyId;
use tracing::{instrument, trace};

use crate::{InternalError, LowerResult, LoweringContext, Unsupported};

impl LoweringContext<'_> {
    /// Lowers a block as an expression of type `ty`.
    ///
    /// The expression takes the block's temporary lifetime; no scope
    /// wrappers are added around it.
    ///
    /// # Errors
    ///
    /// Fails if any statement or the tail expression fails to lower.
    #[instrument(level = "trace", skip(self))]
    pub fn mirror_block(&mut self, block: BlockId, ty: TyId) -> LowerResult<Expr> {
        let temp_lifetime = self.temporary_scope(HirNode::Block(block))?;
        let span = self.body.blocks[block].span;
        let block = self.lower_block(block, ty)?;
        Ok(PendingExpr::new(
            ExprKind::Block {
                block: Box::new(block),
            },
            ty,
            span,
        )
        .finish(temp_lifetime))
    }

    pub(crate) fn lower_block(&mut self, block_id: BlockId, ty: TyId) -> LowerResult<Block> {
        let body = self.body;
        let block = &body.blocks[block_id];
        let opt_destruction_scope = self.scopes.destruction_scope(HirNode::Block(block_id));

        let stmts = self.mirror_stmts(block_id)?;
        let expr = block.tail.map(|tail| self.mirror_boxed(tail)).transpose()?;

        if stmts.is_empty()
            && expr.is_none()
            && opt_destruction_scope.is_none()
            && !self.ty_ctx.types.kind(ty).is_unit()
        {
            return Err(InternalError::NonUnitEmptyBlock { span: block.span }.into());
        }

        Ok(Block {
            region_scope: Scope::node(block_id),
            opt_destruction_scope,
            span: block.span,
            stmts,
            expr,
            safety_mode: if block.is_unsafe {
                BlockSafety::ExplicitUnsafe
            } else {
                BlockSafety::Safe
            },
        })
    }

    fn mirror_stmts(&mut self, block_id: BlockId) -> LowerResult<Vec<Stmt>> {
        let body = self.body;
        let statements = &body.blocks[block_id].statements;
        let mut stmts = Vec::with_capacity(statements.len());

        for (index, stmt_id) in statements.iter().copied().enumerate() {
            let opt_destruction_scope = self.scopes.destruction_scope(HirNode::Stmt(stmt_id));
            let kind = match &body.stmts[stmt_id] {
                rv_hir::Stmt::Let {
                    pattern,
                    initializer,
                    else_branch,
                    span,
                } => {
                    if let Some(else_branch) = else_branch {
                        return Err(Unsupported::LetElse {
                            span: body.blocks[*else_branch].span,
                        }
                        .into());
                    }
                    let pattern = self.lower_pattern(*pattern)?;
                    let initializer = initializer
                        .map(|init| self.mirror_boxed(init))
                        .transpose()?;
                    StmtKind::Let {
                        remainder_scope: Scope::remainder(block_id, index),
                        init_scope: Scope::node(stmt_id),
                        pattern: Box::new(pattern),
                        initializer,
                        else_block: None,
                        span: *span,
                    }
                }
                rv_hir::Stmt::Expr { expr, .. } => StmtKind::Expr {
                    scope: Scope::node(stmt_id),
                    expr: self.mirror_boxed(*expr)?,
                },
                rv_hir::Stmt::Item { span } => {
                    return Err(Unsupported::ItemStatement { span: *span }.into());
                }
            };
            trace!(stmt = ?stmt_id, "lowered statement");
            stmts.push(Stmt {
                kind,
                opt_destruction_scope,
            });
        }
        Ok(stmts)
    }
}
