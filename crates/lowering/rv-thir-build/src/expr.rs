//! Expression lowering.

use rv_hir::{
    ArmId, BlockId, DefId, FieldIdx, FieldInit, FieldName, KnownItem, Label, UnaryOp, VariantIdx,
};
use rv_region::{DesugarPart, HirNode, Scope};
use rv_span::FileSpan;
use rv_thir::{
    AdtExpr, Arm, Block, BlockSafety, BorrowKind, Expr, ExprKind, FieldExpr, LogicalOp,
    PendingExpr, Stmt, StmtKind, UnOp,
};
use rv_ty::{Adjust, Adjustment, ArrayLen, TyId, TyKind};
use tracing::{debug, instrument, trace};

use crate::{InternalError, LowerResult, LoweringContext, Unsupported};

impl LoweringContext<'_> {
    /// Lowers an expression, applying its adjustments and scope wrappers
    ///
    /// # Errors
    ///
    /// Fails on the first internal inconsistency or unsupported construct
    /// anywhere inside the expression.
    #[instrument(level = "trace", skip(self))]
    pub fn mirror_expr(&mut self, expr: rv_hir::ExprId) -> LowerResult<Expr> {
        if self.depth >= self.config.recursion_limit {
            return Err(InternalError::RecursionLimit {
                span: self.span_of(expr),
                limit: self.config.recursion_limit,
            }
            .into());
        }
        self.depth += 1;
        let result = self.mirror_expr_inner(expr);
        self.depth -= 1;
        result
    }

    pub(crate) fn mirror_boxed(&mut self, expr: rv_hir::ExprId) -> LowerResult<Box<Expr>> {
        self.mirror_expr(expr).map(Box::new)
    }

    pub(crate) fn mirror_exprs(&mut self, exprs: &[rv_hir::ExprId]) -> LowerResult<Vec<Expr>> {
        exprs.iter().map(|expr| self.mirror_expr(*expr)).collect()
    }

    fn mirror_expr_inner(&mut self, hir_id: rv_hir::ExprId) -> LowerResult<Expr> {
        let node = HirNode::Expr(hir_id);
        let temp_lifetime = self.temporary_scope(node)?;

        let mut expr = self.make_mirror_unadjusted(hir_id, temp_lifetime)?;

        // A `break` value must unify with the loop's type
        if matches!(self.body.exprs[hir_id], rv_hir::Expr::Break { .. }) {
            let never_to_any = Adjustment {
                kind: Adjust::NeverToAny,
                target: self.ty_ctx.types.unit(),
            };
            expr = self.apply_adjustment(hir_id, expr, &never_to_any)?;
        }
        let adjustments = self.ty_ctx.expr_adjustments(hir_id).to_vec();
        for adjustment in &adjustments {
            expr = self.apply_adjustment(hir_id, expr, adjustment)?;
        }

        let span = self.span_of(hir_id);
        Ok(self.wrap_region_scopes(node, expr, temp_lifetime, span))
    }

    /// Wraps `expr` in the `Node` scope of `node`, then in its destruction
    /// scope if the node is terminating.
    fn wrap_region_scopes(
        &self,
        node: HirNode,
        expr: Expr,
        temp_lifetime: Option<Scope>,
        span: FileSpan,
    ) -> Expr {
        let ty = expr.ty;
        let mut expr = PendingExpr::new(
            ExprKind::Scope {
                region_scope: Scope::node(node),
                value: Box::new(expr),
            },
            ty,
            span,
        )
        .finish(temp_lifetime);

        if let Some(region_scope) = self.scopes.destruction_scope(node) {
            expr = PendingExpr::new(
                ExprKind::Scope {
                    region_scope,
                    value: Box::new(expr),
                },
                ty,
                span,
            )
            .finish(temp_lifetime);
        }
        expr
    }

    fn make_mirror_unadjusted(
        &mut self,
        hir_id: rv_hir::ExprId,
        temp_lifetime: Option<Scope>,
    ) -> LowerResult<Expr> {
        let body = self.body;
        let span = self.span_of(hir_id);
        let ty = self.expr_ty(hir_id)?;

        let kind = match &body.exprs[hir_id] {
            rv_hir::Expr::Paren { inner, .. } => return self.mirror_expr(*inner),

            rv_hir::Expr::Literal { kind, .. } => ExprKind::Literal {
                lit: kind.clone(),
                neg: false,
            },

            rv_hir::Expr::Unary { op, operand, .. } => self.lower_unary(*op, *operand)?,

            rv_hir::Expr::Binary { op, lhs, rhs, .. } => {
                let lhs = self.mirror_boxed(*lhs)?;
                let rhs = self.mirror_boxed(*rhs)?;
                match op {
                    rv_hir::BinaryOp::And => ExprKind::LogicalOp {
                        op: LogicalOp::And,
                        lhs,
                        rhs,
                    },
                    rv_hir::BinaryOp::Or => ExprKind::LogicalOp {
                        op: LogicalOp::Or,
                        lhs,
                        rhs,
                    },
                    _ => ExprKind::Binary { op: *op, lhs, rhs },
                }
            }

            rv_hir::Expr::Assign { op, lhs, rhs, .. } => {
                if let Some(op) = op
                    && op.is_lazy()
                {
                    return Err(InternalError::InvalidAssignOp { op: *op, span }.into());
                }
                let lhs = self.mirror_boxed(*lhs)?;
                let rhs = self.mirror_boxed(*rhs)?;
                match op {
                    Some(op) => ExprKind::AssignOp { op: *op, lhs, rhs },
                    None => ExprKind::Assign { lhs, rhs },
                }
            }

            rv_hir::Expr::Call { callee, args, .. } => self.lower_call(ty, span, *callee, args)?,

            rv_hir::Expr::MethodCall { .. } => {
                return Err(Unsupported::MethodCall { span }.into());
            }

            rv_hir::Expr::Block { block, .. } => ExprKind::Block {
                block: Box::new(self.lower_block(*block, ty)?),
            },

            rv_hir::Expr::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => ExprKind::If {
                if_then_scope: Scope::if_then(hir_id),
                cond: self.mirror_boxed(*condition)?,
                then: self.mirror_boxed(*then_branch)?,
                else_opt: else_branch
                    .map(|else_branch| self.mirror_boxed(else_branch))
                    .transpose()?,
            },

            rv_hir::Expr::Tuple { elements, .. } => ExprKind::Tuple {
                fields: self.mirror_exprs(elements)?,
            },

            rv_hir::Expr::Array { elements, .. } => ExprKind::Array {
                fields: self.mirror_exprs(elements)?,
            },

            rv_hir::Expr::Repeat { initializer, .. } => {
                let count = match self.ty_ctx.types.kind(ty) {
                    TyKind::Array { len, .. } => *len,
                    _ => ArrayLen::Unknown,
                };
                if count == ArrayLen::Unknown {
                    debug!(expr = ?hir_id, "repeat length is not known");
                }
                ExprKind::Repeat {
                    value: self.mirror_boxed(*initializer)?,
                    count,
                }
            }

            rv_hir::Expr::Field { base, field, .. } => self.lower_field(hir_id, *base, *field)?,

            rv_hir::Expr::Loop { body: block, .. } => {
                let unit = self.ty_ctx.types.unit();
                self.loop_stack.push(hir_id);
                let loop_body = self.mirror_block(*block, unit);
                self.loop_stack.pop();
                ExprKind::Loop {
                    body: Box::new(loop_body?),
                }
            }

            rv_hir::Expr::While {
                condition,
                body: block,
                ..
            } => {
                self.loop_stack.push(hir_id);
                let loop_body = self.desugar_while(hir_id, span, *condition, *block);
                self.loop_stack.pop();
                ExprKind::Loop {
                    body: Box::new(loop_body?),
                }
            }

            rv_hir::Expr::Break { label, value, .. } => {
                let target = self.jump_target(*label, hir_id)?;
                ExprKind::Break {
                    label: Scope::node(target),
                    value: value.map(|value| self.mirror_boxed(value)).transpose()?,
                }
            }

            rv_hir::Expr::Continue { label, .. } => ExprKind::Continue {
                label: Scope::node(self.jump_target(*label, hir_id)?),
            },

            rv_hir::Expr::Return { value, .. } => ExprKind::Return {
                value: value.map(|value| self.mirror_boxed(value)).transpose()?,
            },

            rv_hir::Expr::Path { .. } => self.convert_path_expr(hir_id, ty)?,

            rv_hir::Expr::Range {
                start,
                end,
                inclusive,
                ..
            } => self.lower_range(ty, span, temp_lifetime, *start, *end, *inclusive)?,

            rv_hir::Expr::StructLiteral { fields, base, .. } => {
                self.lower_struct_literal(hir_id, ty, fields, *base)?
            }

            rv_hir::Expr::Index { base, index, .. } => ExprKind::Index {
                lhs: self.mirror_boxed(*base)?,
                index: self.mirror_boxed(*index)?,
            },

            rv_hir::Expr::Match {
                scrutinee, arms, ..
            } => {
                let scrutinee = self.mirror_boxed(*scrutinee)?;
                let arms = arms
                    .iter()
                    .map(|arm| self.lower_arm(*arm))
                    .collect::<LowerResult<Vec<_>>>()?;
                ExprKind::Match { scrutinee, arms }
            }

            rv_hir::Expr::For { .. } => return Err(unsupported_expr("for", span)),
            rv_hir::Expr::Closure { .. } => return Err(unsupported_expr("closure", span)),
            rv_hir::Expr::Cast { .. } => return Err(unsupported_expr("cast", span)),
            rv_hir::Expr::Let { .. } => return Err(unsupported_expr("let", span)),
        };

        trace!(expr = ?hir_id, "lowered");
        Ok(PendingExpr::new(kind, ty, span).finish(temp_lifetime))
    }

    fn lower_unary(&mut self, op: UnaryOp, operand: rv_hir::ExprId) -> LowerResult<ExprKind> {
        let kind = match op {
            UnaryOp::Neg => {
                // `-1` is a single negative literal
                if let rv_hir::Expr::Literal { kind, .. } = &self.body.exprs[operand] {
                    ExprKind::Literal {
                        lit: kind.clone(),
                        neg: true,
                    }
                } else {
                    ExprKind::Unary {
                        op: UnOp::Neg,
                        arg: self.mirror_boxed(operand)?,
                    }
                }
            }
            UnaryOp::Not => ExprKind::Unary {
                op: UnOp::Not,
                arg: self.mirror_boxed(operand)?,
            },
            UnaryOp::Deref => ExprKind::Deref {
                arg: self.mirror_boxed(operand)?,
            },
            UnaryOp::Ref => ExprKind::Borrow {
                borrow_kind: BorrowKind::Shared,
                arg: self.mirror_boxed(operand)?,
            },
            UnaryOp::RefMut => ExprKind::Borrow {
                borrow_kind: BorrowKind::Mut,
                arg: self.mirror_boxed(operand)?,
            },
        };
        Ok(kind)
    }

    fn lower_call(
        &mut self,
        ty: TyId,
        span: FileSpan,
        callee: rv_hir::ExprId,
        args: &[rv_hir::ExprId],
    ) -> LowerResult<ExprKind> {
        let args = self.mirror_exprs(args)?;

        if let Some((adt_def, variant_index)) = self.tuple_constructor(callee)? {
            if self.ty_ctx.types.kind(ty).adt_def() != Some(adt_def) {
                return Err(InternalError::ExpectedAdt { span }.into());
            }
            let fields = args
                .into_iter()
                .enumerate()
                .map(|(index, expr)| FieldExpr {
                    name: FieldIdx(index as u32),
                    expr,
                })
                .collect();
            return Ok(ExprKind::Adt(Box::new(AdtExpr {
                adt_def,
                variant_index,
                args: self.adt_args(ty),
                fields,
            })));
        }

        let fun = self.mirror_boxed(callee)?;
        Ok(ExprKind::Call {
            ty: fun.ty,
            fun,
            args,
            from_hir_call: true,
        })
    }

    /// The struct or variant a callee path constructs, if it has tuple fields.
    fn tuple_constructor(
        &self,
        callee: rv_hir::ExprId,
    ) -> LowerResult<Option<(rv_hir::TypeDefId, VariantIdx)>> {
        if !matches!(self.body.exprs[callee], rv_hir::Expr::Path { .. }) {
            return Ok(None);
        }
        let span = self.span_of(callee);
        let (adt_def, variant_index, adt) = match self.expr_resolution(callee) {
            Some(DefId::Adt(adt_def)) => {
                let adt = self.adt(adt_def, span)?;
                if adt.is_enum() {
                    return Ok(None);
                }
                (adt_def, VariantIdx::FIRST, adt)
            }
            Some(DefId::Variant(variant)) => {
                (variant.adt, variant.index, self.adt(variant.adt, span)?)
            }
            _ => return Ok(None),
        };
        let fields = adt
            .variant_fields(variant_index)
            .ok_or(InternalError::UnresolvedVariant { span })?;
        Ok(fields.is_tuple().then_some((adt_def, variant_index)))
    }

    fn lower_field(
        &mut self,
        hir_id: rv_hir::ExprId,
        base: rv_hir::ExprId,
        field: FieldName,
    ) -> LowerResult<ExprKind> {
        let lhs = self.mirror_boxed(base)?;
        let span = self.span_of(hir_id);

        let (variant_index, name) = match field {
            FieldName::Index(index) => (VariantIdx::FIRST, FieldIdx(index)),
            FieldName::Named(_) => match self.expr_resolution(hir_id) {
                Some(DefId::Field(field)) => {
                    let fields = self
                        .items
                        .variant_fields(field.parent)
                        .ok_or(InternalError::UnknownField { span })?;
                    if field.index.0 as usize >= fields.len() {
                        return Err(InternalError::UnknownField { span }.into());
                    }
                    (field.parent.index, field.index)
                }
                Some(_) | None => return Err(InternalError::UnknownField { span }.into()),
            },
        };

        Ok(ExprKind::Field {
            lhs,
            variant_index,
            name,
        })
    }

    /// `while cond { body }` becomes
    /// `loop { if Use(cond) { body } else { break } }`.
    ///
    /// Every synthesized node has its own scope, nested the way the scopes
    /// of the written-out loop would be. `Use` keeps the condition's own
    /// lifetime so its temporaries are dropped before the body runs.
    fn desugar_while(
        &mut self,
        while_expr: rv_hir::ExprId,
        span: FileSpan,
        condition: rv_hir::ExprId,
        block: BlockId,
    ) -> LowerResult<Expr> {
        let unit = self.ty_ctx.types.unit();
        let never = self.ty_ctx.types.never();
        let part = |part| HirNode::desugared(while_expr, part);

        let cond = self.mirror_expr(condition)?;
        let cond = cond.wrap(self.ty_ctx.types.bool(), |source| ExprKind::Use { source });
        let then = self.lower_block(block, unit)?;
        let then = self.desugared_block_expr(part(DesugarPart::Then), then, unit)?;

        let exit_temp = self.temporary_scope(part(DesugarPart::Exit))?;
        let exit = PendingExpr::new(
            ExprKind::Break {
                label: Scope::node(while_expr),
                value: None,
            },
            never,
            span,
        )
        .finish(exit_temp)
        .wrap(unit, |source| ExprKind::NeverToAny { source });
        let exit = self.wrap_region_scopes(part(DesugarPart::Exit), exit, exit_temp, span);
        let else_block = Block {
            region_scope: Scope::node(part(DesugarPart::ElseBlock)),
            opt_destruction_scope: self.scopes.destruction_scope(part(DesugarPart::ElseBlock)),
            span,
            stmts: vec![Stmt {
                kind: StmtKind::Expr {
                    scope: Scope::node(part(DesugarPart::ExitStmt)),
                    expr: Box::new(exit),
                },
                opt_destruction_scope: self.scopes.destruction_scope(part(DesugarPart::ExitStmt)),
            }],
            expr: None,
            safety_mode: BlockSafety::Safe,
        };
        let else_expr = self.desugared_block_expr(part(DesugarPart::Else), else_block, unit)?;

        let if_node = part(DesugarPart::If);
        let if_temp = self.temporary_scope(if_node)?;
        let if_expr = PendingExpr::new(
            ExprKind::If {
                if_then_scope: Scope::if_then(if_node),
                cond: Box::new(cond),
                then: Box::new(then),
                else_opt: Some(Box::new(else_expr)),
            },
            unit,
            span,
        )
        .finish(if_temp);
        let if_expr = self.wrap_region_scopes(if_node, if_expr, if_temp, span);

        let loop_body = part(DesugarPart::LoopBody);
        let loop_block = Block {
            region_scope: Scope::node(loop_body),
            opt_destruction_scope: self.scopes.destruction_scope(loop_body),
            span,
            stmts: Vec::new(),
            expr: Some(Box::new(if_expr)),
            safety_mode: BlockSafety::Safe,
        };
        Ok(PendingExpr::new(
            ExprKind::Block {
                block: Box::new(loop_block),
            },
            unit,
            span,
        )
        .finish(self.temporary_scope(loop_body)?))
    }

    /// Block expression synthesized as `node`, with its scope wrappers.
    fn desugared_block_expr(&self, node: HirNode, block: Block, ty: TyId) -> LowerResult<Expr> {
        let temp_lifetime = self.temporary_scope(node)?;
        let span = block.span;
        let expr = PendingExpr::new(
            ExprKind::Block {
                block: Box::new(block),
            },
            ty,
            span,
        )
        .finish(temp_lifetime);
        Ok(self.wrap_region_scopes(node, expr, temp_lifetime, span))
    }

    /// Loop targeted by a `break` or `continue`.
    fn jump_target(
        &self,
        label: Option<Label>,
        jump: rv_hir::ExprId,
    ) -> LowerResult<rv_hir::ExprId> {
        let body = self.body;
        let target = match label {
            None => self.loop_stack.last().copied(),
            Some(label) => body
                .resolution
                .label_targets
                .get(&jump)
                .copied()
                .or_else(|| {
                    self.loop_stack.iter().rev().copied().find(|candidate| {
                        body.exprs[*candidate]
                            .loop_label()
                            .is_some_and(|loop_label| loop_label.name == label.name)
                    })
                }),
        };
        target.ok_or_else(|| {
            InternalError::MissingLoopTarget {
                span: self.span_of(jump),
            }
            .into()
        })
    }

    fn lower_range(
        &mut self,
        ty: TyId,
        span: FileSpan,
        temp_lifetime: Option<Scope>,
        start: Option<rv_hir::ExprId>,
        end: Option<rv_hir::ExprId>,
        inclusive: bool,
    ) -> LowerResult<ExprKind> {
        match (start, end, inclusive) {
            (Some(start), Some(end), true) => {
                let item = KnownItem::RangeInclusiveNew;
                let DefId::Function(function) = self.known_item(item)? else {
                    return Err(InternalError::KnownItemKind { item }.into());
                };
                let args = vec![self.mirror_expr(start)?, self.mirror_expr(end)?];
                let fn_ty = self.ty_ctx.types.intern(TyKind::FnDef {
                    def: function,
                    args: vec![args[0].ty],
                });
                let fun = PendingExpr::new(ExprKind::ZstLiteral, fn_ty, span).finish(temp_lifetime);
                Ok(ExprKind::Call {
                    ty: fn_ty,
                    fun: Box::new(fun),
                    args,
                    from_hir_call: false,
                })
            }
            (Some(start), Some(end), false) => self.range_adt(KnownItem::Range, ty, &[start, end]),
            (Some(start), None, false) => self.range_adt(KnownItem::RangeFrom, ty, &[start]),
            (None, Some(end), false) => self.range_adt(KnownItem::RangeTo, ty, &[end]),
            (None, None, false) => self.range_adt(KnownItem::RangeFull, ty, &[]),
            (None, Some(end), true) => self.range_adt(KnownItem::RangeToInclusive, ty, &[end]),
            (_, None, true) => Err(InternalError::MalformedRange { span }.into()),
        }
    }

    /// Range struct literal with the bounds as positional fields.
    fn range_adt(
        &mut self,
        item: KnownItem,
        ty: TyId,
        bounds: &[rv_hir::ExprId],
    ) -> LowerResult<ExprKind> {
        let DefId::Adt(adt_def) = self.known_item(item)? else {
            return Err(InternalError::KnownItemKind { item }.into());
        };
        let mut fields = Vec::with_capacity(bounds.len());
        for (index, bound) in bounds.iter().enumerate() {
            fields.push(FieldExpr {
                name: FieldIdx(index as u32),
                expr: self.mirror_expr(*bound)?,
            });
        }
        Ok(ExprKind::Adt(Box::new(AdtExpr {
            adt_def,
            variant_index: VariantIdx::FIRST,
            args: self.adt_args(ty),
            fields,
        })))
    }

    fn lower_struct_literal(
        &mut self,
        hir_id: rv_hir::ExprId,
        ty: TyId,
        fields: &[FieldInit],
        base: Option<rv_hir::ExprId>,
    ) -> LowerResult<ExprKind> {
        let span = self.span_of(hir_id);
        let Some(adt_def) = self.ty_ctx.types.kind(ty).adt_def() else {
            return Err(InternalError::ExpectedAdt { span }.into());
        };
        if let Some(base) = base {
            return Err(Unsupported::StructUpdate {
                span: self.span_of(base),
            }
            .into());
        }

        let adt = self.adt(adt_def, span)?;
        let variant_index = if adt.is_enum() {
            match self.expr_resolution(hir_id) {
                Some(DefId::Variant(variant)) if variant.adt == adt_def => variant.index,
                _ => return Err(InternalError::UnresolvedVariant { span }.into()),
            }
        } else {
            VariantIdx::FIRST
        };
        let variant = adt
            .variant_fields(variant_index)
            .ok_or(InternalError::UnresolvedVariant { span })?;

        let mut lowered = Vec::with_capacity(fields.len());
        for field in fields {
            let name = variant
                .field_index(field.name)
                .ok_or(InternalError::UnknownField { span: field.span })?;
            let expr = if field.shorthand {
                self.mirror_shorthand(field)?
            } else {
                self.mirror_expr(field.value)?
            };
            lowered.push(FieldExpr { name, expr });
        }
        // Lowered in source order, stored in declaration order
        lowered.sort_by_key(|field| field.name);

        Ok(ExprKind::Adt(Box::new(AdtExpr {
            adt_def,
            variant_index,
            args: self.adt_args(ty),
            fields: lowered,
        })))
    }

    fn lower_arm(&mut self, arm: ArmId) -> LowerResult<Arm> {
        let body = self.body;
        let data = &body.arms[arm];
        let pattern = self.lower_pattern(data.pattern)?;
        if let Some(guard) = data.guard {
            return Err(Unsupported::MatchGuard {
                span: self.span_of(guard),
            }
            .into());
        }
        Ok(Arm {
            pattern: Box::new(pattern),
            guard: None,
            body: self.mirror_boxed(data.body)?,
            scope: Scope::node(arm),
            span: data.span,
        })
    }
}

fn unsupported_expr(kind: &'static str, span: FileSpan) -> crate::LowerError {
    Unsupported::Expression { kind, span }.into()
}
