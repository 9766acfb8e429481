//! Lowering context and table lookups shared by every lowering step.

use rv_hir::{Body, DefId, ExprId, ItemTree, KnownItem, KnownItems, PatternId};
use rv_region::{HirNode, RegionScopes, Scope};
use rv_span::FileSpan;
use rv_thir::{Param, ThirBody};
use rv_ty::{TyContext, TyId, TyKind};
use tracing::{debug, instrument};

use crate::{InternalError, LowerConfig, LowerResult};

/// Context for lowering HIR to THIR
pub struct LoweringContext<'ctx> {
    /// Body being lowered
    pub(crate) body: &'ctx Body,
    /// Struct, enum and function definitions
    pub(crate) items: &'ctx ItemTree,
    /// Type-check results (mutable for interning synthesized types)
    pub(crate) ty_ctx: &'ctx mut TyContext,
    /// Scope tree and temporary lifetimes of the body
    pub(crate) scopes: &'ctx RegionScopes,
    /// Library items used by desugarings
    pub(crate) known_items: &'ctx KnownItems,
    pub(crate) config: LowerConfig,
    /// Loops enclosing the expression being lowered, innermost last
    pub(crate) loop_stack: Vec<ExprId>,
    /// Current expression nesting depth
    pub(crate) depth: usize,
}

impl<'ctx> LoweringContext<'ctx> {
    /// Create a new lowering context with the default configuration
    pub fn new(
        body: &'ctx Body,
        items: &'ctx ItemTree,
        ty_ctx: &'ctx mut TyContext,
        scopes: &'ctx RegionScopes,
        known_items: &'ctx KnownItems,
    ) -> Self {
        Self {
            body,
            items,
            ty_ctx,
            scopes,
            known_items,
            config: LowerConfig::default(),
            loop_stack: Vec::new(),
            depth: 0,
        }
    }

    /// Replaces the configuration
    #[must_use]
    pub fn with_config(mut self, config: LowerConfig) -> Self {
        self.config = config;
        self
    }

    /// Lowers the whole body: parameter patterns, then the root expression
    ///
    /// # Errors
    ///
    /// Fails on the first internal inconsistency or unsupported construct.
    #[instrument(level = "debug", skip(self), fields(owner = ?self.body.owner))]
    pub fn thir_body(&mut self) -> LowerResult<ThirBody> {
        let body = self.body;
        debug!(params = body.params.len(), "lowering body");

        let mut params = Vec::with_capacity(body.params.len());
        for pat in &body.params {
            let pat = self.lower_pattern(*pat)?;
            params.push(Param {
                ty: pat.ty,
                pat: Box::new(pat),
            });
        }
        let value = self.mirror_expr(body.root_expr)?;
        Ok(ThirBody { params, value })
    }

    /// Type of an expression before adjustments.
    pub(crate) fn expr_ty(&self, expr: ExprId) -> LowerResult<TyId> {
        self.ty_ctx.get_expr_type(expr).ok_or_else(|| {
            InternalError::MissingExprType {
                span: self.body.expr_span(expr),
            }
            .into()
        })
    }

    /// Type of a pattern.
    pub(crate) fn pat_ty(&self, pat: PatternId) -> LowerResult<TyId> {
        self.ty_ctx.get_pat_type(pat).ok_or_else(|| {
            InternalError::MissingPatType {
                span: self.body.patterns[pat].span(),
            }
            .into()
        })
    }

    /// Temporary lifetime of `node`; a node missing from the scope tree is fatal.
    pub(crate) fn temporary_scope(&self, node: HirNode) -> LowerResult<Option<Scope>> {
        Ok(self.scopes.temporary_scope(node)?)
    }

    /// Generic arguments of an ADT type, empty for any other type.
    pub(crate) fn adt_args(&self, ty: TyId) -> Vec<TyId> {
        match self.ty_ctx.types.kind(ty) {
            TyKind::Adt { args, .. } => args.clone(),
            _ => Vec::new(),
        }
    }

    /// Registered definition of a known item.
    pub(crate) fn known_item(&self, item: KnownItem) -> LowerResult<DefId> {
        self.known_items
            .get(item)
            .ok_or_else(|| InternalError::MissingKnownItem { item }.into())
    }

    /// Resolution of a path-like expression.
    pub(crate) fn expr_resolution(&self, expr: ExprId) -> Option<DefId> {
        self.body.resolution.expr_resolutions.get(&expr).copied()
    }

    /// Span of an expression.
    pub(crate) fn span_of(&self, expr: ExprId) -> FileSpan {
        self.body.expr_span(expr)
    }
}
