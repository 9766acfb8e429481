//! Integration test utilities for THIR construction
//!
//! [`TestFixture`] assembles a HIR body together with the tables an
//! earlier pipeline would compute for it (types, adjustments, name
//! resolution, items) and runs scope resolution and lowering over it.

use anyhow::Result;
use rv_hir::{
    ArmId, BlockId, Body, BodyOwner, DefId, Expr, ExprId, FieldDef, Function, FunctionId,
    ItemTree, KnownItem, KnownItems, LiteralKind, LocalId, MatchArm, Path, Pattern, PatternId,
    Stmt, StmtId, StructDef, TypeDefId, VariantDef, VariantFields,
};
use rv_intern::{Interner, Symbol};
use rv_region::{RegionScopes, resolve_body_scopes};
use rv_span::{FileId, FileSpan, Span};
use rv_thir::ThirBody;
use rv_thir_build::{LowerConfig, LowerResult, LoweringContext};
use rv_ty::{Adjust, Adjustment, IntTy, TyContext, TyId, TyKind};

/// Test fixture helper
pub struct TestFixture {
    /// Interner for every name in the fixture
    pub interner: Interner,
    /// Body under construction
    pub body: Body,
    /// Items the body refers to
    pub items: ItemTree,
    /// Types and adjustments
    pub ty_ctx: TyContext,
    /// Registered library items
    pub known_items: KnownItems,
    next_offset: u32,
    next_local: u32,
    next_adt: u32,
    next_function: u32,
}

impl TestFixture {
    /// Creates a fixture with an empty function body
    #[must_use]
    pub fn new() -> Self {
        Self {
            interner: Interner::new(),
            body: Body::new(BodyOwner::Function(FunctionId(0))),
            items: ItemTree::new(),
            ty_ctx: TyContext::new(),
            known_items: KnownItems::new(),
            next_offset: 0,
            next_local: 0,
            next_adt: 0,
            // fn#0 owns the body
            next_function: 1,
        }
    }

    /// Fresh one-byte span; every node gets its own.
    pub fn span(&mut self) -> FileSpan {
        let start = self.next_offset;
        self.next_offset += 1;
        FileSpan::new(FileId(0), Span::new(start, start + 1))
    }

    /// Interns a name
    pub fn sym(&self, text: &str) -> Symbol {
        self.interner.intern(text)
    }

    /// Interns a type
    pub fn ty(&mut self, kind: TyKind) -> TyId {
        self.ty_ctx.types.intern(kind)
    }

    /// `i32`
    pub fn i32(&mut self) -> TyId {
        self.ty(TyKind::Int(IntTy::I32))
    }

    /// `()`
    #[must_use]
    pub fn unit(&self) -> TyId {
        self.ty_ctx.types.unit()
    }

    /// `bool`
    #[must_use]
    pub fn bool(&self) -> TyId {
        self.ty_ctx.types.bool()
    }

    /// `!`
    #[must_use]
    pub fn never(&self) -> TyId {
        self.ty_ctx.types.never()
    }

    /// Struct or enum type with generic arguments
    pub fn adt_ty(&mut self, def: TypeDefId, args: Vec<TyId>) -> TyId {
        self.ty(TyKind::Adt { def, args })
    }

    /// Allocates an expression of type `ty`
    pub fn expr(&mut self, ty: TyId, build: impl FnOnce(FileSpan) -> Expr) -> ExprId {
        let span = self.span();
        let expr = self.body.exprs.alloc(build(span));
        self.ty_ctx.record_expr_type(expr, ty);
        expr
    }

    /// Integer literal typed `i32`
    pub fn int(&mut self, value: u128) -> ExprId {
        let ty = self.i32();
        self.expr(ty, |span| Expr::Literal {
            kind: LiteralKind::Integer(value),
            span,
        })
    }

    /// Boolean literal
    pub fn bool_lit(&mut self, value: bool) -> ExprId {
        let ty = self.bool();
        self.expr(ty, |span| Expr::Literal {
            kind: LiteralKind::Bool(value),
            span,
        })
    }

    /// `()`
    pub fn unit_expr(&mut self) -> ExprId {
        let ty = self.unit();
        self.expr(ty, |span| Expr::Tuple {
            elements: Vec::new(),
            span,
        })
    }

    /// Single-segment path resolving to `def`
    pub fn path(&mut self, name: &str, def: DefId, ty: TyId) -> ExprId {
        let path = Path::ident(self.sym(name));
        let expr = self.expr(ty, |span| Expr::Path { path, span });
        self.body.resolution.expr_resolutions.insert(expr, def);
        expr
    }

    /// Reference to a local binding
    pub fn var(&mut self, name: &str, local: LocalId, ty: TyId) -> ExprId {
        self.path(name, DefId::Local(local), ty)
    }

    /// Allocates a pattern matching values of type `ty`
    pub fn pattern(&mut self, ty: TyId, build: impl FnOnce(FileSpan) -> Pattern) -> PatternId {
        let span = self.span();
        let pat = self.body.patterns.alloc(build(span));
        self.ty_ctx.record_pat_type(pat, ty);
        pat
    }

    /// `name` binding with a fresh local
    pub fn binding(&mut self, name: &str, ty: TyId) -> (PatternId, LocalId) {
        let name = self.sym(name);
        let pat = self.pattern(ty, |span| Pattern::Binding {
            name,
            by_ref: None,
            mutable: false,
            sub_pattern: None,
            span,
        });
        let local = LocalId(self.next_local);
        self.next_local += 1;
        self.body.resolution.pattern_locals.insert(pat, local);
        (pat, local)
    }

    /// `_`
    pub fn wildcard(&mut self, ty: TyId) -> PatternId {
        self.pattern(ty, |span| Pattern::Wildcard { span })
    }

    /// Allocates a statement
    pub fn stmt(&mut self, build: impl FnOnce(FileSpan) -> Stmt) -> StmtId {
        let span = self.span();
        self.body.stmts.alloc(build(span))
    }

    /// `expr;`
    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.stmt(|span| Stmt::Expr {
            expr,
            has_semicolon: true,
            span,
        })
    }

    /// `let pattern = initializer;`
    pub fn let_stmt(&mut self, pattern: PatternId, initializer: Option<ExprId>) -> StmtId {
        self.stmt(|span| Stmt::Let {
            pattern,
            initializer,
            else_branch: None,
            span,
        })
    }

    /// `{ statements; tail }`
    pub fn block(&mut self, statements: Vec<StmtId>, tail: Option<ExprId>) -> BlockId {
        let span = self.span();
        self.body.blocks.alloc(rv_hir::Block {
            statements,
            tail,
            is_unsafe: false,
            span,
        })
    }

    /// Block expression of type `ty`
    pub fn block_expr(&mut self, statements: Vec<StmtId>, tail: Option<ExprId>, ty: TyId) -> ExprId {
        let block = self.block(statements, tail);
        self.expr(ty, |span| Expr::Block { block, span })
    }

    /// Match arm without a guard
    pub fn arm(&mut self, pattern: PatternId, body: ExprId) -> ArmId {
        let span = self.span();
        self.body.arms.alloc(MatchArm {
            pattern,
            guard: None,
            body,
            span,
        })
    }

    /// Records an adjustment for `expr`
    pub fn adjust(&mut self, expr: ExprId, kind: Adjust, target: TyId) {
        self.ty_ctx
            .push_adjustment(expr, Adjustment { kind, target });
    }

    /// Makes `expr` the body's root expression
    pub fn set_root(&mut self, expr: ExprId) {
        self.body.root_expr = expr;
    }

    /// Appends a parameter pattern
    pub fn add_param(&mut self, pattern: PatternId) {
        self.body.params.push(pattern);
    }

    /// Named fields, in declaration order
    #[must_use]
    pub fn named_fields(&self, names: &[&str]) -> VariantFields {
        VariantFields::Struct(
            names
                .iter()
                .map(|name| FieldDef {
                    name: self.sym(name),
                    span: FileSpan::dummy(),
                })
                .collect(),
        )
    }

    /// Declares a struct
    pub fn struct_def(&mut self, name: &str, fields: VariantFields) -> TypeDefId {
        let id = self.next_adt_id();
        let name = self.sym(name);
        self.items.structs.insert(
            id,
            StructDef {
                id,
                name,
                generic_params: Vec::new(),
                fields,
                span: FileSpan::dummy(),
            },
        );
        id
    }

    /// Declares an enum; variants are indexed in the given order
    pub fn enum_def(&mut self, name: &str, variants: Vec<(&str, VariantFields)>) -> TypeDefId {
        let id = self.next_adt_id();
        let variants = variants
            .into_iter()
            .map(|(variant, fields)| VariantDef {
                name: self.sym(variant),
                fields,
                span: FileSpan::dummy(),
            })
            .collect();
        let name = self.sym(name);
        self.items.enums.insert(
            id,
            rv_hir::EnumDef {
                id,
                name,
                generic_params: Vec::new(),
                variants,
                span: FileSpan::dummy(),
            },
        );
        id
    }

    /// Declares a function
    pub fn function(&mut self, name: &str) -> FunctionId {
        let id = FunctionId(self.next_function);
        self.next_function += 1;
        let name = self.sym(name);
        self.items.functions.insert(
            id,
            Function {
                id,
                name,
                generic_params: Vec::new(),
                span: FileSpan::dummy(),
            },
        );
        id
    }

    /// Declares the range structs and the inclusive range constructor and
    /// registers them as known items.
    pub fn register_range_items(&mut self) {
        let ranges = [
            (KnownItem::Range, "Range", &["start", "end"][..]),
            (KnownItem::RangeFrom, "RangeFrom", &["start"][..]),
            (KnownItem::RangeTo, "RangeTo", &["end"][..]),
            (KnownItem::RangeToInclusive, "RangeToInclusive", &["end"][..]),
        ];
        for (item, name, fields) in ranges {
            let fields = self.named_fields(fields);
            let def = self.struct_def(name, fields);
            self.known_items.register(item, DefId::Adt(def));
        }
        let full = self.struct_def("RangeFull", VariantFields::Unit);
        self.known_items
            .register(KnownItem::RangeFull, DefId::Adt(full));
        let new = self.function("new");
        self.known_items
            .register(KnownItem::RangeInclusiveNew, DefId::Function(new));
    }

    /// Scope tree of the current body
    #[must_use]
    pub fn scopes(&self) -> RegionScopes {
        resolve_body_scopes(&self.body)
    }

    /// Lowers the whole body
    ///
    /// # Errors
    ///
    /// Returns the lowering error unchanged
    pub fn lower(&mut self) -> LowerResult<ThirBody> {
        let scopes = self.scopes();
        LoweringContext::new(
            &self.body,
            &self.items,
            &mut self.ty_ctx,
            &scopes,
            &self.known_items,
        )
        .thir_body()
    }

    /// Lowers one expression of the body
    ///
    /// # Errors
    ///
    /// Returns the lowering error unchanged
    pub fn lower_expr(&mut self, expr: ExprId) -> LowerResult<rv_thir::Expr> {
        let scopes = self.scopes();
        LoweringContext::new(
            &self.body,
            &self.items,
            &mut self.ty_ctx,
            &scopes,
            &self.known_items,
        )
        .mirror_expr(expr)
    }

    /// Lowers the whole body with a configuration given as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not parse or lowering fails
    pub fn lower_with_config(&mut self, config: &str) -> Result<ThirBody> {
        let config = LowerConfig::from_toml_str(config)?;
        let scopes = self.scopes();
        let thir = LoweringContext::new(
            &self.body,
            &self.items,
            &mut self.ty_ctx,
            &scopes,
            &self.known_items,
        )
        .with_config(config)
        .thir_body()?;
        Ok(thir)
    }

    /// Renders a lowered body
    #[must_use]
    pub fn render(&self, thir: &ThirBody) -> String {
        rv_thir::pretty::body_to_string(thir, &self.ty_ctx.types, &self.interner)
    }

    /// Renders a lowered expression
    #[must_use]
    pub fn render_expr(&self, expr: &rv_thir::Expr) -> String {
        rv_thir::pretty::expr_to_string(expr, &self.ty_ctx.types, &self.interner)
    }

    fn next_adt_id(&mut self) -> TypeDefId {
        let id = TypeDefId(self.next_adt);
        self.next_adt += 1;
        id
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
