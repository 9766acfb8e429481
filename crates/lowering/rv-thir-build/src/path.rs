//! Path expressions: locals, functions and unit constructors.

use rv_hir::{AdtRef, DefId, ExprId, FieldInit, ItemTree, TypeDefId, VariantFields, VariantIdx};
use rv_span::FileSpan;
use rv_thir::{AdtExpr, Expr, ExprKind};
use rv_ty::TyId;

use crate::{InternalError, LowerResult, LoweringContext, Unsupported};

impl<'ctx> LoweringContext<'ctx> {
    pub(crate) fn convert_path_expr(&self, hir_id: ExprId, ty: TyId) -> LowerResult<ExprKind> {
        let span = self.span_of(hir_id);
        let def = self
            .expr_resolution(hir_id)
            .ok_or(InternalError::UnresolvedPath { span })?;
        self.convert_def(def, ty, span)
    }

    /// Lowers the value of a shorthand field `Foo { name }`, which must
    /// refer to a local binding.
    pub(crate) fn mirror_shorthand(&mut self, field: &FieldInit) -> LowerResult<Expr> {
        match self.expr_resolution(field.value) {
            Some(DefId::Local(_)) => self.mirror_expr(field.value),
            Some(_) => Err(InternalError::ShorthandNotLocal { span: field.span }.into()),
            None => Err(InternalError::UnresolvedPath { span: field.span }.into()),
        }
    }

    fn convert_def(&self, def: DefId, ty: TyId, span: FileSpan) -> LowerResult<ExprKind> {
        match def {
            DefId::Local(id) => Ok(ExprKind::VarRef { id }),
            DefId::Function(_) => Ok(ExprKind::ZstLiteral),
            DefId::Adt(adt_def) => {
                let adt = self.adt(adt_def, span)?;
                if adt.is_enum() {
                    return Err(Unsupported::PathTarget {
                        what: "enum types",
                        span,
                    }
                    .into());
                }
                self.convert_ctor(adt_def, VariantIdx::FIRST, adt, ty, span)
            }
            DefId::Variant(variant) => {
                let adt = self.adt(variant.adt, span)?;
                self.convert_ctor(variant.adt, variant.index, adt, ty, span)
            }
            DefId::Const(_) => Err(Unsupported::PathTarget {
                what: "constants",
                span,
            }
            .into()),
            DefId::Field(_) => Err(Unsupported::PathTarget {
                what: "fields",
                span,
            }
            .into()),
        }
    }

    /// A unit struct or variant is a field-less ADT value; a tuple one names
    /// its constructor function.
    fn convert_ctor(
        &self,
        adt_def: TypeDefId,
        variant_index: VariantIdx,
        adt: AdtRef<'_>,
        ty: TyId,
        span: FileSpan,
    ) -> LowerResult<ExprKind> {
        let fields = adt
            .variant_fields(variant_index)
            .ok_or(InternalError::UnresolvedVariant { span })?;
        match fields {
            VariantFields::Unit => Ok(ExprKind::Adt(Box::new(AdtExpr {
                adt_def,
                variant_index,
                args: self.adt_args(ty),
                fields: Vec::new(),
            }))),
            VariantFields::Tuple(_) => Ok(ExprKind::ZstLiteral),
            VariantFields::Struct(_) => Err(Unsupported::PathTarget {
                what: "structs with named fields",
                span,
            }
            .into()),
        }
    }

    /// Struct or enum definition, outliving the borrow of `self`.
    pub(crate) fn adt(&self, adt_def: TypeDefId, span: FileSpan) -> LowerResult<AdtRef<'ctx>> {
        let items: &'ctx ItemTree = self.items;
        items
            .adt(adt_def)
            .ok_or_else(|| InternalError::UnknownItem { span }.into())
    }
}
