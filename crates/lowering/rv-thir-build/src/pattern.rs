//! Pattern lowering.

use rv_hir::{
    AdtRef, DefId, FieldIdx, Mutability, Pattern, PatternBound, PatternId, TypeDefId, VariantIdx,
};
use rv_span::FileSpan;
use rv_thir::{
    BindingMode, Constant, FieldPat, Pat, PatKind, PatRange, PatRangeBoundary, RangeEnd,
};
use rv_ty::{ArrayLen, TyId, TyKind};
use tracing::trace;

use crate::{InternalError, LowerError, LowerResult, LoweringContext, Unsupported};

impl<'ctx> LoweringContext<'ctx> {
    /// Lowers a `let`, parameter or match arm pattern.
    ///
    /// # Errors
    ///
    /// Fails when the pattern disagrees with its recorded type or
    /// resolution, or when a binding has no local.
    pub fn lower_pattern(&mut self, pat: PatternId) -> LowerResult<Pat> {
        let body = self.body;
        let ty = self.pat_ty(pat)?;
        let span = body.patterns[pat].span();

        let kind = match &body.patterns[pat] {
            Pattern::Wildcard { .. } => PatKind::Wild,

            Pattern::Binding {
                name,
                by_ref,
                mutable,
                sub_pattern,
                ..
            } => {
                // A lone identifier may name a unit struct or variant
                if body.resolution.pattern_resolutions.contains_key(&pat) {
                    self.lower_path_pattern(pat, ty, span)?
                } else {
                    let var = body
                        .resolution
                        .pattern_locals
                        .get(&pat)
                        .copied()
                        .ok_or(InternalError::UnboundPattern { span })?;
                    let (mode, var_ty) = match by_ref {
                        Some(mutability) => (
                            BindingMode::ByRef(*mutability),
                            self.ty_ctx.types.reference(*mutability, ty),
                        ),
                        None => (BindingMode::ByValue, ty),
                    };
                    let subpattern = sub_pattern
                        .map(|sub| self.lower_pattern(sub).map(Box::new))
                        .transpose()?;
                    PatKind::Binding {
                        mutability: if *mutable {
                            Mutability::Mut
                        } else {
                            Mutability::Not
                        },
                        name: *name,
                        mode,
                        var,
                        ty: var_ty,
                        subpattern,
                    }
                }
            }

            Pattern::Literal { kind, negated, .. } => PatKind::Constant {
                value: Constant {
                    lit: kind.clone(),
                    neg: *negated,
                },
            },

            Pattern::Range {
                start,
                end,
                inclusive,
                ..
            } => lower_range_pattern(start.as_ref(), end.as_ref(), *inclusive, span)?,

            Pattern::Tuple { patterns, .. } => {
                let TyKind::Tuple(elements) = self.ty_ctx.types.kind(ty) else {
                    return Err(malformed(span, "tuple pattern on a non-tuple type"));
                };
                let arity = elements.len();
                PatKind::Leaf {
                    subpatterns: self.lower_tuple_subpatterns(patterns, arity, span)?,
                }
            }

            Pattern::TupleStruct { patterns, .. } => {
                let (adt_def, variant_index, adt) = self.pattern_variant(pat, span)?;
                let fields = adt
                    .variant_fields(variant_index)
                    .ok_or(InternalError::UnresolvedVariant { span })?;
                if !fields.is_tuple() {
                    return Err(malformed(span, "tuple struct pattern on a non-tuple variant"));
                }
                let subpatterns = self.lower_tuple_subpatterns(patterns, fields.len(), span)?;
                self.variant_or_leaf(adt_def, variant_index, adt, ty, subpatterns)
            }

            Pattern::Struct { fields, .. } => {
                let (adt_def, variant_index, adt) = self.pattern_variant(pat, span)?;
                let variant = adt
                    .variant_fields(variant_index)
                    .ok_or(InternalError::UnresolvedVariant { span })?;
                let mut subpatterns = Vec::with_capacity(fields.len());
                for field in fields {
                    let index = variant
                        .field_index(field.name)
                        .ok_or(InternalError::UnknownField { span: field.span })?;
                    subpatterns.push(FieldPat {
                        field: index,
                        pattern: self.lower_pattern(field.pattern)?,
                    });
                }
                self.variant_or_leaf(adt_def, variant_index, adt, ty, subpatterns)
            }

            Pattern::Path { .. } => self.lower_path_pattern(pat, ty, span)?,

            Pattern::Or { patterns, .. } => PatKind::Or {
                pats: patterns
                    .iter()
                    .map(|alt| self.lower_pattern(*alt))
                    .collect::<LowerResult<_>>()?,
            },

            Pattern::Ref { inner, .. } => PatKind::Deref {
                subpattern: Box::new(self.lower_pattern(*inner)?),
            },

            Pattern::Slice { patterns, .. } => self.lower_slice_pattern(patterns, ty, span)?,

            Pattern::Rest { .. } => {
                return Err(malformed(span, "`..` outside a tuple or slice pattern"));
            }
        };

        trace!(pattern = ?pat, "lowered pattern");
        Ok(Pat { ty, span, kind })
    }

    /// Struct or variant named by the path of a tuple struct or struct pattern.
    fn pattern_variant(
        &self,
        pat: PatternId,
        span: FileSpan,
    ) -> LowerResult<(TypeDefId, VariantIdx, AdtRef<'ctx>)> {
        match self.body.resolution.pattern_resolutions.get(&pat) {
            Some(DefId::Adt(adt_def)) => {
                let adt = self.adt(*adt_def, span)?;
                if adt.is_enum() {
                    return Err(InternalError::UnresolvedVariant { span }.into());
                }
                Ok((*adt_def, VariantIdx::FIRST, adt))
            }
            Some(DefId::Variant(variant)) => {
                Ok((variant.adt, variant.index, self.adt(variant.adt, span)?))
            }
            Some(_) => Err(malformed(span, "path does not name a struct or variant")),
            None => Err(InternalError::UnresolvedPath { span }.into()),
        }
    }

    /// Unit struct or unit variant named by a path or a lone identifier.
    fn lower_path_pattern(&self, pat: PatternId, ty: TyId, span: FileSpan) -> LowerResult<PatKind> {
        if let Some(DefId::Const(_)) = self.body.resolution.pattern_resolutions.get(&pat) {
            return Err(Unsupported::PathTarget {
                what: "constants",
                span,
            }
            .into());
        }
        let (adt_def, variant_index, adt) = self.pattern_variant(pat, span)?;
        let fields = adt
            .variant_fields(variant_index)
            .ok_or(InternalError::UnresolvedVariant { span })?;
        if !fields.is_unit() {
            return Err(malformed(span, "path pattern names a variant with fields"));
        }
        Ok(self.variant_or_leaf(adt_def, variant_index, adt, ty, Vec::new()))
    }

    fn variant_or_leaf(
        &self,
        adt_def: TypeDefId,
        variant_index: VariantIdx,
        adt: AdtRef<'_>,
        ty: TyId,
        subpatterns: Vec<FieldPat>,
    ) -> PatKind {
        if adt.is_enum() {
            PatKind::Variant {
                adt_def,
                args: self.adt_args(ty),
                variant_index,
                subpatterns,
            }
        } else {
            PatKind::Leaf { subpatterns }
        }
    }

    /// Positional sub-patterns, with `..` standing for the fields it skips.
    fn lower_tuple_subpatterns(
        &mut self,
        patterns: &[PatternId],
        arity: usize,
        span: FileSpan,
    ) -> LowerResult<Vec<FieldPat>> {
        let body = self.body;
        let rest = rest_position(body, patterns, span)?;
        let fields = tuple_field_indices(patterns.len(), rest, arity)
            .map_err(|reason| malformed(span, reason))?;

        let mut subpatterns = Vec::with_capacity(fields.len());
        for (pattern, field) in patterns
            .iter()
            .filter(|pattern| !body.patterns[**pattern].is_rest())
            .zip(fields)
        {
            subpatterns.push(FieldPat {
                field,
                pattern: self.lower_pattern(*pattern)?,
            });
        }
        Ok(subpatterns)
    }

    fn lower_slice_pattern(
        &mut self,
        patterns: &[PatternId],
        ty: TyId,
        span: FileSpan,
    ) -> LowerResult<PatKind> {
        let body = self.body;
        let array_len = match self.ty_ctx.types.kind(ty) {
            TyKind::Array { len, .. } => Some(*len),
            TyKind::Slice { .. } => None,
            _ => return Err(malformed(span, "slice pattern on a non-slice type")),
        };
        let rest = rest_position(body, patterns, span)?;
        let (before, after) = match rest {
            Some(pos) => (&patterns[..pos], &patterns[pos + 1..]),
            None => (patterns, &[][..]),
        };

        if let Some(ArrayLen::Known(len)) = array_len {
            let fixed = (before.len() + after.len()) as u64;
            if fixed > len || (rest.is_none() && fixed != len) {
                return Err(malformed(span, "array pattern has the wrong number of elements"));
            }
        }

        let prefix = self.lower_patterns(before)?;
        let slice = match rest {
            Some(pos) => {
                let rest_pat = patterns[pos];
                Some(Box::new(Pat {
                    ty: self.ty_ctx.get_pat_type(rest_pat).unwrap_or(ty),
                    span: body.patterns[rest_pat].span(),
                    kind: PatKind::Wild,
                }))
            }
            None => None,
        };
        let suffix = self.lower_patterns(after)?;

        Ok(if array_len.is_some() {
            PatKind::Array {
                prefix,
                slice,
                suffix,
            }
        } else {
            PatKind::Slice {
                prefix,
                slice,
                suffix,
            }
        })
    }

    fn lower_patterns(&mut self, patterns: &[PatternId]) -> LowerResult<Vec<Pat>> {
        patterns.iter().map(|pat| self.lower_pattern(*pat)).collect()
    }
}

fn malformed(span: FileSpan, reason: &'static str) -> LowerError {
    InternalError::MalformedPattern { span, reason }.into()
}

fn lower_range_pattern(
    start: Option<&PatternBound>,
    end: Option<&PatternBound>,
    inclusive: bool,
    span: FileSpan,
) -> LowerResult<PatKind> {
    if start.is_none() && end.is_none() {
        return Err(malformed(span, "range pattern without bounds"));
    }
    if inclusive && end.is_none() {
        return Err(malformed(span, "inclusive range pattern without an end"));
    }
    let finite = |bound: &PatternBound| {
        PatRangeBoundary::Finite(Constant {
            lit: bound.kind.clone(),
            neg: bound.negated,
        })
    };
    Ok(PatKind::Range(Box::new(PatRange {
        lo: start.map_or(PatRangeBoundary::NegInfinity, finite),
        hi: end.map_or(PatRangeBoundary::PosInfinity, finite),
        end: if inclusive {
            RangeEnd::Included
        } else {
            RangeEnd::Excluded
        },
    })))
}

/// Position of the single `..` among `patterns`.
fn rest_position(
    body: &rv_hir::Body,
    patterns: &[PatternId],
    span: FileSpan,
) -> LowerResult<Option<usize>> {
    let mut rests = patterns
        .iter()
        .enumerate()
        .filter(|(_, pat)| body.patterns[**pat].is_rest())
        .map(|(pos, _)| pos);
    let first = rests.next();
    if rests.next().is_some() {
        return Err(malformed(span, "more than one `..` in a pattern"));
    }
    Ok(first)
}

/// Field index of every non-rest sub-pattern of a positional pattern with
/// `len` entries (the `..` included) against a tuple of `arity` fields.
fn tuple_field_indices(
    len: usize,
    rest: Option<usize>,
    arity: usize,
) -> Result<Vec<FieldIdx>, &'static str> {
    match rest {
        None if len == arity => Ok((0..arity).map(|index| FieldIdx(index as u32)).collect()),
        None => Err("pattern has the wrong number of fields"),
        Some(pos) => {
            let after = len - pos - 1;
            if pos + after > arity {
                return Err("pattern has more fields than its type");
            }
            let skipped = arity - pos - after;
            Ok((0..pos)
                .chain(pos + skipped..arity)
                .map(|index| FieldIdx(index as u32))
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(raw: &[u32]) -> Vec<FieldIdx> {
        raw.iter().copied().map(FieldIdx).collect()
    }

    #[test]
    fn test_tuple_indices_without_rest() {
        assert_eq!(tuple_field_indices(3, None, 3), Ok(indices(&[0, 1, 2])));
        assert_eq!(
            tuple_field_indices(2, None, 3),
            Err("pattern has the wrong number of fields")
        );
    }

    #[test]
    fn test_tuple_indices_with_rest() {
        // (a, .., z) against a 4-tuple
        assert_eq!(tuple_field_indices(3, Some(1), 4), Ok(indices(&[0, 3])));
        // (.., z)
        assert_eq!(tuple_field_indices(2, Some(0), 3), Ok(indices(&[2])));
        // (a, b, ..) matching exactly
        assert_eq!(tuple_field_indices(3, Some(2), 2), Ok(indices(&[0, 1])));
    }

    #[test]
    fn test_tuple_indices_rest_with_too_many_fields() {
        assert_eq!(
            tuple_field_indices(4, Some(1), 2),
            Err("pattern has more fields than its type")
        );
    }

    #[test]
    fn test_open_range_pattern() {
        let bound = PatternBound {
            kind: rv_hir::LiteralKind::Integer(1),
            negated: true,
        };
        let kind = lower_range_pattern(Some(&bound), None, false, FileSpan::dummy());
        assert_eq!(
            kind,
            Ok(PatKind::Range(Box::new(PatRange {
                lo: PatRangeBoundary::Finite(Constant {
                    lit: rv_hir::LiteralKind::Integer(1),
                    neg: true,
                }),
                hi: PatRangeBoundary::PosInfinity,
                end: RangeEnd::Excluded,
            })))
        );
    }

    #[test]
    fn test_inclusive_range_pattern_without_end() {
        let err = lower_range_pattern(None, None, true, FileSpan::dummy());
        assert!(matches!(
            err,
            Err(LowerError::Internal(InternalError::MalformedPattern { .. }))
        ));
    }
}
