//! Indented text dump of THIR trees, for tests and debugging.
//!
//! Each expression prints as `Kind details : type temp=scope` followed by
//! its children, one level deeper.

use rv_intern::Interner;
use rv_ty::TyArena;

use crate::{
    Arm, Block, BlockSafety, Constant, Expr, ExprKind, FieldPat, Pat, PatKind, PatRangeBoundary,
    RangeEnd, Stmt, StmtKind, ThirBody,
};

/// Renders an expression tree.
#[must_use]
pub fn expr_to_string(expr: &Expr, types: &TyArena, interner: &Interner) -> String {
    let mut printer = Printer::new(types, interner);
    printer.expr(expr);
    printer.out
}

/// Renders a lowered body, parameters first.
#[must_use]
pub fn body_to_string(body: &ThirBody, types: &TyArena, interner: &Interner) -> String {
    let mut printer = Printer::new(types, interner);
    for param in &body.params {
        printer.line("Param");
        printer.nested(|printer| printer.pat(&param.pat));
    }
    printer.expr(&body.value);
    printer.out
}

/// Renders a pattern tree.
#[must_use]
pub fn pat_to_string(pat: &Pat, types: &TyArena, interner: &Interner) -> String {
    let mut printer = Printer::new(types, interner);
    printer.pat(pat);
    printer.out
}

struct Printer<'ctx> {
    types: &'ctx TyArena,
    interner: &'ctx Interner,
    out: String,
    indent: usize,
}

fn constant(value: &Constant) -> String {
    if value.neg {
        format!("-{}", value.lit)
    } else {
        value.lit.to_string()
    }
}

impl<'ctx> Printer<'ctx> {
    fn new(types: &'ctx TyArena, interner: &'ctx Interner) -> Self {
        Self {
            types,
            interner,
            out: String::new(),
            indent: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn nested(&mut self, print: impl FnOnce(&mut Self)) {
        self.indent += 1;
        print(self);
        self.indent -= 1;
    }

    fn expr(&mut self, expr: &Expr) {
        let head = match &expr.kind {
            ExprKind::Scope { region_scope, .. } => format!("Scope {region_scope}"),
            ExprKind::Literal { lit, neg } => {
                let sign = if *neg { "-" } else { "" };
                format!("Literal {sign}{lit}")
            }
            ExprKind::Unary { op, .. } => format!("Unary {op}"),
            ExprKind::Binary { op, .. } => format!("Binary {op}"),
            ExprKind::LogicalOp { op, .. } => format!("LogicalOp {op}"),
            ExprKind::Assign { .. } => "Assign".to_owned(),
            ExprKind::AssignOp { op, .. } => format!("AssignOp {op}="),
            ExprKind::Block { .. } => "Block".to_owned(),
            ExprKind::If { if_then_scope, .. } => format!("If {if_then_scope}"),
            ExprKind::Loop { .. } => "Loop".to_owned(),
            ExprKind::Break { label, .. } => format!("Break {label}"),
            ExprKind::Continue { label } => format!("Continue {label}"),
            ExprKind::Return { .. } => "Return".to_owned(),
            ExprKind::Call { from_hir_call, .. } => format!("Call from_hir_call={from_hir_call}"),
            ExprKind::Field {
                variant_index, name, ..
            } => format!("Field variant={variant_index} field={name}"),
            ExprKind::Deref { .. } => "Deref".to_owned(),
            ExprKind::Borrow { borrow_kind, .. } => format!("Borrow {borrow_kind}"),
            ExprKind::Index { .. } => "Index".to_owned(),
            ExprKind::Tuple { .. } => "Tuple".to_owned(),
            ExprKind::Array { .. } => "Array".to_owned(),
            ExprKind::Repeat { count, .. } => format!("Repeat count={count}"),
            ExprKind::Adt(adt) => format!("Adt {} variant={}", adt.adt_def, adt.variant_index),
            ExprKind::Match { .. } => "Match".to_owned(),
            ExprKind::VarRef { id } => format!("VarRef {id}"),
            ExprKind::ZstLiteral => "ZstLiteral".to_owned(),
            ExprKind::Use { .. } => "Use".to_owned(),
            ExprKind::NeverToAny { .. } => "NeverToAny".to_owned(),
        };
        let temp = expr
            .temp_lifetime
            .map_or_else(|| "none".to_owned(), |scope| scope.to_string());
        self.line(&format!("{head} : {} temp={temp}", self.types.display(expr.ty)));
        self.nested(|printer| printer.expr_children(&expr.kind));
    }

    fn expr_children(&mut self, kind: &ExprKind) {
        match kind {
            ExprKind::Literal { .. }
            | ExprKind::Continue { .. }
            | ExprKind::VarRef { .. }
            | ExprKind::ZstLiteral => {}
            ExprKind::Scope { value: inner, .. }
            | ExprKind::Unary { arg: inner, .. }
            | ExprKind::Loop { body: inner }
            | ExprKind::Deref { arg: inner }
            | ExprKind::Borrow { arg: inner, .. }
            | ExprKind::Repeat { value: inner, .. }
            | ExprKind::Use { source: inner }
            | ExprKind::NeverToAny { source: inner } => self.expr(inner),
            ExprKind::Binary { lhs, rhs, .. }
            | ExprKind::LogicalOp { lhs, rhs, .. }
            | ExprKind::Assign { lhs, rhs }
            | ExprKind::AssignOp { lhs, rhs, .. }
            | ExprKind::Index { lhs, index: rhs } => {
                self.expr(lhs);
                self.expr(rhs);
            }
            ExprKind::Block { block } => self.block(block),
            ExprKind::If {
                cond,
                then,
                else_opt,
                ..
            } => {
                self.expr(cond);
                self.expr(then);
                if let Some(else_expr) = else_opt {
                    self.line("else");
                    self.nested(|printer| printer.expr(else_expr));
                }
            }
            ExprKind::Break { value, .. } | ExprKind::Return { value } => {
                if let Some(value) = value {
                    self.expr(value);
                }
            }
            ExprKind::Call { fun, args, .. } => {
                self.expr(fun);
                for arg in args {
                    self.expr(arg);
                }
            }
            ExprKind::Field { lhs, .. } => self.expr(lhs),
            ExprKind::Tuple { fields } | ExprKind::Array { fields } => {
                for field in fields {
                    self.expr(field);
                }
            }
            ExprKind::Adt(adt) => {
                for field in &adt.fields {
                    self.line(&format!("field {}", field.name));
                    self.nested(|printer| printer.expr(&field.expr));
                }
            }
            ExprKind::Match { scrutinee, arms } => {
                self.expr(scrutinee);
                for arm in arms {
                    self.arm(arm);
                }
            }
        }
    }

    fn block(&mut self, block: &Block) {
        let dtor = block
            .opt_destruction_scope
            .map_or_else(|| "none".to_owned(), |scope| scope.to_string());
        let safety = match block.safety_mode {
            BlockSafety::Safe => "",
            BlockSafety::ExplicitUnsafe => " unsafe",
        };
        self.line(&format!("{} dtor={dtor}{safety}", block.region_scope));
        for stmt in &block.stmts {
            self.stmt(stmt);
        }
        if let Some(tail) = &block.expr {
            self.line("tail");
            self.nested(|printer| printer.expr(tail));
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        let dtor = stmt
            .opt_destruction_scope
            .map_or_else(|| "none".to_owned(), |scope| scope.to_string());
        match &stmt.kind {
            StmtKind::Expr { scope, expr } => {
                self.line(&format!("Stmt {scope} dtor={dtor}"));
                self.nested(|printer| printer.expr(expr));
            }
            StmtKind::Let {
                remainder_scope,
                init_scope,
                pattern,
                initializer,
                else_block,
                ..
            } => {
                self.line(&format!("Let {remainder_scope} {init_scope} dtor={dtor}"));
                self.nested(|printer| {
                    printer.pat(pattern);
                    if let Some(init) = initializer {
                        printer.expr(init);
                    }
                    if let Some(else_block) = else_block {
                        printer.line("else");
                        printer.nested(|printer| printer.block(else_block));
                    }
                });
            }
        }
    }

    fn arm(&mut self, arm: &Arm) {
        self.line(&format!("Arm {}", arm.scope));
        self.nested(|printer| {
            printer.pat(&arm.pattern);
            if let Some(guard) = &arm.guard {
                printer.line("if");
                printer.nested(|printer| printer.expr(guard));
            }
            printer.expr(&arm.body);
        });
    }

    fn pat(&mut self, pat: &Pat) {
        let head = match &pat.kind {
            PatKind::Wild => "Wild".to_owned(),
            PatKind::Binding {
                mutability,
                name,
                var,
                ..
            } => format!("Binding {mutability}{} {var}", self.interner.resolve(name)),
            PatKind::Variant {
                adt_def,
                variant_index,
                ..
            } => format!("Variant {adt_def} variant={variant_index}"),
            PatKind::Leaf { .. } => "Leaf".to_owned(),
            PatKind::Deref { .. } => "Deref".to_owned(),
            PatKind::Constant { value } => format!("Constant {}", constant(value)),
            PatKind::Range(range) => {
                let bound = |boundary: &PatRangeBoundary| match boundary {
                    PatRangeBoundary::Finite(value) => constant(value),
                    PatRangeBoundary::NegInfinity | PatRangeBoundary::PosInfinity => String::new(),
                };
                let end = match range.end {
                    RangeEnd::Included => "..=",
                    RangeEnd::Excluded => "..",
                };
                format!("Range {}{end}{}", bound(&range.lo), bound(&range.hi))
            }
            PatKind::Slice { .. } => "Slice".to_owned(),
            PatKind::Array { .. } => "Array".to_owned(),
            PatKind::Or { .. } => "Or".to_owned(),
        };
        self.line(&format!("Pat {head} : {}", self.types.display(pat.ty)));
        self.nested(|printer| printer.pat_children(&pat.kind));
    }

    fn pat_children(&mut self, kind: &PatKind) {
        match kind {
            PatKind::Wild | PatKind::Constant { .. } | PatKind::Range(_) => {}
            PatKind::Binding { subpattern, .. } => {
                if let Some(sub) = subpattern {
                    self.pat(sub);
                }
            }
            PatKind::Variant { subpatterns, .. } | PatKind::Leaf { subpatterns } => {
                for field in subpatterns {
                    self.field_pat(field);
                }
            }
            PatKind::Deref { subpattern } => self.pat(subpattern),
            PatKind::Slice {
                prefix,
                slice,
                suffix,
            }
            | PatKind::Array {
                prefix,
                slice,
                suffix,
            } => {
                for pat in prefix {
                    self.pat(pat);
                }
                if let Some(rest) = slice {
                    self.line("..");
                    self.nested(|printer| printer.pat(rest));
                }
                for pat in suffix {
                    self.pat(pat);
                }
            }
            PatKind::Or { pats } => {
                for pat in pats {
                    self.pat(pat);
                }
            }
        }
    }

    fn field_pat(&mut self, field: &FieldPat) {
        self.line(&format!("field {}", field.field));
        self.nested(|printer| printer.pat(&field.pattern));
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use la_arena::{Idx, RawIdx};
    use rv_hir::{ExprId, LiteralKind};
    use rv_region::Scope;
    use rv_span::FileSpan;
    use rv_ty::{IntTy, TyKind};

    use super::*;
    use crate::PendingExpr;

    #[test]
    fn test_nested_expression_dump() {
        let mut types = TyArena::new();
        let int = types.intern(TyKind::Int(IntTy::I32));
        let id: ExprId = Idx::from_raw(RawIdx::from(1u32));
        let temp = Some(Scope::node(id));
        let lit = PendingExpr::new(
            ExprKind::Literal {
                lit: LiteralKind::Integer(5),
                neg: true,
            },
            int,
            FileSpan::dummy(),
        )
        .finish(temp);
        let scoped = lit.wrap(int, |value| ExprKind::Scope {
            region_scope: Scope::node(id),
            value,
        });

        let dump = expr_to_string(&scoped, &types, &Interner::new());
        expect![[r#"
            Scope Node(expr#1) : i32 temp=Node(expr#1)
              Literal -5 : i32 temp=Node(expr#1)
        "#]]
        .assert_eq(&dump);
    }
}
