//! Loop, jump and conditional lowering tests

use expect_test::expect;
use integration_tests::TestFixture;
use rv_hir::{BinaryOp, Expr, ExprId, Label};
use rv_region::Scope;
use rv_thir::{ExprKind, LogicalOp, StmtKind};
use rv_thir_build::{InternalError, LowerError};
use rv_ty::Adjust;

fn label(fixture: &mut TestFixture, name: &str) -> Label {
    Label {
        name: fixture.sym(name),
        span: fixture.span(),
    }
}

fn loop_expr(fixture: &mut TestFixture, body: Vec<ExprId>, label: Option<Label>) -> ExprId {
    let statements = body
        .into_iter()
        .map(|expr| fixture.expr_stmt(expr))
        .collect();
    let block = fixture.block(statements, None);
    let unit = fixture.unit();
    fixture.expr(unit, |span| Expr::Loop {
        body: block,
        label,
        span,
    })
}

/// Break targets of every `break` in a lowered tree, outermost first.
fn break_targets(expr: &rv_thir::Expr, out: &mut Vec<Scope>) {
    match &expr.kind {
        ExprKind::Break { label, .. } => out.push(*label),
        ExprKind::Scope { value, .. }
        | ExprKind::NeverToAny { source: value }
        | ExprKind::Loop { body: value } => break_targets(value, out),
        ExprKind::Block { block } => {
            for stmt in &block.stmts {
                if let StmtKind::Expr { expr, .. } = &stmt.kind {
                    break_targets(expr, out);
                }
            }
            if let Some(tail) = &block.expr {
                break_targets(tail, out);
            }
        }
        _ => {}
    }
}

#[test]
fn test_while_desugars_to_loop() {
    let mut fixture = TestFixture::new();
    let unit = fixture.unit();
    let condition = fixture.bool_lit(true);
    let body = fixture.block(Vec::new(), None);
    let root = fixture.expr(unit, |span| Expr::While {
        condition,
        body,
        label: None,
        span,
    });
    fixture.set_root(root);

    let thir = fixture.lower().expect("lowering failed");
    expect![[r#"
        Scope Destruction(expr#2) : () temp=Node(expr#2)
          Scope Node(expr#2) : () temp=Node(expr#2)
            Loop : () temp=Node(expr#2)
              Block : () temp=Node(expr#2.body)
                Node(expr#2.body) dtor=Destruction(expr#2.body)
                tail
                  Scope Node(expr#2.if) : () temp=Node(expr#2.body)
                    If IfThen(expr#2.if) : () temp=Node(expr#2.body)
                      Use : bool temp=Node(expr#1)
                        Scope Destruction(expr#1) : bool temp=Node(expr#1)
                          Scope Node(expr#1) : bool temp=Node(expr#1)
                            Literal true : bool temp=Node(expr#1)
                      Scope Destruction(expr#2.then) : () temp=Node(expr#2.then)
                        Scope Node(expr#2.then) : () temp=Node(expr#2.then)
                          Block : () temp=Node(expr#2.then)
                            Node(block#0) dtor=none
                      else
                        Scope Destruction(expr#2.else) : () temp=Node(expr#2.else)
                          Scope Node(expr#2.else) : () temp=Node(expr#2.else)
                            Block : () temp=Node(expr#2.else)
                              Node(expr#2.else-block) dtor=none
                              Stmt Node(expr#2.exit-stmt) dtor=Destruction(expr#2.exit-stmt)
                                Scope Node(expr#2.exit) : () temp=Node(expr#2.exit-stmt)
                                  NeverToAny : () temp=Node(expr#2.exit-stmt)
                                    Break Node(expr#2) : ! temp=Node(expr#2.exit-stmt)
    "#]]
    .assert_eq(&fixture.render(&thir));
}

#[test]
fn test_break_in_while_body_targets_while() {
    let mut fixture = TestFixture::new();
    let unit = fixture.unit();
    let never = fixture.never();
    let condition = fixture.bool_lit(false);
    let jump = fixture.expr(never, |span| Expr::Break {
        label: None,
        value: None,
        span,
    });
    let stmt = fixture.expr_stmt(jump);
    let body = fixture.block(vec![stmt], None);
    let root = fixture.expr(unit, |span| Expr::While {
        condition,
        body,
        label: None,
        span,
    });
    fixture.set_root(root);

    let thir = fixture.lower().expect("lowering failed");
    let ExprKind::Loop { body } = &thir.value.skip_scopes().kind else {
        panic!("expected a loop");
    };
    let ExprKind::Block { block } = &body.kind else {
        panic!("expected the desugared loop block");
    };
    let Some(ExprKind::If { then, .. }) = block.expr.as_ref().map(|tail| &tail.skip_scopes().kind)
    else {
        panic!("expected the exit test");
    };
    let mut targets = Vec::new();
    break_targets(then, &mut targets);
    assert_eq!(targets, vec![Scope::node(root)]);
}

/// Scope layout of a lowered tree with node ids left out. The `if`
/// condition is skipped.
fn scope_shape(expr: &rv_thir::Expr, depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let temp = expr.temp_lifetime.map(|scope| scope.data);
    match &expr.kind {
        ExprKind::Scope {
            region_scope,
            value,
        } => {
            out.push(format!("{indent}Scope {:?} temp={temp:?}", region_scope.data));
            scope_shape(value, depth + 1, out);
        }
        ExprKind::Loop { body } => {
            out.push(format!("{indent}Loop temp={temp:?}"));
            scope_shape(body, depth + 1, out);
        }
        ExprKind::NeverToAny { source } => {
            out.push(format!("{indent}NeverToAny temp={temp:?}"));
            scope_shape(source, depth + 1, out);
        }
        ExprKind::If {
            if_then_scope,
            then,
            else_opt,
            ..
        } => {
            out.push(format!("{indent}If {:?} temp={temp:?}", if_then_scope.data));
            scope_shape(then, depth + 1, out);
            if let Some(else_expr) = else_opt {
                scope_shape(else_expr, depth + 1, out);
            }
        }
        ExprKind::Block { block } => {
            out.push(format!(
                "{indent}Block {:?} dtor={:?} temp={temp:?}",
                block.region_scope.data,
                block.opt_destruction_scope.map(|scope| scope.data)
            ));
            for stmt in &block.stmts {
                if let StmtKind::Expr { scope, expr } = &stmt.kind {
                    out.push(format!(
                        "{indent}  Stmt {:?} dtor={:?}",
                        scope.data,
                        stmt.opt_destruction_scope.map(|scope| scope.data)
                    ));
                    scope_shape(expr, depth + 2, out);
                }
            }
            if let Some(tail) = &block.expr {
                scope_shape(tail, depth + 1, out);
            }
        }
        ExprKind::Break { .. } => out.push(format!("{indent}Break temp={temp:?}")),
        other => out.push(format!("{indent}{other:?}")),
    }
}

#[test]
fn test_while_scopes_match_written_out_loop() {
    // while true { }
    let mut desugared = TestFixture::new();
    let unit = desugared.unit();
    let condition = desugared.bool_lit(true);
    let body = desugared.block(Vec::new(), None);
    let while_root = desugared.expr(unit, |span| Expr::While {
        condition,
        body,
        label: None,
        span,
    });
    desugared.set_root(while_root);

    // loop { if true { } else { break; } }
    let mut written = TestFixture::new();
    let unit = written.unit();
    let never = written.never();
    let condition = written.bool_lit(true);
    let then_branch = written.block_expr(Vec::new(), None, unit);
    let jump = written.expr(never, |span| Expr::Break {
        label: None,
        value: None,
        span,
    });
    let exit = written.expr_stmt(jump);
    let else_branch = written.block_expr(vec![exit], None, unit);
    let test = written.expr(unit, |span| Expr::If {
        condition,
        then_branch,
        else_branch: Some(else_branch),
        span,
    });
    let loop_block = written.block(Vec::new(), Some(test));
    let loop_root = written.expr(unit, |span| Expr::Loop {
        body: loop_block,
        label: None,
        span,
    });
    written.set_root(loop_root);

    let desugared_thir = desugared.lower().expect("lowering failed");
    let written_thir = written.lower().expect("lowering failed");

    let mut desugared_shape = Vec::new();
    scope_shape(&desugared_thir.value, 0, &mut desugared_shape);
    let mut written_shape = Vec::new();
    scope_shape(&written_thir.value, 0, &mut written_shape);
    assert_eq!(desugared_shape, written_shape);

    let mut targets = Vec::new();
    break_targets(&desugared_thir.value, &mut targets);
    assert_eq!(targets, vec![Scope::node(while_root)]);
}

#[test]
fn test_break_adjustments_follow_never_to_any() {
    let mut fixture = TestFixture::new();
    let never = fixture.never();
    let i32_ty = fixture.i32();
    let jump = fixture.expr(never, |span| Expr::Break {
        label: None,
        value: None,
        span,
    });
    fixture.adjust(jump, Adjust::NeverToAny, i32_ty);
    let root = loop_expr(&mut fixture, vec![jump], None);
    fixture.set_root(root);

    let thir = fixture.lower().expect("lowering failed");
    expect![[r#"
        Scope Destruction(expr#2) : () temp=Node(expr#2)
          Scope Node(expr#2) : () temp=Node(expr#2)
            Loop : () temp=Node(expr#2)
              Block : () temp=Node(block#0)
                Node(block#0) dtor=Destruction(block#0)
                Stmt Node(stmt#0) dtor=Destruction(stmt#0)
                  Scope Node(expr#1) : i32 temp=Node(stmt#0)
                    NeverToAny : i32 temp=Node(stmt#0)
                      NeverToAny : () temp=Node(stmt#0)
                        Break Node(expr#2) : ! temp=Node(stmt#0)
    "#]]
    .assert_eq(&fixture.render(&thir));
}

#[test]
fn test_loop_with_break() {
    let mut fixture = TestFixture::new();
    let never = fixture.never();
    let jump = fixture.expr(never, |span| Expr::Break {
        label: None,
        value: None,
        span,
    });
    let root = loop_expr(&mut fixture, vec![jump], None);
    fixture.set_root(root);

    let thir = fixture.lower().expect("lowering failed");
    expect![[r#"
        Scope Destruction(expr#2) : () temp=Node(expr#2)
          Scope Node(expr#2) : () temp=Node(expr#2)
            Loop : () temp=Node(expr#2)
              Block : () temp=Node(block#0)
                Node(block#0) dtor=Destruction(block#0)
                Stmt Node(stmt#0) dtor=Destruction(stmt#0)
                  Scope Node(expr#1) : () temp=Node(stmt#0)
                    NeverToAny : () temp=Node(stmt#0)
                      Break Node(expr#2) : ! temp=Node(stmt#0)
    "#]]
    .assert_eq(&fixture.render(&thir));
}

#[test]
fn test_break_value_is_lowered() {
    let mut fixture = TestFixture::new();
    let never = fixture.never();
    let value = fixture.int(7);
    let jump = fixture.expr(never, |span| Expr::Break {
        label: None,
        value: Some(value),
        span,
    });
    let root = loop_expr(&mut fixture, vec![jump], None);
    fixture.set_root(root);

    let thir = fixture.lower().expect("lowering failed");
    let rendered = fixture.render(&thir);
    assert!(rendered.contains("Break Node(expr#3) : ! temp=Node(stmt#0)"));
    assert!(rendered.contains("Literal 7 : i32 temp=Node(stmt#0)"));
}

#[test]
fn test_labeled_break_uses_resolution() {
    let mut fixture = TestFixture::new();
    let never = fixture.never();
    let outer_label = label(&mut fixture, "outer");
    let jump = fixture.expr(never, |span| Expr::Break {
        label: Some(outer_label),
        value: None,
        span,
    });
    let next = fixture.expr(never, |span| Expr::Continue { label: None, span });
    let inner = loop_expr(&mut fixture, vec![jump, next], None);
    let outer = loop_expr(&mut fixture, vec![inner], Some(outer_label));
    fixture.body.resolution.label_targets.insert(jump, outer);
    fixture.set_root(outer);

    let thir = fixture.lower().expect("lowering failed");
    let mut targets = Vec::new();
    break_targets(&thir.value, &mut targets);
    assert_eq!(targets, vec![Scope::node(outer)]);

    let rendered = fixture.render(&thir);
    assert!(rendered.contains(&format!("Continue {}", Scope::node(inner))));
}

#[test]
fn test_labeled_break_falls_back_to_enclosing_loop_label() {
    let mut fixture = TestFixture::new();
    let never = fixture.never();
    let outer_label = label(&mut fixture, "outer");
    let jump = fixture.expr(never, |span| Expr::Break {
        label: Some(outer_label),
        value: None,
        span,
    });
    let inner = loop_expr(&mut fixture, vec![jump], None);
    let outer = loop_expr(&mut fixture, vec![inner], Some(outer_label));
    fixture.set_root(outer);

    let thir = fixture.lower().expect("lowering failed");
    let mut targets = Vec::new();
    break_targets(&thir.value, &mut targets);
    assert_eq!(targets, vec![Scope::node(outer)]);
}

#[test]
fn test_break_outside_loop_is_internal() {
    let mut fixture = TestFixture::new();
    let never = fixture.never();
    let jump = fixture.expr(never, |span| Expr::Break {
        label: None,
        value: None,
        span,
    });
    fixture.set_root(jump);

    let err = fixture.lower().expect_err("no loop to leave");
    assert_eq!(
        err,
        LowerError::Internal(InternalError::MissingLoopTarget {
            span: fixture.body.expr_span(jump),
        })
    );
}

#[test]
fn test_unknown_label_is_internal() {
    let mut fixture = TestFixture::new();
    let never = fixture.never();
    let missing = label(&mut fixture, "missing");
    let jump = fixture.expr(never, |span| Expr::Continue {
        label: Some(missing),
        span,
    });
    let root = loop_expr(&mut fixture, vec![jump], None);
    fixture.set_root(root);

    let err = fixture.lower().expect_err("label names no loop");
    assert!(matches!(
        err,
        LowerError::Internal(InternalError::MissingLoopTarget { .. })
    ));
}

#[test]
fn test_if_scopes() {
    let mut fixture = TestFixture::new();
    let i32_ty = fixture.i32();
    let condition = fixture.bool_lit(true);
    let one = fixture.int(1);
    let then_branch = fixture.block_expr(Vec::new(), Some(one), i32_ty);
    let two = fixture.int(2);
    let else_branch = fixture.block_expr(Vec::new(), Some(two), i32_ty);
    let root = fixture.expr(i32_ty, |span| Expr::If {
        condition,
        then_branch,
        else_branch: Some(else_branch),
        span,
    });
    fixture.set_root(root);

    let thir = fixture.lower().expect("lowering failed");
    let ExprKind::If {
        if_then_scope,
        cond,
        then,
        else_opt,
    } = &thir.value.skip_scopes().kind
    else {
        panic!("expected an if");
    };
    assert_eq!(*if_then_scope, Scope::if_then(root));
    assert_eq!(cond.temp_lifetime, Some(Scope::node(root)));

    let ExprKind::Scope { region_scope, .. } = &then.kind else {
        panic!("then branch is scoped");
    };
    assert_eq!(*region_scope, Scope::destruction(then_branch));
    assert_eq!(then.temp_lifetime, Some(Scope::node(then_branch)));

    let Some(else_expr) = else_opt else {
        panic!("else branch is kept");
    };
    let ExprKind::Scope { region_scope, .. } = &else_expr.kind else {
        panic!("else branch is scoped");
    };
    assert_eq!(*region_scope, Scope::destruction(else_branch));
}

#[test]
fn test_lazy_operands_get_destruction_scopes() {
    let mut fixture = TestFixture::new();
    let bool_ty = fixture.bool();
    let lhs = fixture.bool_lit(true);
    let rhs = fixture.bool_lit(false);
    let root = fixture.expr(bool_ty, |span| Expr::Binary {
        op: BinaryOp::Or,
        lhs,
        rhs,
        span,
    });
    fixture.set_root(root);

    let thir = fixture.lower().expect("lowering failed");
    let ExprKind::LogicalOp {
        op,
        lhs: lowered_lhs,
        rhs: lowered_rhs,
    } = &thir.value.skip_scopes().kind
    else {
        panic!("expected a logical operator");
    };
    assert_eq!(*op, LogicalOp::Or);
    for (lowered, id) in [(lowered_lhs, lhs), (lowered_rhs, rhs)] {
        let ExprKind::Scope { region_scope, .. } = &lowered.kind else {
            panic!("operand is scoped");
        };
        assert_eq!(*region_scope, Scope::destruction(id));
        assert_eq!(lowered.temp_lifetime, Some(Scope::node(id)));
    }
}

#[test]
fn test_return_value() {
    let mut fixture = TestFixture::new();
    let never = fixture.never();
    let value = fixture.int(1);
    let root = fixture.expr(never, |span| Expr::Return {
        value: Some(value),
        span,
    });
    fixture.set_root(root);

    let thir = fixture.lower().expect("lowering failed");
    let ExprKind::Return { value: Some(value) } = &thir.value.skip_scopes().kind else {
        panic!("expected a return with a value");
    };
    assert!(matches!(
        value.skip_scopes().kind,
        ExprKind::Literal { neg: false, .. }
    ));
}
