//! Block and statement lowering tests

use expect_test::expect;
use integration_tests::TestFixture;
use rv_hir::{Expr, Stmt, UnaryOp};
use rv_region::Scope;
use rv_thir::{BlockSafety, ExprKind, PatKind, StmtKind};
use rv_thir_build::{InternalError, LowerError, Unsupported};
use rv_ty::TyKind;

#[test]
fn test_let_statement() {
    let mut fixture = TestFixture::new();
    let i32_ty = fixture.i32();
    let (pat, local) = fixture.binding("x", i32_ty);
    let one = fixture.int(1);
    let stmt = fixture.let_stmt(pat, Some(one));
    let tail = fixture.var("x", local, i32_ty);
    let root = fixture.block_expr(vec![stmt], Some(tail), i32_ty);
    fixture.set_root(root);

    let thir = fixture.lower().expect("lowering failed");
    expect![[r#"
        Scope Destruction(expr#3) : i32 temp=Node(expr#3)
          Scope Node(expr#3) : i32 temp=Node(expr#3)
            Block : i32 temp=Node(expr#3)
              Node(block#0) dtor=none
              Let Remainder(block#0, 0) Node(stmt#0) dtor=Destruction(stmt#0)
                Pat Binding x local#0 : i32
                Scope Node(expr#1) : i32 temp=Node(stmt#0)
                  Literal 1 : i32 temp=Node(stmt#0)
              tail
                Scope Node(expr#2) : i32 temp=Node(expr#3)
                  VarRef local#0 : i32 temp=Node(expr#3)
    "#]]
    .assert_eq(&fixture.render(&thir));
}

#[test]
fn test_let_scopes_follow_statement_position() {
    let mut fixture = TestFixture::new();
    let i32_ty = fixture.i32();
    let unit = fixture.unit();
    let first_init = fixture.int(1);
    let first = fixture.expr_stmt(first_init);
    let (pat, _) = fixture.binding("y", i32_ty);
    let init = fixture.int(2);
    let second = fixture.let_stmt(pat, Some(init));
    let root = fixture.block_expr(vec![first, second], None, unit);
    fixture.set_root(root);

    let thir = fixture.lower().expect("lowering failed");
    let ExprKind::Block { block } = &thir.value.skip_scopes().kind else {
        panic!("expected a block");
    };
    assert_eq!(block.stmts.len(), 2);
    let StmtKind::Expr { scope, .. } = &block.stmts[0].kind else {
        panic!("expected an expression statement");
    };
    assert_eq!(*scope, Scope::node(first));
    assert_eq!(block.stmts[0].opt_destruction_scope, Some(Scope::destruction(first)));

    let StmtKind::Let {
        remainder_scope,
        init_scope,
        pattern,
        else_block,
        ..
    } = &block.stmts[1].kind
    else {
        panic!("expected a let statement");
    };
    let block_id = fixture.body.blocks.iter().next().map(|(id, _)| id).expect("one block");
    assert_eq!(*remainder_scope, Scope::remainder(block_id, 1));
    assert_eq!(*init_scope, Scope::node(second));
    assert!(else_block.is_none());
    assert!(matches!(pattern.kind, PatKind::Binding { .. }));
}

#[test]
fn test_borrowed_initializer_is_extended() {
    let mut fixture = TestFixture::new();
    let i32_ty = fixture.i32();
    let ref_ty = fixture.ty(TyKind::Ref {
        mutability: rv_hir::Mutability::Not,
        inner: i32_ty,
    });
    let unit = fixture.unit();
    let (pat, _) = fixture.binding("r", ref_ty);
    let five = fixture.int(5);
    let borrow = fixture.expr(ref_ty, |span| Expr::Unary {
        op: UnaryOp::Ref,
        operand: five,
        span,
    });
    let stmt = fixture.let_stmt(pat, Some(borrow));
    let root = fixture.block_expr(vec![stmt], None, unit);
    fixture.set_root(root);

    let thir = fixture.lower().expect("lowering failed");
    let ExprKind::Block { block } = &thir.value.skip_scopes().kind else {
        panic!("expected a block");
    };
    let StmtKind::Let {
        initializer: Some(init),
        ..
    } = &block.stmts[0].kind
    else {
        panic!("expected an initialized let");
    };
    assert_eq!(init.temp_lifetime, Some(Scope::node(stmt)));
    let ExprKind::Borrow { arg, .. } = &init.skip_scopes().kind else {
        panic!("expected a borrow");
    };
    let block_id = fixture.body.blocks.iter().next().map(|(id, _)| id).expect("one block");
    assert_eq!(arg.temp_lifetime, Some(Scope::remainder(block_id, 0)));
}

#[test]
fn test_let_else_is_not_implemented() {
    let mut fixture = TestFixture::new();
    let i32_ty = fixture.i32();
    let unit = fixture.unit();
    let (pat, _) = fixture.binding("x", i32_ty);
    let init = fixture.int(1);
    let else_branch = fixture.block(Vec::new(), None);
    let stmt = fixture.stmt(|span| Stmt::Let {
        pattern: pat,
        initializer: Some(init),
        else_branch: Some(else_branch),
        span,
    });
    let root = fixture.block_expr(vec![stmt], None, unit);
    fixture.set_root(root);

    let err = fixture.lower().expect_err("let-else is pending");
    assert_eq!(
        err,
        LowerError::NotImplemented(Unsupported::LetElse {
            span: fixture.body.blocks[else_branch].span,
        })
    );
}

#[test]
fn test_item_statement_is_not_implemented() {
    let mut fixture = TestFixture::new();
    let unit = fixture.unit();
    let item = fixture.stmt(|span| Stmt::Item { span });
    let root = fixture.block_expr(vec![item], None, unit);
    fixture.set_root(root);

    let err = fixture.lower().expect_err("nested items are pending");
    assert!(matches!(
        err,
        LowerError::NotImplemented(Unsupported::ItemStatement { .. })
    ));
}

#[test]
fn test_empty_block() {
    let mut fixture = TestFixture::new();
    let unit = fixture.unit();
    let root = fixture.block_expr(Vec::new(), None, unit);
    fixture.set_root(root);

    let thir = fixture.lower().expect("lowering failed");
    let ExprKind::Block { block } = &thir.value.skip_scopes().kind else {
        panic!("expected a block");
    };
    assert!(block.stmts.is_empty());
    assert!(block.expr.is_none());
    assert_eq!(block.opt_destruction_scope, None);
}

#[test]
fn test_empty_block_with_value_type_is_internal() {
    let mut fixture = TestFixture::new();
    let i32_ty = fixture.i32();
    let block = fixture.block(Vec::new(), None);
    let root = fixture.expr(i32_ty, |span| Expr::Block { block, span });
    fixture.set_root(root);

    let err = fixture.lower().expect_err("an empty block is unit");
    assert_eq!(
        err,
        LowerError::Internal(InternalError::NonUnitEmptyBlock {
            span: fixture.body.blocks[block].span,
        })
    );
}

#[test]
fn test_unsafe_block() {
    let mut fixture = TestFixture::new();
    let i32_ty = fixture.i32();
    let value = fixture.int(3);
    let block = fixture.block(Vec::new(), Some(value));
    fixture.body.blocks[block].is_unsafe = true;
    let root = fixture.expr(i32_ty, |span| Expr::Block { block, span });
    fixture.set_root(root);

    let thir = fixture.lower().expect("lowering failed");
    let ExprKind::Block { block } = &thir.value.skip_scopes().kind else {
        panic!("expected a block");
    };
    assert_eq!(block.safety_mode, BlockSafety::ExplicitUnsafe);
    assert!(fixture.render(&thir).contains("Node(block#0) dtor=none unsafe"));
}

#[test]
fn test_parameters_are_lowered_first() {
    let mut fixture = TestFixture::new();
    let i32_ty = fixture.i32();
    let bool_ty = fixture.bool();
    let (first, _) = fixture.binding("a", i32_ty);
    let (second, _) = fixture.binding("b", bool_ty);
    fixture.add_param(first);
    fixture.add_param(second);
    let root = fixture.unit_expr();
    fixture.set_root(root);

    let thir = fixture.lower().expect("lowering failed");
    expect![[r#"
        Param
          Pat Binding a local#0 : i32
        Param
          Pat Binding b local#1 : bool
        Scope Destruction(expr#1) : () temp=Node(expr#1)
          Scope Node(expr#1) : () temp=Node(expr#1)
            Tuple : () temp=Node(expr#1)
    "#]]
    .assert_eq(&fixture.render(&thir));
    assert_eq!(thir.params[1].ty, bool_ty);
}
