//! Tests for constant-driven control-flow elaboration through the full
//! pipeline: if/case collapse and for-loop unrolling.

use plexus_common::Interner;
use plexus_conformance::build::{
    add_param, assign, binary, child, count_loop, module, net, num, reg_init, var,
};
use plexus_conformance::{full_pipeline, make_config_with_limits, run_pipeline};
use plexus_elaborate::errors;
use plexus_ir::{BinaryOp, CaseArm, CaseKind, Expression, Number, Stmt};
use plexus_source::Span;

#[test]
fn parameterized_if_keeps_only_the_live_branch() {
    let interner = Interner::new();
    let mut m = module(&interner, "top");
    add_param(&mut m, &interner, "EN", 0);
    let root = m.root;
    let then_block = child(&mut m, &interner, None, root);
    let else_block = child(&mut m, &interner, None, root);
    m.scope.block_mut(then_block).stmts = vec![assign(&interner, "q", num(1, 8))];
    m.scope.block_mut(else_block).stmts = vec![assign(&interner, "q", num(2, 8))];
    m.scope.block_mut(root).stmts = vec![
        net(&interner, "q"),
        Stmt::If {
            condition: var(&interner, "EN"),
            then_block,
            else_block: Some(else_block),
            span: Span::DUMMY,
        },
    ];

    let result = full_pipeline(vec![m], &interner, "top");
    assert!(!result.has_errors, "errors: {:?}", result.diagnostics);
    let top = result.top();
    let stmts = &top.scope.block(top.root).stmts;
    assert_eq!(stmts.len(), 1);
    let Stmt::Assign(a) = &stmts[0] else {
        panic!("expected the else branch's assignment");
    };
    assert_eq!(a.rhs.as_number().and_then(Number::get_value), Some(2));
}

#[test]
fn nonconstant_if_stays_residual_with_folded_branches() {
    let interner = Interner::new();
    let mut m = module(&interner, "top");
    let root = m.root;
    let then_block = child(&mut m, &interner, None, root);
    let inner = child(&mut m, &interner, None, then_block);
    m.scope.block_mut(inner).stmts = vec![assign(&interner, "q", num(1, 8))];
    m.scope.block_mut(then_block).stmts = vec![Stmt::If {
        // Constant inside a residual branch still folds.
        condition: num(1, 1),
        then_block: inner,
        else_block: None,
        span: Span::DUMMY,
    }];
    m.scope.block_mut(root).stmts = vec![
        net(&interner, "q"),
        net(&interner, "sel"),
        Stmt::If {
            condition: var(&interner, "sel"),
            then_block,
            else_block: None,
            span: Span::DUMMY,
        },
    ];

    let result = full_pipeline(vec![m], &interner, "top");
    assert!(!result.has_errors);
    let top = result.top();
    let stmts = &top.scope.block(top.root).stmts;
    let Stmt::If { then_block, .. } = stmts.last().unwrap() else {
        panic!("expected residual if");
    };
    // The nested constant if was spliced inside the residual branch.
    let branch = &top.scope.block(*then_block).stmts;
    assert_eq!(branch.len(), 1);
    assert!(matches!(branch[0], Stmt::Assign(_)));
}

#[test]
fn casez_selects_by_dont_care_pattern() {
    let interner = Interner::new();
    let mut m = module(&interner, "top");
    add_param(&mut m, &interner, "SEL", 0b101);
    let root = m.root;
    let arm0 = child(&mut m, &interner, None, root);
    let arm1 = child(&mut m, &interner, None, root);
    m.scope.block_mut(arm0).stmts = vec![assign(&interner, "q", num(0, 8))];
    m.scope.block_mut(arm1).stmts = vec![assign(&interner, "q", num(1, 8))];
    m.scope.block_mut(root).stmts = vec![
        net(&interner, "q"),
        Stmt::Case {
            kind: CaseKind::CaseZ,
            selector: var(&interner, "SEL"),
            arms: vec![
                CaseArm {
                    patterns: vec![Expression::Number(Number::parse("3'b0zz").unwrap())],
                    body: arm0,
                    span: Span::DUMMY,
                },
                CaseArm {
                    patterns: vec![Expression::Number(Number::parse("3'b1zz").unwrap())],
                    body: arm1,
                    span: Span::DUMMY,
                },
            ],
            default: None,
            span: Span::DUMMY,
        },
    ];

    let result = full_pipeline(vec![m], &interner, "top");
    assert!(!result.has_errors);
    let top = result.top();
    let stmts = &top.scope.block(top.root).stmts;
    assert_eq!(stmts.len(), 1);
    let Stmt::Assign(a) = &stmts[0] else {
        panic!("expected the matching arm's assignment");
    };
    assert_eq!(a.rhs.as_number().and_then(Number::get_value), Some(1));
}

#[test]
fn case_without_match_warns_and_is_removed() {
    let interner = Interner::new();
    let mut m = module(&interner, "top");
    let root = m.root;
    let arm = child(&mut m, &interner, None, root);
    m.scope.block_mut(root).stmts = vec![Stmt::Case {
        kind: CaseKind::Case,
        selector: num(3, 2),
        arms: vec![CaseArm {
            patterns: vec![num(0, 2)],
            body: arm,
            span: Span::DUMMY,
        }],
        default: None,
        span: Span::DUMMY,
    }];

    let result = full_pipeline(vec![m], &interner, "top");
    assert!(!result.has_errors);
    assert!(result.has_code(errors::W301));
    assert!(result.top().scope.block(result.top().root).stmts.is_empty());
}

#[test]
fn unrolled_loop_prefixes_named_body_declarations() {
    let interner = Interner::new();
    let mut m = module(&interner, "top");
    let root = m.root;
    let body = child(&mut m, &interner, Some("blk"), root);
    m.scope.block_mut(body).stmts = vec![reg_init(&interner, "r", var(&interner, "i"))];
    m.scope.block_mut(root).stmts = vec![count_loop(&interner, "i", 0, 3, body)];

    let result = full_pipeline(vec![m], &interner, "top");
    assert!(!result.has_errors, "errors: {:?}", result.diagnostics);
    let top = result.top();
    let block = top.scope.block(top.root);
    assert!(block.stmts.is_empty());
    for (name, value) in [("blk0.r", 0), ("blk1.r", 1), ("blk2.r", 2)] {
        let var = block
            .variables
            .get(interner.get_or_intern(name))
            .unwrap_or_else(|| panic!("missing {name}"));
        let init = var.init.as_ref().and_then(|e| e.as_number());
        assert_eq!(init.and_then(Number::get_value), Some(value), "{name}");
    }
    // The loop variable never becomes a declaration.
    assert!(!block.variables.contains(interner.get_or_intern("i")));
}

#[test]
fn loop_bound_may_come_from_a_parameter() {
    let interner = Interner::new();
    let mut m = module(&interner, "top");
    add_param(&mut m, &interner, "N", 4);
    let root = m.root;
    let body = child(&mut m, &interner, None, root);
    m.scope.block_mut(body).stmts = vec![assign(
        &interner,
        "acc",
        binary(BinaryOp::Add, var(&interner, "acc"), var(&interner, "i")),
    )];
    let mut stmts = vec![net(&interner, "acc")];
    stmts.push({
        let mut s = count_loop(&interner, "i", 0, 0, body);
        if let Stmt::For { condition, .. } = &mut s {
            *condition = binary(BinaryOp::Lt, var(&interner, "i"), var(&interner, "N"));
        }
        s
    });
    m.scope.block_mut(root).stmts = stmts;

    let result = full_pipeline(vec![m], &interner, "top");
    assert!(!result.has_errors, "errors: {:?}", result.diagnostics);
    let top = result.top();
    let stmts = &top.scope.block(top.root).stmts;
    // One accumulation per iteration, loop variable substituted away.
    assert_eq!(stmts.len(), 4);
    let Stmt::Assign(last) = &stmts[3] else {
        panic!("expected assignment");
    };
    let Expression::Binary { rhs, .. } = &last.rhs else {
        panic!("expected residual addition");
    };
    assert_eq!(rhs.as_number().and_then(Number::get_value), Some(3));
}

#[test]
fn zero_iteration_loop_disappears() {
    let interner = Interner::new();
    let mut m = module(&interner, "top");
    let root = m.root;
    let body = child(&mut m, &interner, None, root);
    m.scope.block_mut(body).stmts = vec![assign(&interner, "q", num(1, 1))];
    m.scope.block_mut(root).stmts = vec![count_loop(&interner, "i", 5, 5, body)];

    let result = full_pipeline(vec![m], &interner, "top");
    assert!(!result.has_errors);
    assert!(result.top().scope.block(result.top().root).stmts.is_empty());
}

#[test]
fn unroll_cap_emits_r300() {
    let interner = Interner::new();
    let mut m = module(&interner, "top");
    let root = m.root;
    let body = child(&mut m, &interner, None, root);
    m.scope.block_mut(root).stmts = vec![count_loop(&interner, "i", 0, 1000, body)];

    let config = make_config_with_limits("top", 10, 4096);
    let result = run_pipeline(vec![m], &interner, &config);
    assert!(result.has_errors);
    assert!(result.has_code(errors::R300));
}

#[test]
fn while_loop_is_left_residual() {
    let interner = Interner::new();
    let mut m = module(&interner, "top");
    let root = m.root;
    let body = child(&mut m, &interner, None, root);
    m.scope.block_mut(root).stmts = vec![
        net(&interner, "go"),
        Stmt::While {
            condition: var(&interner, "go"),
            body,
            span: Span::DUMMY,
        },
    ];

    let result = full_pipeline(vec![m], &interner, "top");
    assert!(!result.has_errors);
    let top = result.top();
    assert!(matches!(
        top.scope.block(top.root).stmts.last(),
        Some(Stmt::While { .. })
    ));
}
