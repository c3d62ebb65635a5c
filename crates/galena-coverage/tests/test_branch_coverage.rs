//! Branch coverage of two-legged conditionals and elsif chains

mod common;

use common::*;
use galena_ast::{Module, Stmt, Stop};
use galena_coverage::CoverageOptions;
use std::collections::HashSet;

fn first_if(module: &Module) -> &galena_ast::IfStmt {
    match &module.stmts[0] {
        Stmt::Process(p) => match &p.stmts[0] {
            Stmt::If(i) => i,
            other => panic!("expected if, got {:?}", other),
        },
        other => panic!("expected process, got {:?}", other),
    }
}

#[test]
fn test_simple_if_else_both_arms_live() {
    // if (c) a=1; else a=2;   on lines 10..12
    let module = run(module_with(vec![always(
        sp(10, 12),
        vec![if_stmt(sp(10, 12), vec![assign_at(11)], vec![assign_at(12)])],
    )]));

    let branches = decls_on_page(&module, "v_branch");
    assert_eq!(branches.len(), 2);

    let iff = first_if(&module);
    let then_incs = incs(&iff.then_stmts);
    assert_eq!(then_incs.len(), 1);
    let then_decl = decl_of(&module, then_incs[0]);
    assert_eq!(then_decl.page, "v_branch/dut");
    assert_eq!(then_decl.comment, "if");
    assert_eq!(then_decl.linescov, "11");
    assert_eq!(then_decl.offset, 0);

    let else_incs = incs(&iff.else_stmts);
    assert_eq!(else_incs.len(), 1);
    let else_decl = decl_of(&module, else_incs[0]);
    assert_eq!(else_decl.page, "v_branch/dut");
    assert_eq!(else_decl.comment, "else");
    assert_eq!(else_decl.linescov, "12");
    assert_eq!(else_decl.offset, 1);

    // Handles and descriptor ids never repeat within a module
    let ids: HashSet<_> = decls(&module).iter().map(|d| d.id).collect();
    assert_eq!(ids.len(), decls(&module).len());
}

#[test]
fn test_elsif_chain_is_line_coverage() {
    // if(a) x=1; else if(b) x=2; else if(c) x=3; else x=4;  lines 20..27
    let if3 = if_stmt(sp(24, 27), vec![assign_at(25)], vec![assign_at(27)]);
    let if2 = if_stmt(sp(22, 27), vec![assign_at(23)], vec![if3]);
    let if1 = if_stmt(sp(20, 27), vec![assign_at(21)], vec![if2]);
    let module = run(module_with(vec![always(sp(19, 28), vec![if1])]));

    assert!(decls_on_page(&module, "v_branch").is_empty());

    let lines: Vec<_> = decls_on_page(&module, "v_line")
        .iter()
        .filter(|d| d.comment == "elsif")
        .map(|d| d.linescov.clone())
        .collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.contains(&"21".to_string()));
    assert!(lines.contains(&"23".to_string()));
    assert!(lines.contains(&"25".to_string()));

    let elses: Vec<_> = decls_on_page(&module, "v_line")
        .iter()
        .filter(|d| d.comment == "else")
        .map(|d| d.linescov.clone())
        .collect();
    assert_eq!(elses, vec!["27".to_string()]);
}

#[test]
fn test_if_without_else_still_two_legged() {
    // A missing else arm is still a live (empty) leg
    let module = run(module_with(vec![always(
        sp(10, 11),
        vec![if_stmt(sp(10, 11), vec![assign_at(11)], vec![])],
    )]));

    let branches = decls_on_page(&module, "v_branch");
    assert_eq!(branches.len(), 2);

    let iff = first_if(&module);
    let else_incs = incs(&iff.else_stmts);
    assert_eq!(else_incs.len(), 1);
    let else_decl = decl_of(&module, else_incs[0]);
    assert_eq!(else_decl.comment, "else");
    assert_eq!(else_decl.linescov, "");
}

#[test]
fn test_stop_in_then_arm_downgrades_to_half() {
    let module = run(module_with(vec![always(
        sp(10, 13),
        vec![if_stmt(
            sp(10, 13),
            vec![assign_at(11), Stmt::Stop(Stop { span: at(12) })],
            vec![assign_at(13)],
        )],
    )]));

    assert!(decls_on_page(&module, "v_branch").is_empty());

    let iff = first_if(&module);
    assert!(incs(&iff.then_stmts).is_empty());

    let else_incs = incs(&iff.else_stmts);
    assert_eq!(else_incs.len(), 1);
    let else_decl = decl_of(&module, else_incs[0]);
    assert_eq!(else_decl.page, "v_line/dut");
    assert_eq!(else_decl.comment, "else");
    assert_eq!(else_decl.linescov, "13");
    assert_eq!(else_decl.offset, 1);
}

#[test]
fn test_line_option_off_emits_nothing() {
    let opts = CoverageOptions {
        line: false,
        ..CoverageOptions::default()
    };
    let module = run_with(
        module_with(vec![always(
            sp(10, 12),
            vec![if_stmt(sp(10, 12), vec![assign_at(11)], vec![assign_at(12)])],
        )]),
        &opts,
    );

    assert!(decls(&module).is_empty());
    let iff = first_if(&module);
    assert!(incs(&iff.then_stmts).is_empty());
    assert!(incs(&iff.else_stmts).is_empty());
}
