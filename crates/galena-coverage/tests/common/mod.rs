//! Shared netlist builders and tree inspection helpers
#![allow(dead_code)]

use galena_ast::{
    Assign, AssignKind, CoverDecl, CoverInc, CoverToggle, DataType, Design, Expr, IfStmt, Module,
    Process, ProcessKind, SourceSpan, Stmt, Var, VarKind,
};
use galena_coverage::{coverage, CoverageOptions};

pub const FILE: &str = "dut.v";

pub fn sp(first: u32, last: u32) -> SourceSpan {
    SourceSpan::new(FILE, first, last)
}

pub fn at(line: u32) -> SourceSpan {
    SourceSpan::on_line(FILE, line)
}

/// A one-line blocking assignment `a = 1`
pub fn assign_at(line: u32) -> Stmt {
    Stmt::Assign(Assign {
        lhs: Expr::var_write("a"),
        rhs: Expr::uint(32, 1),
        kind: AssignKind::Blocking,
        span: at(line),
    })
}

pub fn always(span: SourceSpan, stmts: Vec<Stmt>) -> Stmt {
    Stmt::Process(Process {
        kind: ProcessKind::Always,
        span,
        stmts,
    })
}

pub fn if_stmt(span: SourceSpan, then_stmts: Vec<Stmt>, else_stmts: Vec<Stmt>) -> Stmt {
    Stmt::If(IfStmt {
        cond: Expr::var_read("c"),
        span,
        then_stmts,
        else_stmts,
    })
}

pub fn wire(name: &str, dtype: DataType, line: u32) -> Stmt {
    Stmt::VarDecl(Var::new(name, VarKind::Wire, dtype, at(line)))
}

pub fn module_with(stmts: Vec<Stmt>) -> Module {
    let mut module = Module::new("dut", sp(1, 100));
    module.stmts = stmts;
    module
}

/// Run the pass over one module with default options
pub fn run(module: Module) -> Module {
    run_with(module, &CoverageOptions::default())
}

pub fn run_with(module: Module, opts: &CoverageOptions) -> Module {
    let mut design = Design::new("bench");
    design.modules.push(module);
    coverage(&mut design, opts).expect("coverage pass failed");
    design.modules.pop().unwrap()
}

/// All descriptors attached to the module
pub fn decls(module: &Module) -> Vec<&CoverDecl> {
    module
        .stmts
        .iter()
        .filter_map(|s| match s {
            Stmt::CoverDecl(d) => Some(d),
            _ => None,
        })
        .collect()
}

/// Descriptors whose page starts with the given prefix
pub fn decls_on_page<'m>(module: &'m Module, prefix: &str) -> Vec<&'m CoverDecl> {
    decls(module)
        .into_iter()
        .filter(|d| d.page.starts_with(prefix))
        .collect()
}

/// The descriptor an increment samples into
pub fn decl_of<'m>(module: &'m Module, inc: &CoverInc) -> &'m CoverDecl {
    decls(module)
        .into_iter()
        .find(|d| d.id == inc.decl)
        .expect("increment without a matching declaration")
}

/// Increments directly inside a statement list
pub fn incs(stmts: &[Stmt]) -> Vec<&CoverInc> {
    stmts
        .iter()
        .filter_map(|s| match s {
            Stmt::CoverInc(i) => Some(i),
            _ => None,
        })
        .collect()
}

/// Toggle checks attached to the module
pub fn toggles(module: &Module) -> Vec<&CoverToggle> {
    module
        .stmts
        .iter()
        .filter_map(|s| match s {
            Stmt::CoverToggle(t) => Some(t),
            _ => None,
        })
        .collect()
}

/// A declaration by name, if present
pub fn var_decl<'m>(module: &'m Module, name: &str) -> Option<&'m Var> {
    module.stmts.iter().find_map(|s| match s {
        Stmt::VarDecl(v) if v.name == name => Some(v),
        _ => None,
    })
}
