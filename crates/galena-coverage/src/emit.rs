//! Instrumentation node synthesis
//!
//! Builds descriptor/increment pairs and the optional trace counters, and
//! buffers everything that belongs on the module's statement list until the
//! module walk finishes. Buffered nodes are flushed onto the module by the
//! visitor, so every synthesized subtree is owned by the netlist before the
//! pass returns.

use crate::options::CoverageOptions;
use galena_ast::{
    Assign, AssignKind, CoverDecl, CoverId, CoverInc, DataType, Expr, Module, SourceSpan, Stmt,
    Var, VarKind,
};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Per-module synthesis state
pub(crate) struct Emitter {
    /// Pretty name of the module under instrumentation
    module_name: String,
    /// Class scopes get no trace counters (no module handle to trace)
    module_is_class: bool,
    /// Nodes to append to the module's statement list at module exit
    pending: Vec<Stmt>,
    /// Next descriptor id
    next_id: u32,
    /// Collision counters for generated variable names
    var_names: HashMap<String, u32>,
}

impl Emitter {
    pub fn new(module: &Module, first_id: u32) -> Self {
        Self {
            module_name: module.name.clone(),
            module_is_class: module.is_class,
            pending: Vec::new(),
            next_id: first_id,
            var_names: HashMap::new(),
        }
    }

    /// Queue a node for the module's statement list
    pub fn add_stmt(&mut self, stmt: Stmt) {
        self.pending.push(stmt);
    }

    /// Build a descriptor and return an increment referring to it
    ///
    /// The descriptor is queued for the module; the increment is the
    /// caller's to attach.
    pub fn cover_inc(
        &mut self,
        span: &SourceSpan,
        hier: &str,
        page_prefix: &str,
        comment: &str,
        linescov: String,
        offset: u32,
    ) -> CoverInc {
        // Points are paged under the module using the code, not under the
        // file defining it, so include-file points land where they are used.
        // A parameterized module name keeps its suffix here, which counts
        // each parameterization separately.
        let page = format!("{}/{}", page_prefix, self.module_name);

        let id = CoverId(self.next_id);
        self.next_id += 1;
        trace!("new coverage decl {:?} {} '{}'", id, page, comment);
        self.pending.push(Stmt::CoverDecl(CoverDecl {
            id,
            page,
            comment: comment.to_string(),
            linescov,
            offset,
            hier: hier.to_string(),
            span: span.clone(),
        }));

        CoverInc {
            decl: id,
            span: span.clone(),
        }
    }

    /// Build an increment statement, chased by a `counter := counter + 1`
    /// trace assignment when trace coverage is enabled
    #[allow(clippy::too_many_arguments)]
    pub fn cover_inc_stmts(
        &mut self,
        opts: &CoverageOptions,
        span: &SourceSpan,
        hier: &str,
        page_prefix: &str,
        comment: &str,
        linescov: String,
        offset: u32,
        trace_name: Option<String>,
    ) -> Vec<Stmt> {
        let inc = self.cover_inc(span, hier, page_prefix, comment, linescov, offset);
        let mut stmts = vec![Stmt::CoverInc(inc)];

        if let Some(name) = trace_name {
            if opts.trace_coverage && !self.module_is_class {
                let mut counter = Var::new(
                    name.as_str(),
                    VarKind::ModuleTemp,
                    DataType::uint32(),
                    span.clone(),
                );
                counter.trace = true;
                counter.unused_ok = true;
                debug!("new coverage trace counter '{}'", name);
                self.pending.push(Stmt::VarDecl(counter));

                stmts.push(Stmt::Assign(Assign {
                    lhs: Expr::var_write(name.as_str()),
                    rhs: Expr::add(Expr::var_read(name.as_str()), Expr::uint(32, 1)),
                    kind: AssignKind::Blocking,
                    span: span.clone(),
                }));
            }
        }
        stmts
    }

    /// Trace counter name for a line-coverage point, unique per module
    pub fn trace_name_for_line(&mut self, span: &SourceSpan, tag: &str) -> String {
        let mut name = format!(
            "vlCoverageLineTrace_{}__{}_{}",
            span.file_basename_no_ext(),
            span.line,
            tag
        );
        let suffix = self.var_names.entry(name.clone()).or_insert(0);
        if *suffix > 0 {
            name = format!("{}_{}", name, suffix);
        }
        *suffix += 1;
        name
    }

    /// Hand back the buffered nodes and the next free descriptor id
    pub fn finish(self) -> (Vec<Stmt>, u32) {
        (self.pending, self.next_id)
    }
}
