//! Coverage instrumentation visitor
//!
//! Walks one module at a time, keeping a save/restored scope state that
//! says whether coverage is live. At each procedure, if/else arm, and case
//! item a fresh line-tracking handle is opened; when the scope closes, the
//! accumulated lines become a descriptor/increment pair attached to that
//! scope's statement list. Signal declarations reaching this visitor in a
//! toggle-eligible position fan out through the toggle expander.

use crate::emit::Emitter;
use crate::error::Result;
use crate::line_map::LineMap;
use crate::options::CoverageOptions;
use crate::toggle;
use galena_ast::{
    Begin, CaseItem, CaseStmt, CoverPoint, IfStmt, Module, PragmaKind, SourceSpan, Stmt, Var,
};
use tracing::{debug, trace};

/// State saved and restored on each new coverage scope
#[derive(Debug, Clone)]
pub(crate) struct CheckState {
    /// Whether this block should get covered
    pub on: bool,
    /// Enclosing module opts out of coverage (the synthesized top shell)
    pub in_mod_off: bool,
    /// Handle indexing into line tracking
    pub handle: u32,
    /// Span pinning this scope's home file; only lines from that file are
    /// tracked
    pub anchor: SourceSpan,
}

impl CheckState {
    pub fn line_coverage_on(&self, opts: &CoverageOptions) -> bool {
        self.on && !self.in_mod_off && opts.line
    }
}

/// Per-module instrumentation walk
pub(crate) struct CoverageVisitor<'a> {
    opts: &'a CoverageOptions,
    /// Scope state, saved/restored at every block-introducing node
    state: CheckState,
    line_map: LineMap,
    emitter: Emitter,
    /// Inside a procedure/task/begin, where declarations are locals
    in_toggle_off: bool,
    /// Dotted names of enclosing named sub-blocks
    begin_hier: String,
    /// One-shot marker set on the way into an elsif's else arm and consumed
    /// by the nested if
    elsif_cont: bool,
}

impl<'a> CoverageVisitor<'a> {
    pub fn new(opts: &'a CoverageOptions, module: &Module, first_cover_id: u32) -> Self {
        let mut line_map = LineMap::new();
        let handle = line_map.create_handle();
        Self {
            opts,
            state: CheckState {
                on: true,
                in_mod_off: module.is_top,
                handle,
                anchor: module.span.clone(),
            },
            line_map,
            emitter: Emitter::new(module, first_cover_id),
            in_toggle_off: false,
            begin_hier: String::new(),
            elsif_cont: false,
        }
    }

    /// Synthesized module items and the next free descriptor id
    pub fn finish(self) -> (Vec<Stmt>, u32) {
        self.emitter.finish()
    }

    /// Open a fresh line-tracking handle anchored at `span`
    ///
    /// An if and its else get separate handles for the same node, so the
    /// handle cannot live on the node itself.
    fn create_handle(&mut self, span: &SourceSpan) {
        self.state.handle = self.line_map.create_handle();
        self.state.anchor = span.clone();
        trace!("line handle h{} at {}", self.state.handle, span.display());
    }

    /// Record a statement's full line range against the current handle
    fn line_track(&mut self, span: &SourceSpan) {
        if self.state.line_coverage_on(self.opts) && self.state.anchor.same_file(span) {
            self.line_map.track(self.state.handle, span.line, span.end_line);
        }
    }

    /// Record only a construct's header line against the current handle
    ///
    /// Block-introducing statements span their whole body; tracking the
    /// full range would re-attribute lines that an inner `$stop` or
    /// off-pragma already suppressed.
    fn line_track_header(&mut self, span: &SourceSpan) {
        if self.state.line_coverage_on(self.opts) && self.state.anchor.same_file(span) {
            self.line_map.track(self.state.handle, span.line, span.line);
        }
    }

    pub fn visit_stmts(&mut self, stmts: &mut Vec<Stmt>) -> Result<()> {
        let mut i = 0;
        while i < stmts.len() {
            if let Stmt::Pragma(p) = &stmts[i] {
                if p.kind == PragmaKind::CoverageBlockOff {
                    // Coverage stays off for the rest of this block; the
                    // pragma itself must not survive into later passes
                    debug!("coverage off at {}", p.span.display());
                    self.state.on = false;
                    stmts.remove(i);
                    continue;
                }
            }
            self.visit_stmt(&mut stmts[i])?;
            i += 1;
        }
        Ok(())
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) -> Result<()> {
        match stmt {
            Stmt::VarDecl(var) => self.visit_var(var),
            Stmt::Process(p) => {
                let span = p.span.clone();
                self.iterate_procedure(&span, &mut p.stmts)
            }
            Stmt::Task(t) => {
                if t.is_import {
                    // Foreign bodies cannot be instrumented
                    Ok(())
                } else {
                    let span = t.span.clone();
                    self.iterate_procedure(&span, &mut t.stmts)
                }
            }
            Stmt::While(w) => {
                let span = w.span.clone();
                self.iterate_procedure(&span, &mut w.stmts)
            }
            Stmt::Begin(b) => self.visit_begin(b),
            Stmt::If(i) => self.visit_if(i),
            Stmt::Case(c) => self.visit_case(c),
            Stmt::Cover(cp) => self.visit_cover(cp),
            Stmt::Stop(s) => {
                // The stop itself still counts; everything after it in this
                // scope is unreachable under normal runs
                self.line_track(&s.span);
                debug!("stop at {}", s.span.display());
                self.state.on = false;
                Ok(())
            }
            Stmt::Pragma(p) => {
                self.line_track(&p.span);
                Ok(())
            }
            Stmt::Assign(a) => {
                self.line_track(&a.span);
                Ok(())
            }
            Stmt::CoverDecl(_) | Stmt::CoverInc(_) | Stmt::CoverToggle(_) => Ok(()),
        }
    }

    /// Procedure bodies, loop bodies, and task bodies: own handle, one
    /// `block` descriptor on exit
    fn iterate_procedure(&mut self, span: &SourceSpan, stmts: &mut Vec<Stmt>) -> Result<()> {
        let saved_state = self.state.clone();
        let saved_toggle = self.in_toggle_off;
        self.in_toggle_off = true;

        self.create_handle(span);
        let entry = self.state.clone();
        self.line_track_header(span);
        self.visit_stmts(stmts)?;

        // A $stop or off-pragma in the body stops line tracking but does
        // not cancel the block point; the line list is already truncated
        if entry.line_coverage_on(self.opts) {
            let linescov = self.line_map.lines_cov(entry.handle);
            let trace_name = self.emitter.trace_name_for_line(span, "block");
            let incs = self.emitter.cover_inc_stmts(
                self.opts,
                span,
                "",
                "v_line",
                "block",
                linescov,
                0,
                Some(trace_name),
            );
            stmts.extend(incs);
        }

        self.in_toggle_off = saved_toggle;
        self.state = saved_state;
        Ok(())
    }

    // Note not every conditional: only two-legged ifs get covered
    fn visit_if(&mut self, nodep: &mut IfStmt) -> Result<()> {
        // An enclosing elsif chain marks its nested if before descending
        let was_marked = std::mem::take(&mut self.elsif_cont);
        let span = nodep.span.clone();

        // The header line belongs to the enclosing block; the arms show
        // only what is inside them
        self.line_track_header(&span);

        let elsif = !nodep.then_stmts.is_empty()
            && nodep.else_stmts.len() == 1
            && matches!(nodep.else_stmts[0], Stmt::If(_));
        let first_elsif = !was_marked && elsif;
        let cont_elsif = was_marked && elsif;
        let final_elsif = was_marked && !elsif && !nodep.else_stmts.is_empty();

        let last_state = self.state.clone();
        self.create_handle(&span);
        self.visit_stmts(&mut nodep.then_stmts)?;
        let if_state = self.state.clone();
        self.state = last_state.clone();

        self.create_handle(&span);
        if elsif {
            self.elsif_cont = true;
        }
        self.visit_stmts(&mut nodep.else_stmts)?;
        let else_state = self.state.clone();
        self.state = last_state;

        let if_on = if_state.line_coverage_on(self.opts);
        let else_on = else_state.line_coverage_on(self.opts);

        if !(first_elsif || cont_elsif || final_elsif) && if_on && else_on {
            // Normal two-legged if: branch coverage on what is inside each
            // arm (the condition executes either way)
            debug!("branch cover at {}", span.display());
            let linescov = self.line_map.lines_cov(if_state.handle);
            let trace_name = self.emitter.trace_name_for_line(&span, "if");
            let incs = self.emitter.cover_inc_stmts(
                self.opts,
                &span,
                "",
                "v_branch",
                "if",
                linescov,
                0,
                Some(trace_name),
            );
            nodep.then_stmts.extend(incs);

            // Column offset 1 uniquifies the else against the if; "if" and
            // "else" are wider than one column, so no other token can
            // collide
            let linescov = self.line_map.lines_cov(else_state.handle);
            let trace_name = self.emitter.trace_name_for_line(&span, "else");
            let incs = self.emitter.cover_inc_stmts(
                self.opts,
                &span,
                "",
                "v_branch",
                "else",
                linescov,
                1,
                Some(trace_name),
            );
            nodep.else_stmts.extend(incs);
        } else if first_elsif || cont_elsif {
            debug!("elsif cover at {}", span.display());
            if if_on {
                let linescov = self.line_map.lines_cov(if_state.handle);
                let trace_name = self.emitter.trace_name_for_line(&span, "elsif");
                let incs = self.emitter.cover_inc_stmts(
                    self.opts,
                    &span,
                    "",
                    "v_line",
                    "elsif",
                    linescov,
                    0,
                    Some(trace_name),
                );
                nodep.then_stmts.extend(incs);
            }
            // No else insertion: the nested if covers itself
        } else {
            // Lopsided or chain-terminal if: separate half blocks, as this
            // is not a two-legged branch
            if if_on {
                let comment = if was_marked { "elsif" } else { "if" };
                debug!("half cover ({}) at {}", comment, span.display());
                let linescov = self.line_map.lines_cov(if_state.handle);
                let trace_name = self.emitter.trace_name_for_line(&span, comment);
                let incs = self.emitter.cover_inc_stmts(
                    self.opts,
                    &span,
                    "",
                    "v_line",
                    comment,
                    linescov,
                    0,
                    Some(trace_name),
                );
                nodep.then_stmts.extend(incs);
            }
            if else_on {
                debug!("half cover (else) at {}", span.display());
                let linescov = self.line_map.lines_cov(else_state.handle);
                let trace_name = self.emitter.trace_name_for_line(&span, "else");
                let incs = self.emitter.cover_inc_stmts(
                    self.opts,
                    &span,
                    "",
                    "v_line",
                    "else",
                    linescov,
                    1,
                    Some(trace_name),
                );
                nodep.else_stmts.extend(incs);
            }
        }
        Ok(())
    }

    fn visit_case(&mut self, nodep: &mut CaseStmt) -> Result<()> {
        let span = nodep.span.clone();
        self.line_track_header(&span);
        for item in &mut nodep.items {
            self.visit_case_item(item)?;
        }
        Ok(())
    }

    // No synthesized coverage for a missing default: its absence already
    // warns elsewhere
    fn visit_case_item(&mut self, item: &mut CaseItem) -> Result<()> {
        let span = item.span.clone();
        let saved_state = self.state.clone();

        self.create_handle(&span);
        self.line_track_header(&span);
        self.visit_stmts(&mut item.stmts)?;

        // Only if the item body didn't disable it
        if self.state.line_coverage_on(self.opts) {
            debug!("case cover at {}", span.display());
            let linescov = self.line_map.lines_cov(self.state.handle);
            let trace_name = self.emitter.trace_name_for_line(&span, "case");
            let incs = self.emitter.cover_inc_stmts(
                self.opts,
                &span,
                "",
                "v_line",
                "case",
                linescov,
                0,
                Some(trace_name),
            );
            item.stmts.extend(incs);
        }

        self.state = saved_state;
        Ok(())
    }

    fn visit_cover(&mut self, nodep: &mut CoverPoint) -> Result<()> {
        let span = nodep.span.clone();
        let saved_state = self.state.clone();

        // Cover blocks always fire, even after a $stop
        self.state.on = true;
        self.create_handle(&span);

        if nodep.incs.is_empty() && self.opts.user {
            // Later assertion processing may rename the point
            self.line_track(&span);
            debug!("user cover '{}' hier '{}'", nodep.name, self.begin_hier);
            let linescov = self.line_map.lines_cov(self.state.handle);
            let hier = self.begin_hier.clone();
            let trace_name = format!("{}_vlCoverageUserTrace", self.begin_hier);
            let incs = self.emitter.cover_inc_stmts(
                self.opts,
                &span,
                &hier,
                "v_user",
                "cover",
                linescov,
                0,
                Some(trace_name),
            );
            nodep.incs.extend(incs);
        }

        self.state = saved_state;
        Ok(())
    }

    // Named begins extend the hierarchy used to tell apart user coverage
    // points inside generate blocks. Line coverage ignores the hierarchy:
    // any generate iteration covers the line.
    fn visit_begin(&mut self, nodep: &mut Begin) -> Result<()> {
        let span = nodep.span.clone();
        let saved_hier = self.begin_hier.clone();
        let saved_toggle = self.in_toggle_off;
        self.in_toggle_off = true;

        if let Some(name) = &nodep.name {
            if !self.begin_hier.is_empty() {
                self.begin_hier.push('.');
            }
            self.begin_hier.push_str(name);
        }
        self.line_track_header(&span);
        self.visit_stmts(&mut nodep.stmts)?;

        self.in_toggle_off = saved_toggle;
        self.begin_hier = saved_hier;
        Ok(())
    }

    fn visit_var(&mut self, nodep: &mut Var) -> Result<()> {
        if self.in_toggle_off || self.state.in_mod_off || !self.opts.toggle {
            return Ok(());
        }
        if let Some(reason) = toggle::var_ignore_toggle(nodep, self.opts) {
            debug!("toggle skip '{}': {}", nodep.name, reason);
            return Ok(());
        }
        debug!("toggle cover '{}'", nodep.name);
        toggle::expand_var(nodep, &mut self.emitter)
    }
}
