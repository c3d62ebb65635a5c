//! GALENA coverage - coverage instrumentation pass
//!
//! At each procedure, if/else, and case item: if coverage is still on for
//! the block (no off-pragma, no `$stop` above it), insert a
//! coverage-declaration node in the module and a coverage-increment node at
//! the end of the block's statement list. Eligible signals additionally get
//! one toggle-check node per scalar bit, with a shadow variable holding the
//! previous value. Downstream emit passes re-encode the declarations into
//! per-module tables; this pass only rewrites the tree.

pub mod error;
pub mod options;

mod emit;
mod instrument;
mod line_map;
mod toggle;

pub use error::{CoverageError, Result};
pub use options::CoverageOptions;

use galena_ast::Design;
use instrument::CoverageVisitor;
use tracing::debug;

/// Instrument a whole design in place
///
/// Walks every module, attaching coverage declarations, increments, toggle
/// checks, and (when enabled) trace counters. Which families are emitted is
/// controlled by `opts`; with everything disabled the walk is a no-op.
pub fn coverage(design: &mut Design, opts: &CoverageOptions) -> Result<()> {
    debug!("coverage: instrumenting design '{}'", design.name);
    let mut next_cover_id = 0;
    for module in &mut design.modules {
        let mut visitor = CoverageVisitor::new(opts, module, next_cover_id);
        visitor.visit_stmts(&mut module.stmts)?;
        let (synthesized, next_id) = visitor.finish();
        module.stmts.extend(synthesized);
        next_cover_id = next_id;
    }
    Ok(())
}
