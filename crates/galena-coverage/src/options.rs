//! Coverage pass configuration

use serde::{Deserialize, Serialize};

/// Which coverage families to instrument and how
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageOptions {
    /// Enable line and branch instrumentation
    pub line: bool,

    /// Enable per-bit toggle instrumentation
    pub toggle: bool,

    /// Enable user cover-point instrumentation
    pub user: bool,

    /// Keep signals whose names lead with an underscore (the filter is on
    /// by default)
    pub underscore: bool,

    /// Maximum `width * unpacked-elements` for toggle eligibility
    pub max_width: u32,

    /// Synthesize a traceable counter next to each line/branch increment
    pub trace_coverage: bool,
}

impl Default for CoverageOptions {
    fn default() -> Self {
        Self {
            line: true,
            toggle: true,
            user: true,
            underscore: false,
            max_width: 256,
            trace_coverage: false,
        }
    }
}
