//! Source span types for the elaborated netlist
//!
//! Every netlist node carries a span naming the file it came from and the
//! inclusive line range it occupies. Coverage attribution and trace-variable
//! naming both key off these spans.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source location of a netlist node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    /// File path (if available)
    pub file: Option<PathBuf>,
    /// First line (1-indexed)
    pub line: u32,
    /// Last line (inclusive)
    pub end_line: u32,
}

impl SourceSpan {
    /// Create a span covering an inclusive line range
    pub fn new(file: impl Into<PathBuf>, line: u32, end_line: u32) -> Self {
        Self {
            file: Some(file.into()),
            line,
            end_line,
        }
    }

    /// Create a span covering a single line
    pub fn on_line(file: impl Into<PathBuf>, line: u32) -> Self {
        Self::new(file, line, line)
    }

    /// Whether two spans name the same source file
    ///
    /// Spans with no file attached never match anything, including each
    /// other.
    pub fn same_file(&self, other: &SourceSpan) -> bool {
        match (&self.file, &other.file) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// File base name without extension, for generated identifier synthesis
    pub fn file_basename_no_ext(&self) -> String {
        self.file
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Format as "file:line" for log messages
    pub fn display(&self) -> String {
        let file_str = self
            .file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        format!("{}:{}", file_str, self.line)
    }
}

impl Default for SourceSpan {
    fn default() -> Self {
        Self {
            file: None,
            line: 1,
            end_line: 1,
        }
    }
}
