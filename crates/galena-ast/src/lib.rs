//! GALENA AST - Elaborated netlist representation
//!
//! This crate carries the netlist as middle-end passes see it:
//! - Flat module list with mixed statement bodies
//! - Concrete, parameter-free data types
//! - Source spans on every node
//!
//! Passes mutate the tree in place; synthesized nodes are regular members of
//! the same enums as parsed ones.

pub mod ast;
pub mod dtype;
pub mod span;

// Re-export main types
pub use ast::{
    Access, Assign, AssignKind, Begin, BinaryOp, CaseItem, CaseStmt, CoverDecl, CoverId, CoverInc,
    CoverPoint, CoverToggle, Design, Expr, IfStmt, Module, Pragma, PragmaKind, Process,
    ProcessKind, Stmt, Stop, Task, Var, VarKind, WhileLoop,
};
pub use dtype::{DataType, StructMember, StructType, UnionType};
pub use span::SourceSpan;
