//! Elaborated netlist nodes
//!
//! The netlist as it stands after elaboration: modules are flat (no nested
//! module definitions), parameters are resolved, and every node carries its
//! source span. Module statement lists mix declarations, processes, and
//! instrumentation nodes; passes that synthesize nodes append to them.

use crate::dtype::DataType;
use crate::span::SourceSpan;
use serde::{Deserialize, Serialize};

/// Netlist root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Design {
    /// Design name
    pub name: String,
    /// Elaborated modules
    pub modules: Vec<Module>,
}

impl Design {
    /// Create an empty design
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modules: Vec::new(),
        }
    }
}

/// A hardware module (or class scope)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// Module name; parameterized instances carry their suffix here
    pub name: String,
    /// Whether this is the synthesized top-level shell
    pub is_top: bool,
    /// Whether this scope is a class rather than a module
    pub is_class: bool,
    /// Source span
    pub span: SourceSpan,
    /// Body: declarations, processes, and synthesized nodes
    pub stmts: Vec<Stmt>,
}

impl Module {
    /// Create an empty module
    pub fn new(name: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            name: name.into(),
            is_top: false,
            is_class: false,
            span,
            stmts: Vec::new(),
        }
    }
}

/// Statement or module-body item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stmt {
    /// Variable or signal declaration
    VarDecl(Var),
    /// Process block (always/initial/final)
    Process(Process),
    /// Task or function
    Task(Task),
    /// Named or unnamed sub-block
    Begin(Begin),
    /// Two-legged conditional
    If(IfStmt),
    /// Case statement
    Case(CaseStmt),
    /// While loop
    While(WhileLoop),
    /// Assignment
    Assign(Assign),
    /// User cover statement
    Cover(CoverPoint),
    /// Simulation stop ($stop and friends)
    Stop(Stop),
    /// Source pragma
    Pragma(Pragma),
    /// Coverage point descriptor (synthesized)
    CoverDecl(CoverDecl),
    /// Coverage increment (synthesized)
    CoverInc(CoverInc),
    /// Toggle-coverage check (synthesized)
    CoverToggle(CoverToggle),
}

impl Stmt {
    /// Source span of this statement
    pub fn span(&self) -> &SourceSpan {
        match self {
            Stmt::VarDecl(n) => &n.span,
            Stmt::Process(n) => &n.span,
            Stmt::Task(n) => &n.span,
            Stmt::Begin(n) => &n.span,
            Stmt::If(n) => &n.span,
            Stmt::Case(n) => &n.span,
            Stmt::While(n) => &n.span,
            Stmt::Assign(n) => &n.span,
            Stmt::Cover(n) => &n.span,
            Stmt::Stop(n) => &n.span,
            Stmt::Pragma(n) => &n.span,
            Stmt::CoverDecl(n) => &n.span,
            Stmt::CoverInc(n) => &n.span,
            Stmt::CoverToggle(n) => &n.span,
        }
    }
}

/// Variable or signal declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Var {
    /// Declared name; inlined hierarchy appears as `a.b`
    pub name: String,
    /// Declaration kind
    pub kind: VarKind,
    /// Declared type
    pub dtype: DataType,
    /// Source span
    pub span: SourceSpan,
    /// Whether the variable participates in waveform tracing
    pub trace: bool,
    /// Suppress unused-signal warnings for this declaration
    pub unused_ok: bool,
}

impl Var {
    /// Create a declaration with default flags
    pub fn new(name: impl Into<String>, kind: VarKind, dtype: DataType, span: SourceSpan) -> Self {
        Self {
            name: name.into(),
            kind,
            dtype,
            span,
            trace: false,
            unused_ok: false,
        }
    }
}

/// Kind of a declared variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    Input,
    Output,
    Inout,
    Wire,
    Logic,
    /// Compiler-synthesized module temporary
    ModuleTemp,
    Parameter,
    Genvar,
}

impl VarKind {
    /// Whether declarations of this kind carry runtime signal state worth
    /// toggle-covering
    pub fn is_toggle_coverable(&self) -> bool {
        matches!(
            self,
            VarKind::Input | VarKind::Output | VarKind::Inout | VarKind::Wire | VarKind::Logic
        )
    }
}

/// Process block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    /// Process kind
    pub kind: ProcessKind,
    /// Source span
    pub span: SourceSpan,
    /// Body
    pub stmts: Vec<Stmt>,
}

/// Kind of process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessKind {
    Always,
    AlwaysComb,
    Initial,
    Final,
}

/// Task or function definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Name
    pub name: String,
    /// Whether the body is a foreign (DPI) import
    pub is_import: bool,
    /// Source span
    pub span: SourceSpan,
    /// Body
    pub stmts: Vec<Stmt>,
}

/// Named or unnamed sub-block, including named generate blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Begin {
    /// Block name; `None` for unnamed blocks
    pub name: Option<String>,
    /// Source span
    pub span: SourceSpan,
    /// Body
    pub stmts: Vec<Stmt>,
}

/// Two-legged conditional
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IfStmt {
    /// Condition
    pub cond: Expr,
    /// Source span
    pub span: SourceSpan,
    /// Then arm (empty when absent)
    pub then_stmts: Vec<Stmt>,
    /// Else arm (empty when absent)
    pub else_stmts: Vec<Stmt>,
}

/// Case statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseStmt {
    /// Selector expression
    pub expr: Expr,
    /// Source span
    pub span: SourceSpan,
    /// Items, including a default item if present
    pub items: Vec<CaseItem>,
}

/// One arm of a case statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseItem {
    /// Match values; empty for the default item
    pub conds: Vec<Expr>,
    /// Source span
    pub span: SourceSpan,
    /// Body
    pub stmts: Vec<Stmt>,
}

/// While loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhileLoop {
    /// Loop condition
    pub cond: Expr,
    /// Source span
    pub span: SourceSpan,
    /// Body
    pub stmts: Vec<Stmt>,
}

/// Assignment statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assign {
    /// Left-hand side
    pub lhs: Expr,
    /// Right-hand side
    pub rhs: Expr,
    /// Blocking or non-blocking
    pub kind: AssignKind,
    /// Source span
    pub span: SourceSpan,
}

/// Assignment kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignKind {
    Blocking,
    NonBlocking,
}

/// User cover statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverPoint {
    /// Point name from the source
    pub name: String,
    /// Source span
    pub span: SourceSpan,
    /// Attached increments (filled by instrumentation)
    pub incs: Vec<Stmt>,
}

/// Simulation stop statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stop {
    /// Source span
    pub span: SourceSpan,
}

/// Source pragma
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pragma {
    /// Pragma kind
    pub kind: PragmaKind,
    /// Source span
    pub span: SourceSpan,
}

/// Pragma kinds surviving into the netlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PragmaKind {
    /// Disable coverage for the remainder of the enclosing block
    CoverageBlockOff,
    FullCase,
    ParallelCase,
    PublicModule,
}

/// Identifier tying a coverage increment to its descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoverId(pub u32);

/// Static descriptor for one coverage point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverDecl {
    /// Descriptor identifier
    pub id: CoverId,
    /// Report page, `prefix/module`
    pub page: String,
    /// Point comment ("block", "if", signal path, ...)
    pub comment: String,
    /// Covered lines as comma-separated inclusive ranges
    pub linescov: String,
    /// Column offset disambiguating same-line points
    pub offset: u32,
    /// Hierarchy of enclosing named blocks
    pub hier: String,
    /// Source span
    pub span: SourceSpan,
}

/// Runtime increment of one coverage point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverInc {
    /// Descriptor this increment samples into
    pub decl: CoverId,
    /// Source span
    pub span: SourceSpan,
}

/// Per-bit toggle check: increments when value and shadow differ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverToggle {
    /// Increment fired on a toggle
    pub inc: CoverInc,
    /// Access path to the covered bit
    pub value: Expr,
    /// Access path to the shadow (previous-value) bit
    pub change: Expr,
    /// Source span
    pub span: SourceSpan,
}

/// Expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    /// Variable reference
    VarRef {
        /// Referenced declaration name
        name: String,
        /// Read or write side
        access: Access,
    },
    /// Unsigned literal
    Const { width: u32, value: u64 },
    /// Bit-slice of a packed base: `width` bits starting at `lsb`
    BitSel {
        base: Box<Expr>,
        lsb: u32,
        width: u32,
    },
    /// Unpacked-array element select (zero-based element index)
    ArraySel { base: Box<Expr>, index: i32 },
    /// Unpacked-struct member select
    StructSel { base: Box<Expr>, member: String },
    /// Binary operation
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// Reference direction of a variable access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Access {
    Read,
    Write,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Eq,
    Ne,
    And,
    Or,
}

impl Expr {
    /// Read reference to a named variable
    pub fn var_read(name: impl Into<String>) -> Self {
        Expr::VarRef {
            name: name.into(),
            access: Access::Read,
        }
    }

    /// Write reference to a named variable
    pub fn var_write(name: impl Into<String>) -> Self {
        Expr::VarRef {
            name: name.into(),
            access: Access::Write,
        }
    }

    /// Unsigned literal of the given width
    pub fn uint(width: u32, value: u64) -> Self {
        Expr::Const { width, value }
    }

    /// Bit-slice of `base`
    pub fn bit_sel(base: Expr, lsb: u32, width: u32) -> Self {
        Expr::BitSel {
            base: Box::new(base),
            lsb,
            width,
        }
    }

    /// Unpacked-array element select
    pub fn array_sel(base: Expr, index: i32) -> Self {
        Expr::ArraySel {
            base: Box::new(base),
            index,
        }
    }

    /// Unpacked-struct member select
    pub fn struct_sel(base: Expr, member: impl Into<String>) -> Self {
        Expr::StructSel {
            base: Box::new(base),
            member: member.into(),
        }
    }

    /// Addition
    pub fn add(lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op: BinaryOp::Add,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}
