//! Toggle-coverage expansion
//!
//! Decomposes a signal's declared type into one toggle check per scalar
//! bit. Each leaf carries a human-readable access path (`sig.field[3]`) and
//! a pair of access expressions: one into the signal, one into its shadow
//! "previous value" companion. A later pass assembles the actual
//! `if (x != last_x)` detection from the emitted nodes.

use crate::emit::Emitter;
use crate::error::{CoverageError, Result};
use crate::options::CoverageOptions;
use galena_ast::{CoverToggle, DataType, Expr, Stmt, Var, VarKind};

/// Why a signal is excluded from toggle coverage, if it is
pub(crate) fn var_ignore_toggle(var: &Var, opts: &CoverageOptions) -> Option<&'static str> {
    // See also the similar rule for trace declarations
    if !var.kind.is_toggle_coverable() {
        return Some("not a relevant signal type");
    }
    if !opts.underscore {
        if var.name.starts_with('_') {
            return Some("leading underscore");
        }
        if var.name.contains("._") {
            return Some("inlined leading underscore");
        }
    }
    if var.dtype.width() * var.dtype.unpacked_elements() > opts.max_width {
        return Some("wide bus/array over the coverage max-width setting");
    }
    None
}

/// Access paths to one sub-element of the signal under expansion
#[derive(Debug, Clone)]
struct ToggleEnt {
    /// Accumulated path for the coverage comment
    comment: String,
    /// How to get to this element of the signal
    value: Expr,
    /// How to get to this element of the shadow variable
    change: Expr,
}

/// Add the shadow variable for an eligible signal and emit one toggle
/// check per scalar bit
pub(crate) fn expand_var(var: &Var, emitter: &mut Emitter) -> Result<()> {
    // Shadow of identical type holding the previous value
    let shadow_name = format!("__Vtogcov__{}", var.name.replace('.', "__"));
    let mut shadow = Var::new(
        shadow_name.as_str(),
        VarKind::ModuleTemp,
        var.dtype.clone(),
        var.span.clone(),
    );
    shadow.unused_ok = true;
    emitter.add_stmt(Stmt::VarDecl(shadow));

    // One bucket per dimension * bit: a quadratic expansion, which is why
    // eligibility is capped by max width
    let root = ToggleEnt {
        comment: String::new(),
        value: Expr::var_read(var.name.as_str()),
        change: Expr::var_write(shadow_name.as_str()),
    };
    ToggleExpander { emitter, var }.expand(&var.dtype, &root)
}

struct ToggleExpander<'a> {
    emitter: &'a mut Emitter,
    var: &'a Var,
}

impl ToggleExpander<'_> {
    fn expand(&mut self, dtype: &DataType, above: &ToggleEnt) -> Result<()> {
        match dtype {
            DataType::Bit => {
                self.leaf(above.clone());
                Ok(())
            }
            DataType::Ranged { msb, lsb } => {
                let lo = (*msb).min(*lsb);
                let hi = (*msb).max(*lsb);
                for index in lo..=hi {
                    let bit = (index - lo) as u32;
                    self.leaf(ToggleEnt {
                        comment: format!("{}[{}]", above.comment, index),
                        value: Expr::bit_sel(above.value.clone(), bit, 1),
                        change: Expr::bit_sel(above.change.clone(), bit, 1),
                    });
                }
                Ok(())
            }
            DataType::UnpackedArray { elem, lo, hi } => {
                for index in *lo..=*hi {
                    let ent = ToggleEnt {
                        comment: format!("{}[{}]", above.comment, index),
                        value: Expr::array_sel(above.value.clone(), index - lo),
                        change: Expr::array_sel(above.change.clone(), index - lo),
                    };
                    self.expand(elem, &ent)?;
                }
                Ok(())
            }
            DataType::PackedArray { elem, lo, hi } => {
                let width = elem.width();
                for index in *lo..=*hi {
                    let offset = (index - lo) as u32 * width;
                    let ent = ToggleEnt {
                        comment: format!("{}[{}]", above.comment, index),
                        value: Expr::bit_sel(above.value.clone(), offset, width),
                        change: Expr::bit_sel(above.change.clone(), offset, width),
                    };
                    self.expand(elem, &ent)?;
                }
                Ok(())
            }
            DataType::Struct(s) if s.packed => {
                let lsbs = s.member_lsbs();
                for (member, lsb) in s.members.iter().zip(lsbs) {
                    let width = member.dtype.width();
                    let ent = ToggleEnt {
                        comment: format!("{}.{}", above.comment, member.name),
                        value: Expr::bit_sel(above.value.clone(), lsb, width),
                        change: Expr::bit_sel(above.change.clone(), lsb, width),
                    };
                    self.expand(&member.dtype, &ent)?;
                }
                Ok(())
            }
            DataType::Struct(s) => {
                for member in &s.members {
                    let ent = ToggleEnt {
                        comment: format!("{}.{}", above.comment, member.name),
                        value: Expr::struct_sel(above.value.clone(), member.name.as_str()),
                        change: Expr::struct_sel(above.change.clone(), member.name.as_str()),
                    };
                    self.expand(&member.dtype, &ent)?;
                }
                Ok(())
            }
            DataType::Union(u) => {
                // Arbitrarily expand only the first member; the others
                // alias its storage
                if let Some(member) = u.members.first() {
                    let ent = ToggleEnt {
                        comment: format!("{}.{}", above.comment, member.name),
                        value: above.value.clone(),
                        change: above.change.clone(),
                    };
                    self.expand(&member.dtype, &ent)?;
                }
                Ok(())
            }
            DataType::Real | DataType::Str => Err(CoverageError::UnsupportedToggleType(format!(
                "{:?} under signal '{}'",
                dtype, self.var.name
            ))),
        }
    }

    /// Emit one toggle check for a scalar leaf
    fn leaf(&mut self, ent: ToggleEnt) {
        let span = self.var.span.clone();
        let comment = format!("{}{}", self.var.name, ent.comment);
        let inc = self
            .emitter
            .cover_inc(&span, "", "v_toggle", &comment, String::new(), 0);
        self.emitter.add_stmt(Stmt::CoverToggle(CoverToggle {
            inc,
            value: ent.value,
            change: ent.change,
            span,
        }));
    }
}
