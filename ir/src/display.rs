//! Text rendering of values and expressions.
//!
//! Iteration domains render as `<kind><placement><id>{<extent>}`, so a serial
//! iteration axis of extent 12 registered as value 3 prints `iS3{12}`; a
//! block-parallel reduction over a symbolic extent prints `rbx5{i2}`.

use std::fmt;

use itertools::Itertools;

use crate::{ExprId, ExprKind, Fusion, ScalarValue, ValId, ValKind};

/// Renders one value of a fusion.
#[derive(Clone, Copy)]
pub struct ValDisplay<'a> {
    fusion: &'a Fusion,
    id: ValId,
}

/// Renders one expression of a fusion.
#[derive(Clone, Copy)]
pub struct ExprDisplay<'a> {
    fusion: &'a Fusion,
    id: ExprId,
}

impl Fusion {
    pub fn display(&self, id: ValId) -> ValDisplay<'_> {
        ValDisplay { fusion: self, id }
    }

    pub fn display_expr(&self, id: ExprId) -> ExprDisplay<'_> {
        ExprDisplay { fusion: self, id }
    }
}

impl ValDisplay<'_> {
    fn list<'b>(&'b self, ids: &'b [ValId]) -> impl fmt::Display + 'b {
        ids.iter().map(|&id| self.fusion.display(id)).format(", ")
    }
}

impl fmt::Display for ValDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(val) = self.fusion.get_val(self.id) else {
            return write!(f, "<unknown {}>", self.id);
        };
        let idx = self.id.index();

        match val.kind() {
            ValKind::Scalar(scalar) => match scalar.value() {
                Some(ScalarValue::Double(v)) => write!(f, "{v:?}"),
                Some(value) => write!(f, "{value}"),
                None => {
                    let prefix = match val.dtype() {
                        d if d.is_bool() => 'b',
                        d if d.is_integral() => 'i',
                        d if d.is_complex() => 'c',
                        d if d.is_floating_point() => 'd',
                        _ => 'n',
                    };
                    write!(f, "{prefix}{idx}")
                }
            },
            ValKind::NamedScalar(named) => f.write_str(named.name()),
            ValKind::IterDomain(id) => {
                write!(f, "{}{}{idx}{{", id.iter_type().prefix(), id.parallel_type().short_name())?;
                if !self.fusion.val(id.start()).is_zero_int() {
                    write!(f, "{} : ", self.fusion.display(id.start()))?;
                }
                write!(f, "{}", self.fusion.display(id.extent()))?;
                if let Some(expanded) = id.expanded_extent() {
                    write!(f, " ex {}", self.fusion.display(expanded))?;
                }
                f.write_str("}")?;
                if id.is_rfactor_product() {
                    f.write_str("rf")?;
                }
                Ok(())
            }
            ValKind::TensorDomain(td) => write!(f, "[ {} ]", self.list(td.domain())),
            ValKind::TensorView(tv) => write!(f, "T{idx}_{}{}", val.dtype(), self.fusion.display(tv.domain())),
            ValKind::TensorIndex(ti) => {
                write!(f, "T{}[ {} ]", ti.view().index(), self.list(ti.indices()))
            }
        }
    }
}

impl fmt::Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(expr) = self.fusion.get_expr(self.id) else {
            return write!(f, "<unknown {}>", self.id);
        };
        let d = |id: ValId| self.fusion.display(id);
        let vals = |ids: &[ValId]| ids.iter().map(|&id| self.fusion.display(id)).format(", ").to_string();

        match expr.kind() {
            ExprKind::Split { factor, inner_split, start_offset, stop_offset } => {
                let [input] = expr.inputs() else { return write!(f, "Split: <malformed>") };
                let name = if *inner_split { "Split" } else { "Outer split" };
                write!(f, "{name}: {} by factor {} -> {}", d(*input), d(*factor), vals(expr.outputs()))?;
                let zero = |id: ValId| self.fusion.val(id).is_zero_int();
                if !zero(*start_offset) || !zero(*stop_offset) {
                    write!(f, ", start offset: {}, stop offset: {}", d(*start_offset), d(*stop_offset))?;
                }
                Ok(())
            }
            ExprKind::Merge => {
                let inputs = expr.inputs().iter().map(|&id| d(id)).format(" and ");
                write!(f, "Merge: {inputs} -> {}", vals(expr.outputs()))
            }
            ExprKind::Swizzle2D { swizzle_type } => {
                write!(f, "{swizzle_type}({}) -> {}", vals(expr.inputs()), vals(expr.outputs()))
            }
            ExprKind::UnaryOp { op } => write!(f, "{} = {op}({})", vals(expr.outputs()), vals(expr.inputs())),
            ExprKind::BinaryOp { op } => write!(f, "{} = {op}({})", vals(expr.outputs()), vals(expr.inputs())),
            ExprKind::TernaryOp { op } => write!(f, "{} = {op}({})", vals(expr.outputs()), vals(expr.inputs())),
            ExprKind::ReductionOp { op, init, .. } => {
                let (outputs, inputs) = (vals(expr.outputs()), vals(expr.inputs()));
                write!(f, "{outputs} = reduction({inputs}, op = {op}, initial value = {})", d(*init))
            }
            ExprKind::BroadcastOp { is_broadcast_dims } => write!(
                f,
                "{} = broadcast({}, flags = {{{}}})",
                vals(expr.outputs()),
                vals(expr.inputs()),
                is_broadcast_dims.iter().map(|&b| u8::from(b)).format(", ")
            ),
            kind => write!(f, "{} = {}({})", vals(expr.outputs()), kind.etype(), vals(expr.inputs())),
        }
    }
}

impl fmt::Display for Fusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Inputs: {}", self.inputs().iter().map(|&id| self.display(id)).format(", "))?;
        for (id, _) in self.exprs() {
            writeln!(f, "  {}", self.display_expr(id))?;
        }
        write!(f, "Outputs: {}", self.outputs().iter().map(|&id| self.display(id)).format(", "))
    }
}
