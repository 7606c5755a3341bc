//! Structural equality of values and expressions.
//!
//! Two nodes are the same when they are the same handle of the same fusion,
//! or when they have the same kind, equal parameters and structurally equal
//! operands. Symbolic scalars are only equal to themselves. Equality never
//! fails: mismatched kinds and unknown handles compare unequal.

use crate::{ExprId, ExprKind, Fusion, IterDomain, ValId, ValKind};

/// Compares nodes of `lhs` against nodes of `rhs`, which may be the same
/// fusion.
#[derive(Clone, Copy)]
pub struct StructuralEq<'a> {
    lhs: &'a Fusion,
    rhs: &'a Fusion,
}

impl<'a> StructuralEq<'a> {
    pub fn new(lhs: &'a Fusion, rhs: &'a Fusion) -> Self {
        Self { lhs, rhs }
    }

    fn identical(&self, a: ValId, b: ValId) -> bool {
        std::ptr::eq(self.lhs, self.rhs) && a == b
    }

    pub fn vals(&self, a: ValId, b: ValId) -> bool {
        if self.identical(a, b) {
            return true;
        }
        let (Some(va), Some(vb)) = (self.lhs.get_val(a), self.rhs.get_val(b)) else {
            return false;
        };
        if va.vtype() != vb.vtype() {
            return false;
        }

        match (va.kind(), vb.kind()) {
            (ValKind::Scalar(sa), ValKind::Scalar(sb)) => {
                va.dtype() == vb.dtype() && matches!((sa.value(), sb.value()), (Some(x), Some(y)) if x == y)
            }
            (ValKind::NamedScalar(na), ValKind::NamedScalar(nb)) => na.name() == nb.name(),
            (ValKind::IterDomain(ia), ValKind::IterDomain(ib)) => self.iter_domains(ia, ib),
            (ValKind::TensorDomain(ta), ValKind::TensorDomain(tb)) => {
                ta.n_dims() == tb.n_dims()
                    && ta.root_domain().len() == tb.root_domain().len()
                    && ta.rfactor_domain().len() == tb.rfactor_domain().len()
                    && self.val_lists(ta.domain(), tb.domain())
                    && self.val_lists(ta.root_domain(), tb.root_domain())
                    && self.val_lists(ta.rfactor_domain(), tb.rfactor_domain())
            }
            (ValKind::TensorView(ta), ValKind::TensorView(tb)) => {
                va.dtype() == vb.dtype() && self.vals(ta.domain(), tb.domain())
            }
            (ValKind::TensorIndex(ta), ValKind::TensorIndex(tb)) => {
                self.vals(ta.view(), tb.view()) && self.val_lists(ta.indices(), tb.indices())
            }
            _ => false,
        }
    }

    fn iter_domains(&self, a: &IterDomain, b: &IterDomain) -> bool {
        a.iter_type() == b.iter_type()
            && a.parallel_type() == b.parallel_type()
            && a.is_vector_component() == b.is_vector_component()
            && self.vals(a.extent(), b.extent())
            && self.vals(a.start(), b.start())
            && self.vals(a.stop_offset(), b.stop_offset())
    }

    pub fn val_lists(&self, a: &[ValId], b: &[ValId]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| self.vals(x, y))
    }

    fn optional(&self, a: Option<ValId>, b: Option<ValId>) -> bool {
        match (a, b) {
            (Some(x), Some(y)) => self.vals(x, y),
            (None, None) => true,
            _ => false,
        }
    }

    pub fn exprs(&self, a: ExprId, b: ExprId) -> bool {
        if std::ptr::eq(self.lhs, self.rhs) && a == b {
            return true;
        }
        let (Some(ea), Some(eb)) = (self.lhs.get_expr(a), self.rhs.get_expr(b)) else {
            return false;
        };
        if ea.etype() != eb.etype() || !self.expr_params(ea.kind(), eb.kind()) {
            return false;
        }
        self.val_lists(ea.inputs(), eb.inputs()) && self.val_lists(ea.outputs(), eb.outputs())
    }

    fn expr_params(&self, a: &ExprKind, b: &ExprKind) -> bool {
        use ExprKind::*;
        match (a, b) {
            (UnaryOp { op: x }, UnaryOp { op: y }) => x == y,
            (BinaryOp { op: x }, BinaryOp { op: y }) => x == y,
            (TernaryOp { op: x }, TernaryOp { op: y }) => x == y,
            (BroadcastOp { is_broadcast_dims: x }, BroadcastOp { is_broadcast_dims: y }) => x == y,
            (
                ReductionOp { op: xo, init: xi, is_allreduce: xa },
                ReductionOp { op: yo, init: yi, is_allreduce: ya },
            ) => xo == yo && xa == ya && self.vals(*xi, *yi),
            (
                GroupedReductionOp { ops: xo, inits: xi, is_allreduce: xa },
                GroupedReductionOp { ops: yo, inits: yi, is_allreduce: ya },
            ) => xo == yo && xa == ya && self.val_lists(xi, yi),
            (
                WelfordOp { init_avg: xa, init_var: xv, init_n: xn, is_allreduce: xr },
                WelfordOp { init_avg: ya, init_var: yv, init_n: yn, is_allreduce: yr },
            ) => xr == yr && self.optional(*xa, *ya) && self.optional(*xv, *yv) && self.vals(*xn, *yn),
            (MmaOp { init: xi, options: xo }, MmaOp { init: yi, options: yo }) => {
                xo == yo && self.optional(*xi, *yi)
            }
            (TransposeOp { new2old: x }, TransposeOp { new2old: y }) => x == y,
            (ExpandOp, ExpandOp) | (ViewOp, ViewOp) | (Merge, Merge) => true,
            (ShiftOp { offsets: xo, pad_width: xp }, ShiftOp { offsets: yo, pad_width: yp }) => {
                xo == yo && xp == yp
            }
            (GatherOp { window_shape: xw, pad_width: xp }, GatherOp { window_shape: yw, pad_width: yp }) => {
                xw == yw && xp == yp
            }
            (ViewAsScalar { vector_id: xv, index: xi }, ViewAsScalar { vector_id: yv, index: yi }) => {
                self.vals(*xv, *yv) && self.vals(*xi, *yi)
            }
            (LoadStoreOp { op: x }, LoadStoreOp { op: y }) => x == y,
            (
                Split { factor: xf, inner_split: xs, start_offset: xb, stop_offset: xe },
                Split { factor: yf, inner_split: ys, start_offset: yb, stop_offset: ye },
            ) => xs == ys && self.vals(*xf, *yf) && self.vals(*xb, *yb) && self.vals(*xe, *ye),
            (Swizzle2D { swizzle_type: x }, Swizzle2D { swizzle_type: y }) => x == y,
            _ => false,
        }
    }
}

impl Fusion {
    /// Structural equality of two values of this fusion.
    pub fn same_as(&self, a: ValId, b: ValId) -> bool {
        StructuralEq::new(self, self).vals(a, b)
    }

    /// Structural equality of two expressions of this fusion.
    pub fn same_expr(&self, a: ExprId, b: ExprId) -> bool {
        StructuralEq::new(self, self).exprs(a, b)
    }
}

/// Equality of two scalars: same kind and data type, and both constant with
/// equal values. Identical handles are always equal.
pub fn are_equal_scalars(fusion: &Fusion, a: ValId, b: ValId) -> bool {
    let is_scalar = |id| fusion.get_val(id).is_some_and(|v| v.is_scalar());
    is_scalar(a) && is_scalar(b) && fusion.same_as(a, b)
}
