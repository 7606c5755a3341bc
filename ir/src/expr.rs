//! Operation nodes.

use smallvec::SmallVec;
use strum::EnumDiscriminants;

use crate::types::{BinaryOpType, LoadStoreOpType, MmaOptions, Swizzle2DType, TernaryOpType, UnaryOpType};
use crate::ValId;

/// Operation-specific parameters.
///
/// Values referenced here (initial values, split factors, offsets) are
/// attributes: they take part in cloning and equality but are not operation
/// inputs and record no use.
#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(ExprType), derive(Hash, strum::Display, strum::EnumIter))]
pub enum ExprKind {
    UnaryOp {
        op: UnaryOpType,
    },
    BinaryOp {
        op: BinaryOpType,
    },
    TernaryOp {
        op: TernaryOpType,
    },
    BroadcastOp {
        /// One flag per consumer root axis; `true` marks a new broadcast axis.
        is_broadcast_dims: Vec<bool>,
    },
    ReductionOp {
        op: BinaryOpType,
        init: ValId,
        is_allreduce: bool,
    },
    GroupedReductionOp {
        ops: Vec<BinaryOpType>,
        inits: Vec<ValId>,
        is_allreduce: bool,
    },
    /// Inputs are `[in_avg, in_var, in_n]`, outputs `[out_avg, out_var, out_n]`.
    WelfordOp {
        init_avg: Option<ValId>,
        init_var: Option<ValId>,
        init_n: ValId,
        is_allreduce: bool,
    },
    MmaOp {
        init: Option<ValId>,
        options: MmaOptions,
    },
    TransposeOp {
        new2old: Vec<usize>,
    },
    /// Inputs are the tensor followed by the expanded extents.
    ExpandOp,
    ShiftOp {
        offsets: Vec<i64>,
        pad_width: Vec<i64>,
    },
    GatherOp {
        window_shape: Vec<i64>,
        pad_width: Vec<[i64; 2]>,
    },
    ViewAsScalar {
        vector_id: ValId,
        index: ValId,
    },
    ViewOp,
    LoadStoreOp {
        op: LoadStoreOpType,
    },
    /// Input `[in]`, outputs `[outer, inner]`.
    Split {
        factor: ValId,
        inner_split: bool,
        start_offset: ValId,
        stop_offset: ValId,
    },
    /// Inputs `[outer, inner]`, output `[out]`.
    Merge,
    /// Inputs `[in_x, in_y]`, outputs `[out_x, out_y]`.
    Swizzle2D {
        swizzle_type: Swizzle2DType,
    },
}

impl ExprKind {
    pub fn etype(&self) -> ExprType {
        ExprType::from(self)
    }

    /// Values referenced as attributes, in declaration order.
    pub fn attribute_vals(&self) -> SmallVec<[ValId; 4]> {
        match self {
            Self::ReductionOp { init, .. } => smallvec::smallvec![*init],
            Self::GroupedReductionOp { inits, .. } => inits.iter().copied().collect(),
            Self::WelfordOp { init_avg, init_var, init_n, .. } => {
                init_avg.iter().chain(init_var.iter()).chain(std::iter::once(init_n)).copied().collect()
            }
            Self::MmaOp { init, .. } => init.iter().copied().collect(),
            Self::ViewAsScalar { vector_id, index } => smallvec::smallvec![*vector_id, *index],
            Self::Split { factor, start_offset, stop_offset, .. } => {
                smallvec::smallvec![*factor, *start_offset, *stop_offset]
            }
            _ => SmallVec::new(),
        }
    }

    /// Rewrite every attribute handle through `f`.
    pub fn map_vals(&self, mut f: impl FnMut(ValId) -> ValId) -> Self {
        match self {
            Self::ReductionOp { op, init, is_allreduce } => {
                Self::ReductionOp { op: *op, init: f(*init), is_allreduce: *is_allreduce }
            }
            Self::GroupedReductionOp { ops, inits, is_allreduce } => Self::GroupedReductionOp {
                ops: ops.clone(),
                inits: inits.iter().map(|&v| f(v)).collect(),
                is_allreduce: *is_allreduce,
            },
            Self::WelfordOp { init_avg, init_var, init_n, is_allreduce } => Self::WelfordOp {
                init_avg: init_avg.map(&mut f),
                init_var: init_var.map(&mut f),
                init_n: f(*init_n),
                is_allreduce: *is_allreduce,
            },
            Self::MmaOp { init, options } => Self::MmaOp { init: init.map(&mut f), options: *options },
            Self::ViewAsScalar { vector_id, index } => {
                Self::ViewAsScalar { vector_id: f(*vector_id), index: f(*index) }
            }
            Self::Split { factor, inner_split, start_offset, stop_offset } => Self::Split {
                factor: f(*factor),
                inner_split: *inner_split,
                start_offset: f(*start_offset),
                stop_offset: f(*stop_offset),
            },
            other => other.clone(),
        }
    }
}

/// An operation node. Owned by its [`Fusion`](crate::Fusion) and referred to
/// by [`ExprId`](crate::ExprId).
#[derive(Debug, Clone)]
pub struct Expr {
    pub(crate) kind: ExprKind,
    pub(crate) inputs: SmallVec<[ValId; 4]>,
    pub(crate) outputs: SmallVec<[ValId; 4]>,
    pub(crate) removed: bool,
}

impl Expr {
    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    pub fn etype(&self) -> ExprType {
        self.kind.etype()
    }

    pub fn inputs(&self) -> &[ValId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[ValId] {
        &self.outputs
    }

    pub fn input(&self, i: usize) -> Option<ValId> {
        self.inputs.get(i).copied()
    }

    pub fn output(&self, i: usize) -> Option<ValId> {
        self.outputs.get(i).copied()
    }

    /// Whether the expression was replaced by a later definition of one of
    /// its outputs.
    pub fn is_removed(&self) -> bool {
        self.removed
    }
}
