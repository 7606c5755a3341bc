//! Matrix multiply-accumulate.

use super::logged;
use crate::error::*;
use crate::{ExprId, ExprKind, ExprType, Fusion, MmaOptions, ValId};

const OP: ExprType = ExprType::MmaOp;

impl Fusion {
    /// `out = in_a x in_b (+ init)` on tensor operands.
    pub fn add_mma_op(
        &mut self,
        out: ValId,
        in_a: ValId,
        in_b: ValId,
        init: Option<ValId>,
        options: MmaOptions,
    ) -> Result<ExprId> {
        let result = [out, in_a, in_b]
            .into_iter()
            .try_for_each(|id| self.ensure_tensor(OP, id).map(|_| ()))
            .and_then(|()| self.register_expr(ExprKind::MmaOp { init, options }, &[in_a, in_b], &[out]));
        logged(OP, result)
    }
}
