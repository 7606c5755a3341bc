//! Reduction operations.

use snafu::ensure;

use super::logged;
use crate::error::*;
use crate::{BinaryOpType, ExprId, ExprKind, ExprType, Fusion, ValId, ValType, tensor_domain, traversal};

impl Fusion {
    /// Reduce `input` into `out` with `op`, starting from `init`.
    ///
    /// # Errors
    /// - `MismatchedValCategory` unless both are tensor views or both are
    ///   tensor indices
    /// - `RankMismatch` if the input's non-reduction axes do not line up with
    ///   the output root domain
    /// - `NonConstInit` if `init` is not a constant scalar
    pub fn add_reduction_op(
        &mut self,
        op: BinaryOpType,
        init: ValId,
        out: ValId,
        input: ValId,
        is_allreduce: bool,
    ) -> Result<ExprId> {
        let result = self
            .check_reduction(ExprType::ReductionOp, init, out, input)
            .and_then(|()| self.register_expr(ExprKind::ReductionOp { op, init, is_allreduce }, &[input], &[out]));
        logged(ExprType::ReductionOp, result)
    }

    /// Several reductions evaluated together. `ops`, `inits`, `outputs` and
    /// `inputs` are parallel lists, one entry per reduction.
    pub fn add_grouped_reduction_op(
        &mut self,
        ops: Vec<BinaryOpType>,
        inits: Vec<ValId>,
        outputs: &[ValId],
        inputs: &[ValId],
        is_allreduce: bool,
    ) -> Result<ExprId> {
        let result = self
            .check_grouped_reduction(&inits, outputs, inputs, ops.len())
            .and_then(|()| {
                self.register_expr(ExprKind::GroupedReductionOp { ops, inits, is_allreduce }, inputs, outputs)
            });
        logged(ExprType::GroupedReductionOp, result)
    }

    fn check_grouped_reduction(
        &self,
        inits: &[ValId],
        outputs: &[ValId],
        inputs: &[ValId],
        expected: usize,
    ) -> Result<()> {
        const OP: ExprType = ExprType::GroupedReductionOp;
        for (what, actual) in [("init values", inits.len()), ("outputs", outputs.len()), ("inputs", inputs.len())] {
            ensure!(actual == expected, OperandCountSnafu { op: OP, what, expected, actual });
        }
        for ((&init, &out), &input) in inits.iter().zip(outputs).zip(inputs) {
            self.check_reduction(OP, init, out, input)?;
        }
        Ok(())
    }

    fn check_reduction(&self, op: ExprType, init: ValId, out: ValId, input: ValId) -> Result<()> {
        if self.ensure_same_tensor_kind(op, out, input)? == ValType::TensorView {
            let input_rank =
                tensor_domain::no_reductions(self, self.tensor_view_domain(input)?.maybe_rfactor_domain()).len();
            let output_rank = self.tensor_view_domain(out)?.root_domain().len();
            ensure!(input_rank == output_rank, RankMismatchSnafu { op, input: input_rank, output: output_rank });
        }
        ensure!(traversal::is_const_scalar(self, init), NonConstInitSnafu { op, value: self.render(init) });
        Ok(())
    }
}
