//! Transpose, expand, shift and gather.

use snafu::{OptionExt, ensure};

use super::logged;
use crate::error::*;
use crate::{Expr, ExprId, ExprKind, ExprType, Fusion, ValId, tensor_domain};

impl Fusion {
    /// Permute the axes of `input`: output axis `i` is input axis
    /// `new2old[i]`.
    ///
    /// # Errors
    /// - `RankMismatch` if the output rank differs from the input's
    ///   non-reduction rank
    /// - `InvalidPermutation` if `new2old` is not a permutation of the output
    ///   rank
    pub fn add_transpose_op(&mut self, out: ValId, input: ValId, new2old: Vec<usize>) -> Result<ExprId> {
        let result = self
            .check_transpose(out, input, &new2old)
            .and_then(|()| self.register_expr(ExprKind::TransposeOp { new2old }, &[input], &[out]));
        logged(ExprType::TransposeOp, result)
    }

    fn check_transpose(&self, out: ValId, input: ValId, new2old: &[usize]) -> Result<()> {
        const OP: ExprType = ExprType::TransposeOp;
        self.ensure_tensor_view(OP, out)?;
        self.ensure_tensor_view(OP, input)?;

        let input_rank =
            tensor_domain::no_reductions(self, self.tensor_view_domain(input)?.maybe_rfactor_domain()).len();
        let rank = self.tensor_view_domain(out)?.maybe_rfactor_domain().len();
        ensure!(input_rank == rank, RankMismatchSnafu { op: OP, input: input_rank, output: rank });

        let mut seen = vec![false; rank];
        let is_permutation = new2old.len() == rank
            && new2old.iter().all(|&old| old < rank && !std::mem::replace(&mut seen[old], true));
        ensure!(is_permutation, InvalidPermutationSnafu { op: OP, permutation: new2old.to_vec(), rank });
        Ok(())
    }

    /// Broadcast axes of `input` expanded to `expanded_extents`. The extents
    /// become inputs of the operation after the tensor.
    pub fn add_expand_op(&mut self, out: ValId, input: ValId, expanded_extents: &[ValId]) -> Result<ExprId> {
        const OP: ExprType = ExprType::ExpandOp;
        let check = |fusion: &Self| -> Result<()> {
            fusion.ensure_tensor_view(OP, out)?;
            fusion.ensure_tensor_view(OP, input)?;
            for &extent in expanded_extents {
                let val = fusion.try_val(extent)?;
                ensure!(
                    val.is_integral_scalar(),
                    NonIntegralValueSnafu { what: "expanded extent", value: fusion.render(extent), dtype: val.dtype() }
                );
            }
            Ok(())
        };

        let inputs: Vec<ValId> = std::iter::once(input).chain(expanded_extents.iter().copied()).collect();
        let result = check(self).and_then(|()| self.register_expr(ExprKind::ExpandOp, &inputs, &[out]));
        logged(OP, result)
    }

    /// Shift `input` by `offsets`, padding by `pad_width`; one entry per
    /// non-reduction root axis.
    pub fn add_shift_op(&mut self, out: ValId, input: ValId, offsets: Vec<i64>, pad_width: Vec<i64>) -> Result<ExprId> {
        const OP: ExprType = ExprType::ShiftOp;
        let result = self
            .check_window(OP, out, input, &[("offsets", offsets.len()), ("pad widths", pad_width.len())])
            .and_then(|()| self.register_expr(ExprKind::ShiftOp { offsets, pad_width }, &[input], &[out]));
        logged(OP, result)
    }

    /// Gather a sliding window of `window_shape` around each element of
    /// `input`, padding each axis by `[before, after]`.
    pub fn add_gather_op(
        &mut self,
        out: ValId,
        input: ValId,
        window_shape: Vec<i64>,
        pad_width: Vec<[i64; 2]>,
    ) -> Result<ExprId> {
        const OP: ExprType = ExprType::GatherOp;
        let result = self
            .check_window(OP, out, input, &[("window axes", window_shape.len()), ("pad widths", pad_width.len())])
            .and_then(|()| self.register_expr(ExprKind::GatherOp { window_shape, pad_width }, &[input], &[out]));
        logged(OP, result)
    }

    /// Both operands are tensor views and each parameter list has one entry
    /// per non-reduction root axis of the input.
    fn check_window(&self, op: ExprType, out: ValId, input: ValId, lists: &[(&'static str, usize)]) -> Result<()> {
        self.ensure_tensor_view(op, out)?;
        self.ensure_tensor_view(op, input)?;
        let expected = tensor_domain::no_reductions(self, self.tensor_view_domain(input)?.root_domain()).len();
        for &(what, actual) in lists {
            ensure!(actual == expected, OperandCountSnafu { op, what, expected, actual });
        }
        Ok(())
    }
}

impl Expr {
    /// Inverse permutation of a transpose: input axis `i` becomes output
    /// axis `old2new[i]`. `None` for other operations.
    pub fn old2new(&self) -> Option<Vec<usize>> {
        let ExprKind::TransposeOp { new2old } = self.kind() else { return None };
        let mut old2new = vec![0; new2old.len()];
        for (new, &old) in new2old.iter().enumerate() {
            old2new[old] = new;
        }
        Some(old2new)
    }

    /// Position of the window axis created by a gather for output axis
    /// `axis`. Window axes follow the gathered axes in the output.
    ///
    /// # Errors
    /// Returns `AxisOutOfRange` if `axis` is not a gathered axis, or
    /// `InvalidOperand` if this is not a gather.
    pub fn gather_axis(&self, fusion: &Fusion, axis: i64) -> Result<usize> {
        let ExprKind::GatherOp { window_shape, .. } = self.kind() else {
            return InvalidOperandSnafu { op: self.etype(), id: "expression".to_string(), expected: "gather" }.fail();
        };
        let out = self.output(0).context(OperandCountSnafu {
            op: ExprType::GatherOp,
            what: "outputs",
            expected: 1usize,
            actual: 0usize,
        })?;
        let ndims = fusion.tensor_view_domain(out)?.n_dims() as i64;
        let normalized = if axis < 0 { axis + ndims } else { axis };
        ensure!(
            (0..window_shape.len() as i64).contains(&normalized),
            AxisOutOfRangeSnafu { axis, ndims: window_shape.len() }
        );
        Ok(window_shape.len() + normalized as usize)
    }
}
