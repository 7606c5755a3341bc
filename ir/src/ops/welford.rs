//! Welford reductions: running average, variance and count.

use bon::bon;
use snafu::ensure;

use super::logged;
use crate::error::*;
use crate::{ExprId, ExprKind, ExprType, Fusion, ValId, ValType};

const OP: ExprType = ExprType::WelfordOp;

#[bon]
impl Fusion {
    /// Register a Welford reduction.
    ///
    /// A zero `init_n` means the reduction starts empty and needs no initial
    /// average or variance. An `in_n` of one means each input element is a
    /// single sample, so the variance input may be omitted and defaults to
    /// the fusion's zero.
    ///
    /// ```ignore
    /// fusion.add_welford_op()
    ///     .out_avg(avg).out_var(var).out_n(n)
    ///     .init_n(fusion_zero)
    ///     .in_avg(x).in_n(fusion_one)
    ///     .call()?;
    /// ```
    ///
    /// # Errors
    /// Returns `InvalidOperand` when any operand has the wrong kind for the
    /// given counts.
    #[builder]
    pub fn add_welford_op(
        &mut self,
        out_avg: ValId,
        out_var: ValId,
        out_n: ValId,
        init_avg: Option<ValId>,
        init_var: Option<ValId>,
        init_n: ValId,
        in_avg: ValId,
        in_var: Option<ValId>,
        in_n: ValId,
        #[builder(default)] is_allreduce: bool,
    ) -> Result<ExprId> {
        let result = self
            .check_welford(&[out_avg, out_var, out_n], init_avg, init_var, init_n, in_avg, in_var, in_n)
            .and_then(|in_var| {
                let kind = ExprKind::WelfordOp { init_avg, init_var, init_n, is_allreduce };
                self.register_expr(kind, &[in_avg, in_var, in_n], &[out_avg, out_var, out_n])
            });
        logged(OP, result)
    }
}

impl Fusion {
    /// Validate Welford operands, returning the variance input to record.
    #[allow(clippy::too_many_arguments)]
    fn check_welford(
        &self,
        outputs: &[ValId; 3],
        init_avg: Option<ValId>,
        init_var: Option<ValId>,
        init_n: ValId,
        in_avg: ValId,
        in_var: Option<ValId>,
        in_n: ValId,
    ) -> Result<ValId> {
        for &out in outputs {
            self.ensure_tensor(OP, out)?;
        }

        let init_count = self.try_val(init_n)?;
        ensure!(
            init_count.vtype() == ValType::Scalar,
            InvalidOperandSnafu { op: OP, id: self.render(init_n), expected: "scalar" }
        );
        if !init_count.is_zero_int() {
            for (init, what) in [(init_avg, "initial average"), (init_var, "initial variance")] {
                let init = init.ok_or_else(|| missing(what))?;
                self.ensure_tensor(OP, init)?;
            }
        }

        self.ensure_tensor(OP, in_avg)?;
        let count = self.try_val(in_n)?;
        ensure!(
            count.vtype() == ValType::Scalar || count.is_tensor(),
            InvalidOperandSnafu { op: OP, id: self.render(in_n), expected: "scalar or tensor" }
        );

        if !count.is_one_int() {
            let in_var = in_var.ok_or_else(|| missing("variance input"))?;
            self.ensure_tensor(OP, in_var)?;
            return Ok(in_var);
        }
        match in_var {
            None => Ok(self.zero_val()),
            Some(var) => {
                ensure!(
                    self.try_val(var)?.is_zero_int(),
                    InvalidOperandSnafu {
                        op: OP,
                        id: self.render(var),
                        expected: "zero scalar when the count input is one",
                    }
                );
                Ok(var)
            }
        }
    }
}

fn missing(what: &'static str) -> Error {
    Error::InvalidOperand { op: OP, id: format!("missing {what}"), expected: "tensor" }
}
