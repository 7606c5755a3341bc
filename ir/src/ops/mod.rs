//! Operation constructors.
//!
//! Each constructor validates that the producer and consumer values fit the
//! operation before registering it, so a malformed graph never enters the
//! fusion. Operations are grouped by category:
//! - `basic`: unary, binary, ternary and load/store operations, views
//! - `broadcast`: broadcast with root-domain mapping checks
//! - `reduction`: single and grouped reductions
//! - `welford`: running mean/variance reductions
//! - `mma`: matrix multiply-accumulate
//! - `movement`: transpose, expand, shift and gather

use snafu::ensure;

use crate::error::*;
use crate::{ExprType, Fusion, ValId, ValType};

pub mod basic;
pub mod broadcast;
pub mod mma;
pub mod movement;
pub mod reduction;
pub mod welford;

// =========================================================================
// Common Helper Functions
// =========================================================================

/// Pass `result` through, logging a failure against the operation that
/// raised it.
pub(super) fn logged<T>(op: ExprType, result: Result<T>) -> Result<T> {
    if let Err(error) = &result {
        log_validation_error(op, error);
    }
    result
}

impl Fusion {
    /// Check that `id` is a tensor view or a tensor index.
    pub(super) fn ensure_tensor(&self, op: ExprType, id: ValId) -> Result<ValType> {
        let val = self.try_val(id)?;
        ensure!(val.is_tensor(), InvalidOperandSnafu { op, id: self.render(id), expected: "tensor" });
        Ok(val.vtype())
    }

    pub(super) fn ensure_tensor_view(&self, op: ExprType, id: ValId) -> Result<()> {
        let val = self.try_val(id)?;
        ensure!(
            val.vtype() == ValType::TensorView,
            InvalidOperandSnafu { op, id: self.render(id), expected: "tensor view" }
        );
        Ok(())
    }

    /// Check that `out` and `input` are both tensor views or both tensor
    /// indices.
    ///
    /// # Errors
    /// - `MismatchedValCategory` if the two are different kinds of value
    /// - `InvalidOperand` if they are the same kind but not tensors
    pub(super) fn ensure_same_tensor_kind(&self, op: ExprType, out: ValId, input: ValId) -> Result<ValType> {
        let (lhs, rhs) = (self.try_val(out)?.vtype(), self.try_val(input)?.vtype());
        ensure!(lhs == rhs, MismatchedValCategorySnafu { op, lhs, rhs });
        self.ensure_tensor(op, out)
    }
}
