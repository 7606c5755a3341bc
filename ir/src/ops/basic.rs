//! Element-wise, load/store and view operations.
//!
//! These carry no shape constraints of their own; only the handles are
//! checked.

use super::logged;
use crate::error::*;
use crate::{BinaryOpType, ExprId, ExprKind, ExprType, Fusion, LoadStoreOpType, TernaryOpType, UnaryOpType, ValId};

impl Fusion {
    pub fn add_unary_op(&mut self, op: UnaryOpType, out: ValId, input: ValId) -> Result<ExprId> {
        let result = self.register_expr(ExprKind::UnaryOp { op }, &[input], &[out]);
        logged(ExprType::UnaryOp, result)
    }

    pub fn add_binary_op(&mut self, op: BinaryOpType, out: ValId, lhs: ValId, rhs: ValId) -> Result<ExprId> {
        let result = self.register_expr(ExprKind::BinaryOp { op }, &[lhs, rhs], &[out]);
        logged(ExprType::BinaryOp, result)
    }

    pub fn add_ternary_op(&mut self, op: TernaryOpType, out: ValId, a: ValId, b: ValId, c: ValId) -> Result<ExprId> {
        let result = self.register_expr(ExprKind::TernaryOp { op }, &[a, b, c], &[out]);
        logged(ExprType::TernaryOp, result)
    }

    /// Copy `input` into `out`, possibly through a different memory path.
    pub fn add_load_store_op(&mut self, op: LoadStoreOpType, out: ValId, input: ValId) -> Result<ExprId> {
        let result = self.register_expr(ExprKind::LoadStoreOp { op }, &[input], &[out]);
        logged(ExprType::LoadStoreOp, result)
    }

    /// Reshape of a tensor view. The output domain carries the reshape as
    /// its rfactor domain.
    pub fn add_view_op(&mut self, out: ValId, input: ValId) -> Result<ExprId> {
        let result = self
            .ensure_tensor_view(ExprType::ViewOp, out)
            .and_then(|()| self.ensure_tensor_view(ExprType::ViewOp, input))
            .and_then(|()| self.register_expr(ExprKind::ViewOp, &[input], &[out]));
        logged(ExprType::ViewOp, result)
    }

    /// Read component `index` of the vector axis `vector_id` of `input`.
    pub fn add_view_as_scalar(&mut self, out: ValId, input: ValId, vector_id: ValId, index: ValId) -> Result<ExprId> {
        let result = self
            .iter_domain(vector_id)
            .map(|_| ())
            .and_then(|()| self.register_expr(ExprKind::ViewAsScalar { vector_id, index }, &[input], &[out]));
        logged(ExprType::ViewAsScalar, result)
    }
}
