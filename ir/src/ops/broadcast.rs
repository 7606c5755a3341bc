//! Broadcast operations.

use std::collections::HashSet;

use snafu::ensure;

use super::logged;
use crate::error::*;
use crate::root_map::{PairwiseRootDomainMap, RootDomainMap};
use crate::{ExprId, ExprKind, ExprType, Fusion, ValId, ValType};

const OP: ExprType = ExprType::BroadcastOp;

impl Fusion {
    /// Broadcast `input` into `out`, inserting the consumer root axes flagged
    /// in `is_broadcast_dims`.
    ///
    /// Producer and consumer root axes are paired positionally.
    ///
    /// # Errors
    /// - `MismatchedValCategory` unless both are tensor views or both are
    ///   tensor indices
    /// - `UnmappedProducerAxis` if a non-reduction producer axis has no
    ///   consumer counterpart
    /// - `MismatchedAxisKind` if paired axes differ in kind
    /// - `UnflaggedBroadcastAxis` if a consumer axis without producer is not
    ///   a flagged broadcast
    pub fn add_broadcast_op(&mut self, out: ValId, input: ValId, is_broadcast_dims: Vec<bool>) -> Result<ExprId> {
        let map = PairwiseRootDomainMap::with_broadcast_flags(is_broadcast_dims.clone());
        self.add_broadcast_op_with_map(out, input, is_broadcast_dims, &map)
    }

    /// [`add_broadcast_op`](Self::add_broadcast_op) with a caller-provided
    /// root domain map.
    pub fn add_broadcast_op_with_map(
        &mut self,
        out: ValId,
        input: ValId,
        is_broadcast_dims: Vec<bool>,
        map: &impl RootDomainMap,
    ) -> Result<ExprId> {
        let result = self
            .check_broadcast(out, input, &is_broadcast_dims, map)
            .and_then(|()| self.register_expr(ExprKind::BroadcastOp { is_broadcast_dims }, &[input], &[out]));
        logged(OP, result)
    }

    fn check_broadcast(
        &self,
        out: ValId,
        input: ValId,
        is_broadcast_dims: &[bool],
        map: &impl RootDomainMap,
    ) -> Result<()> {
        if self.ensure_same_tensor_kind(OP, out, input)? != ValType::TensorView {
            return Ok(());
        }

        let consumer = self.tensor_view_domain(out)?;
        let producer = self.tensor_view_domain(input)?;
        let c_root = consumer.root_domain();
        ensure!(
            is_broadcast_dims.len() == c_root.len(),
            OperandCountSnafu {
                op: OP,
                what: "broadcast flags",
                expected: c_root.len(),
                actual: is_broadcast_dims.len(),
            }
        );

        let p2c = map.map_producer_to_consumer(self, producer, consumer);
        for &p_id in producer.maybe_rfactor_domain() {
            let domain = self.iter_domain(p_id)?;
            match p2c.get(&p_id) {
                Some(&c_id) => ensure!(
                    domain.iter_type() == self.iter_domain(c_id)?.iter_type(),
                    MismatchedAxisKindSnafu { op: OP, producer: self.render(p_id), consumer: self.render(c_id) }
                ),
                None => ensure!(
                    domain.is_reduction() || domain.is_stride(),
                    UnmappedProducerAxisSnafu { op: OP, id: self.render(p_id) }
                ),
            }
        }

        let mapped: HashSet<ValId> = p2c.into_values().collect();
        for (&c_id, &flagged) in c_root.iter().zip(is_broadcast_dims) {
            if mapped.contains(&c_id) {
                continue;
            }
            ensure!(
                flagged && self.iter_domain(c_id)?.is_broadcast(),
                UnflaggedBroadcastAxisSnafu { op: OP, id: self.render(c_id) }
            );
        }
        Ok(())
    }
}
