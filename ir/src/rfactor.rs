//! Two-stage reductions.
//!
//! rFactoring a tensor domain over some of its reduction axes produces a
//! producer domain that reduces only those axes and a consumer domain that
//! reduces the rest. The producer replays the transformation history of the
//! original domain onto fresh root axes so that its rfactor domain lines up
//! with the consumer's root domain.

use std::collections::{BTreeSet, HashMap, HashSet};

use snafu::ensure;

use crate::error::*;
use crate::tensor_domain::TensorDomain;
use crate::{Fusion, IterDomain, IterDomainBuilder, IterType, ValId, traversal};

/// Builds the producer and consumer domains of an rfactor.
pub trait RFactorReplay {
    /// Returns `(producer, consumer)` tensor domains for rFactoring `td`
    /// over the current axes `axes`.
    fn run_replay(&self, fusion: &mut Fusion, td: ValId, axes: &[i64]) -> Result<(ValId, ValId)>;
}

/// Replays split, merge and swizzle history onto clones of the original
/// rfactor-or-root domain.
///
/// In the producer, the selected axes and every reduction they derive from
/// stay reductions and become rfactor products; all other reductions turn
/// into iteration axes. The producer's rfactor domain is its current
/// domain. The consumer's root and current domain are clones of the
/// unselected current axes, keeping their original kinds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayRFactor;

fn invalid(reason: impl Into<String>) -> Error {
    Error::InvalidRFactor { reason: reason.into() }
}

impl RFactorReplay for ReplayRFactor {
    fn run_replay(&self, fusion: &mut Fusion, td: ValId, axes: &[i64]) -> Result<(ValId, ValId)> {
        let original = fusion.tensor_domain(td)?.clone();
        let current = original.domain().to_vec();
        let base = original.maybe_rfactor_domain().to_vec();
        let ndims = current.len() as i64;

        ensure!(!axes.is_empty(), InvalidRFactorSnafu { reason: "no axes provided" });
        let positions = axes
            .iter()
            .map(|&axis| -> Result<usize> {
                ensure!(
                    (-ndims..ndims).contains(&axis),
                    InvalidRFactorSnafu { reason: format!("axis {axis} is outside [{}, {}]", -ndims, ndims - 1) }
                );
                Ok(if axis < 0 { (axis + ndims) as usize } else { axis as usize })
            })
            .collect::<Result<BTreeSet<usize>>>()?;

        for &pos in &positions {
            ensure!(
                fusion.iter_domain(current[pos])?.is_reduction(),
                InvalidRFactorSnafu { reason: format!("{} is not a reduction axis", fusion.render(current[pos])) }
            );
        }
        let kept_reduction = current
            .iter()
            .enumerate()
            .filter(|(pos, _)| !positions.contains(pos))
            .any(|(_, &id)| fusion.get_val(id).and_then(|v| v.as_iter_domain()).is_some_and(IterDomain::is_reduction));
        ensure!(kept_reduction, InvalidRFactorSnafu { reason: "at least one reduction axis must not be rfactored" });

        let rfactor_axes: Vec<ValId> = positions.iter().map(|&pos| current[pos]).collect();
        let base_set: HashSet<ValId> = base.iter().copied().collect();
        // Axes whose history leads to an rfactored axis.
        let static_ids = traversal::vals_between(fusion, &base_set, &rfactor_axes);

        for &root in base.iter().filter(|id| static_ids.contains(id)) {
            ensure!(
                !fusion.iter_domain(root)?.maybe_partial(fusion),
                InvalidRFactorSnafu { reason: format!("{} is a partial domain", fusion.render(root)) }
            );
        }

        let current_set: HashSet<ValId> = current.iter().copied().collect();
        let replayed = |fusion: &mut Fusion, orig: ValId| -> Result<ValId> {
            let domain = *fusion.iter_domain(orig)?;
            let on_path = static_ids.contains(&orig);
            let iter_type = match domain.iter_type() {
                IterType::Reduction if !on_path => IterType::Iteration,
                kind => kind,
            };
            let mut builder = IterDomainBuilder::from_existing(&domain)
                .reset_scheduling_params()
                .iter_type(iter_type)
                .is_rfactor_product(on_path && iter_type != IterType::Broadcast);
            if current_set.contains(&orig) {
                builder = builder
                    .parallel_type(domain.parallel_type())
                    .is_padded_dimension(domain.is_padded_dimension())
                    .padded_to_size(domain.padded_to_size());
            }
            builder.build(fusion)
        };

        let mut producer_map: HashMap<ValId, ValId> = HashMap::new();
        let mut producer_root = Vec::with_capacity(base.len());
        for &orig in &base {
            let clone = replayed(fusion, orig)?;
            producer_map.insert(orig, clone);
            producer_root.push(clone);
        }

        for expr_id in traversal::exprs_between(fusion, &base_set, &current) {
            let expr = fusion.expr(expr_id).clone();
            let inputs = expr
                .inputs()
                .iter()
                .map(|id| producer_map.get(id).copied().ok_or_else(|| invalid("replay is missing an input axis")))
                .collect::<Result<Vec<_>>>()?;
            let mut outputs = Vec::with_capacity(expr.outputs().len());
            for &orig in expr.outputs() {
                let out = replayed(fusion, orig)?;
                producer_map.insert(orig, out);
                outputs.push(out);
            }
            fusion.register_expr(expr.kind().clone(), &inputs, &outputs)?;
        }

        let producer_domain = current
            .iter()
            .map(|id| producer_map.get(id).copied().ok_or_else(|| invalid("replay is missing a current axis")))
            .collect::<Result<Vec<_>>>()?;
        let contiguity = vec![true; producer_domain.len()];
        let producer = TensorDomain::with_rfactor(
            fusion,
            producer_root,
            producer_domain.clone(),
            producer_domain,
            Some(contiguity),
        )?;

        let mut consumer_root = Vec::with_capacity(current.len() - positions.len());
        for (pos, &orig) in current.iter().enumerate() {
            if !positions.contains(&pos) {
                consumer_root.push(IterDomain::clone_without_rfactor(fusion, orig)?);
            }
        }
        let contiguity = vec![true; consumer_root.len()];
        let consumer = TensorDomain::new_root(fusion, consumer_root, Some(contiguity))?;

        Ok((producer, consumer))
    }
}
