use std::collections::HashSet;

use snafu::ensure;

use crate::error::*;
use crate::{
    ExprKind, Fusion, IterDomain, IterDomainBuilder, IterType, ParallelType, Swizzle2DType, ValId, ValType, arith,
    traversal,
};

impl IterDomain {
    /// Merge `outer` and `inner` into one domain whose extent is the product
    /// of theirs.
    ///
    /// The result starts at zero. Merging two broadcasts yields a broadcast;
    /// merging a broadcast with anything else, or a reduction with a
    /// non-reduction of extent one, yields an iteration domain.
    pub fn merge(fusion: &mut Fusion, outer: ValId, inner: ValId) -> Result<ValId> {
        let (o, i) = (*fusion.iter_domain(outer)?, *fusion.iter_domain(inner)?);
        let render = |fusion: &Fusion| (fusion.render(outer), fusion.render(inner));

        for (id, domain) in [(outer, &o), (inner, &i)] {
            ensure!(!fusion.val(domain.extent).is_zero_int(), ZeroExtentSnafu { op: "merge", id: fusion.render(id) });
        }
        if o.is_reduction() != i.is_reduction() {
            let non_reduction = if o.is_reduction() { &i } else { &o };
            ensure!(fusion.val(non_reduction.extent).is_one_int(), {
                let (outer, inner) = render(fusion);
                MergeReductionMismatchSnafu { outer, inner }
            });
        }
        ensure!(o.is_gather() == i.is_gather(), {
            let (lhs, rhs) = render(fusion);
            GatherMismatchSnafu { op: "merge", lhs, rhs }
        });

        let iter_type = match (o.is_broadcast(), i.is_broadcast()) {
            (true, true) => IterType::Broadcast,
            (true, false) | (false, true) => IterType::Iteration,
            _ if o.is_reduction() != i.is_reduction() => IterType::Iteration,
            _ => o.iter_type,
        };

        let extent = arith::mul(fusion, o.extent, i.extent)?;
        let expanded_extent = if o.has_expanded_extent() || i.has_expanded_extent() {
            Some(arith::mul(fusion, o.maybe_expanded_extent(), i.maybe_expanded_extent())?)
        } else {
            None
        };

        let zero = fusion.zero_val();
        let merged = IterDomainBuilder::new(zero, extent)
            .parallel_type(o.parallel_type)
            .expanded_extent(expanded_extent)
            .iter_type(iter_type)
            .build(fusion)?;
        fusion.register_expr(ExprKind::Merge, &[outer, inner], &[merged])?;
        fusion.log_transform("merge", &[outer, inner], &[merged]);
        Ok(merged)
    }

    /// Split `input` by `factor` into `(outer, inner)`.
    ///
    /// With `inner_split` the factor becomes the inner extent, otherwise the
    /// outer one. The other output covers `ceil_div(extent - start_offset -
    /// stop_offset, factor)`. Non-zero offsets are only accepted on root
    /// domains.
    pub fn split(
        fusion: &mut Fusion,
        input: ValId,
        factor: ValId,
        inner_split: bool,
        start_offset: Option<ValId>,
        stop_offset: Option<ValId>,
    ) -> Result<(ValId, ValId)> {
        let id = *fusion.iter_domain(input)?;
        ensure!(!fusion.val(id.extent).is_zero_int(), ZeroExtentSnafu { op: "split", id: fusion.render(input) });
        validate_split_factor(fusion, factor)?;

        let zero = fusion.zero_val();
        let start_offset = start_offset.unwrap_or(zero);
        let stop_offset = stop_offset.unwrap_or(zero);
        let partial = !fusion.val(start_offset).is_zero_int() || !fusion.val(stop_offset).is_zero_int();
        ensure!(
            !partial || fusion.definition(input).is_none(),
            PartialSplitOnDerivedSnafu { id: fusion.render(input) }
        );

        let trimmed = arith::add(fusion, start_offset, stop_offset)?;
        let extent = arith::sub(fusion, id.extent, trimmed)?;
        let remainder = arith::ceil_div(fusion, extent, factor)?;
        let expanded_remainder = match id.expanded_extent {
            Some(expanded) => Some(arith::ceil_div(fusion, expanded, factor)?),
            None => None,
        };

        let (outer_extent, inner_extent) = if inner_split { (remainder, factor) } else { (factor, remainder) };
        let output = |fusion: &mut Fusion, extent: ValId, expanded: bool| {
            IterDomainBuilder::new(zero, extent)
                .expanded_extent(expanded_remainder.filter(|_| expanded))
                .parallel_type(id.parallel_type)
                .iter_type(id.iter_type)
                .build(fusion)
        };
        let outer = output(fusion, outer_extent, inner_split)?;
        let inner = output(fusion, inner_extent, !inner_split)?;

        fusion.register_expr(
            ExprKind::Split { factor, inner_split, start_offset, stop_offset },
            &[input],
            &[outer, inner],
        )?;
        fusion.log_transform("split", &[input], &[outer, inner]);
        Ok((outer, inner))
    }

    /// Split that optionally trims `input` to its own start and stop offset.
    pub fn split_trimmed(
        fusion: &mut Fusion,
        input: ValId,
        factor: ValId,
        inner_split: bool,
        trim_out_of_bounds: bool,
    ) -> Result<(ValId, ValId)> {
        let id = *fusion.iter_domain(input)?;
        let (start, stop) = if trim_out_of_bounds { (Some(id.start), Some(id.stop_offset)) } else { (None, None) };
        Self::split(fusion, input, factor, inner_split, start, stop)
    }

    /// Trimmed inner split whose inner output is a stride domain; both
    /// outputs are rfactor products.
    pub fn strided_split(fusion: &mut Fusion, input: ValId, factor: i64) -> Result<(ValId, ValId)> {
        ensure!(!fusion.iter_domain(input)?.is_broadcast(), StridedSplitBroadcastSnafu { id: fusion.render(input) });

        let factor = fusion.new_int(factor);
        let (outer, inner) = Self::split_trimmed(fusion, input, factor, true, true)?;

        fusion.iter_domain_mut(outer)?.is_rfactor_product = true;
        let inner_domain = fusion.iter_domain_mut(inner)?;
        inner_domain.iter_type = IterType::Stride;
        inner_domain.is_rfactor_product = true;
        Ok((outer, inner))
    }

    /// Swizzle `x` and `y`, producing copies of both linked by a swizzle
    /// expression.
    pub fn swizzle(fusion: &mut Fusion, swizzle_type: Swizzle2DType, x: ValId, y: ValId) -> Result<(ValId, ValId)> {
        let (dx, dy) = (*fusion.iter_domain(x)?, *fusion.iter_domain(y)?);
        for (id, domain) in [(x, &dx), (y, &dy)] {
            let fail = |reason| InvalidSwizzleSnafu { id: fusion.render(id), reason };
            ensure!(!fusion.val(domain.extent).is_zero_int(), fail("extent is zero"));
            ensure!(!domain.is_reduction(), fail("reductions cannot be swizzled"));
            ensure!(!domain.is_gather(), fail("gather domains cannot be swizzled"));
        }
        for root in traversal::inputs_of(fusion, &[x, y], &HashSet::new()) {
            if fusion.get_val(root).and_then(|v| v.as_iter_domain()).is_some_and(IterDomain::is_broadcast) {
                let reason = "swizzled domains cannot derive from a broadcast";
                return InvalidSwizzleSnafu { id: fusion.render(root), reason }.fail();
            }
        }

        let out_x = IterDomainBuilder::from_existing(&dx).build(fusion)?;
        let out_y = IterDomainBuilder::from_existing(&dy).build(fusion)?;
        fusion.register_expr(ExprKind::Swizzle2D { swizzle_type }, &[x, y], &[out_x, out_y])?;
        fusion.log_transform("swizzle", &[x, y], &[out_x, out_y]);
        Ok((out_x, out_y))
    }

    /// Assign a parallel type to `id` in place. Re-assigning the current
    /// type is a no-op.
    pub fn parallelize(fusion: &mut Fusion, id: ValId, ptype: ParallelType) -> Result<()> {
        let domain = *fusion.iter_domain(id)?;
        if domain.parallel_type == ptype {
            return Ok(());
        }
        let fail = |fusion: &Fusion, reason| InvalidParallelizeSnafu { id: fusion.render(id), ptype, reason };

        if ptype.requires_static_extent() {
            let static_extent =
                fusion.val(domain.start).is_zero_int() && traversal::is_const_scalar(fusion, domain.extent);
            ensure!(static_extent, fail(fusion, "requires a zero start and a constant extent"));
        }
        if ptype == ParallelType::Group {
            ensure!(domain.iter_type == IterType::Iteration, fail(fusion, "only iteration domains can be grouped"));
        }
        if domain.is_mma_swizzled {
            let allowed = matches!(ptype, ParallelType::Vectorize | ParallelType::TIDx | ParallelType::Serial);
            ensure!(allowed, fail(fusion, "mma-swizzled domains only accept Vectorize, threadIdx.x or Serial"));
        }

        fusion.iter_domain_mut(id)?.parallel_type = ptype;
        tracing::trace!(id = %id, %ptype, "parallelized");
        Ok(())
    }

    /// Pad a `threadIdx.x` domain to a multiple of the warp size, optionally
    /// to an explicit size.
    pub fn pad_to_multiple_of_warp(fusion: &mut Fusion, id: ValId, to_size: Option<i64>) -> Result<()> {
        let ptype = fusion.iter_domain(id)?.parallel_type;
        ensure!(
            ptype == ParallelType::TIDx,
            InvalidParallelizeSnafu { id: fusion.render(id), ptype, reason: "warp padding requires threadIdx.x" }
        );
        let domain = fusion.iter_domain_mut(id)?;
        domain.is_padded_dimension = true;
        if let Some(size) = to_size.filter(|&size| size > 0) {
            domain.padded_to_size = Some(size);
        }
        Ok(())
    }

    /// Mark `id` as mapped onto an mma instruction's warp layout.
    pub fn mark_mma_swizzled(fusion: &mut Fusion, id: ValId) -> Result<()> {
        fusion.iter_domain_mut(id)?.is_mma_swizzled = true;
        Ok(())
    }
}

/// Split factors are integral; a plain scalar factor is a constant or a
/// fusion input, and a named factor is a launch size such as `blockDim.x`.
fn validate_split_factor(fusion: &Fusion, factor: ValId) -> Result<()> {
    let val = fusion.try_val(factor)?;
    let fail = |reason| InvalidSplitFactorSnafu { factor: fusion.render(factor), reason };

    ensure!(val.is_integral_scalar(), fail("factor must be an integral scalar"));
    match val.vtype() {
        ValType::Scalar => ensure!(
            traversal::is_const_scalar(fusion, factor) || val.is_fusion_input(),
            fail("factor must be a constant or a fusion input")
        ),
        ValType::NamedScalar => ensure!(
            val.as_named_scalar().and_then(|n| n.parallel_dim()).is_some(),
            fail("named factor must be a block or grid dimension")
        ),
        _ => {}
    }
    Ok(())
}
