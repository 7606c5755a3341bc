//! A single axis of an iteration space.
//!
//! Iteration domains are created through [`IterDomainBuilder`] and are never
//! rewritten by [`split`](IterDomain::split), [`merge`](IterDomain::merge) or
//! [`swizzle`](IterDomain::swizzle): those register fresh outputs together
//! with a history expression. Only scheduling annotations such as the
//! parallel type change in place.

mod builder;
mod transform;

pub use builder::IterDomainBuilder;

use crate::error::Result;
use crate::{Fusion, IterType, ParallelType, ValId, arith};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterDomain {
    pub(crate) start: ValId,
    pub(crate) extent: ValId,
    pub(crate) expanded_extent: Option<ValId>,
    pub(crate) stop_offset: ValId,
    pub(crate) parallel_type: ParallelType,
    pub(crate) iter_type: IterType,
    pub(crate) is_rfactor_product: bool,
    pub(crate) is_padded_dimension: bool,
    pub(crate) padded_to_size: Option<i64>,
    pub(crate) is_mma_swizzled: bool,
}

impl IterDomain {
    pub fn start(&self) -> ValId {
        self.start
    }

    pub fn extent(&self) -> ValId {
        self.extent
    }

    pub fn expanded_extent(&self) -> Option<ValId> {
        self.expanded_extent
    }

    pub fn has_expanded_extent(&self) -> bool {
        self.expanded_extent.is_some()
    }

    /// Expanded extent when present, the plain extent otherwise.
    pub fn maybe_expanded_extent(&self) -> ValId {
        self.expanded_extent.unwrap_or(self.extent)
    }

    pub fn stop_offset(&self) -> ValId {
        self.stop_offset
    }

    pub fn parallel_type(&self) -> ParallelType {
        self.parallel_type
    }

    pub fn iter_type(&self) -> IterType {
        self.iter_type
    }

    pub fn is_rfactor_product(&self) -> bool {
        self.is_rfactor_product
    }

    pub fn is_padded_dimension(&self) -> bool {
        self.is_padded_dimension
    }

    pub fn padded_to_size(&self) -> Option<i64> {
        self.padded_to_size
    }

    pub fn is_mma_swizzled(&self) -> bool {
        self.is_mma_swizzled
    }

    pub fn is_reduction(&self) -> bool {
        self.iter_type == IterType::Reduction
    }

    pub fn is_broadcast(&self) -> bool {
        self.iter_type == IterType::Broadcast
    }

    pub fn is_stride(&self) -> bool {
        self.iter_type == IterType::Stride
    }

    pub fn is_gather(&self) -> bool {
        self.iter_type == IterType::Gather
    }

    pub fn is_vector_component(&self) -> bool {
        self.iter_type == IterType::VectorComponent
    }

    pub fn is_thread_dim(&self) -> bool {
        self.parallel_type.is_thread_dim()
    }

    pub fn is_block_dim(&self) -> bool {
        self.parallel_type.is_block_dim()
    }

    pub fn is_thread(&self) -> bool {
        self.parallel_type.is_thread()
    }

    pub fn is_parallelized(&self) -> bool {
        self.parallel_type != ParallelType::Serial
    }

    /// Whether the domain may cover only part of its extent, i.e. its start
    /// or stop offset is not the literal zero.
    pub fn maybe_partial(&self, fusion: &Fusion) -> bool {
        !fusion.val(self.start).is_zero_int() || !fusion.val(self.stop_offset).is_zero_int()
    }

    /// A reduction over a constant extent of one.
    pub fn is_trivial_reduction(&self, fusion: &Fusion) -> bool {
        self.is_reduction() && fusion.val(self.extent).is_one_int()
    }

    /// End of the iterated range: the extent minus the stop offset.
    pub fn stop(fusion: &mut Fusion, id: ValId) -> Result<ValId> {
        let IterDomain { extent, stop_offset, .. } = *fusion.iter_domain(id)?;
        if fusion.val(stop_offset).is_zero_int() {
            return Ok(extent);
        }
        arith::sub(fusion, extent, stop_offset)
    }

    /// Register a copy of `id` with every field preserved.
    pub fn clone_domain(fusion: &mut Fusion, id: ValId) -> Result<ValId> {
        IterDomainBuilder::from_existing(fusion.iter_domain(id)?).build(fusion)
    }

    /// Register a copy of `id` that is not an rfactor product.
    pub fn clone_without_rfactor(fusion: &mut Fusion, id: ValId) -> Result<ValId> {
        IterDomainBuilder::from_existing(fusion.iter_domain(id)?).reset_rfactor().build(fusion)
    }

    /// [`clone_domain`](Self::clone_domain) over a list.
    pub fn clone_domains(fusion: &mut Fusion, ids: &[ValId]) -> Result<Vec<ValId>> {
        ids.iter().map(|&id| Self::clone_domain(fusion, id)).collect()
    }
}
