use fuser_dtype::DataType;
use snafu::{OptionExt, ensure};

use crate::error::*;
use crate::{Fusion, IterDomain, IterType, ParallelType, ValId, ValKind};

/// Configuration of an [`IterDomain`] to be registered in a fusion.
///
/// `start` and `extent` are required; the stop offset defaults to the
/// fusion's zero.
#[derive(Debug, Clone, Default)]
pub struct IterDomainBuilder {
    start: Option<ValId>,
    extent: Option<ValId>,
    expanded_extent: Option<ValId>,
    stop_offset: Option<ValId>,
    parallel_type: ParallelType,
    iter_type: IterType,
    is_rfactor_product: bool,
    is_padded_dimension: bool,
    padded_to_size: Option<i64>,
    is_mma_swizzled: bool,
}

impl IterDomainBuilder {
    pub fn new(start: ValId, extent: ValId) -> Self {
        Self { start: Some(start), extent: Some(extent), ..Self::default() }
    }

    /// Start from every field of an existing domain.
    pub fn from_existing(id: &IterDomain) -> Self {
        Self {
            start: Some(id.start),
            extent: Some(id.extent),
            expanded_extent: id.expanded_extent,
            stop_offset: Some(id.stop_offset),
            parallel_type: id.parallel_type,
            iter_type: id.iter_type,
            is_rfactor_product: id.is_rfactor_product,
            is_padded_dimension: id.is_padded_dimension,
            padded_to_size: id.padded_to_size,
            is_mma_swizzled: id.is_mma_swizzled,
        }
    }

    /// Clear placement, rfactor flag, padding and mma swizzling.
    pub fn reset_scheduling_params(mut self) -> Self {
        self.parallel_type = ParallelType::Serial;
        self.is_rfactor_product = false;
        self.is_padded_dimension = false;
        self.padded_to_size = None;
        self.is_mma_swizzled = false;
        self
    }

    pub fn reset_rfactor(self) -> Self {
        self.is_rfactor_product(false)
    }

    pub fn start(mut self, start: ValId) -> Self {
        self.start = Some(start);
        self
    }

    pub fn extent(mut self, extent: ValId) -> Self {
        self.extent = Some(extent);
        self
    }

    pub fn expanded_extent(mut self, expanded_extent: Option<ValId>) -> Self {
        self.expanded_extent = expanded_extent;
        self
    }

    pub fn stop_offset(mut self, stop_offset: ValId) -> Self {
        self.stop_offset = Some(stop_offset);
        self
    }

    pub fn parallel_type(mut self, parallel_type: ParallelType) -> Self {
        self.parallel_type = parallel_type;
        self
    }

    pub fn iter_type(mut self, iter_type: IterType) -> Self {
        self.iter_type = iter_type;
        self
    }

    pub fn is_rfactor_product(mut self, is_rfactor_product: bool) -> Self {
        self.is_rfactor_product = is_rfactor_product;
        self
    }

    pub fn is_padded_dimension(mut self, is_padded_dimension: bool) -> Self {
        self.is_padded_dimension = is_padded_dimension;
        self
    }

    pub fn padded_to_size(mut self, padded_to_size: Option<i64>) -> Self {
        self.padded_to_size = padded_to_size;
        self
    }

    pub fn is_mma_swizzled(mut self, is_mma_swizzled: bool) -> Self {
        self.is_mma_swizzled = is_mma_swizzled;
        self
    }

    /// Validate the configuration and register the domain.
    pub fn build(self, fusion: &mut Fusion) -> Result<ValId> {
        let start = self.start.context(MissingBuilderFieldSnafu { field: "start" })?;
        let extent = self.extent.context(MissingBuilderFieldSnafu { field: "extent" })?;
        let stop_offset = self.stop_offset.unwrap_or_else(|| fusion.zero_val());

        let integral = |fusion: &Fusion, what: &'static str, id: ValId| -> Result<()> {
            let val = fusion.try_val(id)?;
            ensure!(
                val.is_integral_scalar(),
                NonIntegralValueSnafu { what, value: fusion.render(id), dtype: val.dtype() }
            );
            Ok(())
        };
        integral(fusion, "iter domain start", start)?;
        integral(fusion, "iter domain extent", extent)?;
        integral(fusion, "iter domain stop offset", stop_offset)?;
        if let Some(expanded) = self.expanded_extent {
            integral(fusion, "iter domain expanded extent", expanded)?;
        }

        let domain = IterDomain {
            start,
            extent,
            expanded_extent: self.expanded_extent,
            stop_offset,
            parallel_type: self.parallel_type,
            iter_type: self.iter_type,
            is_rfactor_product: self.is_rfactor_product,
            is_padded_dimension: self.is_padded_dimension,
            padded_to_size: self.padded_to_size,
            is_mma_swizzled: self.is_mma_swizzled,
        };
        ensure!(
            !(domain.is_broadcast() && domain.is_rfactor_product),
            BroadcastRFactorSnafu {
                id: format!("b{}{{{}}}rf", domain.parallel_type.short_name(), fusion.render(extent)),
            }
        );

        Ok(fusion.register_val(ValKind::IterDomain(domain), DataType::Int))
    }
}
