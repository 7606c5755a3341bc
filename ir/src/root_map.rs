//! Mapping between the root axes of a producer and a consumer tensor.

use std::collections::HashMap;

use crate::{Fusion, TensorDomain, ValId, tensor_domain};

/// Maps producer rfactor-or-root axes to consumer root axes.
pub trait RootDomainMap {
    fn map_producer_to_consumer(
        &self,
        fusion: &Fusion,
        producer: &TensorDomain,
        consumer: &TensorDomain,
    ) -> HashMap<ValId, ValId>;

    /// Inverse of [`map_producer_to_consumer`](Self::map_producer_to_consumer).
    fn map_consumer_to_producer(
        &self,
        fusion: &Fusion,
        producer: &TensorDomain,
        consumer: &TensorDomain,
    ) -> HashMap<ValId, ValId> {
        self.map_producer_to_consumer(fusion, producer, consumer).into_iter().map(|(p, c)| (c, p)).collect()
    }
}

/// Pairs axes positionally.
///
/// Producer reductions and strides have no consumer counterpart, and
/// consumer axes flagged as new broadcasts have no producer counterpart;
/// the remaining axes are paired in order.
#[derive(Debug, Clone, Default)]
pub struct PairwiseRootDomainMap {
    new_broadcast_flags: Vec<bool>,
}

impl PairwiseRootDomainMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip consumer root axes whose flag is set.
    pub fn with_broadcast_flags(flags: Vec<bool>) -> Self {
        Self { new_broadcast_flags: flags }
    }
}

impl RootDomainMap for PairwiseRootDomainMap {
    fn map_producer_to_consumer(
        &self,
        fusion: &Fusion,
        producer: &TensorDomain,
        consumer: &TensorDomain,
    ) -> HashMap<ValId, ValId> {
        let producer_ids = tensor_domain::no_reductions(fusion, producer.maybe_rfactor_domain());
        let consumer_ids = consumer
            .root_domain()
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.new_broadcast_flags.get(*i).copied().unwrap_or(false))
            .map(|(_, &id)| id);
        producer_ids.into_iter().zip(consumer_ids).collect()
    }
}
