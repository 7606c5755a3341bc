//! Ordered composition of iteration domains describing one tensor.
//!
//! A tensor domain keeps three views of the same tensor: the root domain it
//! was created with, an optional rfactor domain, and the current domain that
//! transformations rewrite. Every current (and rfactor) axis must be derived
//! from the root domain through registered history expressions.

mod algebra;
mod queries;

pub use queries::{has_broadcast, has_nontrivial_reduction, has_reduction, no_broadcasts, no_reductions, same_domains};

use std::collections::HashSet;

use fuser_dtype::DataType;
use snafu::ensure;

use crate::error::*;
use crate::{Fusion, ValId, ValKind, traversal};

#[derive(Debug, Clone, PartialEq)]
pub struct TensorDomain {
    pub(crate) root_domain: Vec<ValId>,
    pub(crate) domain: Vec<ValId>,
    pub(crate) rfactor_domain: Vec<ValId>,
    pub(crate) contiguity: Vec<bool>,
    no_bcast_domain: Vec<ValId>,
    no_reduction_domain: Vec<ValId>,
    has_nontrivial_reduction: bool,
}

impl TensorDomain {
    /// Register a domain whose current domain is its root.
    pub fn new_root(fusion: &mut Fusion, root: Vec<ValId>, contiguity: Option<Vec<bool>>) -> Result<ValId> {
        Self::create(fusion, root.clone(), Vec::new(), root, contiguity)
    }

    /// Register a domain with an already transformed current domain.
    pub fn with_domain(
        fusion: &mut Fusion,
        root: Vec<ValId>,
        domain: Vec<ValId>,
        contiguity: Option<Vec<bool>>,
    ) -> Result<ValId> {
        Self::create(fusion, root, Vec::new(), domain, contiguity)
    }

    /// Register a domain with root, rfactor and current domains.
    pub fn with_rfactor(
        fusion: &mut Fusion,
        root: Vec<ValId>,
        rfactor: Vec<ValId>,
        domain: Vec<ValId>,
        contiguity: Option<Vec<bool>>,
    ) -> Result<ValId> {
        Self::create(fusion, root, rfactor, domain, contiguity)
    }

    fn create(
        fusion: &mut Fusion,
        root_domain: Vec<ValId>,
        rfactor_domain: Vec<ValId>,
        domain: Vec<ValId>,
        contiguity: Option<Vec<bool>>,
    ) -> Result<ValId> {
        for &id in root_domain.iter().chain(&rfactor_domain).chain(&domain) {
            fusion.iter_domain(id)?;
        }

        let expected = if rfactor_domain.is_empty() { root_domain.len() } else { rfactor_domain.len() };
        let contiguity = contiguity.unwrap_or_else(|| vec![false; expected]);
        ensure!(contiguity.len() == expected, ContiguityLengthSnafu { expected, actual: contiguity.len() });

        validate_traced(fusion, &root_domain, &domain, "current")?;
        validate_traced(fusion, &root_domain, &rfactor_domain, "rfactor")?;

        let mut td = Self {
            root_domain,
            domain,
            rfactor_domain,
            contiguity,
            no_bcast_domain: Vec::new(),
            no_reduction_domain: Vec::new(),
            has_nontrivial_reduction: false,
        };
        td.reset_domains(fusion);

        let id = fusion.register_val(ValKind::TensorDomain(td), DataType::Null);
        tracing::debug!(td = %fusion.display(id), "registered tensor domain");
        Ok(id)
    }

    /// Recompute the derived views after the current domain changed.
    pub(crate) fn reset_domains(&mut self, fusion: &Fusion) {
        self.no_reduction_domain = no_reductions(fusion, &self.domain);
        self.no_bcast_domain = no_broadcasts(fusion, &self.domain);
        self.has_nontrivial_reduction = has_nontrivial_reduction(fusion, &self.domain);
    }

    /// Replace the current domain of `td` and refresh its derived views.
    pub(crate) fn set_domain(fusion: &mut Fusion, td: ValId, domain: Vec<ValId>) -> Result<()> {
        let mut updated = fusion.tensor_domain(td)?.clone();
        updated.domain = domain;
        updated.reset_domains(fusion);
        *fusion.tensor_domain_mut(td)? = updated;
        Ok(())
    }

    /// Set the contiguity flags, one per rfactor-or-root axis.
    pub fn set_contiguity(fusion: &mut Fusion, td: ValId, contiguity: Vec<bool>) -> Result<()> {
        let expected = fusion.tensor_domain(td)?.maybe_rfactor_domain().len();
        ensure!(contiguity.len() == expected, ContiguityLengthSnafu { expected, actual: contiguity.len() });
        fusion.tensor_domain_mut(td)?.contiguity = contiguity;
        Ok(())
    }

    pub fn root_domain(&self) -> &[ValId] {
        &self.root_domain
    }

    /// The current domain.
    pub fn domain(&self) -> &[ValId] {
        &self.domain
    }

    pub fn rfactor_domain(&self) -> &[ValId] {
        &self.rfactor_domain
    }

    /// The rfactor domain when present, the root domain otherwise.
    pub fn maybe_rfactor_domain(&self) -> &[ValId] {
        if self.rfactor_domain.is_empty() { &self.root_domain } else { &self.rfactor_domain }
    }

    pub fn contiguity(&self) -> &[bool] {
        &self.contiguity
    }

    pub fn n_dims(&self) -> usize {
        self.domain.len()
    }

    /// Current axes that are neither reductions nor strides.
    pub fn no_reductions(&self) -> &[ValId] {
        &self.no_reduction_domain
    }

    /// Current axes that are not broadcasts.
    pub fn no_broadcasts(&self) -> &[ValId] {
        &self.no_bcast_domain
    }
}

/// Every iteration domain feeding `ids` must be a member of `root`.
fn validate_traced(fusion: &Fusion, root: &[ValId], ids: &[ValId], which: &'static str) -> Result<()> {
    let root: HashSet<ValId> = root.iter().copied().collect();
    for leaf in traversal::inputs_of(fusion, ids, &root) {
        let is_domain = fusion.get_val(leaf).is_some_and(|v| v.as_iter_domain().is_some());
        ensure!(!is_domain || root.contains(&leaf), UntracedDomainSnafu { id: fusion.render(leaf), which });
    }
    Ok(())
}
