//! Copying nodes between fusions.

use std::collections::{HashMap, HashSet};

use smallvec::SmallVec;

use crate::error::Result;
use crate::{ExprId, Fusion, IterDomain, TensorDomain, TensorIndex, TensorView, ValId, ValKind};

/// Clones values and expressions of `source` into a target fusion,
/// remembering the old-to-new handle mapping.
///
/// Cloning a value also clones the values it refers to and the expression
/// defining it, so the whole history a value depends on is carried over.
/// Uses are not followed.
#[derive(Debug)]
pub struct IrCloner<'a> {
    source: &'a Fusion,
    vals: HashMap<ValId, ValId>,
    exprs: HashMap<ExprId, ExprId>,
    in_progress: HashSet<ExprId>,
}

impl<'a> IrCloner<'a> {
    /// The target's shared zero and one stand in for the source's.
    pub fn new(source: &'a Fusion, target: &Fusion) -> Self {
        let vals = HashMap::from([
            (source.zero_val(), target.zero_val()),
            (source.one_val(), target.one_val()),
        ]);
        Self { source, vals, exprs: HashMap::new(), in_progress: HashSet::new() }
    }

    pub fn val_map(&self) -> &HashMap<ValId, ValId> {
        &self.vals
    }

    pub fn expr_map(&self) -> &HashMap<ExprId, ExprId> {
        &self.exprs
    }

    pub fn clone_val(&mut self, target: &mut Fusion, id: ValId) -> Result<ValId> {
        if let Some(&mapped) = self.vals.get(&id) {
            return Ok(mapped);
        }
        let source = self.source;
        let val = source.try_val(id)?;

        let kind = match val.kind() {
            kind @ (ValKind::Scalar(_) | ValKind::NamedScalar(_)) => kind.clone(),
            ValKind::IterDomain(d) => ValKind::IterDomain(IterDomain {
                start: self.clone_val(target, d.start)?,
                extent: self.clone_val(target, d.extent)?,
                expanded_extent: d.expanded_extent.map(|e| self.clone_val(target, e)).transpose()?,
                stop_offset: self.clone_val(target, d.stop_offset)?,
                ..*d
            }),
            ValKind::TensorDomain(td) => {
                let mut cloned = td.clone();
                cloned.root_domain = self.clone_vals(target, &td.root_domain)?;
                cloned.rfactor_domain = self.clone_vals(target, &td.rfactor_domain)?;
                cloned.domain = self.clone_vals(target, &td.domain)?;
                cloned.reset_domains(target);
                ValKind::TensorDomain(cloned)
            }
            ValKind::TensorView(tv) => ValKind::TensorView(TensorView { domain: self.clone_val(target, tv.domain)? }),
            ValKind::TensorIndex(ti) => ValKind::TensorIndex(TensorIndex {
                view: self.clone_val(target, ti.view)?,
                indices: ti.indices.iter().map(|&i| self.clone_val(target, i)).collect::<Result<SmallVec<_>>>()?,
            }),
        };

        let new_id = target.register_val(kind, val.dtype());
        self.vals.insert(id, new_id);
        let new_val = target.val_mut(new_id)?;
        new_val.is_fusion_input = val.is_fusion_input();
        new_val.is_fusion_output = val.is_fusion_output();

        if let Some(def) = val.definition()
            && !self.in_progress.contains(&def)
        {
            self.clone_expr(target, def)?;
        }
        Ok(new_id)
    }

    pub fn clone_vals(&mut self, target: &mut Fusion, ids: &[ValId]) -> Result<Vec<ValId>> {
        ids.iter().map(|&id| self.clone_val(target, id)).collect()
    }

    pub fn clone_expr(&mut self, target: &mut Fusion, id: ExprId) -> Result<ExprId> {
        if let Some(&mapped) = self.exprs.get(&id) {
            return Ok(mapped);
        }
        let source = self.source;
        let expr = source.try_expr(id)?;
        self.in_progress.insert(id);

        let inputs = self.clone_vals(target, expr.inputs())?;
        let outputs = self.clone_vals(target, expr.outputs())?;
        let mut attributes = HashMap::new();
        for attr in expr.kind().attribute_vals() {
            attributes.insert(attr, self.clone_val(target, attr)?);
        }
        let kind = expr.kind().map_vals(|v| attributes.get(&v).copied().unwrap_or(v));

        let new_id = target.register_expr(kind, &inputs, &outputs)?;
        self.in_progress.remove(&id);
        self.exprs.insert(id, new_id);
        Ok(new_id)
    }
}

impl Fusion {
    /// Copy every value, every live expression and the inputs and outputs
    /// into a new fusion. Returns the copy and the old-to-new value map.
    pub fn copy(&self) -> Result<(Fusion, HashMap<ValId, ValId>)> {
        let mut target = Fusion::with_options(*self.options());
        let mut cloner = IrCloner::new(self, &target);

        for (id, _) in self.vals() {
            cloner.clone_val(&mut target, id)?;
        }
        for (id, _) in self.exprs() {
            cloner.clone_expr(&mut target, id)?;
        }
        for &input in self.inputs() {
            let mapped = cloner.clone_val(&mut target, input)?;
            target.inputs.push(mapped);
        }
        for &output in self.outputs() {
            let mapped = cloner.clone_val(&mut target, output)?;
            target.outputs.push(mapped);
        }
        Ok((target, cloner.vals))
    }
}

impl TensorDomain {
    /// Clone the tensor domain `td` of `source` into `target`.
    pub fn clone_into(source: &Fusion, target: &mut Fusion, td: ValId) -> Result<ValId> {
        IrCloner::new(source, target).clone_val(target, td)
    }
}
