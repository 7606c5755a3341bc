//! The owning container of a fusion graph.
//!
//! Every value and expression lives in a [`Fusion`] and is referred to by a
//! [`ValId`] or [`ExprId`] handle. Nodes are never freed individually; an
//! expression replaced by a later definition of one of its outputs is only
//! marked removed.

use fuser_dtype::{Complex, DataType};
use smallvec::SmallVec;
use snafu::ensure;

use crate::error::*;
use crate::{
    Expr, ExprId, ExprKind, FusionOptions, IterDomain, NamedScalar, ParallelType, Scalar, ScalarValue, TensorDomain,
    TensorIndex, TensorView, Val, ValId, ValKind, ValType,
};

#[derive(Debug, Clone)]
pub struct Fusion {
    vals: Vec<Val>,
    exprs: Vec<Expr>,
    pub(crate) inputs: Vec<ValId>,
    pub(crate) outputs: Vec<ValId>,
    zero: ValId,
    one: ValId,
    options: FusionOptions,
}

impl Default for Fusion {
    fn default() -> Self {
        Self::new()
    }
}

impl Fusion {
    /// Create an empty fusion configured from the environment.
    pub fn new() -> Self {
        Self::with_options(FusionOptions::from_env())
    }

    pub fn with_options(options: FusionOptions) -> Self {
        let mut vals = Vec::with_capacity(64);
        vals.push(Val::new(ValKind::Scalar(Scalar::new(Some(ScalarValue::Int(0)))), DataType::Int));
        vals.push(Val::new(ValKind::Scalar(Scalar::new(Some(ScalarValue::Int(1)))), DataType::Int));
        Self {
            vals,
            exprs: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            zero: ValId::new(0),
            one: ValId::new(1),
            options,
        }
    }

    pub fn options(&self) -> &FusionOptions {
        &self.options
    }

    /// The shared integer zero used for defaulted starts and offsets.
    pub fn zero_val(&self) -> ValId {
        self.zero
    }

    /// The shared integer one.
    pub fn one_val(&self) -> ValId {
        self.one
    }

    // =========================================================================
    // Node access
    // =========================================================================

    pub fn contains_val(&self, id: ValId) -> bool {
        id.index() < self.vals.len()
    }

    pub fn contains_expr(&self, id: ExprId) -> bool {
        id.index() < self.exprs.len()
    }

    /// Look up a value, returning `None` for handles of another fusion.
    pub fn get_val(&self, id: ValId) -> Option<&Val> {
        self.vals.get(id.index())
    }

    pub fn get_expr(&self, id: ExprId) -> Option<&Expr> {
        self.exprs.get(id.index())
    }

    /// Look up a value issued by this fusion.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this fusion.
    pub fn val(&self, id: ValId) -> &Val {
        &self.vals[id.index()]
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this fusion.
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    pub fn try_val(&self, id: ValId) -> Result<&Val> {
        self.vals.get(id.index()).ok_or(Error::UnknownVal { id })
    }

    pub fn try_expr(&self, id: ExprId) -> Result<&Expr> {
        self.exprs.get(id.index()).ok_or(Error::UnknownExpr { id })
    }

    pub(crate) fn val_mut(&mut self, id: ValId) -> Result<&mut Val> {
        self.vals.get_mut(id.index()).ok_or(Error::UnknownVal { id })
    }

    /// All values in creation order.
    pub fn vals(&self) -> impl Iterator<Item = (ValId, &Val)> {
        self.vals.iter().enumerate().map(|(i, v)| (ValId::new(i), v))
    }

    /// Expressions that have not been replaced, in creation order.
    pub fn exprs(&self) -> impl Iterator<Item = (ExprId, &Expr)> {
        self.exprs.iter().enumerate().filter(|(_, e)| !e.removed).map(|(i, e)| (ExprId::new(i), e))
    }

    pub fn num_vals(&self) -> usize {
        self.vals.len()
    }

    pub fn definition(&self, id: ValId) -> Option<ExprId> {
        self.get_val(id).and_then(Val::definition)
    }

    fn typed<'a, T>(&'a self, id: ValId, expected: ValType, f: impl FnOnce(&'a Val) -> Option<&'a T>) -> Result<&'a T> {
        let val = self.try_val(id)?;
        f(val).ok_or(Error::UnexpectedValType { id, expected, actual: val.vtype() })
    }

    pub fn scalar(&self, id: ValId) -> Result<&Scalar> {
        self.typed(id, ValType::Scalar, Val::as_scalar)
    }

    pub fn named_scalar(&self, id: ValId) -> Result<&NamedScalar> {
        self.typed(id, ValType::NamedScalar, Val::as_named_scalar)
    }

    pub fn iter_domain(&self, id: ValId) -> Result<&IterDomain> {
        self.typed(id, ValType::IterDomain, Val::as_iter_domain)
    }

    pub fn tensor_domain(&self, id: ValId) -> Result<&TensorDomain> {
        self.typed(id, ValType::TensorDomain, Val::as_tensor_domain)
    }

    pub fn tensor_view(&self, id: ValId) -> Result<&TensorView> {
        self.typed(id, ValType::TensorView, Val::as_tensor_view)
    }

    pub fn tensor_index(&self, id: ValId) -> Result<&TensorIndex> {
        self.typed(id, ValType::TensorIndex, Val::as_tensor_index)
    }

    /// Domain of a tensor view.
    pub fn tensor_view_domain(&self, id: ValId) -> Result<&TensorDomain> {
        let domain = self.tensor_view(id)?.domain();
        self.tensor_domain(domain)
    }

    pub(crate) fn iter_domain_mut(&mut self, id: ValId) -> Result<&mut IterDomain> {
        let val = self.val_mut(id)?;
        let actual = val.vtype();
        match &mut val.kind {
            ValKind::IterDomain(iter_domain) => Ok(iter_domain),
            _ => UnexpectedValTypeSnafu { id, expected: ValType::IterDomain, actual }.fail(),
        }
    }

    pub(crate) fn tensor_domain_mut(&mut self, id: ValId) -> Result<&mut TensorDomain> {
        let val = self.val_mut(id)?;
        let actual = val.vtype();
        match &mut val.kind {
            ValKind::TensorDomain(td) => Ok(td),
            _ => UnexpectedValTypeSnafu { id, expected: ValType::TensorDomain, actual }.fail(),
        }
    }

    /// Human-readable rendering of a value, used in errors and dumps.
    pub fn render(&self, id: ValId) -> String {
        self.display(id).to_string()
    }

    // =========================================================================
    // Registration
    // =========================================================================

    pub(crate) fn register_val(&mut self, kind: ValKind, dtype: DataType) -> ValId {
        let id = ValId::new(self.vals.len());
        tracing::trace!(val.id = %id, val.kind = %ValType::from(&kind), %dtype, "registered val");
        self.vals.push(Val::new(kind, dtype));
        id
    }

    /// Register an expression, making it the definition of each output.
    ///
    /// An output that already had a definition loses it: the previous
    /// expression is removed from the fusion.
    pub fn register_expr(&mut self, kind: ExprKind, inputs: &[ValId], outputs: &[ValId]) -> Result<ExprId> {
        for &id in inputs.iter().chain(outputs).chain(kind.attribute_vals().iter()) {
            self.try_val(id)?;
        }

        for &out in outputs {
            if let Some(previous) = self.vals[out.index()].definition {
                self.remove_expr(previous)?;
            }
        }

        let id = ExprId::new(self.exprs.len());
        for &out in outputs {
            self.vals[out.index()].definition = Some(id);
        }
        for &input in inputs {
            let uses = &mut self.vals[input.index()].uses;
            if !uses.contains(&id) {
                uses.push(id);
            }
        }

        let etype = kind.etype();
        self.exprs.push(Expr {
            kind,
            inputs: SmallVec::from_slice(inputs),
            outputs: SmallVec::from_slice(outputs),
            removed: false,
        });

        if self.options.dump_exprs {
            tracing::info!(expr.id = %id, expr.kind = %etype, ?inputs, ?outputs, "registered expr");
        } else {
            tracing::trace!(expr.id = %id, expr.kind = %etype, ?inputs, ?outputs, "registered expr");
        }
        Ok(id)
    }

    /// Detach an expression from its inputs and outputs and mark it removed.
    pub fn remove_expr(&mut self, id: ExprId) -> Result<()> {
        let expr = self.exprs.get_mut(id.index()).ok_or(Error::UnknownExpr { id })?;
        if expr.removed {
            return Ok(());
        }
        expr.removed = true;
        let (inputs, outputs) = (expr.inputs.clone(), expr.outputs.clone());

        for input in inputs {
            self.vals[input.index()].uses.retain(|u| *u != id);
        }
        for output in outputs {
            let val = &mut self.vals[output.index()];
            if val.definition == Some(id) {
                val.definition = None;
            }
        }
        tracing::trace!(expr.id = %id, "removed expr");
        Ok(())
    }

    pub(crate) fn log_transform(&self, transform: &'static str, inputs: &[ValId], outputs: &[ValId]) {
        if self.options.dump_transforms {
            tracing::info!(transform, ?inputs, ?outputs, "domain transform");
        } else {
            tracing::debug!(transform, ?inputs, ?outputs, "domain transform");
        }
    }

    // =========================================================================
    // Fusion inputs and outputs
    // =========================================================================

    pub fn inputs(&self) -> &[ValId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[ValId] {
        &self.outputs
    }

    /// Mark a value as an input of the fusion. Constant scalars are rejected.
    pub fn add_input(&mut self, id: ValId) -> Result<()> {
        let val = self.try_val(id)?;
        ensure!(!val.is_const_scalar(), ConstantFusionInputSnafu { value: self.render(id) });

        self.vals[id.index()].is_fusion_input = true;
        if !self.inputs.contains(&id) {
            self.inputs.push(id);
        }
        Ok(())
    }

    pub fn add_output(&mut self, id: ValId) -> Result<()> {
        self.val_mut(id)?.is_fusion_output = true;
        if !self.outputs.contains(&id) {
            self.outputs.push(id);
        }
        Ok(())
    }

    // =========================================================================
    // Scalar, named scalar and tensor construction
    // =========================================================================

    /// Create a constant scalar. Every call creates a distinct node.
    pub fn new_scalar(&mut self, value: impl Into<ScalarValue>) -> ValId {
        let value = value.into();
        self.register_val(ValKind::Scalar(Scalar::new(Some(value))), value.dtype())
    }

    pub fn new_int(&mut self, value: i64) -> ValId {
        self.new_scalar(value)
    }

    pub fn new_double(&mut self, value: f64) -> ValId {
        self.new_scalar(value)
    }

    pub fn new_bool(&mut self, value: bool) -> ValId {
        self.new_scalar(value)
    }

    pub fn new_complex(&mut self, value: Complex) -> ValId {
        self.new_scalar(value)
    }

    /// Create a scalar without a known value.
    pub fn new_symbolic(&mut self, dtype: DataType) -> ValId {
        self.register_val(ValKind::Scalar(Scalar::default()), dtype)
    }

    pub fn new_named_scalar(&mut self, name: impl Into<String>, dtype: DataType) -> ValId {
        self.register_val(ValKind::NamedScalar(NamedScalar::new(name)), dtype)
    }

    /// Launch size of a thread or block dimension, e.g. `blockDim.x`.
    pub fn new_parallel_dim(&mut self, ptype: ParallelType) -> Option<ValId> {
        let name = ptype.thread_size_name()?;
        Some(self.new_named_scalar(name, DataType::Int))
    }

    /// Index of a thread or block dimension, e.g. `threadIdx.x`.
    pub fn new_parallel_index(&mut self, ptype: ParallelType) -> Option<ValId> {
        ptype.is_thread().then(|| self.new_named_scalar(ptype.to_string(), DataType::Int))
    }

    pub fn new_tensor_view(&mut self, domain: ValId, dtype: DataType) -> Result<ValId> {
        self.tensor_domain(domain)?;
        Ok(self.register_val(ValKind::TensorView(TensorView { domain }), dtype))
    }

    pub fn new_tensor_index(&mut self, view: ValId, indices: &[ValId]) -> Result<ValId> {
        self.tensor_view(view)?;
        for &index in indices {
            let val = self.try_val(index)?;
            ensure!(
                val.is_integral_scalar(),
                NonIntegralValueSnafu { what: "tensor index", value: self.render(index), dtype: val.dtype() }
            );
        }
        let dtype = self.val(view).dtype();
        Ok(self.register_val(ValKind::TensorIndex(TensorIndex { view, indices: SmallVec::from_slice(indices) }), dtype))
    }
}
