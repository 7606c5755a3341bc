//! Value nodes: scalars, named scalars, iteration domains, tensor domains
//! and the tensor views that own them.

use fuser_dtype::{Complex, DataType, ext::HasDataType};
use smallvec::SmallVec;
use strum::EnumDiscriminants;

use crate::{ExprId, IterDomain, ParallelType, TensorDomain, ValId};

/// Concrete value of a constant scalar.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::From)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    ComplexDouble(Complex),
}

impl ScalarValue {
    /// Data type a scalar holding this value is created with.
    pub const fn dtype(&self) -> DataType {
        match self {
            Self::Bool(_) => bool::DATA_TYPE,
            Self::Int(_) => i64::DATA_TYPE,
            Self::Double(_) => f64::DATA_TYPE,
            Self::ComplexDouble(_) => Complex::DATA_TYPE,
        }
    }
}

/// A boolean, integer, floating or complex scalar. Symbolic when `value` is
/// `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scalar {
    value: Option<ScalarValue>,
}

impl Scalar {
    pub const fn new(value: Option<ScalarValue>) -> Self {
        Self { value }
    }

    pub const fn value(&self) -> Option<ScalarValue> {
        self.value
    }

    pub const fn is_const(&self) -> bool {
        self.value.is_some()
    }

    pub const fn as_int(&self) -> Option<i64> {
        match self.value {
            Some(ScalarValue::Int(v)) => Some(v),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self.value {
            Some(ScalarValue::Bool(v)) => Some(v),
            _ => None,
        }
    }

    pub const fn as_double(&self) -> Option<f64> {
        match self.value {
            Some(ScalarValue::Double(v)) => Some(v),
            _ => None,
        }
    }

    /// Literal zero of any numeric kind.
    pub fn is_zero(&self) -> bool {
        match self.value {
            Some(ScalarValue::Int(v)) => v == 0,
            Some(ScalarValue::Double(v)) => v == 0.0,
            Some(ScalarValue::ComplexDouble(c)) => c == Complex::default(),
            Some(ScalarValue::Bool(b)) => !b,
            None => false,
        }
    }

    /// Literal one of any numeric kind.
    pub fn is_one(&self) -> bool {
        match self.value {
            Some(ScalarValue::Int(v)) => v == 1,
            Some(ScalarValue::Double(v)) => v == 1.0,
            Some(ScalarValue::ComplexDouble(c)) => c == Complex::new(1.0, 0.0),
            Some(ScalarValue::Bool(b)) => b,
            None => false,
        }
    }
}

/// A scalar known by name only, such as `threadIdx.x` or `blockDim.y`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedScalar {
    name: String,
}

impl NamedScalar {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parallel type whose launch size this scalar names.
    pub fn parallel_dim(&self) -> Option<ParallelType> {
        <ParallelType as strum::IntoEnumIterator>::iter()
            .find(|ptype| ptype.thread_size_name() == Some(self.name.as_str()))
    }

    /// The parallel type whose index this scalar names.
    pub fn parallel_index(&self) -> Option<ParallelType> {
        <ParallelType as strum::IntoEnumIterator>::iter()
            .find(|ptype| ptype.is_thread() && ptype.to_string() == self.name)
    }
}

/// A materialized tensor described by a [`TensorDomain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorView {
    pub(crate) domain: ValId,
}

impl TensorView {
    pub const fn domain(&self) -> ValId {
        self.domain
    }
}

/// An indexed reference into a tensor view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorIndex {
    pub(crate) view: ValId,
    pub(crate) indices: SmallVec<[ValId; 4]>,
}

impl TensorIndex {
    pub const fn view(&self) -> ValId {
        self.view
    }

    pub fn indices(&self) -> &[ValId] {
        &self.indices
    }
}

#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(ValType), derive(Hash, strum::Display, strum::EnumIter))]
pub enum ValKind {
    Scalar(Scalar),
    NamedScalar(NamedScalar),
    IterDomain(IterDomain),
    TensorDomain(TensorDomain),
    TensorView(TensorView),
    TensorIndex(TensorIndex),
}

/// A value node. Owned by its [`Fusion`](crate::Fusion) and referred to by
/// [`ValId`].
#[derive(Debug, Clone)]
pub struct Val {
    pub(crate) kind: ValKind,
    pub(crate) dtype: DataType,
    pub(crate) definition: Option<ExprId>,
    pub(crate) uses: SmallVec<[ExprId; 4]>,
    pub(crate) is_fusion_input: bool,
    pub(crate) is_fusion_output: bool,
}

impl Val {
    pub(crate) fn new(kind: ValKind, dtype: DataType) -> Self {
        Self { kind, dtype, definition: None, uses: SmallVec::new(), is_fusion_input: false, is_fusion_output: false }
    }

    pub fn kind(&self) -> &ValKind {
        &self.kind
    }

    pub fn vtype(&self) -> ValType {
        ValType::from(&self.kind)
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    /// Operation producing this value, if any.
    pub fn definition(&self) -> Option<ExprId> {
        self.definition
    }

    pub fn uses(&self) -> &[ExprId] {
        &self.uses
    }

    pub fn is_fusion_input(&self) -> bool {
        self.is_fusion_input
    }

    pub fn is_fusion_output(&self) -> bool {
        self.is_fusion_output
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match &self.kind {
            ValKind::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_named_scalar(&self) -> Option<&NamedScalar> {
        match &self.kind {
            ValKind::NamedScalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_iter_domain(&self) -> Option<&IterDomain> {
        match &self.kind {
            ValKind::IterDomain(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_tensor_domain(&self) -> Option<&TensorDomain> {
        match &self.kind {
            ValKind::TensorDomain(td) => Some(td),
            _ => None,
        }
    }

    pub fn as_tensor_view(&self) -> Option<&TensorView> {
        match &self.kind {
            ValKind::TensorView(tv) => Some(tv),
            _ => None,
        }
    }

    pub fn as_tensor_index(&self) -> Option<&TensorIndex> {
        match &self.kind {
            ValKind::TensorIndex(ti) => Some(ti),
            _ => None,
        }
    }

    /// Constant integer value, if this is a constant integral scalar.
    pub fn const_int(&self) -> Option<i64> {
        self.as_scalar().and_then(Scalar::as_int)
    }

    pub fn is_const_scalar(&self) -> bool {
        self.as_scalar().is_some_and(Scalar::is_const)
    }

    /// Scalar or named scalar of integral type.
    pub fn is_integral_scalar(&self) -> bool {
        matches!(self.kind, ValKind::Scalar(_) | ValKind::NamedScalar(_)) && self.dtype.is_integral()
    }

    pub fn is_zero_int(&self) -> bool {
        self.const_int() == Some(0)
    }

    pub fn is_one_int(&self) -> bool {
        self.const_int() == Some(1)
    }

    /// Scalar-like values: scalars and named scalars.
    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, ValKind::Scalar(_) | ValKind::NamedScalar(_))
    }

    /// Tensor-like values: tensor views and tensor indices.
    pub fn is_tensor(&self) -> bool {
        matches!(self.kind, ValKind::TensorView(_) | ValKind::TensorIndex(_))
    }
}
