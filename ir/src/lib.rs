//! Intermediate representation of the fusion compiler.
//!
//! A [`Fusion`] owns a graph of values (scalars, iteration domains, tensor
//! domains, tensors) and the expressions relating them. Iteration domains
//! record their own transformation history: splitting, merging and
//! swizzling an axis registers the transformation as an expression, so the
//! current loop structure of a tensor can always be traced back to its root.
//!
//! # Module Organization
//!
//! - [`fusion`] - The owning container and node registration
//! - [`val`] / [`expr`] - Value and expression node kinds
//! - [`iter_domain`] - Iteration axes, their builder and split/merge/swizzle
//! - [`tensor_domain`] - Ordered axis lists and the domain algebra
//! - [`rfactor`] - Two-stage reduction replay
//! - [`ops`] - Operation constructors with producer/consumer validation
//! - [`equality`] - Structural equality (`same_as`)
//! - [`cloner`] - Copying nodes between fusions
//! - [`arith`] - Scalar arithmetic with constant folding
//! - [`traversal`] - Dependency walks over the graph
//! - [`error`] - Error types and result handling

pub mod arith;
pub mod cloner;
pub mod config;
pub mod display;
pub mod equality;
pub mod error;
pub mod expr;
pub mod fusion;
pub mod ids;
pub mod iter_domain;
pub mod ops;
pub mod prelude;
pub mod rfactor;
pub mod root_map;
pub mod tensor_domain;
pub mod traversal;
pub mod types;
pub mod val;


// All core types are accessible at the crate root
pub use cloner::IrCloner;
pub use config::FusionOptions;
pub use display::{ExprDisplay, ValDisplay};
pub use equality::{StructuralEq, are_equal_scalars};
pub use error::{Error, Result};
pub use expr::{Expr, ExprKind, ExprType};
pub use fusion::Fusion;
pub use ids::{ExprId, ValId};
pub use iter_domain::{IterDomain, IterDomainBuilder};
pub use rfactor::{RFactorReplay, ReplayRFactor};
pub use root_map::{PairwiseRootDomainMap, RootDomainMap};
pub use tensor_domain::TensorDomain;
pub use types::{
    BinaryOpType, IterType, LoadStoreOpType, MmaLayout, MmaMacro, MmaOptions, ParallelType, Swizzle2DType,
    TernaryOpType, UnaryOpType,
};
pub use val::{NamedScalar, Scalar, ScalarValue, TensorIndex, TensorView, Val, ValKind, ValType};

// Re-export external types for convenience
pub use fuser_dtype::{Complex, DataType};
