//! Common imports for building and scheduling fusions.
//!
//! ```rust,ignore
//! use fuser_ir::prelude::*;
//! ```

// Container and handles
pub use crate::{ExprId, Fusion, ValId};

// Nodes
pub use crate::{Expr, ExprKind, IterDomain, IterDomainBuilder, TensorDomain, Val, ValKind};

// Enumerations
pub use crate::types::{BinaryOpType, IterType, ParallelType, Swizzle2DType, UnaryOpType};

// Helpers
pub use crate::arith;

// Re-exports from dependencies
pub use fuser_dtype::DataType;
