use fuser_dtype::DataType;
use snafu::Snafu;

use crate::{ExprId, ExprType, ParallelType, ValId, ValType};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Handle was not issued by this fusion.
    #[snafu(display("{id} is not registered in this fusion"))]
    UnknownVal { id: ValId },

    #[snafu(display("{id} is not registered in this fusion"))]
    UnknownExpr { id: ExprId },

    /// A typed accessor was called on the wrong kind of value.
    #[snafu(display("expected {expected} but {id} is a {actual}"))]
    UnexpectedValType { id: ValId, expected: ValType, actual: ValType },

    /// Extents, starts, offsets and split factors must be integral scalars.
    #[snafu(display("{what} must be an integral scalar, got {value} of type {dtype}"))]
    NonIntegralValue { what: &'static str, value: String, dtype: DataType },

    #[snafu(display("cannot register constant {value} as a fusion input"))]
    ConstantFusionInput { value: String },

    // =========================================================================
    // IterDomain construction and transformation
    // =========================================================================
    #[snafu(display("iter domain builder is missing `{field}`"))]
    MissingBuilderField { field: &'static str },

    #[snafu(display("{id} cannot be both a broadcast and an rfactor product"))]
    BroadcastRFactor { id: String },

    #[snafu(display("cannot {op} {id}: extent is zero"))]
    ZeroExtent { op: &'static str, id: String },

    #[snafu(display("cannot merge {outer} and {inner}: mixing reduction with non-reduction of non-unit extent"))]
    MergeReductionMismatch { outer: String, inner: String },

    #[snafu(display("cannot {op} {lhs} and {rhs}: only one of them is a gather axis"))]
    GatherMismatch { op: &'static str, lhs: String, rhs: String },

    #[snafu(display("invalid split factor {factor}: {reason}"))]
    InvalidSplitFactor { factor: String, reason: &'static str },

    #[snafu(display("partial split of {id} is only allowed on root domains"))]
    PartialSplitOnDerived { id: String },

    #[snafu(display("cannot strided-split broadcast domain {id}"))]
    StridedSplitBroadcast { id: String },

    #[snafu(display("cannot swizzle {id}: {reason}"))]
    InvalidSwizzle { id: String, reason: &'static str },

    #[snafu(display("cannot parallelize {id} with {ptype}: {reason}"))]
    InvalidParallelize { id: String, ptype: ParallelType, reason: &'static str },

    #[snafu(display("cannot {op} mma-swizzled domain {id}"))]
    MmaSwizzledTransform { op: &'static str, id: String },

    // =========================================================================
    // TensorDomain algebra
    // =========================================================================
    #[snafu(display("cannot {op} a 0-dim tensor domain"))]
    EmptyDomain { op: &'static str },

    #[snafu(display("axis {axis} is out of range for a domain of {ndims} axes"))]
    AxisOutOfRange { axis: i64, ndims: usize },

    #[snafu(display("cannot merge axis {axis} with itself"))]
    SameAxisMerge { axis: usize },

    #[snafu(display("{id} is not part of {domain}"))]
    DomainNotFound { id: String, domain: String },

    #[snafu(display("contiguity has {actual} entries but the domain has {expected} axes"))]
    ContiguityLength { expected: usize, actual: usize },

    #[snafu(display("{id} of the {which} domain does not trace back to the root domain"))]
    UntracedDomain { id: String, which: &'static str },

    #[snafu(display("invalid reorder map: {reason}"))]
    InvalidReorder { reason: String },

    #[snafu(display("invalid rfactor: {reason}"))]
    InvalidRFactor { reason: String },

    #[snafu(display("invalid flatten range [{start}, {end}] for a domain of {ndims} axes"))]
    InvalidFlattenRange { start: i64, end: i64, ndims: usize },

    // =========================================================================
    // Producer/consumer validation
    // =========================================================================
    #[snafu(display("{op}: {lhs} and {rhs} must be the same kind of value"))]
    MismatchedValCategory { op: ExprType, lhs: ValType, rhs: ValType },

    #[snafu(display("{op}: {id} must be a {expected}"))]
    InvalidOperand { op: ExprType, id: String, expected: &'static str },

    #[snafu(display("{op}: producer axis {id} has no mapping in the consumer"))]
    UnmappedProducerAxis { op: ExprType, id: String },

    #[snafu(display("{op}: producer axis {producer} maps to consumer axis {consumer} of a different kind"))]
    MismatchedAxisKind { op: ExprType, producer: String, consumer: String },

    #[snafu(display("{op}: consumer axis {id} has no producer and is not a flagged broadcast"))]
    UnflaggedBroadcastAxis { op: ExprType, id: String },

    #[snafu(display("{op}: input has {input} non-reduction axes but output root has {output}"))]
    RankMismatch { op: ExprType, input: usize, output: usize },

    #[snafu(display("{op}: initial value {value} must be a constant scalar"))]
    NonConstInit { op: ExprType, value: String },

    #[snafu(display("{op}: expected {expected} {what}, got {actual}"))]
    OperandCount { op: ExprType, what: &'static str, expected: usize, actual: usize },

    #[snafu(display("{op}: invalid permutation {permutation:?} of rank {rank}"))]
    InvalidPermutation { op: ExprType, permutation: Vec<usize>, rank: usize },

    #[snafu(display("division by zero"))]
    DivisionByZero,

    #[snafu(display("type promotion failed: no common type for {lhs} and {rhs}"))]
    TypePromotion { lhs: DataType, rhs: DataType },
}

/// Log an error raised while building an operation or transformation.
///
/// Construction errors are fatal for the calling stage; the event records
/// which node was being built so the failure can be located in a dump.
pub fn log_validation_error(context: impl std::fmt::Display, error: &Error) {
    tracing::error!(context = %context, error = %error, "fusion ir validation failed");
}
