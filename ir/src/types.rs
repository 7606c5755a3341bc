//! Tag enums shared by values and operations: parallel placement, iteration
//! kinds, swizzles, operation codes and mma options.

use strum::{Display, EnumIter, IntoStaticStr};

/// Hardware placement of an iteration domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, IntoStaticStr)]
pub enum ParallelType {
    #[strum(to_string = "blockIdx.z")]
    BIDz,
    #[strum(to_string = "blockIdx.y")]
    BIDy,
    #[strum(to_string = "blockIdx.x")]
    BIDx,
    #[strum(to_string = "threadIdx.z")]
    TIDz,
    #[strum(to_string = "threadIdx.y")]
    TIDy,
    #[strum(to_string = "threadIdx.x")]
    TIDx,
    #[strum(to_string = "V")]
    Vectorize,
    #[strum(to_string = "MV")]
    MisalignedVectorize,
    #[strum(to_string = "UR")]
    Unroll,
    #[strum(to_string = "US")]
    Unswitch,
    #[strum(to_string = "MMA")]
    Mma,
    #[strum(to_string = "G")]
    Group,
    #[default]
    #[strum(to_string = "S")]
    Serial,
}

impl ParallelType {
    /// Thread index dimensions (`threadIdx.*`).
    pub const fn is_thread_dim(&self) -> bool {
        matches!(self, Self::TIDx | Self::TIDy | Self::TIDz)
    }

    /// Block index dimensions (`blockIdx.*`).
    pub const fn is_block_dim(&self) -> bool {
        matches!(self, Self::BIDx | Self::BIDy | Self::BIDz)
    }

    /// Either a thread or a block dimension.
    pub const fn is_thread(&self) -> bool {
        self.is_thread_dim() || self.is_block_dim()
    }

    pub const fn is_vectorize(&self) -> bool {
        matches!(self, Self::Vectorize | Self::MisalignedVectorize)
    }

    /// Placements that require a zero start and a constant extent.
    pub const fn requires_static_extent(&self) -> bool {
        matches!(self, Self::Unroll | Self::Vectorize | Self::MisalignedVectorize | Self::Group)
    }

    /// Name of the launch-size scalar of a thread or block dimension
    /// (`blockDim.x`, `gridDim.y`, ...).
    pub const fn thread_size_name(&self) -> Option<&'static str> {
        Some(match self {
            Self::BIDz => "gridDim.z",
            Self::BIDy => "gridDim.y",
            Self::BIDx => "gridDim.x",
            Self::TIDz => "blockDim.z",
            Self::TIDy => "blockDim.y",
            Self::TIDx => "blockDim.x",
            _ => return None,
        })
    }

    /// Short tag used when rendering iteration domains.
    pub const fn short_name(&self) -> &'static str {
        match self {
            Self::BIDz => "bz",
            Self::BIDy => "by",
            Self::BIDx => "bx",
            Self::TIDz => "tz",
            Self::TIDy => "ty",
            Self::TIDx => "tx",
            Self::Vectorize => "V",
            Self::MisalignedVectorize => "MV",
            Self::Unroll => "UR",
            Self::Unswitch => "US",
            Self::Mma => "MMA",
            Self::Group => "G",
            Self::Serial => "S",
        }
    }
}

/// How an iteration domain participates in data movement and accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum IterType {
    #[default]
    Iteration,
    Reduction,
    Broadcast,
    /// Inner output of a strided split; carries no data of its own.
    Stride,
    /// Window axis introduced by a gather.
    Gather,
    VectorComponent,
}

impl IterType {
    pub(crate) const fn prefix(&self) -> char {
        match self {
            Self::Iteration => 'i',
            Self::Reduction => 'r',
            Self::Broadcast => 'b',
            Self::Stride => 's',
            Self::Gather => 'g',
            Self::VectorComponent => 'v',
        }
    }
}

/// Two-dimensional swizzle patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Swizzle2DType {
    NoSwizzle,
    ZShape,
    Transpose,
    Xor,
    Scatter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum UnaryOpType {
    Abs,
    Cast,
    Ceil,
    Cos,
    Exp,
    Floor,
    Log,
    Neg,
    Not,
    Reciprocal,
    Relu,
    Rsqrt,
    Set,
    Sigmoid,
    Sin,
    Sqrt,
    Tanh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum BinaryOpType {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    CeilDiv,
    Max,
    Min,
    And,
    Or,
    Xor,
    Eq,
    NE,
    LT,
    LE,
    GT,
    GE,
    Lshift,
    Rshift,
}

impl BinaryOpType {
    /// Comparisons always produce a boolean.
    pub const fn is_logical(&self) -> bool {
        matches!(self, Self::Eq | Self::NE | Self::LT | Self::LE | Self::GT | Self::GE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum TernaryOpType {
    Clamp,
    Lerp,
    Threshold,
    Where,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum LoadStoreOpType {
    #[default]
    Set,
    LdMatrix,
    LdMatrixTranspose,
    CpAsync,
}

/// Hardware matrix-multiply instruction shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum MmaMacro {
    #[default]
    NoMma,
    Volta16x16x4,
    Turing16x8x16,
    Ampere16x8x16,
    Ampere16x16x16,
}

/// Operand layout of a matrix multiply (transposition of A and B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum MmaLayout {
    #[default]
    TT,
    TN,
    NT,
    NN,
}

/// Options carried by an [`MmaOp`](crate::ExprKind::MmaOp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
#[display("{macro_kind}/{layout}/stride{accumulator_stride}")]
pub struct MmaOptions {
    pub macro_kind: MmaMacro,
    pub layout: MmaLayout,
    pub accumulator_stride: u32,
}
