pub mod complex;
pub mod ext;
pub mod promotion;

#[cfg(any(test, feature = "proptest"))]
pub mod proptest_gen;


pub use complex::Complex;

/// Data type carried by every value in a fusion graph.
///
/// Tensor-level values (`TensorDomain`) carry [`DataType::Null`]; iteration
/// domains are integral and carry [`DataType::Int`].
#[derive(Debug, Hash, PartialOrd, Ord)]
#[derive(strum::EnumCount, strum::EnumIter, strum::VariantArray, strum::FromRepr, strum::Display)]
#[derive(enumset::EnumSetType)]
#[cfg_attr(feature = "proptest", derive(proptest_derive::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[enumset(repr = "u32")]
pub enum DataType {
    #[strum(to_string = "bool")]
    Bool = 0,

    // Ordered by promotion priority (lower = more specific)
    #[strum(to_string = "nvfuser_index_t")]
    Index = 1,
    #[strum(to_string = "int")]
    Int32 = 2,
    #[strum(to_string = "int64_t")]
    Int = 3,

    #[strum(to_string = "__half")]
    Half = 4,
    #[strum(to_string = "__bfloat")]
    BFloat16 = 5,
    #[strum(to_string = "float")]
    Float = 6,
    #[strum(to_string = "double")]
    Double = 7,

    #[strum(to_string = "std::complex<float>")]
    ComplexFloat = 8,
    #[strum(to_string = "std::complex<double>")]
    ComplexDouble = 9,

    /// No data, used by composite values such as tensor domains.
    #[strum(to_string = "null")]
    Null = 10,
}

impl DataType {
    pub const fn bytes(&self) -> usize {
        match self {
            Self::Bool => 1,
            Self::Int32 => 4,
            Self::Int | Self::Index => 8,
            Self::Half | Self::BFloat16 => 2,
            Self::Float => 4,
            Self::Double => 8,
            Self::ComplexFloat => 8,
            Self::ComplexDouble => 16,
            Self::Null => 0,
        }
    }

    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    /// Integral types, including the index type.
    pub const fn is_integral(&self) -> bool {
        matches!(self, Self::Int | Self::Int32 | Self::Index)
    }

    pub const fn is_floating_point(&self) -> bool {
        matches!(self, Self::Half | Self::BFloat16 | Self::Float | Self::Double)
    }

    pub const fn is_complex(&self) -> bool {
        matches!(self, Self::ComplexFloat | Self::ComplexDouble)
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Real counterpart of a complex type; identity for everything else.
    pub const fn real_type(&self) -> Self {
        match self {
            Self::ComplexFloat => Self::Float,
            Self::ComplexDouble => Self::Double,
            _ => *self,
        }
    }
}
