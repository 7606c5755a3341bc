use super::*;

/// Maps a native Rust scalar to the data type its constants take in a fusion.
pub trait HasDataType {
    const DATA_TYPE: DataType;
}

macro_rules! impl_dtype_ext {
    ($($ty:ty => $dtype:expr),* $(,)?) => {
        $(impl HasDataType for $ty { const DATA_TYPE: DataType = $dtype; })*
    };
}

impl_dtype_ext! {
    bool => DataType::Bool,
    i32 => DataType::Int32, i64 => DataType::Int,
    f32 => DataType::Float, f64 => DataType::Double,
    Complex => DataType::ComplexDouble,
}
