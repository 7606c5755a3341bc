use crate::*;
use proptest::prelude::*;

#[rustfmt::skip]
impl DataType {
    pub fn integral_generator() -> impl Strategy<Value = Self> {
        prop_oneof![Just(DataType::Int32), Just(DataType::Int), Just(DataType::Index)]
    }

    pub fn float_generator() -> impl Strategy<Value = Self> {
        prop_oneof![
            Just(DataType::Half), Just(DataType::BFloat16),
            Just(DataType::Float), Just(DataType::Double)
        ]
    }

    pub fn scalar_generator() -> impl Strategy<Value = Self> {
        prop_oneof![
            Just(DataType::Bool),
            Just(DataType::Int32), Just(DataType::Int), Just(DataType::Index),
            Just(DataType::Half), Just(DataType::BFloat16),
            Just(DataType::Float), Just(DataType::Double),
            Just(DataType::ComplexFloat), Just(DataType::ComplexDouble)
        ]
    }
}
