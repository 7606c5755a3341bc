use super::*;
use enumset::EnumSet;

impl DataType {
    const fn promotion_lattice(self) -> &'static [Self] {
        use DataType::*;
        match self {
            Bool => &[Int32],
            Index => &[Int],
            Int32 => &[Int],
            Int => &[Half, BFloat16],
            Half => &[Float],
            BFloat16 => &[Float],
            Float => &[Double, ComplexFloat],
            Double => &[ComplexDouble],
            ComplexFloat => &[ComplexDouble],
            ComplexDouble | Null => &[],
        }
    }

    fn get_recursive_parents(self) -> EnumSet<Self> {
        self.promotion_lattice()
            .iter()
            .fold(EnumSet::only(self), |dtypes, &parent| dtypes.union(parent.get_recursive_parents()))
    }

    /// Check if a value of this type can be represented in `to` without loss.
    pub fn can_safe_cast(self, to: Self) -> bool {
        if self.is_null() || to.is_null() {
            return self == to;
        }
        self.get_recursive_parents().contains(to)
    }

    /// Find the least upper bound type for a set of data types.
    ///
    /// Returns `None` for an empty slice, or when `Null` meets any other type.
    pub fn promote(dtypes: &[Self]) -> Option<Self> {
        dtypes
            .iter()
            .map(|d| d.get_recursive_parents())
            .reduce(|lhs, rhs| lhs.intersection(rhs))?
            .iter()
            .min()
    }
}
