use derive_more::Display;

/// Double precision complex constant.
#[derive(Debug, Clone, Copy, PartialEq, Default, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[display("({re}, {im})")]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub const fn is_real(&self) -> bool {
        self.im == 0.0
    }
}

impl From<f64> for Complex {
    fn from(re: f64) -> Self {
        Self { re, im: 0.0 }
    }
}
