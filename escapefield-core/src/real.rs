use std::fmt::{Debug, Display};

use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Floating-point width used for grid coordinates and orbit arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// `f32` coordinates, matching a single-channel float texture upload.
    Single,
    #[default]
    Double,
}

impl Precision {
    pub fn label(self) -> &'static str {
        match self {
            Self::Single => "f32",
            Self::Double => "f64",
        }
    }
}

/// Scalar type the engine is generic over.
///
/// Every algorithm is written once against this trait; `f32` and `f64` are the
/// only implementors. Configuration values arrive as `f64` and are narrowed
/// with [`cast`](Self::cast).
pub trait Real: Float + Debug + Display + Default + Send + Sync + 'static {
    const PRECISION: Precision;

    /// Convert from `f64`, rounding to the nearest representable value.
    fn cast(value: f64) -> Self;

    /// Widen to `f64` without loss.
    fn widen(self) -> f64;
}

impl Real for f32 {
    const PRECISION: Precision = Precision::Single;

    #[inline]
    fn cast(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn widen(self) -> f64 {
        self as f64
    }
}

impl Real for f64 {
    const PRECISION: Precision = Precision::Double;

    #[inline]
    fn cast(value: f64) -> Self {
        value
    }

    #[inline]
    fn widen(self) -> f64 {
        self
    }
}
