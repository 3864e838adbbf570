use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;
use crate::real::Real;

/// An axis-aligned rectangle of the complex plane.
///
/// Real bounds run along grid columns, imaginary bounds along grid rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region<T> {
    pub real_min: T,
    pub real_max: T,
    pub imag_min: T,
    pub imag_max: T,
}

impl<T: Real> Region<T> {
    /// Create a region, rejecting non-finite or inverted bounds.
    pub fn new(real_min: T, real_max: T, imag_min: T, imag_max: T) -> crate::Result<Self> {
        let region = Self {
            real_min,
            real_max,
            imag_min,
            imag_max,
        };
        region.validate()?;
        Ok(region)
    }

    /// The classic overview: `[-2, 1] × [-1, 1]`.
    pub fn overview() -> Self {
        Self {
            real_min: T::cast(-2.0),
            real_max: T::cast(1.0),
            imag_min: T::cast(-1.0),
            imag_max: T::cast(1.0),
        }
    }

    /// Narrow an `f64` region to this precision and re-check it.
    ///
    /// Bounds that are distinct in `f64` can round to the same `f32`, so the
    /// narrowed region is validated again.
    pub fn from_f64(region: &Region<f64>) -> crate::Result<Self> {
        Self::new(
            T::cast(region.real_min),
            T::cast(region.real_max),
            T::cast(region.imag_min),
            T::cast(region.imag_max),
        )
    }

    pub fn validate(&self) -> crate::Result<()> {
        let bounds = [self.real_min, self.real_max, self.imag_min, self.imag_max];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(CoreError::InvalidRegion {
                reason: format!("bounds must be finite, got {self}"),
            });
        }
        if self.real_min >= self.real_max {
            return Err(CoreError::InvalidRegion {
                reason: format!(
                    "real_min ({}) must be below real_max ({})",
                    self.real_min, self.real_max
                ),
            });
        }
        if self.imag_min >= self.imag_max {
            return Err(CoreError::InvalidRegion {
                reason: format!(
                    "imag_min ({}) must be below imag_max ({})",
                    self.imag_min, self.imag_max
                ),
            });
        }
        Ok(())
    }

    pub fn min_corner(&self) -> Complex<T> {
        Complex::new(self.real_min, self.imag_min)
    }

    pub fn max_corner(&self) -> Complex<T> {
        Complex::new(self.real_max, self.imag_max)
    }
}

impl<T: Real> std::fmt::Display for Region<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}] × [{}, {}]i",
            self.real_min, self.real_max, self.imag_min, self.imag_max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_is_valid() {
        let r = Region::<f64>::overview();
        assert!(r.validate().is_ok());
        assert_eq!(r.min_corner(), Complex::new(-2.0, -1.0));
        assert_eq!(r.max_corner(), Complex::new(1.0, 1.0));
    }

    #[test]
    fn inverted_bounds_rejected() {
        assert!(Region::new(1.0, -2.0, -1.0, 1.0).is_err());
        assert!(Region::new(-2.0, 1.0, 1.0, -1.0).is_err());
        assert!(Region::new(0.0, 0.0, -1.0, 1.0).is_err());
    }

    #[test]
    fn non_finite_bounds_rejected() {
        assert!(Region::new(f64::NAN, 1.0, -1.0, 1.0).is_err());
        assert!(Region::new(-2.0, f64::INFINITY, -1.0, 1.0).is_err());
        assert!(Region::new(-2.0f32, 1.0, f32::NEG_INFINITY, 1.0).is_err());
    }

    #[test]
    fn narrowing_can_collapse_a_region() {
        let wide = Region::new(1.0, 1.0 + 1e-12, -1.0, 1.0).unwrap();
        assert!(Region::<f64>::from_f64(&wide).is_ok());
        assert!(Region::<f32>::from_f64(&wide).is_err());
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{"real_min":-2.5,"real_max":1.0,"imag_min":-1.1,"imag_max":1.1}"#;
        let r: Region<f64> = serde_json::from_str(json).unwrap();
        assert!(r.validate().is_ok());
        assert_eq!(r.real_min, -2.5);
        assert_eq!(r.imag_max, 1.1);
    }
}
