use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

use crate::real::Real;

/// A complex number with components of either precision.
///
/// `Copy` and operator-based so the orbit loop reads like the recurrence it
/// implements.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T: Real> Complex<T> {
    #[inline]
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero())
    }

    /// Returns `re² + im²` without taking the square root.
    #[inline]
    pub fn norm_sq(self) -> T {
        self.re * self.re + self.im * self.im
    }

    /// The complex modulus `|z|`.
    ///
    /// Uses `hypot`, so it stays finite for components whose squares would
    /// overflow.
    #[inline]
    pub fn norm(self) -> T {
        self.re.hypot(self.im)
    }

    /// `z²`, expanded as `(re² − im²) + 2·re·im·i`.
    #[inline]
    pub fn square(self) -> Self {
        Self {
            re: self.re * self.re - self.im * self.im,
            im: (self.re + self.re) * self.im,
        }
    }
}

// -- Arithmetic operators --

impl<T: Real> Add for Complex<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl<T: Real> Sub for Complex<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}

impl<T: Real> Mul for Complex<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

impl<T: Real> std::fmt::Display for Complex<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.im >= T::zero() {
            write!(f, "{} + {}i", self.re, self.im)
        } else {
            write!(f, "{} - {}i", self.re, -self.im)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn zero_constant() {
        let z = Complex::<f64>::zero();
        assert_eq!(z.re, 0.0);
        assert_eq!(z.im, 0.0);
    }

    #[test]
    fn addition() {
        let a = Complex::new(1.0, 2.0);
        let b = Complex::new(3.0, 4.0);
        let c = a + b;
        assert!(approx_eq(c.re, 4.0));
        assert!(approx_eq(c.im, 6.0));
    }

    #[test]
    fn subtraction() {
        let c = Complex::new(5.0, 3.0) - Complex::new(2.0, 1.0);
        assert!(approx_eq(c.re, 3.0));
        assert!(approx_eq(c.im, 2.0));
    }

    #[test]
    fn multiplication() {
        // (1 + 2i)(3 + 4i) = 3 + 4i + 6i + 8i² = -5 + 10i
        let c = Complex::new(1.0, 2.0) * Complex::new(3.0, 4.0);
        assert!(approx_eq(c.re, -5.0));
        assert!(approx_eq(c.im, 10.0));
    }

    #[test]
    fn square_matches_self_multiplication() {
        let z = Complex::new(-0.75, 0.3);
        let sq = z.square();
        let mul = z * z;
        assert!(approx_eq(sq.re, mul.re));
        assert!(approx_eq(sq.im, mul.im));
    }

    #[test]
    fn squaring() {
        // (1 + i)² = 2i
        let z2 = Complex::new(1.0, 1.0).square();
        assert!(approx_eq(z2.re, 0.0));
        assert!(approx_eq(z2.im, 2.0));
    }

    #[test]
    fn norm() {
        let a = Complex::new(3.0, 4.0);
        assert!(approx_eq(a.norm_sq(), 25.0));
        assert!(approx_eq(a.norm(), 5.0));
    }

    #[test]
    fn norm_survives_large_components() {
        let a = Complex::<f64>::new(1e200, 1e200);
        assert!(a.norm_sq().is_infinite());
        assert!(a.norm().is_finite());
    }

    #[test]
    fn single_precision_norm() {
        let a = Complex::new(3.0f32, -4.0f32);
        assert_eq!(a.norm(), 5.0f32);
    }

    #[test]
    fn display_signs() {
        assert_eq!(Complex::new(-2.0, -1.0).to_string(), "-2 - 1i");
        assert_eq!(Complex::new(0.5, 0.0).to_string(), "0.5 + 0i");
    }
}
