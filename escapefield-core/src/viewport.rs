//! In-place pan and zoom on an [`InterleavedGrid`].
//!
//! Each operation rewrites the grid's scalars and returns; nothing is cached,
//! so the caller re-reads (or re-uploads) the buffer afterwards. A grid has a
//! single writer: concurrent transforms on the same grid must be serialized
//! by the caller, which `&mut self` already enforces within safe Rust.

use tracing::{debug, warn};

use crate::complex::Complex;
use crate::error::CoreError;
use crate::grid::InterleavedGrid;
use crate::real::Real;

/// Result of [`InterleavedGrid::adjust_scale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum ScaleOutcome {
    /// Every scalar was multiplied. `clamped` counts products that left the
    /// finite range and were pinned to the largest finite magnitude.
    Scaled { clamped: usize },

    /// The grid holds no samples; nothing was touched.
    Empty,
}

impl ScaleOutcome {
    pub fn clamped(self) -> usize {
        match self {
            Self::Scaled { clamped } => clamped,
            Self::Empty => 0,
        }
    }
}

/// The four corner samples of a grid, named by grid position.
///
/// "Bottom" is row 0, which holds the region's `imag_min` until a transform
/// moves it. A negative zoom factor mirrors the values, not the names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corners<T> {
    pub bottom_left: Complex<T>,
    pub bottom_right: Complex<T>,
    pub top_left: Complex<T>,
    pub top_right: Complex<T>,
}

impl<T: Real> std::fmt::Display for Corners<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "bottom-left ({}), bottom-right ({}), top-left ({}), top-right ({})",
            self.bottom_left, self.bottom_right, self.top_left, self.top_right
        )
    }
}

/// Multiply, pinning overflow to the finite extreme of the same sign.
#[inline]
fn scale_clamped<T: Real>(value: T, factor: T) -> (T, bool) {
    let product = value * factor;
    if product.is_infinite() {
        let pinned = if product > T::zero() {
            T::max_value()
        } else {
            T::min_value()
        };
        (pinned, true)
    } else {
        (product, false)
    }
}

impl<T: Real> InterleavedGrid<T> {
    /// Shift every real component by `delta`.
    pub fn adjust_real(&mut self, delta: T) {
        if self.values.is_empty() {
            warn!("Real shift requested on an empty grid; ignoring");
            return;
        }
        for re in self.values.iter_mut().step_by(2) {
            *re = *re + delta;
        }
    }

    /// Shift every imaginary component by `delta`.
    pub fn adjust_imag(&mut self, delta: T) {
        if self.values.is_empty() {
            warn!("Imaginary shift requested on an empty grid; ignoring");
            return;
        }
        for im in self.values.iter_mut().skip(1).step_by(2) {
            *im = *im + delta;
        }
    }

    /// Multiply every component, real and imaginary, by `factor`.
    ///
    /// This scales about the origin of the complex plane, not about the
    /// grid's centre. Products that would overflow are clamped to
    /// `T::max_value()` / `T::min_value()` and counted in the outcome.
    pub fn adjust_scale(&mut self, factor: T) -> crate::Result<ScaleOutcome> {
        if !factor.is_finite() {
            return Err(CoreError::InvalidScaleFactor(factor.widen()));
        }
        if self.values.is_empty() {
            warn!("Scale adjustment requested on an empty grid; ignoring");
            return Ok(ScaleOutcome::Empty);
        }

        let mut clamped = 0;
        for v in self.values.iter_mut() {
            let (scaled, hit) = scale_clamped(*v, factor);
            *v = scaled;
            clamped += hit as usize;
        }

        if clamped > 0 {
            warn!(
                clamped,
                factor = factor.widen(),
                "Scale adjustment overflowed; clamped to the finite range"
            );
        } else {
            debug!(factor = factor.widen(), "Scaled grid");
        }
        Ok(ScaleOutcome::Scaled { clamped })
    }

    /// The current corner samples, or `None` for an empty grid.
    pub fn corners(&self) -> Option<Corners<T>> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let at = |row: usize, col: usize| {
            let i = 2 * (row * self.width + col);
            Complex::new(self.values[i], self.values[i + 1])
        };
        let (last_row, last_col) = (self.height - 1, self.width - 1);
        Some(Corners {
            bottom_left: at(0, 0),
            bottom_right: at(0, last_col),
            top_left: at(last_row, 0),
            top_right: at(last_row, last_col),
        })
    }
}
