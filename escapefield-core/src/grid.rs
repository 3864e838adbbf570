use tracing::debug;

use crate::complex::Complex;
use crate::error::CoreError;
use crate::real::Real;
use crate::region::Region;

/// Smallest accepted extent along either axis. Interpolation divides by
/// `size - 1`, so a single row or column has no defined spacing.
pub const MIN_GRID_SIZE: usize = 2;

/// Read access to a row-major grid of complex samples.
///
/// Classifiers are generic over this trait so that both storage layouts are
/// classified by the same code, with static dispatch in the hot loop.
/// Sample `index` sits at `row = index / width`, `col = index % width`.
pub trait SampleGrid<T: Real>: Sync {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    fn sample(&self, index: usize) -> Complex<T>;

    fn len(&self) -> usize {
        self.width() * self.height()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Linear interpolation `left·(1 − t) + right·t`, exact at `t = 0` and `t = 1`.
#[inline]
pub fn lerp<T: Real>(left: T, right: T, t: T) -> T {
    left * (T::one() - t) + right * t
}

/// Fraction `index / (size − 1)`, computed in `f64` then narrowed.
#[inline]
fn axis_fraction<T: Real>(index: usize, size: usize) -> T {
    T::cast(index as f64 / (size as f64 - 1.0))
}

fn checked_len(width: usize, height: usize) -> crate::Result<usize> {
    if width < MIN_GRID_SIZE || height < MIN_GRID_SIZE {
        return Err(CoreError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(2).map(|_| n))
        .ok_or(CoreError::InvalidDimensions { width, height })
}

/// Visit every grid position in row-major order with its interpolated sample.
fn for_each_sample<T: Real>(
    width: usize,
    height: usize,
    region: &Region<T>,
    mut visit: impl FnMut(Complex<T>),
) {
    for row in 0..height {
        let im = lerp(region.imag_min, region.imag_max, axis_fraction(row, height));
        for col in 0..width {
            let re = lerp(region.real_min, region.real_max, axis_fraction(col, width));
            visit(Complex::new(re, im));
        }
    }
}

// ---------------------------------------------------------------------------
// Complex-sample grid
// ---------------------------------------------------------------------------

/// A `width × height` sampling of a region, stored as complex values.
///
/// Row 0 holds `imag_min` and the imaginary part increases with the row
/// index; consumers that draw top-down in screen space must flip rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    samples: Vec<Complex<T>>,
}

impl<T: Real> Grid<T> {
    /// Sample `region` on a `width × height` lattice that includes its edges.
    pub fn generate(width: usize, height: usize, region: &Region<T>) -> crate::Result<Self> {
        let len = checked_len(width, height)?;
        region.validate()?;

        let mut samples = Vec::with_capacity(len);
        for_each_sample(width, height, region, |c| samples.push(c));

        debug!(width, height, %region, precision = T::PRECISION.label(), "Generated grid");
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    pub fn samples(&self) -> &[Complex<T>] {
        &self.samples
    }

    /// The sample at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<Complex<T>> {
        if row < self.height && col < self.width {
            Some(self.samples[row * self.width + col])
        } else {
            None
        }
    }
}

impl<T: Real> SampleGrid<T> for Grid<T> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn sample(&self, index: usize) -> Complex<T> {
        self.samples[index]
    }
}

// ---------------------------------------------------------------------------
// Interleaved grid
// ---------------------------------------------------------------------------

/// The same sampling stored as flat `[re₀, im₀, re₁, im₁, …]` scalars.
///
/// This is the layout a two-channel float texture expects, and the one the
/// in-place viewport transforms operate on.
#[derive(Debug, Clone, PartialEq)]
pub struct InterleavedGrid<T> {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) values: Vec<T>,
}

impl<T: Real> InterleavedGrid<T> {
    pub fn generate(width: usize, height: usize, region: &Region<T>) -> crate::Result<Self> {
        let len = checked_len(width, height)?;
        region.validate()?;

        let mut values = Vec::with_capacity(len * 2);
        for_each_sample(width, height, region, |c| {
            values.push(c.re);
            values.push(c.im);
        });

        debug!(width, height, %region, precision = T::PRECISION.label(), "Generated interleaved grid");
        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// Wrap an existing interleaved buffer, checking it holds `2·width·height` scalars.
    pub fn from_raw(width: usize, height: usize, values: Vec<T>) -> crate::Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(2))
            .ok_or(CoreError::InvalidDimensions { width, height })?;
        if values.len() != expected {
            return Err(CoreError::LengthMismatch {
                width,
                height,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// The raw scalars, ready for upload.
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }
}

impl<T: Real> SampleGrid<T> for InterleavedGrid<T> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn sample(&self, index: usize) -> Complex<T> {
        Complex::new(self.values[2 * index], self.values[2 * index + 1])
    }
}

impl<T: Real> From<Grid<T>> for InterleavedGrid<T> {
    fn from(grid: Grid<T>) -> Self {
        let mut values = Vec::with_capacity(grid.samples.len() * 2);
        for c in &grid.samples {
            values.push(c.re);
            values.push(c.im);
        }
        Self {
            width: grid.width,
            height: grid.height,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> Region<f64> {
        Region::new(-2.0, 1.0, -1.0, 1.0).unwrap()
    }

    #[test]
    fn lerp_is_exact_at_endpoints() {
        assert_eq!(lerp(-2.0, 1.0, 0.0), -2.0);
        assert_eq!(lerp(-2.0, 1.0, 1.0), 1.0);
        assert_eq!(lerp(-1.1f32, 1.1f32, 1.0), 1.1f32);
    }

    #[test]
    fn corners_hit_region_bounds() {
        let g = Grid::generate(7, 5, &region()).unwrap();
        assert_eq!(g.get(0, 0), Some(Complex::new(-2.0, -1.0)));
        assert_eq!(g.get(4, 6), Some(Complex::new(1.0, 1.0)));
        assert_eq!(g.get(0, 6), Some(Complex::new(1.0, -1.0)));
        assert_eq!(g.get(4, 0), Some(Complex::new(-2.0, 1.0)));
        assert_eq!(g.get(5, 0), None);
        assert_eq!(g.get(0, 7), None);
    }

    #[test]
    fn three_by_three_layout() {
        let g = Grid::generate(3, 3, &region()).unwrap();
        assert_eq!(g.len(), 9);
        let expected = [
            (-2.0, -1.0),
            (-0.5, -1.0),
            (1.0, -1.0),
            (-2.0, 0.0),
            (-0.5, 0.0),
            (1.0, 0.0),
            (-2.0, 1.0),
            (-0.5, 1.0),
            (1.0, 1.0),
        ];
        for (i, &(re, im)) in expected.iter().enumerate() {
            assert_eq!(g.sample(i), Complex::new(re, im), "sample {i}");
        }
    }

    #[test]
    fn imaginary_part_ascends_with_row() {
        let g = Grid::generate(4, 6, &region()).unwrap();
        for row in 1..6 {
            let prev = g.get(row - 1, 0).unwrap().im;
            let cur = g.get(row, 0).unwrap().im;
            assert!(cur > prev);
        }
    }

    #[test]
    fn too_small_dimensions_rejected() {
        assert!(matches!(
            Grid::generate(1, 10, &region()),
            Err(CoreError::InvalidDimensions { width: 1, height: 10 })
        ));
        assert!(Grid::generate(10, 0, &region()).is_err());
        assert!(InterleavedGrid::generate(2, 1, &region()).is_err());
    }

    #[test]
    fn overflowing_dimensions_rejected() {
        assert!(Grid::generate(usize::MAX, 2, &region()).is_err());
    }

    #[test]
    fn inverted_region_rejected() {
        let bad = Region {
            real_min: 1.0,
            real_max: -2.0,
            imag_min: -1.0,
            imag_max: 1.0,
        };
        assert!(Grid::generate(4, 4, &bad).is_err());
    }

    #[test]
    fn interleaved_matches_complex_grid() {
        let g = Grid::generate(16, 9, &region()).unwrap();
        let il = InterleavedGrid::generate(16, 9, &region()).unwrap();
        assert_eq!(il.as_slice().len(), 2 * 16 * 9);
        for i in 0..g.len() {
            assert_eq!(g.sample(i), il.sample(i));
        }
        assert_eq!(InterleavedGrid::from(g), il);
    }

    #[test]
    fn single_precision_endpoints() {
        let r = Region::<f32>::new(-2.5, 1.0, -1.1, 1.1).unwrap();
        let g = Grid::generate(33, 17, &r).unwrap();
        assert_eq!(g.get(0, 0), Some(Complex::new(-2.5f32, -1.1)));
        assert_eq!(g.get(16, 32), Some(Complex::new(1.0f32, 1.1)));
    }

    #[test]
    fn from_raw_checks_length() {
        assert!(InterleavedGrid::from_raw(2, 2, vec![0.0f64; 8]).is_ok());
        assert!(matches!(
            InterleavedGrid::from_raw(2, 2, vec![0.0f64; 7]),
            Err(CoreError::LengthMismatch {
                expected: 8,
                actual: 7,
                ..
            })
        ));
    }
}
