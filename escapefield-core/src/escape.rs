use crate::complex::Complex;
use crate::error::CoreError;
use crate::real::Real;

/// Parameters controlling escape-time iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscapeParams<T> {
    /// Bailout modulus: an orbit has escaped once `|z| > threshold`.
    pub threshold: T,

    /// Iteration budget. Recorded escape indices lie in `0..n_iterations`.
    pub n_iterations: u32,
}

impl<T: Real> EscapeParams<T> {
    pub const DEFAULT_THRESHOLD: f64 = 2.0;
    pub const DEFAULT_ITERATIONS: u32 = 256;

    /// Largest budget whose indices still fit the signed `-1`-sentinel encoding.
    pub const MAX_ITERATIONS: u32 = i32::MAX as u32;

    pub fn new(threshold: T, n_iterations: u32) -> crate::Result<Self> {
        if threshold <= T::zero() || !threshold.is_finite() {
            return Err(CoreError::InvalidThreshold(threshold.widen()));
        }
        if n_iterations == 0 || n_iterations > Self::MAX_ITERATIONS {
            return Err(CoreError::InvalidIterations(n_iterations));
        }
        Ok(Self {
            threshold,
            n_iterations,
        })
    }

    /// Return a copy with a different budget.
    pub fn with_iterations(self, n_iterations: u32) -> crate::Result<Self> {
        Self::new(self.threshold, n_iterations)
    }
}

impl<T: Real> Default for EscapeParams<T> {
    fn default() -> Self {
        Self {
            threshold: T::cast(Self::DEFAULT_THRESHOLD),
            n_iterations: Self::DEFAULT_ITERATIONS,
        }
    }
}

/// One application of the recurrence `z ↦ z² + c`.
#[inline(always)]
pub fn step<T: Real>(z: Complex<T>, c: Complex<T>) -> Complex<T> {
    z.square() + c
}

/// Whether `z` lies beyond the bailout modulus.
///
/// NaN moduli compare false, so an orbit that degenerates to NaN is never
/// recorded as escaped.
#[inline(always)]
pub fn exceeds<T: Real>(z: Complex<T>, threshold: T) -> bool {
    z.norm() > threshold
}

/// Iterate the orbit of `c` from `z₀ = 0` and return the first index `k` for
/// which `|z_{k+1}| > threshold`, or `None` if the budget runs out first.
#[inline]
pub fn escape_index<T: Real>(c: Complex<T>, params: &EscapeParams<T>) -> Option<u32> {
    let mut z = Complex::zero();
    for k in 0..params.n_iterations {
        z = step(z, c);
        if exceeds(z, params.threshold) {
            return Some(k);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Classification buffer
// ---------------------------------------------------------------------------

/// Per-sample escape indices for a whole grid.
///
/// Each entry is either [`NOT_ESCAPED`](Self::NOT_ESCAPED) or the first
/// iteration index in `0..n_iterations` at which the orbit crossed the
/// threshold. Row-major, same layout as the grid it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationBuffer {
    pub width: usize,
    pub height: usize,
    pub n_iterations: u32,
    pub data: Vec<i32>,
}

impl ClassificationBuffer {
    pub const NOT_ESCAPED: i32 = -1;

    /// A buffer with every sample marked not-escaped.
    pub fn new(width: usize, height: usize, n_iterations: u32) -> Self {
        Self {
            width,
            height,
            n_iterations,
            data: vec![Self::NOT_ESCAPED; width * height],
        }
    }

    /// Wrap computed indices, checking the length against the dimensions and
    /// every entry against the budget.
    pub fn from_data(
        width: usize,
        height: usize,
        n_iterations: u32,
        data: Vec<i32>,
    ) -> crate::Result<Self> {
        let expected = width * height;
        if data.len() != expected {
            return Err(CoreError::LengthMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        if let Some((position, &value)) = data
            .iter()
            .enumerate()
            .find(|&(_, &k)| k != Self::NOT_ESCAPED && (k < 0 || k as u32 >= n_iterations))
        {
            return Err(CoreError::InvalidEscapeIndex {
                position,
                value,
                n_iterations,
            });
        }
        Ok(Self {
            width,
            height,
            n_iterations,
            data,
        })
    }

    /// Encode an optional escape index into the signed representation.
    #[inline]
    pub fn encode(index: Option<u32>) -> i32 {
        match index {
            Some(k) => k as i32,
            None => Self::NOT_ESCAPED,
        }
    }

    /// The escape index of sample `index`, or `None` if it did not escape.
    #[inline]
    pub fn escaped_at(&self, index: usize) -> Option<u32> {
        let k = self.data[index];
        (k != Self::NOT_ESCAPED).then_some(k as u32)
    }

    pub fn escaped_count(&self) -> usize {
        self.data.iter().filter(|&&k| k != Self::NOT_ESCAPED).count()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
