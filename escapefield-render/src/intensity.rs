use rayon::prelude::*;

use escapefield_core::ClassificationBuffer;

use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Scalar intensity
// ---------------------------------------------------------------------------

/// Linear normalization of escape indices into scalar intensities.
///
/// Escaped samples map to `(k − min_value) / (max_value − min_value)`, with no
/// clamping. Samples that never escaped map to `not_escaped` verbatim; the
/// formula is never applied to them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub min_value: f64,
    pub max_value: f64,
    pub not_escaped: f32,
}

impl Normalization {
    pub fn new(min_value: f64, max_value: f64, not_escaped: f32) -> crate::Result<Self> {
        if !min_value.is_finite() || !max_value.is_finite() || min_value == max_value {
            return Err(RenderError::InvalidNormalization {
                min_value,
                max_value,
            });
        }
        Ok(Self {
            min_value,
            max_value,
            not_escaped,
        })
    }

    /// `[0, n_iterations]` with not-escaped samples at `0.0`, so escaped
    /// samples land in `[0, 1)`.
    pub fn over_budget(n_iterations: u32) -> Self {
        Self {
            min_value: 0.0,
            max_value: n_iterations.max(1) as f64,
            not_escaped: 0.0,
        }
    }

    pub fn with_not_escaped(self, not_escaped: f32) -> Self {
        Self {
            not_escaped,
            ..self
        }
    }

    /// Intensity for a single encoded escape index.
    #[inline]
    pub fn intensity(&self, k: i32) -> f32 {
        if k == ClassificationBuffer::NOT_ESCAPED {
            return self.not_escaped;
        }
        ((k as f64 - self.min_value) / (self.max_value - self.min_value)) as f32
    }
}

/// Per-sample scalar intensities, row-major like the classification.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityBuffer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

/// Map a classification to scalar intensities.
pub fn map_intensity(classification: &ClassificationBuffer, norm: &Normalization) -> IntensityBuffer {
    let data = classification
        .data
        .par_iter()
        .map(|&k| norm.intensity(k))
        .collect();
    IntensityBuffer {
        width: classification.width,
        height: classification.height,
        data,
    }
}

// ---------------------------------------------------------------------------
// Palette index
// ---------------------------------------------------------------------------

/// Discrete mapping of escape indices onto an external palette.
///
/// Escaped samples map to `floor((n_colors − 1) · k / n_iterations)`; for a
/// 256-entry palette that is `floor(255 · k / n_iterations)`. Samples that
/// never escaped map to `not_escaped_index`, typically the background entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteMapping {
    pub n_colors: u32,
    pub not_escaped_index: u32,
}

impl PaletteMapping {
    /// Size of a byte-indexed palette.
    pub const BYTE_PALETTE: u32 = 256;

    pub fn new(n_colors: u32, not_escaped_index: u32) -> crate::Result<Self> {
        if n_colors == 0 {
            return Err(RenderError::InvalidPalette(n_colors));
        }
        Ok(Self {
            n_colors,
            not_escaped_index,
        })
    }

    /// Palette index for a single encoded escape index.
    ///
    /// Integer arithmetic, so the floor is exact for any budget.
    #[inline]
    pub fn index(&self, k: i32, n_iterations: u32) -> u32 {
        if k == ClassificationBuffer::NOT_ESCAPED || n_iterations == 0 {
            return self.not_escaped_index;
        }
        let scaled = (self.n_colors as u64 - 1) * k as u64 / n_iterations as u64;
        scaled as u32
    }
}

impl Default for PaletteMapping {
    fn default() -> Self {
        Self {
            n_colors: Self::BYTE_PALETTE,
            not_escaped_index: 0,
        }
    }
}

/// Per-sample palette indices, row-major like the classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBuffer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u32>,
}

/// Map a classification to palette indices.
pub fn map_palette_index(
    classification: &ClassificationBuffer,
    mapping: &PaletteMapping,
) -> IndexBuffer {
    let n_iterations = classification.n_iterations;
    let data = classification
        .data
        .par_iter()
        .map(|&k| mapping.index(k, n_iterations))
        .collect();
    IndexBuffer {
        width: classification.width,
        height: classification.height,
        data,
    }
}
