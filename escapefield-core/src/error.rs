use thiserror::Error;

/// Errors originating from the core field engine.
///
/// All of these are raised at a call boundary before any buffer is allocated
/// or mutated.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid grid dimensions: {width}×{height} (each must be >= 2)")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid region: {reason}")]
    InvalidRegion { reason: String },

    #[error("invalid escape threshold: {0} (must be positive and finite)")]
    InvalidThreshold(f64),

    #[error("invalid iteration budget: {0} (must be in 1..={max})", max = i32::MAX)]
    InvalidIterations(u32),

    #[error("invalid scale factor: {0} (must be finite)")]
    InvalidScaleFactor(f64),

    #[error("buffer length {actual} does not match {width}×{height} = {expected}")]
    LengthMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("escape index {value} at sample {position} is neither -1 nor in 0..{n_iterations}")]
    InvalidEscapeIndex {
        position: usize,
        value: i32,
        n_iterations: u32,
    },
}
