use thiserror::Error;

/// Errors originating from the render pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid normalization range: [{min_value}, {max_value}] (bounds must be finite and distinct)")]
    InvalidNormalization { min_value: f64, max_value: f64 },

    #[error("invalid palette size: {0} (must be >= 1)")]
    InvalidPalette(u32),

    #[error(transparent)]
    Core(#[from] escapefield_core::CoreError),
}
