pub mod classify;
pub mod complex;
pub mod error;
pub mod escape;
pub mod grid;
pub mod real;
pub mod region;
pub mod viewport;

// Re-export primary types for convenience.
pub use classify::{classify, classify_per_sample, classify_sweep, Strategy, SweepState};
pub use complex::Complex;
pub use error::CoreError;
pub use escape::{escape_index, ClassificationBuffer, EscapeParams};
pub use grid::{Grid, InterleavedGrid, SampleGrid};
pub use real::{Precision, Real};
pub use region::Region;
pub use viewport::{Corners, ScaleOutcome};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
