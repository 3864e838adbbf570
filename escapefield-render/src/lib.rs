pub mod error;
pub mod intensity;
pub mod renderer;
pub mod timing;

pub use error::RenderError;
pub use intensity::{
    map_intensity, map_palette_index, IndexBuffer, IntensityBuffer, Normalization, PaletteMapping,
};
pub use renderer::{advance_sweep, render, RenderResult};
pub use timing::{FrameTimer, StageTimer};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
