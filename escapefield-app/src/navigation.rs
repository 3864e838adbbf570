use serde::{Deserialize, Serialize};
use tracing::debug;

use escapefield_core::{InterleavedGrid, Real, ScaleOutcome};

/// A discrete input event, as an arrow/zoom key press would produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavEvent {
    PanUp,
    PanDown,
    PanLeft,
    PanRight,
    ZoomIn,
    ZoomOut,
    /// Double the iteration budget.
    IterationsUp,
    /// Halve the iteration budget.
    IterationsDown,
}

impl NavEvent {
    /// Whether the event moves the grid (as opposed to changing the budget).
    pub fn moves_grid(self) -> bool {
        !matches!(self, Self::IterationsUp | Self::IterationsDown)
    }
}

/// Applies pan/zoom events to a live grid.
///
/// Pan distance follows the zoom level: every zoom step scales both pan
/// steps by the same factor it applies to the grid, so a key press always
/// moves the view by the same fraction of its extent.
pub struct Navigator<T> {
    grid: InterleavedGrid<T>,
    real_step: T,
    imag_step: T,
    zoom_step: T,
}

impl<T: Real> Navigator<T> {
    pub fn new(grid: InterleavedGrid<T>, pan_step: T, zoom_step: T) -> Self {
        Self {
            grid,
            real_step: pan_step,
            imag_step: pan_step,
            zoom_step,
        }
    }

    pub fn grid(&self) -> &InterleavedGrid<T> {
        &self.grid
    }

    pub fn steps(&self) -> (T, T) {
        (self.real_step, self.imag_step)
    }

    /// Apply one event. Returns `true` if the grid changed and must be
    /// reclassified.
    pub fn apply(&mut self, event: NavEvent) -> escapefield_core::Result<bool> {
        match event {
            NavEvent::PanUp => self.grid.adjust_imag(self.imag_step),
            NavEvent::PanDown => self.grid.adjust_imag(-self.imag_step),
            NavEvent::PanLeft => self.grid.adjust_real(-self.real_step),
            NavEvent::PanRight => self.grid.adjust_real(self.real_step),
            NavEvent::ZoomIn => return self.zoom(T::one() - self.zoom_step),
            NavEvent::ZoomOut => return self.zoom(T::one() + self.zoom_step),
            NavEvent::IterationsUp | NavEvent::IterationsDown => return Ok(false),
        }
        self.log_bounds();
        Ok(true)
    }

    fn zoom(&mut self, factor: T) -> escapefield_core::Result<bool> {
        match self.grid.adjust_scale(factor)? {
            ScaleOutcome::Empty => Ok(false),
            ScaleOutcome::Scaled { .. } => {
                self.real_step = self.real_step * factor;
                self.imag_step = self.imag_step * factor;
                self.log_bounds();
                Ok(true)
            }
        }
    }

    fn log_bounds(&self) {
        if let Some(corners) = self.grid.corners() {
            let (real_step, imag_step) = self.steps();
            debug!(%corners, %real_step, %imag_step, "Grid bounds");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escapefield_core::{Complex, Region};

    fn navigator() -> Navigator<f64> {
        let region = Region::new(-2.0, 2.0, -1.0, 1.0).unwrap();
        let grid = InterleavedGrid::generate(5, 5, &region).unwrap();
        Navigator::new(grid, 0.25, 0.5)
    }

    #[test]
    fn pan_moves_corners() {
        let mut nav = navigator();
        assert!(nav.apply(NavEvent::PanRight).unwrap());
        assert!(nav.apply(NavEvent::PanUp).unwrap());
        let c = nav.grid().corners().unwrap();
        assert_eq!(c.bottom_left, Complex::new(-1.75, -0.75));

        nav.apply(NavEvent::PanLeft).unwrap();
        nav.apply(NavEvent::PanDown).unwrap();
        let c = nav.grid().corners().unwrap();
        assert_eq!(c.bottom_left, Complex::new(-2.0, -1.0));
    }

    #[test]
    fn zoom_scales_grid_and_pan_steps() {
        let mut nav = navigator();
        assert!(nav.apply(NavEvent::ZoomIn).unwrap());
        assert_eq!(nav.steps(), (0.125, 0.125));
        let c = nav.grid().corners().unwrap();
        assert_eq!(c.top_right, Complex::new(1.0, 0.5));

        assert!(nav.apply(NavEvent::ZoomOut).unwrap());
        assert_eq!(nav.steps(), (0.1875, 0.1875));
    }

    #[test]
    fn budget_events_leave_grid_alone() {
        let mut nav = navigator();
        let before = nav.grid().clone();
        assert!(!nav.apply(NavEvent::IterationsUp).unwrap());
        assert!(!nav.apply(NavEvent::IterationsDown).unwrap());
        assert_eq!(nav.grid(), &before);
        assert!(!NavEvent::IterationsUp.moves_grid());
        assert!(NavEvent::ZoomOut.moves_grid());
    }

    #[test]
    fn empty_grid_zoom_reports_no_change() {
        let grid = InterleavedGrid::<f64>::from_raw(0, 0, Vec::new()).unwrap();
        let mut nav = Navigator::new(grid, 0.25, 0.5);
        assert!(!nav.apply(NavEvent::ZoomIn).unwrap());
        assert_eq!(nav.steps(), (0.25, 0.25));
    }
}
