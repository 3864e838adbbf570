use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info};

use escapefield_core::classify::sweep_sample;
use escapefield_core::{
    escape_index, ClassificationBuffer, EscapeParams, Real, SampleGrid, Strategy, SweepState,
};

/// The result of a full-grid classification pass.
///
/// Contains raw escape indices only; apply an intensity or palette mapping
/// to turn them into something displayable.
pub struct RenderResult {
    pub classification: ClassificationBuffer,
    pub strategy: Strategy,
    pub elapsed: Duration,
}

/// Classify every sample of `grid` on the rayon pool.
///
/// Generic over the grid layout and precision for static dispatch. The
/// output is identical to the serial [`escapefield_core::classify`] for the
/// same inputs, whichever strategy is chosen.
pub fn render<T: Real, G: SampleGrid<T> + ?Sized>(
    grid: &G,
    params: &EscapeParams<T>,
    strategy: Strategy,
) -> RenderResult {
    let start = Instant::now();
    debug!(
        width = grid.width(),
        height = grid.height(),
        n_iterations = params.n_iterations,
        strategy = strategy.label(),
        precision = T::PRECISION.label(),
        "Starting parallel classification"
    );

    let classification = match strategy {
        Strategy::PerSample => render_per_sample(grid, params),
        Strategy::IterationSweep => {
            let mut state = SweepState::new(grid, params.threshold);
            sweep_steps(grid, &mut state, params.n_iterations);
            state.snapshot()
        }
    };

    let elapsed = start.elapsed();
    info!(
        elapsed_ms = elapsed.as_millis(),
        escaped = classification.escaped_count(),
        samples = classification.len(),
        strategy = strategy.label(),
        "Classification complete"
    );

    RenderResult {
        classification,
        strategy,
        elapsed,
    }
}

/// Continue an incremental sweep up to `n_iterations` on the rayon pool.
///
/// `state` must have been created from `grid`; a state of a different size
/// is rejected rather than indexed out of bounds.
pub fn advance_sweep<T: Real, G: SampleGrid<T> + ?Sized>(
    grid: &G,
    state: &mut SweepState<T>,
    n_iterations: u32,
) -> crate::Result<()> {
    state.check_grid(grid)?;
    let from = state.completed();
    sweep_steps(grid, state, n_iterations);
    debug!(from, to = state.completed(), "Advanced sweep");
    Ok(())
}

/// One parallel pass per iteration step. Steps run strictly in order: step
/// `k + 1` must observe the escape markers written by step `k`.
fn sweep_steps<T: Real, G: SampleGrid<T> + ?Sized>(
    grid: &G,
    state: &mut SweepState<T>,
    n_iterations: u32,
) {
    let threshold = state.threshold();
    let first = state.completed();
    {
        let (orbits, markers) = state.buffers_mut();
        for k in first..n_iterations {
            orbits
                .par_iter_mut()
                .zip(markers.par_iter_mut())
                .enumerate()
                .for_each(|(i, (z, slot))| sweep_sample(z, slot, grid.sample(i), threshold, k));
        }
    }
    state.mark_completed(n_iterations);
}

/// Rows are independent work units; each writes only its own output slice.
fn render_per_sample<T: Real, G: SampleGrid<T> + ?Sized>(
    grid: &G,
    params: &EscapeParams<T>,
) -> ClassificationBuffer {
    let width = grid.width();
    let mut classification =
        ClassificationBuffer::new(width, grid.height(), params.n_iterations);
    if width == 0 {
        return classification;
    }

    classification
        .data
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, out)| {
            let row_start = row * width;
            for (col, slot) in out.iter_mut().enumerate() {
                let c = grid.sample(row_start + col);
                *slot = ClassificationBuffer::encode(escape_index(c, params));
            }
        });
    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use escapefield_core::{classify, Grid, InterleavedGrid, Region};

    fn grid() -> Grid<f64> {
        Grid::generate(128, 96, &Region::new(-2.0, 1.0, -1.0, 1.0).unwrap()).unwrap()
    }

    #[test]
    fn parallel_matches_serial_per_sample() {
        let g = grid();
        let params = EscapeParams::new(2.0, 64).unwrap();
        let result = render(&g, &params, Strategy::PerSample);
        assert_eq!(result.classification, classify(&g, &params, Strategy::PerSample));
        assert_eq!(result.strategy, Strategy::PerSample);
    }

    #[test]
    fn parallel_matches_serial_sweep() {
        let g = grid();
        let params = EscapeParams::new(2.0, 64).unwrap();
        let result = render(&g, &params, Strategy::IterationSweep);
        assert_eq!(result.classification, classify(&g, &params, Strategy::IterationSweep));
    }

    #[test]
    fn parallel_strategies_agree_in_single_precision() {
        let r = Region::<f32>::new(-2.5, 1.0, -1.1, 1.1).unwrap();
        let g = InterleavedGrid::generate(100, 60, &r).unwrap();
        let params = EscapeParams::new(6.0f32, 200).unwrap();
        let a = render(&g, &params, Strategy::PerSample);
        let b = render(&g, &params, Strategy::IterationSweep);
        assert_eq!(a.classification, b.classification);
    }

    #[test]
    fn advance_sweep_resumes() {
        let g = grid();
        let mut state = SweepState::new(&g, 2.0);
        advance_sweep(&g, &mut state, 16).unwrap();
        advance_sweep(&g, &mut state, 48).unwrap();
        assert_eq!(state.completed(), 48);

        let fresh = render(&g, &EscapeParams::new(2.0, 48).unwrap(), Strategy::PerSample);
        assert_eq!(state.snapshot(), fresh.classification);
    }

    #[test]
    fn advance_sweep_rejects_foreign_state() {
        let g = grid();
        let other = Grid::generate(4, 4, &Region::<f64>::overview()).unwrap();
        let mut state = SweepState::new(&other, 2.0);
        assert!(advance_sweep(&g, &mut state, 8).is_err());
        assert_eq!(state.completed(), 0);
    }
}
