use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complex::Complex;
use crate::escape::{escape_index, exceeds, step, ClassificationBuffer, EscapeParams};
use crate::error::CoreError;
use crate::grid::SampleGrid;
use crate::real::Real;

/// Order in which orbits are advanced.
///
/// Both orders record identical escape indices for every sample; they differ
/// only in memory access pattern and in how much work they can skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Run each sample's orbit to completion before moving on. Stops early per
    /// sample, so the work per sample is irregular.
    #[default]
    PerSample,

    /// Advance every live orbit by one step per pass over the grid. Regular,
    /// data-parallel access; resumable when only the budget grows.
    IterationSweep,
}

impl Strategy {
    pub fn label(self) -> &'static str {
        match self {
            Self::PerSample => "per-sample",
            Self::IterationSweep => "iteration-sweep",
        }
    }
}

/// Classify every sample of `grid` with the chosen strategy.
pub fn classify<T: Real, G: SampleGrid<T> + ?Sized>(
    grid: &G,
    params: &EscapeParams<T>,
    strategy: Strategy,
) -> ClassificationBuffer {
    let buffer = match strategy {
        Strategy::PerSample => classify_per_sample(grid, params),
        Strategy::IterationSweep => classify_sweep(grid, params),
    };
    debug!(
        strategy = strategy.label(),
        samples = buffer.len(),
        escaped = buffer.escaped_count(),
        "Classified grid"
    );
    buffer
}

/// Sample-major classification: one complete orbit per sample.
pub fn classify_per_sample<T: Real, G: SampleGrid<T> + ?Sized>(
    grid: &G,
    params: &EscapeParams<T>,
) -> ClassificationBuffer {
    let data = (0..grid.len())
        .map(|i| ClassificationBuffer::encode(escape_index(grid.sample(i), params)))
        .collect();
    ClassificationBuffer {
        width: grid.width(),
        height: grid.height(),
        n_iterations: params.n_iterations,
        data,
    }
}

/// Iteration-major classification: one pass over all live samples per step.
pub fn classify_sweep<T: Real, G: SampleGrid<T> + ?Sized>(
    grid: &G,
    params: &EscapeParams<T>,
) -> ClassificationBuffer {
    let mut state = SweepState::new(grid, params.threshold);
    state.sweep_to(grid, params.n_iterations);
    state.snapshot()
}

/// Advance one orbit by the sweep's step `k`, marking `slot` if it escapes.
///
/// Already-escaped samples are left untouched, so their orbit value freezes
/// at the escaping iterate. Shared by the serial sweep and the parallel one.
#[inline(always)]
pub fn sweep_sample<T: Real>(
    z: &mut Complex<T>,
    slot: &mut i32,
    c: Complex<T>,
    threshold: T,
    k: u32,
) {
    if *slot != ClassificationBuffer::NOT_ESCAPED {
        return;
    }
    *z = step(*z, c);
    if exceeds(*z, threshold) {
        *slot = k as i32;
    }
}

// ---------------------------------------------------------------------------
// Incremental sweep
// ---------------------------------------------------------------------------

/// Resumable iteration-sweep state for one grid and threshold.
///
/// Holds every orbit's current value and its escape marker. Raising the
/// budget continues from the last completed step instead of starting over;
/// lowering it is answered from the markers alone, since an index recorded
/// under a larger budget is unchanged under any budget above it.
///
/// The state does not track the grid: callers pair it with the grid it was
/// created from and recreate it after any viewport transform.
#[derive(Debug, Clone)]
pub struct SweepState<T> {
    width: usize,
    height: usize,
    threshold: T,
    completed: u32,
    orbits: Vec<Complex<T>>,
    markers: Vec<i32>,
}

impl<T: Real> SweepState<T> {
    pub fn new<G: SampleGrid<T> + ?Sized>(grid: &G, threshold: T) -> Self {
        let len = grid.len();
        Self {
            width: grid.width(),
            height: grid.height(),
            threshold,
            completed: 0,
            orbits: vec![Complex::zero(); len],
            markers: vec![ClassificationBuffer::NOT_ESCAPED; len],
        }
    }

    /// Number of sweep steps applied so far.
    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn threshold(&self) -> T {
        self.threshold
    }

    /// Number of samples tracked.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Run sweep steps until `n_iterations` have been applied. A budget at or
    /// below [`completed`](Self::completed) does nothing. A grid whose size
    /// differs from the state's is rejected before any step runs.
    pub fn advance_to<G: SampleGrid<T> + ?Sized>(
        &mut self,
        grid: &G,
        n_iterations: u32,
    ) -> crate::Result<()> {
        self.check_grid(grid)?;
        self.sweep_to(grid, n_iterations);
        Ok(())
    }

    /// Fails with `LengthMismatch` unless `grid` has as many samples as the
    /// state tracks.
    pub fn check_grid<G: SampleGrid<T> + ?Sized>(&self, grid: &G) -> crate::Result<()> {
        let expected = grid.len();
        let actual = self.markers.len();
        if actual != expected {
            return Err(CoreError::LengthMismatch {
                width: grid.width(),
                height: grid.height(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    fn sweep_to<G: SampleGrid<T> + ?Sized>(&mut self, grid: &G, n_iterations: u32) {
        for k in self.completed..n_iterations {
            for (i, (z, slot)) in self.orbits.iter_mut().zip(&mut self.markers).enumerate() {
                sweep_sample(z, slot, grid.sample(i), self.threshold, k);
            }
        }
        self.completed = self.completed.max(n_iterations);
    }

    /// Mutable access to the orbit and marker buffers for an external
    /// executor that runs the step loop itself. It must call
    /// [`mark_completed`](Self::mark_completed) afterwards.
    pub fn buffers_mut(&mut self) -> (&mut [Complex<T>], &mut [i32]) {
        (&mut self.orbits, &mut self.markers)
    }

    pub fn mark_completed(&mut self, n_iterations: u32) {
        self.completed = self.completed.max(n_iterations);
    }

    /// The classification for everything computed so far.
    pub fn snapshot(&self) -> ClassificationBuffer {
        ClassificationBuffer {
            width: self.width,
            height: self.height,
            n_iterations: self.completed,
            data: self.markers.clone(),
        }
    }

    /// The classification under a smaller or equal `budget`, derived by
    /// discarding indices at or beyond it.
    pub fn classification(&self, budget: u32) -> crate::Result<ClassificationBuffer> {
        if budget == 0 || budget > self.completed {
            return Err(CoreError::InvalidIterations(budget));
        }
        let data = self
            .markers
            .iter()
            .map(|&k| {
                if k >= budget as i32 {
                    ClassificationBuffer::NOT_ESCAPED
                } else {
                    k
                }
            })
            .collect();
        Ok(ClassificationBuffer {
            width: self.width,
            height: self.height,
            n_iterations: budget,
            data,
        })
    }
}
