use std::time::{Duration, Instant};

use tracing::{debug, info};

use escapefield_core::{
    ClassificationBuffer, EscapeParams, InterleavedGrid, Real, Region, Strategy, SweepState,
};
use escapefield_render::{
    advance_sweep, map_intensity, map_palette_index, render, FrameTimer, Normalization,
    PaletteMapping, StageTimer,
};

use crate::config::FieldConfig;
use crate::navigation::{NavEvent, Navigator};

/// What one frame produced, reduced to a few numbers for logging and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStats {
    pub event: Option<NavEvent>,
    pub n_iterations: u32,
    pub samples: usize,
    pub escaped: usize,
    pub mean_intensity: f64,
    pub max_palette_index: u32,
}

#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub frames: Vec<FrameStats>,
    pub fps: Option<u32>,
    pub elapsed: Duration,
}

/// Run the configured session at precision `T`: one frame for the initial
/// view, then one per scripted event.
pub fn run<T: Real>(config: &FieldConfig) -> escapefield_render::Result<SessionSummary> {
    let start = Instant::now();
    let mut stages = StageTimer::new();
    let region = Region::<T>::from_f64(&config.region)?;
    let grid = InterleavedGrid::generate(config.width, config.height, &region)?;
    stages.record("grid", start);
    let params = EscapeParams::new(T::cast(config.threshold), config.n_iterations)?;
    let palette = PaletteMapping::new(config.palette_colors, config.not_escaped_index)?;

    info!(
        width = config.width,
        height = config.height,
        %region,
        precision = T::PRECISION.label(),
        strategy = config.strategy.label(),
        events = config.events.len(),
        "Starting session"
    );

    let navigator = Navigator::new(grid, T::cast(config.pan_step), T::cast(config.zoom_step));
    let mut session = Session {
        navigator,
        params,
        strategy: config.strategy,
        palette,
        not_escaped_intensity: config.not_escaped_intensity,
        sweep: None,
        frame_timer: FrameTimer::new(),
        stages,
        frames: Vec::with_capacity(config.events.len() + 1),
    };

    session.frame(None)?;
    for &event in &config.events {
        session.frame(Some(event))?;
    }

    let summary = SessionSummary {
        frames: session.frames,
        fps: session.frame_timer.fps(),
        elapsed: start.elapsed(),
    };
    info!(
        frames = summary.frames.len(),
        elapsed_ms = summary.elapsed.as_millis(),
        "Session finished"
    );
    Ok(summary)
}

struct Session<T> {
    navigator: Navigator<T>,
    params: EscapeParams<T>,
    strategy: Strategy,
    palette: PaletteMapping,
    not_escaped_intensity: f32,
    /// Live sweep state for the current grid; dropped whenever the grid moves.
    sweep: Option<SweepState<T>>,
    frame_timer: FrameTimer,
    stages: StageTimer,
    frames: Vec<FrameStats>,
}

impl<T: Real> Session<T> {
    fn frame(&mut self, event: Option<NavEvent>) -> escapefield_render::Result<()> {
        if let Some(event) = event {
            self.handle(event)?;
        }

        let t = Instant::now();
        let classification = self.classify()?;
        self.stages.record("classify", t);

        let t = Instant::now();
        let norm = Normalization::over_budget(self.params.n_iterations)
            .with_not_escaped(self.not_escaped_intensity);
        let intensity = map_intensity(&classification, &norm);
        self.stages.record("intensity", t);

        let t = Instant::now();
        let indices = map_palette_index(&classification, &self.palette);
        self.stages.record("palette", t);

        let mean_intensity = if intensity.data.is_empty() {
            0.0
        } else {
            intensity.data.iter().map(|&v| v as f64).sum::<f64>() / intensity.data.len() as f64
        };
        let stats = FrameStats {
            event,
            n_iterations: classification.n_iterations,
            samples: classification.len(),
            escaped: classification.escaped_count(),
            mean_intensity,
            max_palette_index: indices.data.iter().copied().max().unwrap_or(0),
        };
        info!(
            frame = self.frames.len(),
            event = ?stats.event,
            n_iterations = stats.n_iterations,
            escaped = stats.escaped,
            samples = stats.samples,
            mean_intensity = stats.mean_intensity,
            max_palette_index = stats.max_palette_index,
            "Frame"
        );
        self.stages.flush();
        self.frame_timer.tick();
        self.frames.push(stats);
        Ok(())
    }

    fn handle(&mut self, event: NavEvent) -> escapefield_render::Result<()> {
        if event.moves_grid() {
            if self.navigator.apply(event)? {
                self.sweep = None;
            }
        } else {
            let current = self.params.n_iterations;
            let n = match event {
                NavEvent::IterationsUp => current
                    .saturating_mul(2)
                    .min(EscapeParams::<T>::MAX_ITERATIONS),
                _ => (current / 2).max(1),
            };
            self.params = self.params.with_iterations(n)?;
        }
        debug!(?event, n_iterations = self.params.n_iterations, "Handled event");
        Ok(())
    }

    /// Per-sample classification starts from scratch every frame. The sweep
    /// keeps its state across budget changes and only recomputes after the
    /// grid has moved.
    fn classify(&mut self) -> escapefield_render::Result<ClassificationBuffer> {
        let grid = self.navigator.grid();
        let n = self.params.n_iterations;
        match self.strategy {
            Strategy::PerSample => Ok(render(grid, &self.params, self.strategy).classification),
            Strategy::IterationSweep => {
                let threshold = self.params.threshold;
                let state = self
                    .sweep
                    .get_or_insert_with(|| SweepState::new(grid, threshold));
                if n > state.completed() {
                    advance_sweep(grid, state, n)?;
                    Ok(state.snapshot())
                } else {
                    Ok(state.classification(n)?)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escapefield_core::Precision;

    fn config(strategy: Strategy, events: Vec<NavEvent>) -> FieldConfig {
        FieldConfig {
            width: 48,
            height: 32,
            n_iterations: 40,
            threshold: 2.0,
            strategy,
            pan_step: 0.1,
            zoom_step: 0.2,
            events,
            ..FieldConfig::default()
        }
    }

    fn script() -> Vec<NavEvent> {
        vec![
            NavEvent::IterationsUp,
            NavEvent::IterationsDown,
            NavEvent::IterationsDown,
            NavEvent::PanRight,
            NavEvent::ZoomIn,
            NavEvent::IterationsUp,
            NavEvent::PanUp,
            NavEvent::ZoomOut,
        ]
    }

    #[test]
    fn one_frame_per_event_plus_initial() {
        let summary = run::<f64>(&config(Strategy::PerSample, script())).unwrap();
        assert_eq!(summary.frames.len(), 9);
        assert_eq!(summary.frames[0].event, None);
        assert_eq!(summary.frames[1].event, Some(NavEvent::IterationsUp));
        assert!(summary.frames.iter().all(|f| f.samples == 48 * 32));
    }

    #[test]
    fn budget_events_change_iterations() {
        let summary = run::<f64>(&config(Strategy::PerSample, script())).unwrap();
        let budgets: Vec<u32> = summary.frames.iter().map(|f| f.n_iterations).collect();
        assert_eq!(budgets, vec![40, 80, 40, 20, 20, 20, 40, 40, 40]);
    }

    #[test]
    fn sweep_session_matches_per_sample_session() {
        for precision in [Precision::Single, Precision::Double] {
            let per_sample = config(Strategy::PerSample, script());
            let sweep = config(Strategy::IterationSweep, script());
            let (a, b) = match precision {
                Precision::Single => (run::<f32>(&per_sample), run::<f32>(&sweep)),
                Precision::Double => (run::<f64>(&per_sample), run::<f64>(&sweep)),
            };
            assert_eq!(a.unwrap().frames, b.unwrap().frames, "{}", precision.label());
        }
    }

    #[test]
    fn palette_indices_stay_within_palette() {
        let mut cfg = config(Strategy::PerSample, vec![NavEvent::ZoomOut]);
        cfg.palette_colors = 8;
        let summary = run::<f64>(&cfg).unwrap();
        assert!(summary.frames.iter().all(|f| f.max_palette_index < 8));
        assert!(summary.frames.iter().all(|f| f.escaped > 0));
    }

    #[test]
    fn invalid_configuration_is_reported() {
        let mut cfg = config(Strategy::PerSample, Vec::new());
        cfg.width = 1;
        assert!(run::<f64>(&cfg).is_err());

        let mut cfg = config(Strategy::PerSample, Vec::new());
        cfg.n_iterations = 0;
        assert!(run::<f64>(&cfg).is_err());

        let mut cfg = config(Strategy::PerSample, Vec::new());
        cfg.palette_colors = 0;
        assert!(run::<f32>(&cfg).is_err());
    }
}
