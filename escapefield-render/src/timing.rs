use std::time::{Duration, Instant};

use tracing::info;

/// Length of one frame-rate measurement window.
const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Frame-rate counter owned by an interactive loop.
///
/// Call [`tick`](Self::tick) once per presented frame. Once more than a
/// second has passed since the window opened, the frame count becomes the
/// reported rate and a new window starts.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    window_start: Instant,
    frames: u32,
    fps: Option<u32>,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            window_start: start,
            frames: 0,
            fps: None,
        }
    }

    pub fn tick(&mut self) -> Option<u32> {
        self.tick_at(Instant::now())
    }

    /// Count a frame presented at `now`. Returns the new rate when a window
    /// closes, `None` otherwise.
    pub fn tick_at(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;
        if now.saturating_duration_since(self.window_start) <= FPS_WINDOW {
            return None;
        }
        let fps = self.frames;
        self.window_start = now;
        self.frames = 0;
        self.fps = Some(fps);
        info!(fps, "Frame rate");
        Some(fps)
    }

    /// The most recently completed measurement.
    pub fn fps(&self) -> Option<u32> {
        self.fps
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects named stage durations and logs them as one batch.
#[derive(Debug, Clone, Default)]
pub struct StageTimer {
    entries: Vec<(String, Duration)>,
}

impl StageTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the time elapsed since `start` under `name`.
    pub fn record(&mut self, name: impl Into<String>, start: Instant) {
        self.record_duration(name, start.elapsed());
    }

    pub fn record_duration(&mut self, name: impl Into<String>, elapsed: Duration) {
        self.entries.push((name.into(), elapsed));
    }

    pub fn entries(&self) -> &[(String, Duration)] {
        &self.entries
    }

    pub fn total(&self) -> Duration {
        self.entries.iter().map(|(_, d)| *d).sum()
    }

    /// Log every entry at `info` and clear the batch.
    pub fn flush(&mut self) -> Vec<(String, Duration)> {
        for (name, elapsed) in &self.entries {
            info!(stage = %name, elapsed_ms = elapsed.as_millis(), "Stage timing");
        }
        std::mem::take(&mut self.entries)
    }
}
