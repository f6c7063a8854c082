//! Tunable parameters for the grid, the pattern library and playback.
//!
//! Everything lives in `TonnetzConfig`, built in code at startup. The
//! defaults reproduce the classic 7x8 staggered lattice with ten-step
//! patterns, a 200 ms step pause and a 250 ms tone.
use std::time::Duration;

use anyhow::ensure;

use crate::grid::RowOffset;

#[derive(Debug, Clone, Default)]
pub struct TonnetzConfig {
    pub grid: GridConfig,
    pub patterns: PatternConfig,
    pub playback: PlaybackConfig,
    pub layout: LayoutConfig,
}

impl TonnetzConfig {
    /// Reject configurations the core cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.grid.rows > 0 && self.grid.cols > 0,
            "grid must have at least one row and one column (got {}x{})",
            self.grid.rows,
            self.grid.cols
        );
        ensure!(self.patterns.steps >= 1, "patterns need at least one step");
        ensure!(
            self.playback.history_len >= 1,
            "activation history must hold at least one cell"
        );
        ensure!(
            self.layout.radius > 0.0 && self.layout.x_spacing > 0.0 && self.layout.y_spacing > 0.0,
            "layout sizes must be positive"
        );
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    pub row_offset: RowOffset,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 7,
            cols: 8,
            row_offset: RowOffset::Staggered,
        }
    }
}

/// Whether generated library entries are rebuilt on every play request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegenerationPolicy {
    /// Generate once when the library is built and reuse forever.
    #[default]
    Once,
    /// Regenerate the algorithmic entries before each play.
    PerPlay,
}

#[derive(Debug, Clone)]
pub struct PatternConfig {
    /// Requested length of every generated pattern.
    pub steps: usize,
    /// Multiplier applied to (row, col) before sampling the noise field.
    pub noise_scale: f64,
    /// Seed for the Perlin field. Fixed so the noise ranking is stable.
    pub noise_seed: u32,
    pub regeneration: RegenerationPolicy,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            steps: 10,
            noise_scale: 0.1,
            noise_seed: 0,
            regeneration: RegenerationPolicy::Once,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Pause after each played step.
    pub step_delay: Duration,
    /// How many cells stay lit before the oldest reverts.
    pub history_len: usize,
    pub tone: ToneConfig,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            step_delay: Duration::from_millis(200),
            history_len: 3,
            tone: ToneConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToneConfig {
    pub duration: Duration,
    pub attack: Duration,
    pub decay: Duration,
    /// Level of the second harmonic relative to the fundamental.
    pub overtone_gain: f32,
    /// Final output scale.
    pub gain: f32,
    /// Used when no output device reports its own rate.
    pub fallback_sample_rate: u32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(250),
            attack: Duration::from_millis(20),
            decay: Duration::from_millis(100),
            overtone_gain: 0.3,
            gain: 0.3,
            fallback_sample_rate: 44_100,
        }
    }
}

/// Screen geometry of the lattice, in pixels.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub x_spacing: f32,
    pub y_spacing: f32,
    pub margin: f32,
    pub radius: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            x_spacing: 90.0,
            y_spacing: 90.0,
            margin: 50.0,
            radius: 25.0,
        }
    }
}
