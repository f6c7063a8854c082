/// Cell activation and the bounded highlight history.
///
/// Taps and pattern playback both go through `SequencerContext::activate`,
/// so they share one history and one view of the grid.
use std::collections::VecDeque;
use std::time::Duration;

use rand::Rng;

use crate::audio::ToneOutput;
use crate::config::{PatternConfig, PlaybackConfig};
use crate::grid::{Cell, Coordinate, GridTopology};
use crate::pattern::PatternLibrary;

pub mod playback;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl CellColor {
    /// Background and idle cell fill (light yellow).
    pub const NEUTRAL: CellColor = CellColor { r: 255, g: 255, b: 224 };

    /// A random pastel.
    pub fn pastel<R: Rng>(rng: &mut R) -> Self {
        Self {
            r: rng.random_range(180..=255),
            g: rng.random_range(140..=230),
            b: rng.random_range(180..=255),
        }
    }

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellVisual {
    #[default]
    Neutral,
    Lit(CellColor),
}

impl CellVisual {
    pub fn color(self) -> CellColor {
        match self {
            CellVisual::Neutral => CellColor::NEUTRAL,
            CellVisual::Lit(color) => color,
        }
    }
}

/// The render side: recolors a cell immediately.
pub trait CellSurface {
    fn set_cell_visual_state(&mut self, coord: Coordinate, visual: CellVisual);
}

/// Most recently lit cells, oldest first.
#[derive(Debug, Clone)]
pub struct ActivationHistory {
    entries: VecDeque<Coordinate>,
    capacity: usize,
}

impl ActivationHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record an activation; returns the entry pushed out, if any.
    pub fn push(&mut self, coord: Coordinate) -> Option<Coordinate> {
        self.entries.push_back(coord);
        if self.entries.len() > self.capacity {
            self.entries.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coordinate> {
        self.entries.iter()
    }
}

impl Default for ActivationHistory {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Session state shared by taps and playback: the grid, the pattern
/// library and the highlight history.
pub struct SequencerContext {
    topology: GridTopology,
    library: PatternLibrary,
    patterns: PatternConfig,
    history: ActivationHistory,
    tone_duration: Duration,
}

impl SequencerContext {
    pub fn new(
        topology: GridTopology,
        library: PatternLibrary,
        patterns: PatternConfig,
        playback: &PlaybackConfig,
    ) -> Self {
        Self {
            topology,
            library,
            patterns,
            history: ActivationHistory::new(playback.history_len),
            tone_duration: playback.tone.duration,
        }
    }

    pub fn topology(&self) -> &GridTopology {
        &self.topology
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    pub fn pattern_config(&self) -> &PatternConfig {
        &self.patterns
    }

    pub fn history(&self) -> &ActivationHistory {
        &self.history
    }

    pub(crate) fn regenerate_library<R: Rng>(&mut self, rng: &mut R) {
        self.library.regenerate(&self.topology, &self.patterns, rng);
    }

    /// Light a cell, sound its note, then retire the oldest highlight if
    /// the history overflowed. Returns None (and does nothing) when the
    /// coordinate is off the grid.
    pub fn activate<S, T, R>(
        &mut self,
        coord: Coordinate,
        surface: &mut S,
        tone: &mut T,
        rng: &mut R,
    ) -> Option<Cell>
    where
        S: CellSurface + ?Sized,
        T: ToneOutput + ?Sized,
        R: Rng,
    {
        let Some(cell) = self.topology.cell(coord) else {
            log::debug!("skipping ({}, {}): off the grid", coord.row, coord.col);
            return None;
        };

        let color = CellColor::pastel(rng);
        surface.set_cell_visual_state(coord, CellVisual::Lit(color));
        log::debug!("activate ({}, {}) {} {}", coord.row, coord.col, cell.note.name(), color.hex());
        tone.play_tone(cell.note, self.tone_duration);

        if let Some(evicted) = self.history.push(coord) {
            surface.set_cell_visual_state(evicted, CellVisual::Neutral);
        }
        Some(cell)
    }
}
