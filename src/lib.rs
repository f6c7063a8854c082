//! TONNETZ - pattern generation and playback over a musical lattice
//!
//! This library provides the core of an interactive Tonnetz grid:
//! - Grid topology with a fixed coordinate -> pitch class assignment
//! - Four pattern generators (target walk, Perlin ranking, Lissajous, Fibonacci)
//! - A pattern library with uniform random selection
//! - Cell activation with a bounded highlight history, and a playback sequencer
//! - Audio output for tones, with optional MIDI mirroring

pub mod audio;
pub mod config;
pub mod grid;
pub mod interaction;
pub mod midi;
pub mod pattern;
pub mod sequencer;

// Re-export commonly used types
pub use audio::{AudioOutput, ToneOutput};
pub use config::{RegenerationPolicy, TonnetzConfig};
pub use grid::layout::CellLayout;
pub use grid::{Cell, Coordinate, GridTopology, PitchClass, RowOffset};
pub use interaction::DragGesture;
pub use midi::{midi_note_name, MidiOutputDevice, ToneRouter};
pub use pattern::{GeneratorKind, Pattern, PatternLibrary, PatternSource};
pub use sequencer::playback::{PlaybackEngine, PlaybackEvent, PlaybackReport, PlaybackSequencer, SequencerState};
pub use sequencer::{ActivationHistory, CellColor, CellSurface, CellVisual, SequencerContext};

/// Build the session state described by `config`: grid, pattern library and
/// an empty highlight history.
pub fn build_context<R: rand::Rng>(config: &TonnetzConfig, rng: &mut R) -> anyhow::Result<SequencerContext> {
    config.validate()?;
    let topology = GridTopology::new(config.grid.rows, config.grid.cols, config.grid.row_offset)?;
    let library = PatternLibrary::standard(&topology, &config.patterns, rng);
    Ok(SequencerContext::new(
        topology,
        library,
        config.patterns.clone(),
        &config.playback,
    ))
}
