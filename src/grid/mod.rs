//! Lattice geometry and the coordinate -> note assignment.
//!
//! Moving one column advances the pitch class by a fifth (7 semitones) and
//! moving one row advances it by a major third (4 semitones), so the grid
//! lays out the circle of fifths against a major-third axis.
use anyhow::ensure;

pub mod layout;

/// A `(row, col)` index into the logical grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan(self, other: Coordinate) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// The twelve pitch classes, in chromatic order starting from C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Wraps modulo 12.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }

    /// Fundamental frequency in Hz, fourth octave.
    pub fn frequency(self) -> f32 {
        match self {
            PitchClass::C => 261.63,
            PitchClass::CSharp => 277.18,
            PitchClass::D => 293.66,
            PitchClass::DSharp => 311.13,
            PitchClass::E => 329.63,
            PitchClass::F => 349.23,
            PitchClass::FSharp => 369.99,
            PitchClass::G => 392.00,
            PitchClass::GSharp => 415.30,
            PitchClass::A => 440.00,
            PitchClass::ASharp => 466.16,
            PitchClass::B => 493.88,
        }
    }

    /// MIDI note number in the same octave as `frequency` (C4 = 60).
    pub fn midi_note(self) -> u8 {
        60 + self as u8
    }
}

/// How rows are shifted against each other on screen, which also decides
/// the lattice lines drawn between cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowOffset {
    /// Odd rows sit half a cell to the right, giving a triangular tiling.
    #[default]
    Staggered,
    /// Plain rectangular grid.
    Aligned,
}

/// A grid position paired with its note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub coord: Coordinate,
    pub note: PitchClass,
}

#[derive(Debug, Clone)]
pub struct GridTopology {
    rows: usize,
    cols: usize,
    row_offset: RowOffset,
}

impl GridTopology {
    pub fn new(rows: usize, cols: usize, row_offset: RowOffset) -> anyhow::Result<Self> {
        ensure!(rows > 0 && cols > 0, "grid must be at least 1x1 (got {rows}x{cols})");
        Ok(Self {
            rows,
            cols,
            row_offset,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row_offset(&self) -> RowOffset {
        self.row_offset
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Resolve a coordinate to its cell, or None when it lies off the grid.
    pub fn cell(&self, coord: Coordinate) -> Option<Cell> {
        self.contains(coord).then(|| Cell {
            coord,
            note: note_for(coord),
        })
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let cols = self.cols;
        (0..self.rows * self.cols).map(move |i| {
            let coord = Coordinate::new(i / cols, i % cols);
            Cell {
                coord,
                note: note_for(coord),
            }
        })
    }

    /// Cells joined to `coord` by a lattice line. Each edge is reported once,
    /// from the cell above or to the left.
    pub fn neighbors(&self, coord: Coordinate) -> Vec<Coordinate> {
        let mut out = Vec::with_capacity(3);
        if !self.contains(coord) {
            return out;
        }
        let Coordinate { row, col } = coord;

        if col + 1 < self.cols {
            out.push(Coordinate::new(row, col + 1));
        }
        if row + 1 >= self.rows {
            return out;
        }

        match self.row_offset {
            RowOffset::Staggered if row % 2 == 0 => {
                out.push(Coordinate::new(row + 1, col));
                if col >= 1 {
                    out.push(Coordinate::new(row + 1, col - 1));
                }
            }
            RowOffset::Staggered => {
                if col + 1 < self.cols {
                    out.push(Coordinate::new(row + 1, col + 1));
                }
                out.push(Coordinate::new(row + 1, col));
            }
            RowOffset::Aligned => out.push(Coordinate::new(row + 1, col)),
        }
        out
    }
}

/// Index into the chromatic table for a grid position.
pub fn note_index(coord: Coordinate) -> usize {
    (coord.row * 4 + coord.col * 7) % 12
}

pub fn note_for(coord: Coordinate) -> PitchClass {
    PitchClass::from_index(note_index(coord))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_pitch_table_is_total_and_injective() {
        let names: HashSet<_> = PitchClass::ALL.iter().map(|p| p.name()).collect();
        let midi: HashSet<_> = PitchClass::ALL.iter().map(|p| p.midi_note()).collect();
        assert_eq!(names.len(), 12);
        assert_eq!(midi.len(), 12);

        let mut freqs: Vec<f32> = PitchClass::ALL.iter().map(|p| p.frequency()).collect();
        let sorted = {
            let mut s = freqs.clone();
            s.sort_by(|a, b| a.total_cmp(b));
            s
        };
        assert_eq!(freqs, sorted, "frequencies rise chromatically");
        freqs.dedup();
        assert_eq!(freqs.len(), 12);
    }

    #[test]
    fn test_note_assignment_formula() {
        let grid = GridTopology::new(7, 8, RowOffset::Staggered).unwrap();
        for cell in grid.cells() {
            let expected = (4 * cell.coord.row + 7 * cell.coord.col) % 12;
            assert_eq!(cell.note.index(), expected);
        }
        assert_eq!(note_for(Coordinate::new(0, 0)), PitchClass::C);
        assert_eq!(note_for(Coordinate::new(0, 1)), PitchClass::G);
        assert_eq!(note_for(Coordinate::new(1, 0)), PitchClass::E);
    }

    #[test]
    fn test_grid_creation() {
        let grid = GridTopology::new(3, 5, RowOffset::Aligned).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 5);
        assert_eq!(grid.cells().count(), 15);
        assert!(GridTopology::new(0, 5, RowOffset::Aligned).is_err());
    }

    #[test]
    fn test_cell_resolution_bounds() {
        let grid = GridTopology::new(2, 2, RowOffset::Staggered).unwrap();
        assert!(grid.cell(Coordinate::new(1, 1)).is_some());
        assert!(grid.cell(Coordinate::new(2, 0)).is_none());
        assert!(grid.cell(Coordinate::new(0, 2)).is_none());
    }

    #[test]
    fn test_staggered_neighbors() {
        let grid = GridTopology::new(3, 3, RowOffset::Staggered).unwrap();
        assert_eq!(
            grid.neighbors(Coordinate::new(0, 1)),
            vec![Coordinate::new(0, 2), Coordinate::new(1, 1), Coordinate::new(1, 0)]
        );
        assert_eq!(
            grid.neighbors(Coordinate::new(1, 1)),
            vec![Coordinate::new(1, 2), Coordinate::new(2, 2), Coordinate::new(2, 1)]
        );
        // bottom-right corner has nothing left to connect to
        assert!(grid.neighbors(Coordinate::new(2, 2)).is_empty());
    }

    #[test]
    fn test_aligned_neighbors() {
        let grid = GridTopology::new(2, 2, RowOffset::Aligned).unwrap();
        assert_eq!(
            grid.neighbors(Coordinate::new(0, 0)),
            vec![Coordinate::new(0, 1), Coordinate::new(1, 0)]
        );
    }
}
