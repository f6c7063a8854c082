//! Pattern generators and the library they feed.
//!
//! Every generator turns grid bounds and a step count into an ordered list
//! of coordinates. None of them fail: when the grid is too small or a
//! search bound is hit they simply return fewer coordinates than asked for.
//! All generated coordinates are in bounds; literal patterns are not
//! checked until playback resolves them.
use noise::NoiseFn;
use rand::Rng;

use crate::grid::{Coordinate, GridTopology};

pub mod fibonacci;
pub mod library;
pub mod lissajous;
pub mod noise_rank;
pub mod walk;

pub use fibonacci::fibonacci_pattern;
pub use library::PatternLibrary;
pub use lissajous::{lissajous_pattern, random_lissajous_pattern, LissajousParams};
pub use noise_rank::{perlin_noise_pattern, perlin_field};
pub use walk::target_walk_pattern;

/// The four generation algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    TargetWalk,
    PerlinNoise,
    Lissajous,
    Fibonacci,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 4] = [
        GeneratorKind::TargetWalk,
        GeneratorKind::PerlinNoise,
        GeneratorKind::Lissajous,
        GeneratorKind::Fibonacci,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GeneratorKind::TargetWalk => "Eulerian walk",
            GeneratorKind::PerlinNoise => "Perlin ranking",
            GeneratorKind::Lissajous => "Lissajous curve",
            GeneratorKind::Fibonacci => "Fibonacci",
        }
    }

    pub fn generate<N, R>(
        self,
        topology: &GridTopology,
        steps: usize,
        noise: &N,
        noise_scale: f64,
        rng: &mut R,
    ) -> Vec<Coordinate>
    where
        N: NoiseFn<f64, 2>,
        R: Rng,
    {
        let (rows, cols) = (topology.rows(), topology.cols());
        match self {
            GeneratorKind::TargetWalk => target_walk_pattern(rows, cols, steps, rng),
            GeneratorKind::PerlinNoise => perlin_noise_pattern(rows, cols, steps, noise, noise_scale),
            GeneratorKind::Lissajous => random_lissajous_pattern(rows, cols, steps, rng),
            GeneratorKind::Fibonacci => fibonacci_pattern(rows, cols, steps),
        }
    }
}

/// Where a library entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSource {
    Generated(GeneratorKind),
    /// Hand-authored; used as written, never bounds-checked up front.
    Literal,
}

/// An ordered sequence of cells to activate.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub name: String,
    pub source: PatternSource,
    pub coords: Vec<Coordinate>,
}

impl Pattern {
    pub fn generated(kind: GeneratorKind, coords: Vec<Coordinate>) -> Self {
        Self {
            name: kind.name().to_string(),
            source: PatternSource::Generated(kind),
            coords,
        }
    }

    pub fn literal(name: impl Into<String>, coords: &[(usize, usize)]) -> Self {
        Self {
            name: name.into(),
            source: PatternSource::Literal,
            coords: coords.iter().copied().map(Coordinate::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::RowOffset;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn run_all(rows: usize, cols: usize, steps: usize, seed: u64) -> Vec<(GeneratorKind, Vec<Coordinate>)> {
        let grid = GridTopology::new(rows, cols, RowOffset::Staggered).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let field = perlin_field(0);
        GeneratorKind::ALL
            .iter()
            .map(|&kind| (kind, kind.generate(&grid, steps, &field, 0.1, &mut rng)))
            .collect()
    }

    #[test]
    fn test_every_generator_respects_bounds_and_length() {
        for (rows, cols) in [(1, 1), (1, 6), (5, 1), (3, 3), (7, 8), (12, 4)] {
            for steps in [1, 2, 5, 10, 40, 100] {
                for seed in 0..4 {
                    for (kind, coords) in run_all(rows, cols, steps, seed) {
                        assert!(coords.len() <= steps, "{kind:?} too long");
                        assert!(coords.len() <= rows * cols, "{kind:?} longer than grid");
                        for c in &coords {
                            assert!(c.row < rows && c.col < cols, "{kind:?} out of bounds: {c:?}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_no_repeats_in_paths() {
        for seed in 0..8 {
            for (kind, coords) in run_all(7, 8, 30, seed) {
                let unique: HashSet<_> = coords.iter().collect();
                assert_eq!(unique.len(), coords.len(), "{kind:?} repeated a cell");
            }
        }
    }

    #[test]
    fn test_single_cell_grid() {
        for (kind, coords) in run_all(1, 1, 5, 3) {
            assert!(coords.len() <= 1, "{kind:?}");
        }
    }

    #[test]
    fn test_literal_pattern_keeps_out_of_range_coords() {
        let pattern = Pattern::literal("edge", &[(0, 0), (9, 9)]);
        assert_eq!(pattern.len(), 2);
        assert_eq!(pattern.coords[1], Coordinate::new(9, 9));
        assert_eq!(pattern.source, PatternSource::Literal);
    }
}
