/// The collection of patterns the trigger picks from
use anyhow::ensure;
use noise::Perlin;
use rand::Rng;

use crate::config::PatternConfig;
use crate::grid::{Coordinate, GridTopology};

use super::{perlin_field, GeneratorKind, Pattern, PatternSource};

#[rustfmt::skip]
const TRIANGLE_LOOP: &[(usize, usize)] = &[
    (0, 1), (0, 2), (1, 2), (2, 2), (2, 1), (1, 0),
    (0, 1), (0, 2), (1, 2), (2, 2), (2, 1), (1, 0),
    (0, 1), (0, 2), (1, 2), (2, 2), (2, 1), (1, 0),
];

#[rustfmt::skip]
const TWO_ROW_ZIGZAG: &[(usize, usize)] = &[
    (0, 0), (1, 0), (0, 1), (1, 1), (0, 2), (1, 2), (0, 3), (1, 3),
    (0, 4), (1, 4), (0, 5), (1, 5), (0, 6), (1, 6), (0, 7), (1, 7),
];

#[rustfmt::skip]
const LEFT_BLOCKS: &[(usize, usize)] = &[
    (0, 0), (1, 0), (0, 1), (1, 1), (0, 2), (1, 2),
    (2, 0), (3, 0), (2, 1), (3, 1), (2, 2), (3, 2),
    (4, 0), (5, 0), (4, 1), (5, 1), (4, 2), (5, 2),
];

#[rustfmt::skip]
const RIGHT_BLOCKS: &[(usize, usize)] = &[
    (0, 3), (1, 3), (0, 4), (1, 4), (0, 5), (1, 5),
    (2, 3), (3, 3), (2, 4), (3, 4), (2, 5), (3, 5),
    (4, 3), (5, 3), (4, 4), (5, 4), (4, 5), (5, 5),
];

#[derive(Debug, Clone)]
pub struct PatternLibrary {
    patterns: Vec<Pattern>,
}

impl PatternLibrary {
    pub fn from_patterns(patterns: Vec<Pattern>) -> anyhow::Result<Self> {
        ensure!(!patterns.is_empty(), "pattern library needs at least one pattern");
        Ok(Self { patterns })
    }

    /// One instance of each generator mixed with the hand-authored patterns.
    pub fn standard<R: Rng>(topology: &GridTopology, config: &PatternConfig, rng: &mut R) -> Self {
        let field = perlin_field(config.noise_seed);
        let mut generate = |kind: GeneratorKind| {
            Pattern::generated(kind, generate_kind(kind, topology, config, &field, &mut *rng))
        };

        let patterns = vec![
            generate(GeneratorKind::TargetWalk),
            generate(GeneratorKind::Fibonacci),
            Pattern::literal("Triangle loop", TRIANGLE_LOOP),
            Pattern::literal("Two-row zigzag", TWO_ROW_ZIGZAG),
            Pattern::literal("Left blocks", LEFT_BLOCKS),
            Pattern::literal("Right blocks", RIGHT_BLOCKS),
            generate(GeneratorKind::PerlinNoise),
            generate(GeneratorKind::Lissajous),
        ];
        log::debug!("built pattern library with {} entries", patterns.len());
        Self { patterns }
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Uniform pick among all entries.
    pub fn choose_pattern<R: Rng>(&self, rng: &mut R) -> &Pattern {
        &self.patterns[rng.random_range(0..self.patterns.len())]
    }

    /// Rebuild the generated entries in place. Literal entries are untouched.
    pub fn regenerate<R: Rng>(&mut self, topology: &GridTopology, config: &PatternConfig, rng: &mut R) {
        let field = perlin_field(config.noise_seed);
        for pattern in &mut self.patterns {
            if let PatternSource::Generated(kind) = pattern.source {
                pattern.coords = generate_kind(kind, topology, config, &field, rng);
            }
        }
    }
}

fn generate_kind<R: Rng>(
    kind: GeneratorKind,
    topology: &GridTopology,
    config: &PatternConfig,
    field: &Perlin,
    rng: &mut R,
) -> Vec<Coordinate> {
    kind.generate(topology, config.steps, field, config.noise_scale, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::RowOffset;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn library(seed: u64) -> PatternLibrary {
        let grid = GridTopology::new(7, 8, RowOffset::Staggered).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        PatternLibrary::standard(&grid, &PatternConfig::default(), &mut rng)
    }

    #[test]
    fn test_standard_library_layout() {
        let lib = library(1);
        assert_eq!(lib.len(), 8);
        let generated = lib
            .patterns()
            .iter()
            .filter(|p| matches!(p.source, PatternSource::Generated(_)))
            .count();
        assert_eq!(generated, 4);
        assert_eq!(lib.patterns()[2].len(), 18);
        assert_eq!(lib.patterns()[3].len(), 16);
    }

    #[test]
    fn test_empty_library_rejected() {
        assert!(PatternLibrary::from_patterns(Vec::new()).is_err());
    }

    #[test]
    fn test_choose_pattern_hits_every_entry() {
        let lib = library(2);
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen = vec![false; lib.len()];
        for _ in 0..500 {
            let picked = lib.choose_pattern(&mut rng);
            let idx = lib.patterns().iter().position(|p| std::ptr::eq(p, picked)).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_choose_does_not_mutate() {
        let lib = library(3);
        let before = lib.patterns().to_vec();
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..10 {
            lib.choose_pattern(&mut rng);
        }
        assert_eq!(lib.patterns(), &before[..]);
    }

    #[test]
    fn test_regenerate_keeps_literals() {
        let grid = GridTopology::new(7, 8, RowOffset::Staggered).unwrap();
        let mut lib = library(4);
        let literals: Vec<_> = lib
            .patterns()
            .iter()
            .filter(|p| p.source == PatternSource::Literal)
            .cloned()
            .collect();
        let mut rng = StdRng::seed_from_u64(1234);
        lib.regenerate(&grid, &PatternConfig::default(), &mut rng);
        let after: Vec<_> = lib
            .patterns()
            .iter()
            .filter(|p| p.source == PatternSource::Literal)
            .cloned()
            .collect();
        assert_eq!(literals, after);
        assert_eq!(lib.len(), 8);
    }
}
