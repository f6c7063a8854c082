/// Lissajous curve sampling
///
/// Traces `x = sin(a*t + delta)`, `y = sin(b*t)` scaled to fill the grid and
/// keeps each new cell the curve lands on.
use std::collections::HashSet;
use std::f64::consts::PI;

use rand::Rng;

use crate::grid::Coordinate;

/// Samples taken per requested step before giving up.
const SAMPLES_PER_STEP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LissajousParams {
    /// Horizontal frequency.
    pub a: u32,
    /// Vertical frequency.
    pub b: u32,
    /// Horizontal phase offset in radians.
    pub delta: f64,
}

impl LissajousParams {
    /// Frequencies in 1..=5, phase in [0, pi).
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            a: rng.random_range(1..=5),
            b: rng.random_range(1..=5),
            delta: rng.random_range(0.0..PI),
        }
    }
}

pub fn random_lissajous_pattern<R: Rng>(
    rows: usize,
    cols: usize,
    steps: usize,
    rng: &mut R,
) -> Vec<Coordinate> {
    let params = LissajousParams::random(rng);
    lissajous_pattern(rows, cols, steps, params)
}

pub fn lissajous_pattern(
    rows: usize,
    cols: usize,
    steps: usize,
    params: LissajousParams,
) -> Vec<Coordinate> {
    let mut path = Vec::new();
    if rows == 0 || cols == 0 || steps == 0 {
        return path;
    }

    let half_w = (cols - 1) as f64 / 2.0;
    let half_h = (rows - 1) as f64 / 2.0;
    let (cx, cy) = (half_w, half_h);
    let mut seen = HashSet::new();

    for i in 0..steps * SAMPLES_PER_STEP {
        if path.len() >= steps {
            break;
        }
        let t = (i as f64 / steps as f64) * 2.0 * PI;
        let x = (cx + half_w * (params.a as f64 * t + params.delta).sin()).round_ties_even();
        let y = (cy + half_h * (params.b as f64 * t).sin()).round_ties_even();

        if x < 0.0 || y < 0.0 {
            continue;
        }
        let coord = Coordinate::new(y as usize, x as usize);
        if coord.row < rows && coord.col < cols && seen.insert(coord) {
            path.push(coord);
        }
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_params_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let p = LissajousParams::random(&mut rng);
            assert!((1..=5).contains(&p.a));
            assert!((1..=5).contains(&p.b));
            assert!((0.0..PI).contains(&p.delta));
        }
    }

    #[test]
    fn test_first_sample_position() {
        // t = 0 lands on (cy, cx + A*sin(delta)); with delta = 0 that is the center
        let params = LissajousParams { a: 1, b: 1, delta: 0.0 };
        let path = lissajous_pattern(7, 9, 10, params);
        assert_eq!(path[0], Coordinate::new(3, 4));
    }

    #[test]
    fn test_degenerate_single_row() {
        let params = LissajousParams { a: 3, b: 2, delta: 1.0 };
        let path = lissajous_pattern(1, 6, 20, params);
        assert!(path.iter().all(|c| c.row == 0));
        assert!(path.len() <= 6);
    }

    #[test]
    fn test_bounded_search_on_sparse_curve() {
        // a = b with zero phase is a diagonal line, so most cells are never hit
        let params = LissajousParams { a: 1, b: 1, delta: 0.0 };
        let path = lissajous_pattern(5, 5, 25, params);
        assert!(path.len() < 25);
        let unique: HashSet<_> = path.iter().collect();
        assert_eq!(unique.len(), path.len());
    }
}
