/// Coherent-noise ranking ("Perlin" pattern)
///
/// Samples a 2-D noise field at every cell and keeps the lowest-valued
/// cells. The result is a clustered shape rather than a connected path.
use noise::{NoiseFn, Perlin};

use crate::grid::Coordinate;

/// The default field: Perlin noise with a fixed seed.
pub fn perlin_field(seed: u32) -> Perlin {
    Perlin::new(seed)
}

/// The `steps` lowest-noise cells in ascending order. Equal values keep
/// row-major order.
pub fn perlin_noise_pattern<N: NoiseFn<f64, 2>>(
    rows: usize,
    cols: usize,
    steps: usize,
    field: &N,
    scale: f64,
) -> Vec<Coordinate> {
    let mut ranked: Vec<(Coordinate, f64)> = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let value = field.get([row as f64 * scale, col as f64 * scale]);
            ranked.push((Coordinate::new(row, col), value));
        }
    }

    // sort_by is stable
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked.into_iter().take(steps).map(|(coord, _)| coord).collect()
}
