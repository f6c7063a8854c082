/// Fibonacci pattern: consecutive terms taken modulo the grid size
use std::collections::HashSet;

use crate::grid::Coordinate;

/// Walks `(F[i] mod rows, F[i+1] mod cols)` for the first `2 * steps` terms,
/// keeping each coordinate the first time it appears.
pub fn fibonacci_pattern(rows: usize, cols: usize, steps: usize) -> Vec<Coordinate> {
    let mut path = Vec::new();
    if rows == 0 || cols == 0 || steps == 0 {
        return path;
    }

    let terms = fibonacci_terms((steps * 2).max(2), rows * cols);
    let mut seen = HashSet::new();

    for pair in terms.windows(2) {
        if path.len() >= steps {
            break;
        }
        let coord = Coordinate::new(pair[0] % rows, pair[1] % cols);
        if seen.insert(coord) {
            path.push(coord);
        }
    }

    path
}

/// First `count` Fibonacci numbers reduced modulo `modulus`. Since rows and
/// cols both divide `modulus`, the reduction doesn't change either remainder.
fn fibonacci_terms(count: usize, modulus: usize) -> Vec<usize> {
    let mut terms = Vec::with_capacity(count);
    let (mut a, mut b) = (0, 1 % modulus);
    for _ in 0..count {
        terms.push(a);
        (a, b) = (b, (a + b) % modulus);
    }
    terms
}
