/// Target-seeking random walk ("Eulerian" pattern)
///
/// Starts on a random cell, picks a far-away target and greedily steps
/// toward it through unvisited 4-connected neighbours. Stops early when it
/// paints itself into a corner.
use std::collections::HashSet;

use rand::Rng;

use crate::grid::Coordinate;

/// Draws before giving up on rejection sampling the target.
const MAX_TARGET_DRAWS: usize = 1000;

/// Neighbour order also breaks distance ties: up, down, left, right.
const MOVES: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

pub fn target_walk_pattern<R: Rng>(
    rows: usize,
    cols: usize,
    steps: usize,
    rng: &mut R,
) -> Vec<Coordinate> {
    if rows == 0 || cols == 0 || steps == 0 {
        return Vec::new();
    }

    let start = Coordinate::new(rng.random_range(0..rows), rng.random_range(0..cols));
    let target = pick_target(rows, cols, start, rng);

    let mut path = vec![start];
    let mut visited = HashSet::from([start]);
    let mut current = start;

    while path.len() < steps {
        let next = MOVES
            .iter()
            .filter_map(|&(dr, dc)| step(current, dr, dc, rows, cols))
            .filter(|c| !visited.contains(c))
            .min_by_key(|c| c.manhattan(target));

        let Some(next) = next else {
            break;
        };
        visited.insert(next);
        path.push(next);
        current = next;
    }

    path
}

/// A target at least `(rows + cols) / 2` away from `start`.
fn pick_target<R: Rng>(rows: usize, cols: usize, start: Coordinate, rng: &mut R) -> Coordinate {
    let min_dist = (rows + cols) / 2;

    for _ in 0..MAX_TARGET_DRAWS {
        let target = Coordinate::new(rng.random_range(0..rows), rng.random_range(0..cols));
        if target.manhattan(start) >= min_dist {
            return target;
        }
    }

    // Unsatisfiable (e.g. 1x1) or just unlucky: scan deterministically.
    scan_for_target(rows, cols, start, min_dist)
}

/// First row-major cell at least `min_dist` away, else the first cell at
/// the largest distance available.
fn scan_for_target(rows: usize, cols: usize, start: Coordinate, min_dist: usize) -> Coordinate {
    let all = (0..rows).flat_map(|r| (0..cols).map(move |c| Coordinate::new(r, c)));
    all.clone()
        .find(|c| c.manhattan(start) >= min_dist)
        .or_else(|| {
            // max_by_key keeps the last maximum, so reverse to keep the first
            all.rev().max_by_key(|c| c.manhattan(start))
        })
        .unwrap_or(start)
}

fn step(from: Coordinate, dr: isize, dc: isize, rows: usize, cols: usize) -> Option<Coordinate> {
    let row = from.row.checked_add_signed(dr)?;
    let col = from.col.checked_add_signed(dc)?;
    (row < rows && col < cols).then(|| Coordinate::new(row, col))
}
