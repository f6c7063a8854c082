/// Screen placement of grid cells and pointer hit testing
use crate::config::LayoutConfig;

use super::{Coordinate, GridTopology, RowOffset};

#[derive(Debug, Clone)]
pub struct CellLayout {
    x_spacing: f32,
    y_spacing: f32,
    margin: f32,
    radius: f32,
}

impl CellLayout {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            x_spacing: config.x_spacing,
            y_spacing: config.y_spacing,
            margin: config.margin,
            radius: config.radius,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Center of a cell relative to the canvas origin.
    pub fn center(&self, topology: &GridTopology, coord: Coordinate) -> (f32, f32) {
        let shift = match topology.row_offset() {
            RowOffset::Staggered if coord.row % 2 == 1 => self.x_spacing / 2.0,
            _ => 0.0,
        };
        let x = coord.col as f32 * self.x_spacing + shift + self.margin;
        let y = coord.row as f32 * self.y_spacing + self.margin;
        (x, y)
    }

    pub fn canvas_size(&self, topology: &GridTopology) -> (f32, f32) {
        (
            topology.cols() as f32 * self.x_spacing + 2.0 * self.margin,
            topology.rows() as f32 * self.y_spacing + 2.0 * self.margin,
        )
    }

    /// First cell (row-major) whose circle contains the point.
    pub fn hit_test(&self, topology: &GridTopology, x: f32, y: f32) -> Option<Coordinate> {
        topology.cells().map(|cell| cell.coord).find(|&coord| {
            let (cx, cy) = self.center(topology, coord);
            let (dx, dy) = (x - cx, y - cy);
            (dx * dx + dy * dy).sqrt() <= self.radius
        })
    }
}

impl Default for CellLayout {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridTopology {
        GridTopology::new(7, 8, RowOffset::Staggered).unwrap()
    }

    #[test]
    fn test_centers_follow_stagger() {
        let layout = CellLayout::default();
        assert_eq!(layout.center(&grid(), Coordinate::new(0, 0)), (50.0, 50.0));
        assert_eq!(layout.center(&grid(), Coordinate::new(1, 0)), (95.0, 140.0));
        assert_eq!(layout.center(&grid(), Coordinate::new(2, 3)), (320.0, 230.0));
    }

    #[test]
    fn test_hit_test_inside_and_outside() {
        let layout = CellLayout::default();
        let grid = grid();
        assert_eq!(layout.hit_test(&grid, 55.0, 45.0), Some(Coordinate::new(0, 0)));
        // exactly on the rim still counts
        assert_eq!(layout.hit_test(&grid, 75.0, 50.0), Some(Coordinate::new(0, 0)));
        // gap between two circles
        assert_eq!(layout.hit_test(&grid, 95.0, 50.0), None);
        assert_eq!(layout.hit_test(&grid, 95.0, 140.0), Some(Coordinate::new(1, 0)));
    }

    #[test]
    fn test_canvas_size() {
        let layout = CellLayout::default();
        assert_eq!(layout.canvas_size(&grid()), (820.0, 730.0));
    }
}
