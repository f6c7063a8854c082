//! Pointer gestures over the grid.
//!
//! Press and drag both hit-test against cell circles. A drag fires again
//! only when the pointer moves into a different cell, so holding still on
//! one cell does not retrigger it every frame.
use crate::grid::layout::CellLayout;
use crate::grid::{Coordinate, GridTopology};

#[derive(Debug, Default)]
pub struct DragGesture {
    active: bool,
    last_hit: Option<Coordinate>,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start a gesture; returns the cell under the pointer, if any.
    pub fn pointer_down(
        &mut self,
        layout: &CellLayout,
        topology: &GridTopology,
        (x, y): (f32, f32),
    ) -> Option<Coordinate> {
        self.active = true;
        self.last_hit = layout.hit_test(topology, x, y);
        self.last_hit
    }

    /// Returns a cell when the pointer, mid-gesture, enters a new one.
    pub fn pointer_drag(
        &mut self,
        layout: &CellLayout,
        topology: &GridTopology,
        (x, y): (f32, f32),
    ) -> Option<Coordinate> {
        if !self.active {
            return None;
        }
        let hit = layout.hit_test(topology, x, y);
        if hit == self.last_hit {
            return None;
        }
        self.last_hit = hit;
        hit
    }

    pub fn pointer_up(&mut self) {
        self.active = false;
        self.last_hit = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::RowOffset;

    fn setup() -> (CellLayout, GridTopology) {
        (
            CellLayout::default(),
            GridTopology::new(7, 8, RowOffset::Staggered).unwrap(),
        )
    }

    #[test]
    fn test_press_hits_cell() {
        let (layout, grid) = setup();
        let mut drag = DragGesture::new();
        assert_eq!(drag.pointer_down(&layout, &grid, (50.0, 50.0)), Some(Coordinate::new(0, 0)));
        assert!(drag.is_active());
    }

    #[test]
    fn test_drag_fires_once_per_cell() {
        let (layout, grid) = setup();
        let mut drag = DragGesture::new();
        drag.pointer_down(&layout, &grid, (50.0, 50.0));
        assert_eq!(drag.pointer_drag(&layout, &grid, (52.0, 50.0)), None);
        // through the gap and into the next cell
        assert_eq!(drag.pointer_drag(&layout, &grid, (95.0, 50.0)), None);
        assert_eq!(drag.pointer_drag(&layout, &grid, (140.0, 50.0)), Some(Coordinate::new(0, 1)));
        assert_eq!(drag.pointer_drag(&layout, &grid, (141.0, 51.0)), None);
        // coming back to the first cell fires again
        assert_eq!(drag.pointer_drag(&layout, &grid, (50.0, 50.0)), Some(Coordinate::new(0, 0)));
    }

    #[test]
    fn test_drag_without_press_does_nothing() {
        let (layout, grid) = setup();
        let mut drag = DragGesture::new();
        assert_eq!(drag.pointer_drag(&layout, &grid, (50.0, 50.0)), None);
        drag.pointer_down(&layout, &grid, (0.0, 0.0));
        drag.pointer_up();
        assert!(!drag.is_active());
        assert_eq!(drag.pointer_drag(&layout, &grid, (50.0, 50.0)), None);
    }
}
