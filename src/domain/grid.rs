/// Grid model: board size in cells and coordinate validity.

use super::entity::Cell;

/// Largest board side, in cells, that a config may ask for.
pub const MAX_SIDE: i32 = 200;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    pub const fn new(width: i32, height: i32) -> Self {
        Grid { width, height }
    }

    /// Derive the cell grid from a pixel board, e.g. 400×400 px with
    /// 20 px cells → 20×20. Partial cells at the edge are dropped and
    /// sides too long for `i32` saturate.
    pub fn from_pixels(width_px: u32, height_px: u32, cell_px: u32) -> Self {
        let cell = cell_px.max(1);
        let side = |px: u32| i32::try_from(px / cell).unwrap_or(i32::MAX);
        Grid::new(side(width_px), side(height_px))
    }

    pub fn fits(&self, max_side: i32) -> bool {
        self.width <= max_side && self.height <= max_side
    }

    #[inline]
    pub fn is_in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    pub fn center(&self) -> Cell {
        Cell::new(self.width / 2, self.height / 2)
    }

    pub fn area(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::from_pixels(400, 400, 20)
    }
}
