//! Grid module - the canonical tile store
//!
//! The grid is a `width x height` mapping from cell coordinate to content,
//! stored as a flat array for cache locality. Coordinates: (x, y) with x in
//! 0..width (left to right) and y in 0..height (**bottom to top**); row 0 is
//! the bottom row, where gravity compacts tiles.
//!
//! The grid is the single source of truth for "what tile, if any, occupies
//! (x, y)". All mutation goes through the cascade apply functions under the
//! scheduler's control.

use tui_blast_types::{GridPos, Tile};

/// Cell content: a tile or empty
pub type CellContent = Option<Tile>;

/// Error from grid accessors
///
/// An out-of-range coordinate is a programming error in the input
/// translation layer; it fails the call, never the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    OutOfBounds { x: i16, y: i16 },
}

impl GridError {
    pub fn message(&self) -> &'static str {
        match self {
            GridError::OutOfBounds { .. } => "coordinate outside the grid",
        }
    }
}

/// The tile grid - flat row-major storage
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<CellContent>,
}

impl Grid {
    /// Create a new empty grid
    pub fn new(width: u8, height: u8) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![None; len],
        }
    }

    /// Calculate flat index from signed (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i16, y: i16) -> Option<usize> {
        if x < 0 || x >= self.width as i16 || y < 0 || y >= self.height as i16 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Grid dimensions as (width, height)
    pub fn dimensions(&self) -> (u8, u8) {
        (self.width, self.height)
    }

    /// Get cell content at (x, y)
    ///
    /// Fails with `OutOfBounds` when the coordinate is outside the grid.
    pub fn get(&self, x: i16, y: i16) -> Result<CellContent, GridError> {
        self.index(x, y)
            .map(|idx| self.cells[idx])
            .ok_or(GridError::OutOfBounds { x, y })
    }

    /// Set cell content at (x, y)
    pub fn set(&mut self, x: i16, y: i16, content: CellContent) -> Result<(), GridError> {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = content;
                Ok(())
            }
            None => Err(GridError::OutOfBounds { x, y }),
        }
    }

    /// Get cell content at a validated position
    ///
    /// `GridPos` values only exist for in-bounds coordinates, so this cannot
    /// fail.
    pub fn at(&self, pos: GridPos) -> CellContent {
        self.cells[(pos.y as usize) * (self.width as usize) + (pos.x as usize)]
    }

    /// Set cell content at a validated position
    pub fn put(&mut self, pos: GridPos, content: CellContent) {
        self.cells[(pos.y as usize) * (self.width as usize) + (pos.x as usize)] = content;
    }

    /// Validate signed coordinates into a `GridPos`
    pub fn pos(&self, x: i16, y: i16) -> Result<GridPos, GridError> {
        match self.index(x, y) {
            Some(_) => Ok(GridPos::new(x as u8, y as u8)),
            None => Err(GridError::OutOfBounds { x, y }),
        }
    }

    /// True if (x, y) is inside the grid and holds a tile
    pub fn is_occupied(&self, x: i16, y: i16) -> bool {
        matches!(self.get(x, y), Ok(Some(_)))
    }

    /// Number of cells currently holding a tile
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Iterate every occupied cell as (position, tile)
    pub fn tiles(&self) -> impl Iterator<Item = (GridPos, Tile)> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .copied()
            .enumerate()
            .filter_map(move |(idx, cell)| {
                cell.map(|tile| {
                    let x = (idx % width) as u8;
                    let y = (idx / width) as u8;
                    (GridPos::new(x, y), tile)
                })
            })
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}
