//! Group detection - flood fill over same-kind neighbors
//!
//! Breadth-first search from a seed cell across the four axis-aligned
//! directions, collecting every connected tile of the seed's kind. The
//! visited set is sized to the grid, so the result is deterministic
//! regardless of traversal order.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use tui_blast_types::{GridPos, TileKind};

use crate::grid::Grid;

/// Error from group detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupError {
    /// Seed coordinate outside the grid
    OutOfBounds { x: i16, y: i16 },
    /// Seed cell holds no tile
    EmptySeed,
}

/// A maximal connected set of same-kind tiles
///
/// Invariants: non-empty (always contains the seed), every member shares
/// `kind`, members are 4-connected, and no same-kind neighbor of any member
/// lies outside the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub kind: TileKind,
    pub cells: Vec<GridPos>,
}

impl Group {
    pub fn size(&self) -> usize {
        self.cells.len()
    }
}

/// Find the maximal connected same-kind group containing the seed cell
///
/// Pure query over current grid state; no side effects. Returns the full
/// visited set including the seed, even if it is size 1.
pub fn find_connected_group(grid: &Grid, seed_x: i16, seed_y: i16) -> Result<Group, GroupError> {
    let seed = grid.pos(seed_x, seed_y).map_err(|_| GroupError::OutOfBounds {
        x: seed_x,
        y: seed_y,
    })?;
    let kind = match grid.at(seed) {
        Some(tile) => tile.kind,
        None => return Err(GroupError::EmptySeed),
    };

    let width = grid.width() as usize;
    let mut visited = vec![false; width * grid.height() as usize];
    let mut queue = VecDeque::new();
    let mut cells = Vec::new();

    visited[cell_index(seed, width)] = true;
    queue.push_back(seed);

    while let Some(pos) = queue.pop_front() {
        cells.push(pos);
        for neighbor in same_kind_neighbors(grid, pos, kind) {
            let idx = cell_index(neighbor, width);
            if !visited[idx] {
                visited[idx] = true;
                queue.push_back(neighbor);
            }
        }
    }

    Ok(Group { kind, cells })
}

#[inline(always)]
fn cell_index(pos: GridPos, width: usize) -> usize {
    (pos.y as usize) * width + (pos.x as usize)
}

/// In-bounds neighbors of `pos` occupied by a tile of `kind`
///
/// Explicit helper rather than a closure so the enqueue condition is stated
/// once: within bounds, occupied, and kind-matching.
fn same_kind_neighbors(grid: &Grid, pos: GridPos, kind: TileKind) -> ArrayVec<GridPos, 4> {
    const DIRECTIONS: [(i16, i16); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

    let mut out = ArrayVec::new();
    for (dx, dy) in DIRECTIONS {
        let nx = pos.x as i16 + dx;
        let ny = pos.y as i16 + dy;
        if let Ok(Some(tile)) = grid.get(nx, ny) {
            if tile.kind == kind {
                out.push(GridPos::new(nx as u8, ny as u8));
            }
        }
    }
    out
}
