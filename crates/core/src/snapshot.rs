//! Reusable engine snapshot for rendering and the adapter
//!
//! A flat, allocation-friendly copy of what an observer needs: cell kinds,
//! the current phase, and the RNG state. Captured via
//! `MoveScheduler::snapshot_into`, which reuses the buffer across frames.

use tui_blast_types::{Phase, TileKind};

/// Observable engine state
///
/// `cells` is row-major (y * width + x), row 0 at the bottom; 0 means empty,
/// otherwise `kind index + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSnapshot {
    pub width: u8,
    pub height: u8,
    pub cells: Vec<u8>,
    pub phase: Phase,
    pub seed: u32,
}

impl EngineSnapshot {
    /// Encode a cell for the snapshot grid
    pub fn encode_cell(kind: Option<TileKind>) -> u8 {
        match kind {
            Some(kind) => kind.as_index() + 1,
            None => 0,
        }
    }

    /// Kind at (x, y), `None` when empty or out of range
    pub fn kind_at(&self, x: u8, y: u8) -> Option<TileKind> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let raw = self.cells[(y as usize) * (self.width as usize) + (x as usize)];
        raw.checked_sub(1).and_then(TileKind::from_index)
    }

    pub fn busy(&self) -> bool {
        !self.phase.is_idle()
    }
}

impl Default for EngineSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
            phase: Phase::Idle,
            seed: 0,
        }
    }
}
