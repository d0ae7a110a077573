//! Session bookkeeping - score and move budget
//!
//! The core only reports "move resolved with N tiles cleared"; this module
//! turns that into score and a shrinking move budget. A session becomes
//! terminal when the budget reaches zero.

use tui_blast_types::{MoveOutcome, SCORE_PER_TILE, STARTING_MOVES};

/// Points credited for clearing `cleared` tiles
pub fn score_for(cleared: u32) -> u32 {
    cleared.saturating_mul(SCORE_PER_TILE)
}

/// Score and move budget for one play session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSession {
    score: u32,
    moves_left: u32,
}

impl GameSession {
    pub fn new() -> Self {
        Self::with_budget(STARTING_MOVES)
    }

    pub fn with_budget(moves: u32) -> Self {
        Self {
            score: 0,
            moves_left: moves,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    /// True once the move budget is exhausted
    pub fn is_over(&self) -> bool {
        self.moves_left == 0
    }

    /// Credit a resolved move: one unit of move cost, score by group size
    ///
    /// Returns the points credited.
    pub fn apply_outcome(&mut self, outcome: MoveOutcome) -> u32 {
        let points = score_for(outcome.cleared);
        self.score = self.score.saturating_add(points);
        self.moves_left = self.moves_left.saturating_sub(1);
        points
    }

    /// Fresh score and budget
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
