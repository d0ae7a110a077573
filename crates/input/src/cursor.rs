//! Cell cursor - keyboard equivalent of pointing at a tile.

use tui_blast_types::GameCommand;

/// Grid cursor clamped to the playfield.
///
/// Row 0 is the bottom row, so `CursorUp` increases y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    x: u8,
    y: u8,
    width: u8,
    height: u8,
}

impl Cursor {
    /// Start at the center of the grid.
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            x: width / 2,
            y: height / 2,
            width,
            height,
        }
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    /// Apply a cursor-movement command; returns true if the cursor moved.
    ///
    /// Non-movement commands are ignored.
    pub fn apply(&mut self, command: GameCommand) -> bool {
        let (x, y) = (self.x, self.y);
        match command {
            GameCommand::CursorLeft => self.x = self.x.saturating_sub(1),
            GameCommand::CursorRight => self.x = (self.x + 1).min(self.width.saturating_sub(1)),
            GameCommand::CursorDown => self.y = self.y.saturating_sub(1),
            GameCommand::CursorUp => self.y = (self.y + 1).min(self.height.saturating_sub(1)),
            GameCommand::Activate | GameCommand::Restart => {}
        }
        (x, y) != (self.x, self.y)
    }
}
