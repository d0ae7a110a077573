//! Shared types module - data structures and constants for tui-blast
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, adapter protocol).
//!
//! # Grid Conventions
//!
//! The playfield is a `width x height` grid of tiles:
//!
//! - **Width**: 6 columns by default (indexed 0..5, left to right)
//! - **Height**: 6 rows by default (indexed 0..5, **bottom to top**)
//! - Row 0 is the bottom row; gravity compacts tiles toward row 0 and refill
//!   spawns enter from above the top row.
//! - World positions use one unit per cell, so cell (x, y) is centered at
//!   world (x as f32, y as f32).
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `DEFAULT_COLLAPSE_DURATION_MS` | 120 | Gravity-collapse animation batch |
//! | `DEFAULT_REFILL_DURATION_MS` | 160 | Refill drop-in animation batch |
//! | `CURSOR_DAS_MS` | 180 | Held cursor key delay before auto-repeat |
//! | `CURSOR_ARR_MS` | 60 | Interval between cursor auto-repeats |
//!
//! # Examples
//!
//! ```
//! use tui_blast_types::{GridPos, TileKind, DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT};
//!
//! // The palette is a fixed set of five kinds.
//! assert_eq!(TileKind::ALL.len(), 5);
//! assert_eq!(TileKind::from_index(0), Some(TileKind::Red));
//! assert_eq!(TileKind::Red.as_index(), 0);
//!
//! // Grid cells map onto world positions one unit apart.
//! let pos = GridPos::new(2, 3);
//! assert_eq!(pos.world_pos().x, 2.0);
//! assert_eq!(pos.world_pos().y, 3.0);
//!
//! assert_eq!(DEFAULT_GRID_WIDTH, 6);
//! assert_eq!(DEFAULT_GRID_HEIGHT, 6);
//! ```

/// Default grid width in cells (6 columns)
pub const DEFAULT_GRID_WIDTH: u8 = 6;

/// Default grid height in cells (6 rows)
pub const DEFAULT_GRID_HEIGHT: u8 = 6;

/// Default number of tile kinds drawn from the palette
pub const DEFAULT_PALETTE_SIZE: u8 = 5;

/// Default minimum group size for a valid move (2 connected tiles)
pub const DEFAULT_MIN_GROUP_SIZE: usize = 2;

/// Default refill spawn offset, in rows above the topmost grid row
pub const DEFAULT_REFILL_SPAWN_OFFSET: f32 = 2.0;

/// Default gravity-collapse animation duration (120ms)
pub const DEFAULT_COLLAPSE_DURATION_MS: u32 = 120;

/// Default refill drop-in animation duration (160ms)
pub const DEFAULT_REFILL_DURATION_MS: u32 = 160;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Points credited per cleared tile
pub const SCORE_PER_TILE: u32 = 10;

/// Move budget at the start of a session
pub const STARTING_MOVES: u32 = 20;

/// Held cursor key delay before auto-repeat starts
pub const CURSOR_DAS_MS: u32 = 180;

/// Interval between cursor auto-repeats while held
pub const CURSOR_ARR_MS: u32 = 60;

/// The five tile kinds in the palette
///
/// Kind determines matching and display color. The palette is five plain
/// colors:
/// - **Red**, **Blue**, **Green**, **Yellow**, **Magenta**
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Red,
    Blue,
    Green,
    Yellow,
    Magenta,
}

impl TileKind {
    /// Every kind, in palette order. `EngineConfig::palette_size` bounds how
    /// many of these the refill draw uses.
    pub const ALL: [TileKind; 5] = [
        TileKind::Red,
        TileKind::Blue,
        TileKind::Green,
        TileKind::Yellow,
        TileKind::Magenta,
    ];

    /// Palette index of this kind (0..5)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_blast_types::TileKind;
    ///
    /// assert_eq!(TileKind::Red.as_index(), 0);
    /// assert_eq!(TileKind::Magenta.as_index(), 4);
    /// ```
    pub fn as_index(&self) -> u8 {
        match self {
            TileKind::Red => 0,
            TileKind::Blue => 1,
            TileKind::Green => 2,
            TileKind::Yellow => 3,
            TileKind::Magenta => 4,
        }
    }

    /// Kind for a palette index, `None` if out of range
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_blast_types::TileKind;
    ///
    /// assert_eq!(TileKind::from_index(1), Some(TileKind::Blue));
    /// assert_eq!(TileKind::from_index(5), None);
    /// ```
    pub fn from_index(index: u8) -> Option<Self> {
        TileKind::ALL.get(index as usize).copied()
    }

    /// Lowercase name, used by the adapter protocol and status panel
    pub fn as_str(&self) -> &'static str {
        match self {
            TileKind::Red => "red",
            TileKind::Blue => "blue",
            TileKind::Green => "green",
            TileKind::Yellow => "yellow",
            TileKind::Magenta => "magenta",
        }
    }
}

/// Tile identity
///
/// Allocated monotonically by the core and never reused within a session.
/// The id doubles as the presentation handle: a spawned visual is addressed
/// by the id of the tile it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub u32);

/// A tile instance: identity plus kind
///
/// Position is not part of the tile; the grid cell it occupies is the single
/// source of truth for where it is. Tiles keep their identity while moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
}

/// An in-bounds cell coordinate
///
/// Row 0 is the bottom row. Constructed from validated coordinates only;
/// out-of-range inputs are rejected at the grid API boundary before a
/// `GridPos` exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub x: u8,
    pub y: u8,
}

impl GridPos {
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Center of this cell in world units (one unit per cell)
    pub fn world_pos(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

/// A position in world units
///
/// Used for animation endpoints and sprite placement. One unit per cell;
/// values outside the grid (e.g. refill spawn points above the top row) are
/// legal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation between `self` and `other` at parameter `t`
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_blast_types::Vec2;
    ///
    /// let a = Vec2::new(0.0, 0.0);
    /// let b = Vec2::new(4.0, 2.0);
    /// assert_eq!(a.lerp(b, 0.5), Vec2::new(2.0, 1.0));
    /// assert_eq!(a.lerp(b, 1.0), b);
    /// ```
    pub fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        Vec2::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Move scheduler phases
///
/// `Idle` is both the initial state and the terminal state of every cycle.
/// A resolved move walks `Resolving → Clearing → Collapsing → Refilling →
/// Settling` and returns to `Idle`; a rejected activation returns to `Idle`
/// directly from `Resolving`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Resolving,
    Clearing,
    Collapsing,
    Refilling,
    Settling,
}

impl Phase {
    /// Lowercase name for the adapter protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Resolving => "resolving",
            Phase::Clearing => "clearing",
            Phase::Collapsing => "collapsing",
            Phase::Refilling => "refilling",
            Phase::Settling => "settling",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Phase::Idle)
    }
}

/// Commands produced by the input layer
///
/// These are player-level commands; the engine core only ever sees the
/// resulting `(x, y)` activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    /// Move the cell cursor one column left
    CursorLeft,
    /// Move the cell cursor one column right
    CursorRight,
    /// Move the cell cursor one row up
    CursorUp,
    /// Move the cell cursor one row down
    CursorDown,
    /// Activate the tile under the cursor
    Activate,
    /// Restart the session with a fresh grid
    Restart,
}

/// Emitted once per resolved move, consumed by score/move collaborators
///
/// Recorded when the clear is applied; observers drain it via
/// `MoveScheduler::take_last_outcome`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Number of tiles cleared by the move
    pub cleared: u32,
    /// Kind shared by every cleared tile
    pub kind: TileKind,
}

/// Engine configuration surface
///
/// The seven recognized options. Defaults: a 6x6 grid, the full 5-kind
/// palette, groups of 2 or more clear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Grid width in cells
    pub width: u8,
    /// Grid height in cells
    pub height: u8,
    /// How many palette kinds refill draws from (1..=5)
    pub palette_size: u8,
    /// Minimum connected-group size for a valid move
    pub min_group_size: usize,
    /// Refill spawn distance above the topmost row, in world units
    pub refill_spawn_offset: f32,
    /// Gravity-collapse animation duration in milliseconds
    pub collapse_duration_ms: u32,
    /// Refill drop-in animation duration in milliseconds
    pub refill_duration_ms: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            palette_size: DEFAULT_PALETTE_SIZE,
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
            refill_spawn_offset: DEFAULT_REFILL_SPAWN_OFFSET,
            collapse_duration_ms: DEFAULT_COLLAPSE_DURATION_MS,
            refill_duration_ms: DEFAULT_REFILL_DURATION_MS,
        }
    }
}

impl EngineConfig {
    /// Number of cells in the grid
    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Palette size clamped to the kinds that actually exist
    pub fn effective_palette(&self) -> usize {
        (self.palette_size as usize).clamp(1, TileKind::ALL.len())
    }
}
