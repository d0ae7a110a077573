//! Terminal "game renderer" module.
//!
//! The presentation collaborator for terminal play: a sprite store that
//! implements the core's `VisualSink`, a pure view that maps sprites and
//! engine state into a framebuffer, and a renderer that flushes frames to a
//! raw-mode terminal.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Paint tiles at animated world positions, not just grid cells
//! - Translate mouse clicks back into grid activations

pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod sprites;

pub use tui_blast_core as core;
pub use tui_blast_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AdapterStatusView, GameView, SessionView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use sprites::{Sprite, TileSprites};
