//! Input translation for terminal play.
//!
//! Turns key events into [`GameCommand`]s, tracks a grid cursor, and handles
//! held-key repeat, so the binary only ever forwards `(x, y)` activations to
//! the engine.

pub mod cursor;
pub mod handler;
pub mod map;

pub use tui_blast_types::GameCommand;

pub use cursor::Cursor;
pub use handler::InputHandler;
pub use map::{command_for_key, repeats, should_quit};
