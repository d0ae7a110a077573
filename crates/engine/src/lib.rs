//! Engine orchestration above the core
//!
//! The core resolves moves; this crate owns what surrounds them: the
//! explicit [`EngineContext`] lifecycle object and the score/move-budget
//! [`GameSession`]. Both the terminal binary and the adapter drive the game
//! exclusively through the context.

pub mod context;
pub mod session;

pub use tui_blast_core as core;
pub use tui_blast_types as types;

pub use context::{ActivateError, EngineContext};
pub use session::{score_for, GameSession};
