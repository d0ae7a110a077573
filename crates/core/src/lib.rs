//! Core engine module - pure, deterministic, and testable
//!
//! This module contains the match-elimination rules, the move state machine,
//! and the animation driver. It has **zero dependencies** on UI, networking,
//! or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical fills and refills
//! - **Testable**: Unit tests for every rule and phase transition
//! - **Portable**: Can run against any `VisualSink` (terminal, headless)
//!
//! # Module Structure
//!
//! - [`grid`]: canonical tile store with bounds-checked access
//! - [`group`]: flood-fill detection of connected same-kind groups
//! - [`cascade`]: pure clear/collapse/refill planning and the apply steps
//! - [`scheduler`]: single-flight move state machine
//! - [`animation`]: tick-based lockstep interpolation with smoothstep easing
//! - [`rng`]: LCG random source and tile-id allocation
//! - [`visual`]: the abstract presentation collaborator
//! - [`snapshot`]: reusable observable state for views and the adapter
//!
//! # Move Pipeline
//!
//! One accepted activation runs clear → gravity collapse → refill, with the
//! two animated phases strictly sequenced: refill planning reads the
//! post-collapse grid and therefore never starts before the collapse batch
//! has fully settled.
//!
//! # Example
//!
//! ```
//! use tui_blast_core::{MoveScheduler, NullSink};
//! use tui_blast_types::{EngineConfig, TICK_MS};
//!
//! let mut visuals = NullSink;
//! let mut scheduler = MoveScheduler::new(EngineConfig::default(), 12345);
//! scheduler.initialize(&mut visuals);
//!
//! // Activate some cell; a too-small group is rejected, a valid one starts
//! // the cascade.
//! let _ = scheduler.on_tile_activated(2, 3, &mut visuals);
//! for _ in 0..60 {
//!     scheduler.tick(TICK_MS, &mut visuals);
//! }
//! assert!(scheduler.phase().is_idle());
//! ```

pub mod animation;
pub mod cascade;
pub mod grid;
pub mod group;
pub mod rng;
pub mod scheduler;
pub mod snapshot;
pub mod visual;

pub use tui_blast_types as types;

// Re-export commonly used types for convenience
pub use animation::{smoothstep, AnimationBatch, Transition};
pub use cascade::{ClearPlan, CollapsePlan, RefillPlan, TileMove, TileSpawn};
pub use grid::{CellContent, Grid, GridError};
pub use group::{find_connected_group, Group, GroupError};
pub use rng::{SimpleRng, TileIds};
pub use scheduler::{ActivationRejection, MoveScheduler};
pub use snapshot::EngineSnapshot;
pub use visual::{NullSink, VisualSink};
