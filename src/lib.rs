//! tui-blast (workspace facade crate).
//!
//! This package keeps the `tui_blast::{core,engine,input,term,adapter,types}`
//! public API in one place while the implementation lives in dedicated crates
//! under `crates/`.

pub use tui_blast_adapter as adapter;
pub use tui_blast_core as core;
pub use tui_blast_engine as engine;
pub use tui_blast_input as input;
pub use tui_blast_term as term;
pub use tui_blast_types as types;
