//! Presentation collaborator interface
//!
//! The core never draws; it narrates tile lifecycle and movement to a
//! `VisualSink`. A terminal sprite store implements this in `tui-blast-term`;
//! tests and benches use [`NullSink`].

use tui_blast_types::{Tile, TileId, TileKind, Vec2};

/// Abstract presentation operations consumed by the core
///
/// The tile id is the visual handle; a tile is bound to its visual at spawn
/// and no lookup happens afterwards. Implementations must treat an unknown
/// id as a no-op: an animation batch may still address a tile whose visual
/// was removed mid-flight, and such updates are skipped, not failed.
pub trait VisualSink {
    /// Create a visual for `tile` at `position`
    fn spawn(&mut self, tile: Tile, position: Vec2);

    /// Remove the visual for `id`
    fn destroy(&mut self, id: TileId);

    /// Move the visual for `id` to `position`
    fn set_position(&mut self, id: TileId, position: Vec2);

    /// Set the emphasis scale of the visual for `id` (1.0 = none)
    fn set_scale(&mut self, id: TileId, scale: f32);

    /// Re-tint the visual for `id` to match `kind`
    fn set_color(&mut self, id: TileId, kind: TileKind);
}

/// A sink that discards everything
///
/// For headless runs and benchmarks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl VisualSink for NullSink {
    fn spawn(&mut self, _tile: Tile, _position: Vec2) {}
    fn destroy(&mut self, _id: TileId) {}
    fn set_position(&mut self, _id: TileId, _position: Vec2) {}
    fn set_scale(&mut self, _id: TileId, _scale: f32) {}
    fn set_color(&mut self, _id: TileId, _kind: TileKind) {}
}
