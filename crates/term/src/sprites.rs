//! Tile sprite store - the terminal's `VisualSink`.
//!
//! Holds one sprite per live tile, keyed by tile id. The core narrates
//! spawn/move/destroy through the sink trait; the view reads the store each
//! frame and paints sprites at their current (possibly mid-animation) world
//! positions. Updates addressed to ids that are no longer present are
//! dropped, per the sink contract.

use std::collections::HashMap;

use tui_blast_core::VisualSink;
use tui_blast_types::{Tile, TileId, TileKind, Vec2};

/// One tile's presentation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: TileKind,
    pub position: Vec2,
    pub scale: f32,
}

/// Sprite store keyed by tile id.
#[derive(Debug, Clone, Default)]
pub struct TileSprites {
    sprites: HashMap<TileId, Sprite>,
}

impl TileSprites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn get(&self, id: TileId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileId, &Sprite)> {
        self.sprites.iter().map(|(id, sprite)| (*id, sprite))
    }
}

impl VisualSink for TileSprites {
    fn spawn(&mut self, tile: Tile, position: Vec2) {
        self.sprites.insert(
            tile.id,
            Sprite {
                kind: tile.kind,
                position,
                scale: 1.0,
            },
        );
    }

    fn destroy(&mut self, id: TileId) {
        self.sprites.remove(&id);
    }

    fn set_position(&mut self, id: TileId, position: Vec2) {
        if let Some(sprite) = self.sprites.get_mut(&id) {
            sprite.position = position;
        }
    }

    fn set_scale(&mut self, id: TileId, scale: f32) {
        if let Some(sprite) = self.sprites.get_mut(&id) {
            sprite.scale = scale;
        }
    }

    fn set_color(&mut self, id: TileId, kind: TileKind) {
        if let Some(sprite) = self.sprites.get_mut(&id) {
            sprite.kind = kind;
        }
    }
}
