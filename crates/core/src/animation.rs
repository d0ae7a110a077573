//! Animation driver - tick-based lockstep interpolation
//!
//! A batch holds (tile, start, end) transitions and one shared duration.
//! `advance(delta_ms)` moves every transition together along a smoothstep
//! curve and reports completion through its return value; the surrounding
//! scheduling loop decides when ticks happen. Once complete, a batch does no
//! further work.

use tui_blast_types::{TileId, Vec2};

use crate::visual::VisualSink;

/// One entity moving from `from` to `to` over the batch duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub target: TileId,
    pub from: Vec2,
    pub to: Vec2,
}

/// A batch of transitions advanced in lockstep
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationBatch {
    transitions: Vec<Transition>,
    duration_ms: u32,
    elapsed_ms: u32,
    complete: bool,
}

/// Smoothstep easing: a² (3 − 2a)
///
/// Input is clamped to [0, 1]; endpoints map to themselves exactly.
pub fn smoothstep(a: f32) -> f32 {
    let a = a.clamp(0.0, 1.0);
    a * a * (3.0 - 2.0 * a)
}

impl AnimationBatch {
    /// Create a batch; an empty batch is complete from the start
    pub fn new(transitions: Vec<Transition>, duration_ms: u32) -> Self {
        let complete = transitions.is_empty();
        Self {
            transitions,
            duration_ms,
            elapsed_ms: 0,
            complete,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Apply every start position
    ///
    /// Called once before the first tick so entities sit at their starting
    /// points even if the first `advance` is a frame away. Targets whose
    /// visuals are already gone are skipped by the sink contract.
    pub fn start(&self, visuals: &mut dyn VisualSink) {
        for t in &self.transitions {
            visuals.set_position(t.target, t.from);
        }
    }

    /// Advance the batch by `delta_ms`; returns true once complete
    ///
    /// While running, every transition is set to the smoothstep-eased lerp of
    /// its endpoints. When elapsed time reaches the duration, every
    /// transition snaps exactly to its end value and the batch completes.
    /// A completed batch ignores further calls.
    pub fn advance(&mut self, delta_ms: u32, visuals: &mut dyn VisualSink) -> bool {
        if self.complete {
            return true;
        }

        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        if self.elapsed_ms >= self.duration_ms {
            for t in &self.transitions {
                visuals.set_position(t.target, t.to);
            }
            self.complete = true;
            return true;
        }

        let a = self.elapsed_ms as f32 / self.duration_ms as f32;
        let eased = smoothstep(a);
        for t in &self.transitions {
            visuals.set_position(t.target, t.from.lerp(t.to, eased));
        }
        false
    }
}
