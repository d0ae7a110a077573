//! Move scheduler - single-flight orchestration of a move
//!
//! Owns the grid and is its only mutator. An activation is accepted only
//! from `Idle`; everything after acceptance runs through the fixed phase
//! sequence `Resolving → Clearing → Collapsing → Refilling → Settling` and
//! back to `Idle`. The collapse batch must fully settle before refill is
//! planned, because refill reads the post-collapse grid; the two are never
//! animated concurrently.
//!
//! Cooperative model: `Collapsing` and `Refilling` wait on their animation
//! batch across calls to [`MoveScheduler::tick`]; nothing blocks a thread.

use tui_blast_types::{EngineConfig, GridPos, MoveOutcome, Phase, Tile, TileKind};

use crate::animation::{AnimationBatch, Transition};
use crate::cascade::{
    apply_clear, apply_collapse, apply_refill, plan_clear, plan_collapse, plan_refill, validate,
};
use crate::grid::Grid;
use crate::group::{find_connected_group, GroupError};
use crate::rng::{SimpleRng, TileIds};
use crate::snapshot::EngineSnapshot;
use crate::visual::VisualSink;

/// Why an activation did not start a move
///
/// Every rejection leaves the grid untouched and the scheduler in (or back
/// in) `Idle`. `Busy` is the single-flight guard: by design it is ignored
/// rather than surfaced to the player; it is returned here so callers can
/// log or ack it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationRejection {
    Busy,
    OutOfBounds,
    EmptySeed,
    BelowThreshold,
}

impl ActivationRejection {
    pub fn code(self) -> &'static str {
        match self {
            ActivationRejection::Busy => "busy",
            ActivationRejection::OutOfBounds
            | ActivationRejection::EmptySeed
            | ActivationRejection::BelowThreshold => "invalid_activation",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ActivationRejection::Busy => "a move is already in flight",
            ActivationRejection::OutOfBounds => "activated coordinate outside the grid",
            ActivationRejection::EmptySeed => "activated cell holds no tile",
            ActivationRejection::BelowThreshold => "connected group is below the minimum size",
        }
    }
}

impl From<GroupError> for ActivationRejection {
    fn from(value: GroupError) -> Self {
        match value {
            GroupError::OutOfBounds { .. } => ActivationRejection::OutOfBounds,
            GroupError::EmptySeed => ActivationRejection::EmptySeed,
        }
    }
}

/// Single-flight move state machine
#[derive(Debug, Clone)]
pub struct MoveScheduler {
    config: EngineConfig,
    grid: Grid,
    rng: SimpleRng,
    ids: TileIds,
    phase: Phase,
    batch: Option<AnimationBatch>,
    last_outcome: Option<MoveOutcome>,
}

impl MoveScheduler {
    /// Create an idle scheduler over an empty grid
    pub fn new(config: EngineConfig, seed: u32) -> Self {
        Self {
            grid: Grid::new(config.width, config.height),
            config,
            rng: SimpleRng::new(seed),
            ids: TileIds::new(),
            phase: Phase::Idle,
            batch: None,
            last_outcome: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current RNG state (for restarting with the same sequence)
    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    #[cfg(test)]
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Take and clear the outcome of the last resolved move
    pub fn take_last_outcome(&mut self) -> Option<MoveOutcome> {
        self.last_outcome.take()
    }

    /// Capture observable state into a reusable snapshot buffer
    pub fn snapshot_into(&self, out: &mut EngineSnapshot) {
        let width = self.grid.width() as usize;
        out.width = self.grid.width();
        out.height = self.grid.height();
        out.cells.clear();
        out.cells.resize(self.config.cell_count(), 0);
        for (pos, tile) in self.grid.tiles() {
            out.cells[(pos.y as usize) * width + (pos.x as usize)] =
                EngineSnapshot::encode_cell(Some(tile.kind));
        }
        out.phase = self.phase;
        out.seed = self.rng.seed();
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let mut snap = EngineSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    /// Populate every cell with a randomly typed tile and spawn its visual
    ///
    /// The initial layout makes no match-free or solvable-move guarantee;
    /// see DESIGN.md.
    pub fn initialize(&mut self, visuals: &mut dyn VisualSink) {
        let palette = self.config.effective_palette() as u32;
        for x in 0..self.grid.width() {
            for y in 0..self.grid.height() {
                let pos = GridPos::new(x, y);
                let kind = TileKind::from_index(self.rng.next_range(palette) as u8)
                    .unwrap_or(TileKind::Red);
                let tile = Tile {
                    id: self.ids.next(),
                    kind,
                };
                self.grid.put(pos, Some(tile));
                visuals.spawn(tile, pos.world_pos());
            }
        }
        self.phase = Phase::Idle;
        self.batch = None;
        self.last_outcome = None;
    }

    /// Destroy every visual and empty the grid
    pub fn shutdown(&mut self, visuals: &mut dyn VisualSink) {
        for (_, tile) in self.grid.tiles() {
            visuals.destroy(tile.id);
        }
        self.grid.clear();
        self.phase = Phase::Idle;
        self.batch = None;
        self.last_outcome = None;
    }

    /// Handle a "tile activated at (x, y)" input event
    ///
    /// Accepted only from `Idle`. A rejected activation (busy scheduler,
    /// empty or out-of-range seed, undersized group) changes nothing and
    /// returns the scheduler to `Idle`; no outcome is recorded. An accepted
    /// activation applies the clear synchronously, records the outcome, and
    /// leaves the scheduler in `Collapsing` driving the collapse batch.
    pub fn on_tile_activated(
        &mut self,
        x: i16,
        y: i16,
        visuals: &mut dyn VisualSink,
    ) -> Result<(), ActivationRejection> {
        if !self.phase.is_idle() {
            return Err(ActivationRejection::Busy);
        }

        self.phase = Phase::Resolving;
        let group = match find_connected_group(&self.grid, x, y) {
            Ok(group) => group,
            Err(err) => {
                self.phase = Phase::Idle;
                return Err(err.into());
            }
        };
        if !validate(&group, self.config.min_group_size) {
            self.phase = Phase::Idle;
            return Err(ActivationRejection::BelowThreshold);
        }

        // Clear: empty the cells, drop the visuals, tell the collaborators.
        self.phase = Phase::Clearing;
        let clear = plan_clear(&self.grid, &group);
        apply_clear(&mut self.grid, &clear);
        for &(_, tile) in &clear.cleared {
            visuals.destroy(tile.id);
        }
        self.last_outcome = Some(MoveOutcome {
            cleared: clear.cleared_count(),
            kind: group.kind,
        });

        // Collapse positions are committed to the grid up front; the batch
        // only replays the motion visually.
        let collapse = plan_collapse(&self.grid);
        apply_collapse(&mut self.grid, &collapse);
        let transitions = collapse
            .moves
            .iter()
            .map(|mv| Transition {
                target: mv.tile.id,
                from: mv.from.world_pos(),
                to: mv.to.world_pos(),
            })
            .collect();
        let batch = AnimationBatch::new(transitions, self.config.collapse_duration_ms);
        batch.start(visuals);
        self.batch = Some(batch);
        self.phase = Phase::Collapsing;
        Ok(())
    }

    /// Advance the in-flight move by one tick
    ///
    /// No-op while `Idle`. Refill planning happens in the same tick the
    /// collapse batch completes, never earlier.
    pub fn tick(&mut self, delta_ms: u32, visuals: &mut dyn VisualSink) {
        match self.phase {
            Phase::Collapsing => {
                if self.advance_batch(delta_ms, visuals) {
                    self.begin_refill(visuals);
                }
            }
            Phase::Refilling => {
                if self.advance_batch(delta_ms, visuals) {
                    self.settle(visuals);
                }
            }
            Phase::Idle | Phase::Resolving | Phase::Clearing | Phase::Settling => {}
        }
    }

    fn advance_batch(&mut self, delta_ms: u32, visuals: &mut dyn VisualSink) -> bool {
        match self.batch.as_mut() {
            Some(batch) => batch.advance(delta_ms, visuals),
            None => true,
        }
    }

    fn begin_refill(&mut self, visuals: &mut dyn VisualSink) {
        let refill = plan_refill(&self.grid, &self.config, &mut self.rng, &mut self.ids);
        apply_refill(&mut self.grid, &refill);

        let mut transitions = Vec::with_capacity(refill.spawns.len());
        for spawn in &refill.spawns {
            visuals.spawn(spawn.tile, spawn.spawn);
            transitions.push(Transition {
                target: spawn.tile.id,
                from: spawn.spawn,
                to: spawn.target.world_pos(),
            });
        }
        let batch = AnimationBatch::new(transitions, self.config.refill_duration_ms);
        batch.start(visuals);
        self.batch = Some(batch);
        self.phase = Phase::Refilling;
    }

    /// Reset transient visual emphasis and return to idle
    fn settle(&mut self, visuals: &mut dyn VisualSink) {
        self.phase = Phase::Settling;
        for (_, tile) in self.grid.tiles() {
            visuals.set_scale(tile.id, 1.0);
        }
        self.batch = None;
        self.phase = Phase::Idle;
    }
}
