//! Engine context - the one explicit owner of scheduler and session
//!
//! Constructed once by the surrounding application and passed by reference
//! wherever engine access is needed; there is no ambient global state.
//! `initialize` and `shutdown` are the defined lifecycle entry points.

use tui_blast_core::{ActivationRejection, MoveScheduler, VisualSink};
use tui_blast_types::{EngineConfig, MoveOutcome};

use crate::session::GameSession;

/// Why the context refused an activation
///
/// Mirrors the core's rejection reasons plus the session-terminal case the
/// core does not know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivateError {
    /// The move budget is spent; the session must be restarted
    OutOfMoves,
    /// A move is already in flight
    Busy,
    OutOfBounds,
    EmptySeed,
    BelowThreshold,
}

impl ActivateError {
    pub fn code(self) -> &'static str {
        match self {
            ActivateError::OutOfMoves => "out_of_moves",
            ActivateError::Busy => "busy",
            ActivateError::OutOfBounds | ActivateError::EmptySeed | ActivateError::BelowThreshold => {
                "invalid_activation"
            }
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ActivateError::OutOfMoves => "move budget is spent",
            ActivateError::Busy => "a move is already in flight",
            ActivateError::OutOfBounds => "activated coordinate outside the grid",
            ActivateError::EmptySeed => "activated cell holds no tile",
            ActivateError::BelowThreshold => "connected group is below the minimum size",
        }
    }
}

impl From<ActivationRejection> for ActivateError {
    fn from(value: ActivationRejection) -> Self {
        match value {
            ActivationRejection::Busy => ActivateError::Busy,
            ActivationRejection::OutOfBounds => ActivateError::OutOfBounds,
            ActivationRejection::EmptySeed => ActivateError::EmptySeed,
            ActivationRejection::BelowThreshold => ActivateError::BelowThreshold,
        }
    }
}

/// Scheduler plus session, wired together
pub struct EngineContext {
    scheduler: MoveScheduler,
    session: GameSession,
    /// Most recently resolved move, kept for observers (view popups,
    /// adapter broadcasts) until taken.
    last_resolved: Option<MoveOutcome>,
}

impl EngineContext {
    pub fn new(config: EngineConfig, seed: u32) -> Self {
        Self {
            scheduler: MoveScheduler::new(config, seed),
            session: GameSession::new(),
            last_resolved: None,
        }
    }

    pub fn scheduler(&self) -> &MoveScheduler {
        &self.scheduler
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[cfg(test)]
    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    /// Fill the grid and spawn every visual
    pub fn initialize(&mut self, visuals: &mut dyn VisualSink) {
        self.scheduler.initialize(visuals);
    }

    /// Tear down every visual and empty the grid
    pub fn shutdown(&mut self, visuals: &mut dyn VisualSink) {
        self.scheduler.shutdown(visuals);
        self.last_resolved = None;
    }

    /// Fresh grid and fresh session, continuing the RNG sequence
    ///
    /// Ignored while a move is in flight: a started move always runs to
    /// completion, so there is never a partially-applied grid to tear down.
    pub fn restart(&mut self, visuals: &mut dyn VisualSink) {
        if !self.scheduler.phase().is_idle() {
            return;
        }
        self.scheduler.shutdown(visuals);
        self.scheduler.initialize(visuals);
        self.session.reset();
        self.last_resolved = None;
    }

    /// Forward a "tile activated" event to the scheduler
    ///
    /// Once the session is terminal, activations are no longer forwarded.
    pub fn activate(
        &mut self,
        x: i16,
        y: i16,
        visuals: &mut dyn VisualSink,
    ) -> Result<(), ActivateError> {
        if self.session.is_over() {
            return Err(ActivateError::OutOfMoves);
        }
        self.scheduler.on_tile_activated(x, y, visuals)?;
        self.poll_outcome();
        Ok(())
    }

    /// Advance any in-flight move by one tick
    pub fn tick(&mut self, delta_ms: u32, visuals: &mut dyn VisualSink) {
        self.scheduler.tick(delta_ms, visuals);
        self.poll_outcome();
    }

    /// Most recent resolved move, cleared on read
    pub fn take_resolved(&mut self) -> Option<MoveOutcome> {
        self.last_resolved.take()
    }

    fn poll_outcome(&mut self) {
        if let Some(outcome) = self.scheduler.take_last_outcome() {
            self.session.apply_outcome(outcome);
            self.last_resolved = Some(outcome);
        }
    }
}
