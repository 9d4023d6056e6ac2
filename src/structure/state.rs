//! Session state for the block placement engine

use serde::{Deserialize, Serialize};

use crate::rng::GameRng;
use crate::schedule::Scheduler;

use super::grid::Grid;
use super::piece::Piece;

/// Delayed events owned by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructureEvent {
    /// Clearing cells empty now
    ClearSettled,
    /// Terminal condition reached; surface the session-over signal
    SessionOver,
}

/// Signals surfaced from `tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureSignal {
    /// A clear animation finished and its cells emptied
    ClearFinished,
    SessionEnded,
}

/// What a placement attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// Valid drop; `lines` completed by it (0 for most)
    Placed { lines: u32 },
    /// Illegal position; nothing changed
    Rejected,
    /// Not running, or the tray index is out of range
    Ignored,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureState {
    pub grid: Grid,
    /// Up to three pieces; refilled only once all are spent
    pub tray: Vec<Piece>,
    /// Session meter in [0, 1]; full ends the session
    pub zen: f32,
    pub score: u64,
    pub lines_cleared: u32,
    /// Consecutive valid placements
    pub clean_streak: u32,
    /// Rejected drops since the last valid one
    pub invalid_attempts: u32,
    /// Valid placements and total attempts, for the accuracy summary
    pub placements: u32,
    pub attempts: u32,
    pub session_elapsed: f32,
    pub session_ended: bool,
    pub running: bool,
    /// Terminal condition reached, end signal pending
    pub ending: bool,
    /// Difficulty captured at start, biases generation and the XP formula
    pub difficulty: f32,
    pub rng: GameRng,
    pub events: Scheduler<StructureEvent>,
}

impl StructureState {
    /// Create an idle session; `start` builds the grid and tray
    pub fn new(seed: u64) -> Self {
        Self {
            grid: Grid::new(),
            tray: Vec::new(),
            zen: 0.0,
            score: 0,
            lines_cleared: 0,
            clean_streak: 0,
            invalid_attempts: 0,
            placements: 0,
            attempts: 0,
            session_elapsed: 0.0,
            session_ended: false,
            running: false,
            ending: false,
            difficulty: 0.5,
            rng: GameRng::seeded(seed),
            events: Scheduler::new(),
        }
    }
}
