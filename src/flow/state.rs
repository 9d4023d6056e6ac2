//! Session state for the rhythm grid engine

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::schedule::Scheduler;

/// Where a session is in its watch/echo loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RhythmPhase {
    Idle,
    /// Pattern playback; input is ignored
    Watching,
    /// Player echoes the pattern tile by tile
    Syncing,
    /// Meter filled; the whole grid glows before the next cycle
    Flowing,
}

/// Delayed events owned by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowEvent {
    /// Light a tile during playback
    TileOn(usize),
    TileOff,
    /// Playback finished; hand control to the player
    BeginSync,
    /// Light the next tile awaiting its tap
    PulseNext,
    /// Tap window expired. Carries the window token at schedule time so a
    /// tap in the meantime retires it.
    MissWindow(u64),
    /// Drop the correct-tile marks partway through miss recovery
    ClearMarks,
    /// Build a fresh pattern and replay it
    Restart,
    ExitFlowing,
}

/// Signals surfaced from `tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowSignal {
    /// A new pattern started playing back
    WatchStarted,
    /// Playback done; taps are now judged
    SyncStarted,
    /// The tap window expired
    Missed,
    CycleCompleted,
    /// The sync meter filled; every tile glows
    FlowEntered,
    FlowEnded,
}

/// What a tap did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapJudgement {
    Correct,
    Miss,
    /// Outside the sync phase or off the grid; nothing changed
    Ignored,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowState {
    pub phase: RhythmPhase,
    /// Side length; tiles are indexed row-major
    pub grid_size: usize,
    /// Tile sequence for the current cycle
    pub pattern: Vec<usize>,
    /// Position within the pattern during the sync phase
    pub sync_index: usize,
    pub pattern_length: usize,
    /// Seconds per pattern step, adapted to performance
    pub beat: f32,
    pub cycle_count: u32,
    /// Consecutive correct taps
    pub streak: u32,
    pub best_streak: u32,
    /// Consecutive misses; three shorten the pattern
    pub miss_count: u32,
    /// Meter in [0, 1]; full triggers the flowing phase
    pub flow_sync: f32,
    /// Tile lit right now (playback, or awaiting its tap)
    pub active_tile: Option<usize>,
    /// Tiles already echoed correctly this cycle
    pub correct_tiles: Vec<usize>,
    /// Whole-grid glow while flowing
    pub glow_all: bool,
    pub score: u64,
    /// Retires pending miss windows when a tap lands first
    pub(super) window_token: u64,
    pub events: Scheduler<FlowEvent>,
}

impl FlowState {
    /// Create an idle session on a size×size grid (minimum 2)
    pub fn new(grid_size: usize) -> Self {
        Self {
            phase: RhythmPhase::Idle,
            grid_size: grid_size.max(2),
            pattern: Vec::new(),
            sync_index: 0,
            pattern_length: 3,
            beat: FLOW_BASE_BEAT,
            cycle_count: 0,
            streak: 0,
            best_streak: 0,
            miss_count: 0,
            flow_sync: 0.0,
            active_tile: None,
            correct_tiles: Vec::new(),
            glow_all: false,
            score: 0,
            window_token: 0,
            events: Scheduler::new(),
        }
    }

    pub fn tile_count(&self) -> usize {
        self.grid_size * self.grid_size
    }
}
