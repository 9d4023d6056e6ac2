//! Tube-state model and puzzle session state

use serde::{Deserialize, Serialize};

use crate::rng::GameRng;
use crate::schedule::Scheduler;

/// Token colors, unlocked in declaration order as puzzles grow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hue {
    Violet,
    Cyan,
    Amber,
    Coral,
    Sage,
    Rose,
}

impl Hue {
    pub const ALL: [Hue; 6] = [
        Hue::Violet,
        Hue::Cyan,
        Hue::Amber,
        Hue::Coral,
        Hue::Sage,
        Hue::Rose,
    ];
}

/// Delayed events owned by the puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmonyEvent {
    /// Clear the shake on this tube
    ShakeOver(usize),
    /// The solving move has settled; surface the solved signal
    SolveSettled,
}

/// Signals surfaced from `tick` for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarmonySignal {
    ShakeCleared,
    Solved,
}

/// What a tap did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapResult {
    /// Out of range, or an empty tube with nothing selected
    Ignored,
    Selected,
    Deselected,
    Moved,
    /// Illegal target; the tube shakes
    Rejected,
}

/// Complete puzzle state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarmonyState {
    /// Tubes, bottom to top. Colored tubes first, then the spare empties.
    pub tubes: Vec<Vec<Hue>>,
    /// First tap of the two-phase move
    pub selected: Option<usize>,
    /// Fraction of colors already sorted into a full tube
    pub harmony: f32,
    /// Tube currently shaking after a rejected move
    pub shaking: Option<usize>,
    pub solved: bool,
    pub color_count: usize,
    /// Puzzles solved this session
    pub solve_count: u32,
    pub rng: GameRng,
    pub events: Scheduler<HarmonyEvent>,
}

impl HarmonyState {
    /// Create a session and build the first three-color puzzle
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            tubes: Vec::new(),
            selected: None,
            harmony: 0.0,
            shaking: None,
            solved: false,
            color_count: 0,
            solve_count: 0,
            rng: GameRng::seeded(seed),
            events: Scheduler::new(),
        };
        super::rules::start_fresh(&mut state);
        state
    }

    /// Total tokens across all tubes
    pub fn token_count(&self) -> usize {
        self.tubes.iter().map(Vec::len).sum()
    }
}
