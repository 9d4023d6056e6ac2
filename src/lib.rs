//! Zen Arcade - deterministic mini-game simulation engines
//!
//! Core modules:
//! - `focus`: Reaction/physics arena (moving core, tap accuracy, combo/flow)
//! - `flow`: Rhythm-memory grid (pattern playback, sync matching, adaptive tempo)
//! - `harmony`: Liquid-sort puzzle (tube moves, solve detection, generator)
//! - `structure`: Block placement grid (line clears, adaptive piece weights)
//! - `schedule`: Generation-token scheduler for cancellable delayed events
//! - `rng`: Seedable RNG with weighted choice
//! - `ledger`: Progression ledger (XP, levels, streaks, personal bests)
//! - `mood`: Mood check-in metadata and difficulty mapping
//!
//! Every engine is a pure state machine: the host calls `tick(dt)` at its
//! frame rate, feeds discrete input through the documented operations, and
//! renders from the public state. Nothing here touches a clock, a thread,
//! or an I/O handle.

pub mod flow;
pub mod focus;
pub mod harmony;
pub mod ledger;
pub mod mood;
pub mod rng;
pub mod schedule;
pub mod structure;

pub use ledger::{Ledger, SessionReport, xp_formula};
pub use mood::Mood;
pub use rng::GameRng;
pub use schedule::Scheduler;

use glam::Vec2;

/// Engine tuning constants
pub mod consts {
    /// Focus session length in seconds
    pub const FOCUS_SESSION_SECS: f32 = 30.0;
    /// Core diameter at normal size
    pub const FOCUS_CORE_SIZE: f32 = 72.0;
    /// Phase duration range (seconds)
    pub const FOCUS_PHASE_MIN_SECS: f32 = 4.0;
    pub const FOCUS_PHASE_MAX_SECS: f32 = 6.0;
    /// Elapsed-time gates for the later movement phases
    pub const FOCUS_BURST_UNLOCK_SECS: f32 = 5.0;
    pub const FOCUS_SPIRAL_UNLOCK_SECS: f32 = 10.0;
    pub const FOCUS_EVASIVE_UNLOCK_SECS: f32 = 15.0;
    /// Core speed: base plus linear growth over the session
    pub const FOCUS_BASE_SPEED: f32 = 120.0;
    pub const FOCUS_SPEED_GROWTH: f32 = 4.0;
    /// Burst phase velocity multiplier
    pub const FOCUS_BURST_SCALE: f32 = 1.6;
    /// Evasive phase jitter acceleration (px/s²)
    pub const FOCUS_EVASIVE_JITTER: f32 = 260.0;
    /// Wall bounce energy retention
    pub const FOCUS_WALL_RESTITUTION: f32 = 0.92;
    /// Arena edge margin the core bounces off
    pub const FOCUS_WALL_MARGIN: f32 = 40.0;
    /// Shrink event: trigger chance per phase switch, duration, size and speed scales
    pub const FOCUS_SHRINK_CHANCE: f32 = 0.18;
    pub const FOCUS_SHRINK_SECS: f32 = 2.0;
    pub const FOCUS_SHRINK_SCALE: f32 = 0.7;
    pub const FOCUS_SHRINK_SPEED_SCALE: f32 = 1.4;
    /// Hit-quality rings as fractions of the effective core radius
    pub const FOCUS_RING_PERFECT: f32 = 0.35;
    pub const FOCUS_RING_GOOD: f32 = 0.65;
    /// Base points per hit quality
    pub const FOCUS_POINTS_PERFECT: u64 = 100;
    pub const FOCUS_POINTS_GOOD: u64 = 60;
    pub const FOCUS_POINTS_WEAK: u64 = 20;
    /// Score multiplier bounds and steps
    pub const FOCUS_MULT_MAX: f32 = 10.0;
    pub const FOCUS_MULT_PERFECT_GAIN: f32 = 0.5;
    pub const FOCUS_MULT_GOOD_GAIN: f32 = 0.25;
    pub const FOCUS_MULT_MISS_LOSS: f32 = 1.0;
    /// Sync meter start level and deltas per hit quality
    pub const FOCUS_START_SYNC: f32 = 0.3;
    pub const FOCUS_SYNC_PERFECT: f32 = 0.10;
    pub const FOCUS_SYNC_GOOD: f32 = 0.05;
    pub const FOCUS_SYNC_WEAK: f32 = 0.02;
    pub const FOCUS_SYNC_MISS: f32 = 0.07;
    /// Flow mode duration and the sync level it resets to on exit
    pub const FOCUS_FLOW_SECS: f32 = 4.0;
    pub const FOCUS_FLOW_EXIT_SYNC: f32 = 0.5;
    /// Streak bonus applied when the session is flushed to the ledger
    pub const FOCUS_XP_STREAK_BONUS: u64 = 10;

    /// Flow grid side length (tiles per row)
    pub const FLOW_GRID_SIZE: usize = 3;
    /// Beat interval: base minus difficulty scaling, clamped by tempo bounds
    pub const FLOW_BASE_BEAT: f32 = 1.10;
    pub const FLOW_BEAT_DIFFICULTY_SCALE: f32 = 0.45;
    pub const FLOW_TEMPO_MIN: f32 = 0.50;
    pub const FLOW_TEMPO_MAX: f32 = 1.20;
    pub const FLOW_TEMPO_GAIN: f32 = 0.02;
    pub const FLOW_TEMPO_LOSS: f32 = 0.07;
    /// Fraction of a beat a tile stays lit during the watch phase
    pub const FLOW_TILE_ON_FRACTION: f32 = 0.65;
    /// Pause after the watch sequence before sync input opens
    pub const FLOW_WATCH_LEAD: f32 = 0.3;
    /// Extra tap tolerance beyond one beat
    pub const FLOW_INPUT_GRACE: f32 = 0.25;
    /// Delay before the next element pulses after a correct tap
    pub const FLOW_NEXT_PULSE_FRACTION: f32 = 0.18;
    /// Sync meter gains and losses
    pub const FLOW_SYNC_GAIN: f32 = 0.12;
    pub const FLOW_SYNC_STREAK_RATE: f32 = 0.008;
    pub const FLOW_SYNC_STREAK_CAP: f32 = 0.05;
    pub const FLOW_SYNC_LOSS: f32 = 0.04;
    pub const FLOW_CYCLE_BONUS: f32 = 0.18;
    /// Consecutive misses before the pattern shortens
    pub const FLOW_MISS_LIMIT: u32 = 3;
    /// Miss recovery: correct marks clear, then the cycle restarts
    pub const FLOW_MISS_CLEAR_DELAY: f32 = 0.55;
    pub const FLOW_MISS_RESTART_DELAY: f32 = 1.2;
    /// Delay before the next cycle after completing one
    pub const FLOW_NEXT_CYCLE_DELAY: f32 = 0.9;
    /// Perfect-flow celebration duration and the sync level it resets to
    pub const FLOW_FLOWING_SECS: f32 = 2.2;
    pub const FLOW_FLOWING_EXIT_SYNC: f32 = 0.55;
    /// Session scoring
    pub const FLOW_TAP_POINTS: u64 = 10;
    pub const FLOW_CYCLE_POINTS: u64 = 50;
    /// Ledger flush conversion for rhythm sessions
    pub const FLOW_XP_RATE: f32 = 1.2;
    pub const FLOW_XP_STREAK_BONUS: u64 = 15;

    /// Tube capacity (tokens per tube)
    pub const TUBE_CAPACITY: usize = 4;
    /// Color count bounds across puzzles
    pub const HARMONY_MIN_COLORS: usize = 3;
    pub const HARMONY_MAX_COLORS: usize = 6;
    /// Shuffle retry bound for the non-triviality guarantee
    pub const HARMONY_SHUFFLE_ATTEMPTS: u32 = 20;
    /// Rejected-move shake duration
    pub const HARMONY_SHAKE_SECS: f32 = 0.5;
    /// Delay between the last move and the solved signal
    pub const HARMONY_SOLVE_DELAY: f32 = 0.7;
    /// Points per solved puzzle
    pub const HARMONY_SOLVE_POINTS: u64 = 100;

    /// Structure grid dimensions
    pub const GRID_ROWS: usize = 10;
    pub const GRID_COLS: usize = 10;
    /// Tray slots, refilled only when all are spent
    pub const TRAY_SIZE: usize = 3;
    /// Line-clear animation time before cells empty
    pub const CLEAR_SECS: f32 = 0.35;
    /// Delay between the terminal condition and the session-over signal
    pub const STRUCTURE_END_DELAY: f32 = 0.7;
    /// Zen meter: per-line gain plus a streak bonus
    pub const ZEN_PER_LINE: f32 = 0.15;
    pub const ZEN_STREAK_RATE: f32 = 0.02;
    pub const ZEN_STREAK_CAP: u32 = 10;
    /// Density thresholds that bias piece generation toward small shapes
    pub const DENSITY_HEAVY: f32 = 0.7;
    pub const DENSITY_MILD: f32 = 0.5;
    /// Generator adaptation triggers
    pub const INVALID_ATTEMPT_LIMIT: u32 = 3;
    pub const CLEAN_STREAK_BOOST: u32 = 6;
    /// Session scoring
    pub const STRUCTURE_LINE_POINTS: u64 = 10;
    pub const STRUCTURE_LINE_XP: u64 = 5;
}

/// Clamp to the unit interval
#[inline]
pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}
