//! Session state for the reaction arena

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::rng::GameRng;

/// Movement behavior of the core; later phases unlock as the session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusPhase {
    /// Straight glide
    Drift,
    /// Velocity scaled up
    Burst,
    /// Parametric orbit around the arena center, exempt from wall bounces
    Spiral,
    /// Random jitter layered on top of the velocity
    Evasive,
}

/// Concentric accuracy band a tap landed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitQuality {
    Perfect,
    Good,
    Weak,
}

/// What a tap did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapOutcome {
    Hit { quality: HitQuality, points: u64 },
    /// Outside the core; combo and multiplier suffer
    Miss,
    /// Session not running; nothing changed
    Ignored,
}

/// Signals surfaced from `tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusSignal {
    /// Phase rollover: new velocity and duration (the behavior itself can
    /// repeat while only one phase is unlocked)
    PhaseSwitched(FocusPhase),
    ShrinkStarted,
    ShrinkEnded,
    /// Flow mode expired; sync resets partway
    FlowEnded,
    SessionEnded,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusState {
    /// Arena size in points; zero means the host has not laid out yet
    pub bounds: Vec2,
    pub position: Vec2,
    pub velocity: Vec2,
    pub phase: FocusPhase,
    /// Seconds until the next phase rollover
    pub phase_left: f32,
    /// Orbit captured when the spiral phase begins
    pub spiral_radius: f32,
    pub spiral_angle: f32,
    /// Core diameter; shrink mode scales the effective radius, not this
    pub core_size: f32,
    pub score: u64,
    /// Score multiplier in [1, 10]
    pub multiplier: f32,
    pub combo: u32,
    pub best_combo: u32,
    /// Meter in [0, 1]; full enters flow mode
    pub sync: f32,
    pub flow_mode: bool,
    pub flow_left: f32,
    pub shrink_mode: bool,
    pub shrink_left: f32,
    pub session_elapsed: f32,
    pub running: bool,
    pub session_ended: bool,
    /// Tap counts for the accuracy summary
    pub taps: u32,
    pub hits: u32,
    /// Most recent measured reaction in milliseconds
    pub reaction_ms: f32,
    pub(super) sum_reaction_secs: f32,
    pub(super) reaction_count: u32,
    /// Session time of the last retarget cue (phase switch or shrink)
    pub(super) last_cue: f32,
    pub rng: GameRng,
}

impl FocusState {
    /// Create an idle session; `start` seeds position and velocity
    pub fn new(seed: u64) -> Self {
        Self {
            bounds: Vec2::ZERO,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            phase: FocusPhase::Drift,
            phase_left: 0.0,
            spiral_radius: 0.0,
            spiral_angle: 0.0,
            core_size: FOCUS_CORE_SIZE,
            score: 0,
            multiplier: 1.0,
            combo: 0,
            best_combo: 0,
            sync: FOCUS_START_SYNC,
            flow_mode: false,
            flow_left: 0.0,
            shrink_mode: false,
            shrink_left: 0.0,
            session_elapsed: 0.0,
            running: false,
            session_ended: false,
            taps: 0,
            hits: 0,
            reaction_ms: 0.0,
            sum_reaction_secs: 0.0,
            reaction_count: 0,
            last_cue: 0.0,
            rng: GameRng::seeded(seed),
        }
    }

    /// Hit radius taps are judged against, shrunk while shrink mode runs
    pub fn effective_radius(&self) -> f32 {
        let radius = self.core_size * 0.5;
        if self.shrink_mode {
            radius * FOCUS_SHRINK_SCALE
        } else {
            radius
        }
    }

    /// Seconds remaining in the session
    pub fn time_left(&self) -> f32 {
        (FOCUS_SESSION_SECS - self.session_elapsed).max(0.0)
    }

    /// Mean measured reaction across non-miss taps, in milliseconds
    pub fn avg_reaction_ms(&self) -> Option<f64> {
        if self.reaction_count == 0 {
            return None;
        }
        Some(self.sum_reaction_secs as f64 / self.reaction_count as f64 * 1000.0)
    }
}
