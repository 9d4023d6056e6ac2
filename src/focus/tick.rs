//! Arena simulation: core movement, tap judgment, and session flow
//!
//! The host drives `tick` at its frame rate with real delta times and
//! forwards taps as arena-space points. Everything else (phase rollovers,
//! shrink windows, flow mode, the 30 second session clock) is internal
//! countdown state, so a fixed seed and a fixed tick sequence replay the
//! exact same session.

use glam::Vec2;
use std::f32::consts::TAU;

use crate::consts::*;
use crate::ledger::{GameKind, SessionReport, xp_formula};

use super::state::{FocusPhase, FocusSignal, FocusState, HitQuality, TapOutcome};

/// Reset and begin a 30 second session inside `bounds`
pub fn start(state: &mut FocusState, bounds: Vec2) {
    state.bounds = bounds;
    state.position = Vec2::new(bounds.x * 0.5, bounds.y * 0.3);
    let angle = state.rng.range_f32(0.0, TAU);
    state.velocity = crate::polar_to_cartesian(FOCUS_BASE_SPEED, angle);
    state.phase = FocusPhase::Drift;
    state.phase_left = state.rng.range_f32(FOCUS_PHASE_MIN_SECS, FOCUS_PHASE_MAX_SECS);
    state.core_size = FOCUS_CORE_SIZE;
    state.score = 0;
    state.multiplier = 1.0;
    state.combo = 0;
    state.best_combo = 0;
    state.sync = FOCUS_START_SYNC;
    state.flow_mode = false;
    state.flow_left = 0.0;
    state.shrink_mode = false;
    state.shrink_left = 0.0;
    state.session_elapsed = 0.0;
    state.session_ended = false;
    state.taps = 0;
    state.hits = 0;
    state.reaction_ms = 0.0;
    state.sum_reaction_secs = 0.0;
    state.reaction_count = 0;
    state.last_cue = 0.0;
    state.running = true;
    log::info!("Focus session started in {}x{}", bounds.x, bounds.y);
}

/// Advance timers and integrate movement for one frame
pub fn tick(state: &mut FocusState, dt: f32) -> Vec<FocusSignal> {
    let mut signals = Vec::new();
    if !state.running || dt <= 0.0 {
        return signals;
    }
    // Nothing moves until the host reports a real layout
    if state.bounds.x <= 0.0 || state.bounds.y <= 0.0 {
        return signals;
    }

    state.session_elapsed += dt;
    if state.session_elapsed >= FOCUS_SESSION_SECS {
        state.session_elapsed = FOCUS_SESSION_SECS;
        state.running = false;
        state.session_ended = true;
        signals.push(FocusSignal::SessionEnded);
        log::info!(
            "Focus session over: score {}, best combo {}, accuracy {:.0}%",
            state.score,
            state.best_combo,
            state.hits as f32 / state.taps.max(1) as f32 * 100.0
        );
        return signals;
    }

    state.phase_left -= dt;
    if state.phase_left <= 0.0 {
        switch_phase(state, &mut signals);
    }

    if state.shrink_mode {
        state.shrink_left -= dt;
        if state.shrink_left <= 0.0 {
            state.shrink_mode = false;
            signals.push(FocusSignal::ShrinkEnded);
        }
    }
    if state.flow_mode {
        state.flow_left -= dt;
        if state.flow_left <= 0.0 {
            state.flow_mode = false;
            state.sync = FOCUS_FLOW_EXIT_SYNC;
            signals.push(FocusSignal::FlowEnded);
        }
    }

    integrate(state, dt);
    signals
}

/// Judge a tap at `point` against the core's accuracy rings
pub fn tap(state: &mut FocusState, point: Vec2) -> TapOutcome {
    if !state.running {
        return TapOutcome::Ignored;
    }
    state.taps += 1;
    let distance = state.position.distance(point);
    let radius = state.effective_radius();

    let quality = if distance < radius * FOCUS_RING_PERFECT {
        HitQuality::Perfect
    } else if distance < radius * FOCUS_RING_GOOD {
        HitQuality::Good
    } else if distance < radius {
        HitQuality::Weak
    } else {
        state.combo = 0;
        state.multiplier = (state.multiplier - FOCUS_MULT_MISS_LOSS).max(1.0);
        state.sync = (state.sync - FOCUS_SYNC_MISS).max(0.0);
        return TapOutcome::Miss;
    };

    state.hits += 1;
    let reaction = state.session_elapsed - state.last_cue;
    state.reaction_ms = reaction * 1000.0;
    state.sum_reaction_secs += reaction;
    state.reaction_count += 1;

    let points = match quality {
        HitQuality::Perfect => {
            state.combo += 1;
            state.best_combo = state.best_combo.max(state.combo);
            state.multiplier = (state.multiplier + FOCUS_MULT_PERFECT_GAIN).min(FOCUS_MULT_MAX);
            state.sync = (state.sync + FOCUS_SYNC_PERFECT).min(1.0);
            scaled_points(state, FOCUS_POINTS_PERFECT)
        }
        HitQuality::Good => {
            state.combo += 1;
            state.best_combo = state.best_combo.max(state.combo);
            state.multiplier = (state.multiplier + FOCUS_MULT_GOOD_GAIN).min(FOCUS_MULT_MAX);
            state.sync = (state.sync + FOCUS_SYNC_GOOD).min(1.0);
            scaled_points(state, FOCUS_POINTS_GOOD)
        }
        HitQuality::Weak => {
            // Flat award: no combo, no multiplier movement
            state.sync = (state.sync + FOCUS_SYNC_WEAK).min(1.0);
            FOCUS_POINTS_WEAK
        }
    };
    state.score += points;

    if state.sync >= 1.0 && !state.flow_mode {
        state.flow_mode = true;
        state.flow_left = FOCUS_FLOW_SECS;
        log::debug!("Flow mode entered at {:.1}s", state.session_elapsed);
    }

    TapOutcome::Hit { quality, points }
}

/// Stop early and freeze the session for its report
pub fn end(state: &mut FocusState) {
    if state.session_ended {
        return;
    }
    state.running = false;
    state.session_ended = true;
}

fn switch_phase(state: &mut FocusState, signals: &mut Vec<FocusSignal>) {
    let mut unlocked = vec![FocusPhase::Drift];
    if state.session_elapsed >= FOCUS_BURST_UNLOCK_SECS {
        unlocked.push(FocusPhase::Burst);
    }
    if state.session_elapsed >= FOCUS_SPIRAL_UNLOCK_SECS {
        unlocked.push(FocusPhase::Spiral);
    }
    if state.session_elapsed >= FOCUS_EVASIVE_UNLOCK_SECS {
        unlocked.push(FocusPhase::Evasive);
    }
    let candidates: Vec<FocusPhase> =
        unlocked.into_iter().filter(|p| *p != state.phase).collect();
    if let Some(next) = state.rng.pick(&candidates) {
        state.phase = *next;
    }

    let speed = FOCUS_BASE_SPEED + FOCUS_SPEED_GROWTH * state.session_elapsed;
    let angle = state.rng.range_f32(0.0, TAU);
    state.velocity = crate::polar_to_cartesian(speed, angle);
    state.phase_left = state.rng.range_f32(FOCUS_PHASE_MIN_SECS, FOCUS_PHASE_MAX_SECS);
    if state.phase == FocusPhase::Spiral {
        enter_spiral(state);
    }
    state.last_cue = state.session_elapsed;
    signals.push(FocusSignal::PhaseSwitched(state.phase));
    log::debug!(
        "Phase {:?} for {:.1}s at speed {:.0}",
        state.phase,
        state.phase_left,
        speed
    );

    if !state.shrink_mode && state.rng.chance(FOCUS_SHRINK_CHANCE) {
        state.shrink_mode = true;
        state.shrink_left = FOCUS_SHRINK_SECS;
        state.velocity *= FOCUS_SHRINK_SPEED_SCALE;
        state.last_cue = state.session_elapsed;
        signals.push(FocusSignal::ShrinkStarted);
    }
}

/// Capture orbit parameters from wherever the core currently is
fn enter_spiral(state: &mut FocusState) {
    let center = state.bounds * 0.5;
    let (radius, angle) = crate::cartesian_to_polar(state.position - center);
    let max_radius = (state.bounds.min_element() * 0.5 - FOCUS_WALL_MARGIN).max(FOCUS_WALL_MARGIN);
    state.spiral_radius = radius.clamp(FOCUS_WALL_MARGIN, max_radius);
    state.spiral_angle = angle;
}

fn integrate(state: &mut FocusState, dt: f32) {
    match state.phase {
        FocusPhase::Spiral => {
            // Constant tangential speed around the arena center
            let omega = state.velocity.length() / state.spiral_radius.max(1.0);
            state.spiral_angle += omega * dt;
            let center = state.bounds * 0.5;
            state.position =
                center + crate::polar_to_cartesian(state.spiral_radius, state.spiral_angle);
            return;
        }
        FocusPhase::Drift => state.position += state.velocity * dt,
        FocusPhase::Burst => state.position += state.velocity * FOCUS_BURST_SCALE * dt,
        FocusPhase::Evasive => {
            let jitter = Vec2::new(
                state.rng.range_f32(-FOCUS_EVASIVE_JITTER, FOCUS_EVASIVE_JITTER),
                state.rng.range_f32(-FOCUS_EVASIVE_JITTER, FOCUS_EVASIVE_JITTER),
            );
            state.position += (state.velocity + jitter) * dt;
        }
    }
    bounce_walls(state);
}

/// Reflect and clamp at the arena margin with slight energy loss
fn bounce_walls(state: &mut FocusState) {
    let min = FOCUS_WALL_MARGIN;
    let max = state.bounds - Vec2::splat(FOCUS_WALL_MARGIN);
    if state.position.x < min {
        state.position.x = min;
        state.velocity.x = state.velocity.x.abs() * FOCUS_WALL_RESTITUTION;
    } else if state.position.x > max.x {
        state.position.x = max.x;
        state.velocity.x = -state.velocity.x.abs() * FOCUS_WALL_RESTITUTION;
    }
    if state.position.y < min {
        state.position.y = min;
        state.velocity.y = state.velocity.y.abs() * FOCUS_WALL_RESTITUTION;
    } else if state.position.y > max.y {
        state.position.y = max.y;
        state.velocity.y = -state.velocity.y.abs() * FOCUS_WALL_RESTITUTION;
    }
}

/// `floor(base × multiplier)`, doubled while shrink mode and again while
/// flow mode are active
fn scaled_points(state: &FocusState, base: u64) -> u64 {
    let mut points = (base as f64 * state.multiplier as f64).floor() as u64;
    if state.shrink_mode {
        points *= 2;
    }
    if state.flow_mode {
        points *= 2;
    }
    points
}

/// Freeze the session into a ledger report
pub fn session_report(state: &FocusState) -> SessionReport {
    let accuracy = if state.taps > 0 {
        Some(state.hits as f32 / state.taps as f32)
    } else {
        None
    };
    SessionReport {
        game: GameKind::Focus,
        score: state.score,
        xp_gained: xp_formula(state.score, state.multiplier, FOCUS_XP_STREAK_BONUS),
        combo: state.best_combo,
        reaction_ms: state.avg_reaction_ms(),
        accuracy,
        flow_score: None,
    }
}
