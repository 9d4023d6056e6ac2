//! Placement, line clears, and session flow

use crate::consts::*;
use crate::ledger::{GameKind, SessionReport, xp_formula};

use super::generator::next_piece;
use super::state::{PlaceOutcome, StructureEvent, StructureSignal, StructureState};

/// Reset and begin a session at the given difficulty
pub fn start(state: &mut StructureState, difficulty: f32) {
    state.grid = super::grid::Grid::new();
    state.tray.clear();
    state.zen = 0.0;
    state.score = 0;
    state.lines_cleared = 0;
    state.clean_streak = 0;
    state.invalid_attempts = 0;
    state.placements = 0;
    state.attempts = 0;
    state.session_elapsed = 0.0;
    state.session_ended = false;
    state.ending = false;
    state.difficulty = crate::clamp01(difficulty);
    state.events.reset();
    refill_tray(state);
    state.running = true;
    log::info!("Structure session started, difficulty {:.2}", state.difficulty);
}

/// Rotate a tray piece 90° clockwise; out-of-range indices are ignored
pub fn rotate_piece(state: &mut StructureState, idx: usize) {
    if state.running && !state.ending {
        if let Some(piece) = state.tray.get_mut(idx) {
            piece.rotate();
        }
    }
}

/// Attempt to drop tray piece `piece_idx` with its top-left at (row, col)
pub fn try_place(
    state: &mut StructureState,
    piece_idx: usize,
    row: usize,
    col: usize,
) -> PlaceOutcome {
    if !state.running || state.ending || state.session_ended {
        return PlaceOutcome::Ignored;
    }
    if piece_idx >= state.tray.len() {
        return PlaceOutcome::Ignored;
    }

    state.attempts += 1;
    if !state.grid.can_place(&state.tray[piece_idx], row, col) {
        state.invalid_attempts += 1;
        state.clean_streak = 0;
        return PlaceOutcome::Rejected;
    }

    let piece = state.tray.remove(piece_idx);
    state.grid.place(&piece, row, col);
    state.placements += 1;
    state.invalid_attempts = 0;
    state.clean_streak += 1;

    let lines = state.grid.completed_lines();
    let cleared = lines.total() as u32;
    if cleared > 0 {
        state.grid.begin_clear(&lines);
        state
            .events
            .schedule_in(CLEAR_SECS, StructureEvent::ClearSettled);
        state.lines_cleared += cleared;
        state.score += cleared as u64 * STRUCTURE_LINE_POINTS;

        let mut gain = ZEN_PER_LINE * cleared as f32;
        if state.clean_streak > 2 {
            gain += ZEN_STREAK_RATE * state.clean_streak.min(ZEN_STREAK_CAP) as f32;
        }
        state.zen = (state.zen + gain).min(1.0);
        log::debug!(
            "Cleared {} line(s), zen {:.2}, streak {}",
            cleared,
            state.zen,
            state.clean_streak
        );
    }

    if state.tray.is_empty() {
        refill_tray(state);
    }
    check_session_over(state);

    PlaceOutcome::Placed { lines: cleared }
}

/// Advance clear animations and the end-of-session delay
pub fn tick(state: &mut StructureState, dt: f32) -> Vec<StructureSignal> {
    let mut signals = Vec::new();
    if !state.running {
        return signals;
    }
    state.session_elapsed += dt;
    state.events.advance(dt);
    while let Some(event) = state.events.pop_due() {
        match event {
            StructureEvent::ClearSettled => {
                state.grid.finish_clear();
                signals.push(StructureSignal::ClearFinished);
                check_session_over(state);
            }
            StructureEvent::SessionOver => {
                state.session_ended = true;
                state.running = false;
                state.ending = false;
                signals.push(StructureSignal::SessionEnded);
                log::info!(
                    "Structure session over: {} lines, zen {:.2}, {:.0}s",
                    state.lines_cleared,
                    state.zen,
                    state.session_elapsed
                );
            }
        }
    }
    signals
}

/// True if any tray piece fits anywhere in any of its four rotations
pub fn has_any_move(state: &StructureState) -> bool {
    for piece in &state.tray {
        let mut candidate = piece.clone();
        for _ in 0..4 {
            let (h, w) = (candidate.height(), candidate.width());
            if let (Some(max_r), Some(max_c)) =
                (GRID_ROWS.checked_sub(h), GRID_COLS.checked_sub(w))
            {
                for r in 0..=max_r {
                    for c in 0..=max_c {
                        if state.grid.can_place(&candidate, r, c) {
                            return true;
                        }
                    }
                }
            }
            candidate.rotate();
        }
    }
    false
}

/// Fraction of placement attempts that landed, as a percentage
pub fn clean_placement_percent(state: &StructureState) -> f32 {
    if state.attempts == 0 {
        return 0.0;
    }
    state.placements as f32 / state.attempts as f32 * 100.0
}

fn refill_tray(state: &mut StructureState) {
    let density = state.grid.density();
    while state.tray.len() < TRAY_SIZE {
        let piece = next_piece(
            &mut state.rng,
            density,
            state.invalid_attempts,
            state.clean_streak,
            state.difficulty,
        );
        state.tray.push(piece);
    }
}

fn check_session_over(state: &mut StructureState) {
    if state.ending || state.session_ended {
        return;
    }
    let meter_full = state.zen >= 1.0;
    // While a clear is pending the board is about to open up, so only the
    // full meter ends the session immediately
    let stuck = !state.grid.has_clearing() && !has_any_move(state);
    if meter_full || stuck {
        state.ending = true;
        state
            .events
            .schedule_in(STRUCTURE_END_DELAY, StructureEvent::SessionOver);
    }
}

/// Freeze the session into a ledger report
pub fn session_report(state: &StructureState, streak_bonus: u64) -> SessionReport {
    let accuracy = if state.attempts > 0 {
        Some(state.placements as f32 / state.attempts as f32)
    } else {
        None
    };
    SessionReport {
        game: GameKind::Structure,
        score: state.score,
        xp_gained: state.lines_cleared as u64 * STRUCTURE_LINE_XP
            + xp_formula(state.score, state.difficulty, streak_bonus),
        combo: state.clean_streak,
        reaction_ms: None,
        accuracy,
        flow_score: None,
    }
}
