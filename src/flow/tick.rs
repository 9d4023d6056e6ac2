//! Watch/echo cycle logic for the rhythm grid
//!
//! A cycle plays the pattern back one tile per beat, then opens a sync
//! phase where the player echoes it under a per-tile deadline. Correct
//! taps tighten the tempo and fill the sync meter; misses relax the tempo
//! and eventually shorten the pattern. A full meter triggers a short
//! whole-grid flowing phase and a longer pattern.

use crate::consts::*;
use crate::ledger::{GameKind, SessionReport, xp_formula};

use super::pattern::{PatternStyle, harmonious};
use super::state::{FlowEvent, FlowSignal, FlowState, RhythmPhase, TapJudgement};

/// Reset and begin a session; difficulty sets pattern length and tempo
pub fn start(state: &mut FlowState, difficulty: f32) {
    let difficulty = crate::clamp01(difficulty);
    state.events.invalidate();
    state.window_token += 1;
    state.flow_sync = 0.0;
    state.cycle_count = 0;
    state.streak = 0;
    state.best_streak = 0;
    state.miss_count = 0;
    state.score = 0;
    state.glow_all = false;
    let max_len = state.tile_count() - 1;
    state.pattern_length = (2 + (difficulty * 2.0) as usize).clamp(2, max_len);
    state.beat = FLOW_BASE_BEAT - difficulty * FLOW_BEAT_DIFFICULTY_SCALE;
    build_and_watch(state);
    log::info!(
        "Flow session started, difficulty {:.2}, beat {:.2}s, {} tiles",
        difficulty,
        state.beat,
        state.pattern_length
    );
}

/// Cancel everything pending and go idle
pub fn stop(state: &mut FlowState) {
    state.events.invalidate();
    state.window_token += 1;
    state.phase = RhythmPhase::Idle;
    state.active_tile = None;
    state.glow_all = false;
}

/// Advance the clock and run every event that came due
pub fn tick(state: &mut FlowState, dt: f32) -> Vec<FlowSignal> {
    let mut signals = Vec::new();
    if state.phase == RhythmPhase::Idle {
        return signals;
    }
    state.events.advance(dt);
    while let Some(event) = state.events.pop_due() {
        match event {
            FlowEvent::TileOn(idx) => state.active_tile = Some(idx),
            FlowEvent::TileOff => state.active_tile = None,
            FlowEvent::BeginSync => begin_sync(state, &mut signals),
            FlowEvent::PulseNext => pulse_next(state, &mut signals),
            FlowEvent::MissWindow(token) => {
                if token == state.window_token && state.phase == RhythmPhase::Syncing {
                    handle_miss(state);
                    signals.push(FlowSignal::Missed);
                }
            }
            FlowEvent::ClearMarks => state.correct_tiles.clear(),
            FlowEvent::Restart => {
                build_and_watch(state);
                signals.push(FlowSignal::WatchStarted);
            }
            FlowEvent::ExitFlowing => {
                state.glow_all = false;
                build_and_watch(state);
                signals.push(FlowSignal::FlowEnded);
                signals.push(FlowSignal::WatchStarted);
            }
        }
    }
    signals
}

/// Judge a tap against the awaited pattern element
pub fn tap_tile(state: &mut FlowState, index: usize) -> TapJudgement {
    if state.phase != RhythmPhase::Syncing || index >= state.tile_count() {
        return TapJudgement::Ignored;
    }
    // The pending miss window is retired either way
    state.window_token += 1;
    let expected = state.pattern.get(state.sync_index).copied();
    if Some(index) == expected {
        state.streak += 1;
        state.best_streak = state.best_streak.max(state.streak);
        state.miss_count = 0;
        if !state.correct_tiles.contains(&index) {
            state.correct_tiles.push(index);
        }
        state.active_tile = None;
        let gain =
            FLOW_SYNC_GAIN + (state.streak as f32 * FLOW_SYNC_STREAK_RATE).min(FLOW_SYNC_STREAK_CAP);
        state.flow_sync = (state.flow_sync + gain).min(1.0);
        state.score += FLOW_TAP_POINTS + state.streak as u64;
        adapt_tempo(state, true);
        state.sync_index += 1;
        state
            .events
            .schedule_in(state.beat * FLOW_NEXT_PULSE_FRACTION, FlowEvent::PulseNext);
        TapJudgement::Correct
    } else {
        handle_miss(state);
        TapJudgement::Miss
    }
}

fn build_and_watch(state: &mut FlowState) {
    let style = PatternStyle::for_cycle(state.cycle_count);
    state.pattern = harmonious(state.grid_size, style, state.pattern_length);
    state.active_tile = None;
    state.correct_tiles.clear();
    state.phase = RhythmPhase::Watching;
    for (i, &idx) in state.pattern.iter().enumerate() {
        let on = i as f32 * state.beat;
        state.events.schedule_in(on, FlowEvent::TileOn(idx));
        state
            .events
            .schedule_in(on + state.beat * FLOW_TILE_ON_FRACTION, FlowEvent::TileOff);
    }
    let done = state.pattern.len() as f32 * state.beat + FLOW_WATCH_LEAD;
    state.events.schedule_in(done, FlowEvent::BeginSync);
    log::debug!("Watching {:?}, {} tiles at {:.2}s", style, state.pattern.len(), state.beat);
}

fn begin_sync(state: &mut FlowState, signals: &mut Vec<FlowSignal>) {
    state.phase = RhythmPhase::Syncing;
    state.sync_index = 0;
    state.correct_tiles.clear();
    signals.push(FlowSignal::SyncStarted);
    pulse_next(state, signals);
}

fn pulse_next(state: &mut FlowState, signals: &mut Vec<FlowSignal>) {
    if state.phase != RhythmPhase::Syncing {
        return;
    }
    if state.sync_index >= state.pattern.len() {
        complete_cycle(state, signals);
        return;
    }
    state.active_tile = Some(state.pattern[state.sync_index]);
    state.window_token += 1;
    state.events.schedule_in(
        state.beat + FLOW_INPUT_GRACE,
        FlowEvent::MissWindow(state.window_token),
    );
}

fn handle_miss(state: &mut FlowState) {
    state.streak = 0;
    state.miss_count += 1;
    state.active_tile = None;
    state.flow_sync = (state.flow_sync - FLOW_SYNC_LOSS).max(0.0);
    adapt_tempo(state, false);
    if state.miss_count >= FLOW_MISS_LIMIT {
        state.pattern_length = (state.pattern_length - 1).max(2);
        state.miss_count = 0;
    }
    state.events.schedule_in(FLOW_MISS_CLEAR_DELAY, FlowEvent::ClearMarks);
    state.events.schedule_in(FLOW_MISS_RESTART_DELAY, FlowEvent::Restart);
}

fn complete_cycle(state: &mut FlowState, signals: &mut Vec<FlowSignal>) {
    state.window_token += 1;
    state.cycle_count += 1;
    state.flow_sync = (state.flow_sync + FLOW_CYCLE_BONUS).min(1.0);
    state.score += FLOW_CYCLE_POINTS;
    adapt_tempo(state, true);
    signals.push(FlowSignal::CycleCompleted);
    log::debug!(
        "Cycle {} complete, sync {:.2}, beat {:.2}s",
        state.cycle_count,
        state.flow_sync,
        state.beat
    );
    if state.flow_sync >= 1.0 {
        trigger_flow(state);
        signals.push(FlowSignal::FlowEntered);
    } else {
        state.events.schedule_in(FLOW_NEXT_CYCLE_DELAY, FlowEvent::Restart);
    }
}

fn trigger_flow(state: &mut FlowState) {
    state.phase = RhythmPhase::Flowing;
    state.glow_all = true;
    state.pattern_length = (state.pattern_length + 1).min(state.tile_count() - 1);
    state.flow_sync = FLOW_FLOWING_EXIT_SYNC;
    state.events.schedule_in(FLOW_FLOWING_SECS, FlowEvent::ExitFlowing);
    log::debug!("Perfect flow, pattern grows to {}", state.pattern_length);
}

fn adapt_tempo(state: &mut FlowState, better: bool) {
    state.beat = if better {
        (state.beat - FLOW_TEMPO_GAIN).max(FLOW_TEMPO_MIN)
    } else {
        (state.beat + FLOW_TEMPO_LOSS).min(FLOW_TEMPO_MAX)
    };
}

/// Freeze the session into a ledger report
pub fn session_report(state: &FlowState) -> SessionReport {
    SessionReport {
        game: GameKind::Flow,
        score: state.score,
        xp_gained: xp_formula(state.score, FLOW_XP_RATE, FLOW_XP_STREAK_BONUS),
        combo: state.best_streak,
        reaction_ms: None,
        accuracy: None,
        flow_score: Some(state.score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synced(difficulty: f32) -> (FlowState, Vec<FlowSignal>) {
        let mut state = FlowState::new(FLOW_GRID_SIZE);
        start(&mut state, difficulty);
        let watch = state.pattern.len() as f32 * state.beat + FLOW_WATCH_LEAD;
        let signals = tick(&mut state, watch + 0.05);
        (state, signals)
    }

    #[test]
    fn test_start_scales_with_difficulty() {
        let mut state = FlowState::new(3);
        start(&mut state, 0.0);
        assert_eq!(state.pattern_length, 2);
        assert!((state.beat - FLOW_BASE_BEAT).abs() < 1e-6);
        assert_eq!(state.phase, RhythmPhase::Watching);

        start(&mut state, 1.0);
        assert_eq!(state.pattern_length, 4);
        assert!((state.beat - 0.65).abs() < 1e-6);
    }

    #[test]
    fn test_pattern_length_capped_by_grid() {
        let mut state = FlowState::new(2);
        start(&mut state, 1.0);
        assert_eq!(state.pattern_length, 3);
    }

    #[test]
    fn test_watch_lights_tiles_in_pattern_order() {
        let mut state = FlowState::new(3);
        start(&mut state, 0.0);
        assert_eq!(state.pattern, vec![0, 1]);

        let signals = tick(&mut state, 0.01);
        assert!(signals.is_empty());
        assert_eq!(state.active_tile, Some(0));

        // Off after 0.65 of a beat, next tile on at the full beat
        tick(&mut state, 0.75);
        assert_eq!(state.active_tile, None);
        tick(&mut state, 0.40);
        assert_eq!(state.active_tile, Some(1));
    }

    #[test]
    fn test_taps_ignored_while_watching() {
        let mut state = FlowState::new(3);
        start(&mut state, 0.0);
        assert_eq!(tap_tile(&mut state, 0), TapJudgement::Ignored);
        assert_eq!(state.streak, 0);
    }

    #[test]
    fn test_sync_opens_after_watch() {
        let (state, signals) = synced(0.0);
        assert!(signals.contains(&FlowSignal::SyncStarted));
        assert_eq!(state.phase, RhythmPhase::Syncing);
        // First element pulsed and awaiting its tap
        assert_eq!(state.active_tile, Some(state.pattern[0]));
    }

    #[test]
    fn test_correct_echo_completes_cycle() {
        let (mut state, _) = synced(0.0);
        let pattern = state.pattern.clone();
        assert_eq!(pattern.len(), 2);

        assert_eq!(tap_tile(&mut state, pattern[0]), TapJudgement::Correct);
        assert_eq!(state.streak, 1);
        assert!((state.flow_sync - 0.128).abs() < 1e-4);
        assert!((state.beat - 1.08).abs() < 1e-4);
        assert_eq!(state.score, 11);

        tick(&mut state, 0.25);
        assert_eq!(state.active_tile, Some(pattern[1]));
        assert_eq!(tap_tile(&mut state, pattern[1]), TapJudgement::Correct);
        assert_eq!(state.score, 23);

        let signals = tick(&mut state, 0.25);
        assert!(signals.contains(&FlowSignal::CycleCompleted));
        assert_eq!(state.cycle_count, 1);
        assert!((state.flow_sync - 0.444).abs() < 1e-4);
        assert_eq!(state.score, 73);

        // Next cycle rotates to the reverse wave
        let signals = tick(&mut state, FLOW_NEXT_CYCLE_DELAY + 0.05);
        assert!(signals.contains(&FlowSignal::WatchStarted));
        assert_eq!(state.phase, RhythmPhase::Watching);
        assert_eq!(state.pattern, vec![8, 7]);
    }

    #[test]
    fn test_timeout_registers_miss() {
        let (mut state, _) = synced(0.0);
        let wait = state.beat + FLOW_INPUT_GRACE + 0.05;
        let signals = tick(&mut state, wait);
        assert!(signals.contains(&FlowSignal::Missed));
        assert_eq!(state.miss_count, 1);
        assert_eq!(state.streak, 0);
        assert_eq!(state.flow_sync, 0.0);
        assert!((state.beat - (FLOW_BASE_BEAT + FLOW_TEMPO_LOSS)).abs() < 1e-4);

        // Recovery replays the same cycle style
        let signals = tick(&mut state, FLOW_MISS_RESTART_DELAY + 0.05);
        assert!(signals.contains(&FlowSignal::WatchStarted));
        assert_eq!(state.phase, RhythmPhase::Watching);
        assert_eq!(state.cycle_count, 0);
    }

    #[test]
    fn test_wrong_tile_is_a_miss() {
        let (mut state, _) = synced(0.0);
        let wrong = (state.pattern[0] + 1) % state.tile_count();
        assert_eq!(tap_tile(&mut state, wrong), TapJudgement::Miss);
        assert_eq!(state.miss_count, 1);
        assert_eq!(state.active_tile, None);
    }

    #[test]
    fn test_correct_tap_retires_miss_window() {
        let (mut state, _) = synced(0.0);
        let tile = state.pattern[0];
        assert_eq!(tap_tile(&mut state, tile), TapJudgement::Correct);
        // Run well past the original deadline: no miss may fire
        let signals = tick(&mut state, 5.0);
        assert!(!signals.contains(&FlowSignal::Missed));
        assert_eq!(state.miss_count, 0);
    }

    #[test]
    fn test_third_miss_shortens_pattern() {
        let (mut state, _) = synced(1.0);
        assert_eq!(state.pattern_length, 4);
        state.miss_count = 2;
        let wrong = (state.pattern[0] + 1) % state.tile_count();
        assert_eq!(tap_tile(&mut state, wrong), TapJudgement::Miss);
        assert_eq!(state.pattern_length, 3);
        assert_eq!(state.miss_count, 0);
    }

    #[test]
    fn test_pattern_never_shrinks_below_two() {
        let (mut state, _) = synced(0.0);
        assert_eq!(state.pattern_length, 2);
        state.miss_count = 2;
        let wrong = (state.pattern[0] + 1) % state.tile_count();
        tap_tile(&mut state, wrong);
        assert_eq!(state.pattern_length, 2);
    }

    #[test]
    fn test_full_meter_enters_flowing() {
        let (mut state, _) = synced(0.0);
        state.flow_sync = 0.9;
        let pattern = state.pattern.clone();
        tap_tile(&mut state, pattern[0]);
        tick(&mut state, 0.25);
        tap_tile(&mut state, pattern[1]);
        let signals = tick(&mut state, 0.25);
        assert!(signals.contains(&FlowSignal::FlowEntered));
        assert_eq!(state.phase, RhythmPhase::Flowing);
        assert!(state.glow_all);
        assert_eq!(state.pattern_length, 3);
        assert!((state.flow_sync - FLOW_FLOWING_EXIT_SYNC).abs() < 1e-6);

        let signals = tick(&mut state, FLOW_FLOWING_SECS + 0.05);
        assert!(signals.contains(&FlowSignal::FlowEnded));
        assert!(!state.glow_all);
        assert_eq!(state.phase, RhythmPhase::Watching);
        assert_eq!(state.pattern.len(), 3);
    }

    #[test]
    fn test_stop_cancels_pending_events() {
        let mut state = FlowState::new(3);
        start(&mut state, 0.0);
        stop(&mut state);
        assert_eq!(state.phase, RhythmPhase::Idle);
        let signals = tick(&mut state, 10.0);
        assert!(signals.is_empty());
        assert_eq!(state.active_tile, None);
    }

    #[test]
    fn test_off_grid_tap_ignored() {
        let (mut state, _) = synced(0.0);
        assert_eq!(tap_tile(&mut state, 99), TapJudgement::Ignored);
        assert_eq!(state.miss_count, 0);
    }

    #[test]
    fn test_session_report_carries_flow_score() {
        let (mut state, _) = synced(0.0);
        state.score = 100;
        state.best_streak = 7;
        let report = session_report(&state);
        assert_eq!(report.game, GameKind::Flow);
        assert_eq!(report.score, 100);
        assert_eq!(report.flow_score, Some(100));
        assert_eq!(report.combo, 7);
        // floor(100 × 1.2) + 15
        assert_eq!(report.xp_gained, 135);
    }
}
