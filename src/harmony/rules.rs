//! Puzzle generation, move legality, and solve detection

use crate::consts::*;
use crate::ledger::{GameKind, SessionReport, xp_formula};

use super::state::{HarmonyEvent, HarmonySignal, HarmonyState, Hue, TapResult};

/// Reset to a fresh session: three colors, zero solves
pub fn start_fresh(state: &mut HarmonyState) {
    state.solve_count = 0;
    state.solved = false;
    build_puzzle(state, HARMONY_MIN_COLORS);
}

/// Advance to the next puzzle; a new color joins every two solves
pub fn next_puzzle(state: &mut HarmonyState) {
    state.solve_count += 1;
    state.solved = false;
    let colors = HARMONY_MIN_COLORS + state.solve_count as usize / 2;
    build_puzzle(state, colors.min(HARMONY_MAX_COLORS));
}

/// Build a shuffled puzzle with `colors` full tubes plus spare empties.
/// Reshuffles (bounded) until no tube starts out already sorted.
pub fn build_puzzle(state: &mut HarmonyState, colors: usize) {
    let colors = colors.clamp(HARMONY_MIN_COLORS, HARMONY_MAX_COLORS);
    state.color_count = colors;

    let mut pool: Vec<Hue> = Vec::with_capacity(colors * TUBE_CAPACITY);
    for hue in Hue::ALL.iter().take(colors) {
        for _ in 0..TUBE_CAPACITY {
            pool.push(*hue);
        }
    }

    let mut attempts = 0;
    loop {
        state.rng.shuffle(&mut pool);
        attempts += 1;
        if !is_trivial(&pool) || attempts >= HARMONY_SHUFFLE_ATTEMPTS {
            break;
        }
    }

    state.tubes = pool.chunks(TUBE_CAPACITY).map(<[Hue]>::to_vec).collect();
    let empties = if colors <= 3 { 2 } else { 3 };
    for _ in 0..empties {
        state.tubes.push(Vec::new());
    }

    state.selected = None;
    state.harmony = 0.0;
    state.shaking = None;
    state.events.invalidate();

    log::debug!(
        "Built {}-color puzzle, {} tubes, {} shuffle attempts",
        colors,
        state.tubes.len(),
        attempts
    );
}

/// Any capacity-sized slice of the shuffled pool already uniform?
fn is_trivial(pool: &[Hue]) -> bool {
    pool.chunks(TUBE_CAPACITY)
        .any(|chunk| chunk.len() == TUBE_CAPACITY && chunk.iter().all(|h| *h == chunk[0]))
}

/// Full of a single color
pub fn is_uniform(tube: &[Hue]) -> bool {
    tube.len() == TUBE_CAPACITY && tube.iter().all(|h| *h == tube[0])
}

/// Two-phase tap: select a source, then move to a target. Tapping the
/// selection again deselects. Out-of-range taps are ignored.
pub fn tap(state: &mut HarmonyState, idx: usize) -> TapResult {
    if idx >= state.tubes.len() {
        return TapResult::Ignored;
    }
    match state.selected {
        Some(from) if from == idx => {
            state.selected = None;
            TapResult::Deselected
        }
        Some(from) => {
            state.selected = None;
            if can_move(state, from, idx) {
                apply_move(state, from, idx);
                TapResult::Moved
            } else {
                trigger_shake(state, idx);
                TapResult::Rejected
            }
        }
        None => {
            if state.tubes[idx].is_empty() {
                TapResult::Ignored
            } else {
                state.selected = Some(idx);
                TapResult::Selected
            }
        }
    }
}

/// Legal iff source and target differ, the target has room, and the target
/// is empty or tops match
pub fn can_move(state: &HarmonyState, from: usize, to: usize) -> bool {
    if from == to || from >= state.tubes.len() || to >= state.tubes.len() {
        return false;
    }
    let Some(top) = state.tubes[from].last() else {
        return false;
    };
    if state.tubes[to].len() >= TUBE_CAPACITY {
        return false;
    }
    state.tubes[to].last().is_none_or(|t| t == top)
}

fn apply_move(state: &mut HarmonyState, from: usize, to: usize) {
    let Some(token) = state.tubes[from].pop() else {
        return;
    };
    state.tubes[to].push(token);
    update_harmony(state);
    check_solved(state);
}

fn update_harmony(state: &mut HarmonyState) {
    let complete = state.tubes.iter().filter(|t| is_uniform(t)).count();
    state.harmony = if state.color_count == 0 {
        0.0
    } else {
        complete as f32 / state.color_count as f32
    };
}

fn check_solved(state: &mut HarmonyState) {
    let done = state
        .tubes
        .iter()
        .filter(|t| !t.is_empty())
        .all(|t| is_uniform(t));
    if done {
        state
            .events
            .schedule_in(HARMONY_SOLVE_DELAY, HarmonyEvent::SolveSettled);
    }
}

fn trigger_shake(state: &mut HarmonyState, idx: usize) {
    state.shaking = Some(idx);
    state
        .events
        .schedule_in(HARMONY_SHAKE_SECS, HarmonyEvent::ShakeOver(idx));
}

/// Advance the shake/solve timers
pub fn tick(state: &mut HarmonyState, dt: f32) -> Vec<HarmonySignal> {
    state.events.advance(dt);
    let mut signals = Vec::new();
    while let Some(event) = state.events.pop_due() {
        match event {
            HarmonyEvent::ShakeOver(idx) => {
                if state.shaking == Some(idx) {
                    state.shaking = None;
                    signals.push(HarmonySignal::ShakeCleared);
                }
            }
            HarmonyEvent::SolveSettled => {
                if !state.solved {
                    state.solved = true;
                    signals.push(HarmonySignal::Solved);
                    log::info!(
                        "Puzzle solved: {} colors, {} total this session",
                        state.color_count,
                        state.solve_count + 1
                    );
                }
            }
        }
    }
    signals
}

/// Freeze the session into a ledger report
pub fn session_report(state: &HarmonyState, difficulty: f32, streak_bonus: u64) -> SessionReport {
    let score = state.solve_count as u64 * HARMONY_SOLVE_POINTS;
    SessionReport {
        game: GameKind::Harmony,
        score,
        xp_gained: xp_formula(score, difficulty, streak_bonus),
        combo: 0,
        reaction_ms: None,
        accuracy: None,
        flow_score: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_puzzle_shape() {
        let mut state = HarmonyState::new(42);
        assert_eq!(state.color_count, 3);
        assert_eq!(state.tubes.len(), 5); // 3 colored + 2 empty
        assert_eq!(state.token_count(), 12);
        assert_eq!(state.harmony, 0.0);
        assert!(state.selected.is_none());

        build_puzzle(&mut state, 4);
        assert_eq!(state.tubes.len(), 7); // 4 colored + 3 empty
        assert_eq!(state.token_count(), 16);
    }

    #[test]
    fn test_build_puzzle_not_trivial() {
        for colors in 3..=6 {
            for seed in 0..25 {
                let mut state = HarmonyState::new(seed);
                build_puzzle(&mut state, colors);
                for tube in &state.tubes {
                    assert!(
                        !is_uniform(tube),
                        "seed {seed} colors {colors} produced a pre-sorted tube"
                    );
                }
            }
        }
    }

    #[test]
    fn test_tap_select_deselect() {
        let mut state = HarmonyState::new(7);
        assert_eq!(tap(&mut state, 0), TapResult::Selected);
        assert_eq!(state.selected, Some(0));
        assert_eq!(tap(&mut state, 0), TapResult::Deselected);
        assert_eq!(state.selected, None);
    }

    #[test]
    fn test_tap_out_of_range_ignored() {
        let mut state = HarmonyState::new(7);
        assert_eq!(tap(&mut state, 99), TapResult::Ignored);
        assert_eq!(state.selected, None);
    }

    #[test]
    fn test_tap_empty_tube_not_selectable() {
        let mut state = HarmonyState::new(7);
        let empty = state.tubes.len() - 1;
        assert_eq!(tap(&mut state, empty), TapResult::Ignored);
    }

    #[test]
    fn test_move_into_empty_tube() {
        let mut state = HarmonyState::new(7);
        let empty = state.tubes.len() - 1;
        let before = state.token_count();
        assert_eq!(tap(&mut state, 0), TapResult::Selected);
        assert_eq!(tap(&mut state, empty), TapResult::Moved);
        assert_eq!(state.tubes[empty].len(), 1);
        assert_eq!(state.tubes[0].len(), TUBE_CAPACITY - 1);
        assert_eq!(state.token_count(), before);
        assert_eq!(state.selected, None);
    }

    #[test]
    fn test_move_legality_rules() {
        let mut state = HarmonyState::new(1);
        state.tubes = vec![
            vec![Hue::Violet, Hue::Cyan],
            vec![Hue::Amber, Hue::Cyan],
            vec![Hue::Amber; TUBE_CAPACITY],
            vec![],
        ];
        state.color_count = 3;

        assert!(!can_move(&state, 0, 0)); // same tube
        assert!(can_move(&state, 0, 1)); // tops match
        assert!(!can_move(&state, 1, 2)); // target full
        assert!(can_move(&state, 0, 3)); // empty target
        assert!(!can_move(&state, 3, 0)); // empty source
        assert!(!can_move(&state, 0, 99)); // out of range
        assert!(!can_move(&state, 2, 0)); // tops differ
    }

    #[test]
    fn test_rejected_move_shakes_then_clears() {
        let mut state = HarmonyState::new(1);
        state.tubes = vec![
            vec![Hue::Violet; TUBE_CAPACITY],
            vec![Hue::Cyan, Hue::Violet],
            vec![],
        ];
        state.color_count = 2;

        assert_eq!(tap(&mut state, 1), TapResult::Selected);
        assert_eq!(tap(&mut state, 0), TapResult::Rejected); // tube 0 full
        assert_eq!(state.shaking, Some(0));

        let signals = tick(&mut state, HARMONY_SHAKE_SECS + 0.01);
        assert_eq!(signals, vec![HarmonySignal::ShakeCleared]);
        assert_eq!(state.shaking, None);
    }

    #[test]
    fn test_harmony_counts_only_full_uniform_tubes() {
        let mut state = HarmonyState::new(1);
        state.tubes = vec![
            vec![Hue::Violet; TUBE_CAPACITY],
            vec![Hue::Cyan, Hue::Cyan, Hue::Cyan],
            vec![Hue::Cyan],
            vec![],
        ];
        state.color_count = 2;

        // Moving the last cyan up completes the second color
        assert_eq!(tap(&mut state, 2), TapResult::Selected);
        assert_eq!(tap(&mut state, 1), TapResult::Moved);
        assert!((state.harmony - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_solve_settles_after_delay() {
        let mut state = HarmonyState::new(1);
        state.tubes = vec![
            vec![Hue::Violet; TUBE_CAPACITY],
            vec![Hue::Cyan, Hue::Cyan, Hue::Cyan],
            vec![Hue::Cyan],
            vec![],
        ];
        state.color_count = 2;

        tap(&mut state, 2);
        tap(&mut state, 1);
        assert!(!state.solved);

        assert!(tick(&mut state, HARMONY_SOLVE_DELAY / 2.0).is_empty());
        let signals = tick(&mut state, HARMONY_SOLVE_DELAY);
        assert_eq!(signals, vec![HarmonySignal::Solved]);
        assert!(state.solved);
    }

    #[test]
    fn test_next_puzzle_difficulty_curve() {
        let mut state = HarmonyState::new(3);
        assert_eq!(state.color_count, 3);
        next_puzzle(&mut state); // solve_count 1
        assert_eq!(state.color_count, 3);
        next_puzzle(&mut state); // solve_count 2
        assert_eq!(state.color_count, 4);
        for _ in 0..4 {
            next_puzzle(&mut state);
        }
        assert_eq!(state.solve_count, 6);
        assert_eq!(state.color_count, 6);
        // Capped at the full palette
        for _ in 0..4 {
            next_puzzle(&mut state);
        }
        assert_eq!(state.color_count, 6);
    }

    #[test]
    fn test_next_puzzle_cancels_pending_events() {
        let mut state = HarmonyState::new(1);
        state.tubes = vec![
            vec![Hue::Violet; TUBE_CAPACITY],
            vec![Hue::Cyan, Hue::Cyan, Hue::Cyan],
            vec![Hue::Cyan],
            vec![],
        ];
        state.color_count = 2;
        tap(&mut state, 2);
        tap(&mut state, 1); // schedules SolveSettled

        next_puzzle(&mut state);
        let signals = tick(&mut state, 5.0);
        assert!(signals.is_empty());
        assert!(!state.solved);
    }

    #[test]
    fn test_session_report_scoring() {
        let mut state = HarmonyState::new(4);
        state.solve_count = 3;
        let report = session_report(&state, 0.5, 15);
        assert_eq!(report.score, 300);
        assert_eq!(report.xp_gained, 165);
        assert_eq!(report.game, GameKind::Harmony);
    }
}
