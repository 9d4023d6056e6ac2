//! Scripted demo session: one pass through all four engines
//!
//! Drives each engine with deterministic input at 60 fps, flushes every
//! session report into a fresh ledger, and prints the resulting
//! progression state as JSON. `RUST_LOG=debug` surfaces the per-signal
//! engine logs.

use glam::Vec2;

use zen_arcade::consts::{FLOW_GRID_SIZE, GRID_COLS, GRID_ROWS, TRAY_SIZE};
use zen_arcade::harmony::Hue;
use zen_arcade::mood::{Mood, StressCheck};
use zen_arcade::{GameRng, Ledger, SessionReport, flow, focus, harmony, structure};

const DEMO_SEED: u64 = 0xC0FFEE;
const FRAME: f32 = 1.0 / 60.0;
/// Fixed wall-clock stamp for the ledger day arithmetic (2025-06-01T12:00Z)
const NOW_MS: f64 = 1_748_779_200_000.0;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let mut rng = GameRng::seeded(DEMO_SEED);
    let mut check = StressCheck::new(1, &mut rng);
    check.answer(false);
    check.answer(true);
    let mood = Mood::Okayish;
    let difficulty = mood.difficulty();
    log::info!(
        "Check-in: {} (stress {:?}), difficulty {difficulty:.2}",
        mood.info().label,
        check.stress_level()
    );

    let mut ledger = Ledger::new();
    for report in [
        run_focus(DEMO_SEED),
        run_flow(difficulty),
        run_harmony(DEMO_SEED + 1, difficulty),
        run_structure(DEMO_SEED + 2, difficulty),
    ] {
        log::info!(
            "{:?} session: score {}, xp {}",
            report.game,
            report.score,
            report.xp_gained
        );
        ledger.add_session(&report, NOW_MS);
    }

    match serde_json::to_string_pretty(&ledger) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Ledger serialization failed: {err}"),
    }
}

/// Thirty seconds of reaction play. Taps land dead centre twice a second,
/// with every third tap pulled 16 px wide so ring quality varies.
fn run_focus(seed: u64) -> SessionReport {
    let mut state = focus::FocusState::new(seed);
    focus::start(&mut state, Vec2::new(390.0, 690.0));
    let mut frame = 0u32;
    while state.running {
        for signal in focus::tick(&mut state, FRAME) {
            log::debug!("focus: {signal:?}");
        }
        frame += 1;
        if frame % 30 == 0 {
            let wobble = if frame % 90 == 0 { 16.0 } else { 0.0 };
            let point = state.position + Vec2::new(wobble, 0.0);
            let outcome = focus::tap(&mut state, point);
            log::debug!("focus tap: {outcome:?}");
        }
    }
    focus::session_report(&state)
}

/// Echo the pattern perfectly until three cycles land. The sync pulse
/// exposes the expected tile, so tapping whatever lights is a clean run.
fn run_flow(difficulty: f32) -> SessionReport {
    let mut state = flow::FlowState::new(FLOW_GRID_SIZE);
    flow::start(&mut state, difficulty);
    let mut cycles = 0u32;
    let mut frame = 0u32;
    while cycles < 3 && frame < 7200 {
        frame += 1;
        for signal in flow::tick(&mut state, FRAME) {
            log::debug!("flow: {signal:?}");
            if signal == flow::FlowSignal::CycleCompleted {
                cycles += 1;
            }
        }
        if state.phase == flow::RhythmPhase::Syncing {
            if let Some(tile) = state.active_tile {
                let judgement = flow::tap_tile(&mut state, tile);
                log::debug!("flow tap {tile}: {judgement:?}");
            }
        }
    }
    flow::stop(&mut state);
    flow::session_report(&state)
}

/// Sort tubes with a greedy bot until two puzzles settle or time runs out.
fn run_harmony(seed: u64, difficulty: f32) -> SessionReport {
    let mut state = harmony::HarmonyState::new(seed);
    let mut last = None;
    let mut frame = 0u32;
    while state.solve_count < 2 && frame < 9000 {
        frame += 1;
        for signal in harmony::tick(&mut state, FRAME) {
            log::debug!("harmony: {signal:?}");
            if signal == harmony::HarmonySignal::Solved {
                harmony::next_puzzle(&mut state);
                last = None;
            }
        }
        if frame % 20 == 0 {
            if let Some((from, to)) = harmony_move(&state, last) {
                let select = harmony::tap(&mut state, from);
                let result = harmony::tap(&mut state, to);
                log::debug!("harmony pour {from}->{to}: {select:?}/{result:?}");
                last = Some((from, to));
            }
        }
    }
    harmony::session_report(&state, difficulty, 10)
}

/// Pick the next pour: consolidate matching tops onto the taller stack,
/// otherwise excavate onto an empty tube. Finished tubes are never touched,
/// and the previous pour is never undone outright.
fn harmony_move(
    state: &harmony::HarmonyState,
    last: Option<(usize, usize)>,
) -> Option<(usize, usize)> {
    let top_run = |tube: &[Hue]| match tube.last() {
        Some(&top) => tube.iter().rev().take_while(|&&h| h == top).count(),
        None => 0,
    };
    let mut best: Option<((usize, usize), i32)> = None;
    for from in 0..state.tubes.len() {
        let tube = &state.tubes[from];
        if tube.is_empty() || harmony::is_uniform(tube) {
            continue;
        }
        let single_color = tube.iter().all(|&h| h == tube[0]);
        for to in 0..state.tubes.len() {
            if !harmony::can_move(state, from, to) || last == Some((to, from)) {
                continue;
            }
            let score = if state.tubes[to].is_empty() {
                if single_color {
                    // Shuffling an already-sorted tube sideways gains nothing
                    continue;
                }
                top_run(tube) as i32
            } else {
                10 + top_run(&state.tubes[to]) as i32
            };
            if best.is_none_or(|(_, s)| score > s) {
                best = Some(((from, to), score));
            }
        }
    }
    best.map(|(mv, _)| mv)
}

/// Drop pieces first-fit from the top-left until the zen meter fills or
/// the board locks up.
fn run_structure(seed: u64, difficulty: f32) -> SessionReport {
    let mut state = structure::StructureState::new(seed);
    structure::start(&mut state, difficulty);
    let mut frame = 0u32;
    while state.running && frame < 6000 {
        frame += 1;
        for signal in structure::tick(&mut state, FRAME) {
            log::debug!("structure: {signal:?}");
        }
        if state.ending || state.grid.has_clearing() {
            continue;
        }
        match first_fit(&state) {
            Some((idx, row, col)) => {
                let outcome = structure::try_place(&mut state, idx, row, col);
                log::debug!("structure drop {idx} at ({row},{col}): {outcome:?}");
            }
            // A rotation may open a spot the upright scan missed
            None => structure::rotate_piece(&mut state, frame as usize % TRAY_SIZE),
        }
    }
    structure::session_report(&state, 5)
}

fn first_fit(state: &structure::StructureState) -> Option<(usize, usize, usize)> {
    for (idx, piece) in state.tray.iter().enumerate() {
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                if state.grid.can_place(piece, row, col) {
                    return Some((idx, row, col));
                }
            }
        }
    }
    None
}
