//! Progression ledger: XP, levels, daily streak, personal bests
//!
//! Engines flush exactly one [`SessionReport`] at natural session end; the
//! ledger folds it into long-lived progression state. The crate does no I/O,
//! the host serializes the ledger wherever it keeps player data.

use serde::{Deserialize, Serialize};

/// Which engine produced a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameKind {
    Focus,
    Flow,
    Harmony,
    Structure,
}

/// XP curve: cumulative thresholds, index+1 = level
pub const LEVEL_THRESHOLDS: [u64; 11] = [
    0, 100, 250, 500, 1000, 2000, 4000, 7000, 11000, 16000, 22000,
];

/// Milliseconds per day, for the calendar-day streak arithmetic
const DAY_MS: f64 = 86_400_000.0;

/// `floor(base_score × difficulty) + streak_bonus`
///
/// Pure; each engine calls this locally before flushing its report.
pub fn xp_formula(base_score: u64, difficulty: f32, streak_bonus: u64) -> u64 {
    (base_score as f64 * difficulty as f64).floor() as u64 + streak_bonus
}

/// One completed session, flushed exactly once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub game: GameKind,
    pub score: u64,
    pub xp_gained: u64,
    /// Best combo of the session (0 where the engine has no combo)
    #[serde(default)]
    pub combo: u32,
    /// Mean measured reaction time, milliseconds
    #[serde(default)]
    pub reaction_ms: Option<f64>,
    /// Hit accuracy in [0, 1]
    #[serde(default)]
    pub accuracy: Option<f32>,
    /// Rhythm session score, tracked separately for its personal best
    #[serde(default)]
    pub flow_score: Option<u64>,
}

/// Long-lived progression state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub xp: u64,
    pub level: u32,
    /// Consecutive calendar days with at least one session
    pub streak: u32,
    pub total_sessions: u32,
    pub best_combo: u32,
    /// Best accuracy as a percentage
    pub best_accuracy: f32,
    pub best_flow_score: u64,
    sum_reaction_ms: f64,
    reaction_count: u32,
    /// Day index (UTC) of the most recent session
    last_session_day: Option<i64>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            streak: 0,
            total_sessions: 0,
            best_combo: 0,
            best_accuracy: 0.0,
            best_flow_score: 0,
            sum_reaction_ms: 0.0,
            reaction_count: 0,
            last_session_day: None,
        }
    }
}

fn day_index(now_ms: f64) -> i64 {
    (now_ms / DAY_MS).floor() as i64
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed session. `now_ms` is a Unix timestamp in
    /// milliseconds; streaks count whole UTC days between sessions.
    pub fn add_session(&mut self, report: &SessionReport, now_ms: f64) {
        let today = day_index(now_ms);
        match self.last_session_day {
            Some(last) => {
                let diff = today - last;
                if diff == 1 {
                    self.streak += 1;
                } else if diff > 1 {
                    self.streak = 1;
                }
            }
            None => self.streak = 1,
        }
        self.last_session_day = Some(today);

        self.xp += report.xp_gained;
        self.total_sessions += 1;
        self.best_combo = self.best_combo.max(report.combo);
        if let Some(accuracy) = report.accuracy {
            self.best_accuracy = self.best_accuracy.max(accuracy * 100.0);
        }
        if let Some(flow_score) = report.flow_score {
            self.best_flow_score = self.best_flow_score.max(flow_score);
        }
        if let Some(ms) = report.reaction_ms {
            if ms > 0.0 {
                self.sum_reaction_ms += ms;
                self.reaction_count += 1;
            }
        }
        self.update_level();

        log::info!(
            "Session recorded: {:?} score {} (+{} xp) -> level {}, streak {}",
            report.game,
            report.score,
            report.xp_gained,
            self.level,
            self.streak
        );
    }

    /// Zero the streak if more than one day has passed since the last
    /// session. Call once when the app comes to the foreground.
    pub fn check_streak(&mut self, now_ms: f64) {
        if let Some(last) = self.last_session_day {
            if day_index(now_ms) - last > 1 {
                self.streak = 0;
            }
        }
    }

    fn update_level(&mut self) {
        for (i, threshold) in LEVEL_THRESHOLDS.iter().enumerate() {
            if self.xp >= *threshold {
                self.level = i as u32 + 1;
            }
        }
    }

    /// Mean recorded reaction time in milliseconds, 0 before any sample
    pub fn avg_reaction_ms(&self) -> f64 {
        if self.reaction_count > 0 {
            self.sum_reaction_ms / self.reaction_count as f64
        } else {
            0.0
        }
    }

    /// Progress through the current level, [0, 1]
    pub fn level_progress(&self) -> f64 {
        let last = LEVEL_THRESHOLDS.len() - 1;
        let cur = LEVEL_THRESHOLDS[(self.level as usize - 1).min(last)];
        let next = LEVEL_THRESHOLDS[(self.level as usize).min(last)];
        if next <= cur {
            return 1.0;
        }
        (self.xp.saturating_sub(cur) as f64 / (next - cur) as f64).clamp(0.0, 1.0)
    }

    /// XP remaining until the next threshold, 0 at the cap
    pub fn xp_to_next_level(&self) -> u64 {
        let last = LEVEL_THRESHOLDS.len() - 1;
        let next = LEVEL_THRESHOLDS[(self.level as usize).min(last)];
        next.saturating_sub(self.xp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(xp: u64) -> SessionReport {
        SessionReport {
            game: GameKind::Focus,
            score: xp,
            xp_gained: xp,
            combo: 0,
            reaction_ms: None,
            accuracy: None,
            flow_score: None,
        }
    }

    #[test]
    fn test_xp_formula_truncates() {
        assert_eq!(xp_formula(100, 1.2, 15), 135);
        assert_eq!(xp_formula(99, 0.5, 0), 49);
        assert_eq!(xp_formula(0, 1.0, 7), 7);
    }

    #[test]
    fn test_first_session_starts_streak() {
        let mut ledger = Ledger::new();
        ledger.add_session(&report(10), 0.0);
        assert_eq!(ledger.streak, 1);
        assert_eq!(ledger.total_sessions, 1);
    }

    #[test]
    fn test_streak_increments_on_consecutive_days() {
        let mut ledger = Ledger::new();
        ledger.add_session(&report(10), 0.0);
        ledger.add_session(&report(10), DAY_MS);
        ledger.add_session(&report(10), 2.0 * DAY_MS);
        assert_eq!(ledger.streak, 3);
    }

    #[test]
    fn test_streak_unchanged_same_day() {
        let mut ledger = Ledger::new();
        ledger.add_session(&report(10), 0.0);
        ledger.add_session(&report(10), 1000.0);
        assert_eq!(ledger.streak, 1);
    }

    #[test]
    fn test_streak_resets_after_gap() {
        let mut ledger = Ledger::new();
        ledger.add_session(&report(10), 0.0);
        ledger.add_session(&report(10), DAY_MS);
        ledger.add_session(&report(10), 5.0 * DAY_MS);
        assert_eq!(ledger.streak, 1);
    }

    #[test]
    fn test_check_streak_zeroes_after_gap() {
        let mut ledger = Ledger::new();
        ledger.add_session(&report(10), 0.0);
        ledger.check_streak(3.0 * DAY_MS);
        assert_eq!(ledger.streak, 0);
        // One day later is still intact
        let mut ledger = Ledger::new();
        ledger.add_session(&report(10), 0.0);
        ledger.check_streak(DAY_MS);
        assert_eq!(ledger.streak, 1);
    }

    #[test]
    fn test_level_thresholds() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.level, 1);
        ledger.add_session(&report(100), 0.0);
        assert_eq!(ledger.level, 2);
        ledger.add_session(&report(150), 0.0);
        assert_eq!(ledger.level, 3);
        ledger.add_session(&report(30000), 0.0);
        assert_eq!(ledger.level, 11);
    }

    #[test]
    fn test_bests_are_monotone() {
        let mut ledger = Ledger::new();
        let mut r = report(5);
        r.combo = 8;
        r.accuracy = Some(0.75);
        r.flow_score = Some(300);
        ledger.add_session(&r, 0.0);

        let mut weaker = report(5);
        weaker.combo = 3;
        weaker.accuracy = Some(0.40);
        weaker.flow_score = Some(120);
        ledger.add_session(&weaker, 0.0);

        assert_eq!(ledger.best_combo, 8);
        assert!((ledger.best_accuracy - 75.0).abs() < 1e-5);
        assert_eq!(ledger.best_flow_score, 300);
    }

    #[test]
    fn test_reaction_average() {
        let mut ledger = Ledger::new();
        let mut r = report(1);
        r.reaction_ms = Some(400.0);
        ledger.add_session(&r, 0.0);
        r.reaction_ms = Some(200.0);
        ledger.add_session(&r, 0.0);
        r.reaction_ms = Some(0.0); // ignored
        ledger.add_session(&r, 0.0);
        assert!((ledger.avg_reaction_ms() - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_level_progress_bounds() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.level_progress(), 0.0);
        ledger.add_session(&report(50), 0.0);
        let p = ledger.level_progress();
        assert!(p > 0.0 && p < 1.0);
        ledger.add_session(&report(100_000), 0.0);
        assert_eq!(ledger.level_progress(), 1.0);
        assert_eq!(ledger.xp_to_next_level(), 0);
    }
}
