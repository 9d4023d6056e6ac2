//! Mood check-in metadata and the daily stress record
//!
//! The day's mood selection drives a single difficulty scalar fed into
//! engine `start` calls. Mood metadata is a static table, pure data with no
//! dispatch. The stress record backs the widget companion's three-step
//! check-in; the crate only models its state, never renders it.

use serde::{Deserialize, Serialize};

use crate::ledger::GameKind;
use crate::rng::GameRng;

/// Daily mood selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Energized,
    Okayish,
    Low,
    Overwhelmed,
}

/// Static per-mood metadata
#[derive(Debug, Clone, Copy)]
pub struct MoodInfo {
    pub label: &'static str,
    pub suggested: GameKind,
    /// Difficulty scalar in [0, 1] passed to engine starts
    pub difficulty: f32,
}

const MOOD_TABLE: [MoodInfo; 4] = [
    MoodInfo {
        label: "Energized",
        suggested: GameKind::Flow,
        difficulty: 0.85,
    },
    MoodInfo {
        label: "Okay-ish",
        suggested: GameKind::Focus,
        difficulty: 0.55,
    },
    MoodInfo {
        label: "Low",
        suggested: GameKind::Structure,
        difficulty: 0.30,
    },
    MoodInfo {
        label: "Overwhelmed",
        suggested: GameKind::Harmony,
        difficulty: 0.15,
    },
];

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Energized, Mood::Okayish, Mood::Low, Mood::Overwhelmed];

    pub fn info(self) -> &'static MoodInfo {
        &MOOD_TABLE[self as usize]
    }

    pub fn difficulty(self) -> f32 {
        self.info().difficulty
    }
}

/// Size of the stress question bank the widget samples from
pub const STRESS_QUESTION_COUNT: usize = 5;

/// Stress bands derived from the check-in answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StressLevel {
    Stable,
    Moderate,
    High,
}

/// Widget check-in stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckinStage {
    FirstQuestion,
    SecondQuestion,
    Outcome,
}

/// `mood_score` is the widget's coarse scale (0 calm, 1 okay, 2 stressed);
/// each "yes" answer adds one.
pub fn stress_level(mood_score: u8, yes_count: u8) -> StressLevel {
    match mood_score + yes_count {
        0 | 1 => StressLevel::Stable,
        2 => StressLevel::Moderate,
        _ => StressLevel::High,
    }
}

/// One day's mood/stress record, shared with the widget companion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressCheck {
    /// 0 calm, 1 okay, 2 stressed
    pub mood_score: u8,
    pub yes_count: u8,
    /// Two distinct indices into the question bank
    pub question_indices: [usize; 2],
    pub answered: u8,
}

impl StressCheck {
    /// Start a record with two randomly sampled questions
    pub fn new(mood_score: u8, rng: &mut GameRng) -> Self {
        let mut indices: Vec<usize> = (0..STRESS_QUESTION_COUNT).collect();
        rng.shuffle(&mut indices);
        Self {
            mood_score: mood_score.min(2),
            yes_count: 0,
            question_indices: [indices[0], indices[1]],
            answered: 0,
        }
    }

    /// Record one answer; extra answers past the second are ignored
    pub fn answer(&mut self, yes: bool) {
        if self.answered >= 2 {
            return;
        }
        self.answered += 1;
        if yes {
            self.yes_count += 1;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.answered >= 2
    }

    pub fn stage(&self) -> CheckinStage {
        match self.answered {
            0 => CheckinStage::FirstQuestion,
            1 => CheckinStage::SecondQuestion,
            _ => CheckinStage::Outcome,
        }
    }

    pub fn stress_level(&self) -> StressLevel {
        stress_level(self.mood_score, self.yes_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_ordering_matches_energy() {
        assert!(Mood::Energized.difficulty() > Mood::Okayish.difficulty());
        assert!(Mood::Okayish.difficulty() > Mood::Low.difficulty());
        assert!(Mood::Low.difficulty() > Mood::Overwhelmed.difficulty());
        for mood in Mood::ALL {
            let d = mood.difficulty();
            assert!((0.0..=1.0).contains(&d));
        }
    }

    #[test]
    fn test_stress_level_bands() {
        assert_eq!(stress_level(0, 0), StressLevel::Stable);
        assert_eq!(stress_level(0, 1), StressLevel::Stable);
        assert_eq!(stress_level(1, 1), StressLevel::Moderate);
        assert_eq!(stress_level(2, 0), StressLevel::Moderate);
        assert_eq!(stress_level(2, 1), StressLevel::High);
        assert_eq!(stress_level(2, 2), StressLevel::High);
    }

    #[test]
    fn test_check_stage_progression() {
        let mut rng = GameRng::seeded(1);
        let mut check = StressCheck::new(1, &mut rng);
        assert_eq!(check.stage(), CheckinStage::FirstQuestion);
        check.answer(true);
        assert_eq!(check.stage(), CheckinStage::SecondQuestion);
        check.answer(false);
        assert_eq!(check.stage(), CheckinStage::Outcome);
        assert!(check.is_complete());
        // Extra answers are ignored
        check.answer(true);
        assert_eq!(check.yes_count, 1);
        assert_eq!(check.stress_level(), StressLevel::Moderate);
    }

    #[test]
    fn test_questions_are_distinct() {
        for seed in 0..20 {
            let mut rng = GameRng::seeded(seed);
            let check = StressCheck::new(0, &mut rng);
            assert_ne!(check.question_indices[0], check.question_indices[1]);
            assert!(check.question_indices.iter().all(|&i| i < STRESS_QUESTION_COUNT));
        }
    }
}
