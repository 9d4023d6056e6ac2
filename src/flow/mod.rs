//! Flow engine: rhythm-memory pattern sequencer
//!
//! A grid of tiles plays a harmonious traversal pattern; the player echoes
//! it back one tile per beat. Tempo, pattern length, and the sync meter
//! all adapt to performance. The state lives in [`FlowState`] and every
//! rule is a free function over it, so a host can drive sessions headless
//! and serialize them mid-cycle.

pub mod pattern;
pub mod state;
pub mod tick;

pub use pattern::{PatternStyle, harmonious};
pub use state::{FlowEvent, FlowSignal, FlowState, RhythmPhase, TapJudgement};
pub use tick::{session_report, start, stop, tap_tile, tick};
