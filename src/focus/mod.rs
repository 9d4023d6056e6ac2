//! Focus engine: reaction/physics arena
//!
//! A core glides around a bounded arena under escalating movement phases;
//! the player taps it for ringed accuracy scoring with combo, multiplier,
//! and sync meters. Entirely host-driven: `tick(dt)` every frame, `tap` on
//! input, and the state serializes mid-session. Flow mode entry happens
//! synchronously inside `tap`; exits and the other transitions surface as
//! [`FocusSignal`]s from `tick`.

pub mod state;
pub mod tick;

pub use state::{FocusPhase, FocusSignal, FocusState, HitQuality, TapOutcome};
pub use tick::{end, session_report, start, tap, tick};
