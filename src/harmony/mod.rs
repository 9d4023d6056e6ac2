//! Liquid-sort puzzle engine
//!
//! Tubes hold up to four colored tokens. The player moves top tokens
//! between tubes until every non-empty tube is full of one color. Puzzles
//! are generated with a non-triviality guarantee and grow by one color
//! every two solves.

pub mod rules;
pub mod state;

pub use rules::{
    build_puzzle, can_move, is_uniform, next_puzzle, session_report, start_fresh, tap, tick,
};
pub use state::{HarmonySignal, HarmonyState, Hue, TapResult};
