//! Block placement engine
//!
//! A 10×10 grid, a three-slot piece tray, and a zen meter. Pieces come from
//! a weighted shape pool that adapts to the board: a crowded grid or a run
//! of rejected drops steers toward small shapes, a clean streak earns the
//! interesting ones. Full rows and columns clear (no gravity) and fill the
//! meter; the session ends when the meter fills or nothing in the tray
//! fits.

pub mod generator;
pub mod grid;
pub mod piece;
pub mod state;
pub mod tick;

pub use generator::{class_weights, next_piece};
pub use grid::{Cell, CompletedLines, Grid};
pub use piece::{Piece, ShapeClass, Tint, templates};
pub use state::{PlaceOutcome, StructureSignal, StructureState};
pub use tick::{
    clean_placement_percent, has_any_move, rotate_piece, session_report, start, tick, try_place,
};
