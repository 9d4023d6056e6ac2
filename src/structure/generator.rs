//! Adaptive weighted piece generation
//!
//! Class weights start from a difficulty-biased base and adapt to the
//! session: a crowded grid or repeated rejected drops pull hard toward the
//! small shapes, a long clean streak pushes the awkward ones back in.

use crate::consts::*;
use crate::rng::GameRng;

use super::piece::{Piece, ShapeClass, Tint, templates};

/// Base weights in `ShapeClass::ALL` order (Tiny, Small, Medium, Ell, Tee,
/// Zigzag)
const BASE_WEIGHTS: [f32; 6] = [22.0, 26.0, 16.0, 14.0, 10.0, 12.0];

/// Compute the current class weights
pub fn class_weights(
    density: f32,
    invalid_attempts: u32,
    clean_streak: u32,
    difficulty: f32,
) -> [f32; 6] {
    let mut w = BASE_WEIGHTS;
    let difficulty = crate::clamp01(difficulty);

    // Higher difficulty leans toward the bigger, awkward shapes
    w[0] *= 1.2 - 0.5 * difficulty;
    w[2] *= 0.7 + 0.6 * difficulty;
    w[5] *= 0.8 + 0.5 * difficulty;

    if density > DENSITY_HEAVY {
        w[0] *= 3.0;
        w[1] *= 2.0;
        w[2] *= 0.2;
        w[5] *= 0.2;
    } else if density > DENSITY_MILD {
        w[0] *= 1.6;
        w[1] *= 1.3;
    }

    if invalid_attempts > INVALID_ATTEMPT_LIMIT {
        w[0] *= 2.0;
        w[1] *= 2.0;
        w[2] *= 0.5;
        w[3] *= 0.5;
        w[4] *= 0.5;
        w[5] *= 0.5;
    }

    if clean_streak > CLEAN_STREAK_BOOST {
        w[2] *= 1.5;
        w[3] *= 1.5;
        w[4] *= 1.5;
    }

    w
}

/// Draw one piece: cumulative-weight class pick, then a uniform template
/// and tint
pub fn next_piece(
    rng: &mut GameRng,
    density: f32,
    invalid_attempts: u32,
    clean_streak: u32,
    difficulty: f32,
) -> Piece {
    let weights = class_weights(density, invalid_attempts, clean_streak, difficulty);
    let class = ShapeClass::ALL[rng.weighted_pick(&weights)];
    let shapes = templates(class);
    let rows = shapes[rng.range_usize(shapes.len())];
    let tint = *rng.pick(&Tint::ALL).unwrap_or(&Tint::Amber);
    Piece::from_template(rows, tint, class)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw_classes(density: f32, invalid: u32, streak: u32, difficulty: f32) -> [u32; 6] {
        let mut rng = GameRng::seeded(2024);
        let mut counts = [0u32; 6];
        for _ in 0..2000 {
            let piece = next_piece(&mut rng, density, invalid, streak, difficulty);
            let idx = ShapeClass::ALL
                .iter()
                .position(|c| *c == piece.class)
                .unwrap();
            counts[idx] += 1;
        }
        counts
    }

    #[test]
    fn test_heavy_density_suppresses_big_shapes() {
        let crowded = draw_classes(0.8, 0, 0, 0.5);
        let open = draw_classes(0.0, 0, 0, 0.5);
        // Tiny+Small dominate on a crowded board
        let small_share = (crowded[0] + crowded[1]) as f32 / 2000.0;
        assert!(small_share > 0.75, "small share {small_share}");
        assert!(crowded[2] < open[2]);
        assert!(crowded[5] < open[5]);
    }

    #[test]
    fn test_invalid_attempts_favor_small() {
        let w = class_weights(0.0, INVALID_ATTEMPT_LIMIT + 1, 0, 0.5);
        let base = class_weights(0.0, 0, 0, 0.5);
        assert!(w[0] > base[0]);
        assert!(w[1] > base[1]);
        assert!(w[3] < base[3]);
    }

    #[test]
    fn test_clean_streak_boosts_interesting_shapes() {
        let w = class_weights(0.0, 0, CLEAN_STREAK_BOOST + 1, 0.5);
        let base = class_weights(0.0, 0, 0, 0.5);
        assert!(w[2] > base[2]);
        assert!(w[3] > base[3]);
        assert!(w[4] > base[4]);
        assert_eq!(w[0], base[0]);
    }

    #[test]
    fn test_difficulty_shifts_distribution() {
        let easy = class_weights(0.0, 0, 0, 0.0);
        let hard = class_weights(0.0, 0, 0, 1.0);
        assert!(easy[0] > hard[0]); // more tiny pieces when easy
        assert!(hard[2] > easy[2]); // more medium pieces when hard
    }

    #[test]
    fn test_all_weights_positive() {
        for density in [0.0, 0.55, 0.9] {
            for invalid in [0, 10] {
                for streak in [0, 10] {
                    let w = class_weights(density, invalid, streak, 0.5);
                    assert!(w.iter().all(|x| *x > 0.0), "{w:?}");
                }
            }
        }
    }

    #[test]
    fn test_deterministic_draws() {
        let mut a = GameRng::seeded(5);
        let mut b = GameRng::seeded(5);
        for _ in 0..50 {
            let pa = next_piece(&mut a, 0.3, 1, 2, 0.5);
            let pb = next_piece(&mut b, 0.3, 1, 2, 0.5);
            assert_eq!(pa.cells, pb.cells);
            assert_eq!(pa.tint, pb.tint);
        }
    }
}
