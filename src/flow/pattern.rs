//! Deterministic tile sequences for the rhythm grid
//!
//! Patterns are traversals of the square grid, not random picks, so each
//! cycle reads as a coherent sweep. Tiles are indexed row-major.

use serde::{Deserialize, Serialize};

/// Traversal shape for one cycle; cycles rotate through all of them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternStyle {
    /// Row-major sweep, top-left to bottom-right
    Wave,
    /// Row-major sweep reversed
    ReverseWave,
    /// Column-major sweep
    VerticalWave,
    /// Anti-diagonals, shortest first
    Diagonal,
    /// Clockwise boundary walk collapsing inward
    Spiral,
    /// Center tile, then expanding rings
    CenterOut,
}

impl PatternStyle {
    pub const ALL: [PatternStyle; 6] = [
        PatternStyle::Wave,
        PatternStyle::ReverseWave,
        PatternStyle::VerticalWave,
        PatternStyle::Diagonal,
        PatternStyle::Spiral,
        PatternStyle::CenterOut,
    ];

    /// Style used for the given completed-cycle count
    pub fn for_cycle(cycle: u32) -> Self {
        Self::ALL[cycle as usize % Self::ALL.len()]
    }
}

/// Build the tile sequence for one cycle, truncated to `length`
pub fn harmonious(size: usize, style: PatternStyle, length: usize) -> Vec<usize> {
    let n = size * size;
    let mut base = match style {
        PatternStyle::Wave => (0..n).collect(),
        PatternStyle::ReverseWave => (0..n).rev().collect(),
        PatternStyle::VerticalWave => {
            let mut order = Vec::with_capacity(n);
            for col in 0..size {
                for row in 0..size {
                    order.push(row * size + col);
                }
            }
            order
        }
        PatternStyle::Diagonal => {
            let mut order = Vec::with_capacity(n);
            for d in 0..(2 * size).saturating_sub(1) {
                for row in 0..size {
                    if d >= row && d - row < size {
                        order.push(row * size + (d - row));
                    }
                }
            }
            order
        }
        PatternStyle::Spiral => spiral_order(size),
        PatternStyle::CenterOut => center_out(size),
    };
    base.truncate(length);
    base
}

/// Clockwise walk of the outermost unvisited boundary, repeated inward
fn spiral_order(size: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(size * size);
    if size == 0 {
        return order;
    }
    let (mut top, mut bottom) = (0, size - 1);
    let (mut left, mut right) = (0, size - 1);
    loop {
        for c in left..=right {
            order.push(top * size + c);
        }
        if top == bottom {
            break;
        }
        top += 1;
        for r in top..=bottom {
            order.push(r * size + right);
        }
        if left == right {
            break;
        }
        right -= 1;
        for c in (left..=right).rev() {
            order.push(bottom * size + c);
        }
        if top == bottom {
            break;
        }
        bottom -= 1;
        for r in (top..=bottom).rev() {
            order.push(r * size + left);
        }
        if left == right {
            break;
        }
        left += 1;
    }
    order
}

/// Center tile first, then square rings of increasing Chebyshev radius.
/// Within a ring the top/bottom edges interleave with the left/right ones.
fn center_out(size: usize) -> Vec<usize> {
    let n = size * size;
    let mut order = Vec::with_capacity(n);
    if size == 0 {
        return order;
    }
    let center = n / 2;
    let cr = (center / size) as isize;
    let cc = (center % size) as isize;
    order.push(center);

    let mut ring: isize = 1;
    while order.len() < n {
        for d in [-ring, ring] {
            for offset in -ring..=ring {
                for (r, c) in [(cr + d, cc + offset), (cr + offset, cc + d)] {
                    if r >= 0 && r < size as isize && c >= 0 && c < size as isize {
                        let idx = (r * size as isize + c) as usize;
                        if !order.contains(&idx) {
                            order.push(idx);
                        }
                    }
                }
            }
        }
        ring += 1;
    }
    order
}
