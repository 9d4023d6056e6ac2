//! Piece shapes and rotation

use serde::{Deserialize, Serialize};

/// Block palette tag; rendering maps these to actual colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    Amber,
    Gold,
    Bronze,
    Ochre,
}

impl Tint {
    pub const ALL: [Tint; 4] = [Tint::Amber, Tint::Gold, Tint::Bronze, Tint::Ochre];
}

/// Shape category the generator weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeClass {
    /// 1×1, 1×2
    Tiny,
    /// 1×3, 2×2
    Small,
    /// 1×4, 2×3
    Medium,
    /// L and its mirror
    Ell,
    /// T
    Tee,
    /// S and Z
    Zigzag,
}

impl ShapeClass {
    pub const ALL: [ShapeClass; 6] = [
        ShapeClass::Tiny,
        ShapeClass::Small,
        ShapeClass::Medium,
        ShapeClass::Ell,
        ShapeClass::Tee,
        ShapeClass::Zigzag,
    ];
}

/// Shape templates per class; `#` marks filled cells
pub fn templates(class: ShapeClass) -> &'static [&'static [&'static str]] {
    match class {
        ShapeClass::Tiny => &[&["#"], &["##"]],
        ShapeClass::Small => &[&["###"], &["##", "##"]],
        ShapeClass::Medium => &[&["####"], &["###", "###"]],
        ShapeClass::Ell => &[&["#.", "#.", "##"], &[".#", ".#", "##"]],
        ShapeClass::Tee => &[&[".#.", "###"]],
        ShapeClass::Zigzag => &[&[".##", "##."], &["##.", ".##"]],
    }
}

/// A placeable piece: boolean occupancy matrix plus its palette tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Piece {
    /// Row-major occupancy, tight bounding box
    pub cells: Vec<Vec<bool>>,
    pub tint: Tint,
    pub class: ShapeClass,
}

impl Piece {
    pub fn new(cells: Vec<Vec<bool>>, tint: Tint, class: ShapeClass) -> Self {
        Self { cells, tint, class }
    }

    /// Build from a `#`/`.` template
    pub fn from_template(rows: &[&str], tint: Tint, class: ShapeClass) -> Self {
        let cells = rows
            .iter()
            .map(|row| row.chars().map(|ch| ch == '#').collect())
            .collect();
        Self::new(cells, tint, class)
    }

    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Rotate 90° clockwise (transpose-reflect)
    pub fn rotate(&mut self) {
        if self.cells.is_empty() {
            return;
        }
        let rows = self.height();
        let cols = self.width();
        let mut rot = vec![vec![false; rows]; cols];
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &filled) in row.iter().enumerate() {
                rot[c][rows - 1 - r] = filled;
            }
        }
        self.cells = rot;
    }

    /// Filled-cell coordinates as (row, col) offsets
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(c, _)| (r, c))
        })
    }

    pub fn cell_count(&self) -> usize {
        self.filled().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ell() -> Piece {
        Piece::from_template(&["#.", "#.", "##"], Tint::Amber, ShapeClass::Ell)
    }

    #[test]
    fn test_from_template_dimensions() {
        let p = ell();
        assert_eq!(p.width(), 2);
        assert_eq!(p.height(), 3);
        assert_eq!(p.cell_count(), 4);
    }

    #[test]
    fn test_rotate_clockwise() {
        let mut p = ell();
        p.rotate();
        // L on its back: 2 rows × 3 cols
        assert_eq!(p.height(), 2);
        assert_eq!(p.width(), 3);
        assert_eq!(
            p.cells,
            vec![vec![true, true, true], vec![true, false, false]]
        );
    }

    #[test]
    fn test_four_rotations_identity() {
        for class in ShapeClass::ALL {
            for rows in templates(class) {
                let original = Piece::from_template(rows, Tint::Gold, class);
                let mut p = original.clone();
                for _ in 0..4 {
                    p.rotate();
                }
                assert_eq!(p.cells, original.cells, "{class:?} {rows:?}");
            }
        }
    }

    #[test]
    fn test_rotation_preserves_cell_count() {
        for class in ShapeClass::ALL {
            for rows in templates(class) {
                let mut p = Piece::from_template(rows, Tint::Gold, class);
                let count = p.cell_count();
                p.rotate();
                assert_eq!(p.cell_count(), count);
            }
        }
    }

    #[test]
    fn test_templates_are_tight() {
        // Every template row has uniform width and at least one filled cell
        // per boundary row/column
        for class in ShapeClass::ALL {
            for rows in templates(class) {
                let p = Piece::from_template(rows, Tint::Gold, class);
                assert!(p.cells.iter().all(|r| r.len() == p.width()));
                assert!(p.cells.first().is_some_and(|r| r.contains(&true)));
                assert!(p.cells.last().is_some_and(|r| r.contains(&true)));
                assert!(p.cells.iter().any(|r| r[0]));
                assert!(p.cells.iter().any(|r| r[p.width() - 1]));
            }
        }
    }
}
