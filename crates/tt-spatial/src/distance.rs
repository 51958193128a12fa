use std::fmt;

use serde::{Deserialize, Serialize};
use tt_core::GridPosition;

/// Feet covered by one grid square.
pub const FEET_PER_SQUARE: u32 = 5;

/// Distance between two cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Distance {
    /// Chebyshev distance in squares.
    pub squares: u32,
    /// Distance in feet under the alternating diagonal rule.
    pub feet: u32,
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ft ({} squares)", self.feet, self.squares)
    }
}

/// Distance between two cells.
///
/// Squares are counted Chebyshev-style. Feet use the 5-10-5 rule: every
/// second diagonal step costs 10 ft instead of 5.
pub fn calculate_distance(from: GridPosition, to: GridPosition) -> Distance {
    let dx = (to.x - from.x).unsigned_abs();
    let dy = (to.y - from.y).unsigned_abs();
    let diagonals = dx.min(dy);
    let straights = dx.abs_diff(dy);
    let feet = (diagonals / 2) * 15 + (diagonals % 2) * FEET_PER_SQUARE + straights * FEET_PER_SQUARE;
    Distance {
        squares: dx.max(dy),
        feet,
    }
}

/// The eight compass directions. North is toward row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All directions clockwise from north.
    pub const ALL: [Direction; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// One-step `(dx, dy)` offset.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
        }
    }

    /// Whether this is a diagonal direction.
    pub fn is_diagonal(self) -> bool {
        let (dx, dy) = self.delta();
        dx != 0 && dy != 0
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::North => "N",
            Self::NorthEast => "NE",
            Self::East => "E",
            Self::SouthEast => "SE",
            Self::South => "S",
            Self::SouthWest => "SW",
            Self::West => "W",
            Self::NorthWest => "NW",
        };
        write!(f, "{s}")
    }
}

/// Compass direction from one cell toward another, from the signs of the
/// offset. `None` when the cells are the same.
pub fn direction(from: GridPosition, to: GridPosition) -> Option<Direction> {
    let dx = (to.x - from.x).signum();
    let dy = (to.y - from.y).signum();
    Direction::ALL
        .iter()
        .copied()
        .find(|d| d.delta() == (dx, dy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feet(ax: i32, ay: i32, bx: i32, by: i32) -> u32 {
        calculate_distance(GridPosition::new(ax, ay), GridPosition::new(bx, by)).feet
    }

    #[test]
    fn alternating_diagonals() {
        assert_eq!(feet(0, 0, 1, 1), 5);
        assert_eq!(feet(0, 0, 2, 2), 15);
        assert_eq!(feet(0, 0, 3, 3), 20);
        assert_eq!(feet(0, 0, 4, 4), 30);
        assert_eq!(feet(0, 0, 5, 3), 30);
        assert_eq!(feet(0, 0, 5, 0), 25);
        assert_eq!(feet(2, 2, 2, 2), 0);
    }

    #[test]
    fn squares_are_chebyshev() {
        let d = calculate_distance(GridPosition::new(0, 0), GridPosition::new(5, 3));
        assert_eq!(d.squares, 5);
        assert_eq!(d.to_string(), "30 ft (5 squares)");
    }

    #[test]
    fn compass_directions() {
        let o = GridPosition::new(5, 5);
        assert_eq!(direction(o, GridPosition::new(5, 0)), Some(Direction::North));
        assert_eq!(direction(o, GridPosition::new(9, 1)), Some(Direction::NorthEast));
        assert_eq!(direction(o, GridPosition::new(6, 5)), Some(Direction::East));
        assert_eq!(direction(o, GridPosition::new(0, 8)), Some(Direction::SouthWest));
        assert_eq!(direction(o, o), None);
        assert!(Direction::SouthEast.is_diagonal());
        assert!(!Direction::West.is_diagonal());
    }

    proptest! {
        #[test]
        fn distance_is_symmetric_and_bounded(
            ax in -50i32..50, ay in -50i32..50, bx in -50i32..50, by in -50i32..50
        ) {
            let a = GridPosition::new(ax, ay);
            let b = GridPosition::new(bx, by);
            let d = calculate_distance(a, b);
            prop_assert_eq!(d, calculate_distance(b, a));
            prop_assert!(d.feet >= d.squares * FEET_PER_SQUARE);
            prop_assert!(d.feet <= d.squares * 2 * FEET_PER_SQUARE);
            prop_assert_eq!(d.feet % FEET_PER_SQUARE, 0);
        }
    }
}
