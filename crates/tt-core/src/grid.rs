use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TtError, TtResult};

/// An integer grid cell. One cell is one 5-foot square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    /// Column, growing east.
    pub x: i32,
    /// Row, growing south.
    pub y: i32,
}

impl GridPosition {
    /// Create a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position shifted by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Chebyshev distance in squares.
    pub fn chebyshev(self, other: Self) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    /// Euclidean distance in squares.
    pub fn euclidean(self, other: Self) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Whether `other` is one of the eight surrounding cells.
    pub fn is_adjacent(self, other: Self) -> bool {
        self.chebyshev(other) == 1
    }

    /// The eight surrounding cells, orthogonal neighbours first.
    pub fn neighbors(self) -> [GridPosition; 8] {
        [
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(0, 1),
            self.offset(-1, 0),
            self.offset(1, -1),
            self.offset(1, 1),
            self.offset(-1, 1),
            self.offset(-1, -1),
        ]
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Parses `"X,Y"`, with optional parentheses and whitespace.
impl FromStr for GridPosition {
    type Err = TtError;

    fn from_str(s: &str) -> TtResult<Self> {
        let inner = s
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')');
        let (x, y) = inner
            .split_once(',')
            .ok_or_else(|| TtError::InvalidPosition(s.to_string()))?;
        let x = x
            .trim()
            .parse()
            .map_err(|_| TtError::InvalidPosition(s.to_string()))?;
        let y = y
            .trim()
            .parse()
            .map_err(|_| TtError::InvalidPosition(s.to_string()))?;
        Ok(Self::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency() {
        let origin = GridPosition::new(3, 3);
        assert!(origin.is_adjacent(GridPosition::new(4, 4)));
        assert!(origin.is_adjacent(GridPosition::new(3, 2)));
        assert!(!origin.is_adjacent(origin));
        assert!(!origin.is_adjacent(GridPosition::new(5, 3)));
        assert!(origin.neighbors().iter().all(|n| origin.is_adjacent(*n)));
    }

    #[test]
    fn distances() {
        let a = GridPosition::new(0, 0);
        let b = GridPosition::new(3, 4);
        assert_eq!(a.chebyshev(b), 4);
        assert!((a.euclidean(b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_positions() {
        assert_eq!("2,3".parse::<GridPosition>().unwrap(), GridPosition::new(2, 3));
        assert_eq!(
            "( -1 , 4 )".parse::<GridPosition>().unwrap(),
            GridPosition::new(-1, 4)
        );
        assert!("2;3".parse::<GridPosition>().is_err());
        assert!("a,b".parse::<GridPosition>().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(GridPosition::new(5, -2).to_string(), "(5, -2)");
    }
}
