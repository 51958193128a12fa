use serde::{Deserialize, Serialize};
use tt_core::GridPosition;

use crate::distance::{Direction, FEET_PER_SQUARE};
use crate::map::GameMap;

/// Template shape of an area effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AoeShape {
    /// Radius around the origin.
    Circle,
    /// Spreads from the origin along a direction.
    Cone,
    /// Straight line from the origin.
    Line,
    /// Square with the origin at one corner.
    Cube,
    /// Same footprint as a circle.
    Sphere,
    /// Same footprint as a cube.
    Cylinder,
}

/// A placed area-of-effect template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaOfEffect {
    /// Template shape.
    pub shape: AoeShape,
    /// Point of origin.
    pub origin: GridPosition,
    /// Facing for cones and lines.
    #[serde(default)]
    pub direction: Option<Direction>,
    /// Radius, side, or length in feet.
    pub size: u32,
}

impl AreaOfEffect {
    /// A template with no facing.
    pub fn new(shape: AoeShape, origin: GridPosition, size: u32) -> Self {
        Self {
            shape,
            origin,
            direction: None,
            size,
        }
    }

    /// Set the facing.
    pub fn toward(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    fn squares(&self) -> i32 {
        (self.size / FEET_PER_SQUARE) as i32
    }
}

/// Cells covered by an area effect, limited to the map.
///
/// Circles and spheres take every cell within the radius (Euclidean).
/// Cubes and cylinders take a square of side `size` with the origin at its
/// north-west corner. Lines and cones start next to the origin and need a
/// direction; without one they cover nothing. A cone is `d + 1` cells wide
/// at `d` squares out; diagonal cones fill the quadrant they face.
pub fn affected_positions(aoe: &AreaOfEffect, map: &GameMap) -> Vec<GridPosition> {
    let n = aoe.squares();
    let o = aoe.origin;
    let cells: Vec<GridPosition> = match aoe.shape {
        AoeShape::Circle | AoeShape::Sphere => {
            let radius = f64::from(n);
            square_around(o, n)
                .filter(|p| o.euclidean(*p) <= radius)
                .collect()
        }
        AoeShape::Cube | AoeShape::Cylinder => (0..n)
            .flat_map(|dy| (0..n).map(move |dx| o.offset(dx, dy)))
            .collect(),
        AoeShape::Line => match aoe.direction {
            Some(dir) => {
                let (dx, dy) = dir.delta();
                (1..=n).map(|i| o.offset(dx * i, dy * i)).collect()
            }
            None => Vec::new(),
        },
        AoeShape::Cone => match aoe.direction {
            Some(dir) => cone(o, dir, n),
            None => Vec::new(),
        },
    };
    cells.into_iter().filter(|p| map.contains(*p)).collect()
}

fn square_around(center: GridPosition, radius: i32) -> impl Iterator<Item = GridPosition> {
    (-radius..=radius)
        .flat_map(move |dy| (-radius..=radius).map(move |dx| center.offset(dx, dy)))
}

fn cone(origin: GridPosition, direction: Direction, length: i32) -> Vec<GridPosition> {
    let (dx, dy) = direction.delta();
    if direction.is_diagonal() {
        return (0..=length)
            .flat_map(|j| (0..=length).map(move |i| origin.offset(dx * i, dy * j)))
            .filter(|p| *p != origin)
            .collect();
    }
    let (px, py) = (dy.abs(), dx.abs());
    let mut cells = Vec::new();
    for d in 1..=length {
        let spine = origin.offset(dx * d, dy * d);
        for w in -(d / 2)..=(d + 1) / 2 {
            cells.push(spine.offset(px * w, py * w));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: i32, y: i32) -> GridPosition {
        GridPosition::new(x, y)
    }

    #[test]
    fn sphere_is_euclidean() {
        let map = GameMap::empty(20, 20);
        let aoe = AreaOfEffect::new(AoeShape::Sphere, pos(10, 10), 10);
        let cells = affected_positions(&aoe, &map);
        assert!(cells.contains(&pos(10, 10)));
        assert!(cells.contains(&pos(12, 10)));
        assert!(cells.contains(&pos(11, 11)));
        assert!(!cells.contains(&pos(12, 12)));
        assert_eq!(cells.len(), 13);
    }

    #[test]
    fn circle_clipped_to_map() {
        let map = GameMap::empty(5, 5);
        let aoe = AreaOfEffect::new(AoeShape::Circle, pos(0, 0), 5);
        let mut cells = affected_positions(&aoe, &map);
        cells.sort();
        assert_eq!(cells, vec![pos(0, 0), pos(0, 1), pos(1, 0)]);
    }

    #[test]
    fn cube_from_corner() {
        let map = GameMap::empty(10, 10);
        let aoe = AreaOfEffect::new(AoeShape::Cube, pos(2, 2), 15);
        let cells = affected_positions(&aoe, &map);
        assert_eq!(cells.len(), 9);
        assert!(cells.contains(&pos(4, 4)));
        assert!(!cells.contains(&pos(5, 2)));
    }

    #[test]
    fn line_follows_direction() {
        let map = GameMap::empty(10, 10);
        let aoe = AreaOfEffect::new(AoeShape::Line, pos(0, 5), 30).toward(Direction::East);
        let cells = affected_positions(&aoe, &map);
        assert_eq!(cells.len(), 6);
        assert_eq!(cells.first(), Some(&pos(1, 5)));
        assert_eq!(cells.last(), Some(&pos(6, 5)));
        assert!(
            affected_positions(&AreaOfEffect::new(AoeShape::Line, pos(0, 5), 30), &map).is_empty()
        );
    }

    #[test]
    fn cone_widens() {
        let map = GameMap::empty(20, 20);
        let aoe = AreaOfEffect::new(AoeShape::Cone, pos(10, 10), 15).toward(Direction::North);
        let cells = affected_positions(&aoe, &map);
        for d in 1..=3 {
            let row = cells.iter().filter(|p| p.y == 10 - d).count();
            assert_eq!(row as i32, d + 1);
        }
        assert!(!cells.contains(&pos(10, 10)));
        assert!(cells.contains(&pos(10, 9)));
    }

    #[test]
    fn diagonal_cone_fills_quadrant() {
        let map = GameMap::empty(20, 20);
        let aoe = AreaOfEffect::new(AoeShape::Cone, pos(5, 5), 10).toward(Direction::SouthEast);
        let cells = affected_positions(&aoe, &map);
        assert_eq!(cells.len(), 8);
        assert!(cells.iter().all(|p| p.x >= 5 && p.y >= 5));
    }
}
