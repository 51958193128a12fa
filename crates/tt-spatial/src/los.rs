use serde::{Deserialize, Serialize};
use tt_core::GridPosition;

use crate::distance::{Distance, calculate_distance};
use crate::map::{CreatureSize, GameMap, Terrain};

/// Degree of cover a target has against an attacker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cover {
    /// Clear shot.
    #[default]
    None,
    /// +2 AC and Dexterity saves.
    Half,
    /// +5 AC and Dexterity saves.
    ThreeQuarters,
    /// Cannot be targeted directly.
    Full,
}

impl Cover {
    /// One step more cover, stopping at three-quarters.
    pub fn escalate(self) -> Self {
        match self {
            Self::None => Self::Half,
            Self::Half | Self::ThreeQuarters => Self::ThreeQuarters,
            Self::Full => Self::Full,
        }
    }

    /// Bonus to AC and Dexterity saves. `None` for full cover.
    pub fn ac_bonus(self) -> Option<i32> {
        match self {
            Self::None => Some(0),
            Self::Half => Some(2),
            Self::ThreeQuarters => Some(5),
            Self::Full => None,
        }
    }
}

/// Result of a sight-line check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineOfSight {
    /// Whether the target cell can be seen.
    pub has_los: bool,
    /// What stopped the sight line: `"wall"`, `"map edge"`, or an object name.
    pub blocked_by: Option<String>,
    /// Cover the target has.
    pub cover: Cover,
    /// Distance between the two cells.
    pub distance: Distance,
}

/// Cells on the segment from `from` to `to`, both ends included.
pub fn bresenham_line(from: GridPosition, to: GridPosition) -> Vec<GridPosition> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (from.x, from.y);
    let mut cells = Vec::with_capacity((dx.max(-dy) + 1) as usize);
    loop {
        cells.push(GridPosition::new(x, y));
        if x == to.x && y == to.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    cells
}

/// Check whether `to` can be seen from `from`.
///
/// Walls and sight-blocking objects between the two cells block the line.
/// A wall on the target cell itself leaves the line open with full cover.
/// Creatures larger than tiny standing in between grant half cover, and
/// each object that blocks movement but not sight adds one step of cover
/// up to three-quarters.
pub fn check_line_of_sight(map: &GameMap, from: GridPosition, to: GridPosition) -> LineOfSight {
    let distance = calculate_distance(from, to);
    let blocked = |by: &str| LineOfSight {
        has_los: false,
        blocked_by: Some(by.to_string()),
        cover: Cover::Full,
        distance,
    };
    let mut cover = Cover::None;

    for cell in bresenham_line(from, to).into_iter().skip(1) {
        let Some(tile) = map.tile(cell) else {
            return blocked("map edge");
        };
        if cell == to {
            if tile.terrain == Terrain::Wall {
                cover = Cover::Full;
            }
            break;
        }
        if tile.terrain == Terrain::Wall {
            tracing::debug!(%from, %to, at = %cell, "sight blocked by wall");
            return blocked("wall");
        }
        if let Some(object) = tile.los_blocker() {
            tracing::debug!(%from, %to, at = %cell, object = %object.name, "sight blocked");
            return blocked(&object.name);
        }
        let screened = map
            .entities_at(cell)
            .any(|e| e.entity_type.occupies_cell() && e.size > CreatureSize::Tiny);
        if screened {
            cover = cover.max(Cover::Half);
        }
        for _ in tile.objects.iter().filter(|o| o.blocks_movement) {
            cover = cover.escalate();
        }
    }

    LineOfSight {
        has_los: true,
        blocked_by: None,
        cover,
        distance,
    }
}
