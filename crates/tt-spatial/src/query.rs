use serde::{Deserialize, Serialize};
use tt_core::GridPosition;

use crate::map::{EntityType, GameMap, MapEntity, MapTile, Terrain};

/// Neighbourhood shape for a [`SpatialQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryShape {
    /// Euclidean radius.
    #[default]
    Circle,
    /// Chebyshev radius.
    Square,
}

/// "What is around this cell?"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialQuery {
    /// Centre of the neighbourhood.
    pub center: GridPosition,
    /// Radius in squares.
    pub radius: u32,
    /// Neighbourhood shape.
    #[serde(default)]
    pub shape: QueryShape,
    /// Only report entities of these types.
    #[serde(default)]
    pub entity_types: Option<Vec<EntityType>>,
    /// Only report tiles with these terrains.
    #[serde(default)]
    pub terrain_types: Option<Vec<Terrain>>,
}

impl SpatialQuery {
    /// A circular query with no filters.
    pub fn around(center: GridPosition, radius: u32) -> Self {
        Self {
            center,
            radius,
            shape: QueryShape::Circle,
            entity_types: None,
            terrain_types: None,
        }
    }

    /// Use a square neighbourhood.
    pub fn square(mut self) -> Self {
        self.shape = QueryShape::Square;
        self
    }

    /// Only report these entity types.
    pub fn entities_of(mut self, types: impl Into<Vec<EntityType>>) -> Self {
        self.entity_types = Some(types.into());
        self
    }

    /// Only report these terrains.
    pub fn terrain_of(mut self, types: impl Into<Vec<Terrain>>) -> Self {
        self.terrain_types = Some(types.into());
        self
    }

    fn covers(&self, position: GridPosition) -> bool {
        match self.shape {
            QueryShape::Circle => self.center.euclidean(position) <= f64::from(self.radius),
            QueryShape::Square => self.center.chebyshev(position) <= self.radius,
        }
    }
}

/// Tiles and entities matched by a query, borrowed from the map.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<'a> {
    /// Matching tiles.
    pub tiles: Vec<&'a MapTile>,
    /// Matching entities.
    pub entities: Vec<&'a MapEntity>,
    /// Positions of the matching tiles.
    pub positions: Vec<GridPosition>,
}

/// Find the tiles and entities in a neighbourhood.
pub fn spatial_query<'a>(query: &SpatialQuery, map: &'a GameMap) -> QueryResult<'a> {
    let tiles: Vec<&MapTile> = map
        .iter_tiles()
        .filter(|t| query.covers(t.position))
        .filter(|t| {
            query
                .terrain_types
                .as_ref()
                .is_none_or(|types| types.contains(&t.terrain))
        })
        .collect();
    let entities = map
        .entities
        .iter()
        .filter(|e| query.covers(e.position))
        .filter(|e| {
            query
                .entity_types
                .as_ref()
                .is_none_or(|types| types.contains(&e.entity_type))
        })
        .collect();
    let positions = tiles.iter().map(|t| t.position).collect();
    QueryResult {
        tiles,
        entities,
        positions,
    }
}
