//! Grid geometry for the tabletop tactics engine.
//!
//! Everything here operates on a [`GameMap`]: distances under the alternating
//! 5-10-5 diagonal rule, A* pathfinding, Bresenham line of sight with cover,
//! step-by-step movement validation, area-of-effect templates, neighbourhood
//! queries, and fog of war. Read-only operations borrow the map; operations
//! that move entities or change visibility take `&mut GameMap`.
//!
//! The crate is independent of dice and combat.

/// Area-of-effect templates.
pub mod area;
/// Vision configuration.
pub mod config;
/// Distances and compass directions.
pub mod distance;
/// Error types for grid operations.
pub mod error;
/// Line of sight and cover.
pub mod los;
/// Map, tile, and entity types.
pub mod map;
/// Step-by-step movement with opportunity attacks and traps.
pub mod movement;
/// Movement costs and A* pathfinding.
pub mod pathfinding;
/// Neighbourhood queries over tiles and entities.
pub mod query;
/// Plain-text map rendering.
pub mod render;
/// Fog of war.
pub mod visibility;

/// Re-exports of area-of-effect types.
pub use area::{AoeShape, AreaOfEffect, affected_positions};
/// Re-export of [`config::VisionConfig`].
pub use config::VisionConfig;
/// Re-exports of distance helpers.
pub use distance::{Direction, Distance, calculate_distance, direction};
/// Re-exports of [`error::SpatialError`] and [`error::SpatialResult`].
pub use error::{SpatialError, SpatialResult};
/// Re-exports of line-of-sight types.
pub use los::{Cover, LineOfSight, bresenham_line, check_line_of_sight};
/// Re-exports of map types.
pub use map::{
    AmbientLight, CreatureSize, EntityType, GameMap, LightSource, MapEffect, MapEntity, MapTile,
    ObjectKind, Terrain, TileObject,
};
/// Re-exports of movement types.
pub use movement::{
    MovementBlock, MovementRequest, MovementResult, OpportunityAttack, TrapTrigger,
    execute_movement,
};
/// Re-exports of pathfinding helpers.
pub use pathfinding::{PathResult, find_path, find_path_with_cost, movement_cost};
/// Re-exports of query types.
pub use query::{QueryResult, QueryShape, SpatialQuery, spatial_query};
/// Re-exports of fog-of-war helpers.
pub use visibility::{reveal_area, update_visibility};
