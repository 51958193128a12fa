use tt_core::GridPosition;

/// Alias for `Result<T, SpatialError>`.
pub type SpatialResult<T> = Result<T, SpatialError>;

/// Integration errors raised by grid operations.
///
/// Blocked movement, unreachable goals, and obstructed sight lines are not
/// errors; they come back as ordinary result values.
#[derive(Debug, thiserror::Error)]
pub enum SpatialError {
    /// No entity with this id is on the map.
    #[error("entity not found on map: {0}")]
    EntityNotFound(String),

    /// An entity with this id is already on the map.
    #[error("entity already on map: {0}")]
    DuplicateEntity(String),

    /// A position lies outside the map.
    #[error("position {0} is outside the map")]
    OutOfBounds(GridPosition),

    /// The map data violates a structural invariant.
    #[error("invalid map: {0}")]
    InvalidMap(String),
}
