//! Error types for the mechanics engine.

use tt_core::TtError;
use tt_spatial::SpatialError;

/// Integration errors raised by the dice and combat engines.
///
/// Misses, failed checks, and resisted damage are not errors; they are
/// reported in the returned result values.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A dice notation string could not be parsed.
    #[error("invalid dice notation: '{0}'")]
    InvalidNotation(String),

    /// No combatant with this id is in the combat.
    #[error("combatant not found: {0}")]
    CombatantNotFound(String),

    /// The combat has no combatant whose turn it is.
    #[error("no active combatant")]
    NoActiveCombatant,

    /// The combat is already over.
    #[error("combat has already ended")]
    CombatEnded,

    /// An error from grid operations.
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    /// An error from the shared data model.
    #[error(transparent)]
    Core(#[from] TtError),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
