use std::fmt;

use serde::{Deserialize, Serialize};
use tt_core::GridPosition;

use crate::error::SpatialResult;
use crate::map::{GameMap, Terrain};
use crate::pathfinding::movement_cost;

/// A request to walk an entity along a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRequest {
    /// Who moves.
    pub entity_id: String,
    /// Cells to step through in order. A leading cell equal to the entity's
    /// current position is skipped.
    pub path: Vec<GridPosition>,
    /// Record opportunity attacks from hostiles left behind.
    #[serde(default = "default_true")]
    pub allow_opportunity_attacks: bool,
}

fn default_true() -> bool {
    true
}

impl MovementRequest {
    /// A request with opportunity attacks enabled.
    pub fn new(entity_id: impl Into<String>, path: Vec<GridPosition>) -> Self {
        Self {
            entity_id: entity_id.into(),
            path,
            allow_opportunity_attacks: true,
        }
    }

    /// Suppress opportunity attacks (Disengage).
    pub fn disengaged(mut self) -> Self {
        self.allow_opportunity_attacks = false;
        self
    }
}

/// Why a movement stopped early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MovementBlock {
    /// The next cell does not touch the current one.
    NotAdjacent,
    /// The next cell is off the map.
    OutOfBounds,
    /// The next cell cannot be entered.
    Impassable {
        /// Terrain of the blocked cell.
        terrain: Terrain,
    },
    /// Another creature stands in the next cell.
    Occupied {
        /// Name of the occupant.
        by: String,
    },
    /// Not enough movement left for the next step.
    InsufficientMovement {
        /// Feet the step costs.
        needed: u32,
        /// Feet left.
        remaining: u32,
    },
}

impl fmt::Display for MovementBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAdjacent => write!(f, "next step is not adjacent"),
            Self::OutOfBounds => write!(f, "next step is off the map"),
            Self::Impassable { terrain } => write!(f, "impassable terrain ({terrain:?})"),
            Self::Occupied { by } => write!(f, "occupied by {by}"),
            Self::InsufficientMovement { needed, remaining } => {
                write!(f, "insufficient movement ({needed} ft needed, {remaining} ft left)")
            }
        }
    }
}

/// A hostile that gets a free swing as the mover leaves its reach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunityAttack {
    /// The hostile's id.
    pub attacker_id: String,
    /// The hostile's name.
    pub attacker_name: String,
    /// Cell the mover was leaving.
    pub position: GridPosition,
}

/// A trap on a cell the mover entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapTrigger {
    /// Trap object id.
    pub object_id: String,
    /// Trap name.
    pub name: String,
    /// Where it is.
    pub position: GridPosition,
}

/// Outcome of a movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementResult {
    /// Whether the whole path was walked.
    pub success: bool,
    /// Cells actually entered, in order.
    pub path_taken: Vec<GridPosition>,
    /// Feet spent.
    pub movement_cost: u32,
    /// Feet left after the move.
    pub remaining_movement: u32,
    /// The cell that could not be entered.
    pub blocked_at: Option<GridPosition>,
    /// Why the move stopped.
    pub reason: Option<MovementBlock>,
    /// Opportunity attacks provoked.
    pub opportunity_attacks: Vec<OpportunityAttack>,
    /// Traps on entered cells.
    pub traps_triggered: Vec<TrapTrigger>,
}

/// Walk an entity along `request.path`, one cell at a time.
///
/// Each step must be adjacent to the previous cell, on the map, passable,
/// free of other creatures, and affordable from the entity's remaining
/// movement. On the first step that fails, the entity stops on the last
/// good cell and the result says where and why. The entity's position and
/// `movement_used` are updated either way.
///
/// Only an unknown entity id is an error.
pub fn execute_movement(
    map: &mut GameMap,
    request: &MovementRequest,
) -> SpatialResult<MovementResult> {
    let mover = map.entity(&request.entity_id)?;
    let mover_type = mover.entity_type;
    let start = mover.position;
    let budget = mover.movement_remaining();

    let mut current = start;
    let mut spent = 0u32;
    let mut diagonals = 0u32;
    let mut path_taken = Vec::new();
    let mut opportunity_attacks: Vec<OpportunityAttack> = Vec::new();
    let mut traps_triggered = Vec::new();
    let mut failure: Option<(GridPosition, MovementBlock)> = None;

    let leading = request.path.iter().take_while(|p| **p == start).count();
    for step in request.path.iter().copied().skip(leading) {
        if !current.is_adjacent(step) {
            failure = Some((step, MovementBlock::NotAdjacent));
            break;
        }
        let Some(tile) = map.tile(step) else {
            failure = Some((step, MovementBlock::OutOfBounds));
            break;
        };
        let diagonal = step.x != current.x && step.y != current.y;
        let Some(cost) = movement_cost(tile, diagonal, diagonals) else {
            failure = Some((
                step,
                MovementBlock::Impassable {
                    terrain: tile.terrain,
                },
            ));
            break;
        };
        if let Some(occupant) = map.occupant(step, Some(&request.entity_id)) {
            failure = Some((
                step,
                MovementBlock::Occupied {
                    by: occupant.name.clone(),
                },
            ));
            break;
        }
        if spent + cost > budget {
            failure = Some((
                step,
                MovementBlock::InsufficientMovement {
                    needed: cost,
                    remaining: budget - spent,
                },
            ));
            break;
        }

        if request.allow_opportunity_attacks {
            for hostile in map.entities.iter().filter(|e| {
                e.id != request.entity_id
                    && mover_type.is_hostile_to(e.entity_type)
                    && e.position.is_adjacent(current)
                    && !e.position.is_adjacent(step)
            }) {
                if opportunity_attacks.iter().all(|a| a.attacker_id != hostile.id) {
                    opportunity_attacks.push(OpportunityAttack {
                        attacker_id: hostile.id.clone(),
                        attacker_name: hostile.name.clone(),
                        position: current,
                    });
                }
            }
        }
        for trap in tile.objects.iter().filter(|o| o.is_trap()) {
            traps_triggered.push(TrapTrigger {
                object_id: trap.id.clone(),
                name: trap.name.clone(),
                position: step,
            });
        }

        spent += cost;
        if diagonal {
            diagonals += 1;
        }
        current = step;
        path_taken.push(step);
    }

    let mover = map.entity_mut(&request.entity_id)?;
    mover.position = current;
    mover.movement_used += spent;

    tracing::debug!(
        entity = %request.entity_id,
        from = %start,
        to = %current,
        spent,
        blocked = failure.is_some(),
        "movement executed"
    );

    let (blocked_at, reason) = match failure {
        Some((at, why)) => (Some(at), Some(why)),
        None => (None, None),
    };
    Ok(MovementResult {
        success: reason.is_none(),
        path_taken,
        movement_cost: spent,
        remaining_movement: budget - spent,
        blocked_at,
        reason,
        opportunity_attacks,
        traps_triggered,
    })
}
