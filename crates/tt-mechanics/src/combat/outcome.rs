use serde::{Deserialize, Serialize};
use tt_core::{ActiveCondition, Condition, DamageModifier};

/// How a fight ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatOutcome {
    /// Every enemy is down and the party still stands.
    Victory,
    /// The party is down.
    Defeat,
    /// The party escaped.
    Fled,
    /// Both sides stopped fighting.
    Truce,
}

/// Result of advancing the turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnAdvance {
    /// Round after advancing.
    pub round: u32,
    /// Whether the advance started a new round.
    pub new_round: bool,
    /// Id of the combatant whose turn it now is, `None` when nobody can act.
    pub current: Option<String>,
    /// Conditions that ran out at the end of the round, by combatant id.
    pub expired: Vec<(String, Condition)>,
}

/// Result of dealing damage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageApplication {
    /// Who took the damage.
    pub target_id: String,
    /// Hit points before.
    pub previous_hp: i32,
    /// Hit points after.
    pub new_hp: i32,
    /// Damage dealt after resistance, immunity, or vulnerability.
    pub damage_dealt: i32,
    /// Which defense applied, if any.
    pub modifier: Option<DamageModifier>,
    /// Whether this damage took the target to 0.
    pub defeated: bool,
}

/// Result of healing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealingApplication {
    /// Who was healed.
    pub target_id: String,
    /// Hit points before.
    pub previous_hp: i32,
    /// Hit points after.
    pub new_hp: i32,
    /// Whether a defeated target is back in the fight.
    pub revived: bool,
}

/// What happened when adding a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "previous", rename_all = "snake_case")]
pub enum ConditionChange {
    /// The condition was new.
    Applied,
    /// An existing instance of the same condition was replaced.
    Replaced(ActiveCondition),
    /// The target is immune; nothing changed.
    Immune,
}

/// Whether a fight should end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndCheck {
    /// One side has no active combatants left.
    pub should_end: bool,
    /// The outcome, when it should end.
    pub outcome: Option<CombatOutcome>,
}

/// Final tally of a finished fight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatSummary {
    /// How it ended.
    pub outcome: CombatOutcome,
    /// Experience from defeated enemies. Only awarded on victory.
    pub xp_earned: u32,
    /// Rounds fought.
    pub rounds: u32,
    /// Ids of defeated enemies.
    pub defeated_enemies: Vec<String>,
}
