//! Core data model for the tabletop tactics engine.
//!
//! Characters, monster stat blocks, conditions, damage types, and grid
//! positions shared by the dice, combat, and spatial engines. Every type
//! here is plain serializable data: the engines read it and hand back
//! results or update records, never hidden state.

/// Ability scores, skills, and the derived modifier formulas.
pub mod ability;
/// Player character sheets and the update records applied to them.
pub mod character;
/// Conditions and how long they last.
pub mod condition;
/// Damage types and the resistance/immunity/vulnerability response.
pub mod damage;
/// Error types used throughout the crate.
pub mod error;
/// Integer grid positions.
pub mod grid;
/// Static monster templates.
pub mod monster;
/// Clamped, spendable resources (spell slots, class features).
pub mod resource;

/// Re-export ability types and formulas.
pub use ability::{Ability, AbilityScores, Skill, ability_modifier, proficiency_bonus};
/// Re-export character types.
pub use character::{Character, CharacterUpdate, HitDicePool, HitPoints, ProficiencyLevel};
/// Re-export condition types.
pub use condition::{ActiveCondition, Condition, ConditionDuration};
/// Re-export damage types.
pub use damage::{DamageModifier, DamageType};
/// Re-export error types.
pub use error::{TtError, TtResult};
/// Re-export grid types.
pub use grid::GridPosition;
/// Re-export monster types.
pub use monster::{MonsterAction, MonsterStatBlock};
/// Re-export resource types.
pub use resource::Resource;
