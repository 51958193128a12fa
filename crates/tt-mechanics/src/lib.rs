//! Dice and combat engines for the tabletop tactics engine.
//!
//! [`DiceEngine`] handles every d20 roll the rules need through an
//! injectable random source, so seeded runs are reproducible.
//! [`CombatEngine`] starts fights and [`Combat`] runs them turn by turn.

/// Combat state machine.
pub mod combat;
/// Engine configuration.
pub mod config;
/// Dice notation and rolls.
pub mod dice;
/// Error types for the mechanics engine.
pub mod error;

pub use combat::{
    Combat, CombatEngine, CombatOutcome, CombatPhase, CombatSummary, Combatant, CombatantKind,
    CombatantStatus, ConditionChange, DamageApplication, EncounterSetup, EndCheck,
    HealingApplication, MonsterGroup, Side, TurnAdvance, TurnResources,
};
pub use config::EngineConfig;
pub use dice::{
    AdvantageStatus, AttackRollResult, BasicRollResult, DamageRequest, DamageRollResult,
    DiceEngine, DiceNotation, RandomSource, ScriptedRandom,
};
pub use error::{MechError, MechResult};
