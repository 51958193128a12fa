//! Dice notation, randomness, and the d20 roll engine.
//!
//! All randomness flows through a [`RandomSource`] owned by a
//! [`DiceEngine`]. Seed a `StdRng` or script exact faces with
//! [`ScriptedRandom`] for reproducible runs.

/// Death saving throw tally.
pub mod death;
/// The roll engine.
pub mod engine;
/// `NdS+M` notation.
pub mod notation;
/// Random sources.
pub mod random;
/// Roll requests and results.
pub mod result;

pub use death::{DeathSaveState, DeathSaveTally};
pub use engine::DiceEngine;
pub use notation::DiceNotation;
pub use random::{RandomSource, ScriptedRandom};
pub use result::{
    AbilityCheckResult, AdvantageStatus, AttackRollResult, BasicRollResult, D20Roll,
    DamageComponent, DamageRequest, DamageRollResult, DamageSource, DeathSaveResult,
    InitiativeEntrant, InitiativeRollResult, SavingThrowResult,
};
