//! Roll requests and results.

use serde::{Deserialize, Serialize};
use tt_core::{Ability, DamageType, Skill};

use super::notation::DiceNotation;

/// Whether a d20 is rolled once, or twice keeping the higher or lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvantageStatus {
    /// One d20.
    #[default]
    Normal,
    /// Two d20, keep the higher.
    Advantage,
    /// Two d20, keep the lower.
    Disadvantage,
}

impl AdvantageStatus {
    /// Combine sources of advantage and disadvantage: any of each cancel out.
    pub fn from_flags(advantage: bool, disadvantage: bool) -> Self {
        match (advantage, disadvantage) {
            (true, false) => Self::Advantage,
            (false, true) => Self::Disadvantage,
            _ => Self::Normal,
        }
    }
}

/// One d20 roll, possibly with advantage or disadvantage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct D20Roll {
    /// Every d20 rolled (one or two).
    pub rolls: Vec<u32>,
    /// The die that counts.
    pub chosen: u32,
    /// How the roll was made.
    pub advantage: AdvantageStatus,
}

impl D20Roll {
    /// Whether the kept die shows 20.
    pub fn is_natural_20(&self) -> bool {
        self.chosen == 20
    }

    /// Whether the kept die shows 1.
    pub fn is_natural_1(&self) -> bool {
        self.chosen == 1
    }
}

/// Result of rolling a notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicRollResult {
    /// What was rolled.
    pub notation: DiceNotation,
    /// Each die.
    pub rolls: Vec<u32>,
    /// Flat modifier added.
    pub modifier: i32,
    /// Sum of dice plus modifier.
    pub total: i32,
    /// Why the roll was made, if given.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Result of an attack roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRollResult {
    /// Who attacked.
    pub attacker: String,
    /// Who was attacked.
    pub target: String,
    /// Weapon or attack name.
    pub weapon: String,
    /// The d20.
    pub roll: D20Roll,
    /// Bonus added to the d20.
    pub attack_bonus: i32,
    /// d20 plus bonus.
    pub total: i32,
    /// Armor class to beat.
    pub target_ac: i32,
    /// Whether the attack connects.
    pub hits: bool,
    /// Natural 20.
    pub is_critical_hit: bool,
    /// Natural 1.
    pub is_critical_miss: bool,
}

/// An extra damage rider (Sneak Attack, Divine Smite, flaming weapon).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageSource {
    /// Dice notation for the rider.
    pub dice: String,
    /// Type of the extra damage.
    pub damage_type: DamageType,
    /// Where it comes from.
    #[serde(default)]
    pub source: String,
}

/// What to roll for damage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRequest {
    /// Primary damage dice ("1d8").
    pub dice: String,
    /// Primary damage type.
    pub damage_type: DamageType,
    /// Flat bonus on the primary damage, never doubled.
    #[serde(default)]
    pub modifier: i32,
    /// Double every damage die.
    #[serde(default)]
    pub is_critical: bool,
    /// Riders rolled alongside.
    #[serde(default)]
    pub additional: Vec<DamageSource>,
}

impl DamageRequest {
    /// Plain damage with no bonus.
    pub fn new(dice: impl Into<String>, damage_type: DamageType) -> Self {
        Self {
            dice: dice.into(),
            damage_type,
            modifier: 0,
            is_critical: false,
            additional: Vec::new(),
        }
    }

    /// Add a flat bonus.
    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    /// Set whether this is a critical hit.
    pub fn critical(mut self, is_critical: bool) -> Self {
        self.is_critical = is_critical;
        self
    }

    /// Add a rider.
    pub fn with_extra(
        mut self,
        dice: impl Into<String>,
        damage_type: DamageType,
        source: impl Into<String>,
    ) -> Self {
        self.additional.push(DamageSource {
            dice: dice.into(),
            damage_type,
            source: source.into(),
        });
        self
    }
}

/// One rolled component of a damage roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageComponent {
    /// Dice actually rolled, after critical doubling.
    pub notation: DiceNotation,
    /// Damage type.
    pub damage_type: DamageType,
    /// Each die.
    pub rolls: Vec<u32>,
    /// Dice plus modifier.
    pub total: i32,
}

/// Result of a damage roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRollResult {
    /// The primary damage.
    pub primary: DamageComponent,
    /// Riders.
    pub additional: Vec<DamageComponent>,
    /// Primary damage total.
    pub base_damage: i32,
    /// Everything added up, never below zero.
    pub total_damage: i32,
    /// Whether dice were doubled.
    pub is_critical: bool,
}

/// Result of an ability or skill check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityCheckResult {
    /// Who rolled.
    pub character_id: String,
    /// Ability used.
    pub ability: Ability,
    /// Skill used, if any.
    pub skill: Option<Skill>,
    /// The d20.
    pub roll: D20Roll,
    /// Ability modifier added.
    pub ability_modifier: i32,
    /// Proficiency added (doubled for expertise, 0 when untrained).
    pub proficiency_bonus: i32,
    /// d20 plus modifiers.
    pub total: i32,
    /// Difficulty class.
    pub dc: i32,
    /// `total >= dc`.
    pub success: bool,
    /// The d20 showed 20. Informational only.
    pub natural_20: bool,
    /// The d20 showed 1. Informational only.
    pub natural_1: bool,
}

/// Result of a saving throw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingThrowResult {
    /// Who rolled.
    pub character_id: String,
    /// Ability saved with.
    pub ability: Ability,
    /// The d20.
    pub roll: D20Roll,
    /// Ability modifier added.
    pub ability_modifier: i32,
    /// Proficiency added (0 when not proficient).
    pub proficiency_bonus: i32,
    /// d20 plus modifiers.
    pub total: i32,
    /// Difficulty class.
    pub dc: i32,
    /// `total >= dc`.
    pub success: bool,
    /// The d20 showed 20. Informational only.
    pub natural_20: bool,
    /// The d20 showed 1. Informational only.
    pub natural_1: bool,
}

/// Someone rolling initiative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeEntrant {
    /// Combatant id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Initiative modifier (usually Dexterity).
    pub modifier: i32,
}

impl InitiativeEntrant {
    /// Create an entrant.
    pub fn new(id: impl Into<String>, name: impl Into<String>, modifier: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            modifier,
        }
    }
}

/// One initiative result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeRollResult {
    /// Combatant id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// The d20.
    pub roll: u32,
    /// Modifier added.
    pub modifier: i32,
    /// d20 plus modifier.
    pub total: i32,
}

/// Result of a death saving throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathSaveResult {
    /// The d20.
    pub roll: u32,
    /// 10 or higher.
    pub success: bool,
    /// Natural 20: the creature stabilizes outright.
    pub stabilized: bool,
    /// Natural 1: counts as two failures.
    pub counts_double: bool,
}
