use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TtError, TtResult};

/// Types of damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    /// Corrosive damage.
    Acid,
    /// Blunt force (maces, falls).
    Bludgeoning,
    /// Freezing damage.
    Cold,
    /// Burning damage.
    Fire,
    /// Pure magical energy.
    Force,
    /// Electrical damage.
    Lightning,
    /// Life-draining damage.
    Necrotic,
    /// Puncturing damage (arrows, spears).
    Piercing,
    /// Toxic damage.
    Poison,
    /// Mental damage.
    Psychic,
    /// Holy damage.
    Radiant,
    /// Cutting damage (swords, claws).
    Slashing,
    /// Concussive sound damage.
    Thunder,
}

impl DamageType {
    /// Every damage type.
    pub const ALL: [DamageType; 13] = [
        Self::Acid,
        Self::Bludgeoning,
        Self::Cold,
        Self::Fire,
        Self::Force,
        Self::Lightning,
        Self::Necrotic,
        Self::Piercing,
        Self::Poison,
        Self::Psychic,
        Self::Radiant,
        Self::Slashing,
        Self::Thunder,
    ];

    /// Whether this is one of the three weapon damage types.
    pub fn is_physical(self) -> bool {
        matches!(self, Self::Bludgeoning | Self::Piercing | Self::Slashing)
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Acid => "acid",
            Self::Bludgeoning => "bludgeoning",
            Self::Cold => "cold",
            Self::Fire => "fire",
            Self::Force => "force",
            Self::Lightning => "lightning",
            Self::Necrotic => "necrotic",
            Self::Piercing => "piercing",
            Self::Poison => "poison",
            Self::Psychic => "psychic",
            Self::Radiant => "radiant",
            Self::Slashing => "slashing",
            Self::Thunder => "thunder",
        };
        write!(f, "{s}")
    }
}

impl FromStr for DamageType {
    type Err = TtError;

    fn from_str(s: &str) -> TtResult<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.to_string() == lower)
            .ok_or_else(|| TtError::UnknownDamageType(s.to_string()))
    }
}

/// How a creature's defenses respond to a damage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageModifier {
    /// Takes no damage.
    Immune,
    /// Takes half damage, rounded down.
    Resistant,
    /// Takes double damage.
    Vulnerable,
}

impl DamageModifier {
    /// Apply this modifier to a raw damage amount.
    pub fn apply(self, amount: i32) -> i32 {
        match self {
            Self::Immune => 0,
            Self::Resistant => amount.div_euclid(2),
            Self::Vulnerable => amount * 2,
        }
    }
}
