use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TtError, TtResult};

/// Modifier for an ability score: `floor((score - 10) / 2)`.
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Proficiency bonus for a character level: `ceil(level / 4) + 1`.
pub fn proficiency_bonus(level: u32) -> i32 {
    level.div_ceil(4) as i32 + 1
}

/// The six abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    /// Physical power.
    Strength,
    /// Agility and reflexes.
    Dexterity,
    /// Endurance.
    Constitution,
    /// Reasoning and memory.
    Intelligence,
    /// Perception and insight.
    Wisdom,
    /// Force of personality.
    Charisma,
}

impl Ability {
    /// All six abilities in sheet order.
    pub const ALL: [Ability; 6] = [
        Self::Strength,
        Self::Dexterity,
        Self::Constitution,
        Self::Intelligence,
        Self::Wisdom,
        Self::Charisma,
    ];

    /// Three-letter abbreviation (`STR`, `DEX`, ...).
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Strength => "STR",
            Self::Dexterity => "DEX",
            Self::Constitution => "CON",
            Self::Intelligence => "INT",
            Self::Wisdom => "WIS",
            Self::Charisma => "CHA",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Strength => "strength",
            Self::Dexterity => "dexterity",
            Self::Constitution => "constitution",
            Self::Intelligence => "intelligence",
            Self::Wisdom => "wisdom",
            Self::Charisma => "charisma",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Ability {
    type Err = TtError;

    fn from_str(s: &str) -> TtResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "str" | "strength" => Ok(Self::Strength),
            "dex" | "dexterity" => Ok(Self::Dexterity),
            "con" | "constitution" => Ok(Self::Constitution),
            "int" | "intelligence" => Ok(Self::Intelligence),
            "wis" | "wisdom" => Ok(Self::Wisdom),
            "cha" | "charisma" => Ok(Self::Charisma),
            _ => Err(TtError::UnknownAbility(s.to_string())),
        }
    }
}

/// A full set of ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    /// Strength score.
    pub strength: i32,
    /// Dexterity score.
    pub dexterity: i32,
    /// Constitution score.
    pub constitution: i32,
    /// Intelligence score.
    pub intelligence: i32,
    /// Wisdom score.
    pub wisdom: i32,
    /// Charisma score.
    pub charisma: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::uniform(10)
    }
}

impl AbilityScores {
    /// Scores in sheet order: STR, DEX, CON, INT, WIS, CHA.
    pub fn new(
        strength: i32,
        dexterity: i32,
        constitution: i32,
        intelligence: i32,
        wisdom: i32,
        charisma: i32,
    ) -> Self {
        Self {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
        }
    }

    /// Every ability set to the same score.
    pub fn uniform(score: i32) -> Self {
        Self::new(score, score, score, score, score, score)
    }

    /// The raw score for an ability.
    pub fn score(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    /// The modifier derived from an ability's score.
    pub fn modifier(&self, ability: Ability) -> i32 {
        ability_modifier(self.score(ability))
    }

    /// Check every score is within 1-30.
    pub fn validate(&self) -> TtResult<()> {
        match Ability::ALL
            .iter()
            .map(|a| self.score(*a))
            .find(|s| !(1..=30).contains(s))
        {
            Some(bad) => Err(TtError::InvalidScore(bad)),
            None => Ok(()),
        }
    }
}

/// The eighteen skills, each governed by one ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Skill {
    Acrobatics,
    AnimalHandling,
    Arcana,
    Athletics,
    Deception,
    History,
    Insight,
    Intimidation,
    Investigation,
    Medicine,
    Nature,
    Perception,
    Performance,
    Persuasion,
    Religion,
    SleightOfHand,
    Stealth,
    Survival,
}

impl Skill {
    /// The ability this skill is rolled with.
    pub fn ability(self) -> Ability {
        match self {
            Self::Athletics => Ability::Strength,
            Self::Acrobatics | Self::SleightOfHand | Self::Stealth => Ability::Dexterity,
            Self::Arcana | Self::History | Self::Investigation | Self::Nature | Self::Religion => {
                Ability::Intelligence
            }
            Self::AnimalHandling
            | Self::Insight
            | Self::Medicine
            | Self::Perception
            | Self::Survival => Ability::Wisdom,
            Self::Deception | Self::Intimidation | Self::Performance | Self::Persuasion => {
                Ability::Charisma
            }
        }
    }
}

impl FromStr for Skill {
    type Err = TtError;

    fn from_str(s: &str) -> TtResult<Self> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();
        let skill = match key.as_str() {
            "acrobatics" => Self::Acrobatics,
            "animalhandling" => Self::AnimalHandling,
            "arcana" => Self::Arcana,
            "athletics" => Self::Athletics,
            "deception" => Self::Deception,
            "history" => Self::History,
            "insight" => Self::Insight,
            "intimidation" => Self::Intimidation,
            "investigation" => Self::Investigation,
            "medicine" => Self::Medicine,
            "nature" => Self::Nature,
            "perception" => Self::Perception,
            "performance" => Self::Performance,
            "persuasion" => Self::Persuasion,
            "religion" => Self::Religion,
            "sleightofhand" => Self::SleightOfHand,
            "stealth" => Self::Stealth,
            "survival" => Self::Survival,
            _ => return Err(TtError::UnknownSkill(s.to_string())),
        };
        Ok(skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn modifier_floors_toward_negative() {
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(11), 0);
        assert_eq!(ability_modifier(12), 1);
        assert_eq!(ability_modifier(9), -1);
        assert_eq!(ability_modifier(8), -1);
        assert_eq!(ability_modifier(1), -5);
        assert_eq!(ability_modifier(20), 5);
    }

    #[test]
    fn proficiency_by_level() {
        assert_eq!(proficiency_bonus(1), 2);
        assert_eq!(proficiency_bonus(4), 2);
        assert_eq!(proficiency_bonus(5), 3);
        assert_eq!(proficiency_bonus(9), 4);
        assert_eq!(proficiency_bonus(17), 6);
        assert_eq!(proficiency_bonus(20), 6);
    }

    #[test]
    fn scores_lookup() {
        let scores = AbilityScores::new(16, 14, 12, 10, 8, 18);
        assert_eq!(scores.score(Ability::Strength), 16);
        assert_eq!(scores.modifier(Ability::Dexterity), 2);
        assert_eq!(scores.modifier(Ability::Wisdom), -1);
        assert_eq!(scores.modifier(Ability::Charisma), 4);
    }

    #[test]
    fn scores_validate() {
        assert!(AbilityScores::default().validate().is_ok());
        assert!(matches!(
            AbilityScores::new(31, 10, 10, 10, 10, 10).validate(),
            Err(TtError::InvalidScore(31))
        ));
    }

    #[test]
    fn ability_parse() {
        assert_eq!("DEX".parse::<Ability>().unwrap(), Ability::Dexterity);
        assert_eq!("wisdom".parse::<Ability>().unwrap(), Ability::Wisdom);
        assert!("luck".parse::<Ability>().is_err());
    }

    #[test]
    fn skill_parse_and_ability() {
        assert_eq!(
            "Sleight of Hand".parse::<Skill>().unwrap(),
            Skill::SleightOfHand
        );
        assert_eq!(
            "animal_handling".parse::<Skill>().unwrap(),
            Skill::AnimalHandling
        );
        assert_eq!(Skill::Stealth.ability(), Ability::Dexterity);
        assert_eq!(Skill::Athletics.ability(), Ability::Strength);
        assert!("juggling".parse::<Skill>().is_err());
    }

    proptest! {
        #[test]
        fn modifier_steps_every_two_points(score in -30i32..60) {
            prop_assert_eq!(ability_modifier(score + 2), ability_modifier(score) + 1);
            prop_assert!(2 * ability_modifier(score) <= score - 10);
        }
    }
}
