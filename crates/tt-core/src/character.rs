use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ability::{Ability, AbilityScores, Skill, proficiency_bonus};
use crate::condition::ActiveCondition;
use crate::resource::Resource;

/// Current, maximum, and temporary hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    /// Current hit points.
    pub current: i32,
    /// Maximum hit points.
    pub max: i32,
    /// Temporary hit points.
    #[serde(default)]
    pub temp: i32,
}

impl HitPoints {
    /// Full hit points with no temporary buffer.
    pub fn full(max: i32) -> Self {
        Self {
            current: max,
            max,
            temp: 0,
        }
    }
}

/// The hit dice a character can spend on short rests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitDicePool {
    /// Sides of each hit die (d8 = 8).
    pub sides: u32,
    /// Total dice (equals level for single-class characters).
    pub total: u32,
    /// Dice left to spend.
    pub remaining: u32,
}

impl Default for HitDicePool {
    fn default() -> Self {
        Self {
            sides: 8,
            total: 1,
            remaining: 1,
        }
    }
}

/// Saving-throw and skill proficiencies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Proficiencies {
    /// Abilities with saving-throw proficiency.
    pub saving_throws: Vec<Ability>,
    /// Proficient skills.
    pub skills: Vec<Skill>,
    /// Skills with expertise (double proficiency).
    pub expertise: Vec<Skill>,
}

/// How well a character knows a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProficiencyLevel {
    /// No bonus.
    Untrained,
    /// Proficiency bonus once.
    Proficient,
    /// Proficiency bonus twice.
    Expertise,
}

impl ProficiencyLevel {
    /// How many times the proficiency bonus applies.
    pub fn multiplier(self) -> i32 {
        match self {
            Self::Untrained => 0,
            Self::Proficient => 1,
            Self::Expertise => 2,
        }
    }
}

/// An item carried by a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Item name.
    pub name: String,
    /// How many are carried.
    #[serde(default = "one")]
    pub quantity: u32,
    /// Weight of one item in pounds.
    #[serde(default)]
    pub weight: f32,
}

fn one() -> u32 {
    1
}

/// A player character sheet.
///
/// Owned by the caller; the engines read it and return [`CharacterUpdate`]
/// records instead of mutating it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Class name (e.g. "fighter").
    #[serde(default)]
    pub class: String,
    /// Character level.
    pub level: u32,
    /// The six ability scores.
    pub ability_scores: AbilityScores,
    /// Hit points.
    pub hit_points: HitPoints,
    /// Armor class.
    pub armor_class: i32,
    /// Walking speed in feet.
    pub speed: u32,
    /// Hit dice for short rests.
    #[serde(default)]
    pub hit_dice: HitDicePool,
    /// Save and skill proficiencies.
    #[serde(default)]
    pub proficiencies: Proficiencies,
    /// Spell slots keyed by spell level.
    #[serde(default)]
    pub spell_slots: BTreeMap<u8, Resource>,
    /// Class resources (Ki, Rage, Action Surge).
    #[serde(default)]
    pub class_resources: Vec<Resource>,
    /// Carried items.
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    /// Conditions currently affecting the character.
    #[serde(default)]
    pub conditions: Vec<ActiveCondition>,
    /// Gold pieces.
    #[serde(default)]
    pub gold: u32,
}

impl Character {
    /// A level-1 character with average scores, 10 HP, AC 10, and 30 ft speed.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            class: String::new(),
            level: 1,
            ability_scores: AbilityScores::default(),
            hit_points: HitPoints::full(10),
            armor_class: 10,
            speed: 30,
            hit_dice: HitDicePool::default(),
            proficiencies: Proficiencies::default(),
            spell_slots: BTreeMap::new(),
            class_resources: Vec::new(),
            inventory: Vec::new(),
            conditions: Vec::new(),
            gold: 0,
        }
    }

    /// Set class and level.
    pub fn with_class(mut self, class: impl Into<String>, level: u32) -> Self {
        self.class = class.into();
        self.level = level;
        self.hit_dice.total = level;
        self.hit_dice.remaining = level;
        self
    }

    /// Set ability scores.
    pub fn with_scores(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = scores;
        self
    }

    /// Set maximum hit points and start at full.
    pub fn with_max_hp(mut self, max: i32) -> Self {
        self.hit_points = HitPoints::full(max);
        self
    }

    /// Set armor class.
    pub fn with_armor_class(mut self, ac: i32) -> Self {
        self.armor_class = ac;
        self
    }

    /// Set walking speed.
    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    /// Add a saving-throw proficiency.
    pub fn with_save_proficiency(mut self, ability: Ability) -> Self {
        self.proficiencies.saving_throws.push(ability);
        self
    }

    /// Add a skill proficiency.
    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.proficiencies.skills.push(skill);
        self
    }

    /// Add expertise in a skill.
    pub fn with_expertise(mut self, skill: Skill) -> Self {
        self.proficiencies.expertise.push(skill);
        self
    }

    /// Modifier for one of the character's abilities.
    pub fn modifier(&self, ability: Ability) -> i32 {
        self.ability_scores.modifier(ability)
    }

    /// Proficiency bonus for the character's level.
    pub fn proficiency_bonus(&self) -> i32 {
        proficiency_bonus(self.level)
    }

    /// Whether the character is proficient in saves with `ability`.
    pub fn has_save_proficiency(&self, ability: Ability) -> bool {
        self.proficiencies.saving_throws.contains(&ability)
    }

    /// Training level in a skill. Expertise wins over plain proficiency.
    pub fn skill_proficiency(&self, skill: Skill) -> ProficiencyLevel {
        if self.proficiencies.expertise.contains(&skill) {
            ProficiencyLevel::Expertise
        } else if self.proficiencies.skills.contains(&skill) {
            ProficiencyLevel::Proficient
        } else {
            ProficiencyLevel::Untrained
        }
    }

    /// Apply an update produced by an engine. Current HP is clamped to
    /// `[0, max]` and the condition list is replaced wholesale.
    pub fn apply_update(&mut self, update: &CharacterUpdate) {
        self.hit_points.current = update.current_hp.clamp(0, self.hit_points.max);
        self.conditions = update.conditions.clone();
    }
}

/// New values for the parts of a character an engine may change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterUpdate {
    /// Which character to update.
    pub character_id: String,
    /// New current hit points.
    pub current_hp: i32,
    /// New condition list.
    pub conditions: Vec<ActiveCondition>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;

    fn rogue() -> Character {
        Character::new("pc-1", "Vex")
            .with_class("rogue", 5)
            .with_scores(AbilityScores::new(8, 18, 12, 14, 10, 13))
            .with_save_proficiency(Ability::Dexterity)
            .with_skill(Skill::Perception)
            .with_skill(Skill::Stealth)
            .with_expertise(Skill::Stealth)
    }

    #[test]
    fn builder_sets_fields() {
        let c = rogue();
        assert_eq!(c.level, 5);
        assert_eq!(c.hit_dice.total, 5);
        assert_eq!(c.proficiency_bonus(), 3);
        assert_eq!(c.modifier(Ability::Dexterity), 4);
    }

    #[test]
    fn skill_proficiency_levels() {
        let c = rogue();
        assert_eq!(c.skill_proficiency(Skill::Stealth), ProficiencyLevel::Expertise);
        assert_eq!(c.skill_proficiency(Skill::Perception), ProficiencyLevel::Proficient);
        assert_eq!(c.skill_proficiency(Skill::Arcana), ProficiencyLevel::Untrained);
        assert_eq!(ProficiencyLevel::Expertise.multiplier(), 2);
    }

    #[test]
    fn save_proficiency() {
        let c = rogue();
        assert!(c.has_save_proficiency(Ability::Dexterity));
        assert!(!c.has_save_proficiency(Ability::Wisdom));
    }

    #[test]
    fn apply_update_clamps_hp() {
        let mut c = rogue().with_max_hp(30);
        c.apply_update(&CharacterUpdate {
            character_id: "pc-1".into(),
            current_hp: 45,
            conditions: vec![ActiveCondition::for_rounds(Condition::Prone, "Ogre", 1)],
        });
        assert_eq!(c.hit_points.current, 30);
        assert_eq!(c.conditions.len(), 1);

        c.apply_update(&CharacterUpdate {
            character_id: "pc-1".into(),
            current_hp: -4,
            conditions: Vec::new(),
        });
        assert_eq!(c.hit_points.current, 0);
        assert!(c.conditions.is_empty());
    }

    #[test]
    fn deserialize_minimal_sheet() {
        let json = r#"{
            "id": "pc-2",
            "name": "Bram",
            "level": 3,
            "ability_scores": {"strength": 16, "dexterity": 12, "constitution": 14,
                               "intelligence": 8, "wisdom": 10, "charisma": 10},
            "hit_points": {"current": 28, "max": 28},
            "armor_class": 16,
            "speed": 25
        }"#;
        let c: Character = serde_json::from_str(json).unwrap();
        assert_eq!(c.name, "Bram");
        assert_eq!(c.hit_points.temp, 0);
        assert!(c.inventory.is_empty());
        assert_eq!(c.proficiencies, Proficiencies::default());
    }
}
