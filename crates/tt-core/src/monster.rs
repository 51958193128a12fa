use serde::{Deserialize, Serialize};

use crate::ability::{Ability, AbilityScores};
use crate::condition::Condition;
use crate::damage::{DamageModifier, DamageType};

/// An action listed in a stat block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterAction {
    /// Action name ("Scimitar").
    pub name: String,
    /// To-hit bonus for attack actions.
    #[serde(default)]
    pub attack_bonus: Option<i32>,
    /// Damage dice notation ("1d6+2").
    #[serde(default)]
    pub damage_dice: Option<String>,
    /// Damage type dealt.
    #[serde(default)]
    pub damage_type: Option<DamageType>,
    /// Rules text.
    #[serde(default)]
    pub description: String,
}

/// A static monster template. Immutable once loaded; combat works on
/// per-instance copies of the numbers it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterStatBlock {
    /// Template identifier ("goblin").
    pub id: String,
    /// Display name ("Goblin").
    pub name: String,
    /// Armor class.
    pub armor_class: i32,
    /// Average hit points, used when `hit_dice` cannot be rolled.
    pub hit_points: i32,
    /// Hit dice notation rolled for each instance ("2d6").
    pub hit_dice: String,
    /// Walking speed in feet.
    pub speed: u32,
    /// The six ability scores.
    pub ability_scores: AbilityScores,
    /// Damage types dealt half damage.
    #[serde(default)]
    pub damage_resistances: Vec<DamageType>,
    /// Damage types dealt no damage.
    #[serde(default)]
    pub damage_immunities: Vec<DamageType>,
    /// Damage types dealt double damage.
    #[serde(default)]
    pub damage_vulnerabilities: Vec<DamageType>,
    /// Conditions that cannot be applied.
    #[serde(default)]
    pub condition_immunities: Vec<Condition>,
    /// Available actions.
    #[serde(default)]
    pub actions: Vec<MonsterAction>,
    /// Challenge rating as written ("1/4").
    #[serde(default)]
    pub challenge_rating: String,
    /// Experience awarded when defeated.
    pub xp: u32,
}

impl MonsterStatBlock {
    /// A stat block with the given core numbers and no special defenses.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        armor_class: i32,
        hit_points: i32,
        hit_dice: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            armor_class,
            hit_points,
            hit_dice: hit_dice.into(),
            speed: 30,
            ability_scores: AbilityScores::default(),
            damage_resistances: Vec::new(),
            damage_immunities: Vec::new(),
            damage_vulnerabilities: Vec::new(),
            condition_immunities: Vec::new(),
            actions: Vec::new(),
            challenge_rating: String::new(),
            xp: 0,
        }
    }

    /// Set ability scores.
    pub fn with_scores(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = scores;
        self
    }

    /// Set experience value.
    pub fn with_xp(mut self, xp: u32) -> Self {
        self.xp = xp;
        self
    }

    /// Set walking speed.
    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    /// How this monster responds to a damage type. Immunity is checked
    /// first, then resistance, then vulnerability; at most one applies.
    pub fn damage_modifier(&self, damage_type: DamageType) -> Option<DamageModifier> {
        if self.damage_immunities.contains(&damage_type) {
            Some(DamageModifier::Immune)
        } else if self.damage_resistances.contains(&damage_type) {
            Some(DamageModifier::Resistant)
        } else if self.damage_vulnerabilities.contains(&damage_type) {
            Some(DamageModifier::Vulnerable)
        } else {
            None
        }
    }

    /// Whether a condition can be applied to this monster.
    pub fn is_immune_to(&self, condition: &Condition) -> bool {
        self.condition_immunities.contains(condition)
    }

    /// Initiative modifier (Dexterity).
    pub fn initiative_modifier(&self) -> i32 {
        self.ability_scores.modifier(Ability::Dexterity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skeleton() -> MonsterStatBlock {
        let mut m = MonsterStatBlock::new("skeleton", "Skeleton", 13, 13, "2d8+4")
            .with_scores(AbilityScores::new(10, 14, 15, 6, 8, 5))
            .with_xp(50);
        m.damage_vulnerabilities.push(DamageType::Bludgeoning);
        m.damage_immunities.push(DamageType::Poison);
        m.condition_immunities.push(Condition::Poisoned);
        m
    }

    #[test]
    fn damage_modifiers() {
        let m = skeleton();
        assert_eq!(
            m.damage_modifier(DamageType::Bludgeoning),
            Some(DamageModifier::Vulnerable)
        );
        assert_eq!(
            m.damage_modifier(DamageType::Poison),
            Some(DamageModifier::Immune)
        );
        assert_eq!(m.damage_modifier(DamageType::Fire), None);
    }

    #[test]
    fn condition_immunity() {
        let m = skeleton();
        assert!(m.is_immune_to(&Condition::Poisoned));
        assert!(!m.is_immune_to(&Condition::Prone));
    }

    #[test]
    fn initiative_from_dex() {
        assert_eq!(skeleton().initiative_modifier(), 2);
    }

    #[test]
    fn deserialize_stat_block() {
        let json = r#"{
            "id": "goblin", "name": "Goblin", "armor_class": 15,
            "hit_points": 7, "hit_dice": "2d6", "speed": 30,
            "ability_scores": {"strength": 8, "dexterity": 14, "constitution": 10,
                               "intelligence": 10, "wisdom": 8, "charisma": 8},
            "condition_immunities": ["charmed"],
            "xp": 50
        }"#;
        let m: MonsterStatBlock = serde_json::from_str(json).unwrap();
        assert_eq!(m.name, "Goblin");
        assert!(m.is_immune_to(&Condition::Charmed));
        assert!(m.actions.is_empty());
    }
}
