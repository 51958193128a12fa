use serde::{Deserialize, Serialize};
use tt_core::{Ability, ActiveCondition, Character, DamageModifier, DamageType, GridPosition, MonsterStatBlock};

/// Which side of the fight a combatant is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Player characters and their allies.
    Party,
    /// The opposition.
    Enemies,
}

/// What a combatant was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatantKind {
    /// A player character, referenced by id.
    Player {
        /// Id of the character sheet.
        character_id: String,
    },
    /// A hostile monster instance.
    Enemy {
        /// The template it was built from.
        stat_block: Box<MonsterStatBlock>,
    },
    /// A friendly monster or NPC instance.
    Ally {
        /// The template it was built from.
        stat_block: Box<MonsterStatBlock>,
    },
}

impl CombatantKind {
    /// The side this kind fights on.
    pub fn side(&self) -> Side {
        match self {
            Self::Player { .. } | Self::Ally { .. } => Side::Party,
            Self::Enemy { .. } => Side::Enemies,
        }
    }

    /// The monster template, for enemies and allies.
    pub fn stat_block(&self) -> Option<&MonsterStatBlock> {
        match self {
            Self::Player { .. } => None,
            Self::Enemy { stat_block } | Self::Ally { stat_block } => Some(stat_block),
        }
    }
}

/// Whether a combatant is still in the fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatantStatus {
    /// Taking turns.
    #[default]
    Active,
    /// Dropped to 0 hit points.
    Defeated,
    /// Left the battlefield.
    Fled,
}

/// What a combatant can still do this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResources {
    /// Action unused.
    pub has_action: bool,
    /// Bonus action unused.
    pub has_bonus_action: bool,
    /// Reaction unused. Reactions can be spent off-turn.
    pub has_reaction: bool,
    /// Feet of movement left.
    pub movement_remaining: u32,
}

impl TurnResources {
    /// Everything available, with a full `speed` of movement.
    pub fn fresh(speed: u32) -> Self {
        Self {
            has_action: true,
            has_bonus_action: true,
            has_reaction: true,
            movement_remaining: speed,
        }
    }
}

/// One participant in a combat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    /// Unique within the combat.
    pub id: String,
    /// Display name.
    pub name: String,
    /// What this combatant is.
    pub kind: CombatantKind,
    /// Initiative total.
    pub initiative: i32,
    /// Initiative modifier, used to break ties.
    pub initiative_modifier: i32,
    /// Current hit points.
    pub current_hp: i32,
    /// Maximum hit points.
    pub max_hp: i32,
    /// Armor class.
    pub armor_class: i32,
    /// Walking speed in feet.
    pub speed: u32,
    /// Conditions in effect.
    #[serde(default)]
    pub conditions: Vec<ActiveCondition>,
    /// In the fight or not.
    #[serde(default)]
    pub status: CombatantStatus,
    /// Per-turn resources.
    pub resources: TurnResources,
    /// Grid position, when fighting on a map.
    #[serde(default)]
    pub position: Option<GridPosition>,
}

impl Combatant {
    /// A combatant for a player character, using its current numbers.
    pub fn from_character(character: &Character) -> Self {
        let current_hp = character.hit_points.current.max(0);
        Self {
            id: character.id.clone(),
            name: character.name.clone(),
            kind: CombatantKind::Player {
                character_id: character.id.clone(),
            },
            initiative: 0,
            initiative_modifier: character.modifier(Ability::Dexterity),
            current_hp,
            max_hp: character.hit_points.max,
            armor_class: character.armor_class,
            speed: character.speed,
            conditions: character.conditions.clone(),
            status: if current_hp == 0 {
                CombatantStatus::Defeated
            } else {
                CombatantStatus::Active
            },
            resources: TurnResources::fresh(character.speed),
            position: None,
        }
    }

    /// A monster instance with `hp` hit points.
    pub fn from_monster(
        id: impl Into<String>,
        name: impl Into<String>,
        stat_block: &MonsterStatBlock,
        hp: i32,
        side: Side,
    ) -> Self {
        let boxed = Box::new(stat_block.clone());
        let kind = match side {
            Side::Party => CombatantKind::Ally { stat_block: boxed },
            Side::Enemies => CombatantKind::Enemy { stat_block: boxed },
        };
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            initiative: 0,
            initiative_modifier: stat_block.initiative_modifier(),
            current_hp: hp,
            max_hp: hp,
            armor_class: stat_block.armor_class,
            speed: stat_block.speed,
            conditions: Vec::new(),
            status: CombatantStatus::Active,
            resources: TurnResources::fresh(stat_block.speed),
            position: None,
        }
    }

    /// Whether this combatant still takes turns.
    pub fn is_active(&self) -> bool {
        self.status == CombatantStatus::Active
    }

    /// Which side this combatant fights on.
    pub fn side(&self) -> Side {
        self.kind.side()
    }

    /// Resistance, immunity, or vulnerability to a damage type.
    /// Player characters have none.
    pub fn damage_modifier(&self, damage_type: DamageType) -> Option<DamageModifier> {
        self.kind
            .stat_block()
            .and_then(|s| s.damage_modifier(damage_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tt_core::AbilityScores;

    #[test]
    fn player_starts_with_current_hp() {
        let mut pc = Character::new("pc", "Aria")
            .with_max_hp(30)
            .with_speed(25)
            .with_scores(AbilityScores::new(10, 14, 10, 10, 10, 10));
        pc.hit_points.current = 12;
        let c = Combatant::from_character(&pc);
        assert_eq!(c.current_hp, 12);
        assert_eq!(c.max_hp, 30);
        assert_eq!(c.initiative_modifier, 2);
        assert_eq!(c.resources.movement_remaining, 25);
        assert!(c.is_active());
        assert_eq!(c.side(), Side::Party);
    }

    #[test]
    fn unconscious_player_starts_defeated() {
        let mut pc = Character::new("pc", "Aria");
        pc.hit_points.current = 0;
        assert_eq!(Combatant::from_character(&pc).status, CombatantStatus::Defeated);
    }

    #[test]
    fn monster_defenses_come_from_the_stat_block() {
        let mut skeleton = MonsterStatBlock::new("skeleton", "Skeleton", 13, 13, "2d8+4");
        skeleton.damage_vulnerabilities.push(DamageType::Bludgeoning);
        let c = Combatant::from_monster("s1", "Skeleton", &skeleton, 13, Side::Enemies);
        assert_eq!(c.damage_modifier(DamageType::Bludgeoning), Some(DamageModifier::Vulnerable));
        assert_eq!(c.damage_modifier(DamageType::Fire), None);

        let ally = Combatant::from_monster("s2", "Skeleton", &skeleton, 13, Side::Party);
        assert!(matches!(ally.kind, CombatantKind::Ally { .. }));
    }
}
