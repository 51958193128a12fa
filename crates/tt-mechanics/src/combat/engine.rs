use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tt_core::{Character, GridPosition, MonsterStatBlock};

use super::combatant::{Combatant, Side};
use super::log::CombatLogKind;
use super::Combat;
use crate::config::EngineConfig;
use crate::dice::{DiceEngine, DiceNotation, InitiativeEntrant};

/// Several instances of one monster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterGroup {
    /// The template.
    pub stat_block: MonsterStatBlock,
    /// How many to spawn.
    #[serde(default = "one")]
    pub count: u32,
    /// Base id for the instances. Defaults to the template id.
    #[serde(default)]
    pub id: Option<String>,
}

fn one() -> u32 {
    1
}

impl MonsterGroup {
    /// `count` copies of a stat block.
    pub fn new(stat_block: MonsterStatBlock, count: u32) -> Self {
        Self {
            stat_block,
            count,
            id: None,
        }
    }

    /// Override the base id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Everything needed to start a fight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncounterSetup {
    /// Player characters.
    #[serde(default)]
    pub players: Vec<Character>,
    /// Hostile monsters.
    #[serde(default)]
    pub enemies: Vec<MonsterGroup>,
    /// Friendly monsters and NPCs.
    #[serde(default)]
    pub allies: Vec<MonsterGroup>,
    /// Ids caught by surprise.
    #[serde(default)]
    pub surprised: Vec<String>,
    /// Battlefield effects.
    #[serde(default)]
    pub environmental_effects: Vec<String>,
    /// Starting grid positions by combatant id.
    #[serde(default)]
    pub positions: BTreeMap<String, GridPosition>,
}

impl EncounterSetup {
    /// An empty encounter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player character.
    pub fn with_player(mut self, character: Character) -> Self {
        self.players.push(character);
        self
    }

    /// Add hostile monsters.
    pub fn with_enemies(mut self, group: MonsterGroup) -> Self {
        self.enemies.push(group);
        self
    }

    /// Add friendly monsters.
    pub fn with_allies(mut self, group: MonsterGroup) -> Self {
        self.allies.push(group);
        self
    }

    /// Mark a combatant as surprised.
    pub fn with_surprised(mut self, id: impl Into<String>) -> Self {
        self.surprised.push(id.into());
        self
    }

    /// Add a battlefield effect.
    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.environmental_effects.push(effect.into());
        self
    }

    /// Place a combatant on the grid.
    pub fn with_position(mut self, id: impl Into<String>, position: GridPosition) -> Self {
        self.positions.insert(id.into(), position);
        self
    }
}

/// Starts fights: builds combatants, rolls hit points and initiative.
#[derive(Debug)]
pub struct CombatEngine {
    dice: DiceEngine,
    max_log_entries: usize,
}

impl Default for CombatEngine {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl CombatEngine {
    /// An engine rolling with `dice`.
    pub fn new(dice: DiceEngine) -> Self {
        Self {
            dice,
            max_log_entries: EngineConfig::default().max_log_entries,
        }
    }

    /// An engine with a seeded RNG.
    pub fn seeded(seed: u64) -> Self {
        Self::new(DiceEngine::seeded(seed))
    }

    /// An engine built from configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            dice: config.build_dice(),
            max_log_entries: config.max_log_entries,
        }
    }

    /// The dice, for attack and damage rolls during the fight.
    pub fn dice_mut(&mut self) -> &mut DiceEngine {
        &mut self.dice
    }

    /// Build every combatant, roll initiative, and begin round 1.
    ///
    /// Monster hit points are rolled from the stat block's hit dice, falling
    /// back to its fixed hit points when the notation does not parse. When a
    /// group has more than one member, or its base id was already used, each
    /// instance is numbered: `goblin-1` / "Goblin 1".
    pub fn start_combat(&mut self, setup: EncounterSetup) -> Combat {
        let mut combatants: Vec<Combatant> =
            setup.players.iter().map(Combatant::from_character).collect();

        let mut used: HashMap<String, u32> = HashMap::new();
        for (groups, side) in [(&setup.enemies, Side::Enemies), (&setup.allies, Side::Party)] {
            for group in groups {
                self.spawn_group(group, side, &mut used, &mut combatants);
            }
        }

        let entrants: Vec<InitiativeEntrant> = combatants
            .iter()
            .map(|c| InitiativeEntrant::new(c.id.clone(), c.name.clone(), c.initiative_modifier))
            .collect();
        let order = self.dice.roll_initiative(&entrants);

        let mut pool: Vec<Option<Combatant>> = combatants.into_iter().map(Some).collect();
        let mut initiative_order = Vec::with_capacity(pool.len());
        for result in &order {
            let slot = pool
                .iter_mut()
                .find(|slot| slot.as_ref().is_some_and(|c| c.id == result.id));
            if let Some(mut combatant) = slot.and_then(Option::take) {
                combatant.initiative = result.total;
                combatant.initiative_modifier = result.modifier;
                if let Some(position) = setup.positions.get(&combatant.id) {
                    combatant.position = Some(*position);
                }
                initiative_order.push(combatant);
            }
        }

        let id = self.dice.next_uuid();
        let mut combat = Combat::new(id, initiative_order, self.max_log_entries);
        combat.surprised = setup.surprised;
        combat.environmental_effects = setup.environmental_effects;

        let names: Vec<String> = combat
            .initiative_order
            .iter()
            .map(|c| format!("{} ({})", c.name, c.initiative))
            .collect();
        tracing::info!(combat = %combat.id, combatants = names.len(), "combat started");
        combat.log.push(
            1,
            CombatLogKind::Started,
            format!("Initiative: {}", names.join(", ")),
        );
        combat
    }

    fn spawn_group(
        &mut self,
        group: &MonsterGroup,
        side: Side,
        used: &mut HashMap<String, u32>,
        out: &mut Vec<Combatant>,
    ) {
        let block = &group.stat_block;
        let base = group.id.clone().unwrap_or_else(|| block.id.clone());
        for _ in 0..group.count {
            let n = used.entry(base.clone()).or_insert(0);
            *n += 1;
            let numbered = group.count > 1 || *n > 1;
            let (id, name) = if numbered {
                (format!("{base}-{n}"), format!("{} {n}", block.name))
            } else {
                (base.clone(), block.name.clone())
            };
            let hp = self.roll_hit_points(block);
            out.push(Combatant::from_monster(id, name, block, hp, side));
        }
    }

    fn roll_hit_points(&mut self, block: &MonsterStatBlock) -> i32 {
        match DiceNotation::parse(&block.hit_dice) {
            Ok(notation) => {
                let roll = self.dice.roll_notation(&notation, Some("hit points"));
                roll.total.max(1)
            }
            Err(_) => {
                tracing::warn!(
                    monster = %block.id,
                    hit_dice = %block.hit_dice,
                    fallback = block.hit_points,
                    "unparseable hit dice, using fixed hit points"
                );
                block.hit_points.max(1)
            }
        }
    }
}
