//! Combat state machine.
//!
//! A [`Combat`] is built by [`CombatEngine::start_combat`], which owns the
//! dice. Everything after setup is deterministic and works in place through
//! `&mut Combat`; each call returns a small record describing what changed.
//! Clone the combat to keep history.

/// Combatants and their per-turn resources.
pub mod combatant;
/// Encounter setup and combat start.
pub mod engine;
/// Combat history.
pub mod log;
/// Records returned by combat operations.
pub mod outcome;

pub use combatant::{Combatant, CombatantKind, CombatantStatus, Side, TurnResources};
pub use engine::{CombatEngine, EncounterSetup, MonsterGroup};
pub use log::{CombatLog, CombatLogEntry, CombatLogKind};
pub use outcome::{
    CombatOutcome, CombatSummary, ConditionChange, DamageApplication, EndCheck,
    HealingApplication, TurnAdvance,
};

use serde::{Deserialize, Serialize};
use tt_core::condition::replace_condition;
use tt_core::{ActiveCondition, CharacterUpdate, Condition, DamageType, GridPosition};
use tt_spatial::{Distance, calculate_distance};
use uuid::Uuid;

use crate::error::{MechError, MechResult};

/// Lifecycle of a fight. A fight that has not started yet is an
/// [`EncounterSetup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatPhase {
    /// Turns are being taken.
    Active,
    /// The fight is over.
    Ended,
}

/// The state of a running fight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combat {
    /// Unique id of this fight.
    pub id: Uuid,
    /// Active or ended.
    pub phase: CombatPhase,
    /// Current round, starting at 1.
    pub round: u32,
    /// Combatants, highest initiative first.
    pub initiative_order: Vec<Combatant>,
    /// Index into `initiative_order` of whose turn it is.
    pub current_turn_index: usize,
    /// Ids of combatants surprised in round 1.
    #[serde(default)]
    pub surprised: Vec<String>,
    /// Battlefield effects (darkness, difficult terrain, fog).
    #[serde(default)]
    pub environmental_effects: Vec<String>,
    /// Set once [`Combat::end`] is called.
    #[serde(default)]
    pub outcome: Option<CombatOutcome>,
    /// What happened so far.
    #[serde(default)]
    pub log: CombatLog,
}

impl Combat {
    /// A fresh round-1 combat over combatants already in initiative order.
    pub fn new(id: Uuid, initiative_order: Vec<Combatant>, max_log_entries: usize) -> Self {
        Self {
            id,
            phase: CombatPhase::Active,
            round: 1,
            initiative_order,
            current_turn_index: 0,
            surprised: Vec::new(),
            environmental_effects: Vec::new(),
            outcome: None,
            log: CombatLog::new(max_log_entries),
        }
    }

    /// Whether turns are still being taken.
    pub fn is_active(&self) -> bool {
        self.phase == CombatPhase::Active
    }

    /// The combatant whose turn it is. `None` once the fight is over.
    pub fn current_combatant(&self) -> Option<&Combatant> {
        if !self.is_active() {
            return None;
        }
        self.initiative_order.get(self.current_turn_index)
    }

    /// Look up a combatant by id.
    pub fn combatant(&self, id: &str) -> MechResult<&Combatant> {
        self.initiative_order
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| MechError::CombatantNotFound(id.to_string()))
    }

    fn combatant_mut(&mut self, id: &str) -> MechResult<&mut Combatant> {
        self.initiative_order
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| MechError::CombatantNotFound(id.to_string()))
    }

    fn current_mut(&mut self) -> MechResult<&mut Combatant> {
        if !self.is_active() {
            return Err(MechError::CombatEnded);
        }
        self.initiative_order
            .get_mut(self.current_turn_index)
            .ok_or(MechError::NoActiveCombatant)
    }

    /// Whether a combatant was caught by surprise.
    pub fn is_surprised(&self, id: &str) -> bool {
        self.surprised.iter().any(|s| s == id)
    }

    /// End the current turn and move to the next active combatant.
    ///
    /// The combatant leaving its turn gets fresh resources for next round.
    /// Passing the end of the order starts a new round: round-limited
    /// conditions tick down and expire, and surprise wears off after
    /// round 1. If no combatant is active the fight ends.
    pub fn next_turn(&mut self) -> MechResult<TurnAdvance> {
        if !self.is_active() {
            return Err(MechError::CombatEnded);
        }
        let len = self.initiative_order.len();
        if let Some(leaving) = self.initiative_order.get_mut(self.current_turn_index) {
            leaving.resources = TurnResources::fresh(leaving.speed);
        }

        let mut index = self.current_turn_index;
        let mut wrapped = false;
        let mut next = None;
        for _ in 0..=len {
            index += 1;
            if index >= len {
                index = 0;
                wrapped = true;
            }
            if self.initiative_order.get(index).is_some_and(Combatant::is_active) {
                next = Some(index);
                break;
            }
        }

        let Some(index) = next else {
            tracing::warn!(combat = %self.id, round = self.round, "no active combatant left");
            self.phase = CombatPhase::Ended;
            return Ok(TurnAdvance {
                round: self.round,
                new_round: false,
                current: None,
                expired: Vec::new(),
            });
        };

        let mut expired = Vec::new();
        if wrapped {
            let finished = self.round;
            expired = self.end_round();
            if finished == 1 {
                self.surprised.clear();
            }
            self.round += 1;
            tracing::info!(combat = %self.id, round = self.round, "new round");
            self.log.push(
                self.round,
                CombatLogKind::RoundStarted,
                format!("Round {} begins", self.round),
            );
        }

        self.current_turn_index = index;
        let current = &self.initiative_order[index];
        let current_id = current.id.clone();
        let text = format!("{}'s turn", current.name);
        self.log.push(self.round, CombatLogKind::TurnStarted, text);

        Ok(TurnAdvance {
            round: self.round,
            new_round: wrapped,
            current: Some(current_id),
            expired,
        })
    }

    fn end_round(&mut self) -> Vec<(String, Condition)> {
        let mut expired = Vec::new();
        for combatant in &mut self.initiative_order {
            let mut kept = Vec::with_capacity(combatant.conditions.len());
            for mut active in combatant.conditions.drain(..) {
                if active.tick_round() {
                    expired.push((combatant.id.clone(), active.condition));
                } else {
                    kept.push(active);
                }
            }
            combatant.conditions = kept;
        }
        for (id, condition) in &expired {
            self.log.push(
                self.round,
                CombatLogKind::ConditionRemoved,
                format!("{condition} on {id} wears off"),
            );
        }
        expired
    }

    /// Deal damage, applying the target's resistance, immunity, or
    /// vulnerability. Hit points clamp at 0 and a target at 0 is defeated.
    pub fn apply_damage(
        &mut self,
        target_id: &str,
        amount: i32,
        damage_type: DamageType,
        source: &str,
    ) -> MechResult<DamageApplication> {
        let round = self.round;
        let target = self.combatant_mut(target_id)?;
        let amount = amount.max(0);
        let modifier = target.damage_modifier(damage_type);
        let damage_dealt = modifier.map_or(amount, |m| m.apply(amount));

        let previous_hp = target.current_hp;
        let new_hp = (previous_hp - damage_dealt).clamp(0, target.max_hp);
        target.current_hp = new_hp;
        let defeated = new_hp == 0 && target.status != CombatantStatus::Defeated;
        if new_hp == 0 {
            target.status = CombatantStatus::Defeated;
        }
        let name = target.name.clone();

        tracing::debug!(target = target_id, damage_dealt, new_hp, ?modifier, "damage applied");
        self.log.push(
            round,
            CombatLogKind::Damage,
            format!("{name} takes {damage_dealt} {damage_type} damage from {source} ({new_hp} HP left)"),
        );
        if defeated {
            self.log
                .push(round, CombatLogKind::Defeated, format!("{name} falls"));
        }

        Ok(DamageApplication {
            target_id: target_id.to_string(),
            previous_hp,
            new_hp,
            damage_dealt,
            modifier,
            defeated,
        })
    }

    /// Restore hit points, up to the maximum. Healing a defeated combatant
    /// from 0 brings it back into the fight.
    pub fn apply_healing(
        &mut self,
        target_id: &str,
        amount: i32,
        source: &str,
    ) -> MechResult<HealingApplication> {
        let round = self.round;
        let target = self.combatant_mut(target_id)?;
        let previous_hp = target.current_hp;
        let new_hp = (previous_hp + amount.max(0)).clamp(0, target.max_hp);
        target.current_hp = new_hp;
        let revived =
            previous_hp == 0 && new_hp > 0 && target.status == CombatantStatus::Defeated;
        if revived {
            target.status = CombatantStatus::Active;
        }
        let name = target.name.clone();

        self.log.push(
            round,
            CombatLogKind::Healing,
            format!("{name} regains {} HP from {source}", new_hp - previous_hp),
        );
        if revived {
            self.log
                .push(round, CombatLogKind::Revived, format!("{name} is back on their feet"));
        }

        Ok(HealingApplication {
            target_id: target_id.to_string(),
            previous_hp,
            new_hp,
            revived,
        })
    }

    /// Apply a condition. Monsters immune to it are unaffected; an existing
    /// instance of the same condition is replaced, source and duration
    /// included.
    pub fn add_condition(
        &mut self,
        target_id: &str,
        condition: ActiveCondition,
    ) -> MechResult<ConditionChange> {
        let round = self.round;
        let target = self.combatant_mut(target_id)?;
        if target
            .kind
            .stat_block()
            .is_some_and(|s| s.is_immune_to(&condition.condition))
        {
            return Ok(ConditionChange::Immune);
        }
        let previous = target
            .conditions
            .iter()
            .find(|c| c.condition == condition.condition)
            .cloned();
        let text = format!("{} is {} ({})", target.name, condition.condition, condition.source);
        replace_condition(&mut target.conditions, condition);
        self.log.push(round, CombatLogKind::ConditionApplied, text);

        Ok(match previous {
            Some(previous) => ConditionChange::Replaced(previous),
            None => ConditionChange::Applied,
        })
    }

    /// Remove a condition. Returns whether it was present.
    pub fn remove_condition(&mut self, target_id: &str, condition: &Condition) -> MechResult<bool> {
        let round = self.round;
        let target = self.combatant_mut(target_id)?;
        let before = target.conditions.len();
        target.conditions.retain(|c| &c.condition != condition);
        let removed = target.conditions.len() != before;
        if removed {
            let text = format!("{} is no longer {condition}", target.name);
            self.log.push(round, CombatLogKind::ConditionRemoved, text);
        }
        Ok(removed)
    }

    /// Check whether either side has been wiped out.
    ///
    /// Victory when the enemies are all down and the party is not; defeat
    /// when the party is down, including when both sides fall together.
    pub fn check_end(&self) -> EndCheck {
        let active_on = |side: Side| {
            self.initiative_order
                .iter()
                .filter(|c| c.is_active() && c.side() == side)
                .count()
        };
        let party = active_on(Side::Party);
        let enemies = active_on(Side::Enemies);
        let outcome = match (party, enemies) {
            (0, _) => Some(CombatOutcome::Defeat),
            (_, 0) => Some(CombatOutcome::Victory),
            _ => None,
        };
        EndCheck {
            should_end: outcome.is_some(),
            outcome,
        }
    }

    /// Finish the fight. Experience from defeated enemies is only awarded
    /// on victory.
    pub fn end(&mut self, outcome: CombatOutcome) -> MechResult<CombatSummary> {
        if self.outcome.is_some() {
            return Err(MechError::CombatEnded);
        }
        let defeated: Vec<&Combatant> = self
            .initiative_order
            .iter()
            .filter(|c| c.status == CombatantStatus::Defeated)
            .filter(|c| matches!(c.kind, CombatantKind::Enemy { .. }))
            .collect();
        let xp_earned = match outcome {
            CombatOutcome::Victory => defeated
                .iter()
                .filter_map(|c| c.kind.stat_block())
                .map(|s| s.xp)
                .sum(),
            _ => 0,
        };
        let summary = CombatSummary {
            outcome,
            xp_earned,
            rounds: self.round,
            defeated_enemies: defeated.iter().map(|c| c.id.clone()).collect(),
        };

        self.phase = CombatPhase::Ended;
        self.outcome = Some(outcome);
        tracing::info!(combat = %self.id, ?outcome, xp_earned, rounds = self.round, "combat ended");
        self.log.push(
            self.round,
            CombatLogKind::Ended,
            format!("Combat ends: {outcome:?}, {xp_earned} XP"),
        );
        Ok(summary)
    }

    /// Spend the current combatant's action. Returns whether it was
    /// still available.
    pub fn use_action(&mut self) -> MechResult<bool> {
        let current = self.current_mut()?;
        Ok(std::mem::replace(&mut current.resources.has_action, false))
    }

    /// Spend the current combatant's bonus action. Returns whether it was
    /// still available.
    pub fn use_bonus_action(&mut self) -> MechResult<bool> {
        let current = self.current_mut()?;
        Ok(std::mem::replace(&mut current.resources.has_bonus_action, false))
    }

    /// Spend movement for the current combatant, never going below zero.
    /// Returns the feet left.
    pub fn use_movement(&mut self, feet: u32) -> MechResult<u32> {
        let current = self.current_mut()?;
        let resources = &mut current.resources;
        resources.movement_remaining = resources.movement_remaining.saturating_sub(feet);
        Ok(resources.movement_remaining)
    }

    /// Spend any combatant's reaction. Returns whether it was still
    /// available.
    pub fn use_reaction(&mut self, combatant_id: &str) -> MechResult<bool> {
        let combatant = self.combatant_mut(combatant_id)?;
        Ok(std::mem::replace(&mut combatant.resources.has_reaction, false))
    }

    /// Place a combatant on the grid, or take it off with `None`.
    pub fn set_position(&mut self, combatant_id: &str, position: Option<GridPosition>) -> MechResult<()> {
        self.combatant_mut(combatant_id)?.position = position;
        Ok(())
    }

    /// Grid distance between two combatants, `None` unless both are placed.
    pub fn distance(&self, a: &str, b: &str) -> MechResult<Option<Distance>> {
        let a = self.combatant(a)?.position;
        let b = self.combatant(b)?.position;
        Ok(a.zip(b).map(|(a, b)| calculate_distance(a, b)))
    }

    /// Hit point and condition updates for every player character, to be
    /// applied to the sheets with [`tt_core::Character::apply_update`].
    pub fn character_updates(&self) -> Vec<CharacterUpdate> {
        self.initiative_order
            .iter()
            .filter_map(|c| match &c.kind {
                CombatantKind::Player { character_id } => Some(CharacterUpdate {
                    character_id: character_id.clone(),
                    current_hp: c.current_hp,
                    conditions: c.conditions.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}
