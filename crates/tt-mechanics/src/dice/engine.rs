//! The dice engine: every roll the rules need, from one random source.

use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tt_core::{Ability, Character, Skill};
use uuid::Uuid;

use super::notation::{DiceNotation, saturate};
use super::random::RandomSource;
use super::result::{
    AbilityCheckResult, AdvantageStatus, AttackRollResult, BasicRollResult, D20Roll,
    DamageComponent, DamageRequest, DamageRollResult, DeathSaveResult, InitiativeEntrant,
    InitiativeRollResult, SavingThrowResult,
};
use crate::error::MechResult;

/// Rolls dice through an injected [`RandomSource`].
///
/// Two engines built from the same seed produce identical results for the
/// same sequence of calls.
pub struct DiceEngine {
    source: Box<dyn RandomSource + Send>,
}

impl fmt::Debug for DiceEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiceEngine").finish_non_exhaustive()
    }
}

impl Default for DiceEngine {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl DiceEngine {
    /// Roll with the given random source.
    pub fn new(source: impl RandomSource + Send + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Roll with a `StdRng` seeded from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Roll with a `StdRng` seeded from OS entropy. Not reproducible.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// A version 4 UUID drawn from this engine's source, so seeded engines
    /// hand out the same ids.
    pub fn next_uuid(&mut self) -> Uuid {
        uuid::Builder::from_random_bytes(self.source.next_id_bytes()).into_uuid()
    }

    /// One die, uniform in `1..=sides`.
    pub fn roll_die(&mut self, sides: u32) -> u32 {
        let sides = sides.max(1);
        let unit = self.source.next_unit();
        let face = (unit * f64::from(sides)).floor() as u32 + 1;
        face.clamp(1, sides)
    }

    /// `count` dice with `sides` sides each.
    pub fn roll_dice(&mut self, count: u32, sides: u32) -> Vec<u32> {
        (0..count).map(|_| self.roll_die(sides)).collect()
    }

    /// Parse and roll a notation string.
    pub fn roll(&mut self, notation: &str, reason: Option<&str>) -> MechResult<BasicRollResult> {
        let parsed = DiceNotation::parse(notation)?;
        Ok(self.roll_notation(&parsed, reason))
    }

    /// Roll an already parsed notation.
    pub fn roll_notation(&mut self, notation: &DiceNotation, reason: Option<&str>) -> BasicRollResult {
        let rolls = self.roll_dice(notation.count, notation.sides);
        let total = roll_total(&rolls, notation.modifier);
        tracing::debug!(%notation, ?rolls, total, reason, "dice rolled");
        BasicRollResult {
            notation: *notation,
            rolls,
            modifier: notation.modifier,
            total,
            reason: reason.map(str::to_string),
        }
    }

    /// Two d20, keep the higher.
    pub fn roll_with_advantage(&mut self) -> D20Roll {
        let rolls = self.roll_dice(2, 20);
        let chosen = rolls[0].max(rolls[1]);
        D20Roll {
            rolls,
            chosen,
            advantage: AdvantageStatus::Advantage,
        }
    }

    /// Two d20, keep the lower.
    pub fn roll_with_disadvantage(&mut self) -> D20Roll {
        let rolls = self.roll_dice(2, 20);
        let chosen = rolls[0].min(rolls[1]);
        D20Roll {
            rolls,
            chosen,
            advantage: AdvantageStatus::Disadvantage,
        }
    }

    /// A d20 rolled the way `advantage` says.
    pub fn roll_d20(&mut self, advantage: AdvantageStatus) -> D20Roll {
        match advantage {
            AdvantageStatus::Normal => {
                let chosen = self.roll_die(20);
                D20Roll {
                    rolls: vec![chosen],
                    chosen,
                    advantage,
                }
            }
            AdvantageStatus::Advantage => self.roll_with_advantage(),
            AdvantageStatus::Disadvantage => self.roll_with_disadvantage(),
        }
    }

    /// Roll to hit.
    ///
    /// A natural 20 always hits and a natural 1 always misses. Otherwise the
    /// attack hits when `d20 + attack_bonus >= target_ac`.
    pub fn roll_attack(
        &mut self,
        attacker: &str,
        target: &str,
        weapon: &str,
        attack_bonus: i32,
        target_ac: i32,
        advantage: AdvantageStatus,
    ) -> AttackRollResult {
        let roll = self.roll_d20(advantage);
        let total = (roll.chosen as i32).saturating_add(attack_bonus);
        let is_critical_hit = roll.is_natural_20();
        let is_critical_miss = roll.is_natural_1();
        let hits = if is_critical_hit {
            true
        } else if is_critical_miss {
            false
        } else {
            total >= target_ac
        };
        tracing::debug!(attacker, target, weapon, d20 = roll.chosen, total, target_ac, hits, "attack rolled");
        AttackRollResult {
            attacker: attacker.to_string(),
            target: target.to_string(),
            weapon: weapon.to_string(),
            roll,
            attack_bonus,
            total,
            target_ac,
            hits,
            is_critical_hit,
            is_critical_miss,
        }
    }

    /// Roll damage.
    ///
    /// On a critical hit the number of dice doubles for the primary damage
    /// and for every rider; flat modifiers are added once. The total never
    /// drops below zero.
    pub fn roll_damage(&mut self, request: &DamageRequest) -> MechResult<DamageRollResult> {
        let mut primary_dice = DiceNotation::parse(&request.dice)?;
        primary_dice.modifier = primary_dice.modifier.saturating_add(request.modifier);
        let primary = self.roll_component(primary_dice, request.damage_type, request.is_critical);

        let mut additional = Vec::with_capacity(request.additional.len());
        for extra in &request.additional {
            let dice = DiceNotation::parse(&extra.dice)?;
            additional.push(self.roll_component(dice, extra.damage_type, request.is_critical));
        }

        let base_damage = primary.total;
        let extra = saturate(additional.iter().map(|c| i64::from(c.total)).sum());
        let total_damage = base_damage.saturating_add(extra).max(0);
        tracing::debug!(dice = %request.dice, critical = request.is_critical, total_damage, "damage rolled");
        Ok(DamageRollResult {
            primary,
            additional,
            base_damage,
            total_damage,
            is_critical: request.is_critical,
        })
    }

    fn roll_component(
        &mut self,
        notation: DiceNotation,
        damage_type: tt_core::DamageType,
        critical: bool,
    ) -> DamageComponent {
        let notation = if critical {
            notation.doubled_dice()
        } else {
            notation
        };
        let rolls = self.roll_dice(notation.count, notation.sides);
        let total = roll_total(&rolls, notation.modifier);
        DamageComponent {
            notation,
            damage_type,
            rolls,
            total,
        }
    }

    /// Ability check, optionally with a skill.
    ///
    /// Proficiency applies only when the character is proficient in the
    /// skill, twice with expertise. Natural 20 and 1 are reported but do
    /// not decide the outcome.
    pub fn roll_ability_check(
        &mut self,
        character: &Character,
        ability: Ability,
        skill: Option<Skill>,
        dc: i32,
        advantage: AdvantageStatus,
    ) -> AbilityCheckResult {
        let roll = self.roll_d20(advantage);
        let ability_modifier = character.modifier(ability);
        let proficiency_bonus = skill
            .map(|s| character.skill_proficiency(s).multiplier() * character.proficiency_bonus())
            .unwrap_or(0);
        let total = roll.chosen as i32 + ability_modifier + proficiency_bonus;
        let success = total >= dc;
        tracing::debug!(character = %character.id, %ability, ?skill, total, dc, success, "ability check");
        AbilityCheckResult {
            character_id: character.id.clone(),
            ability,
            skill,
            natural_20: roll.is_natural_20(),
            natural_1: roll.is_natural_1(),
            roll,
            ability_modifier,
            proficiency_bonus,
            total,
            dc,
            success,
        }
    }

    /// Saving throw. Proficiency applies only for proficient saves.
    pub fn roll_saving_throw(
        &mut self,
        character: &Character,
        ability: Ability,
        dc: i32,
        advantage: AdvantageStatus,
    ) -> SavingThrowResult {
        let roll = self.roll_d20(advantage);
        let ability_modifier = character.modifier(ability);
        let proficiency_bonus = if character.has_save_proficiency(ability) {
            character.proficiency_bonus()
        } else {
            0
        };
        let total = roll.chosen as i32 + ability_modifier + proficiency_bonus;
        let success = total >= dc;
        tracing::debug!(character = %character.id, %ability, total, dc, success, "saving throw");
        SavingThrowResult {
            character_id: character.id.clone(),
            ability,
            natural_20: roll.is_natural_20(),
            natural_1: roll.is_natural_1(),
            roll,
            ability_modifier,
            proficiency_bonus,
            total,
            dc,
            success,
        }
    }

    /// Roll initiative for everyone, highest first.
    ///
    /// Ties on total go to the higher modifier; remaining ties keep input
    /// order.
    pub fn roll_initiative(&mut self, entrants: &[InitiativeEntrant]) -> Vec<InitiativeRollResult> {
        let mut results: Vec<InitiativeRollResult> = entrants
            .iter()
            .map(|e| {
                let roll = self.roll_die(20);
                InitiativeRollResult {
                    id: e.id.clone(),
                    name: e.name.clone(),
                    roll,
                    modifier: e.modifier,
                    total: (roll as i32).saturating_add(e.modifier),
                }
            })
            .collect();
        results.sort_by(|a, b| (b.total, b.modifier).cmp(&(a.total, a.modifier)));
        tracing::debug!(count = results.len(), "initiative rolled");
        results
    }

    /// Death saving throw: 10 or higher succeeds, a natural 20 stabilizes,
    /// a natural 1 counts as two failures.
    pub fn roll_death_save(&mut self) -> DeathSaveResult {
        let roll = self.roll_die(20);
        DeathSaveResult {
            roll,
            success: roll >= 10,
            stabilized: roll == 20,
            counts_double: roll == 1,
        }
    }
}

fn roll_total(rolls: &[u32], modifier: i32) -> i32 {
    saturate(rolls.iter().map(|r| i64::from(*r)).sum::<i64>() + i64::from(modifier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::random::ScriptedRandom;
    use crate::error::MechError;
    use proptest::prelude::*;
    use tt_core::{AbilityScores, DamageType};

    fn scripted(sides: u32, faces: &[u32]) -> DiceEngine {
        DiceEngine::new(ScriptedRandom::faces(sides, faces))
    }

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
    fn seeded_engines_agree() {
        let mut a = DiceEngine::seeded(42);
        let mut b = DiceEngine::seeded(42);
        assert_eq!(a.roll_dice(10, 20), b.roll_dice(10, 20));
    }

    #[test]
    fn dice_stay_in_range() {
        let mut dice = DiceEngine::seeded(7);
        for sides in [4, 6, 8, 10, 12, 20, 100] {
            for face in dice.roll_dice(200, sides) {
                assert!((1..=sides).contains(&face));
            }
        }
    }

    #[test]
    fn out_of_range_source_is_clamped() {
        let mut dice = DiceEngine::new(ScriptedRandom::new(vec![1.0, -0.5]));
        assert_eq!(dice.roll_die(6), 6);
        assert_eq!(dice.roll_die(6), 1);
    }

    #[test]
    fn roll_sums_with_modifier() {
        let mut dice = scripted(6, &[3, 5]);
        let result = dice.roll("2d6+4", Some("test")).unwrap();
        assert_eq!(result.rolls, vec![3, 5]);
        assert_eq!(result.total, 12);
        assert_eq!(result.reason.as_deref(), Some("test"));
        assert!(dice.roll("banana", None).is_err());
    }

    #[test]
    fn oversized_notation_is_rejected() {
        let mut dice = DiceEngine::seeded(1);
        for bad in ["1d6+2147483647", "100000d100000", "1d99999"] {
            assert!(matches!(dice.roll(bad, None), Err(MechError::InvalidNotation(_))));
        }
    }

    #[test]
    fn totals_saturate() {
        let mut dice = scripted(6, &[6]);
        let roll = dice.roll_notation(&DiceNotation::new(3, 6, i32::MAX), None);
        assert_eq!(roll.total, i32::MAX);

        let request = DamageRequest::new("1d6+1000000", DamageType::Force)
            .with_modifier(i32::MAX)
            .critical(true)
            .with_extra("1d6+1000000", DamageType::Fire, "rider")
            .with_extra("1d6+1000000", DamageType::Cold, "rider");
        let damage = dice.roll_damage(&request).unwrap();
        assert_eq!(damage.base_damage, i32::MAX);
        assert_eq!(damage.total_damage, i32::MAX);

        let attack = dice.roll_attack("a", "b", "c", i32::MAX, 10, AdvantageStatus::Normal);
        assert_eq!(attack.total, i32::MAX);

        let order = dice.roll_initiative(&[InitiativeEntrant::new("x", "X", i32::MAX)]);
        assert_eq!(order[0].total, i32::MAX);
    }

    #[test]
    fn seeded_engines_share_ids() {
        let mut a = DiceEngine::seeded(5);
        let mut b = DiceEngine::seeded(5);
        assert_eq!(a.next_uuid(), b.next_uuid());
        assert_eq!(a.next_uuid().get_version_num(), 4);
    }

    #[test]
    fn advantage_and_disadvantage() {
        let mut dice = scripted(20, &[7, 15]);
        let adv = dice.roll_d20(AdvantageStatus::Advantage);
        assert_eq!(adv.rolls, vec![7, 15]);
        assert_eq!(adv.chosen, 15);
        let dis = dice.roll_d20(AdvantageStatus::Disadvantage);
        assert_eq!(dis.chosen, 7);
        let plain = dice.roll_d20(AdvantageStatus::Normal);
        assert_eq!(plain.rolls.len(), 1);
    }

    #[test]
    fn natural_20_always_hits() {
        let mut dice = scripted(20, &[20]);
        let attack = dice.roll_attack("pc", "dragon", "dagger", -5, 30, AdvantageStatus::Normal);
        assert!(attack.hits);
        assert!(attack.is_critical_hit);
    }

    #[test]
    fn natural_1_always_misses() {
        let mut dice = scripted(20, &[1]);
        let attack = dice.roll_attack("pc", "rat", "sword", 40, 5, AdvantageStatus::Normal);
        assert!(!attack.hits);
        assert!(attack.is_critical_miss);
    }

    #[test]
    fn attack_meets_ac() {
        let mut dice = scripted(20, &[10, 9]);
        assert!(dice.roll_attack("a", "b", "c", 5, 15, AdvantageStatus::Normal).hits);
        assert!(!dice.roll_attack("a", "b", "c", 5, 15, AdvantageStatus::Normal).hits);
    }

    #[test]
    fn critical_doubles_dice_not_modifier() {
        let mut dice = scripted(6, &[6]);
        let request = DamageRequest::new("2d6", DamageType::Slashing)
            .with_modifier(3)
            .critical(true)
            .with_extra("1d6", DamageType::Fire, "Flame Tongue");
        let result = dice.roll_damage(&request).unwrap();
        assert_eq!(result.primary.rolls.len(), 4);
        assert_eq!(result.primary.notation, DiceNotation::new(4, 6, 3));
        assert_eq!(result.base_damage, 27);
        assert_eq!(result.additional[0].rolls.len(), 2);
        assert_eq!(result.total_damage, 39);
    }

    #[test]
    fn damage_never_negative() {
        let mut dice = scripted(4, &[1]);
        let request = DamageRequest::new("1d4", DamageType::Bludgeoning).with_modifier(-5);
        let result = dice.roll_damage(&request).unwrap();
        assert_eq!(result.base_damage, -4);
        assert_eq!(result.total_damage, 0);
    }

    #[test]
    fn bad_rider_notation_is_an_error() {
        let mut dice = DiceEngine::seeded(1);
        let request =
            DamageRequest::new("1d8", DamageType::Piercing).with_extra("lots", DamageType::Fire, "?");
        assert!(dice.roll_damage(&request).is_err());
    }

    #[test]
    fn expertise_doubles_proficiency() {
        let c = rogue();
        let mut dice = scripted(20, &[10]);
        let stealth = dice.roll_ability_check(
            &c,
            Ability::Dexterity,
            Some(Skill::Stealth),
            20,
            AdvantageStatus::Normal,
        );
        assert_eq!(stealth.proficiency_bonus, 6);
        assert_eq!(stealth.total, 20);
        assert!(stealth.success);

        let arcana =
            dice.roll_ability_check(&c, Ability::Intelligence, Some(Skill::Arcana), 15, AdvantageStatus::Normal);
        assert_eq!(arcana.proficiency_bonus, 0);
        assert_eq!(arcana.total, 12);
        assert!(!arcana.success);
    }

    #[test]
    fn natural_20_does_not_force_check_success() {
        let c = rogue();
        let mut dice = scripted(20, &[20]);
        let check = dice.roll_ability_check(&c, Ability::Strength, None, 25, AdvantageStatus::Normal);
        assert!(check.natural_20);
        assert!(!check.success);
    }

    #[test]
    fn saving_throw_proficiency() {
        let c = rogue();
        let mut dice = scripted(20, &[10]);
        let dex = dice.roll_saving_throw(&c, Ability::Dexterity, 17, AdvantageStatus::Normal);
        assert_eq!(dex.total, 17);
        assert!(dex.success);
        let wis = dice.roll_saving_throw(&c, Ability::Wisdom, 11, AdvantageStatus::Normal);
        assert_eq!(wis.proficiency_bonus, 0);
        assert_eq!(wis.total, 10);
        assert!(!wis.success);
    }

    #[test]
    fn initiative_tie_breaks_on_modifier() {
        let mut dice = scripted(20, &[12, 10, 14]);
        let order = dice.roll_initiative(&[
            InitiativeEntrant::new("a", "Slow", 0),
            InitiativeEntrant::new("b", "Quick", 2),
            InitiativeEntrant::new("c", "Clumsy", -2),
        ]);
        let ids: Vec<&str> = order.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert!(order.iter().all(|r| r.total == 12));
    }

    #[test]
    fn death_saves() {
        let mut dice = scripted(20, &[20, 1, 10, 9]);
        let nat20 = dice.roll_death_save();
        assert!(nat20.success && nat20.stabilized);
        let nat1 = dice.roll_death_save();
        assert!(!nat1.success && nat1.counts_double);
        assert!(dice.roll_death_save().success);
        assert!(!dice.roll_death_save().success);
    }

    proptest! {
        #[test]
        fn natural_rolls_decide_attacks(face in 1u32..=20, bonus in -20i32..40, ac in 0i32..40) {
            let mut dice = scripted(20, &[face]);
            let attack = dice.roll_attack("a", "b", "c", bonus, ac, AdvantageStatus::Normal);
            if face == 20 {
                prop_assert!(attack.hits);
            }
            if face == 1 {
                prop_assert!(!attack.hits);
            }
            if face != 1 && face != 20 {
                prop_assert_eq!(attack.hits, face as i32 + bonus >= ac);
            }
        }

        #[test]
        fn damage_total_is_never_negative(seed in any::<u64>(), count in 1u32..5, modifier in -30i32..10, crit: bool) {
            let mut dice = DiceEngine::seeded(seed);
            let request = DamageRequest::new(format!("{count}d8"), DamageType::Cold)
                .with_modifier(modifier)
                .critical(crit);
            let result = dice.roll_damage(&request).unwrap();
            prop_assert!(result.total_damage >= 0);
            let expected_dice = if crit { count * 2 } else { count };
            prop_assert_eq!(result.primary.rolls.len() as u32, expected_dice);
        }

        #[test]
        fn initiative_is_sorted(seed in any::<u64>(), mods in prop::collection::vec(-3i32..6, 0..12)) {
            let entrants: Vec<InitiativeEntrant> = mods
                .iter()
                .enumerate()
                .map(|(i, m)| InitiativeEntrant::new(format!("c{i}"), format!("C{i}"), *m))
                .collect();
            let mut dice = DiceEngine::seeded(seed);
            let order = dice.roll_initiative(&entrants);
            prop_assert_eq!(order.len(), entrants.len());
            for pair in order.windows(2) {
                prop_assert!((pair[0].total, pair[0].modifier) >= (pair[1].total, pair[1].modifier));
            }
        }
    }
}
