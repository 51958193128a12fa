//! Whole fights driven through the public combat and dice API.

use tt_core::{Ability, AbilityScores, Character, DamageType, GridPosition, MonsterStatBlock};
use tt_mechanics::{
    AdvantageStatus, CombatEngine, CombatOutcome, CombatantStatus, DamageRequest, DiceEngine,
    EncounterSetup, MonsterGroup, ScriptedRandom,
};

fn fighter() -> Character {
    Character::new("pc-fighter", "Brakka")
        .with_class("fighter", 5)
        .with_scores(AbilityScores::new(16, 14, 14, 10, 12, 8))
        .with_max_hp(44)
        .with_armor_class(18)
        .with_save_proficiency(Ability::Strength)
        .with_save_proficiency(Ability::Constitution)
}

fn goblin() -> MonsterStatBlock {
    MonsterStatBlock::new("goblin", "Goblin", 15, 7, "2d6")
        .with_scores(AbilityScores::new(8, 14, 10, 10, 8, 8))
        .with_xp(50)
}

#[test]
fn fighter_crits_goblin_to_victory() {
    // Goblin HP 3+4, initiative 15 vs 10, attack 20, longsword 6+5.
    let script = ScriptedRandom::faces(6, &[3, 4])
        .then(15, 20)
        .then(10, 20)
        .then(20, 20)
        .then(6, 8)
        .then(5, 8);
    let mut engine = CombatEngine::new(DiceEngine::new(script));

    let mut combat = engine.start_combat(
        EncounterSetup::new()
            .with_player(fighter())
            .with_enemies(MonsterGroup::new(goblin(), 1))
            .with_position("pc-fighter", GridPosition::new(0, 0))
            .with_position("goblin", GridPosition::new(1, 1)),
    );

    let goblin_hp = combat.combatant("goblin").unwrap().current_hp;
    assert_eq!(goblin_hp, 7);
    let current = combat.current_combatant().unwrap();
    assert_eq!(current.id, "pc-fighter");
    assert_eq!(current.initiative, 17);
    assert_eq!(combat.distance("pc-fighter", "goblin").unwrap().unwrap().feet, 5);

    let goblin_ac = combat.combatant("goblin").unwrap().armor_class;
    let attack = engine.dice_mut().roll_attack(
        "Brakka",
        "Goblin",
        "longsword",
        -10,
        goblin_ac,
        AdvantageStatus::Normal,
    );
    assert!(attack.is_critical_hit);
    assert!(attack.hits);
    assert!(combat.use_action().unwrap());

    let damage = engine
        .dice_mut()
        .roll_damage(
            &DamageRequest::new("1d8", DamageType::Slashing)
                .with_modifier(3)
                .critical(attack.is_critical_hit),
        )
        .unwrap();
    assert_eq!(damage.primary.rolls, vec![6, 5]);
    assert_eq!(damage.total_damage, 14);

    let applied = combat
        .apply_damage("goblin", damage.total_damage, DamageType::Slashing, "longsword")
        .unwrap();
    assert_eq!(applied.previous_hp, goblin_hp);
    assert_eq!(applied.new_hp, 0);
    assert!(applied.defeated);
    assert_eq!(
        combat.combatant("goblin").unwrap().status,
        CombatantStatus::Defeated
    );

    let check = combat.check_end();
    assert!(check.should_end);
    assert_eq!(check.outcome, Some(CombatOutcome::Victory));

    let summary = combat.end(CombatOutcome::Victory).unwrap();
    assert_eq!(summary.xp_earned, 50);
    assert_eq!(summary.rounds, 1);

    let mut sheet = fighter();
    for update in combat.character_updates() {
        sheet.apply_update(&update);
    }
    assert_eq!(sheet.hit_points.current, 44);
}

#[test]
fn seeded_brawl_runs_to_an_end() {
    let mut engine = CombatEngine::seeded(2024);
    let mut combat = engine.start_combat(
        EncounterSetup::new()
            .with_player(fighter())
            .with_enemies(MonsterGroup::new(goblin(), 3)),
    );

    let mut turns = 0;
    while !combat.check_end().should_end {
        turns += 1;
        assert!(turns < 500, "fight never ended");

        let current = combat.current_combatant().unwrap().clone();
        let target = combat
            .initiative_order
            .iter()
            .find(|c| c.is_active() && c.side() != current.side())
            .map(|c| (c.id.clone(), c.armor_class));
        if let Some((target_id, ac)) = target {
            let dice = engine.dice_mut();
            let (bonus, notation, modifier) = if current.id == "pc-fighter" {
                (6, "1d8", 3)
            } else {
                (4, "1d6", 2)
            };
            let attack =
                dice.roll_attack(&current.id, &target_id, "weapon", bonus, ac, AdvantageStatus::Normal);
            if attack.hits {
                let damage = dice
                    .roll_damage(
                        &DamageRequest::new(notation, DamageType::Slashing)
                            .with_modifier(modifier)
                            .critical(attack.is_critical_hit),
                    )
                    .unwrap();
                combat
                    .apply_damage(&target_id, damage.total_damage, DamageType::Slashing, "weapon")
                    .unwrap();
            }
        }
        if !combat.check_end().should_end {
            combat.next_turn().unwrap();
        }
    }

    let outcome = combat.check_end().outcome.unwrap();
    let summary = combat.end(outcome).unwrap();
    match outcome {
        CombatOutcome::Victory => assert_eq!(summary.xp_earned, 150),
        _ => assert_eq!(summary.xp_earned, 0),
    }
    assert!(summary.rounds >= 1);
}
