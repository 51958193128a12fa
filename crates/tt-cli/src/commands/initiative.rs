use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tt_core::Character;
use tt_mechanics::{CombatEngine, EncounterSetup, EngineConfig, MonsterGroup, Side};

pub fn run(party: &Path, enemies: &Path, seed: Option<u64>) -> Result<(), String> {
    let players: Vec<Character> = super::load_json(party)?;
    let groups: Vec<MonsterGroup> = super::load_json(enemies)?;
    if players.is_empty() && groups.is_empty() {
        println!("  Nobody to fight.");
        return Ok(());
    }

    let mut config = EngineConfig::default();
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    let mut engine = CombatEngine::from_config(&config);
    let setup = EncounterSetup {
        players,
        enemies: groups,
        ..EncounterSetup::default()
    };
    let combat = engine.start_combat(setup);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Name", "Init", "HP", "AC", "Side"]);
    for (i, c) in combat.initiative_order.iter().enumerate() {
        let side = match c.side() {
            Side::Party => "party".green().to_string(),
            Side::Enemies => "enemy".red().to_string(),
        };
        table.add_row(vec![
            (i + 1).to_string(),
            c.name.clone(),
            format!("{} ({:+})", c.initiative, c.initiative_modifier),
            format!("{}/{}", c.current_hp, c.max_hp),
            c.armor_class.to_string(),
            side,
        ]);
    }

    println!("  {} round {}", "Initiative".bold(), combat.round);
    println!("{table}");
    if let Some(first) = combat.current_combatant() {
        println!("  {} acts first", first.name.bold());
    }
    Ok(())
}
