use std::path::Path;

use colored::Colorize;
use tt_core::GridPosition;
use tt_spatial::find_path_with_cost;

pub fn run(
    map_path: &Path,
    from: GridPosition,
    to: GridPosition,
    max_cost: Option<u32>,
) -> Result<(), String> {
    let map = super::load_map(map_path)?;
    for cell in [from, to] {
        if !map.contains(cell) {
            return Err(format!("{cell} is outside the {}x{} map", map.width, map.height));
        }
    }

    let mover = map.occupant(from, None).map(|e| e.id.clone());
    match find_path_with_cost(&map, from, to, mover.as_deref(), max_cost) {
        Some(result) => {
            let steps: Vec<String> = result.path.iter().map(ToString::to_string).collect();
            println!(
                "  {} {} steps, {} ft",
                "Path:".bold(),
                result.path.len(),
                result.cost.to_string().green()
            );
            if !steps.is_empty() {
                println!("  {from} -> {}", steps.join(" -> "));
            }
        }
        None => println!("  {}", "No path found.".yellow()),
    }
    Ok(())
}
