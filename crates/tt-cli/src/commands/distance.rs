use colored::Colorize;
use tt_core::GridPosition;
use tt_spatial::{calculate_distance, direction};

pub fn run(from: GridPosition, to: GridPosition) -> Result<(), String> {
    let distance = calculate_distance(from, to);
    let heading = direction(from, to)
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  {from} to {to}: {} {}",
        distance.to_string().bold(),
        format!("heading {heading}").dimmed()
    );
    Ok(())
}
