use std::path::Path;

use colored::Colorize;
use tt_core::GridPosition;
use tt_spatial::{Cover, check_line_of_sight};

pub fn run(map_path: &Path, from: GridPosition, to: GridPosition) -> Result<(), String> {
    let map = super::load_map(map_path)?;
    let sight = check_line_of_sight(&map, from, to);

    if sight.has_los {
        println!("  {} {from} to {to}", "Clear line of sight".green().bold());
    } else {
        let blocker = sight.blocked_by.as_deref().unwrap_or("unknown");
        println!("  {} by {blocker}", "Blocked".red().bold());
    }
    let cover = match sight.cover {
        Cover::None => "none",
        Cover::Half => "half (+2 AC)",
        Cover::ThreeQuarters => "three-quarters (+5 AC)",
        Cover::Full => "full",
    };
    println!("  Cover: {cover}");
    println!("  Distance: {}", sight.distance);
    Ok(())
}
