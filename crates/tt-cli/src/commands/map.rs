use std::path::Path;

use colored::Colorize;
use tt_core::GridPosition;
use tt_spatial::{VisionConfig, render, update_visibility};

pub fn run(map_path: &Path, viewers: &[GridPosition], radius: Option<u32>) -> Result<(), String> {
    let mut map = super::load_map(map_path)?;
    let vision = match radius {
        Some(squares) => VisionConfig::default().with_radius(squares),
        None => VisionConfig::default(),
    };

    let fog = !viewers.is_empty();
    if fog {
        update_visibility(&mut map, viewers, vision.radius_squares);
    }

    println!(
        "  {} {}",
        format!("{}x{} map", map.width, map.height).bold(),
        if fog {
            format!("(fog of war, {} ft vision)", vision.radius_feet())
        } else {
            "(everything shown)".to_string()
        }
        .dimmed()
    );
    for line in render::render(&map, fog).lines() {
        println!("  {line}");
    }

    let seen: Vec<&str> = map
        .entities
        .iter()
        .filter(|e| !fog || e.is_visible)
        .map(|e| e.name.as_str())
        .collect();
    if !seen.is_empty() {
        println!();
        println!("  In view: {}", seen.join(", "));
    }
    Ok(())
}
