use tt_core::GridPosition;

use crate::los::check_line_of_sight;
use crate::map::GameMap;

/// Mark every cell within `radius` squares of `center` that is in line of
/// sight as revealed and visible. Returns how many cells are visible from
/// `center`.
pub fn reveal_area(map: &mut GameMap, center: GridPosition, radius: u32) -> usize {
    let r = radius as i32;
    let reach = f64::from(radius);
    let mut seen = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            let cell = center.offset(dx, dy);
            if !map.contains(cell) || center.euclidean(cell) > reach {
                continue;
            }
            if check_line_of_sight(map, center, cell).has_los {
                seen.push(cell);
            }
        }
    }
    for cell in &seen {
        if let Some(tile) = map.tile_mut(*cell) {
            tile.is_revealed = true;
            tile.is_visible = true;
        }
    }
    seen.len()
}

/// Recompute what the viewers can currently see.
///
/// Clears every `is_visible` flag, reveals around each viewer, then marks
/// entities visible when they stand on a visible cell. `is_revealed` is
/// never cleared.
pub fn update_visibility(map: &mut GameMap, viewers: &[GridPosition], radius: u32) {
    for tile in map.tiles.iter_mut().flatten() {
        tile.is_visible = false;
    }
    for viewer in viewers {
        reveal_area(map, *viewer, radius);
    }
    let visible: Vec<bool> = map
        .entities
        .iter()
        .map(|e| map.tile(e.position).is_some_and(|t| t.is_visible))
        .collect();
    for (entity, seen) in map.entities.iter_mut().zip(visible) {
        entity.is_visible = seen;
    }
    tracing::debug!(
        viewers = viewers.len(),
        radius,
        visible = map.iter_tiles().filter(|t| t.is_visible).count(),
        "visibility updated"
    );
}
