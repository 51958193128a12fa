use crate::map::{EntityType, GameMap, MapTile, ObjectKind};

/// Glyph drawn for cells never seen when rendering with fog.
pub const FOG_GLYPH: char = '?';

fn entity_glyph(entity_type: EntityType) -> char {
    match entity_type {
        EntityType::Player => '@',
        EntityType::Enemy => 'E',
        EntityType::Ally => 'A',
        EntityType::Npc => 'N',
        EntityType::Object => 'o',
    }
}

fn tile_glyph(tile: &MapTile) -> char {
    let object = tile.objects.iter().find_map(|o| match o.kind {
        ObjectKind::Trap => Some('^'),
        _ if o.blocks_movement || o.blocks_los => Some('*'),
        ObjectKind::Item => Some('!'),
        _ => None,
    });
    object.unwrap_or_else(|| tile.terrain.glyph())
}

/// Draw the map as text, one line per row.
///
/// With `fog` set, unrevealed cells show [`FOG_GLYPH`], and cells that are
/// revealed but out of sight show terrain without creatures.
pub fn render(map: &GameMap, fog: bool) -> String {
    map.tiles
        .iter()
        .map(|row| {
            row.iter()
                .map(|tile| {
                    if fog && !tile.is_revealed {
                        return FOG_GLYPH;
                    }
                    let show_creatures = !fog || tile.is_visible;
                    map.entities_at(tile.position)
                        .filter(|_| show_creatures)
                        .map(|e| entity_glyph(e.entity_type))
                        .next()
                        .unwrap_or_else(|| tile_glyph(tile))
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
