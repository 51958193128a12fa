pub mod distance;
pub mod initiative;
pub mod los;
pub mod map;
pub mod path;
pub mod roll;

use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tt_spatial::{GameMap, MapEntity};

/// Read and parse a JSON file.
fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid JSON in {}: {e}", path.display()))
}

/// A map file: either a full serialized map, or ASCII rows plus entities.
#[derive(Deserialize)]
#[serde(untagged)]
enum MapFile {
    Full(GameMap),
    Ascii {
        rows: Vec<String>,
        #[serde(default)]
        entities: Vec<MapEntity>,
    },
}

/// Load and validate a map file.
fn load_map(path: &Path) -> Result<GameMap, String> {
    let map = match load_json::<MapFile>(path)? {
        MapFile::Full(map) => map,
        MapFile::Ascii { rows, entities } => {
            let mut map = GameMap::from_ascii(&rows).map_err(|e| e.to_string())?;
            for entity in entities {
                map.place_entity(entity).map_err(|e| e.to_string())?;
            }
            map
        }
    };
    map.validate().map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(map)
}
