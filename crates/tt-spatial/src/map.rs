use serde::{Deserialize, Serialize};
use tt_core::{Condition, GridPosition};

use crate::area::AreaOfEffect;
use crate::error::{SpatialError, SpatialResult};

/// Base terrain of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    /// Open ground.
    #[default]
    Floor,
    /// Solid wall; blocks movement and sight.
    Wall,
    /// Rubble, undergrowth, ice. Costs double movement.
    Difficult,
    /// Wadeable water. Costs double movement.
    WaterShallow,
    /// Water too deep to walk through.
    WaterDeep,
    /// A drop that cannot be walked over.
    Pit,
    /// An open doorway.
    DoorOpen,
    /// A shut door.
    DoorClosed,
}

impl Terrain {
    /// Whether creatures can walk onto this terrain.
    pub fn is_passable(self) -> bool {
        !matches!(
            self,
            Self::Wall | Self::Pit | Self::DoorClosed | Self::WaterDeep
        )
    }

    /// Whether entering this terrain costs double movement.
    pub fn is_difficult(self) -> bool {
        matches!(self, Self::Difficult | Self::WaterShallow)
    }

    /// Single-character glyph used by [`crate::render`] and [`GameMap::from_ascii`].
    pub fn glyph(self) -> char {
        match self {
            Self::Floor => '.',
            Self::Wall => '#',
            Self::Difficult => ':',
            Self::WaterShallow => '~',
            Self::WaterDeep => '=',
            Self::Pit => 'O',
            Self::DoorOpen => '/',
            Self::DoorClosed => '+',
        }
    }

    /// Terrain for a glyph, if it is one.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        let terrain = match glyph {
            '.' => Self::Floor,
            '#' => Self::Wall,
            ':' => Self::Difficult,
            '~' => Self::WaterShallow,
            '=' => Self::WaterDeep,
            'O' => Self::Pit,
            '/' => Self::DoorOpen,
            '+' => Self::DoorClosed,
            _ => return None,
        };
        Some(terrain)
    }
}

/// What sort of thing a tile object is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Tables, crates, barrels.
    Furniture,
    /// Pillars, boulders, statues.
    Obstacle,
    /// A hidden or visible trap.
    Trap,
    /// Something that can be picked up.
    Item,
    /// Purely visual dressing.
    Decoration,
}

/// A static object sitting on a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileObject {
    /// Stable identifier.
    pub id: String,
    /// Display name, reported when the object blocks sight.
    pub name: String,
    /// Object category.
    pub kind: ObjectKind,
    /// Creatures cannot enter the tile.
    #[serde(default)]
    pub blocks_movement: bool,
    /// Sight lines cannot pass through the tile.
    #[serde(default)]
    pub blocks_los: bool,
}

impl TileObject {
    /// An object that blocks neither movement nor sight.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            blocks_movement: false,
            blocks_los: false,
        }
    }

    /// Mark the object as blocking movement.
    pub fn blocking_movement(mut self) -> Self {
        self.blocks_movement = true;
        self
    }

    /// Mark the object as blocking line of sight.
    pub fn blocking_los(mut self) -> Self {
        self.blocks_los = true;
        self
    }

    /// Whether this object is a trap.
    pub fn is_trap(&self) -> bool {
        self.kind == ObjectKind::Trap
    }
}

/// One grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapTile {
    /// Where the tile is.
    pub position: GridPosition,
    /// Base terrain.
    pub terrain: Terrain,
    /// Renderer hint (sprite key, tileset name). Opaque to the engine.
    #[serde(default)]
    pub visual: String,
    /// Height in feet relative to the map floor.
    #[serde(default)]
    pub elevation: i32,
    /// Seen at least once. Never cleared.
    #[serde(default)]
    pub is_revealed: bool,
    /// Currently in sight of a viewer.
    #[serde(default)]
    pub is_visible: bool,
    /// Objects on the tile.
    #[serde(default)]
    pub objects: Vec<TileObject>,
}

impl MapTile {
    /// A bare tile with the given terrain.
    pub fn new(position: GridPosition, terrain: Terrain) -> Self {
        Self {
            position,
            terrain,
            visual: String::new(),
            elevation: 0,
            is_revealed: false,
            is_visible: false,
            objects: Vec::new(),
        }
    }

    /// Whether a creature can enter this tile, ignoring occupants.
    pub fn is_passable(&self) -> bool {
        self.terrain.is_passable() && !self.objects.iter().any(|o| o.blocks_movement)
    }

    /// The first object on the tile that blocks sight.
    pub fn los_blocker(&self) -> Option<&TileObject> {
        self.objects.iter().find(|o| o.blocks_los)
    }
}

/// What an entity on the map represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// A player character.
    Player,
    /// A hostile creature.
    Enemy,
    /// A creature fighting on the players' side.
    Ally,
    /// A non-combatant creature.
    Npc,
    /// A movable object (chest, cart). Never blocks movement.
    Object,
}

impl EntityType {
    /// Whether this entity takes up its cell for movement purposes.
    pub fn occupies_cell(self) -> bool {
        self != Self::Object
    }

    /// Whether `other` is hostile to this entity.
    pub fn is_hostile_to(self, other: Self) -> bool {
        match self {
            Self::Player | Self::Ally | Self::Npc => other == Self::Enemy,
            Self::Enemy => matches!(other, Self::Player | Self::Ally),
            Self::Object => false,
        }
    }
}

/// Creature size category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatureSize {
    /// Cats, imps. Never grants cover.
    Tiny,
    /// Halflings, goblins.
    Small,
    /// Humans, orcs.
    #[default]
    Medium,
    /// Ogres, horses.
    Large,
    /// Giants.
    Huge,
    /// Dragons.
    Gargantuan,
}

/// Something standing on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntity {
    /// Stable identifier, usually the combatant id.
    pub id: String,
    /// What the entity is.
    pub entity_type: EntityType,
    /// Display name.
    pub name: String,
    /// Current cell.
    pub position: GridPosition,
    /// Size category.
    #[serde(default)]
    pub size: CreatureSize,
    /// Walking speed in feet.
    pub speed: u32,
    /// Feet already moved this turn.
    #[serde(default)]
    pub movement_used: u32,
    /// Conditions currently affecting the entity.
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Currently seen by the party.
    #[serde(default = "default_true")]
    pub is_visible: bool,
}

fn default_true() -> bool {
    true
}

impl MapEntity {
    /// A medium entity with 30 ft of speed.
    pub fn new(
        id: impl Into<String>,
        entity_type: EntityType,
        name: impl Into<String>,
        position: GridPosition,
    ) -> Self {
        Self {
            id: id.into(),
            entity_type,
            name: name.into(),
            position,
            size: CreatureSize::Medium,
            speed: 30,
            movement_used: 0,
            conditions: Vec::new(),
            is_visible: true,
        }
    }

    /// Set walking speed.
    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    /// Set size category.
    pub fn with_size(mut self, size: CreatureSize) -> Self {
        self.size = size;
        self
    }

    /// Feet of movement left this turn.
    pub fn movement_remaining(&self) -> u32 {
        self.speed.saturating_sub(self.movement_used)
    }

    /// Start a new turn with full movement.
    pub fn reset_movement(&mut self) {
        self.movement_used = 0;
    }
}

/// A light on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightSource {
    /// Where the light sits.
    pub position: GridPosition,
    /// Bright light radius in feet.
    pub bright_radius: u32,
    /// Additional dim light radius in feet.
    #[serde(default)]
    pub dim_radius: u32,
}

/// A lingering area effect (fog cloud, wall of fire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEffect {
    /// Effect name.
    pub name: String,
    /// Covered area.
    pub area: AreaOfEffect,
    /// Rounds left, if timed.
    #[serde(default)]
    pub rounds_remaining: Option<u32>,
}

/// Overall lighting of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbientLight {
    /// Daylight.
    #[default]
    Bright,
    /// Twilight, moonlight.
    Dim,
    /// No light.
    Darkness,
}

/// A rectangular battle map.
///
/// `tiles` is stored row-major: `tiles[y][x]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMap {
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
    /// Tile rows, `height` rows of `width` tiles.
    pub tiles: Vec<Vec<MapTile>>,
    /// Everything standing on the map.
    #[serde(default)]
    pub entities: Vec<MapEntity>,
    /// Lights.
    #[serde(default)]
    pub light_sources: Vec<LightSource>,
    /// Lingering effects.
    #[serde(default)]
    pub active_effects: Vec<MapEffect>,
    /// Overall lighting.
    #[serde(default)]
    pub ambient_light: AmbientLight,
}

impl GameMap {
    /// A map filled with floor tiles.
    pub fn empty(width: u32, height: u32) -> Self {
        Self::with_terrain(width, height, Terrain::Floor)
    }

    /// A map filled with one terrain.
    pub fn with_terrain(width: u32, height: u32, terrain: Terrain) -> Self {
        let tiles = (0..height as i32)
            .map(|y| {
                (0..width as i32)
                    .map(|x| MapTile::new(GridPosition::new(x, y), terrain))
                    .collect()
            })
            .collect();
        Self {
            width,
            height,
            tiles,
            entities: Vec::new(),
            light_sources: Vec::new(),
            active_effects: Vec::new(),
            ambient_light: AmbientLight::default(),
        }
    }

    /// Build a map from glyph rows (see [`Terrain::glyph`]).
    ///
    /// Rows must all be the same length. Unknown glyphs are rejected.
    pub fn from_ascii<S: AsRef<str>>(rows: &[S]) -> SpatialResult<Self> {
        let height = rows.len() as u32;
        let width = rows
            .first()
            .map(|r| r.as_ref().chars().count() as u32)
            .unwrap_or(0);
        let mut map = Self::empty(width, height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() as u32 != width {
                return Err(SpatialError::InvalidMap(format!(
                    "row {y} has {} cells, expected {width}",
                    row.chars().count()
                )));
            }
            for (x, glyph) in row.chars().enumerate() {
                let terrain = Terrain::from_glyph(glyph).ok_or_else(|| {
                    SpatialError::InvalidMap(format!("unknown glyph '{glyph}' at ({x}, {y})"))
                })?;
                map.tiles[y][x].terrain = terrain;
            }
        }
        Ok(map)
    }

    /// Whether a position lies on the map.
    pub fn contains(&self, position: GridPosition) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    /// The tile at a position, if on the map.
    pub fn tile(&self, position: GridPosition) -> Option<&MapTile> {
        if !self.contains(position) {
            return None;
        }
        self.tiles
            .get(position.y as usize)
            .and_then(|row| row.get(position.x as usize))
    }

    /// Mutable access to the tile at a position.
    pub fn tile_mut(&mut self, position: GridPosition) -> Option<&mut MapTile> {
        if !self.contains(position) {
            return None;
        }
        self.tiles
            .get_mut(position.y as usize)
            .and_then(|row| row.get_mut(position.x as usize))
    }

    /// Every tile, row by row.
    pub fn iter_tiles(&self) -> impl Iterator<Item = &MapTile> {
        self.tiles.iter().flatten()
    }

    /// Change the terrain of one tile.
    pub fn set_terrain(&mut self, position: GridPosition, terrain: Terrain) -> SpatialResult<()> {
        let tile = self
            .tile_mut(position)
            .ok_or(SpatialError::OutOfBounds(position))?;
        tile.terrain = terrain;
        Ok(())
    }

    /// Put an object on a tile.
    pub fn add_object(&mut self, position: GridPosition, object: TileObject) -> SpatialResult<()> {
        let tile = self
            .tile_mut(position)
            .ok_or(SpatialError::OutOfBounds(position))?;
        tile.objects.push(object);
        Ok(())
    }

    /// Look up an entity by id.
    pub fn entity(&self, id: &str) -> SpatialResult<&MapEntity> {
        self.entities
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| SpatialError::EntityNotFound(id.to_string()))
    }

    /// Look up an entity by id for mutation.
    pub fn entity_mut(&mut self, id: &str) -> SpatialResult<&mut MapEntity> {
        self.entities
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| SpatialError::EntityNotFound(id.to_string()))
    }

    /// Entities standing on a cell.
    pub fn entities_at(&self, position: GridPosition) -> impl Iterator<Item = &MapEntity> {
        self.entities.iter().filter(move |e| e.position == position)
    }

    /// The creature blocking a cell, skipping `ignore` and object-type entities.
    pub fn occupant(&self, position: GridPosition, ignore: Option<&str>) -> Option<&MapEntity> {
        self.entities_at(position)
            .find(|e| e.entity_type.occupies_cell() && Some(e.id.as_str()) != ignore)
    }

    /// Add an entity to the map.
    pub fn place_entity(&mut self, entity: MapEntity) -> SpatialResult<()> {
        if !self.contains(entity.position) {
            return Err(SpatialError::OutOfBounds(entity.position));
        }
        if self.entities.iter().any(|e| e.id == entity.id) {
            return Err(SpatialError::DuplicateEntity(entity.id));
        }
        tracing::debug!(id = %entity.id, position = %entity.position, "entity placed");
        self.entities.push(entity);
        Ok(())
    }

    /// Take an entity off the map and return it.
    pub fn remove_entity(&mut self, id: &str) -> SpatialResult<MapEntity> {
        let index = self
            .entities
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| SpatialError::EntityNotFound(id.to_string()))?;
        Ok(self.entities.remove(index))
    }

    /// Check the structural invariants of a loaded map.
    ///
    /// The tile grid must be `height` rows of `width` tiles, each tile must
    /// know its own position, entity ids must be unique, and every entity
    /// must stand on the map.
    pub fn validate(&self) -> SpatialResult<()> {
        if self.tiles.len() != self.height as usize {
            return Err(SpatialError::InvalidMap(format!(
                "expected {} rows, found {}",
                self.height,
                self.tiles.len()
            )));
        }
        for (y, row) in self.tiles.iter().enumerate() {
            if row.len() != self.width as usize {
                return Err(SpatialError::InvalidMap(format!(
                    "row {y} has {} tiles, expected {}",
                    row.len(),
                    self.width
                )));
            }
            for (x, tile) in row.iter().enumerate() {
                if tile.position != GridPosition::new(x as i32, y as i32) {
                    return Err(SpatialError::InvalidMap(format!(
                        "tile at ({x}, {y}) claims position {}",
                        tile.position
                    )));
                }
            }
        }
        for (i, entity) in self.entities.iter().enumerate() {
            if !self.contains(entity.position) {
                return Err(SpatialError::OutOfBounds(entity.position));
            }
            if self.entities[..i].iter().any(|e| e.id == entity.id) {
                return Err(SpatialError::DuplicateEntity(entity.id.clone()));
            }
        }
        Ok(())
    }
}
