use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};
use tt_core::GridPosition;

use crate::distance::{FEET_PER_SQUARE, calculate_distance};
use crate::map::{GameMap, MapTile};

/// Feet needed to step onto `tile`.
///
/// Straight steps cost 5 ft. Diagonal steps alternate 5 and 10 ft by the
/// parity of diagonals already taken. Difficult terrain doubles the cost.
/// `None` means the tile cannot be entered.
pub fn movement_cost(tile: &MapTile, is_diagonal: bool, diagonals_so_far: u32) -> Option<u32> {
    if !tile.is_passable() {
        return None;
    }
    let base = if is_diagonal && diagonals_so_far % 2 == 1 {
        2 * FEET_PER_SQUARE
    } else {
        FEET_PER_SQUARE
    };
    Some(if tile.terrain.is_difficult() {
        base * 2
    } else {
        base
    })
}

/// A found path and what it costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    /// Cells to move through, excluding the start and ending at the goal.
    pub path: Vec<GridPosition>,
    /// Total movement cost in feet.
    pub cost: u32,
}

/// Search node: cell plus whether the next diagonal is the expensive one.
type Node = (GridPosition, bool);

/// Cheapest 8-directional path from `start` to `goal`.
///
/// Cells that are impassable or held by a creature other than `entity`
/// are skipped; the goal itself may be occupied. Paths costing more than
/// `max_cost` feet are discarded. Returns `None` when the goal cannot be
/// reached.
pub fn find_path_with_cost(
    map: &GameMap,
    start: GridPosition,
    goal: GridPosition,
    entity: Option<&str>,
    max_cost: Option<u32>,
) -> Option<PathResult> {
    if start == goal {
        return Some(PathResult {
            path: Vec::new(),
            cost: 0,
        });
    }
    if !map.contains(start) || !map.contains(goal) {
        return None;
    }

    let limit = max_cost.unwrap_or(u32::MAX);
    let mut open = BinaryHeap::new();
    let mut best: HashMap<Node, u32> = HashMap::new();
    let mut came_from: HashMap<Node, Node> = HashMap::new();
    let mut expanded = 0usize;

    let origin: Node = (start, false);
    best.insert(origin, 0);
    open.push(Reverse((calculate_distance(start, goal).feet, 0u32, origin)));

    while let Some(Reverse((_, cost, node))) = open.pop() {
        if best.get(&node).is_some_and(|&g| cost > g) {
            continue;
        }
        let (position, odd_diagonal) = node;
        if position == goal {
            let path = reconstruct(&came_from, node, origin);
            tracing::debug!(%start, %goal, cost, steps = path.len(), expanded, "path found");
            return Some(PathResult { path, cost });
        }
        expanded += 1;

        for next in position.neighbors() {
            let Some(tile) = map.tile(next) else {
                continue;
            };
            if next != goal && map.occupant(next, entity).is_some() {
                continue;
            }
            let is_diagonal = next.x != position.x && next.y != position.y;
            let Some(step) = movement_cost(tile, is_diagonal, u32::from(odd_diagonal)) else {
                continue;
            };
            let next_cost = cost + step;
            if next_cost > limit {
                continue;
            }
            let next_node = (next, odd_diagonal ^ is_diagonal);
            if best.get(&next_node).is_some_and(|&g| g <= next_cost) {
                continue;
            }
            best.insert(next_node, next_cost);
            came_from.insert(next_node, node);
            let estimate = next_cost + calculate_distance(next, goal).feet;
            open.push(Reverse((estimate, next_cost, next_node)));
        }
    }

    tracing::debug!(%start, %goal, expanded, "no path");
    None
}

/// Cheapest path from `start` to `goal`, or an empty vector when unreachable.
///
/// See [`find_path_with_cost`].
pub fn find_path(
    map: &GameMap,
    start: GridPosition,
    goal: GridPosition,
    entity: Option<&str>,
    max_cost: Option<u32>,
) -> Vec<GridPosition> {
    find_path_with_cost(map, start, goal, entity, max_cost)
        .map(|r| r.path)
        .unwrap_or_default()
}

fn reconstruct(came_from: &HashMap<Node, Node>, end: Node, origin: Node) -> Vec<GridPosition> {
    let mut path = vec![end.0];
    let mut node = end;
    while let Some(&prev) = came_from.get(&node) {
        if prev == origin {
            break;
        }
        path.push(prev.0);
        node = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{EntityType, MapEntity, ObjectKind, Terrain, TileObject};
    use proptest::prelude::*;

    fn pos(x: i32, y: i32) -> GridPosition {
        GridPosition::new(x, y)
    }

    #[test]
    fn cost_rules() {
        let floor = MapTile::new(pos(0, 0), Terrain::Floor);
        let mud = MapTile::new(pos(0, 0), Terrain::Difficult);
        let wall = MapTile::new(pos(0, 0), Terrain::Wall);
        assert_eq!(movement_cost(&floor, false, 0), Some(5));
        assert_eq!(movement_cost(&floor, true, 0), Some(5));
        assert_eq!(movement_cost(&floor, true, 1), Some(10));
        assert_eq!(movement_cost(&floor, true, 2), Some(5));
        assert_eq!(movement_cost(&mud, false, 0), Some(10));
        assert_eq!(movement_cost(&mud, true, 1), Some(20));
        assert_eq!(movement_cost(&wall, false, 0), None);
    }

    #[test]
    fn straight_line_on_open_floor() {
        let map = GameMap::empty(10, 10);
        let result = find_path_with_cost(&map, pos(0, 0), pos(4, 0), None, None).unwrap();
        assert_eq!(result.path, vec![pos(1, 0), pos(2, 0), pos(3, 0), pos(4, 0)]);
        assert_eq!(result.cost, 20);
    }

    #[test]
    fn diagonal_cost_matches_distance_rule() {
        let map = GameMap::empty(10, 10);
        let result = find_path_with_cost(&map, pos(0, 0), pos(5, 3), None, None).unwrap();
        assert_eq!(result.cost, calculate_distance(pos(0, 0), pos(5, 3)).feet);
        assert_eq!(result.path.last(), Some(&pos(5, 3)));
    }

    #[test]
    fn routes_around_walls() {
        let map = GameMap::from_ascii(&[
            ".....",
            ".###.",
            "...#.",
            "####.",
            ".....",
        ])
        .unwrap();
        let path = find_path(&map, pos(0, 2), pos(0, 4), None, None);
        assert_eq!(path.last(), Some(&pos(0, 4)));
        for cell in &path {
            assert!(map.tile(*cell).unwrap().is_passable(), "{cell} is a wall");
        }
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let map = GameMap::from_ascii(&[
            ".....",
            ".###.",
            ".#.#.",
            ".###.",
            ".....",
        ])
        .unwrap();
        assert!(find_path(&map, pos(0, 0), pos(2, 2), None, None).is_empty());
    }

    #[test]
    fn max_cost_caps_search() {
        let map = GameMap::empty(10, 1);
        assert!(find_path(&map, pos(0, 0), pos(6, 0), None, Some(25)).is_empty());
        assert_eq!(find_path(&map, pos(0, 0), pos(5, 0), None, Some(25)).len(), 5);
    }

    #[test]
    fn prefers_cheaper_detour_over_difficult_terrain() {
        let map = GameMap::from_ascii(&[
            ".....",
            ".:::.",
            ".....",
        ])
        .unwrap();
        let result = find_path_with_cost(&map, pos(0, 1), pos(4, 1), None, None).unwrap();
        assert_eq!(result.cost, 25);
        assert!(result.path.iter().all(|p| p.y != 1 || p.x == 4));
    }

    #[test]
    fn creatures_block_but_goal_may_be_occupied() {
        let mut map = GameMap::from_ascii(&[
            "###",
            "...",
            "###",
        ])
        .unwrap();
        map.place_entity(MapEntity::new("orc", EntityType::Enemy, "Orc", pos(1, 1)))
            .unwrap();
        assert!(find_path(&map, pos(0, 1), pos(2, 1), None, None).is_empty());
        assert_eq!(find_path(&map, pos(0, 1), pos(1, 1), None, None), vec![pos(1, 1)]);
        // The mover never blocks itself.
        assert_eq!(find_path(&map, pos(1, 1), pos(2, 1), Some("orc"), None), vec![pos(2, 1)]);
    }

    #[test]
    fn blocking_objects_are_avoided() {
        let mut map = GameMap::empty(3, 1);
        map.add_object(
            pos(1, 0),
            TileObject::new("b", "Boulder", ObjectKind::Obstacle).blocking_movement(),
        )
        .unwrap();
        assert!(find_path(&map, pos(0, 0), pos(2, 0), None, None).is_empty());
    }

    #[test]
    fn same_cell_is_empty_path_with_zero_cost() {
        let map = GameMap::empty(3, 3);
        let result = find_path_with_cost(&map, pos(1, 1), pos(1, 1), None, None).unwrap();
        assert!(result.path.is_empty());
        assert_eq!(result.cost, 0);
    }

    fn arb_rows() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(
            prop::collection::vec(prop_oneof![4 => Just('.'), 1 => Just('#'), 1 => Just(':')], 8)
                .prop_map(|row| row.into_iter().collect::<String>()),
            8,
        )
    }

    proptest! {
        #[test]
        fn paths_avoid_walls_and_respect_budget(
            rows in arb_rows(),
            sx in 0i32..8, sy in 0i32..8, gx in 0i32..8, gy in 0i32..8,
            budget in 5u32..80,
        ) {
            let map = GameMap::from_ascii(&rows).unwrap();
            let start = pos(sx, sy);
            let goal = pos(gx, gy);
            if let Some(result) = find_path_with_cost(&map, start, goal, None, Some(budget)) {
                prop_assert!(result.cost <= budget);
                let mut previous = start;
                for cell in &result.path {
                    prop_assert!(previous.is_adjacent(*cell));
                    prop_assert!(map.tile(*cell).unwrap().terrain != Terrain::Wall);
                    previous = *cell;
                }
                if start != goal {
                    prop_assert_eq!(result.path.last(), Some(&goal));
                }
            }
        }
    }
}
