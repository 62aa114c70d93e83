//! A* pathfinding for battle maps
//!
//! Nodes live in a flat arena and point at their parent by index. Open-set
//! ties on total cost are broken by insertion order, so identical inputs
//! always produce identical paths.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use crate::battle::battle_map::BattleMap;
use crate::core::types::{Point, Side};

/// Result of a path search
///
/// `points` starts at the source and ends at the destination, or is empty
/// when the destination cannot be reached. `closest` is always set: the
/// reached node nearest the destination, which callers use as a fallback
/// goal when `points` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub points: Vec<Point>,
    pub closest: Point,
}

impl Path {
    fn unreachable(closest: Point) -> Self {
        Self {
            points: Vec::new(),
            closest,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of steps (points after the source)
    pub fn steps(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

/// Node in the search arena
#[derive(Debug, Clone)]
struct PathNode {
    point: Point,
    cost: u32,
    parent: Option<usize>,
}

/// Entry in the A* open set
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenEntry {
    total: u32, // cost + heuristic
    seq: usize, // insertion order
    node: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .total
            .cmp(&self.total)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Can a mover step onto `point` while heading for `dst`?
pub fn is_traversable(
    map: &BattleMap,
    point: Point,
    dst: Point,
    mover: Side,
    unrestricted: bool,
) -> bool {
    let Some(tile) = map.tile(point) else {
        return false;
    };

    let open = tile.occupant.is_empty() && !tile.is_temporary_obstacle();

    if point == dst && open && tile.terrain.walkable_by_anyone() {
        return true;
    }

    if unrestricted {
        // Occupants are ignored, terrain still applies
        return tile.terrain.walkable_for(mover)
            || (point == dst && tile.terrain.walkable_by_anyone());
    }

    open && tile.terrain.walkable_for(mover)
}

/// Find a shortest 4-connected path using A*
///
/// Returns an empty path (with `closest` set) if no path exists.
pub fn find_path(
    map: &BattleMap,
    src: Point,
    dst: Point,
    mover: Side,
    unrestricted: bool,
) -> Path {
    if !map.is_valid(src) || !map.is_valid(dst) {
        return Path::unreachable(src);
    }

    if src == dst {
        return Path {
            points: vec![src],
            closest: src,
        };
    }

    let mut nodes: Vec<PathNode> = vec![PathNode {
        point: src,
        cost: 0,
        parent: None,
    }];
    let mut open_set = BinaryHeap::new();
    let mut best_cost: HashMap<Point, u32> = HashMap::new();
    let mut closed: HashSet<Point> = HashSet::new();
    let mut seq = 0;

    best_cost.insert(src, 0);
    open_set.push(OpenEntry {
        total: src.manhattan(&dst),
        seq,
        node: 0,
    });

    let mut closest = 0;

    while let Some(entry) = open_set.pop() {
        let current = nodes[entry.node].clone();
        if !closed.insert(current.point) {
            continue; // Stale entry
        }

        let current_distance = current.point.manhattan(&dst);
        let closest_node = &nodes[closest];
        let closest_distance = closest_node.point.manhattan(&dst);
        if current_distance < closest_distance
            || (current_distance == closest_distance && current.cost < closest_node.cost)
        {
            closest = entry.node;
        }

        if current.point == dst {
            return Path {
                points: reconstruct_path(&nodes, entry.node),
                closest: dst,
            };
        }

        for neighbor in current.point.neighbors4() {
            if closed.contains(&neighbor)
                || !is_traversable(map, neighbor, dst, mover, unrestricted)
            {
                continue;
            }

            let tentative = current.cost + 1;
            if best_cost.get(&neighbor).is_some_and(|&c| c <= tentative) {
                continue;
            }

            best_cost.insert(neighbor, tentative);
            nodes.push(PathNode {
                point: neighbor,
                cost: tentative,
                parent: Some(entry.node),
            });
            seq += 1;
            open_set.push(OpenEntry {
                total: tentative + neighbor.manhattan(&dst),
                seq,
                node: nodes.len() - 1,
            });
        }
    }

    Path::unreachable(nodes[closest].point)
}

/// Walk parent indices back to the source
fn reconstruct_path(nodes: &[PathNode], mut current: usize) -> Vec<Point> {
    let mut path = vec![nodes[current].point];
    while let Some(parent) = nodes[current].parent {
        path.push(nodes[parent].point);
        current = parent;
    }
    path.reverse();
    path
}

/// Length of the prefix of `path` that is walkable right now
///
/// The first point is the mover's own tile and always counts; after it,
/// each point must be free for the mover, stopping at the first that isn't.
pub fn count(map: &BattleMap, path: &Path, mover: Side) -> usize {
    if path.is_empty() {
        return 0;
    }

    1 + path.points[1..]
        .iter()
        .take_while(|p| map.is_free(**p, mover))
        .count()
}

/// True if at least one cardinal neighbour is free for the mover
pub fn is_available(map: &BattleMap, src: Point, mover: Side) -> bool {
    src.neighbors4().iter().any(|p| map.is_free(*p, mover))
}

/// Tiles a mover can reach this turn within `budget` steps, sorted
///
/// Breadth-first over tiles free for the mover; the source is excluded.
pub fn reachable(map: &BattleMap, src: Point, mover: Side, budget: u32) -> Vec<Point> {
    let mut seen: HashSet<Point> = HashSet::from([src]);
    let mut frontier = VecDeque::from([(src, 0u32)]);
    let mut found = Vec::new();

    while let Some((point, depth)) = frontier.pop_front() {
        if depth == budget {
            continue;
        }
        for neighbor in point.neighbors4() {
            if map.is_free(neighbor, mover) && seen.insert(neighbor) {
                found.push(neighbor);
                frontier.push_back((neighbor, depth + 1));
            }
        }
    }

    found.sort();
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::battle_map::TerrainKind;
    use crate::core::types::CombatantRef;

    fn assert_connected(path: &Path) {
        for pair in path.points.windows(2) {
            assert_eq!(pair[0].manhattan(&pair[1]), 1, "gap in {:?}", path.points);
        }
    }

    #[test]
    fn test_pathfind_straight_line() {
        let map = BattleMap::new(10, 10);
        let path = find_path(&map, Point::new(0, 0), Point::new(5, 0), Side::Player, false);

        assert_eq!(path.points.first(), Some(&Point::new(0, 0)));
        assert_eq!(path.points.last(), Some(&Point::new(5, 0)));
        assert_eq!(path.steps(), 5);
        assert_connected(&path);
    }

    #[test]
    fn test_pathfind_around_obstacle() {
        let map = BattleMap::from_layout(&[
            "......", //
            "..#...", //
            "..#...", //
            "......",
        ]);
        let path = find_path(&map, Point::new(0, 1), Point::new(4, 1), Side::Player, false);

        assert!(!path.is_empty());
        assert!(!path.points.contains(&Point::new(2, 1)));
        assert!(!path.points.contains(&Point::new(2, 2)));
        assert_eq!(path.steps(), 6);
        assert_connected(&path);
    }

    #[test]
    fn test_pathfind_no_path_reports_closest() {
        let map = BattleMap::from_layout(&[
            "...#..", //
            "...#..", //
            "...#..",
        ]);
        let path = find_path(&map, Point::new(0, 1), Point::new(5, 1), Side::Player, false);

        assert!(path.is_empty());
        assert_eq!(path.closest, Point::new(2, 1));
    }

    #[test]
    fn test_pathfind_same_start_goal() {
        let map = BattleMap::new(5, 5);
        let path = find_path(&map, Point::new(2, 2), Point::new(2, 2), Side::Player, false);
        assert_eq!(path.points, vec![Point::new(2, 2)]);
        assert_eq!(path.steps(), 0);
    }

    #[test]
    fn test_occupied_destination_needs_unrestricted() {
        let mut map = BattleMap::new(6, 3);
        map.put_combatant(Point::new(5, 1), CombatantRef::player(0));

        let blocked = find_path(&map, Point::new(0, 1), Point::new(5, 1), Side::Opponent, false);
        assert!(blocked.is_empty());
        assert_eq!(blocked.closest.manhattan(&Point::new(5, 1)), 1);

        let estimate = find_path(&map, Point::new(0, 1), Point::new(5, 1), Side::Opponent, true);
        assert_eq!(estimate.steps(), 5);
    }

    #[test]
    fn test_enemy_passable_and_exit_rules() {
        let map = BattleMap::from_layout(&[
            ".~.", //
            "###",
        ]);
        let enemy = find_path(&map, Point::new(0, 0), Point::new(2, 0), Side::Opponent, false);
        assert_eq!(enemy.steps(), 2);

        let player = find_path(&map, Point::new(0, 0), Point::new(2, 0), Side::Player, false);
        assert!(player.is_empty());

        let map = BattleMap::from_layout(&[".E."]);
        let player = find_path(&map, Point::new(0, 0), Point::new(2, 0), Side::Player, false);
        assert_eq!(player.steps(), 2);
        let enemy = find_path(&map, Point::new(0, 0), Point::new(2, 0), Side::Opponent, false);
        assert!(enemy.is_empty());
    }

    #[test]
    fn test_destination_of_foreign_terrain_is_allowed() {
        // An exit may be targeted as the final step even by an enemy
        let map = BattleMap::from_layout(&["..E"]);
        let path = find_path(&map, Point::new(0, 0), Point::new(2, 0), Side::Opponent, false);
        assert_eq!(path.steps(), 2);
    }

    #[test]
    fn test_pathfind_deterministic() {
        let map = BattleMap::new(8, 8);
        let a = find_path(&map, Point::new(0, 0), Point::new(7, 7), Side::Player, false);
        let b = find_path(&map, Point::new(0, 0), Point::new(7, 7), Side::Player, false);
        assert_eq!(a, b);
        assert_eq!(a.steps(), 14);
    }

    #[test]
    fn test_count_stops_at_blocked_step() {
        let mut map = BattleMap::new(6, 1);
        let path = find_path(&map, Point::new(0, 0), Point::new(5, 0), Side::Player, false);
        assert_eq!(count(&map, &path, Side::Player), 6);

        map.put_combatant(Point::new(3, 0), CombatantRef::opponent(0));
        assert_eq!(count(&map, &path, Side::Player), 3);

        assert_eq!(count(&map, &Path::unreachable(Point::new(0, 0)), Side::Player), 0);
    }

    #[test]
    fn test_available_detects_stuck() {
        let mut map = BattleMap::new(3, 3);
        let centre = Point::new(1, 1);
        assert!(is_available(&map, centre, Side::Player));

        for p in centre.neighbors4() {
            map.set_terrain(p, TerrainKind::Obstacle);
        }
        assert!(!is_available(&map, centre, Side::Player));
    }

    #[test]
    fn test_reachable_respects_budget_and_blockers() {
        let mut map = BattleMap::new(5, 5);
        let centre = Point::new(2, 2);
        assert_eq!(reachable(&map, centre, Side::Player, 1).len(), 4);
        assert_eq!(reachable(&map, centre, Side::Player, 2).len(), 12);
        assert!(reachable(&map, centre, Side::Player, 0).is_empty());

        map.put_combatant(Point::new(2, 1), CombatantRef::opponent(0));
        let one = reachable(&map, centre, Side::Player, 1);
        assert_eq!(one.len(), 3);
        assert!(!one.contains(&Point::new(2, 1)));
    }

    #[test]
    fn test_invalid_endpoints() {
        let map = BattleMap::new(3, 3);
        let path = find_path(&map, Point::new(0, 0), Point::new(9, 9), Side::Player, false);
        assert!(path.is_empty());
        assert_eq!(path.closest, Point::new(0, 0));
    }
}
