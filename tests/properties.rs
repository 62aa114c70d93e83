//! Property-based tests for pathfinding, dice and turn order

use std::collections::{HashMap, VecDeque};

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bloodsword::battle::{find_path, Battle, BattleEngine, BattleMap, Step, TerrainKind};
use bloodsword::character::{Attributes, Combatant, Party};
use bloodsword::combat::roll;
use bloodsword::core::{Point, Side};

/// Grid with walls wherever `walls` is set, row-major
fn walled_map(width: i32, height: i32, walls: &[bool]) -> BattleMap {
    let mut map = BattleMap::new(width, height);
    for (i, wall) in walls.iter().enumerate().take((width * height) as usize) {
        if *wall {
            let point = Point::new(i as i32 % width, i as i32 / width);
            map.set_terrain(point, TerrainKind::Obstacle);
        }
    }
    map
}

/// Plain breadth-first distance for comparison
fn bfs_distance(map: &BattleMap, src: Point, dst: Point) -> Option<usize> {
    let mut dist = HashMap::from([(src, 0usize)]);
    let mut queue = VecDeque::from([src]);
    while let Some(p) = queue.pop_front() {
        if p == dst {
            return dist.get(&p).copied();
        }
        let d = dist[&p];
        for n in p.neighbors4() {
            if map.is_free(n, Side::Player) && !dist.contains_key(&n) {
                dist.insert(n, d + 1);
                queue.push_back(n);
            }
        }
    }
    None
}

fn awareness_party(side: Side, awareness: &[i32]) -> Party {
    awareness
        .iter()
        .enumerate()
        .map(|(i, awr)| Combatant::new(format!("{:?} {}", side, i), side, Attributes::new(7, *awr, 6, 10)))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Paths are connected, shortest and repeatable
    #[test]
    fn prop_path_is_shortest_and_stable(
        width in 3i32..12,
        height in 3i32..12,
        walls in prop::collection::vec(prop::bool::weighted(0.25), 144),
        sx in 0i32..12, sy in 0i32..12,
        dx in 0i32..12, dy in 0i32..12,
    ) {
        let mut map = walled_map(width, height, &walls);
        let src = Point::new(sx % width, sy % height);
        let dst = Point::new(dx % width, dy % height);
        map.set_terrain(src, TerrainKind::Passable);
        map.set_terrain(dst, TerrainKind::Passable);

        let path = find_path(&map, src, dst, Side::Player, false);
        let again = find_path(&map, src, dst, Side::Player, false);
        prop_assert_eq!(&path, &again);

        match bfs_distance(&map, src, dst) {
            Some(distance) => {
                prop_assert_eq!(path.points.first(), Some(&src));
                prop_assert_eq!(path.points.last(), Some(&dst));
                prop_assert_eq!(path.steps(), distance);
                for pair in path.points.windows(2) {
                    prop_assert_eq!(pair[0].manhattan(&pair[1]), 1);
                }
            }
            None => {
                prop_assert!(path.is_empty());
                prop_assert!(map.is_valid(path.closest));
            }
        }
    }

    /// nD+m always lands in [n+m, 6n+m]
    #[test]
    fn prop_roll_in_range(count in 1u32..8, modifier in -6i32..6, seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let r = roll(&mut rng, count, modifier);
        let n = count as i32;

        prop_assert_eq!(r.count(), count as usize);
        prop_assert!(r.dice.iter().all(|d| (1..=6).contains(d)));
        prop_assert!(r.sum >= n + modifier && r.sum <= 6 * n + modifier);
    }

    /// Turn order descends by awareness, ties by side then index
    #[test]
    fn prop_turn_order_sorted(
        players in prop::collection::vec(1i32..12, 1..5),
        opponents in prop::collection::vec(1i32..12, 1..5),
        seed in any::<u64>(),
    ) {
        let player_start = (0..players.len()).map(|x| Point::new(x as i32, 0)).collect();
        let opponent_start = (0..opponents.len()).map(|x| Point::new(x as i32, 7)).collect();
        let battle = Battle::new(BattleMap::new(8, 8), awareness_party(Side::Opponent, &opponents))
            .with_player_start(player_start)
            .with_opponent_start(opponent_start);
        let mut engine = BattleEngine::seeded(awareness_party(Side::Player, &players), battle, seed).unwrap();

        while let Step::Continue = engine.step().unwrap() {}

        let awareness = |r: &bloodsword::core::CombatantRef| {
            engine.field().get(*r).unwrap().attributes.awareness.value
        };
        let order = engine.turn_order();
        prop_assert_eq!(order.len(), players.len() + opponents.len());
        for pair in order.windows(2) {
            let (a, b) = (awareness(&pair[0]), awareness(&pair[1]));
            prop_assert!(a > b || (a == b && pair[0] < pair[1]));
        }
    }

    /// Gaining zero endurance changes nothing, and endurance never drops below zero
    #[test]
    fn prop_zero_gain_is_idempotent(max in 1i32..30, delta in -40i32..40, clamp in any::<bool>()) {
        let mut c = Combatant::new("Subject", Side::Player, Attributes::new(7, 7, 7, max));
        c.gain_endurance(delta, clamp);
        prop_assert!(c.endurance >= 0);
        if clamp {
            prop_assert!(c.endurance <= max);
        }

        let before = c.endurance;
        let alive = c.gain_endurance(0, clamp);
        prop_assert_eq!(alive, before > 0);
        prop_assert_eq!(c.endurance, before);
    }
}
