//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid coordinate (column, row), origin at the top-left tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance (4-connected movement)
    pub fn manhattan(&self, other: &Self) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// Chebyshev distance (8-connected reach, used for melee adjacency)
    pub fn chebyshev(&self, other: &Self) -> u32 {
        (self.x - other.x).abs().max((self.y - other.y).abs()) as u32
    }

    /// True if the other point touches this one, diagonals included
    pub fn is_adjacent(&self, other: &Self) -> bool {
        self.chebyshev(other) == 1
    }

    /// Cardinal neighbours in a fixed order: north, east, south, west
    pub fn neighbors4(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y - 1),
            Point::new(self.x + 1, self.y),
            Point::new(self.x, self.y + 1),
            Point::new(self.x - 1, self.y),
        ]
    }

    /// All eight surrounding points, row-major
    pub fn neighbors8(&self) -> [Point; 8] {
        [
            Point::new(self.x - 1, self.y - 1),
            Point::new(self.x, self.y - 1),
            Point::new(self.x + 1, self.y - 1),
            Point::new(self.x - 1, self.y),
            Point::new(self.x + 1, self.y),
            Point::new(self.x - 1, self.y + 1),
            Point::new(self.x, self.y + 1),
            Point::new(self.x + 1, self.y + 1),
        ]
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Which side of the battle a combatant fights on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

/// Stable reference to a combatant: its side and index within that side's party
///
/// Ordering is side first (players before opponents), then index. Turn order
/// uses this ordering to break awareness ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatantRef {
    pub side: Side,
    pub index: usize,
}

impl CombatantRef {
    pub fn new(side: Side, index: usize) -> Self {
        Self { side, index }
    }

    pub fn player(index: usize) -> Self {
        Self::new(Side::Player, index)
    }

    pub fn opponent(index: usize) -> Self {
        Self::new(Side::Opponent, index)
    }
}

impl fmt::Display for CombatantRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side {
            Side::Player => write!(f, "player#{}", self.index),
            Side::Opponent => write!(f, "opponent#{}", self.index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distances() {
        let a = Point::new(1, 1);
        let b = Point::new(3, 4);
        assert_eq!(a.manhattan(&b), 5);
        assert_eq!(a.chebyshev(&b), 3);
    }

    #[test]
    fn test_adjacency_includes_diagonals() {
        let a = Point::new(2, 2);
        assert!(a.is_adjacent(&Point::new(3, 3)));
        assert!(a.is_adjacent(&Point::new(2, 1)));
        assert!(!a.is_adjacent(&Point::new(4, 2)));
        assert!(!a.is_adjacent(&a));
    }

    #[test]
    fn test_combatant_ref_ordering() {
        // Players sort before opponents, then by index
        let mut refs = vec![
            CombatantRef::opponent(0),
            CombatantRef::player(2),
            CombatantRef::player(0),
        ];
        refs.sort();
        assert_eq!(
            refs,
            vec![
                CombatantRef::player(0),
                CombatantRef::player(2),
                CombatantRef::opponent(0)
            ]
        );
    }
}
