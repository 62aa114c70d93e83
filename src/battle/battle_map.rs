//! Battle map: a rectangular tile grid with terrain and occupants
//!
//! The map is the single source of truth for where combatants stand.
//! Every mutation touches exactly one tile, so the grid is never left
//! half-updated.

use serde::{Deserialize, Serialize};

use crate::core::types::{CombatantRef, Point, Side};

/// Terrain of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TerrainKind {
    #[default]
    None,              // Outside the playable area
    Passable,          // Anyone may walk here
    EnemyPassable,     // Only opponents may walk here
    Obstacle,          // Walls, pillars, furniture
    TemporaryObstacle, // Expires after a number of rounds
    Exit,              // Players may walk here and flee from here
}

impl TerrainKind {
    /// Can a mover of this side stand on the terrain, ignoring occupants?
    pub fn walkable_for(&self, mover: Side) -> bool {
        match self {
            TerrainKind::Passable => true,
            TerrainKind::EnemyPassable => mover == Side::Opponent,
            TerrainKind::Exit => mover == Side::Player,
            TerrainKind::None | TerrainKind::Obstacle | TerrainKind::TemporaryObstacle => false,
        }
    }

    /// Could anyone at all stand here?
    pub fn walkable_by_anyone(&self) -> bool {
        matches!(
            self,
            TerrainKind::Passable | TerrainKind::EnemyPassable | TerrainKind::Exit
        )
    }
}

/// What currently occupies a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Occupant {
    #[default]
    None,
    Player(usize),
    Enemy(usize),
    TemporaryObstacle,
}

impl Occupant {
    pub fn of(who: CombatantRef) -> Self {
        match who.side {
            Side::Player => Occupant::Player(who.index),
            Side::Opponent => Occupant::Enemy(who.index),
        }
    }

    /// The combatant standing here, if any
    pub fn combatant(&self) -> Option<CombatantRef> {
        match *self {
            Occupant::Player(index) => Some(CombatantRef::player(index)),
            Occupant::Enemy(index) => Some(CombatantRef::opponent(index)),
            Occupant::None | Occupant::TemporaryObstacle => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Occupant::None)
    }
}

/// A single tile on the battle map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: TerrainKind,
    pub occupant: Occupant,
    /// Rounds left before a temporary obstacle clears (0 when none)
    pub lifetime: u32,
}

impl Tile {
    pub fn new(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            occupant: Occupant::None,
            lifetime: 0,
        }
    }

    pub fn is_temporary_obstacle(&self) -> bool {
        self.lifetime > 0
            && (self.terrain == TerrainKind::TemporaryObstacle
                || self.occupant == Occupant::TemporaryObstacle)
    }

    /// Free for movement by this side: unoccupied, walkable, not blocked
    pub fn is_free_for(&self, mover: Side) -> bool {
        self.occupant.is_empty() && self.terrain.walkable_for(mover) && !self.is_temporary_obstacle()
    }
}

/// Presentation window onto the map; the engine never reads it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }
}

/// The full battle map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleMap {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
    pub viewport: Viewport,
}

impl BattleMap {
    /// Create a new battle map of passable terrain
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![Tile::new(TerrainKind::Passable); (width * height) as usize],
            viewport: Viewport {
                x: 0,
                y: 0,
                width,
                height,
            },
        }
    }

    /// Build a map from text rows
    ///
    /// `.` passable, `#` obstacle, `~` enemy-passable, `E` exit, anything
    /// else is outside the playable area. Short rows are padded with `None`.
    pub fn from_layout(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let mut map = Self::new(width, height);

        for (y, row) in rows.iter().enumerate() {
            let mut chars = row.chars();
            for x in 0..width {
                let terrain = match chars.next() {
                    Some('.') => TerrainKind::Passable,
                    Some('#') => TerrainKind::Obstacle,
                    Some('~') => TerrainKind::EnemyPassable,
                    Some('E') => TerrainKind::Exit,
                    _ => TerrainKind::None,
                };
                map.set_terrain(Point::new(x, y as i32), terrain);
            }
        }

        map
    }

    fn index(&self, point: Point) -> Option<usize> {
        if self.is_valid(point) {
            Some((point.y * self.width + point.x) as usize)
        } else {
            None
        }
    }

    /// Check if the point lies within map bounds
    pub fn is_valid(&self, point: Point) -> bool {
        point.x >= 0 && point.y >= 0 && point.x < self.width && point.y < self.height
    }

    /// Get the tile at a point
    pub fn tile(&self, point: Point) -> Option<&Tile> {
        self.index(point).map(|i| &self.tiles[i])
    }

    fn tile_mut(&mut self, point: Point) -> Option<&mut Tile> {
        let index = self.index(point)?;
        Some(&mut self.tiles[index])
    }

    /// Is the tile free for a mover of this side? Out-of-range is never free.
    pub fn is_free(&self, point: Point, mover: Side) -> bool {
        self.tile(point).is_some_and(|t| t.is_free_for(mover))
    }

    pub fn is_exit(&self, point: Point) -> bool {
        self.tile(point).is_some_and(|t| t.terrain == TerrainKind::Exit)
    }

    pub fn occupant(&self, point: Point) -> Occupant {
        self.tile(point).map(|t| t.occupant).unwrap_or_default()
    }

    /// Set terrain at a point
    pub fn set_terrain(&mut self, point: Point, terrain: TerrainKind) {
        if let Some(tile) = self.tile_mut(point) {
            tile.terrain = terrain;
        }
    }

    /// Place an occupant on a tile, replacing whatever stood there
    pub fn put(&mut self, point: Point, occupant: Occupant) {
        if let Some(tile) = self.tile_mut(point) {
            tile.occupant = occupant;
        }
    }

    /// Place a combatant on a tile
    pub fn put_combatant(&mut self, point: Point, who: CombatantRef) {
        self.put(point, Occupant::of(who));
    }

    /// Raise a temporary obstacle that clears after `lifetime` rounds
    pub fn put_obstacle(&mut self, point: Point, lifetime: u32) {
        if let Some(tile) = self.tile_mut(point) {
            tile.terrain = TerrainKind::TemporaryObstacle;
            tile.occupant = Occupant::TemporaryObstacle;
            tile.lifetime = lifetime.max(1);
        }
    }

    /// Clear the occupant of a tile
    pub fn remove(&mut self, point: Point) {
        self.put(point, Occupant::None);
    }

    /// Remove a combatant wherever it stands; returns its former position
    pub fn remove_combatant(&mut self, who: CombatantRef) -> Option<Point> {
        let point = self.find(Occupant::of(who))?;
        self.remove(point);
        Some(point)
    }

    /// Move a combatant's occupancy from one tile to another in one step
    pub fn relocate(&mut self, from: Point, to: Point) {
        let occupant = self.occupant(from);
        if !self.is_valid(to) || occupant.is_empty() {
            return;
        }
        self.remove(from);
        self.put(to, occupant);
    }

    /// Find where an occupant stands (row-major first match)
    pub fn find(&self, occupant: Occupant) -> Option<Point> {
        if occupant.is_empty() {
            return None;
        }
        self.tiles
            .iter()
            .position(|t| t.occupant == occupant)
            .map(|i| Point::new(i as i32 % self.width, i as i32 / self.width))
    }

    pub fn find_combatant(&self, who: CombatantRef) -> Option<Point> {
        self.find(Occupant::of(who))
    }

    /// Movement distance between two points (4-connected)
    pub fn distance(&self, a: Point, b: Point) -> u32 {
        a.manhattan(&b)
    }

    /// All exit tiles, row-major
    pub fn exits(&self) -> Vec<Point> {
        self.points()
            .filter(|p| self.is_exit(*p))
            .collect()
    }

    /// Every point on the map, row-major
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Point::new(x, y)))
    }

    /// Age temporary obstacles by one round, clearing those that expire
    pub fn cool_down(&mut self) {
        for tile in self.tiles.iter_mut().filter(|t| t.lifetime > 0) {
            tile.lifetime -= 1;
            if tile.lifetime == 0 {
                if tile.terrain == TerrainKind::TemporaryObstacle {
                    tile.terrain = TerrainKind::Passable;
                }
                if tile.occupant == Occupant::TemporaryObstacle {
                    tile.occupant = Occupant::None;
                }
            }
        }
    }

    /// Center the viewport on a point, clamped to the map edges
    pub fn center_viewport(&mut self, point: Point, width: i32, height: i32) {
        let width = width.clamp(0, self.width);
        let height = height.clamp(0, self.height);
        self.viewport = Viewport {
            x: (point.x - width / 2).clamp(0, self.width - width),
            y: (point.y - height / 2).clamp(0, self.height - height),
            width,
            height,
        };
    }
}
