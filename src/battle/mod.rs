//! Battle system - turn-based grid combat
//!
//! Key points:
//! - Turn order is rebuilt every round from awareness
//! - Movement is A* over a tile grid with side-specific terrain
//! - The engine never waits on I/O: it hands a legal action set to a
//!   chooser (human front end or the built-in AI) and resumes with its pick
//! - Randomness comes from one injected ChaCha generator

pub mod actions;
pub mod ai;
pub mod battle_map;
pub mod battlefield;
pub mod conditions;
pub mod constants;
pub mod events;
pub mod execution;
pub mod pathfinding;
pub mod targeting;

// Re-exports for convenient access
pub use actions::{legal_actions, Action, ActionKind, LegalActions, TurnRules};
pub use ai::{ActionChooser, AiChooser, ScriptedChooser};
pub use battle_map::{BattleMap, Occupant, TerrainKind, Tile, Viewport};
pub use battlefield::Battlefield;
pub use conditions::{Battle, BattleCondition, BattleResult};
pub use events::{BattleEvent, BattleEventLog, BattleEventType, EventSink, NullSink};
pub use execution::{BattleEngine, BattlePhase, BattleReport, Step};
pub use pathfinding::{count, find_path, is_available, reachable, Path};
pub use targeting::{fight_targets, move_targets, ranged_targets};
