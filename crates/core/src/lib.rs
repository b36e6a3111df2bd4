pub mod combat;
pub mod content;
pub mod game;
pub mod map;
pub mod movement;
pub mod npc;
pub mod player;
pub mod stats;
pub mod types;

pub use combat::{AttackOutcome, CombatComponent, melee_attack};
pub use game::Game;
pub use map::{GroundItem, Map, TileGrid, Transition};
pub use movement::{ClaimOwner, MovementComponent, OccupancyClaim};
pub use npc::Npc;
pub use player::Player;
pub use stats::{Buff, BuffId, Stat, StatBlock};
pub use types::*;
