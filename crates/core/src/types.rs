use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct NpcId;
    pub struct ItemId;
}

/// Edge length of one grid tile, in pixels.
pub const TILE_SIZE: f32 = 32.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec2px {
    pub x: f32,
    pub y: f32,
}

impl Vec2px {
    pub fn distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    /// Top-left corner of the tile, in pixels.
    pub fn origin_px(self) -> Vec2px {
        Vec2px { x: self.x as f32 * TILE_SIZE, y: self.y as f32 * TILE_SIZE }
    }

    pub fn center_px(self) -> Vec2px {
        let origin = self.origin_px();
        Vec2px { x: origin.x + TILE_SIZE / 2.0, y: origin.y + TILE_SIZE / 2.0 }
    }

    /// Tile containing the given pixel point.
    pub fn containing(point: Vec2px) -> Self {
        Self {
            x: (point.x / TILE_SIZE).floor() as i32,
            y: (point.y / TILE_SIZE).floor() as i32,
        }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Screen-space facing: y grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn step(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Dominant-axis facing for an offset. Horizontal only wins on a strictly
    /// larger x component; equal magnitudes resolve to the vertical axis.
    pub fn toward(dx: f32, dy: f32) -> Option<Self> {
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        if dx.abs() > dy.abs() {
            Some(if dx > 0.0 { Self::Right } else { Self::Left })
        } else {
            Some(if dy > 0.0 { Self::Down } else { Self::Up })
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileKind {
    Floor,
    Wall,
    Water,
    Gate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NpcKind {
    Slime,
    Wolf,
    Skeleton,
    Wraith,
    Ogre,
    Villager,
    Elder,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemKind {
    MinorHealthPotion,
    StrengthTonic,
    HardenedBarkTea,
    Coin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapId(pub u32);

/// Whose combat component a damage event landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Player,
    Npc(NpcId),
}

/// Named visual effect the renderer is asked to play. The simulation never
/// draws; it only records the request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Hit,
    Heal,
    Pickup,
}

/// Outbound notifications for the presentation layer, drained once per frame
/// by the embedder.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    DamageDealt { target: Target, amount: f32 },
    NpcDefeated { npc: NpcId, kind: NpcKind, tile: Tile },
    PlayerDefeated,
    EffectRequested { effect: EffectKind, at: Vec2px },
    ItemDropped { item: ItemId, kind: ItemKind, tile: Tile },
    ItemPickedUp { kind: ItemKind },
    BuffApplied { name: &'static str, is_debuff: bool },
    BuffExpired { name: &'static str },
    DialogRequested { speaker: &'static str, line: &'static str },
    TransitionEntered { destination: MapId },
}

/// One tick of player intent. The core knows nothing about keybindings;
/// whatever produced this value already resolved them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub dx: i32,
    pub dy: i32,
    pub attack: bool,
    pub interact: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_pixel_round_trip() {
        let tile = Tile { x: 3, y: 7 };
        assert_eq!(tile.origin_px(), Vec2px { x: 96.0, y: 224.0 });
        assert_eq!(Tile::containing(tile.center_px()), tile);
        assert_eq!(Tile::containing(tile.origin_px()), tile);
    }

    #[test]
    fn facing_prefers_horizontal_only_on_strictly_larger_x() {
        assert_eq!(Direction::toward(5.0, 3.0), Some(Direction::Right));
        assert_eq!(Direction::toward(-5.0, 3.0), Some(Direction::Left));
        assert_eq!(Direction::toward(3.0, -5.0), Some(Direction::Up));
        // Equal magnitudes resolve to vertical.
        assert_eq!(Direction::toward(4.0, 4.0), Some(Direction::Down));
        assert_eq!(Direction::toward(-4.0, -4.0), Some(Direction::Up));
        assert_eq!(Direction::toward(0.0, 0.0), None);
    }

    #[test]
    fn containing_handles_negative_pixel_space() {
        assert_eq!(Tile::containing(Vec2px { x: -1.0, y: -1.0 }), Tile { x: -1, y: -1 });
    }
}
