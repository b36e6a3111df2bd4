//! The map owns the tile grid and every entity roster on it. NPC and item
//! collections are mutated here and nowhere else: entities read occupancy
//! through a claims snapshot, and removal happens only in the cull pass.

use rand_chacha::ChaCha8Rng;
use slotmap::SlotMap;

use crate::movement::{ClaimOwner, OccupancyClaim};
use crate::npc::Npc;
use crate::player::Player;
use crate::types::{GameEvent, ItemId, ItemKind, MapId, NpcId, NpcKind, Tile, TileKind};

#[derive(Clone)]
pub struct TileGrid {
    pub width: usize,
    pub height: usize,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    /// Open floor with a one-tile wall border.
    pub fn new(width: usize, height: usize) -> Self {
        let mut tiles = vec![TileKind::Floor; width * height];
        for x in 0..width {
            tiles[x] = TileKind::Wall;
            tiles[(height - 1) * width + x] = TileKind::Wall;
        }
        for y in 0..height {
            tiles[y * width] = TileKind::Wall;
            tiles[y * width + (width - 1)] = TileKind::Wall;
        }
        Self { width, height, tiles }
    }

    pub fn in_bounds(&self, tile: Tile) -> bool {
        tile.x >= 0
            && tile.y >= 0
            && (tile.x as usize) < self.width
            && (tile.y as usize) < self.height
    }

    /// Out-of-bounds reads as wall, so edge checks never need a special case.
    pub fn tile_at(&self, tile: Tile) -> TileKind {
        if !self.in_bounds(tile) {
            return TileKind::Wall;
        }
        self.tiles[self.index(tile)]
    }

    pub fn is_solid(&self, tile: Tile) -> bool {
        matches!(self.tile_at(tile), TileKind::Wall | TileKind::Water)
    }

    pub fn is_walkable(&self, tile: Tile) -> bool {
        self.in_bounds(tile) && !self.is_solid(tile)
    }

    pub fn set_tile(&mut self, tile: Tile, kind: TileKind) {
        if !self.in_bounds(tile) {
            return;
        }
        let index = self.index(tile);
        self.tiles[index] = kind;
    }

    fn index(&self, tile: Tile) -> usize {
        (tile.y as usize) * self.width + (tile.x as usize)
    }
}

#[derive(Clone, Debug)]
pub struct GroundItem {
    pub id: ItemId,
    pub kind: ItemKind,
    pub tile: Tile,
}

#[derive(Clone, Debug)]
pub struct Transition {
    pub tile: Tile,
    pub destination: MapId,
    /// Progress flag that must be set before the transition opens.
    pub required_flag: Option<&'static str>,
}

pub struct Map {
    pub grid: TileGrid,
    pub npcs: SlotMap<NpcId, Npc>,
    pub items: SlotMap<ItemId, GroundItem>,
    transitions: Vec<Transition>,
}

impl Map {
    pub fn new(grid: TileGrid) -> Self {
        Self { grid, npcs: SlotMap::with_key(), items: SlotMap::with_key(), transitions: Vec::new() }
    }

    pub fn spawn_npc(&mut self, kind: NpcKind, tile: Tile) -> NpcId {
        let id = self.npcs.insert(Npc::spawn(kind, tile));
        self.npcs[id].id = id;
        id
    }

    pub fn spawn_item(&mut self, kind: ItemKind, tile: Tile) -> ItemId {
        let id = self.items.insert(GroundItem { id: ItemId::default(), kind, tile });
        self.items[id].id = id;
        id
    }

    pub fn take_item_at(&mut self, tile: Tile) -> Option<GroundItem> {
        let found = self.items.iter().find(|(_, item)| item.tile == tile).map(|(id, _)| id);
        found.and_then(|id| self.items.remove(id))
    }

    pub fn add_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    pub fn transition_at(&self, tile: Tile) -> Option<&Transition> {
        self.transitions.iter().find(|transition| transition.tile == tile)
    }

    /// Occupancy snapshot at one move-start: player plus every live NPC,
    /// including reservations made earlier in the same tick. Positions of
    /// entities mid-interpolation are read as-is and never re-validated,
    /// so a one-frame visual overlap remains possible — accepted, see
    /// module docs.
    pub fn occupancy_claims(&self, player: &Player) -> Vec<OccupancyClaim> {
        let mut claims = Vec::with_capacity(self.npcs.len() + 1);
        claims.push(player.movement.claim(ClaimOwner::Player));
        for (id, npc) in &self.npcs {
            claims.push(npc.movement.claim(ClaimOwner::Npc(id)));
        }
        claims
    }

    /// One simulation tick for everything the map owns. Defeated NPCs leave
    /// the roster first, so nothing defeated last tick ever runs a decision
    /// this tick; then each survivor updates strictly in sequence.
    pub fn update(
        &mut self,
        player: &mut Player,
        now_ms: u64,
        rng: &mut ChaCha8Rng,
        events: &mut Vec<GameEvent>,
    ) {
        self.npcs.retain(|_, npc| !npc.is_defeated());

        let ids: Vec<NpcId> = self.npcs.keys().collect();
        for id in ids {
            // Fresh claims per mover: a destination reserved earlier in this
            // tick is already visible to everyone after it.
            let claims = self.occupancy_claims(player);
            let Some(npc) = self.npcs.get_mut(id) else {
                continue;
            };
            npc.update(player, now_ms, &self.grid, &claims, rng, events);
        }
    }
}
