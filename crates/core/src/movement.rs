//! Tile-grid locomotion: move validation, facing, and the pixel
//! interpolation between tiles.
//!
//! Destination conflicts are checked against a claims snapshot taken at
//! move-start and never re-validated mid-interpolation, so two movers can
//! still end up visually overlapping for a frame. The snapshot is advisory,
//! not transactional, and that race is accepted.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

use crate::map::TileGrid;
use crate::types::{Direction, NpcId, TILE_SIZE, Tile, Vec2px};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClaimOwner {
    Player,
    Npc(NpcId),
}

/// One entity's footprint in the occupancy snapshot: the tile it stands on
/// plus, while mid-move, the tile it is heading for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OccupancyClaim {
    pub owner: ClaimOwner,
    pub tile: Tile,
    pub reserved: Option<Tile>,
    pub phases_walls: bool,
}

pub struct MovementComponent {
    pub position: Vec2px,
    pub target: Vec2px,
    pub direction: Direction,
    pub is_moving: bool,
    /// Pixels advanced per animation step.
    pub speed: f32,
    pub spawn_tile: Tile,
    pub phases_walls: bool,
}

impl MovementComponent {
    pub fn new(spawn_tile: Tile, speed: f32, phases_walls: bool) -> Self {
        let position = spawn_tile.origin_px();
        Self {
            position,
            target: position,
            direction: Direction::Down,
            is_moving: false,
            speed,
            spawn_tile,
            phases_walls,
        }
    }

    pub fn center(&self) -> Vec2px {
        Vec2px { x: self.position.x + TILE_SIZE / 2.0, y: self.position.y + TILE_SIZE / 2.0 }
    }

    /// Tile under the entity's center. Mid-move this flips from the source
    /// tile to the destination about halfway through the interpolation.
    pub fn tile(&self) -> Tile {
        Tile::containing(self.center())
    }

    pub fn target_tile(&self) -> Tile {
        Tile::containing(Vec2px {
            x: self.target.x + TILE_SIZE / 2.0,
            y: self.target.y + TILE_SIZE / 2.0,
        })
    }

    pub fn claim(&self, owner: ClaimOwner) -> OccupancyClaim {
        OccupancyClaim {
            owner,
            tile: self.tile(),
            reserved: self.is_moving.then(|| self.target_tile()),
            phases_walls: self.phases_walls,
        }
    }

    pub fn face_toward(&mut self, target_center: Vec2px) {
        let origin = self.center();
        if let Some(direction) =
            Direction::toward(target_center.x - origin.x, target_center.y - origin.y)
        {
            self.direction = direction;
        }
    }

    /// Whether a one-tile move to `tile` would be legal right now: in
    /// bounds, not solid (wall-phasing movers skip solidity), and not
    /// claimed by anyone else. Two wall-phasing entities are allowed to
    /// share a destination; any pairing with a solid mover is not.
    pub fn is_valid_tile_move(
        &self,
        tile: Tile,
        grid: &TileGrid,
        claims: &[OccupancyClaim],
        owner: ClaimOwner,
    ) -> bool {
        if !grid.in_bounds(tile) {
            return false;
        }
        if !self.phases_walls && grid.is_solid(tile) {
            return false;
        }
        for claim in claims {
            if claim.owner == owner {
                continue;
            }
            if self.phases_walls && claim.phases_walls {
                continue;
            }
            if claim.tile == tile || claim.reserved == Some(tile) {
                return false;
            }
        }
        true
    }

    /// Order one tile of movement. Facing updates first, unconditionally:
    /// a blocked move still turns the entity. Returns true iff the move
    /// started. No-op while a previous move is still animating.
    pub fn attempt_move(
        &mut self,
        tile: Tile,
        dx: i32,
        dy: i32,
        grid: &TileGrid,
        claims: &[OccupancyClaim],
        owner: ClaimOwner,
    ) -> bool {
        if let Some(direction) = Direction::toward(dx as f32, dy as f32) {
            self.direction = direction;
        }
        if self.is_moving {
            return false;
        }
        if !self.is_valid_tile_move(tile, grid, claims, owner) {
            return false;
        }
        self.target = tile.origin_px();
        self.is_moving = true;
        true
    }

    /// Advance the interpolation by one step. Snaps exactly onto the target
    /// once the remaining distance drops under `speed`, so repeated calls
    /// never accumulate drift. Returns true on the arriving step.
    pub fn step_animation(&mut self) -> bool {
        if !self.is_moving {
            return false;
        }
        let dx = self.target.x - self.position.x;
        let dy = self.target.y - self.position.y;
        if dx.abs() + dy.abs() < self.speed {
            self.position = self.target;
            self.is_moving = false;
            return true;
        }
        self.position.x += dx.clamp(-self.speed, self.speed);
        self.position.y += dy.clamp(-self.speed, self.speed);
        false
    }

    /// Chase step: no-op while already moving or inside `follow_distance`;
    /// otherwise one greedy L-shaped step toward the target center.
    pub fn follow_target(
        &mut self,
        target_center: Vec2px,
        grid: &TileGrid,
        claims: &[OccupancyClaim],
        owner: ClaimOwner,
        follow_distance: f32,
    ) -> bool {
        if self.is_moving {
            return false;
        }
        if self.center().distance(target_center) <= follow_distance {
            return false;
        }
        let there = Tile::containing(target_center);
        let here = self.tile();
        self.greedy_step(there.x - here.x, there.y - here.y, grid, claims, owner)
    }

    /// One greedy step toward a tile, larger-axis first. Used by the roam
    /// leash; deliberately shares the chase logic's tie-breaks.
    pub fn step_toward_tile(
        &mut self,
        dest: Tile,
        grid: &TileGrid,
        claims: &[OccupancyClaim],
        owner: ClaimOwner,
    ) -> bool {
        if self.is_moving {
            return false;
        }
        let here = self.tile();
        self.greedy_step(dest.x - here.x, dest.y - here.y, grid, claims, owner)
    }

    /// One uniform-random cardinal step. No retry on a blocked pick; the
    /// caller simply gets `false` for this tick.
    pub fn move_randomly(
        &mut self,
        grid: &TileGrid,
        claims: &[OccupancyClaim],
        owner: ClaimOwner,
        rng: &mut ChaCha8Rng,
    ) -> bool {
        let direction = match rng.next_u32() % 4 {
            0 => Direction::Up,
            1 => Direction::Right,
            2 => Direction::Down,
            _ => Direction::Left,
        };
        let (dx, dy) = direction.step();
        let here = self.tile();
        self.attempt_move(here.offset(dx, dy), dx, dy, grid, claims, owner)
    }

    /// Larger tile-delta axis first (ties go vertical), other axis as the
    /// fallback when the first is blocked. Greedy, not A*: a concave
    /// obstacle can wedge it, and that is accepted.
    fn greedy_step(
        &mut self,
        dx_tiles: i32,
        dy_tiles: i32,
        grid: &TileGrid,
        claims: &[OccupancyClaim],
        owner: ClaimOwner,
    ) -> bool {
        let horizontal = (dx_tiles.signum(), 0);
        let vertical = (0, dy_tiles.signum());
        let ordered = if dx_tiles.abs() > dy_tiles.abs() {
            [horizontal, vertical]
        } else {
            [vertical, horizontal]
        };
        for (dx, dy) in ordered {
            if dx == 0 && dy == 0 {
                continue;
            }
            let here = self.tile();
            if self.attempt_move(here.offset(dx, dy), dx, dy, grid, claims, owner) {
                return true;
            }
        }
        false
    }
}
