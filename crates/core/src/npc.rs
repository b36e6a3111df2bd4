//! The one generic NPC controller. Kind differences (boss stats, wall
//! phasing, dialog, loot) are archetype data, not subtypes.

use rand_chacha::ChaCha8Rng;

use crate::combat::{CombatComponent, melee_attack};
use crate::content::{NpcArchetype, npc_archetype};
use crate::map::TileGrid;
use crate::movement::{ClaimOwner, MovementComponent, OccupancyClaim};
use crate::player::Player;
use crate::stats::StatBlock;
use crate::types::{EffectKind, GameEvent, NpcId, NpcKind, Target, Tile};

pub struct Npc {
    pub id: NpcId,
    pub kind: NpcKind,
    pub movement: MovementComponent,
    pub combat: CombatComponent,
    pub stats: StatBlock,
    /// Current aggro state: actively targeting the player. Re-evaluated
    /// against the aggro range every tick for hostile kinds.
    pub is_aggressive: bool,
    next_roam_ms: u64,
}

impl Npc {
    pub fn spawn(kind: NpcKind, tile: Tile) -> Self {
        let arch = npc_archetype(kind);
        let stats = StatBlock::new(
            arch.base_strength,
            arch.base_vitality,
            arch.damage_base,
            arch.damage_per_strength,
            arch.health_base,
            arch.health_per_vitality,
        );
        let combat =
            CombatComponent::new(stats.max_health(), arch.attack_cooldown_ms, arch.attack_range);
        let movement = MovementComponent::new(tile, arch.speed, arch.phases_walls);
        Self {
            id: NpcId::default(),
            kind,
            movement,
            combat,
            stats,
            is_aggressive: false,
            next_roam_ms: 0,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.combat.is_defeated
    }

    /// One decision tick, driven by the owning map. The player arrives as a
    /// transient parameter every call; the NPC keeps no reference to it.
    pub fn update(
        &mut self,
        player: &mut Player,
        now_ms: u64,
        grid: &TileGrid,
        claims: &[OccupancyClaim],
        rng: &mut ChaCha8Rng,
        events: &mut Vec<GameEvent>,
    ) {
        for buff in self.stats.update(now_ms) {
            events.push(GameEvent::BuffExpired { name: buff.name });
        }
        self.combat.sync_max_health(&self.stats);
        self.movement.step_animation();
        if self.combat.is_defeated {
            // The map culls before the behavior pass; this covers mid-tick
            // defeats so a corpse never decides anything.
            return;
        }

        let arch = npc_archetype(self.kind);
        let owner = ClaimOwner::Npc(self.id);

        if arch.hostile {
            let player_center = player.movement.center();
            let distance = self.movement.center().distance(player_center);
            self.is_aggressive = distance <= arch.aggro_range;
            if self.is_aggressive {
                if distance > arch.follow_distance {
                    self.movement.follow_target(
                        player_center,
                        grid,
                        claims,
                        owner,
                        arch.follow_distance,
                    );
                } else {
                    let damage = self.stats.damage();
                    let outcome = melee_attack(
                        now_ms,
                        &mut self.combat,
                        &mut self.movement,
                        damage,
                        &mut player.combat,
                        player_center,
                    );
                    if outcome.connected {
                        events.push(GameEvent::DamageDealt { target: Target::Player, amount: damage });
                        events.push(GameEvent::EffectRequested {
                            effect: EffectKind::Hit,
                            at: player_center,
                        });
                        if outcome.target_defeated {
                            events.push(GameEvent::PlayerDefeated);
                        }
                    }
                }
                return;
            }
        }

        self.roam(now_ms, &arch, grid, claims, owner, rng);
    }

    /// Idle wandering on a fixed cadence, not every tick. Past the roam
    /// range the NPC is pulled one step back toward its spawn tile instead
    /// of picking a random direction.
    fn roam(
        &mut self,
        now_ms: u64,
        arch: &NpcArchetype,
        grid: &TileGrid,
        claims: &[OccupancyClaim],
        owner: ClaimOwner,
        rng: &mut ChaCha8Rng,
    ) {
        if self.movement.is_moving || now_ms < self.next_roam_ms {
            return;
        }
        self.next_roam_ms = now_ms + arch.roam_interval_ms;
        let here = self.movement.tile();
        let spawn = self.movement.spawn_tile;
        if here.manhattan(spawn) > arch.roam_range {
            self.movement.step_toward_tile(spawn, grid, claims, owner);
        } else {
            self.movement.move_randomly(grid, claims, owner, rng);
        }
    }
}
