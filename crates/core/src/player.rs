//! Input-driven player entity. Translates one `PlayerInput` per tick into
//! movement/combat calls; keybindings, dialog locks and scene transitions
//! are resolved upstream.

use std::collections::BTreeSet;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

use crate::combat::{CombatComponent, melee_attack};
use crate::content::{self, ItemEffect, item_def, npc_archetype, player_config};
use crate::map::Map;
use crate::movement::{ClaimOwner, MovementComponent};
use crate::stats::StatBlock;
use crate::types::{EffectKind, GameEvent, NpcId, PlayerInput, Target, Tile};

pub struct Player {
    pub movement: MovementComponent,
    pub combat: CombatComponent,
    pub stats: StatBlock,
}

impl Player {
    pub fn spawn(tile: Tile) -> Self {
        let config = player_config();
        let stats = StatBlock::new(
            config.base_strength,
            config.base_vitality,
            config.damage_base,
            config.damage_per_strength,
            config.health_base,
            config.health_per_vitality,
        );
        let combat =
            CombatComponent::new(stats.max_health(), config.attack_cooldown_ms, config.attack_range);
        let movement = MovementComponent::new(tile, config.speed, false);
        Self { movement, combat, stats }
    }

    /// One player tick. Runs after the map's NPC pass so the player acts on
    /// the freshest NPC positions within the frame.
    pub fn update(
        &mut self,
        input: PlayerInput,
        map: &mut Map,
        progress_flags: &BTreeSet<&'static str>,
        now_ms: u64,
        rng: &mut ChaCha8Rng,
        events: &mut Vec<GameEvent>,
    ) {
        for buff in self.stats.update(now_ms) {
            events.push(GameEvent::BuffExpired { name: buff.name });
        }
        self.combat.sync_max_health(&self.stats);

        if self.movement.step_animation() {
            self.on_tile_entered(map, progress_flags, now_ms, events);
        }
        if self.combat.is_defeated {
            // A downed player stops being a source of intent; the map keeps
            // ticking around them.
            return;
        }

        if (input.dx, input.dy) != (0, 0) {
            self.handle_move_intent(input, map);
        }
        if input.attack {
            self.try_attack(map, now_ms, rng, events);
        }
        if input.interact {
            self.try_interact(map, progress_flags, events);
        }
    }

    /// Collapse the input to a single axis; the shared dominant-axis rule
    /// applies, so a perfectly diagonal intent steps vertically.
    fn handle_move_intent(&mut self, input: PlayerInput, map: &Map) {
        let (dx, dy) = if input.dx.abs() > input.dy.abs() {
            (input.dx.signum(), 0)
        } else {
            (0, input.dy.signum())
        };
        let dest = self.movement.tile().offset(dx, dy);
        let claims = map.occupancy_claims(self);
        self.movement.attempt_move(dest, dx, dy, &map.grid, &claims, ClaimOwner::Player);
    }

    fn try_attack(
        &mut self,
        map: &mut Map,
        now_ms: u64,
        rng: &mut ChaCha8Rng,
        events: &mut Vec<GameEvent>,
    ) {
        let Some(target_id) = self.nearest_target_in_range(map) else {
            return;
        };
        let damage = self.stats.damage();
        let (outcome, target_kind, target_tile, target_center) = {
            let Some(target) = map.npcs.get_mut(target_id) else {
                return;
            };
            let center = target.movement.center();
            let outcome = melee_attack(
                now_ms,
                &mut self.combat,
                &mut self.movement,
                damage,
                &mut target.combat,
                center,
            );
            (outcome, target.kind, target.movement.tile(), center)
        };
        if !outcome.connected {
            return;
        }
        events.push(GameEvent::DamageDealt { target: Target::Npc(target_id), amount: damage });
        events.push(GameEvent::EffectRequested { effect: EffectKind::Hit, at: target_center });
        if outcome.target_defeated {
            events.push(GameEvent::NpcDefeated {
                npc: target_id,
                kind: target_kind,
                tile: target_tile,
            });
            if let Some(loot) = npc_archetype(target_kind).loot
                && rng.next_u32() % 100 < loot.chance_pct
            {
                let item = map.spawn_item(loot.kind, target_tile);
                events.push(GameEvent::ItemDropped { item, kind: loot.kind, tile: target_tile });
            }
        }
    }

    fn nearest_target_in_range(&self, map: &Map) -> Option<NpcId> {
        let origin = self.movement.center();
        let mut best: Option<(NpcId, f32)> = None;
        for (id, npc) in &map.npcs {
            if npc.combat.is_defeated {
                continue;
            }
            let distance = origin.distance(npc.movement.center());
            if distance > self.combat.attack_range {
                continue;
            }
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((id, distance));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Talk to whatever stands on the faced tile: dialog NPCs answer with
    /// their line, sealed gates explain themselves.
    fn try_interact(
        &self,
        map: &Map,
        progress_flags: &BTreeSet<&'static str>,
        events: &mut Vec<GameEvent>,
    ) {
        let (dx, dy) = self.movement.direction.step();
        let faced = self.movement.tile().offset(dx, dy);

        for (_, npc) in &map.npcs {
            if npc.movement.tile() != faced {
                continue;
            }
            let arch = npc_archetype(npc.kind);
            if let Some(line) = arch.dialog {
                events.push(GameEvent::DialogRequested { speaker: arch.name, line });
            }
            return;
        }

        if let Some(transition) = map.transition_at(faced)
            && let Some(flag) = transition.required_flag
            && !progress_flags.contains(flag)
        {
            events.push(GameEvent::DialogRequested {
                speaker: "gate",
                line: content::GATE_SEALED_LINE,
            });
        }
    }

    /// Runs once per completed tile move: ground pickups, then transitions.
    fn on_tile_entered(
        &mut self,
        map: &mut Map,
        progress_flags: &BTreeSet<&'static str>,
        now_ms: u64,
        events: &mut Vec<GameEvent>,
    ) {
        let tile = self.movement.tile();

        if let Some(item) = map.take_item_at(tile) {
            events.push(GameEvent::ItemPickedUp { kind: item.kind });
            events.push(GameEvent::EffectRequested {
                effect: EffectKind::Pickup,
                at: tile.center_px(),
            });
            match item_def(item.kind).effect {
                ItemEffect::Heal(amount) => {
                    if self.combat.heal(amount) > 0.0 {
                        events.push(GameEvent::EffectRequested {
                            effect: EffectKind::Heal,
                            at: tile.center_px(),
                        });
                    }
                }
                ItemEffect::Buff { name, effects, duration_ms, is_debuff } => {
                    self.stats.apply_buff(effects, duration_ms, name, is_debuff, now_ms);
                    events.push(GameEvent::BuffApplied { name, is_debuff });
                }
                ItemEffect::Trinket => {}
            }
        }

        if let Some(transition) = map.transition_at(tile) {
            match transition.required_flag {
                Some(flag) if !progress_flags.contains(flag) => {
                    events.push(GameEvent::DialogRequested {
                        speaker: "gate",
                        line: content::GATE_SEALED_LINE,
                    });
                }
                _ => {
                    events.push(GameEvent::TransitionEntered {
                        destination: transition.destination,
                    });
                }
            }
        }
    }
}
