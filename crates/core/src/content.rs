use crate::stats::Stat;
use crate::types::{ItemKind, NpcKind};

pub const GATE_SEALED_LINE: &str = "The gate is sealed. The elder's blessing would open it.";

pub const FLAG_ELDER_BLESSING: &str = "elder_blessing";

/// Per-kind configuration consumed by the one generic NPC controller.
/// Behavior differences between kinds (boss stats, wall phasing, dialog)
/// live here as data, not as subtypes.
pub struct NpcArchetype {
    pub name: &'static str,
    pub hostile: bool,
    pub base_strength: f32,
    pub base_vitality: f32,
    pub damage_base: f32,
    pub damage_per_strength: f32,
    pub health_base: f32,
    pub health_per_vitality: f32,
    /// Pixels advanced per animation step while mid-move.
    pub speed: f32,
    pub attack_cooldown_ms: u64,
    pub attack_range: f32,
    pub aggro_range: f32,
    /// Stop-chasing threshold: inside it the NPC holds and swings instead.
    pub follow_distance: f32,
    /// Tile distance from spawn past which roaming pulls back home.
    pub roam_range: u32,
    pub roam_interval_ms: u64,
    pub phases_walls: bool,
    pub loot: Option<LootEntry>,
    pub dialog: Option<&'static str>,
}

#[derive(Clone, Copy)]
pub struct LootEntry {
    pub kind: ItemKind,
    pub chance_pct: u32,
}

pub fn npc_archetype(kind: NpcKind) -> NpcArchetype {
    match kind {
        NpcKind::Slime => NpcArchetype {
            name: "slime",
            hostile: true,
            base_strength: 2.0,
            base_vitality: 3.0,
            damage_base: 1.0,
            damage_per_strength: 1.0,
            health_base: 6.0,
            health_per_vitality: 2.0,
            speed: 1.0,
            attack_cooldown_ms: 1400,
            attack_range: 40.0,
            aggro_range: 80.0,
            follow_distance: 36.0,
            roam_range: 3,
            roam_interval_ms: 2000,
            phases_walls: false,
            loot: Some(LootEntry { kind: ItemKind::Coin, chance_pct: 60 }),
            dialog: None,
        },
        NpcKind::Wolf => NpcArchetype {
            name: "wolf",
            hostile: true,
            base_strength: 4.0,
            base_vitality: 4.0,
            damage_base: 2.0,
            damage_per_strength: 1.0,
            health_base: 8.0,
            health_per_vitality: 2.0,
            speed: 2.5,
            attack_cooldown_ms: 1000,
            attack_range: 44.0,
            aggro_range: 96.0,
            follow_distance: 40.0,
            roam_range: 5,
            roam_interval_ms: 1200,
            phases_walls: false,
            loot: Some(LootEntry { kind: ItemKind::MinorHealthPotion, chance_pct: 35 }),
            dialog: None,
        },
        NpcKind::Skeleton => NpcArchetype {
            name: "skeleton",
            hostile: true,
            base_strength: 5.0,
            base_vitality: 5.0,
            damage_base: 2.0,
            damage_per_strength: 1.0,
            health_base: 10.0,
            health_per_vitality: 2.0,
            speed: 1.5,
            attack_cooldown_ms: 1200,
            attack_range: 44.0,
            aggro_range: 128.0,
            follow_distance: 40.0,
            roam_range: 4,
            roam_interval_ms: 1600,
            phases_walls: false,
            loot: Some(LootEntry { kind: ItemKind::StrengthTonic, chance_pct: 25 }),
            dialog: None,
        },
        NpcKind::Wraith => NpcArchetype {
            name: "wraith",
            hostile: true,
            base_strength: 6.0,
            base_vitality: 3.0,
            damage_base: 3.0,
            damage_per_strength: 1.0,
            health_base: 8.0,
            health_per_vitality: 2.0,
            speed: 2.0,
            attack_cooldown_ms: 1100,
            attack_range: 44.0,
            aggro_range: 160.0,
            follow_distance: 40.0,
            roam_range: 6,
            roam_interval_ms: 1400,
            phases_walls: true,
            loot: Some(LootEntry { kind: ItemKind::HardenedBarkTea, chance_pct: 30 }),
            dialog: None,
        },
        NpcKind::Ogre => NpcArchetype {
            name: "ogre",
            hostile: true,
            base_strength: 10.0,
            base_vitality: 12.0,
            damage_base: 4.0,
            damage_per_strength: 1.5,
            health_base: 20.0,
            health_per_vitality: 3.0,
            speed: 1.2,
            attack_cooldown_ms: 1800,
            attack_range: 48.0,
            aggro_range: 144.0,
            follow_distance: 44.0,
            roam_range: 2,
            roam_interval_ms: 2400,
            phases_walls: false,
            loot: Some(LootEntry { kind: ItemKind::StrengthTonic, chance_pct: 100 }),
            dialog: None,
        },
        NpcKind::Villager => NpcArchetype {
            name: "villager",
            hostile: false,
            base_strength: 1.0,
            base_vitality: 2.0,
            damage_base: 0.0,
            damage_per_strength: 0.0,
            health_base: 6.0,
            health_per_vitality: 2.0,
            speed: 1.0,
            attack_cooldown_ms: 0,
            attack_range: 0.0,
            aggro_range: 0.0,
            follow_distance: 0.0,
            roam_range: 2,
            roam_interval_ms: 2600,
            phases_walls: false,
            loot: None,
            dialog: Some("Mind the woods at night. The wolves have been restless."),
        },
        NpcKind::Elder => NpcArchetype {
            name: "elder",
            hostile: false,
            base_strength: 1.0,
            base_vitality: 3.0,
            damage_base: 0.0,
            damage_per_strength: 0.0,
            health_base: 8.0,
            health_per_vitality: 2.0,
            speed: 0.8,
            attack_cooldown_ms: 0,
            attack_range: 0.0,
            aggro_range: 0.0,
            follow_distance: 0.0,
            roam_range: 1,
            roam_interval_ms: 3200,
            phases_walls: false,
            loot: None,
            dialog: Some("Take my blessing, and the east gate will know you."),
        },
    }
}

/// Baseline player build. Permanent growth goes through the stat block's
/// modifiers, not through this table.
pub struct PlayerConfig {
    pub base_strength: f32,
    pub base_vitality: f32,
    pub damage_base: f32,
    pub damage_per_strength: f32,
    pub health_base: f32,
    pub health_per_vitality: f32,
    pub speed: f32,
    pub attack_cooldown_ms: u64,
    pub attack_range: f32,
}

pub fn player_config() -> PlayerConfig {
    PlayerConfig {
        base_strength: 5.0,
        base_vitality: 5.0,
        damage_base: 2.0,
        damage_per_strength: 1.0,
        health_base: 10.0,
        health_per_vitality: 2.0,
        speed: 4.0,
        attack_cooldown_ms: 600,
        attack_range: 48.0,
    }
}

pub enum ItemEffect {
    Heal(f32),
    Buff {
        name: &'static str,
        effects: &'static [(Stat, f32)],
        duration_ms: u64,
        is_debuff: bool,
    },
    /// No simulation effect; the pickup event is the whole payoff.
    Trinket,
}

pub struct ItemDef {
    pub name: &'static str,
    pub effect: ItemEffect,
}

pub fn item_def(kind: ItemKind) -> ItemDef {
    match kind {
        ItemKind::MinorHealthPotion => {
            ItemDef { name: "Minor Health Potion", effect: ItemEffect::Heal(10.0) }
        }
        ItemKind::StrengthTonic => ItemDef {
            name: "Strength Tonic",
            effect: ItemEffect::Buff {
                name: "strength_tonic",
                effects: &[(Stat::Strength, 3.0)],
                duration_ms: 20_000,
                is_debuff: false,
            },
        },
        ItemKind::HardenedBarkTea => ItemDef {
            name: "Hardened Bark Tea",
            effect: ItemEffect::Buff {
                name: "hardened_bark_tea",
                effects: &[(Stat::Vitality, 4.0)],
                duration_ms: 30_000,
                is_debuff: false,
            },
        },
        ItemKind::Coin => ItemDef { name: "Coin", effect: ItemEffect::Trinket },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostile_kinds_have_combat_ranges_and_loot() {
        let hostile =
            [NpcKind::Slime, NpcKind::Wolf, NpcKind::Skeleton, NpcKind::Wraith, NpcKind::Ogre];
        for kind in hostile {
            let arch = npc_archetype(kind);
            assert!(arch.hostile, "{kind:?} should be hostile");
            assert!(arch.attack_range > 0.0, "{kind:?} needs an attack range");
            assert!(arch.aggro_range >= arch.follow_distance, "{kind:?} aggro envelope inverted");
            assert!(arch.attack_cooldown_ms > 0, "{kind:?} needs an attack cooldown");
            assert!(arch.loot.is_some(), "{kind:?} should carry a loot entry");
        }
    }

    #[test]
    fn dialog_kinds_never_fight() {
        for kind in [NpcKind::Villager, NpcKind::Elder] {
            let arch = npc_archetype(kind);
            assert!(!arch.hostile);
            assert!(arch.dialog.is_some(), "{kind:?} should have a dialog line");
        }
    }

    #[test]
    fn only_the_wraith_phases_walls() {
        let all = [
            NpcKind::Slime,
            NpcKind::Wolf,
            NpcKind::Skeleton,
            NpcKind::Wraith,
            NpcKind::Ogre,
            NpcKind::Villager,
            NpcKind::Elder,
        ];
        for kind in all {
            assert_eq!(npc_archetype(kind).phases_walls, kind == NpcKind::Wraith);
        }
    }
}
