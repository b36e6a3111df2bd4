//! Health, attack cooldown, and the damage/defeat lifecycle.
//!
//! Nothing here returns `Result`: an attack on cooldown or out of range is a
//! normal per-tick outcome, reported as `false` and nothing else.

use crate::movement::MovementComponent;
use crate::stats::StatBlock;
use crate::types::Vec2px;

pub struct CombatComponent {
    pub current_health: f32,
    pub max_health: f32,
    pub attack_cooldown_ms: u64,
    pub attack_range: f32,
    next_attack_ms: u64,
    pub is_defeated: bool,
    /// Presentation-only: when the last hit landed, for the renderer's
    /// damage flash. Not part of any simulation decision.
    pub last_hit_ms: Option<u64>,
}

impl CombatComponent {
    pub fn new(max_health: f32, attack_cooldown_ms: u64, attack_range: f32) -> Self {
        Self {
            current_health: max_health,
            max_health,
            attack_cooldown_ms,
            attack_range,
            next_attack_ms: 0,
            is_defeated: false,
            last_hit_ms: None,
        }
    }

    /// Recompute the health cap from current stat totals. When a vitality
    /// buff lapses the cap shrinks, but current health keeps any surplus
    /// until the next heal clamps it.
    pub fn sync_max_health(&mut self, stats: &StatBlock) {
        self.max_health = stats.max_health();
    }

    /// Returns true iff this call caused the transition to defeated.
    /// Further hits on a defeated component are no-ops: the defeat state is
    /// sticky and reported exactly once.
    pub fn take_damage(&mut self, amount: f32, now_ms: u64) -> bool {
        if self.is_defeated {
            return false;
        }
        let amount = amount.max(0.0);
        self.last_hit_ms = Some(now_ms);
        self.current_health = (self.current_health - amount).max(0.0);
        if self.current_health <= 0.0 {
            self.is_defeated = true;
            return true;
        }
        false
    }

    /// Clamped at the current cap; defeated components stay down.
    /// Returns the change in health, which is negative when the clamp pulls
    /// surplus health back under a cap that shrank since the last heal.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if self.is_defeated {
            return 0.0;
        }
        let amount = amount.max(0.0);
        let before = self.current_health;
        self.current_health = (self.current_health + amount).min(self.max_health);
        self.current_health - before
    }

    pub fn ready_to_attack(&self, now_ms: u64) -> bool {
        now_ms >= self.next_attack_ms
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.current_health / self.max_health).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackOutcome {
    /// The swing was delivered (cooldown elapsed and target in range).
    pub connected: bool,
    /// This swing brought the target down.
    pub target_defeated: bool,
}

const MISSED: AttackOutcome = AttackOutcome { connected: false, target_defeated: false };

/// One melee swing. On cooldown: no side effects at all. Out of range: no
/// side effects either, the cooldown is not consumed. A delivered swing
/// turns the attacker toward the target, damages it, and re-arms the
/// cooldown.
pub fn melee_attack(
    now_ms: u64,
    attacker: &mut CombatComponent,
    attacker_movement: &mut MovementComponent,
    damage: f32,
    target: &mut CombatComponent,
    target_center: Vec2px,
) -> AttackOutcome {
    if !attacker.ready_to_attack(now_ms) {
        return MISSED;
    }
    let origin = attacker_movement.center();
    if origin.distance(target_center) > attacker.attack_range {
        return MISSED;
    }
    attacker_movement.face_toward(target_center);
    let target_defeated = target.take_damage(damage, now_ms);
    attacker.next_attack_ms = now_ms + attacker.attack_cooldown_ms;
    AttackOutcome { connected: true, target_defeated }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::types::{Direction, Tile};

    fn movement_at(tile: Tile) -> MovementComponent {
        MovementComponent::new(tile, 2.0, false)
    }

    #[test]
    fn lethal_hit_reports_defeat_once() {
        let mut combat = CombatComponent::new(10.0, 1000, 44.0);
        assert!(combat.take_damage(15.0, 0));
        assert_eq!(combat.current_health, 0.0);
        assert!(combat.is_defeated);

        // Zero-damage and follow-up hits must not re-trigger the defeat.
        assert!(!combat.take_damage(0.0, 10));
        assert!(!combat.take_damage(5.0, 20));
    }

    #[test]
    fn negative_damage_is_clamped_to_zero() {
        let mut combat = CombatComponent::new(10.0, 1000, 44.0);
        assert!(!combat.take_damage(-5.0, 0));
        assert_eq!(combat.current_health, 10.0);
    }

    #[test]
    fn heal_clamps_at_cap_and_never_revives() {
        let mut combat = CombatComponent::new(20.0, 1000, 44.0);
        combat.take_damage(5.0, 0);
        assert_eq!(combat.heal(3.0), 3.0);
        assert_eq!(combat.heal(100.0), 2.0);
        assert_eq!(combat.current_health, 20.0);

        combat.take_damage(100.0, 10);
        assert!(combat.is_defeated);
        assert_eq!(combat.heal(50.0), 0.0);
        assert_eq!(combat.current_health, 0.0);
    }

    #[test]
    fn shrunken_cap_leaves_surplus_health_until_next_heal() {
        let mut stats = StatBlock::new(0.0, 5.0, 0.0, 0.0, 10.0, 2.0);
        let mut combat = CombatComponent::new(stats.max_health(), 1000, 44.0);
        assert_eq!(combat.current_health, 20.0);

        stats.apply_buff(&[(crate::stats::Stat::Vitality, 5.0)], 1000, "tea", false, 0);
        combat.sync_max_health(&stats);
        combat.heal(10.0);
        assert_eq!(combat.current_health, 30.0);

        stats.update(1000);
        combat.sync_max_health(&stats);
        // Surplus persists past the shrink...
        assert_eq!(combat.current_health, 30.0);
        assert_eq!(combat.max_health, 20.0);
        // ...until a heal clamps it back under the cap.
        assert_eq!(combat.heal(1.0), -10.0);
        assert_eq!(combat.current_health, 20.0);
    }

    #[test]
    fn cooldown_gates_successive_swings() {
        let mut attacker = CombatComponent::new(20.0, 1000, 44.0);
        let mut movement = movement_at(Tile { x: 2, y: 2 });
        let mut target = CombatComponent::new(50.0, 1000, 44.0);
        let target_center = Tile { x: 3, y: 2 }.center_px();

        let first = melee_attack(0, &mut attacker, &mut movement, 5.0, &mut target, target_center);
        assert!(first.connected);
        assert_eq!(target.current_health, 45.0);

        let early = melee_attack(500, &mut attacker, &mut movement, 5.0, &mut target, target_center);
        assert!(!early.connected);
        assert_eq!(target.current_health, 45.0);

        let again = melee_attack(1000, &mut attacker, &mut movement, 5.0, &mut target, target_center);
        assert!(again.connected);
        assert_eq!(target.current_health, 40.0);
    }

    #[test]
    fn out_of_range_swing_keeps_the_cooldown_armed() {
        let mut attacker = CombatComponent::new(20.0, 1000, 44.0);
        let mut movement = movement_at(Tile { x: 2, y: 2 });
        let mut target = CombatComponent::new(50.0, 1000, 44.0);
        let far = Tile { x: 8, y: 2 }.center_px();

        assert!(!melee_attack(0, &mut attacker, &mut movement, 5.0, &mut target, far).connected);
        // The miss consumed nothing: an in-range swing right after still lands.
        let near = Tile { x: 3, y: 2 }.center_px();
        assert!(melee_attack(1, &mut attacker, &mut movement, 5.0, &mut target, near).connected);
    }

    #[test]
    fn delivered_swing_faces_the_target_with_vertical_tie_break() {
        let mut attacker = CombatComponent::new(20.0, 1000, 64.0);
        let mut movement = movement_at(Tile { x: 2, y: 2 });
        let mut target = CombatComponent::new(50.0, 1000, 44.0);

        melee_attack(0, &mut attacker, &mut movement, 1.0, &mut target, Tile { x: 3, y: 2 }.center_px());
        assert_eq!(movement.direction, Direction::Right);

        // Perfect diagonal: |dx| == |dy| resolves to the vertical axis.
        melee_attack(1000, &mut attacker, &mut movement, 1.0, &mut target, Tile { x: 3, y: 3 }.center_px());
        assert_eq!(movement.direction, Direction::Down);
    }

    #[test]
    fn swing_that_defeats_reports_it() {
        let mut attacker = CombatComponent::new(20.0, 1000, 44.0);
        let mut movement = movement_at(Tile { x: 2, y: 2 });
        let mut target = CombatComponent::new(4.0, 1000, 44.0);
        let outcome = melee_attack(
            0,
            &mut attacker,
            &mut movement,
            5.0,
            &mut target,
            Tile { x: 3, y: 2 }.center_px(),
        );
        assert!(outcome.connected);
        assert!(outcome.target_defeated);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(512))]
        #[test]
        fn health_stays_clamped_under_any_damage_heal_sequence(
            ops in prop::collection::vec((any::<bool>(), 0.0_f32..500.0), 1..64)
        ) {
            let mut combat = CombatComponent::new(100.0, 1000, 44.0);
            for (index, (is_damage, amount)) in ops.into_iter().enumerate() {
                if is_damage {
                    combat.take_damage(amount, index as u64);
                } else {
                    combat.heal(amount);
                }
                prop_assert!(combat.current_health >= 0.0);
                prop_assert!(combat.current_health <= combat.max_health);
            }
        }
    }
}
