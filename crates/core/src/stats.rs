//! Attribute totals and time-limited buff bookkeeping.
//! Expiry is a lazy sweep: a lapsed buff stops counting at the next
//! `update` call, never at the exact millisecond.

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stat {
    Strength,
    Vitality,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BuffId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub struct Buff {
    pub id: BuffId,
    pub name: &'static str,
    pub effects: Vec<(Stat, f32)>,
    pub applied_at_ms: u64,
    pub expires_at_ms: u64,
    pub is_debuff: bool,
}

impl Buff {
    fn delta_for(&self, stat: Stat) -> f32 {
        self.effects.iter().filter(|(s, _)| *s == stat).map(|(_, delta)| delta).sum()
    }
}

pub struct StatBlock {
    strength_base: f32,
    strength_modifier: f32,
    vitality_base: f32,
    vitality_modifier: f32,
    damage_base: f32,
    damage_per_strength: f32,
    health_base: f32,
    health_per_vitality: f32,
    buffs: Vec<Buff>,
    next_buff_id: u64,
}

impl StatBlock {
    pub fn new(
        base_strength: f32,
        base_vitality: f32,
        damage_base: f32,
        damage_per_strength: f32,
        health_base: f32,
        health_per_vitality: f32,
    ) -> Self {
        Self {
            strength_base: base_strength,
            strength_modifier: 0.0,
            vitality_base: base_vitality,
            vitality_modifier: 0.0,
            damage_base,
            damage_per_strength,
            health_base,
            health_per_vitality,
            buffs: Vec::new(),
            next_buff_id: 0,
        }
    }

    /// Base + permanent modifier + every buff still counted as active.
    /// Total over all stats; never fails.
    pub fn stat_total(&self, stat: Stat) -> f32 {
        let (base, modifier) = match stat {
            Stat::Strength => (self.strength_base, self.strength_modifier),
            Stat::Vitality => (self.vitality_base, self.vitality_modifier),
        };
        let buffed: f32 = self.buffs.iter().map(|buff| buff.delta_for(stat)).sum();
        base + modifier + buffed
    }

    /// Permanent growth (level-ups, quest rewards). Stacks with buffs.
    pub fn add_modifier(&mut self, stat: Stat, delta: f32) {
        match stat {
            Stat::Strength => self.strength_modifier += delta,
            Stat::Vitality => self.vitality_modifier += delta,
        }
    }

    /// Multiple buffs touching the same stat stack additively.
    pub fn apply_buff(
        &mut self,
        effects: &[(Stat, f32)],
        duration_ms: u64,
        name: &'static str,
        is_debuff: bool,
        now_ms: u64,
    ) -> BuffId {
        let id = BuffId(self.next_buff_id);
        self.next_buff_id += 1;
        self.buffs.push(Buff {
            id,
            name,
            effects: effects.to_vec(),
            applied_at_ms: now_ms,
            expires_at_ms: now_ms.saturating_add(duration_ms),
            is_debuff,
        });
        id
    }

    pub fn remove_buff(&mut self, id: BuffId) -> bool {
        let before = self.buffs.len();
        self.buffs.retain(|buff| buff.id != id);
        self.buffs.len() != before
    }

    /// Sweep out lapsed buffs, returning them so the caller can report
    /// expiry. Called once per simulation tick per entity.
    pub fn update(&mut self, now_ms: u64) -> Vec<Buff> {
        let mut expired = Vec::new();
        self.buffs.retain(|buff| {
            if now_ms >= buff.expires_at_ms {
                expired.push(buff.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn buffs(&self) -> &[Buff] {
        &self.buffs
    }

    /// Pure derivation; safe to call any number of times per tick.
    pub fn damage(&self) -> f32 {
        self.damage_base + self.stat_total(Stat::Strength) * self.damage_per_strength
    }

    /// Pure derivation; safe to call any number of times per tick.
    pub fn max_health(&self) -> f32 {
        self.health_base + self.stat_total(Stat::Vitality) * self.health_per_vitality
    }
}
