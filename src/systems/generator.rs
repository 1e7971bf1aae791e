// src/systems/generator.rs

//! Generator model: production, cost curve and bulk affordability for one
//! production source. Everything here is a pure function of the level and
//! the static [`GeneratorDef`]; the only mutable state is [`Generator::level`].

use serde::{Deserialize, Serialize};

use crate::mechanics::{curve, milestone};

/// How milestone tiers feed into production.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestonePolicy {
    /// `linear * Π (1 + mult)^count`, unbounded.
    #[default]
    Compound,
    /// `linear * (1 + log10(1 + Π (1 + mult)^count))`.
    Dampened,
}

/// One milestone tier: every `interval` levels, output is scaled by `1 + multiplier`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// 0 disables the tier.
    pub interval: u32,
    pub multiplier: f64,
}

impl Milestone {
    pub const OFF: Self = Self { interval: 0, multiplier: 0.0 };

    pub fn new(interval: u32, multiplier: f64) -> Self {
        Self { interval, multiplier }
    }

    #[inline]
    pub fn count(&self, level: u32) -> u32 {
        milestone::completed(level, self.interval)
    }

    #[inline]
    pub fn factor(&self, level: u32) -> f64 {
        milestone::tier_factor(self.multiplier, self.count(level))
    }
}

/// The three tiers a generator can hit. `strong` drives constellation tiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MilestoneTiers {
    pub weak: Milestone,
    pub strong: Milestone,
    pub grand: Milestone,
}

impl MilestoneTiers {
    pub fn none() -> Self {
        Self::default()
    }

    /// Product of the three independent tier factors.
    pub fn compounded(&self, level: u32) -> f64 {
        self.weak.factor(level) * self.strong.factor(level) * self.grand.factor(level)
    }
}

/// Static parameters of a generator, immutable for the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorDef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Output per level per second, before milestones.
    pub base_production: f64,
    pub base_cost: f64,
    /// Per-level cost ratio; expected > 1.
    pub cost_growth: f64,
    /// Lifetime stardust needed before the generator shows as unlocked.
    #[serde(default)]
    pub unlock_at: f64,
    #[serde(default)]
    pub milestones: MilestoneTiers,
}

impl GeneratorDef {
    pub fn new(id: impl Into<String>, base_production: f64, base_cost: f64, cost_growth: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            base_production,
            base_cost,
            cost_growth,
            unlock_at: 0.0,
            milestones: MilestoneTiers::none(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn unlock_at(mut self, lifetime: f64) -> Self {
        self.unlock_at = lifetime;
        self
    }

    pub fn milestones(mut self, tiers: MilestoneTiers) -> Self {
        self.milestones = tiers;
        self
    }

    /// Milestone scaling at `level` under `policy`.
    pub fn milestone_multiplier(&self, level: u32, policy: MilestonePolicy) -> f64 {
        let raw = self.milestones.compounded(level);
        match policy {
            MilestonePolicy::Compound => raw,
            MilestonePolicy::Dampened => milestone::dampen(raw),
        }
    }

    /// Units per second at `level`. Zero at level 0, never NaN.
    pub fn production_per_second(&self, level: u32, policy: MilestonePolicy) -> f64 {
        if level == 0 {
            return 0.0;
        }
        let linear = self.base_production * f64::from(level);
        let out = linear * self.milestone_multiplier(level, policy);
        if out.is_nan() { 0.0 } else { out.min(f64::MAX) }
    }

    /// Price of going from `level` to `level + 1`.
    pub fn next_level_cost(&self, level: u32, cost_reduction: f64) -> f64 {
        curve::geometric_cost(self.base_cost, self.cost_growth, level, cost_reduction)
    }

    /// Total price of `count` consecutive levels starting at `level`.
    ///
    /// Returns `f64::INFINITY` as soon as a term or the running sum overflows,
    /// when `count` exceeds [`curve::MAX_PURCHASE_ITERS`], or when the range
    /// runs past level `u32::MAX`.
    pub fn cost_for_levels(&self, level: u32, count: u32, cost_reduction: f64) -> f64 {
        if count > curve::MAX_PURCHASE_ITERS {
            return f64::INFINITY;
        }
        let mut sum = 0.0;
        for i in 0..count {
            let Some(at) = level.checked_add(i).filter(|&l| l < u32::MAX) else {
                return f64::INFINITY;
            };
            let term = self.next_level_cost(at, cost_reduction);
            if curve::is_overflowed(term) {
                return f64::INFINITY;
            }
            sum += term;
            if curve::is_overflowed(sum) {
                return f64::INFINITY;
            }
        }
        sum
    }

    /// Greedy count of levels `available` can pay for, one at a time.
    pub fn max_affordable_levels(&self, level: u32, available: f64, cost_reduction: f64) -> u32 {
        let mut remaining = available;
        let mut bought = 0u32;
        while bought < curve::MAX_PURCHASE_ITERS {
            // Level `u32::MAX` is the last one; nothing above it can be bought.
            let Some(at) = level.checked_add(bought).filter(|&l| l < u32::MAX) else { break };
            let cost = self.next_level_cost(at, cost_reduction);
            // `!(a >= b)` so a NaN budget buys nothing.
            if curve::is_overflowed(cost) || !(remaining >= cost) {
                break;
            }
            remaining -= cost;
            bought += 1;
        }
        bought
    }

    pub fn weak_milestone_count(&self, level: u32) -> u32 {
        self.milestones.weak.count(level)
    }

    pub fn strong_milestone_count(&self, level: u32) -> u32 {
        self.milestones.strong.count(level)
    }

    pub fn grand_milestone_count(&self, level: u32) -> u32 {
        self.milestones.grand.count(level)
    }

    /// Completed strong intervals; feeds constellation bonuses.
    pub fn upgrade_tier(&self, level: u32) -> u32 {
        self.strong_milestone_count(level)
    }

    pub fn is_unlocked(&self, level: u32, lifetime_earned: f64) -> bool {
        level > 0 || lifetime_earned >= self.unlock_at
    }
}

/// A configured generator plus its current level.
#[derive(Clone, Debug, PartialEq)]
pub struct Generator {
    def: GeneratorDef,
    policy: MilestonePolicy,
    level: u32,
}

impl Generator {
    pub fn new(def: GeneratorDef, policy: MilestonePolicy) -> Self {
        Self { def, policy, level: 0 }
    }

    pub fn id(&self) -> &str {
        &self.def.id
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn def(&self) -> &GeneratorDef {
        &self.def
    }

    pub fn policy(&self) -> MilestonePolicy {
        self.policy
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn production_per_second(&self) -> f64 {
        self.def.production_per_second(self.level, self.policy)
    }

    pub fn next_level_cost(&self, cost_reduction: f64) -> f64 {
        self.def.next_level_cost(self.level, cost_reduction)
    }

    pub fn cost_for_levels(&self, count: u32, cost_reduction: f64) -> f64 {
        self.def.cost_for_levels(self.level, count, cost_reduction)
    }

    pub fn max_affordable_levels(&self, available: f64, cost_reduction: f64) -> u32 {
        self.def.max_affordable_levels(self.level, available, cost_reduction)
    }

    pub fn upgrade_tier(&self) -> u32 {
        self.def.upgrade_tier(self.level)
    }

    pub fn is_unlocked(&self, lifetime_earned: f64) -> bool {
        self.def.is_unlocked(self.level, lifetime_earned)
    }

    /// Pay the next-level price through `spend`; on success the level rises by one.
    /// At `u32::MAX` nothing is charged.
    pub fn try_buy_level(&mut self, cost_reduction: f64, spend: impl FnOnce(f64) -> bool) -> Option<f64> {
        let next = self.level.checked_add(1)?;
        let cost = self.next_level_cost(cost_reduction);
        if curve::is_overflowed(cost) || !spend(cost) {
            return None;
        }
        self.level = next;
        Some(cost)
    }

    pub(crate) fn set_level(&mut self, level: u32) {
        self.level = level;
    }
}
