// src/systems/upgrade.rs

//! Global upgrade model. The effect of an upgrade is `per_level * level`;
//! how that number is folded into the economy depends on its [`UpgradeKind`]
//! and happens in [`crate::systems::aggregate`].

use serde::{Deserialize, Serialize};

use crate::mechanics::curve;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    /// Multiplies all production: `Π (1 + effect)`.
    GlobalProduction,
    /// Multiplies offline reconciliation gains: `Π (1 + effect)`.
    OfflineGain,
    /// Scales generator prices: `Π (1 - effect)`.
    GeneratorCostReduction,
    /// `+effect` production per unlocked generator.
    GeneratorSynergy,
    /// `+effect` production per strong-milestone tier of each generator.
    ConstellationBoost,
    /// Endgame multiplier: `Π (1 + effect)`.
    SingularityCore,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeDef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: UpgradeKind,
    pub base_cost: f64,
    pub cost_growth: f64,
    /// 0 means unbounded.
    #[serde(default)]
    pub max_level: u32,
    pub per_level: f64,
}

impl UpgradeDef {
    pub fn new(id: impl Into<String>, kind: UpgradeKind, base_cost: f64, cost_growth: f64, per_level: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            kind,
            base_cost,
            cost_growth,
            max_level: 0,
            per_level,
        }
    }

    pub fn named(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.name = name.into();
        self.description = description.into();
        self
    }

    pub fn max_level(mut self, max_level: u32) -> Self {
        self.max_level = max_level;
        self
    }

    #[inline]
    pub fn current_effect(&self, level: u32) -> f64 {
        self.per_level * f64::from(level)
    }

    #[inline]
    pub fn next_cost(&self, level: u32) -> f64 {
        curve::geometric_cost(self.base_cost, self.cost_growth, level, 1.0)
    }

    /// Unbounded upgrades still stop at `u32::MAX`.
    #[inline]
    pub fn is_maxed(&self, level: u32) -> bool {
        level == u32::MAX || (self.max_level > 0 && level >= self.max_level)
    }

    /// The level at which [`is_maxed`](Self::is_maxed) turns true.
    #[inline]
    pub fn level_cap(&self) -> u32 {
        if self.max_level > 0 { self.max_level } else { u32::MAX }
    }

    /// Clamp a restored level into `[0, max_level]` when bounded.
    pub fn clamp_level(&self, level: u32) -> u32 {
        if self.max_level > 0 { level.min(self.max_level) } else { level }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Upgrade {
    def: UpgradeDef,
    level: u32,
}

impl Upgrade {
    pub fn new(def: UpgradeDef) -> Self {
        Self { def, level: 0 }
    }

    pub fn id(&self) -> &str {
        &self.def.id
    }

    pub fn kind(&self) -> UpgradeKind {
        self.def.kind
    }

    pub fn def(&self) -> &UpgradeDef {
        &self.def
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn current_effect(&self) -> f64 {
        self.def.current_effect(self.level)
    }

    pub fn next_cost(&self) -> f64 {
        self.def.next_cost(self.level)
    }

    pub fn is_maxed(&self) -> bool {
        self.def.is_maxed(self.level)
    }

    /// Fails without touching state when maxed or when `spend` refuses the price.
    /// Callers must recompute multipliers after a successful buy.
    pub fn try_buy(&mut self, spend: impl FnOnce(f64) -> bool) -> Option<f64> {
        if self.is_maxed() {
            return None;
        }
        let next = self.level.checked_add(1)?;
        let cost = self.next_cost();
        if curve::is_overflowed(cost) || !spend(cost) {
            return None;
        }
        self.level = next;
        Some(cost)
    }

    pub(crate) fn set_level(&mut self, level: u32) {
        self.level = self.def.clamp_level(level);
    }
}
