// src/systems/aggregate.rs

//! Folds generator output and upgrade effects into one effective rate.
//!
//! Upgrade scalars ([`Multipliers`]) depend only on upgrade levels and are
//! rebuilt whenever one changes. The effective rate ([`Production`]) also
//! depends on generator levels, lifetime earnings and the transient
//! multiplier, so it is recomputed on every query.

use crate::systems::generator::Generator;
use crate::systems::upgrade::{Upgrade, UpgradeKind};

/// Global scalars composed from all purchased upgrades.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Multipliers {
    pub global_production: f64,
    pub offline_gain: f64,
    /// Applied to every generator price; within `[floor, 1]`.
    pub cost_reduction: f64,
    pub synergy_per_generator: f64,
    pub constellation_bonus: f64,
    pub singularity: f64,
}

impl Default for Multipliers {
    fn default() -> Self {
        Self::neutral()
    }
}

impl Multipliers {
    pub fn neutral() -> Self {
        Self {
            global_production: 1.0,
            offline_gain: 1.0,
            cost_reduction: 1.0,
            synergy_per_generator: 0.0,
            constellation_bonus: 0.0,
            singularity: 1.0,
        }
    }

    /// Fold every upgrade by kind. `cost_floor` bounds the composed cost
    /// reduction from below so prices never reach zero; NaN counts as 0.
    pub fn from_upgrades<'a>(upgrades: impl IntoIterator<Item = &'a Upgrade>, cost_floor: f64) -> Self {
        let mut m = Self::neutral();
        for upg in upgrades {
            if upg.level() == 0 {
                continue;
            }
            let effect = upg.current_effect();
            match upg.kind() {
                UpgradeKind::GlobalProduction => m.global_production *= 1.0 + effect,
                UpgradeKind::OfflineGain => m.offline_gain *= 1.0 + effect,
                UpgradeKind::GeneratorCostReduction => m.cost_reduction *= (1.0 - effect).clamp(0.0, 1.0),
                UpgradeKind::GeneratorSynergy => m.synergy_per_generator += effect,
                UpgradeKind::ConstellationBoost => m.constellation_bonus += effect,
                UpgradeKind::SingularityCore => m.singularity *= 1.0 + effect,
            }
        }
        let floor = if cost_floor.is_nan() { 0.0 } else { cost_floor.clamp(0.0, 1.0) };
        m.cost_reduction = m.cost_reduction.clamp(floor, 1.0);
        m
    }

    /// `1 + synergy_per_generator * unlocked`.
    #[inline]
    pub fn synergy_factor(&self, unlocked: usize) -> f64 {
        1.0 + self.synergy_per_generator * unlocked as f64
    }

    /// Constellation scaling for a generator at `tier`.
    #[inline]
    pub fn constellation_factor(&self, tier: u32) -> f64 {
        if self.constellation_bonus > 0.0 {
            1.0 + self.constellation_bonus * f64::from(tier)
        } else {
            1.0
        }
    }
}

/// One evaluation of the production pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Production {
    /// Σ generator output after constellation scaling.
    pub sum_per_second: f64,
    pub unlocked_count: usize,
    pub synergy_factor: f64,
    pub transient: f64,
    /// Final stardust per second.
    pub per_second: f64,
}

/// Effective production for the given collections.
///
/// `transient` is the externally supplied rhythm bonus; negative values are
/// floored to 0 and non-finite ones treated as neutral.
pub fn production<'a>(
    generators: impl IntoIterator<Item = &'a Generator>,
    m: &Multipliers,
    lifetime_earned: f64,
    transient: f64,
) -> Production {
    let mut sum_per_second = 0.0;
    let mut unlocked_count = 0usize;
    for g in generators {
        if g.is_unlocked(lifetime_earned) {
            unlocked_count += 1;
        }
        sum_per_second += g.production_per_second() * m.constellation_factor(g.upgrade_tier());
    }

    let transient = sanitize_transient(transient);
    let synergy_factor = m.synergy_factor(unlocked_count);
    let per_second = sum_per_second * m.global_production * synergy_factor * m.singularity * transient;

    Production {
        sum_per_second,
        unlocked_count,
        synergy_factor,
        transient,
        per_second: if per_second.is_nan() { 0.0 } else { per_second.min(f64::MAX) },
    }
}

#[inline]
fn sanitize_transient(t: f64) -> f64 {
    if t.is_finite() { t.max(0.0) } else { 1.0 }
}
