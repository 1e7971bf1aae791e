//! Read-side values handed to UI collaborators after each logical update.

use crate::systems::{Multipliers, Production, UpgradeKind};

/// Result of a mutating call: what happened plus the refreshed rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outcome {
    /// Levels actually bought (may be fewer than requested).
    pub bought: u32,
    pub spent: f64,
    pub stardust: f64,
    pub production: Production,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub elapsed_secs: f64,
    pub gained: f64,
    pub stardust: f64,
    pub production: Production,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadReport {
    /// False when the store held no save (or an unreadable one).
    pub restored: bool,
    pub offline_secs: f64,
    pub offline_gain: f64,
    pub stardust: f64,
    pub production: Production,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorQuote {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub production_per_second: f64,
    pub next_cost: f64,
    pub unlocked: bool,
    pub upgrade_tier: u32,
    pub max_affordable: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeQuote {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: UpgradeKind,
    pub level: u32,
    /// 0 means unbounded.
    pub max_level: u32,
    pub effect: f64,
    pub next_cost: f64,
    pub maxed: bool,
}

/// Everything the UI reads, pulled once per update.
#[derive(Clone, Debug, PartialEq)]
pub struct EconomyView {
    pub stardust: f64,
    pub total_stardust: f64,
    pub production: Production,
    pub multipliers: Multipliers,
    pub generators: Vec<GeneratorQuote>,
    pub upgrades: Vec<UpgradeQuote>,
}
