// src/engine/economy.rs

//! The economy engine: owns the balance and the generator/upgrade
//! collections, and is the only thing that mutates them.
//!
//! Every change to the balance goes through [`EconomyEngine::add_currency`]
//! or the shared spend gate behind [`EconomyEngine::spend_currency`]. Upgrade
//! levels never change without the [`Multipliers`] being rebuilt in the same
//! call, so no reader observes a stale multiplier.
//!
//! The engine is single-threaded; a host that shares one across threads has
//! to serialize access itself.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::EconomyConfig;
use crate::engine::snapshot::{self, SNAPSHOT_VERSION, SaveStore, Snapshot};
use crate::engine::view::{EconomyView, GeneratorQuote, LoadReport, Outcome, TickReport, UpgradeQuote};
use crate::error::{ConfigError, PurchaseError, StoreError};
use crate::mechanics::curve::MAX_PURCHASE_ITERS;
use crate::systems::aggregate::{self, Multipliers, Production};
use crate::systems::sdk::{self, Modifier};
use crate::systems::{Generator, Upgrade};

/// Deduct `amount` iff the balance covers it. Negative and NaN amounts are refused.
fn spend_from(balance: &mut f64, amount: f64) -> bool {
    if !(amount >= 0.0) || *balance < amount {
        return false;
    }
    *balance -= amount;
    true
}

pub struct EconomyEngine {
    stardust: f64,
    total_stardust: f64,
    last_save: Option<DateTime<Utc>>,
    generators: Vec<Generator>,
    upgrades: Vec<Upgrade>,
    generator_slots: HashMap<String, usize>,
    upgrade_slots: HashMap<String, usize>,
    multipliers: Multipliers,
    production: Production,
    modifiers: Vec<Box<dyn Modifier>>,
    starting_stardust: f64,
    min_cost_multiplier: f64,
}

impl EconomyEngine {
    /// Build an engine from a validated catalog, at the starting balance.
    ///
    /// # Errors
    ///
    /// Returns the first validation problem in `config`.
    pub fn new(config: EconomyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let policy = config.milestone_policy;

        let generators: Vec<Generator> = config
            .generators
            .into_iter()
            .map(|def| Generator::new(def, policy))
            .collect();
        let upgrades: Vec<Upgrade> = config.upgrades.into_iter().map(Upgrade::new).collect();

        let generator_slots = generators.iter().enumerate().map(|(i, g)| (g.id().to_owned(), i)).collect();
        let upgrade_slots = upgrades.iter().enumerate().map(|(i, u)| (u.id().to_owned(), i)).collect();

        let mut engine = Self {
            stardust: config.starting_stardust,
            total_stardust: 0.0,
            last_save: None,
            generators,
            upgrades,
            generator_slots,
            upgrade_slots,
            multipliers: Multipliers::neutral(),
            production: Production::default(),
            modifiers: Vec::new(),
            starting_stardust: config.starting_stardust,
            min_cost_multiplier: config.min_cost_multiplier,
        };
        engine.recompute_multipliers();
        engine.refresh();
        Ok(engine)
    }

    /// # Errors
    ///
    /// See [`EconomyConfig::parse`].
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Self::new(EconomyConfig::parse(text)?)
    }

    /// Register a transient production source (e.g. the rhythm bonus).
    pub fn add_modifier(&mut self, modifier: Box<dyn Modifier>) {
        self.modifiers.push(modifier);
        self.refresh();
    }

    pub fn with_modifier(mut self, modifier: Box<dyn Modifier>) -> Self {
        self.add_modifier(modifier);
        self
    }

    // ── Read side ───────────────────────────────────────────────────────

    pub fn stardust(&self) -> f64 {
        self.stardust
    }

    pub fn total_stardust(&self) -> f64 {
        self.total_stardust
    }

    pub fn last_save(&self) -> Option<DateTime<Utc>> {
        self.last_save
    }

    pub fn multipliers(&self) -> &Multipliers {
        &self.multipliers
    }

    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    pub fn upgrades(&self) -> &[Upgrade] {
        &self.upgrades
    }

    pub fn generator(&self, id: &str) -> Option<&Generator> {
        self.generator_slots.get(id).map(|&i| &self.generators[i])
    }

    pub fn upgrade(&self, id: &str) -> Option<&Upgrade> {
        self.upgrade_slots.get(id).map(|&i| &self.upgrades[i])
    }

    /// Product of all registered modifiers.
    pub fn transient_multiplier(&self) -> f64 {
        sdk::combined(&self.modifiers)
    }

    /// Freshly evaluated production, including the transient multiplier.
    pub fn production(&self) -> Production {
        aggregate::production(&self.generators, &self.multipliers, self.total_stardust, self.transient_multiplier())
    }

    /// Effective stardust per second.
    pub fn production_rate(&self) -> f64 {
        self.production().per_second
    }

    /// Rate as of the last credit, purchase, tick, restore or reset.
    pub fn last_production(&self) -> Production {
        self.production
    }

    pub fn generator_quote(&self, id: &str) -> Option<GeneratorQuote> {
        self.generator(id).map(|g| self.quote_generator(g))
    }

    pub fn upgrade_quote(&self, id: &str) -> Option<UpgradeQuote> {
        self.upgrade(id).map(quote_upgrade)
    }

    /// Price of the next `count` levels of `id`, with current cost reduction.
    pub fn cost_for_levels(&self, id: &str, count: u32) -> Option<f64> {
        self.generator(id).map(|g| g.cost_for_levels(count, self.multipliers.cost_reduction))
    }

    /// Levels of `id` the current balance pays for.
    pub fn max_affordable_levels(&self, id: &str) -> Option<u32> {
        self.generator(id)
            .map(|g| g.max_affordable_levels(self.stardust, self.multipliers.cost_reduction))
    }

    pub fn view(&self) -> EconomyView {
        EconomyView {
            stardust: self.stardust,
            total_stardust: self.total_stardust,
            production: self.production(),
            multipliers: self.multipliers,
            generators: self.generators.iter().map(|g| self.quote_generator(g)).collect(),
            upgrades: self.upgrades.iter().map(quote_upgrade).collect(),
        }
    }

    fn quote_generator(&self, g: &Generator) -> GeneratorQuote {
        let reduction = self.multipliers.cost_reduction;
        GeneratorQuote {
            id: g.id().to_owned(),
            name: g.name().to_owned(),
            level: g.level(),
            production_per_second: g.production_per_second(),
            next_cost: g.next_level_cost(reduction),
            unlocked: g.is_unlocked(self.total_stardust),
            upgrade_tier: g.upgrade_tier(),
            max_affordable: g.max_affordable_levels(self.stardust, reduction),
        }
    }

    // ── Currency ────────────────────────────────────────────────────────

    /// Credit a positive amount to both balance and lifetime total.
    pub fn add_currency(&mut self, amount: f64) {
        if !(amount > 0.0) {
            return;
        }
        self.stardust = (self.stardust + amount).min(f64::MAX);
        self.total_stardust = (self.total_stardust + amount).min(f64::MAX);
        if self.stardust < 0.0 {
            self.stardust = 0.0;
        }
        // Lifetime earnings can unlock generators and move the synergy factor.
        self.refresh();
    }

    /// Deduct `amount` iff the balance covers it; otherwise nothing changes.
    /// The rate does not depend on the balance, so nothing is refreshed.
    pub fn spend_currency(&mut self, amount: f64) -> bool {
        spend_from(&mut self.stardust, amount)
    }

    // ── Purchases ───────────────────────────────────────────────────────

    fn generator_slot(&self, id: &str) -> Result<usize, PurchaseError> {
        self.generator_slots
            .get(id)
            .copied()
            .ok_or_else(|| PurchaseError::UnknownGenerator(id.to_owned()))
    }

    fn upgrade_slot(&self, id: &str) -> Result<usize, PurchaseError> {
        self.upgrade_slots
            .get(id)
            .copied()
            .ok_or_else(|| PurchaseError::UnknownUpgrade(id.to_owned()))
    }

    /// One level through the spend gate; `Some(cost)` on success.
    fn buy_one(&mut self, slot: usize) -> Option<f64> {
        let reduction = self.multipliers.cost_reduction;
        let balance = &mut self.stardust;
        self.generators[slot].try_buy_level(reduction, |cost| spend_from(balance, cost))
    }

    fn outcome(&mut self, bought: u32, spent: f64) -> Outcome {
        Outcome { bought, spent, stardust: self.stardust, production: self.refresh() }
    }

    /// Buy exactly one level: the full price is paid and the level rises by
    /// one, or nothing happens.
    ///
    /// # Errors
    ///
    /// [`PurchaseError::UnknownGenerator`], [`PurchaseError::Maxed`] at level
    /// `u32::MAX`, or [`PurchaseError::InsufficientFunds`].
    pub fn buy_generator_level(&mut self, id: &str) -> Result<Outcome, PurchaseError> {
        let slot = self.generator_slot(id)?;
        if self.generators[slot].level() == u32::MAX {
            return Err(PurchaseError::Maxed { id: id.to_owned(), max_level: u32::MAX });
        }
        let cost = self.generators[slot].next_level_cost(self.multipliers.cost_reduction);
        match self.buy_one(slot) {
            Some(spent) => {
                debug!(id, level = self.generators[slot].level(), spent, "generator level bought");
                Ok(self.outcome(1, spent))
            }
            None => Err(PurchaseError::InsufficientFunds { id: id.to_owned(), cost, balance: self.stardust }),
        }
    }

    /// Up to `count` single-level purchases, stopping at the first one that
    /// cannot be paid.
    ///
    /// # Errors
    ///
    /// Only [`PurchaseError::UnknownGenerator`]; buying fewer is not an error.
    pub fn buy_generator_levels(&mut self, id: &str, count: u32) -> Result<Outcome, PurchaseError> {
        let slot = self.generator_slot(id)?;
        let (bought, spent) = self.buy_repeatedly(slot, count.min(MAX_PURCHASE_ITERS));
        debug!(id, requested = count, bought, spent, "generator bulk purchase");
        Ok(self.outcome(bought, spent))
    }

    /// As many single levels as the balance allows, bounded by
    /// [`MAX_PURCHASE_ITERS`].
    ///
    /// # Errors
    ///
    /// Only [`PurchaseError::UnknownGenerator`].
    pub fn buy_generator_max_levels(&mut self, id: &str) -> Result<Outcome, PurchaseError> {
        let slot = self.generator_slot(id)?;
        let (bought, spent) = self.buy_repeatedly(slot, MAX_PURCHASE_ITERS);
        debug!(id, bought, spent, "generator max purchase");
        Ok(self.outcome(bought, spent))
    }

    fn buy_repeatedly(&mut self, slot: usize, limit: u32) -> (u32, f64) {
        let mut bought = 0u32;
        let mut spent = 0.0;
        while bought < limit {
            let Some(cost) = self.buy_one(slot) else { break };
            bought += 1;
            spent += cost;
        }
        (bought, spent)
    }

    /// Buy one upgrade level. Multipliers are rebuilt before this returns.
    ///
    /// # Errors
    ///
    /// [`PurchaseError::UnknownUpgrade`], [`PurchaseError::Maxed`] or
    /// [`PurchaseError::InsufficientFunds`].
    pub fn buy_upgrade_level(&mut self, id: &str) -> Result<Outcome, PurchaseError> {
        let slot = self.upgrade_slot(id)?;
        let upg = &self.upgrades[slot];
        if upg.is_maxed() {
            return Err(PurchaseError::Maxed { id: id.to_owned(), max_level: upg.def().level_cap() });
        }
        let cost = upg.next_cost();

        let balance = &mut self.stardust;
        let Some(spent) = self.upgrades[slot].try_buy(|c| spend_from(balance, c)) else {
            return Err(PurchaseError::InsufficientFunds { id: id.to_owned(), cost, balance: self.stardust });
        };
        self.recompute_multipliers();
        debug!(id, level = self.upgrades[slot].level(), spent, "upgrade level bought");
        Ok(self.outcome(1, spent))
    }

    // ── Time ────────────────────────────────────────────────────────────

    /// Advance one simulation step of `elapsed_secs` at the current rate.
    pub fn tick(&mut self, elapsed_secs: f64) -> TickReport {
        let production = self.refresh();
        let before = self.stardust;
        self.add_currency(production.per_second * elapsed_secs);
        for m in &mut self.modifiers {
            m.advance(elapsed_secs);
        }
        TickReport {
            elapsed_secs,
            gained: self.stardust - before,
            stardust: self.stardust,
            production,
        }
    }

    /// Credit time spent closed as one step at today's rate.
    ///
    /// Modifiers are left out: nobody plays the rhythm game offline. Returns
    /// the credited amount.
    pub fn reconcile_offline_gain(&mut self, elapsed_secs: f64) -> f64 {
        let rate = aggregate::production(&self.generators, &self.multipliers, self.total_stardust, 1.0).per_second;
        let gain = rate * elapsed_secs.max(0.0) * self.multipliers.offline_gain;
        let before = self.stardust;
        self.add_currency(gain);
        let credited = self.stardust - before;
        info!(elapsed_secs, rate, offline_mult = self.multipliers.offline_gain, credited, "offline gain");
        self.refresh();
        credited
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Wipe progress back to the starting stake and clear the store.
    ///
    /// The in-memory reset always happens; the error only reports that the
    /// stored save could not be removed.
    ///
    /// # Errors
    ///
    /// Propagates [`SaveStore::clear`] failures.
    pub fn reset_game(&mut self, store: &mut dyn SaveStore) -> Result<Production, StoreError> {
        self.stardust = self.starting_stardust;
        self.total_stardust = 0.0;
        self.last_save = None;
        for g in &mut self.generators {
            g.set_level(0);
        }
        for u in &mut self.upgrades {
            u.set_level(0);
        }
        self.recompute_multipliers();
        let production = self.refresh();
        store.clear()?;
        info!(starting_stardust = self.starting_stardust, "game reset");
        Ok(production)
    }

    /// Current state as a save record stamped with the last save time.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            stardust: self.stardust,
            total_stardust: self.total_stardust,
            last_save_ticks: self.last_save.map(snapshot::to_ticks),
            generators: self.generators.iter().map(|g| (g.id().to_owned(), g.level())).collect(),
            upgrades: self.upgrades.iter().map(|u| (u.id().to_owned(), u.level())).collect(),
        }
    }

    /// Overwrite balance and levels from `snap`. Ids the catalog does not
    /// know are skipped; catalog entries missing from `snap` go to level 0.
    pub fn restore(&mut self, snap: &Snapshot) {
        self.stardust = sanitize_amount(snap.stardust);
        self.total_stardust = sanitize_amount(snap.total_stardust);
        self.last_save = snap.saved_at();

        for g in &mut self.generators {
            g.set_level(snap.generators.get(g.id()).copied().unwrap_or(0));
        }
        for u in &mut self.upgrades {
            let stored = snap.upgrades.get(u.id()).copied().unwrap_or(0);
            u.set_level(stored);
            if u.level() != stored {
                warn!(id = u.id(), stored, max_level = u.def().max_level, "upgrade level above max, clamped");
            }
        }
        for id in snap.generators.keys().filter(|id| !self.generator_slots.contains_key(id.as_str())) {
            warn!(id = %id, "snapshot names an unknown generator, ignored");
        }
        for id in snap.upgrades.keys().filter(|id| !self.upgrade_slots.contains_key(id.as_str())) {
            warn!(id = %id, "snapshot names an unknown upgrade, ignored");
        }

        self.recompute_multipliers();
        self.refresh();
    }

    /// Write the current state stamped with `now`.
    ///
    /// # Errors
    ///
    /// Propagates the store's write error; the engine is unchanged in that case.
    pub fn save_at(&mut self, store: &mut dyn SaveStore, now: DateTime<Utc>) -> Result<Snapshot, StoreError> {
        let mut snap = self.snapshot();
        snap.last_save_ticks = Some(snapshot::to_ticks(now));
        store.write(&snap)?;
        self.last_save = Some(now);
        info!(stardust = snap.stardust, generators = snap.generators.len(), upgrades = snap.upgrades.len(), "game saved");
        Ok(snap)
    }

    /// [`save_at`](Self::save_at) with the wall clock.
    ///
    /// # Errors
    ///
    /// See [`save_at`](Self::save_at).
    pub fn save(&mut self, store: &mut dyn SaveStore) -> Result<Snapshot, StoreError> {
        self.save_at(store, Utc::now())
    }

    /// Restore from `store`, then credit the time since the stored save.
    ///
    /// Never fails: an unreadable store leaves the engine as it was and is
    /// reported through `restored: false`.
    pub fn load_at(&mut self, store: &dyn SaveStore, now: DateTime<Utc>) -> LoadReport {
        let snap = match store.read() {
            Ok(snap) => snap,
            Err(err) => {
                warn!(%err, "save unreadable, keeping current state");
                None
            }
        };
        let Some(snap) = snap else {
            info!("no save found");
            return LoadReport {
                restored: false,
                offline_secs: 0.0,
                offline_gain: 0.0,
                stardust: self.stardust,
                production: self.refresh(),
            };
        };

        self.restore(&snap);

        let (offline_secs, offline_gain) = match snap.saved_at() {
            Some(saved) => {
                let secs = snapshot::elapsed_secs(saved, now);
                (secs, self.reconcile_offline_gain(secs))
            }
            None => (0.0, 0.0),
        };
        let production = self.refresh();
        info!(stardust = self.stardust, offline_secs, offline_gain, "game loaded");
        LoadReport { restored: true, offline_secs, offline_gain, stardust: self.stardust, production }
    }

    /// [`load_at`](Self::load_at) with the wall clock.
    pub fn load(&mut self, store: &dyn SaveStore) -> LoadReport {
        self.load_at(store, Utc::now())
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn recompute_multipliers(&mut self) {
        self.multipliers = Multipliers::from_upgrades(&self.upgrades, self.min_cost_multiplier);
        debug!(multipliers = ?self.multipliers, "multipliers recomputed");
    }

    fn refresh(&mut self) -> Production {
        self.production = self.production();
        self.production
    }
}

fn quote_upgrade(u: &Upgrade) -> UpgradeQuote {
    let def = u.def();
    UpgradeQuote {
        id: def.id.clone(),
        name: def.name.clone(),
        description: def.description.clone(),
        kind: def.kind,
        level: u.level(),
        max_level: def.max_level,
        effect: u.current_effect(),
        next_cost: u.next_cost(),
        maxed: u.is_maxed(),
    }
}

fn sanitize_amount(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}
