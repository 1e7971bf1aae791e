//! Economy configuration: the fixed catalog of generators and upgrades plus
//! the few knobs the model leaves open.
//!
//! ```toml
//! starting_stardust = 10.0
//! milestone_policy = "compound"
//! min_cost_multiplier = 0.01
//!
//! [[generators]]
//! id = "STAR_1"
//! name = "Nascent Star"
//! base_production = 1.0
//! base_cost = 10.0
//! cost_growth = 1.15
//! milestones = { weak = { interval = 25, multiplier = 0.7 }, strong = { interval = 100, multiplier = 3.4 } }
//!
//! [[upgrades]]
//! id = "UPG_GLOBAL_1"
//! kind = "global_production"
//! base_cost = 1000.0
//! cost_growth = 2.0
//! max_level = 10
//! per_level = 0.25
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::systems::{GeneratorDef, MilestonePolicy, UpgradeDef};

/// Top-level economy configuration. Definition order is display and
/// iteration order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Balance after a fresh start or a reset.
    pub starting_stardust: f64,
    pub milestone_policy: MilestonePolicy,
    /// Floor for the composed generator cost-reduction multiplier.
    pub min_cost_multiplier: f64,
    pub generators: Vec<GeneratorDef>,
    pub upgrades: Vec<UpgradeDef>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_stardust: 0.0,
            milestone_policy: MilestonePolicy::Compound,
            min_cost_multiplier: 0.01,
            generators: Vec::new(),
            upgrades: Vec::new(),
        }
    }
}

impl EconomyConfig {
    /// Load and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, [`ConfigError::Toml`]
    /// if it is not valid TOML, or a validation error.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] on malformed TOML, or a validation error.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(text)?;
        config.validate()?;
        config.default_names();
        Ok(config)
    }

    pub fn with_generator(mut self, def: GeneratorDef) -> Self {
        self.generators.push(def);
        self
    }

    pub fn with_upgrade(mut self, def: UpgradeDef) -> Self {
        self.upgrades.push(def);
        self
    }

    /// Check ids and numeric ranges.
    ///
    /// Cost growth at or below 1 is accepted (purchase loops are bounded) but
    /// logged, since prices then stop rising.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_amount("starting_stardust", self.starting_stardust)?;
        if !(0.0..=1.0).contains(&self.min_cost_multiplier) {
            return Err(invalid("min_cost_multiplier", "must be within [0, 1]"));
        }

        let mut seen = HashSet::new();
        for g in &self.generators {
            if g.id.is_empty() {
                return Err(invalid("<generator>", "empty id"));
            }
            if !seen.insert(g.id.as_str()) {
                return Err(ConfigError::DuplicateGenerator(g.id.clone()));
            }
            check_amount(&g.id, g.base_production)?;
            check_amount(&g.id, g.base_cost)?;
            check_amount(&g.id, g.unlock_at)?;
            check_growth(&g.id, g.cost_growth)?;
            for tier in [g.milestones.weak, g.milestones.strong, g.milestones.grand] {
                if !(tier.multiplier.is_finite() && tier.multiplier >= 0.0) {
                    return Err(invalid(&g.id, "milestone multiplier must be finite and >= 0"));
                }
            }
        }

        let mut seen = HashSet::new();
        for u in &self.upgrades {
            if u.id.is_empty() {
                return Err(invalid("<upgrade>", "empty id"));
            }
            if !seen.insert(u.id.as_str()) {
                return Err(ConfigError::DuplicateUpgrade(u.id.clone()));
            }
            check_amount(&u.id, u.base_cost)?;
            check_growth(&u.id, u.cost_growth)?;
            if !u.per_level.is_finite() {
                return Err(invalid(&u.id, "per_level must be finite"));
            }
        }
        Ok(())
    }

    /// Entries without a display name show their id.
    fn default_names(&mut self) {
        for g in self.generators.iter_mut().filter(|g| g.name.is_empty()) {
            g.name = g.id.clone();
        }
        for u in self.upgrades.iter_mut().filter(|u| u.name.is_empty()) {
            u.name = u.id.clone();
        }
    }
}

fn invalid(id: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { id: id.to_owned(), reason: reason.to_owned() }
}

fn check_amount(id: &str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(id, "amounts must be finite and >= 0"))
    }
}

fn check_growth(id: &str, v: f64) -> Result<(), ConfigError> {
    if !(v.is_finite() && v > 0.0) {
        return Err(invalid(id, "cost_growth must be finite and > 0"));
    }
    if v <= 1.0 {
        tracing::warn!(id, cost_growth = v, "cost growth <= 1: prices will not rise");
    }
    Ok(())
}
