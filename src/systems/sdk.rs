// src/systems/sdk.rs

//! # Modifier SDK
//!
//! Small hook protocol that lets collaborators outside the economy core
//! participate in production without the core knowing what they are.
//!
//! The canonical user is the rhythm mini-game: it turns click timing into a
//! short-lived production bonus. The economy never sees clicks, combos or
//! surges; it only asks every registered [`Modifier`] for a multiplier when it
//! evaluates the effective rate, and tells them how much time passed on each
//! tick.
//!
//! ## Protocol
//!
//! - `production_multiplier(&self) -> f64`
//!   Read at any time (ticks, UI quotes). Default `1.0`. Values from all
//!   modifiers are multiplied together; negative values are floored to 0
//!   and non-finite ones are skipped.
//!
//! - `advance(&mut self, elapsed_secs)`
//!   Called once per [`EconomyEngine::tick`](crate::engine::EconomyEngine::tick)
//!   after currency has been credited. Use it to decay timed bonuses if the
//!   modifier owns its own clock; leave it empty if something else drives it.
//!
//! ## Offline time
//!
//! Modifiers are not consulted during offline reconciliation. Nobody was
//! playing while the game was closed, so the credited rate is the upgrade
//! and generator rate alone.
//!
//! ## Sharing a value
//!
//! [`SharedMultiplier`] is a cloneable cell: register one clone on the engine
//! and keep another in the collaborator that writes it. The engine is
//! single-threaded, so this is `Rc<Cell<_>>`, not a lock.
//!
//! ## Anti-patterns to avoid
//! - Don't recompute generator or upgrade math in a modifier; modifiers
//!   *scale*, they don't *rebuild*.
//! - Don't mutate the engine from inside a modifier.

use std::cell::Cell;
use std::rc::Rc;

/// A source of a transient production multiplier.
pub trait Modifier {
    /// (Optional) multiplier applied to the effective rate (default: 1.0).
    fn production_multiplier(&self) -> f64 {
        1.0
    }
    /// (Optional) observe simulated time passing.
    fn advance(&mut self, _elapsed_secs: f64) {}
}

/// Constant multiplier, mostly for tests and tooling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fixed(pub f64);

impl Modifier for Fixed {
    fn production_multiplier(&self) -> f64 {
        self.0
    }
}

/// Externally written multiplier handle.
#[derive(Clone, Debug)]
pub struct SharedMultiplier(Rc<Cell<f64>>);

impl Default for SharedMultiplier {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl SharedMultiplier {
    pub fn new(value: f64) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    pub fn set(&self, value: f64) {
        self.0.set(value);
    }

    pub fn get(&self) -> f64 {
        self.0.get()
    }
}

impl Modifier for SharedMultiplier {
    fn production_multiplier(&self) -> f64 {
        self.get()
    }
}

/// Product of all modifiers' multipliers, each floored at 0.
pub fn combined<'a>(modifiers: impl IntoIterator<Item = &'a Box<dyn Modifier>>) -> f64 {
    modifiers
        .into_iter()
        .map(|m| m.production_multiplier())
        .filter(|v| v.is_finite())
        .fold(1.0, |acc, v| acc * v.max(0.0))
}
