// src/engine/mod.rs

// The engine ties the neutral models in `systems` to a balance, a clock and a
// save store. Optional store backends are feature-gated so hosts enable only
// the persistence they use.

pub mod economy;
pub mod snapshot;
pub mod view;

#[cfg(feature = "store-file")]
pub mod file_store;

#[cfg(feature = "store-kv")]
pub mod prefs;

pub use economy::EconomyEngine;
pub use snapshot::{MemoryStore, SNAPSHOT_VERSION, SaveStore, Snapshot};
pub use view::{EconomyView, GeneratorQuote, LoadReport, Outcome, TickReport, UpgradeQuote};

#[cfg(feature = "store-file")]
pub use file_store::JsonFileStore;

#[cfg(feature = "store-kv")]
pub use prefs::PrefsStore;
